//! Trip context types shared across the chat and notification paths

use serde::{Deserialize, Deserializer, Serialize};

/// Literal used in reply templates when no destination is known
pub const DESTINATION_PLACEHOLDER: &str = "tu destino";

/// Coarse persona tag used to select recommendation text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelerType {
    Cultural,
    Adventure,
    Relax,
    Gastronomy,
    Business,
    #[default]
    General,
}

impl TravelerType {
    /// Wire/display name (Spanish copy uses these verbatim)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cultural => "cultural",
            Self::Adventure => "adventure",
            Self::Relax => "relax",
            Self::Gastronomy => "gastronomy",
            Self::Business => "business",
            Self::General => "general",
        }
    }
}

impl std::str::FromStr for TravelerType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cultural" => Ok(Self::Cultural),
            "adventure" => Ok(Self::Adventure),
            "relax" => Ok(Self::Relax),
            "gastronomy" => Ok(Self::Gastronomy),
            "business" => Ok(Self::Business),
            "general" => Ok(Self::General),
            _ => Err(()),
        }
    }
}

/// Coarse stage of a trip lifecycle driving which canned advice applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelPhase {
    Planning,
    Departure,
    Arrival,
    Exploring,
    Return,
}

impl TravelPhase {
    /// Wire/display name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Departure => "departure",
            Self::Arrival => "arrival",
            Self::Exploring => "exploring",
            Self::Return => "return",
        }
    }
}

impl std::str::FromStr for TravelPhase {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "planning" => Ok(Self::Planning),
            "departure" => Ok(Self::Departure),
            "arrival" => Ok(Self::Arrival),
            "exploring" => Ok(Self::Exploring),
            "return" => Ok(Self::Return),
            _ => Err(()),
        }
    }
}

/// Lightweight trip context attached to a chat message or session update.
///
/// All fields are optional on the wire. Updates overlay earlier values
/// per-field (last-write-wins); an absent field never clears a stored one.
/// Unrecognized traveler types and phases deserialize as absent rather than
/// rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_traveler_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub traveler_type: Option<TravelerType>,

    #[serde(
        default,
        deserialize_with = "lenient_travel_phase",
        skip_serializing_if = "Option::is_none"
    )]
    pub travel_phase: Option<TravelPhase>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl TripContext {
    /// Overlay `update` onto `self`, field by field. Present fields win;
    /// absent fields leave the existing value untouched.
    pub fn overlay(&mut self, update: &Self) {
        if update.destination.is_some() {
            self.destination.clone_from(&update.destination);
        }
        if update.traveler_type.is_some() {
            self.traveler_type = update.traveler_type;
        }
        if update.travel_phase.is_some() {
            self.travel_phase = update.travel_phase;
        }
        if update.session_id.is_some() {
            self.session_id.clone_from(&update.session_id);
        }
        if update.user_id.is_some() {
            self.user_id.clone_from(&update.user_id);
        }
    }

    /// Destination for templating, or the placeholder literal
    #[must_use]
    pub fn destination_or_placeholder(&self) -> &str {
        self.destination.as_deref().unwrap_or(DESTINATION_PLACEHOLDER)
    }

    /// Traveler type, defaulting to `general`
    #[must_use]
    pub fn traveler_type_or_default(&self) -> TravelerType {
        self.traveler_type.unwrap_or_default()
    }
}

fn lenient_traveler_type<'de, D>(de: D) -> std::result::Result<Option<TravelerType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.as_deref().and_then(|s| s.parse().ok()))
}

fn lenient_travel_phase<'de, D>(de: D) -> std::result::Result<Option<TravelPhase>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.as_deref().and_then(|s| s.parse().ok()))
}
