//! Closed value sets shared by every record.
//!
//! All enums serialize as their wire *values* (`"COORD"`, `"teal"`,
//! `"Web and App Dev"`), never as Rust variant names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::security::validation::ValidationError;

/// A fixed catalog whose members are identified by their wire value.
pub trait ClosedEnum: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }

    fn allowed_values() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.as_str()).collect()
    }
}

/// Parses `value` into `T`, reporting a field-scoped error listing the
/// accepted values otherwise.
pub fn parse_enum_field<T: ClosedEnum>(value: &str, field: &str) -> Result<T, ValidationError> {
    T::parse(value).ok_or_else(|| ValidationError::InvalidValue {
        field: field.to_string(),
        message: format!("'{}' is not one of {:?}", value, T::allowed_values()),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! closed_enum_str_impls {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as ClosedEnum>::parse(s).ok_or_else(|| UnknownVariant {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

// ============================================================================
// USER ROLES
// ============================================================================

/// Position in the organizational hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Fc,
    Coord,
    Subcord,
    ItGuy,
}

impl ClosedEnum for UserRole {
    const ALL: &'static [Self] = &[Self::Fc, Self::Coord, Self::Subcord, Self::ItGuy];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Fc => "FC",
            Self::Coord => "COORD",
            Self::Subcord => "SUBCORD",
            Self::ItGuy => "IT_GUY",
        }
    }

    /// Roles arrive from profile data in any case ("Coord", "it guy").
    fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_uppercase().replace(' ', "_");
        Self::ALL.iter().copied().find(|v| v.as_str() == normalized)
    }
}

closed_enum_str_impls!(UserRole, "user role");

// ============================================================================
// COMMITTEES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Committee {
    #[serde(rename = "Marketing and Sponsorships")]
    MarketingSponsorships,
    #[serde(rename = "Media and Public Relations")]
    MediaPr,
    #[serde(rename = "Events and Logistics")]
    EventsLogistics,
    #[serde(rename = "Production")]
    Production,
    #[serde(rename = "Design")]
    Design,
    #[serde(rename = "Web and App Dev")]
    WebAppDev,
    #[serde(rename = "Registration Security and Planning")]
    RegistrationSecurity,
    #[serde(rename = "Hospitality")]
    Hospitality,
}

impl ClosedEnum for Committee {
    const ALL: &'static [Self] = &[
        Self::MarketingSponsorships,
        Self::MediaPr,
        Self::EventsLogistics,
        Self::Production,
        Self::Design,
        Self::WebAppDev,
        Self::RegistrationSecurity,
        Self::Hospitality,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::MarketingSponsorships => "Marketing and Sponsorships",
            Self::MediaPr => "Media and Public Relations",
            Self::EventsLogistics => "Events and Logistics",
            Self::Production => "Production",
            Self::Design => "Design",
            Self::WebAppDev => "Web and App Dev",
            Self::RegistrationSecurity => "Registration Security and Planning",
            Self::Hospitality => "Hospitality",
        }
    }
}

closed_enum_str_impls!(Committee, "committee");

impl Committee {
    pub fn color(&self) -> CommitteeColor {
        committee_color(*self)
    }
}

// ============================================================================
// COMMITTEE COLORS
// ============================================================================

/// Join key between a coordinator and the sub-coordinators beneath them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitteeColor {
    Red,
    Blue,
    Green,
    Purple,
    Orange,
    Teal,
    Yellow,
    Pink,
}

impl ClosedEnum for CommitteeColor {
    const ALL: &'static [Self] = &[
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Purple,
        Self::Orange,
        Self::Teal,
        Self::Yellow,
        Self::Pink,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Teal => "teal",
            Self::Yellow => "yellow",
            Self::Pink => "pink",
        }
    }
}

closed_enum_str_impls!(CommitteeColor, "committee colour");

impl CommitteeColor {
    /// Reverse of [`COMMITTEE_COLOR_MAP`]; the mapping is one-to-one.
    pub const fn committee(&self) -> Committee {
        match self {
            Self::Red => Committee::MarketingSponsorships,
            Self::Blue => Committee::MediaPr,
            Self::Green => Committee::EventsLogistics,
            Self::Purple => Committee::Production,
            Self::Orange => Committee::Design,
            Self::Teal => Committee::WebAppDev,
            Self::Yellow => Committee::RegistrationSecurity,
            Self::Pink => Committee::Hospitality,
        }
    }
}

pub const COMMITTEE_COLOR_MAP: [(Committee, CommitteeColor); 8] = [
    (Committee::MarketingSponsorships, CommitteeColor::Red),
    (Committee::MediaPr, CommitteeColor::Blue),
    (Committee::EventsLogistics, CommitteeColor::Green),
    (Committee::Production, CommitteeColor::Purple),
    (Committee::Design, CommitteeColor::Orange),
    (Committee::WebAppDev, CommitteeColor::Teal),
    (Committee::RegistrationSecurity, CommitteeColor::Yellow),
    (Committee::Hospitality, CommitteeColor::Pink),
];

pub const fn committee_color(committee: Committee) -> CommitteeColor {
    match committee {
        Committee::MarketingSponsorships => CommitteeColor::Red,
        Committee::MediaPr => CommitteeColor::Blue,
        Committee::EventsLogistics => CommitteeColor::Green,
        Committee::Production => CommitteeColor::Purple,
        Committee::Design => CommitteeColor::Orange,
        Committee::WebAppDev => CommitteeColor::Teal,
        Committee::RegistrationSecurity => CommitteeColor::Yellow,
        Committee::Hospitality => CommitteeColor::Pink,
    }
}

// ============================================================================
// MEETINGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetType {
    #[default]
    General,
    Committee,
    Emergency,
    OneOnOne,
}

impl ClosedEnum for MeetType {
    const ALL: &'static [Self] = &[Self::General, Self::Committee, Self::Emergency, Self::OneOnOne];

    fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Committee => "committee",
            Self::Emergency => "emergency",
            Self::OneOnOne => "one_on_one",
        }
    }
}

closed_enum_str_impls!(MeetType, "meet type");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl ClosedEnum for MeetStatus {
    const ALL: &'static [Self] = &[
        Self::Scheduled,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

closed_enum_str_impls!(MeetStatus, "meet status");

impl MeetStatus {
    /// Scheduled and running meetings both count as active.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Scheduled | Self::InProgress)
    }
}
