//! Urgency tiers and their mapping onto OS importance
//!
//! The native caller classifies every notification into one of four tiers.
//! The OS only knows its own importance classes (channel importance on newer
//! platforms, a per-notification priority on older ones), so each tier is
//! quantized onto exactly one OS class:
//! - critical -> high
//! - high     -> default
//! - normal   -> low
//! - low      -> minimal
//!
//! Records may carry the tier by name or as the native numeric level.

use serde::{Deserialize, Serialize};

/// Caller-specified urgency tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "UrgencyRepr")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [Urgency::Low, Urgency::Normal, Urgency::High, Urgency::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Urgency> {
        Urgency::ALL.into_iter().find(|u| u.as_str() == s)
    }

    /// Numeric tier used by the native caller
    pub fn level(&self) -> u8 {
        match self {
            Urgency::Low => 10,
            Urgency::Normal => 50,
            Urgency::High => 70,
            Urgency::Critical => 90,
        }
    }

    /// Parse the native caller's numeric tier.
    ///
    /// Values between tiers round down to the nearest known tier; anything
    /// below `Low` (including the native "default urgency" of -1) is `Normal`.
    pub fn from_level(level: i32) -> Urgency {
        match level {
            l if l >= 90 => Urgency::Critical,
            l if l >= 70 => Urgency::High,
            l if l >= 50 => Urgency::Normal,
            l if l >= 10 => Urgency::Low,
            _ => Urgency::Normal,
        }
    }
}

/// Wire form of an urgency: tier name or native numeric level
#[derive(Deserialize)]
#[serde(untagged)]
enum UrgencyRepr {
    Level(i32),
    Name(String),
}

impl TryFrom<UrgencyRepr> for Urgency {
    type Error = String;

    fn try_from(repr: UrgencyRepr) -> Result<Self, Self::Error> {
        match repr {
            UrgencyRepr::Level(level) => Ok(Urgency::from_level(level)),
            UrgencyRepr::Name(name) => {
                Urgency::parse(&name).ok_or_else(|| format!("unknown urgency: {}", name))
            }
        }
    }
}

/// Channel importance class on platforms with delivery channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Min,
    Low,
    Default,
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Min => "min",
            Importance::Low => "low",
            Importance::Default => "default",
            Importance::High => "high",
        }
    }
}

/// Per-notification priority on platforms without delivery channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyPriority {
    Min,
    Low,
    Default,
    High,
}

/// Map an urgency tier onto a channel importance class
pub fn importance_for(urgency: Urgency) -> Importance {
    match urgency {
        Urgency::Critical => Importance::High,
        Urgency::High => Importance::Default,
        Urgency::Normal => Importance::Low,
        Urgency::Low => Importance::Min,
    }
}

/// Map an urgency tier onto a legacy priority, same tiers as [`importance_for`]
pub fn legacy_priority_for(urgency: Urgency) -> LegacyPriority {
    match importance_for(urgency) {
        Importance::High => LegacyPriority::High,
        Importance::Default => LegacyPriority::Default,
        Importance::Low => LegacyPriority::Low,
        Importance::Min => LegacyPriority::Min,
    }
}
