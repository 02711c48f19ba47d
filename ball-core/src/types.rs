//! Core Types für das Ball-Panel
//!
//! Datenstrukturen ohne Hardware-Dependencies

use crate::config::CHANNEL_COUNT;

/// Benachrichtigungs-Topics, die der Core auslöst
///
/// Alle Topics sind reine Flanken-Signale mit leerem Payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Topic {
    /// Alle fünf Gruppen-Taster gleichzeitig gedrückt (steigende Flanke)
    #[cfg_attr(feature = "serde", serde(rename = "triggered"))]
    Triggered,
    /// Reset-Taster gedrückt (steigende Flanke)
    #[cfg_attr(feature = "serde", serde(rename = "reset"))]
    Reset,
    /// Erste Gruppen- oder Reset-Aktivität seit dem Boot (einmalig)
    #[cfg_attr(feature = "serde", serde(rename = "first-triggered"))]
    FirstTriggered,
}

impl Topic {
    /// Topic-Name ohne Prefix (z.B. "triggered")
    pub const fn as_str(self) -> &'static str {
        match self {
            Topic::Triggered => "triggered",
            Topic::Reset => "reset",
            Topic::FirstTriggered => "first-triggered",
        }
    }
}

/// Welcher Arbiter-Zweig in diesem Tick gewonnen hat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveCondition {
    Alert,
    Reset,
    /// Anzahl gedrückter Gruppen-Taster (1..=5)
    Group(u8),
    Idle,
}

/// Effekt-Identität ohne Parameter (für Anzeige und Logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectKind {
    Off,
    FlashAlternate,
    Breathe,
}

impl EffectKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EffectKind::Off => "off",
            EffectKind::FlashAlternate => "flash_alternate",
            EffectKind::Breathe => "breathe",
        }
    }
}

/// Status-Snapshot für den StateObserver
///
/// Nur für die Anzeige, nie für Steuerungsentscheidungen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Entprellter Zustand pro Kanal (`true` = gedrückt)
    pub pressed: [bool; CHANNEL_COUNT],
    pub effect: EffectKind,
    /// Aktuelle Helligkeitsstufe der Atem-Rampe
    pub level: u8,
    /// Verbindungsstatus der NotificationSink
    pub sink_connected: bool,
    pub uptime_ms: u64,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Topic {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EffectKind {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ActiveCondition {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ActiveCondition::Alert => defmt::write!(fmt, "Alert"),
            ActiveCondition::Reset => defmt::write!(fmt, "Reset"),
            ActiveCondition::Group(k) => defmt::write!(fmt, "Group({}/5)", k),
            ActiveCondition::Idle => defmt::write!(fmt, "Idle"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateSnapshot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StateSnapshot {{ pressed: {}, effect: {}, level: {}, connected: {} }}",
            self.pressed,
            self.effect,
            self.level,
            self.sink_connected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names() {
        assert_eq!(Topic::Triggered.as_str(), "triggered");
        assert_eq!(Topic::Reset.as_str(), "reset");
        assert_eq!(Topic::FirstTriggered.as_str(), "first-triggered");
    }

    #[test]
    fn test_effect_kind_names() {
        assert_eq!(EffectKind::Off.as_str(), "off");
        assert_eq!(EffectKind::FlashAlternate.as_str(), "flash_alternate");
        assert_eq!(EffectKind::Breathe.as_str(), "breathe");
    }
}
