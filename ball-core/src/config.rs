//! Konfiguration des Panels
//!
//! Alle Zeit-, Farb- und Helligkeitsparameter des Cores als ein
//! einziges `PanelConfig`-Struct. Die Firmware überschreibt nur, was sich
//! vom Default unterscheidet.

use rgb::RGB8;

/// Anzahl der physischen Eingänge
pub const CHANNEL_COUNT: usize = 7;

/// Alarm-Taster (höchste Priorität)
pub const ALERT_CHANNEL: usize = 0;

/// Reset-Taster
pub const RESET_CHANNEL: usize = 6;

/// Die fünf Gruppen-Taster (Spielfortschritt)
pub const GROUP_CHANNELS: core::ops::RangeInclusive<usize> = 1..=5;

/// Anzahl der Gruppen-Taster
pub const GROUP_SIZE: usize = 5;

/// Farbpalette für die drei Effekte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub red: RGB8,
    pub green: RGB8,
    pub yellow: RGB8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            red: RGB8 { r: 255, g: 0, b: 0 },
            green: RGB8 { r: 0, g: 255, b: 0 },
            yellow: RGB8 { r: 255, g: 255, b: 0 },
        }
    }
}

/// Laufzeit-Parameter des Cores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    /// Mindestdauer, die ein Rohsignal stabil sein muss (ms)
    pub debounce_window_ms: u64,
    /// `true`: gedrückt = LOW (Pull-Up Beschaltung)
    pub active_low: bool,
    /// GPIO-Kennung pro Kanal, nur für Anzeige und Logs
    pub channel_gpios: [u8; CHANNEL_COUNT],
    /// Umschalt-Periode des Flash-Effekts (ms)
    pub flash_period_ms: u64,
    /// Intervall zwischen zwei Helligkeitsschritten beim Atmen (ms)
    pub breathe_tick_ms: u64,
    /// Helligkeitsschritt pro Breathe-Tick
    pub breathe_step: u8,
    /// Untere Grenze der Atem-Rampe
    pub breathe_min_level: u8,
    /// Helligkeits-Obergrenze pro gedrücktem Gruppen-Taster
    pub group_brightness_step: u8,
    /// Minimaler Abstand zwischen zwei Reconnect-Versuchen (ms)
    pub reconnect_interval_ms: u64,
    /// Minimaler Abstand zwischen zwei Status-Snapshots (ms)
    pub snapshot_interval_ms: u64,
    pub palette: Palette,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: 50,
            active_low: true,
            channel_gpios: [13, 12, 14, 27, 26, 25, 32],
            flash_period_ms: 500,
            breathe_tick_ms: 30,
            breathe_step: 5,
            breathe_min_level: 0,
            group_brightness_step: 51,
            reconnect_interval_ms: 2000,
            snapshot_interval_ms: 100,
            palette: Palette::default(),
        }
    }
}

/// Konfigurationsfehler - beim Start fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStrip,
    ZeroFlashPeriod,
    ZeroBreatheTick,
    ZeroBreatheStep,
    /// `5 * group_brightness_step` passt nicht in u8
    GroupCeilingOverflow,
    /// `breathe_min_level` muss unter der Obergrenze bei einem Taster liegen
    MinLevelAboveGroupStep,
}

impl PanelConfig {
    /// Prüft die Konfiguration einmalig beim Start
    ///
    /// Zur Laufzeit wird nichts davon erneut geprüft.
    pub fn validate(&self, pixel_count: usize) -> Result<(), ConfigError> {
        if pixel_count == 0 {
            return Err(ConfigError::EmptyStrip);
        }
        if self.flash_period_ms == 0 {
            return Err(ConfigError::ZeroFlashPeriod);
        }
        if self.breathe_tick_ms == 0 {
            return Err(ConfigError::ZeroBreatheTick);
        }
        if self.breathe_step == 0 {
            return Err(ConfigError::ZeroBreatheStep);
        }
        if self.group_brightness_step.checked_mul(GROUP_SIZE as u8).is_none() {
            return Err(ConfigError::GroupCeilingOverflow);
        }
        if self.breathe_min_level >= self.group_brightness_step {
            return Err(ConfigError::MinLevelAboveGroupStep);
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConfigError::EmptyStrip => defmt::write!(fmt, "LED strip has no pixels"),
            ConfigError::ZeroFlashPeriod => defmt::write!(fmt, "flash period is zero"),
            ConfigError::ZeroBreatheTick => defmt::write!(fmt, "breathe tick is zero"),
            ConfigError::ZeroBreatheStep => defmt::write!(fmt, "breathe step is zero"),
            ConfigError::GroupCeilingOverflow => {
                defmt::write!(fmt, "group brightness step overflows 255")
            }
            ConfigError::MinLevelAboveGroupStep => {
                defmt::write!(fmt, "breathe min level >= group brightness step")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(PanelConfig::default().validate(144), Ok(()));
    }

    #[test]
    fn test_empty_strip_rejected() {
        assert_eq!(
            PanelConfig::default().validate(0),
            Err(ConfigError::EmptyStrip)
        );
    }

    #[test]
    fn test_group_step_overflow_rejected() {
        let config = PanelConfig {
            group_brightness_step: 52,
            ..PanelConfig::default()
        };
        assert_eq!(config.validate(1), Err(ConfigError::GroupCeilingOverflow));
    }

    #[test]
    fn test_zero_timings_rejected() {
        let config = PanelConfig {
            breathe_tick_ms: 0,
            ..PanelConfig::default()
        };
        assert_eq!(config.validate(1), Err(ConfigError::ZeroBreatheTick));

        let config = PanelConfig {
            flash_period_ms: 0,
            ..PanelConfig::default()
        };
        assert_eq!(config.validate(1), Err(ConfigError::ZeroFlashPeriod));
    }

    #[test]
    fn test_min_level_must_stay_below_first_ceiling() {
        let config = PanelConfig {
            breathe_min_level: 51,
            ..PanelConfig::default()
        };
        assert_eq!(config.validate(1), Err(ConfigError::MinLevelAboveGroupStep));
    }
}
