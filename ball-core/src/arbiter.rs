//! Prioritäts-Arbiter: Eingänge → Effekt + Benachrichtigungen
//!
//! Strikte Reihenfolge, der erste Treffer gewinnt:
//!
//! 1. Alarm (Kanal 0) → Rot/Gelb Flash
//! 2. Reset (Kanal 6) → Rot atmen, `reset` bei steigender Flanke
//! 3. Gruppe (Kanal 1-5) → Grün atmen mit `k * 51` Obergrenze,
//!    `triggered` wenn alle fünf neu gedrückt sind
//! 4. Nichts gedrückt → Rot atmen
//!
//! Unabhängig davon: `first-triggered` genau einmal seit dem Boot.
//!
//! Die Flanken-Erinnerung eines Zustands ist nur gesetzt, solange sein Zweig
//! ausgewertet wird und die Bedingung wahr ist. Jeder Tick, in dem ein
//! höherer Zweig gewinnt, löscht sie wieder.

use heapless::Vec;

use crate::config::{
    ALERT_CHANNEL, CHANNEL_COUNT, GROUP_CHANNELS, GROUP_SIZE, PanelConfig, Palette, RESET_CHANNEL,
};
use crate::effect::EffectMode;
use crate::logic::{brightness_ceiling, count_pressed};
use crate::types::{ActiveCondition, Topic};

/// Maximal mögliche Benachrichtigungen pro Tick
pub const MAX_NOTIFICATIONS: usize = 3;

/// Benachrichtigungen eines Ticks, in Auslöse-Reihenfolge
pub type Notifications = Vec<Topic, MAX_NOTIFICATIONS>;

/// War die jeweilige Bedingung im vorherigen Tick bereits wahr?
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeMemory {
    pub alert: bool,
    pub reset: bool,
    pub all_group: bool,
    /// Latch: wird nach dem ersten Setzen nie wieder gelöscht
    pub first_triggered: bool,
}

/// Ergebnis eines Arbitrierungs-Durchlaufs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbiterOutcome {
    pub mode: EffectMode,
    pub condition: ActiveCondition,
    pub notifications: Notifications,
    /// Flanken-Erinnerung für den nächsten Tick
    pub memory: EdgeMemory,
}

/// Wandelt den entprellten Zustand in Effekt und Benachrichtigungen um
#[derive(Debug, Clone, Copy)]
pub struct ModeArbiter {
    palette: Palette,
    flash_period_ms: u64,
    breathe_tick_ms: u64,
    breathe_step: u8,
    breathe_min_level: u8,
    group_brightness_step: u8,
}

impl ModeArbiter {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            palette: config.palette,
            flash_period_ms: config.flash_period_ms,
            breathe_tick_ms: config.breathe_tick_ms,
            breathe_step: config.breathe_step,
            breathe_min_level: config.breathe_min_level,
            group_brightness_step: config.group_brightness_step,
        }
    }

    /// Ein Arbitrierungs-Durchlauf über den Snapshot dieses Ticks
    ///
    /// Reine Funktion: kann nicht fehlschlagen und verändert nichts.
    pub fn arbitrate(&self, pressed: &[bool; CHANNEL_COUNT], memory: &EdgeMemory) -> ArbiterOutcome {
        let alert = pressed[ALERT_CHANNEL];
        let reset = pressed[RESET_CHANNEL];
        let group_count = count_pressed(&pressed[GROUP_CHANNELS]);

        let mut notifications = Notifications::new();
        let mut next = EdgeMemory {
            alert,
            reset: false,
            all_group: false,
            first_triggered: memory.first_triggered,
        };

        let (mode, condition) = if alert {
            (self.flash(), ActiveCondition::Alert)
        } else if reset {
            if !memory.reset {
                push(&mut notifications, Topic::Reset);
            }
            next.reset = true;
            (self.breathe(self.palette.red, u8::MAX), ActiveCondition::Reset)
        } else if group_count > 0 {
            let all_group = group_count == GROUP_SIZE;
            if all_group && !memory.all_group {
                push(&mut notifications, Topic::Triggered);
            }
            next.all_group = all_group;
            let ceiling = brightness_ceiling(group_count, self.group_brightness_step);
            (
                self.breathe(self.palette.green, ceiling),
                ActiveCondition::Group(group_count as u8),
            )
        } else {
            (self.breathe(self.palette.red, u8::MAX), ActiveCondition::Idle)
        };

        if !memory.first_triggered && (reset || group_count > 0) {
            push(&mut notifications, Topic::FirstTriggered);
            next.first_triggered = true;
        }

        ArbiterOutcome {
            mode,
            condition,
            notifications,
            memory: next,
        }
    }

    fn flash(&self) -> EffectMode {
        EffectMode::FlashAlternate {
            color_a: self.palette.red,
            color_b: self.palette.yellow,
            period_ms: self.flash_period_ms,
        }
    }

    fn breathe(&self, base_color: rgb::RGB8, max_level: u8) -> EffectMode {
        EffectMode::Breathe {
            base_color,
            min_level: self.breathe_min_level,
            max_level,
            step: self.breathe_step,
            tick_ms: self.breathe_tick_ms,
        }
    }
}

fn push(notifications: &mut Notifications, topic: Topic) {
    // Kapazität reicht für alle Topics eines Ticks
    let _ = notifications.push(topic);
}
