//! Entprellung der sieben Eingänge
//!
//! Zeitbasiert: ein Rohsignal muss mindestens `debounce_window_ms` konstant
//! anliegen, bevor der stabile Zustand übernommen wird. Jeder Rohwechsel
//! startet das Fenster neu.

use crate::config::{CHANNEL_COUNT, PanelConfig};

/// Stabile Flanke eines Kanals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StableTransition {
    Pressed,
    Released,
}

/// Ein physischer Eingang
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    index: usize,
    gpio: u8,
    /// Letzter Rohpegel (`true` = HIGH)
    raw: bool,
    /// Entprellter Pegel
    stable: bool,
    last_change_ms: u64,
    changed: bool,
}

impl Channel {
    const fn idle(index: usize, gpio: u8, idle_level: bool) -> Self {
        Self {
            index,
            gpio,
            raw: idle_level,
            stable: idle_level,
            last_change_ms: 0,
            changed: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn gpio(&self) -> u8 {
        self.gpio
    }

    pub fn raw_level(&self) -> bool {
        self.raw
    }

    pub fn stable_level(&self) -> bool {
        self.stable
    }

    pub fn last_change_ms(&self) -> u64 {
        self.last_change_ms
    }

    /// Hat der stabile Zustand im letzten `sample()` gewechselt?
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// Zeitbasierter Debouncer für alle Kanäle
#[derive(Debug, Clone)]
pub struct InputDebouncer {
    channels: [Channel; CHANNEL_COUNT],
    window_ms: u64,
    /// Pegel, der "gedrückt" bedeutet
    active_level: bool,
}

impl InputDebouncer {
    /// Alle Kanäle starten im Ruhezustand (nicht gedrückt)
    pub fn new(config: &PanelConfig) -> Self {
        let active_level = !config.active_low;
        let idle_level = !active_level;
        Self {
            channels: core::array::from_fn(|i| {
                Channel::idle(i, config.channel_gpios[i], idle_level)
            }),
            window_ms: config.debounce_window_ms,
            active_level,
        }
    }

    /// Verarbeitet einen Rohwert für einen Kanal
    ///
    /// Gibt höchstens eine Flanke zurück. Innerhalb des Entprell-Fensters
    /// wird nie eine Flanke gemeldet, auch wenn das Signal schon ruhig ist.
    ///
    /// # Panics
    /// Bei `index >= CHANNEL_COUNT` (Programmierfehler)
    pub fn sample(&mut self, index: usize, raw: bool, now_ms: u64) -> Option<StableTransition> {
        let window_ms = self.window_ms;
        let active_level = self.active_level;
        let channel = &mut self.channels[index];

        channel.changed = false;

        if raw != channel.raw {
            channel.raw = raw;
            channel.last_change_ms = now_ms;
        }

        let held_ms = now_ms.saturating_sub(channel.last_change_ms);
        if held_ms >= window_ms && channel.stable != raw {
            channel.stable = raw;
            channel.changed = true;
            return Some(if raw == active_level {
                StableTransition::Pressed
            } else {
                StableTransition::Released
            });
        }

        None
    }

    /// Verarbeitet die Rohwerte aller Kanäle eines Ticks
    pub fn sample_all(
        &mut self,
        raw: &[bool; CHANNEL_COUNT],
        now_ms: u64,
    ) -> [Option<StableTransition>; CHANNEL_COUNT] {
        core::array::from_fn(|i| self.sample(i, raw[i], now_ms))
    }

    pub fn is_pressed(&self, index: usize) -> bool {
        self.channels[index].stable == self.active_level
    }

    /// Entprellter Zustand aller Kanäle (`true` = gedrückt)
    pub fn pressed_states(&self) -> [bool; CHANNEL_COUNT] {
        core::array::from_fn(|i| self.is_pressed(i))
    }

    pub fn channel(&self, index: usize) -> &Channel {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Channel; CHANNEL_COUNT] {
        &self.channels
    }
}
