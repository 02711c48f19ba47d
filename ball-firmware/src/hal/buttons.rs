// Taster-Eingänge (GPIO mit internem Pull-Up)
//
// Implementiert den RawInputSource Trait aus ball-core.
// Liefert nur Rohpegel - Entprellung passiert im Core.

use ball_core::{CHANNEL_COUNT, RawInputSource};
use esp_hal::gpio::{Input, InputConfig, InputPin, Pull};

/// Die sieben Taster des Panels
///
/// Index = logischer Kanal (0 Alarm, 1..=5 Gruppe, 6 Reset).
pub struct GpioInputs<'d> {
    pins: [Input<'d>; CHANNEL_COUNT],
}

impl<'d> GpioInputs<'d> {
    /// Erstellt die Eingänge aus bereits konfigurierten Pins
    pub fn new(pins: [Input<'d>; CHANNEL_COUNT]) -> Self {
        Self { pins }
    }

    /// Konfiguriert einen Pin als Eingang mit Pull-Up
    ///
    /// Taster schalten gegen GND: gedrückt = LOW
    pub fn pull_up(pin: impl InputPin + 'd) -> Input<'d> {
        Input::new(pin, InputConfig::default().with_pull(Pull::Up))
    }
}

impl<'d> RawInputSource for GpioInputs<'d> {
    fn read(&mut self) -> [bool; CHANNEL_COUNT] {
        self.pins.each_ref().map(|pin| pin.is_high())
    }
}
