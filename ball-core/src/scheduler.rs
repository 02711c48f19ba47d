//! Kooperativer Tick: Entprellen → Arbitrieren → Rendern → Benachrichtigen
//!
//! Ein Aufruf von `tick()` ist ein Schleifendurchlauf. Die Zeit kommt als
//! Parameter vom Treiber (Embassy-Ticker in der Firmware, synthetische
//! Zeitstempel in Tests). Kein Schritt blockiert.

use rgb::RGB8;

use crate::arbiter::{EdgeMemory, ModeArbiter, Notifications};
use crate::config::{CHANNEL_COUNT, ConfigError, PanelConfig};
use crate::debounce::{InputDebouncer, StableTransition};
use crate::effect::{EffectMode, EffectRenderer};
use crate::traits::{
    LedError, NotificationSink, RawInputSource, SinkError, SmartLedWriter, StateObserver,
};
use crate::types::{ActiveCondition, StateSnapshot};

/// Gesamter veränderlicher Zustand des Panels
///
/// Gehört exklusiv dem Scheduler, keine globalen Variablen.
#[derive(Debug, Clone)]
pub struct ControllerState<const LEDS: usize> {
    debouncer: InputDebouncer,
    memory: EdgeMemory,
    renderer: EffectRenderer,
    mode: EffectMode,
    pixels: [RGB8; LEDS],
    last_reconnect_ms: Option<u64>,
    last_snapshot_ms: Option<u64>,
}

impl<const LEDS: usize> ControllerState<LEDS> {
    fn new(config: &PanelConfig) -> Self {
        Self {
            debouncer: InputDebouncer::new(config),
            memory: EdgeMemory::default(),
            renderer: EffectRenderer::new(),
            mode: EffectMode::Off,
            pixels: [RGB8::default(); LEDS],
            last_reconnect_ms: None,
            last_snapshot_ms: None,
        }
    }

    pub fn debouncer(&self) -> &InputDebouncer {
        &self.debouncer
    }

    pub fn memory(&self) -> &EdgeMemory {
        &self.memory
    }

    pub fn renderer(&self) -> &EffectRenderer {
        &self.renderer
    }

    pub fn mode(&self) -> &EffectMode {
        &self.mode
    }

    pub fn pixels(&self) -> &[RGB8; LEDS] {
        &self.pixels
    }
}

/// Was in einem Tick passiert ist - die Firmware loggt daraus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub transitions: [Option<StableTransition>; CHANNEL_COUNT],
    pub condition: ActiveCondition,
    /// Steigende Flanke des Alarm-Tasters
    pub alert_started: bool,
    pub mode_changed: bool,
    pub frame_written: bool,
    pub led_error: Option<LedError>,
    pub published: Notifications,
    /// Verworfene Benachrichtigungen (werden nie wiederholt)
    pub dropped: Notifications,
    pub last_publish_error: Option<SinkError>,
    /// `Some` wenn in diesem Tick ein Reconnect versucht wurde
    pub reconnect: Option<Result<(), SinkError>>,
    pub snapshot_sent: bool,
}

/// Der Scheduler besitzt Zustand und alle externen Kollaborateure
///
/// # Trait-basierte Abstraktion
/// - `L`: LED-Strip (RmtLedWriter oder Mock)
/// - `S`: Message-Bus (MQTT oder Mock)
/// - `O`: Status-Anzeige (WebSocket oder Mock)
/// - `LEDS`: Anzahl der Pixel im Strip
pub struct Scheduler<L, S, O, const LEDS: usize> {
    config: PanelConfig,
    arbiter: ModeArbiter,
    state: ControllerState<LEDS>,
    led: L,
    sink: S,
    observer: O,
}

impl<L, S, O, const LEDS: usize> Scheduler<L, S, O, LEDS>
where
    L: SmartLedWriter,
    S: NotificationSink,
    O: StateObserver,
{
    /// Erstellt den Scheduler und validiert die Konfiguration
    ///
    /// Ein `ConfigError` ist beim Start fatal.
    pub fn new(config: PanelConfig, led: L, sink: S, observer: O) -> Result<Self, ConfigError> {
        config.validate(LEDS)?;
        Ok(Self {
            arbiter: ModeArbiter::new(&config),
            state: ControllerState::new(&config),
            config,
            led,
            sink,
            observer,
        })
    }

    /// Liest die Eingänge und führt einen Tick aus
    pub fn poll<I: RawInputSource>(&mut self, input: &mut I, now_ms: u64) -> TickReport {
        let raw = input.read();
        self.tick(now_ms, &raw)
    }

    /// Ein Schleifendurchlauf
    ///
    /// Effekt und Benachrichtigungen dieses Ticks basieren ausschließlich
    /// auf dem Snapshot dieses Ticks.
    pub fn tick(&mut self, now_ms: u64, raw: &[bool; CHANNEL_COUNT]) -> TickReport {
        // 1. Entprellen
        let transitions = self.state.debouncer.sample_all(raw, now_ms);
        let pressed = self.state.debouncer.pressed_states();

        // 2. Arbitrieren
        let outcome = self.arbiter.arbitrate(&pressed, &self.state.memory);
        let alert_started = outcome.memory.alert && !self.state.memory.alert;
        let mode_changed = !self.state.mode.same_effect(&outcome.mode);
        self.state.memory = outcome.memory;
        self.state.mode = outcome.mode;

        // 3. Rendern - Strip nur schreiben wenn ein Frame fertig ist
        let mut frame_written = false;
        let mut led_error = None;
        if let Some(frame) = self.state.renderer.tick(&self.state.mode, now_ms) {
            frame.fill(&mut self.state.pixels);
            match self.led.write(&self.state.pixels) {
                Ok(()) => frame_written = true,
                Err(e) => led_error = Some(e),
            }
        }

        // 4. Benachrichtigen (at-most-once)
        let mut published = Notifications::new();
        let mut dropped = Notifications::new();
        let mut last_publish_error = None;
        for topic in outcome.notifications {
            let target = match self.sink.publish(topic, &[]) {
                Ok(()) => &mut published,
                Err(e) => {
                    last_publish_error = Some(e);
                    &mut dropped
                }
            };
            // Gleiche Kapazität wie outcome.notifications
            let _ = target.push(topic);
        }

        // 5. Rate-limitierter Reconnect
        let reconnect = if self.sink.is_connected() {
            None
        } else if due(self.state.last_reconnect_ms, self.config.reconnect_interval_ms, now_ms) {
            self.state.last_reconnect_ms = Some(now_ms);
            Some(self.sink.reconnect())
        } else {
            None
        };

        // 6. Status-Snapshot
        let snapshot_sent = due(
            self.state.last_snapshot_ms,
            self.config.snapshot_interval_ms,
            now_ms,
        );
        if snapshot_sent {
            self.state.last_snapshot_ms = Some(now_ms);
            let snapshot = self.snapshot(now_ms);
            self.observer.observe(&snapshot);
        }

        TickReport {
            transitions,
            condition: outcome.condition,
            alert_started,
            mode_changed,
            frame_written,
            led_error,
            published,
            dropped,
            last_publish_error,
            reconnect,
            snapshot_sent,
        }
    }

    /// Aktueller Status für die Anzeige
    pub fn snapshot(&self, now_ms: u64) -> StateSnapshot {
        StateSnapshot {
            pressed: self.state.debouncer.pressed_states(),
            effect: self.state.mode.kind(),
            level: self.state.renderer.state().level(),
            sink_connected: self.sink.is_connected(),
            uptime_ms: now_ms,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn state(&self) -> &ControllerState<LEDS> {
        &self.state
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn led_mut(&mut self) -> &mut L {
        &mut self.led
    }

    /// Gibt die Kollaborateure zurück
    pub fn into_parts(self) -> (L, S, O) {
        (self.led, self.sink, self.observer)
    }
}

/// Ist seit `last` mindestens `interval` vergangen? Der erste Aufruf ist immer fällig.
fn due(last: Option<u64>, interval_ms: u64, now_ms: u64) -> bool {
    match last {
        Some(last) => now_ms.saturating_sub(last) >= interval_ms,
        None => true,
    }
}
