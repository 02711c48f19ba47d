//! Integration Tests für die Panel-Logik
//!
//! Diese Tests laufen auf dem Host (x86_64) und treiben den Scheduler mit
//! synthetischen Zeitstempeln und Mock-Kollaborateuren.

use ball_core::{
    ActiveCondition, ConfigError, EffectKind, EffectMode, LedError, NotificationSink, PanelConfig,
    RampDirection, RawInputSource, Scheduler, SinkError, SmartLedWriter, StableTransition,
    StateObserver, StateSnapshot, TickReport, Topic, CHANNEL_COUNT,
};
use rgb::RGB8;

const HIGH: bool = true;
const LOW: bool = false;
const TICK_MS: usize = 10;

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_frame: Option<Vec<RGB8>>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_frame = Some(pixels.to_vec());
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Notification Sink
// ============================================================================

#[derive(Default)]
pub struct MockSink {
    pub connected: bool,
    pub reconnect_succeeds: bool,
    pub published: Vec<Topic>,
    pub publish_attempts: usize,
    pub reconnect_attempts: usize,
}

impl MockSink {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn count(&self, topic: Topic) -> usize {
        self.published.iter().filter(|t| **t == topic).count()
    }
}

impl NotificationSink for MockSink {
    fn publish(&mut self, topic: Topic, payload: &[u8]) -> Result<(), SinkError> {
        self.publish_attempts += 1;
        assert!(payload.is_empty(), "edge signals carry no payload");
        if !self.connected {
            return Err(SinkError::NotConnected);
        }
        self.published.push(topic);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reconnect(&mut self) -> Result<(), SinkError> {
        self.reconnect_attempts += 1;
        if self.reconnect_succeeds {
            self.connected = true;
            Ok(())
        } else {
            Err(SinkError::ConnectFailed)
        }
    }
}

// ============================================================================
// Mock State Observer / Input Source
// ============================================================================

#[derive(Default)]
pub struct MockObserver {
    pub snapshots: Vec<StateSnapshot>,
}

impl StateObserver for MockObserver {
    fn observe(&mut self, snapshot: &StateSnapshot) {
        self.snapshots.push(*snapshot);
    }
}

pub struct MockInputs {
    pub levels: [bool; CHANNEL_COUNT],
    pub reads: usize,
}

impl RawInputSource for MockInputs {
    fn read(&mut self) -> [bool; CHANNEL_COUNT] {
        self.reads += 1;
        self.levels
    }
}

// ============================================================================
// Helpers
// ============================================================================

type Panel = Scheduler<MockLedWriter, MockSink, MockObserver, 8>;

fn panel_with(sink: MockSink) -> Panel {
    Scheduler::new(
        PanelConfig::default(),
        MockLedWriter::default(),
        sink,
        MockObserver::default(),
    )
    .unwrap()
}

fn panel() -> Panel {
    panel_with(MockSink::connected())
}

/// Rohpegel mit den angegebenen Kanälen gedrückt (active-low)
fn raw(pressed: &[usize]) -> [bool; CHANNEL_COUNT] {
    let mut levels = [HIGH; CHANNEL_COUNT];
    for &c in pressed {
        levels[c] = LOW;
    }
    levels
}

/// Tickt alle 10 ms im Bereich `[from, to)` mit konstanten Rohpegeln
fn hold(panel: &mut Panel, levels: [bool; CHANNEL_COUNT], from: u64, to: u64) -> Vec<TickReport> {
    (from..to)
        .step_by(TICK_MS)
        .map(|t| panel.tick(t, &levels))
        .collect()
}

fn breathe_params(mode: &EffectMode) -> (RGB8, u8) {
    match mode {
        EffectMode::Breathe {
            base_color,
            max_level,
            ..
        } => (*base_color, *max_level),
        other => panic!("Expected Breathe, got {:?}", other),
    }
}

const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };

// ============================================================================
// Tests: Szenarien
// ============================================================================

#[test]
fn test_idle_breathes_red_without_notifications() {
    let mut p = panel();
    let reports = hold(&mut p, raw(&[]), 0, 500);

    assert_eq!(breathe_params(p.state().mode()), (RED, 255));
    assert!(reports.iter().all(|r| r.condition == ActiveCondition::Idle));
    assert!(p.sink().published.is_empty());
    assert_eq!(p.sink().publish_attempts, 0);
}

#[test]
fn test_first_tick_writes_initial_frame() {
    let mut p = panel();
    let report = p.tick(0, &raw(&[]));

    assert!(report.mode_changed);
    assert!(report.frame_written);
    assert_eq!(p.led().write_count, 1);
    assert_eq!(p.led().last_frame, Some(vec![RGB8::default(); 8]));
}

#[test]
fn test_alert_switches_to_flash() {
    let mut p = panel();
    let reports = hold(&mut p, raw(&[0]), 0, 100);

    // Entprellt nach 50 ms
    assert_eq!(reports[4].condition, ActiveCondition::Idle);
    assert_eq!(reports[5].condition, ActiveCondition::Alert);
    assert_eq!(reports[5].transitions[0], Some(StableTransition::Pressed));
    assert!(reports[5].alert_started);
    assert!(reports[5].mode_changed);
    assert_eq!(p.state().mode().kind(), EffectKind::FlashAlternate);
    assert_eq!(p.led().last_frame.as_ref().unwrap()[0], RED);
    assert_eq!(p.state().pixels(), &[RED; 8]);
}

#[test]
fn test_all_five_held_emits_single_triggered() {
    let mut p = panel();
    hold(&mut p, raw(&[1, 2, 3, 4, 5]), 0, 3000);

    assert_eq!(p.sink().count(Topic::Triggered), 1);
    assert_eq!(breathe_params(p.state().mode()), (GREEN, 255));
}

#[test]
fn test_fifth_channel_completes_group() {
    let mut p = panel();
    hold(&mut p, raw(&[1, 2, 3, 4]), 0, 200);
    assert_eq!(breathe_params(p.state().mode()), (GREEN, 204));
    assert_eq!(p.sink().count(Topic::Triggered), 0);

    let reports = hold(&mut p, raw(&[1, 2, 3, 4, 5]), 200, 600);
    let triggered_at: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.published.contains(&Topic::Triggered))
        .map(|(i, _)| i)
        .collect();

    // Kanal 5 wechselt bei 200 ms, stabil bei 250 ms
    assert_eq!(triggered_at, vec![5]);
    assert_eq!(p.sink().count(Topic::Triggered), 1);
    assert_eq!(breathe_params(p.state().mode()), (GREEN, 255));
}

#[test]
fn test_alert_outranks_all_five() {
    let mut p = panel();
    let reports = hold(&mut p, raw(&[0, 1, 2, 3, 4, 5]), 0, 1000);

    assert!(reports[5..].iter().all(|r| r.condition == ActiveCondition::Alert));
    assert_eq!(p.state().mode().kind(), EffectKind::FlashAlternate);
    assert_eq!(p.sink().count(Topic::Triggered), 0);
}

#[test]
fn test_triggered_fires_again_after_alert_released() {
    let mut p = panel();
    hold(&mut p, raw(&[1, 2, 3, 4, 5]), 0, 500);
    hold(&mut p, raw(&[0, 1, 2, 3, 4, 5]), 500, 1000);
    hold(&mut p, raw(&[1, 2, 3, 4, 5]), 1000, 1500);

    assert_eq!(p.sink().count(Topic::Triggered), 2);
}

#[test]
fn test_triggered_fires_again_after_reset_press() {
    let mut p = panel();
    hold(&mut p, raw(&[1, 2, 3, 4, 5]), 0, 500);
    let reports = hold(&mut p, raw(&[1, 2, 3, 4, 5, 6]), 500, 1000);
    assert!(reports[5..].iter().all(|r| r.condition == ActiveCondition::Reset));
    hold(&mut p, raw(&[1, 2, 3, 4, 5]), 1000, 1500);

    assert_eq!(p.sink().count(Topic::Reset), 1);
    assert_eq!(p.sink().count(Topic::Triggered), 2);
}

#[test]
fn test_group_brightness_ceiling_per_count() {
    let channels = [1, 2, 3, 4, 5];
    let ceilings: Vec<u8> = (1..=5)
        .map(|k| {
            let mut p = panel();
            hold(&mut p, raw(&channels[..k]), 0, 100);
            breathe_params(p.state().mode()).1
        })
        .collect();

    assert_eq!(ceilings, vec![51, 102, 153, 204, 255]);
}

#[test]
fn test_reset_edge_while_idle() {
    let mut p = panel();
    hold(&mut p, raw(&[]), 0, 200);
    let mode_before = *p.state().mode();

    let reports = hold(&mut p, raw(&[6]), 200, 1200);

    assert_eq!(*p.state().mode(), mode_before);
    assert!(reports.iter().all(|r| !r.mode_changed));
    assert_eq!(reports[5].condition, ActiveCondition::Reset);
    assert_eq!(p.sink().count(Topic::Reset), 1);
}

#[test]
fn test_reset_fires_once_per_press() {
    let mut p = panel();
    hold(&mut p, raw(&[6]), 0, 500);
    hold(&mut p, raw(&[]), 500, 800);
    hold(&mut p, raw(&[6]), 800, 1300);

    assert_eq!(p.sink().count(Topic::Reset), 2);
}

#[test]
fn test_first_triggered_latch() {
    let mut p = panel();
    hold(&mut p, raw(&[2]), 0, 300);
    hold(&mut p, raw(&[]), 300, 600);
    hold(&mut p, raw(&[2]), 600, 900);
    hold(&mut p, raw(&[6]), 900, 1200);

    assert_eq!(p.sink().count(Topic::FirstTriggered), 1);
    assert!(p.state().memory().first_triggered);
}

#[test]
fn test_noise_faster_than_window_is_ignored() {
    let mut p = panel();
    let mut levels = raw(&[]);
    for t in (0..2000).step_by(TICK_MS) {
        levels[1] = (t / 20) % 2 == 0;
        let report = p.tick(t as u64, &levels);
        assert_eq!(report.transitions[1], None);
        assert_eq!(report.condition, ActiveCondition::Idle);
    }
    assert!(p.sink().published.is_empty());
}

// ============================================================================
// Tests: Renderer im Scheduler
// ============================================================================

#[test]
fn test_flash_writes_once_per_period() {
    let mut p = panel();
    let reports = hold(&mut p, raw(&[0]), 0, 2000);

    // Flash aktiv ab 50 ms, Wechsel bei 550, 1050 und 1550 ms
    let writes = reports[6..].iter().filter(|r| r.frame_written).count();
    assert_eq!(writes, 3);
}

#[test]
fn test_mode_switch_resets_breathing_phase() {
    let mut p = panel();
    hold(&mut p, raw(&[]), 0, 1000);
    assert!(p.state().renderer().state().level() > 0);

    hold(&mut p, raw(&[0]), 1000, 1500);
    let reports = hold(&mut p, raw(&[]), 1500, 1560);

    let last = reports.last().unwrap();
    assert!(last.mode_changed);
    assert_eq!(last.condition, ActiveCondition::Idle);
    assert_eq!(p.state().renderer().state().level(), 0);
    assert_eq!(
        p.state().renderer().state().direction(),
        RampDirection::Ascending
    );
}

#[test]
fn test_led_write_failure_is_not_fatal() {
    let mut p = panel();
    p.led_mut().fail_next_write = true;

    let first = p.tick(0, &raw(&[]));
    assert_eq!(first.led_error, Some(LedError::WriteFailed));
    assert!(!first.frame_written);

    let next = p.tick(30, &raw(&[]));
    assert_eq!(next.led_error, None);
    assert!(next.frame_written);
    assert_eq!(p.led().write_count, 1);
}

// ============================================================================
// Tests: Sink und Observer
// ============================================================================

#[test]
fn test_failed_publish_is_dropped_not_retried() {
    let mut p = panel_with(MockSink::default());
    let reports = hold(&mut p, raw(&[1, 2, 3, 4, 5]), 0, 1000);

    assert_eq!(
        reports[5].dropped.as_slice(),
        &[Topic::Triggered, Topic::FirstTriggered]
    );
    assert_eq!(reports[5].last_publish_error, Some(SinkError::NotConnected));
    assert_eq!(p.sink().publish_attempts, 2);

    p.sink_mut().connected = true;
    hold(&mut p, raw(&[1, 2, 3, 4, 5]), 1000, 2000);
    assert_eq!(p.sink().publish_attempts, 2);
    assert!(p.sink().published.is_empty());
}

#[test]
fn test_reconnect_is_rate_limited() {
    let mut p = panel_with(MockSink::default());
    let reports = hold(&mut p, raw(&[]), 0, 5000);

    let attempts: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.reconnect.is_some())
        .map(|(i, _)| i * TICK_MS)
        .collect();
    assert_eq!(attempts, vec![0, 2000, 4000]);
    assert_eq!(p.sink().reconnect_attempts, 3);
    assert_eq!(reports[0].reconnect, Some(Err(SinkError::ConnectFailed)));
}

#[test]
fn test_no_reconnect_while_connected() {
    let mut p = panel_with(MockSink {
        reconnect_succeeds: true,
        ..MockSink::default()
    });
    let reports = hold(&mut p, raw(&[]), 0, 5000);

    assert_eq!(reports[0].reconnect, Some(Ok(())));
    assert_eq!(p.sink().reconnect_attempts, 1);
    assert!(p.sink().is_connected());
}

#[test]
fn test_snapshots_are_throttled() {
    let mut p = panel();
    hold(&mut p, raw(&[]), 0, 1000);

    let times: Vec<u64> = p.observer().snapshots.iter().map(|s| s.uptime_ms).collect();
    assert_eq!(times, (0..1000).step_by(100).collect::<Vec<u64>>());
}

#[test]
fn test_snapshot_reports_pressed_channels_and_effect() {
    let mut p = panel();
    hold(&mut p, raw(&[0, 6]), 0, 200);

    let last = p.observer().snapshots.last().unwrap();
    assert_eq!(last.pressed, [true, false, false, false, false, false, true]);
    assert_eq!(last.effect, EffectKind::FlashAlternate);
    assert!(last.sink_connected);

    let first = p.observer().snapshots.first().unwrap();
    assert_eq!(first.pressed, [false; CHANNEL_COUNT]);
}

#[test]
fn test_poll_reads_input_source_once_per_tick() {
    let mut p = panel();
    let mut inputs = MockInputs {
        levels: raw(&[3]),
        reads: 0,
    };
    for t in (0..100).step_by(TICK_MS) {
        p.poll(&mut inputs, t as u64);
    }

    assert_eq!(inputs.reads, 10);
    assert_eq!(breathe_params(p.state().mode()), (GREEN, 51));
}

#[test]
fn test_into_parts_returns_collaborators() {
    let mut p = panel();
    hold(&mut p, raw(&[1, 2, 3, 4, 5]), 0, 500);

    let (led, sink, observer) = p.into_parts();
    assert!(led.write_count > 0);
    assert_eq!(sink.count(Topic::Triggered), 1);
    assert_eq!(observer.snapshots.len(), 5);
}

// ============================================================================
// Tests: Konfiguration
// ============================================================================

#[test]
fn test_empty_strip_is_rejected() {
    let result = Scheduler::<_, _, _, 0>::new(
        PanelConfig::default(),
        MockLedWriter::default(),
        MockSink::default(),
        MockObserver::default(),
    );
    assert_eq!(result.err(), Some(ConfigError::EmptyStrip));
}

#[test]
fn test_custom_timings_are_used() {
    let config = PanelConfig {
        flash_period_ms: 200,
        debounce_window_ms: 20,
        ..PanelConfig::default()
    };
    let mut p: Panel = Scheduler::new(
        config,
        MockLedWriter::default(),
        MockSink::connected(),
        MockObserver::default(),
    )
    .unwrap();

    let reports = hold(&mut p, raw(&[0]), 0, 1000);
    assert_eq!(reports[2].condition, ActiveCondition::Alert);
    // Flash ab 20 ms, Wechsel bei 220, 420, 620 und 820 ms
    let writes = reports[3..].iter().filter(|r| r.frame_written).count();
    assert_eq!(writes, 4);
}
