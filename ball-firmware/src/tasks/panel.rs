// Panel Task - Taster lesen, Effekt rendern, Benachrichtigungen auslösen
use ball_core::{
    ActiveCondition, RawInputSource, Scheduler, SmartLedWriter, StableTransition, TickReport,
};
use defmt::{error, info, warn};
use embassy_time::{Duration, Instant, Ticker};
use esp_hal::gpio::AnyPin;
use esp_hal_smartled::smart_led_buffer;

use crate::bridge::{MqttSink, SnapshotObserver};
use crate::config::{LED_BRIGHTNESS, LED_COUNT, PANEL_TICK_MS, RMT_CLOCK_MHZ, panel_config};
use crate::hal::{GpioInputs, RmtLedWriter};

/// Scheduler-Typ der Firmware (MQTT + WebSocket als Kollaborateure)
pub type PanelScheduler<L> = Scheduler<L, MqttSink, SnapshotObserver, LED_COUNT>;

/// Panel Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// Treibt den Core-Scheduler im festen Takt:
/// - Liest die Rohpegel aller Taster
/// - Ein `tick()` pro Durchlauf mit `Instant::now()` als Zeitbasis
/// - Loggt, was der Tick gemeldet hat
///
/// Der Ticker ist der einzige Await-Punkt, `tick()` selbst blockiert nie.
///
/// # Parameter
/// - `scheduler`: Core-Scheduler mit LED Writer, MQTT Sink und Observer
/// - `inputs`: Quelle der Rohpegel (GPIO oder Mock)
pub async fn panel_logic<L: SmartLedWriter, I: RawInputSource>(
    mut scheduler: PanelScheduler<L>,
    mut inputs: I,
) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(PANEL_TICK_MS));

    loop {
        let now_ms = Instant::now().as_millis();
        let report = scheduler.poll(&mut inputs, now_ms);
        log_report(&report);

        ticker.next().await;
    }
}

/// Loggt die interessanten Ereignisse eines Ticks
fn log_report(report: &TickReport) {
    for (channel, transition) in report.transitions.iter().enumerate() {
        match transition {
            Some(StableTransition::Pressed) => info!("Panel: Channel {} pressed", channel),
            Some(StableTransition::Released) => info!("Panel: Channel {} released", channel),
            None => {}
        }
    }

    if report.alert_started {
        warn!("Panel: Alert active, overriding game state");
    }

    if report.mode_changed {
        info!("Panel: Effect changed ({})", report.condition);
    } else if report.transitions.iter().any(Option::is_some) {
        if let ActiveCondition::Group(k) = report.condition {
            info!("Panel: Group progress {}/5", k);
        }
    }

    if report.led_error.is_some() {
        error!("Panel: Failed to write to LED strip");
    }

    for topic in &report.published {
        info!("Panel: Queued notification '{}'", topic);
    }

    if !report.dropped.is_empty() {
        match report.last_publish_error {
            Some(e) => warn!(
                "Panel: Dropped {} notification(s): {}",
                report.dropped.len(),
                e
            ),
            None => warn!("Panel: Dropped {} notification(s)", report.dropped.len()),
        }
    }

    if let Some(Err(e)) = report.reconnect {
        warn!("Panel: Reconnect request failed: {}", e);
    } else if report.reconnect.is_some() {
        info!("Panel: MQTT disconnected, reconnect requested");
    }
}

/// Panel Task - Embassy Task für parallele Ausführung
///
/// Dieser Task übernimmt die Hardware-Initialisierung des Strips und ruft
/// dann die testbare `panel_logic()` Funktion auf.
///
/// # Parameter
/// - `led_pin`: GPIO für die Datenleitung des Strips
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `inputs`: die sieben Taster
/// - `sink`: MQTT Sink (Queue + Reconnect-Signal)
/// - `observer`: Snapshot Publisher für die WebSocket-Clients
#[embassy_executor::task]
pub async fn panel_task(
    led_pin: AnyPin<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    inputs: GpioInputs<'static>,
    sink: MqttSink,
    observer: SnapshotObserver,
) {
    // Buffer für SmartLED Daten erstellen (ganzer Strip)
    // Macro allokiert Speicher im richtigen Format für RMT
    let mut rmt_buffer = smart_led_buffer!(LED_COUNT);

    // Hardware initialisieren: RmtLedWriter kapselt RMT + SmartLED
    let led = RmtLedWriter::new(
        led_pin,
        rmt_peripheral,
        RMT_CLOCK_MHZ,
        LED_BRIGHTNESS,
        &mut rmt_buffer,
    );

    let scheduler = match PanelScheduler::new(panel_config(), led, sink, observer) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            // Konfigurationsfehler sind beim Start fatal
            error!("Panel: Invalid configuration: {}", e);
            panic!("invalid panel configuration");
        }
    };

    info!("Panel: Started with {} LEDs", LED_COUNT);

    // Business Logic aufrufen (testbar!)
    panel_logic(scheduler, inputs).await
}
