//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware- und Netzwerk-Zugriff
//! ohne konkrete Implementierung.

use rgb::RGB8;

use crate::config::CHANNEL_COUNT;
use crate::types::{StateSnapshot, Topic};

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
}

/// Fehler-Typ für die NotificationSink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// Transport ist gerade nicht verbunden
    NotConnected,
    /// Ausgangs-Queue voll, Nachricht verworfen
    QueueFull,
    PayloadTooLarge,
    /// Verbindungsaufbau fehlgeschlagen
    ConnectFailed,
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf einen RGB-LED-Strip (WS2812/WS2815).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt den kompletten Pixel-Buffer auf den Strip
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError>;
}

/// Trait für den Message-Bus (MQTT in der Firmware)
///
/// Zustellung ist best-effort: der Core wiederholt fehlgeschlagene
/// Publishes nie.
pub trait NotificationSink {
    fn publish(&mut self, topic: Topic, payload: &[u8]) -> Result<(), SinkError>;

    fn is_connected(&self) -> bool;

    /// Ein einzelner, nicht blockierender Verbindungsversuch
    ///
    /// Die Rate-Limitierung übernimmt der Scheduler.
    fn reconnect(&mut self) -> Result<(), SinkError>;
}

/// Trait für Status-Anzeigen (WebSocket in der Firmware)
pub trait StateObserver {
    fn observe(&mut self, snapshot: &StateSnapshot);
}

/// Trait für die Roh-Eingänge
///
/// Liefert einmal pro Tick den Pegel jedes Kanals (`true` = HIGH).
pub trait RawInputSource {
    fn read(&mut self) -> [bool; CHANNEL_COUNT];
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedError::WriteFailed => defmt::write!(fmt, "LED write failed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SinkError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SinkError::NotConnected => defmt::write!(fmt, "not connected"),
            SinkError::QueueFull => defmt::write!(fmt, "queue full"),
            SinkError::PayloadTooLarge => defmt::write!(fmt, "payload too large"),
            SinkError::ConnectFailed => defmt::write!(fmt, "connect failed"),
        }
    }
}
