// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod bridge;
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

// Re-exports von ball-core
pub use ball_core::{
    NotificationSink, PanelConfig, RawInputSource, Scheduler, SmartLedWriter, StateObserver,
    StateSnapshot, Topic,
};

use core::sync::atomic::AtomicBool;

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};
use embassy_sync::signal::Signal;

use crate::config::{MQTT_PAYLOAD_CAPACITY, MQTT_QUEUE_SIZE};

// ============================================================================
// Verbindungsstatus (von Netzwerk-Tasks geschrieben, vom Panel gelesen)
// ============================================================================

/// MQTT-Session steht (CONNECT bestätigt)
pub static MQTT_CONNECTED: AtomicBool = AtomicBool::new(false);

/// WiFi verbunden und IP-Adresse vorhanden
pub static WIFI_CONNECTED: AtomicBool = AtomicBool::new(false);

/// Ausgehende Benachrichtigung (Panel → MQTT Task)
#[derive(Clone)]
pub struct OutboundMessage {
    pub topic: Topic,
    pub payload: heapless::Vec<u8, MQTT_PAYLOAD_CAPACITY>,
}

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Publisher<'static, NoopRawMutex, StateSnapshot, 2, 10, 1>
// Nutze:  SnapshotPublisher

/// PubSubChannel für Status-Snapshots
/// - 2: Nachrichten-Kapazität im Queue
/// - 10: Maximale Anzahl Subscribers (WebSocket-Clients)
/// - 1: Publisher (Panel Task)
pub type SnapshotChannel = PubSubChannel<NoopRawMutex, StateSnapshot, 2, 10, 1>;

/// Publisher für Status-Snapshots (Panel Task)
pub type SnapshotPublisher = Publisher<'static, NoopRawMutex, StateSnapshot, 2, 10, 1>;

/// Subscriber für Status-Snapshots (WebSocket-Handler)
pub type SnapshotSubscriber = Subscriber<'static, NoopRawMutex, StateSnapshot, 2, 10, 1>;

/// Channel für Benachrichtigungen (Panel Task → MQTT Task)
pub type NotificationChannel =
    embassy_sync::channel::Channel<NoopRawMutex, OutboundMessage, MQTT_QUEUE_SIZE>;

/// Sender für Benachrichtigungen (Panel Task)
pub type NotificationSender = Sender<'static, NoopRawMutex, OutboundMessage, MQTT_QUEUE_SIZE>;

/// Receiver für Benachrichtigungen (MQTT Task)
pub type NotificationReceiver = Receiver<'static, NoopRawMutex, OutboundMessage, MQTT_QUEUE_SIZE>;

/// Reconnect-Anforderung (Panel Task → MQTT Task)
/// Der Panel-Task signalisiert höchstens alle MQTT_RECONNECT_INTERVAL_MS
pub type ReconnectSignal = Signal<NoopRawMutex, ()>;
