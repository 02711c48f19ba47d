// Brücke zwischen Core-Traits und Embassy-Channels
//
// Der Core ruft NotificationSink/StateObserver synchron auf.
// Hier wird daraus ein nicht-blockierendes try_send bzw. publish_immediate,
// die eigentliche Netzwerk-Arbeit machen MQTT- und HTTP-Task.

use core::sync::atomic::Ordering;

use ball_core::{NotificationSink, SinkError, StateObserver, StateSnapshot, Topic};

use crate::{
    MQTT_CONNECTED, NotificationSender, OutboundMessage, ReconnectSignal, SnapshotPublisher,
};

/// NotificationSink für den MQTT Task
///
/// - `publish()`: Nachricht in die Queue, nie blockierend
/// - `reconnect()`: weckt den MQTT Task für einen Verbindungsversuch
pub struct MqttSink {
    sender: NotificationSender,
    reconnect: &'static ReconnectSignal,
}

impl MqttSink {
    pub fn new(sender: NotificationSender, reconnect: &'static ReconnectSignal) -> Self {
        Self { sender, reconnect }
    }
}

impl NotificationSink for MqttSink {
    fn publish(&mut self, topic: Topic, payload: &[u8]) -> Result<(), SinkError> {
        if !self.is_connected() {
            return Err(SinkError::NotConnected);
        }

        let payload = heapless::Vec::from_slice(payload).map_err(|_| SinkError::PayloadTooLarge)?;
        self.sender
            .try_send(OutboundMessage { topic, payload })
            .map_err(|_| SinkError::QueueFull)
    }

    fn is_connected(&self) -> bool {
        MQTT_CONNECTED.load(Ordering::Relaxed)
    }

    fn reconnect(&mut self) -> Result<(), SinkError> {
        self.reconnect.signal(());
        Ok(())
    }
}

/// StateObserver für die WebSocket-Clients
pub struct SnapshotObserver {
    publisher: SnapshotPublisher,
}

impl SnapshotObserver {
    pub fn new(publisher: SnapshotPublisher) -> Self {
        Self { publisher }
    }
}

impl StateObserver for SnapshotObserver {
    fn observe(&mut self, snapshot: &StateSnapshot) {
        // Broadcast an alle Subscribers, ältester Snapshot fällt raus
        self.publisher.publish_immediate(*snapshot);
    }
}
