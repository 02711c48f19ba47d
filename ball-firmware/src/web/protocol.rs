// WebSocket-Protokoll-Definitionen
// Das Panel ist nur beobachtbar: Server → Client Status, keine Kommandos

use ball_core::{CHANNEL_COUNT, EffectKind, StateSnapshot};
use serde::Serialize;

/// Server → Client Nachrichten
///
/// Beispiel:
/// `{"type":"status","channels":[false,true,...],"effect":"breathe","level":120,"mqtt":true,"wifi":true,"uptime_ms":1234}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum WsServerMessage {
    #[serde(rename = "status")]
    Status {
        /// Entprellter Zustand pro Kanal (0 = Alarm, 1..=5 Gruppe, 6 = Reset)
        channels: [bool; CHANNEL_COUNT],
        effect: EffectKind,
        level: u8,
        mqtt: bool,
        wifi: bool,
        uptime_ms: u64,
    },
}

impl WsServerMessage {
    /// Status-Nachricht aus einem Core-Snapshot plus WiFi-Status
    pub fn status(snapshot: &StateSnapshot, wifi: bool) -> Self {
        WsServerMessage::Status {
            channels: snapshot.pressed,
            effect: snapshot.effect,
            level: snapshot.level,
            mqtt: snapshot.sink_connected,
            wifi,
            uptime_ms: snapshot.uptime_ms,
        }
    }
}
