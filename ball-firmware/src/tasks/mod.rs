// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über Embassy Channels (Panel → MQTT, Panel → HTTP).

pub mod http;
pub mod mqtt;
pub mod panel;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use http::http_server_task;
pub use mqtt::mqtt_task;
pub use panel::panel_task;
pub use wifi::{connection_task, dhcp_task, net_task};
