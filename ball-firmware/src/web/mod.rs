// Web-Modul für HTTP Server und WebSocket
// Status-Seite (nur lesend) plus JSON-Protokoll

pub mod protocol;

// HTML-Datei zur Compile-Zeit einbinden
// Die Datei wird direkt ins Binary eingebettet
pub const INDEX_HTML: &str = include_str!("index.html");
