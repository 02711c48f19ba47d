// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use ball_core::{CHANNEL_COUNT, PanelConfig};

// ============================================================================
// Taster Konfiguration
// ============================================================================

/// GPIO-Nummern der sieben Taster (Reihenfolge = logischer Kanal)
/// - 0: Alarm
/// - 1..=5: Gruppe
/// - 6: Reset
///
/// Muss zur Verdrahtung in `bin/main.rs` passen.
pub const BUTTON_GPIOS: [u8; CHANNEL_COUNT] = [0, 1, 2, 3, 4, 5, 6];

/// Entprell-Fenster in Millisekunden
pub const DEBOUNCE_WINDOW_MS: u64 = 50;

/// Taster schalten gegen GND (interne Pull-Ups aktiv)
pub const BUTTONS_ACTIVE_LOW: bool = true;

/// Tick-Intervall des Panel-Tasks in Millisekunden
/// Deutlich kleiner als alle Effekt-Perioden (30 ms)
pub const PANEL_TICK_MS: u64 = 5;

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die Datenleitung des LED-Strips (WS2815)
pub const LED_GPIO_PIN: u8 = 8;

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 144;

/// Globale Helligkeit für den ganzen Strip (0-255)
/// Wird beim Schreiben auf jeden Pixel angewendet
pub const LED_BRIGHTNESS: u8 = 50;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

// ============================================================================
// Effekt Konfiguration
// ============================================================================

/// Umschalt-Intervall Rot/Gelb beim Alarm
pub const FLASH_PERIOD_MS: u64 = 500;

/// Intervall zwischen zwei Helligkeitsschritten beim Atmen
pub const BREATHE_TICK_MS: u64 = 30;

/// Helligkeitsschritt pro Atem-Tick
pub const BREATHE_STEP: u8 = 5;

/// Helligkeits-Obergrenze pro gedrücktem Gruppen-Taster (5 * 51 = 255)
pub const GROUP_BRIGHTNESS_STEP: u8 = 51;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach WiFi-Fehler vor erneutem Versuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// MQTT Konfiguration
// ============================================================================

/// MQTT Broker Hostname oder IP-Adresse
/// Wird zur Build-Zeit aus der Environment Variable MQTT_BROKER geladen
pub const MQTT_BROKER: &str = env!(
    "MQTT_BROKER",
    "MQTT Broker nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Broker Port
/// Standard: 1883 (unverschlüsselt), 8883 (TLS)
pub const MQTT_PORT: u16 = 1883;

/// MQTT Client ID
/// Wird zur Build-Zeit aus der Environment Variable MQTT_CLIENT_ID geladen
pub const MQTT_CLIENT_ID: &str = env!(
    "MQTT_CLIENT_ID",
    "MQTT Client ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Benutzername (leer = keine Authentifizierung)
pub const MQTT_USER: &str = match option_env!("MQTT_USER") {
    Some(user) => user,
    None => "",
};

/// MQTT Passwort (leer = kein Passwort)
pub const MQTT_PASSWORD: &str = match option_env!("MQTT_PASSWORD") {
    Some(password) => password,
    None => "",
};

/// Prefix für alle Topics, z.B. "ball" → "ball/triggered"
pub const MQTT_TOPIC_PREFIX: &str = match option_env!("MQTT_TOPIC_PREFIX") {
    Some(prefix) => prefix,
    None => "ball",
};

/// Maximale Länge eines vollständigen Topics (Prefix + "/" + Name)
pub const MQTT_TOPIC_CAPACITY: usize = 64;

/// Minimaler Abstand zwischen zwei Reconnect-Versuchen
/// Der Panel-Task fordert Reconnects nie öfter an
pub const MQTT_RECONNECT_INTERVAL_MS: u64 = 2000;

/// Timeout für einen einzelnen Verbindungsversuch (TCP + CONNECT)
pub const MQTT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// MQTT Keep-Alive in Sekunden
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// Kapazität der Queue Panel → MQTT
pub const MQTT_QUEUE_SIZE: usize = 4;

/// Maximale Payload-Größe pro Nachricht (der Core sendet nur leere Payloads)
pub const MQTT_PAYLOAD_CAPACITY: usize = 16;

/// MQTT Buffer-Größe in Bytes
/// Muss groß genug für MQTT-Pakete sein
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// Intervall zwischen zwei Status-Snapshots an die WebSocket-Clients
pub const SNAPSHOT_INTERVAL_MS: u64 = 100;

/// HTTP Buffer-Größe in Bytes
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// WebSocket Message Buffer-Größe in Bytes
/// Eingehende Nachrichten werden nur für Ping/Close ausgewertet
pub const WEBSOCKET_BUFFER_SIZE: usize = 256;

/// JSON Serialisierungs-Buffer für WebSocket Status-Updates
/// Für {"type":"status","channels":[...],"effect":"breathe","level":..,...}
pub const JSON_STATUS_BUFFER_SIZE: usize = 256;

/// Anzahl paralleler HTTP-Server-Tasks
pub const HTTP_TASK_COUNT: usize = 4;

// ============================================================================
// Core Konfiguration
// ============================================================================

/// Baut die `PanelConfig` für den Core aus den Konstanten oben
pub fn panel_config() -> PanelConfig {
    PanelConfig {
        debounce_window_ms: DEBOUNCE_WINDOW_MS,
        active_low: BUTTONS_ACTIVE_LOW,
        channel_gpios: BUTTON_GPIOS,
        flash_period_ms: FLASH_PERIOD_MS,
        breathe_tick_ms: BREATHE_TICK_MS,
        breathe_step: BREATHE_STEP,
        group_brightness_step: GROUP_BRIGHTNESS_STEP,
        reconnect_interval_ms: MQTT_RECONNECT_INTERVAL_MS,
        snapshot_interval_ms: SNAPSHOT_INTERVAL_MS,
        ..PanelConfig::default()
    }
}
