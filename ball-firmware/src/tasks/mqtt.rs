// MQTT Task - Published Panel-Benachrichtigungen an den MQTT Broker
use core::fmt::Write;
use core::sync::atomic::Ordering;

use defmt::{Debug2Format, error, info, warn};
use embassy_net::{IpAddress, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Timer, with_timeout};

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use crate::config::*;
use crate::{MQTT_CONNECTED, NotificationReceiver, OutboundMessage, ReconnectSignal, Topic};

/// MQTT Task - läuft parallel zu anderen Tasks
///
/// Dieser Task übernimmt das MQTT-Publishing:
/// - Wartet auf Netzwerk-Verbindung
/// - Verbindet sich mit MQTT Broker
/// - Empfängt Benachrichtigungen vom Panel Task via Channel
/// - Published sie sofort als leere Nachricht auf `<prefix>/<topic>`
/// - Nach einem Fehler: wartet auf die nächste Reconnect-Anforderung
///   vom Panel Task (rate-limitiert im Core)
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `receiver`: Channel Receiver für ausgehende Benachrichtigungen
/// - `reconnect`: Signal, mit dem der Panel Task Reconnects anfordert
#[embassy_executor::task]
pub async fn mqtt_task(
    stack: &'static Stack<'static>,
    receiver: NotificationReceiver,
    reconnect: &'static ReconnectSignal,
) {
    info!("MQTT: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("MQTT: Network ready");

    loop {
        match mqtt_connect_and_publish(stack, &receiver).await {
            Ok(_) => warn!("MQTT: Connection closed normally"),
            Err(e) => error!("MQTT: Error: {}", e),
        }
        MQTT_CONNECTED.store(false, Ordering::Relaxed);

        // Nachrichten aus der Zeit ohne Verbindung nicht nachträglich senden
        receiver.clear();

        info!("MQTT: Waiting for reconnect request...");
        wait_for_reconnect_request(reconnect).await;
        wait_for_network(stack).await;
    }
}

/// Wartet auf eine Reconnect-Anforderung, die nach dem letzten Fehlschlag kam
///
/// Der Panel Task fordert auch während eines laufenden Versuchs an (und beim
/// Boot vor dem ersten). Diese Anforderungen liegen gelatcht im Signal und
/// werden verworfen, damit zwei Versuche nie dichter als
/// MQTT_RECONNECT_INTERVAL_MS aufeinander folgen.
async fn wait_for_reconnect_request(reconnect: &ReconnectSignal) {
    reconnect.reset();
    reconnect.wait().await;
}

/// Wartet bis Netzwerk-Verbindung verfügbar ist
///
/// Prüft kontinuierlich Link-Status und DHCP-Konfiguration.
async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Verbindet mit MQTT Broker und published Benachrichtigungen
///
/// Diese Funktion übernimmt den kompletten MQTT-Lifecycle:
/// 1. DNS-Auflösung des Broker-Hostnames
/// 2. TCP-Verbindung aufbauen
/// 3. MQTT CONNECT senden (mit Timeout)
/// 4. Benachrichtigungen empfangen und sofort publishen,
///    dazwischen Keep-Alive Pings
///
/// Bei jedem Fehler wird die Funktion beendet und der Haupt-Loop
/// wartet auf die nächste Reconnect-Anforderung.
async fn mqtt_connect_and_publish(
    stack: &'static Stack<'static>,
    receiver: &NotificationReceiver,
) -> Result<(), MqttError> {
    // DNS Lookup
    info!("MQTT: Resolving '{}'...", MQTT_BROKER);
    let broker_ip = resolve_hostname(stack, MQTT_BROKER).await?;
    info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

    // TCP Connect
    let mut rx_buffer = [0u8; 4096];
    let mut tx_buffer = [0u8; 4096];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(MQTT_CONNECT_TIMEOUT_SECS)));

    with_timeout(
        Duration::from_secs(MQTT_CONNECT_TIMEOUT_SECS),
        socket.connect((broker_ip, MQTT_PORT)),
    )
    .await
    .map_err(|_| MqttError::Timeout)?
    .map_err(|_| MqttError::ConnectionFailed)?;
    info!("MQTT: TCP connected");

    // MQTT Client Configuration
    let rng = CountingRng(20000);
    let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, rng);
    config.client_id = EncodedString {
        string: MQTT_CLIENT_ID,
        len: MQTT_CLIENT_ID.len() as u16,
    };
    if !MQTT_USER.is_empty() {
        config.add_username(MQTT_USER);
    }
    if !MQTT_PASSWORD.is_empty() {
        config.add_password(MQTT_PASSWORD);
    }
    config.keep_alive = MQTT_KEEP_ALIVE_SECS;
    config.max_packet_size = MQTT_BUFFER_SIZE as u32;

    // MQTT Buffer
    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];

    // MQTT Client erstellen
    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        config,
    );

    // MQTT CONNECT
    with_timeout(
        Duration::from_secs(MQTT_CONNECT_TIMEOUT_SECS),
        client.connect_to_broker(),
    )
    .await
    .map_err(|_| MqttError::Timeout)?
    .map_err(|_| MqttError::ProtocolError)?;
    info!("MQTT: Connected to broker as '{}'", MQTT_CLIENT_ID);
    MQTT_CONNECTED.store(true, Ordering::Relaxed);

    // Publish Loop - Event-basiert
    // Wartet auf Benachrichtigungen, pingt nach halber Keep-Alive Zeit ohne Verkehr
    let ping_interval = Duration::from_secs(u64::from(MQTT_KEEP_ALIVE_SECS) / 2);
    loop {
        let msg = match with_timeout(ping_interval, receiver.receive()).await {
            Ok(msg) => msg,
            Err(_) => {
                client
                    .send_ping()
                    .await
                    .map_err(|_| MqttError::PingFailed)?;
                continue;
            }
        };

        let topic = full_topic(msg.topic)?;
        info!("MQTT: Publishing '{}'...", topic.as_str());

        client
            .send_message(
                topic.as_str(),
                payload_of(&msg),
                QualityOfService::QoS0,
                false,
            )
            .await
            .map_err(|_| MqttError::PublishFailed)?;

        info!("MQTT: Published '{}'", topic.as_str());
    }
}

/// Baut das vollständige Topic, z.B. "ball/triggered"
fn full_topic(topic: Topic) -> Result<heapless::String<MQTT_TOPIC_CAPACITY>, MqttError> {
    let mut full = heapless::String::new();
    write!(full, "{}/{}", MQTT_TOPIC_PREFIX, topic.as_str()).map_err(|_| MqttError::TopicTooLong)?;
    Ok(full)
}

fn payload_of(msg: &OutboundMessage) -> &[u8] {
    msg.payload.as_slice()
}

/// Löst Hostname zu IPv4-Adresse auf
///
/// Nutzt embassy-net DNS-Stack mit konfigurierbarem Timeout.
async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<embassy_net::Ipv4Address, MqttError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(MqttError::DnsResolutionFailed),
        Ok(Err(_)) => Err(MqttError::DnsResolutionFailed),
        Err(_) => Err(MqttError::DnsTimeout),
    }
}

/// MQTT Fehler-Typen
///
/// Alle möglichen Fehler die während MQTT-Operationen auftreten können.
#[derive(Debug)]
enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    Timeout,
    ProtocolError,
    PublishFailed,
    PingFailed,
    TopicTooLong,
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::Timeout => defmt::write!(fmt, "Connect timeout"),
            MqttError::ProtocolError => defmt::write!(fmt, "Protocol error"),
            MqttError::PublishFailed => defmt::write!(fmt, "Publish failed"),
            MqttError::PingFailed => defmt::write!(fmt, "Ping failed"),
            MqttError::TopicTooLong => defmt::write!(fmt, "Topic too long"),
        }
    }
}
