// WiFi Task - Verbindet mit WLAN und meldet den Verbindungsstatus
use core::sync::atomic::Ordering;

use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};

use crate::WIFI_CONNECTED;
use crate::config::{WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS, WIFI_SSID};

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Konfiguriert den Station-Mode und startet den Controller
/// - Verbindet mit dem Access Point
/// - Wartet auf Disconnect und verbindet neu
///
/// `WIFI_CONNECTED` wird erst vom DHCP-Task gesetzt (IP vorhanden),
/// hier nur beim Verbindungsverlust zurückgesetzt.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                retry_delay().await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                retry_delay().await;
                continue;
            }

            info!("WiFi: Started in station mode");
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        if let Err(e) = controller.connect_async().await {
            error!("WiFi: Connection failed: {}", Debug2Format(&e));
            retry_delay().await;
            continue;
        }
        info!("WiFi: Associated with '{}'", WIFI_SSID);

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        WIFI_CONNECTED.store(false, Ordering::Relaxed);
        warn!("WiFi: Disconnected from AP, will retry...");

        retry_delay().await;
    }
}

async fn retry_delay() {
    Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
}

/// Network Task
///
/// Treibt den embassy-net Stack (Pakete empfangen und senden).
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Überwacht Link und IP-Konfiguration und hält `WIFI_CONNECTED`
/// aktuell. Loggt die Netzwerk-Konfiguration bei jeder neuen Adresse.
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) -> ! {
    loop {
        stack.wait_config_up().await;

        if let Some(config) = stack.config_v4() {
            info!("WiFi: Got IP address!");
            info!("  IP:      {}", Debug2Format(&config.address.address()));
            info!("  Gateway: {}", Debug2Format(&config.gateway));
            info!("  DNS:     {}", Debug2Format(&config.dns_servers));
        }
        WIFI_CONNECTED.store(true, Ordering::Relaxed);

        stack.wait_config_down().await;
        WIFI_CONNECTED.store(false, Ordering::Relaxed);
        warn!("WiFi: Lost IP configuration");
    }
}
