// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use ball_firmware::bridge::{MqttSink, SnapshotObserver};
use ball_firmware::config::{EXTRA_HEAP_SIZE, HTTP_TASK_COUNT, WIFI_HEAP_SIZE};
use ball_firmware::hal::GpioInputs;
use ball_firmware::tasks::{
    connection_task, dhcp_task, http_server_task, mqtt_task, net_task, panel_task,
};
use ball_firmware::{NotificationChannel, ReconnectSignal, SnapshotChannel};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi, startet Embassy Runtime und spawnt Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net
    // 12 Sockets: MQTT (1) + HTTP-Tasks (4) + DHCP/DNS + Reserve
    static RESOURCES: static_cell::StaticCell<StackResources<12>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // Snapshot-Channel erstellen (Panel → WebSocket-Clients)
    // PubSubChannel für Broadcast: alle Subscribers bekommen jeden Snapshot
    // Params: <Mutex, Message, Capacity, MaxSubscribers, MaxPublishers>
    static SNAPSHOT_CHANNEL: static_cell::StaticCell<SnapshotChannel> =
        static_cell::StaticCell::new();
    let snapshot_channel = &*SNAPSHOT_CHANNEL.init(SnapshotChannel::new());
    let observer = SnapshotObserver::new(snapshot_channel.publisher().unwrap());

    // Benachrichtigungs-Channel (Panel → MQTT) und Reconnect-Signal
    static NOTIFICATION_CHANNEL: static_cell::StaticCell<NotificationChannel> =
        static_cell::StaticCell::new();
    let notification_channel = &*NOTIFICATION_CHANNEL.init(NotificationChannel::new());

    static RECONNECT_SIGNAL: static_cell::StaticCell<ReconnectSignal> =
        static_cell::StaticCell::new();
    let reconnect_signal = &*RECONNECT_SIGNAL.init(ReconnectSignal::new());

    let sink = MqttSink::new(notification_channel.sender(), reconnect_signal);

    // Taster: Kanal 0 Alarm, 1..=5 Gruppe, 6 Reset (siehe config::BUTTON_GPIOS)
    let inputs = GpioInputs::new([
        GpioInputs::pull_up(peripherals.GPIO0),
        GpioInputs::pull_up(peripherals.GPIO1),
        GpioInputs::pull_up(peripherals.GPIO2),
        GpioInputs::pull_up(peripherals.GPIO3),
        GpioInputs::pull_up(peripherals.GPIO4),
        GpioInputs::pull_up(peripherals.GPIO5),
        GpioInputs::pull_up(peripherals.GPIO6),
    ]);

    // Spawn Panel Task (Taster, Effekte, Benachrichtigungen)
    spawner
        .spawn(panel_task(
            peripherals.GPIO8.into(),
            peripherals.RMT,
            inputs,
            sink,
            observer,
        ))
        .unwrap();

    // Spawn WiFi Tasks
    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // Spawn MQTT Task (leert die Benachrichtigungs-Queue)
    spawner
        .spawn(mqtt_task(
            stack,
            notification_channel.receiver(),
            reconnect_signal,
        ))
        .unwrap();

    // Spawn HTTP Server Tasks für concurrent connections
    // Jede bekommt Referenz zum Snapshot-Channel um Subscribers zu erstellen
    for task_id in 0..HTTP_TASK_COUNT {
        spawner
            .spawn(http_server_task(task_id, stack, snapshot_channel))
            .unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
