// HTTP Server Task - Serviert Status-Seite und WebSocket
use core::future::pending;
use core::sync::atomic::Ordering;

use defmt::{info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_time::Duration;
use picoserve::{io::embedded_io_async, response::IntoResponse, response::ws, routing::get};

use crate::config::*;
use crate::web::{INDEX_HTML, protocol::WsServerMessage};
use crate::{SnapshotChannel, SnapshotSubscriber, StateSnapshot, WIFI_CONNECTED};

/// Response-Enum für WebSocket-Endpoint
/// Entweder WebSocket-Upgrade oder HTTP 503 (alle Subscriber-Slots belegt)
enum WebSocketResponse {
    Upgrade(
        ws::UpgradedWebSocket<ws::UnspecifiedProtocol, ws::CallbackNotUsingState<WebSocketHandler>>,
    ),
    ServiceUnavailable,
}

impl IntoResponse for WebSocketResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            WebSocketResponse::Upgrade(ws) => ws.write_to(connection, response_writer).await,
            WebSocketResponse::ServiceUnavailable => {
                picoserve::response::Response::new(
                    picoserve::response::StatusCode::new(503),
                    "Service Unavailable: Too many WebSocket connections (max 10)",
                )
                .with_header("Retry-After", "5")
                .write_to(connection, response_writer)
                .await
            }
        }
    }
}

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// - GET `/`: Status-Seite (index.html)
/// - GET `/ws`: WebSocket, sendet jeden Panel-Snapshot als JSON
///
/// Das Panel lässt sich hier nur beobachten, eingehende Textnachrichten
/// werden ignoriert.
///
/// **Task Pool:** 4 Instanzen (= HTTP_TASK_COUNT) für parallele Verbindungen
/// (Seite laden während ein WebSocket offen ist).
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `snapshots`: PubSub Channel, jeder WebSocket erhält einen eigenen Subscriber
#[embassy_executor::task(pool_size = 4)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    snapshots: &'static SnapshotChannel,
) {
    info!("HTTP: Server task {} starting on port 80...", task_id);

    let app = picoserve::Router::new().route("/", get(serve_html)).route(
        "/ws",
        get(
            move |upgrade: picoserve::response::WebSocketUpgrade| async move {
                // Max. 10 Subscriber (PubSubChannel<..., 2, 10, 1>)
                // Statt Panic bekommt der Client HTTP 503
                match snapshots.subscriber() {
                    Ok(subscriber) => {
                        info!("HTTP: WebSocket upgrade accepted");
                        WebSocketResponse::Upgrade(
                            upgrade.on_upgrade(WebSocketHandler { subscriber }),
                        )
                    }
                    Err(_) => {
                        warn!("HTTP: No subscriber slots available, sending HTTP 503");
                        WebSocketResponse::ServiceUnavailable
                    }
                }
            },
        ),
    );

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    server
        .listen_and_serve(task_id, *stack, 80, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

/// Serviert die HTML-Statusseite
async fn serve_html() -> impl IntoResponse {
    picoserve::response::Response::new(picoserve::response::StatusCode::OK, INDEX_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// WebSocket-Handler: ein Snapshot-Subscriber pro Verbindung
struct WebSocketHandler {
    subscriber: SnapshotSubscriber,
}

impl ws::WebSocketCallback for WebSocketHandler {
    async fn run<R: embedded_io_async::Read, W: embedded_io_async::Write<Error = R::Error>>(
        mut self,
        mut rx: ws::SocketRx<R>,
        mut tx: ws::SocketTx<W>,
    ) -> Result<(), W::Error> {
        info!("HTTP: WebSocket connection established");

        let mut buffer = [0u8; WEBSOCKET_BUFFER_SIZE];

        // Letzten bekannten Zustand sofort senden, falls vorhanden
        if let Some(snapshot) = self.subscriber.try_next_message_pure() {
            send_status(&mut tx, &snapshot).await?;
        }

        let close_reason = loop {
            // Gleichzeitig auf Browser-Nachrichten und Panel-Snapshots warten
            match select(
                rx.next_message(&mut buffer, pending()),
                self.subscriber.next_message_pure(),
            )
            .await
            {
                Either::First(ws_result) => match ws_result?.ignore_never_b() {
                    Ok(ws::Message::Text(data)) => {
                        info!("HTTP: Ignoring text message ({} bytes)", data.len());
                    }
                    Ok(ws::Message::Binary(data)) => {
                        info!("HTTP: Ignoring binary message ({} bytes)", data.len());
                    }
                    Ok(ws::Message::Ping(data)) => {
                        tx.send_pong(data).await?;
                    }
                    Ok(ws::Message::Pong(_)) => {}
                    Ok(ws::Message::Close(_)) => {
                        info!("HTTP: WebSocket close received");
                        break None;
                    }
                    Err(error) => {
                        warn!("HTTP: WebSocket error");
                        break Some((error.code(), "WebSocket Error"));
                    }
                },
                Either::Second(snapshot) => {
                    send_status(&mut tx, &snapshot).await?;
                }
            }
        };

        info!("HTTP: WebSocket connection closed");
        tx.close(close_reason).await
    }
}

/// Serialisiert einen Snapshot als Status-JSON und sendet ihn
async fn send_status<W: embedded_io_async::Write>(
    tx: &mut ws::SocketTx<W>,
    snapshot: &StateSnapshot,
) -> Result<(), W::Error> {
    let status = WsServerMessage::status(snapshot, WIFI_CONNECTED.load(Ordering::Relaxed));

    let mut json_buffer = [0u8; JSON_STATUS_BUFFER_SIZE];
    match serde_json_core::to_slice(&status, &mut json_buffer) {
        Ok(n) => match core::str::from_utf8(&json_buffer[..n]) {
            Ok(json) => tx.send_text(json).await,
            Err(_) => Ok(()),
        },
        Err(_) => {
            warn!("HTTP: Status JSON exceeds {} bytes", JSON_STATUS_BUFFER_SIZE);
            Ok(())
        }
    }
}
