//! Live server fixture
//!
//! Serves the full router on a loopback port over the in-memory store and
//! connects real WebSocket clients to it.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use xfchat::backend::auth::create_token;
use xfchat::backend::server::create_app_with_store;
use xfchat::backend::store::MemoryChatStore;
use xfchat::shared::messaging::UserSnapshot;
use xfchat::shared::{ChatConfig, ClientEvent, ServerEvent};

use super::fixtures::memory_store;

pub const TEST_SECRET: &str = "xfchat-test-secret";

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Running server bound to 127.0.0.1 on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<MemoryChatStore>,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(users: &[UserSnapshot]) -> Self {
        let store = memory_store(users).await;
        let config = ChatConfig::builder()
            .jwt_secret(TEST_SECRET)
            .build()
            .expect("test config");
        let app = create_app_with_store(store.clone(), config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, store, task }
    }

    pub fn token_for(&self, user: &UserSnapshot) -> String {
        create_token(TEST_SECRET, user.id, Some(user.role), chrono::Duration::hours(1))
            .expect("Failed to sign test token")
    }

    pub fn socket_url(&self, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("ws://{}/messages?token={}", self.addr, token),
            None => format!("ws://{}/messages", self.addr),
        }
    }

    /// Connect as `user` and wait until the server reports them online
    pub async fn connect(&self, user: &UserSnapshot) -> TestClient {
        let url = self.socket_url(Some(&self.token_for(user)));
        let (socket, _) = connect_async(url).await.expect("WebSocket handshake failed");
        let mut client = TestClient { socket };
        let user_id = user.id;
        client
            .wait_for(|event| matches!(event, ServerEvent::OnlineUsers(ids) if ids.contains(&user_id)))
            .await;
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// WebSocket client speaking the JSON event protocol
pub struct TestClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn send(&mut self, event: &ClientEvent) {
        let text = serde_json::to_string(event).expect("encode client event");
        self.socket
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.socket
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next event from the server; panics on timeout or close
    pub async fn next_event(&mut self) -> ServerEvent {
        loop {
            let frame = timeout(EVENT_TIMEOUT, self.socket.next())
                .await
                .expect("Timed out waiting for an event")
                .expect("Socket closed")
                .expect("Socket error");
            match frame {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).expect("decode server event");
                }
                Message::Close(frame) => panic!("Server closed the socket: {:?}", frame),
                _ => continue,
            }
        }
    }

    /// Skip events until one satisfies `predicate`
    pub async fn wait_for<F>(&mut self, predicate: F) -> ServerEvent
    where
        F: Fn(&ServerEvent) -> bool,
    {
        loop {
            let event = self.next_event().await;
            if predicate(&event) {
                return event;
            }
        }
    }

    /// Wait for the server to close the socket, skipping remaining events
    pub async fn wait_closed(&mut self) {
        loop {
            let frame = timeout(EVENT_TIMEOUT, self.socket.next())
                .await
                .expect("Timed out waiting for close");
            match frame {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(_)) => continue,
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}
