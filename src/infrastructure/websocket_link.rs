// WebSocket implementation of the telemetry link
use crate::application::telemetry_link::{LinkError, LinkSession, TelemetryLink};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

#[derive(Debug, Clone)]
pub struct WebSocketLink {
    url: String,
}

impl WebSocketLink {
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

#[async_trait]
impl TelemetryLink for WebSocketLink {
    async fn open(&self) -> Result<Box<dyn LinkSession>, LinkError> {
        tracing::debug!("Connecting to {}", self.url);
        let (stream, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| LinkError::Open(format!("{}: {}", self.url, e)))?;

        Ok(Box::new(WebSocketSession { stream }))
    }
}

struct WebSocketSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl LinkSession for WebSocketSession {
    async fn recv(&mut self) -> Option<Result<String, LinkError>> {
        while let Some(item) = self.stream.next().await {
            match item {
                Ok(message) => match read_frame(message) {
                    Frame::Payload(payload) => return Some(Ok(payload)),
                    Frame::Closed => return None,
                    Frame::Skip => continue,
                },
                Err(e) => return Some(Err(LinkError::Transport(e.to_string()))),
            }
        }
        None
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!("Error closing telemetry link: {}", e);
        }
    }
}

#[derive(Debug, PartialEq)]
enum Frame {
    Payload(String),
    Closed,
    Skip,
}

fn read_frame(message: Message) -> Frame {
    match message {
        Message::Text(text) => Frame::Payload(text.to_string()),
        // Some servers send JSON as binary frames
        Message::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
            Ok(text) => Frame::Payload(text),
            Err(e) => {
                tracing::debug!("Discarding binary frame that is not UTF-8: {}", e);
                Frame::Skip
            }
        },
        Message::Close(_) => Frame::Closed,
        // Ping/pong are answered by tungstenite itself
        _ => Frame::Skip,
    }
}
