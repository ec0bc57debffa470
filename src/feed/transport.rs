//! Stream transport behind the feed client

use crate::error::{Result, WatcherError};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What the transport produced on read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Text(String),
    /// Graceful close by either side
    Closed,
}

/// An open feed connection
#[async_trait]
pub trait FeedConnection: Send {
    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Next text frame or close. Must be cancel-safe.
    async fn next_event(&mut self) -> Result<FeedEvent>;

    async fn close(&mut self);
}

/// Opens feed connections
#[async_trait]
pub trait FeedConnector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn FeedConnection>>;
}

/// WebSocket transport
#[derive(Debug, Default, Clone)]
pub struct WsConnector;

#[async_trait]
impl FeedConnector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn FeedConnection>> {
        let (stream, response) = connect_async(url).await?;
        debug!("WebSocket handshake completed: {}", response.status());
        Ok(Box::new(WsConnection { stream }))
    }
}

pub struct WsConnection {
    stream: WsStream,
}

#[async_trait]
impl FeedConnection for WsConnection {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn next_event(&mut self) -> Result<FeedEvent> {
        while let Some(msg) = self.stream.next().await {
            match msg {
                Ok(Message::Text(text)) => return Ok(FeedEvent::Text(text.as_str().to_owned())),
                Ok(Message::Close(frame)) => {
                    debug!("Close frame received: {:?}", frame);
                    return Ok(FeedEvent::Closed);
                }
                // Pings are answered by tungstenite; binary frames carry no ticks
                Ok(_) => continue,
                Err(tungstenite::Error::ConnectionClosed) => return Ok(FeedEvent::Closed),
                Err(e) => return Err(WatcherError::WebSocket(e)),
            }
        }
        Ok(FeedEvent::Closed)
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!("Error while closing WebSocket: {}", e);
        }
    }
}
