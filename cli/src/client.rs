use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

use sidestacker_core::{decode, encode, ClientMsg, GameId, ServerMsg};

pub fn build_game_ws_url(ws_base: &str, game_id: &GameId) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(ws_base)?;
    let base_path = url.path().trim_end_matches('/');
    let path = format!("{base_path}/api/game/{game_id}");
    url.set_path(&path);
    url.set_query(None);
    Ok(url)
}

/// Owns the duplex connection for one game id. Inbound frames are decoded
/// and queued so that a burst of messages is observed one at a time, in
/// arrival order, and never coalesced. `send` is fire-and-forget; there is
/// no acknowledgement and no reconnect. A transport failure is recorded as
/// the last error and ends the inbound queue.
pub struct GameClient {
    game_id: GameId,
    outbound: mpsc::UnboundedSender<ClientMsg>,
    inbound: mpsc::UnboundedReceiver<ServerMsg>,
    last_error: Arc<Mutex<Option<String>>>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl GameClient {
    pub async fn connect(
        ws_base: &str,
        game_id: GameId,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let url = build_game_ws_url(ws_base, &game_id)?;
        let (ws, _response) = connect_async(url.as_str()).await?;
        let (mut write, mut read) = ws.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ClientMsg>();
        let (inbound_tx, inbound) = mpsc::unbounded_channel::<ServerMsg>();
        let last_error = Arc::new(Mutex::new(None));

        let error_slot = Arc::clone(&last_error);
        let writer = tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let Some(text) = encode(&msg) else {
                    warn!("failed to encode outbound message, dropping");
                    continue;
                };
                if let Err(err) = write.send(Message::text(text)).await {
                    warn!(error = %err, "websocket send failed");
                    *error_slot.lock().unwrap() = Some(err.to_string());
                    break;
                }
            }
        });

        let error_slot = Arc::clone(&last_error);
        let reader = tokio::spawn(async move {
            while let Some(message) = read.next().await {
                let message = match message {
                    Ok(message) => message,
                    Err(err) => {
                        warn!(error = %err, "websocket read failed");
                        *error_slot.lock().unwrap() = Some(err.to_string());
                        break;
                    }
                };
                match message {
                    Message::Text(text) => {
                        let Some(msg) = decode::<ServerMsg>(text.as_str()) else {
                            warn!(frame = text.as_str(), "unrecognized server message, ignoring");
                            continue;
                        };
                        if inbound_tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Message::Close(frame) => {
                        debug!(?frame, "server closed the connection");
                        break;
                    }
                    _ => {}
                }
            }
        });

        Ok(Self {
            game_id,
            outbound,
            inbound,
            last_error,
            reader,
            writer,
        })
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Serializes and queues the message for transmission. Fire-and-forget:
    /// a dead connection surfaces through `recv`/`last_error`, not here.
    pub fn send(&self, msg: ClientMsg) {
        let _ = self.outbound.send(msg);
    }

    /// Pops the next inbound message, waiting for one to arrive. Returns
    /// `None` once the connection is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<ServerMsg> {
        self.inbound.recv().await
    }

    /// Pops an inbound message only if one is already queued.
    pub fn try_next(&mut self) -> Option<ServerMsg> {
        self.inbound.try_recv().ok()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    /// Explicit teardown; the connection dies with the client value.
    pub fn close(self) {
        self.reader.abort();
        self.writer.abort();
    }
}
