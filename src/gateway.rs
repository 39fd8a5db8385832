//! Gateway subscription: one WebSocket session at a time, feeding decoded
//! message events to the bot.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsFrame};
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::types::Message;

const DEFAULT_GW: &str = "ws://localhost:3001";

const HEARTBEAT_PERIOD: Duration = Duration::from_secs(30);

/// Consecutive failed sessions tolerated before the bot gives up.
const MAX_FAILURES: u32 = 10;

/// Message events in server channels, the only intent the bot subscribes to.
const GUILD_MESSAGES_INTENT: u64 = 1 << 9;

// The opcodes the bot speaks. The rest of the protocol (presence, resume,
// voice) is irrelevant to watching one channel and gets ignored.
const OP_DISPATCH: u64 = 0;
const OP_HEARTBEAT: u64 = 1;
const OP_IDENTIFY: u64 = 2;
const OP_RECONNECT: u64 = 7;

/// A MESSAGE_CREATE dispatch paired with the server it happened in.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub server_id: String,
    pub message: Message,
}

/// Gateway connection for message events.
///
/// Runs one session at a time: identify, heartbeat on a timer, decode
/// MESSAGE_CREATE dispatches. A dropped connection is reopened with a fresh
/// identify after a short pause; the bot holds no session state worth
/// resuming.
///
/// ```rust,no_run
/// use huebot::gateway::Gateway;
/// use tokio::sync::mpsc;
///
/// #[tokio::main]
/// async fn main() {
///     let (tx, mut events) = mpsc::channel(64);
///     tokio::spawn(Gateway::new("mytoken", None).run(tx));
///     while let Some(event) = events.recv().await {
///         println!("{}: {}", event.server_id, event.message.content);
///     }
/// }
/// ```
pub struct Gateway {
    token: String,
    url: String,
}

impl Gateway {
    /// `token` is the bare bot token; the `Bot` scheme is added at identify.
    pub fn new(token: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            token: token.into(),
            url: url.unwrap_or(DEFAULT_GW).to_owned(),
        }
    }

    /// Keep a gateway session alive, sending decoded message events to
    /// `events`.
    ///
    /// Returns when the receiving half of `events` is dropped, or after
    /// [`MAX_FAILURES`] consecutive connection failures.
    pub async fn run(self, events: mpsc::Sender<MessageEvent>) {
        let mut failures = 0u32;
        loop {
            let outcome = self.session(&events).await;
            if events.is_closed() {
                return;
            }
            match outcome {
                Ok(()) => {
                    failures = 0;
                    info!("gateway session ended, reconnecting");
                }
                Err(e) => {
                    failures += 1;
                    if failures >= MAX_FAILURES {
                        error!("gateway failed {failures} sessions in a row, giving up: {e}");
                        return;
                    }
                    warn!(failures, "gateway session failed: {e}");
                }
            }
            sleep(backoff(failures)).await;
        }
    }

    /// One full session, from connect to disconnect. `Ok` means the
    /// connection closed cleanly (or the server asked for a reconnect).
    async fn session(&self, events: &mpsc::Sender<MessageEvent>) -> Result<()> {
        let (ws, _) = connect_async(&self.url).await?;
        let (mut sink, mut stream) = ws.split();

        let identify = json!({
            "op": OP_IDENTIFY,
            "d": {
                "token": format!("Bot {}", self.token),
                "intents": GUILD_MESSAGES_INTENT,
                "properties": { "$os": "rust" },
            },
        });
        sink.send(WsFrame::Text(identify.to_string().into())).await?;

        let mut heartbeat = interval(HEARTBEAT_PERIOD);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        heartbeat.tick().await; // the first tick fires immediately
        let mut last_seq = None::<u64>;

        loop {
            let frame = tokio::select! {
                _ = heartbeat.tick() => {
                    sink.send(heartbeat_frame(last_seq)).await?;
                    continue;
                }
                frame = stream.next() => match frame {
                    Some(frame) => frame?,
                    None => return Ok(()),
                },
            };

            let text = match frame {
                WsFrame::Text(text) => text,
                WsFrame::Close(_) => return Ok(()),
                _ => continue,
            };
            let payload: Value = serde_json::from_str(text.as_str())?;
            if let Some(seq) = payload.get("s").and_then(Value::as_u64) {
                last_seq = Some(seq);
            }

            match payload.get("op").and_then(Value::as_u64) {
                // The server may request a beat out of schedule.
                Some(OP_HEARTBEAT) => sink.send(heartbeat_frame(last_seq)).await?,
                Some(OP_RECONNECT) => {
                    info!("gateway requested a reconnect");
                    return Ok(());
                }
                Some(OP_DISPATCH)
                    if payload.get("t").and_then(Value::as_str) == Some("MESSAGE_CREATE") =>
                {
                    match decode_message(&payload) {
                        Some(event) => {
                            if events.send(event).await.is_err() {
                                // Bot is shutting down.
                                return Ok(());
                            }
                        }
                        None => debug!("discarding malformed MESSAGE_CREATE dispatch"),
                    }
                }
                _ => {}
            }
        }
    }
}

/// Pause before reconnecting after `failures` consecutive failed sessions:
/// 1s after a clean close, doubling up to a 32s ceiling.
fn backoff(failures: u32) -> Duration {
    Duration::from_secs(1u64 << failures.min(5))
}

fn heartbeat_frame(last_seq: Option<u64>) -> WsFrame {
    WsFrame::Text(json!({ "op": OP_HEARTBEAT, "d": last_seq }).to_string().into())
}

/// The dispatch envelope carries the owning server next to the payload.
fn decode_message(payload: &Value) -> Option<MessageEvent> {
    let server_id = payload.get("server_id")?.as_str()?.to_owned();
    let message = serde_json::from_value(payload.get("d")?.clone()).ok()?;
    Some(MessageEvent { server_id, message })
}
