use crate::error::VoiceError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Default capacity for the per-session inbound data broadcast channel.
const DATA_BROADCAST_CAPACITY: usize = 256;

/// Inbound data event from the external transport: one data packet from
/// one remote participant.
#[derive(Debug, Clone)]
pub struct DataEvent {
    pub payload: Vec<u8>,
    pub participant_identity: String,
}

/// The narrow surface the agent needs from a live session: deliver spoken
/// output, deliver raw bytes, close. The external platform owns
/// everything behind these calls.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Stable identifier for registry bookkeeping. Owned by the external
    /// transport, not by us.
    fn id(&self) -> &str;

    /// Renders `text` as speech into the room.
    async fn say(&self, text: &str) -> Result<(), VoiceError>;

    /// Publishes a raw data packet into the room.
    async fn send_data(&self, payload: &[u8]) -> Result<(), VoiceError>;

    /// Closes the session. Idempotent.
    async fn close(&self) -> Result<(), VoiceError>;
}

/// A client for the agent's LiveKit room session.
///
/// In a production environment with the full `livekit` client SDK
/// available, this would wrap a `livekit::Room` and its data/audio
/// tracks. Due to compilation constraints in the current environment,
/// the transport side is a simulation; the token and Room Service
/// plumbing around it is real.
#[derive(Debug)]
pub struct AgentSession {
    pub room_url: String,
    pub token: String,
    pub room_name: String,
    instructions: String,
    connected: AtomicBool,
    data_tx: broadcast::Sender<DataEvent>,
}

impl AgentSession {
    /// Connects to a LiveKit room. The session id is the room name: this
    /// agent holds at most one session per room.
    ///
    /// `instructions` is the system prompt configured on the hosted LLM
    /// for the lifetime of the session.
    pub async fn connect(
        url: &str,
        token: &str,
        room_name: &str,
        instructions: &str,
    ) -> Result<Self, VoiceError> {
        info!(
            room = room_name,
            url,
            token_len = token.len(),
            instructions_chars = instructions.len(),
            "agent connecting to LiveKit room"
        );

        // Simulate connection delay
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        let (tx, _) = broadcast::channel(DATA_BROADCAST_CAPACITY);

        Ok(Self {
            room_url: url.to_string(),
            token: token.to_string(),
            room_name: room_name.to_string(),
            instructions: instructions.to_string(),
            connected: AtomicBool::new(true),
            data_tx: tx,
        })
    }

    /// The system prompt this session was configured with.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Subscribes to inbound data events for this session.
    pub fn subscribe_data(&self) -> broadcast::Receiver<DataEvent> {
        self.data_tx.subscribe()
    }

    /// Injects an inbound data packet, as the transport's data callback
    /// would. In a real implementation this is driven by the room's
    /// `data_received` events.
    pub fn simulate_data_received(&self, payload: &[u8], participant_identity: &str) {
        let event = DataEvent {
            payload: payload.to_vec(),
            participant_identity: participant_identity.to_string(),
        };
        // No receivers is fine: the worker may not have subscribed yet.
        let _ = self.data_tx.send(event);
    }

    fn ensure_connected(&self) -> Result<(), VoiceError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(VoiceError::NotConnected(self.room_name.clone()))
        }
    }
}

#[async_trait]
impl SessionTransport for AgentSession {
    fn id(&self) -> &str {
        &self.room_name
    }

    async fn say(&self, text: &str) -> Result<(), VoiceError> {
        self.ensure_connected()?;
        info!(room = %self.room_name, chars = text.len(), "speaking text into room");
        Ok(())
    }

    async fn send_data(&self, payload: &[u8]) -> Result<(), VoiceError> {
        self.ensure_connected()?;
        info!(room = %self.room_name, bytes = payload.len(), "publishing data packet");
        Ok(())
    }

    async fn close(&self) -> Result<(), VoiceError> {
        if self.connected.swap(false, Ordering::AcqRel) {
            info!(room = %self.room_name, "agent session closed");
        }
        Ok(())
    }
}

/// Bookkeeping for live sessions plus the delivery path.
///
/// Holds session handles keyed by session id. The map is guarded by a
/// `std::sync::Mutex` intentionally: every lock acquisition is a brief
/// HashMap edit that never spans an `.await` point, so a synchronous
/// lock is safe and the suspending send/close calls happen outside it.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<dyn SessionTransport>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session under its transport-owned id.
    pub fn insert(&self, session: Arc<dyn SessionTransport>) {
        let id = session.id().to_string();
        self.sessions.lock().unwrap().insert(id, session);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers one message: speak it, then publish its UTF-8 bytes as a
    /// data packet. Both steps are attempted exactly once each — there
    /// are no retries — and a failure of either is terminal for the
    /// session: it is removed from the registry and closed.
    pub async fn deliver(
        &self,
        session: &Arc<dyn SessionTransport>,
        message: &str,
    ) -> Result<(), VoiceError> {
        let spoken = session.say(message).await;
        let sent = session.send_data(message.as_bytes()).await;

        let failure = match (spoken, sent) {
            (Ok(()), Ok(())) => return Ok(()),
            (Err(e), _) | (Ok(()), Err(e)) => e,
        };

        warn!(
            session = session.id(),
            error = %failure,
            "delivery failed, tearing down session"
        );
        self.cleanup(session).await;
        Err(VoiceError::Delivery(failure.to_string()))
    }

    /// Removes the session from the registry and closes its handle. The
    /// lock is released before the close call suspends; a close error is
    /// logged and suppressed, since the session is already being
    /// discarded.
    pub async fn cleanup(&self, session: &Arc<dyn SessionTransport>) {
        let removed = {
            let mut sessions = self.sessions.lock().unwrap();
            sessions.remove(session.id())
        };
        if removed.is_some() {
            debug!(session = session.id(), "removed session from registry");
        }
        if let Err(e) = session.close().await {
            debug!(session = session.id(), error = %e, "error closing session (ignored)");
        }
    }
}
