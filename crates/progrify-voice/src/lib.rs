//! LiveKit integration for the Progrify voice agent.
//!
//! Wraps the hosted real-time platform behind a narrow surface: sign an
//! access token, ensure the room exists, hold a session handle, deliver a
//! message (speak it and publish its bytes), and tear the session down on
//! failure. The media transport, speech pipeline, and LLM behind those
//! calls are vendor-owned black boxes.
//!
//! Delivery is at-most-once with no retries: a failed send is terminal
//! for its session.

pub mod config;
pub mod error;
pub mod service;
pub mod session;

pub use config::{
    LiveKitConfig, DEV_LIVEKIT_API_KEY, DEV_LIVEKIT_API_SECRET, DEV_LIVEKIT_URL,
};
pub use error::VoiceError;
pub use service::VoiceService;
pub use session::{AgentSession, DataEvent, SessionRegistry, SessionTransport};
