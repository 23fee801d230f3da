//! The agent worker: session startup and the inbound data loop.
//!
//! One inbound callback per session drives the router. There is no
//! worker pool and no retry anywhere: a delivery failure tears the
//! session down and ends the run.

use progrify_router::{route, RouteOutcome, AGENT_INSTRUCTION, DEFAULT_SPECIALIZATION};
use progrify_voice::{
    AgentSession, DataEvent, LiveKitConfig, SessionRegistry, SessionTransport, VoiceError,
    VoiceService,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Sent when an inbound payload cannot be handled. Generated here, by
/// the router's caller, never inside the routing function itself.
pub const APOLOGY: &str = "Sorry, I encountered an error.";

/// How the worker runs: against local development defaults, or against a
/// hosted deployment with credentials required from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Dev,
    Production,
}

/// Worker harness options. The run mode is the only knob, selected by
/// the single positional CLI argument.
#[derive(Debug, Clone, Copy)]
pub struct WorkerOptions {
    pub mode: RunMode,
}

/// Per-message handling for the agent: self-loop suppression, UTF-8
/// decode, routing, and delivery through the session registry.
pub struct AgentWorker {
    agent_identity: String,
    registry: Arc<SessionRegistry>,
}

impl AgentWorker {
    pub fn new(agent_identity: impl Into<String>, registry: Arc<SessionRegistry>) -> Self {
        Self {
            agent_identity: agent_identity.into(),
            registry,
        }
    }

    /// Handles one inbound data event and returns the specialization to
    /// carry into the next call. The state is threaded explicitly:
    /// nothing here is mutable between calls.
    ///
    /// Events from the agent's own identity are dropped (the transport
    /// echoes published data back). Payloads that are not valid UTF-8
    /// are logged and dropped. A routing failure produces one
    /// best-effort apology; a delivery failure produces nothing further,
    /// since the registry has already torn the session down.
    pub async fn handle_data(
        &self,
        state: &str,
        event: &DataEvent,
        session: &Arc<dyn SessionTransport>,
    ) -> String {
        if event.participant_identity == self.agent_identity {
            return state.to_string();
        }

        let message = match std::str::from_utf8(&event.payload) {
            Ok(message) => message,
            Err(e) => {
                warn!(
                    participant = %event.participant_identity,
                    error = %e,
                    "dropping non-UTF-8 data payload"
                );
                return state.to_string();
            }
        };

        match route(state, message) {
            RouteOutcome::Routed { next, messages } => {
                for reply in &messages {
                    if let Err(e) = self.registry.deliver(session, reply).await {
                        // The registry already removed and closed the
                        // session; nothing more can reach the remote side.
                        error!(session = session.id(), error = %e, "failed to send response");
                        return next;
                    }
                }
                next
            }
            RouteOutcome::Failed { reason } => {
                error!(reason = %reason, "error handling message");
                if let Err(e) = self.registry.deliver(session, APOLOGY).await {
                    error!(session = session.id(), error = %e, "failed to send apology");
                }
                state.to_string()
            }
        }
    }
}

/// Runs the agent until its session ends.
///
/// Startup establishes the external session: sign the agent token,
/// ensure the room exists, connect. Any failure here is propagated so
/// the process terminates — the agent cannot function without a live
/// session. After startup, the inbound data loop runs until the session
/// is torn down.
pub async fn run(options: WorkerOptions) -> Result<(), VoiceError> {
    let config = match options.mode {
        RunMode::Dev => LiveKitConfig::from_env_or_dev(),
        RunMode::Production => LiveKitConfig::from_env()?,
    };
    let service = VoiceService::new(config);

    let token = service.generate_access_token()?;
    info!(identity = service.agent_identity(), "generated agent token");
    info!(
        "test this token at: https://livekit.io/token-test?token={}&url={}",
        token,
        service.get_url()
    );

    match service.create_room(service.room()).await {
        Ok(room) => info!(room = %room.name, "room ready"),
        Err(e) if options.mode == RunMode::Dev => {
            // A local sidecar may not be running; the room is created on
            // first join anyway.
            warn!(error = %e, "room service unreachable, continuing in dev mode");
        }
        Err(e) => {
            error!(error = %e, "failed to start agent");
            return Err(e);
        }
    }

    let session = Arc::new(
        AgentSession::connect(service.get_url(), &token, service.room(), AGENT_INSTRUCTION)
            .await
            .inspect_err(|e| error!(error = %e, "failed to start agent"))?,
    );

    let registry = Arc::new(SessionRegistry::new());
    let transport: Arc<dyn SessionTransport> = session.clone();
    registry.insert(transport.clone());

    let worker = AgentWorker::new(service.agent_identity(), registry.clone());
    let mut inbound = session.subscribe_data();
    let mut state = DEFAULT_SPECIALIZATION.to_string();

    info!(room = service.room(), state = %state, "agent ready");

    loop {
        match inbound.recv().await {
            Ok(event) => {
                state = worker.handle_data(&state, &event, &transport).await;
                if !registry.contains(transport.id()) {
                    warn!("session torn down, stopping worker");
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "inbound data events lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    registry.cleanup(&transport).await;
    Ok(())
}
