//! Agent worker binary — runs the Progrify voice agent against its
//! LiveKit room.
//!
//! One positional argument selects the run mode: `dev` runs with local
//! development defaults, anything else (or no argument) runs in
//! production mode, which requires `LIVEKIT_URL`, `LIVEKIT_API_KEY`,
//! and `LIVEKIT_API_SECRET` in the environment.

use progrify_agent::{run, RunMode, WorkerOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let mode = match std::env::args().nth(1).as_deref() {
        Some("dev") => RunMode::Dev,
        _ => RunMode::Production,
    };

    let default_filter = match mode {
        RunMode::Dev => "debug",
        RunMode::Production => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(?mode, "starting agent worker");

    if let Err(e) = run(WorkerOptions { mode }).await {
        tracing::error!(error = %e, "failed to start agent");
        std::process::exit(1);
    }

    tracing::info!("agent worker shut down");
}
