//! Progrify agent worker library logic.

pub mod worker;

pub use worker::{run, AgentWorker, RunMode, WorkerOptions, APOLOGY};
