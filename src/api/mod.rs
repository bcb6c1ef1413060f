//! HTTP client for the TriageFlow backend.

mod client;
mod models;

pub use client::{EventStream, TriageClient};
pub use models::{
    AgentResponse, AgentStatus, ChatStreamRequest, IntakeResult, StartIntakeRequest,
    StartIntakeResponse,
};
