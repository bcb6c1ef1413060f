//! Request and response types for the backend API.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat_stream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStreamRequest {
    pub query: String,
}

impl ChatStreamRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Body of `POST /agents/patient/intake`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartIntakeRequest {
    /// Transcript of the conversation to run intake over.
    pub conversation: String,
}

/// Agent run status reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Completed,
    Running,
    Failed,
}

/// Envelope for agent endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse<T> {
    pub status: AgentStatus,
    pub result: T,
}

/// Result payload of the patient intake agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeResult {
    pub message: String,
    pub symptoms: Vec<String>,
}

pub type StartIntakeResponse = AgentResponse<IntakeResult>;
