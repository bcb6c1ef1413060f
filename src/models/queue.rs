//! Patient queue model.

use serde::{Deserialize, Serialize};

/// Emergency Severity Index level, ESI 1 (most urgent) through ESI 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QueueSeverity {
    #[serde(rename = "ESI1")]
    Esi1,
    #[serde(rename = "ESI2")]
    Esi2,
    #[serde(rename = "ESI3")]
    Esi3,
    #[serde(rename = "ESI4")]
    Esi4,
    #[serde(rename = "ESI5")]
    Esi5,
}

impl QueueSeverity {
    /// Display label for the queue panel.
    pub fn label(&self) -> &'static str {
        match self {
            QueueSeverity::Esi1 => "ESI 1",
            QueueSeverity::Esi2 => "ESI 2",
            QueueSeverity::Esi3 => "ESI 3",
            QueueSeverity::Esi4 => "ESI 4",
            QueueSeverity::Esi5 => "ESI 5",
        }
    }
}

/// One patient waiting in the triage queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientQueueItem {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub severity: QueueSeverity,
}

/// Demo queue shown until the backend exposes a queue endpoint.
pub fn demo_queue() -> Vec<PatientQueueItem> {
    vec![
        PatientQueueItem {
            id: 1,
            name: "Piet Pietersen".to_string(),
            description: "This is a description".to_string(),
            severity: QueueSeverity::Esi1,
        },
        PatientQueueItem {
            id: 2,
            name: "Jan Jansen".to_string(),
            description: "This is a description".to_string(),
            severity: QueueSeverity::Esi2,
        },
        PatientQueueItem {
            id: 3,
            name: "Karel Klaassen".to_string(),
            description: "This is a description".to_string(),
            severity: QueueSeverity::Esi3,
        },
        PatientQueueItem {
            id: 4,
            name: "Jef Jeferson".to_string(),
            description: "This is a description".to_string(),
            severity: QueueSeverity::Esi4,
        },
        PatientQueueItem {
            id: 5,
            name: "Jos Joskens".to_string(),
            description: "This is a description".to_string(),
            severity: QueueSeverity::Esi4,
        },
    ]
}
