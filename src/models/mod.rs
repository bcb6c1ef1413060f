//! Domain models shared across the client.

mod queue;

pub use queue::{demo_queue, PatientQueueItem, QueueSeverity};
