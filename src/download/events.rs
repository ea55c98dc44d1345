//! Status events emitted while a request runs.

use futures::channel::mpsc;

/// What the orchestrator reports to the interface layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Progress(String),
    Delivered(Delivered),
    Failed(String),
}

/// Something handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    /// A file passed to the delivery collaborator.
    File { filename: String, size_bytes: u64 },
    /// A direct link offered instead of a file that exceeds the budget.
    Link { url: String, size_bytes: u64 },
}

/// Sending half of a status event stream.
///
/// Events sent after the receiver is gone are dropped.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl EventSink {
    /// Create a sink and the stream that receives its events.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StatusEvent>) {
        let (tx, rx) = mpsc::unbounded();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: StatusEvent) {
        tracing::debug!("Status event: {:?}", event);
        let _ = self.tx.unbounded_send(event);
    }

    pub fn progress(&self, message: impl Into<String>) {
        self.emit(StatusEvent::Progress(message.into()));
    }

    pub fn delivered(&self, delivered: Delivered) {
        self.emit(StatusEvent::Delivered(delivered));
    }

    pub fn failed(&self, message: impl Into<String>) {
        self.emit(StatusEvent::Failed(message.into()));
    }
}

/// Format a byte count as megabytes for user-facing messages.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
