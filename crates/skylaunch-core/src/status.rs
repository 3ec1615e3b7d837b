//! Append-only progress log with full replay rendering

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub message: String,
}

/// Receives the whole log after every append
pub trait StatusSink: Send {
    fn render(&mut self, entries: &[StatusEntry]);
}

/// Sink that discards renders; the log itself is still kept
#[derive(Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn render(&mut self, _entries: &[StatusEntry]) {}
}

/// Progress log for one provisioning run
pub struct StatusReporter {
    entries: Vec<StatusEntry>,
    sink: Box<dyn StatusSink>,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new(NullSink)
    }
}

impl std::fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl StatusReporter {
    pub fn new(sink: impl StatusSink + 'static) -> Self {
        Self {
            entries: Vec::new(),
            sink: Box::new(sink),
        }
    }

    /// Record a message and replay the full log to the sink
    pub fn append(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        match severity {
            Severity::Normal => tracing::debug!("{}", message),
            Severity::Warning => tracing::warn!("{}", message),
        }
        self.entries.push(StatusEntry {
            timestamp: Local::now(),
            severity,
            message,
        });
        self.sink.render(&self.entries);
    }

    pub fn normal(&mut self, message: impl Into<String>) {
        self.append(message, Severity::Normal);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.append(message, Severity::Warning);
    }

    /// Drop every entry; the sink stays attached
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Every entry so far, oldest first
    pub fn render(&self) -> &[StatusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
