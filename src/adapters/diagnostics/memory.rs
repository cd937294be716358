use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::{Channel, Diagnostic};
use crate::ports::DiagnosticSink;

/// Sink keeping every diagnostic in memory, in emission order.
///
/// Meant for hosts embedding the gate that show diagnostics in their own UI
/// instead of a log, grouped with [`MemorySink::attempt`].
#[derive(Debug, Default)]
pub struct MemorySink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries().clone()
    }

    pub fn channel(&self, channel: Channel) -> Vec<Diagnostic> {
        self.entries().iter().filter(|d| d.channel == channel).cloned().collect()
    }

    pub fn attempt(&self, attempt_id: Uuid) -> Vec<Diagnostic> {
        self.entries()
            .iter()
            .filter(|d| d.attempt_id == attempt_id)
            .cloned()
            .collect()
    }

    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries())
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.entries().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Severity, Stage};

    fn diagnostic(attempt_id: Uuid, channel: Channel) -> Diagnostic {
        Diagnostic {
            attempt_id,
            channel,
            severity: Severity::Info,
            stage: Stage::Resolve,
            message: "Resolving".into(),
        }
    }

    #[test]
    fn test_filters_by_channel_and_attempt() {
        let sink = MemorySink::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        sink.emit(diagnostic(first, Channel::Debug));
        sink.emit(diagnostic(first, Channel::Operator));
        sink.emit(diagnostic(second, Channel::Debug));

        assert_eq!(sink.channel(Channel::Debug).len(), 2);
        assert_eq!(sink.attempt(first).len(), 2);
        assert_eq!(sink.attempt(second).len(), 1);
    }

    #[test]
    fn test_drain_empties_the_sink() {
        let sink = MemorySink::new();
        sink.emit(diagnostic(Uuid::new_v4(), Channel::Operator));

        assert_eq!(sink.drain().len(), 1);
        assert!(sink.is_empty());
    }
}
