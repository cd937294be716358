use crate::domain::{Channel, Diagnostic, Severity};
use crate::ports::DiagnosticSink;

/// Log target of the concise, operator-facing messages.
pub const OPERATOR_TARGET: &str = "preflight::operator";
/// Log target of the detailed messages meant for bug reports.
pub const DEBUG_TARGET: &str = "preflight::debug";

/// Sink writing each channel to its own `tracing` target so subscribers can
/// filter them independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let Diagnostic {
            attempt_id,
            channel,
            severity,
            stage,
            message,
        } = diagnostic;

        match (channel, severity) {
            (Channel::Operator, Severity::Info) => {
                tracing::info!(target: OPERATOR_TARGET, attempt = %attempt_id, %stage, "{}", message)
            }
            (Channel::Operator, Severity::Error) => {
                tracing::error!(target: OPERATOR_TARGET, attempt = %attempt_id, %stage, "{}", message)
            }
            (Channel::Debug, Severity::Info) => {
                tracing::info!(target: DEBUG_TARGET, attempt = %attempt_id, %stage, "{}", message)
            }
            (Channel::Debug, Severity::Error) => {
                tracing::error!(target: DEBUG_TARGET, attempt = %attempt_id, %stage, "{}", message)
            }
        }
    }
}
