use crate::domain::Diagnostic;

/// Port receiving the debug and operator diagnostic streams
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}
