//! Mapping from what the transport reported to a [`ProbeOutcome`].
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. no stream and the limit elapsed (or the OS said `TimedOut`) → `ConnectTimeout`
//! 2. `ConnectionRefused` → `ConnectionRefused`
//! 3. local socket errors (permissions, bad input, exhausted resources) → `Other`
//! 4. any other error → `NetworkUnreachable`
//! 5. stream established → `Success`

use std::io;
use std::time::Duration;

use super::ProbeOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    Connected,
    /// The connect future did not finish before the limit.
    Elapsed,
    Failed { kind: io::ErrorKind, reason: String },
}

/// Everything the classifier needs to know about one connect attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAttempt {
    pub elapsed: Duration,
    pub limit: Duration,
    pub result: AttemptResult,
}

impl ConnectAttempt {
    pub fn connected(elapsed: Duration, limit: Duration) -> Self {
        Self {
            elapsed,
            limit,
            result: AttemptResult::Connected,
        }
    }

    pub fn elapsed(elapsed: Duration, limit: Duration) -> Self {
        Self {
            elapsed,
            limit,
            result: AttemptResult::Elapsed,
        }
    }

    pub fn failed(elapsed: Duration, limit: Duration, err: &io::Error) -> Self {
        Self {
            elapsed,
            limit,
            result: AttemptResult::Failed {
                kind: err.kind(),
                reason: err.to_string(),
            },
        }
    }

    fn error_kind(&self) -> Option<io::ErrorKind> {
        match &self.result {
            AttemptResult::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    fn reason(&self) -> String {
        match &self.result {
            AttemptResult::Failed { reason, .. } => reason.clone(),
            AttemptResult::Elapsed => format!("no answer within {:?}", self.limit),
            AttemptResult::Connected => String::new(),
        }
    }
}

const LOCAL_ERRORS: &[io::ErrorKind] = &[
    io::ErrorKind::PermissionDenied,
    io::ErrorKind::InvalidInput,
    io::ErrorKind::Unsupported,
    io::ErrorKind::AddrInUse,
    io::ErrorKind::OutOfMemory,
];

struct Rule {
    matches: fn(&ConnectAttempt) -> bool,
    outcome: fn(&ConnectAttempt) -> ProbeOutcome,
}

fn timed_out(attempt: &ConnectAttempt) -> bool {
    match attempt.result {
        AttemptResult::Connected => false,
        AttemptResult::Elapsed => true,
        AttemptResult::Failed { kind, .. } => kind == io::ErrorKind::TimedOut || attempt.elapsed >= attempt.limit,
    }
}

fn refused(attempt: &ConnectAttempt) -> bool {
    attempt.error_kind() == Some(io::ErrorKind::ConnectionRefused)
}

fn local_error(attempt: &ConnectAttempt) -> bool {
    attempt.error_kind().map_or(false, |kind| LOCAL_ERRORS.contains(&kind))
}

fn transport_error(attempt: &ConnectAttempt) -> bool {
    attempt.error_kind().is_some()
}

fn connected(attempt: &ConnectAttempt) -> bool {
    attempt.result == AttemptResult::Connected
}

static RULES: [Rule; 5] = [
    Rule {
        matches: timed_out,
        outcome: |_| ProbeOutcome::ConnectTimeout,
    },
    Rule {
        matches: refused,
        outcome: |_| ProbeOutcome::ConnectionRefused,
    },
    Rule {
        matches: local_error,
        outcome: |attempt| ProbeOutcome::Other(attempt.reason()),
    },
    Rule {
        matches: transport_error,
        outcome: |attempt| ProbeOutcome::NetworkUnreachable(attempt.reason()),
    },
    Rule {
        matches: connected,
        outcome: |_| ProbeOutcome::Success,
    },
];

pub fn classify(attempt: &ConnectAttempt) -> ProbeOutcome {
    RULES
        .iter()
        .find(|rule| (rule.matches)(attempt))
        .map(|rule| (rule.outcome)(attempt))
        .unwrap_or_else(|| ProbeOutcome::Other(format!("unclassified connect attempt: {:?}", attempt.result)))
}
