use std::sync::Arc;

use uuid::Uuid;

use super::{Address, Channel, Diagnostic, GateError, ProbeOutcome, ResolvedAddress, Severity, Stage, TimeoutBudget};
use crate::ports::DiagnosticSink;

/// One observable step of an attempt, rendered by [`DiagnosticReporter::report`].
#[derive(Debug, Clone, Copy)]
pub enum StageEvent<'a> {
    Connecting {
        address: &'a Address,
        baudrate: u32,
        budget: &'a TimeoutBudget,
    },
    Rejected {
        raw: &'a str,
        error: &'a GateError,
    },
    Resolving {
        host: &'a str,
        budget: &'a TimeoutBudget,
    },
    Resolved {
        target: &'a ResolvedAddress,
    },
    Unresolved {
        host: &'a str,
        outcome: &'a ProbeOutcome,
    },
    Probed {
        target: &'a ResolvedAddress,
        port: u16,
        budget: &'a TimeoutBudget,
        outcome: &'a ProbeOutcome,
    },
    Connected {
        address: &'a Address,
    },
    ConnectorFailed {
        address: &'a Address,
        reason: &'a str,
    },
}

/// Renders stage events as paired debug/operator diagnostics for one attempt.
///
/// Every event produces exactly two messages with the same severity; a
/// terminal failure adds one operator-only abort message.
pub struct DiagnosticReporter {
    sink: Arc<dyn DiagnosticSink>,
    attempt_id: Uuid,
}

impl DiagnosticReporter {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            attempt_id: Uuid::new_v4(),
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn report(&self, stage: Stage, event: StageEvent<'_>) {
        let (severity, debug, operator) = render(stage, event);
        self.emit(Channel::Debug, severity, stage, debug);
        self.emit(Channel::Operator, severity, stage, operator);
    }

    pub fn abort(&self, stage: Stage, raw: &str, error: &GateError) {
        self.emit(
            Channel::Operator,
            Severity::Error,
            stage,
            format!("Aborting connection to {}: {}", raw, error.remedy()),
        );
    }

    fn emit(&self, channel: Channel, severity: Severity, stage: Stage, message: String) {
        self.sink.emit(Diagnostic {
            attempt_id: self.attempt_id,
            channel,
            severity,
            stage,
            message,
        });
    }
}

fn step(stage: Stage) -> String {
    match stage.step() {
        Some(n) => format!("Step {}/{}: ", n, Stage::NETWORK_STEPS),
        None => String::new(),
    }
}

fn render(stage: Stage, event: StageEvent<'_>) -> (Severity, String, String) {
    let step = step(stage);
    match event {
        StageEvent::Connecting {
            address,
            baudrate,
            budget,
        } => (
            Severity::Info,
            format!(
                "Attempting network connection: port={}, baudrate={}, timeout={}s (probe timeout {}s)",
                address.raw(),
                baudrate,
                budget.requested_secs(),
                budget.effective_secs()
            ),
            format!("Connecting to port {}, baudrate {}", address.raw(), baudrate),
        ),
        StageEvent::Rejected { raw, error } => (
            Severity::Error,
            format!("Rejected address {:?}: {:?}", raw, error),
            format!("Cannot use {}: {}", raw, error),
        ),
        StageEvent::Resolving { host, budget } => (
            Severity::Info,
            format!("Resolving hostname {} with a {}s timeout", host, budget.effective_secs()),
            format!("{}Resolving hostname {} (timeout {}s)...", step, host, budget.effective_secs()),
        ),
        StageEvent::Resolved { target } => (
            Severity::Info,
            format!("Resolved {} to {}", target.hostname, target.ip_address),
            format!("{}Hostname {} resolved to {}", step, target.hostname, target.ip_address),
        ),
        StageEvent::Unresolved { host, outcome } => (
            Severity::Error,
            format!("Failed to resolve {}: {}", host, outcome),
            format!("{}Could not resolve hostname {}", step, host),
        ),
        StageEvent::Probed {
            target,
            port,
            budget,
            outcome,
        } => {
            let host = &target.hostname;
            let ip = target.ip_address;
            let debug = format!("TCP connect to {}:{} ({}): {}", ip, port, host, outcome);
            let (severity, operator) = match outcome {
                ProbeOutcome::Success => (
                    Severity::Info,
                    format!("{}Port {} on {} ({}) is reachable", step, port, host, ip),
                ),
                ProbeOutcome::ConnectTimeout => (
                    Severity::Error,
                    format!(
                        "{}Connection to {}:{} timed out after {}s",
                        step,
                        host,
                        port,
                        budget.effective_secs()
                    ),
                ),
                ProbeOutcome::ConnectionRefused => (
                    Severity::Error,
                    format!("{}Connection to {}:{} refused, nothing is listening on that port", step, host, port),
                ),
                ProbeOutcome::NetworkUnreachable(_) => {
                    (Severity::Error, format!("{}Host {} is unreachable", step, host))
                }
                ProbeOutcome::DnsFailure(_) => {
                    (Severity::Error, format!("{}Could not resolve hostname {}", step, host))
                }
                ProbeOutcome::Other(_) => (
                    Severity::Error,
                    format!("{}Could not open a connection to {}:{}", step, host, port),
                ),
            };
            (severity, debug, operator)
        }
        StageEvent::Connected { address } => (
            Severity::Info,
            format!("Successfully connected to {}", address.raw()),
            format!("Connected to {}", address.raw()),
        ),
        StageEvent::ConnectorFailed { address, reason } => (
            Severity::Error,
            format!("Failed to connect to {}: {}", address.raw(), reason),
            format!("Network connection failed: {}", reason),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::endpoint;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        diagnostics: Mutex<Vec<Diagnostic>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn emit(&self, diagnostic: Diagnostic) {
            self.diagnostics.lock().unwrap().push(diagnostic);
        }
    }

    fn target() -> ResolvedAddress {
        ResolvedAddress::new("printer.local", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)))
    }

    #[test]
    fn test_report_emits_matched_pair() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = DiagnosticReporter::new(sink.clone());
        let budget = TimeoutBudget::new(10.0, 5.0).unwrap();

        reporter.report(
            Stage::Resolve,
            StageEvent::Resolving {
                host: "printer.local",
                budget: &budget,
            },
        );

        let diagnostics = sink.diagnostics.lock().unwrap();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].channel, Channel::Debug);
        assert_eq!(diagnostics[1].channel, Channel::Operator);
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Info));
        assert!(diagnostics.iter().all(|d| d.stage == Stage::Resolve));
        assert!(diagnostics.iter().all(|d| d.attempt_id == reporter.attempt_id()));
        assert_eq!(diagnostics[1].message, "Step 1/2: Resolving hostname printer.local (timeout 5s)...");
    }

    #[test]
    fn test_success_shows_hostname_and_ip() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = DiagnosticReporter::new(sink.clone());
        let budget = TimeoutBudget::new(10.0, 5.0).unwrap();
        let target = target();

        reporter.report(
            Stage::Probe,
            StageEvent::Probed {
                target: &target,
                port: 23000,
                budget: &budget,
                outcome: &ProbeOutcome::Success,
            },
        );

        let diagnostics = sink.diagnostics.lock().unwrap();
        assert_eq!(diagnostics[1].message, "Step 2/2: Port 23000 on printer.local (10.0.0.7) is reachable");
        assert_eq!(diagnostics[1].severity, Severity::Info);
    }

    #[test]
    fn test_timeout_failure_names_timeout_value() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = DiagnosticReporter::new(sink.clone());
        let budget = TimeoutBudget::new(2.5, 5.0).unwrap();
        let target = target();

        reporter.report(
            Stage::Probe,
            StageEvent::Probed {
                target: &target,
                port: 23,
                budget: &budget,
                outcome: &ProbeOutcome::ConnectTimeout,
            },
        );

        let diagnostics = sink.diagnostics.lock().unwrap();
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));
        assert_eq!(
            diagnostics[1].message,
            "Step 2/2: Connection to printer.local:23 timed out after 2.5s"
        );
        assert!(diagnostics[0].message.contains("10.0.0.7:23"));
    }

    #[test]
    fn test_abort_is_operator_only() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = DiagnosticReporter::new(sink.clone());
        let address = endpoint::parse("tcp://printer.local:23000").unwrap();

        reporter.abort(Stage::Probe, address.raw(), &GateError::ConnectionRefused);

        let diagnostics = sink.diagnostics.lock().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].channel, Channel::Operator);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert!(diagnostics[0].message.starts_with("Aborting connection to tcp://printer.local:23000"));
        assert!(diagnostics[0].message.contains("port closed"));
    }

    #[test]
    fn test_each_reporter_gets_its_own_attempt_id() {
        let sink: Arc<dyn DiagnosticSink> = Arc::new(RecordingSink::default());
        let first = DiagnosticReporter::new(sink.clone());
        let second = DiagnosticReporter::new(sink);
        assert_ne!(first.attempt_id(), second.attempt_id());
    }
}
