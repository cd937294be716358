use std::sync::Arc;

use log::debug;
use tracing::trace;

use super::endpoint::{self, list_candidates};
use super::reporter::{DiagnosticReporter, StageEvent};
use super::{ConnectionAuthorization, GateError, GateState, ParseError, ProbeOutcome, Result, Stage, TimeoutBudget};
use crate::config::PreflightConfig;
use crate::ports::{ConnectorPort, DiagnosticSink, ProberPort, ResolverPort};

/// Runs parse → resolve → probe for one address and decides whether the
/// caller may hand it to the real connector.
///
/// Each call is an independent attempt: nothing is cached and nothing is
/// retried, so concurrent calls on clones of the same gate never interact.
#[derive(Clone)]
pub struct ConnectionGate {
    config: Arc<PreflightConfig>,
    resolver: Arc<dyn ResolverPort>,
    prober: Arc<dyn ProberPort>,
    sink: Arc<dyn DiagnosticSink>,
}

impl ConnectionGate {
    pub fn new(
        config: PreflightConfig,
        resolver: Arc<dyn ResolverPort>,
        prober: Arc<dyn ProberPort>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            resolver,
            prober,
            sink,
        }
    }

    pub fn config(&self) -> &PreflightConfig {
        &self.config
    }

    /// The configured addresses this gate is responsible for.
    pub fn candidates(&self) -> Vec<String> {
        let network_ports = list_candidates(&self.config.configured_addresses);
        debug!("Discovered network ports: {:?}", network_ports);
        network_ports
    }

    pub async fn authorize(&self, raw: &str, baudrate: u32, requested_timeout_secs: f64) -> Result<ConnectionAuthorization> {
        let reporter = DiagnosticReporter::new(self.sink.clone());
        self.run_stages(&reporter, raw, baudrate, requested_timeout_secs).await
    }

    /// Authorize `raw`, then open it through `connector` exactly once.
    ///
    /// A connector failure is terminal in the same way a probe failure is.
    pub async fn connect<C: ConnectorPort>(
        &self,
        connector: &C,
        raw: &str,
        baudrate: u32,
        requested_timeout_secs: f64,
    ) -> Result<C::Stream> {
        let reporter = DiagnosticReporter::new(self.sink.clone());
        let authorization = self.run_stages(&reporter, raw, baudrate, requested_timeout_secs).await?;

        match connector.connect(&authorization).await {
            Ok(stream) => {
                reporter.report(
                    Stage::Connect,
                    StageEvent::Connected {
                        address: authorization.address(),
                    },
                );
                Ok(stream)
            }
            Err(err) => {
                let reason = err.to_string();
                reporter.report(
                    Stage::Connect,
                    StageEvent::ConnectorFailed {
                        address: authorization.address(),
                        reason: &reason,
                    },
                );
                let error = GateError::ConnectorFailure(reason);
                reporter.abort(Stage::Connect, raw, &error);
                Err(error)
            }
        }
    }

    async fn run_stages(
        &self,
        reporter: &DiagnosticReporter,
        raw: &str,
        baudrate: u32,
        requested_timeout_secs: f64,
    ) -> Result<ConnectionAuthorization> {
        let mut attempt = Attempt::new(raw, reporter);

        let address = match endpoint::parse(raw) {
            Ok(address) => address,
            Err(ParseError::NotNetworkAddress) => {
                trace!(attempt = %reporter.attempt_id(), raw, "not a network address, skipping");
                return Err(GateError::NotNetworkAddress);
            }
            Err(err) => return Err(attempt.reject(err.into())),
        };
        let budget = match TimeoutBudget::new(requested_timeout_secs, self.config.timeout_cap_secs) {
            Ok(budget) => budget,
            Err(error) => return Err(attempt.reject(error)),
        };
        attempt.advance(GateState::Parsed);
        reporter.report(
            Stage::Parse,
            StageEvent::Connecting {
                address: &address,
                baudrate,
                budget: &budget,
            },
        );

        reporter.report(
            Stage::Resolve,
            StageEvent::Resolving {
                host: address.host(),
                budget: &budget,
            },
        );
        let target = match self.resolver.resolve(address.host(), &budget).await {
            Ok(target) => target,
            Err(err) => {
                let outcome = ProbeOutcome::DnsFailure(err.reason);
                reporter.report(
                    Stage::Resolve,
                    StageEvent::Unresolved {
                        host: address.host(),
                        outcome: &outcome,
                    },
                );
                return Err(attempt.fail(Stage::Resolve, outcome_error(&outcome)));
            }
        };
        reporter.report(Stage::Resolve, StageEvent::Resolved { target: &target });
        attempt.advance(GateState::Resolved);

        let outcome = self.prober.probe(&target, address.port(), &budget).await;
        reporter.report(
            Stage::Probe,
            StageEvent::Probed {
                target: &target,
                port: address.port(),
                budget: &budget,
                outcome: &outcome,
            },
        );
        if let Some(error) = outcome.to_error() {
            return Err(attempt.fail(Stage::Probe, error));
        }
        attempt.advance(GateState::Probed);
        attempt.advance(GateState::Authorized);

        Ok(ConnectionAuthorization::new(address, budget, baudrate, reporter.attempt_id()))
    }
}

fn outcome_error(outcome: &ProbeOutcome) -> GateError {
    outcome
        .to_error()
        .unwrap_or_else(|| GateError::ProbeFailed(format!("unexpected outcome {}", outcome)))
}

/// State machine of a single authorization attempt.
struct Attempt<'a> {
    raw: &'a str,
    state: GateState,
    reporter: &'a DiagnosticReporter,
}

impl<'a> Attempt<'a> {
    fn new(raw: &'a str, reporter: &'a DiagnosticReporter) -> Self {
        Self {
            raw,
            state: GateState::Start,
            reporter,
        }
    }

    fn advance(&mut self, next: GateState) {
        debug_assert!(
            self.state.can_advance_to(&next),
            "invalid gate transition {:?} -> {:?}",
            self.state,
            next
        );
        trace!(attempt = %self.reporter.attempt_id(), from = ?self.state, to = ?next, "gate transition");
        self.state = next;
    }

    fn reject(&mut self, error: GateError) -> GateError {
        self.reporter.report(
            Stage::Parse,
            StageEvent::Rejected {
                raw: self.raw,
                error: &error,
            },
        );
        self.fail(Stage::Parse, error)
    }

    fn fail(&mut self, stage: Stage, error: GateError) -> GateError {
        self.advance(GateState::Failed(error.kind()));
        self.reporter.abort(stage, self.raw, &error);
        error
    }
}
