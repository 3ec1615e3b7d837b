//! Top-level acquisition loop
//!
//! ```text
//!   Preflight ──quota violation / listing failure──▶ Finished
//!       │
//!       ▼
//!   Running(round) ──success──▶ Finished
//!       │    ▲
//!       │    └── round closed, backoff wait
//!       ▼
//!   Finished (max_rounds reached)
//! ```

use crate::attempt::{AttemptOutcome, attempt};
use crate::backoff::{BackoffConfig, BackoffController};
use crate::error::Result;
use crate::pacing::{Pause, Sleeper};
use crate::quota::{QuotaGuard, QuotaLimits, QuotaSnapshot, QuotaVerdict};
use crate::request::ProvisioningRequest;
use crate::status::StatusReporter;
use crate::zone::ZoneRotator;
use skylaunch_cloud::{ComputeProvider, InstanceInfo};
use std::time::Duration;

/// Tuning for one [`ProvisioningLoop`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSettings {
    pub backoff: BackoffConfig,
    /// Pause between zones of the same round; zero disables it
    pub attempt_delay: Duration,
    /// Stop after this many failed rounds. `None` retries forever.
    pub max_rounds: Option<u64>,
    pub quota: QuotaLimits,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            backoff: BackoffConfig::default(),
            attempt_delay: Duration::from_secs(5),
            max_rounds: None,
            quota: QuotaLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Preflight,
    Running { round: u64 },
    Finished,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded { resource_id: String, zone: String },
    QuotaRejected { reason: String },
    AbortedByError { detail: String },
    Exhausted { rounds: u64 },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }
}

pub struct ProvisioningLoop<P, S> {
    provider: P,
    sleeper: S,
    guard: QuotaGuard,
    backoff: BackoffController,
    reporter: StatusReporter,
    attempt_delay: Duration,
    max_rounds: Option<u64>,
    phase: LoopPhase,
}

impl<P, S> ProvisioningLoop<P, S>
where
    P: ComputeProvider,
    S: Sleeper,
{
    pub fn new(provider: P, sleeper: S, settings: LoopSettings) -> Result<Self> {
        Ok(Self {
            provider,
            sleeper,
            guard: QuotaGuard::new(settings.quota),
            backoff: BackoffController::new(settings.backoff)?,
            reporter: StatusReporter::default(),
            attempt_delay: settings.attempt_delay,
            max_rounds: settings.max_rounds,
            phase: LoopPhase::Preflight,
        })
    }

    /// Replace the default silent reporter
    pub fn with_reporter(mut self, reporter: StatusReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }

    pub fn backoff(&self) -> &BackoffController {
        &self.backoff
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Drive the request to a terminal [`Outcome`]. Each call starts from the
    /// floor interval with an empty log.
    pub async fn run(&mut self, request: &ProvisioningRequest) -> Outcome {
        self.backoff.reset();
        self.reporter.clear();
        self.phase = LoopPhase::Preflight;
        let outcome = self.run_inner(request).await;
        self.phase = LoopPhase::Finished;

        match &outcome {
            Outcome::Succeeded { resource_id, zone } => {
                tracing::info!(%resource_id, %zone, "Provisioning succeeded");
            }
            Outcome::QuotaRejected { reason } => {
                tracing::warn!(%reason, "Provisioning rejected by quota guard");
            }
            Outcome::AbortedByError { detail } => {
                tracing::error!(%detail, "Provisioning aborted");
            }
            Outcome::Exhausted { rounds } => {
                tracing::warn!(rounds, "Provisioning gave up");
            }
        }
        outcome
    }

    async fn run_inner(&mut self, request: &ProvisioningRequest) -> Outcome {
        if let Some(rejected) = self.preflight(request).await {
            return rejected;
        }

        let rotator = match self.resolve_zones(request).await {
            Ok(rotator) => rotator,
            Err(detail) => return Outcome::AbortedByError { detail },
        };

        let mut cycle = rotator.cycle();
        self.backoff.begin_round();
        self.phase = LoopPhase::Running { round: 1 };
        tracing::info!(zones = rotator.round_len(), "Round 1 started");

        loop {
            let visit = cycle.next_visit();

            if visit.position > 0 && !self.attempt_delay.is_zero() {
                self.sleeper
                    .pause(Pause::BetweenAttempts(self.attempt_delay))
                    .await;
            }

            self.reporter.normal(format!(
                "Attempting to create a new instance in availability domain {}...",
                visit.zone
            ));
            let outcome = attempt(&self.provider, request, visit.zone, &mut self.reporter).await;
            self.backoff.observe(&outcome);

            if let AttemptOutcome::Success { resource_id, zone } = outcome {
                self.reporter.normal(format!(
                    "Successfully created instance {} with OCID {} in availability domain {}",
                    request.display_name, resource_id, zone
                ));
                return Outcome::Succeeded { resource_id, zone };
            }

            if !visit.closes_round {
                continue;
            }

            let wait = self.backoff.end_round();
            tracing::info!(
                round = visit.round,
                wait_secs = wait.as_secs(),
                "Round finished without success"
            );

            if self.max_rounds.is_some_and(|max| visit.round >= max) {
                self.reporter.normal(format!(
                    "Giving up after {} round(s) without success.",
                    visit.round
                ));
                return Outcome::Exhausted {
                    rounds: visit.round,
                };
            }

            self.reporter
                .normal(format!("Next retry attempt in {}...", describe_wait(wait)));
            self.sleeper.pause(Pause::BetweenRounds(wait)).await;

            self.backoff.begin_round();
            self.phase = LoopPhase::Running {
                round: visit.round + 1,
            };
            tracing::info!(round = visit.round + 1, "Round started");
        }
    }

    /// One listing, one verdict. Returns the terminal outcome if the run must stop.
    async fn preflight(&mut self, request: &ProvisioningRequest) -> Option<Outcome> {
        self.reporter
            .normal("Checking current instances and resource usage in account...");

        let instances = match self.provider.list_instances(&request.compartment_id).await {
            Ok(instances) => instances,
            Err(e) => {
                let detail = format!("Failed to list instances: {}", e);
                self.reporter.normal(detail.clone());
                return Some(Outcome::AbortedByError { detail });
            }
        };

        let snapshot = QuotaSnapshot::from_instances(&instances, self.guard.limits());
        self.report_usage(&instances, &snapshot);

        match self.guard.evaluate(request, &snapshot) {
            QuotaVerdict::Ok => None,
            QuotaVerdict::Violation { reason } => {
                self.reporter
                    .warning(format!("{}. Launch stopped.", reason));
                Some(Outcome::QuotaRejected { reason })
            }
        }
    }

    fn report_usage(&mut self, instances: &[InstanceInfo], snapshot: &QuotaSnapshot) {
        if snapshot.instances_seen == 0 {
            self.reporter.normal("No instances found!");
            return;
        }

        self.reporter
            .normal(format!("{} instance(s) found!", snapshot.instances_seen));
        for instance in instances {
            self.reporter.normal(format!(
                "{} - {} - {} ocpu(s) - {} GB(s) | State: {}",
                instance.display_name,
                instance.shape,
                instance.ocpus,
                instance.memory_in_gbs,
                instance.lifecycle_state
            ));
        }

        let limits = self.guard.limits();
        self.reporter.normal(format!(
            "Total {} OCPUs: {} - Total {} Memory: {} (GB)",
            limits.flexible_shape,
            snapshot.flexible_ocpus,
            limits.flexible_shape,
            snapshot.flexible_memory
        ));
        self.reporter.normal(format!(
            "Total {} instances: {}",
            limits.fixed_count_shape, snapshot.fixed_count
        ));
    }

    async fn resolve_zones(
        &mut self,
        request: &ProvisioningRequest,
    ) -> std::result::Result<ZoneRotator, String> {
        let zones = if request.zones.is_empty() {
            match self
                .provider
                .list_availability_domains(&request.compartment_id)
                .await
            {
                Ok(zones) => zones,
                Err(e) => {
                    let detail = format!("Failed to list availability domains: {}", e);
                    self.reporter.normal(detail.clone());
                    return Err(detail);
                }
            }
        } else {
            request.zones.clone()
        };

        match ZoneRotator::new(zones) {
            Ok(rotator) => {
                tracing::debug!(zones = ?rotator.zones(), "Zones resolved");
                Ok(rotator)
            }
            Err(e) => {
                self.reporter.normal(e.to_string());
                Err(e.to_string())
            }
        }
    }
}

/// Whole minutes when possible, seconds otherwise
fn describe_wait(wait: Duration) -> String {
    let secs = wait.as_secs();
    if secs == 60 {
        "1 minute".to_string()
    } else if secs > 60 && secs % 60 == 0 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{} seconds", secs)
    }
}
