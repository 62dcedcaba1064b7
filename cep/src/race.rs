//! Race coordinator
//!
//! Fans one CEP out to every provider, each on its own tokio task, and
//! resolves on the first accepted outcome or the global deadline.
//!
//! Every worker owns a oneshot sender and sends exactly once, so the
//! coordinator's select can never wait on a silent worker. Channels that
//! lose the race are dropped without being drained; by default the losing
//! tasks keep running until their request finishes (abandonment).

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::model::{LookupOutcome, ProviderId, RaceResult};
use crate::provider::{CepProvider, LookupError};

/// Default global deadline
pub const DEFAULT_RACE_TIMEOUT: Duration = Duration::from_secs(1);

/// Which outcomes are allowed to resolve a race
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RacePolicy {
    /// The first outcome of any kind wins, failures included
    #[default]
    FirstCompletion,

    /// Failures are logged and skipped; only a success wins
    FirstSuccess,
}

impl RacePolicy {
    fn accepts(&self, outcome: &LookupOutcome) -> bool {
        match self {
            RacePolicy::FirstCompletion => true,
            RacePolicy::FirstSuccess => outcome.is_success(),
        }
    }
}

/// Coordinator settings
#[derive(Debug, Clone)]
pub struct RaceConfig {
    pub timeout: Duration,
    pub policy: RacePolicy,
    pub cancel_losers: bool,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_RACE_TIMEOUT,
            policy: RacePolicy::default(),
            cancel_losers: false,
        }
    }
}

/// Runs one race per call across a fixed set of providers
pub struct RaceCoordinator {
    providers: Vec<Arc<dyn CepProvider>>,
    config: RaceConfig,
}

impl RaceCoordinator {
    pub fn new(providers: Vec<Arc<dyn CepProvider>>, config: RaceConfig) -> Self {
        debug!(provider_count = providers.len(), ?config, "RaceCoordinator::new: called");
        Self { providers, config }
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Race every provider for `cep`
    ///
    /// Returns exactly one terminal result. `AllFailed` normally only comes
    /// out of the first-success policy; the exception is a coordinator with
    /// no providers, which ends immediately as `AllFailed` with no outcomes
    /// under either policy.
    pub async fn race(&self, cep: &str) -> RaceResult {
        debug!(%cep, policy = ?self.config.policy, timeout = ?self.config.timeout, "race: called");
        let started = Instant::now();

        let mut workers = Vec::with_capacity(self.providers.len());
        let mut pending = FuturesUnordered::new();

        for provider in &self.providers {
            let (tx, rx) = oneshot::channel();
            let id = provider.id();
            workers.push(spawn_worker(Arc::clone(provider), cep.to_string(), tx));
            pending.push(async move {
                match rx.await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        // Sender dropped without sending: the task panicked or was aborted
                        LookupOutcome::Failure {
                            provider: id,
                            error: LookupError::WorkerLost,
                        }
                    }
                }
            });
        }

        let deadline = tokio::time::sleep(self.config.timeout);
        tokio::pin!(deadline);

        let mut rejected = Vec::new();
        let result = loop {
            tokio::select! {
                next = pending.next() => match next {
                    Some(outcome) if self.config.policy.accepts(&outcome) => {
                        debug!(provider = %outcome.provider(), success = outcome.is_success(), "race: outcome accepted");
                        break RaceResult::Won(outcome);
                    }
                    Some(outcome) => {
                        debug!(provider = %outcome.provider(), "race: failure skipped, waiting on remaining workers");
                        rejected.push(outcome);
                    }
                    None => {
                        debug!(failures = rejected.len(), "race: every worker reported without an accepted outcome");
                        break RaceResult::AllFailed(rejected);
                    }
                },
                _ = &mut deadline => {
                    debug!("race: deadline fired");
                    break RaceResult::TimedOut(self.config.timeout);
                }
            }
        };

        let elapsed = started.elapsed();
        match &result {
            RaceResult::Won(outcome) => {
                info!(provider = %outcome.provider(), success = outcome.is_success(), ?elapsed, "race: resolved");
            }
            RaceResult::TimedOut(timeout) => {
                warn!(?timeout, ?elapsed, "race: timed out");
            }
            RaceResult::AllFailed(outcomes) => {
                warn!(failures = outcomes.len(), ?elapsed, "race: all providers failed");
            }
        }

        if self.config.cancel_losers {
            debug!(workers = workers.len(), "race: cancelling remaining workers");
            for worker in &workers {
                // No-op for tasks that already finished
                worker.abort();
            }
        } else {
            debug!(workers = workers.len(), "race: abandoning remaining workers");
        }

        result
    }
}

/// One lookup on its own task; always sends on `tx` unless it panics
fn spawn_worker(provider: Arc<dyn CepProvider>, cep: String, tx: oneshot::Sender<LookupOutcome>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let id = provider.id();
        debug!(provider = %id, %cep, "worker: started");

        let result = provider.lookup(&cep).await;
        if let Err(e) = &result {
            warn!(provider = %id, kind = e.kind(), error = %e, "worker: lookup failed");
        }

        if tx.send(LookupOutcome::from_result(id.clone(), result)).is_err() {
            debug!(provider = %id, "worker: race already resolved, result discarded");
        } else {
            debug!(provider = %id, "worker: result delivered");
        }
    })
}
