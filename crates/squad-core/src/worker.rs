use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::ScrapeConfig;
use crate::error::AppError;
use crate::models::TeamReference;
use crate::scrape::{RosterOutcome, ScrapeService};
use crate::traits::{Fetcher, PlayerStore};

/// Events emitted by the worker for monitoring/logging.
#[derive(Debug, Clone)]
pub enum WorkerEvent<'a> {
    Started {
        worker_id: &'a str,
    },
    CycleStarted {
        cycle: u64,
    },
    TeamsDiscovered {
        count: usize,
    },
    DiscoveryFailed {
        error: &'a str,
    },
    TeamCompleted {
        outcome: &'a RosterOutcome,
    },
    TeamFailed {
        team_name: &'a str,
        error: &'a str,
        page_fatal: bool,
    },
    CycleFinished {
        cycle: u64,
        completed: usize,
        failed: usize,
    },
    Stopped {
        worker_id: &'a str,
    },
}

/// Trait for receiving worker events (decoupled logging).
pub trait WorkerReporter: Send + Sync {
    fn report(&self, event: WorkerEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingWorkerReporter;

impl WorkerReporter for TracingWorkerReporter {
    fn report(&self, event: WorkerEvent<'_>) {
        match event {
            WorkerEvent::Started { worker_id } => {
                tracing::info!(%worker_id, "Worker started");
            }
            WorkerEvent::CycleStarted { cycle } => {
                tracing::info!(%cycle, "Scrape cycle started");
            }
            WorkerEvent::TeamsDiscovered { count } => {
                tracing::info!(%count, "Dispatching roster jobs");
            }
            WorkerEvent::DiscoveryFailed { error } => {
                tracing::warn!(%error, "Team discovery failed");
            }
            WorkerEvent::TeamCompleted { outcome } => {
                tracing::info!(
                    team = %outcome.team_name,
                    records = outcome.records.len(),
                    failures = outcome.failures.len(),
                    upserted = outcome.upserted,
                    "Roster job completed"
                );
            }
            WorkerEvent::TeamFailed {
                team_name,
                error,
                page_fatal,
            } => {
                tracing::warn!(team = %team_name, %error, %page_fatal, "Roster job failed");
            }
            WorkerEvent::CycleFinished {
                cycle,
                completed,
                failed,
            } => {
                tracing::info!(%cycle, %completed, %failed, "Scrape cycle finished");
            }
            WorkerEvent::Stopped { worker_id } => {
                tracing::info!(%worker_id, "Worker stopped");
            }
        }
    }
}

/// A roster job that produced no records.
#[derive(Debug, Clone)]
pub struct TeamFailure {
    pub team_name: String,
    pub error: String,
    pub page_fatal: bool,
}

/// What one discovery + dispatch cycle achieved.
#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    pub completed: Vec<RosterOutcome>,
    pub failed: Vec<TeamFailure>,
}

/// Periodically discovers teams and runs one roster job per team.
pub struct RosterWorker<F, S>
where
    F: Fetcher,
    S: PlayerStore,
{
    service: ScrapeService<F, S>,
    config: ScrapeConfig,
    worker_id: String,
}

impl<F, S> RosterWorker<F, S>
where
    F: Fetcher + 'static,
    S: PlayerStore + 'static,
{
    pub fn new(service: ScrapeService<F, S>, config: ScrapeConfig) -> Self {
        Self {
            service,
            config,
            worker_id: format!("worker-{}", &Uuid::new_v4().to_string()[..8]),
        }
    }

    pub fn with_worker_id(mut self, id: impl Into<String>) -> Self {
        self.worker_id = id.into();
        self
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Run cycles every `config.interval` until cancellation.
    pub async fn run<WR: WorkerReporter>(
        &self,
        cancel_token: CancellationToken,
        reporter: &WR,
    ) -> Result<(), AppError> {
        reporter.report(WorkerEvent::Started {
            worker_id: &self.worker_id,
        });

        let mut cycle = 0;
        loop {
            if cancel_token.is_cancelled() {
                break;
            }

            cycle += 1;
            reporter.report(WorkerEvent::CycleStarted { cycle });

            tokio::select! {
                result = self.run_cycle(reporter) => {
                    // Discovery failures are already reported; try again next tick.
                    if let Ok(summary) = result {
                        reporter.report(WorkerEvent::CycleFinished {
                            cycle,
                            completed: summary.completed.len(),
                            failed: summary.failed.len(),
                        });
                    }
                }
                () = cancel_token.cancelled() => break,
            }

            tokio::select! {
                () = tokio::time::sleep(self.config.interval) => {}
                () = cancel_token.cancelled() => break,
            }
        }

        reporter.report(WorkerEvent::Stopped {
            worker_id: &self.worker_id,
        });

        Ok(())
    }

    /// Discover teams once and scrape every roster.
    ///
    /// Teams run concurrently, at most `config.max_concurrent_teams` at a
    /// time, each bounded by `config.team_timeout`. A failing team never
    /// affects the others. Fails only when the listing itself fails.
    pub async fn run_cycle<WR: WorkerReporter>(
        &self,
        reporter: &WR,
    ) -> Result<CycleSummary, AppError> {
        let teams = match self.service.discover_teams(&self.config.listing_url()).await {
            Ok(teams) => teams,
            Err(e) => {
                reporter.report(WorkerEvent::DiscoveryFailed {
                    error: &e.to_string(),
                });
                return Err(e);
            }
        };
        reporter.report(WorkerEvent::TeamsDiscovered { count: teams.len() });

        let mut summary = CycleSummary::default();
        let mut jobs = JoinSet::new();
        let max_in_flight = self.config.max_concurrent_teams.max(1);

        for team in teams {
            while jobs.len() >= max_in_flight {
                if let Some(joined) = jobs.join_next().await {
                    self.collect(joined, &mut summary, reporter);
                }
            }
            jobs.spawn(Self::roster_job(
                self.service.clone(),
                team,
                self.config.team_timeout,
            ));
        }
        while let Some(joined) = jobs.join_next().await {
            self.collect(joined, &mut summary, reporter);
        }

        Ok(summary)
    }

    async fn roster_job(
        service: ScrapeService<F, S>,
        team: TeamReference,
        timeout: Duration,
    ) -> (TeamReference, Result<RosterOutcome, AppError>) {
        let result = match tokio::time::timeout(timeout, service.scrape_team(&team)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(timeout.as_secs())),
        };
        (team, result)
    }

    fn collect<WR: WorkerReporter>(
        &self,
        joined: Result<(TeamReference, Result<RosterOutcome, AppError>), tokio::task::JoinError>,
        summary: &mut CycleSummary,
        reporter: &WR,
    ) {
        match joined {
            Ok((_, Ok(outcome))) => {
                reporter.report(WorkerEvent::TeamCompleted { outcome: &outcome });
                summary.completed.push(outcome);
            }
            Ok((team, Err(e))) => {
                let failure = TeamFailure {
                    team_name: team.team_name,
                    error: e.to_string(),
                    page_fatal: e.is_page_fatal(),
                };
                reporter.report(WorkerEvent::TeamFailed {
                    team_name: &failure.team_name,
                    error: &failure.error,
                    page_fatal: failure.page_fatal,
                });
                summary.failed.push(failure);
            }
            Err(e) => {
                tracing::error!(error = %e, "Roster job panicked");
            }
        }
    }
}
