//! One fetch → scan → decide → persist cycle
//!
//! ```text
//! Idle ─▶ Fetching ─▶ Scanning ─▶ Deciding ─┬─▶ UpdateAvailable
//!             │           │                 └─▶ UpToDate
//!             └───────────┴──────────────────▶ FetchFailed
//! ```
//!
//! Every terminal state returns to `Idle`. Failures are persisted and never
//! escape the cycle, so the scheduler keeps running after a bad check.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::check::notifier::{Notifier, UpdateNotification};
use crate::version::comparator::compare;
use crate::version::error::CheckError;
use crate::version::scanner::ReleasePageScanner;
use crate::version::source::PageSource;
use crate::version::store::UpdateStore;
use crate::version::token::VersionToken;
use crate::version::types::{Indicator, RecordPatch};

/// What started a check cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Periodic scheduler tick
    Timer,
    /// First run with a fresh settings store
    Install,
    /// Watcher restarted with existing settings
    Startup,
    /// Explicit user request
    Manual,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Timer => "timer",
            Trigger::Install => "install",
            Trigger::Startup => "startup",
            Trigger::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// States a cycle moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Fetching,
    Scanning,
    Deciding,
    UpdateAvailable,
    UpToDate,
    FetchFailed,
}

/// Result of a completed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    UpdateAvailable {
        current: String,
        latest: String,
        page_url: String,
    },
    UpToDate {
        current: String,
        latest: String,
    },
    Failed {
        reason: String,
    },
}

impl CheckOutcome {
    /// Terminal state this outcome corresponds to
    pub fn state(&self) -> CycleState {
        match self {
            CheckOutcome::UpdateAvailable { .. } => CycleState::UpdateAvailable,
            CheckOutcome::UpToDate { .. } => CycleState::UpToDate,
            CheckOutcome::Failed { .. } => CycleState::FetchFailed,
        }
    }
}

pub struct UpdateDecisionEngine<S: UpdateStore> {
    store: Arc<S>,
    source: Arc<dyn PageSource>,
    notifier: Arc<dyn Notifier>,
    scanner: ReleasePageScanner,
    /// Held for the whole cycle so overlapping triggers run one after another
    in_flight: Mutex<()>,
}

fn transition(from: CycleState, to: CycleState) -> CycleState {
    debug!("Check cycle {:?} -> {:?}", from, to);
    to
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl<S: UpdateStore> UpdateDecisionEngine<S> {
    pub fn new(store: Arc<S>, source: Arc<dyn PageSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            source,
            notifier,
            scanner: ReleasePageScanner::new(),
            in_flight: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Run one complete check cycle.
    ///
    /// Never fails: fetch, scan and store errors end the cycle in
    /// [`CheckOutcome::Failed`] after being persisted.
    pub async fn run_check_cycle(&self, trigger: Trigger) -> CheckOutcome {
        let _guard = self.in_flight.lock().await;
        info!("Starting update check ({})", trigger);

        let outcome = match self.check().await {
            Ok(outcome) => outcome,
            Err(e) => self.fail(e),
        };

        info!("Update check finished: {:?}", outcome.state());
        transition(outcome.state(), CycleState::Idle);
        outcome
    }

    async fn check(&self) -> Result<CheckOutcome, CheckError> {
        let mut state = CycleState::Idle;

        let record = self.store.get()?;
        let current = record.current_version;
        info!(
            "Current version: {}, architecture: {}",
            current, record.architecture
        );

        state = transition(state, CycleState::Fetching);
        let page = self.source.fetch_page(record.architecture).await?;

        state = transition(state, CycleState::Scanning);
        let latest = self
            .scanner
            .scan(&page.body)
            .ok_or(CheckError::NoVersionFound)?;
        info!("Latest version found: {} on {}", latest, page.url);

        state = transition(state, CycleState::Deciding);
        let ordering = compare(&current, &latest);
        debug!(
            "{} ({}) compared to {} ({}): {:?}",
            current,
            VersionToken::normalize(&current),
            latest,
            VersionToken::normalize(&latest),
            ordering
        );

        if ordering == Ordering::Less {
            transition(state, CycleState::UpdateAvailable);
            self.store.set(RecordPatch::checked(
                &latest,
                &page.url,
                timestamp(),
                Indicator::New,
            ))?;
            self.notifier.set_indicator(Indicator::New);
            self.notifier.notify_update(&UpdateNotification {
                current_version: current.clone(),
                latest_version: latest.clone(),
                page_url: page.url.clone(),
            });

            Ok(CheckOutcome::UpdateAvailable {
                current,
                latest,
                page_url: page.url,
            })
        } else {
            transition(state, CycleState::UpToDate);
            self.store.set(RecordPatch::checked(
                &latest,
                &page.url,
                timestamp(),
                Indicator::UpToDate,
            ))?;
            self.notifier.set_indicator(Indicator::UpToDate);

            Ok(CheckOutcome::UpToDate { current, latest })
        }
    }

    fn fail(&self, e: CheckError) -> CheckOutcome {
        match &e {
            CheckError::NoVersionFound => warn!("Could not determine latest version: {}", e),
            _ => error!("Update check failed: {}", e),
        }

        let reason = e.to_string();
        let _ = self
            .store
            .set(RecordPatch::failed(reason.clone(), timestamp()))
            .inspect_err(|e| error!("Failed to save check error: {}", e));
        self.notifier.set_indicator(Indicator::Warning);

        CheckOutcome::Failed { reason }
    }
}
