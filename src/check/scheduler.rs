//! Periodic check trigger and the long-running watch loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at, sleep};
use tracing::{debug, error, info};

use crate::check::engine::{Trigger, UpdateDecisionEngine};
use crate::config::{INSTALL_CHECK_DELAY_MS, STARTUP_CHECK_DELAY_MS, UpdatePeriod};
use crate::version::store::UpdateStore;

/// Name of the periodic check trigger
pub const CHECK_TRIGGER_NAME: &str = "checkUpdate";

/// Owner of the single named periodic trigger
pub struct Scheduler<S: UpdateStore> {
    engine: Arc<UpdateDecisionEngine<S>>,
    handle: Option<JoinHandle<()>>,
    period: Option<UpdatePeriod>,
}

impl<S: UpdateStore> Scheduler<S> {
    pub fn new(engine: Arc<UpdateDecisionEngine<S>>) -> Self {
        Self {
            engine,
            handle: None,
            period: None,
        }
    }

    /// Replace the trigger with one firing every `period`; `Never` leaves none
    pub fn arm(&mut self, period: UpdatePeriod) {
        self.clear();
        self.period = Some(period);

        let Some(every) = period.interval() else {
            info!("Automatic checks disabled");
            return;
        };

        let engine = self.engine.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + every, every);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                debug!("Trigger {} fired", CHECK_TRIGGER_NAME);
                // Cycles outlive the ticker so clearing never cuts a check short
                let engine = engine.clone();
                tokio::spawn(async move {
                    engine.run_check_cycle(Trigger::Timer).await;
                });
            }
        }));
        info!("Automatic checks every {} days", period);
    }

    /// Re-arm only when the period differs from the armed one
    pub fn rearm_if_changed(&mut self, period: UpdatePeriod) -> bool {
        if self.period == Some(period) {
            return false;
        }
        info!("Update period changed to {}", period);
        self.arm(period);
        true
    }

    /// Remove the trigger; a check already started by it still completes
    pub fn clear(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Trigger {} cleared", CHECK_TRIGGER_NAME);
        }
        self.period = None;
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn period(&self) -> Option<UpdatePeriod> {
        self.period
    }
}

impl<S: UpdateStore> Drop for Scheduler<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Run the watcher until `shutdown` resolves.
///
/// Fires an install or startup check shortly after start, keeps the periodic
/// trigger armed with the stored period, and re-arms it whenever the stored
/// period changes.
pub async fn run_watch<S, F>(
    engine: Arc<UpdateDecisionEngine<S>>,
    settings_poll: Duration,
    shutdown: F,
) where
    S: UpdateStore,
    F: Future<Output = ()>,
{
    let store = engine.store().clone();

    let first_run = store
        .initialize()
        .inspect_err(|e| error!("Failed to initialize settings: {}", e))
        .unwrap_or(false);
    let (trigger, delay_ms) = if first_run {
        (Trigger::Install, INSTALL_CHECK_DELAY_MS)
    } else {
        (Trigger::Startup, STARTUP_CHECK_DELAY_MS)
    };
    info!("Watcher started ({})", trigger);

    let mut scheduler = Scheduler::new(engine.clone());
    scheduler.arm(read_period(&*store).unwrap_or_default());

    let initial_check = {
        let engine = engine.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            engine.run_check_cycle(trigger).await;
        })
    };

    let mut poll = interval(settings_poll);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = poll.tick() => {
                if let Some(period) = read_period(&*store) {
                    scheduler.rearm_if_changed(period);
                }
            }
            _ = &mut shutdown => {
                info!("Watcher shutting down");
                break;
            }
        }
    }

    initial_check.abort();
    scheduler.clear();
}

/// Stored update period, `None` when the store cannot be read
fn read_period<S: UpdateStore>(store: &S) -> Option<UpdatePeriod> {
    store
        .get()
        .map(|record| record.update_period)
        .inspect_err(|e| error!("Failed to read update period: {}", e))
        .ok()
}
