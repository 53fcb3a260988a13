use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use chromium_update_notifier::check::engine::{CheckOutcome, Trigger, UpdateDecisionEngine};
use chromium_update_notifier::check::notifier::{ConsoleNotifier, open_page};
use chromium_update_notifier::check::scheduler::run_watch;
use chromium_update_notifier::check::settings::SettingsForm;
use chromium_update_notifier::config::{self, AppConfig};
use chromium_update_notifier::logging;
use chromium_update_notifier::version::sources::ReleaseIndexSource;
use chromium_update_notifier::version::store::{SettingsStore, UpdateStore};

#[derive(Parser)]
#[command(name = "chromium-update-notifier")]
#[command(version, about = "Notifies when a new ungoogled-chromium Windows build is published")]
struct Cli {
    /// Directory holding settings, config and log file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Keep running: check on start-up and every update period (default)
    Watch,
    /// Run one check now and wait for the result
    Check,
    /// Show recorded and latest versions
    Status,
    /// Save settings; omitted options keep their stored value
    Configure {
        /// Installed version, e.g. 136.0.7103.92
        #[arg(long)]
        current_version: Option<String>,
        /// x64, x86 or arm
        #[arg(long)]
        architecture: Option<String>,
        /// never, 1, 7, 30 or any number of days from 1 to 365
        #[arg(long)]
        period: Option<String>,
    },
    /// Open the release page in the default browser
    Open,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(config::data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let _log_guard = logging::init(&data_dir, cli.verbose)?;
    let app_config = AppConfig::load(&config::config_path(&data_dir))?;
    let store = Arc::new(SettingsStore::new(&config::db_path(&data_dir))?);

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => runtime()?.block_on(watch(store, &app_config)),
        Command::Check => runtime()?.block_on(check(store, &app_config)),
        Command::Status => status(&*store),
        Command::Configure {
            current_version,
            architecture,
            period,
        } => configure(&*store, current_version, architecture, period),
        Command::Open => open_release_page(&*store, &app_config),
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

fn build_engine(
    store: Arc<SettingsStore>,
    app_config: &AppConfig,
) -> anyhow::Result<Arc<UpdateDecisionEngine<SettingsStore>>> {
    let source = ReleaseIndexSource::new(&app_config.fetch)?;
    Ok(Arc::new(UpdateDecisionEngine::new(
        store,
        Arc::new(source),
        Arc::new(ConsoleNotifier),
    )))
}

async fn watch(store: Arc<SettingsStore>, app_config: &AppConfig) -> anyhow::Result<()> {
    let engine = build_engine(store, app_config)?;
    let poll = Duration::from_millis(app_config.scheduler.settings_poll_ms);

    run_watch(engine, poll, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;

    Ok(())
}

async fn check(store: Arc<SettingsStore>, app_config: &AppConfig) -> anyhow::Result<()> {
    let engine = build_engine(store, app_config)?;

    match engine.run_check_cycle(Trigger::Manual).await {
        CheckOutcome::UpdateAvailable { .. } => {}
        CheckOutcome::UpToDate { current, latest } => {
            println!("Up to date: {} (latest {})", current, latest);
        }
        CheckOutcome::Failed { reason } => {
            println!("Check failed: {}", reason);
        }
    }

    Ok(())
}

fn status(store: &SettingsStore) -> anyhow::Result<()> {
    let record = store.get()?;
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    println!("Current version: {}", record.current_version);
    println!("Latest version:  {}", or_dash(&record.latest_version));
    println!("Architecture:    {}", record.architecture);
    let period_kind = if record.update_period.is_preset() {
        "preset"
    } else {
        "custom"
    };
    println!(
        "Update period:   {} ({})",
        record.update_period, period_kind
    );
    println!("Last checked:    {}", or_dash(&record.last_checked));
    if let Some(badge) = record.update_badge() {
        println!("Status:          {}", badge);
    }
    if let Some(error) = &record.error {
        println!("Error:           {}", error);
    }

    Ok(())
}

fn configure(
    store: &SettingsStore,
    current_version: Option<String>,
    architecture: Option<String>,
    period: Option<String>,
) -> anyhow::Result<()> {
    let mut record = store.get()?;

    let form = SettingsForm {
        current_version: current_version.unwrap_or_else(|| record.current_version.clone()),
        architecture: architecture.unwrap_or_else(|| record.architecture.to_string()),
        update_period: period.unwrap_or_else(|| record.update_period.to_string()),
    };
    let patch = form.validate()?;

    store.set(patch.clone())?;
    record.apply(patch);
    info!("Settings saved");

    println!(
        "Settings saved: version {}, architecture {}, period {}",
        record.current_version, record.architecture, record.update_period
    );
    Ok(())
}

fn open_release_page(store: &SettingsStore, app_config: &AppConfig) -> anyhow::Result<()> {
    let record = store.get()?;
    let url = record
        .page_url
        .unwrap_or_else(|| record.architecture.page_url(&app_config.fetch.base_url));

    open_page(&url).with_context(|| format!("Failed to open {}", url))?;
    Ok(())
}
