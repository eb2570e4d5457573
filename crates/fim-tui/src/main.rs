// Draft board entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Pick the draft to open (command line, then config)
// 4. Build the API client
// 5. Create mpsc channels
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::sync::Arc;

use fim_client::{ApiClient, DataSource};
use fim_tui::app;
use fim_tui::config;
use fim_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Draft board starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: api={}, refresh every {}s",
        config.api.base_url, config.draft.refresh_interval_secs
    );

    // 3. Draft id: `fim-draft [DRAFT_ID]`, falling back to the config file
    let initial_draft = match std::env::args().nth(1) {
        Some(arg) => Some(
            arg.parse::<u32>()
                .with_context(|| format!("invalid draft id: {arg}"))?,
        ),
        None => config.draft.draft_id,
    };
    match initial_draft {
        Some(id) => info!("Opening draft {} at startup", id),
        None => info!("No draft given; listing leagues"),
    }

    // 4. API client
    let client = ApiClient::new(&config.api.base_url, config.timeout())
        .context("failed to build API client")?;
    let source: Arc<dyn DataSource> = Arc::new(client);

    // 5. Create mpsc channels
    let (fetch_tx, fetch_rx) = mpsc::channel(app::FETCH_CHANNEL_CAPACITY);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config, source, fetch_tx);

    // 6. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(fetch_rx, cmd_rx, ui_tx, app_state, initial_draft).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. Run the TUI event loop (blocking until user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Draft board shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("fim-draft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fim_tui=info,fim_client=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
