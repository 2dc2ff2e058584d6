use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use pmo_plus::app::App;
use pmo_plus::config;
use pmo_plus::db::Database;
use pmo_plus::store::PgRecordStore;
use pmo_plus::telemetry::init_tracing;
use pmo_plus::ui::Section;

/// Terminal project-management office: projects, developers and their assignments
#[derive(Debug, Parser)]
#[command(name = "pmo-plus", version, about)]
struct Cli {
    /// Section shown at start-up
    #[arg(long, value_enum, default_value_t = Section::Dashboard)]
    screen: Section,

    /// Log file path, overrides PMO_LOG_FILE
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Missing store parameters are fatal before anything else starts
    let config = config::init()?;
    init_tracing(cli.log_file.as_deref().unwrap_or(config.log_file()))?;
    info!(project_id = config.project_id(), "starting PMO+");

    let store = PgRecordStore::connect(&config).await?;
    store.migrate().await?;
    let db = Database::new(Arc::new(store));
    println!("Record store connection established");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(db);
    app.open(cli.screen).await;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "application stopped");
        println!("Error: {}", err);
    }

    info!("PMO+ closed");
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key.code).await? {
                return Ok(());
            }
        }
    }
}
