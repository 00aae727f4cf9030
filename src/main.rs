use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;

use pulsetop::app::App;
use pulsetop::config::{self, load_config, load_config_from_path};
use pulsetop::event::{Event, EventHandler};
use pulsetop::ui;

#[derive(Parser)]
#[command(
    name = "pulsetop",
    about = "Continuously refreshing terminal performance monitor"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Startup pane toggles, same characters as the interactive keys
    /// (e.g. "cdmnP")
    #[arg(long)]
    panes: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    let mut terminal = ratatui::init();

    // Always restore the terminal, even when a draw or a panic unwinds.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config).await;

    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: config::Config,
) -> Result<()> {
    let mut app = App::new(config);
    if let Some(toggles) = config::env_toggles() {
        app.apply_toggles(&toggles);
    }
    let mut events = EventHandler::new();

    while app.running {
        app.maybe_sample();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Block for at most one refresh interval waiting for input; a
        // timeout is not an error, it just means nothing changed.
        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Event::Key(key)) => {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        let command = app.map_key(key);
                        app.dispatch(command);
                    }
                }
                Some(Event::Resize) => {}
                None => break,
            },
            _ = tokio::time::sleep(app.time_until_due()) => {}
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref panes) = cli.panes {
        config.general.panes = panes.clone();
    }

    config
}
