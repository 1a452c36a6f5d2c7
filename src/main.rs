use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use incident_map::app::App;
use incident_map::config::Cli;
use incident_map::dashboard::Dashboard;
use incident_map::data::{basemap, Dataset};
use incident_map::map::BaseMap;
use incident_map::ui;
use ratatui::DefaultTerminal;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;

    let app = setup(&cli)?;

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, app);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Load the dataset and basemap and compose the first page
fn setup(cli: &Cli) -> Result<App> {
    let dataset = Dataset::load(&cli.data)
        .with_context(|| format!("loading incidents from {}", cli.data.display()))?;
    log::info!("Loaded {} incidents", dataset.len());

    let mut dashboard = Dashboard::new(dataset)?;
    cli.apply_selection(dashboard.filter_mut())
        .context("applying initial selection")?;

    let mut basemap = BaseMap::new();
    if cli.basemap.exists() {
        basemap::load_dir(&mut basemap, &cli.basemap);
    }

    // Fall back to simple world if no data loaded
    if !basemap.has_data() {
        log::info!("No basemap data found, using built-in outlines");
        basemap::generate_simple_world(&mut basemap);
    }

    Ok(App::new(dashboard, basemap)?)
}

/// Scroll wheel steps the focused control
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.adjust(-1),
        MouseEventKind::ScrollDown => app.adjust(1),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            KeyCode::Tab => app.focus_next(),
                            KeyCode::BackTab => app.focus_prev(),

                            KeyCode::Up | KeyCode::Char('k') => app.adjust(-1),
                            KeyCode::Down | KeyCode::Char('j') => app.adjust(1),
                            KeyCode::Left | KeyCode::Char('h') => app.adjust(-1),
                            KeyCode::Right | KeyCode::Char('l') => app.adjust(1),
                            KeyCode::PageUp => app.adjust(-5),
                            KeyCode::PageDown => app.adjust(5),

                            KeyCode::Char('r') | KeyCode::Char('0') => app.reset(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
