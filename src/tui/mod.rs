use anyhow::Result;
use crossterm::{
    cursor,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing::info;

pub mod app;
pub mod events;
pub mod navigation;
pub mod pages;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Run the dashboard until the user quits, restoring the terminal even
/// when the draw loop panics.
pub async fn run(mut app: App) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
        original_hook(panic);
    }));

    let result = run_loop(&mut app).await;

    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);

    result
}

async fn run_loop(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut events = EventHandler::new(TICK_RATE);

    info!("Dashboard started");

    while let Some(event) = events.next().await {
        match event {
            Event::Tick => app.drain_messages(),
            Event::Key(key) => app.handle_key(key),
            Event::Error(message) => app.show_error(message),
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        if app.should_quit {
            break;
        }
    }

    info!("Dashboard stopped");
    Ok(())
}
