use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::app::{App, Banner};
use crate::tui::navigation::Page as NavPage;
use crate::tui::pages::Page;

pub fn draw(frame: &mut Frame, app: &App) {
    let banner = banner_line(app);

    let mut constraints = vec![Constraint::Length(3)];
    if banner.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    app.navigation.render(frame, chunks[0]);

    let mut next = 1;
    if let Some((text, color)) = banner {
        let widget = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(widget, chunks[next]);
        next += 1;
    }

    let content = chunks[next];
    match app.navigation.current_page {
        NavPage::Holdings => app.holdings_page.render(frame, content, app),
        NavPage::Market => app.market_page.render(frame, content, app),
        NavPage::Metrics => app.metrics_page.render(frame, content, app),
    }

    render_footer(frame, chunks[next + 1], app);
}

/// Action banners take priority over fetch errors of the visible page
fn banner_line(app: &App) -> Option<(String, Color)> {
    match &app.banner {
        Some(Banner::Success(message)) => Some((message.clone(), Color::Green)),
        Some(Banner::Error(message)) => Some((message.clone(), Color::Red)),
        None => app
            .active_fetch_error()
            .map(|error| (format!("Unable to reach backend: {}", error), Color::Red)),
    }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = match app.navigation.current_page {
        NavPage::Holdings => "Tab/Shift+Tab: pages | Up/Down: select | s: sell | r: refresh | q/Esc: quit",
        NavPage::Market => "Tab/Shift+Tab: pages | type ticker + Enter: analyze | Ctrl+B: buy | Esc: quit",
        NavPage::Metrics => "Tab/Shift+Tab: pages | r: refresh | q/Esc: quit",
    };

    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
