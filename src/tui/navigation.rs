use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Holdings,
    Market,
    Metrics,
}

impl Page {
    pub fn all() -> Vec<Page> {
        vec![Page::Holdings, Page::Market, Page::Metrics]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Holdings => "Holdings",
            Page::Market => "Market",
            Page::Metrics => "Metrics",
        }
    }

    pub fn next(&self) -> Page {
        let pages = Self::all();
        let current_index = pages.iter().position(|p| p == self).unwrap_or(0);
        pages[(current_index + 1) % pages.len()]
    }

    pub fn previous(&self) -> Page {
        let pages = Self::all();
        let current_index = pages.iter().position(|p| p == self).unwrap_or(0);
        let prev_index = if current_index == 0 {
            pages.len() - 1
        } else {
            current_index - 1
        };
        pages[prev_index]
    }
}

pub struct Navigation {
    pub current_page: Page,
}

impl Navigation {
    pub fn new() -> Self {
        Self {
            current_page: Page::Holdings,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let pages = Page::all();
        let titles: Vec<Line> = pages.iter().map(|page| Line::from(page.title())).collect();

        let current_index = pages
            .iter()
            .position(|p| p == &self.current_page)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("folioterm"))
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .select(current_index);

        frame.render_widget(tabs, area);
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cycle_wraps() {
        assert_eq!(Page::Holdings.next(), Page::Market);
        assert_eq!(Page::Metrics.next(), Page::Holdings);
        assert_eq!(Page::Holdings.previous(), Page::Metrics);
    }
}
