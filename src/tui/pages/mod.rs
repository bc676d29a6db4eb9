use crate::tui::App;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

pub mod holdings;
pub mod market;
pub mod metrics;

pub use holdings::HoldingsPage;
pub use market::MarketPage;
pub use metrics::MetricsPage;

pub trait Page {
    fn render(&self, frame: &mut Frame, area: Rect, app: &App);
    fn handle_key(&mut self, key: KeyEvent, app: &mut App) -> bool;
}
