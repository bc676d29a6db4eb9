use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::client::types::ActivePosition;
use crate::display::{format_pnl_pct, format_score};
use crate::tui::widgets::{FormAction, SellForm};
use crate::tui::App;

/// Holdings page: polled position list with a sell modal
#[derive(Default)]
pub struct HoldingsPage {
    pub selected_position: usize,
    pub sell_form: SellForm,
}

impl HoldingsPage {
    fn positions(app: &App) -> Vec<ActivePosition> {
        app.holdings.snapshot().data.unwrap_or_default()
    }

    fn render_positions_table(&self, frame: &mut Frame, area: Rect, app: &App) {
        let state = app.holdings.snapshot();

        if state.loading {
            let loading = Paragraph::new("Loading positions...")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title("Positions"));
            frame.render_widget(loading, area);
            return;
        }

        let positions = state.data.unwrap_or_default();

        let header = Row::new(vec![
            "Ticker", "Net Qty", "Avg Cost", "Price", "PnL %", "Rec", "Signal", "Prob 90d", "",
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                let style = if i == self.selected_position {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let decision = position.last_decision.as_ref();
                let rec = decision
                    .and_then(|d| d.rec.clone())
                    .unwrap_or_else(|| "N/A".to_string());

                let pnl_style = if position.unrealized_pnl_pct >= 0.0 {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                };

                let trigger = if position.sell_trigger { "SELL!" } else { "" };

                Row::new(vec![
                    Cell::from(position.ticker.clone()),
                    Cell::from(format!("{:.4}", position.net_qty)),
                    Cell::from(format!("${:.2}", position.avg_cost)),
                    Cell::from(format!("${:.2}", position.current_price)),
                    Cell::from(format_pnl_pct(position.unrealized_pnl_pct)).style(pnl_style),
                    Cell::from(rec),
                    Cell::from(format_score(decision.and_then(|d| d.signal_score))),
                    Cell::from(format_score(decision.and_then(|d| d.prob_outperform_90d))),
                    Cell::from(trigger).style(Style::default().fg(Color::Yellow)),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            &[
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(9),
                Constraint::Length(6),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Positions ({}) - s sell, r refresh",
            positions.len()
        )));

        frame.render_widget(table, area);
    }

    fn render_position_details(&self, frame: &mut Frame, area: Rect, app: &App) {
        let positions = Self::positions(app);

        let content = if let Some(position) = positions.get(self.selected_position) {
            let mut lines = vec![
                format!("Ticker: {}", position.ticker),
                format!("Net Qty: {:.4}", position.net_qty),
                format!("Avg Cost: ${:.2}", position.avg_cost),
                format!("Current Price: ${:.2}", position.current_price),
                format!(
                    "Unrealized PnL: {}",
                    format_pnl_pct(position.unrealized_pnl_pct)
                ),
            ];

            if let Some(decision) = &position.last_decision {
                lines.push(format!(
                    "Last Rec: {}",
                    decision.rec.as_deref().unwrap_or("N/A")
                ));
                lines.push(format!(
                    "Signal Score: {}",
                    format_score(decision.signal_score)
                ));
                lines.push(format!(
                    "Prob Outperform 90d: {}",
                    format_score(decision.prob_outperform_90d)
                ));
                if let Some(changed) = &decision.what_changed_since_last {
                    lines.push(format!("What Changed: {}", changed.join("; ")));
                }
            } else {
                lines.push("Last Rec: N/A".to_string());
            }

            if position.sell_trigger {
                lines.push(String::new());
                let reason = if position.sell_reason.is_empty() {
                    "Sell conditions triggered."
                } else {
                    &position.sell_reason
                };
                lines.push(format!("SELL TRIGGER: {}", reason));
            }

            lines.join("\n")
        } else {
            "No position selected".to_string()
        };

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Position Details"),
        );

        frame.render_widget(paragraph, area);
    }
}

impl super::Page for HoldingsPage {
    fn render(&self, frame: &mut Frame, area: Rect, app: &App) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        self.render_positions_table(frame, chunks[0], app);
        self.render_position_details(frame, chunks[1], app);

        if self.sell_form.open {
            self.sell_form.render(frame, app.submitting);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        if self.sell_form.open {
            match self.sell_form.handle_key(key, app.submitting) {
                FormAction::Submit => match self.sell_form.payload() {
                    Ok(payload) => app.submit_sell(payload),
                    Err(message) => app.show_error(message),
                },
                FormAction::Cancel => self.sell_form.close(),
                FormAction::Consumed => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Up => {
                self.selected_position = self.selected_position.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                let count = Self::positions(app).len();
                if count > 0 {
                    self.selected_position = (self.selected_position + 1).min(count - 1);
                }
                true
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if let Some(position) = Self::positions(app).get(self.selected_position) {
                    app.clear_banner();
                    self.sell_form.open_for(&position.ticker);
                }
                true
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                app.holdings.request_refresh();
                true
            }
            _ => false,
        }
    }
}
