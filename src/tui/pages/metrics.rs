use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::client::types::MetricsResponse;
use crate::display::{format_drawdown, format_sharpe, format_win_rate};
use crate::tui::App;

/// Metrics page: scalar performance cards plus the equity curve
#[derive(Default)]
pub struct MetricsPage;

impl MetricsPage {
    fn render_metric_cards(&self, frame: &mut Frame, area: Rect, metrics: &MetricsResponse) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(area);

        let cards = [
            ("Sharpe", format_sharpe(metrics.sharpe)),
            ("Max Drawdown", format_drawdown(metrics.max_drawdown)),
            ("Win Rate", format_win_rate(metrics.win_rate)),
        ];

        for (i, (title, value)) in cards.iter().enumerate() {
            let card = Paragraph::new(value.as_str())
                .style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(*title));
            frame.render_widget(card, chunks[i]);
        }
    }

    fn render_equity_chart(&self, frame: &mut Frame, area: Rect, metrics: &MetricsResponse) {
        let curve = &metrics.equity_curve;

        if curve.is_empty() {
            let empty = Paragraph::new("No equity data.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title("Equity Curve"));
            frame.render_widget(empty, area);
            return;
        }

        // Points are plotted by index, in the order the backend sent them
        let points: Vec<(f64, f64)> = curve
            .iter()
            .enumerate()
            .map(|(i, point)| (i as f64, point.value))
            .collect();

        let min_value = points.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
        let max_value = points
            .iter()
            .map(|(_, v)| *v)
            .fold(f64::NEG_INFINITY, f64::max);
        let pad = ((max_value - min_value) * 0.05).max(1.0);

        let dataset = Dataset::default()
            .name("equity")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points);

        let x_labels = vec![
            Span::raw(curve.first().map(|p| p.date.clone()).unwrap_or_default()),
            Span::raw(curve.last().map(|p| p.date.clone()).unwrap_or_default()),
        ];
        let y_labels = vec![
            Span::raw(format!("{:.2}", min_value - pad)),
            Span::raw(format!("{:.2}", max_value + pad)),
        ];

        let chart = Chart::new(vec![dataset])
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Equity Curve ({} points)",
                curve.len()
            )))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, (curve.len().saturating_sub(1)).max(1) as f64])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([min_value - pad, max_value + pad])
                    .labels(y_labels),
            );

        frame.render_widget(chart, area);
    }
}

impl super::Page for MetricsPage {
    fn render(&self, frame: &mut Frame, area: Rect, app: &App) {
        let state = app.metrics.snapshot();

        if state.loading {
            let loading = Paragraph::new("Loading metrics...")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title("Metrics"));
            frame.render_widget(loading, area);
            return;
        }

        let Some(metrics) = state.data else {
            let empty = Paragraph::new("No metrics available.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title("Metrics"));
            frame.render_widget(empty, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        self.render_metric_cards(frame, chunks[0], &metrics);
        self.render_equity_chart(frame, chunks[1], &metrics);
    }

    fn handle_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                app.metrics.request_refresh();
                true
            }
            _ => false,
        }
    }
}
