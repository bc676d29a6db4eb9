use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::display::{format_score, join_or_na};
use crate::ticker;
use crate::tui::widgets::{BuyForm, FormAction};
use crate::tui::App;

/// Market page: ticker input, on-demand analyze report, buy modal
pub struct MarketPage {
    pub ticker_input: String,
    pub query_ticker: Option<String>,
    pub buy_form: BuyForm,
}

impl Default for MarketPage {
    fn default() -> Self {
        Self {
            ticker_input: "AAPL".to_string(),
            query_ticker: None,
            buy_form: BuyForm::default(),
        }
    }
}

impl MarketPage {
    fn render_ticker_input(&self, frame: &mut Frame, area: Rect) {
        let hint = ticker::ticker_hint(&self.ticker_input);

        let input_style = if hint.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };

        let lines = vec![
            Line::from(vec![
                Span::raw("Ticker: "),
                Span::styled(
                    format!("{}_", self.ticker_input),
                    input_style.add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                hint.unwrap_or(ticker::USAGE_HINT),
                Style::default().fg(if hint.is_some() {
                    Color::Red
                } else {
                    Color::DarkGray
                }),
            )),
        ];

        let title = if hint.is_some() {
            "Analyze (disabled)"
        } else {
            "Analyze (Enter)"
        };

        let input = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title));

        frame.render_widget(input, area);
    }

    fn render_analysis(&self, frame: &mut Frame, area: Rect, app: &App) {
        let state = app.analyze.snapshot();

        let block = Block::default().borders(Borders::ALL).title(
            self.query_ticker
                .as_deref()
                .map(|t| format!("Analysis: {} - Ctrl+B buy", t))
                .unwrap_or_else(|| "Analysis".to_string()),
        );

        if self.query_ticker.is_none() {
            let placeholder = Paragraph::new("Enter a ticker and press Enter to analyze.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        if state.loading {
            let loading = Paragraph::new("Analyzing...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(loading, area);
            return;
        }

        let Some(analysis) = state.data else {
            let empty = Paragraph::new("No analysis available.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        };

        let decision = &analysis.llm_decision;
        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("Rec: {}", decision.rec),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    "   Signal: {}   Prob90d: {}",
                    format_score(Some(decision.signal_score)),
                    format_score(Some(decision.prob_outperform_90d)),
                )),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Evidence Summary",
                Style::default().fg(Color::Yellow),
            )),
        ];

        for (key, value) in &analysis.evidence_packet {
            lines.push(Line::from(format!("  {}: {}", key, value.display_text())));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Decision Details",
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::from(format!(
            "  Horizon Days: {}",
            decision.horizon_days
        )));
        lines.push(Line::from(format!(
            "  Drivers: {}",
            join_or_na(&decision.key_drivers)
        )));
        lines.push(Line::from(format!(
            "  Risks: {}",
            join_or_na(&decision.key_risks)
        )));
        lines.push(Line::from(format!(
            "  Disconfirming Evidence: {}",
            join_or_na(&decision.disconfirming_evidence)
        )));
        lines.push(Line::from(format!(
            "  What Changed: {}",
            decision
                .what_changed_since_last
                .as_deref()
                .map(join_or_na)
                .unwrap_or_else(|| "N/A".to_string())
        )));
        lines.push(Line::from(format!(
            "  Exit Triggers: {}",
            join_or_na(&decision.exit_triggers)
        )));

        let report = Paragraph::new(lines).block(block);
        frame.render_widget(report, area);
    }

    fn analyze(&mut self, app: &mut App) {
        if ticker::ticker_hint(&self.ticker_input).is_some() {
            return;
        }
        app.clear_banner();
        let normalized = ticker::normalize_ticker(&self.ticker_input);
        app.analyze.set_key(Some(app.analyze_key(&normalized)));
        self.query_ticker = Some(normalized);
    }
}

impl super::Page for MarketPage {
    fn render(&self, frame: &mut Frame, area: Rect, app: &App) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        self.render_ticker_input(frame, chunks[0]);
        self.render_analysis(frame, chunks[1], app);

        if self.buy_form.open {
            self.buy_form.render(frame, app.submitting);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        if self.buy_form.open {
            match self.buy_form.handle_key(key, app.submitting) {
                FormAction::Submit => match self.buy_form.payload() {
                    Ok(payload) => app.submit_buy(payload),
                    Err(message) => app.show_error(message),
                },
                FormAction::Cancel => self.buy_form.close(),
                FormAction::Consumed => {}
            }
            return true;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('b') = key.code {
                // Buy is only offered once an analysis is on screen
                if app.analyze.snapshot().data.is_some() {
                    app.clear_banner();
                    let ticker = self
                        .query_ticker
                        .clone()
                        .unwrap_or_else(|| ticker::normalize_ticker(&self.ticker_input));
                    self.buy_form.open_for(&ticker);
                }
                return true;
            }
            return false;
        }

        match key.code {
            KeyCode::Enter => {
                self.analyze(app);
                true
            }
            KeyCode::Backspace => {
                self.ticker_input.pop();
                true
            }
            KeyCode::Char(c) => {
                // Normalized to upper-case as typed, like the symbol field
                // of any trading terminal
                self.ticker_input.push(c.to_ascii_uppercase());
                true
            }
            _ => false,
        }
    }
}
