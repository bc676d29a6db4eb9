//! Modal trade forms (Buy / Sell).
//!
//! Each form holds local draft state for its fields as raw strings and
//! coerces them on submit: an empty optional numeric field becomes `None`
//! (JSON null), fees default to zero. Fields are deliberately not reset
//! on close, so stale values reappear if the form is reopened.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::client::types::{BuyRequest, SellRequest};

/// What a key press did inside an open form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Key was consumed by field editing or focus movement
    Consumed,
    /// Enter pressed: submit the current draft
    Submit,
    /// Esc pressed: close the form
    Cancel,
}

/// Sell request draft
#[derive(Debug)]
pub struct SellForm {
    pub ticker: String,
    pub qty: String,
    pub fees: String,
    pub focus: usize,
    pub open: bool,
}

impl Default for SellForm {
    fn default() -> Self {
        Self {
            ticker: String::new(),
            qty: String::new(),
            fees: "0".to_string(),
            focus: 0,
            open: false,
        }
    }
}

impl SellForm {
    /// Open the form for a ticker. Field values persist from any earlier
    /// use.
    pub fn open_for(&mut self, ticker: &str) {
        self.ticker = ticker.to_string();
        self.focus = 0;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn payload(&self) -> Result<SellRequest, String> {
        Ok(SellRequest {
            ticker: self.ticker.clone(),
            qty_optional: parse_optional_decimal("qty_optional", &self.qty)?,
            fees: parse_fees(&self.fees)?,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent, submitting: bool) -> FormAction {
        let values = [&mut self.qty, &mut self.fees];
        handle_form_key(key, submitting, &mut self.focus, values)
    }

    pub fn render(&self, frame: &mut Frame, submitting: bool) {
        let fields = [("qty_optional", self.qty.as_str()), ("fees", self.fees.as_str())];
        render_form(
            frame,
            &format!("Sell {}", self.ticker),
            &fields,
            self.focus,
            submitting,
            Color::Red,
        );
    }
}

/// Buy request draft
#[derive(Debug)]
pub struct BuyForm {
    pub ticker: String,
    pub qty: String,
    pub notional: String,
    pub risk_mode: String,
    pub fees: String,
    pub focus: usize,
    pub open: bool,
}

impl Default for BuyForm {
    fn default() -> Self {
        Self {
            ticker: String::new(),
            qty: String::new(),
            notional: String::new(),
            risk_mode: "moderate".to_string(),
            fees: "0".to_string(),
            focus: 0,
            open: false,
        }
    }
}

impl BuyForm {
    pub fn open_for(&mut self, ticker: &str) {
        self.ticker = ticker.to_string();
        self.focus = 0;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn payload(&self) -> Result<BuyRequest, String> {
        Ok(BuyRequest {
            ticker: self.ticker.clone(),
            qty_optional: parse_optional_decimal("qty_optional", &self.qty)?,
            notional_usd_optional: parse_optional_decimal(
                "notional_usd_optional",
                &self.notional,
            )?,
            risk_mode: if self.risk_mode.is_empty() {
                None
            } else {
                Some(self.risk_mode.clone())
            },
            fees: parse_fees(&self.fees)?,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent, submitting: bool) -> FormAction {
        let values = [
            &mut self.qty,
            &mut self.notional,
            &mut self.risk_mode,
            &mut self.fees,
        ];
        handle_form_key(key, submitting, &mut self.focus, values)
    }

    pub fn render(&self, frame: &mut Frame, submitting: bool) {
        let fields = [
            ("qty_optional", self.qty.as_str()),
            ("notional_usd_optional", self.notional.as_str()),
            ("risk_mode", self.risk_mode.as_str()),
            ("fees", self.fees.as_str()),
        ];
        render_form(
            frame,
            &format!("Buy {}", self.ticker),
            &fields,
            self.focus,
            submitting,
            Color::Green,
        );
    }
}

/// Empty string -> None, anything else must parse as a decimal
fn parse_optional_decimal(label: &str, raw: &str) -> Result<Option<Decimal>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(raw)
        .map(Some)
        .map_err(|_| format!("{} must be a number", label))
}

/// Empty fees default to zero
fn parse_fees(raw: &str) -> Result<Decimal, String> {
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(raw).map_err(|_| "fees must be a number".to_string())
}

fn handle_form_key<const N: usize>(
    key: KeyEvent,
    submitting: bool,
    focus: &mut usize,
    values: [&mut String; N],
) -> FormAction {
    match key.code {
        // Both actions stay disabled while a submission is pending, so a
        // single control can never fire a duplicate side-effecting request
        KeyCode::Enter if !submitting => FormAction::Submit,
        KeyCode::Esc if !submitting => FormAction::Cancel,
        KeyCode::Tab | KeyCode::Down => {
            *focus = (*focus + 1) % N;
            FormAction::Consumed
        }
        KeyCode::BackTab | KeyCode::Up => {
            *focus = if *focus == 0 { N - 1 } else { *focus - 1 };
            FormAction::Consumed
        }
        KeyCode::Backspace => {
            values[*focus].pop();
            FormAction::Consumed
        }
        KeyCode::Char(c) => {
            values[*focus].push(c);
            FormAction::Consumed
        }
        _ => FormAction::Consumed,
    }
}

fn render_form(
    frame: &mut Frame,
    title: &str,
    fields: &[(&str, &str)],
    focus: usize,
    submitting: bool,
    accent: Color,
) {
    let area = centered_rect(frame.area(), 50, fields.len() as u16 + 4);

    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = fields
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let style = if i == focus {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let cursor = if i == focus { "_" } else { "" };
            Line::from(Span::styled(format!("{}: {}{}", label, value, cursor), style))
        })
        .collect();

    let footer = if submitting {
        Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            "Tab next field | Enter submit | Esc cancel",
            Style::default().fg(Color::DarkGray),
        ))
    };
    lines.push(Line::from(""));
    lines.push(footer);

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(title.to_string()),
    );

    frame.render_widget(form, area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use rust_decimal_macros::dec;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_empty_qty_becomes_null() {
        let mut form = SellForm::default();
        form.open_for("AAPL");

        let payload = form.payload().unwrap();
        assert_eq!(payload.ticker, "AAPL");
        assert_eq!(payload.qty_optional, None);
        assert_eq!(payload.fees, Decimal::ZERO);
    }

    #[test]
    fn test_filled_fields_parse() {
        let mut form = SellForm::default();
        form.open_for("MSFT");
        form.qty = "2.5".to_string();
        form.fees = "1".to_string();

        let payload = form.payload().unwrap();
        assert_eq!(payload.qty_optional, Some(dec!(2.5)));
        assert_eq!(payload.fees, dec!(1));
    }

    #[test]
    fn test_non_numeric_qty_is_an_error() {
        let mut form = SellForm::default();
        form.open_for("AAPL");
        form.qty = "abc".to_string();

        assert_eq!(
            form.payload().unwrap_err(),
            "qty_optional must be a number"
        );
    }

    #[test]
    fn test_buy_defaults() {
        let mut form = BuyForm::default();
        form.open_for("NVDA");

        let payload = form.payload().unwrap();
        assert_eq!(payload.qty_optional, None);
        assert_eq!(payload.notional_usd_optional, None);
        assert_eq!(payload.risk_mode.as_deref(), Some("moderate"));
        assert_eq!(payload.fees, Decimal::ZERO);
    }

    #[test]
    fn test_empty_risk_mode_becomes_null() {
        let mut form = BuyForm::default();
        form.open_for("NVDA");
        form.risk_mode.clear();

        assert_eq!(form.payload().unwrap().risk_mode, None);
    }

    #[test]
    fn test_fields_persist_across_close_and_reopen() {
        let mut form = SellForm::default();
        form.open_for("AAPL");
        form.qty = "3".to_string();
        form.close();

        form.open_for("AAPL");
        assert_eq!(form.qty, "3");
    }

    #[test]
    fn test_submit_and_cancel_disabled_while_submitting() {
        let mut form = SellForm::default();
        form.open_for("AAPL");

        assert_eq!(form.handle_key(key(KeyCode::Enter), true), FormAction::Consumed);
        assert_eq!(form.handle_key(key(KeyCode::Esc), true), FormAction::Consumed);
        assert_eq!(form.handle_key(key(KeyCode::Enter), false), FormAction::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc), false), FormAction::Cancel);
    }

    #[test]
    fn test_focus_cycles_and_edits_target_field() {
        let mut form = BuyForm::default();
        form.open_for("NVDA");

        form.handle_key(key(KeyCode::Char('5')), false);
        assert_eq!(form.qty, "5");

        form.handle_key(key(KeyCode::Tab), false);
        form.handle_key(key(KeyCode::Char('9')), false);
        assert_eq!(form.notional, "9");

        form.handle_key(key(KeyCode::Backspace), false);
        assert_eq!(form.notional, "");
    }
}
