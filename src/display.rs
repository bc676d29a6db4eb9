//! Formatting and display utilities.
//!
//! The small format helpers are shared between the TUI pages and the
//! one-shot CLI commands so both render identical strings. The print_*
//! functions are the CLI rendering path.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::client::types::{ActivePosition, AnalyzeResponse, MetricsResponse};

/// Sharpe ratio, four decimals
pub fn format_sharpe(sharpe: f64) -> String {
    format!("{:.4}", sharpe)
}

/// Max drawdown, four decimals (the backend reports a signed fraction)
pub fn format_drawdown(max_drawdown: f64) -> String {
    format!("{:.4}", max_drawdown)
}

/// Win rate fraction rendered as a percentage, two decimals
pub fn format_win_rate(win_rate: f64) -> String {
    format!("{:.2}%", win_rate * 100.0)
}

/// Unrealized P&L fraction rendered as a percentage, two decimals
pub fn format_pnl_pct(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Signal scores and probabilities, three decimals; absent values "N/A"
pub fn format_score(score: Option<f64>) -> String {
    score
        .map(|s| format!("{:.3}", s))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Join a string list with "; ", or "N/A" when empty/absent
pub fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        "N/A".to_string()
    } else {
        items.join("; ")
    }
}

/// Print active positions as a table
pub fn print_positions(positions: &[ActivePosition]) {
    if positions.is_empty() {
        println!("No active positions.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Ticker", "Net Qty", "Avg Cost", "Price", "PnL %", "Rec", "Signal", "Prob 90d",
        ]);

    for position in positions {
        let decision = position.last_decision.as_ref();
        let rec = decision
            .and_then(|d| d.rec.clone())
            .unwrap_or_else(|| "N/A".to_string());

        table.add_row(vec![
            position.ticker.clone(),
            format!("{:.4}", position.net_qty),
            format!("${:.2}", position.avg_cost),
            format!("${:.2}", position.current_price),
            format_pnl_pct(position.unrealized_pnl_pct),
            rec,
            format_score(decision.and_then(|d| d.signal_score)),
            format_score(decision.and_then(|d| d.prob_outperform_90d)),
        ]);
    }

    println!("{table}");

    for position in positions {
        if position.sell_trigger {
            let reason = if position.sell_reason.is_empty() {
                "Sell conditions triggered."
            } else {
                &position.sell_reason
            };
            println!(
                "{} {}: {}",
                "SELL TRIGGER".yellow().bold(),
                position.ticker.bright_white(),
                reason
            );
        }
    }
}

/// Print an analyze report
pub fn print_analysis(ticker: &str, analysis: &AnalyzeResponse) {
    let decision = &analysis.llm_decision;

    println!("{}", format!("Analysis: {}", ticker).bright_white().bold());
    println!(
        "Rec: {}   Signal: {}   Prob90d: {}",
        decision.rec.bright_cyan(),
        format_score(Some(decision.signal_score)),
        format_score(Some(decision.prob_outperform_90d)),
    );

    println!("\n{}", "Evidence Summary".bright_yellow());
    for (key, value) in &analysis.evidence_packet {
        println!("  {}: {}", key, value.display_text());
    }

    println!("\n{}", "Decision Details".bright_yellow());
    println!("  Horizon Days: {}", decision.horizon_days);
    println!("  Drivers: {}", join_or_na(&decision.key_drivers));
    println!("  Risks: {}", join_or_na(&decision.key_risks));
    println!(
        "  Disconfirming Evidence: {}",
        join_or_na(&decision.disconfirming_evidence)
    );
    println!(
        "  What Changed: {}",
        decision
            .what_changed_since_last
            .as_deref()
            .map(join_or_na)
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("  Exit Triggers: {}", join_or_na(&decision.exit_triggers));
}

/// Print the performance snapshot
pub fn print_metrics(metrics: &MetricsResponse) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Sharpe", "Max Drawdown", "Win Rate"])
        .add_row(vec![
            format_sharpe(metrics.sharpe),
            format_drawdown(metrics.max_drawdown),
            format_win_rate(metrics.win_rate),
        ]);

    println!("{table}");

    println!(
        "Equity curve: {} points{}",
        metrics.equity_curve.len(),
        metrics
            .equity_curve
            .last()
            .map(|p| format!(", latest {} = {:.2}", p.date, p.value))
            .unwrap_or_default()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_scenario_strings() {
        // sharpe 1.2345 / drawdown -0.08 / win rate 0.55
        assert_eq!(format_sharpe(1.2345), "1.2345");
        assert_eq!(format_drawdown(-0.08), "-0.0800");
        assert_eq!(format_win_rate(0.55), "55.00%");
    }

    #[test]
    fn test_pnl_pct_from_fraction() {
        assert_eq!(format_pnl_pct(0.0596), "5.96%");
        assert_eq!(format_pnl_pct(-0.0113), "-1.13%");
    }

    #[test]
    fn test_score_formatting() {
        assert_eq!(format_score(Some(0.512)), "0.512");
        assert_eq!(format_score(None), "N/A");
    }

    #[test]
    fn test_join_or_na() {
        assert_eq!(join_or_na(&[]), "N/A");
        assert_eq!(
            join_or_na(&["a".to_string(), "b".to_string()]),
            "a; b"
        );
    }
}
