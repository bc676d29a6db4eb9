//! Wire contracts for the portfolio backend.
//!
//! These shapes mirror the backend JSON responses field for field. Money
//! quantities are `Decimal`; ratios, scores and probabilities stay `f64`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One currently held position, produced by the backend on each poll.
/// The client never mutates it, only re-fetches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivePosition {
    pub ticker: String,
    pub net_qty: Decimal,
    pub avg_cost: Decimal,
    pub current_price: Decimal,
    pub unrealized_pnl_pct: f64,
    #[serde(default)]
    pub last_decision: Option<LastDecision>,
    pub sell_trigger: bool,
    /// Only meaningful when `sell_trigger` is set
    #[serde(default)]
    pub sell_reason: String,
}

/// Summary of the most recent decision for a held position.
/// Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LastDecision {
    #[serde(default)]
    pub rec: Option<String>,
    #[serde(default)]
    pub signal_score: Option<f64>,
    #[serde(default)]
    pub prob_outperform_90d: Option<f64>,
    #[serde(default)]
    pub what_changed_since_last: Option<Vec<String>>,
}

/// Result of an on-demand `/api/analyze/{ticker}` request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalyzeResponse {
    pub evidence_packet: BTreeMap<String, EvidenceValue>,
    pub llm_decision: DecisionRecord,
}

/// Decision block of an analyze response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionRecord {
    pub rec: String,
    pub signal_score: f64,
    pub prob_outperform_90d: f64,
    pub horizon_days: i64,
    pub key_drivers: Vec<String>,
    pub key_risks: Vec<String>,
    pub disconfirming_evidence: Vec<String>,
    #[serde(default)]
    pub what_changed_since_last: Option<Vec<String>>,
    pub exit_triggers: Vec<String>,
}

/// One entry of the open-ended evidence packet.
///
/// The backend does not promise a schema here, so values are decoded into
/// a closed set of renderable variants instead of being inspected at
/// render time. Anything that is not a number, string, array or object
/// (booleans, nulls) falls through to [`EvidenceValue::Other`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EvidenceValue {
    Number(f64),
    Text(String),
    Items(Vec<serde_json::Value>),
    Nested(serde_json::Map<String, serde_json::Value>),
    Other(serde_json::Value),
}

impl EvidenceValue {
    /// The four-way display rule: numbers print as-is, strings verbatim,
    /// arrays as a length summary, objects as a marker, the rest "N/A".
    pub fn display_text(&self) -> String {
        match self {
            EvidenceValue::Number(n) => format!("{}", n),
            EvidenceValue::Text(s) => s.clone(),
            EvidenceValue::Items(items) => format!("{} item(s)", items.len()),
            EvidenceValue::Nested(_) => "Object".to_string(),
            EvidenceValue::Other(_) => "N/A".to_string(),
        }
    }
}

/// Point of the equity curve; chronological order assumed, not enforced
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EquityPoint {
    pub date: String,
    pub value: f64,
}

/// Performance snapshot from `/api/metrics`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsResponse {
    pub equity_curve: Vec<EquityPoint>,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
}

/// Manual buy request. Optional numeric fields serialize as JSON `null`
/// when absent, never `0` or an empty string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyRequest {
    pub ticker: String,
    pub qty_optional: Option<Decimal>,
    pub notional_usd_optional: Option<Decimal>,
    pub risk_mode: Option<String>,
    pub fees: Decimal,
}

/// Manual sell request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellRequest {
    pub ticker: String,
    pub qty_optional: Option<Decimal>,
    pub fees: Decimal,
}

/// Confirmation returned by `/api/portfolio/sell`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SellResponse {
    pub status: String,
    pub ticker: String,
    pub qty: Decimal,
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_active_position_deserializes_backend_payload() {
        let json = r#"{
            "ticker": "AAPL",
            "net_qty": 12.5,
            "avg_cost": 180.25,
            "current_price": 191.0,
            "unrealized_pnl_pct": 0.0596,
            "last_decision": {
                "rec": "hold",
                "signal_score": 0.512,
                "prob_outperform_90d": 0.61,
                "what_changed_since_last": ["earnings beat"]
            },
            "sell_trigger": true,
            "sell_reason": "trailing stop hit"
        }"#;

        let position: ActivePosition = serde_json::from_str(json).unwrap();
        assert_eq!(position.ticker, "AAPL");
        assert_eq!(position.net_qty, dec!(12.5));
        assert_eq!(position.avg_cost, dec!(180.25));
        assert!(position.sell_trigger);
        assert_eq!(position.sell_reason, "trailing stop hit");
        let decision = position.last_decision.unwrap();
        assert_eq!(decision.rec.as_deref(), Some("hold"));
        assert_eq!(
            decision.what_changed_since_last,
            Some(vec!["earnings beat".to_string()])
        );
    }

    #[test]
    fn test_active_position_without_decision() {
        let json = r#"{
            "ticker": "MSFT",
            "net_qty": 3,
            "avg_cost": 400.0,
            "current_price": 395.5,
            "unrealized_pnl_pct": -0.0113,
            "last_decision": null,
            "sell_trigger": false,
            "sell_reason": ""
        }"#;

        let position: ActivePosition = serde_json::from_str(json).unwrap();
        assert!(position.last_decision.is_none());
        assert!(!position.sell_trigger);
    }

    #[test]
    fn test_evidence_value_display_rule() {
        let json = r#"{
            "pe_ratio": 31.4,
            "sector": "Technology",
            "recent_news": ["a", "b", "c"],
            "fundamentals": {"revenue": 1},
            "is_sp500": true,
            "missing": null
        }"#;

        let evidence: BTreeMap<String, EvidenceValue> = serde_json::from_str(json).unwrap();
        assert_eq!(evidence["pe_ratio"].display_text(), "31.4");
        assert_eq!(evidence["sector"].display_text(), "Technology");
        assert_eq!(evidence["recent_news"].display_text(), "3 item(s)");
        assert_eq!(evidence["fundamentals"].display_text(), "Object");
        assert_eq!(evidence["is_sp500"].display_text(), "N/A");
        assert_eq!(evidence["missing"].display_text(), "N/A");
    }

    #[test]
    fn test_evidence_integer_prints_without_decimal_point() {
        let value: EvidenceValue = serde_json::from_str("42").unwrap();
        assert_eq!(value.display_text(), "42");
    }

    #[test]
    fn test_sell_request_serializes_empty_qty_as_null() {
        let request = SellRequest {
            ticker: "AAPL".to_string(),
            qty_optional: None,
            fees: Decimal::ZERO,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json["qty_optional"].is_null());
        assert_eq!(json["fees"], serde_json::json!(0.0));
    }

    #[test]
    fn test_buy_request_field_names_match_wire_contract() {
        let request = BuyRequest {
            ticker: "NVDA".to_string(),
            qty_optional: Some(dec!(2)),
            notional_usd_optional: None,
            risk_mode: Some("moderate".to_string()),
            fees: dec!(1.5),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ticker"], "NVDA");
        assert_eq!(json["qty_optional"], serde_json::json!(2.0));
        assert!(json["notional_usd_optional"].is_null());
        assert_eq!(json["risk_mode"], "moderate");
    }

    #[test]
    fn test_metrics_response_deserializes() {
        let json = r#"{
            "equity_curve": [
                {"date": "2024-01-01", "value": 100},
                {"date": "2024-01-02", "value": 105}
            ],
            "sharpe": 1.2345,
            "max_drawdown": -0.08,
            "win_rate": 0.55
        }"#;

        let metrics: MetricsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.equity_curve.len(), 2);
        assert_eq!(metrics.equity_curve[0].date, "2024-01-01");
        assert_eq!(metrics.equity_curve[1].value, 105.0);
        assert_eq!(metrics.sharpe, 1.2345);
    }
}
