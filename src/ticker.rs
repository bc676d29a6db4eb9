//! Ticker symbol validation.
//!
//! A single synchronous rule gates the analyze action: 1-8 alphanumeric
//! characters, case-insensitive, normalized to upper-case for display and
//! for the outgoing request path. Invalid input never reaches the network
//! layer.

pub const REQUIRED_HINT: &str = "Ticker is required.";
pub const INVALID_HINT: &str = "Ticker must be letters/numbers only, length 1-8.";
pub const USAGE_HINT: &str = "Use symbols like AAPL, MSFT, NVDA";

/// Whether the input matches `^[A-Za-z0-9]{1,8}$`
pub fn is_valid_ticker(input: &str) -> bool {
    !input.is_empty() && input.len() <= 8 && input.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Inline hint for the current input: `None` means the analyze action is
/// enabled, `Some(hint)` means it is disabled with that message shown.
pub fn ticker_hint(input: &str) -> Option<&'static str> {
    if input.is_empty() {
        Some(REQUIRED_HINT)
    } else if !is_valid_ticker(input) {
        Some(INVALID_HINT)
    } else {
        None
    }
}

/// Upper-cased form used for display and the request path segment
pub fn normalize_ticker(input: &str) -> String {
    input.to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tickers_enable_analyze() {
        for ticker in ["A", "AAPL", "msft", "BRK4", "12345678", "nvda"] {
            assert!(is_valid_ticker(ticker), "{} should be valid", ticker);
            assert_eq!(ticker_hint(ticker), None);
        }
    }

    #[test]
    fn test_empty_input_shows_required_hint() {
        assert!(!is_valid_ticker(""));
        assert_eq!(ticker_hint(""), Some(REQUIRED_HINT));
    }

    #[test]
    fn test_invalid_input_shows_format_hint() {
        for ticker in ["TOOLONG123", "BRK.B", "AA PL", "AAPL!", "é", " "] {
            assert!(!is_valid_ticker(ticker), "{} should be invalid", ticker);
            assert_eq!(ticker_hint(ticker), Some(INVALID_HINT));
        }
    }

    #[test]
    fn test_normalization_uppercases() {
        assert_eq!(normalize_ticker("aapl"), "AAPL");
        assert_eq!(normalize_ticker("Msft"), "MSFT");
    }
}
