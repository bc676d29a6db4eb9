use anyhow::{bail, Result};
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::client::types::SellRequest;
use crate::client::ApiClient;
use crate::ticker;

#[derive(Args, Clone)]
pub struct SellArgs {
    /// Ticker symbol (e.g. AAPL)
    pub ticker: String,

    /// Quantity in shares (omit to sell the full position)
    #[arg(long)]
    pub qty: Option<Decimal>,

    /// Fees in USD
    #[arg(long, default_value = "0")]
    pub fees: Decimal,

    /// Confirm order placement
    #[arg(long)]
    pub yes: bool,
}

pub struct SellCommand {
    args: SellArgs,
}

impl SellCommand {
    pub fn new(args: SellArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: &ApiClient) -> Result<()> {
        if !self.args.yes {
            warn!("Order confirmation required. Use --yes to confirm.");
            return Ok(());
        }

        if let Some(hint) = ticker::ticker_hint(&self.args.ticker) {
            bail!("{}", hint);
        }
        let normalized = ticker::normalize_ticker(&self.args.ticker);

        let request = SellRequest {
            ticker: normalized.clone(),
            qty_optional: self.args.qty,
            fees: self.args.fees,
        };

        info!("Submitting sell for {}", normalized);
        let response = client.sell(&request).await?;

        println!(
            "{} {} {} @ {} ({})",
            "Sold".green().bold(),
            response.qty,
            response.ticker.bright_white(),
            response.price,
            response.status
        );

        Ok(())
    }
}
