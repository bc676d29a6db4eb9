use anyhow::{bail, Result};
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::client::types::BuyRequest;
use crate::client::ApiClient;
use crate::ticker;

#[derive(Args, Clone)]
pub struct BuyArgs {
    /// Ticker symbol (e.g. AAPL)
    pub ticker: String,

    /// Quantity in shares (omit to let the backend size the order)
    #[arg(long)]
    pub qty: Option<Decimal>,

    /// Notional amount in USD (alternative to --qty)
    #[arg(long)]
    pub notional: Option<Decimal>,

    /// Risk mode passed through to the backend
    #[arg(long, default_value = "moderate")]
    pub risk_mode: String,

    /// Fees in USD
    #[arg(long, default_value = "0")]
    pub fees: Decimal,

    /// Confirm order placement
    #[arg(long)]
    pub yes: bool,
}

pub struct BuyCommand {
    args: BuyArgs,
}

impl BuyCommand {
    pub fn new(args: BuyArgs) -> Self {
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

        let request = BuyRequest {
            ticker: normalized.clone(),
            qty_optional: self.args.qty,
            notional_usd_optional: self.args.notional,
            risk_mode: Some(self.args.risk_mode.clone()),
            fees: self.args.fees,
        };

        info!("Submitting buy for {}", normalized);
        let response = client.buy(&request).await?;

        println!("{}", "Buy submitted".green().bold());
        println!("{}", serde_json::to_string_pretty(&response)?);

        Ok(())
    }
}
