use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use crate::client::ApiClient;
use crate::display::print_analysis;
use crate::ticker;

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Ticker symbol (e.g. AAPL)
    pub ticker: String,
}

pub struct AnalyzeCommand {
    args: AnalyzeArgs,
}

impl AnalyzeCommand {
    pub fn new(args: AnalyzeArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: &ApiClient) -> Result<()> {
        if let Some(hint) = ticker::ticker_hint(&self.args.ticker) {
            bail!("{}", hint);
        }
        let normalized = ticker::normalize_ticker(&self.args.ticker);

        info!("Analyzing {}", normalized);
        let analysis = client.analyze(&normalized).await?;
        print_analysis(&normalized, &analysis);

        Ok(())
    }
}
