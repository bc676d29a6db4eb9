use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::client::ApiClient;
use crate::display::print_metrics;

#[derive(Args, Clone)]
pub struct MetricsArgs {}

pub struct MetricsCommand {
    #[allow(dead_code)]
    args: MetricsArgs,
}

impl MetricsCommand {
    pub fn new(args: MetricsArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: &ApiClient) -> Result<()> {
        info!("Fetching performance metrics");

        let metrics = client.metrics().await?;
        print_metrics(&metrics);

        Ok(())
    }
}
