use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::client::ApiClient;
use crate::display::print_positions;

#[derive(Args, Clone)]
pub struct PositionsArgs {}

pub struct PositionsCommand {
    #[allow(dead_code)]
    args: PositionsArgs,
}

impl PositionsCommand {
    pub fn new(args: PositionsArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: &ApiClient) -> Result<()> {
        info!("Fetching active positions");

        let positions = client.active_positions().await?;
        print_positions(&positions);

        Ok(())
    }
}
