use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tracing::info;

use crate::client::ApiClient;
use crate::tui::{self, App};

#[derive(Args, Clone)]
pub struct DashboardArgs {}

pub struct DashboardCommand {
    #[allow(dead_code)]
    args: DashboardArgs,
}

impl DashboardCommand {
    pub fn new(args: DashboardArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: Arc<ApiClient>) -> Result<()> {
        info!("Starting dashboard against {}", client.config().base_url());

        let app = App::new(client);
        tui::run(app).await
    }
}
