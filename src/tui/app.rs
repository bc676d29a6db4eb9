use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use crate::client::types::{
    ActivePosition, AnalyzeResponse, BuyRequest, MetricsResponse, SellRequest, SellResponse,
};
use crate::client::{paths, ApiClient};
use crate::poller::{Fetcher, PendingRegistry, Subscription};
use crate::tui::navigation::{Navigation, Page as NavPage};
use crate::tui::pages::{HoldingsPage, MarketPage, MetricsPage, Page};

/// Holdings are the most time-sensitive view
pub const HOLDINGS_POLL_INTERVAL: Duration = Duration::from_secs(15);
pub const ANALYZE_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const METRICS_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// One-line status banner, dismissed on navigation or a new action
#[derive(Debug, Clone)]
pub enum Banner {
    Success(String),
    Error(String),
}

/// Results of spawned mutation tasks, delivered back to the UI loop
pub enum AppMessage {
    SellFinished(Result<SellResponse, String>),
    BuyFinished(Result<Value, String>),
}

pub struct App {
    pub client: Arc<ApiClient>,
    pub navigation: Navigation,
    pub should_quit: bool,
    /// A pending buy/sell disables further submissions
    pub submitting: bool,
    pub banner: Option<Banner>,

    /// Shared with mutation tasks so a buy on the market page immediately
    /// revalidates the holdings view
    pub holdings: Arc<Subscription<Vec<ActivePosition>>>,
    pub analyze: Subscription<AnalyzeResponse>,
    pub metrics: Subscription<MetricsResponse>,

    pub holdings_page: HoldingsPage,
    pub market_page: MarketPage,
    pub metrics_page: MetricsPage,

    msg_tx: mpsc::UnboundedSender<AppMessage>,
    msg_rx: mpsc::UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let holdings_fetcher: Fetcher<Vec<ActivePosition>> = Arc::new({
            let client = client.clone();
            move |_key: String| {
                let client = client.clone();
                async move { client.active_positions().await.map_err(|e| e.to_string()) }.boxed()
            }
        });

        // The analyze cache key is the full request URL; its last path
        // segment is the normalized ticker.
        let analyze_fetcher: Fetcher<AnalyzeResponse> = Arc::new({
            let client = client.clone();
            move |key: String| {
                let client = client.clone();
                async move {
                    let ticker = key.rsplit('/').next().unwrap_or_default().to_string();
                    client.analyze(&ticker).await.map_err(|e| e.to_string())
                }
                .boxed()
            }
        });

        let metrics_fetcher: Fetcher<MetricsResponse> = Arc::new({
            let client = client.clone();
            move |_key: String| {
                let client = client.clone();
                async move { client.metrics().await.map_err(|e| e.to_string()) }.boxed()
            }
        });

        let holdings = Arc::new(Subscription::spawn(
            Some(client.config().url_for(paths::ACTIVE_POSITIONS)),
            HOLDINGS_POLL_INTERVAL,
            holdings_fetcher,
            Arc::new(PendingRegistry::new()),
        ));

        // Disabled until the user queries a ticker
        let analyze = Subscription::spawn(
            None,
            ANALYZE_POLL_INTERVAL,
            analyze_fetcher,
            Arc::new(PendingRegistry::new()),
        );

        let metrics = Subscription::spawn(
            Some(client.config().url_for(paths::METRICS)),
            METRICS_POLL_INTERVAL,
            metrics_fetcher,
            Arc::new(PendingRegistry::new()),
        );

        Self {
            client,
            navigation: Navigation::new(),
            should_quit: false,
            submitting: false,
            banner: None,
            holdings,
            analyze,
            metrics,
            holdings_page: HoldingsPage::default(),
            market_page: MarketPage::default(),
            metrics_page: MetricsPage::default(),
            msg_tx,
            msg_rx,
        }
    }

    /// Cache key for an analyze request
    pub fn analyze_key(&self, ticker: &str) -> String {
        self.client.config().url_for(&paths::analyze(ticker))
    }

    pub fn show_error(&mut self, message: String) {
        self.banner = Some(Banner::Error(message));
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.dispatch_to_page(key) {
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.clear_banner();
                self.navigation.next_page();
            }
            KeyCode::BackTab => {
                self.clear_banner();
                self.navigation.previous_page();
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            // 'q' types into the ticker field on the market page, so it
            // only quits elsewhere
            KeyCode::Char('q') | KeyCode::Char('Q')
                if self.navigation.current_page != NavPage::Market =>
            {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn dispatch_to_page(&mut self, key: KeyEvent) -> bool {
        match self.navigation.current_page {
            NavPage::Holdings => {
                let mut page = std::mem::take(&mut self.holdings_page);
                let handled = page.handle_key(key, self);
                self.holdings_page = page;
                handled
            }
            NavPage::Market => {
                let mut page = std::mem::take(&mut self.market_page);
                let handled = page.handle_key(key, self);
                self.market_page = page;
                handled
            }
            NavPage::Metrics => {
                let mut page = std::mem::take(&mut self.metrics_page);
                let handled = page.handle_key(key, self);
                self.metrics_page = page;
                handled
            }
        }
    }

    /// Submit a sell request in the background. On success the holdings
    /// key is revalidated before the result lands back in the UI loop.
    pub fn submit_sell(&mut self, payload: SellRequest) {
        if self.submitting {
            return;
        }
        self.submitting = true;
        self.clear_banner();

        info!("Submitting sell for {}", payload.ticker);
        let client = self.client.clone();
        let holdings = self.holdings.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = client.sell(&payload).await.map_err(|e| e.to_string());
            if result.is_ok() {
                holdings.invalidate().await;
            }
            let _ = tx.send(AppMessage::SellFinished(result));
        });
    }

    /// Submit a buy request in the background, same revalidation rule
    pub fn submit_buy(&mut self, payload: BuyRequest) {
        if self.submitting {
            return;
        }
        self.submitting = true;
        self.clear_banner();

        info!("Submitting buy for {}", payload.ticker);
        let client = self.client.clone();
        let holdings = self.holdings.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = client.buy(&payload).await.map_err(|e| e.to_string());
            if result.is_ok() {
                holdings.invalidate().await;
            }
            let _ = tx.send(AppMessage::BuyFinished(result));
        });
    }

    /// Apply finished mutations. On failure the modal stays open and the
    /// error is shown as a banner; on success the modal closes.
    pub fn drain_messages(&mut self) {
        while let Ok(message) = self.msg_rx.try_recv() {
            match message {
                AppMessage::SellFinished(Ok(response)) => {
                    self.submitting = false;
                    self.holdings_page.sell_form.close();
                    self.banner = Some(Banner::Success(format!(
                        "Sold {} {} @ {}",
                        response.qty, response.ticker, response.price
                    )));
                }
                AppMessage::SellFinished(Err(message)) => {
                    self.submitting = false;
                    self.show_error(message);
                }
                AppMessage::BuyFinished(Ok(response)) => {
                    self.submitting = false;
                    self.market_page.buy_form.close();
                    self.banner = Some(Banner::Success(format!("Buy response: {}", response)));
                }
                AppMessage::BuyFinished(Err(message)) => {
                    self.submitting = false;
                    self.show_error(message);
                }
            }
        }
    }

    /// Fetch error of the data source backing the current page, if any
    pub fn active_fetch_error(&self) -> Option<String> {
        match self.navigation.current_page {
            NavPage::Holdings => self.holdings.snapshot().error,
            NavPage::Market => self.analyze.snapshot().error,
            NavPage::Metrics => self.metrics.snapshot().error,
        }
    }
}
