//! Rate-limited alert collectors.
//!
//! A collector takes alert records, drops records still inside the cooldown
//! window for their throttle key, renders the survivors and posts them
//! through a webhook client. Admission, delivery and the window update all
//! happen under one lock, so concurrent duplicates cannot slip past the
//! window check while a send is in flight.

use crate::config::AlertConfig;
use crate::core::{AlertRecord, BusinessAlert, HttpPanicAlert, RpcPanicAlert};
use crate::formatting::{RenderContext, RenderMessage};
use crate::notification::feishu::{FeishuClient, FeishuClientTrait};
use chrono::Utc;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::{error, info};

/// Minimum spacing between two deliveries sharing a throttle key.
pub const SEND_COOLDOWN: Duration = Duration::from_secs(3 * 60);

/// A rate-limited collector forwarding alert records to a webhook.
///
/// Generic over the record type, whose [`AlertRecord::Key`] decides which
/// records contend for the same cooldown window, and over the client, so
/// tests can swap in a fake.
pub struct AlertCollector<R: AlertRecord, C: FeishuClientTrait> {
    client: Arc<C>,
    production: bool,
    cooldown: Duration,
    last_sent: Mutex<HashMap<R::Key, Instant>>,
}

impl<R, C> AlertCollector<R, C>
where
    R: AlertRecord + RenderMessage,
    C: FeishuClientTrait,
{
    /// Creates a collector sending through `client`.
    pub fn new(client: Arc<C>, production: bool) -> Self {
        Self {
            client,
            production,
            cooldown: SEND_COOLDOWN,
            last_sent: Mutex::new(HashMap::new()),
        }
    }

    /// Accepts one record, applying the cooldown for its key.
    ///
    /// Never fails: suppressed records and failed deliveries are observable
    /// only through the log output.
    pub async fn collect(&self, record: R) {
        let key = record.throttle_key();
        let mut last_sent = self.last_sent.lock().await;

        if let Some(sent_at) = last_sent.get(&key) {
            if sent_at.elapsed() < self.cooldown {
                info!(
                    key = ?key,
                    elapsed_secs = sent_at.elapsed().as_secs(),
                    "alert suppressed inside cooldown window"
                );
                return;
            }
        }

        let ctx = RenderContext {
            rendered_at: Utc::now(),
            production: self.production,
        };
        let text = record.render(&ctx);

        if let Err(error) = self.client.send_text(&text).await {
            error!(key = ?key, error = %error, "failed to deliver alert");
            return;
        }

        // The window opens when the send finishes, not when it starts.
        last_sent.insert(key.clone(), Instant::now());
        info!(key = ?key, "alert delivered");
    }
}

impl<R> AlertCollector<R, FeishuClient>
where
    R: AlertRecord + RenderMessage,
{
    /// Builds a collector with a real webhook client from configuration.
    pub fn from_config(config: &AlertConfig) -> Self {
        let client = Arc::new(FeishuClient::new(config.webhook_url.clone()));
        Self::new(client, config.production)
    }
}

/// Collector for business alerts. Each category gets its own window.
pub type BusinessAlertCollector<C = FeishuClient> = AlertCollector<BusinessAlert, C>;

/// Collector for RPC panics. All records share one window.
pub type RpcPanicCollector<C = FeishuClient> = AlertCollector<RpcPanicAlert, C>;

/// Collector for HTTP panics. All records share one window.
pub type HttpPanicCollector<C = FeishuClient> = AlertCollector<HttpPanicAlert, C>;

static GLOBAL_BUSINESS_COLLECTOR: OnceCell<BusinessAlertCollector> = OnceCell::new();

/// Returns the process-wide business alert collector, creating it from
/// `config` on the first call. Later calls return the existing collector
/// and ignore their argument.
///
/// Prefer constructing collectors directly and passing them where needed;
/// this accessor exists for call sites that cannot thread one through.
pub fn global_business_collector(config: &AlertConfig) -> &'static BusinessAlertCollector {
    GLOBAL_BUSINESS_COLLECTOR.get_or_init(|| BusinessAlertCollector::from_config(config))
}

/// Sends a business alert through the global collector.
///
/// Logs and drops the alert when [`global_business_collector`] was never
/// called.
pub async fn send_business_alert(alert: BusinessAlert) {
    match GLOBAL_BUSINESS_COLLECTOR.get() {
        Some(collector) => collector.collect(alert).await,
        None => error!(
            category = %alert.category,
            "business alert collector not initialized, dropping alert"
        ),
    }
}
