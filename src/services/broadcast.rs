use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode, Recipient};
use teloxide::RequestError;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use url::Url;

use crate::bot::templates::{self, Branding};
use crate::config::Config;
use crate::database::{connection::DatabaseManager, models::*};
use crate::utils::logging::log_broadcast_summary;

/// Products included in each daily digest.
pub const DIGEST_SIZE: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

impl BroadcastReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Outcome of a morning or evening digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DigestReport {
    pub products: usize,
    pub channel_posted: bool,
    pub users: BroadcastReport,
}

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("Broadcast lain sedang berjalan, coba lagi nanti")]
    AlreadyRunning,
    #[error("Gagal membaca database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Gagal mengirim ke channel: {0}")]
    Channel(#[from] RequestError),
}

/// Sends to each recipient in order with a fixed pause between sends.
/// Failures are counted and logged; nothing is retried.
pub async fn deliver_sequentially<F, Fut, E>(
    recipients: &[ChatId],
    delay: Duration,
    mut send: F,
) -> BroadcastReport
where
    F: FnMut(ChatId) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut report = BroadcastReport::default();

    for (i, chat_id) in recipients.iter().copied().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match send(chat_id).await {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!("Broadcast to {} failed: {}", chat_id.0, e);
            }
        }
    }

    report
}

async fn send_markdown(bot: &Bot, to: Recipient, text: String) -> Result<(), RequestError> {
    bot.send_message(to, text)
        .parse_mode(ParseMode::MarkdownV2)
        .disable_web_page_preview(true)
        .await?;
    Ok(())
}

/// Everything that posts outside the current chat: channel posts, user
/// broadcasts and the daily digests. Clones share one broadcast lock, so
/// a manual `/broadcast` and a scheduled digest never overlap.
#[derive(Clone)]
pub struct Broadcaster {
    bot: Bot,
    db: DatabaseManager,
    channel: Recipient,
    branding: Branding,
    delay: Duration,
    lock: Arc<Mutex<()>>,
}

impl Broadcaster {
    pub fn new(bot: Bot, db: DatabaseManager, config: &Config, branding: Branding) -> Self {
        Self {
            bot,
            db,
            channel: config.channel_recipient(),
            branding,
            delay: Duration::from_millis(config.broadcast_delay_ms),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    fn begin(&self) -> Result<MutexGuard<'_, ()>, BroadcastError> {
        self.lock.try_lock().map_err(|_| BroadcastError::AlreadyRunning)
    }

    pub async fn send_to_channel(&self, text: String) -> Result<(), RequestError> {
        send_markdown(&self.bot, self.channel.clone(), text).await
    }

    /// Posts one product to the channel, as a photo when it has an image
    /// and the text fits in a caption.
    pub async fn publish_product(&self, product: &Product) -> Result<(), BroadcastError> {
        let text = templates::channel_post(product, &self.branding);

        let image = product
            .image_url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok());

        match image {
            Some(url) if templates::fits_caption(&text) => {
                self.bot
                    .send_photo(self.channel.clone(), InputFile::url(url))
                    .caption(text)
                    .parse_mode(ParseMode::MarkdownV2)
                    .await?;
            }
            _ => self.send_to_channel(text).await?,
        }

        tracing::info!("Published product {} to channel {:?}", product.id, self.channel);
        Ok(())
    }

    pub async fn broadcast_product(&self, product: &Product) -> Result<BroadcastReport, BroadcastError> {
        let text = templates::broadcast_post(product, &self.branding);
        let report = self.broadcast_text(text).await?;
        log_broadcast_summary(&format!("product {}", product.id), report.delivered, report.failed);
        Ok(report)
    }

    /// Free text from the admin, shown literally.
    pub async fn broadcast_announcement(&self, body: &str) -> Result<BroadcastReport, BroadcastError> {
        let report = self.broadcast_text(templates::custom_announcement(body)).await?;
        log_broadcast_summary("announcement", report.delivered, report.failed);
        Ok(report)
    }

    async fn broadcast_text(&self, text: String) -> Result<BroadcastReport, BroadcastError> {
        let _guard = self.begin()?;
        let recipients = self.recipients().await?;
        Ok(self.deliver(&recipients, text).await)
    }

    async fn recipients(&self) -> Result<Vec<ChatId>, sqlx::Error> {
        Ok(User::broadcast_recipients(&self.db.pool)
            .await?
            .into_iter()
            .map(ChatId)
            .collect())
    }

    async fn deliver(&self, recipients: &[ChatId], text: String) -> BroadcastReport {
        deliver_sequentially(recipients, self.delay, |chat_id| {
            let bot = self.bot.clone();
            let text = text.clone();
            async move { send_markdown(&bot, chat_id.into(), text).await }
        })
        .await
    }

    /// Best regular deals to the channel and then to every recipient.
    pub async fn run_morning_digest(&self) -> Result<DigestReport, BroadcastError> {
        let _guard = self.begin()?;
        let products = Product::morning_picks(&self.db.pool, DIGEST_SIZE).await?;
        let now = Utc::now();

        let report = self
            .run_digest(
                &products,
                templates::morning_digest_channel(&products, &now, &self.branding),
                templates::morning_digest_users(&products, &self.branding),
            )
            .await?;
        log_broadcast_summary("morning digest", report.users.delivered, report.users.failed);
        Ok(report)
    }

    /// Flash sales first, then the biggest discounts.
    pub async fn run_evening_digest(&self) -> Result<DigestReport, BroadcastError> {
        let _guard = self.begin()?;
        let products = Product::evening_picks(&self.db.pool, DIGEST_SIZE).await?;

        let report = self
            .run_digest(
                &products,
                templates::evening_digest_channel(&products),
                templates::evening_digest_users(&products),
            )
            .await?;
        log_broadcast_summary("evening digest", report.users.delivered, report.users.failed);
        Ok(report)
    }

    async fn run_digest(
        &self,
        products: &[Product],
        channel_text: String,
        user_text: String,
    ) -> Result<DigestReport, BroadcastError> {
        let mut report = DigestReport {
            products: products.len(),
            ..DigestReport::default()
        };

        if products.is_empty() {
            tracing::info!("No active products, skipping digest");
            return Ok(report);
        }

        // A channel failure must not stop the direct messages
        match self.send_to_channel(channel_text).await {
            Ok(()) => report.channel_posted = true,
            Err(e) => tracing::error!("Failed to post digest to channel {:?}: {}", self.channel, e),
        }

        let recipients = self.recipients().await?;
        report.users = self.deliver(&recipients, user_text).await;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_deliver_counts_failures_without_stopping() {
        let recipients: Vec<ChatId> = (1..=5).map(ChatId).collect();
        let calls = AtomicUsize::new(0);

        let report = deliver_sequentially(&recipients, Duration::ZERO, |chat_id| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if chat_id.0 % 2 == 0 {
                    Err(format!("chat {} blocked the bot", chat_id.0))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(report, BroadcastReport { delivered: 3, failed: 2 });
        assert_eq!(report.attempted(), 5);
    }

    #[tokio::test]
    async fn test_deliver_in_order() {
        let recipients = vec![ChatId(30), ChatId(10), ChatId(20)];
        let seen = std::sync::Mutex::new(Vec::new());

        deliver_sequentially(&recipients, Duration::from_millis(1), |chat_id| {
            seen.lock().unwrap().push(chat_id.0);
            async { Ok::<(), String>(()) }
        })
        .await;

        assert_eq!(*seen.lock().unwrap(), vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn test_deliver_to_nobody() {
        let report = deliver_sequentially(&[], Duration::from_secs(60), |_| async {
            Ok::<(), String>(())
        })
        .await;
        assert_eq!(report, BroadcastReport::default());
    }

    /// A bot whose API calls all fail with a connection error.
    fn unreachable_bot() -> Bot {
        Bot::new("123:test").set_api_url(Url::parse("http://127.0.0.1:9").unwrap())
    }

    async fn test_broadcaster_with(bot: Bot) -> (Broadcaster, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = DatabaseManager::new(&db_url).await.expect("Failed to create test database");
        db.run_migrations().await.expect("Failed to run migrations");

        let config = Config {
            telegram_bot_token: "123:test".to_string(),
            admin_id: Some(1),
            channel_id: "@promoshopee".to_string(),
            channel_username: "@promoshopee".to_string(),
            database_url: db_url,
            http_port: 0,
            utc_offset_hours: 7,
            morning_hour: 8,
            evening_hour: 20,
            broadcast_delay_ms: 0,
        };
        let branding = Branding::from_config(&config, None);
        (Broadcaster::new(bot, db, &config, branding), temp_dir)
    }

    async fn test_broadcaster() -> (Broadcaster, TempDir) {
        test_broadcaster_with(Bot::new("123:test")).await
    }

    #[tokio::test]
    async fn test_overlapping_broadcast_is_refused() {
        let (broadcaster, _temp_dir) = test_broadcaster().await;
        let other = broadcaster.clone();

        let _running = broadcaster.begin().expect("first broadcast should start");
        assert!(other.is_busy());

        let result = other.broadcast_announcement("Halo semua").await;
        assert!(matches!(result, Err(BroadcastError::AlreadyRunning)));

        let result = other.run_evening_digest().await;
        assert!(matches!(result, Err(BroadcastError::AlreadyRunning)));
    }

    #[tokio::test]
    async fn test_digest_without_products_sends_nothing() {
        let (broadcaster, _temp_dir) = test_broadcaster().await;

        // No products: the digest returns before any network call
        let report = broadcaster.run_morning_digest().await.expect("digest should succeed");
        assert_eq!(report, DigestReport::default());
        assert!(!broadcaster.is_busy());
    }

    #[tokio::test]
    async fn test_broadcast_without_recipients() {
        let (broadcaster, _temp_dir) = test_broadcaster().await;

        let report = broadcaster
            .broadcast_announcement("Promo 12.12 dimulai!")
            .await
            .expect("empty broadcast should succeed");
        assert_eq!(report.attempted(), 0);
    }

    #[tokio::test]
    async fn test_channel_failure_still_messages_users() {
        let (broadcaster, _temp_dir) = test_broadcaster_with(unreachable_bot()).await;
        let pool = &broadcaster.db.pool;

        let new = NewProduct {
            name: "Kaos Polos".to_string(),
            category: "Fashion Pria".to_string(),
            original_price: 100_000,
            promo_price: 80_000,
            discount_percent: 20,
            affiliate_url: "https://shopee.co.id/kaos".to_string(),
            image_url: None,
            description: "Bahan katun".to_string(),
            limited_stock: false,
            flash_sale: false,
        };
        Product::create(pool, &new).await.expect("Failed to create product");
        User::record_activity(pool, 101, Some("budi"), "Budi", Some(true)).await.expect("Failed to add user");
        User::record_activity(pool, 102, None, "Sari", Some(true)).await.expect("Failed to add user");

        let report = broadcaster.run_morning_digest().await.expect("digest should finish");

        assert_eq!(report.products, 1);
        assert!(!report.channel_posted);
        assert_eq!(report.users, BroadcastReport { delivered: 0, failed: 2 });
        assert!(!broadcaster.is_busy());
    }
}
