//! # Shopee Promo Bot Main Entry Point
//!
//! Initializes logging, loads configuration, prepares the database,
//! starts the daily broadcast schedule and the health server, and runs
//! the Telegram dispatcher until Ctrl-C.

use std::sync::Arc;

use anyhow::Result;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopee_promo_bot::bot::handlers::BotHandler;
use shopee_promo_bot::bot::BotContext;
use shopee_promo_bot::config::Config;
use shopee_promo_bot::database::connection::DatabaseManager;
use shopee_promo_bot::services::health::HealthService;
use shopee_promo_bot::services::scheduler::DailyBroadcastService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopee_promo_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    info!("Starting Shopee Promo Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Channel: {}",
        config.database_url, config.http_port, config.channel_username
    );
    if config.admin_id.is_none() {
        tracing::warn!("ADMIN_ID is not set, admin commands are disabled");
    }

    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let bot_username = match bot.get_me().await {
        Ok(me) => me.user.username.clone(),
        Err(e) => {
            tracing::warn!("Could not fetch bot profile: {}", e);
            None
        }
    };
    let ctx = BotContext::new(bot.clone(), db_arc.as_ref().clone(), config.clone(), bot_username);
    let handler = BotHandler::new(ctx.clone());
    info!("Telegram bot initialized successfully");

    info!("Initializing daily broadcast service...");
    let mut broadcast_service = DailyBroadcastService::new(
        ctx.broadcaster.clone(),
        config.morning_hour,
        config.evening_hour,
        config.utc_offset_hours,
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to create broadcast service: {}", e))?;

    if let Err(e) = broadcast_service.start().await {
        tracing::error!("Failed to start broadcast service: {}", e);
    }

    let health_service = HealthService::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        let storage: Arc<InMemStorage<()>> = InMemStorage::new();
        Dispatcher::builder(bot, handler.schema())
            .dependencies(dptree::deps![storage])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = broadcast_service.stop().await {
        tracing::warn!("Error stopping broadcast service: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
