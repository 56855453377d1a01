use teloxide::prelude::*;

use crate::bot::commands::Sender;
use crate::bot::templates::BotStats;
use crate::bot::{reply_markdown, templates, BotContext};
use crate::database::models::{Product, User};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_start, log_command_success, log_database_error};

pub async fn collect_stats(pool: &sqlx::SqlitePool) -> Result<BotStats, sqlx::Error> {
    Ok(BotStats {
        products: Product::count(pool).await?,
        active_products: Product::count_active(pool).await?,
        users: User::count(pool).await?,
        subscribers: User::count_subscribed(pool).await?,
        broadcast_recipients: User::broadcast_recipients(pool).await?.len(),
    })
}

pub async fn handle_info(bot: Bot, msg: Message, sender: Sender, ctx: &BotContext) -> ResponseResult<()> {
    log_command_start("info", sender.display_name(), sender.id(), msg.chat.id.0, None);

    match collect_stats(&ctx.db.pool).await {
        Ok(stats) => {
            reply_markdown(&bot, msg.chat.id, templates::bot_info(&stats, ctx.branding()), None).await?;
            log_command_success("info", sender.id(), None);
        }
        Err(e) => {
            log_database_error("collect_stats", "products/users", &e.to_string());
            CommandFeedback::new(bot, msg.chat.id)
                .error("Gagal memuat statistik bot.")
                .await?;
        }
    }
    Ok(())
}
