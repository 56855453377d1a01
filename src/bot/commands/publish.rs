use teloxide::prelude::*;
use teloxide::types::MessageId;

use crate::bot::commands::products::require_product_id;
use crate::bot::commands::Sender;
use crate::bot::{templates, BotContext};
use crate::database::models::Product;
use crate::services::broadcast::{BroadcastError, BroadcastReport};
use crate::utils::feedback::{CommandFeedback, FeedbackType};
use crate::utils::logging::{log_command_error, log_command_start, log_command_success, log_database_error};

/// Loads an active product, answering the admin when it is missing.
async fn load_active_product(
    feedback: &CommandFeedback,
    ctx: &BotContext,
    id: i64,
) -> ResponseResult<Option<Product>> {
    match Product::find_active_by_id(&ctx.db.pool, id).await {
        Ok(Some(product)) => Ok(Some(product)),
        Ok(None) => {
            feedback
                .error(&format!("Produk #{id} tidak ditemukan atau sedang nonaktif."))
                .await?;
            Ok(None)
        }
        Err(e) => {
            log_database_error("find_active_by_id", "products", &e.to_string());
            feedback.error("Gagal membaca produk dari database.").await?;
            Ok(None)
        }
    }
}

/// Swaps the "processing" message for the final outcome of a user broadcast.
async fn finish_broadcast(
    feedback: &CommandFeedback,
    processing: MessageId,
    command: &str,
    sender: &Sender,
    subject: &str,
    result: Result<BroadcastReport, BroadcastError>,
) -> ResponseResult<()> {
    match result {
        Ok(report) => {
            feedback
                .replace_with_markdown(processing, templates::broadcast_summary(subject, &report))
                .await?;
            log_command_success(
                command,
                sender.id(),
                Some(format!("{}/{} delivered", report.delivered, report.attempted()).as_str()),
            );
        }
        Err(e) => {
            log_command_error(command, sender.id(), &e.to_string());
            feedback
                .replace_with_markdown(processing, FeedbackType::Error.render(&e.to_string()))
                .await?;
        }
    }
    Ok(())
}

pub async fn handle_kirim_channel(
    bot: Bot,
    msg: Message,
    sender: Sender,
    raw_id: String,
    ctx: &BotContext,
) -> ResponseResult<()> {
    log_command_start("kirim_channel", sender.display_name(), sender.id(), msg.chat.id.0, Some(raw_id.as_str()));
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let Some(id) = require_product_id(&feedback, "kirim_channel", &raw_id).await? else {
        return Ok(());
    };
    let Some(product) = load_active_product(&feedback, ctx, id).await? else {
        return Ok(());
    };

    match ctx.broadcaster.publish_product(&product).await {
        Ok(()) => {
            feedback
                .success(&format!(
                    "Produk \"{}\" berhasil dikirim ke channel {}",
                    product.name, ctx.config.channel_username
                ))
                .await?;
            log_command_success("kirim_channel", sender.id(), Some(product.name.as_str()));
        }
        Err(e) => {
            log_command_error("kirim_channel", sender.id(), &e.to_string());
            feedback
                .validation_error(
                    &e.to_string(),
                    "Pastikan bot sudah menjadi admin di channel dan CHANNEL_ID benar.",
                )
                .await?;
        }
    }
    Ok(())
}

pub async fn handle_broadcast(
    bot: Bot,
    msg: Message,
    sender: Sender,
    raw_id: String,
    ctx: &BotContext,
) -> ResponseResult<()> {
    log_command_start("broadcast", sender.display_name(), sender.id(), msg.chat.id.0, Some(raw_id.as_str()));
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let Some(id) = require_product_id(&feedback, "broadcast", &raw_id).await? else {
        return Ok(());
    };
    let Some(product) = load_active_product(&feedback, ctx, id).await? else {
        return Ok(());
    };

    let processing = feedback.send_processing("Mengirim broadcast ke semua user...").await?;
    let result = ctx.broadcaster.broadcast_product(&product).await;
    finish_broadcast(&feedback, processing.id, "broadcast", &sender, &product.name, result).await
}

/// Runs the morning digest right away.
pub async fn handle_blast(bot: Bot, msg: Message, sender: Sender, ctx: &BotContext) -> ResponseResult<()> {
    log_command_start("blast", sender.display_name(), sender.id(), msg.chat.id.0, None);
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let processing = feedback.send_processing("Mengirim promo pagi ke channel dan user...").await?;

    match ctx.broadcaster.run_morning_digest().await {
        Ok(report) if report.products == 0 => {
            feedback
                .replace_with_markdown(
                    processing.id,
                    FeedbackType::Warning.render("Belum ada produk aktif untuk dikirim."),
                )
                .await?;
        }
        Ok(report) => {
            let subject = if report.channel_posted {
                format!("{} produk, channel terkirim", report.products)
            } else {
                format!("{} produk, channel gagal", report.products)
            };
            finish_broadcast(&feedback, processing.id, "blast", &sender, &subject, Ok(report.users)).await?;
        }
        Err(e) => {
            finish_broadcast(&feedback, processing.id, "blast", &sender, "", Err(e)).await?;
        }
    }
    Ok(())
}

/// Sends the admin's text, escaped, to every broadcast recipient.
pub async fn handle_blast_custom(
    bot: Bot,
    msg: Message,
    sender: Sender,
    body: String,
    ctx: &BotContext,
) -> ResponseResult<()> {
    log_command_start("blastcustom", sender.display_name(), sender.id(), msg.chat.id.0, None);
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    if body.trim().is_empty() {
        feedback
            .validation_error("Pesan tidak boleh kosong", "Gunakan: /blastcustom <pesan>")
            .await?;
        return Ok(());
    }

    let processing = feedback.send_processing("Mengirim pengumuman ke semua user...").await?;
    let result = ctx.broadcaster.broadcast_announcement(&body).await;
    finish_broadcast(&feedback, processing.id, "blastcustom", &sender, "Pengumuman", result).await
}
