use teloxide::prelude::*;

use crate::bot::commands::Sender;
use crate::bot::{reply_markdown, templates, BotContext};
use crate::database::models::Product;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{
    log_command_error, log_command_start, log_command_success, log_database_error, log_database_operation,
};
use crate::utils::validation::{parse_product_id, parse_product_input};

/// Rows shown by `/lihat_produk`.
const ADMIN_LIST_SIZE: i64 = 20;

pub async fn handle_tambah(
    bot: Bot,
    msg: Message,
    sender: Sender,
    input: String,
    ctx: &BotContext,
) -> ResponseResult<()> {
    log_command_start("tambah", sender.display_name(), sender.id(), msg.chat.id.0, Some(input.as_str()));
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    if input.trim().is_empty() {
        reply_markdown(&bot, msg.chat.id, templates::add_product_usage(), None).await?;
        return Ok(());
    }

    let new_product = match parse_product_input(&input) {
        Ok(product) => product,
        Err(e) => {
            log_command_error("tambah", sender.id(), &e.to_string());
            feedback
                .validation_error(&e.to_string(), "Ketik /tambah tanpa argumen untuk melihat format lengkap.")
                .await?;
            return Ok(());
        }
    };

    match Product::create(&ctx.db.pool, &new_product).await {
        Ok(product) => {
            log_database_operation("create", "products", Some(format!("id={}", product.id).as_str()));
            reply_markdown(&bot, msg.chat.id, templates::product_added(&product), None).await?;
            if product.discount_percent == 0 {
                feedback
                    .warning("Harga promo sama dengan harga asli, produk ini tidak punya diskon.")
                    .await?;
            }
            log_command_success("tambah", sender.id(), Some(product.name.as_str()));
        }
        Err(e) => {
            log_database_error("create", "products", &e.to_string());
            feedback.error("Gagal menyimpan produk ke database.").await?;
        }
    }
    Ok(())
}

pub async fn handle_lihat_produk(bot: Bot, msg: Message, sender: Sender, ctx: &BotContext) -> ResponseResult<()> {
    log_command_start("lihat_produk", sender.display_name(), sender.id(), msg.chat.id.0, None);

    match Product::recent(&ctx.db.pool, ADMIN_LIST_SIZE).await {
        Ok(products) => {
            let text = templates::admin_product_list(&products, ctx.config.utc_offset_hours);
            reply_markdown(&bot, msg.chat.id, text, None).await?;
            log_command_success("lihat_produk", sender.id(), Some(format!("{} rows", products.len()).as_str()));
        }
        Err(e) => {
            log_database_error("recent", "products", &e.to_string());
            CommandFeedback::new(bot, msg.chat.id)
                .error("Gagal memuat daftar produk.")
                .await?;
        }
    }
    Ok(())
}

/// Resolves the id argument of `/toggle`, `/hapus`, `/kirim_channel` and
/// `/broadcast`, answering with usage help when it is missing or malformed.
pub async fn require_product_id(
    feedback: &CommandFeedback,
    command: &str,
    raw: &str,
) -> ResponseResult<Option<i64>> {
    match parse_product_id(raw) {
        Some(id) => Ok(Some(id)),
        None => {
            feedback
                .validation_error(
                    "ID produk tidak valid",
                    &format!("Gunakan: /{command} <id>. Lihat ID dengan /lihat_produk"),
                )
                .await?;
            Ok(None)
        }
    }
}

pub async fn handle_toggle(
    bot: Bot,
    msg: Message,
    sender: Sender,
    raw_id: String,
    ctx: &BotContext,
) -> ResponseResult<()> {
    log_command_start("toggle", sender.display_name(), sender.id(), msg.chat.id.0, Some(raw_id.as_str()));
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let Some(id) = require_product_id(&feedback, "toggle", &raw_id).await? else {
        return Ok(());
    };

    match Product::toggle_active(&ctx.db.pool, id).await {
        Ok(Some(active)) => {
            let state = if active { "diaktifkan" } else { "dinonaktifkan" };
            feedback.success(&format!("Produk #{id} berhasil {state}.")).await?;
            log_command_success("toggle", sender.id(), Some(state));
        }
        Ok(None) => {
            feedback.error(&format!("Produk #{id} tidak ditemukan.")).await?;
        }
        Err(e) => {
            log_database_error("toggle_active", "products", &e.to_string());
            feedback.error("Gagal mengubah status produk.").await?;
        }
    }
    Ok(())
}

pub async fn handle_hapus(
    bot: Bot,
    msg: Message,
    sender: Sender,
    raw_id: String,
    ctx: &BotContext,
) -> ResponseResult<()> {
    log_command_start("hapus", sender.display_name(), sender.id(), msg.chat.id.0, Some(raw_id.as_str()));
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let Some(id) = require_product_id(&feedback, "hapus", &raw_id).await? else {
        return Ok(());
    };

    match Product::delete(&ctx.db.pool, id).await {
        Ok(true) => {
            log_database_operation("delete", "products", Some(format!("id={id}").as_str()));
            feedback.success(&format!("Produk #{id} berhasil dihapus.")).await?;
            log_command_success("hapus", sender.id(), None);
        }
        Ok(false) => {
            feedback.error(&format!("Produk #{id} tidak ditemukan.")).await?;
        }
        Err(e) => {
            log_database_error("delete", "products", &e.to_string());
            feedback.error("Gagal menghapus produk.").await?;
        }
    }
    Ok(())
}
