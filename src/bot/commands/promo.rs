use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::InlineKeyboardMarkup;

use crate::bot::commands::start::{ensure_member, remember_user};
use crate::bot::commands::Sender;
use crate::bot::{keyboards, reply_markdown, templates, BotContext};
use crate::database::models::{Product, User, UserPreference};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success, log_database_error};

/// Products shown by `/promo`, `/flashsale` and a category pick.
pub const LIST_SIZE: i64 = 5;

/// A rendered screen: MarkdownV2 text plus its keyboard.
pub type Screen = (String, Option<InlineKeyboardMarkup>);

pub async fn promo_screen(ctx: &BotContext) -> Result<Screen, sqlx::Error> {
    let products = Product::top_active(&ctx.db.pool, LIST_SIZE).await?;
    let text = templates::promo_list(&products, &Utc::now(), ctx.branding());
    Ok((text, None))
}

pub async fn flash_sale_screen(ctx: &BotContext) -> Result<Screen, sqlx::Error> {
    let products = Product::flash_sales(&ctx.db.pool, LIST_SIZE).await?;
    let text = templates::flash_sale_list(&products, ctx.branding());
    let keyboard = products
        .is_empty()
        .then(|| keyboards::empty_flash_sale_keyboard(&ctx.config.channel_link()));
    Ok((text, keyboard))
}

pub fn category_picker_screen() -> Screen {
    (templates::category_picker(), Some(keyboards::category_keyboard()))
}

/// Saves the pick as a preference and lists matching deals.
pub async fn category_screen(ctx: &BotContext, user_id: i64, slug: &str) -> Result<Screen, sqlx::Error> {
    let label = keyboards::category_label(slug).unwrap_or(slug);

    UserPreference::save(&ctx.db.pool, user_id, slug).await?;
    let products = Product::by_category(&ctx.db.pool, label, LIST_SIZE).await?;

    Ok((
        templates::category_result(label, &products),
        Some(keyboards::category_result_keyboard()),
    ))
}

async fn send_screen(
    bot: &Bot,
    msg: &Message,
    sender: &Sender,
    command: &str,
    screen: Result<Screen, sqlx::Error>,
) -> ResponseResult<()> {
    match screen {
        Ok((text, keyboard)) => {
            reply_markdown(bot, msg.chat.id, text, keyboard).await?;
            log_command_success(command, sender.id(), None);
        }
        Err(e) => {
            log_database_error(command, "products", &e.to_string());
            log_command_error(command, sender.id(), &e.to_string());
            CommandFeedback::new(bot.clone(), msg.chat.id)
                .error("Gagal memuat promo. Coba lagi sebentar lagi.")
                .await?;
        }
    }
    Ok(())
}

pub async fn handle_promo(bot: Bot, msg: Message, sender: Sender, ctx: &BotContext) -> ResponseResult<()> {
    log_command_start("promo", sender.display_name(), sender.id(), msg.chat.id.0, None);
    if !ensure_member(&bot, msg.chat.id, &sender, ctx).await? {
        return Ok(());
    }
    send_screen(&bot, &msg, &sender, "promo", promo_screen(ctx).await).await
}

pub async fn handle_flash_sale(bot: Bot, msg: Message, sender: Sender, ctx: &BotContext) -> ResponseResult<()> {
    log_command_start("flashsale", sender.display_name(), sender.id(), msg.chat.id.0, None);
    if !ensure_member(&bot, msg.chat.id, &sender, ctx).await? {
        return Ok(());
    }
    send_screen(&bot, &msg, &sender, "flashsale", flash_sale_screen(ctx).await).await
}

pub async fn handle_kategori(bot: Bot, msg: Message, sender: Sender, ctx: &BotContext) -> ResponseResult<()> {
    log_command_start("kategori", sender.display_name(), sender.id(), msg.chat.id.0, None);
    if !ensure_member(&bot, msg.chat.id, &sender, ctx).await? {
        return Ok(());
    }
    send_screen(&bot, &msg, &sender, "kategori", Ok(category_picker_screen())).await
}

/// Flips the sender's own notification flag.
pub async fn handle_notif(bot: Bot, msg: Message, sender: Sender, ctx: &BotContext) -> ResponseResult<()> {
    log_command_start("notif", sender.display_name(), sender.id(), msg.chat.id.0, None);
    remember_user(ctx, &sender, None).await;

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let toggled = async {
        let user = User::find_by_id(&ctx.db.pool, sender.id())
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let enabled = !user.notifications_enabled;
        User::set_notifications(&ctx.db.pool, sender.id(), enabled).await?;
        Ok::<bool, sqlx::Error>(enabled)
    }
    .await;

    match toggled {
        Ok(enabled) => {
            reply_markdown(&bot, msg.chat.id, templates::notifications_toggled(enabled), None).await?;
            log_command_success("notif", sender.id(), Some(if enabled { "on" } else { "off" }));
        }
        Err(e) => {
            log_database_error("set_notifications", "users", &e.to_string());
            feedback.error("Gagal mengubah pengaturan notifikasi.").await?;
        }
    }
    Ok(())
}
