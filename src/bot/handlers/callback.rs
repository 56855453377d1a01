use teloxide::prelude::*;

use crate::bot::commands::promo::{self, Screen};
use crate::bot::commands::start::remember_user;
use crate::bot::commands::Sender;
use crate::bot::keyboards::{self, CallbackAction};
use crate::bot::{edit_markdown, reply_markdown, templates, BotContext};
use crate::database::models::User;
use crate::services::subscription::is_channel_member;
use crate::utils::logging::log_database_error;

/// What to do with the message that carried the pressed button.
struct CallbackReply {
    toast: Option<&'static str>,
    screen: Option<Screen>,
}

impl CallbackReply {
    fn screen(screen: Screen) -> Self {
        Self { toast: None, screen: Some(screen) }
    }

    fn toast(text: &'static str) -> Self {
        Self { toast: Some(text), screen: None }
    }

    fn with_toast(mut self, text: &'static str) -> Self {
        self.toast = Some(text);
        self
    }
}

pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: BotContext) -> ResponseResult<()> {
    let sender = Sender::from_user(&q.from);
    let data = q.data.clone().unwrap_or_default();

    tracing::info!(
        "Callback received: '{}' from user {} ({})",
        data,
        sender.display_name(),
        sender.id()
    );

    let reply = match CallbackAction::parse(&data) {
        Some(action) => handle_action(&bot, action, &sender, &ctx).await,
        None => {
            tracing::warn!("Unknown callback data '{}'", data);
            CallbackReply::toast("Tombol ini sudah tidak berlaku")
        }
    };

    let mut answer = bot.answer_callback_query(q.id.clone());
    if let Some(text) = reply.toast {
        answer = answer.text(text);
    }
    answer.await?;

    if let Some((text, keyboard)) = reply.screen {
        match q.message.as_ref() {
            Some(message) => edit_markdown(&bot, message.chat.id, message.id, text, keyboard).await?,
            None => {
                reply_markdown(&bot, ChatId(sender.id()), text, keyboard).await?;
            }
        }
    }

    Ok(())
}

async fn handle_action(bot: &Bot, action: CallbackAction, sender: &Sender, ctx: &BotContext) -> CallbackReply {
    let channel_link = ctx.config.channel_link();

    match action {
        CallbackAction::CheckSubscribe => {
            let member = is_channel_member(bot, ctx.config.channel_recipient(), sender.user_id).await;
            remember_user(ctx, sender, Some(member)).await;

            if member {
                CallbackReply::screen((
                    templates::welcome_message(&sender.first_name, ctx.branding()),
                    Some(keyboards::main_menu_keyboard(&channel_link)),
                ))
                .with_toast("✅ Terima kasih sudah subscribe!")
            } else {
                CallbackReply::screen((
                    templates::not_subscribed_yet(ctx.branding()),
                    Some(keyboards::subscribe_keyboard(&channel_link)),
                ))
                .with_toast("❌ Kamu belum subscribe channel")
            }
        }
        CallbackAction::MainMenu => CallbackReply::screen((
            templates::main_menu(ctx.branding()),
            Some(keyboards::main_menu_keyboard(&channel_link)),
        )),
        CallbackAction::EnableNotifications => {
            remember_user(ctx, sender, None).await;
            match User::set_notifications(&ctx.db.pool, sender.id(), true).await {
                Ok(_) => CallbackReply::screen((
                    templates::notifications_enabled(ctx.branding()),
                    Some(keyboards::notifications_keyboard(&channel_link)),
                ))
                .with_toast("🔔 Notifikasi aktif"),
                Err(e) => {
                    log_database_error("set_notifications", "users", &e.to_string());
                    CallbackReply::toast("❌ Gagal mengaktifkan notifikasi")
                }
            }
        }
        gated => {
            let member = is_channel_member(bot, ctx.config.channel_recipient(), sender.user_id).await;
            remember_user(ctx, sender, Some(member)).await;
            if !member {
                return CallbackReply::screen((
                    templates::access_restricted(ctx.branding()),
                    Some(keyboards::subscribe_keyboard(&channel_link)),
                ))
                .with_toast("🔒 Subscribe channel dulu ya");
            }
            gated_screen(gated, sender, ctx).await
        }
    }
}

async fn gated_screen(action: CallbackAction, sender: &Sender, ctx: &BotContext) -> CallbackReply {
    let screen = match action {
        CallbackAction::PromoToday => promo::promo_screen(ctx).await,
        CallbackAction::FlashSale => promo::flash_sale_screen(ctx).await,
        CallbackAction::PickCategory => Ok(promo::category_picker_screen()),
        CallbackAction::Category(slug) => promo::category_screen(ctx, sender.id(), &slug).await,
        CallbackAction::CheckSubscribe | CallbackAction::MainMenu | CallbackAction::EnableNotifications => {
            return CallbackReply::toast("Tombol ini sudah tidak berlaku");
        }
    };

    match screen {
        Ok(screen) => CallbackReply::screen(screen),
        Err(e) => {
            log_database_error("callback", "products", &e.to_string());
            CallbackReply::toast("❌ Gagal memuat promo, coba lagi")
        }
    }
}
