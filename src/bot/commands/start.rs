use teloxide::prelude::*;

use crate::bot::commands::Sender;
use crate::bot::{keyboards, reply_markdown, templates, BotContext};
use crate::database::models::User;
use crate::services::subscription::is_channel_member;
use crate::utils::logging::{log_command_start, log_command_success, log_database_error};

/// Upserts the sender. Failures are logged and otherwise ignored so a
/// storage hiccup never blocks a reply.
pub async fn remember_user(ctx: &BotContext, sender: &Sender, subscribed: Option<bool>) {
    if let Err(e) = User::record_activity(
        &ctx.db.pool,
        sender.id(),
        sender.username.as_deref(),
        &sender.first_name,
        subscribed,
    )
    .await
    {
        log_database_error("record_activity", "users", &e.to_string());
    }
}

/// Checks channel membership and records the result. Non-members get the
/// access-restricted prompt and `false`.
pub async fn ensure_member(
    bot: &Bot,
    chat_id: ChatId,
    sender: &Sender,
    ctx: &BotContext,
) -> ResponseResult<bool> {
    let member = is_channel_member(bot, ctx.config.channel_recipient(), sender.user_id).await;
    remember_user(ctx, sender, Some(member)).await;

    if !member {
        reply_markdown(
            bot,
            chat_id,
            templates::access_restricted(ctx.branding()),
            Some(keyboards::subscribe_keyboard(&ctx.config.channel_link())),
        )
        .await?;
    }
    Ok(member)
}

pub async fn handle_start(bot: Bot, msg: Message, sender: Sender, ctx: &BotContext) -> ResponseResult<()> {
    log_command_start("start", sender.display_name(), sender.id(), msg.chat.id.0, None);

    let member = is_channel_member(&bot, ctx.config.channel_recipient(), sender.user_id).await;
    remember_user(ctx, &sender, Some(member)).await;

    let channel_link = ctx.config.channel_link();
    if member {
        reply_markdown(
            &bot,
            msg.chat.id,
            templates::welcome_message(&sender.first_name, ctx.branding()),
            Some(keyboards::main_menu_keyboard(&channel_link)),
        )
        .await?;
    } else {
        reply_markdown(
            &bot,
            msg.chat.id,
            templates::subscribe_prompt(&sender.first_name, ctx.branding()),
            Some(keyboards::subscribe_keyboard(&channel_link)),
        )
        .await?;
    }

    log_command_success("start", sender.id(), Some(if member { "member" } else { "not subscribed" }));
    Ok(())
}
