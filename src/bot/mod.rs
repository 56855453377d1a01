/// Command definitions and per-command handlers
pub mod commands;
/// Update routing for messages and callback queries
pub mod handlers;
/// Inline keyboards and callback data
pub mod keyboards;
/// MarkdownV2 message templates
pub mod templates;

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ParseMode};

use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::services::broadcast::Broadcaster;
use crate::utils::feedback::FeedbackType;
use templates::{telegram_len, Branding, MESSAGE_LIMIT};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct BotContext {
    pub db: DatabaseManager,
    pub config: Arc<Config>,
    pub broadcaster: Broadcaster,
}

impl BotContext {
    pub fn new(bot: Bot, db: DatabaseManager, config: Arc<Config>, bot_username: Option<String>) -> Self {
        let branding = Branding::from_config(&config, bot_username);
        let broadcaster = Broadcaster::new(bot, db.clone(), &config, branding);
        Self {
            db,
            config,
            broadcaster,
        }
    }

    pub fn branding(&self) -> &Branding {
        self.broadcaster.branding()
    }
}

/// Swaps text Telegram would reject for length with a readable error.
pub fn within_message_limit(text: String) -> String {
    let len = telegram_len(&text);
    if len <= MESSAGE_LIMIT {
        return text;
    }
    tracing::error!("Message of {} UTF-16 units exceeds the {} limit, not sent", len, MESSAGE_LIMIT);
    FeedbackType::Error.render("Pesan terlalu panjang untuk ditampilkan. Silakan hubungi admin.")
}

/// Sends MarkdownV2 text with link previews off and an optional keyboard.
pub async fn reply_markdown(
    bot: &Bot,
    chat_id: ChatId,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<Message> {
    let request = bot
        .send_message(chat_id, within_message_limit(text))
        .parse_mode(ParseMode::MarkdownV2)
        .disable_web_page_preview(true);

    match keyboard {
        Some(markup) => request.reply_markup(markup).await,
        None => request.await,
    }
}

/// Edits a message in place, used when answering inline buttons.
pub async fn edit_markdown(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<()> {
    let request = bot
        .edit_message_text(chat_id, message_id, within_message_limit(text))
        .parse_mode(ParseMode::MarkdownV2)
        .disable_web_page_preview(true);

    match keyboard {
        Some(markup) => request.reply_markup(markup).await?,
        None => request.await?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_sent_as_is() {
        let text = "🔥 *Promo*".to_string();
        assert_eq!(within_message_limit(text.clone()), text);
    }

    #[test]
    fn test_oversized_text_becomes_error() {
        let text = within_message_limit("a".repeat(MESSAGE_LIMIT + 1));
        assert!(text.starts_with("❌"));
        assert!(text.contains("Pesan terlalu panjang"));
    }
}
