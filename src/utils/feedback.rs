use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use crate::utils::markdown::escape_markdown;

/// Feedback types for different command outcomes
#[derive(Debug, Clone)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
    Processing,
}

impl FeedbackType {
    fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
            FeedbackType::Processing => "⏳",
        }
    }

    /// Plain text prefixed with the emoji and escaped for MarkdownV2.
    pub fn render(&self, message: &str) -> String {
        format!("{} {}", self.emoji(), escape_markdown(message))
    }
}

/// Short status replies for command handlers. Messages are plain text;
/// use the template module for formatted content.
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    /// Send immediate feedback message
    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, feedback_type.render(message))
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    /// Send a processing message that can be updated later
    pub async fn send_processing(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Processing, message).await
    }

    /// Replace an earlier feedback message with already formatted MarkdownV2 text
    pub async fn replace_with_markdown(&self, message_id: MessageId, text: String) -> ResponseResult<Message> {
        self.bot
            .edit_message_text(self.chat_id, message_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    pub async fn success(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn warning(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Warning, message).await
    }

    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Send validation error with helpful suggestion
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> ResponseResult<Message> {
        let message = format!("{error}\n\n💡 Saran: {suggestion}");
        self.send(FeedbackType::Error, &message).await
    }

    /// Standard refusal for admin commands
    pub async fn admin_only(&self) -> ResponseResult<Message> {
        self.error("Command ini hanya untuk admin!").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Success.emoji(), "✅");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
        assert_eq!(FeedbackType::Error.emoji(), "❌");
        assert_eq!(FeedbackType::Info.emoji(), "ℹ️");
        assert_eq!(FeedbackType::Processing.emoji(), "⏳");
    }

    #[test]
    fn test_render_escapes_message() {
        assert_eq!(
            FeedbackType::Error.render("Produk #3 tidak ditemukan!"),
            "❌ Produk \\#3 tidak ditemukan\\!"
        );
    }
}
