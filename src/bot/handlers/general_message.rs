use teloxide::prelude::*;

use crate::utils::feedback::CommandFeedback;

/// Hint shown for text that is not a known command, or `None` to stay quiet.
pub fn hint_for(text: &str) -> Option<(String, &'static str)> {
    let text = text.trim();

    if text.starts_with('/') {
        let command = text.split_whitespace().next().unwrap_or(text);
        return Some((
            format!("Command tidak dikenal: {command}"),
            "Ketik /help untuk melihat semua command.",
        ));
    }

    let lower = text.to_lowercase();
    if lower.contains("promo") || lower.contains("diskon") {
        return Some((String::new(), "Cari promo? Ketik /promo atau /flashsale"));
    }

    None
}

/// Private-chat fallback for anything the command parser rejected.
pub async fn handle_general_message(bot: Bot, msg: Message) -> ResponseResult<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }

    let Some((error, suggestion)) = msg.text().and_then(hint_for) else {
        return Ok(());
    };

    let feedback = CommandFeedback::new(bot, msg.chat.id);
    if error.is_empty() {
        feedback.info(suggestion).await?;
    } else {
        feedback.validation_error(&error, suggestion).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_hint() {
        let (error, suggestion) = hint_for("/diskonan sekarang").unwrap();
        assert_eq!(error, "Command tidak dikenal: /diskonan");
        assert!(suggestion.contains("/help"));
    }

    #[test]
    fn test_promo_keyword_hint() {
        let (error, suggestion) = hint_for("ada diskon hari ini?").unwrap();
        assert!(error.is_empty());
        assert!(suggestion.contains("/promo"));
    }

    #[test]
    fn test_small_talk_is_ignored() {
        assert_eq!(hint_for("terima kasih"), None);
    }
}
