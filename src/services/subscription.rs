use teloxide::prelude::*;
use teloxide::types::{ChatMemberKind, Recipient};

/// Owners, administrators and regular members may use gated features.
pub fn grants_access(kind: &ChatMemberKind) -> bool {
    matches!(
        kind,
        ChatMemberKind::Owner(_) | ChatMemberKind::Administrator(_) | ChatMemberKind::Member
    )
}

/// Asks Telegram whether `user_id` is in the promo channel.
/// Any API failure counts as "not a member".
pub async fn is_channel_member(bot: &Bot, channel: Recipient, user_id: UserId) -> bool {
    match bot.get_chat_member(channel.clone(), user_id).await {
        Ok(member) => grants_access(&member.kind),
        Err(e) => {
            tracing::warn!(
                "Membership check for user {} in {:?} failed, denying access: {}",
                user_id, channel, e
            );
            false
        }
    }
}
