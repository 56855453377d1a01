use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{self, ensure_admin, Command, Sender};
use crate::bot::BotContext;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: BotContext,
) -> ResponseResult<()> {
    // Channel posts and anonymous admins carry no sender
    let Some(sender) = Sender::from_message(&msg) else {
        tracing::debug!("Ignoring /{} without a sender in chat {}", cmd.name(), msg.chat.id.0);
        return Ok(());
    };

    if cmd.is_admin_only() && !ensure_admin(&bot, msg.chat.id, &sender, &ctx.config, &cmd).await? {
        return Ok(());
    }

    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
        }
        Command::Start => commands::start::handle_start(bot, msg, sender, &ctx).await?,
        Command::Promo => commands::promo::handle_promo(bot, msg, sender, &ctx).await?,
        Command::FlashSale => commands::promo::handle_flash_sale(bot, msg, sender, &ctx).await?,
        Command::Kategori => commands::promo::handle_kategori(bot, msg, sender, &ctx).await?,
        Command::Notif => commands::promo::handle_notif(bot, msg, sender, &ctx).await?,
        Command::Info => commands::info::handle_info(bot, msg, sender, &ctx).await?,
        Command::Tambah(input) => commands::products::handle_tambah(bot, msg, sender, input, &ctx).await?,
        Command::LihatProduk => commands::products::handle_lihat_produk(bot, msg, sender, &ctx).await?,
        Command::Toggle(id) => commands::products::handle_toggle(bot, msg, sender, id, &ctx).await?,
        Command::Hapus(id) => commands::products::handle_hapus(bot, msg, sender, id, &ctx).await?,
        Command::KirimChannel(id) => commands::publish::handle_kirim_channel(bot, msg, sender, id, &ctx).await?,
        Command::Broadcast(id) => commands::publish::handle_broadcast(bot, msg, sender, id, &ctx).await?,
        Command::Blast => commands::publish::handle_blast(bot, msg, sender, &ctx).await?,
        Command::BlastCustom(body) => commands::publish::handle_blast_custom(bot, msg, sender, body, &ctx).await?,
    }
    Ok(())
}
