pub mod info;
pub mod products;
pub mod promo;
pub mod publish;
pub mod start;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::config::Config;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_admin_denied;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Perintah Bot Promo Shopee:")]
pub enum Command {
    #[command(description = "Tampilkan daftar perintah")]
    Help,
    #[command(description = "Mulai bot dan cek langganan channel")]
    Start,
    #[command(description = "Promo terbaik hari ini")]
    Promo,
    #[command(rename = "flashsale", description = "Flash sale yang sedang berlangsung")]
    FlashSale,
    #[command(description = "Cari promo per kategori")]
    Kategori,
    #[command(description = "Nyalakan atau matikan notifikasi promo")]
    Notif,
    #[command(description = "Statistik bot (admin)")]
    Info,
    #[command(description = "Tambah produk (admin)")]
    Tambah(String),
    #[command(description = "Daftar produk terbaru (admin)")]
    LihatProduk,
    #[command(description = "Kirim produk ke channel (admin)")]
    KirimChannel(String),
    #[command(description = "Kirim produk ke semua user (admin)")]
    Broadcast(String),
    #[command(description = "Aktifkan/nonaktifkan produk (admin)")]
    Toggle(String),
    #[command(description = "Hapus produk (admin)")]
    Hapus(String),
    #[command(description = "Kirim digest pagi sekarang (admin)")]
    Blast,
    #[command(rename = "blastcustom", description = "Kirim pesan bebas ke semua user (admin)")]
    BlastCustom(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Start => "start",
            Command::Promo => "promo",
            Command::FlashSale => "flashsale",
            Command::Kategori => "kategori",
            Command::Notif => "notif",
            Command::Info => "info",
            Command::Tambah(_) => "tambah",
            Command::LihatProduk => "lihat_produk",
            Command::KirimChannel(_) => "kirim_channel",
            Command::Broadcast(_) => "broadcast",
            Command::Toggle(_) => "toggle",
            Command::Hapus(_) => "hapus",
            Command::Blast => "blast",
            Command::BlastCustom(_) => "blastcustom",
        }
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Command::Info
                | Command::Tambah(_)
                | Command::LihatProduk
                | Command::KirimChannel(_)
                | Command::Broadcast(_)
                | Command::Toggle(_)
                | Command::Hapus(_)
                | Command::Blast
                | Command::BlastCustom(_)
        )
    }
}

/// Who sent a command, resolved once per update.
#[derive(Debug, Clone)]
pub struct Sender {
    pub user_id: UserId,
    pub username: Option<String>,
    pub first_name: String,
}

impl Sender {
    pub fn from_message(msg: &Message) -> Option<Self> {
        msg.from().map(Self::from_user)
    }

    pub fn from_user(user: &teloxide::types::User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
        }
    }

    pub fn id(&self) -> i64 {
        self.user_id.0 as i64
    }

    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}

/// Answers non-admins and returns false, so callers can bail out early.
pub async fn ensure_admin(
    bot: &Bot,
    chat_id: ChatId,
    sender: &Sender,
    config: &Config,
    command: &Command,
) -> ResponseResult<bool> {
    if config.is_admin(sender.user_id.0) {
        return Ok(true);
    }

    log_admin_denied(command.name(), sender.display_name(), sender.id());
    CommandFeedback::new(bot.clone(), chat_id).admin_only().await?;
    Ok(false)
}
