//! MarkdownV2 message templates.
//!
//! All functions here are pure: they take rows and settings and return the
//! text to send. Anything that did not come from a string literal in this
//! file is escaped before it is interpolated.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::database::models::Product;
use crate::services::broadcast::BroadcastReport;
use crate::utils::datetime::{format_promo_date, format_stored_timestamp};
use crate::utils::markdown::{escape_markdown as e, link};
use crate::utils::pricing::format_rupiah;

/// Photo captions are capped by Telegram at 1024 UTF-16 units.
pub const CAPTION_LIMIT: usize = 1024;
/// Text messages are capped by Telegram at 4096 UTF-16 units.
pub const MESSAGE_LIMIT: usize = 4096;
/// Descriptions longer than this are shortened in multi-product lists.
pub const LIST_DESCRIPTION_LEN: usize = 160;

/// Length as Telegram counts it.
pub fn telegram_len(text: &str) -> usize {
    text.encode_utf16().count()
}

pub fn fits_caption(text: &str) -> bool {
    telegram_len(text) <= CAPTION_LIMIT
}

/// Per-deployment values shown in messages.
#[derive(Debug, Clone)]
pub struct Branding {
    pub channel_username: String,
    pub bot_username: Option<String>,
    pub utc_offset_hours: i32,
    pub morning_hour: u32,
    pub evening_hour: u32,
}

impl Branding {
    pub fn from_config(config: &Config, bot_username: Option<String>) -> Self {
        Self {
            channel_username: config.channel_username.clone(),
            bot_username,
            utc_offset_hours: config.utc_offset_hours,
            morning_hour: config.morning_hour,
            evening_hour: config.evening_hour,
        }
    }

    fn schedule(&self) -> String {
        format!("jam {:02}.00 & {:02}.00", self.morning_hour, self.evening_hour)
    }

    fn join_bot_line(&self) -> Option<String> {
        self.bot_username
            .as_ref()
            .map(|name| italic(&format!("Join bot untuk promo lainnya: @{}", name.trim_start_matches('@'))))
    }
}

/// Counters shown by `/info`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotStats {
    pub products: i64,
    pub active_products: i64,
    pub users: i64,
    pub subscribers: i64,
    pub broadcast_recipients: usize,
}

fn bold(text: &str) -> String {
    format!("*{}*", e(text))
}

fn italic(text: &str) -> String {
    format!("_{}_", e(text))
}

fn code(text: &str) -> String {
    format!("`{}`", text.replace('\\', "\\\\").replace('`', "\\`"))
}

fn strike(text: &str) -> String {
    format!("~{}~", e(text))
}

fn price_line(product: &Product) -> String {
    format!(
        "💰 {} → {}",
        strike(&format_rupiah(product.original_price)),
        bold(&format_rupiah(product.promo_price))
    )
}

fn buy_link(label: &str, product: &Product) -> String {
    link(label, &product.affiliate_url)
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}

fn omitted_note(count: usize) -> String {
    format!("{}\n\n", italic(&format!("...dan {count} produk lainnya")))
}

/// Joins a list message, leaving out trailing items that would push it
/// past [`MESSAGE_LIMIT`].
fn fit_items(header: String, items: &[String], footer: &str) -> String {
    let reserved = telegram_len(&omitted_note(items.len())) + telegram_len(footer);
    let mut text = header;
    let mut used = telegram_len(&text);
    let mut shown = 0;

    for item in items {
        let len = telegram_len(item);
        if used + len + reserved > MESSAGE_LIMIT {
            break;
        }
        text.push_str(item);
        used += len;
        shown += 1;
    }

    if shown < items.len() {
        text.push_str(&omitted_note(items.len() - shown));
    }
    text.push_str(footer);
    text
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Ya" } else { "Tidak" }
}

fn menu_lines(branding: &Branding) -> String {
    let mut text = String::new();
    text.push_str(&format!("📱 {}\n", bold("Menu Utama:")));
    for (command, description) in [
        ("/promo", "Promo terbaru hari ini"),
        ("/flashsale", "Flash sale yang sedang berlangsung"),
        ("/kategori", "Pilih kategori favorit"),
        ("/notif", "Nyalakan atau matikan notifikasi"),
    ] {
        text.push_str(&format!("• {} \\- {}\n", code(command), e(description)));
    }
    text.push('\n');
    text.push_str(&format!("🔔 {}\n", bold("Notifikasi Otomatis:")));
    text.push_str(&format!("• {}\n", e(&format!("Promo harian {}", branding.schedule()))));
    text.push_str(&format!("• {}\n\n", e("Flash sale alert real-time")));
    text.push_str(&format!("Ketik {} untuk mulai belanja hemat\\! 🛒", code("/promo")));
    text
}

pub fn welcome_message(first_name: &str, branding: &Branding) -> String {
    format!(
        "🛍️ {}\n\nHai {}\\! Siap hunting promo terbaik hari ini? 🔥\n\n{}",
        bold("Selamat datang di Bot Promo Shopee!"),
        e(first_name),
        menu_lines(branding)
    )
}

pub fn main_menu(branding: &Branding) -> String {
    format!("🛍️ {}\n\n{}", bold("Bot Promo Shopee"), menu_lines(branding))
}

pub fn subscribe_prompt(first_name: &str, branding: &Branding) -> String {
    format!(
        "🛍️ {}\n\nHai {}\\! Untuk mendapatkan akses penuh ke semua fitur bot, silakan {} kami dulu ya\\!\n\n\
         📢 {} {}\n🎯 {}\n• Promo eksklusif setiap hari\n• Flash sale alert real\\-time\n\
         • Cashback & voucher gratis\n• Update produk viral terbaru\n\n👇 {}",
        bold("Selamat datang di Bot Promo Shopee!"),
        e(first_name),
        bold("subscribe channel"),
        bold("Channel:"),
        e(&branding.channel_username),
        bold("Benefit subscribe:"),
        bold("Klik tombol di bawah untuk subscribe")
    )
}

pub fn access_restricted(branding: &Branding) -> String {
    format!(
        "🔒 {}\n\nMaaf, fitur ini hanya untuk member yang sudah subscribe channel kami\\.\n\n\
         📢 {} {}\n\nSetelah subscribe, klik \"✅ Sudah Subscribe\" di bawah\\.",
        bold("Akses Terbatas"),
        bold("Subscribe dulu ya:"),
        e(&branding.channel_username)
    )
}

pub fn not_subscribed_yet(branding: &Branding) -> String {
    format!(
        "❌ {}\n\nSilakan subscribe dulu: {}\nKemudian klik tombol \"✅ Sudah Subscribe\" lagi\\.",
        bold("Kamu belum subscribe channel kami."),
        e(&branding.channel_username)
    )
}

pub fn empty_promo() -> String {
    format!(
        "🤔 {}\n\nAdmin sedang update promo terbaru\\!\nPantau terus channel kami untuk update terbaru 📢",
        bold("Belum ada promo hari ini.")
    )
}

/// Reply to `/promo`.
pub fn promo_list(products: &[Product], now: &DateTime<Utc>, branding: &Branding) -> String {
    if products.is_empty() {
        return empty_promo();
    }

    let header = format!(
        "🔥 {} 🔥\n\n📅 {}\n\n",
        bold("PROMO SHOPEE HARI INI"),
        italic(&format_promo_date(now, branding.utc_offset_hours))
    );

    let items: Vec<String> = products
        .iter()
        .enumerate()
        .map(|(i, product)| {
            let mut item = bold(&format!("{}. {}", i + 1, product.name));
            item.push('\n');
            item.push_str(&price_line(product));
            item.push('\n');
            item.push_str(&format!(
                "🏷️ {}\n",
                e(&format!(
                    "Hemat {}% ({})",
                    product.discount_percent,
                    format_rupiah(product.savings())
                ))
            ));
            if product.limited_stock {
                item.push_str(&format!("⚠️ {}\n", italic("Stok terbatas!")));
            }
            if !product.description.is_empty() {
                item.push_str(&format!("📝 {}\n", e(&shorten(&product.description, LIST_DESCRIPTION_LEN))));
            }
            item.push_str(&buy_link("🛒 BELI SEKARANG", product));
            item.push_str("\n\n");
            item
        })
        .collect();

    let footer = format!(
        "📢 {} {}\n⏰ {}",
        bold("Lihat lebih banyak promo di channel:"),
        e(&branding.channel_username),
        italic(&format!("Update setiap hari {}", branding.schedule()))
    );
    fit_items(header, &items, &footer)
}

/// Reply to `/flashsale`; see [`empty_flash_sale`] when nothing is running.
pub fn flash_sale_list(products: &[Product], branding: &Branding) -> String {
    if products.is_empty() {
        return empty_flash_sale(branding);
    }

    let header = format!(
        "⚡ {} ⚡\n\n🔥 {}\n\n",
        bold("FLASH SALE SHOPEE"),
        italic("Promo terbatas waktu - Buruan sebelum kehabisan!")
    );

    let items: Vec<String> = products
        .iter()
        .map(|product| {
            format!(
                "🔥 {}\n{}\n🏷️ {}\n{}\n\n",
                bold(&product.name),
                price_line(product),
                bold(&format!("HEMAT {}%", product.discount_percent)),
                buy_link("🛒 BELI SEKARANG", product)
            )
        })
        .collect();

    let footer = format!(
        "⚠️ {}\n📢 {} {}",
        italic("Stock terbatas! Jangan sampai terlewat"),
        bold("Update flash sale real-time:"),
        e(&branding.channel_username)
    );
    fit_items(header, &items, &footer)
}

pub fn empty_flash_sale(branding: &Branding) -> String {
    format!(
        "⚡ {} ⚡\n\n🤔 Tidak ada flash sale saat ini\\.\n\n🔔 {} untuk mendapat alert flash sale:\n\
         • {}\n• Subscribe channel untuk update real\\-time\n\n📢 {} {}",
        bold("FLASH SALE SHOPEE"),
        bold("Aktifkan notifikasi"),
        e("Flash sale biasanya dimulai jam 12.00, 18.00, dan 20.00"),
        bold("Channel:"),
        e(&branding.channel_username)
    )
}

pub fn category_picker() -> String {
    format!(
        "🏷️ {}\n\nPilih kategori untuk mendapat promo yang sesuai dengan minatmu\\!\n\
         Bot akan kirim notifikasi promo khusus kategori pilihanmu\\.",
        bold("Pilih Kategori Favorit:")
    )
}

pub fn category_result(category: &str, products: &[Product]) -> String {
    let mut text = format!("✅ {}\n\n", bold(&format!("Kategori {category} berhasil dipilih!")));

    if products.is_empty() {
        text.push_str(&format!(
            "🔔 {}\n\n{}",
            e(&format!("Kamu akan mendapat notifikasi khusus untuk kategori {category}.")),
            e("Saat ini belum ada promo untuk kategori ini, tapi nanti akan ada notifikasi otomatis!")
        ));
        return text;
    }

    text.push_str(&format!("🔥 {}\n\n", bold(&format!("Promo {category} Terbaik:"))));
    let items: Vec<String> = products
        .iter()
        .map(|product| {
            format!(
                "📱 {}\n{} {}\n{}\n\n",
                bold(&product.name),
                price_line(product),
                e(&format!("({}%)", product.discount_percent)),
                buy_link("🛒 BELI", product)
            )
        })
        .collect();
    let footer = format!(
        "🔔 {}",
        e(&format!("Kamu akan mendapat notifikasi khusus promo {category}!"))
    );
    fit_items(text, &items, &footer)
}

pub fn notifications_enabled(branding: &Branding) -> String {
    format!(
        "✅ {}\n\n🔔 Kamu akan mendapat:\n• Flash sale alert real\\-time\n• {}\n\n📢 {} {}",
        bold("Notifikasi berhasil diaktifkan!"),
        e(&format!("Promo harian {}", branding.schedule())),
        bold("Jangan lupa juga follow channel:"),
        e(&branding.channel_username)
    )
}

pub fn notifications_toggled(enabled: bool) -> String {
    if enabled {
        format!("🔔 {}", bold("Notifikasi aktif. Kamu akan menerima promo harian."))
    } else {
        format!(
            "🔕 {}\n\nKetik {} lagi untuk menyalakannya kembali\\.",
            bold("Notifikasi dimatikan."),
            code("/notif")
        )
    }
}

pub fn add_product_usage() -> String {
    let example = "/tambah iPhone 15 Pro | Elektronik | 15999000 | 12999000 | \
                   https://shopee.co.id/xxx?af_siteid=123 | Garansi resmi iBox 1 tahun | 1 | 1";
    let fields = [
        "Nama Produk",
        "Kategori",
        "Harga Asli",
        "Harga Promo",
        "Link Affiliate (shopee.co.id)",
        "Deskripsi",
        "Stok Terbatas (0/1, opsional)",
        "Flash Sale (0/1, opsional)",
        "URL Gambar (opsional)",
    ];

    let mut text = format!("📝 {}\n\n{}\n\n{}\n", bold("Format Tambah Produk:"), code(example), bold("Keterangan:"));
    for (i, field) in fields.iter().enumerate() {
        text.push_str(&e(&format!("{}. {}", i + 1, field)));
        text.push('\n');
    }
    text.push('\n');
    text.push_str(&bold("Pisahkan dengan tanda | (pipe)"));
    text
}

pub fn product_added(product: &Product) -> String {
    format!(
        "✅ {}\n\n🆔 {} {}\n📱 {} {}\n🏷️ {} {}\n💰 {} {} → {}\n🔥 {} {}\n⚡ {} {}\n⚠️ {} {}\n\n{}\n\
         • {} \\- Kirim ke channel\n• {} \\- Broadcast ke semua user\n• {} \\- Lihat semua produk",
        bold("Produk berhasil ditambahkan!"),
        bold("ID:"),
        product.id,
        bold("Nama:"),
        e(&product.name),
        bold("Kategori:"),
        e(&product.category),
        bold("Harga:"),
        strike(&format_rupiah(product.original_price)),
        bold(&format_rupiah(product.promo_price)),
        bold("Diskon:"),
        e(&format!("{}%", product.discount_percent)),
        bold("Flash Sale:"),
        yes_no(product.flash_sale),
        bold("Stok Terbatas:"),
        yes_no(product.limited_stock),
        bold("Command selanjutnya:"),
        code(&format!("/kirim_channel {}", product.id)),
        code(&format!("/broadcast {}", product.id)),
        code("/lihat_produk"),
    )
}

/// Reply to `/lihat_produk`.
pub fn admin_product_list(products: &[Product], utc_offset_hours: i32) -> String {
    if products.is_empty() {
        return format!("📦 {}", e("Belum ada produk yang ditambahkan."));
    }

    let header = format!("📦 {}\n\n", bold("DAFTAR PRODUK"));
    let items: Vec<String> = products
        .iter()
        .map(|product| {
            let status = if product.active { "✅" } else { "❌" };
            let flash = if product.flash_sale { " ⚡" } else { "" };
            let stock = if product.limited_stock { " ⚠️" } else { "" };
            format!(
                "{} {} {}{}{}\n🏷️ {}\n🕒 {}\n\n",
                status,
                bold(&format!("{}.", product.id)),
                e(&product.name),
                flash,
                stock,
                e(&format!(
                    "{} | 🔥 {}% | {}",
                    if product.category.is_empty() { "-" } else { product.category.as_str() },
                    product.discount_percent,
                    format_rupiah(product.promo_price)
                )),
                e(&format_stored_timestamp(&product.created_at, utc_offset_hours))
            )
        })
        .collect();

    let mut footer = format!("{}\n", bold("Command untuk manage produk:"));
    for (command, description) in [
        ("/toggle {id}", "Aktif/nonaktif produk"),
        ("/hapus {id}", "Hapus produk"),
        ("/kirim_channel {id}", "Kirim ke channel"),
        ("/broadcast {id}", "Broadcast ke user"),
    ] {
        footer.push_str(&format!("• {} \\- {}\n", code(command), e(description)));
    }
    footer.push_str(&format!(
        "\n{}\n{}",
        bold("Legend:"),
        e("✅ Aktif | ❌ Nonaktif | ⚡ Flash Sale | ⚠️ Stok Terbatas")
    ));
    fit_items(header, &items, &footer)
}

/// Single product post for the public channel.
pub fn channel_post(product: &Product, branding: &Branding) -> String {
    let mut text = if product.flash_sale {
        format!(
            "⚡ {} ⚡\n\n🔥 {}\n{}\n🏷️ {}\n",
            bold("FLASH SALE ALERT"),
            bold(&product.name),
            price_line(product),
            bold(&format!(
                "HEMAT {}% ({})",
                product.discount_percent,
                format_rupiah(product.savings())
            ))
        )
    } else {
        format!(
            "🛍️ {} 🛍️\n\n📱 {}\n{}\n🏷️ {}\n",
            bold("PROMO SHOPEE HARI INI"),
            bold(&product.name),
            price_line(product),
            e(&format!(
                "Hemat {}% ({})",
                product.discount_percent,
                format_rupiah(product.savings())
            ))
        )
    };

    if !product.description.is_empty() {
        text.push_str(&format!("\n📝 {}\n", e(&product.description)));
    }
    if product.limited_stock {
        text.push_str(&format!("\n⚠️ {}\n", bold("STOK TERBATAS!")));
    }
    text.push('\n');
    text.push_str(&buy_link("🛒 BELI SEKARANG", product));
    text.push_str("\n\n");

    if product.flash_sale {
        text.push_str(&format!("⏰ {}", italic("Buruan sebelum kehabisan!")));
    } else if let Some(join) = branding.join_bot_line() {
        text.push_str(&format!("👥 {join}"));
    } else {
        text.push_str(&format!("⏰ {}", italic("Jangan sampai terlewat!")));
    }
    text
}

/// Direct message version of a product, for `/broadcast`.
pub fn broadcast_post(product: &Product, branding: &Branding) -> String {
    let mut text = format!(
        "🔥 {} 🔥\n\n📱 {}\n{}\n🏷️ {}\n",
        bold("PROMO SPESIAL UNTUKMU!"),
        bold(&product.name),
        price_line(product),
        bold(&format!("HEMAT {}%", product.discount_percent))
    );
    if !product.description.is_empty() {
        text.push_str(&format!("\n📝 {}\n", e(&product.description)));
    }
    text.push('\n');
    text.push_str(&buy_link("🛒 BELI SEKARANG", product));
    text.push_str(&format!(
        "\n\n⏰ {}\n\n📢 {}",
        italic("Jangan sampai terlewat ya!"),
        italic(&format!("Lihat promo lainnya di channel: {}", branding.channel_username))
    ));
    text
}

pub fn morning_digest_channel(products: &[Product], now: &DateTime<Utc>, branding: &Branding) -> String {
    let mut text = format!(
        "🌅 {} 🌅\n\n📅 {}\n\n",
        bold("SELAMAT PAGI! PROMO TERBAIK HARI INI"),
        italic(&format_promo_date(now, branding.utc_offset_hours))
    );
    for (i, product) in products.iter().enumerate() {
        text.push_str(&bold(&format!("{}. {}", i + 1, product.name)));
        text.push('\n');
        text.push_str(&price_line(product));
        text.push('\n');
        text.push_str(&format!(
            "🏷️ {}\n",
            e(&format!(
                "Hemat {}% ({})",
                product.discount_percent,
                format_rupiah(product.savings())
            ))
        ));
        text.push_str(&buy_link("🛒 BELI SEKARANG", product));
        text.push_str("\n\n");
    }
    if let Some(join) = branding.join_bot_line() {
        text.push_str(&format!("👥 {join}\n"));
    }
    text.push_str(&format!(
        "⏰ {}",
        italic(&format!("Update lagi jam {:02}.00!", branding.evening_hour))
    ));
    text
}

pub fn morning_digest_users(products: &[Product], branding: &Branding) -> String {
    let mut text = format!("🌅 {} 🌅\n\n", bold("SELAMAT PAGI! PROMO PILIHAN HARI INI"));
    for (i, product) in products.iter().enumerate() {
        text.push_str(&bold(&format!("{}. {}", i + 1, product.name)));
        text.push('\n');
        text.push_str(&format!(
            "{} {}\n",
            price_line(product),
            e(&format!("({}% OFF)", product.discount_percent))
        ));
        text.push_str(&buy_link("🛒 BELI", product));
        text.push_str("\n\n");
    }
    text.push_str(&format!(
        "📢 {} {}\n⏰ {}",
        bold("Lihat promo lengkap:"),
        e(&branding.channel_username),
        italic(&format!("Update lagi jam {:02}.00!", branding.evening_hour))
    ));
    text
}

fn evening_items(products: &[Product], flash_suffix: bool) -> String {
    let mut text = String::new();
    for product in products {
        if product.flash_sale && flash_suffix {
            text.push_str(&format!("⚡ {} {}\n", bold(&product.name), e("(Flash Sale)")));
        } else if product.flash_sale {
            text.push_str(&format!("⚡ {}\n", bold(&format!("FLASH SALE: {}", product.name))));
        } else {
            text.push_str(&format!("🔥 {}\n", bold(&product.name)));
        }
        text.push_str(&format!(
            "{} {}\n",
            price_line(product),
            e(&format!("({}%)", product.discount_percent))
        ));
        text.push_str(&buy_link(
            if flash_suffix { "🛒 BELI" } else { "🛒 BELI SEKARANG" },
            product,
        ));
        text.push_str("\n\n");
    }
    text
}

pub fn evening_digest_channel(products: &[Product]) -> String {
    format!(
        "🌃 {} 🌃\n\n{}🛌 {}",
        bold("PROMO MALAM HARI"),
        evening_items(products, false),
        italic("Selamat malam & happy shopping!")
    )
}

pub fn evening_digest_users(products: &[Product]) -> String {
    format!(
        "🌃 {} 🌃\n\nHay\\! Ada promo malam yang ga boleh dilewatin nih\\!\n\n{}🛌 {}",
        bold("PROMO MALAM HARI"),
        evening_items(products, true),
        italic("Selamat malam & happy shopping!")
    )
}

/// Free text from `/blastcustom`, shown literally.
pub fn custom_announcement(body: &str) -> String {
    format!("📢 {}\n\n{}", bold("Pengumuman"), e(body.trim()))
}

pub fn broadcast_summary(subject: &str, report: &BroadcastReport) -> String {
    format!(
        "📢 {}\n\n✅ Berhasil: {} user\n❌ Gagal: {} user\n📱 {}",
        bold("Broadcast selesai!"),
        report.delivered,
        report.failed,
        e(subject)
    )
}

pub fn bot_info(stats: &BotStats, branding: &Branding) -> String {
    format!(
        "ℹ️ {}\n\n📦 Produk: {} \\({} aktif\\)\n👥 Pengguna: {}\n📢 Subscriber channel: {}\n\
         🔔 Penerima broadcast: {}\n\n⏰ {}\n📢 Channel: {}",
        bold("Statistik Bot Promo Shopee"),
        stats.products,
        stats.active_products,
        stats.users,
        stats.subscribers,
        stats.broadcast_recipients,
        e(&format!(
            "Broadcast otomatis {} (UTC{:+})",
            branding.schedule(),
            branding.utc_offset_hours
        )),
        e(&branding.channel_username)
    )
}
