use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

/// Categories offered by the picker: (slug, emoji, label).
pub const CATEGORIES: &[(&str, &str, &str)] = &[
    ("elektronik", "📱", "Elektronik"),
    ("fashion_pria", "👕", "Fashion Pria"),
    ("fashion_wanita", "👗", "Fashion Wanita"),
    ("rumah_tangga", "🏠", "Rumah Tangga"),
    ("gaming", "🎮", "Gaming"),
    ("kecantikan", "💄", "Kecantikan"),
];

pub fn category_label(slug: &str) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .find(|(s, _, _)| *s == slug)
        .map(|(_, _, label)| *label)
}

/// Everything an inline button can ask the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    CheckSubscribe,
    PromoToday,
    FlashSale,
    PickCategory,
    Category(String),
    EnableNotifications,
    MainMenu,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "check_subscribe" => Some(Self::CheckSubscribe),
            "promo_today" => Some(Self::PromoToday),
            "flash_sale" => Some(Self::FlashSale),
            "pick_category" => Some(Self::PickCategory),
            "enable_notif" => Some(Self::EnableNotifications),
            "main_menu" => Some(Self::MainMenu),
            other => other
                .strip_prefix("cat:")
                .filter(|slug| category_label(slug).is_some())
                .map(|slug| Self::Category(slug.to_string())),
        }
    }

    pub fn data(&self) -> String {
        match self {
            Self::CheckSubscribe => "check_subscribe".to_string(),
            Self::PromoToday => "promo_today".to_string(),
            Self::FlashSale => "flash_sale".to_string(),
            Self::PickCategory => "pick_category".to_string(),
            Self::Category(slug) => format!("cat:{slug}"),
            Self::EnableNotifications => "enable_notif".to_string(),
            Self::MainMenu => "main_menu".to_string(),
        }
    }

    fn button(self, text: &str) -> InlineKeyboardButton {
        InlineKeyboardButton::callback(text, self.data())
    }
}

fn url_button(text: &str, link: &str) -> Option<InlineKeyboardButton> {
    match Url::parse(link) {
        Ok(url) => Some(InlineKeyboardButton::url(text, url)),
        Err(e) => {
            tracing::warn!("Skipping button '{}' with invalid link {}: {}", text, link, e);
            None
        }
    }
}

fn markup(rows: Vec<Option<InlineKeyboardButton>>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.into_iter().flatten().map(|button| vec![button]))
}

pub fn subscribe_keyboard(channel_link: &str) -> InlineKeyboardMarkup {
    markup(vec![
        url_button("📢 Subscribe Channel", channel_link),
        Some(CallbackAction::CheckSubscribe.button("✅ Sudah Subscribe")),
    ])
}

pub fn main_menu_keyboard(channel_link: &str) -> InlineKeyboardMarkup {
    markup(vec![
        Some(CallbackAction::PromoToday.button("🔥 Promo Hari Ini")),
        Some(CallbackAction::FlashSale.button("⚡ Flash Sale")),
        Some(CallbackAction::PickCategory.button("🏷️ Kategori")),
        url_button("📢 Channel Promo", channel_link),
    ])
}

pub fn category_keyboard() -> InlineKeyboardMarkup {
    let mut rows: Vec<Option<InlineKeyboardButton>> = CATEGORIES
        .iter()
        .map(|(slug, emoji, label)| {
            Some(CallbackAction::Category(slug.to_string()).button(&format!("{emoji} {label}")))
        })
        .collect();
    rows.push(Some(CallbackAction::MainMenu.button("🔙 Kembali")));
    markup(rows)
}

pub fn category_result_keyboard() -> InlineKeyboardMarkup {
    markup(vec![
        Some(CallbackAction::PickCategory.button("🔙 Pilih Kategori Lain")),
        Some(CallbackAction::MainMenu.button("🏠 Menu Utama")),
    ])
}

pub fn empty_flash_sale_keyboard(channel_link: &str) -> InlineKeyboardMarkup {
    markup(vec![
        Some(CallbackAction::EnableNotifications.button("🔔 Aktifkan Notifikasi")),
        url_button("📢 Channel Promo", channel_link),
    ])
}

pub fn notifications_keyboard(channel_link: &str) -> InlineKeyboardMarkup {
    markup(vec![
        Some(CallbackAction::MainMenu.button("🏠 Menu Utama")),
        url_button("📢 Channel", channel_link),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_round_trip_for_every_action() {
        let mut actions = vec![
            CallbackAction::CheckSubscribe,
            CallbackAction::PromoToday,
            CallbackAction::FlashSale,
            CallbackAction::PickCategory,
            CallbackAction::EnableNotifications,
            CallbackAction::MainMenu,
        ];
        actions.extend(CATEGORIES.iter().map(|(slug, _, _)| CallbackAction::Category(slug.to_string())));

        for action in actions {
            assert_eq!(CallbackAction::parse(&action.data()), Some(action.clone()));
        }
    }

    #[test]
    fn test_unknown_callback_data() {
        assert_eq!(CallbackAction::parse("cat:otomotif"), None);
        assert_eq!(CallbackAction::parse("cat:"), None);
        assert_eq!(CallbackAction::parse("whatever"), None);
    }

    #[test]
    fn test_callback_data_fits_telegram_limit() {
        for (slug, _, _) in CATEGORIES {
            assert!(CallbackAction::Category(slug.to_string()).data().len() <= 64);
        }
    }

    #[test]
    fn test_category_keyboard_has_back_button() {
        let keyboard = category_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), CATEGORIES.len() + 1);
    }

    #[test]
    fn test_invalid_channel_link_drops_url_button() {
        let keyboard = subscribe_keyboard("not a url");
        assert_eq!(keyboard.inline_keyboard.len(), 1);

        let keyboard = subscribe_keyboard("https://t.me/promoshopee");
        assert_eq!(keyboard.inline_keyboard.len(), 2);
    }

    #[test]
    fn test_category_label() {
        assert_eq!(category_label("fashion_pria"), Some("Fashion Pria"));
        assert_eq!(category_label("unknown"), None);
    }
}
