use shopee_promo_bot::bot::keyboards::{main_menu_keyboard, CallbackAction, CATEGORIES};
use shopee_promo_bot::utils::markdown::{escape_markdown, link};
use teloxide::types::InlineKeyboardButtonKind;

#[test]
fn test_main_menu_buttons() {
    let keyboard = main_menu_keyboard("https://t.me/promoshopee");
    let callbacks: Vec<String> = keyboard
        .inline_keyboard
        .iter()
        .flatten()
        .filter_map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(callbacks, vec!["promo_today", "flash_sale", "pick_category"]);
}

#[test]
fn test_category_callbacks() {
    for (slug, _, _) in CATEGORIES {
        let data = format!("cat:{slug}");
        assert_eq!(CallbackAction::parse(&data), Some(CallbackAction::Category(slug.to_string())));
    }
}

#[test]
fn test_stale_callback_data_is_rejected() {
    // Buttons left over from older bot versions
    assert_eq!(CallbackAction::parse("abc123:opt1:yes"), None);
    assert_eq!(CallbackAction::parse("settings:close"), None);
    assert_eq!(CallbackAction::parse(""), None);
}

#[test]
fn test_escape_markdown_product_names() {
    assert_eq!(escape_markdown("Kaos Polos"), "Kaos Polos");
    assert_eq!(escape_markdown("Diskon 50%!"), "Diskon 50%\\!");
    assert_eq!(escape_markdown("Rp 1.500.000"), "Rp 1\\.500\\.000");
    assert_eq!(escape_markdown("Sepatu (Size 42) - Hitam"), "Sepatu \\(Size 42\\) \\- Hitam");
}

#[test]
fn test_buy_link_keeps_query_string() {
    let rendered = link("🛒 BELI SEKARANG", "https://shopee.co.id/xxx?af_siteid=123&smtt=0.0.9");
    assert_eq!(
        rendered,
        "[🛒 BELI SEKARANG](https://shopee.co.id/xxx?af_siteid=123&smtt=0.0.9)"
    );
}
