//! Helpers for Telegram MarkdownV2 text.
//!
//! Every product field typed by the admin goes through [`escape_markdown`]
//! before it is placed in a template, so names like `Kaos (XL) - Promo!`
//! cannot break the message formatting.

/// Escapes markdown special characters for MarkdownV2 parsing mode
///
/// The backslash itself is escaped first so that already present
/// backslashes are shown literally.
///
/// # Example
/// ```
/// use shopee_promo_bot::utils::markdown::escape_markdown;
///
/// let text = "Kaos *Polos* (XL)";
/// let escaped = escape_markdown(text);
/// assert_eq!(escaped, "Kaos \\*Polos\\* \\(XL\\)");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        if matches!(
            ch,
            '\\' | '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '='
                | '|' | '{' | '}' | '.' | '!'
        ) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escapes the target part of an inline link `[text](url)`.
/// Inside the parentheses only `)` and `\` need escaping.
pub fn escape_link_url(url: &str) -> String {
    url.replace('\\', "\\\\").replace(')', "\\)")
}

/// Builds an inline link with escaped label and target.
pub fn link(label: &str, url: &str) -> String {
    format!("[{}]({})", escape_markdown(label), escape_link_url(url))
}
