//! Rupiah formatting and discount arithmetic.

/// Formats an amount as Indonesian rupiah with `.` as the thousands separator.
///
/// ```
/// use shopee_promo_bot::utils::pricing::format_rupiah;
///
/// assert_eq!(format_rupiah(1_500_000), "Rp 1.500.000");
/// assert_eq!(format_rupiah(999), "Rp 999");
/// ```
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("Rp -{grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Percentage saved going from `original` to `promo`, rounded half away
/// from zero and clamped to `0..=100`. A non-positive original price yields 0.
pub fn discount_percent(original: i64, promo: i64) -> i64 {
    if original <= 0 {
        return 0;
    }
    let ratio = (original - promo) as f64 / original as f64 * 100.0;
    (ratio.round() as i64).clamp(0, 100)
}

/// Amount saved, never negative.
pub fn savings(original: i64, promo: i64) -> i64 {
    (original - promo).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah_grouping() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(7), "Rp 7");
        assert_eq!(format_rupiah(1000), "Rp 1.000");
        assert_eq!(format_rupiah(12_999_000), "Rp 12.999.000");
        assert_eq!(format_rupiah(100_000), "Rp 100.000");
        assert_eq!(format_rupiah(1_234_567_890), "Rp 1.234.567.890");
    }

    #[test]
    fn test_format_rupiah_negative() {
        assert_eq!(format_rupiah(-25_000), "Rp -25.000");
    }

    #[test]
    fn test_discount_percent_basic() {
        assert_eq!(discount_percent(100, 80), 20);
        assert_eq!(discount_percent(100, 100), 0);
        assert_eq!(discount_percent(100, 0), 100);
    }

    #[test]
    fn test_discount_percent_rounds_half_up() {
        // 18.75% rounds to 19, where truncation would give 18
        assert_eq!(discount_percent(15_999_000, 12_999_000), 19);
        // 33.33% rounds down
        assert_eq!(discount_percent(300, 200), 33);
        assert_eq!(discount_percent(200, 199), 1);
    }

    #[test]
    fn test_discount_percent_guards() {
        assert_eq!(discount_percent(0, 0), 0);
        assert_eq!(discount_percent(0, 5000), 0);
        assert_eq!(discount_percent(-10, 5), 0);
        // promo above original is clamped instead of going negative
        assert_eq!(discount_percent(100, 150), 0);
    }

    #[test]
    fn test_savings() {
        assert_eq!(savings(15_999_000, 12_999_000), 3_000_000);
        assert_eq!(savings(100, 150), 0);
    }
}
