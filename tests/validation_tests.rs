use shopee_promo_bot::utils::pricing::{discount_percent, format_rupiah};
use shopee_promo_bot::utils::validation::*;

#[cfg(test)]
mod validation_tests {
    use super::*;

    const LINK: &str = "https://shopee.co.id/produk-123";

    fn input(name: &str, original: &str, promo: &str, link: &str) -> String {
        format!("{name} | Elektronik | {original} | {promo} | {link} | Deskripsi singkat")
    }

    #[test]
    fn test_valid_product_names() {
        let long_name = "A".repeat(200);
        let valid_names = vec![
            "iPhone 15 Pro",
            "Kaos Polos (XL)",
            "Sepatu Lari - Edisi 12.12!",
            "🎧 Headset Bluetooth",
            long_name.as_str(),
        ];

        for name in valid_names {
            let product = parse_product_input(&input(name, "100000", "50000", LINK));
            assert!(product.is_ok(), "Should accept name: {}", name);
        }
    }

    #[test]
    fn test_invalid_product_names() {
        assert_eq!(
            parse_product_input(&input("", "100000", "50000", LINK)),
            Err(ProductInputError::EmptyName)
        );
        assert_eq!(
            parse_product_input(&input(&"A".repeat(201), "100000", "50000", LINK)),
            Err(ProductInputError::NameTooLong)
        );
    }

    #[test]
    fn test_invalid_prices() {
        for (original, promo) in [("abc", "100"), ("100", "-1"), ("1.5e3", "100"), ("", "100")] {
            let result = parse_product_input(&input("Produk", original, promo, LINK));
            assert!(
                matches!(result, Err(ProductInputError::InvalidPrice { .. })),
                "Should reject prices {original} / {promo}: {result:?}"
            );
        }
    }

    #[test]
    fn test_equal_prices_mean_zero_discount() {
        let product = parse_product_input(&input("Produk", "100000", "100000", LINK)).unwrap();
        assert_eq!(product.discount_percent, 0);
    }

    #[test]
    fn test_free_item_is_full_discount() {
        let product = parse_product_input(&input("Produk", "100000", "0", LINK)).unwrap();
        assert_eq!(product.discount_percent, 100);
    }

    #[test]
    fn test_affiliate_link_hosts() {
        let accepted = [
            "https://shopee.co.id/product/1/2",
            "http://shopee.co.id/abc",
            "https://s.shopee.co.id/8pQ2x",
            "https://SHOPEE.CO.ID/abc",
        ];
        for link in accepted {
            assert!(validate_affiliate_link(link).is_ok(), "Should accept link: {link}");
        }

        let rejected = [
            "shopee.co.id/abc",
            "ftp://shopee.co.id/abc",
            "https://shopee.com/abc",
            "https://notshopee.co.id/abc",
            "https://shopee.co.id.example.com/abc",
            "",
        ];
        for link in rejected {
            assert_eq!(
                validate_affiliate_link(link),
                Err(ProductInputError::InvalidAffiliateLink),
                "Should reject link: {link}"
            );
        }
    }

    #[test]
    fn test_description_limit() {
        let description = "x".repeat(1001);
        let raw = format!("Produk | Elektronik | 100 | 50 | {LINK} | {description}");
        assert_eq!(parse_product_input(&raw), Err(ProductInputError::DescriptionTooLong));
    }

    #[test]
    fn test_error_messages_are_readable() {
        let message = ProductInputError::MissingFields { found: 2 }.to_string();
        assert!(message.contains("Minimal 6 kolom"));
        assert!(message.contains('2'));

        let message = ProductInputError::InvalidPrice {
            field: "Harga promo",
            value: "murah".to_string(),
        }
        .to_string();
        assert!(message.contains("Harga promo"));
        assert!(message.contains("murah"));
    }

    #[test]
    fn test_discount_rounding() {
        assert_eq!(discount_percent(15_999_000, 12_999_000), 19);
        assert_eq!(discount_percent(3, 2), 33);
        assert_eq!(discount_percent(8, 5), 38);
        assert_eq!(discount_percent(0, 0), 0);
    }

    #[test]
    fn test_rupiah_formatting() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(999), "Rp 999");
        assert_eq!(format_rupiah(12_999_000), "Rp 12.999.000");
    }
}
