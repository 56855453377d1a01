use thiserror::Error;
use url::Url;

use crate::database::models::NewProduct;
use crate::utils::pricing::discount_percent;

/// Minimum number of `|` separated fields accepted by `/tambah`.
pub const REQUIRED_FIELDS: usize = 6;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductInputError {
    #[error("Data tidak lengkap! Minimal 6 kolom, ditemukan {found}.")]
    MissingFields { found: usize },
    #[error("Nama produk tidak boleh kosong")]
    EmptyName,
    #[error("Nama produk terlalu panjang (maks 200 karakter)")]
    NameTooLong,
    #[error("Deskripsi terlalu panjang (maks 1000 karakter)")]
    DescriptionTooLong,
    #[error("{field} harus berupa angka bulat positif, bukan '{value}'")]
    InvalidPrice { field: &'static str, value: String },
    #[error("Harga promo tidak boleh lebih besar dari harga asli")]
    PromoAboveOriginal,
    #[error("Link affiliate harus dari Shopee (shopee.co.id)!")]
    InvalidAffiliateLink,
    #[error("URL gambar tidak valid: '{0}'")]
    InvalidImageUrl(String),
    #[error("{field} harus 0 atau 1, bukan '{value}'")]
    InvalidFlag { field: &'static str, value: String },
}

/// Parses the argument of `/tambah`:
/// `name | category | original | promo | link | description [| limited [| flash [| image_url]]]`
pub fn parse_product_input(input: &str) -> Result<NewProduct, ProductInputError> {
    let fields: Vec<&str> = input.split('|').map(str::trim).collect();

    // A blank input still splits into one empty field
    let found = if input.trim().is_empty() { 0 } else { fields.len() };
    if found < REQUIRED_FIELDS {
        return Err(ProductInputError::MissingFields { found });
    }

    let name = fields[0];
    if name.is_empty() {
        return Err(ProductInputError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ProductInputError::NameTooLong);
    }

    let category = fields[1];
    let original_price = parse_price("Harga asli", fields[2])?;
    let promo_price = parse_price("Harga promo", fields[3])?;
    if promo_price > original_price {
        return Err(ProductInputError::PromoAboveOriginal);
    }

    let affiliate_url = validate_affiliate_link(fields[4])?;

    let description = fields[5];
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ProductInputError::DescriptionTooLong);
    }

    let limited_stock = match fields.get(6) {
        Some(raw) => parse_flag("Stok terbatas", raw)?,
        None => false,
    };
    let flash_sale = match fields.get(7) {
        Some(raw) => parse_flag("Flash sale", raw)?,
        None => false,
    };
    let image_url = match fields.get(8) {
        Some(raw) if !raw.is_empty() => Some(validate_image_url(raw)?),
        _ => None,
    };

    Ok(NewProduct {
        name: name.to_string(),
        category: category.to_string(),
        original_price,
        promo_price,
        discount_percent: discount_percent(original_price, promo_price),
        affiliate_url,
        image_url,
        description: description.to_string(),
        limited_stock,
        flash_sale,
    })
}

/// Accepts plain digits as well as `15.999.000` / `15,999,000`.
pub fn parse_price(field: &'static str, raw: &str) -> Result<i64, ProductInputError> {
    let invalid = || ProductInputError::InvalidPrice {
        field,
        value: raw.to_string(),
    };

    let cleaned: String = raw
        .trim()
        .trim_start_matches("Rp")
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    cleaned.parse::<i64>().map_err(|_| invalid())
}

pub fn parse_flag(field: &'static str, raw: &str) -> Result<bool, ProductInputError> {
    match raw.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "tidak" | "no" => Ok(false),
        "1" | "true" | "ya" | "yes" => Ok(true),
        _ => Err(ProductInputError::InvalidFlag {
            field,
            value: raw.to_string(),
        }),
    }
}

/// Affiliate links must be http(s) URLs on `shopee.co.id` or one of its subdomains.
pub fn validate_affiliate_link(raw: &str) -> Result<String, ProductInputError> {
    let url = Url::parse(raw.trim()).map_err(|_| ProductInputError::InvalidAffiliateLink)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ProductInputError::InvalidAffiliateLink);
    }

    let host = url.host_str().unwrap_or_default().to_lowercase();
    if host == "shopee.co.id" || host.ends_with(".shopee.co.id") {
        Ok(url.to_string())
    } else {
        Err(ProductInputError::InvalidAffiliateLink)
    }
}

pub fn validate_image_url(raw: &str) -> Result<String, ProductInputError> {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url.to_string()),
        _ => Err(ProductInputError::InvalidImageUrl(raw.to_string())),
    }
}

/// Parses a product id argument such as the one given to `/kirim_channel`.
pub fn parse_product_id(raw: &str) -> Option<i64> {
    raw.split_whitespace()
        .next()
        .and_then(|id| id.trim_start_matches('#').parse::<i64>().ok())
        .filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "iPhone 15 Pro | Elektronik | 15999000 | 12999000 | https://shopee.co.id/xxx?af_siteid=123 | Garansi resmi iBox 1 tahun | 1 | 1";

    #[test]
    fn test_parse_full_input() {
        let product = parse_product_input(FULL).unwrap();
        assert_eq!(product.name, "iPhone 15 Pro");
        assert_eq!(product.category, "Elektronik");
        assert_eq!(product.original_price, 15_999_000);
        assert_eq!(product.promo_price, 12_999_000);
        assert_eq!(product.discount_percent, 19);
        assert_eq!(product.description, "Garansi resmi iBox 1 tahun");
        assert!(product.limited_stock);
        assert!(product.flash_sale);
        assert_eq!(product.image_url, None);
    }

    #[test]
    fn test_optional_flags_default_to_false() {
        let input = "Kaos | Fashion Pria | 100000 | 80000 | https://shopee.co.id/kaos | Bahan katun";
        let product = parse_product_input(input).unwrap();
        assert!(!product.limited_stock);
        assert!(!product.flash_sale);
        assert_eq!(product.discount_percent, 20);
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            parse_product_input("Kaos | Fashion | 100000"),
            Err(ProductInputError::MissingFields { found: 3 })
        );
        assert_eq!(
            parse_product_input("   "),
            Err(ProductInputError::MissingFields { found: 0 })
        );
    }

    #[test]
    fn test_promo_above_original_rejected() {
        let input = "Kaos | Fashion | 80000 | 100000 | https://shopee.co.id/kaos | x";
        assert_eq!(parse_product_input(input), Err(ProductInputError::PromoAboveOriginal));
    }

    #[test]
    fn test_non_shopee_link_rejected() {
        let input = "Kaos | Fashion | 100000 | 80000 | https://tokopedia.com/kaos | x";
        assert_eq!(parse_product_input(input), Err(ProductInputError::InvalidAffiliateLink));

        // look-alike host must not pass a substring check
        let input = "Kaos | Fashion | 100000 | 80000 | https://shopee.co.id.evil.com/kaos | x";
        assert_eq!(parse_product_input(input), Err(ProductInputError::InvalidAffiliateLink));
    }

    #[test]
    fn test_shopee_subdomain_accepted() {
        assert!(validate_affiliate_link("https://s.shopee.co.id/AbCdEf").is_ok());
    }

    #[test]
    fn test_image_url_field() {
        let input = "Kaos | Fashion | 100000 | 80000 | https://shopee.co.id/kaos | x | 0 | 0 | https://cf.shopee.co.id/file/abc.jpg";
        let product = parse_product_input(input).unwrap();
        assert_eq!(product.image_url.as_deref(), Some("https://cf.shopee.co.id/file/abc.jpg"));

        let bad = "Kaos | Fashion | 100000 | 80000 | https://shopee.co.id/kaos | x | 0 | 0 | gambar";
        assert!(matches!(
            parse_product_input(bad),
            Err(ProductInputError::InvalidImageUrl(_))
        ));
    }

    #[test]
    fn test_parse_price_formats() {
        assert_eq!(parse_price("Harga asli", "15.999.000"), Ok(15_999_000));
        assert_eq!(parse_price("Harga asli", "15,999,000"), Ok(15_999_000));
        assert_eq!(parse_price("Harga asli", "Rp 50.000"), Ok(50_000));
        assert!(parse_price("Harga asli", "-5").is_err());
        assert!(parse_price("Harga asli", "abc").is_err());
        assert!(parse_price("Harga asli", "").is_err());
    }

    #[test]
    fn test_parse_flag_values() {
        assert_eq!(parse_flag("Flash sale", "1"), Ok(true));
        assert_eq!(parse_flag("Flash sale", "ya"), Ok(true));
        assert_eq!(parse_flag("Flash sale", "0"), Ok(false));
        assert!(parse_flag("Flash sale", "2").is_err());
    }

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id("12"), Some(12));
        assert_eq!(parse_product_id(" #7 extra"), Some(7));
        assert_eq!(parse_product_id("0"), None);
        assert_eq!(parse_product_id("abc"), None);
        assert_eq!(parse_product_id(""), None);
    }
}
