/// Date formatting in the broadcast timezone
pub mod datetime;
/// Standard feedback messages for command outcomes
pub mod feedback;
/// Consistent log line helpers
pub mod logging;
/// MarkdownV2 escaping
pub mod markdown;
/// Rupiah formatting and discount arithmetic
pub mod pricing;
/// `/tambah` argument parsing and validation
pub mod validation;
