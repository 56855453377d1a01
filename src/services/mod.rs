/// Channel posts and sequential user broadcasts
pub mod broadcast;
/// Twice-daily digest jobs
pub mod scheduler;
/// HTTP health endpoints
pub mod health;
/// Channel membership checks
pub mod subscription;
