/// Connection pool setup and schema migrations
pub mod connection;
/// Row types and their queries
pub mod models;
