//! # Shopee Promo Bot
//!
//! A Telegram bot that publishes Shopee affiliate deals to a channel and to
//! subscribed users.
//!
//! ## Features
//! - Admin product catalog managed from chat (`/tambah`, `/toggle`, `/hapus`)
//! - Channel posts and user broadcasts with affiliate buy links
//! - Morning and evening digests on a daily schedule
//! - Channel-membership gate for promo browsing
//! - Persistent storage with SQLite

/// Bot command handlers, keyboards and message templates
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Broadcasting, scheduling, membership checks and health endpoints
pub mod services;
/// Utility functions for pricing, formatting, validation, and logging
pub mod utils;
