use anyhow::{anyhow, Result};
use std::env;
use teloxide::types::{ChatId, Recipient};

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/shopee_affiliate.db";
const DEFAULT_CHANNEL: &str = "@promoshopee";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub admin_id: Option<u64>,
    pub channel_id: String,
    pub channel_username: String,
    pub database_url: String,
    pub http_port: u16,
    /// Hours east of UTC used for the daily schedule and printed dates.
    pub utc_offset_hours: i32,
    pub morning_hour: u32,
    pub evening_hour: u32,
    pub broadcast_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = non_empty_var("BOT_TOKEN")
            .or_else(|| non_empty_var("TELEGRAM_BOT_TOKEN"))
            .ok_or_else(|| anyhow!("BOT_TOKEN must be set"))?;

        let admin_id = match non_empty_var("ADMIN_ID") {
            Some(raw) => {
                let id: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Invalid ADMIN_ID"))?;
                // 0 means no admin configured
                if id == 0 { None } else { Some(id) }
            }
            None => None,
        };

        let channel_id = non_empty_var("CHANNEL_ID").unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
        let channel_username = match non_empty_var("CHANNEL_USERNAME") {
            Some(name) => normalize_handle(&name),
            None if channel_id.starts_with('@') => channel_id.clone(),
            None => DEFAULT_CHANNEL.to_string(),
        };

        let database_url = Self::database_url_from_env();

        let port_str = non_empty_var("PORT")
            .or_else(|| non_empty_var("HTTP_PORT"))
            .unwrap_or_else(|| "8080".to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid PORT"))?;

        let utc_offset_hours: i32 = parse_var("BROADCAST_UTC_OFFSET", 7)?;
        if !(-12..=14).contains(&utc_offset_hours) {
            return Err(anyhow!("BROADCAST_UTC_OFFSET must be between -12 and 14"));
        }

        let morning_hour: u32 = parse_var("MORNING_BROADCAST_HOUR", 8)?;
        let evening_hour: u32 = parse_var("EVENING_BROADCAST_HOUR", 20)?;
        if morning_hour > 23 || evening_hour > 23 {
            return Err(anyhow!("Broadcast hours must be between 0 and 23"));
        }

        let broadcast_delay_ms = parse_var("BROADCAST_DELAY_MS", 50)?;

        Ok(Config {
            telegram_bot_token: token,
            admin_id,
            channel_id,
            channel_username,
            database_url,
            http_port,
            utc_offset_hours,
            morning_hour,
            evening_hour,
            broadcast_delay_ms,
        })
    }

    /// Database URL only, for tools that never talk to Telegram.
    pub fn database_url_from_env() -> String {
        non_empty_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_id == Some(user_id)
    }

    /// Where channel posts go: `@handle` or a numeric chat id.
    pub fn channel_recipient(&self) -> Recipient {
        match self.channel_id.trim().parse::<i64>() {
            Ok(id) => Recipient::Id(ChatId(id)),
            Err(_) => Recipient::ChannelUsername(normalize_handle(&self.channel_id)),
        }
    }

    pub fn channel_link(&self) -> String {
        format!("https://t.me/{}", self.channel_username.trim_start_matches('@'))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match non_empty_var(key) {
        Some(raw) => raw.trim().parse().map_err(|_| anyhow!("Invalid {}", key)),
        None => Ok(default),
    }
}

fn normalize_handle(name: &str) -> String {
    let name = name.trim();
    if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            telegram_bot_token: "123:abc".to_string(),
            admin_id: Some(42),
            channel_id: "@promoshopee22a".to_string(),
            channel_username: "@promoshopee22a".to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            http_port: 8080,
            utc_offset_hours: 7,
            morning_hour: 8,
            evening_hour: 20,
            broadcast_delay_ms: 50,
        }
    }

    #[test]
    fn test_channel_recipient_username() {
        let config = sample();
        assert_eq!(
            config.channel_recipient(),
            Recipient::ChannelUsername("@promoshopee22a".to_string())
        );
    }

    #[test]
    fn test_channel_recipient_numeric() {
        let mut config = sample();
        config.channel_id = "-1001234567890".to_string();
        assert_eq!(config.channel_recipient(), Recipient::Id(ChatId(-1001234567890)));
    }

    #[test]
    fn test_channel_link_strips_at() {
        assert_eq!(sample().channel_link(), "https://t.me/promoshopee22a");
    }

    #[test]
    fn test_is_admin() {
        let config = sample();
        assert!(config.is_admin(42));
        assert!(!config.is_admin(43));

        let mut nobody = sample();
        nobody.admin_id = None;
        assert!(!nobody.is_admin(42));
    }
}
