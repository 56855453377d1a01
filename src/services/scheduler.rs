use tokio_cron_scheduler::{Job, JobScheduler};

use crate::services::broadcast::Broadcaster;
use crate::utils::logging::log_system_event;

/// Six-field cron expression (seconds first) firing once a day at
/// `local_hour` in a timezone `utc_offset_hours` east of UTC.
pub fn daily_cron(local_hour: u32, utc_offset_hours: i32) -> String {
    let utc_hour = (local_hour as i32 - utc_offset_hours).rem_euclid(24);
    format!("0 0 {utc_hour} * * *")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Digest {
    Morning,
    Evening,
}

impl Digest {
    fn label(self) -> &'static str {
        match self {
            Digest::Morning => "morning digest",
            Digest::Evening => "evening digest",
        }
    }
}

/// Fires the morning and evening digests every day.
pub struct DailyBroadcastService {
    broadcaster: Broadcaster,
    scheduler: JobScheduler,
    morning_cron: String,
    evening_cron: String,
}

impl DailyBroadcastService {
    pub async fn new(
        broadcaster: Broadcaster,
        morning_hour: u32,
        evening_hour: u32,
        utc_offset_hours: i32,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            broadcaster,
            scheduler,
            morning_cron: daily_cron(morning_hour, utc_offset_hours),
            evening_cron: daily_cron(evening_hour, utc_offset_hours),
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for (digest, cron) in [
            (Digest::Morning, self.morning_cron.clone()),
            (Digest::Evening, self.evening_cron.clone()),
        ] {
            let broadcaster = self.broadcaster.clone();

            let job = Job::new_async(cron.as_str(), move |_uuid, _l| {
                let broadcaster = broadcaster.clone();
                Box::pin(async move {
                    run_digest(&broadcaster, digest).await;
                })
            })?;

            self.scheduler.add(job).await?;
            tracing::info!("Scheduled {} with cron '{}' (UTC)", digest.label(), cron);
        }

        self.scheduler.start().await?;
        log_system_event("Daily broadcast service started", None);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        log_system_event("Daily broadcast service stopped", None);
        Ok(())
    }
}

async fn run_digest(broadcaster: &Broadcaster, digest: Digest) {
    let result = match digest {
        Digest::Morning => broadcaster.run_morning_digest().await,
        Digest::Evening => broadcaster.run_evening_digest().await,
    };

    match result {
        Ok(report) => {
            tracing::info!(
                "{} done: {} products, channel posted: {}, {} delivered, {} failed",
                digest.label(),
                report.products,
                report.channel_posted,
                report.users.delivered,
                report.users.failed
            );
        }
        Err(e) => tracing::error!("Failed to run {}: {}", digest.label(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::templates::Branding;
    use crate::config::Config;
    use crate::database::connection::DatabaseManager;
    use teloxide::Bot;
    use tempfile::TempDir;

    #[test]
    fn test_daily_cron_converts_wib_to_utc() {
        assert_eq!(daily_cron(8, 7), "0 0 1 * * *");
        assert_eq!(daily_cron(20, 7), "0 0 13 * * *");
    }

    #[test]
    fn test_daily_cron_wraps_around_midnight() {
        assert_eq!(daily_cron(3, 7), "0 0 20 * * *");
        assert_eq!(daily_cron(22, -5), "0 0 3 * * *");
        assert_eq!(daily_cron(0, 0), "0 0 0 * * *");
    }

    #[tokio::test]
    async fn test_service_crons_follow_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = DatabaseManager::new(&db_url).await.expect("Failed to create test database");
        db.run_migrations().await.expect("Failed to run migrations");

        let config = Config {
            telegram_bot_token: "123:test".to_string(),
            admin_id: None,
            channel_id: "@promoshopee".to_string(),
            channel_username: "@promoshopee".to_string(),
            database_url: db_url,
            http_port: 0,
            utc_offset_hours: 7,
            morning_hour: 9,
            evening_hour: 21,
            broadcast_delay_ms: 0,
        };
        let branding = Branding::from_config(&config, None);
        let broadcaster = Broadcaster::new(Bot::new("123:test"), db, &config, branding);

        let service = DailyBroadcastService::new(
            broadcaster,
            config.morning_hour,
            config.evening_hour,
            config.utc_offset_hours,
        )
        .await
        .expect("Failed to create service");
        assert_eq!(service.morning_cron, "0 0 2 * * *");
        assert_eq!(service.evening_cron, "0 0 14 * * *");
    }
}
