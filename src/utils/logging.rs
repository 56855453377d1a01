use tracing::{debug, error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_START: {} by {}({}) in chat {} - {}",
            command, user, user_id, chat_id, d
        ),
        None => info!(
            "CMD_START: {} by {}({}) in chat {}",
            command, user, user_id, chat_id
        ),
    }
}

/// Logs command completion with consistent format
pub fn log_command_success(command: &str, user_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!("CMD_SUCCESS: {} by {} - {}", command, user_id, d),
        None => info!("CMD_SUCCESS: {} by {}", command, user_id),
    }
}

/// Logs command errors with consistent format
pub fn log_command_error(command: &str, user_id: i64, error: &str) {
    error!("CMD_ERROR: {} by {} - {}", command, user_id, error);
}

/// Logs a non-admin trying an admin command
pub fn log_admin_denied(command: &str, user: &str, user_id: i64) {
    warn!("ADMIN_DENIED: {} attempted by {}({})", command, user, user_id);
}

/// Logs the outcome of a broadcast run
pub fn log_broadcast_summary(kind: &str, delivered: usize, failed: usize) {
    if failed > 0 {
        warn!("BROADCAST: {} finished - {} delivered, {} failed", kind, delivered, failed);
    } else {
        info!("BROADCAST: {} finished - {} delivered", kind, delivered);
    }
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str) {
    error!("DB_ERROR: {} on {} failed: {}", operation, table, error);
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
