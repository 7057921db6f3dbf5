//! Orchestration log events
//!
//! Every line a run produces is emitted on a broadcast channel as it happens,
//! so any presenter (CLI, HTTP handler, test) can follow a run live.

use crate::types::EdgeHealth;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capacity of the broadcast channel; slow subscribers lose the oldest lines
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Ok,
    Warn,
    Down,
}

impl LogLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Ok => "OK",
            LogLevel::Warn => "WARN",
            LogLevel::Down => "DOWN",
        }
    }
}

impl From<EdgeHealth> for LogLevel {
    fn from(health: EdgeHealth) -> Self {
        match health {
            EdgeHealth::Ok => LogLevel::Ok,
            EdgeHealth::Warn => LogLevel::Warn,
            EdgeHealth::Down => LogLevel::Down,
        }
    }
}

/// One orchestration log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    /// `[TAG] message`
    pub fn line(&self) -> String {
        format!("[{}] {}", self.level.tag(), self.message)
    }
}
