use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Goal the server assigns when a habit is created without one.
pub const DEFAULT_GOAL: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub settings: Settings,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub habits: Vec<Habit>,
    pub today_stats: TodayStats,
    #[serde(default)]
    pub analytics: Analytics,
}

impl Snapshot {
    /// Drops completed days that fall outside `1..=days_in_month`.
    /// Returns how many were removed.
    pub fn normalize(&mut self, days_in_month: u32) -> usize {
        let mut dropped = 0;
        for habit in &mut self.habits {
            let before = habit.completed_days.len();
            habit
                .completed_days
                .retain(|day| (1..=days_in_month).contains(day));
            dropped += before - habit.completed_days.len();
        }
        dropped
    }

    pub fn habit(&self, id: i64) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub month: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    /// Stored as entered, so it can be zero or negative.
    pub goal: i64,
    #[serde(default)]
    pub completed_days: BTreeSet<u32>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub completed_today: bool,
}

impl Habit {
    pub fn completed_count(&self) -> u32 {
        self.completed_days.len() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDate {
    pub year: i32,
    pub month: String,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayStats {
    #[serde(default)]
    pub quote: Quote,
    #[serde(default)]
    pub total_checks: u32,
    #[serde(default)]
    pub max_streak: u32,
    pub server_date: ServerDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Analytics {
    #[serde(default)]
    pub daily_line: Vec<u32>,
    #[serde(default)]
    pub weekly_bar: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub bio: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub habit_id: i64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub completed: u8,
}

impl CompletionRequest {
    pub fn is_completed(&self) -> bool {
        self.completed != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub goal: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub month: String,
    pub year: String,
}

/// Body the server answers every write with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
