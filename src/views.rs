use crate::calendar::{self, Period};
use crate::models::{Habit, Snapshot};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageViews {
    pub dashboard: DashboardView,
    pub tracker: TrackerView,
    pub goals: GoalsView,
    pub profile: ProfileView,
    pub settings: SettingsView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub welcome: String,
    pub quote_text: String,
    pub quote_author: String,
    pub percent: u32,
    pub completed_today: u32,
    pub active_habits: usize,
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerView {
    pub month: String,
    pub year: i32,
    pub days: u32,
    /// Share of habits completed on each day, in percent.
    pub pulse: Vec<f64>,
    pub rows: Vec<TrackerRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerRow {
    pub habit_id: i64,
    pub name: String,
    pub cells: Vec<bool>,
    pub success_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalsView {
    pub month: String,
    pub days_left: i64,
    pub cards: Vec<GoalCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalCard {
    pub habit_id: i64,
    pub name: String,
    pub completed: u32,
    pub goal: i64,
    pub progress: u32,
    pub remaining: u32,
    pub advisory: Advisory,
}

impl GoalCard {
    pub fn remaining_label(&self) -> String {
        if self.remaining > 0 {
            format!("{} check-ins remaining", self.remaining)
        } else {
            "Goal completed! 🎉".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Advisory {
    Done,
    Urgent,
    Steady,
}

impl Advisory {
    pub fn for_remaining(remaining: u32, days_left: i64) -> Self {
        if remaining == 0 {
            Self::Done
        } else if i64::from(remaining) > days_left {
            Self::Urgent
        } else {
            Self::Steady
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Done => "Well done! Keep it up.",
            Self::Urgent => "Do it daily to lower the gap!",
            Self::Steady => "Do this daily to keep up with the target.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub bio: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub month: String,
    pub year: String,
}

/// The month a snapshot is viewing. Falls back to the server's month, then the
/// local clock, when the stored settings do not parse.
pub fn viewed_period(snapshot: &Snapshot) -> Period {
    Period::from_settings(&snapshot.settings)
        .or_else(|| Period::from_server_date(&snapshot.today_stats.server_date))
        .unwrap_or_else(Period::current)
}

pub fn build_views(snapshot: &Snapshot) -> PageViews {
    let period = viewed_period(snapshot);
    PageViews {
        dashboard: dashboard_view(snapshot),
        tracker: tracker_view(snapshot, period),
        goals: goals_view(snapshot, period),
        profile: ProfileView {
            name: snapshot.profile.name.clone(),
            bio: snapshot.profile.bio.clone(),
            location: snapshot.profile.location.clone(),
        },
        settings: SettingsView {
            month: snapshot.settings.month.clone(),
            year: snapshot.settings.year.clone(),
        },
    }
}

pub fn completion_percent(completed: u32, habit_count: usize) -> u32 {
    if habit_count == 0 {
        return 0;
    }
    (f64::from(completed) / habit_count as f64 * 100.0).round() as u32
}

/// Goals of zero or less count as met.
pub fn goal_progress(completed: u32, goal: i64) -> u32 {
    if goal <= 0 {
        return 100;
    }
    let percent = (f64::from(completed) / goal as f64 * 100.0).round() as u32;
    percent.min(100)
}

fn remaining_checks(completed: u32, goal: i64) -> u32 {
    u32::try_from(goal - i64::from(completed)).unwrap_or(0)
}

pub fn dashboard_view(snapshot: &Snapshot) -> DashboardView {
    let stats = &snapshot.today_stats;
    DashboardView {
        welcome: format!("Welcome back, {}! 👋", snapshot.profile.name),
        quote_text: stats.quote.text.clone(),
        quote_author: format!("- {}", stats.quote.author),
        percent: completion_percent(stats.total_checks, snapshot.habits.len()),
        completed_today: stats.total_checks,
        active_habits: snapshot.habits.len(),
        best_streak: stats.max_streak,
    }
}

pub fn daily_pulse(habits: &[Habit], days: u32) -> Vec<f64> {
    (1..=days)
        .map(|day| {
            if habits.is_empty() {
                return 0.0;
            }
            let done = habits
                .iter()
                .filter(|habit| habit.completed_days.contains(&day))
                .count();
            done as f64 / habits.len() as f64 * 100.0
        })
        .collect()
}

pub fn tracker_view(snapshot: &Snapshot, period: Period) -> TrackerView {
    let days = period.days();
    let rows = snapshot
        .habits
        .iter()
        .map(|habit| TrackerRow {
            habit_id: habit.id,
            name: habit.name.clone(),
            cells: (1..=days)
                .map(|day| habit.completed_days.contains(&day))
                .collect(),
            success_rate: habit.success_rate.max(0.0).round() as u32,
        })
        .collect();

    TrackerView {
        month: period.month_name().to_string(),
        year: period.year,
        days,
        pulse: daily_pulse(&snapshot.habits, days),
        rows,
    }
}

pub fn goals_view(snapshot: &Snapshot, period: Period) -> GoalsView {
    let days_left = calendar::days_left(period.days(), snapshot.today_stats.server_date.day);
    let cards = snapshot
        .habits
        .iter()
        .map(|habit| {
            let completed = habit.completed_count();
            let remaining = remaining_checks(completed, habit.goal);
            GoalCard {
                habit_id: habit.id,
                name: habit.name.clone(),
                completed,
                goal: habit.goal,
                progress: goal_progress(completed, habit.goal),
                remaining,
                advisory: Advisory::for_remaining(remaining, days_left),
            }
        })
        .collect();

    GoalsView {
        month: period.month_name().to_string(),
        days_left,
        cards,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::*;
    use std::collections::BTreeSet;

    pub fn habit(id: i64, name: &str, goal: i64, days: &[u32]) -> Habit {
        Habit {
            id,
            name: name.to_string(),
            goal,
            completed_days: days.iter().copied().collect::<BTreeSet<_>>(),
            streak: 0,
            success_rate: days.len() as f64 / 31.0 * 100.0,
            completed_today: false,
        }
    }

    pub fn snapshot(month: &str, year: &str, habits: Vec<Habit>) -> Snapshot {
        Snapshot {
            settings: Settings {
                month: month.to_string(),
                year: year.to_string(),
            },
            profile: Profile {
                name: "Ada".to_string(),
                bio: "Habit Enthusiast".to_string(),
                location: "World".to_string(),
                ..Profile::default()
            },
            habits,
            today_stats: TodayStats {
                quote: Quote {
                    text: "Habits are the compound interest of self-improvement.".to_string(),
                    author: "James Clear".to_string(),
                },
                total_checks: 0,
                max_streak: 0,
                server_date: ServerDate {
                    year: 2025,
                    month: "April".to_string(),
                    day: 10,
                },
            },
            analytics: Analytics {
                daily_line: vec![0; 31],
                weekly_bar: vec![0; 5],
            },
        }
    }
}
