use crate::models::Snapshot;
use crate::router::Page;
use crate::surface::Surface;
use crate::views::{completion_percent, viewed_period};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Doughnut,
    Line,
    Bar,
    Radar,
    Pie,
}

/// Slot a chart occupies on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    DashboardRing,
    DashboardTrend,
    AnalyticsLine,
    AnalyticsBar,
    AnalyticsRadar,
    AnalyticsPie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub kind: ChartKind,
    pub label: Option<String>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSpec {
    fn new(slot: ChartSlot, kind: ChartKind, labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            slot,
            kind,
            label: None,
            labels,
            values,
        }
    }

    fn labelled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// Charts shown on `page`. Pages without charts yield nothing.
pub fn charts_for_page(page: Page, snapshot: &Snapshot) -> Vec<ChartSpec> {
    match page {
        Page::Dashboard => dashboard_charts(snapshot),
        Page::Analytics => analytics_charts(snapshot),
        Page::Tracker | Page::Goals | Page::Profile | Page::Settings => Vec::new(),
    }
}

fn day_labels(days: u32) -> Vec<String> {
    (1..=days).map(|day| day.to_string()).collect()
}

fn as_values(counts: &[u32]) -> Vec<f64> {
    counts.iter().map(|count| f64::from(*count)).collect()
}

fn dashboard_charts(snapshot: &Snapshot) -> Vec<ChartSpec> {
    let percent = completion_percent(snapshot.today_stats.total_checks, snapshot.habits.len());
    let days = viewed_period(snapshot).days();
    vec![
        ChartSpec::new(
            ChartSlot::DashboardRing,
            ChartKind::Doughnut,
            Vec::new(),
            vec![f64::from(percent), f64::from(100u32.saturating_sub(percent))],
        ),
        ChartSpec::new(
            ChartSlot::DashboardTrend,
            ChartKind::Line,
            day_labels(days),
            as_values(&snapshot.analytics.daily_line),
        )
        .labelled("Activity"),
    ]
}

fn analytics_charts(snapshot: &Snapshot) -> Vec<ChartSpec> {
    let names: Vec<String> = snapshot.habits.iter().map(|habit| habit.name.clone()).collect();
    let weeks = (1..=snapshot.analytics.weekly_bar.len().max(5))
        .map(|week| format!("Week {week}"))
        .collect();
    vec![
        ChartSpec::new(
            ChartSlot::AnalyticsLine,
            ChartKind::Line,
            day_labels(31),
            as_values(&snapshot.analytics.daily_line),
        )
        .labelled("Completions"),
        ChartSpec::new(
            ChartSlot::AnalyticsBar,
            ChartKind::Bar,
            weeks,
            as_values(&snapshot.analytics.weekly_bar),
        ),
        ChartSpec::new(
            ChartSlot::AnalyticsRadar,
            ChartKind::Radar,
            names.clone(),
            snapshot.habits.iter().map(|habit| habit.success_rate).collect(),
        )
        .labelled("Consistency"),
        ChartSpec::new(
            ChartSlot::AnalyticsPie,
            ChartKind::Pie,
            names,
            snapshot
                .habits
                .iter()
                .map(|habit| f64::from(habit.completed_count()))
                .collect(),
        ),
    ]
}

/// Owns every chart currently mounted on a surface. Mounting a new set always
/// destroys the previous one first.
#[derive(Debug)]
pub struct ChartRegistry<C> {
    live: Vec<C>,
}

impl<C> Default for ChartRegistry<C> {
    fn default() -> Self {
        Self { live: Vec::new() }
    }
}

impl<C> ChartRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn replace<S>(&mut self, surface: &mut S, specs: &[ChartSpec])
    where
        S: Surface<Chart = C>,
    {
        self.clear(surface);
        for spec in specs {
            self.live.push(surface.create_chart(spec));
        }
        debug!("mounted {} charts", self.live.len());
    }

    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: Surface<Chart = C>,
    {
        for chart in self.live.drain(..) {
            surface.destroy_chart(chart);
        }
    }
}
