use crate::charts::{ChartKind, ChartSlot, ChartSpec};
use crate::errors::SyncError;
use crate::router::Page;
use crate::surface::Surface;
use crate::views::{DashboardView, GoalsView, PageViews, ProfileView, SettingsView, TrackerView};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Handle for a chart mounted on an [`HtmlSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChartId(u32);

/// Renders the dashboard as one self-contained HTML document.
#[derive(Debug)]
pub struct HtmlSurface {
    views: Option<PageViews>,
    active: Page,
    notice: Option<String>,
    charts: BTreeMap<ChartId, ChartSpec>,
    next_chart: u32,
}

impl Default for HtmlSurface {
    fn default() -> Self {
        Self {
            views: None,
            active: Page::Dashboard,
            notice: None,
            charts: BTreeMap::new(),
            next_chart: 0,
        }
    }
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notice_text(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    pub fn document(&self) -> String {
        let sections = match &self.views {
            Some(views) => Page::ALL
                .iter()
                .map(|page| self.section(*page, views))
                .collect::<Vec<_>>()
                .join("\n"),
            None => "<section class=\"page active\"><p class=\"hint\">Loading...</p></section>"
                .to_string(),
        };
        let notice = match &self.notice {
            Some(message) => format!(
                "<div class=\"notice\" role=\"status\">{}</div>",
                escape_html(message)
            ),
            None => String::new(),
        };

        INDEX_HTML
            .replace("{{TITLE}}", self.active.title())
            .replace("{{NAV}}", &self.nav())
            .replace("{{NOTICE}}", &notice)
            .replace("{{PAGES}}", &sections)
    }

    fn nav(&self) -> String {
        Page::ALL
            .iter()
            .map(|page| {
                let class = if *page == self.active {
                    "nav-item active"
                } else {
                    "nav-item"
                };
                format!(
                    "<a class=\"{class}\" href=\"{}\">{}</a>",
                    page.path(),
                    page.title()
                )
            })
            .collect::<Vec<_>>()
            .join("")
    }

    fn section(&self, page: Page, views: &PageViews) -> String {
        let body = match page {
            Page::Dashboard => self.dashboard(&views.dashboard),
            Page::Tracker => tracker(&views.tracker),
            Page::Goals => goals(&views.goals),
            Page::Analytics => self.analytics(),
            Page::Profile => profile(&views.profile),
            Page::Settings => settings(&views.settings),
        };
        let class = if page == self.active {
            "page active"
        } else {
            "page"
        };
        format!("<section id=\"{}\" class=\"{class}\">{body}</section>", page.id())
    }

    fn dashboard(&self, view: &DashboardView) -> String {
        format!(
            r#"<h1 id="welcomeNote">{welcome}</h1>
<blockquote><p id="dashQuote">{quote}</p><cite id="dashAuthor">{author}</cite></blockquote>
<div class="panel">
  <div class="stat"><span class="label">Today</span><span class="value" id="dashProgress">{percent}%</span></div>
  <div class="stat"><span class="label">Completed</span><span class="value" id="dashCompleted">{completed}</span></div>
  <div class="stat"><span class="label">Active habits</span><span class="value" id="dashActive">{active}</span></div>
  <div class="stat"><span class="label">Best streak</span><span class="value">{streak}</span></div>
</div>
{ring}{trend}"#,
            welcome = escape_html(&view.welcome),
            quote = escape_html(&view.quote_text),
            author = escape_html(&view.quote_author),
            percent = view.percent,
            completed = view.completed_today,
            active = view.active_habits,
            streak = view.best_streak,
            ring = self.chart_markup(ChartSlot::DashboardRing),
            trend = self.chart_markup(ChartSlot::DashboardTrend),
        )
    }

    fn analytics(&self) -> String {
        [
            ChartSlot::AnalyticsLine,
            ChartSlot::AnalyticsBar,
            ChartSlot::AnalyticsRadar,
            ChartSlot::AnalyticsPie,
        ]
        .iter()
        .map(|slot| self.chart_markup(*slot))
        .collect::<Vec<_>>()
        .join("\n")
    }

    fn chart_markup(&self, slot: ChartSlot) -> String {
        let Some(spec) = self.charts.values().find(|spec| spec.slot == slot) else {
            return String::new();
        };
        let data = serde_json::to_string(spec)
            .unwrap_or_default()
            .replace('<', "\\u003c");
        let kind = serde_json::to_value(spec.kind)
            .ok()
            .and_then(|value| value.as_str().map(str::to_owned))
            .unwrap_or_default();
        let caption = spec
            .label
            .as_deref()
            .map(|label| format!("<figcaption>{}</figcaption>", escape_html(label)))
            .unwrap_or_default();
        format!(
            "<figure class=\"chart chart-{kind}\">{caption}{}<script type=\"application/json\">{data}</script></figure>",
            chart_body(spec)
        )
    }
}

impl Surface for HtmlSurface {
    type Chart = ChartId;

    fn paint(&mut self, views: &PageViews) {
        self.views = Some(views.clone());
    }

    fn activate(&mut self, page: Page) {
        self.active = page;
    }

    fn notice(&mut self, error: &SyncError) {
        self.notice = Some(error.to_string());
    }

    fn clear_notice(&mut self) {
        self.notice = None;
    }

    fn create_chart(&mut self, spec: &ChartSpec) -> ChartId {
        self.next_chart += 1;
        let id = ChartId(self.next_chart);
        self.charts.insert(id, spec.clone());
        id
    }

    fn destroy_chart(&mut self, chart: ChartId) {
        self.charts.remove(&chart);
    }
}

fn chart_body(spec: &ChartSpec) -> String {
    match spec.kind {
        ChartKind::Line => line_svg(&spec.values),
        ChartKind::Bar => bar_svg(&spec.values),
        ChartKind::Doughnut | ChartKind::Pie | ChartKind::Radar => legend(spec),
    }
}

const SVG_WIDTH: f64 = 600.0;
const SVG_HEIGHT: f64 = 200.0;
const SVG_PAD: f64 = 20.0;

fn scale(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 { max } else { 1.0 }
}

fn line_svg(values: &[f64]) -> String {
    if values.is_empty() {
        return "<p class=\"hint\">No data yet</p>".to_string();
    }
    let max = scale(values);
    let step = if values.len() > 1 {
        (SVG_WIDTH - SVG_PAD * 2.0) / (values.len() - 1) as f64
    } else {
        0.0
    };
    let points = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let x = SVG_PAD + index as f64 * step;
            let y = SVG_HEIGHT - SVG_PAD - value / max * (SVG_HEIGHT - SVG_PAD * 2.0);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "<svg viewBox=\"0 0 {SVG_WIDTH} {SVG_HEIGHT}\"><polyline class=\"chart-line\" points=\"{points}\" /></svg>"
    )
}

fn bar_svg(values: &[f64]) -> String {
    if values.is_empty() {
        return "<p class=\"hint\">No data yet</p>".to_string();
    }
    let max = scale(values);
    let slot = (SVG_WIDTH - SVG_PAD * 2.0) / values.len() as f64;
    let mut bars = String::new();
    for (index, value) in values.iter().enumerate() {
        let height = value / max * (SVG_HEIGHT - SVG_PAD * 2.0);
        let x = SVG_PAD + index as f64 * slot + slot * 0.15;
        let y = SVG_HEIGHT - SVG_PAD - height;
        let _ = write!(
            bars,
            "<rect class=\"chart-bar\" x=\"{x:.1}\" y=\"{y:.1}\" width=\"{:.1}\" height=\"{height:.1}\" rx=\"6\" />",
            slot * 0.7
        );
    }
    format!("<svg viewBox=\"0 0 {SVG_WIDTH} {SVG_HEIGHT}\">{bars}</svg>")
}

fn legend(spec: &ChartSpec) -> String {
    let mut items = String::new();
    for (index, value) in spec.values.iter().enumerate() {
        let label = spec
            .labels
            .get(index)
            .map(|label| escape_html(label))
            .unwrap_or_else(|| format!("#{}", index + 1));
        let _ = write!(items, "<li><span>{label}</span><strong>{value:.0}</strong></li>");
    }
    format!("<ul class=\"legend\">{items}</ul>")
}

fn tracker(view: &TrackerView) -> String {
    let mut html = String::from("<table><thead><tr><th class=\"habit-col\">Habits ✨</th>");
    for day in 1..=view.days {
        let _ = write!(html, "<th>{day}</th>");
    }
    html.push_str("<th>%</th></tr>");

    html.push_str("<tr class=\"daily-progress-row\"><td class=\"habit-col\">Daily Pulse</td>");
    for share in &view.pulse {
        let _ = write!(
            html,
            "<td><div class=\"daily-progress-bar\"><div class=\"daily-progress-fill\" style=\"height: {share:.0}%\"></div></div></td>"
        );
    }
    html.push_str("<td>-</td></tr></thead><tbody>");

    for row in &view.rows {
        let _ = write!(
            html,
            "<tr data-habit=\"{}\"><td class=\"habit-col\">{}</td>",
            row.habit_id,
            escape_html(&row.name)
        );
        for (index, done) in row.cells.iter().enumerate() {
            let checked = if *done { " checked" } else { "" };
            let _ = write!(
                html,
                "<td><input type=\"checkbox\" data-habit=\"{}\" data-day=\"{}\"{checked}></td>",
                row.habit_id,
                index + 1
            );
        }
        let _ = write!(html, "<td class=\"rate\">{}%</td></tr>", row.success_rate);
    }
    html.push_str("</tbody></table>");
    format!(
        "<h2>{} {}</h2><div id=\"trackerContainer\">{html}</div>",
        escape_html(&view.month),
        view.year
    )
}

fn goals(view: &GoalsView) -> String {
    let mut html = String::from("<div id=\"goalsGrid\" class=\"grid\">");
    for card in &view.cards {
        let _ = write!(
            html,
            r#"<div class="card" data-habit="{id}">
  <h3>{name}</h3>
  <div class="progress"><div class="progress-fill" style="width: {progress}%"></div></div>
  <div class="row"><span>Progress: {completed} / {goal}</span><strong>{progress}%</strong></div>
  <div class="remaining">{remaining}</div>
  <div class="advice advice-{tier}">{advice}</div>
  <div class="countdown">Days remaining in {month}: {days_left} days</div>
</div>"#,
            id = card.habit_id,
            name = escape_html(&card.name),
            progress = card.progress,
            completed = card.completed,
            goal = card.goal,
            remaining = card.remaining_label(),
            tier = format!("{:?}", card.advisory).to_lowercase(),
            advice = card.advisory.message(),
            month = escape_html(&view.month),
            days_left = view.days_left,
        );
    }
    html.push_str("</div>");
    html
}

fn profile(view: &ProfileView) -> String {
    let name = escape_html(&view.name);
    let bio = escape_html(&view.bio);
    let location = escape_html(&view.location);
    format!(
        r#"<div class="card">
  <h2 id="profNameDisplay">{name}</h2>
  <p id="profBioDisplay">{bio}</p>
  <p id="profLocDisplay">{location}</p>
</div>
<form class="card" method="post" action="/api/profile">
  <input id="profNameInput" name="name" value="{name}">
  <input id="profBioInput" name="bio" value="{bio}">
  <input id="profLocInput" name="location" value="{location}">
</form>"#
    )
}

fn settings(view: &SettingsView) -> String {
    format!(
        r#"<form class="card" method="post" action="/api/settings">
  <input id="setMonth" name="month" value="{}">
  <input id="setYear" name="year" value="{}">
</form>"#,
        escape_html(&view.month),
        escape_html(&view.year)
    )
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker · {{TITLE}}</title>
  <style>
    :root {
      --bg: #fdf7f9;
      --ink: #2d2a32;
      --accent-pink: #ffb7c5;
      --accent-peach: #ffdab9;
      --accent-purple: #6c5ce7;
      --danger: #ff7675;
      --card: #ffffff;
      --border-color: rgba(45, 42, 50, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      grid-template-columns: 220px 1fr;
      min-height: 100vh;
    }

    nav {
      display: flex;
      flex-direction: column;
      gap: 6px;
      padding: 24px 16px;
      border-right: 1px solid var(--border-color);
    }

    .nav-item {
      padding: 10px 14px;
      border-radius: 12px;
      color: inherit;
      text-decoration: none;
    }

    .nav-item.active {
      background: var(--accent-pink);
      font-weight: 600;
    }

    main {
      padding: 32px;
    }

    .page {
      display: none;
    }

    .page.active {
      display: block;
    }

    .panel,
    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .stat,
    .card,
    .chart {
      background: var(--card);
      border: 1px solid var(--border-color);
      border-radius: 18px;
      padding: 18px;
      margin: 0 0 16px;
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      opacity: 0.7;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
    }

    table {
      border-collapse: collapse;
      font-size: 0.85rem;
    }

    td,
    th {
      padding: 4px;
      text-align: center;
    }

    .habit-col {
      text-align: left;
      min-width: 160px;
    }

    .daily-progress-bar {
      height: 40px;
      width: 10px;
      margin: auto;
      display: flex;
      align-items: flex-end;
      background: #f0f0f0;
      border-radius: 5px;
    }

    .daily-progress-fill {
      width: 100%;
      background: var(--accent-purple);
      border-radius: 5px;
    }

    .rate {
      font-weight: 700;
      color: var(--accent-pink);
    }

    .progress {
      height: 10px;
      background: #eee;
      border-radius: 5px;
      overflow: hidden;
    }

    .progress-fill {
      height: 100%;
      background: linear-gradient(90deg, var(--accent-pink), var(--accent-peach));
    }

    .advice {
      font-size: 0.8rem;
      font-style: italic;
      color: var(--accent-purple);
    }

    .advice-urgent {
      color: var(--danger);
    }

    .chart-line {
      fill: none;
      stroke: var(--accent-purple);
      stroke-width: 3;
    }

    .chart-bar {
      fill: var(--accent-pink);
    }

    .notice {
      margin-bottom: 16px;
      padding: 12px 16px;
      border-radius: 12px;
      background: #fff1f0;
      color: #c63b2b;
    }

    .hint {
      opacity: 0.7;
    }
  </style>
</head>
<body>
  <nav>{{NAV}}</nav>
  <main>
    {{NOTICE}}
    {{PAGES}}
  </main>
</body>
</html>
"#;
