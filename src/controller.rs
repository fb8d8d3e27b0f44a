use crate::api::HabitApi;
use crate::calendar::Period;
use crate::charts::{ChartRegistry, charts_for_page};
use crate::errors::SyncError;
use crate::models::{
    CompletionRequest, DEFAULT_GOAL, NewHabit, ProfileUpdate, SettingsUpdate, Snapshot,
};
use crate::router::{History, Page};
use crate::surface::Surface;
use crate::views::{build_views, viewed_period};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Stale default left behind by older installs; seeing it on first load
/// triggers a one-time move to the server's current month.
pub const SENTINEL_YEAR: &str = "2024";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied,
    /// A newer reload was applied while this one was in flight.
    Superseded,
}

/// A single write against the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetCompletion(CompletionRequest),
    CreateHabit(NewHabit),
    DeleteHabit(i64),
    UpdateProfile(ProfileUpdate),
    UpdateSettings(SettingsUpdate),
}

impl Mutation {
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::SetCompletion(_) => "set_completion",
            Mutation::CreateHabit(_) => "create_habit",
            Mutation::DeleteHabit(_) => "delete_habit",
            Mutation::UpdateProfile(_) => "update_profile",
            Mutation::UpdateSettings(_) => "update_settings",
        }
    }
}

/// What happened at each stage of a mutation. `reload` is `None` when the
/// mutation failed locally and nothing was sent.
#[derive(Debug)]
pub struct MutationReport {
    pub write: Result<(), SyncError>,
    pub reload: Option<Result<ReloadOutcome, SyncError>>,
}

impl MutationReport {
    fn not_sent(err: SyncError) -> Self {
        Self {
            write: Err(err),
            reload: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.write.is_ok() && matches!(self.reload, Some(Ok(_)))
    }
}

struct ViewState<S: Surface> {
    snapshot: Option<Snapshot>,
    applied: u64,
    initial_sync_done: bool,
    history: History,
    charts: ChartRegistry<S::Chart>,
    surface: S,
}

impl<S: Surface> ViewState<S> {
    fn render_all(&mut self) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        self.surface.paint(&build_views(snapshot));
        self.render_charts();
    }

    fn render_charts(&mut self) {
        let specs = match self.snapshot.as_ref() {
            Some(snapshot) => charts_for_page(self.history.current(), snapshot),
            None => Vec::new(),
        };
        self.charts.replace(&mut self.surface, &specs);
    }

    fn show(&mut self, page: Page) {
        self.surface.activate(page);
        self.render_charts();
    }
}

/// Owns the one live snapshot and keeps the surface in step with it.
pub struct ViewStateController<A, S: Surface> {
    api: A,
    issued: AtomicU64,
    state: Mutex<ViewState<S>>,
}

impl<A: HabitApi, S: Surface> ViewStateController<A, S> {
    pub fn new(api: A, surface: S) -> Self {
        Self {
            api,
            issued: AtomicU64::new(0),
            state: Mutex::new(ViewState {
                snapshot: None,
                applied: 0,
                initial_sync_done: false,
                history: History::default(),
                charts: ChartRegistry::new(),
                surface,
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Routes to `path` without a history entry, then loads the first snapshot.
    pub async fn start(&self, path: &str) -> Result<ReloadOutcome, SyncError> {
        let page = Page::from_path(path);
        {
            let mut state = self.state.lock().await;
            state.history.replace(page);
            state.surface.activate(page);
        }
        info!("starting on {}", page.path());
        self.reload().await
    }

    /// Fetches and applies a fresh snapshot. Any notice still showing is
    /// dropped first, so only failures from this reload remain visible.
    pub async fn reload(&self) -> Result<ReloadOutcome, SyncError> {
        self.state.lock().await.surface.clear_notice();
        self.resync().await
    }

    /// Fetch, sentinel check, normalize, render. Leaves raised notices alone.
    async fn resync(&self) -> Result<ReloadOutcome, SyncError> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let mut snapshot = match self.api.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("reload #{ticket} failed: {err}");
                self.state.lock().await.surface.notice(&err);
                return Err(err);
            }
        };

        let first_load = {
            let mut state = self.state.lock().await;
            !std::mem::replace(&mut state.initial_sync_done, true)
        };
        if first_load && snapshot.settings.year == SENTINEL_YEAR {
            self.sync_stale_period(&mut snapshot).await;
        }

        let dropped = snapshot.normalize(viewed_period(&snapshot).days());
        if dropped > 0 {
            warn!("dropped {dropped} completed days outside the viewed month");
        }

        let mut state = self.state.lock().await;
        if ticket < state.applied {
            debug!("discarding reload #{ticket}, #{} already applied", state.applied);
            return Ok(ReloadOutcome::Superseded);
        }
        state.applied = ticket;
        state.snapshot = Some(snapshot);
        state.render_all();
        debug!("applied reload #{ticket}");
        Ok(ReloadOutcome::Applied)
    }

    /// Moves the viewed period to the server's today and patches `snapshot`
    /// in place instead of reloading.
    async fn sync_stale_period(&self, snapshot: &mut Snapshot) {
        let today = &snapshot.today_stats.server_date;
        let update = SettingsUpdate {
            month: today.month.clone(),
            year: today.year.to_string(),
        };
        info!(
            "settings still on {SENTINEL_YEAR}, moving to {} {}",
            update.month, update.year
        );
        if let Err(err) = self.api.update_settings(&update).await {
            warn!("period write-back failed: {err}");
            self.state.lock().await.surface.notice(&err);
        }
        snapshot.settings.month = update.month;
        snapshot.settings.year = update.year;
    }

    /// Write, then resynchronize from the server whatever the write's outcome.
    pub async fn apply(&self, mutation: Mutation) -> MutationReport {
        let label = mutation.label();
        self.state.lock().await.surface.clear_notice();
        let write = match &mutation {
            Mutation::SetCompletion(request) => self.api.set_completion(request).await,
            Mutation::CreateHabit(habit) => self.api.create_habit(habit).await,
            Mutation::DeleteHabit(id) => self.api.delete_habit(*id).await,
            Mutation::UpdateProfile(update) => self.api.update_profile(update).await,
            Mutation::UpdateSettings(update) => self.api.update_settings(update).await,
        };
        if let Err(err) = &write {
            warn!("{label} failed: {err}");
            self.state.lock().await.surface.notice(err);
        }
        let reload = self.resync().await;
        MutationReport {
            write,
            reload: Some(reload),
        }
    }

    /// Marks `day` of the viewed month done or not done for a habit.
    pub async fn toggle_day(&self, habit_id: i64, day: u32, completed: bool) -> MutationReport {
        match self.completion_request(habit_id, day, completed).await {
            Ok(request) => self.apply(Mutation::SetCompletion(request)).await,
            Err(err) => self.reject_locally(err).await,
        }
    }

    pub async fn add_habit(&self, name: &str, goal: Option<u32>) -> MutationReport {
        let name = name.trim();
        if name.is_empty() {
            return self.reject_locally(SyncError::invalid("habit name is empty")).await;
        }
        let goal = goal.unwrap_or(DEFAULT_GOAL);
        if goal == 0 {
            return self
                .reject_locally(SyncError::invalid("goal must be at least one day"))
                .await;
        }
        self.apply(Mutation::CreateHabit(NewHabit {
            name: name.to_string(),
            goal,
        }))
        .await
    }

    pub async fn delete_habit(&self, habit_id: i64) -> MutationReport {
        self.apply(Mutation::DeleteHabit(habit_id)).await
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> MutationReport {
        self.apply(Mutation::UpdateProfile(update)).await
    }

    pub async fn update_settings(&self, month: &str, year: &str) -> MutationReport {
        let Some(period) = Period::parse(year, month) else {
            return self
                .reject_locally(SyncError::invalid(format!("unknown period {month} {year}")))
                .await;
        };
        self.apply(Mutation::UpdateSettings(SettingsUpdate {
            month: period.month_name().to_string(),
            year: period.year.to_string(),
        }))
        .await
    }

    async fn completion_request(
        &self,
        habit_id: i64,
        day: u32,
        completed: bool,
    ) -> Result<CompletionRequest, SyncError> {
        let state = self.state.lock().await;
        let snapshot = state
            .snapshot
            .as_ref()
            .ok_or_else(|| SyncError::invalid("no snapshot loaded yet"))?;
        let period = Period::from_settings(&snapshot.settings).ok_or_else(|| {
            SyncError::invalid(format!(
                "unknown period {} {}",
                snapshot.settings.month, snapshot.settings.year
            ))
        })?;
        if !(1..=period.days()).contains(&day) {
            return Err(SyncError::invalid(format!(
                "day {day} is outside {} {}",
                period.month_name(),
                period.year
            )));
        }
        Ok(CompletionRequest {
            habit_id,
            year: period.year,
            month: period.month_number(),
            day,
            completed: u8::from(completed),
        })
    }

    async fn reject_locally(&self, err: SyncError) -> MutationReport {
        warn!("mutation not sent: {err}");
        self.state.lock().await.surface.notice(&err);
        MutationReport::not_sent(err)
    }

    /// Re-renders every view and chart from the current snapshot.
    pub async fn render_all(&self) {
        self.state.lock().await.render_all();
    }

    /// Switches to the page for `path` and records it in history. No network.
    pub async fn navigate(&self, path: &str) -> Page {
        let page = Page::from_path(path);
        let mut state = self.state.lock().await;
        if state.history.current() != page {
            state.history.push(page);
        }
        state.show(page);
        page
    }

    /// Steps back one history entry; `None` when already at the first one.
    pub async fn back(&self) -> Option<Page> {
        let mut state = self.state.lock().await;
        let page = state.history.back()?;
        state.show(page);
        Some(page)
    }

    pub async fn forward(&self) -> Option<Page> {
        let mut state = self.state.lock().await;
        let page = state.history.forward()?;
        state.show(page);
        Some(page)
    }

    pub async fn current_page(&self) -> Page {
        self.state.lock().await.history.current()
    }

    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.state.lock().await.snapshot.clone()
    }

    pub async fn live_charts(&self) -> usize {
        self.state.lock().await.charts.len()
    }

    pub async fn with_surface<R>(&self, read: impl FnOnce(&S) -> R) -> R {
        read(&self.state.lock().await.surface)
    }

    /// Tears down every mounted chart and hands the surface back.
    pub fn dispose(self) -> S {
        let mut state = self.state.into_inner();
        state.charts.clear(&mut state.surface);
        info!("controller disposed");
        state.surface
    }
}
