#![allow(dead_code)]

use habit_dashboard::calendar::Period;
use habit_dashboard::charts::{ChartSlot, ChartSpec};
use habit_dashboard::models::{
    Analytics, CompletionRequest, NewHabit, Profile, ProfileUpdate, Quote, ServerDate, Settings,
    SettingsUpdate, Snapshot, TodayStats,
};
use habit_dashboard::router::Page;
use habit_dashboard::views::PageViews;
use habit_dashboard::{HabitApi, Surface, SyncError};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Fetch,
    Profile(ProfileUpdate),
    Complete(CompletionRequest),
    Create(NewHabit),
    Delete(i64),
    Settings(SettingsUpdate),
}

impl Request {
    pub fn is_write(&self) -> bool {
        !matches!(self, Request::Fetch)
    }
}

/// In-memory stand-in for the habit server's storage.
#[derive(Debug)]
pub struct FakeServer {
    pub settings: Settings,
    pub profile: Profile,
    pub habits: Vec<(i64, String, i64)>,
    pub completions: BTreeMap<(i64, i32, u32), BTreeSet<u32>>,
    pub today: ServerDate,
    pub total_checks: u32,
    pub requests: Vec<Request>,
    next_id: i64,
}

impl FakeServer {
    /// Viewing April 2025, with the server's today on April 10th 2025.
    pub fn seeded() -> Self {
        let mut server = Self {
            settings: Settings {
                month: "April".to_string(),
                year: "2025".to_string(),
            },
            profile: Profile {
                id: Some(1),
                name: "User".to_string(),
                bio: "Habit Enthusiast".to_string(),
                location: "World".to_string(),
                avatar_url: String::new(),
            },
            habits: Vec::new(),
            completions: BTreeMap::new(),
            today: ServerDate {
                year: 2025,
                month: "April".to_string(),
                day: 10,
            },
            total_checks: 0,
            requests: Vec::new(),
            next_id: 1,
        };
        server.insert_habit("Morning Meditation", 25);
        server.insert_habit("Reading Books", 20);
        server.insert_habit("Daily Exercise", 28);
        for day in [2, 3, 4, 6] {
            server.mark(1, 2025, 4, day);
        }
        server.mark(2, 2025, 4, 2);
        server
    }

    pub fn insert_habit(&mut self, name: &str, goal: i64) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.habits.push((id, name.to_string(), goal));
        id
    }

    pub fn mark(&mut self, habit_id: i64, year: i32, month: u32, day: u32) {
        self.completions
            .entry((habit_id, year, month))
            .or_default()
            .insert(day);
    }

    pub fn snapshot(&self) -> Snapshot {
        let period = Period::from_settings(&self.settings);
        let (year, month) = period
            .map(|period| (period.year, period.month_number()))
            .unwrap_or((0, 0));
        let mut daily_line = vec![0u32; 31];
        let mut weekly_bar = vec![0u32; 5];
        let habits = self
            .habits
            .iter()
            .map(|(id, name, goal)| {
                let days = self
                    .completions
                    .get(&(*id, year, month))
                    .cloned()
                    .unwrap_or_default();
                for day in &days {
                    if (1..=31).contains(day) {
                        daily_line[(*day - 1) as usize] += 1;
                        let week = ((*day - 1) / 7) as usize;
                        if week < 5 {
                            weekly_bar[week] += 1;
                        }
                    }
                }
                habit_dashboard::models::Habit {
                    id: *id,
                    name: name.clone(),
                    goal: *goal,
                    success_rate: days.len() as f64 / 31.0 * 100.0,
                    completed_days: days,
                    streak: 0,
                    completed_today: false,
                }
            })
            .collect();

        Snapshot {
            settings: self.settings.clone(),
            profile: self.profile.clone(),
            habits,
            today_stats: TodayStats {
                quote: Quote {
                    text: "Habits are the compound interest of self-improvement.".to_string(),
                    author: "James Clear".to_string(),
                },
                total_checks: self.total_checks,
                max_streak: 0,
                server_date: self.today.clone(),
            },
            analytics: Analytics {
                daily_line,
                weekly_bar,
            },
        }
    }

    pub fn update_profile(&mut self, update: &ProfileUpdate) {
        self.profile.name = update.name.clone();
        self.profile.bio = update.bio.clone();
        self.profile.location = update.location.clone();
    }

    pub fn set_completion(&mut self, request: &CompletionRequest) {
        let days = self
            .completions
            .entry((request.habit_id, request.year, request.month))
            .or_default();
        if request.is_completed() {
            days.insert(request.day);
        } else {
            days.remove(&request.day);
        }
    }

    /// Fails like the real server does when the name is taken.
    pub fn create_habit(&mut self, habit: &NewHabit) -> Result<i64, String> {
        if self.habits.iter().any(|(_, name, _)| *name == habit.name) {
            return Err("Already exists".to_string());
        }
        Ok(self.insert_habit(&habit.name, i64::from(habit.goal)))
    }

    pub fn delete_habit(&mut self, habit_id: i64) {
        self.habits.retain(|(id, _, _)| *id != habit_id);
        self.completions.retain(|(id, _, _), _| *id != habit_id);
    }

    pub fn update_settings(&mut self, update: &SettingsUpdate) {
        self.settings.month = update.month.clone();
        self.settings.year = update.year.clone();
    }

    pub fn writes(&self) -> Vec<Request> {
        self.requests.iter().filter(|r| r.is_write()).cloned().collect()
    }
}

pub type SharedServer = Arc<Mutex<FakeServer>>;

#[derive(Default)]
struct Faults {
    fetch: Option<SyncError>,
    write: Option<SyncError>,
    gates: HashMap<usize, oneshot::Receiver<()>>,
    fetches: usize,
}

/// `HabitApi` backed directly by a [`FakeServer`], with failure injection and
/// per-fetch gates for ordering tests.
#[derive(Clone)]
pub struct FakeApi {
    pub server: SharedServer,
    faults: Arc<Mutex<Faults>>,
}

impl FakeApi {
    pub fn new(server: FakeServer) -> Self {
        Self {
            server: Arc::new(Mutex::new(server)),
            faults: Arc::default(),
        }
    }

    pub fn seeded() -> Self {
        Self::new(FakeServer::seeded())
    }

    pub fn server(&self) -> std::sync::MutexGuard<'_, FakeServer> {
        self.server.lock().unwrap()
    }

    pub fn fail_fetches(&self, err: Option<SyncError>) {
        self.faults.lock().unwrap().fetch = err;
    }

    pub fn fail_writes(&self, err: Option<SyncError>) {
        self.faults.lock().unwrap().write = err;
    }

    /// Holds the `nth` fetch (1-based) after reading the server state until the
    /// returned sender fires or is dropped.
    pub fn gate_fetch(&self, nth: usize) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.faults.lock().unwrap().gates.insert(nth, rx);
        tx
    }

    fn write(
        &self,
        request: Request,
        apply: impl FnOnce(&mut FakeServer) -> Result<(), SyncError>,
    ) -> Result<(), SyncError> {
        let mut server = self.server.lock().unwrap();
        server.requests.push(request);
        if let Some(err) = self.faults.lock().unwrap().write.clone() {
            return Err(err);
        }
        apply(&mut server)
    }
}

impl HabitApi for FakeApi {
    async fn fetch_snapshot(&self) -> Result<Snapshot, SyncError> {
        let (result, gate) = {
            let mut server = self.server.lock().unwrap();
            server.requests.push(Request::Fetch);
            let mut faults = self.faults.lock().unwrap();
            faults.fetches += 1;
            let nth = faults.fetches;
            let gate = faults.gates.remove(&nth);
            let result = match faults.fetch.clone() {
                Some(err) => Err(err),
                None => Ok(server.snapshot()),
            };
            (result, gate)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), SyncError> {
        self.write(Request::Profile(update.clone()), |server| {
            server.update_profile(update);
            Ok(())
        })
    }

    async fn set_completion(&self, request: &CompletionRequest) -> Result<(), SyncError> {
        self.write(Request::Complete(request.clone()), |server| {
            server.set_completion(request);
            Ok(())
        })
    }

    async fn create_habit(&self, habit: &NewHabit) -> Result<(), SyncError> {
        self.write(Request::Create(habit.clone()), |server| {
            server.create_habit(habit).map(|_| ()).map_err(|message| {
                SyncError::from_status(reqwest::StatusCode::BAD_REQUEST, message)
            })
        })
    }

    async fn delete_habit(&self, habit_id: i64) -> Result<(), SyncError> {
        self.write(Request::Delete(habit_id), |server| {
            server.delete_habit(habit_id);
            Ok(())
        })
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<(), SyncError> {
        self.write(Request::Settings(update.clone()), |server| {
            server.update_settings(update);
            Ok(())
        })
    }
}

/// Surface that records what it was asked to show.
#[derive(Debug)]
pub struct RecordingSurface {
    pub paints: Vec<PageViews>,
    pub active: Page,
    pub activations: Vec<Page>,
    pub notices: Vec<SyncError>,
    /// Notice currently on screen; `notices` keeps every one ever raised.
    pub showing: Option<SyncError>,
    pub live: BTreeMap<u32, ChartSpec>,
    pub created: u32,
    pub destroyed: u32,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            paints: Vec::new(),
            active: Page::Dashboard,
            activations: Vec::new(),
            notices: Vec::new(),
            showing: None,
            live: BTreeMap::new(),
            created: 0,
            destroyed: 0,
        }
    }
}

impl RecordingSurface {
    pub fn last_paint(&self) -> &PageViews {
        self.paints.last().expect("nothing painted yet")
    }

    pub fn live_slots(&self) -> Vec<ChartSlot> {
        self.live.values().map(|spec| spec.slot).collect()
    }

    pub fn chart(&self, slot: ChartSlot) -> Option<&ChartSpec> {
        self.live.values().find(|spec| spec.slot == slot)
    }
}

impl Surface for RecordingSurface {
    type Chart = u32;

    fn paint(&mut self, views: &PageViews) {
        self.paints.push(views.clone());
    }

    fn activate(&mut self, page: Page) {
        self.active = page;
        self.activations.push(page);
    }

    fn notice(&mut self, error: &SyncError) {
        self.notices.push(error.clone());
        self.showing = Some(error.clone());
    }

    fn clear_notice(&mut self) {
        self.showing = None;
    }

    fn create_chart(&mut self, spec: &ChartSpec) -> u32 {
        self.created += 1;
        self.live.insert(self.created, spec.clone());
        self.created
    }

    fn destroy_chart(&mut self, chart: u32) {
        self.destroyed += 1;
        self.live.remove(&chart);
    }
}
