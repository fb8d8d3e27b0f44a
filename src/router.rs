use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Dashboard,
    Tracker,
    Goals,
    Analytics,
    Profile,
    Settings,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Tracker,
        Page::Goals,
        Page::Analytics,
        Page::Profile,
        Page::Settings,
    ];

    /// Resolves a location path. Unknown paths land on the dashboard.
    pub fn from_path(path: &str) -> Self {
        let segment = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_matches('/');
        match segment {
            "tracker" => Page::Tracker,
            "goals" => Page::Goals,
            "analytics" => Page::Analytics,
            "profile" => Page::Profile,
            "settings" => Page::Settings,
            _ => Page::Dashboard,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Tracker => "tracker",
            Page::Goals => "goals",
            Page::Analytics => "analytics",
            Page::Profile => "profile",
            Page::Settings => "settings",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Dashboard => "/",
            Page::Tracker => "/tracker",
            Page::Goals => "/goals",
            Page::Analytics => "/analytics",
            Page::Profile => "/profile",
            Page::Settings => "/settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Tracker => "Tracker",
            Page::Goals => "Goals",
            Page::Analytics => "Analytics",
            Page::Profile => "Profile",
            Page::Settings => "Settings",
        }
    }
}

/// Session history of visited pages, browser style: pushing drops any forward
/// entries, back and forward move a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Page>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Page) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> Page {
        self.entries[self.cursor]
    }

    /// Replaces the current entry without adding a new one.
    pub fn replace(&mut self, page: Page) {
        self.entries[self.cursor] = page;
    }

    pub fn push(&mut self, page: Page) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(page);
        self.cursor += 1;
    }

    pub fn back(&mut self) -> Option<Page> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<Page> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Page::Dashboard)
    }
}
