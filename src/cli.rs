use clap::{Parser, Subcommand, ValueEnum};

/// Render the habit dashboard, optionally after one write.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "habit_dashboard", version)]
pub struct Invocation {
    /// Page to open, e.g. /tracker or /goals
    #[arg(long, default_value = "/")]
    pub page: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Invocation {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Show)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Flag {
    #[value(alias = "1", alias = "true")]
    On,
    #[value(alias = "0", alias = "false")]
    Off,
}

impl Flag {
    pub fn is_on(self) -> bool {
        self == Flag::On
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Render without writing anything
    Show,

    /// Mark a day of the viewed month done or not done
    Toggle {
        habit_id: i64,
        day: u32,
        #[arg(value_enum)]
        flag: Flag,
    },

    /// Create a habit; the goal defaults to 30 days
    Add { name: String, goal: Option<u32> },

    Delete { habit_id: i64 },

    /// Replace name, bio and location
    Profile {
        name: String,
        bio: String,
        location: String,
    },

    /// Move the viewed month
    Settings { month: String, year: String },
}
