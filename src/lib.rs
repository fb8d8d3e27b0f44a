pub mod api;
pub mod calendar;
pub mod charts;
pub mod cli;
pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod router;
pub mod surface;
pub mod ui;
pub mod views;

pub use api::{HabitApi, HttpApi};
pub use controller::{Mutation, MutationReport, ReloadOutcome, ViewStateController};
pub use errors::{FailureKind, SyncError};
pub use surface::Surface;
pub use ui::HtmlSurface;
