use clap::Parser;
use habit_dashboard::cli::{Command, Invocation};
use habit_dashboard::config::{Config, write_document};
use habit_dashboard::models::ProfileUpdate;
use habit_dashboard::{HtmlSurface, HttpApi, MutationReport, ViewStateController};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let invocation = Invocation::parse();
    let config = Config::from_env();
    info!("using habit server at {}", config.api_url);

    let api = HttpApi::with_timeout(config.api_url.clone(), config.request_timeout)?;
    let controller = ViewStateController::new(api, HtmlSurface::new());

    if let Err(err) = controller.start(&invocation.page).await {
        warn!("initial load failed: {err}");
    }

    let report = match invocation.command() {
        Command::Show => None,
        Command::Toggle {
            habit_id,
            day,
            flag,
        } => Some(controller.toggle_day(habit_id, day, flag.is_on()).await),
        Command::Add { name, goal } => Some(controller.add_habit(&name, goal).await),
        Command::Delete { habit_id } => Some(controller.delete_habit(habit_id).await),
        Command::Profile {
            name,
            bio,
            location,
        } => {
            let update = ProfileUpdate {
                name,
                bio,
                location,
            };
            Some(controller.update_profile(update).await)
        }
        Command::Settings { month, year } => {
            Some(controller.update_settings(&month, &year).await)
        }
    };
    if let Some(report) = &report {
        log_report(report);
    }

    let document = controller.with_surface(HtmlSurface::document).await;
    controller.dispose();
    write_document(config.output_path.as_deref(), &document).await?;

    Ok(())
}

fn log_report(report: &MutationReport) {
    match (&report.write, &report.reload) {
        (Ok(()), Some(Ok(outcome))) => info!("saved, reload {outcome:?}"),
        (Err(err), _) => warn!("write failed: {err}"),
        (Ok(()), Some(Err(err))) => warn!("saved, but reload failed: {err}"),
        (Ok(()), None) => {}
    }
}
