/// Launch dashboard command-line front end.
///
/// Runs one weather + launch score cycle for a site, offering sample data
/// when the backend is rate limited, then refreshes the site score map and
/// prints the upcoming schedule.

use clap::Parser;
use launchmon_service::aggregate::{SiteScoreAggregator, map_markers};
use launchmon_service::client::{ConditionClient, ConditionSource};
use launchmon_service::config::DashboardConfig;
use launchmon_service::fallback::{ApplyOutcome, SampleFallbackController};
use launchmon_service::ingest::backend::HttpBackend;
use launchmon_service::logging::{self, DataSource};
use launchmon_service::model::{Location, ResourceKind};
use launchmon_service::sample::{SampleSource, sample_schedule};
use launchmon_service::schedule::{LaunchEntry, ScheduleFilter};
use launchmon_service::verify::{print_summary, verify_sites};
use launchmon_service::view::PanelView;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "launch_dashboard", about = "Launch site conditions dashboard")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Site to show in the detail panels (defaults to the configured site)
    #[arg(long)]
    location: Option<String>,

    /// Accept sample data without asking when live data is rate limited
    #[arg(long)]
    sample: bool,

    /// Serve built-in sample data instead of contacting the backend
    #[arg(long)]
    offline: bool,

    /// With --offline, answer every live request as rate limited
    #[arg(long, requires = "offline")]
    rate_limited: bool,

    /// Check every configured site and print an availability report
    #[arg(long)]
    verify: bool,
}

/// Asks on stdin whether to use sample data. Anything but y/yes declines.
fn prompt_for_sample(kind: ResourceKind, location: Location) -> io::Result<bool> {
    print!(
        "   Live {} data for {} is rate limited. Use sample data instead? [y/N] ",
        kind, location
    );
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn run_panel(
    controller: &mut SampleFallbackController,
    location: Location,
    auto_sample: bool,
) -> Result<(), Box<dyn Error>> {
    let kind = controller.client().kind();
    if controller.load(location).await == ApplyOutcome::PromptShown {
        if auto_sample || prompt_for_sample(kind, location)? {
            controller.accept_sample().await?;
        } else {
            controller.decline_sample()?;
        }
    }
    Ok(())
}

fn print_panel(title: &str, view: &PanelView) {
    println!("\n── {} · {} ──", title, view.location);
    if let Some(error) = &view.error {
        println!("   ✗ {}", error);
        return;
    }
    let Some(content) = &view.content else {
        println!("   (no data)");
        return;
    };

    if let Some(description) = &content.description {
        println!("   {}", description);
    }
    if let Some(score) = content.score {
        println!(
            "   Score: {:.1}  [{}] {}",
            score, content.classification.color, content.classification.message
        );
    }
    for component in &content.components {
        if let Some(score) = component.score {
            println!(
                "     {:<11} {:>5.1}  [{}]",
                component.name, score, component.classification.color
            );
        }
    }
    for reading in &content.readings {
        println!(
            "   {:<12} {:>7.1}  {:?}",
            reading.kind.to_string(),
            reading.value,
            reading.status
        );
    }
}

fn print_schedule(entries: &[LaunchEntry]) {
    println!("\n── Upcoming launches ──");
    if entries.is_empty() {
        println!("   (none scheduled)");
    }
    for e in entries {
        println!(
            "   #{:<3} {} {}  {:<24} {:<10} {}",
            e.id,
            e.date,
            e.time,
            e.site,
            e.status,
            e.rocket.as_deref().unwrap_or("")
        );
    }
}

/// Picks the backend for this run. Offline runs have no HTTP backend.
fn build_source(
    cli: &Cli,
    config: &DashboardConfig,
) -> Result<(Option<HttpBackend>, Arc<dyn ConditionSource>), Box<dyn Error>> {
    if cli.offline {
        let source = if cli.rate_limited {
            logging::info(DataSource::System, None, "offline mode: live data rate limited, sample data on request");
            SampleSource::rate_limited()
        } else {
            logging::info(DataSource::System, None, "offline mode: serving built-in sample data");
            SampleSource::new()
        };
        return Ok((None, Arc::new(source)));
    }
    let backend = HttpBackend::new(&config.api_base_url, config.request_timeout())?;
    Ok((Some(backend.clone()), Arc::new(backend)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = DashboardConfig::load(cli.config.as_deref())?;
    logging::init_logger(config.log_level, config.log_file.as_deref(), config.console_timestamps);

    let location = match &cli.location {
        Some(name) => name.parse::<Location>()?,
        None => config.default_location,
    };

    let (backend, source) = build_source(&cli, &config)?;

    let weather_client =
        ConditionClient::new(source.clone(), ResourceKind::Weather).with_timeout(config.request_timeout());
    let score_client =
        ConditionClient::new(source, ResourceKind::LaunchScore).with_timeout(config.request_timeout());

    if cli.verify {
        let report = verify_sites(&weather_client, &score_client, &config.map_sites).await;
        print_summary(&report);
        return Ok(());
    }

    // Detail panels
    let mut weather_panel = SampleFallbackController::new(weather_client, location);
    let mut score_panel = SampleFallbackController::new(score_client.clone(), location);
    run_panel(&mut weather_panel, location, cli.sample).await?;
    run_panel(&mut score_panel, location, cli.sample).await?;
    print_panel("Weather", &PanelView::from_controller(&weather_panel));
    print_panel("Launch score", &PanelView::from_controller(&score_panel));

    // Site map
    let mut aggregator = SiteScoreAggregator::new(score_client);
    let scores = aggregator.refresh(&config.map_sites).await;
    println!("\n── Site map ──");
    for marker in map_markers(scores) {
        let score = marker
            .score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "   {:<26} ({:>8.4}, {:>9.4})  {:>5}  [{}]",
            marker.location.as_str(),
            marker.latitude,
            marker.longitude,
            score,
            marker.color
        );
    }

    // Schedule
    let filter = ScheduleFilter {
        site: Some(location),
        ..Default::default()
    };
    let entries = match &backend {
        Some(backend) => match backend.fetch_launch_schedule(&filter).await {
            Ok(entries) => entries,
            Err(e) => {
                logging::log_fetch_failure(DataSource::Schedule, location.as_str(), "fetch launch schedule", &e);
                Vec::new()
            }
        },
        None => filter.apply(sample_schedule()),
    };
    print_schedule(&entries);

    Ok(())
}
