use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{info, warn};

use doubles_scheduler::display::{print_schedule, write_schedule_to_file, write_standings};
use doubles_scheduler::parser::{load_courts, load_results, load_roster};
use doubles_scheduler::schedule::{parse_time, ScheduleBuilder, TieBreak, TimeRange};
use doubles_scheduler::stats::{compute_pair_stats, compute_stats, WinRateBasis};
use doubles_scheduler::{web, SchedulerConfig};

#[derive(Parser)]
#[clap(version, about = "Fair doubles scheduling for club nights")]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a schedule from roster and court CSV files
    Schedule {
        #[clap(long)]
        roster: PathBuf,
        #[clap(long)]
        courts: PathBuf,
        /// JSON scheduler config; flags below override it
        #[clap(long)]
        config: Option<PathBuf>,
        /// First slot (HH:MM); defaults to the earliest court opening
        #[clap(long, value_parser = parse_time_arg)]
        start: Option<chrono::NaiveTime>,
        /// End of the last slot (HH:MM); defaults to the latest court closing
        #[clap(long, value_parser = parse_time_arg)]
        end: Option<chrono::NaiveTime>,
        #[clap(long)]
        step: Option<u32>,
        /// Shuffle equal game counts with this seed instead of ordering by name
        #[clap(long)]
        seed: Option<u64>,
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Rank players and pairs from a CSV of completed matches
    Stats {
        #[clap(long)]
        results: PathBuf,
        #[clap(long, value_enum, default_value_t = BasisArg::Games)]
        basis: BasisArg,
    },
    /// Serve the JSON session API
    Serve {
        #[clap(long, env = "SCHEDULER_PORT", default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum BasisArg {
    Games,
    Decided,
}

impl From<BasisArg> for WinRateBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::Games => WinRateBasis::Games,
            BasisArg::Decided => WinRateBasis::Decided,
        }
    }
}

fn parse_time_arg(arg: &str) -> Result<chrono::NaiveTime, String> {
    parse_time(arg).ok_or_else(|| format!("invalid time {:?}, expected HH:MM", arg))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match Args::parse().command {
        Command::Schedule { roster, courts, config, start, end, step, seed, output } => {
            let mut config = match config {
                Some(path) => SchedulerConfig::load(path)?,
                None => SchedulerConfig::default(),
            };
            if let Some(step) = step {
                config.step_minutes = step;
            }
            if let Some(seed) = seed {
                config.tie_break = TieBreak::Seeded(seed);
            }

            let roster = load_roster(&roster)?;
            let courts = load_courts(&courts)?;
            info!("Loaded {} attendees and {} courts", roster.len(), courts.len());

            let mut builder = ScheduleBuilder::new(roster, courts)
                .step_minutes(config.step_minutes)
                .tie_break(config.tie_break);
            match (start, end, TimeRange::spanning(builder.courts())) {
                (Some(start), Some(end), _) => builder = builder.range(TimeRange::new(start, end)),
                (Some(start), None, Some(span)) => builder = builder.range(TimeRange::new(start, span.end)),
                (None, Some(end), Some(span)) => builder = builder.range(TimeRange::new(span.start, end)),
                (None, None, _) => {}
                _ => warn!("Partial time range ignored: no courts to complete it"),
            }

            let schedule = builder.build()?;
            if schedule.matches.is_empty() {
                warn!("No matches could be formed (fewer than four players present at every open court)");
            }
            print_schedule(&schedule, builder.roster())?;

            if let Some(path) = output {
                write_schedule_to_file(&path, &schedule, builder.roster())?;
                println!("Schedule saved to {}", path.display());
            }
        }
        Command::Stats { results, basis } => {
            let results = load_results(&results)?;
            info!("Loaded {} completed matches", results.len());
            let basis = WinRateBasis::from(basis);
            let players = compute_stats(&results, basis);
            let pairs = compute_pair_stats(&results, basis);
            write_standings(&mut std::io::stdout().lock(), &players, &pairs)?;
        }
        Command::Serve { port } => {
            println!("Starting web server on port {}...", port);
            println!("Access the API at http://localhost:{}/api/sessions", port);
            web::start_server(port).await?;
        }
    }

    Ok(())
}
