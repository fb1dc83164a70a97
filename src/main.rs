use std::path::PathBuf;
use std::process;

use clap::Parser;
use itertools::Itertools;
use log::error;

use qualigraph::alignment::DEFAULT_COMPARISON_SIZE;
use qualigraph::errors::QualigraphError;
use qualigraph::pipeline::{self, QualiReport, RequestOptions};
use qualigraph::ranking::DEFAULT_RANKING_SIZE;
use qualigraph::session::store::FileSessionStore;
use qualigraph::ui::ChartApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Grand Prix location, e.g. "Monza"
    location: String,

    /// Year of the event
    year: String,

    /// Session store root; defaults to the per-user data directory
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// How many classified drivers enter the lap-time table
    #[arg(long, default_value_t = DEFAULT_RANKING_SIZE)]
    ranking_size: usize,

    /// How many drivers get a telemetry comparison trace
    #[arg(long, default_value_t = DEFAULT_COMPARISON_SIZE)]
    comparison_size: usize,

    /// Print the ranking table instead of opening the chart window
    #[arg(long)]
    no_window: bool,
}

fn build_report(args: &Args) -> Result<QualiReport, QualigraphError> {
    // year and location are validated inside run_request before the store
    // is consulted
    let store = match &args.data_dir {
        Some(dir) => FileSessionStore::new(dir),
        None => FileSessionStore::in_data_dir()?,
    };
    let options = RequestOptions {
        ranking_size: args.ranking_size,
        comparison_size: args.comparison_size,
    };
    pipeline::run_request(&store, &args.location, &args.year, &options)
}

fn print_report(report: &QualiReport) {
    println!("Fastest lap times - {} {}", report.location, report.year);
    for (pos, entry) in report.ranking.iter().enumerate() {
        println!("{:>2}. {}  {:.3}s", pos + 1, entry.driver, entry.lap_time_s);
    }
    if !report.absent.is_empty() {
        println!("No time set: {}", report.absent.iter().join(", "));
    }
    if !report.telemetry.is_empty() {
        println!("Telemetry traces: {}", report.telemetry.keys().join(", "));
    }
}

fn show_window(report: QualiReport) {
    let title = format!(
        "Qualifying Visualizations - {} {}",
        report.location, report.year
    );
    eframe::run_native(
        &title,
        eframe::NativeOptions::default(),
        Box::new(move |cc| Ok(Box::new(ChartApp::new(report, cc)))),
    )
    .expect("could not start app");
}

fn main() {
    colog::init();

    let args = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    match build_report(&args) {
        Ok(report) => {
            print_report(&report);
            if !args.no_window {
                show_window(report);
            }
        }
        // recovered at the boundary: a plain message, not a pipeline fault
        Err(
            e @ (QualigraphError::InvalidUserInput { .. }
            | QualigraphError::SessionNotFound { .. }),
        ) => {
            eprintln!("{e}");
            process::exit(2);
        }
        Err(e) => {
            error!(
                "Could not build qualifying charts for {} {}: {}",
                args.location, args.year, e
            );
            process::exit(1);
        }
    }
}
