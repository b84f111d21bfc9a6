//! Command-line entry point.
//!
//! Usage:
//!   measure-it                 # Run all default areas
//!   measure-it --list          # List available areas
//!   measure-it arrays sorting  # Run specific areas
//!   measure-it --help          # Show help

use std::cell::RefCell;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use measure_it::harness::Harness;
use measure_it::registry::build_registry;
use measure_it::results::StatsLogger;
use measure_it::utils::{export_csv, machine, TimingConfig};
use measure_it::{report, tui, MeasureError, Result};

struct Options {
    show_list: bool,
    show_help: bool,
    skip_machine_stats: bool,
    quiet: bool,
    verbose: bool,
    sample_count: usize,
    html_path: Option<PathBuf>,
    csv_path: Option<PathBuf>,
    areas: Vec<String>,
}

fn parse_args(args: &[String]) -> std::result::Result<Options, String> {
    let mut options = Options {
        show_list: false,
        show_help: false,
        skip_machine_stats: false,
        quiet: false,
        verbose: false,
        sample_count: TimingConfig::default().sample_count,
        html_path: None,
        csv_path: None,
        areas: Vec::new(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--list" | "-l" => options.show_list = true,
            "--help" | "-h" | "/?" => options.show_help = true,
            "--skip-machine-stats" | "-s" => options.skip_machine_stats = true,
            "--quiet" | "-q" => options.quiet = true,
            "--verbose" | "-v" => options.verbose = true,
            "--samples" => {
                i += 1;
                options.sample_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .ok_or("--samples needs a positive number")?;
            }
            "--html" => {
                i += 1;
                options.html_path = Some(args.get(i).ok_or("--html needs a path")?.into());
            }
            "--csv" => {
                i += 1;
                options.csv_path = Some(args.get(i).ok_or("--csv needs a path")?.into());
            }
            arg if !arg.starts_with('-') => options.areas.push(arg.to_string()),
            arg => return Err(format!("Unknown option: {}", arg)),
        }
        i += 1;
    }
    Ok(options)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("measure_it=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("measure_it=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(options: Options) -> Result<()> {
    let registry = build_registry();
    let areas = registry.select(options.areas.as_slice())?;

    tui::print_header();

    let logger = Rc::new(RefCell::new(StatsLogger::default()));
    for (key, value) in machine::capture(options.skip_machine_stats) {
        logger.borrow_mut().set_attribute(key, value);
    }

    let config = TimingConfig {
        sample_count: options.sample_count,
        ..TimingConfig::default()
    };
    config.validate()?;

    let mut harness = Harness::new(&config, Rc::clone(&logger))?;
    if !options.quiet {
        harness.echo_to_console();
        if options.verbose {
            harness.echo_samples_to_console();
        }
    }
    harness.run(&areas)?;
    drop(harness);

    let logger = logger.borrow();
    println!();
    tui::print_results_table(&logger);

    let html_path = options
        .html_path
        .unwrap_or_else(|| env::temp_dir().join("MeasureIt.html"));
    report::write_html(&html_path, &logger)?;
    println!("Report written to {}", html_path.display());

    if let Some(csv_path) = options.csv_path {
        export_csv(&csv_path, logger.data(), logger.scale())?;
        println!("CSV written to {}", csv_path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Use --help for usage.");
            return ExitCode::FAILURE;
        }
    };

    if options.show_help {
        tui::print_help();
        return ExitCode::SUCCESS;
    }

    if options.show_list {
        tui::print_available_areas(&build_registry());
        return ExitCode::SUCCESS;
    }

    init_logging(options.verbose);

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let MeasureError::UnknownArea { .. } = e {
                eprintln!();
                tui::print_available_areas(&build_registry());
            }
            ExitCode::FAILURE
        }
    }
}
