//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use crate::registry::AreaRegistry;
use crate::results::StatsLogger;
use crate::utils::stats::Stats;
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// Format one statistic divided by `scale`, or `-` when there is no data.
fn cell(stats: &Stats, value: f32, scale: f32) -> String {
    if stats.count() == 0 {
        "-".to_string()
    } else {
        format!("{:.3}", value / scale)
    }
}

/// Print every result in insertion order, values divided by the logger scale
pub fn print_results_table(logger: &StatsLogger) {
    let data = logger.data();
    if data.is_empty() {
        return;
    }

    let term_width = get_term_width();
    // 5 value columns of 10 + samples column of 7 + separators + indent
    let fixed_width = 5 * 11 + 8 + 2;
    let name_col_width = term_width.saturating_sub(fixed_width).max(20);
    let table_width = name_col_width + fixed_width - 2;
    let scale = logger.scale();

    println!("  {}", logger.units_description());
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:<n_width$} {:>10} {:>10} {:>10} {:>10} {:>10} {:>7}",
        "Name",
        "Median",
        "Mean",
        "StdDev",
        "Min",
        "Max",
        "Samples",
        n_width = name_col_width
    );
    println!("  {}", "─".repeat(table_width));

    for (name, stats) in data.iter() {
        println!(
            "  {:<n_width$} {:>10} {:>10} {:>10} {:>10} {:>10} {:>7}",
            truncate(name, name_col_width),
            cell(stats, stats.median(), scale),
            cell(stats, stats.mean(), scale),
            cell(stats, stats.standard_deviation(), scale),
            cell(stats, stats.minimum(), scale),
            cell(stats, stats.maximum(), scale),
            stats.count(),
            n_width = name_col_width
        );
    }
    println!();
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80);
    let title = " MeasureIt Microbenchmarks ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
}

/// Print the help message
pub fn print_help() {
    println!("Usage: measure-it [OPTIONS] [AREAS...]");
    println!();
    println!("Runs a set of microbenchmarks.");
    println!();
    println!("Options:");
    println!("  --list, -l                List all benchmark areas");
    println!("  --help, -h                Show this help message");
    println!("  --skip-machine-stats, -s  Speed up startup by skipping machine stats");
    println!("  --samples N               Samples per benchmark (default: 10)");
    println!("  --html PATH               HTML report path (default: $TMPDIR/MeasureIt.html)");
    println!("  --csv PATH                Also export results to CSV");
    println!("  --quiet, -q               Do not print each benchmark as it completes");
    println!("  --verbose, -v             Debug logging and every individual sample");
    println!();
    println!("Arguments:");
    println!("  AREAS          Areas to run, case-insensitive (omit for all default areas)");
    println!();
    println!("Examples:");
    println!("  measure-it                     # Run all default areas");
    println!("  measure-it methodcalls arrays  # Run two areas");
    println!("  measure-it sorting             # Run a non-default area");
    println!("  measure-it --csv data.csv      # Export results to CSV");
}

/// Print the list of available areas
pub fn print_available_areas(registry: &AreaRegistry) {
    println!("Areas: (no area means all these areas)");
    for area in registry.all().iter().filter(|a| a.is_default()) {
        println!("  {:<16} - {}", area.name(), area.description());
    }
    println!();
    println!("Other areas: (must be named on the command line)");
    for area in registry.all().iter().filter(|a| !a.is_default()) {
        println!("  {:<16} - {}", area.name(), area.description());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a rather long name", 10), "a rathe...");
    }

    #[test]
    fn test_cell_guards_empty_stats() {
        let empty = Stats::from_slice(&[]);
        assert_eq!(cell(&empty, empty.mean(), 1.0), "-");
        let stats = Stats::from_slice(&[3.0]);
        assert_eq!(cell(&stats, stats.mean(), 2.0), "1.500");
    }
}
