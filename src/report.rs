//! HTML report of a finished run.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::results::StatsLogger;

const OPTIMIZATION_WARNING: &str =
    "Warning: the benchmarks were built without optimizations. The results are likely invalid.";

/// Render the report and write it to `path`.
pub fn write_html(path: impl AsRef<Path>, logger: &StatsLogger) -> Result<()> {
    std::fs::write(path, render_html(logger))?;
    Ok(())
}

/// Render results and run attributes as a standalone HTML page.
pub fn render_html(logger: &StatsLogger) -> String {
    let mut html = String::new();
    // Writing to a String cannot fail.
    let _ = write_document(&mut html, logger);
    html
}

fn write_document(out: &mut String, logger: &StatsLogger) -> std::fmt::Result {
    writeln!(out, "<html>")?;
    writeln!(out, "<h1> MeasureIt Performance Results </h1>")?;

    if logger.attribute("CodeOptimization") == Some("Unoptimized") {
        writeln!(out, "<font color=red><p>")?;
        writeln!(out, "{}", OPTIMIZATION_WARNING)?;
        writeln!(out, "</p></font>")?;
    }

    writeln!(out, "<p>")?;
    writeln!(
        out,
        "Each benchmark is run several times and the statistics are displayed. \
         When a benchmark was cloned, 'scale' is the number of copies and 'count' the \
         number of times the copies were run in a loop; reported numbers divide by both, \
         so they describe one instance of the operation."
    )?;
    writeln!(out, "</p><p>")?;
    writeln!(
        out,
        "For a normal distribution about 95% of measurements fall within 2 StdDev of the \
         Mean. The median is the better guess for a typical sample and is more stable when \
         the data has outliers."
    )?;
    writeln!(out, "</p>")?;

    writeln!(out, "<h3>Data collected</h3>")?;
    writeln!(out, "<p>")?;
    writeln!(out, "{}", escape(logger.units_description()))?;
    writeln!(out, "</p>")?;
    write_results_table(out, logger)?;

    writeln!(out, "<h2>Attributes of the machine used to collect the data</h2>")?;
    writeln!(out, "<table border>")?;
    writeln!(out, "<tr><th>Attribute</th><th>Value</th></tr>")?;
    for (key, value) in logger.attributes() {
        writeln!(out, "<tr><td>{}</td><td>{}</td></tr>", escape(key), escape(value))?;
    }
    writeln!(out, "</table>")?;

    writeln!(out, "</html>")
}

fn write_results_table(out: &mut String, logger: &StatsLogger) -> std::fmt::Result {
    let scale = logger.scale();
    writeln!(out, "<table border>")?;
    writeln!(
        out,
        "<tr><th>Name</th><th>Median</th><th>Mean</th><th>StdDev</th><th>Min</th><th>Max</th><th>Samples</th></tr>"
    )?;
    for (name, stats) in logger.data().iter() {
        write!(out, "<tr><td>{}</td>", escape(name))?;
        if stats.count() == 0 {
            write!(out, "{}", "<td>-</td>".repeat(5))?;
        } else {
            for value in [
                stats.median(),
                stats.mean(),
                stats.standard_deviation(),
                stats.minimum(),
                stats.maximum(),
            ] {
                write!(out, "<td>{:.3}</td>", value / scale)?;
            }
        }
        writeln!(out, "<td>{}</td></tr>", stats.count())?;
    }
    writeln!(out, "</table>")
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
