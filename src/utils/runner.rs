//! CSV export of a results collection.

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::results::StatsCollection;

/// Export every result to a CSV file, values divided by `scale`.
pub fn export_csv(path: impl AsRef<Path>, data: &StatsCollection, scale: f32) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_csv(&mut writer, data, scale)?;
    writer.flush()?;
    Ok(())
}

/// Write `name,median,mean,stddev,min,max,samples` rows in insertion order.
/// Results with no samples get empty statistic fields.
pub fn write_csv<W: Write>(writer: &mut W, data: &StatsCollection, scale: f32) -> Result<()> {
    writeln!(writer, "name,median,mean,stddev,min,max,samples")?;

    for (name, stats) in data.iter() {
        if stats.count() == 0 {
            writeln!(writer, "{},,,,,,0", quote(name))?;
            continue;
        }
        writeln!(
            writer,
            "{},{:.3},{:.3},{:.3},{:.3},{:.3},{}",
            quote(name),
            stats.median() / scale,
            stats.mean() / scale,
            stats.standard_deviation() / scale,
            stats.minimum() / scale,
            stats.maximum() / scale,
            stats.count()
        )?;
    }
    Ok(())
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::stats::Stats;

    #[test]
    fn test_csv_rows_in_order() {
        let mut data = StatsCollection::new();
        data.add("Loop 1K times  [count=1000]", Stats::from_slice(&[2.0, 4.0]))
            .unwrap();
        data.add("f(a, b)", Stats::from_slice(&[1.0])).unwrap();
        data.add("nothing", Stats::from_slice(&[])).unwrap();

        let mut out = Vec::new();
        write_csv(&mut out, &data, 2.0).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "name,median,mean,stddev,min,max,samples");
        assert_eq!(
            lines[1],
            "Loop 1K times  [count=1000],1.500,1.500,0.500,1.000,2.000,2"
        );
        assert_eq!(lines[2], "\"f(a, b)\",0.500,0.500,0.000,0.500,0.500,1");
        assert_eq!(lines[3], "nothing,,,,,,0");
    }

    #[test]
    fn test_quote_escapes_quotes() {
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote("plain"), "plain");
    }
}
