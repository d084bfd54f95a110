//! CSV export for a simulated day.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::SimulationSeries;

/// Column header for the hourly CSV export.
const HEADER: [&str; 4] = ["hour", "generation_w", "load_w", "battery_soc_pct"];

/// Exports an hourly series to a CSV file at the given path.
///
/// Writes a header row followed by one row per hour (24 rows). Values are
/// rounded to whole watts and to one decimal of SOC.
///
/// # Arguments
///
/// * `series` - Simulated day
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(series: &SimulationSeries, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(series, buf)
}

/// Writes an hourly series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(series: &SimulationSeries, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for r in series.hours() {
        wtr.write_record(&[
            r.hour.to_string(),
            format!("{:.0}", r.generation_w),
            format!("{:.0}", r.load_w),
            format!("{:.1}", r.battery_soc_pct),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
