//! CSV report writers for computed statistics.
//!
//! Output conventions follow the reference tooling: one file of
//! `Avg <label>,<value>` rows, one file of `Hist <label>` / `Bin edges
//! <label>` rows with values formatted to three decimal places, and one
//! per-class file with a header row.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::distribution::{BinSpec, Distribution};
use crate::stats::{compute_stat_by_name, ClassNameStats, StatsName};
use crate::tracking::TrackingTable;
use crate::{Error, Result};

/// One evaluated metric, paired with its label for the report rows.
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub name: StatsName,
    pub distribution: Distribution,
}

/// The standard evaluation suite: every metric at ten bins.
pub fn default_stats_suite() -> Vec<(StatsName, BinSpec)> {
    StatsName::ALL
        .iter()
        .map(|&name| (name, BinSpec::Count(10)))
        .collect()
}

/// Evaluate a list of metrics and write the histogram and average CSVs.
///
/// Metrics that fail with `InvalidInput` (for example a gap-length run
/// over tracks with no gaps) are logged and skipped; the rest of the
/// suite still completes. `hist_values.csv` and `avg_values.csv` are
/// recreated under `output_dir` on every run.
pub fn run_stats<P: AsRef<Path>>(
    gt_tracking: &[TrackingTable],
    stats_eval: &[(StatsName, BinSpec)],
    output_dir: P,
) -> Result<Vec<StatsReport>> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut reports = Vec::new();
    for (name, bins) in stats_eval {
        match compute_stat_by_name(*name)(gt_tracking, bins) {
            Ok(distribution) => {
                log::debug!("average {}: {}", name, distribution.avg);
                reports.push(StatsReport {
                    name: *name,
                    distribution,
                });
            }
            Err(Error::InvalidInput(msg)) => {
                log::warn!("skipping metric {}: {}", name, msg);
            }
            Err(e) => return Err(e),
        }
    }

    write_hist_values(output_dir.join("hist_values.csv"), &reports)?;
    write_avg_values(output_dir.join("avg_values.csv"), &reports)?;
    Ok(reports)
}

/// Write `Hist <label>` and `Bin edges <label>` rows, three decimals per value.
pub fn write_hist_values<P: AsRef<Path>>(path: P, reports: &[StatsReport]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for report in reports {
        writeln!(
            writer,
            "Hist {},{}",
            report.name,
            join_3dp(&report.distribution.hist)
        )?;
        writeln!(
            writer,
            "Bin edges {},{}",
            report.name,
            join_3dp(&report.distribution.bin_edges)
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one `Avg <label>,<value>` row per report.
pub fn write_avg_values<P: AsRef<Path>>(path: P, reports: &[StatsReport]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for report in reports {
        writeln!(writer, "Avg {},{}", report.name, report.distribution.avg)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the per-class totals with a header row.
pub fn write_class_name_stats<P: AsRef<Path>>(path: P, stats: &ClassNameStats) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "class_name, num_frames, num_objects, num_boxes")?;
    for class_name in stats.class_names() {
        writeln!(
            writer,
            "{}, {}, {}, {}",
            class_name,
            stats.num_frames[class_name],
            stats.num_objects[class_name],
            stats.num_boxes[class_name]
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn join_3dp(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.3}", v))
        .collect::<Vec<_>>()
        .join(",")
}
