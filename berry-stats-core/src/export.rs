use crate::stats::StatisticsReport;
use berry_stats_common::{BerryStatsError, Result};
use std::path::Path;

pub fn print_summary(report: &StatisticsReport) {
    println!("{:<16} {}", "Berries:", report.berry_names.len());
    for (attr, s) in &report.attributes {
        println!();
        println!("{attr}");
        println!("  {:<14} {}", "min:", s.min);
        println!("  {:<14} {}", "max:", s.max);
        println!("  {:<14} {:.3}", "mean:", s.mean);
        println!("  {:<14} {}", "median:", s.median);
        println!("  {:<14} {:.3}", "variance:", s.variance);
        for b in &s.histogram {
            println!("  [{:>7.2}, {:>7.2}] {:>4} {}", b.range_start, b.range_end, b.count, "#".repeat(b.count as usize));
        }
    }
}

/// writes the flat statistics document as pretty JSON
pub fn export_json(output_path: &Path, report: &StatisticsReport) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, &report.to_document())
        .map_err(|e| BerryStatsError::Io(e.into()))?;
    Ok(())
}
