mod logging;

use berry_stats_common::{BerryAttribute, Config};
use berry_stats_core::{
    export_json, print_summary, ArtifactLocation, BerryStats, HistogramRenderer, RenderOutcome,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn parse_attribute(s: &str) -> Result<BerryAttribute, String> {
    s.parse::<BerryAttribute>().map_err(|e| e.to_string())
}

/// reject 0 at CLI parse time
fn parse_bins(s: &str) -> Result<usize, String> {
    let v: usize = s.parse().map_err(|_| format!("not a whole number: {s}"))?;
    if v > 0 {
        Ok(v)
    } else {
        Err("bins must be at least 1".into())
    }
}

#[derive(Parser)]
#[command(name = "berry-stats", version, about = "Berry catalog statistics and histograms")]
struct Cli {
    /// tracing filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// fetch the catalog and print its statistics document
    Stats {
        #[arg(long = "attribute", value_parser = parse_attribute)]
        attributes: Vec<BerryAttribute>,
        #[arg(long, value_parser = parse_bins)]
        bins: Option<usize>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        summary: bool,
    },
    /// render the histogram image unless it already exists
    Histogram {
        #[arg(long, value_parser = parse_attribute)]
        attribute: Option<BerryAttribute>,
        #[arg(long, value_parser = parse_bins)]
        bins: Option<usize>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log_level);
    let mut config = Config::load()?;
    match cli.command {
        Commands::Stats { attributes, bins, output, summary } => {
            if !attributes.is_empty() {
                config.stats.attributes = attributes;
            }
            if let Some(b) = bins {
                config.stats.histogram_bins = b;
            }
            run_stats(&config, output, summary)?
        }
        Commands::Histogram { attribute, bins, output } => {
            if let Some(a) = attribute {
                config.histogram.attribute = a;
            }
            if let Some(b) = bins {
                config.stats.histogram_bins = b;
            }
            if let Some(o) = output {
                config.histogram.output_path = o;
            }
            run_histogram(&config)?
        }
    }
    Ok(())
}

fn run_stats(config: &Config, output: Option<PathBuf>, summary: bool) -> anyhow::Result<()> {
    config.validate()?;
    let report = BerryStats::from_config(config)?.statistics()?;
    if summary {
        print_summary(&report);
    }
    match output {
        Some(path) => {
            export_json(&path, &report)?;
            println!("Exported to {}", path.display());
        }
        None if !summary => println!("{}", serde_json::to_string_pretty(&report.to_document())?),
        None => {}
    }
    Ok(())
}

fn run_histogram(config: &Config) -> anyhow::Result<()> {
    config.validate()?;
    let location = ArtifactLocation::new(&config.histogram.output_path);
    let renderer = HistogramRenderer::from_config(&config.histogram);
    let stats = BerryStats::from_config(config)?;
    match stats.histogram(config.histogram.attribute, &renderer, &location)? {
        RenderOutcome::Rendered => {
            println!("Histogram written to {}", location.path().display())
        }
        RenderOutcome::AlreadyPresent => {
            println!("Histogram already present at {}", location.path().display())
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_must_be_positive_integers() {
        assert_eq!(parse_bins("12"), Ok(12));
        assert!(parse_bins("0").is_err());
        assert!(parse_bins("-3").is_err());
        assert!(parse_bins("ten").is_err());
    }

    #[test]
    fn attribute_flag_uses_snake_case_names() {
        assert_eq!(parse_attribute("soil_dryness"), Ok(BerryAttribute::SoilDryness));
        assert!(parse_attribute("firmness").is_err());
    }

    #[test]
    fn histogram_flags_parse() {
        let cli = Cli::try_parse_from([
            "berry-stats", "histogram", "--attribute", "size", "--bins", "4", "--output", "out/h.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Histogram { attribute, bins, output } => {
                assert_eq!(attribute, Some(BerryAttribute::Size));
                assert_eq!(bins, Some(4));
                assert_eq!(output, Some(PathBuf::from("out/h.png")));
            }
            Commands::Stats { .. } => panic!("expected histogram subcommand"),
        }
    }
}
