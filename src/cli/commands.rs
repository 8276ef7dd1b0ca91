use crate::analyzers::{
    daily_means, diff_series_with_basis, measurement_means, pollutant_means, temperature_pivot,
    DashboardSummary,
};
use crate::cli::args::{Cli, Commands, OutputFormat};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::models::Dataset;
use crate::readers::Source;
use crate::utils::progress::ProgressReporter;
use crate::writers::DatasetWriter;
use serde::Serialize;
use std::io::Write;
use tracing::info;

#[derive(Serialize)]
struct DatasetInfo<'a> {
    source: String,
    rows: usize,
    first: Option<chrono::NaiveDateTime>,
    last: Option<chrono::NaiveDateTime>,
    columns: Vec<ColumnMapping<'a>>,
}

#[derive(Serialize)]
struct ColumnMapping<'a> {
    original: &'a str,
    canonical: &'static str,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = DashboardConfig::load(cli.config.as_deref())?;

    let source = cli
        .source
        .as_deref()
        .map(Source::parse)
        .or_else(|| config.source())
        .ok_or_else(|| {
            DashboardError::InvalidArgument(
                "no spreadsheet given: pass --source or set `source` in the config".to_string(),
            )
        })?;

    let format = cli.format;
    let dataset = load_dataset(&config, &source, format)?;

    match cli.command {
        Commands::Info => {
            let span = dataset.timestamp_span();
            let info = DatasetInfo {
                source: source.to_string(),
                rows: dataset.len(),
                first: span.map(|(first, _)| first),
                last: span.map(|(_, last)| last),
                columns: dataset
                    .header_mapping()
                    .map(|(original, canonical)| ColumnMapping {
                        original,
                        canonical,
                    })
                    .collect(),
            };
            emit(format, &info, dataset_info_text)?;
        }

        Commands::Raw { limit } => {
            let rows = if limit == 0 {
                dataset.readings()
            } else {
                &dataset.readings()[..limit.min(dataset.len())]
            };
            let stdout = std::io::stdout();
            match format {
                OutputFormat::Text => DatasetWriter::new().write_rows(rows, stdout.lock())?,
                OutputFormat::Json => {
                    let mut out = stdout.lock();
                    serde_json::to_writer_pretty(&mut out, rows)?;
                    writeln!(out)?;
                }
            }
        }

        Commands::Kpis => emit(format, &measurement_means(&dataset), |m| m.summary())?,

        Commands::Pollutants => emit(format, &pollutant_means(&dataset), |m| m.summary())?,

        Commands::Daily => emit(format, &daily_means(&dataset), |d| d.summary())?,

        Commands::Pivot { rows } => {
            emit(format, &temperature_pivot(&dataset, rows), |p| p.summary())?
        }

        Commands::Diff { start, end, basis } => {
            let basis = match basis {
                Some(b) => b,
                None => config.diff_basis()?,
            };
            let series = diff_series_with_basis(&dataset, start, end, basis)?;
            emit(format, &series, |s| s.summary())?;
        }

        Commands::Summary => {
            emit(format, &DashboardSummary::compute(&dataset), |s| s.summary())?
        }
    }

    Ok(())
}

fn load_dataset(
    config: &DashboardConfig,
    source: &Source,
    format: OutputFormat,
) -> Result<Dataset> {
    let progress = ProgressReporter::new_spinner(
        &format!("Loading {}...", source),
        format == OutputFormat::Json,
    );

    match config.reader().load(source) {
        Ok(dataset) => {
            progress.finish_with_message(&format!("Loaded {} readings", dataset.len()));
            info!(%source, rows = dataset.len(), "source ready");
            Ok(dataset)
        }
        Err(e) => {
            progress.clear();
            Err(e.into())
        }
    }
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", text(value)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn dataset_info_text(info: &DatasetInfo<'_>) -> String {
    let mut text = format!("Source: {}\nReadings: {}\n", info.source, info.rows);
    match (info.first, info.last) {
        (Some(first), Some(last)) => {
            text.push_str(&format!("Date Range: {} to {}\n", first, last))
        }
        _ => text.push_str("Date Range: no readings\n"),
    }

    text.push_str("\nColumn Mapping:\n");
    for (i, column) in info.columns.iter().enumerate() {
        text.push_str(&format!(
            "  {:>2}. {:<28} -> {}\n",
            i + 1,
            column.original,
            column.canonical
        ));
    }
    text
}
