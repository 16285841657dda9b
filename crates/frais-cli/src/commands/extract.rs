//! Extract command - process expense PDFs and export the records.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

use frais_core::export::{write_csv, write_json, write_xlsx, ExportFormat};
use frais_core::models::config::{AmountScope, FraisConfig};
use frais_core::models::expense::{AgentRecord, DocumentResult};
use frais_core::{ExpensePipeline, ExpenseTable};

use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF files, directories or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from the output extension, else text)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,

    /// Look for amounts on every page of an agent, not just the first
    #[arg(long)]
    all_pages: bool,

    /// Also write a per-file summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Excel workbook (requires --output)
    Xlsx,
    /// CSV table
    Csv,
    /// JSON report
    Json,
    /// Plain text table
    Text,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xlsx => ExportFormat::Xlsx,
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Text => ExportFormat::Text,
        }
    }
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    document: Option<DocumentResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.all_pages {
        config.extraction.amount_scope = AmountScope::AllPages;
    }

    let format: ExportFormat = match (args.format, &args.output) {
        (Some(format), _) => format.into(),
        (None, Some(path)) => ExportFormat::from_path(path),
        (None, None) => ExportFormat::Text,
    };
    if format == ExportFormat::Xlsx && args.output.is_none() {
        anyhow::bail!("XLSX output requires --output <file.xlsx>");
    }

    let files = collect_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No PDF files found for: {}", args.inputs.join(", "));
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let results = process_files(files, config.clone(), args.jobs, args.fail_fast, &pb).await?;
    pb.finish_and_clear();

    let successful: Vec<&DocumentResult> =
        results.iter().filter_map(|r| r.document.as_ref()).collect();
    let failed: Vec<&ProcessResult> = results.iter().filter(|r| r.error.is_some()).collect();

    let records: Vec<AgentRecord> = successful
        .iter()
        .flat_map(|doc| doc.records.iter().cloned())
        .collect();

    for record in &records {
        for warning in &record.warnings {
            warn!(
                "{} ({}): {}",
                record.source.as_deref().unwrap_or("?"),
                record.pages_label(),
                warning
            );
        }
    }

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if records.is_empty() {
        print_failures(&failed);
        anyhow::bail!("No records extracted, nothing to export");
    }

    let documents: Vec<DocumentResult> = successful.into_iter().cloned().collect();
    write_output(&records, &documents, format, args.output.as_deref(), &config)?;

    if let Some(output_path) = &args.output {
        eprintln!(
            "{} {} records written to {}",
            style("✓").green(),
            records.len(),
            output_path.display()
        );
    }

    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(documents.len()).green(),
        style(failed.len()).red()
    );
    print_failures(&failed);

    Ok(())
}

/// Expand files, directories and glob patterns into a list of PDF paths.
///
/// Order follows the arguments; directories are listed by file name.
fn collect_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        let mut found = if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_pdf(p))
                .collect();
            entries.sort();
            entries
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            glob(input)?
                .filter_map(|r| r.ok())
                .filter(|p| p.is_file() && is_pdf(p))
                .collect()
        };

        if found.is_empty() {
            warn!("No PDF files matched {}", input);
        }

        found.retain(|p| seen.insert(p.clone()));
        files.extend(found);
    }

    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Run the pipeline over every file with up to `jobs` files in flight.
///
/// Results come back in input order.
async fn process_files(
    files: Vec<PathBuf>,
    config: FraisConfig,
    jobs: usize,
    fail_fast: bool,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<ProcessResult>> {
    let pipeline = Arc::new(ExpensePipeline::new(config));

    let mut pending = stream::iter(files.into_iter().map(|path| {
        let pipeline = Arc::clone(&pipeline);
        let pb = pb.clone();
        async move {
            let file_start = Instant::now();
            let task_path = path.clone();
            let outcome =
                tokio::task::spawn_blocking(move || pipeline.process_file(&task_path)).await;
            pb.inc(1);

            let (document, error) = match outcome {
                Ok(Ok(document)) => (Some(document), None),
                Ok(Err(e)) => (None, Some(e.to_string())),
                Err(e) => (None, Some(format!("worker failed: {}", e))),
            };

            ProcessResult {
                path,
                document,
                error,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        }
    }))
    .buffered(jobs.max(1));

    let mut results = Vec::new();
    while let Some(result) = pending.next().await {
        match (&result.document, &result.error) {
            (Some(document), _) => info!(
                "{}: {} records, form {}",
                result.path.display(),
                document.records.len(),
                document.form_type
            ),
            (None, Some(message)) if fail_fast => {
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
            (None, message) => warn!(
                "Failed to process {}: {}",
                result.path.display(),
                message.as_deref().unwrap_or("unknown error")
            ),
        }
        results.push(result);
    }

    Ok(results)
}

fn write_output(
    records: &[AgentRecord],
    documents: &[DocumentResult],
    format: ExportFormat,
    output: Option<&Path>,
    config: &FraisConfig,
) -> anyhow::Result<()> {
    let table = ExpenseTable::from_records(records)?;

    if format == ExportFormat::Xlsx {
        let path = output.ok_or_else(|| anyhow::anyhow!("XLSX output requires --output"))?;
        write_xlsx(&table, path, &config.export)?;
        return Ok(());
    }

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        ExportFormat::Csv => {
            let delimiter = config.export.delimiter_byte()?;
            write_csv(&table, &mut writer, delimiter)?;
        }
        ExportFormat::Json => {
            write_json(documents, &mut writer)?;
            writeln!(writer)?;
        }
        ExportFormat::Text | ExportFormat::Xlsx => write!(writer, "{}", table.to_text())?,
    }

    writer.flush()?;
    debug!("Exported {} records as {:?}", records.len(), format);
    Ok(())
}

fn print_failures(failed: &[&ProcessResult]) {
    if failed.is_empty() {
        return;
    }

    eprintln!();
    eprintln!("{}", style("Failed files:").red());
    for result in failed {
        eprintln!(
            "  - {}: {}",
            result.path.display(),
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "form_type",
        "pdf_type",
        "pages",
        "records",
        "total",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(document) = &result.document {
            wtr.write_record([
                filename,
                "success",
                document.form_type.as_str(),
                &format!("{:?}", document.pdf_type).to_lowercase(),
                &document.page_count.to_string(),
                &document.records.len().to_string(),
                &document.total_label(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
