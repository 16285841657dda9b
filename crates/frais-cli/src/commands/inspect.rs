//! Inspect command - preview how one PDF is classified and grouped.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use frais_core::expense::page_key;
use frais_core::expense::rules::{extract_amounts, extract_first_name};
use frais_core::{ExpensePipeline, FormType, PdfType};

use super::config::load_config;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Print the extracted text of each page
    #[arg(long)]
    text: bool,

    /// Print the inspection as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Inspection {
    file: String,
    page_count: u32,
    pdf_type: PdfType,
    form_type: FormType,
    markers_found: bool,
    pages: Vec<PageInspection>,
}

#[derive(Serialize)]
struct PageInspection {
    number: u32,
    agent: String,
    first_name: String,
    amounts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let config = load_config(config_path)?;
    let pipeline = ExpensePipeline::new(config);

    info!("Inspecting file: {}", args.input.display());
    let data = fs::read(&args.input)?;
    let content = pipeline.load_content(&data)?;

    let page_count = content.pages.len() as u32;
    let first_page = content.first_page_text();
    let default_agent = pipeline.parser().default_agent();

    let inspection = Inspection {
        file: args.input.display().to_string(),
        page_count,
        pdf_type: content.pdf_type,
        form_type: pipeline.classifier().classify(page_count, first_page),
        markers_found: pipeline.classifier().has_markers(first_page),
        pages: content
            .pages
            .iter()
            .map(|page| PageInspection {
                number: page.number,
                agent: page_key(&page.text, default_agent),
                first_name: extract_first_name(&page.text).unwrap_or_default(),
                amounts: extract_amounts(&page.text)
                    .into_iter()
                    .map(|a| a.raw)
                    .collect(),
                text: args.text.then(|| page.text.clone()),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        print_inspection(&inspection);
    }

    Ok(())
}

fn print_inspection(inspection: &Inspection) {
    println!("{}", style(&inspection.file).bold());
    println!("  Pages:     {}", inspection.page_count);
    println!("  PDF type:  {:?}", inspection.pdf_type);
    println!(
        "  Form type: {} (markers {})",
        inspection.form_type,
        if inspection.markers_found {
            style("found").green()
        } else {
            style("missing").yellow()
        }
    );
    println!();

    for page in &inspection.pages {
        let amounts = if page.amounts.is_empty() {
            style("no amount".to_string()).dim()
        } else {
            style(page.amounts.join(" + ")).cyan()
        };
        println!(
            "  Page {:>3}  {} {}  {}",
            page.number,
            style(&page.agent).bold(),
            page.first_name,
            amounts
        );

        if let Some(text) = &page.text {
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                println!("            {}", style(line.trim_end()).dim());
            }
        }
    }
}
