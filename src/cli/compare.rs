use std::path::PathBuf;

use clap::Args;

use crate::cli::extract::{
    display_name, print_text_extraction, print_tsv_header, print_tsv_row, read_image,
};
use crate::cli::search::{print_text_comparison, print_tsv_comparison};
use crate::cli::{CallingArgs, OutputFormat};
use crate::matching::engine::ComparisonAggregator;
use crate::pipeline::extraction::ExtractionPipeline;
use crate::workflow::machine::{ImageUpload, Workflow};

#[derive(Args)]
pub struct CompareArgs {
    /// First chromatogram image
    #[arg(required = true)]
    pub image1: PathBuf,

    /// Second chromatogram image
    #[arg(required = true)]
    pub image2: PathBuf,

    #[command(flatten)]
    pub calling: CallingArgs,
}

pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let pipeline = ExtractionPipeline::new(args.calling.to_config());
    let aggregator = ComparisonAggregator::new();

    let name1 = display_name(&args.image1);
    let name2 = display_name(&args.image2);
    let bytes1 = read_image(&args.image1)?;
    let bytes2 = read_image(&args.image2)?;

    let mut workflow = Workflow::new();
    workflow.extract(
        &pipeline,
        ImageUpload::new(&name1, &bytes1),
        ImageUpload::new(&name2, &bytes2),
    )?;

    if verbose {
        if let Some((first, second)) = workflow.extractions() {
            eprintln!(
                "Called {} bases from {} and {} bases from {}",
                first.sequence.len(),
                first.filename,
                second.sequence.len(),
                second.filename
            );
        }
    }

    workflow.compare(&aggregator)?;

    let (Some((first, second)), Some(comparison), Some(report)) =
        (workflow.extractions(), workflow.comparison(), workflow.report())
    else {
        anyhow::bail!("Comparison did not complete");
    };

    match format {
        OutputFormat::Text => {
            print_text_extraction(first);
            print_text_extraction(second);
            println!();
            print_text_comparison(comparison);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "image1": {
                    "filename": first.filename,
                    "dna_sequence": first.sequence,
                    "nucleotide_counts": first.counts,
                },
                "image2": {
                    "filename": second.filename,
                    "dna_sequence": second.sequence,
                    "nucleotide_counts": second.counts,
                },
                "comparison": comparison,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            print_tsv_header();
            print_tsv_row(first);
            print_tsv_row(second);
            println!();
            print_tsv_comparison(comparison);
        }
    }

    Ok(())
}
