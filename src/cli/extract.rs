use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::{CallingArgs, OutputFormat};
use crate::core::types::Nucleotide;
use crate::pipeline::extraction::{Extraction, ExtractionPipeline};

#[derive(Args)]
pub struct ExtractArgs {
    /// Chromatogram image (PNG, JPEG, BMP or GIF)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Write the rendered chromatogram to this PNG file
    #[arg(long)]
    pub png_out: Option<PathBuf>,

    #[command(flatten)]
    pub calling: CallingArgs,
}

pub fn run(args: ExtractArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let pipeline = ExtractionPipeline::new(args.calling.to_config());
    let extraction = extract_file(&pipeline, &args.image)?;

    if verbose {
        eprintln!(
            "Decoded {} samples from {}",
            extraction.samples,
            args.image.display()
        );
    }

    if let Some(path) = &args.png_out {
        std::fs::write(path, &extraction.chromatogram_png)
            .with_context(|| format!("Failed to write chromatogram to {}", path.display()))?;
        if verbose {
            eprintln!("Wrote chromatogram to {}", path.display());
        }
    }

    match format {
        OutputFormat::Text => print_text_extraction(&extraction),
        OutputFormat::Json => print_json_extraction(&extraction, args.png_out.as_deref())?,
        OutputFormat::Tsv => {
            print_tsv_header();
            print_tsv_row(&extraction);
        }
    }

    Ok(())
}

/// Read an image from disk and run it through the pipeline
///
/// # Errors
///
/// Returns an error if the file cannot be read or extraction fails.
pub fn extract_file(pipeline: &ExtractionPipeline, path: &Path) -> anyhow::Result<Extraction> {
    let bytes = read_image(path)?;
    Ok(pipeline.extract(&display_name(path), &bytes)?)
}

pub(crate) fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))
}

/// File name used to label an image in output and errors
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

pub(crate) fn print_text_extraction(extraction: &Extraction) {
    println!("Image: {}", extraction.filename);
    println!("  Samples: {}", extraction.samples);
    println!("  Bases called: {}", extraction.sequence.len());
    println!(
        "  Counts: {}",
        Nucleotide::PRIORITY
            .iter()
            .map(|&base| format!("{base}={}", extraction.counts.get(base)))
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!("  Sequence: {}", extraction.sequence);
    println!("  Intensity sequence: {}", extraction.intensity_sequence);
}

fn print_json_extraction(extraction: &Extraction, png_out: Option<&Path>) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "filename": extraction.filename,
        "samples": extraction.samples,
        "dna_sequence": extraction.sequence,
        "intensity_sequence": extraction.intensity_sequence,
        "nucleotide_counts": extraction.counts,
        "chromatogram_path": png_out.map(|p| p.display().to_string()),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) fn print_tsv_header() {
    println!("filename\tsamples\tlength\tA\tT\tC\tG\tsequence");
}

pub(crate) fn print_tsv_row(extraction: &Extraction) {
    let counts = &extraction.counts;
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        extraction.filename,
        extraction.samples,
        extraction.sequence.len(),
        counts.a,
        counts.t,
        counts.c,
        counts.g,
        extraction.sequence,
    );
}
