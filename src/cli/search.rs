use clap::Args;

use crate::cli::OutputFormat;
use crate::core::sequence::NucleotideSequence;
use crate::matching::algorithm::{Algorithm, MatchResult};
use crate::matching::engine::{assign_roles, ComparisonAggregator, ComparisonResult};

#[derive(Args)]
pub struct MatchArgs {
    /// First sequence (A, C, G, T; case-insensitive)
    #[arg(required = true)]
    pub seq1: String,

    /// Second sequence
    #[arg(required = true)]
    pub seq2: String,

    /// Run a single algorithm instead of the full comparison
    #[arg(short = 'A', long, value_enum)]
    pub algorithm: Option<Algorithm>,
}

pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let seq1 = NucleotideSequence::parse_named("seq1", &args.seq1)?;
    let seq2 = NucleotideSequence::parse_named("seq2", &args.seq2)?;

    if verbose {
        let (source, pattern, text) = assign_roles(&seq1, &seq2);
        eprintln!(
            "Searching for {source:?} ({} bases) in the other sequence ({} bases)",
            pattern.len(),
            text.len()
        );
    }

    if let Some(algorithm) = args.algorithm {
        let (_, pattern, text) = assign_roles(&seq1, &seq2);
        let result = algorithm.find_all(pattern, text);
        match format {
            OutputFormat::Text => print_text_match(algorithm, &result),
            OutputFormat::Json => {
                let output = serde_json::json!({ algorithm_key(algorithm): result });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Tsv => {
                println!("algorithm\ttime_taken\tmatch_percentage\tmatch_count\tcomplexity");
                print_tsv_match(algorithm, &result);
            }
        }
        return Ok(());
    }

    let comparison = ComparisonAggregator::new().compare(&seq1, &seq2);
    match format {
        OutputFormat::Text => print_text_comparison(&comparison),
        OutputFormat::Json => print_json_comparison(&comparison)?,
        OutputFormat::Tsv => print_tsv_comparison(&comparison),
    }

    Ok(())
}

fn algorithm_key(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::Kmp => "kmp",
        Algorithm::RabinKarp => "rabin_karp",
    }
}

fn format_positions(positions: &[usize]) -> String {
    if positions.is_empty() {
        return "none".to_string();
    }
    positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_text_match(algorithm: Algorithm, result: &MatchResult) {
    println!("\n{algorithm} ({}):", result.complexity_label);
    println!("  Matches: {}", format_positions(&result.matched_positions));
    println!("  Match percentage: {:.2}%", result.match_percentage);
    println!("  Time: {:.6} s", result.time_taken);
}

pub(crate) fn print_text_comparison(comparison: &ComparisonResult) {
    println!("Comparison Results");
    println!("{}", "=".repeat(60));
    println!(
        "\nBasic match: {:.2}%",
        comparison.basic_match_percentage
    );
    print_text_match(Algorithm::Kmp, &comparison.kmp);
    print_text_match(Algorithm::RabinKarp, &comparison.rabin_karp);

    if !comparison.algorithms_agree() {
        println!("\nWARNING: algorithms disagree on match positions");
    }
}

fn print_json_comparison(comparison: &ComparisonResult) -> anyhow::Result<()> {
    let output = serde_json::json!({ "comparison": comparison });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_match(algorithm: Algorithm, result: &MatchResult) {
    println!(
        "{}\t{:.6}\t{:.4}\t{}\t{}",
        algorithm_key(algorithm),
        result.time_taken,
        result.match_percentage,
        result.matched_positions.len(),
        result.complexity_label,
    );
}

pub(crate) fn print_tsv_comparison(comparison: &ComparisonResult) {
    println!("algorithm\ttime_taken\tmatch_percentage\tmatch_count\tcomplexity");
    println!(
        "basic\t\t{:.4}\t\t",
        comparison.basic_match_percentage
    );
    print_tsv_match(Algorithm::Kmp, &comparison.kmp);
    print_tsv_match(Algorithm::RabinKarp, &comparison.rabin_karp);
}
