//! End-to-end Pipeline Tests
//!
//! Image bytes through extraction and comparison, plus cross-validation of
//! the two search algorithms on generated sequences.

mod common;

use chroma_compare::calling::base_caller::CallingStrategy;
use chroma_compare::decoding::decoder::{DecoderConfig, LaneRow};
use chroma_compare::matching::kmp::Kmp;
use chroma_compare::matching::rabin_karp::RabinKarp;
use chroma_compare::pipeline::extraction::PipelineConfig;
use chroma_compare::workflow::machine::{ImageUpload, Stage, Workflow};
use chroma_compare::{
    ComparisonAggregator, ExtractionError, ExtractionPipeline, MatchAlgorithm, NucleotideSequence,
};
use common::{BLACK, BLUE, GREEN, OLIVE, RED};

#[test]
fn test_extraction_is_idempotent() {
    let png = common::png_row(&[RED, GREEN, OLIVE, BLUE, RED, RED, BLUE, GREEN]);
    let pipeline = ExtractionPipeline::default();

    let first = pipeline.extract("run.png", &png).unwrap();
    let second = pipeline.extract("run.png", &png).unwrap();

    assert_eq!(first.sequence, second.sequence);
    assert_eq!(first.counts, second.counts);
    assert_eq!(first.chromatogram_png, second.chromatogram_png);
    assert_eq!(first.sequence.to_string(), "ATGCAACT");
    assert_eq!(first.counts.total(), first.sequence.len());
}

#[test]
fn test_black_columns_are_skipped() {
    let png = common::png_row(&[RED, BLACK, BLUE, BLACK, GREEN, OLIVE]);
    let extraction = ExtractionPipeline::default().extract("gappy.png", &png).unwrap();
    assert_eq!(extraction.samples, 6);
    assert_eq!(extraction.sequence.to_string(), "ACTG");
}

#[test]
fn test_stride_and_lane_row_are_honoured() {
    let png = common::png_row(&[RED, GREEN, BLUE, GREEN]);
    let pipeline = ExtractionPipeline::new(PipelineConfig {
        decoder: DecoderConfig {
            lane_row: LaneRow::Index(0),
            stride: 2,
        },
        strategy: CallingStrategy::EverySample,
        ..PipelineConfig::default()
    });
    let extraction = pipeline.extract("strided.png", &png).unwrap();
    assert_eq!(extraction.samples, 2);
    assert_eq!(extraction.sequence.to_string(), "AC");

    let out_of_bounds = ExtractionPipeline::new(PipelineConfig {
        decoder: DecoderConfig {
            lane_row: LaneRow::Index(5),
            stride: 1,
        },
        strategy: CallingStrategy::EverySample,
        ..PipelineConfig::default()
    });
    assert!(matches!(
        out_of_bounds.extract("short.png", &png),
        Err(ExtractionError::Decode { .. })
    ));
}

#[test]
fn test_images_to_comparison() {
    let long = common::png_row(&[RED, BLUE, RED, BLUE, RED, BLUE]);
    let short = common::png_row(&[RED, BLUE]);
    let pipeline = ExtractionPipeline::default();

    let (a, b) = pipeline
        .extract_pair(("long.png", &long), ("short.png", &short))
        .unwrap();
    let result = ComparisonAggregator::new().compare(&a.sequence, &b.sequence);

    assert_eq!(a.sequence.to_string(), "ACACAC");
    assert_eq!(result.kmp.matched_positions, vec![0, 2, 4]);
    assert!(result.algorithms_agree());
    assert!((result.basic_match_percentage - 100.0).abs() < 1e-9);
    assert!((result.kmp.match_percentage - 100.0).abs() < 1e-9);
}

#[test]
fn test_workflow_end_to_end() {
    let png1 = common::atgc_png();
    let png2 = common::png_row(&[BLUE]);
    let mut workflow = Workflow::new();

    workflow
        .extract(
            &ExtractionPipeline::default(),
            ImageUpload::new("run1.png", &png1),
            ImageUpload::new("run2.png", &png2),
        )
        .unwrap();
    let comparison = workflow.compare(&ComparisonAggregator::new()).unwrap();
    assert_eq!(comparison.kmp.matched_positions, vec![3]);
    assert_eq!(workflow.stage(), Stage::Compared);

    let report = workflow.report().unwrap();
    assert_eq!(report.sequence1.to_string(), "ATGC");
    assert_eq!(report.sequence2.to_string(), "C");
    assert!((report.kmp_match_percentage - 25.0).abs() < 1e-9);
}

#[test]
fn test_kmp_and_rabin_karp_agree_on_generated_inputs() {
    let aggregator = ComparisonAggregator::new();
    let tiny_modulus = RabinKarp::with_params(256, 3);

    for seed in 0..200u64 {
        // Small alphabets force many overlapping occurrences
        let alphabet: &[u8] = if seed % 2 == 0 { b"AC" } else { b"ACGT" };
        let text_len = 20 + usize::try_from(seed % 60).unwrap();
        let pattern_len = 1 + usize::try_from(seed % 6).unwrap();

        let text: NucleotideSequence = common::lcg_sequence(seed, text_len, alphabet).parse().unwrap();
        let pattern: NucleotideSequence = common::lcg_sequence(seed ^ 0xDEAD_BEEF, pattern_len, alphabet)
            .parse()
            .unwrap();

        let result = aggregator.compare(&text, &pattern);
        assert!(result.algorithms_agree(), "seed {seed}");

        let expected: Vec<usize> = text
            .as_slice()
            .windows(pattern.len())
            .enumerate()
            .filter(|(_, window)| *window == pattern.as_slice())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(result.kmp.matched_positions, expected, "seed {seed}");

        let colliding = tiny_modulus.search(pattern.as_slice(), text.as_slice());
        assert_eq!(colliding, Kmp.search(pattern.as_slice(), text.as_slice()), "seed {seed}");

        assert!((0.0..=100.0).contains(&result.kmp.match_percentage));
        assert!((0.0..=100.0).contains(&result.basic_match_percentage));
    }
}

#[test]
fn test_comparison_is_reproducible_apart_from_timing() {
    let seq1: NucleotideSequence = common::lcg_sequence(7, 500, b"ACGT").parse().unwrap();
    let seq2: NucleotideSequence = common::lcg_sequence(7, 500, b"ACGT")[100..110].parse().unwrap();
    let aggregator = ComparisonAggregator::new();

    let first = aggregator.compare(&seq1, &seq2);
    let second = aggregator.compare(&seq1, &seq2);
    assert_eq!(first.kmp.matched_positions, second.kmp.matched_positions);
    assert_eq!(first.rabin_karp.matched_positions, second.rabin_karp.matched_positions);
    assert!(first.kmp.matched_positions.contains(&100));
    assert_eq!(
        first.basic_match_percentage.to_bits(),
        second.basic_match_percentage.to_bits()
    );
}
