//! Helpers shared by the integration tests.

#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const RED: [u8; 3] = [255, 0, 0];
pub const GREEN: [u8; 3] = [0, 255, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];
/// Red and green together; scaled yellow dominates so this calls G
pub const OLIVE: [u8; 3] = [200, 200, 0];
pub const BLACK: [u8; 3] = [0, 0, 0];

/// Encode a single-row PNG with one pixel per color
pub fn png_row(colors: &[[u8; 3]]) -> Vec<u8> {
    let width = u32::try_from(colors.len()).expect("row too wide");
    let mut image = RgbImage::new(width, 1);
    for (x, color) in colors.iter().enumerate() {
        image.put_pixel(u32::try_from(x).expect("row too wide"), 0, Rgb(*color));
    }
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding failed");
    bytes
}

/// A row of red, green, olive and blue pixels, which calls "ATGC"
pub fn atgc_png() -> Vec<u8> {
    png_row(&[RED, GREEN, OLIVE, BLUE])
}

pub const BOUNDARY: &str = "chroma-compare-test-boundary";

/// One part of a multipart/form-data body
pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        bytes: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

/// Build a multipart/form-data body delimited by [`BOUNDARY`]
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                filename,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Deterministic pseudo-random sequence over ACGT (64-bit LCG)
pub fn lcg_sequence(seed: u64, len: usize, alphabet: &[u8]) -> String {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let index = usize::try_from(state >> 33).expect("fits") % alphabet.len();
            char::from(alphabet[index])
        })
        .collect()
}
