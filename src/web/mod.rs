//! HTTP API for chromatogram extraction and comparison.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! chroma-compare serve
//!
//! # Custom port and auto-open browser
//! chroma-compare serve --port 3000 --open
//!
//! # Bind to all interfaces, calling bases at peaks only
//! chroma-compare serve --address 0.0.0.0 --peaks
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Service name, version and endpoints
//! - `GET /health` - Liveness check
//! - `POST /dna/process-image` - Extract one image (multipart `file`)
//! - `POST /dna/compare` - Extract two images (multipart `file1`, `file2`)
//! - `POST /dna/compare/algorithms` - Compare two sequences (multipart
//!   `seq1`, `seq2`, `image1_name`, `image2_name`)
//!
//! Errors are JSON `{error, error_type, details}` with `details` always null.

pub mod server;
pub mod session;
