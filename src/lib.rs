//! # redaktor
//!
//! AI-assisted newspaper editing: turns a raw docx article into a
//! proofread article with proposed titles, leads, tags and pull quotes.
//!
//! ## Features
//!
//! - Sentence-boundary-aware chunking under a configurable size limit
//! - Multi-stage generation pipeline (proofread, headings, quotes,
//!   titles, leads, tags) over an injected generation client
//! - Fixed Polish prompt templates with explicit output constraints
//! - Styled docx output with atomic file writes
//!
//! ## Quick Start
//!
//! ```no_run
//! use redaktor::{Config, OpenAiClient};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .api_key(std::env::var("OPENAI_API_KEY")?)
//!     .include_headings(true)
//!     .build()?;
//!
//! let client = OpenAiClient::from_config(&config)?;
//! let bytes = redaktor::run_file(&config, &client, Path::new("artykul.docx"))?;
//! redaktor::write_output(Path::new("artykul_zredagowany.docx"), &bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Reader**: extracts paragraph text from the source docx
//! 2. **Chunker**: splits the text at sentence boundaries
//! 3. **Editor**: drives the per-chunk and whole-document generation calls
//! 4. **Writer**: renders the accumulated result into a styled docx

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod chunker;
mod client;
mod config;
mod error;
mod pipeline;
mod prompt;
mod reader;
mod writer;

pub use chunker::chunk;
pub use client::{Generator, MockGenerator, OpenAiClient};
pub use config::{Config, ConfigBuilder, DEFAULT_TAG_VOCABULARY};
pub use error::{Error, Result};
pub use pipeline::{
    Editor, EditorialResult, LogListener, NoopListener, ProgressListener, ProgressStage,
};
pub use prompt::{PromptEngine, SYSTEM_MESSAGE};
pub use reader::read_docx;
pub use writer::{render, write_file as write_output};

use std::path::Path;

/// Runs the full editorial pipeline over already-extracted text.
///
/// Chunks the text, drives the generation sequence, and renders the
/// result into docx bytes.
///
/// # Errors
///
/// Returns an error if:
/// - Prompt template registration fails
/// - Any generation call fails (the run is all-or-nothing)
/// - The output document cannot be serialized
pub fn run(config: &Config, generator: &dyn Generator, text: &str) -> Result<Vec<u8>> {
    let chunks = chunker::chunk(text, config.chunk_size);
    let result = Editor::new(config, generator)?.run(&chunks)?;
    writer::render(&result)
}

/// Runs the full editorial pipeline over a docx file.
///
/// # Errors
///
/// Returns an error if ingestion fails, plus everything [`run`] can
/// return.
pub fn run_file(config: &Config, generator: &dyn Generator, path: &Path) -> Result<Vec<u8>> {
    let text = reader::read_docx(path)?;
    run(config, generator, &text)
}
