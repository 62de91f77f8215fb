//! Slideforge - a template-driven mutation engine for OOXML slide decks
//!
//! This library edits `.pptx` packages by merging typed content descriptors
//! into a pre-built template. A descriptor names a slide and the content it
//! should receive (a bullet list, a table, a statistics panel, ...); the
//! engine resolves each content slot to a concrete shape by name heuristics
//! and overwrites only those shapes. Everything the descriptors do not
//! address keeps its original bytes.
//!
//! # Features
//!
//! - **Slot resolution**: exact / substring / indexed name matching against
//!   author-assigned shape names, evaluated in slide order
//! - **Ten slide kinds**: points, image_text, table, phases, statistics,
//!   people, cover, contact, images, graph
//! - **Batch orchestration**: one parse and one serialize for a multi-slide
//!   request, with per-item failure isolation
//! - **Byte-level fidelity**: untouched slides and shapes round-trip
//!   byte-identically through open → save
//!
//! # Example - Applying a batch of slide mutations
//!
//! ```no_run
//! use slideforge::{BatchOrchestrator, SlideContent};
//! use slideforge::fetch::HttpImageFetcher;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = std::fs::read("template.pptx")?;
//!
//! let items: Vec<SlideContent> = serde_json::from_str(
//!     r#"[{"kind": "points", "slideNumber": 1, "header": "Overview",
//!          "description": "Key points", "points": [{"text": "A"}, {"text": "B"}]}]"#,
//! )?;
//!
//! let engine = BatchOrchestrator::new(Box::new(HttpImageFetcher::new()?));
//! let outcome = engine.run(&template, &items)?;
//!
//! for item in &outcome.results {
//!     println!("item {} ({}): ok = {}", item.index, item.kind, item.is_ok());
//! }
//! std::fs::write("output.pptx", &outcome.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Single mutation against an open document
//!
//! ```no_run
//! use slideforge::{Document, SlideContent};
//! use slideforge::fetch::{FetchError, ImageFetcher};
//!
//! struct NoFetch;
//! impl ImageFetcher for NoFetch {
//!     fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
//!         Err(FetchError::Transport(format!("offline: {url}")))
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = std::fs::read("template.pptx")?;
//! let mut doc = Document::open(&template)?;
//!
//! let item: SlideContent = serde_json::from_str(
//!     r#"{"kind": "table", "slideNumber": 2, "title": "Q3",
//!         "tableData": [["Region", "Revenue"], ["EMEA", "1.2M"]]}"#,
//! )?;
//! slideforge::mutate::apply_content(&mut doc, &item, &NoFetch)?;
//!
//! std::fs::write("output.pptx", doc.save()?)?;
//! # Ok(())
//! # }
//! ```

/// Batch orchestration: open once, apply an ordered item list, serialize once.
pub mod batch;

/// Hex color parsing with a safe black fallback.
pub mod color;

/// Shared low-level helpers (XML text escaping and element span scanning).
pub mod common;

/// The content descriptor model: one tagged variant per slide kind.
pub mod content;

/// Image download with a bounded timeout.
pub mod fetch;

/// The ten kind-specific mutation strategies and their shared primitives.
pub mod mutate;

/// Open Packaging Convention (OPC) package layer.
///
/// Reads and writes the ZIP-based physical package: parts, relationships,
/// and `[Content_Types].xml` bookkeeping.
pub mod opc;

/// PresentationML document layer: documents, slides, and shapes.
pub mod pptx;

/// Slot resolution: heuristic shape lookup by name rules.
pub mod resolve;

/// Template/output storage adapter over an external blob store.
pub mod store;

// Re-export the main entry points for convenience
pub use batch::{BatchOrchestrator, BatchOutcome, ItemResult};
pub use color::Rgb;
pub use content::{SlideContent, SlideKind};
pub use mutate::MutationError;
pub use pptx::document::Document;
