//! Open Packaging Convention (OPC) package handling.
//!
//! A `.pptx` file is an OPC package: a ZIP archive of parts plus
//! relationship files and a `[Content_Types].xml` index. This layer reads a
//! package into memory, exposes parts and relationships for the document
//! layer above, and writes the package back out. Parts the engine never
//! touches keep the exact blob bytes they were read with.

pub mod constants;
pub mod content_types;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys;
pub mod rel;

pub use error::{OpcError, Result};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
