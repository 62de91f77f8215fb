//! Shape types for slide mutation.
//!
//! A shape is one top-level `spTree` child, held as its original bytes plus
//! the handful of parsed facts the resolver and mutators need (kind, name,
//! geometry). Edits are byte splices over the original node, so everything
//! an edit does not touch is preserved exactly.

pub mod picture;
pub mod shape;
pub mod table;
pub mod textframe;

pub use shape::{Geometry, Shape, ShapeKind};
pub use table::Table;
pub use textframe::TextBody;
