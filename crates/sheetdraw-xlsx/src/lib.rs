//! Streamed XML transforms for worksheet drawing parts.
//!
//! Converts between [`sheetdraw_model::Drawing`] and the
//! `xl/drawings/drawingN.xml` fragment of an XLSX package, in both
//! directions, without building an intermediate document tree:
//!
//! - [`xform`]: the transform contract and the drawing transform tree
//!   (container + anchor variants + their sub-elements).
//! - [`DrawingPart`]: a drawing XML part paired with its `.rels`, parsed
//!   from / written into an OPC part map.
//!
//! The zip container, workbook wiring, and media payloads belong to the
//! caller; this crate only deals in part bytes and relationship targets.

mod error;
mod part;
pub mod path;
pub mod relationships;
pub mod xform;

pub use error::DrawingXmlError;
pub use part::{parse_drawing_xml, write_drawing_xml, DrawingPart};
pub use relationships::{Relationship, Relationships};
