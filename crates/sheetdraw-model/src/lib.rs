//! Core in-memory data model for worksheet drawing parts.
//!
//! This crate holds the plain data types the XML layer
//! (`sheetdraw-xlsx`) reads and writes: cell-anchored placement
//! descriptors, EMU geometry, and picture references. It has no XML or
//! package dependencies of its own.

mod address;
pub mod drawings;

pub use address::CellRef;
pub use drawings::{
    Anchor, AnchorPoint, CellOffset, Drawing, DrawingItem, EmuSize, ImageId, PictureRef,
};
