//! Drawing-part model: anchored objects placed on a worksheet.
//!
//! Sizes and offsets use English Metric Units (EMU); 914400 EMU = 1 inch.

use serde::{Deserialize, Serialize};

use crate::CellRef;

/// An EMU offset within a cell (or from the sheet origin).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellOffset {
    pub x_emu: i64,
    pub y_emu: i64,
}

impl CellOffset {
    #[inline]
    pub const fn new(x_emu: i64, y_emu: i64) -> Self {
        Self { x_emu, y_emu }
    }
}

/// An extent in EMU.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmuSize {
    pub cx: i64,
    pub cy: i64,
}

impl EmuSize {
    #[inline]
    pub const fn new(cx: i64, cy: i64) -> Self {
        Self { cx, cy }
    }
}

/// A cell plus an EMU offset into that cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub cell: CellRef,
    pub offset: CellOffset,
}

impl AnchorPoint {
    #[inline]
    pub const fn new(cell: CellRef, offset: CellOffset) -> Self {
        Self { cell, offset }
    }
}

/// Placement of a drawing object on a worksheet.
///
/// The variant is the single source of truth for which anchor element the
/// object serializes as: `OneCell` is a single-point anchor with an explicit
/// extent (`xdr:oneCellAnchor`), `TwoCell` spans a rectangular cell range
/// (`xdr:twoCellAnchor`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    OneCell { from: AnchorPoint, ext: EmuSize },
    TwoCell { from: AnchorPoint, to: AnchorPoint },
}

impl Anchor {
    /// `true` for the single-point (`xdr:oneCellAnchor`) variant.
    pub fn is_one_cell(&self) -> bool {
        matches!(self, Anchor::OneCell { .. })
    }
}

/// Identifier for an image in the package media store, i.e. the media file
/// name (`image1.png`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self(file_name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A picture placed inside an anchor.
///
/// `rel_id` is the `r:embed` relationship id on the wire; it is assigned
/// during write preparation and read back verbatim during parsing. `image`
/// is only populated by reconciliation, which resolves `rel_id` against the
/// drawing part's relationships.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureRef {
    pub rel_id: Option<String>,
    pub image: Option<ImageId>,
    pub name: Option<String>,
    pub object_id: Option<u32>,
}

/// One anchored drawing object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawingItem {
    pub anchor: Anchor,
    pub picture: Option<PictureRef>,
    /// `editAs` attribute of `xdr:twoCellAnchor` (`oneCell`, `absolute`).
    pub edit_as: Option<String>,
}

impl DrawingItem {
    pub fn new(anchor: Anchor) -> Self {
        Self {
            anchor,
            picture: None,
            edit_as: None,
        }
    }

    pub fn with_picture(mut self, picture: PictureRef) -> Self {
        self.picture = Some(picture);
        self
    }
}

/// The drawing-part collection model: all anchored objects of one
/// worksheet drawing, in document order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub anchors: Vec<DrawingItem>,
}
