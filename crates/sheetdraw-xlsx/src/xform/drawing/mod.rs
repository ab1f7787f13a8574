//! Worksheet-drawing (`xdr:wsDr`) transforms.
//!
//! [`WsDrXform`] is the container: it owns a tag registry of the two
//! anchor-variant transforms, routes parse events to at most one active
//! child, assembles the [`Drawing`] collection, and dispatches the
//! post-parse reconcile pass. One transform instance handles one document
//! at a time; build a fresh tree per parse or render.

mod cell_position;
mod ext;
mod one_cell_anchor;
mod pic;
mod two_cell_anchor;

pub use cell_position::CellPositionXform;
pub use ext::ExtXform;
pub use one_cell_anchor::OneCellAnchorXform;
pub use pic::PicXform;
pub use two_cell_anchor::TwoCellAnchorXform;

use std::collections::HashMap;

use sheetdraw_model::{Anchor, Drawing, DrawingItem};

use crate::xform::{PrepareContext, ReconcileContext, XmlNode, XmlStream, Xform};
use crate::DrawingXmlError;

pub const WS_DR_TAG: &str = "xdr:wsDr";
pub const TWO_CELL_ANCHOR_TAG: &str = "xdr:twoCellAnchor";
pub const ONE_CELL_ANCHOR_TAG: &str = "xdr:oneCellAnchor";

const XDR_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// Anchor element tag for an item. The `Anchor` variant is the single
/// source of truth for dispatch on both the write and the read path.
pub fn variant_tag(item: &DrawingItem) -> &'static str {
    match item.anchor {
        Anchor::TwoCell { .. } => TWO_CELL_ANCHOR_TAG,
        Anchor::OneCell { .. } => ONE_CELL_ANCHOR_TAG,
    }
}

// Render/prepare pass order: spanning anchors first, then compact ones.
// Output is grouped by variant rather than kept in document order; this
// matches the wire behavior existing consumers expect.
const VARIANT_PASSES: [&str; 2] = [TWO_CELL_ANCHOR_TAG, ONE_CELL_ANCHOR_TAG];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActiveChild {
    Idle,
    Delegating { tag: &'static str },
}

/// Container transform for the whole drawing part.
pub struct WsDrXform {
    map: HashMap<&'static str, Box<dyn Xform<Model = DrawingItem>>>,
    active: ActiveChild,
    model: Option<Drawing>,
}

impl WsDrXform {
    pub fn new() -> Self {
        let mut map: HashMap<&'static str, Box<dyn Xform<Model = DrawingItem>>> = HashMap::new();
        map.insert(TWO_CELL_ANCHOR_TAG, Box::new(TwoCellAnchorXform::new()));
        map.insert(ONE_CELL_ANCHOR_TAG, Box::new(OneCellAnchorXform::new()));
        Self {
            map,
            active: ActiveChild::Idle,
            model: None,
        }
    }
}

impl Default for WsDrXform {
    fn default() -> Self {
        Self::new()
    }
}

impl Xform for WsDrXform {
    type Model = Drawing;

    fn prepare(&mut self, model: &mut Self::Model, _ctx: &PrepareContext) {
        for tag in VARIANT_PASSES {
            let Some(xform) = self.map.get_mut(tag) else {
                continue;
            };
            // Each child sees its index within its own variant
            // sub-sequence, not its global document position.
            let mut index = 0;
            for item in model.anchors.iter_mut() {
                if variant_tag(item) != tag {
                    continue;
                }
                xform.prepare(item, &PrepareContext { index });
                index += 1;
            }
        }
    }

    fn render(&self, stream: &mut XmlStream, model: &Self::Model) -> Result<(), DrawingXmlError> {
        stream.open_document()?;
        stream.open_element(WS_DR_TAG, &[("xmlns:xdr", XDR_NS), ("xmlns:a", A_NS)])?;

        for tag in VARIANT_PASSES {
            let Some(xform) = self.map.get(tag) else {
                continue;
            };
            for item in model.anchors.iter().filter(|item| variant_tag(item) == tag) {
                xform.render(stream, item)?;
            }
        }

        stream.close_element()
    }

    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if let ActiveChild::Delegating { tag } = self.active {
            // Nested elements inside a child are never matched against
            // this registry.
            if let Some(child) = self.map.get_mut(tag) {
                child.parse_open(node);
            }
            return true;
        }

        if node.name() == WS_DR_TAG {
            // Fresh collection; whatever an earlier document left behind
            // is discarded.
            *self = Self::new();
            self.model = Some(Drawing::default());
        } else if let Some(tag) = self.map.keys().copied().find(|tag| *tag == node.name()) {
            self.active = ActiveChild::Delegating { tag };
            if let Some(child) = self.map.get_mut(tag) {
                child.parse_open(node);
            }
        }
        // Unknown tags at this depth are tolerated for forward
        // compatibility and dropped.
        true
    }

    fn parse_text(&mut self, text: &str) {
        if let ActiveChild::Delegating { tag } = self.active {
            if let Some(child) = self.map.get_mut(tag) {
                child.parse_text(text);
            }
        }
    }

    fn parse_close(&mut self, name: &str) -> bool {
        match self.active {
            ActiveChild::Delegating { tag } => {
                if let Some(child) = self.map.get_mut(tag) {
                    if !child.parse_close(name) {
                        if let (Some(model), Some(item)) = (self.model.as_mut(), child.take_model())
                        {
                            model.anchors.push(item);
                        }
                        self.active = ActiveChild::Idle;
                    }
                }
                true
            }
            ActiveChild::Idle => name != WS_DR_TAG,
        }
    }

    fn take_model(&mut self) -> Option<Self::Model> {
        self.model.take()
    }

    fn reconcile(&mut self, model: &mut Self::Model, ctx: &ReconcileContext<'_>) {
        for item in &mut model.anchors {
            if let Some(xform) = self.map.get_mut(variant_tag(item)) {
                xform.reconcile(item, ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationships::{Relationship, Relationships};
    use crate::xform::parse_fragment;
    use pretty_assertions::assert_eq;
    use sheetdraw_model::{AnchorPoint, CellOffset, CellRef, EmuSize, PictureRef};

    fn two_cell(row: u32) -> DrawingItem {
        DrawingItem::new(Anchor::TwoCell {
            from: AnchorPoint::new(CellRef::new(row, 0), CellOffset::default()),
            to: AnchorPoint::new(CellRef::new(row + 1, 1), CellOffset::default()),
        })
    }

    fn one_cell(row: u32) -> DrawingItem {
        DrawingItem::new(Anchor::OneCell {
            from: AnchorPoint::new(CellRef::new(row, 0), CellOffset::default()),
            ext: EmuSize::new(100, 200),
        })
    }

    fn render_to_string(model: &Drawing) -> String {
        let xform = WsDrXform::new();
        let mut stream = XmlStream::new();
        xform.render(&mut stream, model).unwrap();
        String::from_utf8(stream.into_xml()).unwrap()
    }

    #[test]
    fn empty_drawing_renders_only_the_root_element() {
        let xml = render_to_string(&Drawing::default());
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"></xdr:wsDr>"#
        );
    }

    #[test]
    fn render_groups_items_by_variant() {
        // A(spanning), B(compact), C(spanning) must come out A, C, B.
        let model = Drawing {
            anchors: vec![two_cell(0), one_cell(10), two_cell(20)],
        };
        let xml = render_to_string(&model);

        let a = xml.find("<xdr:row>0</xdr:row>").unwrap();
        let c = xml.find("<xdr:row>20</xdr:row>").unwrap();
        let b = xml.find("<xdr:row>10</xdr:row>").unwrap();
        assert!(a < c && c < b);
    }

    #[test]
    fn root_open_then_close_yields_an_empty_collection() {
        let mut xform = WsDrXform::new();
        assert!(xform.parse_open(&XmlNode::new(WS_DR_TAG)));
        assert!(!xform.parse_close(WS_DR_TAG));
        assert_eq!(xform.take_model(), Some(Drawing::default()));
    }

    #[test]
    fn unknown_child_tags_are_ignored_between_siblings() {
        let xml = br#"<xdr:wsDr xmlns:xdr="a" xmlns:a="b">
  <xdr:oneCellAnchor><xdr:from><xdr:col>1</xdr:col><xdr:row>1</xdr:row></xdr:from><xdr:ext cx="5" cy="5"/><xdr:clientData/></xdr:oneCellAnchor>
  <mc:AlternateContent/>
  <xdr:oneCellAnchor><xdr:from><xdr:col>2</xdr:col><xdr:row>2</xdr:row></xdr:from><xdr:ext cx="5" cy="5"/><xdr:clientData/></xdr:oneCellAnchor>
</xdr:wsDr>"#;
        let mut xform = WsDrXform::new();
        let drawing = parse_fragment(&mut xform, xml).unwrap().unwrap();
        assert_eq!(drawing.anchors.len(), 2);
    }

    #[test]
    fn container_level_text_is_ignored_when_no_child_is_active() {
        let mut xform = WsDrXform::new();
        xform.parse_open(&XmlNode::new(WS_DR_TAG));
        xform.parse_text("stray");
        assert!(!xform.parse_close(WS_DR_TAG));
        assert_eq!(xform.take_model(), Some(Drawing::default()));
    }

    #[test]
    fn prepare_indexes_within_each_variant_subsequence() {
        let mut model = Drawing {
            anchors: vec![
                two_cell(0).with_picture(PictureRef::default()),
                one_cell(1).with_picture(PictureRef::default()),
                two_cell(2).with_picture(PictureRef::default()),
            ],
        };
        let mut xform = WsDrXform::new();
        xform.prepare(&mut model, &PrepareContext::default());

        let rel_ids: Vec<_> = model
            .anchors
            .iter()
            .map(|item| item.picture.as_ref().unwrap().rel_id.as_deref().unwrap())
            .collect();
        // Spanning items count 0,1 within their sub-sequence; the compact
        // item restarts at 0.
        assert_eq!(rel_ids, vec!["rId1", "rId1", "rId2"]);
    }

    #[test]
    fn reconcile_dispatches_once_per_item_with_shared_context() {
        let mut rels = Relationships::default();
        for (id, target) in [("rId1", "../media/a.png"), ("rId2", "../media/b.png")] {
            rels.push(Relationship {
                id: id.to_string(),
                type_: String::new(),
                target: target.to_string(),
                target_mode: None,
            });
        }
        let ctx = ReconcileContext {
            relationships: &rels,
            part_path: "xl/drawings/drawing1.xml",
        };

        let mut model = Drawing {
            anchors: vec![
                two_cell(0).with_picture(PictureRef {
                    rel_id: Some("rId1".to_string()),
                    ..Default::default()
                }),
                one_cell(1).with_picture(PictureRef {
                    rel_id: Some("rId2".to_string()),
                    ..Default::default()
                }),
            ],
        };

        let mut xform = WsDrXform::new();
        xform.reconcile(&mut model, &ctx);

        let images: Vec<_> = model
            .anchors
            .iter()
            .map(|item| {
                item.picture
                    .as_ref()
                    .unwrap()
                    .image
                    .as_ref()
                    .unwrap()
                    .as_str()
                    .to_string()
            })
            .collect();
        assert_eq!(images, vec!["a.png", "b.png"]);
    }
}
