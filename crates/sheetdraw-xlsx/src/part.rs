//! Drawing-part surface: one `xl/drawings/drawingN.xml` plus its `.rels`.

use std::collections::BTreeMap;

use sheetdraw_model::{Anchor, Drawing, DrawingItem, ImageId, PictureRef};

use crate::path::rels_for_part;
use crate::relationships::{Relationship, Relationships};
use crate::xform::drawing::WsDrXform;
use crate::xform::{parse_fragment, PrepareContext, ReconcileContext, XmlStream, Xform};
use crate::DrawingXmlError;

pub(crate) const REL_TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Parse one drawing XML fragment into a [`Drawing`].
///
/// This runs the transform tree only; relationship-dependent fields stay
/// unresolved. Use [`DrawingPart::parse_from_parts`] when the `.rels`
/// part is available.
pub fn parse_drawing_xml(xml: &[u8]) -> Result<Drawing, DrawingXmlError> {
    let mut xform = WsDrXform::new();
    Ok(parse_fragment(&mut xform, xml)?.unwrap_or_default())
}

/// Prepare and render a [`Drawing`] to XML bytes.
///
/// `drawing` is mutable because preparation derives write-side fields
/// (picture relationship ids) on the items.
pub fn write_drawing_xml(drawing: &mut Drawing) -> Result<Vec<u8>, DrawingXmlError> {
    let mut xform = WsDrXform::new();
    xform.prepare(drawing, &PrepareContext::default());
    let mut stream = XmlStream::new();
    xform.render(&mut stream, drawing)?;
    Ok(stream.into_xml())
}

/// A sheet drawing part paired with its relationships part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawingPart {
    /// Part name of the drawing XML (e.g. `xl/drawings/drawing1.xml`).
    pub path: String,
    /// Part name of the drawing `.rels`.
    pub rels_path: String,
    pub drawing: Drawing,
    pub relationships: Relationships,
}

impl DrawingPart {
    pub fn new_empty(path: impl Into<String>) -> Self {
        let path = path.into();
        let rels_path = rels_for_part(&path);
        Self {
            path,
            rels_path,
            drawing: Drawing::default(),
            relationships: Relationships::default(),
        }
    }

    /// Parse a drawing part out of an OPC part map.
    ///
    /// The drawing XML is required; a missing `.rels` part is tolerated
    /// (relationship-dependent fields then stay unresolved). Reconciliation
    /// runs exactly once, after the whole fragment has been consumed.
    pub fn parse_from_parts(
        path: &str,
        parts: &BTreeMap<String, Vec<u8>>,
    ) -> Result<Self, DrawingXmlError> {
        let rels_path = rels_for_part(path);
        let relationships = match parts.get(&rels_path) {
            Some(bytes) => Relationships::from_xml(bytes)?,
            None => Relationships::default(),
        };

        let xml = parts
            .get(path)
            .ok_or_else(|| DrawingXmlError::MissingPart(path.to_string()))?;

        let mut xform = WsDrXform::new();
        let mut drawing = parse_fragment(&mut xform, xml)?.unwrap_or_default();
        let ctx = ReconcileContext {
            relationships: &relationships,
            part_path: path,
        };
        xform.reconcile(&mut drawing, &ctx);

        Ok(Self {
            path: path.to_string(),
            rels_path,
            drawing,
            relationships,
        })
    }

    /// Append an image item anchored at `anchor`.
    ///
    /// The relationship id is left unassigned; writing derives it from the
    /// item's position within its variant group.
    pub fn insert_image(&mut self, anchor: Anchor, image: ImageId) -> DrawingItem {
        let object_id = self
            .drawing
            .anchors
            .iter()
            .filter_map(|item| item.picture.as_ref().and_then(|pic| pic.object_id))
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        let item = DrawingItem::new(anchor).with_picture(PictureRef {
            rel_id: None,
            image: Some(image),
            name: Some(format!("Picture {object_id}")),
            object_id: Some(object_id),
        });
        self.drawing.anchors.push(item.clone());
        item
    }

    /// Render the drawing XML and regenerate its image relationships into
    /// the part map.
    pub fn write_into_parts(
        &mut self,
        parts: &mut BTreeMap<String, Vec<u8>>,
    ) -> Result<(), DrawingXmlError> {
        let xml = write_drawing_xml(&mut self.drawing)?;

        // Image relationships are regenerated from the prepared rel ids.
        // Keyed by id: if preparation assigned the same id twice (one item
        // of each variant carrying a picture), the last target wins.
        let mut by_id: BTreeMap<String, Relationship> = BTreeMap::new();
        for item in &self.drawing.anchors {
            let Some(picture) = &item.picture else {
                continue;
            };
            let (Some(rel_id), Some(image)) = (&picture.rel_id, &picture.image) else {
                continue;
            };
            by_id.insert(
                rel_id.clone(),
                Relationship {
                    id: rel_id.clone(),
                    type_: REL_TYPE_IMAGE.to_string(),
                    target: format!("../media/{}", image.as_str()),
                    target_mode: None,
                },
            );
        }
        let mut relationships = Relationships::default();
        for (_, rel) in by_id {
            relationships.push(rel);
        }
        self.relationships = relationships;

        parts.insert(self.path.clone(), xml);
        parts.insert(self.rels_path.clone(), self.relationships.to_xml()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetdraw_model::{AnchorPoint, CellOffset, CellRef, EmuSize};

    #[test]
    fn missing_drawing_part_is_an_error() {
        let parts = BTreeMap::new();
        let err = DrawingPart::parse_from_parts("xl/drawings/drawing1.xml", &parts).unwrap_err();
        assert!(matches!(err, DrawingXmlError::MissingPart(_)));
    }

    #[test]
    fn insert_image_allocates_increasing_object_ids() {
        let mut part = DrawingPart::new_empty("xl/drawings/drawing1.xml");
        let anchor = Anchor::OneCell {
            from: AnchorPoint::new(CellRef::new(0, 0), CellOffset::default()),
            ext: EmuSize::new(10, 10),
        };

        let first = part.insert_image(anchor, ImageId::new("image1.png"));
        let second = part.insert_image(anchor, ImageId::new("image2.png"));

        assert_eq!(first.picture.unwrap().object_id, Some(1));
        assert_eq!(second.picture.unwrap().object_id, Some(2));
    }

    #[test]
    fn write_regenerates_image_relationships() {
        let mut part = DrawingPart::new_empty("xl/drawings/drawing1.xml");
        let anchor = Anchor::OneCell {
            from: AnchorPoint::new(CellRef::new(0, 0), CellOffset::default()),
            ext: EmuSize::new(10, 10),
        };
        part.insert_image(anchor, ImageId::new("image1.png"));

        let mut parts = BTreeMap::new();
        part.write_into_parts(&mut parts).unwrap();

        assert!(parts.contains_key("xl/drawings/drawing1.xml"));
        let rel = part.relationships.get("rId1").unwrap();
        assert_eq!(rel.target, "../media/image1.png");
        assert_eq!(rel.type_, REL_TYPE_IMAGE);

        let rels_xml = parts.get("xl/drawings/_rels/drawing1.xml.rels").unwrap();
        let back = Relationships::from_xml(rels_xml).unwrap();
        assert_eq!(&back, &part.relationships);
    }
}
