use sheetdraw_model::{Anchor, DrawingItem};

use super::{cell_position::CellPositionXform, pic::PicXform, TWO_CELL_ANCHOR_TAG};
use crate::xform::{PrepareContext, ReconcileContext, StaticXform, XmlNode, XmlStream, Xform};
use crate::DrawingXmlError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActiveChild {
    Idle,
    From,
    To,
    Pic,
    ClientData,
}

/// Transform for `xdr:twoCellAnchor`: a drawing object spanning a
/// rectangular cell range.
#[derive(Debug)]
pub struct TwoCellAnchorXform {
    from: CellPositionXform,
    to: CellPositionXform,
    pic: PicXform,
    client_data: StaticXform,
    active: ActiveChild,
    edit_as: Option<String>,
    model: Option<DrawingItem>,
}

impl TwoCellAnchorXform {
    pub fn new() -> Self {
        Self {
            from: CellPositionXform::new("xdr:from"),
            to: CellPositionXform::new("xdr:to"),
            pic: PicXform::new(),
            client_data: StaticXform::new("xdr:clientData"),
            active: ActiveChild::Idle,
            edit_as: None,
            model: None,
        }
    }
}

impl Default for TwoCellAnchorXform {
    fn default() -> Self {
        Self::new()
    }
}

impl Xform for TwoCellAnchorXform {
    type Model = DrawingItem;

    fn prepare(&mut self, model: &mut Self::Model, ctx: &PrepareContext) {
        if let Some(picture) = &mut model.picture {
            self.pic.prepare(picture, ctx);
        }
    }

    fn render(&self, stream: &mut XmlStream, model: &Self::Model) -> Result<(), DrawingXmlError> {
        let Anchor::TwoCell { from, to } = &model.anchor else {
            return Err(DrawingXmlError::Invalid(
                "two-cell anchor transform requires a spanning anchor".to_string(),
            ));
        };

        let mut attrs: Vec<(&str, &str)> = Vec::new();
        if let Some(edit_as) = &model.edit_as {
            attrs.push(("editAs", edit_as.as_str()));
        }
        stream.open_element(TWO_CELL_ANCHOR_TAG, &attrs)?;
        self.from.render(stream, from)?;
        self.to.render(stream, to)?;
        if let Some(picture) = &model.picture {
            self.pic.render_with_size(stream, picture, None)?;
        }
        self.client_data.render(stream, &())?;
        stream.close_element()
    }

    fn parse_open(&mut self, node: &XmlNode) -> bool {
        match self.active {
            ActiveChild::Idle => match node.name() {
                TWO_CELL_ANCHOR_TAG => {
                    *self = Self::new();
                    self.edit_as = node.attr("editAs").map(str::to_string);
                }
                "xdr:from" => {
                    self.active = ActiveChild::From;
                    self.from.parse_open(node);
                }
                "xdr:to" => {
                    self.active = ActiveChild::To;
                    self.to.parse_open(node);
                }
                "xdr:pic" => {
                    self.active = ActiveChild::Pic;
                    self.pic.parse_open(node);
                }
                "xdr:clientData" => {
                    self.active = ActiveChild::ClientData;
                    self.client_data.parse_open(node);
                }
                // unrecognized content at anchor depth (shapes, frames) is
                // swallowed, like unknown tags at the container level
                _ => {}
            },
            ActiveChild::From => {
                self.from.parse_open(node);
            }
            ActiveChild::To => {
                self.to.parse_open(node);
            }
            ActiveChild::Pic => {
                self.pic.parse_open(node);
            }
            ActiveChild::ClientData => {
                self.client_data.parse_open(node);
            }
        }
        true
    }

    fn parse_text(&mut self, text: &str) {
        match self.active {
            ActiveChild::From => self.from.parse_text(text),
            ActiveChild::To => self.to.parse_text(text),
            ActiveChild::Pic => self.pic.parse_text(text),
            ActiveChild::ClientData | ActiveChild::Idle => {}
        }
    }

    fn parse_close(&mut self, name: &str) -> bool {
        match self.active {
            ActiveChild::From => {
                if !self.from.parse_close(name) {
                    self.active = ActiveChild::Idle;
                }
                true
            }
            ActiveChild::To => {
                if !self.to.parse_close(name) {
                    self.active = ActiveChild::Idle;
                }
                true
            }
            ActiveChild::Pic => {
                if !self.pic.parse_close(name) {
                    self.active = ActiveChild::Idle;
                }
                true
            }
            ActiveChild::ClientData => {
                if !self.client_data.parse_close(name) {
                    self.active = ActiveChild::Idle;
                }
                true
            }
            ActiveChild::Idle => {
                if name != TWO_CELL_ANCHOR_TAG {
                    return true;
                }
                self.model = Some(DrawingItem {
                    anchor: Anchor::TwoCell {
                        from: self.from.take_model().unwrap_or_default(),
                        to: self.to.take_model().unwrap_or_default(),
                    },
                    picture: self.pic.take_model(),
                    edit_as: self.edit_as.take(),
                });
                false
            }
        }
    }

    fn take_model(&mut self) -> Option<Self::Model> {
        self.model.take()
    }

    fn reconcile(&mut self, model: &mut Self::Model, ctx: &ReconcileContext<'_>) {
        if let Some(picture) = &mut model.picture {
            self.pic.reconcile(picture, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xform::parse_fragment;
    use pretty_assertions::assert_eq;
    use sheetdraw_model::{AnchorPoint, CellOffset, CellRef};

    #[test]
    fn parses_range_and_edit_as() {
        let xml = br#"<xdr:twoCellAnchor editAs="oneCell">
  <xdr:from><xdr:col>1</xdr:col><xdr:colOff>2</xdr:colOff><xdr:row>3</xdr:row><xdr:rowOff>4</xdr:rowOff></xdr:from>
  <xdr:to><xdr:col>5</xdr:col><xdr:colOff>6</xdr:colOff><xdr:row>7</xdr:row><xdr:rowOff>8</xdr:rowOff></xdr:to>
  <xdr:clientData/>
</xdr:twoCellAnchor>"#;
        let mut xform = TwoCellAnchorXform::new();
        let item = parse_fragment(&mut xform, xml).unwrap().unwrap();

        assert_eq!(
            item.anchor,
            Anchor::TwoCell {
                from: AnchorPoint::new(CellRef::new(3, 1), CellOffset::new(2, 4)),
                to: AnchorPoint::new(CellRef::new(7, 5), CellOffset::new(6, 8)),
            }
        );
        assert_eq!(item.edit_as.as_deref(), Some("oneCell"));
        assert_eq!(item.picture, None);
    }

    #[test]
    fn render_rejects_one_cell_items() {
        let item = DrawingItem::new(Anchor::OneCell {
            from: AnchorPoint::default(),
            ext: Default::default(),
        });
        let xform = TwoCellAnchorXform::new();
        let mut stream = XmlStream::new();
        assert!(xform.render(&mut stream, &item).is_err());
    }

    #[test]
    fn renders_picture_between_range_and_client_data() {
        let item = DrawingItem::new(Anchor::TwoCell {
            from: AnchorPoint::default(),
            to: AnchorPoint::new(CellRef::new(2, 2), CellOffset::default()),
        })
        .with_picture(sheetdraw_model::PictureRef {
            rel_id: Some("rId1".to_string()),
            object_id: Some(1),
            ..Default::default()
        });

        let xform = TwoCellAnchorXform::new();
        let mut stream = XmlStream::new();
        xform.render(&mut stream, &item).unwrap();
        let xml = String::from_utf8(stream.into_xml()).unwrap();

        let pic_at = xml.find("<xdr:pic>").unwrap();
        assert!(xml.find("</xdr:to>").unwrap() < pic_at);
        assert!(pic_at < xml.find("<xdr:clientData/>").unwrap());
        assert!(xml.ends_with("</xdr:twoCellAnchor>"));
    }
}
