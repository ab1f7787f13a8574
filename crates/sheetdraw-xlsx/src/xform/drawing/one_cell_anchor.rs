use sheetdraw_model::{Anchor, DrawingItem};

use super::{cell_position::CellPositionXform, ext::ExtXform, pic::PicXform, ONE_CELL_ANCHOR_TAG};
use crate::xform::{PrepareContext, ReconcileContext, StaticXform, XmlNode, XmlStream, Xform};
use crate::DrawingXmlError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActiveChild {
    Idle,
    From,
    Ext,
    Pic,
    ClientData,
}

/// Transform for `xdr:oneCellAnchor`: a drawing object at a single cell
/// position with an explicit extent.
#[derive(Debug)]
pub struct OneCellAnchorXform {
    from: CellPositionXform,
    ext: ExtXform,
    pic: PicXform,
    client_data: StaticXform,
    active: ActiveChild,
    model: Option<DrawingItem>,
}

impl OneCellAnchorXform {
    pub fn new() -> Self {
        Self {
            from: CellPositionXform::new("xdr:from"),
            ext: ExtXform::new(),
            pic: PicXform::new(),
            client_data: StaticXform::new("xdr:clientData"),
            active: ActiveChild::Idle,
            model: None,
        }
    }
}

impl Default for OneCellAnchorXform {
    fn default() -> Self {
        Self::new()
    }
}

impl Xform for OneCellAnchorXform {
    type Model = DrawingItem;

    fn prepare(&mut self, model: &mut Self::Model, ctx: &PrepareContext) {
        if let Some(picture) = &mut model.picture {
            self.pic.prepare(picture, ctx);
        }
    }

    fn render(&self, stream: &mut XmlStream, model: &Self::Model) -> Result<(), DrawingXmlError> {
        let Anchor::OneCell { from, ext } = &model.anchor else {
            return Err(DrawingXmlError::Invalid(
                "one-cell anchor transform requires a single-point anchor".to_string(),
            ));
        };

        stream.open_element(ONE_CELL_ANCHOR_TAG, &[])?;
        self.from.render(stream, from)?;
        self.ext.render(stream, ext)?;
        if let Some(picture) = &model.picture {
            self.pic.render_with_size(stream, picture, Some(*ext))?;
        }
        self.client_data.render(stream, &())?;
        stream.close_element()
    }

    fn parse_open(&mut self, node: &XmlNode) -> bool {
        match self.active {
            ActiveChild::Idle => match node.name() {
                ONE_CELL_ANCHOR_TAG => *self = Self::new(),
                "xdr:from" => {
                    self.active = ActiveChild::From;
                    self.from.parse_open(node);
                }
                "xdr:ext" => {
                    self.active = ActiveChild::Ext;
                    self.ext.parse_open(node);
                }
                "xdr:pic" => {
                    self.active = ActiveChild::Pic;
                    self.pic.parse_open(node);
                }
                "xdr:clientData" => {
                    self.active = ActiveChild::ClientData;
                    self.client_data.parse_open(node);
                }
                _ => {}
            },
            ActiveChild::From => {
                self.from.parse_open(node);
            }
            ActiveChild::Ext => {
                self.ext.parse_open(node);
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
            ActiveChild::Pic => self.pic.parse_text(text),
            ActiveChild::Ext | ActiveChild::ClientData | ActiveChild::Idle => {}
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
            ActiveChild::Ext => {
                if !self.ext.parse_close(name) {
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
                if name != ONE_CELL_ANCHOR_TAG {
                    return true;
                }
                self.model = Some(DrawingItem {
                    anchor: Anchor::OneCell {
                        from: self.from.take_model().unwrap_or_default(),
                        ext: self.ext.take_model().unwrap_or_default(),
                    },
                    picture: self.pic.take_model(),
                    edit_as: None,
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
