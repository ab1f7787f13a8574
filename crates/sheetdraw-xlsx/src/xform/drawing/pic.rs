use sheetdraw_model::{EmuSize, ImageId, PictureRef};

use crate::path::{media_file_name, resolve_target};
use crate::xform::{PrepareContext, ReconcileContext, XmlNode, XmlStream, Xform};
use crate::DrawingXmlError;

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Transform for `xdr:pic`.
///
/// Parsing walks the subtree by depth and picks out `xdr:cNvPr`
/// (`id`/`name`) and `a:blip` (`r:embed`); everything else under the
/// picture (`xdr:spPr`, fill details) is consumed without being modelled.
#[derive(Debug, Default)]
pub struct PicXform {
    depth: usize,
    current: PictureRef,
    model: Option<PictureRef>,
}

impl PicXform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render with an explicit shape extent for the `a:xfrm` transform
    /// block. Anchors that know their extent pass it through; the wire
    /// consumer recomputes from the anchor when it is absent.
    pub fn render_with_size(
        &self,
        stream: &mut XmlStream,
        model: &PictureRef,
        size: Option<EmuSize>,
    ) -> Result<(), DrawingXmlError> {
        let object_id = model.object_id.unwrap_or(0);
        let id = object_id.to_string();
        let default_name = format!("Picture {object_id}");
        let name = model.name.as_deref().unwrap_or(&default_name);
        let ext = size.unwrap_or_default();
        let cx = ext.cx.to_string();
        let cy = ext.cy.to_string();

        stream.open_element("xdr:pic", &[])?;

        stream.open_element("xdr:nvPicPr", &[])?;
        stream.empty_element("xdr:cNvPr", &[("id", id.as_str()), ("name", name)])?;
        stream.empty_element("xdr:cNvPicPr", &[])?;
        stream.close_element()?;

        stream.open_element("xdr:blipFill", &[])?;
        let mut blip_attrs = vec![("xmlns:r", REL_NS)];
        if let Some(rel_id) = &model.rel_id {
            blip_attrs.push(("r:embed", rel_id.as_str()));
        }
        stream.empty_element("a:blip", &blip_attrs)?;
        stream.open_element("a:stretch", &[])?;
        stream.empty_element("a:fillRect", &[])?;
        stream.close_element()?;
        stream.close_element()?;

        stream.open_element("xdr:spPr", &[])?;
        stream.open_element("a:xfrm", &[])?;
        stream.empty_element("a:off", &[("x", "0"), ("y", "0")])?;
        stream.empty_element("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        stream.close_element()?;
        stream.open_element("a:prstGeom", &[("prst", "rect")])?;
        stream.empty_element("a:avLst", &[])?;
        stream.close_element()?;
        stream.close_element()?;

        stream.close_element()
    }
}

impl Xform for PicXform {
    type Model = PictureRef;

    fn prepare(&mut self, model: &mut Self::Model, ctx: &PrepareContext) {
        model.rel_id = Some(format!("rId{}", ctx.index + 1));
    }

    fn render(&self, stream: &mut XmlStream, model: &Self::Model) -> Result<(), DrawingXmlError> {
        self.render_with_size(stream, model, None)
    }

    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth == 0 {
            if node.name() != "xdr:pic" {
                return false;
            }
            self.current = PictureRef::default();
            self.depth = 1;
            return true;
        }

        match node.name() {
            "xdr:cNvPr" => {
                self.current.object_id = node.attr("id").and_then(|id| id.trim().parse().ok());
                self.current.name = node.attr("name").map(str::to_string);
            }
            "a:blip" => {
                self.current.rel_id = node.attr("r:embed").map(str::to_string);
            }
            _ => {}
        }
        self.depth += 1;
        true
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.model = Some(std::mem::take(&mut self.current));
            return false;
        }
        true
    }

    fn take_model(&mut self) -> Option<Self::Model> {
        self.model.take()
    }

    fn reconcile(&mut self, model: &mut Self::Model, ctx: &ReconcileContext<'_>) {
        let Some(rel_id) = &model.rel_id else {
            return;
        };
        let Some(rel) = ctx.relationships.get(rel_id) else {
            return;
        };
        if rel.is_external() {
            return;
        }
        let target_path = resolve_target(ctx.part_path, &rel.target);
        model.image = Some(ImageId::new(media_file_name(&target_path)));
    }
}
