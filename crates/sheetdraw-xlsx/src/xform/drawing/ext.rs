use sheetdraw_model::EmuSize;

use crate::xform::{XmlNode, XmlStream, Xform};
use crate::DrawingXmlError;

/// Transform for the `xdr:ext` extent element (`cx`/`cy` in EMU).
#[derive(Debug, Default)]
pub struct ExtXform {
    model: Option<EmuSize>,
}

impl ExtXform {
    pub fn new() -> Self {
        Self::default()
    }
}

fn attr_i64(node: &XmlNode, key: &str) -> i64 {
    node.attr(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

impl Xform for ExtXform {
    type Model = EmuSize;

    fn render(&self, stream: &mut XmlStream, model: &Self::Model) -> Result<(), DrawingXmlError> {
        let cx = model.cx.to_string();
        let cy = model.cy.to_string();
        stream.empty_element("xdr:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])
    }

    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if node.name() != "xdr:ext" {
            return false;
        }
        self.model = Some(EmuSize::new(attr_i64(node, "cx"), attr_i64(node, "cy")));
        true
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        false
    }

    fn take_model(&mut self) -> Option<Self::Model> {
        self.model.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_extent_attributes() {
        let mut xform = ExtXform::new();
        let node = XmlNode::new("xdr:ext")
            .with_attribute("cx", " 914400 ")
            .with_attribute("cy", "457200");
        assert!(xform.parse_open(&node));
        assert!(!xform.parse_close("xdr:ext"));
        assert_eq!(xform.take_model(), Some(EmuSize::new(914400, 457200)));
    }

    #[test]
    fn malformed_attributes_default_to_zero() {
        let mut xform = ExtXform::new();
        let node = XmlNode::new("xdr:ext").with_attribute("cx", "wide");
        xform.parse_open(&node);
        xform.parse_close("xdr:ext");
        assert_eq!(xform.take_model(), Some(EmuSize::new(0, 0)));
    }

    #[test]
    fn renders_as_empty_element() {
        let xform = ExtXform::new();
        let mut stream = XmlStream::new();
        xform.render(&mut stream, &EmuSize::new(10, 20)).unwrap();
        assert_eq!(stream.into_xml(), br#"<xdr:ext cx="10" cy="20"/>"#.to_vec());
    }
}
