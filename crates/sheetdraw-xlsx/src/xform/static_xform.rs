use crate::xform::{XmlNode, XmlStream, Xform};
use crate::DrawingXmlError;

/// Transform for a fixed, contentless element (`<xdr:clientData/>`).
///
/// Renders one empty element and swallows its whole subtree during parse,
/// whatever a producer nested inside it.
#[derive(Debug)]
pub struct StaticXform {
    tag: &'static str,
    depth: usize,
}

impl StaticXform {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, depth: 0 }
    }
}

impl Xform for StaticXform {
    type Model = ();

    fn render(&self, stream: &mut XmlStream, _model: &Self::Model) -> Result<(), DrawingXmlError> {
        stream.empty_element(self.tag, &[])
    }

    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth == 0 && node.name() != self.tag {
            return false;
        }
        self.depth += 1;
        true
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }

    fn take_model(&mut self) -> Option<Self::Model> {
        Some(())
    }
}
