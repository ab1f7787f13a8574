use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::DrawingXmlError;

/// Balanced streaming XML writer.
///
/// Thin wrapper over `quick_xml::Writer` that tracks open elements so
/// callers close by nesting rather than by tag name.
pub struct XmlStream {
    writer: Writer<Vec<u8>>,
    open_tags: Vec<String>,
}

impl Default for XmlStream {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlStream {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            open_tags: Vec::new(),
        }
    }

    /// Write the standard XML declaration
    /// (`<?xml version="1.0" encoding="UTF-8" standalone="yes"?>`).
    pub fn open_document(&mut self) -> Result<(), DrawingXmlError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(())
    }

    pub fn open_element(
        &mut self,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<(), DrawingXmlError> {
        let mut elem = BytesStart::new(tag);
        for (key, value) in attrs {
            elem.push_attribute((*key, *value));
        }
        self.writer.write_event(Event::Start(elem))?;
        self.open_tags.push(tag.to_string());
        Ok(())
    }

    pub fn empty_element(
        &mut self,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<(), DrawingXmlError> {
        let mut elem = BytesStart::new(tag);
        for (key, value) in attrs {
            elem.push_attribute((*key, *value));
        }
        self.writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    pub fn close_element(&mut self) -> Result<(), DrawingXmlError> {
        let tag = self
            .open_tags
            .pop()
            .ok_or_else(|| DrawingXmlError::Invalid("unbalanced close_element".to_string()))?;
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    pub fn text(&mut self, text: &str) -> Result<(), DrawingXmlError> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// `<tag>text</tag>` in one call.
    pub fn text_element(&mut self, tag: &str, text: &str) -> Result<(), DrawingXmlError> {
        self.open_element(tag, &[])?;
        self.text(text)?;
        self.close_element()
    }

    pub fn into_xml(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn as_str(stream: XmlStream) -> String {
        String::from_utf8(stream.into_xml()).unwrap()
    }

    #[test]
    fn writes_balanced_elements() {
        let mut stream = XmlStream::new();
        stream.open_document().unwrap();
        stream.open_element("a", &[("k", "v")]).unwrap();
        stream.text_element("b", "7").unwrap();
        stream.empty_element("c", &[]).unwrap();
        stream.close_element().unwrap();

        assert_eq!(
            as_str(stream),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a k="v"><b>7</b><c/></a>"#
        );
    }

    #[test]
    fn close_without_open_is_an_error() {
        let mut stream = XmlStream::new();
        assert!(stream.close_element().is_err());
    }

    #[test]
    fn escapes_attribute_values_and_text() {
        let mut stream = XmlStream::new();
        stream.open_element("a", &[("k", "x<y&\"z\"")]).unwrap();
        stream.text("a<b").unwrap();
        stream.close_element().unwrap();

        let xml = as_str(stream);
        assert!(xml.contains("&lt;"));
        assert!(xml.contains("&amp;"));
    }
}
