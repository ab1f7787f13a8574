//! OPC relationships (`.rels`) parsing and serialization.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::DrawingXmlError;

const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub type_: String,
    pub target: String,
    pub target_mode: Option<String>,
}

impl Relationship {
    /// `true` when the target is an external URI rather than a package part.
    pub fn is_external(&self) -> bool {
        self.target_mode
            .as_deref()
            .is_some_and(|mode| mode.trim().eq_ignore_ascii_case("External"))
    }
}

/// The relationships of one part, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn from_xml(xml: &[u8]) -> Result<Self, DrawingXmlError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut rels = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref().eq_ignore_ascii_case(b"Relationship") =>
                {
                    let mut id = None;
                    let mut type_ = None;
                    let mut target = None;
                    let mut target_mode = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => id = Some(attr.unescape_value()?.into_owned()),
                            b"Type" => type_ = Some(attr.unescape_value()?.into_owned()),
                            b"Target" => target = Some(attr.unescape_value()?.into_owned()),
                            b"TargetMode" => {
                                target_mode = Some(attr.unescape_value()?.into_owned())
                            }
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(target)) = (id, target) {
                        rels.push(Relationship {
                            id,
                            type_: type_.unwrap_or_default(),
                            target,
                            target_mode,
                        });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { rels })
    }

    pub fn to_xml(&self) -> Result<Vec<u8>, DrawingXmlError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut root = BytesStart::new("Relationships");
        root.push_attribute(("xmlns", NS_RELATIONSHIPS));
        writer.write_event(Event::Start(root))?;

        for rel in &self.rels {
            let mut elem = BytesStart::new("Relationship");
            elem.push_attribute(("Id", rel.id.as_str()));
            elem.push_attribute(("Type", rel.type_.as_str()));
            elem.push_attribute(("Target", rel.target.as_str()));
            if let Some(mode) = &rel.target_mode {
                elem.push_attribute(("TargetMode", mode.as_str()));
            }
            writer.write_event(Event::Empty(elem))?;
        }

        writer.write_event(Event::End(BytesEnd::new("Relationships")))?;
        Ok(writer.into_inner())
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.id == id)
    }

    pub fn push(&mut self, rel: Relationship) {
        self.rels.push(rel);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Next unused `rId{n}` identifier.
    pub fn next_r_id(&self) -> String {
        let max = self
            .rels
            .iter()
            .filter_map(|rel| rel.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }
}
