//! Composable element transforms.
//!
//! A transform ([`Xform`]) converts between one element of the drawing
//! sub-schema and its model type, in both directions. Writing is a
//! two-phase `prepare` + `render` over an [`XmlStream`]; reading is an
//! incremental push of open/text/close events with no intermediate
//! document tree. Composite transforms own child transforms and route
//! events to at most one active child at a time; [`parse_fragment`] is the
//! pump that feeds a transform tree from a `quick_xml` reader.

pub mod drawing;
mod static_xform;
mod xml_stream;

pub use static_xform::StaticXform;
pub use xml_stream::XmlStream;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::relationships::Relationships;
use crate::DrawingXmlError;

/// One element-open event: tag name plus attributes, both unescaped.
///
/// Names are kept qualified (`xdr:oneCellAnchor`); the drawing sub-schema
/// is prefix-fixed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub(crate) fn from_start(e: &BytesStart<'_>) -> Result<Self, DrawingXmlError> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            attributes.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                attr.unescape_value()?.into_owned(),
            ));
        }
        Ok(Self { name, attributes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Context for [`Xform::prepare`].
///
/// `index` is the item's position within its own variant sub-sequence, not
/// its global document position; it seeds derived identifiers such as
/// relationship ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrepareContext {
    pub index: usize,
}

/// Shared context for [`Xform::reconcile`]; one instance is passed by
/// reference to every per-item reconcile call of a parse.
#[derive(Clone, Copy, Debug)]
pub struct ReconcileContext<'a> {
    /// Relationships of the drawing part being reconciled.
    pub relationships: &'a Relationships,
    /// Part name of the drawing XML, for relative target resolution.
    pub part_path: &'a str,
}

/// The operation set every element transform supports.
///
/// Instances carry per-parse mutable state and are single-use per
/// document: build a fresh transform tree per parse or render invocation.
/// Parsing never fails at this layer — unknown tags are swallowed and
/// malformed values degrade to defaults; well-formed nesting is the
/// tokenizer's invariant, not checked here.
pub trait Xform {
    type Model;

    /// Derive write-side fields on `model`. No I/O; touches only `model`.
    fn prepare(&mut self, _model: &mut Self::Model, _ctx: &PrepareContext) {}

    /// Emit the element and its descendants.
    fn render(&self, stream: &mut XmlStream, model: &Self::Model) -> Result<(), DrawingXmlError>;

    /// Take ownership of an element-open event. Returns `true` when the
    /// event was consumed; leaf transforms use this to drive their own
    /// micro state machines.
    fn parse_open(&mut self, node: &XmlNode) -> bool;

    /// Character data for whichever element is currently open.
    fn parse_text(&mut self, _text: &str) {}

    /// An element-close event. Returns `true` while this transform's
    /// subtree is still open (keep routing events here), `false` once its
    /// own element closed (pop back to the parent).
    fn parse_close(&mut self, name: &str) -> bool;

    /// The completed model, once `parse_close` has returned `false`.
    fn take_model(&mut self) -> Option<Self::Model>;

    /// Post-parse fix-up. Not guaranteed idempotent; call exactly once per
    /// parsed model.
    fn reconcile(&mut self, _model: &mut Self::Model, _ctx: &ReconcileContext<'_>) {}
}

/// Pump a transform tree with the events of one XML fragment.
///
/// Stops at the fragment end or as soon as the root transform reports its
/// own element closed, then yields the completed model.
pub fn parse_fragment<X: Xform>(
    xform: &mut X,
    xml: &[u8],
) -> Result<Option<X::Model>, DrawingXmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let node = XmlNode::from_start(&e)?;
                xform.parse_open(&node);
            }
            Event::Empty(e) => {
                let node = XmlNode::from_start(&e)?;
                xform.parse_open(&node);
                if !xform.parse_close(node.name()) {
                    break;
                }
            }
            Event::Text(t) => xform.parse_text(&t.unescape()?),
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if !xform.parse_close(&name) {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(xform.take_model())
}
