use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrawingXmlError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("xml attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),
    #[error("missing drawing part: {0}")]
    MissingPart(String),
    #[error("invalid drawing xml: {0}")]
    Invalid(String),
}
