use sheetdraw_model::{AnchorPoint, CellOffset, CellRef};

use crate::xform::{XmlNode, XmlStream, Xform};
use crate::DrawingXmlError;

/// Which child element's text is currently being collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Col,
    ColOff,
    Row,
    RowOff,
}

/// Transform for the `xdr:from` / `xdr:to` marker elements.
///
/// The four coordinates arrive as element text, so this is the leaf that
/// actually exercises `parse_text`: each `<xdr:col>`-style open selects a
/// field, text accumulates into it, and the close commits the parsed
/// value. Whitespace around numbers is tolerated; missing or malformed
/// values (including absent `colOff`/`rowOff`) default to 0.
#[derive(Debug)]
pub struct CellPositionXform {
    tag: &'static str,
    field: Option<Field>,
    text: String,
    col: u32,
    row: u32,
    col_off: i64,
    row_off: i64,
    model: Option<AnchorPoint>,
}

impl CellPositionXform {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            field: None,
            text: String::new(),
            col: 0,
            row: 0,
            col_off: 0,
            row_off: 0,
            model: None,
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.tag);
    }
}

impl Xform for CellPositionXform {
    type Model = AnchorPoint;

    fn render(&self, stream: &mut XmlStream, model: &Self::Model) -> Result<(), DrawingXmlError> {
        stream.open_element(self.tag, &[])?;
        stream.text_element("xdr:col", &model.cell.col.to_string())?;
        stream.text_element("xdr:colOff", &model.offset.x_emu.to_string())?;
        stream.text_element("xdr:row", &model.cell.row.to_string())?;
        stream.text_element("xdr:rowOff", &model.offset.y_emu.to_string())?;
        stream.close_element()
    }

    fn parse_open(&mut self, node: &XmlNode) -> bool {
        match node.name() {
            tag if tag == self.tag => self.reset(),
            "xdr:col" => self.field = Some(Field::Col),
            "xdr:colOff" => self.field = Some(Field::ColOff),
            "xdr:row" => self.field = Some(Field::Row),
            "xdr:rowOff" => self.field = Some(Field::RowOff),
            _ => self.field = None,
        }
        self.text.clear();
        true
    }

    fn parse_text(&mut self, text: &str) {
        if self.field.is_some() {
            self.text.push_str(text);
        }
    }

    fn parse_close(&mut self, name: &str) -> bool {
        if name == self.tag {
            self.model = Some(AnchorPoint::new(
                CellRef::new(self.row, self.col),
                CellOffset::new(self.col_off, self.row_off),
            ));
            return false;
        }

        let text = self.text.trim();
        match self.field.take() {
            Some(Field::Col) => self.col = text.parse().unwrap_or(0),
            Some(Field::Row) => self.row = text.parse().unwrap_or(0),
            Some(Field::ColOff) => self.col_off = text.parse().unwrap_or(0),
            Some(Field::RowOff) => self.row_off = text.parse().unwrap_or(0),
            None => {}
        }
        self.text.clear();
        true
    }

    fn take_model(&mut self) -> Option<Self::Model> {
        self.model.take()
    }
}
