//! Drawing Transform
//!
//! 描画パートのルート要素（`xdr:wsDr`）。アンカーのリストを扱います。

use std::borrow::Cow;

use super::anchor::{AnchorModel, AnchorXform};
use super::{Composite, EventHandler, ParseState, Xform};
use crate::error::XformError;
use crate::xml::{Attributes, XmlNode, XmlSink};

const NS_SPREADSHEET_DRAWING: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";
const NS_DRAWING_MAIN: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawingChild {
    Anchor,
}

/// 描画パート（`xdr:wsDr`）のトランスフォーム
///
/// レンダリング前に準備処理を行い、各図形の`index`を`位置 + 1`に揃えます。
#[derive(Debug, Clone, Default)]
pub struct DrawingXform {
    state: ParseState<DrawingChild>,
    anchor: AnchorXform,
    model: Option<Vec<AnchorModel>>,
}

impl DrawingXform {
    pub fn new() -> Self {
        Self::default()
    }

    /// レンダリング準備: 図形の通し番号を割り当てる
    pub fn prepare(anchors: &mut [AnchorModel]) {
        for (position, anchor) in anchors.iter_mut().enumerate() {
            anchor.shape.index = Some(position as u32 + 1);
        }
    }
}

impl Composite for DrawingXform {
    type Key = DrawingChild;

    fn state(&mut self) -> &mut ParseState<DrawingChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == "xdr:wsDr"
    }

    fn route(&self, name: &str) -> Option<DrawingChild> {
        match name {
            "xdr:twoCellAnchor" | "xdr:oneCellAnchor" => Some(DrawingChild::Anchor),
            _ => None,
        }
    }

    fn child(&mut self, _key: DrawingChild) -> &mut dyn EventHandler {
        &mut self.anchor
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.anchor.reset();
        self.model = Some(Vec::new());
    }

    fn child_done(&mut self, _key: DrawingChild) {
        if let (Some(anchors), Some(anchor)) = (self.model.as_mut(), self.anchor.take_model()) {
            anchors.push(anchor);
        }
        self.anchor.reset();
    }
}

impl EventHandler for DrawingXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        self.open_event(node)
    }

    fn parse_text(&mut self, text: &str) {
        self.text_event(text)
    }

    fn parse_close(&mut self, name: &str) -> bool {
        self.close_event(name)
    }
}

impl Xform for DrawingXform {
    type Model = Vec<AnchorModel>;

    fn tag(&self) -> &str {
        "xdr:wsDr"
    }

    fn render(&self, sink: &mut XmlSink, model: &Vec<AnchorModel>) -> Result<(), XformError> {
        let attrs = Attributes::new()
            .with("xmlns:xdr", NS_SPREADSHEET_DRAWING)
            .with("xmlns:a", NS_DRAWING_MAIN)
            .with("xmlns:r", NS_RELATIONSHIPS);
        sink.open_element(self.tag(), &attrs)?;
        for (position, anchor) in model.iter().enumerate() {
            let index = Some(position as u32 + 1);
            let anchor = if anchor.shape.index == index {
                Cow::Borrowed(anchor)
            } else {
                let mut prepared = anchor.clone();
                prepared.shape.index = index;
                Cow::Owned(prepared)
            };
            self.anchor.render(sink, &anchor)?;
        }
        sink.close_element()
    }

    fn model(&self) -> Option<&Vec<AnchorModel>> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Vec<AnchorModel>> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.anchor.reset();
        self.model = None;
    }
}
