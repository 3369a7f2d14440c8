//! Color Transforms
//!
//! `a:schemeClr` / `a:srgbClr`と、それを包む`a:solidFill`。

use super::{Composite, EventHandler, ParseState, Xform};
use crate::error::XformError;
use crate::types::Color;
use crate::xml::{Attributes, XmlNode, XmlSink};

const SCHEME_TAG: &str = "a:schemeClr";
const RGB_TAG: &str = "a:srgbClr";
const SOLID_FILL_TAG: &str = "a:solidFill";

/// 色要素のトランスフォーム
///
/// テーマカラー（`a:schemeClr`）とRGBカラー（`a:srgbClr`）の両方を扱います。
/// `a:lumMod`などの色調整の子要素は読み飛ばします。
#[derive(Debug, Clone, Default)]
pub struct ColorXform {
    depth: usize,
    model: Option<Color>,
}

impl ColorXform {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn handles(name: &str) -> bool {
        name == SCHEME_TAG || name == RGB_TAG
    }
}

impl EventHandler for ColorXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth > 0 {
            self.depth += 1;
            return true;
        }
        let value = node.attributes.get("val").unwrap_or_default().to_string();
        self.model = match node.name.as_str() {
            SCHEME_TAG => Some(Color::Theme(value)),
            RGB_TAG => Some(Color::Rgb(value)),
            _ => return false,
        };
        self.depth = 1;
        true
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }
}

impl Xform for ColorXform {
    type Model = Color;

    fn tag(&self) -> &str {
        match self.model {
            Some(Color::Rgb(_)) => RGB_TAG,
            _ => SCHEME_TAG,
        }
    }

    fn render(&self, sink: &mut XmlSink, model: &Color) -> Result<(), XformError> {
        let (tag, value) = match model {
            Color::Theme(value) => (SCHEME_TAG, value),
            Color::Rgb(value) => (RGB_TAG, value),
        };
        sink.leaf_element(tag, &Attributes::new().with("val", value.as_str()))
    }

    fn model(&self) -> Option<&Color> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Color> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.model = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FillChild {
    Color,
}

/// 単色塗りつぶし（`a:solidFill`）のトランスフォーム
///
/// 塗りつぶし・線・文字色のいずれにも使われるため、モデルは色そのものです。
#[derive(Debug, Clone, Default)]
pub struct SolidFillXform {
    state: ParseState<FillChild>,
    color: ColorXform,
    model: Option<Color>,
}

impl SolidFillXform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Composite for SolidFillXform {
    type Key = FillChild;

    fn state(&mut self) -> &mut ParseState<FillChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == SOLID_FILL_TAG
    }

    fn route(&self, name: &str) -> Option<FillChild> {
        ColorXform::handles(name).then_some(FillChild::Color)
    }

    fn child(&mut self, _key: FillChild) -> &mut dyn EventHandler {
        &mut self.color
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.color.reset();
        self.model = None;
    }

    fn child_done(&mut self, _key: FillChild) {
        self.model = self.color.take_model();
    }
}

impl EventHandler for SolidFillXform {
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

impl Xform for SolidFillXform {
    type Model = Color;

    fn tag(&self) -> &str {
        SOLID_FILL_TAG
    }

    fn render(&self, sink: &mut XmlSink, model: &Color) -> Result<(), XformError> {
        sink.open_element(SOLID_FILL_TAG, &Attributes::new())?;
        self.color.render(sink, model)?;
        sink.close_element()
    }

    fn model(&self) -> Option<&Color> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Color> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.color.reset();
        self.model = None;
    }
}
