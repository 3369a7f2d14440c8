//! Shape Style Transforms
//!
//! テーマのスタイルマトリックスへの参照（`xdr:style`）。
//! 参照インデックスが1以上で色を持つ参照は、スタイル由来の塗りつぶし・枠線として扱います。

use super::attributes::parse_int;
use super::color::ColorXform;
use super::simple::StaticXform;
use super::{Composite, EventHandler, ParseState, Xform};
use crate::error::XformError;
use crate::types::{Color, Fill, Outline};
use crate::xml::{Attributes, XmlNode, XmlSink};

/// スタイルマトリックスへの参照（`a:lnRef`など）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleReference {
    /// マトリックスのインデックス（`fontRef`では`minor` / `major`）
    pub idx: String,
    pub color: Option<Color>,
}

impl StyleReference {
    pub fn new(idx: &str, color: Option<Color>) -> Self {
        Self {
            idx: idx.to_string(),
            color,
        }
    }

    /// 実際にマトリックスを参照しているか（インデックスが1以上）
    pub fn is_active(&self) -> bool {
        parse_int(&self.idx).map_or(false, |idx| idx > 0)
    }

    /// 参照している場合の色
    fn active_color(self) -> Option<Color> {
        if self.is_active() {
            self.color
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReferenceChild {
    Color,
}

/// スタイル参照のトランスフォーム（`a:lnRef` / `a:fillRef` / `a:effectRef` / `a:fontRef`）
#[derive(Debug, Clone)]
pub struct StyleReferenceXform {
    tag: String,
    state: ParseState<ReferenceChild>,
    color: ColorXform,
    model: Option<StyleReference>,
}

impl StyleReferenceXform {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            state: ParseState::Idle,
            color: ColorXform::new(),
            model: None,
        }
    }
}

impl Composite for StyleReferenceXform {
    type Key = ReferenceChild;

    fn state(&mut self) -> &mut ParseState<ReferenceChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == self.tag
    }

    fn route(&self, name: &str) -> Option<ReferenceChild> {
        ColorXform::handles(name).then_some(ReferenceChild::Color)
    }

    fn child(&mut self, _key: ReferenceChild) -> &mut dyn EventHandler {
        &mut self.color
    }

    fn begin(&mut self, node: &XmlNode) {
        self.color.reset();
        self.model = Some(StyleReference::new(
            node.attributes.get("idx").unwrap_or("0"),
            None,
        ));
    }

    fn child_done(&mut self, _key: ReferenceChild) {
        if let Some(model) = self.model.as_mut() {
            model.color = self.color.take_model();
        }
    }
}

impl EventHandler for StyleReferenceXform {
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

impl Xform for StyleReferenceXform {
    type Model = StyleReference;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn render(&self, sink: &mut XmlSink, model: &StyleReference) -> Result<(), XformError> {
        let attrs = Attributes::new().with("idx", model.idx.as_str());
        match &model.color {
            Some(color) => {
                sink.open_element(&self.tag, &attrs)?;
                self.color.render(sink, color)?;
                sink.close_element()
            }
            None => sink.leaf_element(&self.tag, &attrs),
        }
    }

    fn model(&self) -> Option<&StyleReference> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<StyleReference> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.color.reset();
        self.model = None;
    }
}

/// スタイル由来の外観
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleModel {
    pub fill: Option<Fill>,
    pub outline: Option<Outline>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StyleChild {
    Line,
    Fill,
    Effect,
    Font,
}

/// 図形のスタイル（`xdr:style`）のトランスフォーム
///
/// 出力時は、塗りつぶし・枠線がある場合だけ`idx="1"`とその色で参照し、
/// ない場合は`idx="0"`（参照なし）とします。`effectRef`と`fontRef`は固定です。
#[derive(Debug, Clone)]
pub struct ShapeStyleXform {
    state: ParseState<StyleChild>,
    line: StyleReferenceXform,
    fill: StyleReferenceXform,
    effect: StyleReferenceXform,
    font: StaticXform,
    model: Option<StyleModel>,
}

impl Default for ShapeStyleXform {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeStyleXform {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            line: StyleReferenceXform::new("a:lnRef"),
            fill: StyleReferenceXform::new("a:fillRef"),
            effect: StyleReferenceXform::new("a:effectRef"),
            font: StaticXform::new("a:fontRef")
                .with_attribute("idx", "minor")
                .with_child(StaticXform::new("a:schemeClr").with_attribute("val", "lt1")),
            model: None,
        }
    }

    fn reset_children(&mut self) {
        self.line.reset();
        self.fill.reset();
        self.effect.reset();
        self.font.reset();
    }
}

impl Composite for ShapeStyleXform {
    type Key = StyleChild;

    fn state(&mut self) -> &mut ParseState<StyleChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == "xdr:style"
    }

    fn route(&self, name: &str) -> Option<StyleChild> {
        match name {
            "a:lnRef" => Some(StyleChild::Line),
            "a:fillRef" => Some(StyleChild::Fill),
            "a:effectRef" => Some(StyleChild::Effect),
            "a:fontRef" => Some(StyleChild::Font),
            _ => None,
        }
    }

    fn child(&mut self, key: StyleChild) -> &mut dyn EventHandler {
        match key {
            StyleChild::Line => &mut self.line,
            StyleChild::Fill => &mut self.fill,
            StyleChild::Effect => &mut self.effect,
            StyleChild::Font => &mut self.font,
        }
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.reset_children();
        self.model = Some(StyleModel::default());
    }

    fn child_done(&mut self, key: StyleChild) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        match key {
            StyleChild::Line => {
                model.outline = self
                    .line
                    .take_model()
                    .and_then(StyleReference::active_color)
                    .map(|color| Outline {
                        color: Some(color),
                        ..Outline::default()
                    });
            }
            StyleChild::Fill => {
                model.fill = self
                    .fill
                    .take_model()
                    .and_then(StyleReference::active_color)
                    .map(Fill::solid);
            }
            StyleChild::Effect => {
                self.effect.take_model();
            }
            StyleChild::Font => {
                self.font.take_model();
            }
        }
    }
}

impl EventHandler for ShapeStyleXform {
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

fn reference_for(color: Option<&Color>, present: bool) -> StyleReference {
    if present {
        StyleReference::new("1", color.cloned())
    } else {
        StyleReference::new("0", None)
    }
}

impl Xform for ShapeStyleXform {
    type Model = StyleModel;

    fn tag(&self) -> &str {
        "xdr:style"
    }

    fn render(&self, sink: &mut XmlSink, model: &StyleModel) -> Result<(), XformError> {
        let line_color = model.outline.as_ref().and_then(|o| o.color.as_ref());
        let fill_color = model.fill.as_ref().map(Fill::color);

        sink.open_element(self.tag(), &Attributes::new())?;
        self.line
            .render(sink, &reference_for(line_color, model.outline.is_some()))?;
        self.fill
            .render(sink, &reference_for(fill_color, model.fill.is_some()))?;
        self.effect.render(sink, &StyleReference::new("0", None))?;
        self.font.render_static(sink)?;
        sink.close_element()
    }

    fn model(&self) -> Option<&StyleModel> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<StyleModel> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.reset_children();
        self.model = None;
    }
}
