//! Text Body Transforms
//!
//! 図形内のテキスト（`xdr:txBody`）を段落（`a:p`）・ラン（`a:r`）・
//! 文字書式（`a:rPr`）の階層として扱うトランスフォーム群。

use super::attributes::{bool_attr, parse_bool, parse_int, AttributesXform, TextXform};
use super::color::SolidFillXform;
use super::simple::StaticXform;
use super::{Composite, EventHandler, ParseState, Xform};
use crate::api::{TextAlignment, VerticalAlignment};
use crate::error::XformError;
use crate::shape::{Paragraph, TextBody, TextRun};
use crate::types::Font;
use crate::xml::{Attributes, XmlNode, XmlSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunPropertiesChild {
    Fill,
    Latin,
}

/// 文字書式（`a:rPr`）のトランスフォーム
///
/// 文字サイズは100分の1ポイント単位（`sz="1100"` = 11pt）で出力します。
/// 書式が1つもない場合、パース結果は`None`です。
#[derive(Debug, Clone)]
pub struct RunPropertiesXform {
    state: ParseState<RunPropertiesChild>,
    fill: SolidFillXform,
    latin: AttributesXform,
    model: Option<Font>,
}

impl Default for RunPropertiesXform {
    fn default() -> Self {
        Self::new()
    }
}

impl RunPropertiesXform {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            fill: SolidFillXform::new(),
            latin: AttributesXform::new("a:latin"),
            model: None,
        }
    }
}

impl Composite for RunPropertiesXform {
    type Key = RunPropertiesChild;

    fn state(&mut self) -> &mut ParseState<RunPropertiesChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == "a:rPr"
    }

    fn route(&self, name: &str) -> Option<RunPropertiesChild> {
        match name {
            "a:solidFill" => Some(RunPropertiesChild::Fill),
            "a:latin" => Some(RunPropertiesChild::Latin),
            _ => None,
        }
    }

    fn child(&mut self, key: RunPropertiesChild) -> &mut dyn EventHandler {
        match key {
            RunPropertiesChild::Fill => &mut self.fill,
            RunPropertiesChild::Latin => &mut self.latin,
        }
    }

    fn begin(&mut self, node: &XmlNode) {
        self.fill.reset();
        self.latin.reset();
        let attrs = &node.attributes;
        self.model = Some(Font {
            size: attrs
                .get("sz")
                .and_then(parse_int)
                .map(|sz| sz as f64 / 100.0),
            bold: attrs.get("b").map(parse_bool),
            italic: attrs.get("i").map(parse_bool),
            underline: attrs.get_non_empty("u").map(str::to_string),
            ..Font::default()
        });
    }

    fn child_done(&mut self, key: RunPropertiesChild) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        match key {
            RunPropertiesChild::Fill => model.color = self.fill.take_model(),
            RunPropertiesChild::Latin => {
                model.name = self
                    .latin
                    .take_model()
                    .and_then(|attrs| attrs.get_non_empty("typeface").map(str::to_string));
            }
        }
    }

    fn finish(&mut self) {
        if self.model.as_ref().map_or(false, Font::is_empty) {
            self.model = None;
        }
    }
}

impl EventHandler for RunPropertiesXform {
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

impl Xform for RunPropertiesXform {
    type Model = Font;

    fn tag(&self) -> &str {
        "a:rPr"
    }

    fn render(&self, sink: &mut XmlSink, model: &Font) -> Result<(), XformError> {
        let attrs = Attributes::new()
            .with_opt(
                "sz",
                model
                    .size
                    .map(|size| ((size * 100.0).round() as i64).to_string()),
            )
            .with_opt("b", model.bold.map(bool_attr))
            .with_opt("i", model.italic.map(bool_attr))
            .with_opt("u", model.underline.as_deref());
        if model.color.is_none() && model.name.is_none() {
            return sink.leaf_element(self.tag(), &attrs);
        }

        sink.open_element(self.tag(), &attrs)?;
        if let Some(color) = &model.color {
            self.fill.render(sink, color)?;
        }
        if let Some(name) = &model.name {
            self.latin
                .render(sink, &Attributes::new().with("typeface", name.as_str()))?;
        }
        sink.close_element()
    }

    fn model(&self) -> Option<&Font> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Font> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.fill.reset();
        self.latin.reset();
        self.model = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunChild {
    Properties,
    Text,
}

/// テキストラン（`a:r`）のトランスフォーム
#[derive(Debug, Clone)]
pub struct RunXform {
    state: ParseState<RunChild>,
    properties: RunPropertiesXform,
    text: TextXform,
    model: Option<TextRun>,
}

impl Default for RunXform {
    fn default() -> Self {
        Self::new()
    }
}

impl RunXform {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            properties: RunPropertiesXform::new(),
            text: TextXform::new("a:t"),
            model: None,
        }
    }
}

impl Composite for RunXform {
    type Key = RunChild;

    fn state(&mut self) -> &mut ParseState<RunChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == "a:r"
    }

    fn route(&self, name: &str) -> Option<RunChild> {
        match name {
            "a:rPr" => Some(RunChild::Properties),
            "a:t" => Some(RunChild::Text),
            _ => None,
        }
    }

    fn child(&mut self, key: RunChild) -> &mut dyn EventHandler {
        match key {
            RunChild::Properties => &mut self.properties,
            RunChild::Text => &mut self.text,
        }
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.properties.reset();
        self.text.reset();
        self.model = Some(TextRun::default());
    }

    fn child_done(&mut self, key: RunChild) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        match key {
            RunChild::Properties => model.font = self.properties.take_model(),
            RunChild::Text => {
                if let Some(text) = self.text.take_model() {
                    model.text.push_str(&text);
                }
            }
        }
    }
}

impl EventHandler for RunXform {
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

impl Xform for RunXform {
    type Model = TextRun;

    fn tag(&self) -> &str {
        "a:r"
    }

    fn render(&self, sink: &mut XmlSink, model: &TextRun) -> Result<(), XformError> {
        sink.open_element(self.tag(), &Attributes::new())?;
        if let Some(font) = model.font.as_ref().filter(|font| !font.is_empty()) {
            self.properties.render(sink, font)?;
        }
        self.text.render(sink, &model.text)?;
        sink.close_element()
    }

    fn model(&self) -> Option<&TextRun> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<TextRun> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.properties.reset();
        self.text.reset();
        self.model = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParagraphChild {
    Properties,
    Run,
}

/// 段落（`a:p`）のトランスフォーム
///
/// 段落末尾の書式（`a:endParaRPr`）は保持しません。
#[derive(Debug, Clone)]
pub struct ParagraphXform {
    state: ParseState<ParagraphChild>,
    properties: AttributesXform,
    run: RunXform,
    model: Option<Paragraph>,
}

impl Default for ParagraphXform {
    fn default() -> Self {
        Self::new()
    }
}

impl ParagraphXform {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            properties: AttributesXform::new("a:pPr"),
            run: RunXform::new(),
            model: None,
        }
    }
}

impl Composite for ParagraphXform {
    type Key = ParagraphChild;

    fn state(&mut self) -> &mut ParseState<ParagraphChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == "a:p"
    }

    fn route(&self, name: &str) -> Option<ParagraphChild> {
        match name {
            "a:pPr" => Some(ParagraphChild::Properties),
            "a:r" => Some(ParagraphChild::Run),
            _ => None,
        }
    }

    fn child(&mut self, key: ParagraphChild) -> &mut dyn EventHandler {
        match key {
            ParagraphChild::Properties => &mut self.properties,
            ParagraphChild::Run => &mut self.run,
        }
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.properties.reset();
        self.run.reset();
        self.model = Some(Paragraph::default());
    }

    fn child_done(&mut self, key: ParagraphChild) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        match key {
            ParagraphChild::Properties => {
                model.alignment = self
                    .properties
                    .take_model()
                    .and_then(|attrs| attrs.get("algn").and_then(TextAlignment::from_attr));
            }
            ParagraphChild::Run => {
                if let Some(run) = self.run.take_model() {
                    model.runs.push(run);
                }
            }
        }
    }
}

impl EventHandler for ParagraphXform {
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

impl Xform for ParagraphXform {
    type Model = Paragraph;

    fn tag(&self) -> &str {
        "a:p"
    }

    fn render(&self, sink: &mut XmlSink, model: &Paragraph) -> Result<(), XformError> {
        sink.open_element(self.tag(), &Attributes::new())?;
        if let Some(alignment) = model.alignment {
            self.properties
                .render(sink, &Attributes::new().with("algn", alignment.as_str()))?;
        }
        for run in &model.runs {
            self.run.render(sink, run)?;
        }
        sink.close_element()
    }

    fn model(&self) -> Option<&Paragraph> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Paragraph> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.properties.reset();
        self.run.reset();
        self.model = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextBodyChild {
    BodyProperties,
    ListStyle,
    Paragraph,
}

/// テキストボディ（`xdr:txBody`）のトランスフォーム
///
/// `a:bodyPr`はExcelの既定値（はみ出しはクリップ、左から右）で出力し、
/// 垂直方向の配置だけを`anchor`属性として保持します。
#[derive(Debug, Clone)]
pub struct TextBodyXform {
    state: ParseState<TextBodyChild>,
    body_properties: AttributesXform,
    list_style: StaticXform,
    paragraph: ParagraphXform,
    model: Option<TextBody>,
}

impl Default for TextBodyXform {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBodyXform {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            body_properties: AttributesXform::new("a:bodyPr"),
            list_style: StaticXform::new("a:lstStyle"),
            paragraph: ParagraphXform::new(),
            model: None,
        }
    }

    fn reset_children(&mut self) {
        self.body_properties.reset();
        self.list_style.reset();
        self.paragraph.reset();
    }
}

impl Composite for TextBodyXform {
    type Key = TextBodyChild;

    fn state(&mut self) -> &mut ParseState<TextBodyChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == "xdr:txBody"
    }

    fn route(&self, name: &str) -> Option<TextBodyChild> {
        match name {
            "a:bodyPr" => Some(TextBodyChild::BodyProperties),
            "a:lstStyle" => Some(TextBodyChild::ListStyle),
            "a:p" => Some(TextBodyChild::Paragraph),
            _ => None,
        }
    }

    fn child(&mut self, key: TextBodyChild) -> &mut dyn EventHandler {
        match key {
            TextBodyChild::BodyProperties => &mut self.body_properties,
            TextBodyChild::ListStyle => &mut self.list_style,
            TextBodyChild::Paragraph => &mut self.paragraph,
        }
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.reset_children();
        self.model = Some(TextBody::default());
    }

    fn child_done(&mut self, key: TextBodyChild) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        match key {
            TextBodyChild::BodyProperties => {
                model.vert_align = self
                    .body_properties
                    .take_model()
                    .and_then(|attrs| attrs.get("anchor").and_then(VerticalAlignment::from_attr));
            }
            TextBodyChild::ListStyle => {
                self.list_style.take_model();
            }
            TextBodyChild::Paragraph => {
                if let Some(paragraph) = self.paragraph.take_model() {
                    model.paragraphs.push(paragraph);
                }
            }
        }
    }
}

impl EventHandler for TextBodyXform {
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

impl Xform for TextBodyXform {
    type Model = TextBody;

    fn tag(&self) -> &str {
        "xdr:txBody"
    }

    fn render(&self, sink: &mut XmlSink, model: &TextBody) -> Result<(), XformError> {
        let body = Attributes::new()
            .with("vertOverflow", "clip")
            .with("horzOverflow", "clip")
            .with("rtlCol", "0")
            .with_opt("anchor", model.vert_align.map(|v| v.as_str()));

        sink.open_element(self.tag(), &Attributes::new())?;
        self.body_properties.render(sink, &body)?;
        self.list_style.render_static(sink)?;
        for paragraph in &model.paragraphs {
            self.paragraph.render(sink, paragraph)?;
        }
        sink.close_element()
    }

    fn model(&self) -> Option<&TextBody> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<TextBody> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.reset_children();
        self.model = None;
    }
}
