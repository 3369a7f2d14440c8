//! Outline Transform
//!
//! 図形の枠線（`a:ln`）。太さ・色・破線・矢印を扱います。

use super::attributes::{parse_u32, AttributesXform};
use super::color::SolidFillXform;
use super::simple::StaticXform;
use super::{Composite, EventHandler, ParseState, Xform};
use crate::error::XformError;
use crate::types::{Arrow, ArrowEnd, Outline};
use crate::xml::{Attributes, XmlNode, XmlSink};

const TAG: &str = "a:ln";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutlineChild {
    Fill,
    NoFill,
    Dash,
    Head,
    Tail,
}

/// 枠線のトランスフォーム
#[derive(Debug, Clone)]
pub struct OutlineXform {
    state: ParseState<OutlineChild>,
    fill: SolidFillXform,
    no_fill: StaticXform,
    dash: AttributesXform,
    head: AttributesXform,
    tail: AttributesXform,
    model: Option<Outline>,
}

impl Default for OutlineXform {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineXform {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            fill: SolidFillXform::new(),
            no_fill: StaticXform::new("a:noFill"),
            dash: AttributesXform::new("a:prstDash"),
            head: AttributesXform::new("a:headEnd"),
            tail: AttributesXform::new("a:tailEnd"),
            model: None,
        }
    }

    fn render_arrow_end(
        xform: &AttributesXform,
        sink: &mut XmlSink,
        end: &ArrowEnd,
    ) -> Result<(), XformError> {
        let attrs = Attributes::new()
            .with_opt("type", end.kind.as_deref())
            .with_opt("w", end.width.as_deref())
            .with_opt("len", end.length.as_deref());
        xform.render(sink, &attrs)
    }
}

fn arrow_end(attrs: Attributes) -> Option<ArrowEnd> {
    let end = ArrowEnd {
        kind: attrs.get_non_empty("type").map(str::to_string),
        width: attrs.get_non_empty("w").map(str::to_string),
        length: attrs.get_non_empty("len").map(str::to_string),
    };
    (!end.is_empty()).then_some(end)
}

impl Composite for OutlineXform {
    type Key = OutlineChild;

    fn state(&mut self) -> &mut ParseState<OutlineChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == TAG
    }

    fn route(&self, name: &str) -> Option<OutlineChild> {
        match name {
            "a:solidFill" => Some(OutlineChild::Fill),
            "a:noFill" => Some(OutlineChild::NoFill),
            "a:prstDash" => Some(OutlineChild::Dash),
            "a:headEnd" => Some(OutlineChild::Head),
            "a:tailEnd" => Some(OutlineChild::Tail),
            _ => None,
        }
    }

    fn child(&mut self, key: OutlineChild) -> &mut dyn EventHandler {
        match key {
            OutlineChild::Fill => &mut self.fill,
            OutlineChild::NoFill => &mut self.no_fill,
            OutlineChild::Dash => &mut self.dash,
            OutlineChild::Head => &mut self.head,
            OutlineChild::Tail => &mut self.tail,
        }
    }

    fn begin(&mut self, node: &XmlNode) {
        self.fill.reset();
        self.no_fill.reset();
        self.dash.reset();
        self.head.reset();
        self.tail.reset();
        self.model = Some(Outline {
            weight: node.attributes.get_non_empty("w").and_then(parse_u32),
            ..Outline::default()
        });
    }

    fn child_done(&mut self, key: OutlineChild) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        match key {
            OutlineChild::Fill => model.color = self.fill.take_model(),
            OutlineChild::NoFill => {
                self.no_fill.take_model();
                model.color = None;
            }
            OutlineChild::Dash => {
                model.dash = self
                    .dash
                    .take_model()
                    .and_then(|attrs| attrs.get_non_empty("val").map(str::to_string));
            }
            OutlineChild::Head => {
                if let Some(end) = self.head.take_model().and_then(arrow_end) {
                    model.arrow.get_or_insert_with(Arrow::default).head = Some(end);
                }
            }
            OutlineChild::Tail => {
                if let Some(end) = self.tail.take_model().and_then(arrow_end) {
                    model.arrow.get_or_insert_with(Arrow::default).tail = Some(end);
                }
            }
        }
    }
}

impl EventHandler for OutlineXform {
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

impl Xform for OutlineXform {
    type Model = Outline;

    fn tag(&self) -> &str {
        TAG
    }

    fn render(&self, sink: &mut XmlSink, model: &Outline) -> Result<(), XformError> {
        let attrs = Attributes::new().with_opt("w", model.weight.map(|w| w.to_string()));
        let head = model.arrow.as_ref().and_then(|arrow| arrow.head.as_ref());
        let tail = model.arrow.as_ref().and_then(|arrow| arrow.tail.as_ref());
        if model.color.is_none() && model.dash.is_none() && head.is_none() && tail.is_none() {
            return sink.leaf_element(TAG, &attrs);
        }

        sink.open_element(TAG, &attrs)?;
        if let Some(color) = &model.color {
            self.fill.render(sink, color)?;
        }
        if let Some(dash) = &model.dash {
            self.dash
                .render(sink, &Attributes::new().with("val", dash.as_str()))?;
        }
        if let Some(head) = head {
            Self::render_arrow_end(&self.head, sink, head)?;
        }
        if let Some(tail) = tail {
            Self::render_arrow_end(&self.tail, sink, tail)?;
        }
        sink.close_element()
    }

    fn model(&self) -> Option<&Outline> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Outline> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.fill.reset();
        self.no_fill.reset();
        self.dash.reset();
        self.head.reset();
        self.tail.reset();
        self.model = None;
    }
}
