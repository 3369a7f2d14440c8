//! Shape Transform
//!
//! 図形（`xdr:sp`）とコネクタ（`xdr:cxnSp`）の複合トランスフォーム。
//! 両者は要素名と識別情報ラッパーが異なるだけなので、[`ShapeKind`]で構成を切り替えます。
//!
//! # 確定時の優先順位
//!
//! 1. スタイル（`xdr:style`）由来の`fill` / `outline`
//! 2. `xdr:spPr`の明示的な値で上書き
//! 3. テキストボディ
//! 4. `a:noFill`があれば`fill`を削除
//! 5. 識別情報（`name` / `visible` / `hyperlinks` / `id`）は定義されている場合のみコピー

use super::non_visual::{NonVisualModel, NonVisualShapeXform};
use super::shape_properties::{ShapePropertiesModel, ShapePropertiesXform, Transform2D};
use super::style::{ShapeStyleXform, StyleModel};
use super::text_body::TextBodyXform;
use super::{Composite, EventHandler, ParseState, Xform};
use crate::error::XformError;
use crate::shape::ShapeProps;
use crate::types::Hyperlinks;
use crate::xml::{Attributes, XmlNode, XmlSink};

/// 図形要素の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    /// `xdr:sp`
    #[default]
    Shape,
    /// `xdr:cxnSp`
    Connector,
}

impl ShapeKind {
    /// プリセット形状名から要素の種類を決める
    ///
    /// `line`と`*Connector*`系のプリセットはコネクタとして出力します。
    pub fn for_preset(preset: Option<&str>) -> Self {
        match preset {
            Some(preset) if preset == "line" || preset.contains("Connector") => {
                ShapeKind::Connector
            }
            _ => ShapeKind::Shape,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ShapeKind::Shape => "xdr:sp",
            ShapeKind::Connector => "xdr:cxnSp",
        }
    }

    fn non_visual(&self) -> NonVisualShapeXform {
        match self {
            ShapeKind::Shape => NonVisualShapeXform::shape(),
            ShapeKind::Connector => NonVisualShapeXform::connector(),
        }
    }
}

/// 図形要素のモデル
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpModel {
    /// 描画パート内の通し番号（`位置 + 1`）
    pub index: Option<u32>,
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub props: ShapeProps,
    pub hyperlinks: Option<Hyperlinks>,
    pub id: Option<String>,
}

impl SpModel {
    fn non_visual(&self) -> NonVisualModel {
        NonVisualModel {
            index: self.index,
            name: self.name.clone(),
            visible: self.visible,
            hyperlinks: self.hyperlinks.clone(),
            id: self.id.clone(),
        }
    }

    fn shape_properties(&self) -> ShapePropertiesModel {
        ShapePropertiesModel {
            kind: self.props.kind.clone(),
            transform: Transform2D {
                rotation: self.props.rotation,
                horizontal_flip: self.props.horizontal_flip,
                vertical_flip: self.props.vertical_flip,
            },
            fill: self.props.fill.clone(),
            outline: self.props.outline.clone(),
            no_fill: false,
        }
    }

    fn style(&self) -> StyleModel {
        StyleModel {
            fill: self.props.fill.clone(),
            outline: self.props.outline.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShapeChild {
    NonVisual,
    Properties,
    Style,
    TextBody,
}

/// 図形要素（`xdr:sp` / `xdr:cxnSp`）のトランスフォーム
#[derive(Debug, Clone)]
pub struct ShapeXform {
    kind: ShapeKind,
    state: ParseState<ShapeChild>,
    non_visual: NonVisualShapeXform,
    properties: ShapePropertiesXform,
    style: ShapeStyleXform,
    text_body: TextBodyXform,
    // 子から畳み込んだ途中経過（確定時に優先順位を適用する）
    parsed_non_visual: Option<NonVisualModel>,
    parsed_properties: Option<ShapePropertiesModel>,
    parsed_style: Option<StyleModel>,
    model: Option<SpModel>,
}

impl ShapeXform {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            state: ParseState::Idle,
            non_visual: kind.non_visual(),
            properties: ShapePropertiesXform::new(),
            style: ShapeStyleXform::new(),
            text_body: TextBodyXform::new(),
            parsed_non_visual: None,
            parsed_properties: None,
            parsed_style: None,
            model: None,
        }
    }

    pub fn shape() -> Self {
        Self::new(ShapeKind::Shape)
    }

    pub fn connector() -> Self {
        Self::new(ShapeKind::Connector)
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn reset_children(&mut self) {
        self.non_visual.reset();
        self.properties.reset();
        self.style.reset();
        self.text_body.reset();
        self.parsed_non_visual = None;
        self.parsed_properties = None;
        self.parsed_style = None;
    }
}

impl Composite for ShapeXform {
    type Key = ShapeChild;

    fn state(&mut self) -> &mut ParseState<ShapeChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == self.kind.tag()
    }

    fn route(&self, name: &str) -> Option<ShapeChild> {
        if name == self.non_visual.tag() {
            return Some(ShapeChild::NonVisual);
        }
        match name {
            "xdr:spPr" => Some(ShapeChild::Properties),
            "xdr:style" => Some(ShapeChild::Style),
            "xdr:txBody" => Some(ShapeChild::TextBody),
            _ => None,
        }
    }

    fn child(&mut self, key: ShapeChild) -> &mut dyn EventHandler {
        match key {
            ShapeChild::NonVisual => &mut self.non_visual,
            ShapeChild::Properties => &mut self.properties,
            ShapeChild::Style => &mut self.style,
            ShapeChild::TextBody => &mut self.text_body,
        }
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.reset_children();
        self.model = Some(SpModel::default());
    }

    fn child_done(&mut self, key: ShapeChild) {
        match key {
            ShapeChild::NonVisual => self.parsed_non_visual = self.non_visual.take_model(),
            ShapeChild::Properties => self.parsed_properties = self.properties.take_model(),
            ShapeChild::Style => self.parsed_style = self.style.take_model(),
            ShapeChild::TextBody => {
                if let Some(model) = self.model.as_mut() {
                    model.props.text_body = self.text_body.take_model();
                }
            }
        }
    }

    fn finish(&mut self) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let props = &mut model.props;

        if let Some(style) = self.parsed_style.take() {
            props.fill = style.fill;
            props.outline = style.outline;
        }

        let mut no_fill = false;
        if let Some(properties) = self.parsed_properties.take() {
            props.kind = properties.kind;
            props.rotation = properties.transform.rotation;
            props.horizontal_flip = properties.transform.horizontal_flip;
            props.vertical_flip = properties.transform.vertical_flip;
            if properties.fill.is_some() {
                props.fill = properties.fill;
            }
            if properties.outline.is_some() {
                props.outline = properties.outline;
            }
            no_fill = properties.no_fill;
        }

        if no_fill {
            props.fill = None;
        }

        if let Some(identity) = self.parsed_non_visual.take() {
            if identity.index.is_some() {
                model.index = identity.index;
            }
            if identity.name.is_some() {
                model.name = identity.name;
            }
            if identity.visible.is_some() {
                model.visible = identity.visible;
            }
            if identity.hyperlinks.is_some() {
                model.hyperlinks = identity.hyperlinks;
            }
            if identity.id.is_some() {
                model.id = identity.id;
            }
        }
    }
}

impl EventHandler for ShapeXform {
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

impl Xform for ShapeXform {
    type Model = SpModel;

    fn tag(&self) -> &str {
        self.kind.tag()
    }

    fn render(&self, sink: &mut XmlSink, model: &SpModel) -> Result<(), XformError> {
        let mut attrs = Attributes::new().with("macro", "");
        if self.kind == ShapeKind::Shape {
            attrs.insert("textlink", "");
        }
        sink.open_element(self.tag(), &attrs)?;
        self.non_visual.render(sink, &model.non_visual())?;
        self.properties.render(sink, &model.shape_properties())?;
        self.style.render(sink, &model.style())?;
        if let Some(text_body) = &model.props.text_body {
            self.text_body.render(sink, text_body)?;
        }
        sink.close_element()
    }

    fn model(&self) -> Option<&SpModel> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<SpModel> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.reset_children();
        self.model = None;
    }
}
