//! Non-Visual Properties Transforms
//!
//! 図形の識別情報（名前・表示状態・ハイパーリンク・割り当てID）を運ぶ要素群。
//!
//! - `xdr:cNvPr`: 識別情報そのもの（[`NonVisualDrawingXform`]）
//! - `a:hlinkClick`: クリック時のハイパーリンク
//! - `a:extLst`: 呼び出し側が割り当てた図形IDの保存先
//! - `xdr:nvSpPr` / `xdr:nvCxnSpPr`: 上記を包むラッパー（[`NonVisualShapeXform`]）

use super::attributes::{parse_bool, parse_u32};
use super::simple::StaticXform;
use super::{Composite, EventHandler, ParseState, Xform};
use crate::error::XformError;
use crate::types::Hyperlinks;
use crate::xml::{Attributes, XmlNode, XmlSink};

/// 図形IDを保存する拡張要素（`a:ext`）の識別URI
pub const SHAPE_ID_EXTENSION_URI: &str = "{5C8A3E6B-2F41-4D7A-9B0E-71D3C4A8F215}";

/// 図形ID要素の名前空間
const SHAPE_ID_NAMESPACE: &str = "urn:xlsxform:shape";

/// クリック時ハイパーリンク（`a:hlinkClick`）のトランスフォーム
#[derive(Debug, Clone, Default)]
pub struct HyperlinkClickXform {
    depth: usize,
    model: Option<Hyperlinks>,
}

impl HyperlinkClickXform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for HyperlinkClickXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth > 0 {
            self.depth += 1;
            return true;
        }
        if node.name != "a:hlinkClick" {
            return false;
        }
        let attrs = &node.attributes;
        self.model = Some(Hyperlinks {
            r_id: attrs.get("r:id").unwrap_or_default().to_string(),
            tooltip: attrs.get("tooltip").map(str::to_string),
        });
        self.depth = 1;
        true
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }
}

impl Xform for HyperlinkClickXform {
    type Model = Hyperlinks;

    fn tag(&self) -> &str {
        "a:hlinkClick"
    }

    fn render(&self, sink: &mut XmlSink, model: &Hyperlinks) -> Result<(), XformError> {
        let attrs = Attributes::new()
            .with("r:id", model.r_id.as_str())
            .with_opt("tooltip", model.tooltip.as_deref());
        sink.leaf_element(self.tag(), &attrs)
    }

    fn model(&self) -> Option<&Hyperlinks> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Hyperlinks> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.model = None;
    }
}

/// 拡張リスト（`a:extLst`）のトランスフォーム
///
/// 自分の拡張（[`SHAPE_ID_EXTENSION_URI`]）内の`shapeId`要素だけを読み、
/// それ以外の拡張（`a16:creationId`など）は読み飛ばします。
#[derive(Debug, Clone, Default)]
pub struct ExtensionListXform {
    depth: usize,
    /// 自分の拡張の内側にいるか
    in_shape_extension: bool,
    model: Option<String>,
}

impl ExtensionListXform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for ExtensionListXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth == 0 {
            if node.name != "a:extLst" {
                return false;
            }
            self.depth = 1;
            self.in_shape_extension = false;
            return true;
        }

        self.depth += 1;
        match self.depth {
            2 if node.name == "a:ext" => {
                self.in_shape_extension =
                    node.attributes.get("uri") == Some(SHAPE_ID_EXTENSION_URI);
            }
            3 if self.in_shape_extension && node.local_name() == "shapeId" => {
                self.model = node.attributes.get_non_empty("val").map(str::to_string);
            }
            _ => {}
        }
        true
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        if self.depth == 2 {
            self.in_shape_extension = false;
        }
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }
}

impl Xform for ExtensionListXform {
    type Model = String;

    fn tag(&self) -> &str {
        "a:extLst"
    }

    fn render(&self, sink: &mut XmlSink, model: &String) -> Result<(), XformError> {
        sink.open_element(self.tag(), &Attributes::new())?;
        sink.open_element(
            "a:ext",
            &Attributes::new().with("uri", SHAPE_ID_EXTENSION_URI),
        )?;
        sink.leaf_element(
            "xsh:shapeId",
            &Attributes::new()
                .with("xmlns:xsh", SHAPE_ID_NAMESPACE)
                .with("val", model.as_str()),
        )?;
        sink.close_element()?;
        sink.close_element()
    }

    fn model(&self) -> Option<&String> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<String> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.in_shape_extension = false;
        self.model = None;
    }
}

/// 識別情報のモデル
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonVisualModel {
    /// 描画パート内の通し番号（レンダリング準備で`位置 + 1`が割り当てられる）
    pub index: Option<u32>,
    pub name: Option<String>,
    /// 表示状態（パース時、`hidden`属性がなければ`Some(true)`）
    pub visible: Option<bool>,
    pub hyperlinks: Option<Hyperlinks>,
    /// 呼び出し側が割り当てた図形ID
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawingChild {
    Hyperlink,
    Extensions,
}

/// 識別情報（`xdr:cNvPr`）のトランスフォーム
///
/// - `id`はレンダリング準備で割り当てた通し番号
/// - `name`がない場合は`"Shape {id}"`（画像の場合は`"Picture {id}"`）
/// - `hidden="1"`は非表示が明示された場合のみ出力
#[derive(Debug, Clone)]
pub struct NonVisualDrawingXform {
    is_picture: bool,
    state: ParseState<DrawingChild>,
    hyperlink: HyperlinkClickXform,
    extensions: ExtensionListXform,
    model: Option<NonVisualModel>,
}

impl NonVisualDrawingXform {
    pub fn new(is_picture: bool) -> Self {
        Self {
            is_picture,
            state: ParseState::Idle,
            hyperlink: HyperlinkClickXform::new(),
            extensions: ExtensionListXform::new(),
            model: None,
        }
    }

    fn fallback_name(&self, index: u32) -> String {
        let prefix = if self.is_picture { "Picture" } else { "Shape" };
        format!("{} {}", prefix, index)
    }
}

impl Composite for NonVisualDrawingXform {
    type Key = DrawingChild;

    fn state(&mut self) -> &mut ParseState<DrawingChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == "xdr:cNvPr"
    }

    fn route(&self, name: &str) -> Option<DrawingChild> {
        match name {
            "a:hlinkClick" => Some(DrawingChild::Hyperlink),
            "a:extLst" => Some(DrawingChild::Extensions),
            _ => None,
        }
    }

    fn child(&mut self, key: DrawingChild) -> &mut dyn EventHandler {
        match key {
            DrawingChild::Hyperlink => &mut self.hyperlink,
            DrawingChild::Extensions => &mut self.extensions,
        }
    }

    fn begin(&mut self, node: &XmlNode) {
        self.hyperlink.reset();
        self.extensions.reset();
        let attrs = &node.attributes;
        self.model = Some(NonVisualModel {
            index: attrs.get("id").and_then(parse_u32),
            name: attrs.get("name").map(str::to_string),
            visible: Some(attrs.get("hidden").map_or(true, |hidden| !parse_bool(hidden))),
            hyperlinks: None,
            id: None,
        });
    }

    fn child_done(&mut self, key: DrawingChild) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        match key {
            DrawingChild::Hyperlink => model.hyperlinks = self.hyperlink.take_model(),
            DrawingChild::Extensions => {
                if let Some(id) = self.extensions.take_model() {
                    model.id = Some(id);
                }
            }
        }
    }
}

impl EventHandler for NonVisualDrawingXform {
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

impl Xform for NonVisualDrawingXform {
    type Model = NonVisualModel;

    fn tag(&self) -> &str {
        "xdr:cNvPr"
    }

    fn render(&self, sink: &mut XmlSink, model: &NonVisualModel) -> Result<(), XformError> {
        let index = model.index.unwrap_or_else(|| {
            log::warn!("rendering non-visual properties before index preparation");
            0
        });
        let name = match &model.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.fallback_name(index),
        };
        let attrs = Attributes::new()
            .with("id", index.to_string())
            .with("name", name)
            .with_opt("hidden", (model.visible == Some(false)).then_some("1"));

        if model.hyperlinks.is_none() && model.id.is_none() {
            return sink.leaf_element(self.tag(), &attrs);
        }
        sink.open_element(self.tag(), &attrs)?;
        if let Some(hyperlinks) = &model.hyperlinks {
            self.hyperlink.render(sink, hyperlinks)?;
        }
        if let Some(id) = &model.id {
            self.extensions.render(sink, id)?;
        }
        sink.close_element()
    }

    fn model(&self) -> Option<&NonVisualModel> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<NonVisualModel> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.hyperlink.reset();
        self.extensions.reset();
        self.model = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WrapperChild {
    Drawing,
    Properties,
}

/// 識別情報のラッパー（`xdr:nvSpPr` / `xdr:nvCxnSpPr`）のトランスフォーム
///
/// 要素名と、固定の子要素（`xdr:cNvSpPr` / `xdr:cNvCxnSpPr`）の名前を設定値として受け取ります。
#[derive(Debug, Clone)]
pub struct NonVisualShapeXform {
    tag: String,
    state: ParseState<WrapperChild>,
    drawing: NonVisualDrawingXform,
    properties: StaticXform,
    model: Option<NonVisualModel>,
}

impl NonVisualShapeXform {
    pub fn new(tag: &str, properties_tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            state: ParseState::Idle,
            drawing: NonVisualDrawingXform::new(false),
            properties: StaticXform::new(properties_tag),
            model: None,
        }
    }

    /// 図形用（`xdr:nvSpPr`）
    pub fn shape() -> Self {
        Self::new("xdr:nvSpPr", "xdr:cNvSpPr")
    }

    /// コネクタ用（`xdr:nvCxnSpPr`）
    pub fn connector() -> Self {
        Self::new("xdr:nvCxnSpPr", "xdr:cNvCxnSpPr")
    }
}

impl Composite for NonVisualShapeXform {
    type Key = WrapperChild;

    fn state(&mut self) -> &mut ParseState<WrapperChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == self.tag
    }

    fn route(&self, name: &str) -> Option<WrapperChild> {
        if name == "xdr:cNvPr" {
            Some(WrapperChild::Drawing)
        } else if name == self.properties.tag() {
            Some(WrapperChild::Properties)
        } else {
            None
        }
    }

    fn child(&mut self, key: WrapperChild) -> &mut dyn EventHandler {
        match key {
            WrapperChild::Drawing => &mut self.drawing,
            WrapperChild::Properties => &mut self.properties,
        }
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.drawing.reset();
        self.properties.reset();
        self.model = Some(NonVisualModel::default());
    }

    fn child_done(&mut self, key: WrapperChild) {
        match key {
            WrapperChild::Drawing => {
                if let Some(drawing) = self.drawing.take_model() {
                    self.model = Some(drawing);
                }
            }
            WrapperChild::Properties => {
                self.properties.take_model();
            }
        }
    }
}

impl EventHandler for NonVisualShapeXform {
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

impl Xform for NonVisualShapeXform {
    type Model = NonVisualModel;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn render(&self, sink: &mut XmlSink, model: &NonVisualModel) -> Result<(), XformError> {
        sink.open_element(&self.tag, &Attributes::new())?;
        self.drawing.render(sink, model)?;
        self.properties.render_static(sink)?;
        sink.close_element()
    }

    fn model(&self) -> Option<&NonVisualModel> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<NonVisualModel> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.drawing.reset();
        self.properties.reset();
        self.model = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xform::{parse_str, render_to_string};

    fn model(index: u32) -> NonVisualModel {
        NonVisualModel {
            index: Some(index),
            ..NonVisualModel::default()
        }
    }

    #[test]
    fn test_fallback_names() {
        let shape = NonVisualDrawingXform::new(false);
        let picture = NonVisualDrawingXform::new(true);
        assert_eq!(
            render_to_string(&shape, &model(3)).unwrap(),
            r#"<xdr:cNvPr id="3" name="Shape 3"/>"#
        );
        assert_eq!(
            render_to_string(&picture, &model(3)).unwrap(),
            r#"<xdr:cNvPr id="3" name="Picture 3"/>"#
        );
    }

    #[test]
    fn test_hidden_only_when_explicitly_invisible() {
        let xform = NonVisualDrawingXform::new(false);
        let mut visible = model(1);
        visible.visible = Some(true);
        assert!(!render_to_string(&xform, &visible).unwrap().contains("hidden"));
        assert!(!render_to_string(&xform, &model(1)).unwrap().contains("hidden"));

        let mut hidden = model(1);
        hidden.visible = Some(false);
        assert!(render_to_string(&xform, &hidden)
            .unwrap()
            .contains(r#"hidden="1""#));
    }

    #[test]
    fn test_parse_visibility() {
        let mut xform = NonVisualDrawingXform::new(false);
        let parsed = |xform: &mut NonVisualDrawingXform, xml: &str| {
            parse_str(xform, xml).unwrap().unwrap().visible
        };
        assert_eq!(parsed(&mut xform, r#"<xdr:cNvPr id="2" name="a"/>"#), Some(true));
        assert_eq!(
            parsed(&mut xform, r#"<xdr:cNvPr id="2" name="a" hidden="1"/>"#),
            Some(false)
        );
        assert_eq!(
            parsed(&mut xform, r#"<xdr:cNvPr id="2" name="a" hidden="true"/>"#),
            Some(false)
        );
        assert_eq!(
            parsed(&mut xform, r#"<xdr:cNvPr id="2" name="a" hidden="0"/>"#),
            Some(true)
        );
    }

    #[test]
    fn test_hyperlink_and_id_round_trip() {
        let mut xform = NonVisualDrawingXform::new(false);
        let original = NonVisualModel {
            index: Some(4),
            name: Some("直線コネクタ 2".to_string()),
            visible: Some(false),
            hyperlinks: Some(Hyperlinks {
                r_id: "rId1".to_string(),
                tooltip: Some("go".to_string()),
            }),
            id: Some("line-01".to_string()),
        };
        let xml = render_to_string(&xform, &original).unwrap();
        assert!(xml.contains(SHAPE_ID_EXTENSION_URI));
        assert_eq!(parse_str(&mut xform, &xml).unwrap(), Some(original));
    }

    #[test]
    fn test_foreign_extensions_are_ignored() {
        let mut xform = ExtensionListXform::new();
        let xml = concat!(
            r#"<a:extLst><a:ext uri="{FF2B5EF4-FFF2-40B4-BE49-F238E27FC236}">"#,
            r#"<a16:creationId xmlns:a16="http://schemas.microsoft.com/office/drawing/2014/main" id="{0}"/>"#,
            r#"<shapeId val="not-ours"/></a:ext></a:extLst>"#
        );
        assert_eq!(parse_str(&mut xform, xml).unwrap(), None);
    }

    #[test]
    fn test_wrapper_folds_identity() {
        let mut xform = NonVisualShapeXform::connector();
        let model = parse_str(
            &mut xform,
            concat!(
                r#"<xdr:nvCxnSpPr><xdr:cNvPr id="3" name="直線コネクタ 2"><a:extLst/></xdr:cNvPr>"#,
                r#"<xdr:cNvCxnSpPr><a:cxnSpLocks/></xdr:cNvCxnSpPr></xdr:nvCxnSpPr>"#
            ),
        )
        .unwrap()
        .unwrap();
        assert_eq!(model.name.as_deref(), Some("直線コネクタ 2"));
        assert_eq!(model.visible, Some(true));
        assert_eq!(model.id, None);
    }

    #[test]
    fn test_wrapper_render() {
        let xform = NonVisualShapeXform::shape();
        assert_eq!(
            render_to_string(&xform, &model(1)).unwrap(),
            r#"<xdr:nvSpPr><xdr:cNvPr id="1" name="Shape 1"/><xdr:cNvSpPr/></xdr:nvSpPr>"#
        );
    }
}
