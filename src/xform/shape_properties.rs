//! Shape Properties Transforms
//!
//! 図形の形状と外観（`xdr:spPr`）。回転・反転（`a:xfrm`）、
//! プリセット形状（`a:prstGeom`）、塗りつぶし、枠線を扱います。

use super::attributes::{bool_attr, parse_bool, parse_int};
use super::color::SolidFillXform;
use super::outline::OutlineXform;
use super::simple::StaticXform;
use super::{Composite, EventHandler, ParseState, Xform};
use crate::error::XformError;
use crate::types::{Fill, Outline};
use crate::xml::{Attributes, XmlNode, XmlSink};

/// 回転角の単位（1度 = 60000）
const ROTATION_UNIT: f64 = 60000.0;

/// 2次元変換（`a:xfrm`）のモデル
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform2D {
    /// 回転角（度）。0度は`None`
    pub rotation: Option<f64>,
    pub horizontal_flip: bool,
    pub vertical_flip: bool,
}

/// 2次元変換のトランスフォーム
///
/// 位置とサイズはアンカーが決めるため、`a:off` / `a:ext`は0で出力し、
/// パース時は読み飛ばします。
#[derive(Debug, Clone)]
pub struct TransformXform {
    depth: usize,
    offset: StaticXform,
    extent: StaticXform,
    model: Option<Transform2D>,
}

impl Default for TransformXform {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformXform {
    pub fn new() -> Self {
        Self {
            depth: 0,
            offset: StaticXform::new("a:off")
                .with_attribute("x", "0")
                .with_attribute("y", "0"),
            extent: StaticXform::new("a:ext")
                .with_attribute("cx", "0")
                .with_attribute("cy", "0"),
            model: None,
        }
    }
}

impl EventHandler for TransformXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth > 0 {
            self.depth += 1;
            return true;
        }
        if node.name != "a:xfrm" {
            return false;
        }
        let attrs = &node.attributes;
        let rotation = attrs
            .get("rot")
            .and_then(parse_int)
            .filter(|rot| *rot != 0)
            .map(|rot| rot as f64 / ROTATION_UNIT);
        self.model = Some(Transform2D {
            rotation,
            horizontal_flip: attrs.get("flipH").map(parse_bool).unwrap_or(false),
            vertical_flip: attrs.get("flipV").map(parse_bool).unwrap_or(false),
        });
        self.depth = 1;
        true
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }
}

impl Xform for TransformXform {
    type Model = Transform2D;

    fn tag(&self) -> &str {
        "a:xfrm"
    }

    fn render(&self, sink: &mut XmlSink, model: &Transform2D) -> Result<(), XformError> {
        let rot = model
            .rotation
            .filter(|deg| *deg != 0.0)
            .map(|deg| ((deg * ROTATION_UNIT).round() as i64).to_string());
        let attrs = Attributes::new()
            .with_opt("rot", rot)
            .with_opt("flipH", model.horizontal_flip.then(|| bool_attr(true)))
            .with_opt("flipV", model.vertical_flip.then(|| bool_attr(true)));
        sink.open_element(self.tag(), &attrs)?;
        self.offset.render_static(sink)?;
        self.extent.render_static(sink)?;
        sink.close_element()
    }

    fn model(&self) -> Option<&Transform2D> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Transform2D> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.model = None;
    }
}

/// プリセット形状（`a:prstGeom`）のトランスフォーム
///
/// モデルはプリセット名（例: `rect`、`line`）。調整値（`a:avLst`）は保持しません。
#[derive(Debug, Clone)]
pub struct PresetGeometryXform {
    depth: usize,
    adjustments: StaticXform,
    model: Option<String>,
}

impl Default for PresetGeometryXform {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetGeometryXform {
    pub fn new() -> Self {
        Self {
            depth: 0,
            adjustments: StaticXform::new("a:avLst"),
            model: None,
        }
    }
}

impl EventHandler for PresetGeometryXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth > 0 {
            self.depth += 1;
            return true;
        }
        if node.name != "a:prstGeom" {
            return false;
        }
        self.model = node.attributes.get_non_empty("prst").map(str::to_string);
        self.depth = 1;
        true
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }
}

impl Xform for PresetGeometryXform {
    type Model = String;

    fn tag(&self) -> &str {
        "a:prstGeom"
    }

    fn render(&self, sink: &mut XmlSink, model: &String) -> Result<(), XformError> {
        sink.open_element(self.tag(), &Attributes::new().with("prst", model.as_str()))?;
        self.adjustments.render_static(sink)?;
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
        self.model = None;
    }
}

/// `xdr:spPr`から読み取った形状と外観
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePropertiesModel {
    /// プリセット形状名
    pub kind: Option<String>,
    pub transform: Transform2D,
    pub fill: Option<Fill>,
    pub outline: Option<Outline>,
    /// 明示的な「塗りつぶしなし」（`a:noFill`）
    ///
    /// 図形の確定時に、スタイル由来の塗りつぶしも含めて`fill`を取り除きます。
    pub no_fill: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpPrChild {
    Transform,
    Geometry,
    Fill,
    NoFill,
    Outline,
}

/// 図形のプロパティ（`xdr:spPr`）のトランスフォーム
#[derive(Debug, Clone)]
pub struct ShapePropertiesXform {
    state: ParseState<SpPrChild>,
    transform: TransformXform,
    geometry: PresetGeometryXform,
    fill: SolidFillXform,
    no_fill: StaticXform,
    outline: OutlineXform,
    model: Option<ShapePropertiesModel>,
}

impl Default for ShapePropertiesXform {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapePropertiesXform {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            transform: TransformXform::new(),
            geometry: PresetGeometryXform::new(),
            fill: SolidFillXform::new(),
            no_fill: StaticXform::new("a:noFill"),
            outline: OutlineXform::new(),
            model: None,
        }
    }

    fn reset_children(&mut self) {
        self.transform.reset();
        self.geometry.reset();
        self.fill.reset();
        self.no_fill.reset();
        self.outline.reset();
    }
}

impl Composite for ShapePropertiesXform {
    type Key = SpPrChild;

    fn state(&mut self) -> &mut ParseState<SpPrChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == "xdr:spPr"
    }

    fn route(&self, name: &str) -> Option<SpPrChild> {
        match name {
            "a:xfrm" => Some(SpPrChild::Transform),
            "a:prstGeom" => Some(SpPrChild::Geometry),
            "a:solidFill" => Some(SpPrChild::Fill),
            "a:noFill" => Some(SpPrChild::NoFill),
            "a:ln" => Some(SpPrChild::Outline),
            _ => None,
        }
    }

    fn child(&mut self, key: SpPrChild) -> &mut dyn EventHandler {
        match key {
            SpPrChild::Transform => &mut self.transform,
            SpPrChild::Geometry => &mut self.geometry,
            SpPrChild::Fill => &mut self.fill,
            SpPrChild::NoFill => &mut self.no_fill,
            SpPrChild::Outline => &mut self.outline,
        }
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.reset_children();
        self.model = Some(ShapePropertiesModel::default());
    }

    fn child_done(&mut self, key: SpPrChild) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        match key {
            SpPrChild::Transform => {
                if let Some(transform) = self.transform.take_model() {
                    model.transform = transform;
                }
            }
            SpPrChild::Geometry => model.kind = self.geometry.take_model(),
            SpPrChild::Fill => model.fill = self.fill.take_model().map(Fill::solid),
            SpPrChild::NoFill => model.no_fill = self.no_fill.take_model().is_some(),
            SpPrChild::Outline => model.outline = self.outline.take_model(),
        }
    }
}

impl EventHandler for ShapePropertiesXform {
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

impl Xform for ShapePropertiesXform {
    type Model = ShapePropertiesModel;

    fn tag(&self) -> &str {
        "xdr:spPr"
    }

    fn render(&self, sink: &mut XmlSink, model: &ShapePropertiesModel) -> Result<(), XformError> {
        sink.open_element(self.tag(), &Attributes::new())?;
        self.transform.render(sink, &model.transform)?;
        match &model.kind {
            Some(kind) => self.geometry.render(sink, kind)?,
            None => log::debug!("shape without preset geometry"),
        }
        if let Some(fill) = &model.fill {
            self.fill.render(sink, fill.color())?;
        } else if model.no_fill {
            self.no_fill.render_static(sink)?;
        }
        if let Some(outline) = &model.outline {
            self.outline.render(sink, outline)?;
        }
        sink.close_element()
    }

    fn model(&self) -> Option<&ShapePropertiesModel> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<ShapePropertiesModel> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.reset_children();
        self.model = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use crate::xform::{parse_str, render_to_string};

    #[test]
    fn test_transform_render_rotation_and_flips() {
        let xform = TransformXform::new();
        let transform = Transform2D {
            rotation: Some(180.0),
            horizontal_flip: true,
            vertical_flip: false,
        };
        assert_eq!(
            render_to_string(&xform, &transform).unwrap(),
            r#"<a:xfrm rot="10800000" flipH="1"><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></a:xfrm>"#
        );
    }

    #[test]
    fn test_transform_parse() {
        let mut xform = TransformXform::new();
        let transform = parse_str(
            &mut xform,
            r#"<a:xfrm rot="5400000" flipV="1"><a:off x="10" y="20"/></a:xfrm>"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(transform.rotation, Some(90.0));
        assert!(!transform.horizontal_flip);
        assert!(transform.vertical_flip);
    }

    #[test]
    fn test_transform_zero_rotation_is_absent() {
        let mut xform = TransformXform::new();
        let transform = parse_str(&mut xform, r#"<a:xfrm rot="0" flipH="0"/>"#)
            .unwrap()
            .unwrap();
        assert_eq!(transform, Transform2D::default());
    }

    #[test]
    fn test_preset_geometry_round_trip() {
        let mut xform = PresetGeometryXform::new();
        let xml = render_to_string(&xform, &"line".to_string()).unwrap();
        assert_eq!(xml, r#"<a:prstGeom prst="line"><a:avLst/></a:prstGeom>"#);
        assert_eq!(parse_str(&mut xform, &xml).unwrap().as_deref(), Some("line"));
    }

    #[test]
    fn test_shape_properties_round_trip() {
        let mut xform = ShapePropertiesXform::new();
        let model = ShapePropertiesModel {
            kind: Some("rect".to_string()),
            transform: Transform2D {
                rotation: Some(180.0),
                horizontal_flip: true,
                vertical_flip: false,
            },
            fill: Some(Fill::solid(Color::rgb("AABBCC"))),
            outline: Some(Outline {
                weight: Some(9525),
                ..Outline::default()
            }),
            no_fill: false,
        };
        let xml = render_to_string(&xform, &model).unwrap();
        assert_eq!(parse_str(&mut xform, &xml).unwrap(), Some(model));
    }

    #[test]
    fn test_shape_properties_no_fill_flag() {
        let mut xform = ShapePropertiesXform::new();
        let model = parse_str(
            &mut xform,
            r#"<xdr:spPr><a:prstGeom prst="line"/><a:noFill/></xdr:spPr>"#,
        )
        .unwrap()
        .unwrap();
        assert!(model.no_fill);
        assert!(model.fill.is_none());
        assert_eq!(
            render_to_string(&xform, &model).unwrap(),
            concat!(
                r#"<xdr:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></a:xfrm>"#,
                r#"<a:prstGeom prst="line"><a:avLst/></a:prstGeom><a:noFill/></xdr:spPr>"#
            )
        );
    }

    #[test]
    fn test_shape_properties_reset_between_occurrences() {
        let mut xform = ShapePropertiesXform::new();
        parse_str(
            &mut xform,
            r#"<xdr:spPr><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></xdr:spPr>"#,
        )
        .unwrap();
        let second = parse_str(&mut xform, r#"<xdr:spPr><a:prstGeom prst="rect"/></xdr:spPr>"#)
            .unwrap()
            .unwrap();
        assert!(second.fill.is_none());
        assert_eq!(second.kind.as_deref(), Some("rect"));
    }
}
