//! Shape Entity Module
//!
//! ユーザーコードが読み書きする図形エンティティ（[`Shape`]）を定義するモジュール。
//!
//! 図形は柔軟な入力（[`ShapeDescriptor`]）から生成され、生成時・再設定時に
//! 正規形へ変換されます。正規形では省略可能なフィールドは`None`/`false`として
//! 保持され、シリアライズ時にもレンダリング時にも出力されません。

mod range;
mod text;

pub use range::{
    col_to_letter, parse_cell_ref, Anchor, CellPosition, Extent, PositionInput, RangeInput,
    EMU_PER_PIXEL,
};
pub use text::{
    Paragraph, ParagraphInput, RunInput, TextBody, TextBodyInput, TextRun,
};

use serde::{Deserialize, Serialize};

use crate::error::XformError;
use crate::types::{Arrow, Fill, Hyperlinks, Outline};

fn is_false(value: &bool) -> bool {
    !*value
}

/// 空の矢印端点と、端点を持たない矢印を取り除く
fn normalize_outline(mut outline: Outline) -> Outline {
    outline.arrow = outline.arrow.and_then(|arrow| {
        let head = arrow.head.filter(|end| !end.is_empty());
        let tail = arrow.tail.filter(|end| !end.is_empty());
        (head.is_some() || tail.is_some()).then_some(Arrow { head, tail })
    });
    outline
}

/// 図形のプロパティ（正規形）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeProps {
    /// 形状の種類（プリセット名、例: `rect`、`line`）
    ///
    /// 未指定でもエラーにはしません。
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// 回転角（度）。0度は`None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub horizontal_flip: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub vertical_flip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_body: Option<TextBody>,
}

/// 図形のプロパティの入力形式
///
/// `name` / `visible`は図形レベルで指定がない場合のフォールバックとして使われます。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropsDescriptor {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_flip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_flip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_body: Option<TextBodyInput>,
}

impl PropsDescriptor {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: Some(kind.to_string()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_horizontal_flip(mut self, flip: bool) -> Self {
        self.horizontal_flip = Some(flip);
        self
    }

    pub fn with_vertical_flip(mut self, flip: bool) -> Self {
        self.vertical_flip = Some(flip);
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn with_text_body(mut self, text_body: impl Into<TextBodyInput>) -> Self {
        self.text_body = Some(text_body.into());
        self
    }

    /// 正規形に変換（`name` / `visible`は呼び出し側が扱う）
    fn normalize(self) -> ShapeProps {
        ShapeProps {
            kind: self.kind,
            rotation: self.rotation.filter(|deg| *deg != 0.0 && deg.is_finite()),
            horizontal_flip: self.horizontal_flip.unwrap_or(false),
            vertical_flip: self.vertical_flip.unwrap_or(false),
            fill: self.fill,
            outline: self.outline.map(normalize_outline),
            text_body: self.text_body.map(TextBodyInput::normalize),
        }
    }
}

impl From<ShapeProps> for PropsDescriptor {
    fn from(props: ShapeProps) -> Self {
        Self {
            kind: props.kind,
            name: None,
            visible: None,
            rotation: props.rotation,
            horizontal_flip: props.horizontal_flip.then_some(true),
            vertical_flip: props.vertical_flip.then_some(true),
            fill: props.fill,
            outline: props.outline,
            text_body: props.text_body.map(TextBodyInput::from),
        }
    }
}

/// 図形の入力形式
///
/// # 使用例
///
/// ```rust
/// use xlsxform::shape::{Shape, ShapeDescriptor};
///
/// let descriptor = ShapeDescriptor::from_json(
///     r#"{"props": {"type": "rect", "name": "Box", "textBody": "hello"}, "range": "B2:D6"}"#,
/// )
/// .unwrap();
/// let shape = Shape::new(descriptor).unwrap();
/// assert_eq!(shape.name.as_deref(), Some("Box"));
/// assert!(shape.visible);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default)]
    pub props: PropsDescriptor,
    pub range: RangeInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlinks: Option<Hyperlinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ShapeDescriptor {
    pub fn new(props: PropsDescriptor, range: impl Into<RangeInput>) -> Self {
        Self {
            name: None,
            visible: None,
            props,
            range: range.into(),
            hyperlinks: None,
            id: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_hyperlinks(mut self, hyperlinks: Hyperlinks) -> Self {
        self.hyperlinks = Some(hyperlinks);
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// JSON文字列から読み込む
    pub fn from_json(json: &str) -> Result<Self, XformError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// 図形エンティティ（正規形）
///
/// シリアライズ結果がそのまま正規形のレコードです。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// 表示名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 表示状態（未指定の場合は`true`）
    pub visible: bool,
    pub props: ShapeProps,
    pub range: Anchor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlinks: Option<Hyperlinks>,
    /// 呼び出し側が割り当てる識別子
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Shape {
    /// 入力形式から図形を生成
    ///
    /// # 戻り値
    ///
    /// * `Err(XformError::InvalidRange)` - 配置範囲を解決できない場合
    pub fn new(descriptor: ShapeDescriptor) -> Result<Self, XformError> {
        let mut shape = Self {
            name: None,
            visible: true,
            props: ShapeProps::default(),
            range: Anchor::default(),
            hyperlinks: None,
            id: None,
        };
        shape.set_model(descriptor)?;
        Ok(shape)
    }

    /// 正規形のレコードを入力形式として返す
    ///
    /// 戻り値を[`Shape::set_model`]に渡すと同じ図形になります。
    pub fn model(&self) -> ShapeDescriptor {
        ShapeDescriptor {
            name: self.name.clone(),
            visible: Some(self.visible),
            props: self.props.clone().into(),
            range: self.range.clone().into(),
            hyperlinks: self.hyperlinks.clone(),
            id: self.id.clone(),
        }
    }

    /// 入力形式を正規化して再設定する
    ///
    /// 範囲の解決に失敗した場合、図形は変更されません。
    pub fn set_model(&mut self, descriptor: ShapeDescriptor) -> Result<(), XformError> {
        let range = descriptor.range.resolve()?;
        let ShapeDescriptor {
            name,
            visible,
            mut props,
            hyperlinks,
            id,
            ..
        } = descriptor;

        self.name = name.or_else(|| props.name.take());
        self.visible = visible.or(props.visible).unwrap_or(true);
        if props.kind.is_none() {
            log::debug!("shape descriptor without type");
        }
        self.props = props.normalize();
        self.range = range;
        self.hyperlinks = hyperlinks;
        self.id = id;
        Ok(())
    }

    /// 正規形のJSON表現
    pub fn to_json(&self) -> Result<String, XformError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EditAs;
    use crate::types::Color;
    use serde_json::json;

    #[test]
    fn test_visible_defaults_to_true() {
        let shape = Shape::new(ShapeDescriptor::new(PropsDescriptor::new("line"), "B2:D6")).unwrap();
        assert!(shape.visible);
        assert_eq!(shape.name, None);
    }

    #[test]
    fn test_empty_arrow_is_normalized_away() {
        use crate::types::{Arrow, ArrowEnd};

        let outline = Outline {
            weight: Some(12700),
            arrow: Some(Arrow {
                head: Some(ArrowEnd::default()),
                tail: None,
            }),
            ..Outline::default()
        };
        let shape = Shape::new(ShapeDescriptor::new(
            PropsDescriptor::new("line").with_outline(outline),
            "B2:D6",
        ))
        .unwrap();
        let outline = shape.props.outline.unwrap();
        assert_eq!(outline.arrow, None);
        assert_eq!(outline.weight, Some(12700));

        let tail_only = Outline {
            arrow: Some(Arrow {
                head: Some(ArrowEnd::default()),
                tail: Some(ArrowEnd {
                    kind: Some("triangle".to_string()),
                    ..ArrowEnd::default()
                }),
            }),
            ..Outline::default()
        };
        let shape = Shape::new(ShapeDescriptor::new(
            PropsDescriptor::new("line").with_outline(tail_only),
            "B2:D6",
        ))
        .unwrap();
        let arrow = shape.props.outline.unwrap().arrow.unwrap();
        assert_eq!(arrow.head, None);
        assert!(arrow.tail.is_some());
    }

    #[test]
    fn test_name_and_visible_fall_back_to_props() {
        let props = PropsDescriptor::new("line")
            .with_name("Named Line")
            .with_visible(false);
        let shape = Shape::new(ShapeDescriptor::new(props, "B2:D6")).unwrap();
        assert_eq!(shape.name.as_deref(), Some("Named Line"));
        assert!(!shape.visible);
    }

    #[test]
    fn test_top_level_name_and_visible_take_priority() {
        let props = PropsDescriptor::new("line")
            .with_name("inner")
            .with_visible(false);
        let shape = Shape::new(
            ShapeDescriptor::new(props, "B2")
                .with_name("outer")
                .with_visible(true),
        )
        .unwrap();
        assert_eq!(shape.name.as_deref(), Some("outer"));
        assert!(shape.visible);
    }

    #[test]
    fn test_falsy_props_are_omitted() {
        let props = PropsDescriptor::new("rect")
            .with_rotation(0.0)
            .with_horizontal_flip(false)
            .with_vertical_flip(false);
        let shape = Shape::new(ShapeDescriptor::new(props, "A1")).unwrap();
        assert_eq!(
            serde_json::to_value(&shape.props).unwrap(),
            json!({"type": "rect"})
        );
    }

    #[test]
    fn test_missing_type_is_tolerated() {
        let descriptor = ShapeDescriptor::from_json(r#"{"range": "A1"}"#).unwrap();
        let shape = Shape::new(descriptor).unwrap();
        assert_eq!(shape.props.kind, None);
    }

    #[test]
    fn test_text_body_is_normalized_on_construction() {
        let props = PropsDescriptor::new("rect").with_text_body(vec!["foo", "bar"]);
        let shape = Shape::new(ShapeDescriptor::new(props, "A1")).unwrap();
        let body = shape.props.text_body.unwrap();
        assert_eq!(body.paragraphs.len(), 2);
        assert_eq!(body.paragraphs[1].runs, vec![TextRun::plain("bar")]);
    }

    #[test]
    fn test_model_round_trip_is_stable() {
        let props = PropsDescriptor::new("rect")
            .with_rotation(180.0)
            .with_horizontal_flip(true)
            .with_fill(Fill::solid(Color::rgb("AABBCC")))
            .with_text_body("label");
        let range = Anchor {
            tl: CellPosition::new(0.1125, 0.4),
            br: Some(CellPosition::new(2.101046875, 3.4)),
            ext: None,
            edit_as: Some(EditAs::OneCell),
        };
        let shape = Shape::new(
            ShapeDescriptor::new(props, range)
                .with_name("Box")
                .with_id("box-1"),
        )
        .unwrap();
        assert_eq!(Shape::new(shape.model()).unwrap(), shape);
    }

    #[test]
    fn test_set_model_keeps_shape_on_invalid_range() {
        let mut shape = Shape::new(ShapeDescriptor::new(PropsDescriptor::new("line"), "B2")).unwrap();
        let before = shape.clone();
        let result = shape.set_model(ShapeDescriptor::new(PropsDescriptor::new("rect"), "??"));
        assert!(matches!(result, Err(XformError::InvalidRange(_))));
        assert_eq!(shape, before);
    }

    #[test]
    fn test_descriptor_from_json() {
        let descriptor = ShapeDescriptor::from_json(
            r#"{
                "props": {
                    "type": "line",
                    "fill": {"type": "solid", "color": {"theme": "accent6"}},
                    "outline": {"weight": 30000, "color": {"theme": "accent1"}}
                },
                "range": {"tl": {"col": 1, "row": 1}, "br": "D6"},
                "hyperlinks": {"rId": "rId1", "tooltip": "open"}
            }"#,
        )
        .unwrap();
        let shape = Shape::new(descriptor).unwrap();
        assert_eq!(shape.props.fill, Some(Fill::solid(Color::theme("accent6"))));
        assert_eq!(shape.range.br, Some(CellPosition::new(3.0, 5.0)));
        assert_eq!(shape.hyperlinks.unwrap().tooltip.as_deref(), Some("open"));
    }

    #[test]
    fn test_canonical_json() {
        let shape = Shape::new(ShapeDescriptor::new(PropsDescriptor::new("line"), "B2:D6")).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&shape.to_json().unwrap()).unwrap(),
            json!({
                "visible": true,
                "props": {"type": "line"},
                "range": {"tl": {"col": 1.0, "row": 1.0}, "br": {"col": 4.0, "row": 6.0}}
            })
        );
    }
}
