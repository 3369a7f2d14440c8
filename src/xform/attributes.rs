//! Attribute Rules and Simple Leaves
//!
//! 属性値の変換規則（寛容な整数解析、真偽値）と、
//! 属性だけ・テキストだけを持つ要素のための汎用トランスフォーム。

use super::{EventHandler, Xform};
use crate::error::XformError;
use crate::xml::{Attributes, XmlNode, XmlSink};

/// 寛容な整数解析
///
/// 先頭の空白を読み飛ばし、符号と連続する数字だけを解釈します。
/// 数字が1つもない場合は`None`（例外は発生させない）。
///
/// ```rust
/// use xlsxform::xform::parse_int;
///
/// assert_eq!(parse_int("42"), Some(42));
/// assert_eq!(parse_int("12px"), Some(12));
/// assert_eq!(parse_int("abc"), None);
/// ```
pub fn parse_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// 寛容な整数解析の結果を`u32`に変換する（範囲外・不正値は`None`）
pub(crate) fn parse_u32(value: &str) -> Option<u32> {
    let parsed = parse_int(value);
    let result = parsed.and_then(|v| u32::try_from(v).ok());
    if result.is_none() {
        log::warn!("malformed integer attribute value '{}'", value);
    }
    result
}

/// OOXMLの真偽値（`"1"`または`"true"`）
pub fn parse_bool(value: &str) -> bool {
    value == "1" || value == "true"
}

/// 真偽値属性の表現
pub(crate) fn bool_attr(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// 属性だけを取り込む汎用トランスフォーム
///
/// 子要素やテキストがあっても自分のサブツリーとして読み飛ばします
/// （例: `a:pPr`内の`a:defRPr`）。
#[derive(Debug, Clone)]
pub struct AttributesXform {
    tag: String,
    depth: usize,
    model: Option<Attributes>,
}

impl AttributesXform {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            depth: 0,
            model: None,
        }
    }
}

impl EventHandler for AttributesXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth > 0 {
            self.depth += 1;
            return true;
        }
        if node.name == self.tag {
            self.model = Some(node.attributes.clone());
            self.depth = 1;
            return true;
        }
        false
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }
}

impl Xform for AttributesXform {
    type Model = Attributes;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn render(&self, sink: &mut XmlSink, model: &Attributes) -> Result<(), XformError> {
        sink.leaf_element(&self.tag, model)
    }

    fn model(&self) -> Option<&Attributes> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Attributes> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.model = None;
    }
}

/// テキストだけを内容に持つ要素のトランスフォーム（例: `a:t`、`xdr:col`）
///
/// テキスト断片は到着順に連結されます。
#[derive(Debug, Clone)]
pub struct TextXform {
    tag: String,
    depth: usize,
    model: Option<String>,
}

impl TextXform {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            depth: 0,
            model: None,
        }
    }
}

impl EventHandler for TextXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth > 0 {
            self.depth += 1;
            return true;
        }
        if node.name == self.tag {
            self.model = Some(String::new());
            self.depth = 1;
            return true;
        }
        false
    }

    fn parse_text(&mut self, text: &str) {
        if self.depth == 1 {
            if let Some(model) = self.model.as_mut() {
                model.push_str(text);
            }
        }
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }
}

impl Xform for TextXform {
    type Model = String;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn render(&self, sink: &mut XmlSink, model: &String) -> Result<(), XformError> {
        sink.text_element(&self.tag, &Attributes::new(), model)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xform::{parse_str, render_to_string};

    #[test]
    fn test_parse_int_lenient() {
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("16383"), Some(16383));
        assert_eq!(parse_int("-5"), Some(-5));
        assert_eq!(parse_int("+5"), Some(5));
        assert_eq!(parse_int("  7"), Some(7));
        assert_eq!(parse_int("12px"), Some(12));
        assert_eq!(parse_int("3.9"), Some(3));
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_u32_rejects_negative() {
        assert_eq!(parse_u32("10"), Some(10));
        assert_eq!(parse_u32("-1"), None);
        assert_eq!(parse_u32("x"), None);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
        assert_eq!(bool_attr(true), "1");
        assert_eq!(bool_attr(false), "0");
    }

    #[test]
    fn test_attributes_xform_skips_children() {
        let mut xform = AttributesXform::new("a:pPr");
        let model = parse_str(
            &mut xform,
            r#"<a:pPr algn="ctr"><a:defRPr sz="1100"/></a:pPr>"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(model.get("algn"), Some("ctr"));
        assert!(!model.contains("sz"));
    }

    #[test]
    fn test_attributes_xform_render() {
        let xform = AttributesXform::new("a:off");
        let xml = render_to_string(&xform, &Attributes::new().with("x", "0").with("y", "0"))
            .unwrap();
        assert_eq!(xml, r#"<a:off x="0" y="0"/>"#);
    }

    #[test]
    fn test_text_xform_concatenates_fragments() {
        let mut xform = TextXform::new("a:t");
        assert!(xform.parse_open(&XmlNode::new("a:t")));
        xform.parse_text("foo");
        xform.parse_text(" & ");
        xform.parse_text("bar");
        assert!(!xform.parse_close("a:t"));
        assert_eq!(xform.model().map(String::as_str), Some("foo & bar"));
    }

    #[test]
    fn test_text_xform_ignores_nested_text() {
        let mut xform = TextXform::new("xdr:col");
        let model = parse_str(&mut xform, "<xdr:col>3<x>9</x></xdr:col>")
            .unwrap()
            .unwrap();
        assert_eq!(model, "3");
    }

    #[test]
    fn test_text_xform_round_trip_preserves_whitespace() {
        let mut xform = TextXform::new("a:t");
        let xml = render_to_string(&xform, &"  padded  ".to_string()).unwrap();
        assert_eq!(parse_str(&mut xform, &xml).unwrap().unwrap(), "  padded  ");
    }
}
