//! Page Break Transforms
//!
//! 改ページ要素`brk`と、そのリストである`rowBreaks` / `colBreaks`。

use super::attributes::{bool_attr, parse_int};
use super::{Composite, EventHandler, ParseState, Xform};
use crate::error::XformError;
use crate::types::PageBreak;
use crate::xml::{Attributes, XmlNode, XmlSink};

const BRK_TAG: &str = "brk";

/// 改ページ（`brk`）のトランスフォーム
///
/// - `id`は常に出力（値がない場合は警告して省略）
/// - `max` / `man`は値がある場合のみ出力
/// - パース時の`man`は`"1"`の場合のみ`true`、それ以外は`false`
#[derive(Debug, Clone, Default)]
pub struct PageBreakXform {
    depth: usize,
    model: Option<PageBreak>,
}

impl PageBreakXform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for PageBreakXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth > 0 {
            self.depth += 1;
            return true;
        }
        if node.name != BRK_TAG {
            return false;
        }
        let attrs = &node.attributes;
        self.model = Some(PageBreak {
            id: attrs.get("id").and_then(parse_int),
            max: attrs.get_non_empty("max").and_then(parse_int),
            man: Some(attrs.get("man") == Some("1")),
        });
        self.depth = 1;
        true
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }
}

impl Xform for PageBreakXform {
    type Model = PageBreak;

    fn tag(&self) -> &str {
        BRK_TAG
    }

    fn render(&self, sink: &mut XmlSink, model: &PageBreak) -> Result<(), XformError> {
        if model.id.is_none() {
            log::warn!("rendering page break without id");
        }
        let attrs = Attributes::new()
            .with_opt("id", model.id.map(|id| id.to_string()))
            .with_opt("max", model.max.map(|max| max.to_string()))
            .with_opt("man", model.man.map(bool_attr));
        sink.leaf_element(BRK_TAG, &attrs)
    }

    fn model(&self) -> Option<&PageBreak> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<PageBreak> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.model = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BreaksChild {
    Brk,
}

/// 改ページリスト（`rowBreaks` / `colBreaks`）のトランスフォーム
///
/// 出力時は`count`と`manualBreakCount`を付与し、リストが空なら何も出力しません。
#[derive(Debug, Clone)]
pub struct PageBreaksXform {
    tag: String,
    state: ParseState<BreaksChild>,
    brk: PageBreakXform,
    model: Option<Vec<PageBreak>>,
}

impl PageBreaksXform {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            state: ParseState::Idle,
            brk: PageBreakXform::new(),
            model: None,
        }
    }

    /// 行方向の改ページ（`rowBreaks`）
    pub fn rows() -> Self {
        Self::new("rowBreaks")
    }

    /// 列方向の改ページ（`colBreaks`）
    pub fn cols() -> Self {
        Self::new("colBreaks")
    }
}

impl Composite for PageBreaksXform {
    type Key = BreaksChild;

    fn state(&mut self) -> &mut ParseState<BreaksChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == self.tag
    }

    fn route(&self, name: &str) -> Option<BreaksChild> {
        (name == BRK_TAG).then_some(BreaksChild::Brk)
    }

    fn child(&mut self, _key: BreaksChild) -> &mut dyn EventHandler {
        &mut self.brk
    }

    fn begin(&mut self, _node: &XmlNode) {
        self.brk.reset();
        self.model = Some(Vec::new());
    }

    fn child_done(&mut self, _key: BreaksChild) {
        if let (Some(list), Some(brk)) = (self.model.as_mut(), self.brk.take_model()) {
            list.push(brk);
        }
    }
}

impl EventHandler for PageBreaksXform {
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

impl Xform for PageBreaksXform {
    type Model = Vec<PageBreak>;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn render(&self, sink: &mut XmlSink, model: &Vec<PageBreak>) -> Result<(), XformError> {
        if model.is_empty() {
            return Ok(());
        }
        let manual = model.iter().filter(|brk| brk.man == Some(true)).count();
        let attrs = Attributes::new()
            .with("count", model.len().to_string())
            .with("manualBreakCount", manual.to_string());
        sink.open_element(&self.tag, &attrs)?;
        for brk in model {
            self.brk.render(sink, brk)?;
        }
        sink.close_element()
    }

    fn model(&self) -> Option<&Vec<PageBreak>> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<Vec<PageBreak>> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.brk.reset();
        self.model = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xform::{parse_str, render_to_string};

    #[test]
    fn test_render_full_break() {
        let xform = PageBreakXform::new();
        let brk = PageBreak {
            id: Some(5),
            max: Some(16383),
            man: Some(true),
        };
        assert_eq!(
            render_to_string(&xform, &brk).unwrap(),
            r#"<brk id="5" max="16383" man="1"/>"#
        );
    }

    #[test]
    fn test_render_omits_absent_fields() {
        let xform = PageBreakXform::new();
        let brk = PageBreak {
            id: Some(3),
            max: None,
            man: Some(false),
        };
        assert_eq!(
            render_to_string(&xform, &brk).unwrap(),
            r#"<brk id="3" man="0"/>"#
        );
    }

    #[test]
    fn test_parse_break() {
        let mut xform = PageBreakXform::new();
        let brk = parse_str(&mut xform, r#"<brk id="12" max="16383" man="1"/>"#)
            .unwrap()
            .unwrap();
        assert_eq!(brk.id, Some(12));
        assert_eq!(brk.max, Some(16383));
        assert_eq!(brk.man, Some(true));
    }

    #[test]
    fn test_parse_missing_man_is_false() {
        let mut xform = PageBreakXform::new();
        let brk = parse_str(&mut xform, r#"<brk id="12"/>"#).unwrap().unwrap();
        assert_eq!(brk.max, None);
        assert_eq!(brk.man, Some(false));
        let brk = parse_str(&mut xform, r#"<brk id="12" man="true"/>"#)
            .unwrap()
            .unwrap();
        assert_eq!(brk.man, Some(false));
    }

    #[test]
    fn test_parse_lenient_integers() {
        // 数字以外の値は例外にならず、欠落値として扱われる
        let mut xform = PageBreakXform::new();
        let brk = parse_str(&mut xform, r#"<brk id="abc" max="12px"/>"#)
            .unwrap()
            .unwrap();
        assert_eq!(brk.id, None);
        assert_eq!(brk.max, Some(12));
    }

    #[test]
    fn test_parse_signed_integers() {
        let mut xform = PageBreakXform::new();
        let brk = parse_str(&mut xform, r#"<brk id="-1" max="+7"/>"#)
            .unwrap()
            .unwrap();
        assert_eq!(brk.id, Some(-1));
        assert_eq!(brk.max, Some(7));
        assert_eq!(
            render_to_string(&xform, &brk).unwrap(),
            r#"<brk id="-1" max="7" man="0"/>"#
        );
    }

    #[test]
    fn test_leaf_rejects_other_tags() {
        let mut xform = PageBreakXform::new();
        assert!(!xform.parse_open(&XmlNode::new("rowBreaks")));
        assert!(xform.model().is_none());
    }

    #[test]
    fn test_list_round_trip() {
        let mut xform = PageBreaksXform::rows();
        let breaks = vec![PageBreak::manual(4), PageBreak::manual(9)];
        let xml = render_to_string(&xform, &breaks).unwrap();
        assert_eq!(
            xml,
            r#"<rowBreaks count="2" manualBreakCount="2"><brk id="4" man="1"/><brk id="9" man="1"/></rowBreaks>"#
        );
        assert_eq!(parse_str(&mut xform, &xml).unwrap().unwrap(), breaks);
    }

    #[test]
    fn test_list_counts_manual_breaks() {
        let xform = PageBreaksXform::cols();
        let breaks = vec![
            PageBreak::manual(2),
            PageBreak {
                id: Some(7),
                max: Some(1048575),
                man: Some(false),
            },
        ];
        let xml = render_to_string(&xform, &breaks).unwrap();
        assert!(xml.starts_with(r#"<colBreaks count="2" manualBreakCount="1">"#));
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        let xform = PageBreaksXform::rows();
        assert_eq!(render_to_string(&xform, &Vec::new()).unwrap(), "");
    }

    #[test]
    fn test_list_ignores_unknown_children() {
        let mut xform = PageBreaksXform::rows();
        let breaks = parse_str(
            &mut xform,
            r#"<rowBreaks count="1"><x:ext><x:note/></x:ext><brk id="4" man="1"/></rowBreaks>"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(breaks, vec![PageBreak::manual(4)]);
    }

    #[test]
    fn test_list_collects_breaks_inside_unknown_wrapper() {
        let mut xform = PageBreaksXform::rows();
        let breaks = parse_str(
            &mut xform,
            r#"<rowBreaks count="2"><x:ext><brk id="9"/></x:ext><brk id="4" man="1"/></rowBreaks>"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks[0].id, Some(9));
        assert_eq!(breaks[1], PageBreak::manual(4));
    }
}
