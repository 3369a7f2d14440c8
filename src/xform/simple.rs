//! Static Transform
//!
//! オブジェクトモデルに影響しない固定要素（例: `xdr:cNvSpPr`、`a:lstStyle`、
//! `xdr:clientData`）を出力し、パース時はサブツリーごと読み捨てます。

use super::{EventHandler, Xform};
use crate::error::XformError;
use crate::xml::{Attributes, XmlNode, XmlSink};

/// 固定要素のトランスフォーム
#[derive(Debug, Clone)]
pub struct StaticXform {
    tag: String,
    attributes: Attributes,
    children: Vec<StaticXform>,
    depth: usize,
    seen: bool,
}

impl StaticXform {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Attributes::new(),
            children: Vec::new(),
            depth: 0,
            seen: false,
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn with_child(mut self, child: StaticXform) -> Self {
        self.children.push(child);
        self
    }

    /// 固定内容を書き込む
    pub fn render_static(&self, sink: &mut XmlSink) -> Result<(), XformError> {
        if self.children.is_empty() {
            return sink.leaf_element(&self.tag, &self.attributes);
        }
        sink.open_element(&self.tag, &self.attributes)?;
        for child in &self.children {
            child.render_static(sink)?;
        }
        sink.close_element()
    }
}

impl EventHandler for StaticXform {
    fn parse_open(&mut self, node: &XmlNode) -> bool {
        if self.depth > 0 {
            self.depth += 1;
            return true;
        }
        if node.name == self.tag {
            self.depth = 1;
            self.seen = true;
            return true;
        }
        false
    }

    fn parse_close(&mut self, _name: &str) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth > 0
    }
}

impl Xform for StaticXform {
    type Model = ();

    fn tag(&self) -> &str {
        &self.tag
    }

    fn render(&self, sink: &mut XmlSink, _model: &()) -> Result<(), XformError> {
        self.render_static(sink)
    }

    /// 要素を読んだ場合のみ`Some(())`
    fn model(&self) -> Option<&()> {
        if self.seen {
            Some(&())
        } else {
            None
        }
    }

    fn take_model(&mut self) -> Option<()> {
        std::mem::take(&mut self.seen).then_some(())
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.seen = false;
    }
}
