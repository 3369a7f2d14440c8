//! XML Sink
//!
//! トランスフォームからの構造的な書き込み呼び出しを受け付けるライター。
//! 属性値・テキストのエスケープはquick-xmlに任せ、開始/終了の均衡はここで検証します。

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::Attributes;
use crate::error::XformError;

/// 構造的XMLライター
///
/// `open_element`と`close_element`の呼び出し回数は一致しなければならず、
/// 違反した場合は即座にエラーを返します（レンダリング時の厳格性）。
///
/// # 使用例
///
/// ```rust
/// use xlsxform::{Attributes, XmlSink};
///
/// # fn main() -> Result<(), xlsxform::XformError> {
/// let mut sink = XmlSink::new();
/// sink.open_element("rowBreaks", &Attributes::new().with("count", "1"))?;
/// sink.leaf_element("brk", &Attributes::new().with("id", "5"))?;
/// sink.close_element()?;
/// assert_eq!(sink.finish()?, r#"<rowBreaks count="1"><brk id="5"/></rowBreaks>"#);
/// # Ok(())
/// # }
/// ```
pub struct XmlSink {
    writer: Writer<Vec<u8>>,
    /// 現在開いている要素名のスタック
    open: Vec<String>,
}

impl Default for XmlSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for XmlSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlSink").field("open", &self.open).finish()
    }
}

impl XmlSink {
    /// インデントなしのシンクを生成
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            open: Vec::new(),
        }
    }

    /// 指定された幅（スペース数）でインデントするシンクを生成
    pub fn with_indent(indent: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', indent),
            open: Vec::new(),
        }
    }

    /// XML宣言を書き込む
    pub fn write_declaration(&mut self) -> Result<(), XformError> {
        self.writer.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some("UTF-8"),
            Some("yes"),
        )))?;
        Ok(())
    }

    /// 子要素を持つ要素を開く
    pub fn open_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), XformError> {
        self.writer
            .write_event(Event::Start(start_tag(name, attributes)))?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// 自己終了要素を書き込む
    pub fn leaf_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), XformError> {
        self.writer
            .write_event(Event::Empty(start_tag(name, attributes)))?;
        Ok(())
    }

    /// テキストだけを内容に持つ要素を書き込む（例: `<a:t>foo</a:t>`）
    pub fn text_element(
        &mut self,
        name: &str,
        attributes: &Attributes,
        text: &str,
    ) -> Result<(), XformError> {
        self.open_element(name, attributes)?;
        // 空文字列でもテキストイベントを書き、終了タグの前にインデントが入らないようにする
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close_element()
    }

    /// 直近に開いた要素を閉じる
    pub fn close_element(&mut self) -> Result<(), XformError> {
        let name = self.open.pop().ok_or(XformError::UnbalancedClose)?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// 現在開いている要素の数
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// 書き込みを確定して文字列を返す
    ///
    /// 閉じられていない要素が残っている場合は`UnclosedElements`を返します。
    pub fn finish(self) -> Result<String, XformError> {
        if !self.open.is_empty() {
            return Err(XformError::UnclosedElements { open: self.open });
        }
        let bytes = self.writer.into_inner();
        let text = std::str::from_utf8(&bytes)?;
        Ok(text.to_string())
    }
}

fn start_tag<'a>(name: &'a str, attributes: &'a Attributes) -> BytesStart<'a> {
    let mut tag = BytesStart::new(name);
    for (key, value) in attributes.iter() {
        tag.push_attribute((key, value));
    }
    tag
}
