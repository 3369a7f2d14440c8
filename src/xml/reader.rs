//! Event Driver
//!
//! quick-xmlのプルリーダーでマークアップを字句解析し、
//! open/text/closeイベントを文書順でハンドラーへ配送します。
//! ドキュメントツリーは構築しません（シングルパス）。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Attributes, XmlNode};
use crate::error::XformError;
use crate::security::ParseLimits;
use crate::xform::EventHandler;

/// マークアップ文字列をイベント列としてハンドラーに配送する
///
/// - 自己終了要素は open の直後に close として配送されます。
/// - テキストとCDATAはアンエスケープ後に text として配送されます（空白のみのテキストも含む）。
/// - コメント、処理命令、XML宣言は配送しません。
///
/// # 戻り値
///
/// * `Ok(())` - 文書の終端まで配送した場合
/// * `Err(XformError)` - 字句解析エラー、または制限違反
pub fn drive<H: EventHandler + ?Sized>(
    xml: &str,
    handler: &mut H,
    limits: &ParseLimits,
) -> Result<(), XformError> {
    limits.check_input_size(xml.len())?;

    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    reader.expand_empty_elements(true);

    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let node = to_node(&e)?;
                depth += 1;
                limits.check_depth(depth, &node.name)?;
                handler.parse_open(&node);
            }
            Event::Text(e) => {
                if depth > 0 {
                    let text = e.unescape()?;
                    if !text.is_empty() {
                        handler.parse_text(&text);
                    }
                }
            }
            Event::CData(e) => {
                if depth > 0 {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes)?;
                    handler.parse_text(text);
                }
            }
            Event::End(e) => {
                let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                depth = depth.saturating_sub(1);
                handler.parse_close(&name);
            }
            Event::Eof => break,
            // Empty は expand_empty_elements により Start/End に展開される
            _ => {}
        }
    }

    Ok(())
}

/// 開始タグをイベントペイロードに変換
fn to_node(e: &BytesStart<'_>) -> Result<XmlNode, XformError> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Attributes::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        attributes.insert(key, value.into_owned());
    }
    Ok(XmlNode::with_attributes(name, attributes))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 受け取ったイベントを記録するハンドラー
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl EventHandler for Recorder {
        fn parse_open(&mut self, node: &XmlNode) -> bool {
            let attrs: Vec<String> = node
                .attributes
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            self.events
                .push(format!("open {} [{}]", node.name, attrs.join(",")));
            true
        }

        fn parse_text(&mut self, text: &str) {
            self.events.push(format!("text {}", text));
        }

        fn parse_close(&mut self, name: &str) -> bool {
            self.events.push(format!("close {}", name));
            false
        }
    }

    #[test]
    fn test_events_in_document_order() {
        let mut recorder = Recorder::default();
        drive(
            r#"<a:p><a:r><a:t>foo &amp; bar</a:t></a:r><a:endParaRPr lang="en-US"/></a:p>"#,
            &mut recorder,
            &ParseLimits::default(),
        )
        .unwrap();
        assert_eq!(
            recorder.events,
            vec![
                "open a:p []",
                "open a:r []",
                "open a:t []",
                "text foo & bar",
                "close a:t",
                "close a:r",
                "open a:endParaRPr [lang=en-US]",
                "close a:endParaRPr",
                "close a:p",
            ]
        );
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let mut recorder = Recorder::default();
        drive(
            r#"<xdr:cNvPr id="2" name="A &lt;B&gt;"/>"#,
            &mut recorder,
            &ParseLimits::default(),
        )
        .unwrap();
        assert_eq!(recorder.events[0], "open xdr:cNvPr [id=2,name=A <B>]");
    }

    #[test]
    fn test_cdata_is_delivered_as_text() {
        let mut recorder = Recorder::default();
        drive(
            "<a:t><![CDATA[<raw>]]></a:t>",
            &mut recorder,
            &ParseLimits::default(),
        )
        .unwrap();
        assert_eq!(recorder.events[1], "text <raw>");
    }

    #[test]
    fn test_declaration_and_comments_are_not_delivered() {
        let mut recorder = Recorder::default();
        drive(
            r#"<?xml version="1.0"?><!-- note --><brk id="1"/>"#,
            &mut recorder,
            &ParseLimits::default(),
        )
        .unwrap();
        assert_eq!(recorder.events, vec!["open brk [id=1]", "close brk"]);
    }

    #[test]
    fn test_depth_limit() {
        let limits = ParseLimits {
            max_depth: 2,
            ..ParseLimits::default()
        };
        let mut recorder = Recorder::default();
        let result = drive("<a><b><c/></b></a>", &mut recorder, &limits);
        assert!(matches!(result, Err(XformError::LimitExceeded(_))));
    }

    #[test]
    fn test_input_size_limit() {
        let limits = ParseLimits {
            max_input_size: 8,
            ..ParseLimits::default()
        };
        let mut recorder = Recorder::default();
        let result = drive("<root>too long</root>", &mut recorder, &limits);
        assert!(matches!(result, Err(XformError::LimitExceeded(_))));
        assert!(recorder.events.is_empty());
    }

    #[test]
    fn test_mismatched_end_tag_is_reader_error() {
        let mut recorder = Recorder::default();
        let result = drive("<a><b></a>", &mut recorder, &ParseLimits::default());
        assert!(matches!(result, Err(XformError::Xml(_))));
    }
}
