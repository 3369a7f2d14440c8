//! Security Tests
//!
//! パース制限（入力サイズ、ネストの深さ）と不正なマークアップの扱いを検証します。

use xlsxform::shape::{PropsDescriptor, ShapeDescriptor};
use xlsxform::{DrawingOptionsBuilder, ParseLimits, ShapeSheet, XformError};

fn options_with(limits: ParseLimits) -> xlsxform::DrawingOptions {
    DrawingOptionsBuilder::new()
        .with_limits(limits)
        .build()
        .unwrap()
}

/// 入力サイズの上限を超えた場合
#[test]
fn test_input_size_limit() {
    let mut sheet = ShapeSheet::new();
    sheet
        .add_shape(ShapeDescriptor::new(PropsDescriptor::new("rect"), "A1"))
        .unwrap();
    let xml = sheet.to_drawing_xml().unwrap();

    let options = options_with(ParseLimits {
        max_input_size: xml.len() - 1,
        ..ParseLimits::default()
    });
    match ShapeSheet::from_drawing_xml(&xml, options) {
        Err(XformError::LimitExceeded(msg)) => assert!(msg.contains("Input size")),
        other => panic!("Expected LimitExceeded, got {:?}", other),
    }
}

/// 異常に深いネスト（XML bomb対策）
#[test]
fn test_nesting_depth_limit() {
    let depth = 100;
    let xml = format!(
        "<xdr:wsDr>{}{}</xdr:wsDr>",
        "<x>".repeat(depth),
        "</x>".repeat(depth)
    );
    let options = options_with(ParseLimits {
        max_depth: 50,
        ..ParseLimits::default()
    });
    assert!(matches!(
        ShapeSheet::from_drawing_xml(&xml, options),
        Err(XformError::LimitExceeded(_))
    ));

    // デフォルトの制限内であれば未知の要素として無視する
    let sheet = ShapeSheet::from_drawing_xml(&xml, options_with(ParseLimits::default())).unwrap();
    assert!(sheet.is_empty());
}

/// 終了タグの不一致は字句解析エラー
#[test]
fn test_mismatched_end_tag() {
    let result = ShapeSheet::from_drawing_xml(
        "<xdr:wsDr><xdr:twoCellAnchor></xdr:wsDr>",
        options_with(ParseLimits::default()),
    );
    assert!(matches!(result, Err(XformError::Xml(_))));
}

/// 外部エンティティは展開しない
#[test]
fn test_external_entity_is_not_expanded() {
    let xml = concat!(
        r#"<?xml version="1.0"?><!DOCTYPE wsDr [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>"#,
        r#"<xdr:wsDr><xdr:twoCellAnchor><xdr:from/><xdr:to/><xdr:sp>"#,
        r#"<xdr:nvSpPr><xdr:cNvPr id="1" name="&xxe;"/></xdr:nvSpPr></xdr:sp>"#,
        r#"<xdr:clientData/></xdr:twoCellAnchor></xdr:wsDr>"#
    );
    // 未定義のエンティティ参照はエラーとして報告される
    let result = ShapeSheet::from_drawing_xml(xml, options_with(ParseLimits::default()));
    assert!(matches!(result, Err(XformError::Xml(_))));
}

/// 属性値・テキストはエスケープされて出力される
#[test]
fn test_markup_in_names_is_escaped() {
    let mut sheet = ShapeSheet::new();
    sheet
        .add_shape(
            ShapeDescriptor::new(
                PropsDescriptor::new("rect").with_text_body("</a:t><evil/>"),
                "A1",
            )
            .with_name(r#""><injected/>"#),
        )
        .unwrap();
    let xml = sheet.to_drawing_xml().unwrap();
    assert!(!xml.contains("<injected/>"));
    assert!(!xml.contains("<evil/>"));

    let reloaded = ShapeSheet::from_drawing_xml(&xml, sheet.options().clone()).unwrap();
    assert_eq!(reloaded.shapes(), sheet.shapes());
}
