//! Boundary Tests for xlsxform
//!
//! 空の入力、寛容な数値解析、ページ区切り、ライターの均衡など、
//! 境界条件での振る舞いを検証します。

use xlsxform::types::PageBreak;
use xlsxform::xform::{
    parse_int, parse_str, render_to_string, PageBreakXform, PageBreaksXform, ShapeXform,
    SpModel,
};
use xlsxform::{Attributes, DrawingOptions, ShapeSheet, XformError, XmlSink};

#[test]
fn test_empty_sheet_renders_empty_drawing() {
    let sheet = ShapeSheet::new();
    let xml = sheet.to_drawing_xml().unwrap();
    assert!(xml.contains("<xdr:wsDr "));
    assert!(xml.ends_with("</xdr:wsDr>"));

    let reloaded = ShapeSheet::from_drawing_xml(&xml, DrawingOptions::default()).unwrap();
    assert!(reloaded.is_empty());
}

#[test]
fn test_input_without_drawing_root() {
    let sheet = ShapeSheet::from_drawing_xml("", DrawingOptions::default()).unwrap();
    assert!(sheet.is_empty());

    let sheet =
        ShapeSheet::from_drawing_xml("<worksheet><sheetData/></worksheet>", DrawingOptions::default())
            .unwrap();
    assert!(sheet.is_empty());
}

#[test]
fn test_page_break_leaf() {
    let mut xform = PageBreakXform::new();
    let brk = PageBreak {
        id: Some(12),
        max: Some(16383),
        man: Some(true),
    };
    let xml = render_to_string(&xform, &brk).unwrap();
    assert_eq!(xml, r#"<brk id="12" max="16383" man="1"/>"#);
    assert_eq!(parse_str(&mut xform, &xml).unwrap(), Some(brk));
}

#[test]
fn test_page_break_optional_attributes() {
    let mut xform = PageBreakXform::new();
    let xml = render_to_string(
        &xform,
        &PageBreak {
            id: Some(3),
            max: None,
            man: None,
        },
    )
    .unwrap();
    assert_eq!(xml, r#"<brk id="3"/>"#);

    // manは"1"の場合のみtrue、属性がなければfalse
    let parsed = parse_str(&mut xform, &xml).unwrap().unwrap();
    assert_eq!(parsed.man, Some(false));
    assert_eq!(parsed.max, None);

    // 空のmaxは未指定として扱う
    let parsed = parse_str(&mut xform, r#"<brk id="3" max="" man="0"/>"#)
        .unwrap()
        .unwrap();
    assert_eq!(parsed.max, None);
    assert_eq!(parsed.man, Some(false));
}

#[test]
fn test_page_break_lenient_integers() {
    let mut xform = PageBreakXform::new();
    let parsed = parse_str(&mut xform, r#"<brk id="12px" max="abc"/>"#)
        .unwrap()
        .unwrap();
    // 先頭の数字だけを解釈し、数字がなければ未指定
    assert_eq!(parsed.id, Some(12));
    assert_eq!(parsed.max, None);

    assert_eq!(parse_int("  7"), Some(7));
    assert_eq!(parse_int("-3"), Some(-3));
    assert_eq!(parse_int(""), None);
}

#[test]
fn test_page_break_list() {
    let mut xform = PageBreaksXform::cols();
    let breaks = vec![
        PageBreak::manual(2),
        PageBreak {
            id: Some(8),
            max: Some(1048575),
            man: Some(false),
        },
    ];
    let xml = render_to_string(&xform, &breaks).unwrap();
    assert!(xml.starts_with(r#"<colBreaks count="2" manualBreakCount="1">"#));
    assert_eq!(parse_str(&mut xform, &xml).unwrap(), Some(breaks));

    assert_eq!(render_to_string(&xform, &Vec::new()).unwrap(), "");
}

#[test]
fn test_writer_balance_errors() {
    let mut sink = XmlSink::new();
    assert!(matches!(
        sink.close_element(),
        Err(XformError::UnbalancedClose)
    ));

    let mut sink = XmlSink::new();
    sink.open_element("xdr:wsDr", &Attributes::new()).unwrap();
    assert!(matches!(
        sink.finish(),
        Err(XformError::UnclosedElements { .. })
    ));
}

#[test]
fn test_transform_reuse_across_siblings() {
    let mut xform = ShapeXform::shape();
    let first = parse_str(
        &mut xform,
        r#"<xdr:sp><xdr:nvSpPr><xdr:cNvPr id="1" name="first" hidden="1"/></xdr:nvSpPr></xdr:sp>"#,
    )
    .unwrap()
    .unwrap();
    assert_eq!(first.visible, Some(false));

    let second: SpModel = parse_str(&mut xform, r#"<xdr:sp/>"#).unwrap().unwrap();
    assert_eq!(second.name, None);
    assert_eq!(second.visible, None);
    assert_eq!(second.index, None);
}

#[test]
fn test_indented_output_parses_identically() {
    let mut sheet = ShapeSheet::with_options(
        xlsxform::DrawingOptionsBuilder::new()
            .with_indent(Some(2))
            .build()
            .unwrap(),
    );
    sheet
        .add_shape(
            xlsxform::ShapeDescriptor::new(
                xlsxform::shape::PropsDescriptor::new("rect").with_text_body(vec!["a", "b"]),
                "A1:C3",
            )
            .with_name("Indented"),
        )
        .unwrap();
    let xml = sheet.to_drawing_xml().unwrap();
    assert!(xml.contains("\n  <xdr:twoCellAnchor>"));

    let reloaded = ShapeSheet::from_drawing_xml(&xml, sheet.options().clone()).unwrap();
    assert_eq!(reloaded.shapes(), sheet.shapes());
}
