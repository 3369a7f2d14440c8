//! Shape Sheet
//!
//! 1つの描画パートに属する図形のリストを保持し、IDによる検索・割り当て、
//! 表示状態の切り替え、描画パート（`xdr:wsDr`）全体の読み書きを提供します。

use rayon::prelude::*;
use unicode_width::UnicodeWidthStr;

use crate::api::ShapeSelector;
use crate::builder::DrawingOptions;
use crate::error::XformError;
use crate::shape::{col_to_letter, Anchor, CellPosition, Extent, Shape, ShapeDescriptor};
use crate::xform::{
    parse_str_with_limits, AnchorModel, CellMarker, DrawingXform, ShapeKind, SpModel, Xform,
};
use crate::xml::XmlSink;

/// 描画パート上の図形のコレクション
///
/// # 使用例
///
/// ```rust
/// use xlsxform::shape::{PropsDescriptor, ShapeDescriptor};
/// use xlsxform::ShapeSheet;
///
/// # fn main() -> Result<(), xlsxform::XformError> {
/// let mut sheet = ShapeSheet::new();
/// sheet.add_shape(ShapeDescriptor::new(PropsDescriptor::new("rect"), "B2:D6"))?;
/// sheet.assign_id(0usize, "box-1")?;
/// sheet.hide("box-1")?;
///
/// let xml = sheet.to_drawing_xml()?;
/// let reloaded = ShapeSheet::from_drawing_xml(&xml, sheet.options().clone())?;
/// assert!(!reloaded.find_by_id("box-1").unwrap().visible);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShapeSheet {
    shapes: Vec<Shape>,
    options: DrawingOptions,
}

impl ShapeSheet {
    /// デフォルト設定の空のシート
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DrawingOptions) -> Self {
        Self {
            shapes: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &DrawingOptions {
        &self.options
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// 入力形式から図形を生成して末尾に追加する
    pub fn add_shape(&mut self, descriptor: ShapeDescriptor) -> Result<&mut Shape, XformError> {
        let shape = Shape::new(descriptor)?;
        if let Some(id) = &shape.id {
            if self.find_by_id(id).is_some() {
                return Err(XformError::DuplicateShapeId(id.clone()));
            }
        }
        self.shapes.push(shape);
        let last = self.shapes.len() - 1;
        Ok(&mut self.shapes[last])
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id.as_deref() == Some(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id.as_deref() == Some(id))
    }

    /// セレクターで図形を取得する
    pub fn get(&self, selector: impl Into<ShapeSelector>) -> Result<&Shape, XformError> {
        let position = self.position(&selector.into())?;
        Ok(&self.shapes[position])
    }

    fn position(&self, selector: &ShapeSelector) -> Result<usize, XformError> {
        let found = match selector {
            ShapeSelector::Index(index) => (*index < self.shapes.len()).then_some(*index),
            ShapeSelector::Id(id) => self
                .shapes
                .iter()
                .position(|s| s.id.as_deref() == Some(id.as_str())),
        };
        found.ok_or_else(|| XformError::ShapeNotFound(selector.to_string()))
    }

    /// 図形にIDを割り当てる
    ///
    /// 同じIDが別の図形に割り当て済みの場合は`DuplicateShapeId`を返します。
    /// IDは描画パートに保存され、再読み込み後も[`ShapeSheet::find_by_id`]で検索できます。
    pub fn assign_id(
        &mut self,
        selector: impl Into<ShapeSelector>,
        id: &str,
    ) -> Result<(), XformError> {
        let position = self.position(&selector.into())?;
        let taken = self
            .shapes
            .iter()
            .enumerate()
            .any(|(i, s)| i != position && s.id.as_deref() == Some(id));
        if taken {
            return Err(XformError::DuplicateShapeId(id.to_string()));
        }
        self.shapes[position].id = Some(id.to_string());
        Ok(())
    }

    pub fn set_visible(
        &mut self,
        selector: impl Into<ShapeSelector>,
        visible: bool,
    ) -> Result<(), XformError> {
        let position = self.position(&selector.into())?;
        self.shapes[position].visible = visible;
        Ok(())
    }

    pub fn hide(&mut self, selector: impl Into<ShapeSelector>) -> Result<(), XformError> {
        self.set_visible(selector, false)
    }

    pub fn show(&mut self, selector: impl Into<ShapeSelector>) -> Result<(), XformError> {
        self.set_visible(selector, true)
    }

    /// 描画パート（`xdr:wsDr`）として出力する
    pub fn to_drawing_xml(&self) -> Result<String, XformError> {
        let mut anchors: Vec<AnchorModel> =
            self.shapes.iter().map(|s| self.to_anchor(s)).collect();
        DrawingXform::prepare(&mut anchors);

        let mut sink = match self.options.indent {
            Some(indent) => XmlSink::with_indent(indent),
            None => XmlSink::new(),
        };
        if self.options.declaration {
            sink.write_declaration()?;
        }
        DrawingXform::new().render(&mut sink, &anchors)?;
        sink.finish()
    }

    /// 描画パートを読み込む
    ///
    /// 図形を含まないアンカー（画像など）は読み飛ばします。
    pub fn from_drawing_xml(xml: &str, options: DrawingOptions) -> Result<Self, XformError> {
        let mut xform = DrawingXform::new();
        let anchors = parse_str_with_limits(&mut xform, xml, &options.limits)?.unwrap_or_default();
        log::debug!("parsed {} shape(s) from drawing part", anchors.len());

        let shapes = anchors
            .into_iter()
            .map(|anchor| from_anchor(anchor, &options))
            .collect();
        Ok(Self { shapes, options })
    }

    /// 複数の描画パートを並列に読み込む
    ///
    /// パートごとに独立したトランスフォームを使用します。結果は入力と同じ順序です。
    pub fn parse_parts(parts: &[&str], options: &DrawingOptions) -> Result<Vec<Self>, XformError> {
        parts
            .par_iter()
            .map(|xml| Self::from_drawing_xml(xml, options.clone()))
            .collect()
    }

    /// 全図形の正規形をJSON配列として出力する
    pub fn to_json(&self) -> Result<String, XformError> {
        Ok(serde_json::to_string_pretty(&self.shapes)?)
    }

    /// 図形の一覧をMarkdownテーブルとして出力する
    ///
    /// 全角文字（日本語の図形名など）は表示幅2として列を揃えます。
    pub fn summary_table(&self) -> String {
        let header = ["#", "Name", "Id", "Type", "Range", "Visible"];
        let mut rows: Vec<[String; 6]> = vec![header.map(str::to_string)];
        rows.extend(
            self.shapes
                .iter()
                .enumerate()
                .map(|(index, shape)| summary_row(index, shape)),
        );

        // 最小幅は3文字（区切り行の最小幅）
        let mut widths = [3usize; 6];
        for row in &rows {
            for (col, cell) in row.iter().enumerate() {
                widths[col] = widths[col].max(cell.width());
            }
        }

        let mut out = String::new();
        for (row_index, row) in rows.iter().enumerate() {
            out.push('|');
            for (col, cell) in row.iter().enumerate() {
                out.push(' ');
                out.push_str(cell);
                out.push_str(&" ".repeat(widths[col] - cell.width()));
                out.push_str(" |");
            }
            out.push('\n');
            if row_index == 0 {
                out.push('|');
                for width in widths {
                    out.push_str(&"-".repeat(width + 2));
                    out.push('|');
                }
                out.push('\n');
            }
        }
        out
    }

    fn to_anchor(&self, shape: &Shape) -> AnchorModel {
        let (col_emu, row_emu) = (self.options.column_width_emu, self.options.row_height_emu);
        let range = &shape.range;
        AnchorModel {
            kind: ShapeKind::for_preset(shape.props.kind.as_deref()),
            shape: SpModel {
                index: None,
                name: shape.name.clone(),
                visible: Some(shape.visible),
                props: shape.props.clone(),
                hyperlinks: shape.hyperlinks.clone(),
                id: shape.id.clone(),
            },
            from: range.tl.to_marker(col_emu, row_emu),
            to: range.br.map(|br| br.to_marker(col_emu, row_emu)),
            ext: range.ext.map(|ext| ext.to_emu()),
            edit_as: range.edit_as,
        }
    }
}

/// 一覧表示用の行
fn summary_row(index: usize, shape: &Shape) -> [String; 6] {
    [
        index.to_string(),
        shape.name.clone().unwrap_or_default(),
        shape.id.clone().unwrap_or_default(),
        shape.props.kind.clone().unwrap_or_default(),
        range_label(&shape.range),
        if shape.visible { "yes" } else { "no" }.to_string(),
    ]
}

fn from_anchor(anchor: AnchorModel, options: &DrawingOptions) -> Shape {
    let (col_emu, row_emu) = (options.column_width_emu, options.row_height_emu);
    let to_position = |marker: CellMarker| CellPosition::from_marker(&marker, col_emu, row_emu);
    let AnchorModel {
        shape,
        from,
        to,
        ext,
        edit_as,
        ..
    } = anchor;
    Shape {
        name: shape.name,
        visible: shape.visible.unwrap_or(true),
        props: shape.props,
        range: Anchor {
            tl: to_position(from),
            br: to.map(to_position),
            // 2セルアンカーはサイズを持たない
            ext: ext
                .filter(|&(cx, cy)| to.is_none() && (cx != 0 || cy != 0))
                .map(|(cx, cy)| Extent::from_emu(cx, cy)),
            edit_as,
        },
        hyperlinks: shape.hyperlinks,
        id: shape.id,
    }
}

/// アンカーの表示用ラベル（例: `B2:D6`）
///
/// 右下はセルの境界を指すため、境界ちょうどの場合は1つ前のセルとして表示します。
fn range_label(anchor: &Anchor) -> String {
    let cell = |col: f64, row: f64| {
        format!(
            "{}{}",
            col_to_letter(col.max(0.0) as u32),
            row.max(0.0) as u32 + 1
        )
    };
    let start = cell(anchor.tl.col.floor(), anchor.tl.row.floor());
    match anchor.br {
        Some(br) => {
            let end = cell(
                (br.col.ceil() - 1.0).max(anchor.tl.col.floor()),
                (br.row.ceil() - 1.0).max(anchor.tl.row.floor()),
            );
            format!("{}:{}", start, end)
        }
        None => start,
    }
}
