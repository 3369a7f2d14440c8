//! Anchor Transforms
//!
//! 図形の配置（`xdr:twoCellAnchor` / `xdr:oneCellAnchor`）とセルマーカー（`xdr:from` / `xdr:to`）。
//! 位置はEMU単位のまま扱い、セル座標（小数）との変換は呼び出し側が行います。

use super::attributes::{parse_int, parse_u32};
use super::shape::{ShapeKind, ShapeXform, SpModel};
use super::simple::StaticXform;
use super::{AttributesXform, Composite, EventHandler, ParseState, TextXform, Xform};
use crate::api::EditAs;
use crate::error::XformError;
use crate::xml::{Attributes, XmlNode, XmlSink};

/// セルマーカー（列・行のインデックスとセル内オフセット）
///
/// インデックスは0始まり、オフセットはEMU単位です。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMarker {
    pub col: u32,
    pub col_off: i64,
    pub row: u32,
    pub row_off: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerChild {
    Col,
    ColOff,
    Row,
    RowOff,
}

/// セルマーカー（`xdr:from` / `xdr:to`）のトランスフォーム
#[derive(Debug, Clone)]
pub struct CellMarkerXform {
    tag: String,
    state: ParseState<MarkerChild>,
    col: TextXform,
    col_off: TextXform,
    row: TextXform,
    row_off: TextXform,
    model: Option<CellMarker>,
}

impl CellMarkerXform {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            state: ParseState::Idle,
            col: TextXform::new("xdr:col"),
            col_off: TextXform::new("xdr:colOff"),
            row: TextXform::new("xdr:row"),
            row_off: TextXform::new("xdr:rowOff"),
            model: None,
        }
    }

    /// 左上（`xdr:from`）
    pub fn top_left() -> Self {
        Self::new("xdr:from")
    }

    /// 右下（`xdr:to`）
    pub fn bottom_right() -> Self {
        Self::new("xdr:to")
    }

    fn text_mut(&mut self, key: MarkerChild) -> &mut TextXform {
        match key {
            MarkerChild::Col => &mut self.col,
            MarkerChild::ColOff => &mut self.col_off,
            MarkerChild::Row => &mut self.row,
            MarkerChild::RowOff => &mut self.row_off,
        }
    }
}

impl Composite for CellMarkerXform {
    type Key = MarkerChild;

    fn state(&mut self) -> &mut ParseState<MarkerChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == self.tag
    }

    fn route(&self, name: &str) -> Option<MarkerChild> {
        match name {
            "xdr:col" => Some(MarkerChild::Col),
            "xdr:colOff" => Some(MarkerChild::ColOff),
            "xdr:row" => Some(MarkerChild::Row),
            "xdr:rowOff" => Some(MarkerChild::RowOff),
            _ => None,
        }
    }

    fn child(&mut self, key: MarkerChild) -> &mut dyn EventHandler {
        self.text_mut(key)
    }

    fn begin(&mut self, _node: &XmlNode) {
        for key in [
            MarkerChild::Col,
            MarkerChild::ColOff,
            MarkerChild::Row,
            MarkerChild::RowOff,
        ] {
            self.text_mut(key).reset();
        }
        self.model = Some(CellMarker::default());
    }

    fn child_done(&mut self, key: MarkerChild) {
        let text = self.text_mut(key).take_model().unwrap_or_default();
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let text = text.trim();
        match key {
            MarkerChild::Col => model.col = parse_u32(text).unwrap_or(0),
            MarkerChild::Row => model.row = parse_u32(text).unwrap_or(0),
            MarkerChild::ColOff => model.col_off = parse_int(text).unwrap_or(0),
            MarkerChild::RowOff => model.row_off = parse_int(text).unwrap_or(0),
        }
    }
}

impl EventHandler for CellMarkerXform {
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

impl Xform for CellMarkerXform {
    type Model = CellMarker;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn render(&self, sink: &mut XmlSink, model: &CellMarker) -> Result<(), XformError> {
        sink.open_element(&self.tag, &Attributes::new())?;
        self.col.render(sink, &model.col.to_string())?;
        self.col_off.render(sink, &model.col_off.to_string())?;
        self.row.render(sink, &model.row.to_string())?;
        self.row_off.render(sink, &model.row_off.to_string())?;
        sink.close_element()
    }

    fn model(&self) -> Option<&CellMarker> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<CellMarker> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.col.reset();
        self.col_off.reset();
        self.row.reset();
        self.row_off.reset();
        self.model = None;
    }
}

/// アンカーのモデル
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorModel {
    pub shape: SpModel,
    /// `xdr:sp`か`xdr:cxnSp`か
    pub kind: ShapeKind,
    pub from: CellMarker,
    /// 右下のマーカー（ある場合は2セルアンカー）
    pub to: Option<CellMarker>,
    /// 1セルアンカーのサイズ（EMU、`cx`, `cy`）
    pub ext: Option<(i64, i64)>,
    pub edit_as: Option<EditAs>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnchorChild {
    From,
    To,
    Ext,
    Shape,
    Connector,
    ClientData,
}

/// アンカー（`xdr:twoCellAnchor` / `xdr:oneCellAnchor`）のトランスフォーム
///
/// 図形もコネクタも含まないアンカー（画像、グラフなど）はパース結果に残りません。
#[derive(Debug, Clone)]
pub struct AnchorXform {
    state: ParseState<AnchorChild>,
    from: CellMarkerXform,
    to: CellMarkerXform,
    ext: AttributesXform,
    shape: ShapeXform,
    connector: ShapeXform,
    client_data: StaticXform,
    model: Option<AnchorModel>,
    has_shape: bool,
}

impl Default for AnchorXform {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorXform {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            from: CellMarkerXform::top_left(),
            to: CellMarkerXform::bottom_right(),
            ext: AttributesXform::new("xdr:ext"),
            shape: ShapeXform::shape(),
            connector: ShapeXform::connector(),
            client_data: StaticXform::new("xdr:clientData"),
            model: None,
            has_shape: false,
        }
    }

    fn reset_children(&mut self) {
        self.from.reset();
        self.to.reset();
        self.ext.reset();
        self.shape.reset();
        self.connector.reset();
        self.client_data.reset();
        self.has_shape = false;
    }

    fn shape_xform(&self, kind: ShapeKind) -> &ShapeXform {
        match kind {
            ShapeKind::Shape => &self.shape,
            ShapeKind::Connector => &self.connector,
        }
    }
}

impl Composite for AnchorXform {
    type Key = AnchorChild;

    fn state(&mut self) -> &mut ParseState<AnchorChild> {
        &mut self.state
    }

    fn is_own(&self, name: &str) -> bool {
        name == "xdr:twoCellAnchor" || name == "xdr:oneCellAnchor"
    }

    fn route(&self, name: &str) -> Option<AnchorChild> {
        match name {
            "xdr:from" => Some(AnchorChild::From),
            "xdr:to" => Some(AnchorChild::To),
            "xdr:ext" => Some(AnchorChild::Ext),
            "xdr:sp" => Some(AnchorChild::Shape),
            "xdr:cxnSp" => Some(AnchorChild::Connector),
            "xdr:clientData" => Some(AnchorChild::ClientData),
            _ => None,
        }
    }

    fn child(&mut self, key: AnchorChild) -> &mut dyn EventHandler {
        match key {
            AnchorChild::From => &mut self.from,
            AnchorChild::To => &mut self.to,
            AnchorChild::Ext => &mut self.ext,
            AnchorChild::Shape => &mut self.shape,
            AnchorChild::Connector => &mut self.connector,
            AnchorChild::ClientData => &mut self.client_data,
        }
    }

    fn begin(&mut self, node: &XmlNode) {
        self.reset_children();
        self.model = Some(AnchorModel {
            edit_as: node
                .attributes
                .get_non_empty("editAs")
                .and_then(EditAs::from_attr),
            ..AnchorModel::default()
        });
    }

    fn child_done(&mut self, key: AnchorChild) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        match key {
            AnchorChild::From => {
                if let Some(from) = self.from.take_model() {
                    model.from = from;
                }
            }
            AnchorChild::To => model.to = self.to.take_model(),
            AnchorChild::Ext => {
                model.ext = self.ext.take_model().map(|attrs| {
                    let size = |key: &str| attrs.get(key).and_then(parse_int).unwrap_or(0);
                    (size("cx"), size("cy"))
                });
            }
            AnchorChild::Shape | AnchorChild::Connector => {
                let (xform, kind) = if key == AnchorChild::Shape {
                    (&mut self.shape, ShapeKind::Shape)
                } else {
                    (&mut self.connector, ShapeKind::Connector)
                };
                if let Some(shape) = xform.take_model() {
                    model.shape = shape;
                    model.kind = kind;
                    self.has_shape = true;
                }
            }
            AnchorChild::ClientData => {
                self.client_data.take_model();
            }
        }
    }

    fn finish(&mut self) {
        if !self.has_shape {
            log::debug!("skipping anchor without shape content");
            self.model = None;
        }
    }
}

impl EventHandler for AnchorXform {
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

impl Xform for AnchorXform {
    type Model = AnchorModel;

    /// 出力時の要素名はモデルに応じて変わるため、2セルアンカーを代表として返す
    fn tag(&self) -> &str {
        "xdr:twoCellAnchor"
    }

    fn render(&self, sink: &mut XmlSink, model: &AnchorModel) -> Result<(), XformError> {
        let attrs = Attributes::new().with_opt("editAs", model.edit_as.map(|e| e.as_str()));
        match &model.to {
            Some(to) => {
                sink.open_element("xdr:twoCellAnchor", &attrs)?;
                self.from.render(sink, &model.from)?;
                self.to.render(sink, to)?;
            }
            None => {
                sink.open_element("xdr:oneCellAnchor", &attrs)?;
                self.from.render(sink, &model.from)?;
                let (cx, cy) = model.ext.unwrap_or_default();
                self.ext.render(
                    sink,
                    &Attributes::new()
                        .with("cx", cx.to_string())
                        .with("cy", cy.to_string()),
                )?;
            }
        }
        self.shape_xform(model.kind).render(sink, &model.shape)?;
        self.client_data.render_static(sink)?;
        sink.close_element()
    }

    fn model(&self) -> Option<&AnchorModel> {
        self.model.as_ref()
    }

    fn take_model(&mut self) -> Option<AnchorModel> {
        self.model.take()
    }

    fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.reset_children();
        self.model = None;
    }
}
