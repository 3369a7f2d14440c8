//! Transform Framework
//!
//! 要素ごとの小さなトランスフォーム（パース/レンダリングの対）を組み合わせて、
//! 任意にネストした要素ツリーをシングルパスで処理するためのプロトコル。
//!
//! # プロトコル
//!
//! - `parse_open(node)`: 要素が開かれた。`true`は「消費した」。
//! - `parse_text(text)`: テキスト断片。常に最も内側のアクティブなハンドラーに属する。
//! - `parse_close(name)`: 要素が閉じられた。`false`は「自分自身が閉じた」ことを意味し、
//!   親はこのハンドラーへの委譲を解除する。`true`は「まだ開いている」。
//!
//! 子要素を持つトランスフォームは [`ParseState`] で委譲状態を明示的に管理します
//! （`Idle | Open | Delegating(子キー)`）。
//!
//! 振り分け表にない要素の`open`は何もせずに消費し、次の`open`も同じ規則で処理します。
//! そのため未知のラッパー要素（`mc:AlternateContent`など）の内側にある既知の子要素も
//! 振り分けられます。

mod anchor;
mod attributes;
mod color;
mod drawing;
mod non_visual;
mod outline;
mod page_breaks;
mod shape;
mod shape_properties;
mod simple;
mod style;
mod text_body;

pub use anchor::{AnchorModel, AnchorXform, CellMarker, CellMarkerXform};
pub use attributes::{parse_bool, parse_int, AttributesXform, TextXform};
pub use color::{ColorXform, SolidFillXform};
pub use drawing::DrawingXform;
pub use non_visual::{
    ExtensionListXform, HyperlinkClickXform, NonVisualDrawingXform, NonVisualModel,
    NonVisualShapeXform, SHAPE_ID_EXTENSION_URI,
};
pub use outline::OutlineXform;
pub use page_breaks::{PageBreakXform, PageBreaksXform};
pub use shape::{ShapeKind, ShapeXform, SpModel};
pub use shape_properties::{
    PresetGeometryXform, ShapePropertiesModel, ShapePropertiesXform, Transform2D,
    TransformXform,
};
pub use simple::StaticXform;
pub use style::{ShapeStyleXform, StyleModel, StyleReference, StyleReferenceXform};
pub use text_body::{ParagraphXform, RunPropertiesXform, RunXform, TextBodyXform};

use crate::error::XformError;
use crate::security::ParseLimits;
use crate::xml::{drive, XmlNode, XmlSink};

/// イベントを受け取るハンドラー
///
/// 親トランスフォームの振り分け表は異なるモデル型の子を混在させるため、
/// このトレイトはオブジェクト安全に保ちます。
pub trait EventHandler {
    /// 要素が開かれた
    fn parse_open(&mut self, node: &XmlNode) -> bool;

    /// テキスト断片（デフォルトでは破棄）
    fn parse_text(&mut self, _text: &str) {}

    /// 要素が閉じられた。自分自身が閉じた場合は`false`を返す
    fn parse_close(&mut self, name: &str) -> bool;
}

/// パース/レンダリングの対となるトランスフォーム
pub trait Xform: EventHandler {
    /// このトランスフォームが扱うモデル
    type Model;

    /// 担当する要素名
    fn tag(&self) -> &str;

    /// モデルを要素としてシンクに書き込む
    fn render(&self, sink: &mut XmlSink, model: &Self::Model) -> Result<(), XformError>;

    /// 直近のパースで組み立てたモデル
    fn model(&self) -> Option<&Self::Model>;

    /// 組み立てたモデルを取り出す（トランスフォームには残らない）
    fn take_model(&mut self) -> Option<Self::Model>;

    /// パース状態とモデルを初期化する
    fn reset(&mut self);
}

/// 委譲状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState<K> {
    /// 自要素の外側
    Idle,
    /// 自要素の内側で、アクティブな子がいない
    Open,
    /// 子トランスフォームにイベントを転送中
    Delegating(K),
}

/// `open`イベントに対する処理方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpenStep<K> {
    /// 自要素が開かれた
    Own,
    /// 子に転送する
    Forward(K),
    /// 何もせずに消費する
    Ignore,
}

/// `close`イベントに対する処理方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseStep<K> {
    /// 子に転送する
    Forward(K),
    /// 自要素が閉じられた
    Own,
    /// 無視する（まだ開いている）
    Ignore,
}

impl<K> Default for ParseState<K> {
    fn default() -> Self {
        ParseState::Idle
    }
}

impl<K: Copy> ParseState<K> {
    pub(crate) fn on_open(&mut self, is_own: bool, route: Option<K>) -> OpenStep<K> {
        if let ParseState::Delegating(key) = *self {
            return OpenStep::Forward(key);
        }
        if is_own {
            // 自要素が（再び）開かれた場合はモデルを作り直す
            *self = ParseState::Open;
            return OpenStep::Own;
        }
        match route {
            Some(key) => {
                *self = ParseState::Delegating(key);
                OpenStep::Forward(key)
            }
            None => OpenStep::Ignore,
        }
    }

    pub(crate) fn on_text(&self) -> Option<K> {
        match *self {
            ParseState::Delegating(key) => Some(key),
            _ => None,
        }
    }

    pub(crate) fn on_close(&mut self, is_own: bool) -> CloseStep<K> {
        match *self {
            ParseState::Delegating(key) => CloseStep::Forward(key),
            ParseState::Open if is_own => {
                *self = ParseState::Idle;
                CloseStep::Own
            }
            _ => CloseStep::Ignore,
        }
    }

    /// アクティブな子が閉じた
    pub(crate) fn child_closed(&mut self) {
        if matches!(self, ParseState::Delegating(_)) {
            *self = ParseState::Open;
        }
    }

    pub fn is_delegating(&self) -> bool {
        matches!(self, ParseState::Delegating(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ParseState::Idle)
    }
}

/// 子要素へ委譲するトランスフォームの共通実装
///
/// 実装側は振り分け表（`route`）と子へのアクセス（`child`）、
/// 自要素の開始/終了時の処理だけを定義し、`EventHandler`の各メソッドから
/// `open_event` / `text_event` / `close_event` を呼び出します。
pub(crate) trait Composite {
    type Key: Copy + std::fmt::Debug;

    fn state(&mut self) -> &mut ParseState<Self::Key>;

    fn is_own(&self, name: &str) -> bool;

    fn route(&self, name: &str) -> Option<Self::Key>;

    fn child(&mut self, key: Self::Key) -> &mut dyn EventHandler;

    /// 自要素が開かれた（モデルと子の初期化）
    fn begin(&mut self, node: &XmlNode);

    /// 子が閉じた（子のモデルを自分のモデルに畳み込む）
    fn child_done(&mut self, _key: Self::Key) {}

    /// 自要素が閉じた（フィールド間の規則を適用してモデルを確定）
    fn finish(&mut self) {}

    fn open_event(&mut self, node: &XmlNode) -> bool {
        let is_own = self.is_own(&node.name);
        let route = self.route(&node.name);
        match self.state().on_open(is_own, route) {
            OpenStep::Own => self.begin(node),
            OpenStep::Forward(key) => {
                log::trace!("delegating <{}> to {:?}", node.name, key);
                self.child(key).parse_open(node);
            }
            OpenStep::Ignore => log::debug!("ignoring unknown element <{}>", node.name),
        }
        true
    }

    fn text_event(&mut self, text: &str) {
        if let Some(key) = self.state().on_text() {
            self.child(key).parse_text(text);
        }
    }

    fn close_event(&mut self, name: &str) -> bool {
        let is_own = self.is_own(name);
        match self.state().on_close(is_own) {
            CloseStep::Forward(key) => {
                if !self.child(key).parse_close(name) {
                    self.state().child_closed();
                    self.child_done(key);
                }
                true
            }
            CloseStep::Own => {
                self.finish();
                false
            }
            CloseStep::Ignore => true,
        }
    }
}

/// モデルをレンダリングして文字列として返す
pub fn render_to_string<X: Xform + ?Sized>(
    xform: &X,
    model: &X::Model,
) -> Result<String, XformError> {
    let mut sink = XmlSink::new();
    xform.render(&mut sink, model)?;
    sink.finish()
}

/// マークアップ文字列をパースしてモデルを返す
///
/// トランスフォームはパース前に初期化されます。
pub fn parse_str<X: Xform + ?Sized>(
    xform: &mut X,
    xml: &str,
) -> Result<Option<X::Model>, XformError> {
    parse_str_with_limits(xform, xml, &ParseLimits::default())
}

/// 制限付きでマークアップ文字列をパースする
pub fn parse_str_with_limits<X: Xform + ?Sized>(
    xform: &mut X,
    xml: &str,
    limits: &ParseLimits,
) -> Result<Option<X::Model>, XformError> {
    xform.reset();
    drive(xml, xform, limits)?;
    Ok(xform.take_model())
}
