//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! パース時は寛容（未知の要素や不正な数値属性はエラーにしない）、
//! レンダリング時は厳格（開始/終了タグの不均衡は即座にエラー）という方針です。

use thiserror::Error;

/// xlsxformクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー
/// - `Xml`: XMLの字句解析・書き込みで発生したエラー（quick-xml由来）
/// - `UnbalancedClose` / `UnclosedElements`: ライターへの呼び出しの不均衡
/// - `InvalidRange`: セル範囲文字列の解析失敗
/// - `ShapeNotFound` / `DuplicateShapeId`: シート上の図形操作の失敗
/// - `Config`: 設定の検証に失敗したエラー
/// - `LimitExceeded`: 入力サイズやネストの深さの制限違反
///
/// # 使用例
///
/// ```rust
/// use xlsxform::{XformError, XmlSink};
///
/// let mut sink = XmlSink::new();
/// match sink.close_element() {
///     Err(XformError::UnbalancedClose) => {}
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum XformError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XMLの解析・書き込みエラー
    ///
    /// quick-xmlが不正なマークアップ（構文エラー、終了タグの不一致など）を
    /// 検出した場合に発生します。未知の要素はエラーにはなりません。
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// JSON記述子の解析エラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 開いている要素がないのに`close_element`が呼ばれた
    ///
    /// トランスフォーム実装のロジック不具合を示します。出力を破壊するため、
    /// 回復せずにエラーとして返します。
    #[error("close_element called with no open element")]
    UnbalancedClose,

    /// 出力の確定時に閉じられていない要素が残っている
    #[error("{} element(s) left open: {}", open.len(), open.join(", "))]
    UnclosedElements {
        /// 閉じられていない要素名（外側から順）
        open: Vec<String>,
    },

    /// セル範囲・セル参照の解析に失敗したエラー
    ///
    /// 例: `"B2:D"`、`"2B"`など。
    #[error("Invalid cell range '{0}'")]
    InvalidRange(String),

    /// 指定されたIDまたはインデックスの図形が存在しない
    #[error("Shape not found: {0}")]
    ShapeNotFound(String),

    /// 同じIDが既に別の図形に割り当てられている
    #[error("Shape id '{0}' is already assigned to another shape")]
    DuplicateShapeId(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `DrawingOptionsBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// ```rust
    /// use xlsxform::{DrawingOptionsBuilder, XformError};
    ///
    /// let result = DrawingOptionsBuilder::new().with_column_width_emu(0).build();
    /// assert!(matches!(result, Err(XformError::Config(_))));
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// パース制限に違反したエラー
    ///
    /// 入力サイズの上限超過や、要素のネストが深すぎる場合に発生します。
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
}

/// クレート内で使用する`Result`型エイリアス
pub type Result<T, E = XformError> = std::result::Result<T, E>;
