//! Builder Module
//!
//! Fluent Builder APIを提供し、描画パートの読み書き設定（`DrawingOptions`）を段階的に構築する。

use crate::error::XformError;
use crate::security::ParseLimits;

/// デフォルトの列幅（EMU）
pub const DEFAULT_COLUMN_WIDTH_EMU: u32 = 640_000;

/// デフォルトの行の高さ（EMU）
pub const DEFAULT_ROW_HEIGHT_EMU: u32 = 180_000;

/// 描画パートの読み書き設定
///
/// [`DrawingOptionsBuilder`]で構築します。`Default`はビルダーのデフォルト設定と同じです。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingOptions {
    /// インデント幅（`None`の場合はインデントなし）
    pub(crate) indent: Option<usize>,

    /// XML宣言を出力するか
    pub(crate) declaration: bool,

    /// セル座標とEMUの変換に使う列幅
    pub(crate) column_width_emu: u32,

    /// セル座標とEMUの変換に使う行の高さ
    pub(crate) row_height_emu: u32,

    /// パース時の制限
    pub(crate) limits: ParseLimits,
}

impl Default for DrawingOptions {
    fn default() -> Self {
        Self {
            indent: None,
            declaration: true,
            column_width_emu: DEFAULT_COLUMN_WIDTH_EMU,
            row_height_emu: DEFAULT_ROW_HEIGHT_EMU,
            limits: ParseLimits::default(),
        }
    }
}

impl DrawingOptions {
    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    pub fn declaration(&self) -> bool {
        self.declaration
    }

    pub fn column_width_emu(&self) -> u32 {
        self.column_width_emu
    }

    pub fn row_height_emu(&self) -> u32 {
        self.row_height_emu
    }

    pub fn limits(&self) -> &ParseLimits {
        &self.limits
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use xlsxform::DrawingOptionsBuilder;
///
/// # fn main() -> Result<(), xlsxform::XformError> {
/// let options = DrawingOptionsBuilder::new()
///     .with_indent(Some(2))
///     .with_declaration(false)
///     .build()?;
/// assert_eq!(options.indent(), Some(2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DrawingOptionsBuilder {
    /// 内部設定（構築中）
    options: DrawingOptions,
}

impl Default for DrawingOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingOptionsBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - インデント: なし
    /// - XML宣言: 出力する
    /// - 列幅: 640000 EMU
    /// - 行の高さ: 180000 EMU
    /// - パース制限: [`ParseLimits::default`]
    pub fn new() -> Self {
        Self {
            options: DrawingOptions::default(),
        }
    }

    /// 出力のインデント幅を指定する（`None`でインデントなし）
    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.options.indent = indent;
        self
    }

    /// XML宣言を出力するかを指定する
    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.options.declaration = declaration;
        self
    }

    /// セル座標の変換に使う列幅（EMU）を指定する
    pub fn with_column_width_emu(mut self, width: u32) -> Self {
        self.options.column_width_emu = width;
        self
    }

    /// セル座標の変換に使う行の高さ（EMU）を指定する
    pub fn with_row_height_emu(mut self, height: u32) -> Self {
        self.options.row_height_emu = height;
        self
    }

    /// パース時の制限を指定する
    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.options.limits = limits;
        self
    }

    /// 設定を検証して`DrawingOptions`を生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(DrawingOptions)` - 設定が有効な場合
    /// * `Err(XformError::Config)` - 列幅・行の高さ・制限値が0の場合
    pub fn build(self) -> Result<DrawingOptions, XformError> {
        // 1. セル寸法の検証（0だとEMUからセル座標に変換できない）
        if self.options.column_width_emu == 0 {
            return Err(XformError::Config(
                "column width must be greater than 0".to_string(),
            ));
        }
        if self.options.row_height_emu == 0 {
            return Err(XformError::Config(
                "row height must be greater than 0".to_string(),
            ));
        }

        // 2. パース制限の検証
        self.options.limits.validate()?;

        Ok(self.options)
    }
}
