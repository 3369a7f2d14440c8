//! Types Module
//!
//! トランスフォームとエンティティの間で共有するレコード型を定義するモジュール。
//! 省略可能なフィールドは`None`で表し、シリアライズ時にも出力しません。

use serde::{Deserialize, Serialize};

/// 改ページ（`brk`要素）
///
/// `id`は改ページ位置の行/列番号、`max`は改ページが及ぶ範囲の終端、
/// `man`は手動で挿入された改ページかどうか。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBreak {
    /// 改ページ位置（数字で始まらない値の場合は`None`、負の値も保持する）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// 範囲の終端
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// 手動改ページかどうか
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub man: Option<bool>,
}

impl PageBreak {
    /// 手動改ページを生成
    pub fn manual(id: i64) -> Self {
        Self {
            id: Some(id),
            max: None,
            man: Some(true),
        }
    }
}

/// 色
///
/// JSON表現は`{"theme": "accent1"}`または`{"rgb": "AABBCC"}`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// テーマカラー（`a:schemeClr`）
    Theme(String),
    /// RGBカラー（`a:srgbClr`）
    Rgb(String),
}

impl Color {
    pub fn theme(name: &str) -> Self {
        Color::Theme(name.to_string())
    }

    pub fn rgb(hex: &str) -> Self {
        Color::Rgb(hex.to_string())
    }
}

/// 塗りつぶし
///
/// JSON表現は`{"type": "solid", "color": {...}}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Fill {
    /// 単色塗りつぶし（`a:solidFill`）
    Solid { color: Color },
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Fill::Solid { color }
    }

    pub fn color(&self) -> &Color {
        match self {
            Fill::Solid { color } => color,
        }
    }
}

/// 矢印の端点（`a:headEnd` / `a:tailEnd`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrowEnd {
    /// 形状（例: `triangle`、`arrow`）
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// 幅（`sm` / `med` / `lg`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// 長さ（`sm` / `med` / `lg`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
}

impl ArrowEnd {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.width.is_none() && self.length.is_none()
    }
}

/// 線の両端の矢印
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<ArrowEnd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<ArrowEnd>,
}

/// 枠線（`a:ln`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// 線の太さ（EMU）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    /// 線の色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// 破線の種類（`a:prstDash`、例: `dash`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
    /// 矢印
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<Arrow>,
}

/// 文字の書式（`a:rPr`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// 文字サイズ（ポイント）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// 下線の種類（例: `sng`、`dbl`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// 書体名（`a:latin`の`typeface`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Font {
    /// 書式が1つも指定されていないか
    pub fn is_empty(&self) -> bool {
        self.size.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.color.is_none()
            && self.name.is_none()
    }
}

/// 図形のクリック時ハイパーリンク（`a:hlinkClick`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlinks {
    /// 描画パートのリレーションシップID
    #[serde(rename = "rId")]
    pub r_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}
