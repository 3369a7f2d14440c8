//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。
//! 属性値として出力される列挙型は、OOXMLのトークン（`ctr`、`oneCell`など）と
//! 相互に変換できます。

use serde::{Deserialize, Serialize};

/// アンカーの編集時の振る舞い（`xdr:twoCellAnchor`の`editAs`属性）
///
/// セルの移動・サイズ変更時に図形をどう追従させるかを指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditAs {
    /// 左上のセルにのみ追従（移動はするがサイズは変わらない）
    OneCell,

    /// 両端のセルに追従（移動もサイズ変更もする）
    TwoCell,

    /// セルに追従しない
    Absolute,
}

impl EditAs {
    /// 属性値としての表現
    pub fn as_str(&self) -> &'static str {
        match self {
            EditAs::OneCell => "oneCell",
            EditAs::TwoCell => "twoCell",
            EditAs::Absolute => "absolute",
        }
    }

    /// 属性値から変換（未知の値は`None`）
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "oneCell" => Some(EditAs::OneCell),
            "twoCell" => Some(EditAs::TwoCell),
            "absolute" => Some(EditAs::Absolute),
            _ => {
                log::warn!("unknown editAs value '{}'", value);
                None
            }
        }
    }
}

/// 段落の水平方向の配置（`a:pPr`の`algn`属性）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlignment {
    /// 左揃え
    #[serde(rename = "l")]
    Left,
    /// 中央揃え
    #[serde(rename = "ctr")]
    Center,
    /// 右揃え
    #[serde(rename = "r")]
    Right,
    /// 両端揃え
    #[serde(rename = "just")]
    Justified,
    /// 均等割り付け
    #[serde(rename = "dist")]
    Distributed,
}

impl TextAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlignment::Left => "l",
            TextAlignment::Center => "ctr",
            TextAlignment::Right => "r",
            TextAlignment::Justified => "just",
            TextAlignment::Distributed => "dist",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "l" => Some(TextAlignment::Left),
            "ctr" => Some(TextAlignment::Center),
            "r" => Some(TextAlignment::Right),
            "just" => Some(TextAlignment::Justified),
            "dist" => Some(TextAlignment::Distributed),
            _ => {
                log::warn!("unknown paragraph alignment '{}'", value);
                None
            }
        }
    }
}

/// テキストボディの垂直方向の配置（`a:bodyPr`の`anchor`属性）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlignment {
    /// 上揃え
    #[serde(rename = "t")]
    Top,
    /// 中央揃え
    #[serde(rename = "ctr")]
    Middle,
    /// 下揃え
    #[serde(rename = "b")]
    Bottom,
}

impl VerticalAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalAlignment::Top => "t",
            VerticalAlignment::Middle => "ctr",
            VerticalAlignment::Bottom => "b",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "t" => Some(VerticalAlignment::Top),
            "ctr" => Some(VerticalAlignment::Middle),
            "b" => Some(VerticalAlignment::Bottom),
            _ => {
                log::warn!("unknown vertical alignment '{}'", value);
                None
            }
        }
    }
}

/// 図形の選択方式
///
/// [`ShapeSheet`](crate::ShapeSheet)上の操作対象の図形を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShapeSelector {
    /// 文書順のインデックス指定（0始まり）
    ///
    /// 例: `ShapeSelector::Index(0)` は最初の図形を選択
    Index(usize),

    /// 割り当て済みのID指定
    ///
    /// 例: `ShapeSelector::Id("line-01".to_string())`
    Id(String),
}

impl From<usize> for ShapeSelector {
    fn from(index: usize) -> Self {
        ShapeSelector::Index(index)
    }
}

impl From<&str> for ShapeSelector {
    fn from(id: &str) -> Self {
        ShapeSelector::Id(id.to_string())
    }
}

impl From<String> for ShapeSelector {
    fn from(id: String) -> Self {
        ShapeSelector::Id(id)
    }
}

impl std::fmt::Display for ShapeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeSelector::Index(index) => write!(f, "#{}", index),
            ShapeSelector::Id(id) => write!(f, "id '{}'", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_as_tokens() {
        for edit_as in [EditAs::OneCell, EditAs::TwoCell, EditAs::Absolute] {
            assert_eq!(EditAs::from_attr(edit_as.as_str()), Some(edit_as));
        }
        assert_eq!(EditAs::from_attr("sometimes"), None);
        assert_eq!(
            serde_json::to_string(&EditAs::OneCell).unwrap(),
            "\"oneCell\""
        );
    }

    #[test]
    fn test_alignment_tokens_match_serde_names() {
        for alignment in [
            TextAlignment::Left,
            TextAlignment::Center,
            TextAlignment::Right,
            TextAlignment::Justified,
            TextAlignment::Distributed,
        ] {
            let json = serde_json::to_string(&alignment).unwrap();
            assert_eq!(json, format!("\"{}\"", alignment.as_str()));
            assert_eq!(TextAlignment::from_attr(alignment.as_str()), Some(alignment));
        }
    }

    #[test]
    fn test_vertical_alignment_tokens() {
        assert_eq!(VerticalAlignment::from_attr("b"), Some(VerticalAlignment::Bottom));
        assert_eq!(VerticalAlignment::Middle.as_str(), "ctr");
        assert_eq!(VerticalAlignment::from_attr("middle"), None);
    }

    #[test]
    fn test_shape_selector_conversions() {
        assert_eq!(ShapeSelector::from(2), ShapeSelector::Index(2));
        assert_eq!(
            ShapeSelector::from("line-01"),
            ShapeSelector::Id("line-01".to_string())
        );
        assert_eq!(ShapeSelector::Index(0).to_string(), "#0");
        assert_eq!(ShapeSelector::from("a").to_string(), "id 'a'");
    }
}
