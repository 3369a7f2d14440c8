//! Parse Limits Module
//!
//! ストリーミングパーサーに対する入力制限を定義するモジュール。
//! 巨大な入力や、異常に深くネストしたマークアップ（いわゆるXML bomb）から
//! イベントドライバーを保護します。

use crate::error::XformError;

/// パース時の制限設定
///
/// イベントドライバー（[`crate::xml::drive`]）に渡され、入力全体のサイズと
/// 要素のネストの深さを制限します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// 入力マークアップの最大サイズ（バイト）
    /// デフォルト: 100MB (104_857_600 bytes)
    pub max_input_size: usize,
    /// 要素の最大ネスト深さ
    /// デフォルト: 256
    pub max_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_input_size: 104_857_600, // 100MB
            max_depth: 256,
        }
    }
}

impl ParseLimits {
    /// デフォルトの制限設定を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 入力サイズを検証
    pub(crate) fn check_input_size(&self, len: usize) -> Result<(), XformError> {
        if len > self.max_input_size {
            return Err(XformError::LimitExceeded(format!(
                "Input size exceeds maximum: {} bytes (max: {} bytes)",
                len, self.max_input_size
            )));
        }
        Ok(())
    }

    /// ネストの深さを検証
    pub(crate) fn check_depth(&self, depth: usize, element: &str) -> Result<(), XformError> {
        if depth > self.max_depth {
            return Err(XformError::LimitExceeded(format!(
                "Element '{}' nested too deeply: depth {} (max: {})",
                element, depth, self.max_depth
            )));
        }
        Ok(())
    }

    /// 設定値自体の妥当性を検証
    pub(crate) fn validate(&self) -> Result<(), XformError> {
        if self.max_depth == 0 {
            return Err(XformError::Config(
                "max_depth must be greater than 0".to_string(),
            ));
        }
        if self.max_input_size == 0 {
            return Err(XformError::Config(
                "max_input_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
