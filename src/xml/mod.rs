//! Markup Event Module
//!
//! トランスフォーム層と外部コラボレーター（リーダー/ライター）の境界を定義するモジュール。
//!
//! - リーダー側: [`drive`] がマークアップ文字列を open/text/close イベント列に変換し、
//!   [`EventHandler`](crate::xform::EventHandler) に文書順で配送します。
//! - ライター側: [`XmlSink`] が `open_element` / `leaf_element` / `close_element`
//!   の呼び出しを受け付け、エスケープ済みのマークアップを生成します。

mod reader;
mod sink;

pub use reader::drive;
pub use sink::XmlSink;

/// 要素の属性（文書順を保持する）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// 空の属性リストを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 属性を追加したリストを返す（ビルダー形式）
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// 値が`Some`の場合のみ属性を追加する
    pub fn with_opt<V: Into<String>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// 属性を設定する（同名の属性があれば上書き）
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// 属性値を取得
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 属性値を取得（空文字列は未指定として扱う）
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 文書順に属性を列挙
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.insert(&k.into(), v);
        }
        attributes
    }
}

/// 「要素が開かれた」イベントのペイロード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// 接頭辞付きの要素名（例: `xdr:sp`）
    pub name: String,
    /// 属性（値はアンエスケープ済み）
    pub attributes: Attributes,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// 接頭辞を除いたローカル名（例: `xdr:sp` -> `sp`）
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }
}

/// 接頭辞を除いたローカル名を返す
pub(crate) fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}
