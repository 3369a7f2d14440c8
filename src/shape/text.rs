//! Text Body Normalization
//!
//! テキストボディ・段落・ランは、それぞれ3つの入力形式を受け付けます。
//!
//! 1. 文字列 → その文字列を包む1つの段落/ラン
//! 2. 配列 → 要素ごとに1つ下の階層へ正規化
//! 3. 構造化オブジェクト → `paragraphs` / `runs`を正規化し、
//!    `vertAlign` / `alignment` / `font`は指定がある場合のみ引き継ぐ
//!
//! 正規化は冪等です。正規化済みのテキストボディを入力形式に戻して再度正規化しても、
//! 同じ結果になります。

use serde::{Deserialize, Serialize};

use crate::api::{TextAlignment, VerticalAlignment};
use crate::types::Font;

/// テキストラン（正規形）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl TextRun {
    /// 書式なしのラン
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            font: None,
        }
    }
}

/// 段落（正規形）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<TextAlignment>,
}

/// テキストボディ（正規形）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBody {
    pub paragraphs: Vec<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vert_align: Option<VerticalAlignment>,
}

impl TextBody {
    /// 全ランのテキストを段落ごとに改行で連結
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.runs.iter().map(|r| r.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// ランの入力形式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunInput {
    Plain(String),
    Structured {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font: Option<Font>,
    },
}

/// 段落の入力形式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParagraphInput {
    Plain(String),
    Sequence(Vec<RunInput>),
    Structured {
        runs: Vec<RunInput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alignment: Option<TextAlignment>,
    },
}

/// テキストボディの入力形式
///
/// ```rust
/// use xlsxform::shape::{TextBody, TextBodyInput};
///
/// let nested = TextBodyInput::from(vec![vec!["foo", "bar"], vec!["baz", "qux"]]);
/// let body = nested.normalize();
/// assert_eq!(body.paragraphs.len(), 2);
/// assert_eq!(body.plain_text(), "foobar\nbazqux");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextBodyInput {
    Plain(String),
    Sequence(Vec<ParagraphInput>),
    Structured {
        paragraphs: Vec<ParagraphInput>,
        #[serde(default, rename = "vertAlign", skip_serializing_if = "Option::is_none")]
        vert_align: Option<VerticalAlignment>,
    },
}

impl RunInput {
    pub fn normalize(self) -> TextRun {
        match self {
            RunInput::Plain(text) => TextRun { text, font: None },
            RunInput::Structured { text, font } => TextRun {
                text,
                font: font.filter(|font| !font.is_empty()),
            },
        }
    }
}

impl ParagraphInput {
    pub fn normalize(self) -> Paragraph {
        match self {
            ParagraphInput::Plain(text) => Paragraph {
                runs: vec![RunInput::Plain(text).normalize()],
                alignment: None,
            },
            ParagraphInput::Sequence(runs) => Paragraph {
                runs: runs.into_iter().map(RunInput::normalize).collect(),
                alignment: None,
            },
            ParagraphInput::Structured { runs, alignment } => Paragraph {
                runs: runs.into_iter().map(RunInput::normalize).collect(),
                alignment,
            },
        }
    }
}

impl TextBodyInput {
    pub fn normalize(self) -> TextBody {
        match self {
            TextBodyInput::Plain(text) => TextBody {
                paragraphs: vec![ParagraphInput::Plain(text).normalize()],
                vert_align: None,
            },
            TextBodyInput::Sequence(paragraphs) => TextBody {
                paragraphs: paragraphs
                    .into_iter()
                    .map(ParagraphInput::normalize)
                    .collect(),
                vert_align: None,
            },
            TextBodyInput::Structured {
                paragraphs,
                vert_align,
            } => TextBody {
                paragraphs: paragraphs
                    .into_iter()
                    .map(ParagraphInput::normalize)
                    .collect(),
                vert_align,
            },
        }
    }
}

impl From<&str> for RunInput {
    fn from(text: &str) -> Self {
        RunInput::Plain(text.to_string())
    }
}

impl From<String> for RunInput {
    fn from(text: String) -> Self {
        RunInput::Plain(text)
    }
}

impl From<TextRun> for RunInput {
    fn from(run: TextRun) -> Self {
        RunInput::Structured {
            text: run.text,
            font: run.font,
        }
    }
}

impl From<&str> for ParagraphInput {
    fn from(text: &str) -> Self {
        ParagraphInput::Plain(text.to_string())
    }
}

impl From<String> for ParagraphInput {
    fn from(text: String) -> Self {
        ParagraphInput::Plain(text)
    }
}

impl<T: Into<RunInput>> From<Vec<T>> for ParagraphInput {
    fn from(runs: Vec<T>) -> Self {
        ParagraphInput::Sequence(runs.into_iter().map(Into::into).collect())
    }
}

impl From<Paragraph> for ParagraphInput {
    fn from(paragraph: Paragraph) -> Self {
        ParagraphInput::Structured {
            runs: paragraph.runs.into_iter().map(RunInput::from).collect(),
            alignment: paragraph.alignment,
        }
    }
}

impl From<&str> for TextBodyInput {
    fn from(text: &str) -> Self {
        TextBodyInput::Plain(text.to_string())
    }
}

impl From<String> for TextBodyInput {
    fn from(text: String) -> Self {
        TextBodyInput::Plain(text)
    }
}

impl<T: Into<ParagraphInput>> From<Vec<T>> for TextBodyInput {
    fn from(paragraphs: Vec<T>) -> Self {
        TextBodyInput::Sequence(paragraphs.into_iter().map(Into::into).collect())
    }
}

impl From<TextBody> for TextBodyInput {
    fn from(body: TextBody) -> Self {
        TextBodyInput::Structured {
            paragraphs: body
                .paragraphs
                .into_iter()
                .map(ParagraphInput::from)
                .collect(),
            vert_align: body.vert_align,
        }
    }
}
