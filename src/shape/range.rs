//! Range Resolution
//!
//! 図形の配置範囲（アンカー）の解決。`"B2:D6"`のようなセル範囲文字列と、
//! `{tl, br?, ext?, editAs?}`形式の明示的なアンカーの両方を受け付けます。

use serde::{Deserialize, Serialize};

use crate::api::EditAs;
use crate::error::XformError;
use crate::xform::CellMarker;

/// 1ピクセルあたりのEMU
pub const EMU_PER_PIXEL: f64 = 9525.0;

/// セル上の位置
///
/// 整数部がセルのインデックス（0始まり）、小数部がセル内のオフセットを表します。
/// 例: `{col: 1.5, row: 0}`はB列の中央、1行目の上端。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CellPosition {
    pub col: f64,
    pub row: f64,
}

impl CellPosition {
    pub fn new(col: f64, row: f64) -> Self {
        Self { col, row }
    }

    /// EMU単位のセルマーカーに変換
    pub fn to_marker(&self, column_width_emu: u32, row_height_emu: u32) -> CellMarker {
        let (col, col_off) = split_position(self.col, column_width_emu);
        let (row, row_off) = split_position(self.row, row_height_emu);
        CellMarker {
            col,
            col_off,
            row,
            row_off,
        }
    }

    /// セルマーカーから変換
    pub fn from_marker(marker: &CellMarker, column_width_emu: u32, row_height_emu: u32) -> Self {
        Self {
            col: marker.col as f64 + marker.col_off as f64 / column_width_emu as f64,
            row: marker.row as f64 + marker.row_off as f64 / row_height_emu as f64,
        }
    }
}

fn split_position(value: f64, cell_size: u32) -> (u32, i64) {
    if !value.is_finite() || value <= 0.0 {
        return (0, 0);
    }
    let index = value.floor();
    let offset = ((value - index) * cell_size as f64).round() as i64;
    (index as u32, offset)
}

/// 図形のサイズ（ピクセル）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// EMU単位（`cx`, `cy`）に変換
    pub fn to_emu(&self) -> (i64, i64) {
        (
            (self.width * EMU_PER_PIXEL).round() as i64,
            (self.height * EMU_PER_PIXEL).round() as i64,
        )
    }

    pub fn from_emu(cx: i64, cy: i64) -> Self {
        Self {
            width: cx as f64 / EMU_PER_PIXEL,
            height: cy as f64 / EMU_PER_PIXEL,
        }
    }
}

/// 解決済みのアンカー
///
/// `br`がある場合は2セルアンカー、ない場合は`ext`のサイズを持つ1セルアンカーとして出力されます。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub tl: CellPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub br: Option<CellPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<Extent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_as: Option<EditAs>,
}

/// 位置の入力形式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionInput {
    /// セル番地（例: `"C3"`）。セルの左上を指す
    Address(String),
    /// 座標
    Coords(CellPosition),
}

impl PositionInput {
    fn resolve(&self) -> Result<CellPosition, XformError> {
        match self {
            PositionInput::Address(address) => {
                let (col, row) = parse_cell_ref(address)?;
                Ok(CellPosition::new(col as f64, row as f64))
            }
            PositionInput::Coords(position) => Ok(*position),
        }
    }
}

impl From<CellPosition> for PositionInput {
    fn from(position: CellPosition) -> Self {
        PositionInput::Coords(position)
    }
}

/// 範囲の入力形式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeInput {
    /// セル範囲文字列（例: `"B2:D6"`、`"B2"`）
    Cells(String),
    /// 明示的なアンカー
    Anchor {
        tl: PositionInput,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        br: Option<PositionInput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ext: Option<Extent>,
        #[serde(default, rename = "editAs", skip_serializing_if = "Option::is_none")]
        edit_as: Option<EditAs>,
    },
}

impl RangeInput {
    /// アンカーに解決する
    ///
    /// セル範囲文字列は、左上セルの左上から右下セルの右下までを覆うアンカーになります。
    ///
    /// ```rust
    /// use xlsxform::shape::{CellPosition, RangeInput};
    ///
    /// let anchor = RangeInput::from("B2:D6").resolve().unwrap();
    /// assert_eq!(anchor.tl, CellPosition::new(1.0, 1.0));
    /// assert_eq!(anchor.br, Some(CellPosition::new(4.0, 6.0)));
    /// ```
    pub fn resolve(&self) -> Result<Anchor, XformError> {
        match self {
            RangeInput::Cells(range) => {
                let (start, end) = match range.split_once(':') {
                    Some((start, end)) => (start, end),
                    None => (range.as_str(), range.as_str()),
                };
                let (left, top) = parse_cell_ref(start)?;
                let (right, bottom) = parse_cell_ref(end)?;
                Ok(Anchor {
                    tl: CellPosition::new(left.min(right) as f64, top.min(bottom) as f64),
                    br: Some(CellPosition::new(
                        (left.max(right) + 1) as f64,
                        (top.max(bottom) + 1) as f64,
                    )),
                    ext: None,
                    edit_as: None,
                })
            }
            RangeInput::Anchor {
                tl,
                br,
                ext,
                edit_as,
            } => Ok(Anchor {
                tl: tl.resolve()?,
                br: br.as_ref().map(PositionInput::resolve).transpose()?,
                ext: *ext,
                edit_as: *edit_as,
            }),
        }
    }
}

impl From<&str> for RangeInput {
    fn from(range: &str) -> Self {
        RangeInput::Cells(range.to_string())
    }
}

impl From<String> for RangeInput {
    fn from(range: String) -> Self {
        RangeInput::Cells(range)
    }
}

impl From<Anchor> for RangeInput {
    fn from(anchor: Anchor) -> Self {
        RangeInput::Anchor {
            tl: anchor.tl.into(),
            br: anchor.br.map(PositionInput::from),
            ext: anchor.ext,
            edit_as: anchor.edit_as,
        }
    }
}

/// セル参照文字列を0始まりの座標に変換（例: `"A1"` -> `(0, 0)`、`"$C$3"` -> `(2, 2)`）
///
/// 戻り値は`(列, 行)`。
pub fn parse_cell_ref(reference: &str) -> Result<(u32, u32), XformError> {
    let invalid = || XformError::InvalidRange(reference.to_string());
    let cleaned: String = reference.trim().chars().filter(|ch| *ch != '$').collect();
    let split = cleaned
        .find(|ch: char| !ch.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (letters, digits) = cleaned.split_at(split);
    if letters.is_empty() || letters.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    // 列を数値に変換（A=1, B=2, ..., Z=26, AA=27, ...）
    let col = letters
        .bytes()
        .map(|b| (b.to_ascii_uppercase() - b'A' + 1) as u32)
        .fold(0u32, |acc, val| acc * 26 + val);
    let row: u32 = digits.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }

    Ok((col - 1, row - 1))
}

/// 0始まりの列インデックスを列名に変換（0 -> `A`、27 -> `AB`）
pub fn col_to_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        result.push((b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1").unwrap(), (0, 0));
        assert_eq!(parse_cell_ref("B2").unwrap(), (1, 1));
        assert_eq!(parse_cell_ref("$C$3").unwrap(), (2, 2));
        assert_eq!(parse_cell_ref("aa10").unwrap(), (26, 9));
        assert_eq!(parse_cell_ref("XFD1048576").unwrap(), (16383, 1048575));
    }

    #[test]
    fn test_parse_cell_ref_rejects_malformed() {
        for reference in ["", "B", "2B", "B0", "B2C", "ABCD1", "B-2"] {
            assert!(
                matches!(parse_cell_ref(reference), Err(XformError::InvalidRange(_))),
                "{} should be rejected",
                reference
            );
        }
    }

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(27), "AB");
        assert_eq!(col_to_letter(16383), "XFD");
    }

    #[test]
    fn test_resolve_cell_range() {
        let anchor = RangeInput::from("B2:D6").resolve().unwrap();
        assert_eq!(anchor.tl, CellPosition::new(1.0, 1.0));
        assert_eq!(anchor.br, Some(CellPosition::new(4.0, 6.0)));
        assert_eq!(anchor.edit_as, None);
    }

    #[test]
    fn test_resolve_single_cell_and_reversed_range() {
        let single = RangeInput::from("B2").resolve().unwrap();
        assert_eq!(single.tl, CellPosition::new(1.0, 1.0));
        assert_eq!(single.br, Some(CellPosition::new(2.0, 2.0)));

        let reversed = RangeInput::from("D6:B2").resolve().unwrap();
        assert_eq!(reversed, RangeInput::from("B2:D6").resolve().unwrap());
    }

    #[test]
    fn test_resolve_invalid_range() {
        assert!(matches!(
            RangeInput::from("B2:D").resolve(),
            Err(XformError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_resolve_explicit_anchor_from_json() {
        let input: RangeInput = serde_json::from_value(json!({
            "tl": {"col": 0.1125, "row": 0.4},
            "br": "C4",
            "editAs": "oneCell"
        }))
        .unwrap();
        let anchor = input.resolve().unwrap();
        assert_eq!(anchor.tl, CellPosition::new(0.1125, 0.4));
        assert_eq!(anchor.br, Some(CellPosition::new(2.0, 3.0)));
        assert_eq!(anchor.edit_as, Some(EditAs::OneCell));
    }

    #[test]
    fn test_anchor_round_trips_through_input() {
        let anchor = Anchor {
            tl: CellPosition::new(1.0, 2.0),
            br: None,
            ext: Some(Extent::new(100.0, 50.0)),
            edit_as: None,
        };
        assert_eq!(RangeInput::from(anchor.clone()).resolve().unwrap(), anchor);
    }

    #[test]
    fn test_marker_conversion() {
        let marker = CellPosition::new(2.101046875, 3.4).to_marker(640000, 180000);
        assert_eq!(marker.col, 2);
        assert_eq!(marker.col_off, 64670);
        assert_eq!(marker.row, 3);
        assert_eq!(marker.row_off, 72000);

        let back = CellPosition::from_marker(&marker, 640000, 180000);
        assert!((back.col - 2.101046875).abs() < 1e-9);
        assert!((back.row - 3.4).abs() < 1e-9);
    }

    #[test]
    fn test_marker_conversion_clamps_negative() {
        let marker = CellPosition::new(-1.0, f64::NAN).to_marker(640000, 180000);
        assert_eq!(marker, CellMarker::default());
    }

    #[test]
    fn test_extent_emu() {
        assert_eq!(Extent::new(100.0, 20.0).to_emu(), (952500, 190500));
        assert_eq!(Extent::from_emu(952500, 190500), Extent::new(100.0, 20.0));
    }
}
