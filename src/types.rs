//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use calamine::Data;
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// セルに保存された値を表す列挙型
///
/// 数式は評価せず、ワークブックにキャッシュされた値のみを保持します。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 文字列（正規化の対象）
    Text(String),

    /// 整数
    Int(i64),

    /// 数値（f64）
    Number(f64),

    /// 論理値
    Bool(bool),

    /// 日付・時刻
    DateTime(NaiveDateTime),

    /// 日付部分を持たない時刻（シリアル値が1未満のセル）
    Time(NaiveTime),

    /// 時間の長さ（`[h]:mm:ss`書式のセルなど）
    Duration(Duration),

    /// ISO 8601文字列として保存された日付・期間
    Iso(String),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空文字列や空白のみの文字列は値として扱い、空とは判定しません。
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) if dt.is_duration() => match dt.as_duration() {
                Some(duration) => CellValue::Duration(duration),
                None => CellValue::Number(dt.as_f64()),
            },
            // シリアル値がchronoの範囲外の場合は数値のまま出力する
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) if (0.0..1.0).contains(&dt.as_f64()) => {
                    CellValue::Time(datetime.time())
                }
                Some(datetime) => CellValue::DateTime(datetime),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Iso(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
            Data::Empty => CellValue::Empty,
            #[allow(unreachable_patterns)]
            _ => CellValue::Empty,
        }
    }
}
