//! Formatter Module
//!
//! セル値をCSVフィールド文字列に変換するモジュール。
//! 文字列セルは正規化（改行のエスケープと前後の空白除去）し、
//! それ以外の値は正規の文字列表現をそのまま出力します。

use std::fmt::Write as _;

use chrono::{Duration, NaiveDateTime};

use crate::api::DateFormat;
use crate::types::CellValue;

/// 改行の置換後の文字列（バックスラッシュ + n の2文字）
const ESCAPED_NEWLINE: &str = "\\n";

/// 時刻のみのセルの出力形式
const TIME_FORMAT: &str = "%H:%M:%S";

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new(date_format: DateFormat) -> Self {
        Self {
            date_formatter: DateFormatter { date_format },
        }
    }

    /// セル値をフィールド文字列にフォーマット
    ///
    /// # 引数
    ///
    /// * `value` - セルに保存された値
    ///
    /// # 戻り値
    ///
    /// CSVに書き出すフィールド文字列。空セルは空文字列になります。
    pub fn format_cell(&self, value: &CellValue) -> String {
        match value {
            CellValue::Text(s) => normalize_text(s),
            CellValue::Int(i) => i.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::DateTime(dt) => self.date_formatter.format(dt),
            CellValue::Time(t) => t.format(TIME_FORMAT).to_string(),
            CellValue::Duration(d) => format_duration(d),
            CellValue::Iso(s) => s.clone(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }

    /// 1行分のセル値をまとめてフォーマット
    pub fn format_row(&self, row: &[CellValue]) -> Vec<String> {
        row.iter().map(|value| self.format_cell(value)).collect()
    }
}

impl Default for CellFormatter {
    fn default() -> Self {
        Self::new(DateFormat::Iso8601)
    }
}

/// 文字列セルを正規化
///
/// 改行（`\r\n`および`\n`）を2文字のエスケープシーケンス`\n`に置換した後、
/// 前後の空白を除去します。先頭・末尾の改行はエスケープとして残ります
/// （例: `"\nvalue\n"` → `\nvalue\n`）。
pub(crate) fn normalize_text(s: &str) -> String {
    if !s.contains('\n') {
        return s.trim().to_string();
    }
    s.replace("\r\n", ESCAPED_NEWLINE)
        .replace('\n', ESCAPED_NEWLINE)
        .trim()
        .to_string()
}

/// 数値を最短の往復可能な10進表記に変換
///
/// 整数値の浮動小数点数は小数点なしで出力されます（例: `3.0` → `3`）。
fn format_number(value: f64) -> String {
    // -0.0 は "0" として出力する
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// 時間の長さを`H:MM:SS`形式に変換
///
/// 時間は24を超えても繰り上げません（例: 26時間 → `26:00:00`）。
fn format_duration(duration: &Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

/// 日付フォーマッター
///
/// 日付セルを`DateFormat`に従って文字列化します。エポック（1900年/1904年）の
/// 解決は読み込み時にcalamineが行うため、ここでは暦日時のみを扱います。
#[derive(Debug)]
pub(crate) struct DateFormatter {
    date_format: DateFormat,
}

impl DateFormatter {
    /// 日時をフォーマット
    ///
    /// カスタム形式の書き出しに失敗した場合はISO 8601形式にフォールバックします。
    pub fn format(&self, datetime: &NaiveDateTime) -> String {
        let mut formatted = String::new();
        if write!(formatted, "{}", datetime.format(self.date_format.pattern())).is_ok() {
            return formatted;
        }
        datetime
            .format(DateFormat::Iso8601.pattern())
            .to_string()
    }
}
