//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 日付・時刻セルの出力形式
///
/// ワークブックに日付として保存されたセルをCSVフィールドに変換する際の形式を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式（日付と時刻を空白で区切る）
    ///
    /// 例: `2025-11-20 00:00:00`
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxcsv::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), xlsxcsv::XlsxToCsvError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%d/%m/%Y".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

impl DateFormat {
    /// chronoに渡すフォーマット文字列
    pub(crate) fn pattern(&self) -> &str {
        match self {
            DateFormat::Iso8601 => "%Y-%m-%d %H:%M:%S",
            DateFormat::Custom(format_str) => format_str,
        }
    }
}

/// ワークブック単位のエラーの扱い
///
/// 解析できないワークブックに遭遇した場合の動作を指定します。
/// 出力先ディレクトリへのI/Oエラーはどちらの方針でも処理全体を中断します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorPolicy {
    /// 最初のエラーで処理全体を中断する（デフォルト）
    Abort,

    /// 失敗したワークブックを記録し、次のファイルの処理を継続する
    ///
    /// 失敗したファイルは`ConversionReport::failures`に記録されます。
    Continue,
}

/// レコードの終端文字
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LineTerminator {
    /// `\r\n`（RFC 4180、デフォルト）
    Crlf,

    /// `\n`
    Lf,
}

impl LineTerminator {
    pub(crate) fn to_csv(self) -> csv::Terminator {
        match self {
            LineTerminator::Crlf => csv::Terminator::CRLF,
            LineTerminator::Lf => csv::Terminator::Any(b'\n'),
        }
    }
}
