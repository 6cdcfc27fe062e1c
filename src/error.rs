//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxcsvクレート全体で使用するエラー型
///
/// ディレクトリの検証、ワークブックの読み込み、CSV書き出しの各段階で
/// 発生するすべてのエラーを統一的に扱います。
///
/// # エラーの種類
///
/// - `Io`: ディレクトリ作成・削除、ファイル読み書き中のI/Oエラー
/// - `Csv`: CSVレコードの書き出しエラー
/// - `Parse`: ワークブックの解析エラー（calamine由来）
/// - `Zip`: ZIPアーカイブとして開けないファイル
/// - `InvalidInput`: 入力ディレクトリ・出力ディレクトリが使用できない
/// - `Config`: 設定の検証に失敗した
/// - `SecurityViolation`: アーカイブの事前検査で制限を超えた
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxcsv::XlsxToCsvError;
///
/// match xlsxcsv::convert("input", "output", false) {
///     Err(XlsxToCsvError::InvalidInput(msg)) => eprintln!("{}", msg),
///     Err(e) => eprintln!("conversion failed: {}", e),
///     Ok(report) => println!("{} sheets written", report.sheet_count()),
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxToCsvError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSVレコードの書き出し中に発生したエラー
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// ワークブックの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    /// `#[from]`属性により、`calamine::Error`から自動的に変換されます。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 入力の検証に失敗したエラー
    ///
    /// 入力ディレクトリが存在しない、ディレクトリではない、
    /// 出力先がファイルとして存在する、などの場合に発生します。
    /// 出力は一切生成されていない状態で返されます。
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に無効な設定が検出された場合、
    /// または存在しないシートが指定された場合に発生します。
    ///
    /// ```rust,no_run
    /// use xlsxcsv::{ConverterBuilder, XlsxToCsvError};
    ///
    /// let result = ConverterBuilder::new().with_delimiter(b'"').build();
    /// assert!(matches!(result, Err(XlsxToCsvError::Config(_))));
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb、パストラバーサル、ファイルサイズ制限などの
    /// 事前検査に違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl XlsxToCsvError {
    /// 1つのワークブックに閉じたエラーかどうか
    ///
    /// `ErrorPolicy::Continue`の下では、このメソッドが`true`を返すエラーのみ
    /// 該当ファイルをスキップして処理を継続します。出力先のI/Oエラーなどは
    /// 常に処理全体を中断します。
    pub fn is_workbook_error(&self) -> bool {
        matches!(
            self,
            XlsxToCsvError::Parse(_)
                | XlsxToCsvError::Zip(_)
                | XlsxToCsvError::SecurityViolation(_)
        )
    }
}
