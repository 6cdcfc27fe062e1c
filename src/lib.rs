//! xlsxcsv - Batch converter from Excel workbooks to per-worksheet CSV files
//!
//! This crate reads every `.xlsx` / `.xlsm` workbook in a directory and writes one
//! CSV file per worksheet into a destination directory. Only stored cell values are
//! read (formulas are never evaluated), columns that are empty in every row are
//! dropped, and text cells are normalized: surrounding whitespace is stripped and
//! embedded line breaks are written as the two characters `\n`.
//!
//! Output files are named `<file>_<sheet>.csv`, or `<sheet>.csv` when the sheet
//! name equals the workbook's file name without extension.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Convert all workbooks in `spreadsheets/`, purging `output/csv` first
//!     let report = xlsxcsv::convert("spreadsheets", "output/csv", true)?;
//!     println!("{} CSV files written", report.sheet_count());
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use xlsxcsv::{ConverterBuilder, DateFormat, ErrorPolicy, LineTerminator};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_delimiter(b';')
//!         .with_line_terminator(LineTerminator::Lf)
//!         .with_date_format(DateFormat::Custom("%d.%m.%Y".to_string()))
//!         .with_error_policy(ErrorPolicy::Continue) // skip unreadable workbooks
//!         .build()?;
//!
//!     let report = converter.convert("spreadsheets", "output/csv")?;
//!     for failure in &report.failures {
//!         eprintln!("skipped {}: {}", failure.source_path.display(), failure.error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Archive Limits
//!
//! Each workbook is inspected before parsing. The default [`SecurityConfig`]
//! allows up to 1 GiB of uncompressed data, which a single worksheet may use on
//! its own; workbooks beyond that need a raised limit via
//! [`ConverterBuilder::with_security_config`].
//!
//! # Logging
//!
//! Progress is reported through the [`log`](https://docs.rs/log) facade: one `info`
//! record per workbook plus a run summary with the elapsed time, and `debug`
//! records per worksheet. The library never installs a logger.

mod api;
mod builder;
mod destination;
mod error;
mod formatter;
mod matrix;
mod output;
mod parser;
mod report;
mod scan;
mod security;
mod types;

use std::path::Path;

// 公開API
pub use api::{DateFormat, ErrorPolicy, LineTerminator};
pub use builder::{Converter, ConverterBuilder};
pub use error::XlsxToCsvError;
pub use report::{ConversionReport, FailedWorkbook, SheetReport, WorkbookReport};
pub use security::SecurityConfig;

/// 入力ディレクトリ内のワークブックをデフォルト設定で変換する
///
/// `ConverterBuilder::new().overwrite_destination(overwrite_destination)`で
/// 構築した`Converter`の`convert`と同じです。
///
/// # 引数
///
/// * `source_dir` - ワークブックを含むディレクトリ（存在しない場合は`InvalidInput`）
/// * `destination_dir` - CSVの出力先ディレクトリ（存在しない場合は作成）
/// * `overwrite_destination` - `true`の場合、既存の出力先を空にしてから書き出す
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    destination_dir: Q,
    overwrite_destination: bool,
) -> Result<ConversionReport, XlsxToCsvError> {
    ConverterBuilder::new()
        .overwrite_destination(overwrite_destination)
        .build()?
        .convert(source_dir, destination_dir)
}
