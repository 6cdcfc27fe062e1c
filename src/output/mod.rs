//! Output Module
//!
//! 出力ファイル名の決定と、CSV形式での書き出しを提供するモジュール。

mod csv_writer;
mod naming;

pub(crate) use csv_writer::CsvSheetWriter;
pub(crate) use naming::SheetSource;
