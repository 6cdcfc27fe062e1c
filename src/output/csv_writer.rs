//! CSV Writer
//!
//! 正規化済みのセル行列を区切り文字付きレコードとして書き出す。

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::api::LineTerminator;
use crate::error::XlsxToCsvError;
use crate::formatter::CellFormatter;
use crate::matrix::CellMatrix;

/// CSV形式のシートライター
///
/// 区切り文字・引用符・改行を含むフィールドのみを引用符で囲みます（RFC 4180）。
#[derive(Debug, Clone, Copy)]
pub(crate) struct CsvSheetWriter {
    delimiter: u8,
    terminator: LineTerminator,
}

impl CsvSheetWriter {
    pub fn new(delimiter: u8, terminator: LineTerminator) -> Self {
        Self {
            delimiter,
            terminator,
        }
    }

    /// セル行列を任意のライターに書き出す
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - すべてのレコードを書き出し、フラッシュした場合
    /// * `Err(XlsxToCsvError)` - 書き出しに失敗した場合
    pub fn write<W: Write>(
        &self,
        matrix: &CellMatrix,
        formatter: &CellFormatter,
        writer: W,
    ) -> Result<(), XlsxToCsvError> {
        let mut csv_writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(self.terminator.to_csv())
            .quote_style(QuoteStyle::Necessary)
            .from_writer(writer);

        for row in matrix.rows() {
            csv_writer.write_record(formatter.format_row(row))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// セル行列をファイルに書き出す
    ///
    /// 同名のファイルが存在する場合は置き換えます。
    pub fn write_file(
        &self,
        matrix: &CellMatrix,
        formatter: &CellFormatter,
        path: &Path,
    ) -> Result<(), XlsxToCsvError> {
        let file = File::create(path)?;
        self.write(matrix, formatter, file)
    }
}
