//! Workbook Parser
//!
//! calamineを使用したワークブック読み込みのラッパー。
//! 数式は評価せず、キャッシュされた値（データのみ）を読み込みます。

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, Reader, SheetType, Xlsx, XlsxError};

use crate::error::XlsxToCsvError;
use crate::matrix::CellMatrix;

/// ワークブックパーサー
///
/// ワークブックはファイル単位で開かれ、パーサーのドロップ時に閉じられます。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX/XLSM）
    workbook: Xlsx<BufReader<File>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(XlsxToCsvError::Parse)` - ワークブックとして解析できない場合
    pub fn open(path: &Path) -> Result<Self, XlsxToCsvError> {
        let workbook: Xlsx<BufReader<File>> =
            open_workbook(path).map_err(|e: XlsxError| XlsxToCsvError::Parse(e.into()))?;
        Ok(Self { workbook })
    }

    /// ワークシート名をワークブック内の順序で取得
    ///
    /// チャートシートやダイアログシートなど、セルを持たないシートは除外します。
    /// 非表示シートは含めます。
    pub fn worksheet_names(&self) -> Vec<String> {
        self.workbook
            .sheets_metadata()
            .iter()
            .filter(|sheet| matches!(sheet.typ, SheetType::WorkSheet))
            .map(|sheet| sheet.name.clone())
            .collect()
    }

    /// ワークシートを読み込み、空列を除いたセル行列を構築する
    ///
    /// # 引数
    ///
    /// * `sheet_name` - 読み込むシート名
    ///
    /// # 戻り値
    ///
    /// * `Ok(CellMatrix)` - セル行列
    /// * `Err(XlsxToCsvError)` - シートの解析に失敗した場合
    pub fn read_matrix(&mut self, sheet_name: &str) -> Result<CellMatrix, XlsxToCsvError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| XlsxToCsvError::Parse(e.into()))?;

        Ok(CellMatrix::from_range(&range))
    }
}
