//! Report Module
//!
//! 変換結果の集計（ワークブック・ワークシート単位）を表す型を定義するモジュール。

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// 1つのワークシートの変換結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    /// ワークシート名
    pub sheet_name: String,
    /// 書き出したCSVファイルのパス
    pub output_path: PathBuf,
    /// 書き出したレコード数
    pub rows: usize,
    /// 1レコードあたりのフィールド数（保持された列数）
    pub columns: usize,
    /// 除去された空列の数
    pub dropped_columns: usize,
}

/// 1つのワークブックの変換結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkbookReport {
    /// 入力ワークブックのパス
    pub source_path: PathBuf,
    /// ワークブック内の順序に並んだシートごとの結果
    pub sheets: Vec<SheetReport>,
}

/// `ErrorPolicy::Continue`の下でスキップされたワークブック
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedWorkbook {
    pub source_path: PathBuf,
    /// エラーメッセージ
    pub error: String,
}

/// ディレクトリ変換全体の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// 変換に成功したワークブック（処理順）
    pub workbooks: Vec<WorkbookReport>,
    /// スキップされたワークブック（処理順）
    pub failures: Vec<FailedWorkbook>,
    /// 処理全体の所要時間
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
}

impl ConversionReport {
    /// 書き出したCSVファイル（ワークシート）の総数
    pub fn sheet_count(&self) -> usize {
        self.workbooks.iter().map(|wb| wb.sheets.len()).sum()
    }

    /// すべてのワークブックが変換されたかどうか
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
