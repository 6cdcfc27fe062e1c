//! Cell Matrix Module
//!
//! ワークシートのセルデータから、空列を除いた矩形のセル行列を構築するモジュール。
//! 行はすべて保持し、列は1つでも値を持つセルがある場合のみ保持します。

use calamine::{Data, Range};

use crate::types::CellValue;

/// 空列を除去した矩形のセル行列
///
/// すべての行は同じ列数（保持された列の数）を持ちます。
/// 列の相対順序と行の順序は元のワークシートのまま維持されます。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CellMatrix {
    /// 行データ（行 × 保持された列）
    rows: Vec<Vec<CellValue>>,

    /// 保持された列数
    cols: usize,

    /// 除去された空列の数
    dropped_cols: usize,
}

impl CellMatrix {
    /// 行単位のセルデータから行列を構築
    ///
    /// 行の長さが揃っていない場合、足りないセルは空セルとして扱います。
    ///
    /// # 引数
    ///
    /// * `grid` - 行単位のセルデータ（ジャグ配列可）
    ///
    /// # 戻り値
    ///
    /// 空列を除いた矩形の`CellMatrix`。保持する列が1つもない場合は行も0行になります。
    pub fn build(grid: Vec<Vec<CellValue>>) -> Self {
        // 1. 全体の列数（最長の行）を決定
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);

        // 2. 非空セルを1つ以上含む列を判定
        let retained: Vec<usize> = (0..width)
            .filter(|&col| {
                grid.iter()
                    .any(|row| row.get(col).is_some_and(|cell| !cell.is_empty()))
            })
            .collect();

        if retained.is_empty() {
            return Self {
                rows: Vec::new(),
                cols: 0,
                dropped_cols: width,
            };
        }

        // 3. 保持する列のみを抽出して行を再構成
        let rows = grid
            .into_iter()
            .map(|mut row| {
                retained
                    .iter()
                    .map(|&col| match row.get_mut(col) {
                        Some(cell) => std::mem::replace(cell, CellValue::Empty),
                        None => CellValue::Empty,
                    })
                    .collect()
            })
            .collect();

        Self {
            rows,
            cols: retained.len(),
            dropped_cols: width - retained.len(),
        }
    }

    /// calamineの`Range`から行列を構築
    ///
    /// `Range`は最初の非空セルから始まるため、シート先頭（1行目）からの
    /// 空行を補って行位置を維持します。先頭の空列はいずれにせよ除去対象のため
    /// 補わず、除去列数にのみ加算します。
    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((start_row, start_col)) = range.start() else {
            return Self::build(Vec::new());
        };

        let mut grid: Vec<Vec<CellValue>> = Vec::with_capacity(start_row as usize + range.height());
        grid.resize_with(start_row as usize, Vec::new);
        grid.extend(
            range
                .rows()
                .map(|row| row.iter().map(CellValue::from).collect::<Vec<_>>()),
        );

        let mut matrix = Self::build(grid);
        matrix.dropped_cols += start_col as usize;
        matrix
    }

    /// 行データを取得
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.cols
    }

    pub fn dropped_column_count(&self) -> usize {
        self.dropped_cols
    }
}
