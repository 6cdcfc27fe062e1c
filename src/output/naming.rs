//! Output File Naming
//!
//! ワークシートと、その元となったファイルのベース名の組から出力ファイル名を決定する。

/// 出力ファイルの拡張子
pub(crate) const CSV_EXTENSION: &str = ".csv";

/// ワークシートと元ファイルのベース名の組
///
/// ワークシートは常に、読み込み元ファイルのベース名（拡張子なし）と対で扱います。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SheetSource<'a> {
    /// 元ファイルのベース名（例: `Sheet1.xlsx` → `Sheet1`）
    pub file_stem: &'a str,
    /// ワークシート名
    pub sheet_name: &'a str,
}

impl<'a> SheetSource<'a> {
    pub fn new(file_stem: &'a str, sheet_name: &'a str) -> Self {
        Self {
            file_stem,
            sheet_name,
        }
    }

    /// 出力ファイル名を決定する
    ///
    /// ワークシート名が元ファイルのベース名と（文字列として）一致する場合は
    /// `<シート名>.csv`、それ以外は`<ベース名>_<シート名>.csv`になります。
    /// パス区切り文字と制御文字は`_`に置換されます。
    pub fn output_file_name(&self) -> String {
        let base = if self.sheet_name == self.file_stem {
            self.sheet_name.to_string()
        } else {
            format!("{}_{}", self.file_stem, self.sheet_name)
        };
        format!("{}{}", sanitize_file_name(&base), CSV_EXTENSION)
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
