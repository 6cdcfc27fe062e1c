//! Source Scan Module
//!
//! 入力ディレクトリを走査し、変換対象のワークブックファイルを列挙するモジュール。

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::XlsxToCsvError;

/// 変換対象とする拡張子（大文字小文字を区別しない）
const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];

/// Excelのロックファイル（`~$Book.xlsx`など）の先頭文字
const LOCK_FILE_PREFIXES: [char; 2] = ['$', '~'];

/// ファイル名が変換対象のワークブックかどうかを判定
///
/// 拡張子が`.xlsx`または`.xlsm`で、ロックファイルではない場合に`true`を返します。
pub(crate) fn is_spreadsheet_file_name(file_name: &str) -> bool {
    if file_name.starts_with(&LOCK_FILE_PREFIXES[..]) {
        return false;
    }

    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => SPREADSHEET_EXTENSIONS
            .iter()
            .any(|ext| extension.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

/// 入力ディレクトリを検証する
///
/// # 戻り値
///
/// * `Ok(())` - パスが存在するディレクトリの場合
/// * `Err(XlsxToCsvError::InvalidInput)` - 存在しない、またはディレクトリではない場合
pub(crate) fn validate_source_dir(source_dir: &Path) -> Result<(), XlsxToCsvError> {
    if !source_dir.is_dir() {
        return Err(XlsxToCsvError::InvalidInput(format!(
            "Source '{}' is not a directory",
            source_dir.display()
        )));
    }
    Ok(())
}

/// 入力ディレクトリ直下のワークブックファイルを列挙する
///
/// サブディレクトリは走査しません。結果はファイル名の昇順に並べ替えるため、
/// 同じ入力に対しては常に同じ順序で処理されます。
pub(crate) fn list_workbooks(source_dir: &Path) -> Result<Vec<PathBuf>, XlsxToCsvError> {
    let mut workbooks = Vec::new();

    for entry in fs::read_dir(source_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let matched = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_spreadsheet_file_name);
        if matched {
            workbooks.push(path);
        } else {
            debug!("Skipping non-workbook file: [{}]", path.display());
        }
    }

    workbooks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(workbooks)
}
