//! Destination Module
//!
//! 出力先ディレクトリの作成と、上書き指定時の既存内容の削除を行うモジュール。

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::XlsxToCsvError;

/// 出力先ディレクトリを準備する
///
/// # 引数
///
/// * `destination_dir` - 出力先ディレクトリ（親ディレクトリも含めて作成される）
/// * `source_dir` - 入力ディレクトリ（上書き時の安全確認に使用）
/// * `overwrite` - `true`の場合、既存の出力先を削除して空の状態で作り直す
///
/// # 戻り値
///
/// * `Ok(())` - 出力先が空または既存のディレクトリとして使用可能になった場合
/// * `Err(XlsxToCsvError::InvalidInput)` - 出力先がファイルとして存在する場合、
///   または上書きによって入力ディレクトリが削除される場合
/// * `Err(XlsxToCsvError::Io)` - ディレクトリの作成・削除に失敗した場合
pub(crate) fn prepare_destination(
    destination_dir: &Path,
    source_dir: &Path,
    overwrite: bool,
) -> Result<(), XlsxToCsvError> {
    if destination_dir.exists() {
        if !destination_dir.is_dir() {
            return Err(XlsxToCsvError::InvalidInput(format!(
                "Destination '{}' exists and is not a directory",
                destination_dir.display()
            )));
        }

        if overwrite {
            ensure_not_enclosing_source(destination_dir, source_dir)?;
            fs::remove_dir_all(destination_dir)?;
            warn!("{}'s contents removed.", destination_dir.display());
        }
    }

    if !destination_dir.exists() {
        fs::create_dir_all(destination_dir)?;
        debug!("Output folder \"{}\" created.", destination_dir.display());
    }

    debug!("Output directory to use: [{}].", destination_dir.display());
    Ok(())
}

/// 削除対象の出力先が入力ディレクトリ自身またはその祖先でないことを確認する
fn ensure_not_enclosing_source(
    destination_dir: &Path,
    source_dir: &Path,
) -> Result<(), XlsxToCsvError> {
    let destination = fs::canonicalize(destination_dir)?;
    let source = fs::canonicalize(source_dir)?;

    if source.starts_with(&destination) {
        return Err(XlsxToCsvError::InvalidInput(format!(
            "Refusing to purge destination '{}': it contains the source directory '{}'",
            destination_dir.display(),
            source_dir.display()
        )));
    }
    Ok(())
}
