//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::format::{Item, StrftimeItems};
use log::{debug, info, warn};

use crate::api::{DateFormat, ErrorPolicy, LineTerminator};
use crate::destination::prepare_destination;
use crate::error::XlsxToCsvError;
use crate::formatter::CellFormatter;
use crate::output::{CsvSheetWriter, SheetSource};
use crate::parser::WorkbookParser;
use crate::report::{ConversionReport, FailedWorkbook, SheetReport, WorkbookReport};
use crate::scan::{list_workbooks, validate_source_dir};
use crate::security::SecurityConfig;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 既存の出力先ディレクトリを削除してから書き出すか
    pub overwrite_destination: bool,

    /// ワークブック単位のエラーの扱い
    pub error_policy: ErrorPolicy,

    /// フィールド区切り文字
    pub delimiter: u8,

    /// レコードの終端文字
    pub line_terminator: LineTerminator,

    /// 日付形式
    pub date_format: DateFormat,

    /// アーカイブ事前検査の制限値
    pub security: SecurityConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            overwrite_destination: false,
            error_policy: ErrorPolicy::Abort,
            delimiter: b',',
            line_terminator: LineTerminator::Crlf,
            date_format: DateFormat::Iso8601,
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxcsv::{ConverterBuilder, ErrorPolicy};
///
/// # fn main() -> Result<(), xlsxcsv::XlsxToCsvError> {
/// let converter = ConverterBuilder::new()
///     .overwrite_destination(true)
///     .with_error_policy(ErrorPolicy::Continue)
///     .build()?;
/// let report = converter.convert("spreadsheets", "output/csv")?;
/// println!("{} files written", report.sheet_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 出力先の上書き: しない
    /// - エラー方針: 最初のエラーで中断
    /// - 区切り文字: `,`
    /// - 終端文字: `\r\n`
    /// - 日付形式: `%Y-%m-%d %H:%M:%S`
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 既存の出力先ディレクトリを削除してから書き出すかを指定する
    ///
    /// `true`の場合、出力先ディレクトリは空の状態で作り直されます。
    pub fn overwrite_destination(mut self, overwrite: bool) -> Self {
        self.config.overwrite_destination = overwrite;
        self
    }

    /// 解析できないワークブックに遭遇した場合の動作を指定する
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    /// フィールド区切り文字を指定する
    ///
    /// ASCII文字のみ指定できます。`"`・`\r`・`\n`は`build()`時にエラーになります。
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// レコードの終端文字を指定する
    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.config.line_terminator = terminator;
        self
    }

    /// 日付セルの出力形式を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxcsv::{ConverterBuilder, DateFormat};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y/%m/%d".to_string()));
    /// ```
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// アーカイブ事前検査の制限値を指定する
    pub fn with_security_config(mut self, security: SecurityConfig) -> Self {
        self.config.security = security;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `XlsxToCsvError::Config(String)`: 設定の検証に失敗した場合
    ///   * 区切り文字がASCII以外、または`"`・`\r`・`\n`
    ///   * カスタム日付形式が空、または不正な書式指定子を含む
    pub fn build(self) -> Result<Converter, XlsxToCsvError> {
        // 1. 区切り文字の検証
        let delimiter = self.config.delimiter;
        if !delimiter.is_ascii() || matches!(delimiter, b'"' | b'\r' | b'\n') {
            return Err(XlsxToCsvError::Config(format!(
                "Invalid delimiter: {:?}",
                delimiter as char
            )));
        }

        // 2. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            let has_error = StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error));
            if format_str.is_empty() || has_error {
                return Err(XlsxToCsvError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// 入力ディレクトリ内のワークブックを、ワークシートごとのCSVファイルに変換します。
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,

    /// CSVライター
    writer: CsvSheetWriter,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(config.date_format.clone()),
            writer: CsvSheetWriter::new(config.delimiter, config.line_terminator),
            config,
        }
    }

    /// 入力ディレクトリ内のすべてのワークブックを変換する
    ///
    /// # 引数
    ///
    /// * `source_dir` - ワークブック（`.xlsx`/`.xlsm`）を含むディレクトリ（直下のみ走査）
    /// * `destination_dir` - CSVの出力先ディレクトリ（存在しない場合は作成）
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConversionReport)` - 変換結果の集計
    /// * `Err(XlsxToCsvError::InvalidInput)` - 入力ディレクトリが使用できない場合
    ///   （出力先には一切触れません）
    /// * `Err(XlsxToCsvError)` - その他のエラー。書き出し済みのファイルは残ります
    ///
    /// # 処理フロー
    ///
    /// 1. 入力ディレクトリの検証
    /// 2. 出力先ディレクトリの準備（作成・上書き時の削除）
    /// 3. ワークブックファイルの列挙（ファイル名順）
    /// 4. ワークブックごとにワークシートをCSVへ変換
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source_dir: P,
        destination_dir: Q,
    ) -> Result<ConversionReport, XlsxToCsvError> {
        let start = Instant::now();
        let source_dir = source_dir.as_ref();
        let destination_dir = destination_dir.as_ref();

        // 1. 入力の検証
        validate_source_dir(source_dir)?;
        debug!("Input directory to use: [{}].", source_dir.display());

        // 2. 出力先の作成・検証
        prepare_destination(destination_dir, source_dir, self.config.overwrite_destination)?;

        // 3. ワークブックの列挙
        let workbook_paths = list_workbooks(source_dir)?;
        info!(
            "Found [{}] spreadsheet files in \"{}\".",
            workbook_paths.len(),
            source_dir.display()
        );

        // 4. 各ワークブックの変換
        let mut report = ConversionReport::default();
        let mut written: HashSet<PathBuf> = HashSet::new();

        for path in workbook_paths {
            match self.convert_workbook(&path, destination_dir) {
                Ok(workbook_report) => {
                    for sheet in &workbook_report.sheets {
                        if !written.insert(sheet.output_path.clone()) {
                            warn!(
                                "\"{}\" overwrote a file written earlier in this run (sheet '{}' of \"{}\").",
                                sheet.output_path.display(),
                                sheet.sheet_name,
                                path.display()
                            );
                        }
                    }
                    report.workbooks.push(workbook_report);
                }
                Err(e)
                    if self.config.error_policy == ErrorPolicy::Continue
                        && e.is_workbook_error() =>
                {
                    warn!("Skipping \"{}\": {}", path.display(), e);
                    report.failures.push(FailedWorkbook {
                        source_path: path,
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        report.elapsed = start.elapsed();
        info!(
            "Spreadsheets structured to CSV in \"{}\" in [{:?}] ({} files, {} skipped).",
            destination_dir.display(),
            report.elapsed,
            report.sheet_count(),
            report.failures.len()
        );

        Ok(report)
    }

    /// 1つのワークブックを変換する
    ///
    /// 出力先ディレクトリは既に存在している必要があります。
    /// ディレクトリの検証・削除は行いません。
    ///
    /// # 引数
    ///
    /// * `path` - ワークブックファイルのパス
    /// * `destination_dir` - CSVの出力先ディレクトリ
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookReport)` - ワークシートごとの変換結果
    /// * `Err(XlsxToCsvError)` - 事前検査・解析・書き出しのいずれかに失敗した場合
    pub fn convert_workbook<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        path: P,
        destination_dir: Q,
    ) -> Result<WorkbookReport, XlsxToCsvError> {
        let path = path.as_ref();
        let destination_dir = destination_dir.as_ref();

        let mut parser = self.open_workbook(path)?;
        let file_stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let sheet_names = parser.worksheet_names();
        let mut sheets = Vec::with_capacity(sheet_names.len());

        for sheet_name in &sheet_names {
            let matrix = parser.read_matrix(sheet_name)?;
            let file_name = SheetSource::new(&file_stem, sheet_name).output_file_name();
            debug!(
                "\"{}\" contents parsed: {} rows x {} columns ({} empty columns dropped).",
                file_name,
                matrix.row_count(),
                matrix.column_count(),
                matrix.dropped_column_count()
            );

            let output_path = destination_dir.join(&file_name);
            self.writer
                .write_file(&matrix, &self.formatter, &output_path)?;
            debug!("'{}' written to \"{}\".", sheet_name, output_path.display());

            sheets.push(SheetReport {
                sheet_name: sheet_name.clone(),
                output_path,
                rows: matrix.row_count(),
                columns: matrix.column_count(),
                dropped_columns: matrix.dropped_column_count(),
            });
        }

        info!(
            "Converted [{}] worksheets from \"{}\".",
            sheets.len(),
            path.display()
        );

        Ok(WorkbookReport {
            source_path: path.to_path_buf(),
            sheets,
        })
    }

    /// 1つのワークシートを任意のライターに書き出す
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 書き出しに成功した場合
    /// * `Err(XlsxToCsvError::Config)` - シートが存在しない場合
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxcsv::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsxcsv::XlsxToCsvError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// converter.convert_sheet_to_writer("book.xlsx", "Sheet1", std::io::stdout())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert_sheet_to_writer<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        sheet_name: &str,
        writer: W,
    ) -> Result<(), XlsxToCsvError> {
        let path = path.as_ref();
        let mut parser = self.open_workbook(path)?;

        if !parser.worksheet_names().iter().any(|name| name == sheet_name) {
            return Err(XlsxToCsvError::Config(format!(
                "Sheet '{}' not found",
                sheet_name
            )));
        }

        let matrix = parser.read_matrix(sheet_name)?;
        self.writer.write(&matrix, &self.formatter, writer)
    }

    fn open_workbook(&self, path: &Path) -> Result<WorkbookParser, XlsxToCsvError> {
        self.config.security.inspect_file(path)?;
        let parser = WorkbookParser::open(path)?;
        info!(
            "Opened spreadsheet: [{}].",
            path.file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default()
        );
        Ok(parser)
    }
}
