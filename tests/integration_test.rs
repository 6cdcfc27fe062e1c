//! Integration Tests for xlsxcsv
//!
//! Workbooks are generated with rust_xlsxwriter into temporary directories and the
//! resulting CSV files are read back with the csv crate.

use rust_xlsxwriter::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xlsxcsv::{ConverterBuilder, DateFormat, ErrorPolicy, LineTerminator, XlsxToCsvError};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// Generate a workbook with the given sheet names, each holding one cell
    pub fn generate_named_sheets(path: &Path, names: &[&str]) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        for name in names {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*name)?;
            worksheet.write_string(0, 0, format!("{}_Data", name))?;
        }
        workbook.save(path)
    }

    /// Generate a 3 x 50 grid whose middle column is completely empty
    pub fn generate_grid_with_empty_column(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Grid")?;
        for row in 0..50u32 {
            worksheet.write_string(row, 0, format!("a{}", row))?;
            worksheet.write_string(row, 2, format!("c{}", row))?;
        }
        workbook.save(path)
    }

    /// Generate text cells with surrounding whitespace and embedded line breaks
    pub fn generate_text_cells(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Text")?;
        worksheet.write_string(0, 0, "  padded  ")?;
        worksheet.write_string(0, 1, "line1\nline2")?;
        worksheet.write_string(1, 0, "  multi\nline\n ")?;
        worksheet.write_string(1, 1, "a, \"quoted\" value")?;
        workbook.save(path)
    }

    /// Generate typed cells: numbers, booleans, a formula with a cached result and a date
    pub fn generate_typed_cells(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Typed")?;

        worksheet.write_number(0, 0, 42.0)?;
        worksheet.write_number(0, 1, 1.5)?;
        worksheet.write_number(0, 2, -0.25)?;

        worksheet.write_boolean(1, 0, true)?;
        worksheet.write_boolean(1, 1, false)?;
        worksheet.write_formula(1, 2, Formula::new("=1+1").set_result("2"))?;

        let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        let datetime = ExcelDateTime::from_ymd(2024, 1, 15)?.and_hms(10, 30, 0)?;
        worksheet.write_datetime_with_format(2, 0, &datetime, &date_format)?;
        let date_only = ExcelDateTime::from_ymd(1999, 12, 31)?;
        worksheet.write_datetime_with_format(2, 1, &date_only, &date_format)?;

        workbook.save(path)
    }

    /// Generate time-of-day cells next to full date-times
    pub fn generate_time_cells(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Times")?;

        let time_format = Format::new().set_num_format("hh:mm:ss");
        let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        worksheet.write_datetime_with_format(0, 0, &ExcelDateTime::from_hms(10, 30, 0)?, &time_format)?;
        worksheet.write_datetime_with_format(0, 1, &ExcelDateTime::from_hms(0, 0, 5)?, &time_format)?;
        let datetime = ExcelDateTime::from_ymd(2024, 1, 15)?.and_hms(7, 0, 0)?;
        worksheet.write_datetime_with_format(0, 2, &datetime, &datetime_format)?;

        workbook.save(path)
    }

    /// Generate a workbook with a visible and a hidden sheet
    pub fn generate_hidden_sheet(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let visible = workbook.add_worksheet();
        visible.set_name("Visible")?;
        visible.write_string(0, 0, "shown")?;

        let hidden = workbook.add_worksheet();
        hidden.set_name("Hidden")?;
        hidden.write_string(0, 0, "secret")?;
        hidden.set_hidden(true);

        workbook.save(path)
    }

    /// Generate a sheet whose data starts at C3
    pub fn generate_offset_data(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Offset")?;
        worksheet.write_string(2, 2, "x")?;
        worksheet.write_string(2, 3, "y")?;
        worksheet.write_string(3, 3, "z")?;
        workbook.save(path)
    }

    /// Generate a workbook with an empty sheet next to a filled one
    pub fn generate_with_empty_sheet(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let filled = workbook.add_worksheet();
        filled.set_name("Filled")?;
        filled.write_string(0, 0, "value")?;
        let empty = workbook.add_worksheet();
        empty.set_name("Empty")?;
        workbook.save(path)
    }
}

/// Create `in/` and `out/` under a fresh temporary directory
fn setup() -> (TempDir, PathBuf, PathBuf) {
    let root = TempDir::new().unwrap();
    let source = root.path().join("in");
    let destination = root.path().join("out");
    fs::create_dir(&source).unwrap();
    (root, source, destination)
}

/// Read a CSV file back into records
fn read_records(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// List the file names in a directory, sorted
fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_one_csv_per_worksheet() {
    let (_root, source, destination) = setup();
    fixtures::generate_named_sheets(&source.join("first.xlsx"), &["A", "B", "C"]).unwrap();
    fixtures::generate_named_sheets(&source.join("second.xlsm"), &["D"]).unwrap();

    let report = xlsxcsv::convert(&source, &destination, false).unwrap();

    assert_eq!(report.sheet_count(), 4);
    assert!(report.is_complete());
    assert_eq!(
        file_names(&destination),
        vec!["first_A.csv", "first_B.csv", "first_C.csv", "second_D.csv"]
    );
    assert_eq!(
        read_records(&destination.join("first_B.csv")),
        vec![vec!["B_Data".to_string()]]
    );
}

#[test]
fn test_sheet_named_like_file_drops_prefix() {
    let (_root, source, destination) = setup();
    fixtures::generate_named_sheets(&source.join("Sheet1.xlsx"), &["Alpha", "Beta", "Sheet1"])
        .unwrap();

    let report = xlsxcsv::convert(&source, &destination, false).unwrap();

    assert_eq!(
        file_names(&destination),
        vec!["Sheet1.csv", "Sheet1_Alpha.csv", "Sheet1_Beta.csv"]
    );
    let sheet_names: Vec<&str> = report.workbooks[0]
        .sheets
        .iter()
        .map(|sheet| sheet.sheet_name.as_str())
        .collect();
    assert_eq!(sheet_names, vec!["Alpha", "Beta", "Sheet1"]);
}

#[test]
fn test_empty_column_is_dropped() {
    let (_root, source, destination) = setup();
    fixtures::generate_grid_with_empty_column(&source.join("grid.xlsx")).unwrap();

    let report = xlsxcsv::convert(&source, &destination, false).unwrap();

    let records = read_records(&destination.join("grid_Grid.csv"));
    assert_eq!(records.len(), 50);
    assert!(records.iter().all(|record| record.len() == 2));
    assert_eq!(records[0], vec!["a0", "c0"]);
    assert_eq!(records[49], vec!["a49", "c49"]);

    let sheet = &report.workbooks[0].sheets[0];
    assert_eq!(sheet.rows, 50);
    assert_eq!(sheet.columns, 2);
    assert_eq!(sheet.dropped_columns, 1);
}

#[test]
fn test_text_normalization() {
    let (_root, source, destination) = setup();
    fixtures::generate_text_cells(&source.join("text.xlsx")).unwrap();

    xlsxcsv::convert(&source, &destination, false).unwrap();

    let records = read_records(&destination.join("text_Text.csv"));
    assert_eq!(records[0], vec!["padded", "line1\\nline2"]);
    assert_eq!(records[1], vec!["multi\\nline\\n", "a, \"quoted\" value"]);

    let raw = fs::read_to_string(destination.join("text_Text.csv")).unwrap();
    assert_eq!(
        raw,
        "padded,line1\\nline2\r\nmulti\\nline\\n,\"a, \"\"quoted\"\" value\"\r\n"
    );
}

#[test]
fn test_typed_values_are_rendered() {
    let (_root, source, destination) = setup();
    fixtures::generate_typed_cells(&source.join("typed.xlsx")).unwrap();

    xlsxcsv::convert(&source, &destination, false).unwrap();

    let records = read_records(&destination.join("typed_Typed.csv"));
    assert_eq!(records[0], vec!["42", "1.5", "-0.25"]);
    assert_eq!(records[1], vec!["TRUE", "FALSE", "2"]);
    assert_eq!(
        records[2],
        vec!["2024-01-15 10:30:00", "1999-12-31 00:00:00", ""]
    );
}

#[test]
fn test_time_only_cells_have_no_date_part() {
    let (_root, source, destination) = setup();
    fixtures::generate_time_cells(&source.join("times.xlsx")).unwrap();

    xlsxcsv::convert(&source, &destination, false).unwrap();

    let records = read_records(&destination.join("times_Times.csv"));
    assert_eq!(records[0], vec!["10:30:00", "00:00:05", "2024-01-15 07:00:00"]);
}

#[test]
fn test_custom_date_format_and_dialect() {
    let (_root, source, destination) = setup();
    fixtures::generate_typed_cells(&source.join("typed.xlsx")).unwrap();

    let converter = ConverterBuilder::new()
        .with_delimiter(b';')
        .with_line_terminator(LineTerminator::Lf)
        .with_date_format(DateFormat::Custom("%d.%m.%Y".to_string()))
        .build()
        .unwrap();
    converter.convert(&source, &destination).unwrap();

    let raw = fs::read_to_string(destination.join("typed_Typed.csv")).unwrap();
    assert_eq!(raw, "42;1.5;-0.25\nTRUE;FALSE;2\n15.01.2024;31.12.1999;\n");
}

#[test]
fn test_hidden_sheet_is_converted() {
    let (_root, source, destination) = setup();
    fixtures::generate_hidden_sheet(&source.join("book.xlsx")).unwrap();

    xlsxcsv::convert(&source, &destination, false).unwrap();

    assert_eq!(
        file_names(&destination),
        vec!["book_Hidden.csv", "book_Visible.csv"]
    );
    assert_eq!(
        read_records(&destination.join("book_Hidden.csv")),
        vec![vec!["secret".to_string()]]
    );
}

#[test]
fn test_leading_blank_rows_are_kept() {
    let (_root, source, destination) = setup();
    fixtures::generate_offset_data(&source.join("offset.xlsx")).unwrap();

    let report = xlsxcsv::convert(&source, &destination, false).unwrap();

    let raw = fs::read_to_string(destination.join("offset_Offset.csv")).unwrap();
    assert_eq!(raw, ",\r\n,\r\nx,y\r\n,z\r\n");

    let sheet = &report.workbooks[0].sheets[0];
    assert_eq!(sheet.rows, 4);
    assert_eq!(sheet.columns, 2);
    assert_eq!(sheet.dropped_columns, 2);
}

#[test]
fn test_empty_sheet_produces_empty_file() {
    let (_root, source, destination) = setup();
    fixtures::generate_with_empty_sheet(&source.join("book.xlsx")).unwrap();

    let report = xlsxcsv::convert(&source, &destination, false).unwrap();

    assert_eq!(report.sheet_count(), 2);
    let empty = destination.join("book_Empty.csv");
    assert!(empty.exists());
    assert_eq!(fs::read(&empty).unwrap().len(), 0);
}

#[test]
fn test_missing_source_leaves_destination_untouched() {
    let root = TempDir::new().unwrap();
    let destination = root.path().join("out");
    fs::create_dir(&destination).unwrap();
    fs::write(destination.join("keep.csv"), b"a,b\r\n").unwrap();

    let result = xlsxcsv::convert(root.path().join("missing"), &destination, true);

    assert!(matches!(result, Err(XlsxToCsvError::InvalidInput(_))));
    assert_eq!(file_names(&destination), vec!["keep.csv"]);

    let fresh = root.path().join("fresh");
    let result = xlsxcsv::convert(root.path().join("missing"), &fresh, false);
    assert!(result.is_err());
    assert!(!fresh.exists());
}

#[test]
fn test_overwrite_is_idempotent() {
    let (_root, source, destination) = setup();
    fixtures::generate_typed_cells(&source.join("typed.xlsx")).unwrap();
    fixtures::generate_grid_with_empty_column(&source.join("grid.xlsx")).unwrap();

    xlsxcsv::convert(&source, &destination, true).unwrap();
    let first: Vec<Vec<u8>> = file_names(&destination)
        .iter()
        .map(|name| fs::read(destination.join(name)).unwrap())
        .collect();

    fs::write(destination.join("stale.csv"), b"old").unwrap();
    xlsxcsv::convert(&source, &destination, true).unwrap();
    let second: Vec<Vec<u8>> = file_names(&destination)
        .iter()
        .map(|name| fs::read(destination.join(name)).unwrap())
        .collect();

    assert_eq!(first, second);
    assert!(!destination.join("stale.csv").exists());
}

#[test]
fn test_without_overwrite_existing_files_survive() {
    let (_root, source, destination) = setup();
    fixtures::generate_named_sheets(&source.join("book.xlsx"), &["A"]).unwrap();
    fs::create_dir(&destination).unwrap();
    fs::write(destination.join("unrelated.txt"), b"keep").unwrap();

    xlsxcsv::convert(&source, &destination, false).unwrap();

    assert_eq!(file_names(&destination), vec!["book_A.csv", "unrelated.txt"]);
}

#[test]
fn test_non_workbook_files_are_ignored() {
    let (_root, source, destination) = setup();
    fixtures::generate_named_sheets(&source.join("book.xlsx"), &["A"]).unwrap();
    fixtures::generate_named_sheets(&source.join("UPPER.XLSX"), &["B"]).unwrap();
    fs::write(source.join("~$book.xlsx"), b"lock").unwrap();
    fs::write(source.join("notes.txt"), b"text").unwrap();
    fs::write(source.join("legacy.xls"), b"old").unwrap();
    fs::create_dir(source.join("nested.xlsx")).unwrap();
    fixtures::generate_named_sheets(&source.join("nested.xlsx").join("inner.xlsx"), &["C"])
        .unwrap();

    let report = xlsxcsv::convert(&source, &destination, false).unwrap();

    assert_eq!(report.workbooks.len(), 2);
    assert_eq!(file_names(&destination), vec!["UPPER_B.csv", "book_A.csv"]);
}

#[test]
fn test_empty_source_directory() {
    let (_root, source, destination) = setup();

    let report = xlsxcsv::convert(&source, &destination, false).unwrap();

    assert_eq!(report.sheet_count(), 0);
    assert!(destination.is_dir());
    assert!(file_names(&destination).is_empty());
}

#[test]
fn test_corrupt_workbook_aborts_by_default() {
    let (_root, source, destination) = setup();
    fixtures::generate_named_sheets(&source.join("a.xlsx"), &["A"]).unwrap();
    fs::write(source.join("b.xlsx"), b"this is not a zip archive").unwrap();
    fixtures::generate_named_sheets(&source.join("c.xlsx"), &["C"]).unwrap();

    let result = xlsxcsv::convert(&source, &destination, false);

    match result {
        Err(e) => assert!(e.is_workbook_error(), "unexpected error: {:?}", e),
        Ok(_) => panic!("Expected conversion to abort"),
    }
    // Workbooks processed before the failure keep their output
    assert_eq!(file_names(&destination), vec!["a_A.csv"]);
}

#[test]
fn test_corrupt_workbook_is_skipped_with_continue() {
    let (_root, source, destination) = setup();
    fixtures::generate_named_sheets(&source.join("a.xlsx"), &["A"]).unwrap();
    fs::write(source.join("b.xlsx"), b"this is not a zip archive").unwrap();
    fixtures::generate_named_sheets(&source.join("c.xlsx"), &["C"]).unwrap();

    let converter = ConverterBuilder::new()
        .with_error_policy(ErrorPolicy::Continue)
        .build()
        .unwrap();
    let report = converter.convert(&source, &destination).unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source_path, source.join("b.xlsx"));
    assert_eq!(report.workbooks.len(), 2);
    assert_eq!(file_names(&destination), vec!["a_A.csv", "c_C.csv"]);
}

#[test]
fn test_overwrite_refuses_to_purge_source() {
    let (_root, source, _destination) = setup();
    fixtures::generate_named_sheets(&source.join("book.xlsx"), &["A"]).unwrap();

    let result = xlsxcsv::convert(&source, &source, true);

    assert!(matches!(result, Err(XlsxToCsvError::InvalidInput(_))));
    assert!(source.join("book.xlsx").exists());
}

#[test]
fn test_destination_inside_source_is_not_scanned() {
    let (_root, source, _destination) = setup();
    fixtures::generate_named_sheets(&source.join("book.xlsx"), &["A"]).unwrap();
    let destination = source.join("csv");

    xlsxcsv::convert(&source, &destination, true).unwrap();
    let report = xlsxcsv::convert(&source, &destination, true).unwrap();

    assert_eq!(report.workbooks.len(), 1);
    assert_eq!(file_names(&destination), vec!["book_A.csv"]);
}

#[test]
fn test_convert_workbook() {
    let (_root, source, destination) = setup();
    let path = source.join("Sheet1.xlsx");
    fixtures::generate_named_sheets(&path, &["Sheet1", "Other"]).unwrap();
    fs::create_dir(&destination).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let report = converter.convert_workbook(&path, &destination).unwrap();

    assert_eq!(report.source_path, path);
    assert_eq!(report.sheets.len(), 2);
    assert_eq!(report.sheets[0].output_path, destination.join("Sheet1.csv"));
    assert_eq!(
        report.sheets[1].output_path,
        destination.join("Sheet1_Other.csv")
    );
}

#[test]
fn test_convert_sheet_to_writer() {
    let (_root, source, _destination) = setup();
    let path = source.join("grid.xlsx");
    fixtures::generate_grid_with_empty_column(&path).unwrap();

    let converter = ConverterBuilder::new()
        .with_line_terminator(LineTerminator::Lf)
        .build()
        .unwrap();
    let mut output = Vec::new();
    converter
        .convert_sheet_to_writer(&path, "Grid", &mut output)
        .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.starts_with("a0,c0\na1,c1\n"));
    assert_eq!(text.lines().count(), 50);
}

#[test]
fn test_convert_sheet_to_writer_unknown_sheet() {
    let (_root, source, _destination) = setup();
    let path = source.join("book.xlsx");
    fixtures::generate_named_sheets(&path, &["A"]).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert_sheet_to_writer(&path, "Missing", &mut Vec::<u8>::new());

    match result {
        Err(XlsxToCsvError::Config(msg)) => assert!(msg.contains("Missing")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}
