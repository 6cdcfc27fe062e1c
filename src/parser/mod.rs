//! Parser Module
//!
//! calamineを使用したワークブック解析。

mod workbook;

pub(crate) use workbook::WorkbookParser;
