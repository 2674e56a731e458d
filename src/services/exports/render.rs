//! 表格渲染为 CSV 或 XLSX

use rust_xlsxwriter::{Format, Workbook};

use crate::errors::{CampusError, Result};
use crate::models::exports::requests::ExportFormat;

/// 单元格
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub sheet: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(sheet: &'static str, headers: Vec<&'static str>) -> Self {
        Self {
            sheet,
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

pub fn render(format: ExportFormat, table: &Table) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => render_csv(table),
        ExportFormat::Xlsx => render_xlsx(table),
    }
}

fn render_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.headers)
        .map_err(|e| CampusError::export(format!("CSV 写入失败: {e}")))?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(Cell::to_text))
            .map_err(|e| CampusError::export(format!("CSV 写入失败: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| CampusError::export(format!("CSV 写入失败: {e}")))
}

/// 列宽上限
const MAX_COLUMN_WIDTH: usize = 50;

fn render_xlsx(table: &Table) -> Result<Vec<u8>> {
    let xlsx_err = |e: rust_xlsxwriter::XlsxError| CampusError::export(format!("XLSX 生成失败: {e}"));

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(table.sheet).map_err(xlsx_err)?;

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_err)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col_num = col as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet
                        .write_string(row_num, col_num, s.as_str())
                        .map_err(xlsx_err)?;
                }
                Cell::Number(n) => {
                    worksheet
                        .write_number(row_num, col_num, *n)
                        .map_err(xlsx_err)?;
                }
                Cell::Empty => {}
            }
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(cell.to_text().chars().count());
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let width = (width + 2).min(MAX_COLUMN_WIDTH) as f64;
        worksheet
            .set_column_width(col as u16, width)
            .map_err(xlsx_err)?;
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new("Students", vec!["Number", "Name", "Balance"]);
        table.push(vec!["STU0001".into(), "Awa, Diallo".into(), 1500.5.into()]);
        table.push(vec!["STU0002".into(), Cell::from(None::<String>), 0.0.into()]);
        table
    }

    #[test]
    fn test_csv_quotes_and_empty_cells() {
        let bytes = render(ExportFormat::Csv, &sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Number,Name,Balance");
        assert_eq!(lines[1], "STU0001,\"Awa, Diallo\",1500.5");
        assert_eq!(lines[2], "STU0002,,0");
    }

    #[test]
    fn test_xlsx_is_zip_archive() {
        let bytes = render(ExportFormat::Xlsx, &sample()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
