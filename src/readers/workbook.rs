use crate::error::LoadError;
use crate::utils::constants::{COL_FECHA, TIMESTAMP_OUTPUT_FORMAT};
use crate::utils::timestamp::excel_serial_to_datetime;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// xlsx, xlsm, xlsb and ods are zip containers
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// Legacy xls compound document
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC)
}

pub fn has_workbook_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| WORKBOOK_EXTENSIONS.iter().any(|w| ext.eq_ignore_ascii_case(w)))
        .unwrap_or(false)
}

/// A worksheet flattened to text cells
#[derive(Debug)]
pub struct SheetRows {
    pub headers: Vec<String>,
    /// Spreadsheet row number (1-based) and the cells of that row
    pub rows: Vec<(u64, Vec<String>)>,
}

/// Read the first worksheet of a workbook.
///
/// Trailing empty header cells are dropped and fully blank rows skipped, the
/// way a delimited export of the same sheet would look.
pub fn read_first_sheet(bytes: &[u8]) -> Result<SheetRows, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Ok(SheetRows {
            headers: Vec::new(),
            rows: Vec::new(),
        });
    };
    debug!(sheet = %sheet_name, "reading first worksheet");

    let range = workbook.worksheet_range(&sheet_name)?;
    let first_row = range.start().map(|(row, _)| u64::from(row)).unwrap_or(0);

    let mut rows = range.rows().enumerate();
    let headers = match rows.next() {
        Some((_, cells)) => {
            let mut headers: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| cell_text(cell, col))
                .collect();
            while headers.last().is_some_and(|h| h.is_empty()) {
                headers.pop();
            }
            headers
        }
        None => Vec::new(),
    };

    let rows = rows
        .filter(|(_, cells)| cells.iter().any(|cell| !is_blank(cell)))
        .map(|(i, cells)| {
            let line = first_row + i as u64 + 1;
            let mut texts: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| cell_text(cell, col))
                .collect();
            // Cells past the header only count when something was typed there
            while texts.len() > headers.len() && texts.last().is_some_and(|t| t.is_empty()) {
                texts.pop();
            }
            (line, texts)
        })
        .collect();

    Ok(SheetRows { headers, rows })
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Render a cell the way the text loader expects it.
///
/// Date cells and numeric `Fecha` cells become timestamps; error cells such
/// as `#N/A` become blanks.
fn cell_text(cell: &Data, col: usize) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Float(f) if col == COL_FECHA => serial_text(*f),
        Data::Float(f) => f.to_string(),
        Data::DateTime(dt) if col == COL_FECHA => serial_text(dt.as_f64()),
        Data::DateTime(dt) => dt.as_f64().to_string(),
    }
}

fn serial_text(serial: f64) -> String {
    excel_serial_to_datetime(serial)
        .map(|ts| ts.format(TIMESTAMP_OUTPUT_FORMAT).to_string())
        .unwrap_or_else(|| serial.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::CANONICAL_COLUMNS;
    use rust_xlsxwriter::{Format, Workbook};

    fn sample_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm");

        for (col, name) in CANONICAL_COLUMNS.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_string(1, 1, "20131366966").unwrap();
        sheet.write_number_with_format(1, 5, 44348.5, &date_format).unwrap();
        sheet.write_number(1, 6, 1.25).unwrap();
        sheet.write_number(1, 19, 18.5).unwrap();
        // Blank spacer row, then a second reading
        sheet.write_number(3, 0, 2.0).unwrap();
        sheet.write_number(3, 5, 44349.0).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_workbook_detection() {
        assert!(is_workbook(b"PK\x03\x04rest"));
        assert!(!is_workbook(b"ID,Fecha"));
        assert!(has_workbook_extension(Path::new("13_Monitoreo_Junio_2021.XLSX")));
        assert!(!has_workbook_extension(Path::new("monitoreo.csv")));
    }

    #[test]
    fn test_first_sheet_becomes_text_rows() {
        let bytes = sample_workbook();
        assert!(is_workbook(&bytes));

        let sheet = read_first_sheet(&bytes).unwrap();
        assert_eq!(sheet.headers.len(), 20);
        assert_eq!(sheet.headers[5], "Fecha");
        assert_eq!(sheet.rows.len(), 2);

        let (line, cells) = &sheet.rows[0];
        assert_eq!(*line, 2);
        assert_eq!(cells[0], "1");
        assert_eq!(cells[5], "2021-06-01 12:00:00");
        assert_eq!(cells[6], "1.25");
        assert_eq!(cells[7], "");

        let (line, cells) = &sheet.rows[1];
        assert_eq!(*line, 4);
        assert_eq!(cells[5], "2021-06-02 00:00:00");
    }

    #[test]
    fn test_garbage_zip_is_a_workbook_error() {
        let err = read_first_sheet(b"PK\x03\x04not really a zip").unwrap_err();
        assert!(matches!(err, LoadError::Workbook(_)));
    }
}
