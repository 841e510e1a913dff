use crate::book::Book;
use crate::cell::{CellStyle, CellValue, FormulaCell};
use crate::error::{Result, SheetError};
use crate::sheet::Worksheet;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use rust_xlsxwriter::{Format, Formula, Image, ObjectMovement, Workbook};
use std::io::Cursor;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => {
            // Excel stores dates as days since 1899-12-30
            CellValue::Float(dt.as_f64())
        }
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Absolute 1-based position of a cell inside a calamine range.
fn absolute_position(start: (u32, u32), row: usize, col: usize) -> Result<(u32, u16)> {
    let row = u32::try_from(row)
        .ok()
        .and_then(|r| r.checked_add(start.0 + 1));
    let col = u32::try_from(col)
        .ok()
        .and_then(|c| c.checked_add(start.1 + 1))
        .and_then(|c| u16::try_from(c).ok());
    match (row, col) {
        (Some(row), Some(col)) => Ok((row, col)),
        _ => Err(SheetError::InvalidWorkbook(
            "cell position exceeds worksheet limits".to_string(),
        )),
    }
}

fn load_values(sheet: &mut Worksheet, range: &Range<Data>) -> Result<()> {
    let Some(start) = range.start() else {
        return Ok(());
    };
    for (row, col, data) in range.used_cells() {
        let (row, col) = absolute_position(start, row, col)?;
        sheet.set_value(row, col, data_to_cell_value(data))?;
    }
    Ok(())
}

fn load_formulas(sheet: &mut Worksheet, formulas: &Range<String>) -> Result<()> {
    let Some(start) = formulas.start() else {
        return Ok(());
    };
    for (row, col, source) in formulas.used_cells() {
        if source.is_empty() {
            continue;
        }
        let (row, col) = absolute_position(start, row, col)?;
        let cached = sheet
            .get(row, col)
            .filter(|value| !value.is_null())
            .cloned()
            .map(Box::new);
        let source = if source.starts_with('=') {
            source.clone()
        } else {
            format!("={source}")
        };
        sheet.set_value(row, col, CellValue::Formula(FormulaCell { source, cached }))?;
    }
    Ok(())
}

fn format_for(style: CellStyle) -> Option<Format> {
    if style.is_plain() {
        return None;
    }
    let mut format = Format::new();
    if style.bold {
        format = format.set_bold();
    }
    if style.wrap_text {
        format = format.set_text_wrap();
    }
    Some(format)
}

/// Write a worksheet's cells, dimensions and images
fn write_to_worksheet(sheet: &Worksheet, worksheet: &mut rust_xlsxwriter::Worksheet) -> Result<()> {
    worksheet.set_name(sheet.name())?;

    for ((row, col), cell) in sheet.cells() {
        let (row, col) = (row - 1, col - 1);
        let format = format_for(cell.style);

        match (&cell.value, &format) {
            (CellValue::Null, None) => {}
            (CellValue::Null, Some(format)) => {
                worksheet.write_blank(row, col, format)?;
            }
            (CellValue::Bool(b), None) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            (CellValue::Bool(b), Some(format)) => {
                worksheet.write_boolean_with_format(row, col, *b, format)?;
            }
            (CellValue::Int(i), None) => {
                // Excel stores all numbers as f64, so integers > 2^53 may lose precision
                worksheet.write_number(row, col, *i as f64)?;
            }
            (CellValue::Int(i), Some(format)) => {
                worksheet.write_number_with_format(row, col, *i as f64, format)?;
            }
            (CellValue::Float(f), None) => {
                worksheet.write_number(row, col, *f)?;
            }
            (CellValue::Float(f), Some(format)) => {
                worksheet.write_number_with_format(row, col, *f, format)?;
            }
            (CellValue::String(s), None) => {
                worksheet.write_string(row, col, s)?;
            }
            (CellValue::String(s), Some(format)) => {
                worksheet.write_string_with_format(row, col, s, format)?;
            }
            (CellValue::Formula(formula), format) => {
                let mut value = Formula::new(&formula.source);
                if let Some(cached) = &formula.cached {
                    value = value.set_result(cached.to_string());
                }
                match format {
                    Some(format) => {
                        worksheet.write_formula_with_format(row, col, value, format)?;
                    }
                    None => {
                        worksheet.write_formula(row, col, value)?;
                    }
                }
            }
        }
    }

    for (col, width) in sheet.column_widths() {
        worksheet.set_column_width(col - 1, width)?;
    }
    for (row, height) in sheet.row_heights() {
        worksheet.set_row_height(row - 1, height)?;
    }

    for image in sheet.images() {
        let mut picture = Image::new_from_buffer(&image.bytes)?;
        let scale_width = f64::from(image.width) / picture.width();
        let scale_height = f64::from(image.height) / picture.height();
        picture = picture
            .set_scale_width(scale_width)
            .set_scale_height(scale_height)
            .set_object_movement(ObjectMovement::MoveButDontSizeWithCells);
        worksheet.insert_image(image.row - 1, image.col - 1, &picture)?;
    }

    Ok(())
}

impl Book {
    /// Load a book (all sheets) from a spreadsheet blob.
    ///
    /// Any container calamine recognizes is accepted (xlsx, xlsm, xlsb, xls,
    /// ods). Cell values and formulas are loaded at their original positions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWorkbook` if the bytes are not a readable spreadsheet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| SheetError::InvalidWorkbook(e.to_string()))?;

        let sheet_names: Vec<String> = workbook
            .sheet_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut book = Book::new();

        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| SheetError::InvalidWorkbook(e.to_string()))?;

            let sheet = book.add_sheet(&sheet_name)?;
            load_values(sheet, &range)?;

            match workbook.worksheet_formula(&sheet_name) {
                Ok(formulas) => load_formulas(sheet, &formulas)?,
                Err(e) => {
                    tracing::warn!(sheet = %sheet_name, "skipping formulas: {}", e);
                }
            }
        }

        tracing::debug!(sheets = book.sheet_count(), bytes = bytes.len(), "loaded workbook");
        Ok(book)
    }

    /// Serialize the book to a complete xlsx blob.
    ///
    /// # Errors
    ///
    /// Returns `Serialize` if the writer rejects a sheet name, cell or image.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        for sheet in self.sheets() {
            let worksheet = workbook.add_worksheet();
            write_to_worksheet(sheet, worksheet)?;
        }

        let bytes = workbook.save_to_buffer()?;
        tracing::debug!(sheets = self.sheet_count(), bytes = bytes.len(), "serialized workbook");
        Ok(bytes)
    }
}
