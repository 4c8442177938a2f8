use crate::{Error, Result};
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use tracing::debug;

pub(super) fn csv_to_text(bytes: &[u8]) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(bytes);

    let header: Vec<String> = reader
        .headers()
        .map_err(Error::extraction)?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(Error::extraction)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("CSV table shape: ({}, {})", rows.len(), header.len());

    Ok(render_table(&header, &rows, true))
}

pub(super) fn xlsx_to_text(bytes: &[u8]) -> Result<String> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(Error::extraction)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::extraction("workbook contains no worksheets"))?
        .map_err(Error::extraction)?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let header = rows.next().unwrap_or_default();
    let body: Vec<Vec<String>> = rows.collect();

    debug!("Excel table shape: ({}, {})", body.len(), header.len());
    debug!("Excel columns: {:?}", header);
    if let Some(first) = body.first() {
        debug!("First row sample: {:?}", first);
    }

    let mut content = String::from("Excel File Contents:\n\n");
    content.push_str(&format!("Total Rows: {}\n", body.len()));
    content.push_str(&format!("Total Columns: {}\n\n", header.len()));
    content.push_str("Data:\n");
    content.push_str(&render_table(&header, &body, false));

    debug!(
        "Processed Excel content (first 500 chars):\n{}",
        content.chars().take(500).collect::<String>()
    );

    Ok(content)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{e:?}"),
        other => other.to_string(),
    }
}

/// Lays rows out as a fixed-width block: one header line, one line per row, every column
/// right-aligned to its widest cell. With `with_index` a zero-based row number leads each line.
pub(super) fn render_table(header: &[String], rows: &[Vec<String>], with_index: bool) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let mut widths: Vec<usize> = (0..columns)
        .map(|col| cell(header, col).chars().count())
        .collect();
    for row in rows {
        for (col, width) in widths.iter_mut().enumerate() {
            *width = (*width).max(cell(row, col).chars().count());
        }
    }

    let index_width = if with_index {
        rows.len().saturating_sub(1).to_string().len()
    } else {
        0
    };

    let render_line = |index: Option<String>, row: &[String]| {
        let mut parts = Vec::with_capacity(columns + 1);
        if with_index {
            parts.push(format!("{:<index_width$}", index.unwrap_or_default()));
        }
        for (col, &width) in widths.iter().enumerate() {
            parts.push(format!("{:>width$}", cell(row, col)));
        }
        parts.join("  ").trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_line(None, header));
    for (i, row) in rows.iter().enumerate() {
        lines.push(render_line(Some(i.to_string()), row.as_slice()));
    }
    lines.join("\n")
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_render_table_aligns_columns_right() {
        let header = strings(&["id", "requirement"]);
        let rows = vec![strings(&["1", "SSO"]), strings(&["10", "Audit log"])];

        let table = render_table(&header, &rows, false);
        assert_eq!(
            table,
            "id  requirement\n 1          SSO\n10    Audit log"
        );
    }

    #[test]
    fn test_render_table_with_index_column() {
        let header = strings(&["name"]);
        let rows = vec![strings(&["a"]), strings(&["bb"])];

        let table = render_table(&header, &rows, true);
        assert_eq!(table, "   name\n0     a\n1    bb");
    }

    #[test]
    fn test_render_table_pads_ragged_rows() {
        let header = strings(&["a", "b"]);
        let rows = vec![strings(&["1"]), strings(&["2", "3", "4"])];

        let table = render_table(&header, &rows, false);
        assert_eq!(table, "a  b\n1\n2  3  4");
    }

    #[test]
    fn test_csv_renders_header_and_rows() {
        let csv = b"ID,Requirement\n1,Support SSO login\n2,Export reports\n";
        let text = csv_to_text(csv).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("ID"));
        assert!(lines[0].ends_with("Requirement"));
        assert!(lines[1].starts_with('0'));
        assert!(lines[1].ends_with("Support SSO login"));
        assert!(lines[2].ends_with("Export reports"));
    }

    #[test]
    fn test_garbage_is_not_a_workbook() {
        let err = xlsx_to_text(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }
}
