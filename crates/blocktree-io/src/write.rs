use std::io::Write;
use std::path::{Path, PathBuf};

use blocktree_model::{Edge, ExtractionResult, RemarkRecord};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::Error;

/// Output name used when the caller does not pick one.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "parent_child_result.xlsx";

pub const RESULT_SHEET_NAME: &str = "Result";
pub const REMARK_SHEET_NAME: &str = "Remark";

const EDGE_HEADER: [&str; 2] = ["parent", "child"];
const REMARK_HEADER: [&str; 2] = ["block_label", "remark_text"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One workbook with a `Result` sheet and, when there are remarks, a `Remark` sheet.
    Xlsx,
    /// One CSV file for edges and a sibling `_remark.csv` file for remarks.
    Csv,
    /// A single JSON document with `edges` and `remarks` arrays.
    Json,
}

impl OutputFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Infer the format from an output path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(OutputFormat::Xlsx),
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Write `result` to `path` in the given format.
pub fn write_result(
    result: &ExtractionResult,
    format: OutputFormat,
    path: &Path,
) -> Result<(), Error> {
    match format {
        OutputFormat::Xlsx => write_result_xlsx(result, path),
        OutputFormat::Csv => write_result_csv(result, path, &remark_csv_path(path)),
        OutputFormat::Json => {
            let file = std::fs::File::create(path).map_err(|source| Error::WriteIo {
                path: path.to_path_buf(),
                source,
            })?;
            write_result_json(result, std::io::BufWriter::new(file))
        }
    }
}

/// Write the two-sheet result workbook.
///
/// The `Remark` sheet is only added when there is at least one remark.
pub fn write_result_xlsx(result: &ExtractionResult, path: &Path) -> Result<(), Error> {
    let mut workbook = result_workbook(result)?;
    workbook.save(path)?;
    log::debug!("wrote result workbook `{}`", path.display());
    Ok(())
}

/// Build the result workbook in memory.
pub(crate) fn result_workbook(result: &ExtractionResult) -> Result<Workbook, Error> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(RESULT_SHEET_NAME)?;
    write_table(
        sheet,
        &header,
        EDGE_HEADER,
        result.edges.iter().map(|e| [e.parent.as_str(), e.child.as_str()]),
    )?;

    if result.has_remarks() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(REMARK_SHEET_NAME)?;
        write_table(
            sheet,
            &header,
            REMARK_HEADER,
            result
                .remarks
                .iter()
                .map(|r| [r.block_label.as_str(), r.remark_text.as_str()]),
        )?;
    }

    Ok(workbook)
}

fn write_table<'a>(
    sheet: &mut Worksheet,
    header_format: &Format,
    header: [&str; 2],
    rows: impl Iterator<Item = [&'a str; 2]>,
) -> Result<(), Error> {
    for (col, title) in (0u16..).zip(header) {
        sheet.write_string_with_format(0, col, title, header_format)?;
    }
    for (row, cells) in (1u32..).zip(rows) {
        for (col, value) in (0u16..).zip(cells) {
            sheet.write_string(row, col, value)?;
        }
    }
    sheet.autofit();
    Ok(())
}

/// Sibling path for the remark table of a CSV export (`out.csv` -> `out_remark.csv`).
pub fn remark_csv_path(edges_path: &Path) -> PathBuf {
    let stem = edges_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "result".to_string());
    edges_path.with_file_name(format!("{stem}_remark.csv"))
}

/// Write edges to `edges_path` and, when there are remarks, remarks to `remarks_path`.
///
/// Without remarks any existing `remarks_path` is removed, so a rerun never leaves a
/// remark table from an earlier result next to the new edges.
pub fn write_result_csv(
    result: &ExtractionResult,
    edges_path: &Path,
    remarks_path: &Path,
) -> Result<(), Error> {
    write_edges_csv(&result.edges, create_file(edges_path)?)?;
    if result.has_remarks() {
        write_remarks_csv(&result.remarks, create_file(remarks_path)?)?;
    } else {
        remove_stale(remarks_path)?;
    }
    Ok(())
}

fn remove_stale(path: &Path) -> Result<(), Error> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("removed stale `{}`", path.display());
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::WriteIo {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn write_edges_csv<W: Write>(edges: &[Edge], writer: W) -> Result<(), Error> {
    write_csv_table(
        writer,
        EDGE_HEADER,
        edges.iter().map(|e| [e.parent.as_str(), e.child.as_str()]),
    )
}

pub fn write_remarks_csv<W: Write>(remarks: &[RemarkRecord], writer: W) -> Result<(), Error> {
    write_csv_table(
        writer,
        REMARK_HEADER,
        remarks
            .iter()
            .map(|r| [r.block_label.as_str(), r.remark_text.as_str()]),
    )
}

fn write_csv_table<'a, W: Write>(
    writer: W,
    header: [&str; 2],
    rows: impl Iterator<Item = [&'a str; 2]>,
) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Serialize the result as `{"edges": [...], "remarks": [...]}`.
pub fn write_result_json<W: Write>(result: &ExtractionResult, mut writer: W) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

fn create_file(path: &Path) -> Result<std::io::BufWriter<std::fs::File>, Error> {
    std::fs::File::create(path)
        .map(std::io::BufWriter::new)
        .map_err(|source| Error::WriteIo {
            path: path.to_path_buf(),
            source,
        })
}
