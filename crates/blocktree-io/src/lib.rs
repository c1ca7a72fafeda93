//! Workbook I/O for block-division sheets.
//!
//! Loading reads one worksheet (by default the second, see
//! [`blocktree_model::layout::SHEET_INDEX`]) into a [`Grid`] plus its merged-cell
//! rectangles. Writing serializes an [`ExtractionResult`](blocktree_model::ExtractionResult)
//! as a two-sheet `.xlsx`, CSV, or JSON.
//!
//! Protected documents must be unlocked before parsing. That step is a capability passed
//! in by the caller ([`DocumentUnlocker`]); nothing here holds global unlock state.

mod unlock;
mod write;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use blocktree_model::{layout, CellValue, Grid, MergeRect};
use calamine::{Data, Dimensions, Range, Reader, Xls, Xlsx};
use thiserror::Error;

pub use unlock::{DocumentUnlocker, PassThrough, UnlockError};
pub use write::{
    remark_csv_path, write_edges_csv, write_remarks_csv, write_result, write_result_csv,
    write_result_json, write_result_xlsx, OutputFormat, DEFAULT_OUTPUT_FILE_NAME,
    REMARK_SHEET_NAME, RESULT_SHEET_NAME,
};

/// Compound File Binary signature. An `.xlsx` wrapped in one is an encrypted package.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported extension `{extension}` for workbook `{path}`")]
    UnsupportedExtension { path: PathBuf, extension: String },
    #[error("failed to open workbook `{path}`: {source}")]
    OpenIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Unlock(#[from] UnlockError),
    #[error("workbook is an encrypted package; unlock it before extraction")]
    EncryptedWorkbook,
    #[error("failed to read `.xlsx`: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("failed to read `.xls`: {0}")]
    Xls(#[from] calamine::XlsError),
    #[error("workbook has no sheet at index {index} ({available} sheets available)")]
    MissingSheet { index: usize, available: usize },
    #[error("failed to write `.xlsx` output: {0}")]
    WriteXlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to write CSV output: {0}")]
    WriteCsv(#[from] csv::Error),
    #[error("failed to write JSON output: {0}")]
    WriteJson(#[from] serde_json::Error),
    #[error("failed to write `{path}`: {source}")]
    WriteIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Office Open XML (`.xlsx`, `.xlsm`).
    Xlsx,
    /// Legacy Excel 97-2003 BIFF (`.xls`).
    Xls,
}

impl SourceFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(SourceFormat::Xlsx),
            "xls" => Ok(SourceFormat::Xls),
            other => Err(Error::UnsupportedExtension {
                path: path.to_path_buf(),
                extension: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// 0-based index of the worksheet to read.
    pub sheet_index: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet_index: layout::SHEET_INDEX,
        }
    }
}

/// One worksheet, ready for extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSheet {
    pub sheet_name: String,
    /// Values in absolute worksheet coordinates (`(0, 0)` is `A1`).
    pub grid: Grid,
    /// Merged regions, 1-based and inclusive.
    pub merges: Vec<MergeRect>,
}

/// Load a worksheet from disk without any unlock step.
pub fn load_sheet_path(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<LoadedSheet, Error> {
    load_sheet_path_with(path, options, &PassThrough)
}

/// Load a worksheet from disk, passing the raw bytes through `unlocker` first.
pub fn load_sheet_path_with(
    path: impl AsRef<Path>,
    options: &LoadOptions,
    unlocker: &dyn DocumentUnlocker,
) -> Result<LoadedSheet, Error> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| Error::OpenIo {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes = unlocker.unlock(path, bytes)?;
    log::debug!("read {} bytes from `{}` as {format:?}", bytes.len(), path.display());
    load_sheet_from_bytes(&bytes, format, options)
}

/// Load a worksheet from an in-memory workbook.
pub fn load_sheet_from_bytes(
    bytes: &[u8],
    format: SourceFormat,
    options: &LoadOptions,
) -> Result<LoadedSheet, Error> {
    match format {
        SourceFormat::Xlsx => {
            if bytes.starts_with(&OLE_MAGIC) {
                return Err(Error::EncryptedWorkbook);
            }
            let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
            let sheet_name = pick_sheet(&workbook.sheet_names(), options.sheet_index)?;
            let range = workbook.worksheet_range(&sheet_name)?;
            let merges = workbook
                .worksheet_merge_cells(&sheet_name)
                .unwrap_or(Ok(Vec::new()))?;
            Ok(build_sheet(sheet_name, &range, &merges))
        }
        SourceFormat::Xls => {
            let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))?;
            let sheet_name = pick_sheet(&workbook.sheet_names(), options.sheet_index)?;
            let range = workbook.worksheet_range(&sheet_name)?;
            let merges = workbook
                .worksheet_merge_cells(&sheet_name)
                .unwrap_or_default();
            Ok(build_sheet(sheet_name, &range, &merges))
        }
    }
}

fn pick_sheet(names: &[String], index: usize) -> Result<String, Error> {
    names.get(index).cloned().ok_or(Error::MissingSheet {
        index,
        available: names.len(),
    })
}

fn build_sheet(sheet_name: String, range: &Range<Data>, merges: &[Dimensions]) -> LoadedSheet {
    let mut grid = match range.end() {
        Some((rows, cols)) => Grid::new(rows as usize + 1, cols as usize + 1),
        None => Grid::default(),
    };

    // calamine `Range` iterators return coordinates relative to `range.start()`.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    for (row, col, value) in range.used_cells() {
        let value = convert_value(value);
        if value.is_empty() {
            continue;
        }
        grid.set(start_row as usize + row, start_col as usize + col, value);
    }

    let merges: Vec<MergeRect> = merges
        .iter()
        .map(|dim| MergeRect::from_zero_based(dim.start, dim.end))
        .collect();

    log::debug!(
        "loaded sheet `{sheet_name}`: {} rows x {} columns, {} merged regions",
        grid.rows(),
        grid.cols(),
        merges.len()
    );
    LoadedSheet {
        sheet_name,
        grid,
        merges,
    }
}

fn convert_value(value: &Data) -> CellValue {
    match value {
        Data::Empty => CellValue::Empty,
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(v) => CellValue::Text(v.clone()),
        Data::Bool(v) => CellValue::Boolean(*v),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::DateTime(v) => CellValue::Number(v.as_f64()),
        Data::DateTimeIso(v) => CellValue::Text(v.clone()),
        Data::DurationIso(v) => CellValue::Text(v.clone()),
    }
}
