#![allow(dead_code)]

use std::io::{Cursor, Write};

// Just enough BIFF8 for calamine to read two worksheets with labels, numbers and merges.
const RECORD_BOF: u16 = 0x0809;
const RECORD_EOF: u16 = 0x000A;
const RECORD_CODEPAGE: u16 = 0x0042;
const RECORD_WINDOW1: u16 = 0x003D;
const RECORD_FONT: u16 = 0x0031;
const RECORD_XF: u16 = 0x00E0;
const RECORD_BOUNDSHEET: u16 = 0x0085;
const RECORD_WINDOW2: u16 = 0x023E;
const RECORD_DIMENSIONS: u16 = 0x0200;
const RECORD_MERGEDCELLS: u16 = 0x00E5;
const RECORD_NUMBER: u16 = 0x0203;
const RECORD_LABEL: u16 = 0x0204;

const BOF_VERSION_BIFF8: u16 = 0x0600;
const BOF_DT_WORKBOOK_GLOBALS: u16 = 0x0005;
const BOF_DT_WORKSHEET: u16 = 0x0010;

const XF_FLAG_LOCKED: u16 = 0x0001;
const XF_FLAG_STYLE: u16 = 0x0004;

/// Cell XF used by every fixture cell (General format).
const XF_CELL: u16 = 16;

/// One cell of a fixture sheet.
#[derive(Debug, Clone, Copy)]
pub enum FixtureCell<'a> {
    Text(&'a str),
    Number(f64),
}

/// A worksheet to place in a fixture workbook.
#[derive(Debug, Clone, Default)]
pub struct FixtureSheet<'a> {
    pub name: &'a str,
    /// `(row, col, value)`, 0-based.
    pub cells: Vec<(u16, u16, FixtureCell<'a>)>,
    /// `(first_row, last_row, first_col, last_col)`, 0-based and inclusive.
    pub merges: Vec<(u16, u16, u16, u16)>,
}

/// Build a BIFF8 `.xls` (CFB container with a `Workbook` stream) holding `sheets` in order.
pub fn build_xls(sheets: &[FixtureSheet<'_>]) -> Vec<u8> {
    let workbook_stream = build_workbook_stream(sheets);

    let cursor = Cursor::new(Vec::new());
    let mut ole = cfb::CompoundFile::create(cursor).expect("create cfb");
    {
        let mut stream = ole.create_stream("Workbook").expect("Workbook stream");
        stream
            .write_all(&workbook_stream)
            .expect("write Workbook stream");
    }
    ole.into_inner().into_inner()
}

fn build_workbook_stream(sheets: &[FixtureSheet<'_>]) -> Vec<u8> {
    let mut globals = Vec::<u8>::new();

    push_record(&mut globals, RECORD_BOF, &bof(BOF_DT_WORKBOOK_GLOBALS));
    push_record(&mut globals, RECORD_CODEPAGE, &1252u16.to_le_bytes());
    push_record(&mut globals, RECORD_WINDOW1, &window1());
    push_record(&mut globals, RECORD_FONT, &font("Arial"));

    // Readers expect 16 style XFs before the cell XFs.
    for _ in 0..16 {
        push_record(&mut globals, RECORD_XF, &xf_record(0, 0, true));
    }
    push_record(&mut globals, RECORD_XF, &xf_record(0, 0, false));

    let mut offset_positions = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let start = globals.len();
        let mut boundsheet = Vec::<u8>::new();
        boundsheet.extend_from_slice(&0u32.to_le_bytes()); // lbPlyPos, patched below
        boundsheet.extend_from_slice(&0u16.to_le_bytes()); // visible worksheet
        write_short_unicode_string(&mut boundsheet, sheet.name);
        push_record(&mut globals, RECORD_BOUNDSHEET, &boundsheet);
        offset_positions.push(start + 4);
    }

    push_record(&mut globals, RECORD_EOF, &[]);

    for (sheet, pos) in sheets.iter().zip(offset_positions) {
        let offset = globals.len() as u32;
        globals[pos..pos + 4].copy_from_slice(&offset.to_le_bytes());
        globals.extend_from_slice(&build_sheet_stream(sheet));
    }
    globals
}

fn build_sheet_stream(sheet: &FixtureSheet<'_>) -> Vec<u8> {
    let mut out = Vec::<u8>::new();
    push_record(&mut out, RECORD_BOF, &bof(BOF_DT_WORKSHEET));

    let last_row = sheet.cells.iter().map(|(r, _, _)| *r).max().unwrap_or(0);
    let last_col = sheet.cells.iter().map(|(_, c, _)| *c).max().unwrap_or(0);
    let mut dims = Vec::<u8>::new();
    dims.extend_from_slice(&0u32.to_le_bytes()); // first row
    dims.extend_from_slice(&(u32::from(last_row) + 1).to_le_bytes()); // last row + 1
    dims.extend_from_slice(&0u16.to_le_bytes()); // first col
    dims.extend_from_slice(&(last_col + 1).to_le_bytes()); // last col + 1
    dims.extend_from_slice(&0u16.to_le_bytes()); // reserved
    push_record(&mut out, RECORD_DIMENSIONS, &dims);

    push_record(&mut out, RECORD_WINDOW2, &window2());

    for (row, col, value) in &sheet.cells {
        match value {
            FixtureCell::Text(s) => {
                push_record(&mut out, RECORD_LABEL, &label_cell(*row, *col, s));
            }
            FixtureCell::Number(v) => {
                push_record(&mut out, RECORD_NUMBER, &number_cell(*row, *col, *v));
            }
        }
    }

    if !sheet.merges.is_empty() {
        // MERGEDCELLS [MS-XLS 2.4.139]: cAreas, then Ref8 (rwFirst, rwLast, colFirst, colLast).
        let mut merged = Vec::<u8>::new();
        merged.extend_from_slice(&(sheet.merges.len() as u16).to_le_bytes());
        for (rw_first, rw_last, col_first, col_last) in &sheet.merges {
            merged.extend_from_slice(&rw_first.to_le_bytes());
            merged.extend_from_slice(&rw_last.to_le_bytes());
            merged.extend_from_slice(&col_first.to_le_bytes());
            merged.extend_from_slice(&col_last.to_le_bytes());
        }
        push_record(&mut out, RECORD_MERGEDCELLS, &merged);
    }

    push_record(&mut out, RECORD_EOF, &[]);
    out
}

fn push_record(out: &mut Vec<u8>, id: u16, data: &[u8]) {
    out.extend_from_slice(&id.to_le_bytes());
    out.extend_from_slice(&(data.len() as u16).to_le_bytes());
    out.extend_from_slice(data);
}

fn bof(dt: u16) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[0..2].copy_from_slice(&BOF_VERSION_BIFF8.to_le_bytes());
    out[2..4].copy_from_slice(&dt.to_le_bytes());
    out[4..6].copy_from_slice(&0x0DBBu16.to_le_bytes()); // build
    out[6..8].copy_from_slice(&0x07CCu16.to_le_bytes()); // year
    out
}

fn window1() -> [u8; 18] {
    let mut out = [0u8; 18];
    out[14..16].copy_from_slice(&1u16.to_le_bytes()); // cTabSel
    out[16..18].copy_from_slice(&600u16.to_le_bytes()); // wTabRatio
    out
}

fn window2() -> [u8; 18] {
    let mut out = [0u8; 18];
    out[0..2].copy_from_slice(&0x02B6u16.to_le_bytes());
    out
}

fn font(name: &str) -> Vec<u8> {
    let mut out = Vec::<u8>::new();
    out.extend_from_slice(&200u16.to_le_bytes()); // height (10pt)
    out.extend_from_slice(&0u16.to_le_bytes()); // grbit
    out.extend_from_slice(&0x7FFFu16.to_le_bytes()); // color: automatic
    out.extend_from_slice(&400u16.to_le_bytes()); // weight
    out.extend_from_slice(&0u16.to_le_bytes()); // escapement
    out.push(0); // underline
    out.push(0); // family
    out.push(0); // charset
    out.push(0); // reserved
    write_short_unicode_string(&mut out, name);
    out
}

fn xf_record(font_idx: u16, fmt_idx: u16, is_style_xf: bool) -> [u8; 20] {
    let mut out = [0u8; 20];
    out[0..2].copy_from_slice(&font_idx.to_le_bytes());
    out[2..4].copy_from_slice(&fmt_idx.to_le_bytes());
    let flags: u16 = XF_FLAG_LOCKED | if is_style_xf { XF_FLAG_STYLE } else { 0 };
    out[4..6].copy_from_slice(&flags.to_le_bytes());
    out[6] = 0x20; // General + Bottom
    out[9] = 0x3F;
    out
}

fn number_cell(row: u16, col: u16, v: f64) -> [u8; 14] {
    let mut out = [0u8; 14];
    out[0..2].copy_from_slice(&row.to_le_bytes());
    out[2..4].copy_from_slice(&col.to_le_bytes());
    out[4..6].copy_from_slice(&XF_CELL.to_le_bytes());
    out[6..14].copy_from_slice(&v.to_le_bytes());
    out
}

fn label_cell(row: u16, col: u16, s: &str) -> Vec<u8> {
    let mut out = Vec::<u8>::new();
    out.extend_from_slice(&row.to_le_bytes());
    out.extend_from_slice(&col.to_le_bytes());
    out.extend_from_slice(&XF_CELL.to_le_bytes());
    write_unicode_string(&mut out, s);
    out
}

fn write_short_unicode_string(out: &mut Vec<u8>, s: &str) {
    // ShortXLUnicodeString: [cch: u8][flags: u8][chars]
    let bytes = s.as_bytes();
    let len: u8 = bytes
        .len()
        .try_into()
        .expect("string too long for u8 length");
    out.push(len);
    out.push(0); // compressed (8-bit)
    out.extend_from_slice(bytes);
}

fn write_unicode_string(out: &mut Vec<u8>, s: &str) {
    // XLUnicodeString: [cch: u16][flags: u8][chars]
    let bytes = s.as_bytes();
    let len: u16 = bytes
        .len()
        .try_into()
        .expect("string too long for u16 length");
    out.extend_from_slice(&len.to_le_bytes());
    out.push(0); // compressed (8-bit)
    out.extend_from_slice(bytes);
}
