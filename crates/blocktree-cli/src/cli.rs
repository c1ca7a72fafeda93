use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blocktree_io::{
    load_sheet_path, write_result, write_result_json, LoadOptions, OutputFormat,
    DEFAULT_OUTPUT_FILE_NAME,
};
use blocktree_model::{extract, layout, ExtractOptions, ExtractionResult, MergePolicy};
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MergePolicyArg {
    /// Copy the merge anchor only into cells that are empty.
    FillIfEmpty,
    /// Copy the merge anchor into every cell of the merged region.
    Overwrite,
}

impl From<MergePolicyArg> for MergePolicy {
    fn from(value: MergePolicyArg) -> Self {
        match value {
            MergePolicyArg::FillIfEmpty => MergePolicy::FillIfEmpty,
            MergePolicyArg::Overwrite => MergePolicy::Overwrite,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "blocktree",
    about = "Extract block parent/child edges and remarks from a block-division workbook."
)]
pub struct Args {
    /// Block-division workbook (`.xlsx`, `.xlsm` or `.xls`).
    input: PathBuf,

    /// Output path. Defaults to `parent_child_result.<ext>`, or stdout for JSON.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format. Inferred from `--output` when omitted, else `xlsx`.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// How merged regions are propagated into cells that already hold a value.
    #[arg(long, value_enum, default_value_t = MergePolicyArg::FillIfEmpty)]
    merge_policy: MergePolicyArg,

    /// 0-based index of the worksheet to read.
    #[arg(long, value_name = "N", default_value_t = layout::SHEET_INDEX)]
    sheet_index: usize,

    /// Also print both tables as tab-separated text.
    #[arg(long)]
    print: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

impl Args {
    fn output_format(&self) -> OutputFormat {
        if let Some(format) = self.format {
            return format.into();
        }
        self.output
            .as_deref()
            .and_then(OutputFormat::from_path)
            .unwrap_or(OutputFormat::Xlsx)
    }

    fn destination(&self, format: OutputFormat) -> Destination {
        match (&self.output, format) {
            (Some(path), _) => Destination::File(path.clone()),
            (None, OutputFormat::Json) => Destination::Stdout,
            (None, format) => Destination::File(
                Path::new(DEFAULT_OUTPUT_FILE_NAME).with_extension(format.extension()),
            ),
        }
    }
}

/// Run one extraction. Summary and `--print` tables go to `out`, except that tables move to
/// `err` when the JSON result itself is written to `out`.
pub fn run_with_args(args: Args, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
    let load_options = LoadOptions {
        sheet_index: args.sheet_index,
    };
    let sheet = load_sheet_path(&args.input, &load_options)
        .with_context(|| format!("load worksheet from {}", args.input.display()))?;

    let extract_options = ExtractOptions {
        merge_policy: args.merge_policy.into(),
        ..ExtractOptions::default()
    };
    let result = extract(&sheet.grid, &sheet.merges, &extract_options)
        .with_context(|| format!("extract hierarchy from sheet `{}`", sheet.sheet_name))?;
    log::info!(
        "sheet `{}`: {} edges, {} remarks",
        sheet.sheet_name,
        result.edges.len(),
        result.remarks.len()
    );

    let format = args.output_format();
    let destination = args.destination(format);
    match &destination {
        Destination::Stdout => {
            write_result_json(&result, &mut *out).context("write JSON to stdout")?;
        }
        Destination::File(path) => {
            write_result(&result, format, path)
                .with_context(|| format!("write result to {}", path.display()))?;
            writeln!(out, "edges: {}", result.edges.len())?;
            writeln!(out, "remarks: {}", result.remarks.len())?;
            writeln!(out, "output: {}", path.display())?;
        }
    }

    if args.print {
        let tables: &mut dyn Write = match destination {
            Destination::Stdout => &mut *err,
            Destination::File(_) => &mut *out,
        };
        print_tables(&result, tables)?;
    }
    Ok(())
}

fn print_tables(result: &ExtractionResult, out: &mut dyn Write) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "parent\tchild")?;
    for edge in &result.edges {
        writeln!(out, "{}\t{}", edge.parent, edge.child)?;
    }
    writeln!(out)?;
    writeln!(out, "block_label\tremark_text")?;
    for remark in &result.remarks {
        writeln!(out, "{}\t{}", remark.block_label, remark.remark_text)?;
    }
    Ok(())
}
