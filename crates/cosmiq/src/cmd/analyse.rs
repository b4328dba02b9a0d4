use std::path::{Path, PathBuf};

use cosmiq_block::{
    read_block, BlockStore, Divisor, Sample, SampleExtractor, StoreConfig, ValueScale,
    BLOCK_FILE_EXTENSION, DEFAULT_MARKERS,
};
use serde::Serialize;

use crate::cmd::AnalyseArgs;
use crate::exit::{block_error, CliResult, SUCCESS};
use crate::output::{hex_prefix, new_table, print_json, OutputFormat};

/// Leading bytes shown for each block.
const HEAD_BYTES: usize = 16;

#[derive(Debug, Serialize)]
struct BlockAnalysis {
    file: String,
    size: usize,
    head: String,
    sample_count: usize,
    samples: Vec<Sample>,
}

#[derive(Debug, Serialize)]
struct AnalyseOutput {
    schema_id: &'static str,
    unit: String,
    markers: Vec<String>,
    blocks: Vec<BlockAnalysis>,
}

pub fn run(args: AnalyseArgs, format: OutputFormat) -> CliResult<i32> {
    let markers = if args.marker.is_empty() {
        DEFAULT_MARKERS.to_vec()
    } else {
        args.marker
    };
    let extractor = SampleExtractor::with_scale(markers, Divisor::new(args.divisor));
    let store_config = StoreConfig::default();

    let files = collect_files(&args.paths)?;
    if files.is_empty() {
        tracing::warn!("no .bin files found; run `cosmiq dump` first");
    } else {
        tracing::info!(blocks = files.len(), "analysing block files");
    }

    let mut blocks = Vec::with_capacity(files.len());
    for file in &files {
        let data =
            read_block(file, &store_config).map_err(|err| block_error("cannot read block", err))?;
        let mut samples = extractor.extract(&data);
        let sample_count = samples.len();
        if args.limit > 0 {
            samples.truncate(args.limit);
        }

        blocks.push(BlockAnalysis {
            file: display_name(file),
            size: data.len(),
            head: hex_prefix(&data, HEAD_BYTES),
            sample_count,
            samples,
        });
    }

    let out = AnalyseOutput {
        schema_id: "cosmiq.cli.v1.sample-report",
        unit: extractor.scale().unit().to_string(),
        markers: extractor.markers().iter().map(|m| m.to_hex()).collect(),
        blocks,
    };
    print_analysis(&out, format);
    Ok(SUCCESS)
}

/// Expand directories into their sorted block files; plain paths are kept as given.
///
/// A missing path that does not name a `.bin` file is taken as an empty directory.
fn collect_files(paths: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() && !names_block_file(path) {
            tracing::warn!(path = %path.display(), "block directory does not exist");
            continue;
        }
        if path.is_dir() {
            let listed = BlockStore::new(path)
                .list()
                .map_err(|err| block_error("cannot list blocks", err))?;
            files.extend(listed);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn names_block_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == BLOCK_FILE_EXTENSION)
        .unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_analysis(out: &AnalyseOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FILE", "SIZE", "SAMPLES", "HEAD"]);
            for block in &out.blocks {
                table.add_row(vec![
                    block.file.clone(),
                    block.size.to_string(),
                    block.sample_count.to_string(),
                    block.head.clone(),
                ]);
            }
            println!("{table}");

            for block in out.blocks.iter().filter(|b| !b.samples.is_empty()) {
                let scaled = format!("SCALED ({})", out.unit);
                let mut samples = new_table(vec!["OFFSET", "MARKER", "RAW", scaled.as_str()]);
                for sample in &block.samples {
                    samples.add_row(vec![
                        sample.offset.to_string(),
                        sample.marker.to_hex(),
                        sample.raw.to_string(),
                        sample.scaled.to_string(),
                    ]);
                }
                println!("{}", block.file);
                println!("{samples}");
            }
        }
        OutputFormat::Pretty => {
            println!("Found {} log blocks. Analyzing...", out.blocks.len());
            for block in &out.blocks {
                println!();
                println!("--- Analyzing {} ---", block.file);
                println!("Header Hex: {}", block.head);
                println!("Found {} potential samples.", block.sample_count);
                if block.samples.is_empty() {
                    continue;
                }
                println!("First {} samples:", block.samples.len());
                for sample in &block.samples {
                    println!(
                        "  [{}] {} -> Raw: {} (Approx {}{})",
                        sample.offset, sample.marker, sample.raw, sample.scaled, out.unit
                    );
                }
            }
        }
        OutputFormat::Raw => {
            for block in &out.blocks {
                for sample in &block.samples {
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        block.file, sample.offset, sample.marker, sample.raw, sample.scaled
                    );
                }
            }
        }
    }
}
