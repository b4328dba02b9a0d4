use std::fs::File;
use std::io::BufReader;

use cosmiq_block::{hexdump_lines, Block, BlockStore, SegmentConfig, Segmenter, DUMP_LINE_BYTES};
use cosmiq_frame::{read_capture, Channel, DemuxConfig, DemuxStats};
use serde::Serialize;

use crate::cmd::DumpArgs;
use crate::exit::{block_error, decode_error, frame_error, io_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, print_raw, OutputFormat};

#[derive(Debug, Serialize)]
struct ChannelOutput {
    frames: usize,
    bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BlockOutput {
    index: usize,
    offset: usize,
    size: usize,
    path: Option<String>,
    hex: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DumpOutput {
    schema_id: &'static str,
    capture: String,
    lines: usize,
    frames: usize,
    short_lines: usize,
    ignored_frames: usize,
    header: ChannelOutput,
    body: ChannelOutput,
    blocks: Vec<BlockOutput>,
    #[serde(skip)]
    raw: Vec<u8>,
}

pub fn run(args: DumpArgs, format: OutputFormat) -> CliResult<i32> {
    let segmenter = Segmenter::new(SegmentConfig {
        window_size: args.window_size,
        filler: args.filler,
    })
    .map_err(|err| block_error("invalid segment options", err))?;
    let demux_config = DemuxConfig {
        header_command: args.header_command,
        body_command: args.body_command,
        ..DemuxConfig::default()
    };

    let capture = args.capture.display().to_string();
    let file = File::open(&args.capture)
        .map_err(|err| io_error(&format!("cannot open capture {capture}"), err))?;
    let demuxed = read_capture(BufReader::new(file), &demux_config)
        .map_err(|err| frame_error(&format!("cannot read capture {capture}"), err))?;
    tracing::info!(
        lines = demuxed.stats.lines,
        frames = demuxed.stats.frames,
        "processed capture"
    );

    let mut out = DumpOutput::new(capture, &demuxed.stats, &demuxed.header, &demuxed.body);

    let body = match demuxed.body.materialize() {
        Ok(body) => body,
        Err(err) => {
            out.body.error = Some(err.to_string());
            print_dump(&out, format);
            return Err(decode_error("body channel decode failed", err));
        }
    };
    out.body.bytes = body.len();

    let blocks = segmenter.segment(&body);
    if blocks.is_empty() {
        tracing::warn!(bytes = body.len(), "no data blocks found in body");
    } else {
        tracing::info!(blocks = blocks.len(), "recovered data blocks");
    }

    let store = BlockStore::new(&args.out_dir);
    if !args.no_write {
        let removed = store
            .clear()
            .map_err(|err| block_error("cannot clear stale blocks", err))?;
        if removed > 0 {
            tracing::info!(
                removed,
                dir = %args.out_dir.display(),
                "removed blocks from earlier run"
            );
        }
    }
    for block in &blocks {
        let path = if args.no_write {
            None
        } else {
            let path = store
                .write(block)
                .map_err(|err| block_error("cannot write block", err))?;
            Some(path.display().to_string())
        };
        out.push_block(block, path);
    }

    print_dump(&out, format);
    Ok(SUCCESS)
}

impl DumpOutput {
    fn new(capture: String, stats: &DemuxStats, header: &Channel, body: &Channel) -> Self {
        Self {
            schema_id: "cosmiq.cli.v1.dump-report",
            capture,
            lines: stats.lines,
            frames: stats.frames,
            short_lines: stats.short_lines,
            ignored_frames: stats.ignored_frames,
            header: ChannelOutput {
                frames: header.frames(),
                bytes: header.byte_len(),
                hex: Some(header.hex().to_string()),
                error: None,
            },
            body: ChannelOutput {
                frames: body.frames(),
                bytes: 0,
                hex: None,
                error: None,
            },
            blocks: Vec::new(),
            raw: Vec::new(),
        }
    }

    fn push_block(&mut self, block: &Block, path: Option<String>) {
        self.raw.extend_from_slice(block.as_bytes());
        self.blocks.push(BlockOutput {
            index: block.index,
            offset: block.offset,
            size: block.len(),
            path,
            hex: hexdump_lines(block.as_bytes(), DUMP_LINE_BYTES),
        });
    }
}

fn print_dump(out: &DumpOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut summary = new_table(vec!["CHANNEL", "FRAMES", "BYTES", "STATUS"]);
            summary.add_row(vec![
                "header".to_string(),
                out.header.frames.to_string(),
                out.header.bytes.to_string(),
                "text".to_string(),
            ]);
            summary.add_row(vec![
                "body".to_string(),
                out.body.frames.to_string(),
                out.body.bytes.to_string(),
                out.body
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("{} blocks", out.blocks.len())),
            ]);
            println!("{summary}");

            if !out.blocks.is_empty() {
                let mut blocks = new_table(vec!["BLOCK", "OFFSET", "SIZE", "FILE", "HEAD"]);
                for block in &out.blocks {
                    blocks.add_row(vec![
                        block.index.to_string(),
                        block.offset.to_string(),
                        block.size.to_string(),
                        block.path.clone().unwrap_or_else(|| "-".to_string()),
                        block.hex.first().cloned().unwrap_or_default(),
                    ]);
                }
                println!("{blocks}");
            }
        }
        OutputFormat::Pretty => {
            println!("Processing {} packets...", out.lines);
            println!(
                "  frames={} short={} ignored={}",
                out.frames, out.short_lines, out.ignored_frames
            );
            println!();
            println!("--- HEADER ({} bytes) ---", out.header.bytes);
            println!("{}", out.header.hex.as_deref().unwrap_or_default());

            if let Some(err) = &out.body.error {
                println!();
                println!("--- BODY (undecodable: {err}) ---");
                return;
            }
            println!();
            println!("--- BODY ({} bytes) ---", out.body.bytes);
            println!("Found {} distinct data blocks in the body.", out.blocks.len());

            for block in &out.blocks {
                println!();
                println!("Block {} Size: {} bytes", block.index, block.size);
                for line in &block.hex {
                    println!("{line}");
                }
                if let Some(path) = &block.path {
                    println!("-> Saved to {path}");
                }
            }
        }
        OutputFormat::Raw => print_raw(&out.raw),
    }
}
