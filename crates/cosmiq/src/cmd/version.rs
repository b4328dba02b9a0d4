use cosmiq_block::{DEFAULT_FILLER, DEFAULT_MARKERS, DEFAULT_WINDOW_SIZE};
use cosmiq_frame::{BODY, HEADER, MIN_LINE_LEN};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("cosmiq {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: cosmiq");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "build_target: {}",
        option_env!("COSMIQ_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("COSMIQ_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!(
        "commands: header=0x{HEADER:02X} body=0x{BODY:02X} min_line_len={MIN_LINE_LEN}"
    );
    println!("segment: window={DEFAULT_WINDOW_SIZE} filler=0x{DEFAULT_FILLER:02X}");
    println!(
        "markers: {}",
        DEFAULT_MARKERS
            .iter()
            .map(|m| m.to_hex())
            .collect::<Vec<_>>()
            .join(",")
    );

    Ok(SUCCESS)
}
