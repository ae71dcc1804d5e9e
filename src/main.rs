//! wavdecode - WAV decoder command line tool

use anyhow::Context;
use clap::Parser;
use std::process;
use wavdecode::audio::reference::{self, ComparisonReport};
use wavdecode::processing::{BatchDecoder, BatchResult};
use wavdecode::{Args, Config, DecodedAudio, WavInfo, init_logging};

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether every file was handled successfully.
fn run(args: Args) -> anyhow::Result<bool> {
    let config = Config::from_args_and_config(args).context("Invalid configuration")?;
    init_logging(config.verbose());

    if config.verbose() {
        println!("{}", wavdecode::get_library_info());
        println!();
    }

    let batch = BatchDecoder::new(config.workers()).context("Failed to start decoder pool")?;

    let ok = if config.output.probe {
        let result = batch.run(&config.inputs, |path| wavdecode::probe(path));
        report(&result, print_probe)
    } else if config.verify.enabled {
        let tolerance = config.tolerance();
        let result = batch.run(&config.inputs, |path| reference::verify_file(path, tolerance));
        let passed = report(&result, |_, r| println!("  {}", r));
        passed && result.outcomes.iter().all(|o| o.result.as_ref().is_ok_and(ComparisonReport::passed))
    } else {
        let preview = config.output.preview_samples;
        let result = batch.decode_all(&config.inputs);
        report(&result, |_, audio| print_decoded(audio, preview))
    };

    Ok(ok)
}

fn report<T>(result: &BatchResult<T>, mut print: impl FnMut(&std::path::Path, &T)) -> bool {
    for outcome in &result.outcomes {
        match &outcome.result {
            Ok(value) => {
                println!("{} ({:.2} ms)", outcome.path.display(), outcome.elapsed_ms);
                print(&outcome.path, value);
            }
            Err(e) => {
                println!("{}: error [{}]: {}", outcome.path.display(), e.category(), e);
            }
        }
    }

    log::info!("{}", result.summary);
    result.summary.failed == 0
}

fn print_decoded(audio: &DecodedAudio, preview: usize) {
    println!(
        "  {} | {} frames ({:.3}s)",
        audio.format(),
        audio.num_frames(),
        audio.duration()
    );
    for (i, channel) in audio.channels().enumerate() {
        let shown: Vec<String> = channel.iter().take(preview).map(|v| format!("{:.6}", v)).collect();
        let more = if channel.len() > preview { ", ..." } else { "" };
        println!("  ch{}: [{}{}]", i, shown.join(", "), more);
    }
}

fn print_probe(_path: &std::path::Path, info: &WavInfo) {
    println!(
        "  RIFF size {} (declares {} bytes, file has {})",
        info.riff.riff_size,
        info.riff.declared_len(),
        info.file_len
    );
    println!("  format: {} ({})", info.format, info.encoding.name());
    println!(
        "  byte rate {}, block align {}",
        info.format.byte_rate, info.format.block_align
    );
    for chunk in &info.chunks {
        println!("  chunk '{}' @ {}: {} bytes", chunk.id, chunk.offset, chunk.size);
    }
    println!(
        "  data: {} bytes, {} frames ({:.3}s)",
        info.data_len,
        info.num_frames,
        info.duration()
    );
}
