//! WAV fixtures for integration tests

#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub fn int_spec(channels: u16, sample_rate: u32, bits: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bits,
        sample_format: SampleFormat::Int,
    }
}

/// Encode interleaved integer samples with hound, in memory.
///
/// hound only emits the canonical 16-byte `fmt ` for up to two channels at
/// 8 or 16 bits; anything wider is written as WAVE_FORMAT_EXTENSIBLE.
pub fn hound_wav_bytes(spec: WavSpec, samples: &[i32]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

pub fn write_hound_wav(dir: &Path, name: &str, spec: WavSpec, samples: &[i32]) -> PathBuf {
    write_fixture(dir, name, &hound_wav_bytes(spec, samples))
}

/// Random interleaved samples covering the full signed range of `bits`.
pub fn random_samples(channels: u16, bits: u16, frames: usize, seed: u64) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    (0..frames * usize::from(channels))
        .map(|_| rng.gen_range(min..=max) as i32)
        .collect()
}

/// Canonical 16-byte `fmt ` + `data` image, for layouts hound cannot write
/// without the extensible header (24/32-bit, float, more than two channels).
pub fn canonical_wav(code: u16, channels: u16, sample_rate: u32, bits: u16, data: &[u8]) -> Vec<u8> {
    let block_align = channels * (bits / 8);
    let padded = data.len() + data.len() % 2;
    let mut bytes = Vec::with_capacity(44 + padded);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + padded as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&code.to_le_bytes());
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&bits.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
    bytes.extend_from_slice(data);
    if data.len() % 2 == 1 {
        bytes.push(0);
    }
    bytes
}

/// Little-endian packing of `samples` at `bits` width.
pub fn pack_int_samples(samples: &[i32], bits: u16) -> Vec<u8> {
    let width = usize::from(bits / 8);
    samples
        .iter()
        .flat_map(|v| v.to_le_bytes().into_iter().take(width))
        .collect()
}

pub fn random_f32_payload(channels: u16, frames: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..frames * usize::from(channels))
        .flat_map(|_| rng.gen_range(-1.5f32..1.5).to_le_bytes())
        .collect()
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
