//! Byte-level WAV builders for unit tests

/// Assembles RIFF/WAVE buffers chunk by chunk, including malformed ones.
pub struct WavBuilder {
    riff_size: Option<u32>,
    chunks: Vec<u8>,
}

impl WavBuilder {
    pub fn new() -> Self {
        Self { riff_size: None, chunks: Vec::new() }
    }

    /// Override the advisory size written at bytes 4..8.
    pub fn riff_size(mut self, size: u32) -> Self {
        self.riff_size = Some(size);
        self
    }

    /// Append a chunk, adding the pad byte for odd sizes.
    pub fn chunk(mut self, id: &[u8; 4], payload: &[u8]) -> Self {
        self.chunks.extend_from_slice(id);
        self.chunks.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.chunks.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            self.chunks.push(0);
        }
        self
    }

    /// Append raw bytes with no framing.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.chunks.extend_from_slice(bytes);
        self
    }

    pub fn fmt(self, code: u16, channels: u16, rate: u32, bits: u16) -> Self {
        let payload = fmt_payload(code, channels, rate, bits);
        self.chunk(b"fmt ", &payload)
    }

    pub fn data(self, payload: &[u8]) -> Self {
        self.chunk(b"data", payload)
    }

    pub fn build(self) -> Vec<u8> {
        let riff_size = self.riff_size.unwrap_or(4 + self.chunks.len() as u32);
        let mut out = Vec::with_capacity(12 + self.chunks.len());
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&riff_size.to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(&self.chunks);
        out
    }
}

pub fn fmt_payload(code: u16, channels: u16, rate: u32, bits: u16) -> Vec<u8> {
    let block_align = channels * (bits / 8);
    let mut v = Vec::with_capacity(16);
    v.extend_from_slice(&code.to_le_bytes());
    v.extend_from_slice(&channels.to_le_bytes());
    v.extend_from_slice(&rate.to_le_bytes());
    v.extend_from_slice(&(rate * u32::from(block_align)).to_le_bytes());
    v.extend_from_slice(&block_align.to_le_bytes());
    v.extend_from_slice(&bits.to_le_bytes());
    v
}
