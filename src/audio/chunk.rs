//! RIFF/WAVE container walking
//!
//! The scanner validates the 12-byte master header, then visits each
//! sub-chunk in file order. Only `fmt ` and `data` matter to the decoder;
//! every other chunk (`LIST`, `fact`, `cue `, vendor chunks) is skipped.

use crate::audio::cursor::ByteCursor;
use crate::error::{DecodeError, Result};

pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";
pub const WAVE_FORM: &[u8; 4] = b"WAVE";
pub const FMT_ID: &[u8; 4] = b"fmt ";
pub const DATA_ID: &[u8; 4] = b"data";

pub const RIFF_HEADER_LEN: usize = 12;
pub const CHUNK_HEADER_LEN: usize = 8;

/// Master header. `riff_size` is advisory and never trusted over the
/// actual buffer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffHeader {
    pub riff_size: u32,
    pub form_type: [u8; 4],
}

impl RiffHeader {
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let magic = cursor.read_array::<4>().map_err(|_| DecodeError::InvalidRiffHeader)?;
        if &magic != RIFF_MAGIC {
            return Err(DecodeError::InvalidRiffHeader);
        }

        let riff_size = cursor.read_u32_le()?;
        let form_type = cursor.read_array::<4>()?;
        if &form_type != WAVE_FORM {
            return Err(DecodeError::InvalidRiffHeader);
        }

        Ok(Self { riff_size, form_type })
    }

    /// File length implied by the header (`riff_size` + 8).
    pub fn declared_len(&self) -> u64 {
        u64::from(self.riff_size) + 8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    /// Payload length, excluding the pad byte.
    pub size: u32,
}

impl ChunkHeader {
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            id: cursor.read_array()?,
            size: cursor.read_u32_le()?,
        })
    }

    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }

    pub fn is_padded(&self) -> bool {
        self.size % 2 == 1
    }
}

/// What a visited chunk means to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// First `fmt ` chunk.
    Format,
    /// First `data` chunk.
    Data,
    /// Anything else, including repeated `data`/`fmt ` chunks seen after
    /// both have been found.
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    pub header: ChunkHeader,
    pub kind: ChunkKind,
    /// Byte offset of the chunk header within the file.
    pub offset: usize,
    pub payload: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Stop once both `fmt ` and `data` have been visited.
    #[default]
    UntilFormatAndData,
    /// Visit every chunk in the file.
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Start,
    HeaderValidated,
    Scanning,
    FormatSeen,
    DataSeen,
    Complete,
    Failed(String),
}

pub struct ChunkScanner<'a> {
    cursor: ByteCursor<'a>,
    mode: ScanMode,
    state: ScanState,
    format_seen: bool,
    data_seen: bool,
}

impl<'a> ChunkScanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_mode(buf, ScanMode::default())
    }

    pub fn with_mode(buf: &'a [u8], mode: ScanMode) -> Self {
        Self {
            cursor: ByteCursor::new(buf),
            mode,
            state: ScanState::Start,
            format_seen: false,
            data_seen: false,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Walk the file, handing each chunk to `visit`.
    ///
    /// The first error, from the container or from the visitor, ends the scan
    /// and leaves the scanner in `ScanState::Failed`. Call once per scanner.
    pub fn scan<F>(&mut self, mut visit: F) -> Result<RiffHeader>
    where
        F: FnMut(&Chunk<'a>) -> Result<()>,
    {
        let result = self.run(&mut visit);
        match &result {
            Ok(_) => self.state = ScanState::Complete,
            Err(e) => self.state = ScanState::Failed(e.to_string()),
        }
        result
    }

    fn run<F>(&mut self, visit: &mut F) -> Result<RiffHeader>
    where
        F: FnMut(&Chunk<'a>) -> Result<()>,
    {
        let buf_len = self.cursor.remaining() as u64;
        let riff = RiffHeader::parse(&mut self.cursor)?;
        self.state = ScanState::HeaderValidated;

        if riff.declared_len() != buf_len {
            log::debug!(
                "RIFF size declares {} bytes but buffer holds {}; using actual length",
                riff.declared_len(),
                buf_len
            );
        }

        while let Some(chunk) = self.next_chunk()? {
            log::debug!(
                "Chunk '{}' at offset {}: {} bytes ({:?})",
                chunk.header.id_str(),
                chunk.offset,
                chunk.header.size,
                chunk.kind
            );
            visit(&chunk)?;
            self.advance_state();

            if self.mode == ScanMode::UntilFormatAndData && self.both_seen() {
                break;
            }
        }

        if !self.format_seen {
            return Err(DecodeError::MissingFormatChunk);
        }
        if !self.data_seen {
            return Err(DecodeError::MissingDataChunk);
        }

        Ok(riff)
    }

    fn next_chunk(&mut self) -> Result<Option<Chunk<'a>>> {
        let remaining = self.cursor.remaining();
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < CHUNK_HEADER_LEN && self.both_seen() {
            log::debug!("Ignoring {} trailing bytes after last chunk", remaining);
            return Ok(None);
        }

        let offset = self.cursor.position();
        let header = ChunkHeader::parse(&mut self.cursor)?;
        let payload = self.cursor.read_bytes(header.size as usize)?;

        // A writer may omit the pad byte after the final chunk.
        if header.is_padded() && !self.cursor.at_end() {
            self.cursor.skip(1)?;
        }

        let kind = self.classify(&header)?;
        if self.state == ScanState::HeaderValidated {
            self.state = ScanState::Scanning;
        }

        Ok(Some(Chunk { header, kind, offset, payload }))
    }

    fn classify(&mut self, header: &ChunkHeader) -> Result<ChunkKind> {
        match &header.id {
            FMT_ID if !self.format_seen => {
                self.format_seen = true;
                Ok(ChunkKind::Format)
            }
            FMT_ID if !self.data_seen => Err(DecodeError::DuplicateFormatChunk),
            DATA_ID if !self.data_seen => {
                self.data_seen = true;
                Ok(ChunkKind::Data)
            }
            _ => Ok(ChunkKind::Other),
        }
    }

    fn advance_state(&mut self) {
        self.state = match (self.format_seen, self.data_seen) {
            (true, true) => ScanState::Complete,
            (true, false) => ScanState::FormatSeen,
            (false, true) => ScanState::DataSeen,
            (false, false) => ScanState::Scanning,
        };
    }

    fn both_seen(&self) -> bool {
        self.format_seen && self.data_seen
    }
}
