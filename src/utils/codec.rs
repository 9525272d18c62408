use flate2::{Compression, bufread::ZlibDecoder, write::ZlibEncoder};
use std::io::{self, Read, Write};

use super::{ObjectError, ObjectResult};

/// Reversible byte-stream transform applied to loose objects on disk.
pub trait Codec {
    fn compress(&self, data: &[u8]) -> io::Result<Vec<u8>>;

    fn decompress(&self, data: &[u8]) -> ObjectResult<Vec<u8>>;
}

/// zlib framing, the loose object format.
#[derive(Debug, Clone, Copy)]
pub struct ZlibCodec {
    level: Compression,
}

impl ZlibCodec {
    /// `level` is clamped to 0..=9.
    pub fn new(level: u32) -> Self {
        ZlibCodec {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for ZlibCodec {
    fn default() -> Self {
        ZlibCodec {
            level: Compression::default(),
        }
    }
}

impl Codec for ZlibCodec {
    fn compress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(&self, data: &[u8]) -> ObjectResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|err| ObjectError::CorruptObject(format!("zlib stream: {err}")))?;

        Ok(decompressed)
    }
}
