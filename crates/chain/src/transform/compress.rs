use crate::error::StageError;
use crate::transform::Transform;
use brotli::enc::BrotliEncoderParams;
use bytes::Bytes;
use flate2::write::{GzDecoder, GzEncoder, ZlibDecoder, ZlibEncoder};
use std::io::Write;
use zstd::stream::write::Encoder as ZstdEncoder;

const ZSTD_LEVEL: i32 = 6;
const BR_QUALITY: i32 = 3; // BROTLI_PARAM_QUALITY
const BR_LGWIN: i32 = 22; // BROTLI_PARAM_LGWIN

/// Supported compression codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Gzip encoding.
    Gzip,
    /// Deflate encoding.
    Deflate,
    /// Zstd encoding.
    Zstd,
    /// Brotli encoding.
    Br,
}

/// A compression transform: forward compresses, inverse decompresses.
#[derive(Debug, Clone, Copy)]
pub struct Compression {
    codec: Codec,
}

impl Compression {
    pub fn new(codec: Codec) -> Self {
        Self { codec }
    }

    /// Creates a new Gzip compression transform.
    pub fn gzip() -> Self {
        Self::new(Codec::Gzip)
    }

    /// Creates a new Deflate compression transform.
    pub fn deflate() -> Self {
        Self::new(Codec::Deflate)
    }

    /// Creates a new Zstd compression transform.
    pub fn zstd() -> Self {
        Self::new(Codec::Zstd)
    }

    /// Creates a new Brotli compression transform.
    pub fn br() -> Self {
        Self::new(Codec::Br)
    }
}

impl Transform for Compression {
    fn tag(&self) -> &'static str {
        match self.codec {
            Codec::Gzip => "gzip",
            Codec::Deflate => "deflate",
            Codec::Zstd => "zstd",
            Codec::Br => "br",
        }
    }

    fn apply(&self, payload: Bytes) -> Result<Bytes, StageError> {
        let compressed = match self.codec {
            Codec::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::best());
                encoder.write_all(&payload)?;
                encoder.finish()?
            }
            Codec::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::best());
                encoder.write_all(&payload)?;
                encoder.finish()?
            }
            Codec::Zstd => {
                let mut encoder = ZstdEncoder::new(Vec::new(), ZSTD_LEVEL)?;
                encoder.write_all(&payload)?;
                encoder.finish()?
            }
            Codec::Br => {
                let params = BrotliEncoderParams { quality: BR_QUALITY, lgwin: BR_LGWIN, ..BrotliEncoderParams::default() };
                let mut input = payload.as_ref();
                let mut compressed = Vec::new();
                brotli::BrotliCompress(&mut input, &mut compressed, &params)?;
                compressed
            }
        };
        Ok(Bytes::from(compressed))
    }

    fn invert(&self, payload: Bytes) -> Result<Bytes, StageError> {
        let decompressed = match self.codec {
            Codec::Gzip => {
                let mut decoder = GzDecoder::new(Vec::new());
                decoder.write_all(&payload)?;
                decoder.finish()?
            }
            Codec::Deflate => {
                let mut decoder = ZlibDecoder::new(Vec::new());
                decoder.write_all(&payload)?;
                decoder.finish()?
            }
            Codec::Zstd => zstd::stream::decode_all(payload.as_ref())?,
            Codec::Br => {
                let mut input = payload.as_ref();
                let mut decoded = Vec::new();
                brotli::BrotliDecompress(&mut input, &mut decoded)?;
                decoded
            }
        };
        Ok(Bytes::from(decompressed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const FIXTURE: &str = indoc! {"
        The file component stores its content transformed at rest.
        The file component stores its content transformed at rest.
        The file component stores its content transformed at rest.
        Repetition keeps every codec's output visibly smaller than its input.
    "};

    #[test]
    fn every_codec_restores_the_original() {
        for codec in [Codec::Gzip, Codec::Deflate, Codec::Zstd, Codec::Br] {
            let transform = Compression::new(codec);
            let payload = Bytes::from_static(FIXTURE.as_bytes());

            let compressed = transform.apply(payload.clone()).expect("compressing a valid payload");
            assert_ne!(compressed, payload, "{codec:?} output must differ from its input");

            let restored = transform.invert(compressed).expect("decompressing our own output");
            assert_eq!(restored, payload, "{codec:?} must restore the original");
        }
    }

    #[test]
    fn repetitive_payloads_shrink() {
        for codec in [Codec::Gzip, Codec::Deflate, Codec::Zstd, Codec::Br] {
            let transform = Compression::new(codec);
            let payload = Bytes::from_static(FIXTURE.as_bytes());

            let compressed = transform.apply(payload.clone()).expect("compressing a valid payload");
            assert!(compressed.len() < payload.len(), "{codec:?} should shrink a repetitive payload");
        }
    }

    #[test]
    fn garbage_input_fails_the_inverse() {
        let garbage = Bytes::from_static(b"definitely not a gzip stream");
        assert!(Compression::gzip().invert(garbage).is_err());
    }

    #[test]
    fn tags_name_their_codec() {
        assert_eq!(Compression::gzip().tag(), "gzip");
        assert_eq!(Compression::deflate().tag(), "deflate");
        assert_eq!(Compression::zstd().tag(), "zstd");
        assert_eq!(Compression::br().tag(), "br");
    }
}
