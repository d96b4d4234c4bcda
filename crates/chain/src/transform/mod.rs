use crate::error::StageError;
use bytes::Bytes;

mod compress;

pub use compress::{Codec, Compression};

/// A named, invertible payload transform: the behavior one stage adds.
///
/// `invert(apply(x)) == x` must hold for every payload the transform accepts;
/// that correctness is the transform author's responsibility and is not
/// checked by the chain. The tag identifies the transform kind in envelope
/// records and decides whether an inverse runs at all.
pub trait Transform: Send + Sync {
    fn tag(&self) -> &'static str;

    fn apply(&self, payload: Bytes) -> Result<Bytes, StageError>;

    fn invert(&self, payload: Bytes) -> Result<Bytes, StageError>;
}

/// The neutral transform: both directions return the payload unchanged.
#[derive(Default, Clone, Copy, Debug)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    fn tag(&self) -> &'static str {
        "identity"
    }

    #[inline(always)]
    fn apply(&self, payload: Bytes) -> Result<Bytes, StageError> {
        Ok(payload)
    }

    #[inline(always)]
    fn invert(&self, payload: Bytes) -> Result<Bytes, StageError> {
        Ok(payload)
    }
}

/// Keyed byte-wise obfuscation over a repeating key. Self-inverse.
///
/// An empty key leaves payloads unchanged.
#[derive(Clone, Debug)]
pub struct XorCipher {
    key: Vec<u8>,
}

impl XorCipher {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    fn mask(&self, payload: &Bytes) -> Bytes {
        if self.key.is_empty() {
            return payload.clone();
        }
        let masked: Vec<u8> = payload.iter().zip(self.key.iter().cycle()).map(|(byte, key)| byte ^ key).collect();
        Bytes::from(masked)
    }
}

impl Transform for XorCipher {
    fn tag(&self) -> &'static str {
        "xor"
    }

    fn apply(&self, payload: Bytes) -> Result<Bytes, StageError> {
        Ok(self.mask(&payload))
    }

    fn invert(&self, payload: Bytes) -> Result<Bytes, StageError> {
        Ok(self.mask(&payload))
    }
}
