use sha1::{Digest, Sha1};
use std::{fmt, str::FromStr};

use super::{ObjectError, ObjectResult};

/// Length in bytes of a raw object id.
pub const HASH_LEN: usize = 20;

/// Raw SHA-1 digest naming an object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; HASH_LEN]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        ObjectId(bytes)
    }

    /// Reads the first 20 bytes of `bytes` as an id.
    pub fn from_slice(bytes: &[u8]) -> ObjectResult<Self> {
        let raw: [u8; HASH_LEN] = bytes
            .get(..HASH_LEN)
            .and_then(|head| head.try_into().ok())
            .ok_or(ObjectError::TruncatedObject {
                expected: HASH_LEN,
                found: bytes.len(),
            })?;

        Ok(ObjectId(raw))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectError;

    fn from_str(s: &str) -> ObjectResult<Self> {
        if s.len() != HASH_LEN * 2 {
            return Err(ObjectError::InvalidHash(s.to_string()));
        }

        let mut raw = [0u8; HASH_LEN];
        hex::decode_to_slice(s, &mut raw).map_err(|_| ObjectError::InvalidHash(s.to_string()))?;

        Ok(ObjectId(raw))
    }
}

/// SHA-1 over the full encoded object (header + body).
pub fn hash_object_bytes(bytes: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(bytes);

    let digest = hasher.finalize();
    let mut raw = [0u8; HASH_LEN];
    raw.copy_from_slice(&digest[..]);

    ObjectId(raw)
}
