#![forbid(unsafe_code)]

//! Container decoding for binary glTF (`.glb`) scenes.
//!
//! Layout: a 12-byte header (`glTF`, version, total length) followed by
//! chunks of `length | type | data`. The first chunk is the JSON document,
//! an optional `BIN` chunk holds buffer data. Chunks are 4-byte aligned.

use serde_json::Value;
use std::path::{Path, PathBuf};

const MAGIC: u32 = 0x4654_6C67; // "glTF"
const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"
const CHUNK_BIN: u32 = 0x004E_4942; // "BIN\0"
const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("file is {0} bytes, shorter than a GLB header")]
    TooShort(usize),

    #[error("bad magic {0:#010x}")]
    BadMagic(u32),

    #[error("unsupported GLB version {0}")]
    UnsupportedVersion(u32),

    #[error("header declares {declared} bytes but file has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("chunk at offset {0} runs past the end of the file")]
    ChunkOutOfBounds(usize),

    #[error("first chunk is not JSON")]
    MissingJsonChunk,

    #[error("invalid JSON chunk: {0}")]
    Json(#[from] serde_json::Error),
}

/// A decoded scene, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAsset {
    pub path: PathBuf,
    pub version: u32,
    pub document: Value,
    pub binary: Vec<u8>,
}

impl SceneAsset {
    pub fn node_count(&self) -> usize {
        self.array_len("nodes")
    }

    pub fn mesh_count(&self) -> usize {
        self.array_len("meshes")
    }

    pub fn material_count(&self) -> usize {
        self.array_len("materials")
    }

    /// Tool that produced the file, from `asset.generator`.
    pub fn generator(&self) -> Option<&str> {
        self.document.get("asset")?.get("generator")?.as_str()
    }

    fn array_len(&self, key: &str) -> usize {
        self.document
            .get(key)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let word = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
}

/// Decode a GLB file read from `path`.
pub fn decode(path: &Path, bytes: &[u8]) -> Result<SceneAsset, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::TooShort(bytes.len()));
    }
    let header = |offset| read_u32(bytes, offset).ok_or(DecodeError::TooShort(bytes.len()));

    let magic = header(0)?;
    if magic != MAGIC {
        return Err(DecodeError::BadMagic(magic));
    }
    let version = header(4)?;
    if version != 2 {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    let declared = header(8)? as usize;
    if declared < HEADER_LEN || declared > bytes.len() {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: bytes.len(),
        });
    }
    let bytes = &bytes[..declared];

    let mut offset = HEADER_LEN;
    let mut document = None;
    let mut binary = Vec::new();

    while offset < bytes.len() {
        let chunk_len = read_u32(bytes, offset).ok_or(DecodeError::ChunkOutOfBounds(offset))? as usize;
        let chunk_type =
            read_u32(bytes, offset + 4).ok_or(DecodeError::ChunkOutOfBounds(offset))?;
        let start = offset + CHUNK_HEADER_LEN;
        let data = start
            .checked_add(chunk_len)
            .and_then(|end| bytes.get(start..end))
            .ok_or(DecodeError::ChunkOutOfBounds(offset))?;

        match (chunk_type, document.is_some()) {
            (CHUNK_JSON, false) => document = Some(serde_json::from_slice::<Value>(data)?),
            (_, false) => return Err(DecodeError::MissingJsonChunk),
            (CHUNK_BIN, true) if binary.is_empty() => binary = data.to_vec(),
            // extension chunks are skipped
            _ => {}
        }

        offset = start + chunk_len.next_multiple_of(4);
    }

    Ok(SceneAsset {
        path: path.to_owned(),
        version,
        document: document.ok_or(DecodeError::MissingJsonChunk)?,
        binary,
    })
}

/// Assemble a GLB container. Used to produce fixtures.
pub fn encode(document: &Value, binary: &[u8]) -> Vec<u8> {
    let mut json = serde_json::to_vec(document).unwrap_or_default();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = binary.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let mut total = HEADER_LEN + CHUNK_HEADER_LEN + json.len();
    if !bin.is_empty() {
        total += CHUNK_HEADER_LEN + bin.len();
    }

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);
    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "asset": {"version": "2.0", "generator": "fixture"},
            "nodes": [{"mesh": 0}, {"children": [0]}],
            "meshes": [{"primitives": []}],
        })
    }

    #[test]
    fn decodes_json_and_bin_chunks() {
        let bytes = encode(&sample(), &[1, 2, 3]);
        let asset = decode(Path::new("car.glb"), &bytes).unwrap();
        assert_eq!(asset.version, 2);
        assert_eq!(asset.node_count(), 2);
        assert_eq!(asset.mesh_count(), 1);
        assert_eq!(asset.material_count(), 0);
        assert_eq!(asset.generator(), Some("fixture"));
        // padded to a 4-byte boundary
        assert_eq!(asset.binary, vec![1, 2, 3, 0]);
    }

    #[test]
    fn rejects_bad_headers() {
        let good = encode(&sample(), &[]);

        assert!(matches!(
            decode(Path::new("x"), &good[..8]),
            Err(DecodeError::TooShort(8))
        ));

        let mut bad_magic = good.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            decode(Path::new("x"), &bad_magic),
            Err(DecodeError::BadMagic(_))
        ));

        let mut v1 = good.clone();
        v1[4] = 1;
        assert!(matches!(
            decode(Path::new("x"), &v1),
            Err(DecodeError::UnsupportedVersion(1))
        ));

        let truncated = &good[..good.len() - 4];
        assert!(matches!(
            decode(Path::new("x"), truncated),
            Err(DecodeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_chunk_past_end() {
        let mut bytes = encode(&sample(), &[]);
        let bogus = (bytes.len() as u32) * 2;
        bytes[12..16].copy_from_slice(&bogus.to_le_bytes());
        assert!(matches!(
            decode(Path::new("x"), &bytes),
            Err(DecodeError::ChunkOutOfBounds(12))
        ));
    }

    #[test]
    fn rejects_bin_before_json() {
        let mut bytes = encode(&sample(), &[]);
        bytes[16..20].copy_from_slice(&CHUNK_BIN.to_le_bytes());
        assert!(matches!(
            decode(Path::new("x"), &bytes),
            Err(DecodeError::MissingJsonChunk)
        ));
    }
}
