use std::fmt;

use super::{
    EntryMode, HASH_LEN, ObjectError, ObjectId, ObjectResult, TreeEntry, hash_object_bytes,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    /// Reserved, commit objects are not stored yet.
    Commit,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded `<kind> <size>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectHeader {
    pub kind: ObjectKind,
    pub size: usize,
}

/// A fully decoded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Vec<u8>),
    /// Entries in serialization order.
    Tree(Vec<TreeEntry>),
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Blob(_) => ObjectKind::Blob,
            Object::Tree(_) => ObjectKind::Tree,
        }
    }

    /// Encodes `<kind> <len>\0<body>`. Tree entries are written in their
    /// current order; callers sort first when they need the canonical id.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Object::Blob(content) => with_header(ObjectKind::Blob, content),
            Object::Tree(entries) => {
                let body: Vec<u8> = entries.iter().flat_map(TreeEntry::to_bytes).collect();
                with_header(ObjectKind::Tree, &body)
            }
        }
    }

    pub fn id(&self) -> ObjectId {
        hash_object_bytes(&self.encode())
    }

    pub fn parse(bytes: &[u8]) -> ObjectResult<Self> {
        let (header, body) = parse_header(bytes)?;

        match header.kind {
            ObjectKind::Blob => Ok(Object::Blob(body.to_vec())),
            ObjectKind::Tree => Ok(Object::Tree(parse_tree_body(body)?)),
            ObjectKind::Commit => Err(unsupported(header.kind)),
        }
    }
}

fn with_header(kind: ObjectKind, body: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind, body.len());
    let mut full_data = Vec::with_capacity(header.len() + body.len());
    full_data.extend_from_slice(header.as_bytes());
    full_data.extend_from_slice(body);
    full_data
}

fn unsupported(kind: ObjectKind) -> ObjectError {
    ObjectError::InvalidObject(format!("unsupported object kind `{kind}`"))
}

fn split_on(bytes: &[u8], sep: u8) -> Option<(&[u8], &[u8])> {
    let i = bytes.iter().position(|&b| b == sep)?;
    Some((&bytes[..i], &bytes[i + 1..]))
}

/// Splits off and validates the header, returning it with the body that follows.
///
/// The declared size must match the remaining byte count exactly.
pub fn parse_header(bytes: &[u8]) -> ObjectResult<(ObjectHeader, &[u8])> {
    let (header, body) = split_on(bytes, 0)
        .ok_or_else(|| ObjectError::InvalidObject("missing header terminator".to_string()))?;
    if header.is_empty() {
        return Err(ObjectError::InvalidObject("empty header".to_string()));
    }

    let malformed =
        || ObjectError::InvalidObject(format!("malformed header `{}`", String::from_utf8_lossy(header)));

    let (kind, size) = split_on(header, b' ').ok_or_else(malformed)?;
    let kind = match kind {
        b"blob" => ObjectKind::Blob,
        b"tree" => ObjectKind::Tree,
        b"commit" => return Err(unsupported(ObjectKind::Commit)),
        _ => return Err(malformed()),
    };

    if size.is_empty() || !size.iter().all(u8::is_ascii_digit) {
        return Err(malformed());
    }
    let size: usize = std::str::from_utf8(size)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(malformed)?;

    if size != body.len() {
        return Err(ObjectError::CorruptObject(format!(
            "{kind} header declares {size} bytes but {} follow",
            body.len()
        )));
    }

    Ok((ObjectHeader { kind, size }, body))
}

/// Walks `<mode> <name>\0<20 byte hash>` records until the body is exhausted.
pub fn parse_tree_body(body: &[u8]) -> ObjectResult<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut rest = body;

    while !rest.is_empty() {
        let (entry_header, after) = split_on(rest, 0).ok_or_else(|| {
            ObjectError::InvalidObject("tree entry is missing its NUL terminator".to_string())
        })?;

        let (mode, name) = split_on(entry_header, b' ').unwrap_or((entry_header, &[][..]));
        if mode.is_empty() || name.is_empty() {
            return Err(ObjectError::InvalidObject(format!(
                "tree entry `{}` needs both a mode and a name",
                String::from_utf8_lossy(entry_header)
            )));
        }

        let mode = EntryMode::from_bytes(mode)?;
        let name = name.to_vec();
        let id = ObjectId::from_slice(after)?;

        entries.push(TreeEntry { mode, name, id });
        rest = &after[HASH_LEN..];
    }

    Ok(entries)
}
