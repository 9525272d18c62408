use std::fmt;

use super::{ObjectError, ObjectId, ObjectKind, ObjectResult};

/// Closed set of modes a tree entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryMode {
    Regular,
    Executable,
    Symlink,
    Directory,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::Regular => "100644",
            EntryMode::Executable => "100755",
            EntryMode::Symlink => "120000",
            EntryMode::Directory => "40000",
        }
    }

    pub fn from_bytes(mode: &[u8]) -> ObjectResult<Self> {
        match mode {
            b"100644" => Ok(EntryMode::Regular),
            b"100755" => Ok(EntryMode::Executable),
            b"120000" => Ok(EntryMode::Symlink),
            b"40000" => Ok(EntryMode::Directory),
            other => Err(ObjectError::InvalidObject(format!(
                "unknown entry mode `{}`",
                String::from_utf8_lossy(other)
            ))),
        }
    }

    /// Kind of the object an entry with this mode points at.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            EntryMode::Directory => ObjectKind::Tree,
            _ => ObjectKind::Blob,
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(mode, name, id)` reference inside a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: EntryMode,   // e.g. "100644" or "40000"
    pub name: Vec<u8>,     // raw bytes, e.g. "main.rs" or "src"
    pub id: ObjectId,      // id of the blob/tree
}

impl TreeEntry {
    pub fn new(mode: EntryMode, name: impl Into<Vec<u8>>, id: ObjectId) -> Self {
        TreeEntry {
            mode,
            name: name.into(),
            id,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.mode.object_kind()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut entry = Vec::with_capacity(self.mode.as_str().len() + self.name.len() + 22);
        entry.extend_from_slice(self.mode.as_str().as_bytes());
        entry.push(b' ');

        entry.extend_from_slice(&self.name);
        entry.push(0); // NULL separator

        entry.extend_from_slice(self.id.as_bytes());
        entry
    }

    /// Renders the entry the way `ls-tree` prints it. Names that are not
    /// UTF-8 are shown lossily; the stored bytes are untouched.
    pub fn format(&self, name_only: bool) -> String {
        let name = String::from_utf8_lossy(&self.name);
        if name_only {
            return name.into_owned();
        }

        format!("{} {} {}", self.mode, name, self.id)
    }
}

/// Canonical order: names compared byte by byte, ascending.
pub fn sort_entries(entries: &mut [TreeEntry]) {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
}
