use ignore::{DirEntry, WalkBuilder};
use std::{
    ffi::{OsStr, OsString},
    fs, io,
    path::Path,
};
use tracing::debug;

use super::{
    Codec, EntryMode, Object, ObjectError, ObjectResult, ObjectStore, TreeEntry, ZlibCodec,
    hash_object_bytes, sort_entries,
};

/// Turns a directory into a hash-linked set of tree and blob objects.
pub struct TreeBuilder<'a, C = ZlibCodec> {
    store: &'a ObjectStore<C>,
    excluded: OsString,
}

impl<'a, C: Codec> TreeBuilder<'a, C> {
    /// Children named `excluded` (the store's own directory) are skipped at every level.
    pub fn new(store: &'a ObjectStore<C>, excluded: impl Into<OsString>) -> Self {
        TreeBuilder {
            store,
            excluded: excluded.into(),
        }
    }

    /// Stores every file below `dir` and returns the entry of the root tree,
    /// or `None` when nothing but (transitively) empty directories remain.
    ///
    /// Any failing child aborts the whole build before its parent is written.
    pub fn build(&self, dir: &Path) -> ObjectResult<Option<TreeEntry>> {
        let mut entries = Vec::new();

        for child in self.children(dir)? {
            let is_dir = child.file_type().is_some_and(|ft| ft.is_dir());

            if is_dir {
                match self.build(child.path())? {
                    Some(subtree) => entries.push(subtree),
                    None => debug!(path = %child.path().display(), "skipping empty directory"),
                }
            } else {
                entries.push(write_blob_from_file(self.store, child.path())?);
            }
        }

        if entries.is_empty() {
            return Ok(None);
        }

        sort_entries(&mut entries);

        let encoded = Object::Tree(entries).encode();
        let id = hash_object_bytes(&encoded);
        self.store.write(&id, &encoded)?;
        debug!(path = %dir.display(), %id, "wrote tree");

        Ok(Some(TreeEntry::new(EntryMode::Directory, entry_name(dir)?, id)))
    }

    fn children(&self, dir: &Path) -> ObjectResult<Vec<DirEntry>> {
        let excluded = self.excluded.clone();
        let mut children = Vec::new();

        for result in WalkBuilder::new(dir)
            .standard_filters(false)
            .follow_links(false)
            .max_depth(Some(1))
            .filter_entry(move |entry| entry.depth() == 0 || entry.file_name() != excluded.as_os_str())
            .build()
        {
            let entry = result.map_err(walk_error)?;
            if entry.depth() > 0 {
                children.push(entry);
            }
        }

        Ok(children)
    }
}

/// Hashes a file as a blob without storing it.
pub fn hash_file(path: &Path) -> ObjectResult<TreeEntry> {
    let (entry, _) = blob_entry(path)?;
    Ok(entry)
}

/// Hashes a file as a blob and persists it.
pub fn write_blob_from_file<C: Codec>(
    store: &ObjectStore<C>,
    path: &Path,
) -> ObjectResult<TreeEntry> {
    let (entry, encoded) = blob_entry(path)?;
    store.write(&entry.id, &encoded)?;

    Ok(entry)
}

/// Reads `path` and returns its blob entry along with the encoded object.
fn blob_entry(path: &Path) -> ObjectResult<(TreeEntry, Vec<u8>)> {
    let encoded = Object::Blob(fs::read(path)?).encode();
    let entry = TreeEntry::new(
        EntryMode::Regular,
        entry_name(path)?,
        hash_object_bytes(&encoded),
    );

    Ok((entry, encoded))
}

fn entry_name(path: &Path) -> ObjectResult<Vec<u8>> {
    // `.` and `/` have no base name; only ever the case for the root tree
    let Some(name) = path.file_name() else {
        return Ok(Vec::new());
    };

    os_name_bytes(name).ok_or_else(|| ObjectError::NonUtf8Path(path.to_path_buf()))
}

#[cfg(unix)]
fn os_name_bytes(name: &OsStr) -> Option<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;

    Some(name.as_bytes().to_vec())
}

#[cfg(not(unix))]
fn os_name_bytes(name: &OsStr) -> Option<Vec<u8>> {
    name.to_str().map(|name| name.as_bytes().to_vec())
}

fn walk_error(err: ignore::Error) -> ObjectError {
    let message = err.to_string();
    ObjectError::Io(
        err.into_io_error()
            .unwrap_or_else(|| io::Error::other(message)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{ObjectId, read_blob, read_tree};
    use tempfile::TempDir;

    fn setup() -> (TempDir, ObjectStore) {
        let tmp = TempDir::new().unwrap();
        let store = ObjectStore::new(tmp.path().join(".vit/objects"));
        (tmp, store)
    }

    #[test]
    fn single_file_matches_git() {
        let (tmp, store) = setup();
        fs::write(tmp.path().join("a.txt"), "hello").unwrap();

        let root = TreeBuilder::new(&store, ".vit").build(tmp.path()).unwrap().unwrap();
        assert_eq!(root.mode, EntryMode::Directory);
        assert_eq!(root.id.to_hex(), "65829399355e5929e44741d637d52c614ac21bc3");

        let blob_id: ObjectId = "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0".parse().unwrap();
        assert_eq!(read_blob(&store, &blob_id).unwrap(), b"hello");
    }

    #[test]
    fn store_directory_is_excluded() {
        let (tmp, store) = setup();
        fs::write(tmp.path().join("a.txt"), "hello").unwrap();
        fs::create_dir_all(tmp.path().join("nested/.vit")).unwrap();
        fs::write(tmp.path().join("nested/.vit/HEAD"), "ref").unwrap();

        let root = TreeBuilder::new(&store, ".vit").build(tmp.path()).unwrap().unwrap();
        let entries = read_tree(&store, &root.id).unwrap();

        let names: Vec<String> = entries.iter().map(|e| e.format(true)).collect();
        assert_eq!(names, ["a.txt"]);
    }

    #[test]
    fn empty_directories_are_pruned() {
        let (tmp, store) = setup();
        fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();
        fs::create_dir_all(tmp.path().join("d")).unwrap();

        assert!(TreeBuilder::new(&store, ".vit").build(tmp.path()).unwrap().is_none());

        fs::write(tmp.path().join("a/b/file"), "x").unwrap();
        let root = TreeBuilder::new(&store, ".vit").build(tmp.path()).unwrap().unwrap();
        let entries = read_tree(&store, &root.id).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, b"a");
        assert_eq!(entries[0].mode, EntryMode::Directory);
    }

    #[test]
    fn subtree_entries_carry_base_names() {
        let (tmp, store) = setup();
        fs::create_dir_all(tmp.path().join("src/bin")).unwrap();
        fs::write(tmp.path().join("src/bin/main.rs"), "fn main() {}").unwrap();

        let root = TreeBuilder::new(&store, ".vit").build(tmp.path()).unwrap().unwrap();
        let top = read_tree(&store, &root.id).unwrap();
        assert_eq!(top[0].name, b"src");

        let src = read_tree(&store, &top[0].id).unwrap();
        assert_eq!(src[0].name, b"bin");

        let bin = read_tree(&store, &src[0].id).unwrap();
        assert_eq!(bin[0].name, b"main.rs");
        assert_eq!(bin[0].mode, EntryMode::Regular);
    }

    #[test]
    fn hash_file_does_not_write() {
        let (tmp, store) = setup();
        let path = tmp.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let entry = hash_file(&path).unwrap();
        assert_eq!(entry.name, b"a.txt");
        assert!(!store.contains(&entry.id));

        let written = write_blob_from_file(&store, &path).unwrap();
        assert_eq!(written, entry);
        assert!(store.contains(&entry.id));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_names_are_stored_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let (tmp, store) = setup();
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        fs::write(tmp.path().join(name), "latin-1").unwrap();

        let root = TreeBuilder::new(&store, ".vit").build(tmp.path()).unwrap().unwrap();
        let entries = read_tree(&store, &root.id).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, b"caf\xe9.txt");
        assert_eq!(read_blob(&store, &entries[0].id).unwrap(), b"latin-1");
        assert_eq!(entries[0].format(true), "caf\u{fffd}.txt");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let (tmp, store) = setup();
        assert!(matches!(
            TreeBuilder::new(&store, ".vit").build(&tmp.path().join("missing")),
            Err(ObjectError::Io(_))
        ));
    }
}
