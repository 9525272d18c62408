use std::{
    fs,
    io::{ErrorKind, Write},
    path::PathBuf,
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{Codec, ObjectError, ObjectId, ObjectResult, ZlibCodec, hash_object_bytes};

/// Loose object storage under `<objects>/<2 hex>/<38 hex>`.
#[derive(Debug, Clone)]
pub struct ObjectStore<C = ZlibCodec> {
    objects_dir: PathBuf,
    codec: C,
}

impl ObjectStore<ZlibCodec> {
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        ObjectStore::with_codec(objects_dir, ZlibCodec::default())
    }
}

impl<C: Codec> ObjectStore<C> {
    pub fn with_codec(objects_dir: impl Into<PathBuf>, codec: C) -> Self {
        ObjectStore {
            objects_dir: objects_dir.into(),
            codec,
        }
    }

    /// Maps a 40 character hex hash to its object path.
    pub fn path_for(&self, hash_hex: &str) -> ObjectResult<PathBuf> {
        let id: ObjectId = hash_hex.parse()?;
        Ok(self.object_path(&id))
    }

    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        let (dir_name, file_name) = hex.split_at(2);
        self.objects_dir.join(dir_name).join(file_name)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// Compresses and stores `bytes` (header + body) under `id`.
    ///
    /// A readable object already at the target path holds these bytes and is
    /// left untouched; an unreadable one is replaced. The file only appears
    /// under its final name once fully written.
    pub fn write(&self, id: &ObjectId, bytes: &[u8]) -> ObjectResult<()> {
        let object_path = self.object_path(id);
        if object_path.exists() {
            match self.read(id) {
                Ok(_) => {
                    debug!(%id, "object already stored");
                    return Ok(());
                }
                Err(err) => warn!(%id, %err, "replacing unreadable object"),
            }
        }

        let object_dir = object_path
            .parent()
            .unwrap_or(self.objects_dir.as_path());
        fs::create_dir_all(object_dir)?;

        let compressed = self.codec.compress(bytes)?;
        let mut staged = NamedTempFile::new_in(object_dir)?;
        staged.write_all(&compressed)?;
        staged.as_file().sync_all()?;
        staged.persist(&object_path).map_err(|err| err.error)?;
        debug!(%id, size = bytes.len(), "stored object");

        Ok(())
    }

    /// Loads and inflates the raw object bytes (header + body) stored under `id`.
    pub fn read(&self, id: &ObjectId) -> ObjectResult<Vec<u8>> {
        let object_path = self.object_path(id);
        let compressed = fs::read(&object_path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ObjectError::NotFound(*id),
            _ => ObjectError::Io(err),
        })?;

        let bytes = self.codec.decompress(&compressed)?;
        let actual = hash_object_bytes(&bytes);
        if actual != *id {
            return Err(ObjectError::CorruptObject(format!(
                "object {id} hashes to {actual}"
            )));
        }

        debug!(%id, size = bytes.len(), "read object");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const HELLO: &str = "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0";

    #[test]
    fn path_splits_two_and_thirty_eight() {
        let store = ObjectStore::new("/repo/.vit/objects");
        let path = store.path_for(HELLO).unwrap();
        assert_eq!(
            path,
            Path::new("/repo/.vit/objects/b6/fc4c620b67d95f953a5c1c1230aaab5db5a1b0")
        );

        let upper = store.path_for(&HELLO.to_uppercase()).unwrap();
        assert_eq!(upper, path);
    }

    #[test]
    fn path_rejects_wrong_length() {
        let store = ObjectStore::new("objects");
        for bad in ["", "b6", &HELLO[..39], format!("{HELLO}0").as_str()] {
            assert!(matches!(
                store.path_for(bad),
                Err(ObjectError::InvalidHash(_))
            ));
        }
    }

    #[test]
    fn write_then_read() {
        let tmp = TempDir::new().unwrap();
        let store = ObjectStore::new(tmp.path().join("objects"));
        let bytes = b"blob 5\0hello";
        let id = hash_object_bytes(bytes);

        store.write(&id, bytes).unwrap();
        assert!(store.contains(&id));
        assert!(tmp.path().join("objects/b6").is_dir());
        assert_eq!(store.read(&id).unwrap(), bytes);

        // second write is a no-op
        store.write(&id, bytes).unwrap();
        assert_eq!(fs::read_dir(tmp.path().join("objects/b6")).unwrap().count(), 1);
    }

    #[test]
    fn truncated_object_is_replaced_on_rewrite() {
        let tmp = TempDir::new().unwrap();
        let store = ObjectStore::new(tmp.path());
        let bytes = b"blob 5\0hello";
        let id = hash_object_bytes(bytes);

        let compressed = ZlibCodec::default().compress(bytes).unwrap();
        let path = store.object_path(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, &compressed[..3]).unwrap();
        assert!(matches!(store.read(&id), Err(ObjectError::CorruptObject(_))));

        store.write(&id, bytes).unwrap();
        assert_eq!(store.read(&id).unwrap(), bytes);
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn missing_object_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = ObjectStore::new(tmp.path());
        let id: ObjectId = HELLO.parse().unwrap();

        assert!(!store.contains(&id));
        assert!(matches!(store.read(&id), Err(ObjectError::NotFound(found)) if found == id));
    }

    #[test]
    fn undecodable_file_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let store = ObjectStore::new(tmp.path());
        let id: ObjectId = HELLO.parse().unwrap();

        let path = store.object_path(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not zlib at all").unwrap();

        assert!(matches!(store.read(&id), Err(ObjectError::CorruptObject(_))));
    }

    #[test]
    fn content_under_wrong_name_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let store = ObjectStore::new(tmp.path());
        let id: ObjectId = HELLO.parse().unwrap();

        store.write(&id, b"blob 5\0world").unwrap();
        assert!(matches!(store.read(&id), Err(ObjectError::CorruptObject(_))));
    }
}
