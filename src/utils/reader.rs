use super::{Codec, Object, ObjectError, ObjectId, ObjectKind, ObjectResult, ObjectStore, TreeEntry};

/// Loads and fully decodes any object.
pub fn read_object<C: Codec>(store: &ObjectStore<C>, id: &ObjectId) -> ObjectResult<Object> {
    Object::parse(&store.read(id)?)
}

/// Entries of a tree in on-disk order.
pub fn read_tree<C: Codec>(store: &ObjectStore<C>, id: &ObjectId) -> ObjectResult<Vec<TreeEntry>> {
    match read_object(store, id)? {
        Object::Tree(entries) => Ok(entries),
        other => Err(wrong_kind(ObjectKind::Tree, other.kind())),
    }
}

/// Payload bytes of a blob.
pub fn read_blob<C: Codec>(store: &ObjectStore<C>, id: &ObjectId) -> ObjectResult<Vec<u8>> {
    match read_object(store, id)? {
        Object::Blob(content) => Ok(content),
        other => Err(wrong_kind(ObjectKind::Blob, other.kind())),
    }
}

fn wrong_kind(expected: ObjectKind, found: ObjectKind) -> ObjectError {
    ObjectError::InvalidObject(format!("expected {expected}, found {found}"))
}
