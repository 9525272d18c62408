pub mod codec;
pub mod error;
pub mod object;
pub mod object_id;
pub mod object_store;
pub mod reader;
pub mod tree_builder;
pub mod tree_entry;

pub use codec::*;
pub use error::*;
pub use object::*;
pub use object_id::*;
pub use object_store::*;
pub use reader::*;
pub use tree_builder::*;
pub use tree_entry::*;
