pub mod link_store;
pub mod short_code;

pub use link_store::{LinkRepository, LinkStore, StoreError, StoreResult};
pub use short_code::{CodeGenerator, NanoidGenerator};
