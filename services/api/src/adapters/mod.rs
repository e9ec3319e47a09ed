pub mod db;
pub mod memory;
pub mod password;
pub mod templates;

pub use db::DbAdapter;
pub use memory::MemoryStore;
pub use password::Argon2Hasher;
pub use templates::{FixedReflection, TemplateVisionComposer};
