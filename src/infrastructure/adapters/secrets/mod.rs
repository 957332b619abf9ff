//! Secret Store Adapter - API key 存储实现

mod file_secret_store;
mod memory_secret_store;

pub use file_secret_store::FileSecretStore;
pub use memory_secret_store::InMemorySecretStore;
