mod file_kv_store;

pub use file_kv_store::FileKeyValueStore;
