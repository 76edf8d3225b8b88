use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityStoreError {
    #[error("identity store error: {0}")]
    Store(String),

    #[error("identity data corrupt: {0}")]
    Corrupt(String),
}

/// Persists the encoded network identity keypair between runs.
pub trait IdentityStorePort: Send + Sync {
    fn load_identity(&self) -> Result<Option<Vec<u8>>, IdentityStoreError>;

    fn store_identity(&self, identity: &[u8]) -> Result<(), IdentityStoreError>;
}
