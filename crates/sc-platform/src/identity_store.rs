use std::io;
use std::path::{Path, PathBuf};

use libp2p::identity::Keypair;
use log::info;
use sc_core::ports::{IdentityStoreError, IdentityStorePort};

const IDENTITY_FILE: &str = "libp2p_identity.pb";

/// Keeps the node keypair in `libp2p_identity.pb` inside the identity directory.
#[derive(Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(identity_dir: impl AsRef<Path>) -> Self {
        let path = identity_dir.as_ref().join(IDENTITY_FILE);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStorePort for FileIdentityStore {
    fn load_identity(&self) -> Result<Option<Vec<u8>>, IdentityStoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(IdentityStoreError::Store(format!(
                "failed to read identity file {}: {err}",
                self.path.display()
            ))),
        }
    }

    fn store_identity(&self, identity: &[u8]) -> Result<(), IdentityStoreError> {
        let parent = self.path.parent().ok_or_else(|| {
            IdentityStoreError::Store("identity path missing parent directory".to_string())
        })?;
        std::fs::create_dir_all(parent).map_err(|err| {
            IdentityStoreError::Store(format!("failed to create identity dir: {err}"))
        })?;

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, identity).map_err(|err| {
            IdentityStoreError::Store(format!("failed to write identity temp file: {err}"))
        })?;

        std::fs::rename(&tmp_path, &self.path).map_err(|err| {
            IdentityStoreError::Store(format!("failed to commit identity file: {err}"))
        })?;

        Ok(())
    }
}

/// Loads the stored ed25519 keypair, generating and persisting one on first run.
///
/// Bytes that do not decode are reported as [`IdentityStoreError::Corrupt`]
/// and left on disk.
pub fn load_or_create_identity(
    store: &dyn IdentityStorePort,
) -> Result<Keypair, IdentityStoreError> {
    if let Some(bytes) = store.load_identity()? {
        return Keypair::from_protobuf_encoding(&bytes).map_err(|e| {
            IdentityStoreError::Corrupt(format!("failed to decode identity keypair: {e}"))
        });
    }

    let keypair = Keypair::generate_ed25519();
    let bytes = keypair.to_protobuf_encoding().map_err(|e| {
        IdentityStoreError::Store(format!("failed to encode identity keypair: {e}"))
    })?;
    store.store_identity(&bytes)?;
    info!("generated new node identity");
    Ok(keypair)
}
