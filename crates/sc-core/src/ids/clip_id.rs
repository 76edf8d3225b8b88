use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Identifier of a clip, unique within a history and across peers.
///
/// Peers use it as the dedup key for incoming broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(String);

impl_id!(ClipId);
