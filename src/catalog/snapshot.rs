//! Versioned JSON encoding of the declared schema stored with every recorded migration.
use serde::{Deserialize, Serialize};

use super::table::Table;
use crate::error::PersistenceError;

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub tables: Vec<Table>,
}

#[derive(Deserialize)]
struct Header {
    format_version: u32,
}

impl Snapshot {
    pub fn new(tables: Vec<Table>) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            tables,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, PersistenceError> {
        serde_json::to_vec(self).map_err(PersistenceError::Encode)
    }

    /// Decode a stored snapshot, refusing versions this build does not understand.
    ///
    /// Table dependencies are not part of the encoding; callers regenerate them.
    pub fn decode(bytes: &[u8]) -> Result<Self, PersistenceError> {
        let header: Header = serde_json::from_slice(bytes).map_err(PersistenceError::Decode)?;
        if header.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: header.format_version,
                supported: SNAPSHOT_FORMAT_VERSION,
            });
        }
        serde_json::from_slice(bytes).map_err(PersistenceError::Decode)
    }
}
