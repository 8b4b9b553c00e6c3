use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::prefab::{Category, Service};

/// Why a configuration change was refused. The engine's state is unchanged
/// whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum ConfigError {
    UnknownPack(String),
    /// The pack is restricted to a different service.
    ServiceMismatch {
        pack: String,
        pack_service: Service,
        requested: Service,
    },
    DuplicatePack(String),
    /// Only user packs (`CustomV1`) can be added or edited.
    WrongVersion(String),
    InvalidLevel {
        pack: String,
        level: u8,
    },
    InvalidRow {
        category: Category,
        row: usize,
    },
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownPack(name) => write!(f, "unknown pack '{name}'"),
            ConfigError::ServiceMismatch {
                pack,
                pack_service,
                requested,
            } => write!(
                f,
                "pack '{pack}' is for {pack_service:?}, not {requested:?}"
            ),
            ConfigError::DuplicatePack(name) => write!(f, "pack '{name}' already exists"),
            ConfigError::WrongVersion(name) => {
                write!(f, "pack '{name}' is built in and can't be edited")
            }
            ConfigError::InvalidLevel { pack, level } => {
                write!(f, "pack '{pack}' has no level {level}")
            }
            ConfigError::InvalidRow { category, row } => {
                write!(f, "{category:?} has no legacy row {row}")
            }
            ConfigError::InvalidValue(msg) => write!(f, "invalid value: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
