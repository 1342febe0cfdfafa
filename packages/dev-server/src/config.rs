//! Dev server configuration from environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `NUMTREE_PORT` | `3001` |
//! | `NUMTREE_STORE` | `turso` (`memory` for a throwaway store) |
//! | `NUMTREE_DB_PATH` | `~/.numtree/database/numtree.db` |
//! | `NUMTREE_SESSIONS` | none (`token=owner,token=owner`) |
//! | `NUMTREE_MAX_DEPTH` | `10000` |
//! | `CORS_ALLOW_ORIGIN` | local Vite ports |

use anyhow::{anyhow, bail, Context};
use numtree_core::services::SessionRegistry;
use numtree_core::EvaluationLimits;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3001;

/// Which `NodeStore` backend to run on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Turso,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "turso" | "libsql" => Ok(StoreKind::Turso),
            other => Err(anyhow!(
                "Unknown NUMTREE_STORE '{}', expected 'memory' or 'turso'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub store: StoreKind,
    /// Only read when `store` is `Turso`
    pub db_path: PathBuf,
    pub sessions: SessionRegistry,
    pub limits: EvaluationLimits,
    pub cors_allow_origin: Option<String>,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("NUMTREE_PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid NUMTREE_PORT '{}'", port))?,
            None => DEFAULT_PORT,
        };

        let store = match lookup("NUMTREE_STORE") {
            Some(store) => store.parse()?,
            None => StoreKind::Turso,
        };

        let db_path = match lookup("NUMTREE_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let sessions = match lookup("NUMTREE_SESSIONS") {
            Some(pairs) => SessionRegistry::from_pairs(&pairs)?,
            None => SessionRegistry::new(),
        };

        let limits = match lookup("NUMTREE_MAX_DEPTH") {
            Some(depth) => EvaluationLimits::with_max_depth(
                depth
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid NUMTREE_MAX_DEPTH '{}'", depth))?,
            ),
            None => EvaluationLimits::default(),
        };
        if let Err(e) = limits.validate() {
            bail!("Invalid evaluation limits: {}", e);
        }

        Ok(Self {
            port,
            store,
            db_path,
            sessions,
            limits,
            cors_allow_origin: lookup("CORS_ALLOW_ORIGIN"),
        })
    }
}

/// `~/.numtree/database/numtree.db`
fn default_db_path() -> anyhow::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Failed to get home directory"))?;
    Ok(home_dir.join(".numtree").join("database").join("numtree.db"))
}
