//! Integer key-value persistence for best times and waves.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Serialize(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "score file {}: {source}", path.display()),
            Self::Serialize(e) => write!(f, "failed to encode scores: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(e) => Some(e),
        }
    }
}

pub trait ScoreStore {
    /// `None` when the key is missing or its value is not a usable integer.
    fn get_integer(&self, key: &str) -> Option<i64>;
    fn set_integer(&mut self, key: &str, value: i64) -> Result<(), StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get_integer(&self, key: &str) -> Option<i64> {
        (**self).get_integer(key)
    }
    fn set_integer(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        (**self).set_integer(key, value)
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    fn get_integer(&self, key: &str) -> Option<i64> {
        (**self).get_integer(key)
    }
    fn set_integer(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        (**self).set_integer(key, value)
    }
}

// ── In-memory ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: i64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    /// Number of successful `set_integer` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn get_integer(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set_integer(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

// ── JSON file ─────────────────────────────────────────────────────────────────

/// A flat JSON object on disk, rewritten on every `set_integer`.
///
/// Values may be JSON numbers (whole floats included) or numeric strings. Anything else reads as
/// absent instead of failing.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, Value>>(&text) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), "ignoring malformed score file: {e}");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), "could not read score file: {e}");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.values).map_err(StoreError::Serialize)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScoreStore for JsonFileStore {
    fn get_integer(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn set_integer(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), Value::from(value));
        self.flush()
    }
}

/// `$HOME/.asteroid_dodger_scores.json`, or the working directory without `$HOME`.
pub fn default_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".asteroid_dodger_scores.json")
}
