// Durable key-value stores backing the session record.
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use std::{
    collections::BTreeMap,
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::{
        Arc,
        Mutex,
    },
};

/// String-to-string store in the spirit of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Write several keys at once. Stores that can do this atomically should.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Flat JSON object on disk, rewritten in full on every change. Writes go to a
/// sibling `.tmp` file that is then renamed over the store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read(&self.path).wrap_err_with(|| {
            format!("Failed to read session store at {}", self.path.display())
        })?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&data).wrap_err_with(|| {
            format!(
                "Session store at {} is not a JSON object of strings",
                self.path.display()
            )
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).wrap_err_with(|| {
                    format!("Failed to create directory {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_vec_pretty(entries)
            .wrap_err("Failed to serialize session store")?;
        // a crash mid-write must never leave a half-written store behind
        let staging = self.staging_path();
        fs::write(&staging, json).wrap_err_with(|| {
            format!("Failed to write session store at {}", staging.display())
        })?;
        fs::rename(&staging, &self.path).wrap_err_with(|| {
            format!("Failed to replace session store at {}", self.path.display())
        })
    }

    /// Sibling file a new version is written to before it replaces the store.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value.to_string())])
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        let mut current = self.read_entries()?;
        for (key, value) in entries {
            current.insert((*key).to_string(), value.clone());
        }
        self.write_entries(&current)
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the same entries, for inspecting what was written.
    pub fn entries(&self) -> Arc<Mutex<BTreeMap<String, String>>> {
        self.entries.clone()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| eyre!("in-memory store lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| eyre!("in-memory store lock poisoned"))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
