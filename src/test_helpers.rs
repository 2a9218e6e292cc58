use crate::{
    deal::DealVariant,
    rng::{
        Draw,
        SeededSequence,
    },
    session::{
        KeyValueSessionRepository,
        Session,
    },
    storage::{
        InMemoryStore,
        JsonFileStore,
    },
};
use std::path::Path;

/// Hands out a fixed list of draws, then panics if asked for more.
#[derive(Clone, Debug)]
pub struct ScriptedDraw {
    values: Vec<f64>,
    next: usize,
}

impl ScriptedDraw {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }

    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl Draw for ScriptedDraw {
    fn draw(&mut self) -> f64 {
        let value = *self
            .values
            .get(self.next)
            .unwrap_or_else(|| panic!("script ran out after {} draws", self.next));
        self.next += 1;
        value
    }
}

/// Wraps a real sequence and keeps every value it produced.
#[derive(Clone, Debug)]
pub struct RecordingDraw {
    inner: SeededSequence,
    pub seen: Vec<f64>,
}

impl RecordingDraw {
    pub fn new(inner: SeededSequence) -> Self {
        Self {
            inner,
            seen: Vec::new(),
        }
    }
}

impl Draw for RecordingDraw {
    fn draw(&mut self) -> f64 {
        let value = self.inner.draw();
        self.seen.push(value);
        value
    }
}

pub type MemorySession = Session<KeyValueSessionRepository<InMemoryStore>>;
pub type FileSession = Session<KeyValueSessionRepository<JsonFileStore>>;

/// A session over a shared in-memory store; clones of `store` see every write.
pub struct TestContext {
    pub store: InMemoryStore,
    pub variant: DealVariant,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_variant(DealVariant::Hourglass)
    }

    pub fn with_variant(variant: DealVariant) -> Self {
        Self {
            store: InMemoryStore::new(),
            variant,
        }
    }

    /// A fresh session over the same store, as after a page reload.
    pub fn session(&self) -> MemorySession {
        Session::new(
            KeyValueSessionRepository::new(self.store.clone()),
            self.variant,
        )
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.store
            .entries()
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn file_session(path: &Path, variant: DealVariant) -> FileSession {
    Session::new(
        KeyValueSessionRepository::new(JsonFileStore::new(path)),
        variant,
    )
}
