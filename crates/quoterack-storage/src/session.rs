use std::collections::HashMap;

/// Ephemeral per-session storage
///
/// Holds state that should only live as long as the process, like the index
/// of the last displayed quote. Nothing here ever touches disk.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
