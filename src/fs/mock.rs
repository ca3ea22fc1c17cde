// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File {
        content: Vec<u8>,
        modified: SystemTime,
    },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Logical clock; every write advances it by one second.
    clock: u64,
}

impl MockState {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        UNIX_EPOCH + Duration::from_secs(self.clock)
    }
}

/// In-memory filesystem with a deterministic clock for modification times.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        // Ensure root exists
        entries.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(MockState { entries, clock: 0 })),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.lock();
        insert_file(&mut state, path.as_ref(), content.into());
    }

    /// Raw content of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock().entries.get(path.as_ref()) {
            Some(MockEntry::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }

    /// All file paths currently stored, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .lock()
            .entries
            .iter()
            .filter(|(_, e)| matches!(e, MockEntry::File { .. }))
            .map(|(p, _)| p.clone())
            .collect();
        files.sort();
        files
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panic while holding the lock only happens inside a failing test.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn insert_file(state: &mut MockState, path: &Path, content: Vec<u8>) {
    let modified = state.tick();
    state
        .entries
        .insert(path.to_path_buf(), MockEntry::File { content, modified });

    // Ensure parent directories exist implicitly for simplicity in this mock
    if let Some(parent) = parent_or_root(path) {
        ensure_dir_entry(&mut state.entries, parent);
        link_child(&mut state.entries, parent, path);
    }
}

fn parent_or_root(path: &Path) -> Option<&Path> {
    path.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        }
    })
}

fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
    if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
        if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    if let Some(parent) = parent_or_root(path) {
        if parent != path {
            // Avoid infinite loop at root
            ensure_dir_entry(entries, parent);
            link_child(entries, parent, path);
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.lock().entries.get(path) {
            Some(MockEntry::File { content, .. }) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        match self.lock().entries.get(path) {
            Some(MockEntry::File { content, .. }) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.lock().entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        if let Some(MockEntry::File { .. }) = state.entries.get(path) {
            return Err(anyhow!("Is a file: {:?}", path));
        }
        ensure_dir_entry(&mut state.entries, path);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        let mut state = self.lock();
        let content = match state.entries.get(from) {
            Some(MockEntry::File { content, .. }) => content.clone(),
            _ => return Err(anyhow!("File not found: {:?}", from)),
        };
        insert_file(&mut state, to, content);
        Ok(())
    }

    fn create_empty(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::File { .. }) => Ok(()),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => {
                insert_file(&mut state, path, Vec::new());
                Ok(())
            }
        }
    }

    fn set_modified_now(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        let now = state.tick();
        match state.entries.get_mut(path) {
            Some(MockEntry::File { modified, .. }) => {
                *modified = now;
                Ok(())
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.lock().entries.get(path) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_creates_parent_directories() {
        let fs = MockFileSystem::new();
        fs.add_file("build/resources/main/static/app.css", "body {}");

        assert!(fs.is_dir(Path::new("build/resources/main/static")));
        assert!(fs.is_dir(Path::new("build")));
        let children = fs.read_dir(Path::new("build/resources/main")).unwrap();
        assert_eq!(children, vec![PathBuf::from("build/resources/main/static")]);
    }

    #[test]
    fn clock_advances_on_every_write() {
        let fs = MockFileSystem::new();
        fs.add_file("a", "");
        let first = fs.modified(Path::new("a")).unwrap();
        fs.set_modified_now(Path::new("a")).unwrap();
        assert!(fs.modified(Path::new("a")).unwrap() > first);
    }
}
