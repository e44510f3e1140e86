//! Materialization backends.
//!
//! A backend is where the rendered tree lands: an in-memory directory map
//! for tests and inspection, or a real directory on disk. `mkdir` hands
//! back a backend rebased at the new directory, so the materialization
//! walk never has to track absolute paths itself.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use indexmap::IndexMap;

use packforge_codec::JsonPolicy;
use packforge_model::{Path, Value};

use crate::TreeError;

/// Whether a leaf payload is text or raw bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileMode {
    Text,
    Binary,
}

/// A materialization target.
pub trait Backend {
    /// The JSON layout used for JSON leaves landing in this backend.
    fn json_policy(&self) -> JsonPolicy;

    /// Ensure the directory at `rel` exists and return a backend rebased
    /// there. The empty path rebases at the current directory.
    fn mkdir(&mut self, rel: &Path) -> Result<Box<dyn Backend>, TreeError>;

    /// Open the file at `rel` for writing, truncating any previous
    /// content. Missing parent directories are created.
    fn open(&mut self, rel: &Path, mode: FileMode) -> Result<Box<dyn Write>, TreeError>;
}

type DirMap = Rc<RefCell<IndexMap<String, MemEntry>>>;

#[derive(Clone, Debug)]
enum MemEntry {
    Dir(DirMap),
    Text(String),
    Binary(Vec<u8>),
}

/// An in-memory backend holding the rendered tree as nested maps.
///
/// Cloning shares the underlying storage, so a clone kept before
/// materialization sees the result afterwards. [`snapshot`] turns the
/// whole thing into a [`Value`] for direct comparison in tests.
///
/// [`snapshot`]: MemoryBackend::snapshot
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    root: DirMap,
    policy: JsonPolicy,
}

impl MemoryBackend {
    /// An empty backend with compact JSON output.
    pub fn new() -> Self {
        MemoryBackend {
            root: Rc::new(RefCell::new(IndexMap::new())),
            policy: JsonPolicy::compact(),
        }
    }

    /// Same storage, different JSON layout.
    pub fn with_policy(mut self, policy: JsonPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The stored content as a value graph: directories become maps, text
    /// files strings, binary files byte blobs.
    pub fn snapshot(&self) -> Value {
        snapshot_dir(&self.root)
    }

    fn ensure_dir(&self, rel: &Path) -> Result<DirMap, TreeError> {
        let mut current = Rc::clone(&self.root);
        for segment in rel.iter() {
            let next = {
                let mut dir = current.borrow_mut();
                match dir
                    .entry(segment.to_string())
                    .or_insert_with(|| MemEntry::Dir(Rc::new(RefCell::new(IndexMap::new()))))
                {
                    MemEntry::Dir(sub) => Rc::clone(sub),
                    _ => {
                        return Err(TreeError::io(
                            rel,
                            io::Error::new(
                                io::ErrorKind::AlreadyExists,
                                format!("'{}' is a file, not a directory", segment),
                            ),
                        ));
                    }
                }
            };
            current = next;
        }
        Ok(current)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        MemoryBackend::new()
    }
}

impl Backend for MemoryBackend {
    fn json_policy(&self) -> JsonPolicy {
        self.policy
    }

    fn mkdir(&mut self, rel: &Path) -> Result<Box<dyn Backend>, TreeError> {
        let dir = self.ensure_dir(rel)?;
        Ok(Box::new(MemoryBackend {
            root: dir,
            policy: self.policy,
        }))
    }

    fn open(&mut self, rel: &Path, mode: FileMode) -> Result<Box<dyn Write>, TreeError> {
        let (parents, name) = rel.split_last().ok_or(TreeError::EmptyPath)?;
        let dir = self.ensure_dir(&parents)?;
        if let Some(MemEntry::Dir(_)) = dir.borrow().get(name) {
            return Err(TreeError::io(
                rel,
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("'{}' is a directory", name),
                ),
            ));
        }
        Ok(Box::new(MemWriter {
            buf: Vec::new(),
            dir,
            name: name.to_string(),
            mode,
        }))
    }
}

/// Buffers writes and commits the entry when dropped, mirroring how a real
/// file becomes visible on close.
struct MemWriter {
    buf: Vec<u8>,
    dir: DirMap,
    name: String,
    mode: FileMode,
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemWriter {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        let entry = match self.mode {
            FileMode::Text => MemEntry::Text(String::from_utf8_lossy(&buf).into_owned()),
            FileMode::Binary => MemEntry::Binary(buf),
        };
        self.dir
            .borrow_mut()
            .insert(std::mem::take(&mut self.name), entry);
    }
}

fn snapshot_dir(dir: &DirMap) -> Value {
    let mut map = IndexMap::new();
    for (name, entry) in dir.borrow().iter() {
        let value = match entry {
            MemEntry::Dir(sub) => snapshot_dir(sub),
            MemEntry::Text(text) => Value::from(text.as_str()),
            MemEntry::Binary(data) => Value::bytes(data.clone()),
        };
        map.insert(name.clone(), value);
    }
    Value::Map(map)
}

/// A backend writing into a directory on disk.
///
/// JSON leaves land indented with four spaces by default; files a human
/// opens in an editor should not be one long line.
#[derive(Clone, Debug)]
pub struct OsBackend {
    root: PathBuf,
    policy: JsonPolicy,
}

impl OsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OsBackend {
            root: root.into(),
            policy: JsonPolicy::indented(4),
        }
    }

    pub fn with_policy(mut self, policy: JsonPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn resolve(&self, rel: &Path) -> PathBuf {
        let mut full = self.root.clone();
        for segment in rel.iter() {
            full.push(segment);
        }
        full
    }
}

impl Backend for OsBackend {
    fn json_policy(&self) -> JsonPolicy {
        self.policy
    }

    fn mkdir(&mut self, rel: &Path) -> Result<Box<dyn Backend>, TreeError> {
        let full = self.resolve(rel);
        log::debug!("mkdir {}", full.display());
        fs::create_dir_all(&full).map_err(|e| TreeError::io(rel, e))?;
        Ok(Box::new(OsBackend {
            root: full,
            policy: self.policy,
        }))
    }

    fn open(&mut self, rel: &Path, _mode: FileMode) -> Result<Box<dyn Write>, TreeError> {
        let full = self.resolve(rel);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| TreeError::io(rel, e))?;
        }
        log::debug!("write {}", full.display());
        let file = fs::File::create(&full).map_err(|e| TreeError::io(rel, e))?;
        Ok(Box::new(io::BufWriter::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tree;
    use packforge_model::Model;

    #[test]
    fn memory_snapshot_matches_expected_layout() {
        let tree = Tree::new();
        let doc = Model::new();
        doc.set("a", 1i64).unwrap();
        tree.add_json("x/y.json", doc).unwrap();

        let mut backend = MemoryBackend::new();
        tree.materialize(&mut backend).unwrap();

        let expected = Model::new();
        expected.set("x/y.json", "{\"a\": 1}").unwrap();
        assert_eq!(backend.snapshot(), expected.dump());
    }

    #[test]
    fn open_creates_missing_parents() {
        let mut backend = MemoryBackend::new();
        {
            let mut file = backend
                .open(&Path::parse("deep/nested/file.txt"), FileMode::Text)
                .unwrap();
            file.write_all(b"hi").unwrap();
        }

        let expected = Model::new();
        expected.set("deep/nested/file.txt", "hi").unwrap();
        assert_eq!(backend.snapshot(), expected.dump());
    }

    #[test]
    fn reopening_truncates() {
        let mut backend = MemoryBackend::new();
        for content in ["first", "second"] {
            let mut file = backend.open(&Path::parse("f.txt"), FileMode::Text).unwrap();
            file.write_all(content.as_bytes()).unwrap();
        }

        let expected = Model::new();
        expected.set("f.txt", "second").unwrap();
        assert_eq!(backend.snapshot(), expected.dump());
    }

    #[test]
    fn binary_entries_snapshot_as_bytes() {
        let tree = Tree::new();
        tree.add_bytes("pack.png", vec![0x89, 0x50]).unwrap();
        let mut backend = MemoryBackend::new();
        tree.materialize(&mut backend).unwrap();

        if let Value::Map(map) = backend.snapshot() {
            assert_eq!(map.get("pack.png"), Some(&Value::bytes(vec![0x89, 0x50])));
        } else {
            panic!("expected map snapshot");
        }
    }

    #[test]
    fn file_over_directory_rejected() {
        let mut backend = MemoryBackend::new();
        backend.mkdir(&Path::parse("data")).unwrap();
        assert!(matches!(
            backend.open(&Path::parse("data"), FileMode::Text),
            Err(TreeError::Io { .. })
        ));
    }

    #[test]
    fn os_backend_writes_through_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let tree = Tree::new();
        let doc = Model::new();
        doc.set("pack/pack_format", 26i64).unwrap();
        tree.add_json("meta/pack.json", doc).unwrap();
        tree.text("data/ns/functions/hello.mcfunction")
            .unwrap()
            .push_line("say hello");

        let mut backend = OsBackend::new(dir.path());
        tree.materialize(&mut backend).unwrap();

        let json = std::fs::read_to_string(dir.path().join("meta/pack.json")).unwrap();
        assert_eq!(json, "{\n    \"pack\": {\n        \"pack_format\": 26\n    }\n}");

        let body =
            std::fs::read_to_string(dir.path().join("data/ns/functions/hello.mcfunction"))
                .unwrap();
        assert_eq!(body, "say hello\n");
    }
}
