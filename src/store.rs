//! State store - namespaced key-value access with staged commits
//!
//! The core never touches a raw key: every read and write goes through a
//! `(Namespace, id)` pair mapped onto a single sortable composite key.
//! Exact lookup and full-namespace scan are distinct operations; there is
//! no partial-key middle ground.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Entity type tag, the first component of every composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Account,
    Commodity,
    Order,
}

impl Namespace {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Commodity => "commodity",
            Self::Order => "order",
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// Separator below every printable byte, so a namespace prefix can never
// collide with another tag and keys sort by (tag, id).
const SEP: char = '\u{1}';

/// Composite key for an exact entity.
pub fn composite_key(ns: Namespace, id: &str) -> String {
    format!("{}{SEP}{id}", ns.tag())
}

/// Prefix covering every key in a namespace.
pub fn namespace_prefix(ns: Namespace) -> String {
    format!("{}{SEP}", ns.tag())
}

/// Scan iterator yielding `(id, bytes)` pairs in key byte order.
/// Dropping it releases the underlying scan on every exit path.
pub type ScanIter<'a> = Box<dyn Iterator<Item = (String, Vec<u8>)> + 'a>;

/// Byte-oriented world-state interface supplied by the ledger platform.
pub trait StateStore {
    /// Exact lookup.
    fn get(&self, ns: Namespace, id: &str) -> Result<Option<Vec<u8>>>;

    /// Write one record.
    fn put(&mut self, ns: Namespace, id: &str, value: Vec<u8>) -> Result<()>;

    /// Full namespace scan in key byte order.
    fn scan_all(&self, ns: Namespace) -> Result<ScanIter<'_>>;
}

/// In-memory world state backed by a B-tree, so scans come back in key
/// byte order exactly like the platform store.
#[derive(Debug, Default)]
pub struct MemLedger {
    state: BTreeMap<String, Vec<u8>>,
}

impl MemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl StateStore for MemLedger {
    fn get(&self, ns: Namespace, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(&composite_key(ns, id)).cloned())
    }

    fn put(&mut self, ns: Namespace, id: &str, value: Vec<u8>) -> Result<()> {
        self.state.insert(composite_key(ns, id), value);
        Ok(())
    }

    fn scan_all(&self, ns: Namespace) -> Result<ScanIter<'_>> {
        let prefix = namespace_prefix(ns);
        let end = format!("{}{}", ns.tag(), '\u{2}');
        let iter = self
            .state
            .range(prefix.clone()..end)
            .map(move |(k, v)| (k[prefix.len()..].to_string(), v.clone()));
        Ok(Box::new(iter))
    }
}

/// Write-staging overlay: buffers every put on top of a backing store and
/// flushes them only on `commit`. Dropping the overlay without committing
/// discards the staged writes, which is what gives each invocation its
/// all-or-nothing semantics.
pub struct StagedStore<'a> {
    base: &'a mut dyn StateStore,
    staged: BTreeMap<String, Vec<u8>>,
}

impl<'a> StagedStore<'a> {
    pub fn new(base: &'a mut dyn StateStore) -> Self {
        Self {
            base,
            staged: BTreeMap::new(),
        }
    }

    /// Flush the accumulated write set into the backing store.
    pub fn commit(self) -> Result<()> {
        for (key, value) in self.staged {
            let (ns, id) = split_key(&key)?;
            self.base.put(ns, &id, value)?;
        }
        Ok(())
    }
}

fn split_key(key: &str) -> Result<(Namespace, String)> {
    let (tag, id) = key
        .split_once(SEP)
        .ok_or_else(|| Error::Persistence(format!("malformed key {key:?}")))?;
    let ns = match tag {
        "account" => Namespace::Account,
        "commodity" => Namespace::Commodity,
        "order" => Namespace::Order,
        other => return Err(Error::Persistence(format!("unknown namespace {other:?}"))),
    };
    Ok((ns, id.to_string()))
}

impl StateStore for StagedStore<'_> {
    fn get(&self, ns: Namespace, id: &str) -> Result<Option<Vec<u8>>> {
        if let Some(v) = self.staged.get(&composite_key(ns, id)) {
            return Ok(Some(v.clone()));
        }
        self.base.get(ns, id)
    }

    fn put(&mut self, ns: Namespace, id: &str, value: Vec<u8>) -> Result<()> {
        self.staged.insert(composite_key(ns, id), value);
        Ok(())
    }

    fn scan_all(&self, ns: Namespace) -> Result<ScanIter<'_>> {
        // Merge the base scan with staged writes; staged values shadow
        // the base record under the same key.
        let mut merged: BTreeMap<String, Vec<u8>> = self.base.scan_all(ns)?.collect();
        let prefix = namespace_prefix(ns);
        for (key, value) in self.staged.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            merged.insert(key[prefix.len()..].to_string(), value.clone());
        }
        Ok(Box::new(merged.into_iter()))
    }
}
