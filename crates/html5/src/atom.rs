//! Atom table for interned tag/attribute names.
//!
//! [`AtomTable`] is a plain interning table; [`Atom`] is a handle into the one
//! process-wide table. Two atoms are equal iff they denote the same interned
//! bytes, and comparing them compares a `u32`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::buf::{ByteSpan, SharedBuf};

/// Dense index into an [`AtomTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AtomError {
    #[error("atom table has no ids left")]
    OutOfIds,
}

/// Append-only interning table.
///
/// Invariant: `atoms[id]` and `map` agree; entries are never removed, so an
/// issued id stays valid for the table's lifetime.
#[derive(Debug, Default)]
pub struct AtomTable {
    atoms: Vec<SharedBuf>,
    map: HashMap<SharedBuf, AtomId>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> Result<AtomId, AtomError> {
        let idx: u32 = self
            .atoms
            .len()
            .try_into()
            .map_err(|_| AtomError::OutOfIds)?;
        Ok(AtomId(idx))
    }

    /// Return the id for `name`, inserting it on first sight. Bytes are stored
    /// exactly as given; case folding is the caller's policy.
    pub fn intern(&mut self, name: &[u8]) -> Result<AtomId, AtomError> {
        if let Some(id) = self.map.get(name) {
            return Ok(*id);
        }
        let id = self.next_id()?;
        let entry = SharedBuf::from(name);
        self.atoms.push(entry.clone());
        self.map.insert(entry, id);
        Ok(id)
    }

    pub fn get(&self, name: &[u8]) -> Option<AtomId> {
        self.map.get(name).copied()
    }

    pub fn resolve(&self, id: AtomId) -> Option<&[u8]> {
        self.atoms.get(id.0 as usize).map(ByteSpan::as_bytes)
    }

    /// Resolve to a handle on the stored bytes, without copying them.
    pub fn resolve_shared(&self, id: AtomId) -> Option<SharedBuf> {
        self.atoms.get(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

fn global_table() -> &'static Mutex<AtomTable> {
    static TABLE: OnceLock<Mutex<AtomTable>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(AtomTable::new()))
}

// The table is append-only, so a panic while holding the lock cannot leave it
// half-updated in a way readers could observe.
fn with_table<R>(f: impl FnOnce(&mut AtomTable) -> R) -> R {
    let mut table = global_table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut table)
}

/// Handle to a string interned in the process-wide table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    id: AtomId,
}

impl Atom {
    /// Intern `name`, returning the existing atom if it was seen before.
    ///
    /// # Panics
    /// Panics if the process has interned more than `u32::MAX` distinct names.
    pub fn intern(name: &[u8]) -> Atom {
        Self::try_intern(name).unwrap_or_else(|err| panic!("Atom::intern failed: {err}"))
    }

    pub fn try_intern(name: &[u8]) -> Result<Atom, AtomError> {
        with_table(|table| table.intern(name)).map(|id| Atom { id })
    }

    /// Look up `name` without inserting it.
    pub fn lookup(name: &[u8]) -> Option<Atom> {
        with_table(|table| table.get(name)).map(|id| Atom { id })
    }

    pub fn id(self) -> AtomId {
        self.id
    }

    /// The interned bytes as a shared buffer. Cheap: the stored allocation is
    /// shared, not copied, and the table lock is released before returning.
    pub fn as_shared(self) -> SharedBuf {
        with_table(|table| table.resolve_shared(self.id)).unwrap_or_default()
    }

    /// Run `f` over the interned bytes. The table lock is not held while `f`
    /// runs, so `f` may intern further atoms.
    pub fn with_bytes<R>(self, f: impl FnOnce(&[u8]) -> R) -> R {
        let bytes = self.as_shared();
        f(bytes.as_bytes())
    }

    pub fn to_string_lossy(self) -> String {
        self.with_bytes(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Compare against raw bytes (a byte comparison, unlike `==` on atoms).
    pub fn eq_bytes(self, other: &[u8]) -> bool {
        self.with_bytes(|bytes| bytes == other)
    }
}

impl From<&str> for Atom {
    fn from(name: &str) -> Self {
        Atom::intern(name.as_bytes())
    }
}

impl From<&[u8]> for Atom {
    fn from(name: &[u8]) -> Self {
        Atom::intern(name)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({}, {:?})", self.id.0, self.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buf::ByteSpan;

    #[test]
    fn table_reuses_ids_for_equal_bytes() {
        let mut table = AtomTable::new();
        let a = table.intern(b"div").unwrap();
        let b = table.intern(b"span").unwrap();
        let c = table.intern(b"div").unwrap();
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(b), Some(&b"span"[..]));
        assert_eq!(table.get(b"p"), None);
    }

    #[test]
    fn table_stores_bytes_verbatim() {
        let mut table = AtomTable::new();
        let lower = table.intern(b"div").unwrap();
        let upper = table.intern(b"DIV").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn global_atoms_compare_by_identity() {
        let a = Atom::intern(b"atom-test-section");
        let b = Atom::from("atom-test-section");
        let c = Atom::from("atom-test-article");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "atom-test-section");
        assert!(a.eq_bytes(b"atom-test-section"));
        assert_eq!(Atom::lookup(b"atom-test-section"), Some(a));
    }

    #[test]
    fn empty_string_interns_to_a_stable_atom() {
        let a = Atom::intern(b"");
        let b = Atom::intern(b"");
        assert_eq!(a, b);
        assert!(a.as_shared().is_empty());
    }

    #[test]
    fn as_shared_returns_the_interned_bytes() {
        let atom = Atom::from("atom-test-shared");
        let first = atom.as_shared();
        let second = atom.as_shared();
        assert_eq!(first.as_bytes(), b"atom-test-shared");
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn with_bytes_may_intern_reentrantly() {
        let outer = Atom::from("atom-test-outer");
        let inner = outer.with_bytes(|bytes| {
            let mut name = bytes.to_vec();
            name.extend_from_slice(b"-inner");
            Atom::intern(&name)
        });
        assert!(inner.eq_bytes(b"atom-test-outer-inner"));
    }

    #[test]
    fn interning_is_consistent_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Atom::intern(b"atom-test-threaded")))
            .collect();
        let atoms: Vec<Atom> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(atoms.windows(2).all(|w| w[0] == w[1]));
    }
}
