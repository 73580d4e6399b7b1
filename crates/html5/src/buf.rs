//! Buffer views passed across the tokenizer/sink boundary.
//!
//! Two ownership conventions exist:
//! - [`BorrowedBuf`]: a read-only span valid only for the call that received it.
//!   The lifetime parameter keeps a receiver from retaining it; copy the bytes
//!   out (e.g. `SharedBuf::from(view)`) to keep them.
//! - [`SharedBuf`]: a reference-counted owning buffer. Receivers may clone and
//!   keep it indefinitely; clones share storage and mutation is copy-on-write.
//!
//! A zero-length view of either kind denotes "no data" (e.g. a missing doctype
//! identifier).

use std::borrow::{Borrow, Cow};
use std::ffi::CStr;
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

use memchr::memchr;

/// Common read access to a span of bytes.
pub trait ByteSpan {
    fn as_bytes(&self) -> &[u8];

    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Decode as UTF-8, replacing invalid sequences with U+FFFD.
    fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

/// Non-owning view over bytes owned by someone else.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BorrowedBuf<'a> {
    bytes: &'a [u8],
}

impl<'a> BorrowedBuf<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub const fn empty() -> Self {
        Self { bytes: &[] }
    }

    /// View the bytes of a C string, excluding the terminator.
    pub fn from_cstr(s: &'a CStr) -> Self {
        Self {
            bytes: s.to_bytes(),
        }
    }

    /// View a NUL-terminated byte string. The length is found by scanning for
    /// the first NUL; a slice without one is taken whole.
    pub fn from_nul_terminated(bytes: &'a [u8]) -> Self {
        let len = memchr(0, bytes).unwrap_or(bytes.len());
        Self {
            bytes: &bytes[..len],
        }
    }

    /// The underlying slice, with the view's lifetime.
    pub const fn bytes(self) -> &'a [u8] {
        self.bytes
    }

    pub fn as_str(self) -> Result<&'a str, std::str::Utf8Error> {
        std::str::from_utf8(self.bytes)
    }
}

impl ByteSpan for BorrowedBuf<'_> {
    fn as_bytes(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for BorrowedBuf<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for BorrowedBuf<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for BorrowedBuf<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a str> for BorrowedBuf<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<'a> From<&'a CStr> for BorrowedBuf<'a> {
    fn from(s: &'a CStr) -> Self {
        Self::from_cstr(s)
    }
}

impl fmt::Debug for BorrowedBuf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BorrowedBuf({:?})", self.to_str_lossy())
    }
}

/// Reference-counted byte buffer that may outlive the call that delivered it.
///
/// Invariant: `offset + len <= storage.len()`. The empty buffer carries no
/// storage and never allocates.
#[derive(Clone, Default)]
pub struct SharedBuf {
    storage: Option<Arc<Vec<u8>>>,
    offset: usize,
    len: usize,
}

impl SharedBuf {
    pub const fn new() -> Self {
        Self {
            storage: None,
            offset: 0,
            len: 0,
        }
    }

    fn from_storage(storage: Arc<Vec<u8>>) -> Self {
        let len = storage.len();
        if len == 0 {
            return Self::new();
        }
        Self {
            storage: Some(storage),
            offset: 0,
            len,
        }
    }

    /// A view over part of this buffer that shares its storage.
    ///
    /// # Panics
    /// Panics if the range is out of bounds, like slice indexing.
    pub fn subbuf(&self, range: impl RangeBounds<usize>) -> Self {
        let past = |n: usize| {
            n.checked_add(1)
                .unwrap_or_else(|| panic!("SharedBuf::subbuf bound {n} overflows usize"))
        };
        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => past(n),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&n) => past(n),
            Bound::Excluded(&n) => n,
            Bound::Unbounded => self.len,
        };
        assert!(
            start <= end && end <= self.len,
            "SharedBuf::subbuf range {start}..{end} out of bounds for length {}",
            self.len
        );
        if start == end {
            return Self::new();
        }
        Self {
            storage: self.storage.clone(),
            offset: self.offset + start,
            len: end - start,
        }
    }

    /// Append bytes. The sole handle on its storage grows it in place;
    /// storage shared with any clone is copied first, so other handles never
    /// observe the change.
    pub fn push_bytes(&mut self, more: &[u8]) {
        if more.is_empty() {
            return;
        }
        if let Some(storage) = self.storage.as_mut().and_then(Arc::get_mut) {
            storage.truncate(self.offset + self.len);
            storage.drain(..self.offset);
            storage.extend_from_slice(more);
            self.offset = 0;
            self.len = storage.len();
            return;
        }
        let mut joined = Vec::with_capacity(self.len + more.len());
        joined.extend_from_slice(self.as_bytes());
        joined.extend_from_slice(more);
        *self = Self::from(joined);
    }

    /// Whether both handles point into the same storage.
    pub fn ptr_eq(&self, other: &SharedBuf) -> bool {
        match (&self.storage, &other.storage) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of handles sharing this buffer's storage (0 for the empty buffer).
    pub fn share_count(&self) -> usize {
        self.storage.as_ref().map_or(0, Arc::strong_count)
    }

    /// Borrow as a call-scoped view.
    pub fn borrow(&self) -> BorrowedBuf<'_> {
        BorrowedBuf::new(self.as_bytes())
    }

    pub fn as_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }
}

impl ByteSpan for SharedBuf {
    fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Some(storage) => &storage[self.offset..self.offset + self.len],
            None => &[],
        }
    }
}

impl From<Vec<u8>> for SharedBuf {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_storage(Arc::new(bytes))
    }
}

impl From<String> for SharedBuf {
    fn from(text: String) -> Self {
        Self::from(text.into_bytes())
    }
}

impl From<&[u8]> for SharedBuf {
    fn from(bytes: &[u8]) -> Self {
        Self::from(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for SharedBuf {
    fn from(bytes: &[u8; N]) -> Self {
        Self::from(&bytes[..])
    }
}

impl From<&str> for SharedBuf {
    fn from(text: &str) -> Self {
        Self::from(text.as_bytes())
    }
}

impl From<BorrowedBuf<'_>> for SharedBuf {
    fn from(view: BorrowedBuf<'_>) -> Self {
        Self::from(view.bytes())
    }
}

impl PartialEq for SharedBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for SharedBuf {}

impl std::hash::Hash for SharedBuf {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

// Hash and Eq above go through the bytes, so lookups keyed by `[u8]` agree.
impl Borrow<[u8]> for SharedBuf {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for SharedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedBuf({:?})", self.to_str_lossy())
    }
}
