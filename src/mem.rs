//! Component I (ambient) — an in-memory reference [`PageStore`] backing a
//! `HashMap<PagePtr, Vec<u8>>`. This is the store used by the crate's own
//! tests and benches, and by [`crate::collect_reachable_ptrs`]-style
//! leak-checking assertions; it is shipped as part of the crate so
//! downstream integration tests and doc examples have something to plug
//! into [`Tree`](crate::Tree) without writing their own store first.
//!
//! It is not a production store: pages are never actually reclaimed, only
//! marked absent, and nothing is persisted across process restarts.

use crate::error::PageStoreError;
use crate::page::Page;
use crate::store::{PagePtr, PageStore};
use std::collections::HashMap;

/// Reference `PageStore`: pages live in a `HashMap` keyed by a
/// monotonically increasing counter. `allocate` never reuses a retired
/// `PagePtr`, which makes the allocation order (and therefore merge/split
/// sibling choices) fully deterministic and easy to assert on in tests.
pub struct MemStore {
    pages: HashMap<PagePtr, Vec<u8>>,
    next_ptr: PagePtr,
    /// Running total of `allocate` calls, for leak-checking tests
    /// (property 7: "no leaks" — compare against `del_count`).
    alloc_count: u64,
    /// Running total of `del` calls.
    del_count: u64,
}

impl MemStore {
    pub fn new() -> MemStore {
        MemStore {
            pages: HashMap::new(),
            next_ptr: 1,
            alloc_count: 0,
            del_count: 0,
        }
    }

    /// Number of `PagePtr`s currently live (allocated, not yet `del`'d).
    /// Used by leak tests: this should return to its pre-mutation value
    /// once a balanced sequence of inserts is fully undone by deletes.
    pub fn live_count(&self) -> usize {
        self.pages.len()
    }

    /// Total `allocate` calls minus total `del` calls, tracked
    /// independently of `self.pages.len()` so a test can also catch a
    /// double-`del` (which `HashMap::remove` would otherwise swallow
    /// silently).
    pub fn outstanding(&self) -> i64 {
        self.alloc_count as i64 - self.del_count as i64
    }

    /// The full set of `PagePtr`s currently live. Useful alongside
    /// [`crate::collect_reachable_ptrs`] to assert every live ptr is also
    /// reachable from the root (and vice versa).
    pub fn live_ptrs(&self) -> std::collections::HashSet<PagePtr> {
        self.pages.keys().copied().collect()
    }
}

impl Default for MemStore {
    fn default() -> MemStore {
        MemStore::new()
    }
}

impl PageStore for MemStore {
    fn get(&self, ptr: PagePtr) -> Page {
        match self.pages.get(&ptr) {
            Some(bytes) => Page::from_bytes(bytes.clone()),
            None => panic!("{}", PageStoreError::UnknownPtr(ptr)),
        }
    }

    fn allocate(&mut self, page: Page) -> PagePtr {
        let nbytes = page.nbytes();
        if nbytes > crate::PAGE_SIZE {
            panic!(
                "{}",
                PageStoreError::Capacity {
                    nbytes,
                    page_size: crate::PAGE_SIZE,
                }
            );
        }
        let ptr = self.next_ptr;
        self.next_ptr += 1;
        self.pages.insert(ptr, page.as_bytes().to_vec());
        self.alloc_count += 1;
        log::trace!("allocate: ptr={} nbytes={}", ptr, nbytes);
        ptr
    }

    fn del(&mut self, ptr: PagePtr) {
        if self.pages.remove(&ptr).is_none() {
            panic!("{}", PageStoreError::UnknownPtr(ptr));
        }
        self.del_count += 1;
        log::trace!("del: ptr={}", ptr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::NodeType;

    fn leaf(key: &[u8], val: &[u8]) -> Page {
        let mut page = Page::new(crate::PAGE_SIZE);
        page.set_header(NodeType::Leaf, 1);
        page.append_kv(0, 0, key, val);
        page
    }

    #[test]
    fn allocate_then_get_roundtrips_bytes() {
        let mut store = MemStore::new();
        let page = leaf(b"a", b"1");
        let ptr = store.allocate(page.clone());
        assert_eq!(store.get(ptr).as_bytes(), page.as_bytes());
    }

    #[test]
    fn ptrs_are_monotonic_and_never_zero() {
        let mut store = MemStore::new();
        let a = store.allocate(leaf(b"a", b"1"));
        let b = store.allocate(leaf(b"b", b"2"));
        assert_ne!(a, 0);
        assert_ne!(b, 0);
        assert!(b > a);
    }

    #[test]
    fn del_then_realloc_keeps_outstanding_balanced() {
        let mut store = MemStore::new();
        let ptr = store.allocate(leaf(b"a", b"1"));
        assert_eq!(store.outstanding(), 1);
        store.del(ptr);
        assert_eq!(store.outstanding(), 0);
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    #[should_panic]
    fn get_on_unknown_ptr_panics() {
        let store = MemStore::new();
        store.get(12345);
    }

    #[test]
    #[should_panic]
    fn double_del_panics() {
        let mut store = MemStore::new();
        let ptr = store.allocate(leaf(b"a", b"1"));
        store.del(ptr);
        store.del(ptr);
    }
}
