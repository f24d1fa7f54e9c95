use crate::page::Page;

/// Opaque identifier for a page previously handed to [`PageStore::allocate`].
///
/// `0` is reserved for "null" / "empty tree" and is never returned by a
/// conforming [`PageStore::allocate`] implementation.
pub type PagePtr = u64;

/// The host-supplied collaborator that owns page allocation, lookup, and
/// reclamation.
///
/// This crate never mutates a page's bytes after it has been handed to
/// [`allocate`](PageStore::allocate) — every rewritten page is a fresh work
/// buffer. The store is free to implement `del` as an immediate free, a
/// deferred free-list entry, or an epoch-based reclaim; the core does not
/// observe the difference.
///
/// `get`/`allocate`/`del` do not return `Result`: per the allocation-failure
/// contract, a store that cannot satisfy a call is expected to signal this
/// through its own channel (typically by panicking) rather than by handing
/// an error back through the tree's recursive descent, which performs no
/// retries.
pub trait PageStore {
    /// Returns an immutable view of a previously allocated page. `ptr` must
    /// be non-zero and must have been returned by a prior `allocate` call
    /// that has not since been `del`'d.
    fn get(&self, ptr: PagePtr) -> Page;

    /// Installs a finalised page (`page.nbytes() <= PAGE_SIZE`) and returns
    /// a fresh, non-zero identifier for it.
    fn allocate(&mut self, page: Page) -> PagePtr;

    /// Signals that `ptr` is superseded by a newer page and may be
    /// reclaimed. Reclamation timing is entirely up to the store.
    fn del(&mut self, ptr: PagePtr);
}
