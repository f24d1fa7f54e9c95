//! Component F — root coordinator: the host-facing `insert`/`delete`/`get`
//! entry points, root allocation, and the root-level growth/collapse that
//! keeps every leaf at the same depth. See `SPEC_FULL.md` §4.F.

use crate::mutator::{tree_delete, tree_insert};
use crate::page::{split_3, NodeType, Page};
use crate::{PagePtr, PageStore, MAX_KEY_SIZE, MAX_VAL_SIZE, PAGE_SIZE};

/// A copy-on-write B+-tree. The only state `Tree` owns is its current
/// `root` pointer; the page bytes themselves live in whatever
/// [`PageStore`] the caller supplies to each call. Cloning a `Tree` (by
/// copying its `root`) is how a reader captures an immutable snapshot —
/// subsequent mutations against a *different* `Tree` value never touch
/// pages the snapshot can still reach, because every mutation rewrites
/// rather than overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tree {
    root: PagePtr,
}

impl Tree {
    /// A tree with no pages allocated yet. `root() == 0` until the first
    /// `insert`.
    pub fn new() -> Tree {
        Tree { root: 0 }
    }

    /// Wraps an existing root pointer — e.g. one persisted by the host
    /// alongside its page store. `0` denotes an empty tree.
    pub fn from_root(root: PagePtr) -> Tree {
        Tree { root }
    }

    /// The tree's current root pointer. `0` iff the tree has never had a
    /// key inserted (or every key has since been deleted).
    pub fn root(&self) -> PagePtr {
        self.root
    }

    fn check_key(key: &[u8]) {
        assert!(!key.is_empty(), "key must not be empty");
        assert!(
            key.len() <= MAX_KEY_SIZE,
            "key of {} bytes exceeds MAX_KEY_SIZE ({})",
            key.len(),
            MAX_KEY_SIZE
        );
    }

    fn check_val(val: &[u8]) {
        assert!(
            val.len() <= MAX_VAL_SIZE,
            "value of {} bytes exceeds MAX_VAL_SIZE ({})",
            val.len(),
            MAX_VAL_SIZE
        );
    }

    /// Inserts `(key, val)`, overwriting any existing value for `key`.
    ///
    /// `key` must be non-empty and at most `MAX_KEY_SIZE` bytes; `val`
    /// must be at most `MAX_VAL_SIZE` bytes. Violating either is a
    /// programming error and asserts.
    pub fn insert<S: PageStore>(&mut self, store: &mut S, key: &[u8], val: &[u8]) {
        Self::check_key(key);
        Self::check_val(val);

        if self.root == 0 {
            let mut leaf = Page::new(PAGE_SIZE);
            leaf.set_header(NodeType::Leaf, 2);
            leaf.append_kv(0, 0, b"", b"");
            leaf.append_kv(1, 0, key, val);
            self.root = store.allocate(leaf);
            return;
        }

        let root_page = store.get(self.root);
        store.del(self.root);
        let new_root = tree_insert(&root_page, key, val, store);
        let pieces = split_3(new_root);

        if pieces.len() == 1 {
            let mut only = pieces.into_iter().next().unwrap();
            only.truncate_to_page_size();
            self.root = store.allocate(only);
            return;
        }

        log::debug!("insert: root split into {} pieces, depth +1", pieces.len());
        let mut internal = Page::new(PAGE_SIZE);
        internal.set_header(NodeType::Internal, pieces.len() as u16);
        for (i, piece) in pieces.into_iter().enumerate() {
            let first_key = piece.get_key_owned(0);
            let ptr = store.allocate(piece);
            internal.append_kv(i as u16, ptr, &first_key, b"");
        }
        self.root = store.allocate(internal);
    }

    /// Deletes `key`, returning `true` iff it was present. Deleting an
    /// absent key (including from an empty tree) returns `false` and
    /// leaves the tree unchanged.
    pub fn delete<S: PageStore>(&mut self, store: &mut S, key: &[u8]) -> bool {
        Self::check_key(key);

        if self.root == 0 {
            return false;
        }

        let root_page = store.get(self.root);
        let updated = match tree_delete(&root_page, key, store) {
            Some(page) => page,
            None => return false,
        };
        store.del(self.root);

        if updated.node_type() == NodeType::Internal && updated.nkeys() == 1 {
            log::debug!("delete: root collapse, depth -1");
            let only_child = updated.ptr_at(0);
            self.root = only_child;
        } else if updated.node_type() == NodeType::Internal && updated.nkeys() == 0 {
            // The whole tree emptied out (can only happen transiently at
            // the root, since every other level keeps its leading
            // sentinel entry alive).
            self.root = 0;
        } else {
            self.root = store.allocate(updated);
        }
        true
    }

    /// Looks up `key`, returning an owned copy of its value if present.
    /// The copy is necessary because the leaf the value lives in may be
    /// `del`'d by a subsequent mutation as soon as this call returns.
    pub fn get<S: PageStore>(&self, store: &S, key: &[u8]) -> Option<Vec<u8>> {
        Self::check_key(key);

        if self.root == 0 {
            return None;
        }
        let mut ptr = self.root;
        loop {
            let page = store.get(ptr);
            let idx = page.lookup(key);
            match page.node_type() {
                NodeType::Leaf => {
                    if page.get_key(idx) == key {
                        return Some(page.get_val_owned(idx));
                    }
                    return None;
                }
                NodeType::Internal => {
                    ptr = page.ptr_at(idx);
                }
            }
        }
    }
}

impl Default for Tree {
    fn default() -> Tree {
        Tree::new()
    }
}
