//! Component E — tree mutator: the recursive insert/delete walk down the
//! root-to-leaf path, rebuilding each visited page via the node editor
//! (component B) and invoking split/merge (component D) on the way back
//! up. See `SPEC_FULL.md` §4.E.

use crate::page::{split_3, MergeDirection, NodeType, Page};
use crate::{PagePtr, PageStore, PAGE_SIZE};

/// Inserts `(key, val)` below `node`, returning the rebuilt subtree root.
/// The result may be oversized up to `2 * PAGE_SIZE` — the caller is
/// responsible for passing it through `split_3` before installing any of
/// its pieces.
pub(crate) fn tree_insert<S: PageStore>(node: &Page, key: &[u8], val: &[u8], store: &mut S) -> Page {
    let idx = node.lookup(key);
    match node.node_type() {
        NodeType::Leaf => {
            let mut new = Page::new(2 * PAGE_SIZE);
            if node.get_key(idx) == key {
                new.leaf_update(node, idx, key, val);
            } else {
                // `lookup` returned the predecessor slot; the sentinel
                // guarantees one always exists, so the new entry lands
                // immediately after it.
                new.leaf_insert(node, idx + 1, key, val);
            }
            new
        }
        NodeType::Internal => {
            let child_ptr = node.ptr_at(idx);
            let child = store.get(child_ptr);
            store.del(child_ptr);
            let new_child = tree_insert(&child, key, val, store);
            let pieces = split_3(new_child);
            log::trace!(
                "insert: split child at idx {} into {} piece(s)",
                idx,
                pieces.len()
            );
            node_replace_kid_n(node, idx, pieces, store, 2 * PAGE_SIZE)
        }
    }
}

/// Deletes `key` from below `node`. Returns `None` ("not found") if `key`
/// is absent anywhere in the subtree; otherwise returns the rebuilt
/// subtree root (always page-sized — unlike `tree_insert`, deletion never
/// grows a page).
pub(crate) fn tree_delete<S: PageStore>(node: &Page, key: &[u8], store: &mut S) -> Option<Page> {
    let idx = node.lookup(key);
    match node.node_type() {
        NodeType::Leaf => {
            if node.get_key(idx) != key {
                return None;
            }
            let mut new = Page::new(PAGE_SIZE);
            new.leaf_delete(node, idx);
            Some(new)
        }
        NodeType::Internal => {
            let child_ptr = node.ptr_at(idx);
            let child = store.get(child_ptr);
            let updated = tree_delete(&child, key, store)?;
            store.del(child_ptr);

            match should_merge_and_log(store, node, idx, &updated) {
                MergeDirection::Left(sibling) => {
                    let sibling_ptr = node.ptr_at(idx - 1);
                    let mut merged = Page::new(PAGE_SIZE);
                    merged.merge(&sibling, &updated);
                    store.del(sibling_ptr);
                    let first_key = merged.get_key_owned(0);
                    let merged_ptr = store.allocate(merged);
                    Some(node_replace_2_kid(node, idx - 1, merged_ptr, &first_key))
                }
                MergeDirection::Right(sibling) => {
                    let sibling_ptr = node.ptr_at(idx + 1);
                    let mut merged = Page::new(PAGE_SIZE);
                    merged.merge(&updated, &sibling);
                    store.del(sibling_ptr);
                    let first_key = merged.get_key_owned(0);
                    let merged_ptr = store.allocate(merged);
                    Some(node_replace_2_kid(node, idx, merged_ptr, &first_key))
                }
                MergeDirection::None => {
                    // Unlike the insert path, a deletion never grows the
                    // number of pieces past 1, so the rebuilt node is
                    // always exactly page-sized, not the 2x work-buffer
                    // `tree_insert` needs ahead of its own `split_3`.
                    let pieces = if updated.nkeys() > 0 { vec![updated] } else { vec![] };
                    Some(node_replace_kid_n(node, idx, pieces, store, PAGE_SIZE))
                }
            }
        }
    }
}

fn should_merge_and_log<S: PageStore>(
    store: &S,
    node: &Page,
    idx: u16,
    updated: &Page,
) -> MergeDirection {
    let dir = crate::page::should_merge(store, node, idx, updated);
    match &dir {
        MergeDirection::Left(_) => log::debug!("delete: merging child {} with left sibling", idx),
        MergeDirection::Right(_) => log::debug!("delete: merging child {} with right sibling", idx),
        MergeDirection::None => {}
    }
    dir
}

/// Copies `old`'s entries `[0, idx)`, appends one internal entry per
/// element of `pieces` (allocating each and keying on its first stored
/// key), then copies `[idx+1, end)`. `pieces` may be empty, in which case
/// the slot at `idx` is simply dropped. `capacity` is the destination work
/// buffer size: `2 * PAGE_SIZE` from `tree_insert`, where `pieces` may
/// hold up to 3 elements and the result is trimmed by the next `split_3`
/// up the call stack; `PAGE_SIZE` from `tree_delete`, where `pieces` never
/// grows the entry count and the result is installed as-is.
fn node_replace_kid_n<S: PageStore>(
    old: &Page,
    idx: u16,
    pieces: Vec<Page>,
    store: &mut S,
    capacity: usize,
) -> Page {
    let n_pieces = pieces.len() as i32;
    let new_n = old.nkeys() as i32 + n_pieces - 1;
    debug_assert!(new_n >= 0);
    let new_n = new_n as u16;

    let mut new = Page::new(capacity);
    new.set_header(NodeType::Internal, new_n);
    new.append_range(old, 0, 0, idx);
    for (i, piece) in pieces.into_iter().enumerate() {
        let key = piece.get_key_owned(0);
        let ptr = store.allocate(piece);
        new.append_kv(idx + i as u16, ptr, &key, b"");
    }
    let tail_start = idx + n_pieces as u16;
    new.append_range(old, tail_start, idx + 1, old.nkeys() - (idx + 1));
    new
}

/// Copies `old`'s entries `[0, idx)`, appends one entry for the merged
/// child, then copies `[idx+2, end)`: `nkeys(new) == nkeys(old) - 1`.
fn node_replace_2_kid(old: &Page, idx: u16, merged_ptr: PagePtr, merged_first_key: &[u8]) -> Page {
    let mut new = Page::new(PAGE_SIZE);
    new.set_header(NodeType::Internal, old.nkeys() - 1);
    new.append_range(old, 0, 0, idx);
    new.append_kv(idx, merged_ptr, merged_first_key, b"");
    new.append_range(old, idx + 1, idx + 2, old.nkeys() - (idx + 2));
    new
}
