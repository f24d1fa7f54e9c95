//! Component D — split/merge: keep page sizes within `PAGE_SIZE` after a
//! mutation. `split_3` breaks an oversized page into 1–3 page-sized pages;
//! `should_merge` decides whether a just-rebuilt child should be folded
//! into a sibling after a deletion.

use super::Page;
use crate::{PageStore, PER_ENTRY_HEADER_OVERHEAD, POINTERS_OFFSET};

/// Direction `should_merge` chose, carrying the sibling page it found.
/// Left is preferred deterministically when both fit.
pub enum MergeDirection {
    Left(Page),
    Right(Page),
    None,
}

/// Splits a work page that may overflow `PAGE_SIZE` into a `left` prefix
/// and a `right` suffix, such that `right` always fits in one page. `left`
/// may still overflow; the caller (`split_3`) re-splits it if so.
fn split_2(old: &Page) -> (Page, Page) {
    debug_assert!(old.nkeys() >= 2, "cannot split a node with fewer than 2 entries");

    // Bytes a page holding the first `n_left` entries of `old` would take:
    // the shared 4-byte header, the per-entry pointer+offset overhead, and
    // the kv payload those entries occupy (read straight off `old`'s own
    // cumulative offsets, since copying doesn't change entry sizes).
    let left_bytes = |n_left: u16| -> usize {
        POINTERS_OFFSET + PER_ENTRY_HEADER_OVERHEAD * n_left as usize + old.offset(n_left) as usize
    };

    let mut n_left = old.nkeys() / 2;
    while n_left > 0 && left_bytes(n_left) > crate::PAGE_SIZE {
        n_left -= 1;
    }
    debug_assert!(n_left >= 1);

    let right_bytes =
        |n_left: u16| -> usize { old.nbytes() - left_bytes(n_left) + POINTERS_OFFSET };
    while n_left < old.nkeys() - 1 && right_bytes(n_left) > crate::PAGE_SIZE {
        n_left += 1;
    }
    debug_assert!(n_left < old.nkeys());
    let n_right = old.nkeys() - n_left;

    let mut left = Page::new(2 * crate::PAGE_SIZE);
    left.set_header(old.node_type(), n_left);
    left.append_range(old, 0, 0, n_left);

    let mut right = Page::new(crate::PAGE_SIZE);
    right.set_header(old.node_type(), n_right);
    right.append_range(old, 0, n_left, n_right);
    debug_assert!(right.nbytes() <= crate::PAGE_SIZE);

    (left, right)
}

/// Splits `old` into 1–3 page-sized pages. Three pages is the worst case:
/// a single key/value pair may occupy close to a full page, so a
/// `2 * PAGE_SIZE` work buffer can require two rounds of `split_2` before
/// every piece fits.
pub(crate) fn split_3(mut old: Page) -> Vec<Page> {
    if old.nbytes() <= crate::PAGE_SIZE {
        old.truncate_to_page_size();
        return vec![old];
    }

    let (mut left, right) = split_2(&old);
    if left.nbytes() <= crate::PAGE_SIZE {
        left.truncate_to_page_size();
        return vec![left, right];
    }

    let (leftleft, middle) = split_2(&left);
    debug_assert!(leftleft.nbytes() <= crate::PAGE_SIZE);
    vec![leftleft, middle, right]
}

/// Decides whether the just-rebuilt child `updated` (living at `idx` in
/// `parent`) should be merged with a sibling. Left sibling is tried first
/// and preferred when both fit — a deterministic, observable choice.
///
/// This is the eager variant: it merges whenever a sibling fits, not only
/// when `updated` has actually underflowed (see `SPEC_FULL.md` §9).
pub(crate) fn should_merge<S: PageStore>(
    store: &S,
    parent: &Page,
    idx: u16,
    updated: &Page,
) -> MergeDirection {
    if idx > 0 {
        let left_sibling = store.get(parent.ptr_at(idx - 1));
        let merged = left_sibling.nbytes() + updated.nbytes() - POINTERS_OFFSET;
        if merged <= crate::PAGE_SIZE {
            return MergeDirection::Left(left_sibling);
        }
    }
    if idx + 1 < parent.nkeys() {
        let right_sibling = store.get(parent.ptr_at(idx + 1));
        let merged = right_sibling.nbytes() + updated.nbytes() - POINTERS_OFFSET;
        if merged <= crate::PAGE_SIZE {
            return MergeDirection::Right(right_sibling);
        }
    }
    MergeDirection::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::MemStore;
    use crate::page::NodeType;

    fn leaf_with_n_entries(n: u16, val_len: usize) -> Page {
        let mut page = Page::new(2 * crate::PAGE_SIZE);
        page.set_header(NodeType::Leaf, n);
        let val = vec![0xABu8; val_len];
        for i in 0..n {
            let key = format!("k{:04}", i).into_bytes();
            page.append_kv(i, 0, &key, &val);
        }
        page
    }

    #[test]
    fn small_page_splits_into_one() {
        let page = leaf_with_n_entries(4, 8);
        let pieces = split_3(page);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].as_bytes().len(), crate::PAGE_SIZE);
    }

    #[test]
    fn oversized_page_splits_into_two_or_three() {
        // Entries large enough that ~2x PAGE_SIZE worth overflows a single page.
        let page = leaf_with_n_entries(40, 200);
        assert!(page.nbytes() > crate::PAGE_SIZE);
        let pieces = split_3(page);
        assert!(pieces.len() == 2 || pieces.len() == 3);
        for piece in &pieces {
            assert!(piece.nbytes() <= crate::PAGE_SIZE);
        }
        let total: u32 = pieces.iter().map(|p| p.nkeys() as u32).sum();
        assert_eq!(total, 40);
    }

    #[test]
    fn should_merge_prefers_left_sibling() {
        let mut store = MemStore::new();
        let left = leaf_with_n_entries(2, 8);
        let right = leaf_with_n_entries(2, 8);
        let left_ptr = store.allocate(left.clone());
        let right_ptr = store.allocate(right.clone());

        let mut parent = Page::new(crate::PAGE_SIZE);
        parent.set_header(NodeType::Internal, 2);
        parent.append_kv(0, left_ptr, b"", b"");
        parent.append_kv(1, right_ptr, b"k0002", b"");

        let updated = leaf_with_n_entries(1, 8);
        match should_merge(&store, &parent, 1, &updated) {
            MergeDirection::Left(sibling) => assert_eq!(sibling.nkeys(), 2),
            _ => panic!("expected left merge"),
        }
    }
}
