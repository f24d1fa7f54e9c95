//! Component C — node search: `lookup` returns the largest slot whose key
//! is `<= key`. In an `Internal` node that slot is the child to descend
//! into; in a `Leaf` it is the exact match (if present) or the predecessor.

use super::Page;

impl Page {
    /// Largest index `i` such that `get_key(i) <= key`, using unsigned
    /// lexicographic byte comparison (Rust's default `[u8]` ordering
    /// already breaks ties shorter-before-longer).
    ///
    /// Every tree carries the empty-key sentinel as the first entry of the
    /// root's leftmost path, so a `key` smaller than everything stored
    /// cannot occur for a properly constructed tree — this is asserted in
    /// debug builds rather than handled.
    pub fn lookup(&self, key: &[u8]) -> u16 {
        let n = self.nkeys();
        debug_assert!(n > 0, "lookup on an empty node");
        let mut lo: u16 = 0;
        let mut hi: u16 = n;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.get_key(mid) <= key {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        debug_assert!(lo > 0, "key smaller than every stored key; sentinel invariant violated");
        lo - 1
    }
}
