//! Component B — node editor: structural primitives that write into a
//! destination work buffer (`self`, conventionally named `new` at the call
//! site) copying from a source page (`old`). Every primitive here leaves
//! `self` fully self-consistent before returning — callers never see a
//! half-written page.

use super::{NodeType, Page};
use crate::PagePtr;
use byteorder::{ByteOrder, LittleEndian};

impl Page {
    /// Writes one entry at `slot`. Callers must fill slots in increasing
    /// order — `append_kv` computes the new entry's start offset from the
    /// previous slot's recorded end offset, so a non-monotonic call order
    /// corrupts the offset table.
    pub fn append_kv(&mut self, slot: u16, ptr: PagePtr, key: &[u8], val: &[u8]) {
        self.set_ptr(slot, ptr);
        let pos = self.kv_pos(slot);
        let klen = key.len() as u16;
        let vlen = val.len() as u16;
        LittleEndian::write_u16(&mut self.buf[pos..pos + 2], klen);
        LittleEndian::write_u16(&mut self.buf[pos + 2..pos + 4], vlen);
        let kstart = pos + 4;
        self.buf[kstart..kstart + key.len()].copy_from_slice(key);
        let vstart = kstart + key.len();
        self.buf[vstart..vstart + val.len()].copy_from_slice(val);
        let end = self.offset(slot) + 4 + klen + vlen;
        self.set_offset(slot + 1, end);
    }

    /// Copies `count` consecutive entries from `old` starting at
    /// `src_start` into `self` starting at `dst_start`, maintaining the
    /// offset table as it goes.
    pub fn append_range(&mut self, old: &Page, dst_start: u16, src_start: u16, count: u16) {
        for i in 0..count {
            let s = src_start + i;
            let d = dst_start + i;
            self.append_kv(d, old.ptr_at(s), old.get_key(s), old.get_val(s));
        }
    }

    /// Builds `self` as `old` with `(key, val)` inserted at `idx`:
    /// `nkeys(self) == nkeys(old) + 1`.
    pub fn leaf_insert(&mut self, old: &Page, idx: u16, key: &[u8], val: &[u8]) {
        self.set_header(NodeType::Leaf, old.nkeys() + 1);
        self.append_range(old, 0, 0, idx);
        self.append_kv(idx, 0, key, val);
        self.append_range(old, idx + 1, idx, old.nkeys() - idx);
    }

    /// Builds `self` as `old` with the entry at `idx` replaced by
    /// `(key, val)`: `nkeys(self) == nkeys(old)`.
    pub fn leaf_update(&mut self, old: &Page, idx: u16, key: &[u8], val: &[u8]) {
        self.set_header(NodeType::Leaf, old.nkeys());
        self.append_range(old, 0, 0, idx);
        self.append_kv(idx, 0, key, val);
        self.append_range(old, idx + 1, idx + 1, old.nkeys() - idx - 1);
    }

    /// Builds `self` as `old` with the entry at `idx` removed:
    /// `nkeys(self) == nkeys(old) - 1`.
    pub fn leaf_delete(&mut self, old: &Page, idx: u16) {
        self.set_header(NodeType::Leaf, old.nkeys() - 1);
        self.append_range(old, 0, 0, idx);
        self.append_range(old, idx, idx + 1, old.nkeys() - (idx + 1));
    }

    /// Builds `self` as the concatenation of `left`'s and `right`'s entries,
    /// in order. Both must be the same `NodeType`.
    pub fn merge(&mut self, left: &Page, right: &Page) {
        debug_assert_eq!(left.node_type(), right.node_type());
        self.set_header(left.node_type(), left.nkeys() + right.nkeys());
        self.append_range(left, 0, 0, left.nkeys());
        self.append_range(right, left.nkeys(), 0, right.nkeys());
    }
}
