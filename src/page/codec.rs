//! Component A — page codec: accessors for the header, pointer array,
//! offset array, and key/value payloads described in `SPEC_FULL.md` §3.2.
//!
//! ```text
//! offset  size   field
//!  0       2     node_type            (1 = Internal, 2 = Leaf)
//!  2       2     nkeys                (number of entries n)
//!  4       8·n   pointers[n]          (child PagePtrs; 0 for Leaf slots)
//!  4+8n    2·n   offsets[n]           (cumulative end-offset of each KV
//!                                     payload, measured from start of kv_area)
//!  kv_area n·(2+2+klen+vlen)          (key_len u16, val_len u16, key, value)
//! ```

use super::{NodeType, Page};
use crate::{PagePtr, POINTERS_OFFSET};
use byteorder::{ByteOrder, LittleEndian};

impl Page {
    /// Tag at offset 0. Panics (corrupt page) on an unrecognised tag.
    pub fn node_type(&self) -> NodeType {
        NodeType::from_u16(LittleEndian::read_u16(&self.buf[0..2]))
    }

    /// Number of entries `n` stored at offset 2.
    pub fn nkeys(&self) -> u16 {
        LittleEndian::read_u16(&self.buf[2..4])
    }

    /// Writes the two-field header. Must be called before any `append_*`
    /// call, with `n` set to the final entry count the page will hold.
    pub fn set_header(&mut self, node_type: NodeType, n: u16) {
        LittleEndian::write_u16(&mut self.buf[0..2], node_type as u16);
        LittleEndian::write_u16(&mut self.buf[2..4], n);
    }

    fn offsets_area_start(&self) -> usize {
        POINTERS_OFFSET + 8 * self.nkeys() as usize
    }

    fn kv_area_start(&self) -> usize {
        self.offsets_area_start() + 2 * self.nkeys() as usize
    }

    /// Cumulative byte length of the kv_area through the end of entry
    /// `i - 1`, i.e. the start offset of entry `i` relative to `kv_area`.
    /// `i` ranges over `0..=nkeys()`; `offset(0)` is always `0` and is not
    /// physically stored.
    pub(crate) fn offset(&self, i: u16) -> u16 {
        if i == 0 {
            return 0;
        }
        let pos = self.offsets_area_start() + 2 * (i as usize - 1);
        LittleEndian::read_u16(&self.buf[pos..pos + 2])
    }

    pub(crate) fn set_offset(&mut self, i: u16, value: u16) {
        debug_assert!(i >= 1 && i <= self.nkeys(), "offset index {} out of range", i);
        let pos = self.offsets_area_start() + 2 * (i as usize - 1);
        LittleEndian::write_u16(&mut self.buf[pos..pos + 2], value);
    }

    /// Start offset, in absolute bytes, of entry `i`. `i` ranges over
    /// `0..=nkeys()`; `kv_pos(nkeys())` is the offset one past the last
    /// entry, i.e. `nbytes()`.
    pub fn kv_pos(&self, i: u16) -> usize {
        self.kv_area_start() + self.offset(i) as usize
    }

    /// Total live byte count of the page: header + pointer array + offset
    /// array + kv_area.
    ///
    /// Panics (corrupt page) if the declared count exceeds the backing
    /// buffer's actual length — this is the nbytes/buffer-length check
    /// called out alongside the `node_type` check as a fatal corruption
    /// error, not a recoverable condition.
    pub fn nbytes(&self) -> usize {
        let n = self.kv_pos(self.nkeys());
        assert!(
            n <= self.buf.len(),
            "corrupt page: declared nbytes {} exceeds buffer length {}",
            n,
            self.buf.len()
        );
        n
    }

    /// Child `PagePtr` at slot `i` (an `Internal` node), or `0` (unused) in
    /// a `Leaf`. Indexing past `nkeys()` is a programming error.
    pub fn ptr_at(&self, i: u16) -> PagePtr {
        assert!(i < self.nkeys(), "ptr_at({}) but nkeys() == {}", i, self.nkeys());
        let pos = POINTERS_OFFSET + 8 * i as usize;
        LittleEndian::read_u64(&self.buf[pos..pos + 8])
    }

    pub(crate) fn set_ptr(&mut self, i: u16, ptr: PagePtr) {
        assert!(i < self.nkeys(), "set_ptr({}) but nkeys() == {}", i, self.nkeys());
        let pos = POINTERS_OFFSET + 8 * i as usize;
        LittleEndian::write_u64(&mut self.buf[pos..pos + 8], ptr);
    }

    fn key_len(&self, i: u16) -> u16 {
        let pos = self.kv_pos(i);
        LittleEndian::read_u16(&self.buf[pos..pos + 2])
    }

    fn val_len(&self, i: u16) -> u16 {
        let pos = self.kv_pos(i);
        LittleEndian::read_u16(&self.buf[pos + 2..pos + 4])
    }

    /// Borrowed view of the key at slot `i`. Indexing past `nkeys()` is a
    /// programming error.
    pub fn get_key(&self, i: u16) -> &[u8] {
        assert!(i < self.nkeys(), "get_key({}) but nkeys() == {}", i, self.nkeys());
        let pos = self.kv_pos(i);
        let klen = self.key_len(i) as usize;
        let start = pos + 4;
        &self.buf[start..start + klen]
    }

    /// Owned copy of the key at slot `i`. Use this when the returned key
    /// must outlive the page it came from (e.g. crossing a `store.get`
    /// boundary whose backing page may be retired).
    pub fn get_key_owned(&self, i: u16) -> Vec<u8> {
        self.get_key(i).to_vec()
    }

    /// Borrowed view of the value at slot `i`. Indexing past `nkeys()` is a
    /// programming error.
    pub fn get_val(&self, i: u16) -> &[u8] {
        assert!(i < self.nkeys(), "get_val({}) but nkeys() == {}", i, self.nkeys());
        let pos = self.kv_pos(i);
        let klen = self.key_len(i) as usize;
        let vlen = self.val_len(i) as usize;
        let start = pos + 4 + klen;
        &self.buf[start..start + vlen]
    }

    /// Owned copy of the value at slot `i`. See [`Page::get_key_owned`].
    pub fn get_val_owned(&self, i: u16) -> Vec<u8> {
        self.get_val(i).to_vec()
    }
}
