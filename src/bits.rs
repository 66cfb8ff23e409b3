//! Bit cursor over a byte buffer.
//!
//! The buffer is treated as one unsigned integer of fixed byte length.
//! [`BitCursor::consume`] takes bits off the least-significant end and shifts the rest down;
//! [`BitCursor::inject`] shifts the content up and writes new bits at the least-significant end.
//! The length never changes: bits shifted past the top are lost, and reads past the end of the
//! content return zero.
//!
//! On the wire the least-significant byte comes first. Conceptually the bytes are reversed into
//! a most-significant-first integer on the way in and back on the way out; the cursor instead
//! addresses wire bytes least-significant bit first, which gives the same bits without moving
//! any. Shifts are never performed: a read offset advances on consume and retreats on inject,
//! so both cost O(k) in the field width rather than O(n) in the buffer length.

use byteorder::{ByteOrder, LittleEndian};

/// Widest field a single consume or inject may move.
pub const MAX_FIELD_BITS: u32 = 31;

/// Minimum headroom, in bytes, kept below the content for injects.
const FIELD_BYTES: usize = 4;

/// Mask selecting the low `bits` bits of a `u32` (all ones for 32 and above).
pub(crate) fn low_mask(bits: u32) -> u32 {
    1u32.checked_shl(bits).map_or(u32::MAX, |b| b - 1)
}

/// A fixed-length buffer read and written from its least-significant end.
///
/// Content bit `i` is storage bit `read + i` (bit 0 is the low bit of `storage[0]`). Storage
/// bits at or above `top` read as zero. Invariant: `top <= 8 * storage.len()`.
#[derive(Debug, Clone)]
pub struct BitCursor {
    storage: Vec<u8>,
    read: usize,
    top: usize,
    len: usize,
}

impl BitCursor {
    /// Cursor over wire-order bytes (least-significant byte first).
    pub fn from_wire(wire: &[u8]) -> Self {
        BitCursor {
            storage: wire.to_vec(),
            read: 0,
            top: 8 * wire.len(),
            len: wire.len(),
        }
    }

    /// All-zero cursor of `len` bytes, ready for [`inject`](Self::inject).
    pub fn zeroed(len: usize) -> Self {
        let headroom = len.max(FIELD_BYTES);
        BitCursor {
            storage: vec![0u8; headroom + len],
            read: 8 * headroom,
            top: 8 * (headroom + len),
            len,
        }
    }

    /// Consume the cursor and return its content in wire order.
    pub fn into_wire(self) -> Vec<u8> {
        self.content()
    }

    /// Length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length buffer.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when no bit is set anywhere in the buffer.
    pub fn is_zero(&self) -> bool {
        let mut at = self.read;
        while at < self.top {
            if self.get(at, 32) != 0 {
                return false;
            }
            at += 32;
        }
        true
    }

    /// Take the `bits` least-significant bits and shift the remaining content down by `bits`.
    ///
    /// # Panics
    ///
    /// If `bits` exceeds [`MAX_FIELD_BITS`].
    pub fn consume(&mut self, bits: u32) -> u32 {
        assert!(
            bits <= MAX_FIELD_BITS,
            "cannot consume {} bits (max {})",
            bits,
            MAX_FIELD_BITS
        );
        let value = self.get(self.read, bits);
        self.read += bits as usize;
        value
    }

    /// Shift the content up by `bits` and place `value` in the vacated low bits.
    ///
    /// # Panics
    ///
    /// If `bits` exceeds [`MAX_FIELD_BITS`] or `value` does not fit in `bits` bits.
    pub fn inject(&mut self, bits: u32, value: u32) {
        assert!(
            bits <= MAX_FIELD_BITS,
            "cannot inject {} bits (max {})",
            bits,
            MAX_FIELD_BITS
        );
        assert!(
            value & !low_mask(bits) == 0,
            "value {:#x} does not fit in {} bits",
            value,
            bits
        );
        if self.len == 0 {
            return;
        }
        // Need room below the content, and no consumed-past-the-end gap above it.
        if self.read < bits as usize || self.top < self.read {
            self.compact();
        }
        self.read -= bits as usize;
        self.put(self.read, bits, value);
        self.top = self.top.min(self.read + 8 * self.len);
    }

    /// The `len` content bytes, least-significant first.
    fn content(&self) -> Vec<u8> {
        (0..self.len)
            .map(|i| self.get(self.read + 8 * i, 8) as u8)
            .collect()
    }

    /// Rebuild storage as the current content with fresh headroom below it.
    fn compact(&mut self) {
        let content = self.content();
        let headroom = self.len.max(FIELD_BYTES);
        let mut storage = vec![0u8; headroom];
        storage.extend_from_slice(&content);
        self.storage = storage;
        self.read = 8 * headroom;
        self.top = 8 * (headroom + self.len);
    }

    /// Little-endian 8-byte window starting at storage byte `byte`, zero past the end.
    fn window(&self, byte: usize) -> ([u8; 8], usize) {
        let mut window = [0u8; 8];
        let avail = self.storage.len().saturating_sub(byte).min(8);
        if avail > 0 {
            window[..avail].copy_from_slice(&self.storage[byte..byte + avail]);
        }
        (window, avail)
    }

    /// Up to 32 storage bits starting at `at`, with bits at or above `top` read as zero.
    fn get(&self, at: usize, bits: u32) -> u32 {
        if bits == 0 || at >= self.top {
            return 0;
        }
        let bits = bits.min(u32::try_from(self.top - at).unwrap_or(u32::MAX));
        let (window, _) = self.window(at / 8);
        ((LittleEndian::read_u64(&window) >> (at % 8)) as u32) & low_mask(bits)
    }

    /// Overwrite `bits` storage bits starting at `at`, which must lie inside storage.
    fn put(&mut self, at: usize, bits: u32, value: u32) {
        let byte = at / 8;
        let shift = at % 8;
        let (mut window, avail) = self.window(byte);
        let mask = u64::from(low_mask(bits)) << shift;
        let merged = (LittleEndian::read_u64(&window) & !mask) | (u64::from(value) << shift);
        LittleEndian::write_u64(&mut window, merged);
        self.storage[byte..byte + avail].copy_from_slice(&window[..avail]);
    }
}
