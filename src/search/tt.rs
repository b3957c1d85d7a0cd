use crate::moves::Move;

// ============================================================================
// Transposition table
// ============================================================================
//
// Fixed-size, power-of-two, always-replace. Each slot holds a 32-bit
// signature (the hash bits above the index) plus the packed data; a matching
// signature is trusted. A rare false match is harmless: the stored move gets
// legality-filtered like any other, and the stored score only prunes when the
// stored depth covers the requested one.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TTFlag {
    None = 0,
    Exact = 1,
    LowerBound = 2,
    UpperBound = 3,
}

#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    pub key32: u32,
    pub score: i32,
    pub mv: Move,
    pub depth: i8,
    pub flag: TTFlag,
}

impl TTEntry {
    #[inline]
    const fn empty() -> Self {
        TTEntry {
            key32: 0,
            score: 0,
            mv: Move::NONE,
            depth: 0,
            flag: TTFlag::None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flag == TTFlag::None
    }
}

pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    mask: usize,
    index_bits: u32,
    used: usize,
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<TTEntry>();
        let num_entries = (bytes / entry_size).max(1);

        let mut cap_pow2 = 1usize;
        let mut index_bits = 0u32;
        while cap_pow2 * 2 <= num_entries {
            cap_pow2 *= 2;
            index_bits += 1;
        }

        TranspositionTable {
            entries: vec![TTEntry::empty(); cap_pow2],
            mask: cap_pow2 - 1,
            index_bits,
            used: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Signature for verification: the hash bits right above the index, so
    /// index and signature never overlap.
    #[inline]
    fn signature(&self, hash: u64) -> u32 {
        (hash >> self.index_bits) as u32
    }

    /// Look up the entry for `hash`, if one with a matching signature exists.
    /// Bound interpretation is left to the caller.
    #[inline]
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        let entry = self.entries[self.index(hash)];
        if !entry.is_empty() && entry.key32 == self.signature(hash) {
            Some(entry)
        } else {
            None
        }
    }

    /// The proven best move for `hash`, used for root extraction and ordering.
    #[inline]
    pub fn best_move(&self, hash: u64) -> Move {
        match self.probe(hash) {
            Some(entry) => entry.mv,
            None => Move::NONE,
        }
    }

    /// Store unconditionally, displacing whatever occupied the slot.
    pub fn store(&mut self, hash: u64, depth: i32, flag: TTFlag, score: i32, mv: Move) {
        let idx = self.index(hash);
        if self.entries[idx].is_empty() {
            self.used += 1;
        }
        self.entries[idx] = TTEntry {
            key32: self.signature(hash),
            score,
            mv,
            depth: depth.clamp(i8::MIN as i32, i8::MAX as i32) as i8,
            flag,
        };
    }

    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = TTEntry::empty();
        }
        self.used = 0;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn used_entries(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn fill_permille(&self) -> u32 {
        ((self.used as u64 * 1000) / self.capacity() as u64) as u32
    }
}
