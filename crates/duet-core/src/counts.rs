//! The shared topic-word matrix and its per-sweep delta.
//!
//! `TW[w,k]` is stored 64-bit signed (per the spec's numerical
//! representation notes, wide enough that merging many shards' deltas can
//! never overflow); `DeltaMatrix` entries are 16-bit signed, since no single
//! sweep can move more than one word's worth of mass into or out of any
//! cell.

/// `W x K` topic-word count matrix, row-major by word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicWordMatrix {
    w: usize,
    k: usize,
    data: Vec<i64>,
}

impl TopicWordMatrix {
    pub fn zeros(w: usize, k: usize) -> Self {
        TopicWordMatrix {
            w,
            k,
            data: vec![0; w * k],
        }
    }

    #[inline]
    fn index(&self, word: u32, topic: usize) -> usize {
        word as usize * self.k + topic
    }

    #[inline]
    pub fn get(&self, word: u32, topic: usize) -> i64 {
        self.data[self.index(word, topic)]
    }

    #[inline]
    pub fn increment(&mut self, word: u32, topic: usize) {
        let idx = self.index(word, topic);
        self.data[idx] += 1;
    }

    #[inline]
    pub fn decrement(&mut self, word: u32, topic: usize) {
        let idx = self.index(word, topic);
        self.data[idx] -= 1;
    }

    pub fn num_words(&self) -> usize {
        self.w
    }

    pub fn num_topics(&self) -> usize {
        self.k
    }

    /// `N[k] = sum_w TW[w,k]`, the derived column-sum vector.
    pub fn column_sums(&self) -> Vec<i64> {
        let mut sums = vec![0i64; self.k];
        for word in 0..self.w {
            for topic in 0..self.k {
                sums[topic] += self.data[word * self.k + topic];
            }
        }
        sums
    }

    /// Entries with the largest counts in column `topic`, most-counted
    /// first, capped at `n`.
    pub fn top_words(&self, topic: usize, n: usize) -> Vec<(u32, i64)> {
        let mut entries: Vec<(u32, i64)> = (0..self.w)
            .map(|w| (w as u32, self.get(w as u32, topic)))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }

    /// Add another matrix's counts into this one in place (used to merge a
    /// worker's `DeltaMatrix`, and to sum shard-local `TopicWordMatrix`
    /// snapshots in the sequential-reference tests).
    pub fn add_delta(&mut self, delta: &DeltaMatrix) {
        debug_assert_eq!(self.w, delta.w);
        debug_assert_eq!(self.k, delta.k);
        for (cell, d) in self.data.iter_mut().zip(delta.data.iter()) {
            *cell += *d as i64;
        }
    }

    /// Add a flat, already-widened `i64` grid (one entry per `(w,k)` cell,
    /// same layout as `data`) into this matrix in place. Used to apply the
    /// result of reducing several shards' `DeltaMatrix`es in 64-bit,
    /// without ever re-summing them in the 16-bit `DeltaMatrix` domain
    /// (spec §4.4 step 5: `TW <- TW + sum_s DeltaTW_s`, each shard's delta
    /// added at 64-bit width).
    pub fn add_flat(&mut self, flat: &[i64]) {
        debug_assert_eq!(self.data.len(), flat.len());
        for (cell, d) in self.data.iter_mut().zip(flat.iter()) {
            *cell += d;
        }
    }
}

/// A worker's net per-cell change to `TW` over one sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaMatrix {
    w: usize,
    k: usize,
    data: Vec<i16>,
}

impl DeltaMatrix {
    pub fn zeros(w: usize, k: usize) -> Self {
        DeltaMatrix {
            w,
            k,
            data: vec![0; w * k],
        }
    }

    #[inline]
    fn index(&self, word: u32, topic: usize) -> usize {
        word as usize * self.k + topic
    }

    #[inline]
    pub fn increment(&mut self, word: u32, topic: usize) {
        let idx = self.index(word, topic);
        self.data[idx] += 1;
    }

    #[inline]
    pub fn decrement(&mut self, word: u32, topic: usize) {
        let idx = self.index(word, topic);
        self.data[idx] -= 1;
    }

    pub fn get(&self, word: u32, topic: usize) -> i16 {
        self.data[self.index(word, topic)]
    }

    /// Widen every cell to `i64`, in the same `(w,k)` cell order as `data`.
    /// One sweep's delta fits comfortably in `i16` (spec §5: no single
    /// sweep can move more than one word's worth of mass into or out of
    /// any cell), but combining *several shards'* deltas for one iteration
    /// can exceed `i16::MAX` for a common word under a realistic
    /// `numprocesses` — so cross-shard combination must happen at this
    /// width, never by re-summing two `DeltaMatrix`es against each other.
    pub fn widen(&self) -> Vec<i64> {
        self.data.iter().map(|&d| d as i64).collect()
    }
}
