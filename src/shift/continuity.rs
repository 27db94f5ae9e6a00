//! Cross-call memory of the streaming pitch shifter.

use super::params::{history_capacity, MAX_OVERLAP_LEN, MIN_HISTORY_LEN};

/// Everything one call needs from the call before it.
///
/// Holds the most recent input (the previous block and, for short blocks,
/// what came before it), the tail of the previous blended output that has
/// not been emitted yet, and the overlap length that tail was cut with.
/// Storage is allocated once for the largest block and never resized.
#[derive(Debug, Clone)]
pub struct ContinuityStore {
    /// Most recent input, oldest first; the newest sample is last.
    history: Vec<f32>,
    prev_block_len: usize,
    prev_tail: Vec<f32>,
    prev_overlap_len: usize,
    first_call: bool,
}

impl ContinuityStore {
    /// Creates an empty store for blocks of up to `max_block_len` samples.
    pub fn new(max_block_len: usize) -> Self {
        Self {
            history: vec![0.0; history_capacity(max_block_len)],
            prev_block_len: 0,
            prev_tail: vec![0.0; MAX_OVERLAP_LEN],
            prev_overlap_len: 0,
            first_call: true,
        }
    }

    /// True until the first block has been stored.
    #[inline]
    pub fn is_first_call(&self) -> bool {
        self.first_call
    }

    /// The previous call's input block.
    #[inline]
    pub fn previous_block(&self) -> &[f32] {
        &self.history[self.history.len() - self.prev_block_len..]
    }

    /// Input the next call is spliced against: the previous block, extended
    /// backwards to at least [`MIN_HISTORY_LEN`] samples. Before any input
    /// was seen the extension is silence.
    #[inline]
    pub fn history(&self) -> &[f32] {
        let len = self.prev_block_len.max(MIN_HISTORY_LEN);
        &self.history[self.history.len() - len..]
    }

    /// The carried output tail, `previous_overlap_len()` samples long.
    #[inline]
    pub fn previous_tail(&self) -> &[f32] {
        &self.prev_tail[..self.prev_overlap_len]
    }

    /// Overlap length computed by the previous call.
    #[inline]
    pub fn previous_overlap_len(&self) -> usize {
        self.prev_overlap_len
    }

    /// Records the very first block: raw input, silent tail.
    ///
    /// Clears the first-call flag.
    pub fn prime(&mut self, block: &[f32], overlap_len: usize) {
        let overlap_len = overlap_len.min(MAX_OVERLAP_LEN);
        self.history.fill(0.0);
        self.push_block(block);
        self.prev_tail[..overlap_len].fill(0.0);
        self.prev_overlap_len = overlap_len;
        self.first_call = false;
    }

    /// Replaces block, tail and overlap length together at the end of a call.
    pub fn store(&mut self, block: &[f32], tail: &[f32], overlap_len: usize) {
        debug_assert_eq!(tail.len(), overlap_len);
        let overlap_len = overlap_len.min(tail.len()).min(MAX_OVERLAP_LEN);
        self.push_block(block);
        self.prev_tail[..overlap_len].copy_from_slice(&tail[..overlap_len]);
        self.prev_overlap_len = overlap_len;
        self.first_call = false;
    }

    /// Returns to the freshly constructed state, keeping the allocations.
    pub fn reset(&mut self) {
        self.history.fill(0.0);
        self.prev_block_len = 0;
        self.prev_tail.fill(0.0);
        self.prev_overlap_len = 0;
        self.first_call = true;
    }

    /// Shifts `block` in as the newest input.
    fn push_block(&mut self, block: &[f32]) {
        let cap = self.history.len();
        debug_assert!(block.len() <= cap, "block exceeds continuity capacity");
        let len = block.len().min(cap);
        self.history.copy_within(len.., 0);
        self.history[cap - len..].copy_from_slice(&block[block.len() - len..]);
        self.prev_block_len = len;
    }
}
