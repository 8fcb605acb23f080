//! The opaque state blob and its attached step record.

/// A fixed-size, value-typed serialization of a simulator state.
///
/// All slots in the StateDB hold exactly `blob.len()` bytes, measured once
/// at engine start by asking the Runner to serialize the initial state.
/// Copying the bytes is sufficient to reproduce the simulator state exactly
/// — `StateBlob` carries no pointers and no simulator handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBlob {
    bytes: Vec<u8>,
}

impl StateBlob {
    /// Wrap an exact-size byte buffer produced by a Runner's `serialize`.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Allocate a zeroed blob of the given size, for slots before first write.
    #[must_use]
    pub fn zeroed(size: usize) -> Self {
        Self {
            bytes: vec![0u8; size],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Overwrite this blob's contents from `src`, without reallocating.
    ///
    /// Panics if `src.len() != self.len()` — a slot's size is fixed for the
    /// life of the StateDB and a mismatch here is a programmer error, not a
    /// recoverable runtime condition.
    pub fn copy_from(&mut self, src: &StateBlob) {
        assert_eq!(
            self.bytes.len(),
            src.bytes.len(),
            "state blob size mismatch: slots are fixed-size for the life of the StateDB"
        );
        self.bytes.copy_from_slice(&src.bytes);
    }
}

/// Bit-per-rule satisfaction vector, indexed by rule id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleStatus {
    bits: Vec<u64>,
}

impl RuleStatus {
    #[must_use]
    pub fn new(rule_count: usize) -> Self {
        Self {
            bits: vec![0u64; rule_count.div_ceil(64)],
        }
    }

    #[must_use]
    pub fn is_set(&self, rule_id: usize) -> bool {
        let word = rule_id / 64;
        let bit = rule_id % 64;
        self.bits.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }

    pub fn set(&mut self, rule_id: usize) {
        let word = rule_id / 64;
        let bit = rule_id % 64;
        self.bits[word] |= 1 << bit;
    }

    /// Seed this status from the Game's declared initial bitset.
    pub fn seed(&mut self, initial: &[bool]) {
        for (id, &on) in initial.iter().enumerate() {
            if on {
                self.set(id);
            }
        }
    }

    pub fn merge_from(&mut self, other: &RuleStatus) {
        for (dst, src) in self.bits.iter_mut().zip(other.bits.iter()) {
            *dst |= src;
        }
    }
}

/// Per-state metadata carried alongside a [`StateBlob`] in the frontier.
///
/// This is the "step record" of the data model: everything the engine needs
/// to know about a state besides its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Step index from the initial state (root = 0).
    pub depth: u32,
    /// Which rules have fired for this state so far.
    pub rules_status: RuleStatus,
    /// Scalar reward at last evaluation.
    pub reward: i64,
    /// Index into the game's legal-input table, or `None` for the root.
    pub last_input: Option<u8>,
    /// Whether any WIN-marked rule has fired for this state.
    pub is_win: bool,
    /// Whether any FAIL-marked rule has fired for this state.
    pub is_fail: bool,
    /// Packed move-so-far: the `prevRef` representation chosen per §4.6's
    /// two acceptable path-reconstruction schemes. A per-slot back-pointer
    /// chain is the alternative; this is simpler and has no slot-recycling
    /// hazard, at the cost of `O(depth)` memory per live state.
    pub history: Vec<u8>,
}

impl StepRecord {
    #[must_use]
    pub fn root(rule_count: usize) -> Self {
        Self {
            depth: 0,
            rules_status: RuleStatus::new(rule_count),
            reward: 0,
            last_input: None,
            is_win: false,
            is_fail: false,
            history: Vec::new(),
        }
    }

    /// Produce the child record after one `advance`, before rule evaluation.
    #[must_use]
    pub fn child(&self, last_input: u8) -> Self {
        let mut history = self.history.clone();
        history.push(last_input);
        Self {
            depth: self.depth + 1,
            rules_status: self.rules_status.clone(),
            reward: self.reward,
            last_input: Some(last_input),
            is_win: false,
            is_fail: false,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_status_set_and_query_roundtrip() {
        let mut s = RuleStatus::new(130);
        assert!(!s.is_set(65));
        s.set(65);
        assert!(s.is_set(65));
        assert!(!s.is_set(64));
        assert!(!s.is_set(129));
    }

    #[test]
    fn rule_status_seed_sets_initial_bits() {
        let mut s = RuleStatus::new(4);
        s.seed(&[true, false, true, false]);
        assert!(s.is_set(0));
        assert!(!s.is_set(1));
        assert!(s.is_set(2));
        assert!(!s.is_set(3));
    }

    #[test]
    fn state_blob_copy_from_preserves_size() {
        let src = StateBlob::new(vec![1, 2, 3]);
        let mut dst = StateBlob::zeroed(3);
        dst.copy_from(&src);
        assert_eq!(dst.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "state blob size mismatch")]
    fn state_blob_copy_from_panics_on_size_mismatch() {
        let src = StateBlob::new(vec![1, 2, 3, 4]);
        let mut dst = StateBlob::zeroed(3);
        dst.copy_from(&src);
    }

    #[test]
    fn step_record_child_advances_depth_and_clears_flags() {
        let root = StepRecord::root(8);
        let child = root.child(2);
        assert_eq!(child.depth, 1);
        assert_eq!(child.last_input, Some(2));
        assert!(!child.is_win);
        assert!(!child.is_fail);
    }
}
