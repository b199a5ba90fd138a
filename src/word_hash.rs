/// Exponentially-decaying rolling fingerprint for one word.
///
/// Each new code is added at full weight while everything accumulated so far
/// is halved: `h = (h >> 1) + code`, wrapping at 32 bits. Later characters
/// dominate, earlier ones are never fully forgotten, and letter order matters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WordHasher {
    wordhash: u32,
}

impl WordHasher {
    pub fn new() -> Self {
        Self { wordhash: 0 }
    }

    /// Fold one non-zero contribution code into the fingerprint.
    #[inline(always)]
    pub fn push(&mut self, code: u32) {
        self.wordhash = (self.wordhash >> 1).wrapping_add(code);
    }

    /// True when no word is pending.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.wordhash == 0
    }

    pub fn digest(&self) -> u32 {
        self.wordhash
    }

    /// Hand out the pending fingerprint, if any, and reset for the next word.
    #[inline(always)]
    pub fn take(&mut self) -> Option<u32> {
        match std::mem::take(&mut self.wordhash) {
            0 => None,
            hash => Some(hash),
        }
    }
}
