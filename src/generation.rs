/// Monotonic counter used to tell current results from stale ones.
///
/// A page or row bumps its generation whenever its inputs change (new
/// address, new transaction id, page left). Background jobs carry the
/// generation they were dispatched under; anything that comes back under an
/// older generation is dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestGeneration(u64);

impl RequestGeneration {
    pub fn new() -> Self {
        Self(0)
    }

    /// Invalidate everything dispatched so far and return the new generation
    pub fn bump(&mut self) -> RequestGeneration {
        self.0 = self.0.wrapping_add(1);
        *self
    }

    pub fn is_current(&self, tagged: RequestGeneration) -> bool {
        self.0 == tagged.0
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_invalidates_previous() {
        let mut generation = RequestGeneration::new();
        let first = generation;
        let second = generation.bump();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn test_fresh_generation_is_current() {
        let generation = RequestGeneration::new();
        assert!(generation.is_current(RequestGeneration::default()));
        assert_eq!(generation.value(), 0);
    }
}
