/// Capped doubling delay in milliseconds.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: u64,
    max: u64,
}

impl Backoff {
    #[must_use]
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self {
            current: base_ms.min(max_ms),
            max: max_ms,
        }
    }

    pub fn next_delay(&mut self) -> u64 {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_until_cap() {
        let mut backoff = Backoff::new(1_000, 30_000);
        let delays: Vec<u64> = (0..7).map(|_| backoff.next_delay()).collect();
        assert_eq!(
            delays,
            vec![1_000, 2_000, 4_000, 8_000, 16_000, 30_000, 30_000]
        );
    }

    #[test]
    fn base_above_cap_is_capped() {
        let mut backoff = Backoff::new(5_000, 1_000);
        assert_eq!(backoff.next_delay(), 1_000);
        assert_eq!(backoff.next_delay(), 1_000);
    }
}
