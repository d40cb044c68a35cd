/// Source of uniformly distributed values in `[0, 1)`.
///
/// Browsers supply `Math.random`; tests supply fixed sequences so that
/// randomized layouts and timings stay reproducible.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform value in `[low, high)`.
    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }

    /// Uniform index in `[0, len)`; `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl<F: FnMut() -> f64> RandomSource for F {
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Replays a fixed sequence of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    /// Replays `values` from the start.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self { values: values.into(), pos: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }

        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_cycles() {
        let mut src = SequenceSource::new([0.1, 0.9]);
        assert_eq!(src.next_unit(), 0.1);
        assert_eq!(src.next_unit(), 0.9);
        assert_eq!(src.next_unit(), 0.1);
    }

    #[test]
    fn test_range_and_index() {
        let mut src = SequenceSource::new([0.5, 0.999_999, 0.0]);
        assert_eq!(src.range(3000.0, 6000.0), 4500.0);
        assert_eq!(src.index(4), 3);
        assert_eq!(src.index(4), 0);
    }

    #[test]
    fn test_closure_source() {
        let mut n = 0.0;
        let mut src = move || {
            n += 0.25;
            n
        };
        assert_eq!(src.next_unit(), 0.25);
        assert_eq!(src.range(0.0, 4.0), 2.0);
    }
}
