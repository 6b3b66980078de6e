// Linear-scan weighted choice. Entries keep insertion order so a given random
// value always selects the same entry.

use crate::random::RandomSource;

#[derive(Clone, Debug)]
pub struct WeightedTable<T> {
    entries: Vec<(f64, T)>,
    total: f64,
}

impl<T> WeightedTable<T> {
    /// Negative and non-finite weights count as zero.
    pub fn new(entries: impl IntoIterator<Item = (f64, T)>) -> Self {
        let entries: Vec<(f64, T)> = entries
            .into_iter()
            .map(|(w, t)| (if w.is_finite() && w > 0.0 { w } else { 0.0 }, t))
            .collect();
        let total = entries.iter().map(|(w, _)| w).sum();
        Self { entries, total }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() || self.total <= 0.0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, t)| t)
    }

    /// First entry whose weight exceeds the running remainder of `r`
    /// (`r` in `[0, total)`). Rounding fall-through selects the last entry.
    pub fn select(&self, mut r: f64) -> Option<&T> {
        for (weight, item) in &self.entries {
            if r < *weight {
                return Some(item);
            }
            r -= weight;
        }
        self.entries.last().map(|(_, t)| t)
    }

    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let r = rng.below(self.total);
        self.select(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_select_walks_cumulative_weights() {
        let table = WeightedTable::new([(1.0, 'a'), (2.0, 'b'), (1.0, 'c')]);
        assert_eq!(table.total(), 4.0);
        assert_eq!(table.select(0.0), Some(&'a'));
        assert_eq!(table.select(0.999), Some(&'a'));
        assert_eq!(table.select(1.0), Some(&'b'));
        assert_eq!(table.select(2.999), Some(&'b'));
        assert_eq!(table.select(3.0), Some(&'c'));
        assert_eq!(table.select(4.0), Some(&'c'));
    }

    #[test]
    fn test_zero_weight_is_never_selected_inside_range() {
        let table = WeightedTable::new([(0.0, 'a'), (-3.0, 'b'), (f64::NAN, 'c'), (2.0, 'd')]);
        assert_eq!(table.total(), 2.0);
        assert_eq!(table.select(0.0), Some(&'d'));
        assert_eq!(table.select(1.5), Some(&'d'));
    }

    #[test]
    fn test_empty_table() {
        let table: WeightedTable<u8> = WeightedTable::new([]);
        assert!(table.is_empty());
        assert_eq!(table.select(0.0), None);
    }

    #[test]
    fn test_frequencies_converge_to_weights() {
        let table = WeightedTable::new([(1.0, 0usize), (3.0, 1), (4.0, 2)]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut hits = [0usize; 3];
        let n = 80_000;
        for _ in 0..n {
            hits[*table.pick(&mut rng).unwrap()] += 1;
        }
        for (i, expected) in [1.0 / 8.0, 3.0 / 8.0, 4.0 / 8.0].iter().enumerate() {
            let got = hits[i] as f64 / n as f64;
            assert!((got - expected).abs() < 0.01, "entry {} got {} expected {}", i, got, expected);
        }
    }
}
