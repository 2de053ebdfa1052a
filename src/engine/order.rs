use rand::Rng;
use rand::seq::SliceRandom;

/// Randomised traversal of the question bank. Holds bank indices; the bank
/// itself is never reordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionOrder {
    indices: Vec<usize>,
}

impl QuestionOrder {
    /// Draw a fresh permutation of `0..len` from `rng`.
    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(rng);
        Self { indices }
    }

    /// Accept a previously saved order only if it is a permutation of `0..len`.
    pub fn from_saved(indices: Vec<usize>, len: usize) -> Option<Self> {
        if indices.len() != len {
            return None;
        }
        let mut seen = vec![false; len];
        for &idx in &indices {
            if idx >= len || seen[idx] {
                return None;
            }
            seen[idx] = true;
        }
        Some(Self { indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Bank index at order position `pos`.
    pub fn bank_index(&self, pos: usize) -> Option<usize> {
        self.indices.get(pos).copied()
    }

    pub fn is_last(&self, pos: usize) -> bool {
        pos + 1 >= self.indices.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_shuffled_is_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let order = QuestionOrder::shuffled(50, &mut rng);
        let mut sorted = order.as_slice().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = QuestionOrder::shuffled(20, &mut StdRng::seed_from_u64(7));
        let b = QuestionOrder::shuffled(20, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_saved_rejects_non_permutations() {
        assert!(QuestionOrder::from_saved(vec![2, 0, 1], 3).is_some());
        assert!(QuestionOrder::from_saved(vec![0, 1], 3).is_none());
        assert!(QuestionOrder::from_saved(vec![0, 0, 1], 3).is_none());
        assert!(QuestionOrder::from_saved(vec![0, 1, 3], 3).is_none());
    }

    #[test]
    fn test_is_last() {
        let order = QuestionOrder::from_saved(vec![1, 0], 2).unwrap();
        assert!(!order.is_last(0));
        assert!(order.is_last(1));
        assert_eq!(order.bank_index(0), Some(1));
        assert_eq!(order.bank_index(2), None);
    }

    #[test]
    fn test_empty_order() {
        let order = QuestionOrder::shuffled(0, &mut StdRng::seed_from_u64(1));
        assert!(order.is_empty());
        assert!(order.is_last(0));
    }
}
