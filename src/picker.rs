use rand::{seq::SliceRandom, Rng};

/// Uniformly picks one of `candidates`, or `None` when there are none.
pub fn pick<'a, T, R: Rng + ?Sized>(candidates: &'a [T], rng: &mut R) -> Option<&'a T> {
    candidates.choose(rng)
}

/// Uniform index in `0..len`, or `None` for an empty range.
pub fn pick_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

/// Copy of `items` in uniformly random order (Fisher–Yates).
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_pick_from_empty_set() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: [u8; 0] = [];
        assert_eq!(pick(&empty, &mut rng), None);
        assert_eq!(pick_index(0, &mut rng), None);
    }

    #[test]
    fn test_pick_stays_in_set() {
        let mut rng = StdRng::seed_from_u64(7);
        let set = ["bell", "flash"];
        for _ in 0..50 {
            let chosen = pick(&set, &mut rng).unwrap();
            assert!(set.contains(chosen));
        }
    }

    #[test]
    fn test_pick_index_covers_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[pick_index(5, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_shuffled_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: Vec<u32> = (0..20).collect();
        let mut out = shuffled(&items, &mut rng);
        assert_eq!(out.len(), items.len());
        out.sort_unstable();
        assert_eq!(out, items);
    }

    #[test]
    fn test_shuffled_keeps_duplicates() {
        let mut rng = StdRng::seed_from_u64(9);
        let items = vec!["A", "A", "B"];
        let out = shuffled(&items, &mut rng);
        assert_eq!(out.iter().filter(|s| **s == "A").count(), 2);
    }
}
