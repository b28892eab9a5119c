//! Per-call seed and the seeded shuffle it drives.

const LCG_MULTIPLIER: i64 = 9301;
const LCG_INCREMENT: i64 = 49297;
const LCG_MODULUS: i64 = 233280;

/// Seed of one engine call: user id + epoch millis + a jitter in `0..1000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(i64);

impl Seed {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn derive(user_id: i64, epoch_millis: i64, jitter: u32) -> Self {
        Self(
            user_id
                .wrapping_add(epoch_millis)
                .wrapping_add(i64::from(jitter)),
        )
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn includes_preventive(self) -> bool {
        self.residue(3) == 0
    }

    pub fn includes_specialist(self) -> bool {
        self.residue(4) == 0
    }

    pub fn includes_mental_health(self) -> bool {
        self.residue(5) == 0
    }

    /// One or two preventive items.
    pub fn preventive_count(self) -> usize {
        self.residue(2) + 1
    }

    pub fn rotation_index(self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.residue(len as i64)
    }

    /// Fisher-Yates from the back, indices drawn from [`Lcg`].
    pub fn shuffle<T>(self, items: &mut [T]) {
        let mut lcg = Lcg::new(self);
        let mut current = items.len();
        while current != 0 {
            let pick = (lcg.next_unit() * current as f64).floor() as usize;
            current -= 1;
            items.swap(current, pick.min(current));
        }
    }

    /// `seed mod divisor`, never negative.
    pub fn residue(self, divisor: i64) -> usize {
        self.0.rem_euclid(divisor) as usize
    }
}

/// `s = (s * 9301 + 49297) mod 233280`, yielding `s / 233280`.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: i64,
}

impl Lcg {
    pub fn new(seed: Seed) -> Self {
        // Reduced up front so the first product cannot overflow.
        Self {
            state: seed.0.rem_euclid(LCG_MODULUS),
        }
    }

    pub fn next_unit(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn flags_follow_seed_residues() {
        let seed = Seed::new(60);
        assert!(seed.includes_preventive());
        assert!(seed.includes_specialist());
        assert!(seed.includes_mental_health());
        assert_eq!(seed.preventive_count(), 1);

        let seed = Seed::new(7);
        assert!(!seed.includes_preventive());
        assert!(!seed.includes_specialist());
        assert!(!seed.includes_mental_health());
        assert_eq!(seed.preventive_count(), 2);
        assert_eq!(seed.rotation_index(5), 2);
    }

    #[test]
    fn derive_adds_components() {
        assert_eq!(Seed::derive(42, 1_700_000_000_000, 999).value(), 1_700_000_001_041);
    }

    #[test]
    fn lcg_sequence_is_fixed() {
        let mut lcg = Lcg::new(Seed::new(0));
        assert_eq!(lcg.next_unit(), 49297.0 / 233280.0);
        assert_eq!(lcg.next_unit(), 165494.0 / 233280.0);
    }

    #[test]
    fn shuffle_of_two_with_seed_zero_swaps() {
        let mut items = [1, 2];
        Seed::new(0).shuffle(&mut items);
        assert_eq!(items, [2, 1]);
    }

    proptest! {
        #[test]
        fn shuffle_is_a_repeatable_permutation(seed in any::<i64>(), len in 0usize..12) {
            let original: Vec<usize> = (0..len).collect();
            let mut first = original.clone();
            let mut second = original.clone();
            Seed::new(seed).shuffle(&mut first);
            Seed::new(seed).shuffle(&mut second);

            prop_assert_eq!(&first, &second);
            let mut sorted = first.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, original);
        }
    }
}
