//! Fixed-seed sampling and cycle-and-truncate.
//!
//! Both helpers are pure. The generator is built fresh on every call from a
//! constant seed. The `XorShiftRng` stream is fixed by its algorithm, but the
//! index sampling on top of it is `rand`'s own, so a `rand` upgrade can move
//! the sampled sequence; `sampled_sequence_is_pinned` guards against that.

use rand::SeedableRng;
use rand::seq::index;
use rand_xorshift::XorShiftRng;

/// Seed for every sampled discipline.
pub const SAMPLING_SEED: u64 = 0x5CA1_AB1E;

/// Draw `amount` items from `items` without replacement, in sampled order.
///
/// `amount` is clamped to `items.len()`.
#[must_use]
pub fn fixed_seed_sample<T: Clone>(items: &[T], amount: usize) -> Vec<T> {
    sample_with_seed(items, amount, SAMPLING_SEED)
}

/// Same as [`fixed_seed_sample`] with an explicit seed.
#[must_use]
pub fn sample_with_seed<T: Clone>(items: &[T], amount: usize, seed: u64) -> Vec<T> {
    let amount = amount.min(items.len());
    let mut rng = XorShiftRng::seed_from_u64(seed);
    index::sample(&mut rng, items.len(), amount)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

/// Repeat `items` end-to-end and cut the result to exactly `target` elements.
///
/// An empty input yields an empty output regardless of `target`.
#[must_use]
pub fn cycle_to_len<T: Clone>(items: &[T], target: usize) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    items.iter().cycle().take(target).cloned().collect()
}
