// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Carves a validation set out of the training examples.
//
// The split is drawn from the caller's random source, so a run
// started with the same --random-state always validates on the
// same examples.
//
//   validation size = ceil(val_fraction × n)
//   training size   = n - validation size

use rand::{seq::SliceRandom, Rng};

/// Shuffle `samples` with `rng` and split into (train, validation).
///
/// # Arguments
/// * `samples`      - All available samples (consumed by this function)
/// * `val_fraction` - Proportion for validation, e.g. 0.1 = 10%
/// * `rng`          - Random source that drives the permutation
pub fn split_train_val<T, R: Rng + ?Sized>(
    mut samples:  Vec<T>,
    val_fraction: f64,
    rng:          &mut R,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total  = samples.len();
    let n_val  = ((total as f64) * val_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let n_val  = n_val.min(total);

    // After split_off: samples = validation, train = the rest
    let train = samples.split_off(n_val);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        train.len(),
        samples.len(),
    );

    (train, samples)
}
