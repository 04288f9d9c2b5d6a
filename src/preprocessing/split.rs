use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffles `0..n` with a seeded RNG and splits it into `(train, test)`.
///
/// The test side takes `ceil(n * test_size)` indices from the front of the
/// permutation. With two or more samples both sides are non-empty.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut n_test = (n as f64 * test_size).ceil() as usize;
    if n >= 2 {
        n_test = n_test.clamp(1, n - 1);
    } else {
        n_test = n_test.min(n);
    }

    let train = indices.split_off(n_test);
    (train, indices)
}
