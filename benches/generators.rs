use astar_search::{Cost, EstimateTable, NodeRef, OpenQueue};
use rand::prelude::{Rng, SeedableRng};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

#[allow(dead_code)]
pub(crate) fn gen_random_costs(n: usize, seed: u64) -> Vec<Cost> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dist = rand::distributions::Uniform::new_inclusive(1 as Cost, 40_000_000 as Cost);
    (0..n).map(|_| rng.sample(dist)).collect()
}

#[allow(dead_code)]
pub(crate) fn choose_some<T>(vals: &[T], num: usize, seed: u64) -> Vec<T>
where
    T: Clone,
{
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    vals.choose_multiple(&mut rng, num).cloned().collect()
}

/// Splits the data in to parts:
/// 1. random shuffled first output for filling queue
/// 2. `number_for_push` lowest estimates sorted in descending order,
///    so every push sifts up to the root
/// ## Panics
/// If number_for_push bigger than data.len()
#[allow(dead_code)]
pub(crate) fn generate_worst_push_data(
    mut data: Vec<Cost>,
    number_for_push: usize,
    seed: u64,
) -> (Vec<Cost>, Vec<Cost>) {
    if number_for_push > data.len() {
        panic!(
            "number_for_push {} MUST be less or equal data length {}",
            number_for_push,
            data.len()
        );
    }
    data.sort_unstable_by(|a, b| b.cmp(a));
    let remain_length = data.len() - number_for_push;
    let for_pushes = data[remain_length..].to_vec();
    data.truncate(remain_length);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    data.shuffle(&mut rng);
    (data, for_pushes)
}

/// Queue holding nodes `0..estimates.len()` with the given estimates.
#[allow(dead_code)]
pub(crate) fn fill_queue(estimates: &[Cost]) -> (OpenQueue, EstimateTable) {
    let mut queue = OpenQueue::with_capacity(estimates.len());
    let mut slots = EstimateTable::with_capacity(estimates.len());
    for (index, &estimate) in estimates.iter().enumerate() {
        let node = NodeRef::new(index);
        slots.set_estimate(node, estimate);
        queue.push(node, &mut slots).unwrap();
    }
    (queue, slots)
}
