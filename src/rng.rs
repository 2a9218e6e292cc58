/// Number of draws each deal is allotted before the next iteration begins.
pub const DRAWS_PER_ITERATION: u64 = 100;

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Reproducible stream of numbers in `[0, 1)`.
///
/// The stream is a pure function of the seed and the number of draws taken
/// since it was seeded, so any point of it can be reconstructed from a
/// `(seed, iteration)` pair with [`SeededSequence::initialize`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeededSequence {
    state: u32,
    draws: u64,
}

impl SeededSequence {
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed,
            draws: 0,
        }
    }

    /// Re-seed and fast-forward past `iteration * DRAWS_PER_ITERATION` draws.
    pub fn initialize(seed: u32, iteration: u32) -> Self {
        let mut sequence = Self::new(seed);
        sequence.discard(u64::from(iteration) * DRAWS_PER_ITERATION);
        sequence
    }

    /// Draws taken since the sequence was seeded, including discarded ones.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn discard(&mut self, n: u64) {
        for _ in 0..n {
            self.next_u32();
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        self.draws += 1;
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }
}

/// Something the deal engine can pull uniform values in `[0, 1)` from.
pub trait Draw {
    fn draw(&mut self) -> f64;
}

impl Draw for SeededSequence {
    fn draw(&mut self) -> f64 {
        self.next_f64()
    }
}

impl<F: FnMut() -> f64> Draw for F {
    fn draw(&mut self) -> f64 {
        self()
    }
}
