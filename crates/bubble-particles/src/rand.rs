//! Random sources for path generation

/// Supplies uniform values in [0, 1).
///
/// Endpoint jitter is the only randomness in the engine, so tests swap in a
/// [`FixedRandom`] to make paths fully deterministic.
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;
}

/// Lightweight xorshift32 PRNG — no external crate needed
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomSource for ParticleRng {
    /// Top 24 bits only, so the result stays strictly below 1.0 in f32
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct FixedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl FixedRandom {
    /// Always returns `value`
    pub fn new(value: f32) -> Self {
        Self::sequence(vec![value])
    }

    /// Returns `values` in order, then starts over. An empty list yields 0.0.
    pub fn sequence(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for FixedRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
