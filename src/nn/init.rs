use ndarray::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic Glorot-uniform initialization of parameters.
pub struct ParamsInitializer {
    rng: ChaCha8Rng,
}

impl ParamsInitializer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn matrix(&mut self, nb_rows: usize, nb_columns: usize) -> Array2<f32> {
        let limit = (6.0 / (nb_rows + nb_columns) as f32).sqrt();
        let rng = &mut self.rng;
        Array2::from_shape_fn((nb_rows, nb_columns), |_| rng.gen_range(-limit..limit))
    }

    pub fn biases(&mut self, size: usize) -> Array1<f32> {
        Array1::zeros(size)
    }
}
