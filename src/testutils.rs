use ndarray::prelude::*;

use crate::configurations::IntentConfiguration;

pub fn assert_epsilon_eq_array1(a: &Array1<f32>, b: &Array1<f32>, epsilon: f32) {
    assert_eq!(a.dim(), b.dim());
    for (index, elem_a) in a.indexed_iter() {
        assert!(
            epsilon_eq(*elem_a, b[index], epsilon),
            "{} != {} at index {}",
            elem_a,
            b[index],
            index
        )
    }
}

pub fn epsilon_eq(a: f32, b: f32, epsilon: f32) -> bool {
    let diff = a - b;
    diff < epsilon && diff > -epsilon
}

/// `greet: [person, NoSlot]` and `book_flight: [origin, destination, NoSlot]`
pub fn sample_configurations() -> Vec<IntentConfiguration> {
    vec![
        IntentConfiguration::new("greet", vec!["person"]),
        IntentConfiguration::new("book_flight", vec!["origin", "destination"]),
    ]
}

/// A slots classification peaked on `best_index`, the remaining probability being spread
/// over the other classes
pub fn slots_classification(size: usize, best_index: usize, best_score: f32) -> Array1<f32> {
    let other_score = (1.0 - best_score) / (size - 1) as f32;
    Array1::from_shape_fn(size, |i| {
        if i == best_index {
            best_score
        } else {
            other_score
        }
    })
}
