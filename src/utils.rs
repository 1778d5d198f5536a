use std::cmp::Ordering;

use ndarray::prelude::*;

use crate::errors::*;

pub type IntentName = String;
pub type SlotName = String;

/// Index of the highest value, the lowest index winning exact ties.
///
/// Returns `None` on an empty view.
pub fn argmax(values: ArrayView1<f32>) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (index, &value)| match best {
            Some((_, best_value)) if value.partial_cmp(&best_value) != Some(Ordering::Greater) => {
                best
            }
            _ => Some((index, value)),
        })
        .map(|(index, _)| index)
}

pub fn softmax(values: &Array1<f32>) -> Array1<f32> {
    let max = values.iter().cloned().fold(::std::f32::NEG_INFINITY, f32::max);
    let exps = values.mapv(|v| (v - max).exp());
    let divider: f32 = exps.iter().sum();
    exps / divider
}

pub fn concatenate(vectors: &[ArrayView1<f32>]) -> Result<Array1<f32>> {
    Ok(ndarray::stack(Axis(0), vectors)?)
}

/// Converts a row-major matrix into an `Array2`, checking that every row has `nb_columns`
/// values.
pub fn array2_from_rows(rows: &[Vec<f32>], nb_columns: usize) -> Option<Array2<f32>> {
    if rows.iter().any(|row| row.len() != nb_columns) {
        return None;
    }
    Some(Array2::from_shape_fn((rows.len(), nb_columns), |(i, j)| {
        rows[i][j]
    }))
}

pub fn array2_to_rows(array: &Array2<f32>) -> Vec<Vec<f32>> {
    array
        .outer_iter()
        .map(|row| row.iter().cloned().collect())
        .collect()
}
