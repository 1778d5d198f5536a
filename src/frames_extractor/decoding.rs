use ndarray::prelude::*;
use ndarray::s;

use crate::configurations::IntentConfiguration;
use crate::errors::*;
use crate::ontology::{Intent, Slot, SlotToken};
use crate::slot_layout::{BioTag, SlotsLayout};
use crate::utils::argmax;

/// Slot label predicted for a single token, restricted to the slots of one intent
#[derive(Debug, Clone, Copy, PartialEq)]
struct TokenLabel {
    slot_index: usize,
    tag: BioTag,
    score: f32,
}

/// Index and probability of the best intent.
///
/// Exact ties are resolved in favor of the intent whose name comes first lexicographically.
pub fn select_intent(
    distribution: ArrayView1<f32>,
    configurations: &[IntentConfiguration],
) -> Option<(usize, f32)> {
    distribution
        .iter()
        .zip(configurations.iter())
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (index, (&score, configuration))| {
            match best {
                Some((best_index, best_score))
                    if score < best_score
                        || score.is_nan()
                        || (score == best_score
                            && configuration.name() >= configurations[best_index].name()) =>
                {
                    best
                }
                _ => Some((index, score)),
            }
        })
}

/// Decodes the slots of the given intent from the slots classification of each token.
///
/// Only the classes of the intent are considered. Consecutive tokens are merged into a
/// single slot when a `Beginning` label is followed by `Inside` labels of the same slot. An
/// `Inside` label which does not continue a slot starts a new one.
pub fn decode_slots(
    layout: &SlotsLayout,
    intent_index: usize,
    configuration: &IntentConfiguration,
    slots_classifications: &[Array1<f32>],
) -> Result<Vec<Slot>> {
    let labels = slots_classifications
        .iter()
        .map(|classification| token_label(layout, intent_index, classification))
        .collect::<Result<Vec<_>>>()?;

    let mut slots: Vec<Slot> = vec![];
    let mut current: Option<(usize, Slot)> = None;

    for (token_index, label) in labels.into_iter().enumerate() {
        current = match (current.take(), label) {
            (Some((slot_index, mut slot)), Some(label))
                if label.tag == BioTag::Inside && label.slot_index == slot_index =>
            {
                slot.tokens.push(SlotToken {
                    index: token_index,
                    score: label.score,
                });
                Some((slot_index, slot))
            }
            (previous, label) => {
                if let Some((_, slot)) = previous {
                    slots.push(slot);
                }
                label.map(|label| {
                    let slot = Slot {
                        name: configuration.slots()[label.slot_index].clone(),
                        tokens: vec![SlotToken {
                            index: token_index,
                            score: label.score,
                        }],
                    };
                    (label.slot_index, slot)
                })
            }
        };
    }
    if let Some((_, slot)) = current {
        slots.push(slot);
    }

    Ok(slots)
}

/// Builds the intent result out of the intents distribution and the slots classifications.
pub fn decode_intent(
    layout: &SlotsLayout,
    configurations: &[IntentConfiguration],
    intents_distribution: ArrayView1<f32>,
    slots_classifications: &[Array1<f32>],
) -> Result<Intent> {
    if intents_distribution.dim() != configurations.len() {
        return Err(FramesExtractorError::InvalidInput(format!(
            "expected an intents distribution of size {} but found {}",
            configurations.len(),
            intents_distribution.dim()
        ))
        .into());
    }
    let (intent_index, score) =
        select_intent(intents_distribution, configurations).ok_or_else(|| {
            FramesExtractorError::ModelConfiguration("no intent configured".to_string())
        })?;
    let configuration = &configurations[intent_index];
    let slots = decode_slots(layout, intent_index, configuration, slots_classifications)?;

    Ok(Intent {
        name: configuration.name().to_string(),
        slots,
        score,
    })
}

fn token_label(
    layout: &SlotsLayout,
    intent_index: usize,
    classification: &Array1<f32>,
) -> Result<Option<TokenLabel>> {
    if classification.dim() != layout.output_size() {
        return Err(FramesExtractorError::InvalidInput(format!(
            "expected a slots classification of size {} but found {}",
            layout.output_size(),
            classification.dim()
        ))
        .into());
    }
    let range = layout.bio_range(intent_index);
    let window = classification.slice(s![range.start..range.end]);
    let global_index = match argmax(window) {
        Some(local_index) => range.start + local_index,
        None => return Ok(None),
    };
    if layout.is_no_slot(global_index) {
        return Ok(None);
    }
    Ok(layout.decode_global_index(global_index).map(|class| TokenLabel {
        slot_index: class.slot_index,
        tag: class.tag,
        score: classification[global_index],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{sample_configurations, slots_classification};
    use ndarray::array;

    fn names(slots: &[Slot]) -> Vec<(&str, Vec<usize>)> {
        slots
            .iter()
            .map(|slot| (slot.name.as_str(), slot.token_indices()))
            .collect()
    }

    #[test]
    fn select_intent_works() {
        // Given
        let configurations = sample_configurations();
        let distribution = array![0.3, 0.7];

        // When
        let selected = select_intent(distribution.view(), &configurations);

        // Then
        assert_eq!(Some((1, 0.7)), selected);
    }

    #[test]
    fn select_intent_breaks_ties_by_name() {
        // Given
        // "book_flight" comes before "greet" lexicographically
        let configurations = sample_configurations();
        let distribution = array![0.5, 0.5];

        // When
        let selected = select_intent(distribution.view(), &configurations);

        // Then
        assert_eq!(Some((1, 0.5)), selected);
    }

    #[test]
    fn decode_intent_works() {
        // Given
        let configurations = sample_configurations();
        let layout = SlotsLayout::new(&configurations);
        let intents_distribution = array![0.2, 0.8];
        // Global classes of book_flight:
        // 4: B-origin, 5: I-origin, 6: B-destination, 7: I-destination, 8-9: NoSlot
        let slots_classifications = vec![
            slots_classification(10, 4, 0.6),
            slots_classification(10, 5, 0.7),
            slots_classification(10, 8, 0.9),
            slots_classification(10, 6, 0.8),
        ];

        // When
        let intent = decode_intent(
            &layout,
            &configurations,
            intents_distribution.view(),
            &slots_classifications,
        )
        .unwrap();

        // Then
        assert_eq!("book_flight", intent.name);
        assert_eq!(0.8, intent.score);
        assert_eq!(
            vec![("origin", vec![0, 1]), ("destination", vec![3])],
            names(&intent.slots)
        );
        assert_eq!(0.7, intent.slots[0].tokens[1].score);
    }

    #[test]
    fn slots_of_other_intents_are_ignored() {
        // Given
        let configurations = sample_configurations();
        let layout = SlotsLayout::new(&configurations);
        // The global argmax is B-person (0) which belongs to greet, the best class within the
        // book_flight range is B-destination (6)
        let mut classification = slots_classification(10, 0, 0.5);
        classification[6] = 0.2;

        // When
        let slots = decode_slots(&layout, 1, &configurations[1], &[classification]).unwrap();

        // Then
        assert_eq!(vec![("destination", vec![0])], names(&slots));
    }

    #[test]
    fn orphan_inside_label_starts_a_slot() {
        // Given
        let configurations = sample_configurations();
        let layout = SlotsLayout::new(&configurations);
        let slots_classifications = vec![
            slots_classification(10, 5, 0.9), // I-origin
            slots_classification(10, 5, 0.9), // I-origin
            slots_classification(10, 7, 0.9), // I-destination
        ];

        // When
        let slots = decode_slots(&layout, 1, &configurations[1], &slots_classifications).unwrap();

        // Then
        assert_eq!(
            vec![("origin", vec![0, 1]), ("destination", vec![2])],
            names(&slots)
        );
    }

    #[test]
    fn beginning_label_closes_previous_slot() {
        // Given
        let configurations = sample_configurations();
        let layout = SlotsLayout::new(&configurations);
        let slots_classifications = vec![
            slots_classification(10, 4, 0.9), // B-origin
            slots_classification(10, 4, 0.9), // B-origin
            slots_classification(10, 5, 0.9), // I-origin
        ];

        // When
        let slots = decode_slots(&layout, 1, &configurations[1], &slots_classifications).unwrap();

        // Then
        assert_eq!(
            vec![("origin", vec![0]), ("origin", vec![1, 2])],
            names(&slots)
        );
    }

    #[test]
    fn inside_label_of_another_slot_closes_previous_slot() {
        // Given
        let configurations = sample_configurations();
        let layout = SlotsLayout::new(&configurations);
        let slots_classifications = vec![
            slots_classification(10, 4, 0.9), // B-origin
            slots_classification(10, 7, 0.9), // I-destination
        ];

        // When
        let slots = decode_slots(&layout, 1, &configurations[1], &slots_classifications).unwrap();

        // Then
        assert_eq!(
            vec![("origin", vec![0]), ("destination", vec![1])],
            names(&slots)
        );
    }

    #[test]
    fn no_slot_tokens_give_no_slots() {
        // Given
        let configurations = sample_configurations();
        let layout = SlotsLayout::new(&configurations);
        let slots_classifications = vec![
            slots_classification(10, 8, 0.9), // B-NoSlot
            slots_classification(10, 9, 0.9), // I-NoSlot
        ];

        // When
        let intent = decode_intent(
            &layout,
            &configurations,
            array![0.1, 0.9].view(),
            &slots_classifications,
        )
        .unwrap();

        // Then
        assert_eq!("book_flight", intent.name);
        assert_eq!(0.9, intent.score);
        assert!(intent.slots.is_empty());
    }

    #[test]
    fn no_slot_interrupts_a_slot() {
        // Given
        let configurations = sample_configurations();
        let slots_classifications = vec![
            slots_classification(4, 0, 0.9), // B-person
            slots_classification(4, 2, 0.9), // B-NoSlot
            slots_classification(4, 1, 0.9), // I-person
        ];
        // greet alone: 0: B-person, 1: I-person, 2-3: NoSlot
        let layout_for_greet = SlotsLayout::new(&configurations[..1]);

        // When
        let slots =
            decode_slots(&layout_for_greet, 0, &configurations[0], &slots_classifications)
                .unwrap();

        // Then
        assert_eq!(
            vec![("person", vec![0]), ("person", vec![2])],
            names(&slots)
        );
    }

    #[test]
    fn single_token_sentence_is_decoded() {
        // Given
        let configurations = sample_configurations();
        let layout = SlotsLayout::new(&configurations);

        // When
        let intent = decode_intent(
            &layout,
            &configurations,
            array![0.6, 0.4].view(),
            &[slots_classification(10, 0, 0.9)],
        )
        .unwrap();

        // Then
        assert_eq!("greet", intent.name);
        assert_eq!(vec![("person", vec![0])], names(&intent.slots));
    }

    #[test]
    fn wrong_classification_size_is_rejected() {
        let configurations = sample_configurations();
        let layout = SlotsLayout::new(&configurations);
        let result = decode_slots(
            &layout,
            1,
            &configurations[1],
            &[slots_classification(8, 0, 0.9)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn wrong_distribution_size_is_rejected() {
        let configurations = sample_configurations();
        let layout = SlotsLayout::new(&configurations);
        let result = decode_intent(
            &layout,
            &configurations,
            array![1.0].view(),
            &[slots_classification(10, 0, 0.9)],
        );
        assert!(result.is_err());
    }
}
