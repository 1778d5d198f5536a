use std::collections::BTreeSet;
use std::ops::Range;

use serde_derive::Serialize;

use crate::configurations::IntentConfiguration;

/// Position of a slot label inside a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BioTag {
    Beginning,
    Inside,
}

impl BioTag {
    fn offset(self) -> usize {
        match self {
            BioTag::Beginning => 0,
            BioTag::Inside => 1,
        }
    }
}

/// A class of the flattened slots classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotClass {
    pub intent_index: usize,
    /// Index of the slot within its intent configuration
    pub slot_index: usize,
    pub tag: BioTag,
}

/// Placement of every intent's slots within the single output of the slots classifier.
///
/// Slots of all intents are concatenated following the order of the configurations. Each
/// slot then takes two adjacent classes, its `Beginning` variant followed by its `Inside`
/// variant, so that the global index of a slot class is
/// `2 * (slots_offsets[intent] + slot_index) + tag`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotsLayout {
    slots_offsets: Vec<usize>,
    slots_sizes: Vec<usize>,
    no_slot_indices: BTreeSet<usize>,
}

impl SlotsLayout {
    pub fn new(configurations: &[IntentConfiguration]) -> Self {
        let slots_sizes: Vec<usize> = configurations.iter().map(|c| c.len()).collect();
        let slots_offsets: Vec<usize> = slots_sizes
            .iter()
            .scan(0, |offset, size| {
                let current = *offset;
                *offset += size;
                Some(current)
            })
            .collect();
        let no_slot_indices = configurations
            .iter()
            .zip(slots_offsets.iter())
            .flat_map(|(configuration, offset)| {
                let flat_index = offset + configuration.no_slot_index();
                vec![2 * flat_index, 2 * flat_index + 1]
            })
            .collect();
        Self {
            slots_offsets,
            slots_sizes,
            no_slot_indices,
        }
    }

    /// Offset of the first slot of each intent within the concatenation of all slots
    pub fn slots_offsets(&self) -> &[usize] {
        &self.slots_offsets
    }

    /// Global indices of the `NoSlot` classes, both `Beginning` and `Inside` variants
    pub fn no_slot_indices(&self) -> &BTreeSet<usize> {
        &self.no_slot_indices
    }

    pub fn nb_intents(&self) -> usize {
        self.slots_offsets.len()
    }

    /// Number of slots of all the intents, before the BIO expansion
    pub fn slots_count(&self) -> usize {
        self.slots_sizes.iter().sum()
    }

    /// Number of classes of the slots classification
    pub fn output_size(&self) -> usize {
        2 * self.slots_count()
    }

    /// Range of the slots of the given intent within the concatenation of all slots.
    ///
    /// Panics if `intent_index` is out of bounds.
    pub fn slots_range(&self, intent_index: usize) -> Range<usize> {
        let offset = self.slots_offsets[intent_index];
        offset..offset + self.slots_sizes[intent_index]
    }

    /// Range of the slots classes of the given intent within the slots classification
    pub fn bio_range(&self, intent_index: usize) -> Range<usize> {
        let range = self.slots_range(intent_index);
        2 * range.start..2 * range.end
    }

    pub fn global_index(&self, intent_index: usize, slot_index: usize, tag: BioTag) -> usize {
        debug_assert!(slot_index < self.slots_sizes[intent_index]);
        2 * (self.slots_offsets[intent_index] + slot_index) + tag.offset()
    }

    /// Inverse of [`global_index`](#method.global_index), `None` when out of the output range
    pub fn decode_global_index(&self, global_index: usize) -> Option<SlotClass> {
        if global_index >= self.output_size() {
            return None;
        }
        let flat_index = global_index / 2;
        let tag = if global_index % 2 == 0 {
            BioTag::Beginning
        } else {
            BioTag::Inside
        };
        // Offsets are strictly increasing as every intent has at least its `NoSlot`
        let intent_index = match self.slots_offsets.binary_search(&flat_index) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        Some(SlotClass {
            intent_index,
            slot_index: flat_index - self.slots_offsets[intent_index],
            tag,
        })
    }

    pub fn is_no_slot(&self, global_index: usize) -> bool {
        self.no_slot_indices.contains(&global_index)
    }
}
