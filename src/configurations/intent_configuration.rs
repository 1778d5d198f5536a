use std::collections::HashSet;

use serde_derive::{Deserialize, Serialize};

use crate::errors::*;
use crate::utils::{IntentName, SlotName};

/// The label of the tokens which do not belong to any slot of an intent.
pub const NO_SLOT_NAME: &str = "NoSlot";

/// An intent with all the slots it can be associated with.
///
/// The slot list always ends up containing [`NO_SLOT_NAME`], appended when the caller does
/// not provide it. Duplicated slot names are removed, keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawIntentConfiguration")]
pub struct IntentConfiguration {
    name: IntentName,
    slots: Vec<SlotName>,
}

#[derive(Deserialize)]
struct RawIntentConfiguration {
    name: IntentName,
    slots: Vec<SlotName>,
}

impl From<RawIntentConfiguration> for IntentConfiguration {
    fn from(raw: RawIntentConfiguration) -> Self {
        Self::new(raw.name, raw.slots)
    }
}

impl IntentConfiguration {
    pub fn new<N, I, S>(name: N, slots: I) -> Self
    where
        N: Into<IntentName>,
        I: IntoIterator<Item = S>,
        S: Into<SlotName>,
    {
        let mut seen = HashSet::new();
        let mut slots: Vec<SlotName> = slots
            .into_iter()
            .map(|slot| slot.into())
            .filter(|slot| seen.insert(slot.clone()))
            .collect();
        if !seen.contains(NO_SLOT_NAME) {
            slots.push(NO_SLOT_NAME.to_string());
        }
        Self {
            name: name.into(),
            slots,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All the slot names of this intent, `NoSlot` included.
    pub fn slots(&self) -> &[SlotName] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get_slot_index(&self, slot_name: &str) -> Result<usize> {
        self.slots
            .iter()
            .position(|slot| slot == slot_name)
            .ok_or_else(|| {
                FramesExtractorError::UnknownSlot {
                    intent: self.name.clone(),
                    slot: slot_name.to_string(),
                }
                .into()
            })
    }

    pub fn no_slot_index(&self) -> usize {
        // `NoSlot` is inserted at construction
        self.slots
            .iter()
            .position(|slot| slot == NO_SLOT_NAME)
            .unwrap_or(self.slots.len() - 1)
    }
}

/// Checks that a list of intent configurations can back a model: it must not be empty and
/// intent names must be unique.
pub fn validate_configurations(configurations: &[IntentConfiguration]) -> Result<()> {
    if configurations.is_empty() {
        return Err(FramesExtractorError::ModelConfiguration(
            "at least one intent configuration is required".to_string(),
        )
        .into());
    }
    let mut names = HashSet::with_capacity(configurations.len());
    for configuration in configurations {
        if !names.insert(configuration.name()) {
            return Err(FramesExtractorError::ModelConfiguration(format!(
                "duplicated intent name '{}'",
                configuration.name()
            ))
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_slot_is_appended() {
        // When
        let configuration = IntentConfiguration::new("greet", vec!["person"]);

        // Then
        assert_eq!(&["person".to_string(), "NoSlot".to_string()], configuration.slots());
        assert_eq!(1, configuration.no_slot_index());
    }

    #[test]
    fn no_slot_is_not_duplicated() {
        // When
        let configuration =
            IntentConfiguration::new("greet", vec!["NoSlot", "person", "person"]);

        // Then
        assert_eq!(&["NoSlot".to_string(), "person".to_string()], configuration.slots());
        assert_eq!(0, configuration.no_slot_index());
    }

    #[test]
    fn intent_without_slots_only_has_no_slot() {
        let configuration = IntentConfiguration::new("stop", Vec::<String>::new());
        assert_eq!(1, configuration.len());
        assert_eq!(0, configuration.no_slot_index());
    }

    #[test]
    fn get_slot_index_works() {
        // Given
        let configuration = IntentConfiguration::new("book_flight", vec!["origin", "destination"]);

        // When
        let index = configuration.get_slot_index("destination").unwrap();

        // Then
        assert_eq!(1, index);
    }

    #[test]
    fn get_slot_index_fails_on_unknown_slot() {
        // Given
        let configuration = IntentConfiguration::new("book_flight", vec!["origin", "destination"]);

        // When
        let error = configuration.get_slot_index("airline").unwrap_err();

        // Then
        match error.downcast_ref::<FramesExtractorError>() {
            Some(FramesExtractorError::UnknownSlot { intent, slot }) => {
                assert_eq!("book_flight", intent.as_str());
                assert_eq!("airline", slot.as_str());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn equality_depends_on_name_and_slots() {
        let a = IntentConfiguration::new("greet", vec!["person"]);
        let b = IntentConfiguration::new("greet", vec!["person", "NoSlot"]);
        let c = IntentConfiguration::new("greet", vec!["name"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn deserialization_appends_no_slot() {
        // Given
        let data = r#"{"name": "greet", "slots": ["person"]}"#;

        // When
        let configuration: IntentConfiguration = serde_json::from_str(data).unwrap();

        // Then
        assert_eq!(IntentConfiguration::new("greet", vec!["person"]), configuration);
    }

    #[test]
    fn validate_configurations_rejects_empty_list() {
        let error = validate_configurations(&[]).unwrap_err();
        match error.downcast_ref::<FramesExtractorError>() {
            Some(FramesExtractorError::ModelConfiguration(_)) => (),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn validate_configurations_rejects_duplicated_names() {
        // Given
        let configurations = vec![
            IntentConfiguration::new("greet", vec!["person"]),
            IntentConfiguration::new("greet", vec!["name"]),
        ];

        // When
        let result = validate_configurations(&configurations);

        // Then
        assert!(result.is_err());
    }
}
