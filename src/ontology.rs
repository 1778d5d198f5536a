use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Write;

use itertools::Itertools;
use serde_derive::Serialize;

use crate::utils::{IntentName, SlotName};

/// A token of a sentence, as produced by a tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Position of the token within its sentence
    pub index: usize,
    pub form: String,
}

impl Token {
    pub fn new<S: Into<String>>(index: usize, form: S) -> Self {
        Self {
            index,
            form: form.into(),
        }
    }
}

/// A token covered by a slot, along with the probability of its slot label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotToken {
    pub index: usize,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    pub name: SlotName,
    /// Contiguous tokens, in sentence order
    pub tokens: Vec<SlotToken>,
}

impl Slot {
    pub fn token_indices(&self) -> Vec<usize> {
        self.tokens.iter().map(|t| t.index).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intent {
    pub name: IntentName,
    pub slots: Vec<Slot>,
    pub score: f32,
}

/// Probability of each configured intent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub map: HashMap<IntentName, f32>,
}

impl Distribution {
    pub fn get(&self, intent_name: &str) -> Option<f32> {
        self.map.get(intent_name).cloned()
    }

    /// Intents sorted by decreasing probability, then by name
    pub fn sorted(&self) -> Vec<(&str, f32)> {
        self.map
            .iter()
            .map(|(name, probability)| (name.as_str(), *probability))
            .sorted_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.0.cmp(b.0))
            })
            .collect()
    }
}

/// An intent extracted from a sentence, along with the full intents distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub intent: Intent,
    pub distribution: Distribution,
}

impl Frame {
    /// Plain text rendering of the frame, using the forms of the sentence tokens
    pub fn render(&self, tokens: &[Token]) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Intent: {}", self.intent.name);
        let slots = if self.intent.slots.is_empty() {
            "None".to_string()
        } else {
            self.intent
                .slots
                .iter()
                .map(|slot| {
                    let forms = slot
                        .tokens
                        .iter()
                        .map(|token| {
                            tokens
                                .iter()
                                .find(|t| t.index == token.index)
                                .map(|t| t.form.as_str())
                                .unwrap_or("?")
                        })
                        .join(" ");
                    format!("({} {})", slot.name, forms)
                })
                .join(", ")
        };
        let _ = writeln!(output, "Slots: {}", slots);
        let _ = writeln!(output, "Distribution:");
        for (name, probability) in self.distribution.sorted() {
            let _ = writeln!(output, "\t[{:5.2} %] {}", 100.0 * probability, name);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    fn sample_frame() -> Frame {
        Frame {
            intent: Intent {
                name: "book_flight".to_string(),
                slots: vec![
                    Slot {
                        name: "origin".to_string(),
                        tokens: vec![
                            SlotToken { index: 1, score: 0.9 },
                            SlotToken { index: 2, score: 0.8 },
                        ],
                    },
                    Slot {
                        name: "destination".to_string(),
                        tokens: vec![SlotToken { index: 4, score: 0.7 }],
                    },
                ],
                score: 0.75,
            },
            distribution: Distribution {
                map: hashmap! {
                    "greet".to_string() => 0.25,
                    "book_flight".to_string() => 0.75,
                },
            },
        }
    }

    #[test]
    fn distribution_is_sorted_by_probability() {
        // Given
        let distribution = Distribution {
            map: hashmap! {
                "a".to_string() => 0.2,
                "b".to_string() => 0.6,
                "c".to_string() => 0.2,
            },
        };

        // When
        let sorted = distribution.sorted();

        // Then
        assert_eq!(vec![("b", 0.6), ("a", 0.2), ("c", 0.2)], sorted);
        assert_eq!(Some(0.6), distribution.get("b"));
        assert_eq!(None, distribution.get("d"));
    }

    #[test]
    fn frame_rendering_works() {
        // Given
        let tokens = vec![
            Token::new(0, "from"),
            Token::new(1, "New"),
            Token::new(2, "York"),
            Token::new(3, "to"),
            Token::new(4, "Paris"),
        ];

        // When
        let text = sample_frame().render(&tokens);

        // Then
        let expected = "Intent: book_flight\n\
                        Slots: (origin New York), (destination Paris)\n\
                        Distribution:\n\
                        \t[75.00 %] book_flight\n\
                        \t[25.00 %] greet\n";
        assert_eq!(expected, text);
    }

    #[test]
    fn frame_without_slots_renders_none() {
        // Given
        let mut frame = sample_frame();
        frame.intent.slots.clear();

        // When
        let text = frame.render(&[]);

        // Then
        assert!(text.contains("Slots: None\n"));
    }

    #[test]
    fn frame_serialization_works() {
        // Given
        let intent = sample_frame().intent;

        // When
        let json = serde_json::to_value(&intent).unwrap();

        // Then
        assert_eq!("book_flight", json["name"]);
        assert_eq!("origin", json["slots"][0]["name"]);
        assert_eq!(2, json["slots"][0]["tokens"][1]["index"]);
        assert_eq!(0.75, json["score"]);
    }
}
