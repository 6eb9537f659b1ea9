use std::sync::Arc;

use crate::model::animal::Animal;

/// Number of answer options shown for every question.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// One "which animal makes this sound?" question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    correct_animal: Arc<Animal>,
    options: Vec<Arc<Animal>>,
}

impl Question {
    /// Pairs the correct animal with its (already shuffled) options.
    ///
    /// Callers are expected to include `correct_animal` among `options`;
    /// the generator in the services crate guarantees it.
    #[must_use]
    pub fn new(correct_animal: Arc<Animal>, options: Vec<Arc<Animal>>) -> Self {
        Self {
            correct_animal,
            options,
        }
    }

    #[must_use]
    pub fn correct_animal(&self) -> &Animal {
        &self.correct_animal
    }

    #[must_use]
    pub fn options(&self) -> &[Arc<Animal>] {
        &self.options
    }

    #[must_use]
    pub fn is_correct(&self, name: &str) -> bool {
        self.correct_animal.name() == name
    }

    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|option| option.name() == name)
    }

    /// Sound the child has to recognise.
    #[must_use]
    pub fn sound_url(&self) -> &str {
        self.correct_animal.sound_url()
    }
}
