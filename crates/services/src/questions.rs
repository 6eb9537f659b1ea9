use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::{Rng, rng};

use quiz_core::model::{Animal, AnimalCatalog, LevelId, OPTIONS_PER_QUESTION, Question};

/// Builds the multiple-choice questions for a level.
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    catalog: Arc<AnimalCatalog>,
}

impl QuestionGenerator {
    #[must_use]
    pub fn new(catalog: Arc<AnimalCatalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &AnimalCatalog {
        &self.catalog
    }

    /// Generate `count` questions for `level_id` using the thread-local RNG.
    #[must_use]
    pub fn generate(&self, level_id: LevelId, count: u32) -> Vec<Question> {
        self.generate_with_rng(level_id, count, &mut rng())
    }

    /// Generate `count` questions for `level_id`.
    ///
    /// - Each correct answer is drawn from the level pool, independently per question.
    /// - Distractors come from the whole catalog, rejecting names already offered.
    /// - Option order is shuffled.
    pub fn generate_with_rng<R: Rng>(
        &self,
        level_id: LevelId,
        count: u32,
        rng: &mut R,
    ) -> Vec<Question> {
        let pool = self.catalog.level_pool(level_id);
        (0..count)
            .map(|_| self.build_question(&pool, rng))
            .collect()
    }

    fn build_question<R: Rng>(&self, pool: &[Arc<Animal>], rng: &mut R) -> Question {
        let correct = Arc::clone(&pool[rng.random_range(0..pool.len())]);
        let animals = self.catalog.animals();

        let mut options = Vec::with_capacity(OPTIONS_PER_QUESTION);
        options.push(Arc::clone(&correct));
        while options.len() < OPTIONS_PER_QUESTION {
            let pick = &animals[rng.random_range(0..animals.len())];
            if !options.iter().any(|o| o.name() == pick.name()) {
                options.push(Arc::clone(pick));
            }
        }
        options.shuffle(rng);

        Question::new(correct, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn generator() -> QuestionGenerator {
        QuestionGenerator::new(Arc::new(AnimalCatalog::builtin()))
    }

    fn level(id: u32) -> LevelId {
        LevelId::new(id).unwrap()
    }

    #[test]
    fn every_question_has_four_distinct_options_including_the_answer() {
        let generator = generator();
        for id in 1..=12 {
            let questions = generator.generate(level(id), 10);
            assert_eq!(questions.len(), 10);
            for q in &questions {
                assert_eq!(q.options().len(), OPTIONS_PER_QUESTION);
                let names: HashSet<_> = q.options().iter().map(|a| a.name()).collect();
                assert_eq!(names.len(), OPTIONS_PER_QUESTION);
                assert!(names.contains(q.correct_animal().name()));
            }
        }
    }

    #[test]
    fn correct_answers_come_from_the_level_pool() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(7);
        for id in 1..=8 {
            let pool: HashSet<String> = generator
                .catalog()
                .level_pool(level(id))
                .iter()
                .map(|a| a.name().to_owned())
                .collect();
            for q in generator.generate_with_rng(level(id), 25, &mut rng) {
                assert!(pool.contains(q.correct_animal().name()), "level {id}");
            }
        }
    }

    #[test]
    fn respects_requested_count() {
        let generator = generator();
        assert!(generator.generate(level(1), 0).is_empty());
        assert_eq!(generator.generate(level(3), 20).len(), 20);
    }

    #[test]
    fn same_seed_gives_same_questions() {
        let generator = generator();
        let a = generator.generate_with_rng(level(2), 10, &mut StdRng::seed_from_u64(42));
        let b = generator.generate_with_rng(level(2), 10, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn works_with_minimal_catalog() {
        let animals = ["A", "B", "C", "D"]
            .iter()
            .map(|n| Animal::new(*n, *n, "", format!("{n}.mp3"), ""))
            .collect();
        let catalog = AnimalCatalog::new(animals).unwrap();
        let generator = QuestionGenerator::new(Arc::new(catalog));
        for q in generator.generate(level(5), 10) {
            let mut names: Vec<_> = q.options().iter().map(|a| a.name()).collect();
            names.sort_unstable();
            assert_eq!(names, ["A", "B", "C", "D"]);
        }
    }
}
