//! Star rating of a finished level.

use crate::model::Stars;

/// Tenths of the question count needed for one, two and three stars.
///
/// With the default ten questions these are the plain counts 3, 6 and 9.
const THRESHOLD_TENTHS: [(u64, Stars); 3] = [(9, Stars::THREE), (6, Stars::TWO), (3, Stars::ONE)];

/// Stars earned for `score` correct answers out of `questions_per_level`.
///
/// Thresholds scale with the number of questions: 90% for three stars, 60% for
/// two, 30% for one. A level without questions earns nothing.
#[must_use]
pub fn stars_for(score: u32, questions_per_level: u32) -> Stars {
    if questions_per_level == 0 {
        return Stars::ZERO;
    }
    let scaled = u64::from(score) * 10;
    let total = u64::from(questions_per_level);
    THRESHOLD_TENTHS
        .iter()
        .find(|(tenths, _)| scaled >= tenths * total)
        .map_or(Stars::ZERO, |(_, stars)| *stars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_question_thresholds() {
        let cases = [
            (0, 0),
            (2, 0),
            (3, 1),
            (5, 1),
            (6, 2),
            (8, 2),
            (9, 3),
            (10, 3),
        ];
        for (score, expected) in cases {
            assert_eq!(stars_for(score, 10).value(), expected, "score {score}");
        }
    }

    #[test]
    fn thresholds_scale_with_question_count() {
        assert_eq!(stars_for(18, 20), Stars::THREE);
        assert_eq!(stars_for(17, 20), Stars::TWO);
        assert_eq!(stars_for(12, 20), Stars::TWO);
        assert_eq!(stars_for(6, 20), Stars::ONE);
        assert_eq!(stars_for(5, 20), Stars::ZERO);

        // 5 questions: 4.5 / 3 / 1.5 correct answers needed
        assert_eq!(stars_for(5, 5), Stars::THREE);
        assert_eq!(stars_for(4, 5), Stars::TWO);
        assert_eq!(stars_for(2, 5), Stars::ONE);
        assert_eq!(stars_for(1, 5), Stars::ZERO);
    }

    #[test]
    fn empty_level_earns_no_stars() {
        assert_eq!(stars_for(0, 0), Stars::ZERO);
    }
}
