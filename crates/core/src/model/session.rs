use std::sync::Arc;

use thiserror::Error;

use crate::labels;
use crate::model::{LevelId, Question, SessionToken, Stars};
use crate::scoring::stars_for;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a level needs at least one question")]
    NoQuestions,

    #[error("current question was already answered")]
    AlreadyAnswered,

    #[error("current question has not been answered yet")]
    AwaitingAnswer,

    #[error("{0} is not one of the offered options")]
    UnknownOption(String),
}

/// What the child picked for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: String,
    pub is_correct: bool,
}

/// Final tally of a played level, shown on the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOutcome {
    pub level_id: LevelId,
    pub score: u32,
    pub total: u32,
    pub stars: Stars,
}

impl LevelOutcome {
    #[must_use]
    pub fn new(level_id: LevelId, score: u32, total: u32) -> Self {
        Self {
            level_id,
            score,
            total,
            stars: stars_for(score, total),
        }
    }

    #[must_use]
    pub fn headline(&self) -> &'static str {
        if self.stars.is_max() {
            labels::RESULT_PERFECT
        } else if self.stars.is_earned() {
            labels::RESULT_PASSED
        } else {
            labels::RESULT_FAILED
        }
    }
}

/// Result of moving past an answered question.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Next(PlayingSession),
    Finished(LevelOutcome),
}

/// One playthrough of a level.
///
/// Values are never mutated in place: every transition returns a new session,
/// and the previous one stays valid for whoever still holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayingSession {
    token: SessionToken,
    level_id: LevelId,
    questions: Arc<[Question]>,
    current: usize,
    score: u32,
    feedback: Option<AnswerFeedback>,
}

impl PlayingSession {
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` if `questions` is empty.
    pub fn start(level_id: LevelId, questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        Ok(Self {
            token: SessionToken::generate(),
            level_id,
            questions: questions.into(),
            current: 0,
            score: 0,
            feedback: None,
        })
    }

    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.token
    }

    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    /// Records the child's pick for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyAnswered` if feedback is already showing,
    /// `SessionError::UnknownOption` if `name` was not offered.
    pub fn answer(&self, name: &str) -> Result<(Self, AnswerFeedback), SessionError> {
        if self.feedback.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        let question = self.current_question();
        if !question.has_option(name) {
            return Err(SessionError::UnknownOption(name.to_owned()));
        }

        let feedback = AnswerFeedback {
            selected: name.to_owned(),
            is_correct: question.is_correct(name),
        };
        let next = Self {
            score: self.score + u32::from(feedback.is_correct),
            feedback: Some(feedback.clone()),
            ..self.clone()
        };
        Ok((next, feedback))
    }

    /// Moves to the next question, or ends the level after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AwaitingAnswer` if the current question is unanswered.
    pub fn advance(&self) -> Result<Advance, SessionError> {
        if self.feedback.is_none() {
            return Err(SessionError::AwaitingAnswer);
        }
        if self.is_last_question() {
            return Ok(Advance::Finished(LevelOutcome::new(
                self.level_id,
                self.score,
                self.total_questions(),
            )));
        }
        Ok(Advance::Next(Self {
            current: self.current + 1,
            feedback: None,
            ..self.clone()
        }))
    }
}

/// The screen the game is on.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GameState {
    #[default]
    Map,
    Playing(PlayingSession),
    Result(LevelOutcome),
}

impl GameState {
    #[must_use]
    pub fn session(&self) -> Option<&PlayingSession> {
        match self {
            GameState::Playing(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&LevelOutcome> {
        match self {
            GameState::Result(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self, GameState::Playing(_))
    }
}
