use std::sync::Arc;

use tracing::{debug, info};

use quiz_core::GameConfig;
use quiz_core::model::{
    Advance, AnimalCatalog, AnswerFeedback, GameState, LevelId, LevelOutcome, LevelRecord,
    PlayingSession, quick_play_level,
};

use super::timers::{Deferred, DeferredAction, SessionTimers};
use crate::audio::{AudioChannel, AudioCue};
use crate::error::GameError;
use crate::progress_store::ProgressStore;
use crate::questions::QuestionGenerator;

/// What handling a fired timer did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredOutcome {
    /// The timer belonged to a session or question that is no longer current.
    Ignored,
    PromptPlayed,
    NextQuestion,
    Finished(LevelOutcome),
}

/// Drives the map → play → result flow.
///
/// The owner feeds it user actions and fired timers one at a time; every
/// transition swaps in a new `GameState` value. Leaving a session cancels the
/// timers it scheduled.
pub struct GameController {
    config: GameConfig,
    generator: QuestionGenerator,
    progress: ProgressStore,
    audio: AudioChannel,
    timers: SessionTimers,
    levels: Vec<LevelRecord>,
    state: GameState,
}

impl GameController {
    /// Build a controller on the map screen with stored progress loaded.
    pub async fn new(
        config: GameConfig,
        catalog: Arc<AnimalCatalog>,
        progress: ProgressStore,
        audio: AudioChannel,
    ) -> Self {
        let levels = progress.load().await;
        Self {
            config,
            generator: QuestionGenerator::new(catalog),
            progress,
            audio,
            timers: SessionTimers::new(),
            levels,
            state: GameState::Map,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn levels(&self) -> &[LevelRecord] {
        &self.levels
    }

    #[must_use]
    pub fn level(&self, id: LevelId) -> Option<&LevelRecord> {
        self.levels.iter().find(|record| record.id == id)
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &AnimalCatalog {
        self.generator.catalog()
    }

    /// Timers scheduled and not yet fired.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Start a fresh playthrough of an unlocked level.
    ///
    /// # Errors
    ///
    /// Returns `GameError::UnknownLevel` or `GameError::LevelLocked`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since it schedules timers.
    pub fn start_level(&mut self, level_id: LevelId) -> Result<(), GameError> {
        let record = self
            .level(level_id)
            .ok_or(GameError::UnknownLevel(level_id))?;
        if record.is_locked {
            return Err(GameError::LevelLocked(level_id));
        }

        self.timers.cancel_all();
        let questions = self
            .generator
            .generate(level_id, self.config.questions_per_level());
        let session = PlayingSession::start(level_id, questions)?;
        debug!(level = %level_id, token = %session.token(), "level started");

        self.schedule(&session, DeferredAction::PlayPrompt);
        self.state = GameState::Playing(session);
        Ok(())
    }

    /// Start the level picked by the map's quick-play button.
    ///
    /// # Errors
    ///
    /// Returns `GameError` if the picked level cannot be started.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since it schedules timers.
    pub fn quick_play(&mut self) -> Result<(), GameError> {
        self.start_level(quick_play_level(&self.levels))
    }

    /// Answer the current question with the option called `name`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotPlaying` outside a level, or `GameError::Session`
    /// if the question was already answered or `name` is not an option.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since it schedules timers.
    pub fn answer(&mut self, name: &str) -> Result<AnswerFeedback, GameError> {
        let GameState::Playing(session) = &self.state else {
            return Err(GameError::NotPlaying);
        };
        let (answered, feedback) = session.answer(name)?;

        self.audio.cue(if feedback.is_correct {
            AudioCue::Correct
        } else {
            AudioCue::Wrong
        });
        self.timers.cancel(DeferredAction::PlayPrompt);
        self.schedule(&answered, DeferredAction::Advance);
        self.state = GameState::Playing(answered);
        Ok(feedback)
    }

    /// Play the current question's sound again.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotPlaying` outside a level.
    pub fn replay_sound(&self) -> Result<(), GameError> {
        let session = self.state.session().ok_or(GameError::NotPlaying)?;
        self.audio.play(session.current_question().sound_url());
        Ok(())
    }

    /// The level the result screen offers next, if any.
    #[must_use]
    pub fn next_level_id(&self, outcome: &LevelOutcome) -> Option<LevelId> {
        if !outcome.stars.is_earned() {
            return None;
        }
        outcome
            .level_id
            .next()
            .filter(|id| self.config.contains(*id) && self.level(*id).is_some())
    }

    /// Continue from a passed level to the following one.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoResult` when not on the result screen and
    /// `GameError::NoNextLevel` if the level was failed or is the last one.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since it schedules timers.
    pub fn next_level(&mut self) -> Result<(), GameError> {
        let outcome = *self.state.outcome().ok_or(GameError::NoResult)?;
        let next = self
            .next_level_id(&outcome)
            .ok_or(GameError::NoNextLevel(outcome.level_id))?;
        self.start_level(next)
    }

    /// Play the level on the result screen again.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoResult` when not on the result screen.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since it schedules timers.
    pub fn retry_level(&mut self) -> Result<(), GameError> {
        let outcome = self.state.outcome().ok_or(GameError::NoResult)?;
        let level_id = outcome.level_id;
        self.start_level(level_id)
    }

    /// Return to the map from anywhere, abandoning any running level.
    pub fn back_to_map(&mut self) {
        self.timers.cancel_all();
        if let GameState::Playing(session) = &self.state {
            debug!(level = %session.level_id(), token = %session.token(), "level abandoned");
        }
        self.state = GameState::Map;
    }

    /// Wait for the next fired timer.
    ///
    /// Cancel safe, so it can sit in a `select!` next to user input.
    pub async fn next_deferred(&mut self) -> Option<Deferred> {
        self.timers.next().await
    }

    /// Act on a fired timer if it still belongs to the current question.
    pub async fn handle_deferred(&mut self, event: Deferred) -> DeferredOutcome {
        let GameState::Playing(session) = &self.state else {
            debug!(?event, "timer fired outside a level");
            return DeferredOutcome::Ignored;
        };
        if session.token() != event.token || session.current_index() != event.question {
            debug!(?event, "stale timer ignored");
            return DeferredOutcome::Ignored;
        }

        match event.action {
            DeferredAction::PlayPrompt => {
                if session.feedback().is_some() {
                    return DeferredOutcome::Ignored;
                }
                self.audio.play(session.current_question().sound_url());
                DeferredOutcome::PromptPlayed
            }
            DeferredAction::Advance => match session.advance() {
                Ok(Advance::Next(next)) => {
                    self.schedule(&next, DeferredAction::PlayPrompt);
                    self.state = GameState::Playing(next);
                    DeferredOutcome::NextQuestion
                }
                Ok(Advance::Finished(outcome)) => {
                    self.finish_level(outcome).await;
                    DeferredOutcome::Finished(outcome)
                }
                Err(err) => {
                    debug!(error = %err, "advance ignored");
                    DeferredOutcome::Ignored
                }
            },
        }
    }

    async fn finish_level(&mut self, outcome: LevelOutcome) {
        self.timers.cancel_all();
        self.levels = self
            .progress
            .record_result(&self.levels, outcome.level_id, outcome.stars)
            .await;
        info!(
            level = %outcome.level_id,
            score = outcome.score,
            total = outcome.total,
            stars = outcome.stars.value(),
            "level finished"
        );
        self.state = GameState::Result(outcome);
        if outcome.stars.is_earned() {
            self.audio.cue(AudioCue::Applause);
        }
    }

    fn schedule(&mut self, session: &PlayingSession, action: DeferredAction) {
        let delay = match action {
            DeferredAction::PlayPrompt => self.config.prompt_delay(),
            DeferredAction::Advance => self.config.advance_delay(),
        };
        self.timers.schedule(
            delay,
            Deferred {
                token: session.token(),
                question: session.current_index(),
                action,
            },
        );
    }
}
