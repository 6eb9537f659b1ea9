use std::io::{self, Write};

use quiz_core::labels;
use quiz_core::model::{GameState, LevelId, LevelRecord, PlayingSession, SessionError};
use services::{DeferredOutcome, GameController, GameError};
use tokio::io::{AsyncBufReadExt, BufReader};

/// A line typed by the player, interpreted for the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Quit,
    Start(LevelId),
    QuickPlay,
    Answer(usize),
    Replay,
    Map,
    Next,
    Retry,
    Unknown,
}

fn parse_input(state: &GameState, line: &str) -> Input {
    let line = line.trim();
    match state {
        GameState::Map => match line {
            "q" => Input::Quit,
            "p" => Input::QuickPlay,
            _ => line.parse().map_or(Input::Unknown, Input::Start),
        },
        GameState::Playing(_) => match line {
            "s" => Input::Replay,
            "m" | "q" => Input::Map,
            _ => match line.parse::<usize>() {
                Ok(n) if n >= 1 => Input::Answer(n - 1),
                _ => Input::Unknown,
            },
        },
        GameState::Result(_) => match line {
            "n" => Input::Next,
            "r" => Input::Retry,
            "m" => Input::Map,
            "q" => Input::Quit,
            _ => Input::Unknown,
        },
    }
}

fn apply(game: &mut GameController, input: Input) -> Result<(), GameError> {
    match input {
        Input::Start(id) => game.start_level(id),
        Input::QuickPlay => game.quick_play(),
        Input::Answer(index) => {
            let session = game.state().session().ok_or(GameError::NotPlaying)?;
            let name = session
                .current_question()
                .options()
                .get(index)
                .map(|animal| animal.name().to_owned())
                .ok_or_else(|| SessionError::UnknownOption(format!("#{}", index + 1)))?;
            game.answer(&name).map(|_| ())
        }
        Input::Replay => game.replay_sound(),
        Input::Map => {
            game.back_to_map();
            Ok(())
        }
        Input::Next => game.next_level(),
        Input::Retry => game.retry_level(),
        Input::Quit | Input::Unknown => Ok(()),
    }
}

/// Play until the player quits or stdin closes.
pub async fn run(mut game: GameController) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = io::stdout();
    render(&game, &mut out)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = parse_input(game.state(), &line);
                if input == Input::Quit {
                    break;
                }
                if let Err(err) = apply(&mut game, input) {
                    writeln!(out, "! {err}")?;
                }
                render(&game, &mut out)?;
            }
            Some(event) = game.next_deferred() => {
                match game.handle_deferred(event).await {
                    DeferredOutcome::NextQuestion | DeferredOutcome::Finished(_) => {
                        render(&game, &mut out)?;
                    }
                    DeferredOutcome::PromptPlayed => {
                        if let Some(session) = game.state().session() {
                            writeln!(out, "♪ {}", session.current_question().correct_animal().sound_hint())?;
                        }
                    }
                    DeferredOutcome::Ignored => {}
                }
            }
        }
    }
    Ok(())
}

pub fn render(game: &GameController, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    match game.state() {
        GameState::Map => {
            render_map(game.levels(), out)?;
            writeln!(out, "[1-{}] level   [p] {}   [q] quit", game.levels().len(), labels::QUICK_PLAY)?;
        }
        GameState::Playing(session) => render_playing(session, out)?,
        GameState::Result(outcome) => {
            writeln!(out, "{}", outcome.stars)?;
            writeln!(out, "{}", outcome.headline())?;
            writeln!(out, "{} / {}", outcome.score, outcome.total)?;
            if game.next_level_id(outcome).is_some() {
                write!(out, "[n] {}   ", labels::NEXT_LEVEL)?;
            }
            writeln!(out, "[r] {}   [m] {}   [q] quit", labels::RETRY, labels::BACK_TO_MAP)?;
        }
    }
    out.flush()
}

pub fn render_map(levels: &[LevelRecord], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", labels::MAP_TITLE)?;
    for level in levels {
        if level.is_locked {
            writeln!(out, "  {:>2}  🔒", level.id)?;
        } else {
            writeln!(out, "  {:>2}  {}", level.id, level.stars)?;
        }
    }
    Ok(())
}

fn render_playing(session: &PlayingSession, out: &mut impl Write) -> io::Result<()> {
    let question = session.current_question();
    writeln!(
        out,
        "{} / {}    {}",
        session.current_index() + 1,
        session.total_questions(),
        labels::QUESTION_PROMPT
    )?;
    writeln!(out, "[s] {}", labels::LISTEN_HINT)?;
    for (i, option) in question.options().iter().enumerate() {
        let mark = match session.feedback() {
            Some(_) if question.is_correct(option.name()) => " ✔",
            Some(feedback) if feedback.selected == option.name() => " ✘",
            _ => "",
        };
        writeln!(out, "  [{}] {}{}", i + 1, option.arabic_name(), mark)?;
    }
    writeln!(out, "[m] {}", labels::BACK_TO_MAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use quiz_core::model::{AnimalCatalog, LevelOutcome, Question, default_levels};
    use services::{AppServices, GameConfig, SilentAudio};

    fn playing() -> GameState {
        let catalog = AnimalCatalog::builtin();
        let options: Vec<_> = catalog.iter().take(4).cloned().collect();
        let question = Question::new(options[0].clone(), options);
        GameState::Playing(PlayingSession::start(LevelId::FIRST, vec![question]).unwrap())
    }

    #[test]
    fn map_input_selects_levels() {
        let map = GameState::Map;
        assert_eq!(parse_input(&map, "3"), Input::Start(LevelId::new(3).unwrap()));
        assert_eq!(parse_input(&map, " p "), Input::QuickPlay);
        assert_eq!(parse_input(&map, "0"), Input::Unknown);
        assert_eq!(parse_input(&map, "q"), Input::Quit);
    }

    #[test]
    fn playing_input_picks_options() {
        let state = playing();
        assert_eq!(parse_input(&state, "1"), Input::Answer(0));
        assert_eq!(parse_input(&state, "0"), Input::Unknown);
        assert_eq!(parse_input(&state, "s"), Input::Replay);
        assert_eq!(parse_input(&state, "q"), Input::Map);
    }

    #[test]
    fn result_input_offers_next_and_retry() {
        let state = GameState::Result(LevelOutcome::new(LevelId::FIRST, 9, 10));
        assert_eq!(parse_input(&state, "n"), Input::Next);
        assert_eq!(parse_input(&state, "r"), Input::Retry);
        assert_eq!(parse_input(&state, "m"), Input::Map);
    }

    #[test]
    fn map_shows_locks_and_stars() {
        let mut out = Vec::new();
        render_map(&default_levels(2), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(labels::MAP_TITLE));
        assert!(text.contains("1  ☆☆☆"));
        assert!(text.contains("2  🔒"));
    }

    #[tokio::test]
    async fn option_number_past_the_end_is_rejected() {
        let services = AppServices::in_memory(GameConfig::default(), Arc::new(SilentAudio::new()));
        let mut game = services.game().await;
        game.start_level(LevelId::FIRST).unwrap();

        let err = apply(&mut game, Input::Answer(6)).unwrap_err();
        assert_eq!(
            err,
            GameError::Session(SessionError::UnknownOption("#7".into()))
        );
        assert!(game.state().session().unwrap().feedback().is_none());

        apply(&mut game, Input::Answer(0)).unwrap();
        assert!(game.state().session().unwrap().feedback().is_some());
    }
}
