use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use bombbox_core::*;
use rand::prelude::*;
use serde::Serialize;

use crate::render;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum OutputMode {
    Text,
    Json,
}

/// Pause before each machine move, drawn uniformly from `min_ms..=max_ms`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct ThinkDelay {
    min_ms: u64,
    max_ms: u64,
}

impl ThinkDelay {
    pub(crate) fn from_millis(a: u64, b: u64) -> Self {
        Self {
            min_ms: a.min(b),
            max_ms: a.max(b),
        }
    }

    fn sample(self, rng: &mut SmallRng) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct SessionOptions {
    pub think: ThinkDelay,
    pub mode: OutputMode,
    pub seed: u64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum GameEnd {
    Finished(Winner),
    Abandoned,
}

#[derive(Serialize)]
struct Frame<'a> {
    state: &'a GameState,
    boxes: Vec<BoxView>,
    winner: Option<Winner>,
}

/// Runs games between the human on `input` and the machine policy until the
/// human stops, rendering every state change to `output`.
pub(crate) struct Session<R, W> {
    input: R,
    output: W,
    options: SessionOptions,
    rng: SmallRng,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub(crate) fn new(input: R, output: W, options: SessionOptions) -> Self {
        Self {
            input,
            output,
            rng: SmallRng::seed_from_u64(options.seed),
            options,
        }
    }

    /// Plays games starting from `config` until the human declines another
    /// one, quits, or input ends. Returns how each game ended.
    pub(crate) fn run(mut self, config: GameConfig) -> anyhow::Result<Vec<GameEnd>> {
        let mut config = config;
        let mut games = Vec::new();
        loop {
            let Some(mut engine) = self.start(&mut config)? else {
                return Ok(games);
            };
            let end = self.play_game(&mut engine)?;
            games.push(end);
            if end == GameEnd::Abandoned || !self.prompt_again()? {
                return Ok(games);
            }
        }
    }

    /// Starts a game with a fresh board, asking for new counts while `config`
    /// is rejected. `None` when input ends first.
    fn start(&mut self, config: &mut GameConfig) -> anyhow::Result<Option<TurnEngine>> {
        let mut engine = TurnEngine::new();
        loop {
            let seed = self.rng.random();
            match engine.start_game(*config, seed) {
                Ok(()) => return Ok(Some(engine)),
                Err(err @ GameError::InvalidConfiguration { .. }) => {
                    log::warn!("{}", err);
                    self.notice(&format!("{err}."))?;
                    match self.prompt_config()? {
                        Some(next) => *config = next,
                        None => return Ok(None),
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn play_game(&mut self, engine: &mut TurnEngine) -> anyhow::Result<GameEnd> {
        self.emit(engine)?;
        while !engine.is_finished() {
            let decision = match engine.active_turn() {
                Side::Player => match self.prompt_decision()? {
                    Some(decision) => decision,
                    None => return Ok(GameEnd::Abandoned),
                },
                Side::Machine => {
                    let think = self.options.think.sample(&mut self.rng);
                    if !think.is_zero() {
                        thread::sleep(think);
                    }
                    engine.machine_decision()?
                }
            };
            engine.resolve_box(decision)?;
            self.emit(engine)?;
        }
        Ok(GameEnd::Finished(engine.winner()?))
    }

    /// Reads the player's choice, `None` when they quit or input ends.
    fn prompt_decision(&mut self) -> anyhow::Result<Option<Decision>> {
        loop {
            let Some(answer) =
                self.read_answer("[o] open it yourself, [f] force the machine, [q] quit > ")?
            else {
                return Ok(None);
            };
            match answer.as_str() {
                "o" | "open" => return Ok(Some(Decision::OpenSelf)),
                "f" | "force" => return Ok(Some(Decision::ForceOpponent)),
                "q" | "quit" => return Ok(None),
                other => self.notice(&format!("Unrecognized choice {other:?}."))?,
            }
        }
    }

    fn prompt_again(&mut self) -> anyhow::Result<bool> {
        loop {
            let Some(answer) = self.read_answer("Play another game? [y/n] > ")? else {
                return Ok(false);
            };
            match answer.as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                other => self.notice(&format!("Unrecognized choice {other:?}."))?,
            }
        }
    }

    fn prompt_config(&mut self) -> anyhow::Result<Option<GameConfig>> {
        let Some(boxes) = self.prompt_count("Number of boxes > ")? else {
            return Ok(None);
        };
        let Some(bombs) = self.prompt_count("Number of bombs > ")? else {
            return Ok(None);
        };
        Ok(Some(GameConfig::new_unchecked(boxes, bombs)))
    }

    fn prompt_count(&mut self, prompt: &str) -> anyhow::Result<Option<BoxCount>> {
        loop {
            let Some(answer) = self.read_answer(prompt)? else {
                return Ok(None);
            };
            match answer.parse() {
                Ok(count) => return Ok(Some(count)),
                Err(_) => self.notice(&format!(
                    "Please enter a whole number between 0 and {}.",
                    BoxCount::MAX
                ))?,
            }
        }
    }

    /// Shows `prompt` and reads one trimmed, lowercased line, `None` at end of input.
    fn read_answer(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        if self.options.mode == OutputMode::Text {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
        }

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read player input")?;
        if read == 0 {
            return Ok(None);
        }
        let answer = line.trim().to_ascii_lowercase();
        log::debug!("player answered {:?}", answer);
        Ok(Some(answer))
    }

    fn notice(&mut self, message: &str) -> anyhow::Result<()> {
        if self.options.mode == OutputMode::Text {
            writeln!(self.output, "{message}")?;
        }
        Ok(())
    }

    fn emit(&mut self, engine: &TurnEngine) -> anyhow::Result<()> {
        match self.options.mode {
            OutputMode::Text => {
                writeln!(self.output, "{}", render::render_text(engine))?;
            }
            OutputMode::Json => {
                let frame = Frame {
                    state: engine.state(),
                    boxes: engine.boxes().collect(),
                    winner: engine.state().winner(),
                };
                serde_json::to_writer(&mut self.output, &frame)?;
                writeln!(self.output)?;
            }
        }
        self.output.flush().context("failed to write game output")
    }
}
