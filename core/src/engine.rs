use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Structured record of the most recently resolved box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxOutcome {
    pub index: BoxCount,
    pub decided_by: Side,
    pub decision: Decision,
    pub opened_by: Side,
    pub content: BoxContent,
    pub next_turn: Side,
    pub game_over: bool,
}

/// Snapshot of game progress, enough for a presentation layer to render.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub total_boxes: BoxCount,
    pub total_bombs: BoxCount,
    pub current_index: BoxCount,
    pub player_bomb_count: BoxCount,
    pub machine_bomb_count: BoxCount,
    pub active_turn: Side,
    pub phase: Phase,
    pub last_outcome: Option<BoxOutcome>,
}

impl GameState {
    fn setup() -> Self {
        Self {
            total_boxes: 0,
            total_bombs: 0,
            current_index: 0,
            player_bomb_count: 0,
            machine_bomb_count: 0,
            active_turn: Side::Player,
            phase: Phase::Setup,
            last_outcome: None,
        }
    }

    fn playing(config: GameConfig) -> Self {
        Self {
            total_boxes: config.total_boxes,
            total_bombs: config.total_bombs,
            phase: Phase::Playing,
            ..Self::setup()
        }
    }

    pub fn remaining_boxes(&self) -> BoxCount {
        self.total_boxes.saturating_sub(self.current_index)
    }

    pub fn remaining_bombs(&self) -> BoxCount {
        self.total_bombs
            .saturating_sub(self.player_bomb_count)
            .saturating_sub(self.machine_bomb_count)
    }

    /// Density of bombs among the boxes still closed, `None` once none are left.
    pub fn bomb_probability(&self) -> Option<f64> {
        match self.remaining_boxes() {
            0 => None,
            boxes => Some(f64::from(self.remaining_bombs()) / f64::from(boxes)),
        }
    }

    pub fn bomb_count(&self, side: Side) -> BoxCount {
        match side {
            Side::Player => self.player_bomb_count,
            Side::Machine => self.machine_bomb_count,
        }
    }

    fn bomb_count_mut(&mut self, side: Side) -> &mut BoxCount {
        match side {
            Side::Player => &mut self.player_bomb_count,
            Side::Machine => &mut self.machine_bomb_count,
        }
    }

    /// Final result, only available once the game is over.
    pub fn winner(&self) -> Option<Winner> {
        self.phase
            .is_finished()
            .then(|| Winner::from_bomb_counts(self.player_bomb_count, self.machine_bomb_count))
    }
}

/// Owns the board and the game state, every mutation goes through here.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnEngine {
    board: Option<Board>,
    opened_by: Vec<Side>,
    state: GameState,
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnEngine {
    pub fn new() -> Self {
        Self {
            board: None,
            opened_by: Vec::new(),
            state: GameState::setup(),
        }
    }

    /// Generates a fresh random board and starts playing it. On error the
    /// previous game, if any, is left untouched.
    pub fn start_game(&mut self, config: GameConfig, seed: u64) -> Result<()> {
        let board = RandomBoardGenerator::new(seed).generate(config)?;
        self.start_with_board(board)
    }

    pub fn start_with_board(&mut self, board: Board) -> Result<()> {
        let config = board.game_config().validate()?;
        log::info!(
            "Starting game with {} boxes and {} bombs",
            config.total_boxes,
            config.total_bombs
        );

        self.opened_by = Vec::with_capacity(usize::from(config.total_boxes));
        self.board = Some(board);
        self.state = GameState::playing(config);
        Ok(())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn active_turn(&self) -> Side {
        self.state.active_turn
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase.is_finished()
    }

    pub fn last_outcome(&self) -> Option<BoxOutcome> {
        self.state.last_outcome
    }

    pub fn remaining_boxes(&self) -> BoxCount {
        self.state.remaining_boxes()
    }

    pub fn remaining_bombs(&self) -> BoxCount {
        self.state.remaining_bombs()
    }

    pub fn bomb_probability(&self) -> Option<f64> {
        self.state.bomb_probability()
    }

    pub fn box_at(&self, index: BoxCount) -> Option<BoxView> {
        let board = self.board.as_ref()?;
        let content = board.get(index)?;
        Some(match self.opened_by.get(usize::from(index)) {
            Some(&opened_by) => BoxView::Opened { content, opened_by },
            None => BoxView::Closed,
        })
    }

    pub fn boxes(&self) -> impl Iterator<Item = BoxView> + '_ {
        (0..self.state.total_boxes).filter_map(move |index| self.box_at(index))
    }

    /// Resolves the next box for whoever holds the turn.
    pub fn resolve_box(&mut self, decision: Decision) -> Result<BoxOutcome> {
        self.check_playing()?;
        let index = self.state.current_index;
        let Some(content) = self.board.as_ref().and_then(|board| board.get(index)) else {
            return Err(self.invalid_state());
        };

        let acting = self.state.active_turn;
        let opener = decision.opener(acting);
        let next_turn = decision.next_turn(acting, content);

        self.state.current_index += 1;
        self.opened_by.push(opener);
        if content.is_bomb() {
            *self.state.bomb_count_mut(opener) += 1;
        }
        self.state.active_turn = next_turn;

        let game_over = self.state.current_index == self.state.total_boxes;
        if game_over {
            self.state.phase = Phase::GameOver;
        }

        let outcome = BoxOutcome {
            index,
            decided_by: acting,
            decision,
            opened_by: opener,
            content,
            next_turn,
            game_over,
        };
        self.state.last_outcome = Some(outcome);

        log::debug!(
            "box {}: {:?} chose {:?}, {:?} opened {:?}, next turn {:?}",
            index,
            acting,
            decision,
            opener,
            content,
            next_turn
        );
        if game_over {
            log::info!(
                "Game over, player {} bombs, machine {} bombs",
                self.state.player_bomb_count,
                self.state.machine_bomb_count
            );
        }

        Ok(outcome)
    }

    /// Asks the opponent policy what the machine does with the next box.
    pub fn machine_decision(&self) -> Result<Decision> {
        self.check_playing()?;
        if self.state.active_turn != Side::Machine {
            return Err(self.invalid_state());
        }
        Ok(decide(&self.state))
    }

    pub fn winner(&self) -> Result<Winner> {
        self.state.winner().ok_or_else(|| self.invalid_state())
    }

    fn check_playing(&self) -> Result<()> {
        if self.state.phase.is_playing() {
            Ok(())
        } else {
            Err(self.invalid_state())
        }
    }

    fn invalid_state(&self) -> GameError {
        GameError::InvalidState {
            phase: self.state.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use proptest::prelude::*;
    use BoxContent::*;
    use Decision::*;

    fn engine(contents: &[BoxContent]) -> TurnEngine {
        let mut engine = TurnEngine::new();
        engine
            .start_with_board(Board::from_contents(contents.to_vec()).unwrap())
            .unwrap();
        engine
    }

    #[test]
    fn new_engine_is_in_setup() {
        let engine = TurnEngine::new();

        assert_eq!(engine.phase(), Phase::Setup);
        assert_eq!(engine.box_at(0), None);
        assert_eq!(
            engine.winner(),
            Err(GameError::InvalidState {
                phase: Phase::Setup
            })
        );
    }

    #[test]
    fn resolve_before_start_is_rejected() {
        let mut engine = TurnEngine::new();

        assert_eq!(
            engine.resolve_box(OpenSelf),
            Err(GameError::InvalidState {
                phase: Phase::Setup
            })
        );
        assert_eq!(engine, TurnEngine::new());
    }

    #[test]
    fn start_game_resets_to_player_turn() {
        let mut engine = TurnEngine::new();
        engine.start_game(GameConfig::new_unchecked(20, 8), 42).unwrap();

        let state = engine.state();
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.player_bomb_count, 0);
        assert_eq!(state.machine_bomb_count, 0);
        assert_eq!(state.active_turn, Side::Player);
        assert_eq!(state.last_outcome, None);
        assert!(engine.boxes().all(BoxView::is_closed));
    }

    #[test]
    fn invalid_start_keeps_previous_game() {
        let mut engine = engine(&[Confetti, Bomb, Confetti]);
        engine.resolve_box(OpenSelf).unwrap();
        let before = engine.clone();

        assert_eq!(
            engine.start_game(GameConfig::new_unchecked(3, 3), 1),
            Err(GameError::InvalidConfiguration { boxes: 3, bombs: 3 })
        );
        assert_eq!(engine, before);
    }

    #[test]
    fn open_self_bomb_passes_turn() {
        let mut engine = engine(&[Bomb, Confetti]);

        let outcome = engine.resolve_box(OpenSelf).unwrap();

        assert_eq!(outcome.opened_by, Side::Player);
        assert_eq!(engine.state().player_bomb_count, 1);
        assert_eq!(engine.active_turn(), Side::Machine);
    }

    #[test]
    fn open_self_confetti_keeps_turn() {
        let mut engine = engine(&[Confetti, Bomb]);

        engine.resolve_box(OpenSelf).unwrap();

        assert_eq!(engine.state().player_bomb_count, 0);
        assert_eq!(engine.active_turn(), Side::Player);
    }

    #[test]
    fn force_opponent_bomb_keeps_turn() {
        let mut engine = engine(&[Bomb, Confetti]);

        let outcome = engine.resolve_box(ForceOpponent).unwrap();

        assert_eq!(outcome.opened_by, Side::Machine);
        assert_eq!(engine.state().machine_bomb_count, 1);
        assert_eq!(engine.state().player_bomb_count, 0);
        assert_eq!(engine.active_turn(), Side::Player);
    }

    #[test]
    fn force_opponent_confetti_passes_turn() {
        let mut engine = engine(&[Confetti, Bomb]);

        engine.resolve_box(ForceOpponent).unwrap();

        assert_eq!(engine.state().machine_bomb_count, 0);
        assert_eq!(engine.active_turn(), Side::Machine);
    }

    #[test]
    fn machine_forcing_player_into_bomb_keeps_machine_turn() {
        let mut engine = engine(&[Confetti, Bomb, Confetti]);
        engine.resolve_box(ForceOpponent).unwrap();
        assert_eq!(engine.active_turn(), Side::Machine);

        let outcome = engine.resolve_box(ForceOpponent).unwrap();

        assert_eq!(outcome.decided_by, Side::Machine);
        assert_eq!(outcome.opened_by, Side::Player);
        assert_eq!(engine.state().player_bomb_count, 1);
        assert_eq!(engine.active_turn(), Side::Machine);
    }

    #[test]
    fn box_view_tracks_opener() {
        let mut engine = engine(&[Bomb, Confetti, Confetti]);
        engine.resolve_box(ForceOpponent).unwrap();

        assert_eq!(
            engine.box_at(0),
            Some(BoxView::Opened {
                content: Bomb,
                opened_by: Side::Machine
            })
        );
        assert_eq!(engine.box_at(1), Some(BoxView::Closed));
        assert_eq!(engine.box_at(3), None);
    }

    #[test]
    fn single_confetti_box_ends_in_tie() {
        let mut engine = TurnEngine::new();
        engine.start_game(GameConfig::new_unchecked(1, 0), 9).unwrap();
        assert_eq!(engine.active_turn(), Side::Player);

        let outcome = engine.resolve_box(OpenSelf).unwrap();

        assert_eq!(outcome.content, Confetti);
        assert!(outcome.game_over);
        assert_eq!(engine.state().current_index, 1);
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.winner(), Ok(Winner::Tie));
    }

    #[test]
    fn player_bomb_then_machine_confetti_machine_wins() {
        let mut engine = engine(&[Bomb, Confetti]);

        engine.resolve_box(OpenSelf).unwrap();
        assert_eq!(engine.state().player_bomb_count, 1);
        assert_eq!(engine.active_turn(), Side::Machine);
        assert_eq!(engine.winner(), Err(GameError::InvalidState { phase: Phase::Playing }));

        let decision = engine.machine_decision().unwrap();
        assert_eq!(decision, OpenSelf);

        engine.resolve_box(decision).unwrap();
        let state = engine.state();
        assert_eq!(state.machine_bomb_count, 0);
        assert_eq!(state.current_index, 2);
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(engine.winner(), Ok(Winner::Machine));
    }

    #[test]
    fn final_box_outcome_is_published() {
        let mut engine = engine(&[Bomb, Confetti]);
        engine.resolve_box(OpenSelf).unwrap();

        let outcome = engine.resolve_box(ForceOpponent).unwrap();

        assert!(outcome.game_over);
        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.decided_by, Side::Machine);
        assert_eq!(outcome.opened_by, Side::Player);
        assert_eq!(engine.last_outcome(), Some(outcome));
        assert_eq!(engine.phase(), Phase::GameOver);
    }

    #[test]
    fn deserialized_board_plays_to_full_bomb_count() {
        let board: Board = serde_json::from_str(r#"["Confetti","Bomb","Confetti"]"#).unwrap();
        let mut engine = TurnEngine::new();
        engine.start_with_board(board).unwrap();

        while !engine.is_finished() {
            engine.resolve_box(OpenSelf).unwrap();
        }

        let state = engine.state();
        assert_eq!(state.total_bombs, 1);
        assert_eq!(state.player_bomb_count + state.machine_bomb_count, 1);
    }

    #[test]
    fn resolve_after_game_over_is_rejected_without_change() {
        let mut engine = engine(&[Confetti]);
        engine.resolve_box(OpenSelf).unwrap();
        let before = engine.clone();

        assert_eq!(
            engine.resolve_box(ForceOpponent),
            Err(GameError::InvalidState {
                phase: Phase::GameOver
            })
        );
        assert_eq!(engine, before);
    }

    #[test]
    fn machine_decision_requires_machine_turn() {
        let engine = engine(&[Bomb, Confetti]);

        assert_eq!(
            engine.machine_decision(),
            Err(GameError::InvalidState {
                phase: Phase::Playing
            })
        );
    }

    #[test]
    fn restart_after_game_over_begins_fresh() {
        let mut engine = engine(&[Bomb, Confetti]);
        engine.resolve_box(OpenSelf).unwrap();
        engine.resolve_box(OpenSelf).unwrap();
        assert!(engine.is_finished());

        engine
            .start_with_board(Board::from_contents(vec![Confetti, Confetti, Bomb]).unwrap())
            .unwrap();

        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.state().total_boxes, 3);
        assert_eq!(engine.state().player_bomb_count, 0);
        assert_eq!(engine.last_outcome(), None);
        assert!(engine.boxes().all(BoxView::is_closed));
    }

    #[test]
    fn snapshot_serializes_for_presentation() {
        let mut engine = engine(&[Bomb, Confetti]);
        engine.resolve_box(OpenSelf).unwrap();

        let json = serde_json::to_value(engine.state()).unwrap();

        assert_eq!(json["current_index"], 1);
        assert_eq!(json["active_turn"], "Machine");
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["last_outcome"]["content"], "Bomb");
        assert_eq!(json["last_outcome"]["opened_by"], "Player");
    }

    fn decisions() -> impl Strategy<Value = std::vec::Vec<Decision>> {
        proptest::collection::vec(prop_oneof![Just(OpenSelf), Just(ForceOpponent)], 0..80)
    }

    proptest! {
        #[test]
        fn counters_stay_consistent(
            seed: u64,
            boxes in 1..60u16,
            bombs_frac in 0.0..1.0f64,
            picks in decisions(),
            machine_follows_policy: bool,
        ) {
            let bombs = ((f64::from(boxes) * bombs_frac) as BoxCount).min(boxes - 1);
            let mut engine = TurnEngine::new();
            engine.start_game(GameConfig::new_unchecked(boxes, bombs), seed).unwrap();

            let mut picks = picks.into_iter().cycle();
            let mut last_index = 0;
            while !engine.is_finished() {
                let decision = match engine.active_turn() {
                    Side::Machine if machine_follows_policy => engine.machine_decision().unwrap(),
                    _ => picks.next().unwrap_or(OpenSelf),
                };
                engine.resolve_box(decision).unwrap();

                let state = engine.state();
                prop_assert_eq!(state.current_index, last_index + 1);
                prop_assert!(state.player_bomb_count + state.machine_bomb_count <= bombs);
                last_index = state.current_index;
            }

            let state = engine.state();
            prop_assert_eq!(state.current_index, boxes);
            prop_assert_eq!(state.player_bomb_count + state.machine_bomb_count, bombs);
            prop_assert!(engine.boxes().all(|view| !view.is_closed()));
            prop_assert!(engine.winner().is_ok());
        }
    }
}
