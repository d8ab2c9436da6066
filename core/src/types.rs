use serde::{Deserialize, Serialize};

/// Count type used for box counts, bomb counts and box indices.
pub type BoxCount = u16;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Machine,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Self::Player => Self::Machine,
            Self::Machine => Self::Player,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxContent {
    Bomb,
    Confetti,
}

impl BoxContent {
    pub const fn is_bomb(self) -> bool {
        matches!(self, Self::Bomb)
    }
}

impl Default for BoxContent {
    fn default() -> Self {
        Self::Confetti
    }
}

/// What the side holding the turn does with the next box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    OpenSelf,
    ForceOpponent,
}

impl Decision {
    /// Side that ends up opening the box when `acting` makes this decision.
    pub const fn opener(self, acting: Side) -> Side {
        match self {
            Self::OpenSelf => acting,
            Self::ForceOpponent => acting.other(),
        }
    }

    /// Side holding the turn after `acting` made this decision and the box held `content`.
    pub const fn next_turn(self, acting: Side, content: BoxContent) -> Side {
        use BoxContent::*;
        use Decision::*;

        match (self, content) {
            (OpenSelf, Bomb) => acting.other(),
            (OpenSelf, Confetti) => acting,
            (ForceOpponent, Bomb) => acting,
            (ForceOpponent, Confetti) => acting.other(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    Playing,
    GameOver,
}

impl Phase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Setup
    }
}

/// Final result, fewer bombs wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Machine,
    Tie,
}

impl Winner {
    pub fn from_bomb_counts(player_bombs: BoxCount, machine_bombs: BoxCount) -> Self {
        use core::cmp::Ordering::*;

        match player_bombs.cmp(&machine_bombs) {
            Less => Self::Player,
            Greater => Self::Machine,
            Equal => Self::Tie,
        }
    }
}
