#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

use alloc::vec::Vec;
use core::ops::Index;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use policy::*;
pub use types::*;
pub use view::*;

mod engine;
mod error;
mod generator;
mod policy;
mod types;
mod view;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub total_boxes: BoxCount,
    pub total_bombs: BoxCount,
}

impl GameConfig {
    pub const fn new_unchecked(total_boxes: BoxCount, total_bombs: BoxCount) -> Self {
        Self {
            total_boxes,
            total_bombs,
        }
    }

    pub fn new(total_boxes: BoxCount, total_bombs: BoxCount) -> Result<Self> {
        Self::new_unchecked(total_boxes, total_bombs).validate()
    }

    /// At least one box, and strictly fewer bombs than boxes. Zero bombs is allowed.
    pub fn validate(self) -> Result<Self> {
        if self.total_boxes == 0 || self.total_bombs >= self.total_boxes {
            Err(GameError::InvalidConfiguration {
                boxes: self.total_boxes,
                bombs: self.total_bombs,
            })
        } else {
            Ok(self)
        }
    }

    pub const fn total_confetti(&self) -> BoxCount {
        self.total_boxes.saturating_sub(self.total_bombs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(20, 8)
    }
}

/// Fixed, fully known sequence of box contents for one game.
///
/// Serialized as the bare content sequence, deserializing goes through
/// [`Board::from_contents`] so the bomb count always matches the contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BoxContent>", into = "Vec<BoxContent>")]
pub struct Board {
    contents: Vec<BoxContent>,
    bomb_count: BoxCount,
}

impl Board {
    /// Wraps an explicit sequence of contents, checking it against the same
    /// constraints as [`GameConfig::validate`].
    pub fn from_contents(contents: Vec<BoxContent>) -> Result<Self> {
        let total: BoxCount = contents
            .len()
            .try_into()
            .map_err(|_| GameError::TooManyBoxes {
                boxes: contents.len(),
            })?;
        let bomb_count = contents
            .iter()
            .filter(|content| content.is_bomb())
            .count() as BoxCount;
        GameConfig::new(total, bomb_count)?;
        Ok(Self {
            contents,
            bomb_count,
        })
    }

    pub(crate) fn from_contents_unchecked(contents: Vec<BoxContent>, bomb_count: BoxCount) -> Self {
        Self {
            contents,
            bomb_count,
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.total_boxes(), self.bomb_count)
    }

    pub fn total_boxes(&self) -> BoxCount {
        self.contents.len() as BoxCount
    }

    pub fn bomb_count(&self) -> BoxCount {
        self.bomb_count
    }

    pub fn get(&self, index: BoxCount) -> Option<BoxContent> {
        self.contents.get(usize::from(index)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = BoxContent> + '_ {
        self.contents.iter().copied()
    }
}

impl TryFrom<Vec<BoxContent>> for Board {
    type Error = GameError;

    fn try_from(contents: Vec<BoxContent>) -> Result<Self> {
        Self::from_contents(contents)
    }
}

impl From<Board> for Vec<BoxContent> {
    fn from(board: Board) -> Self {
        board.contents
    }
}

impl Index<BoxCount> for Board {
    type Output = BoxContent;

    fn index(&self, index: BoxCount) -> &Self::Output {
        &self.contents[usize::from(index)]
    }
}
