use thiserror::Error;

use crate::{BoxCount, Phase};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {bombs} bombs among {boxes} boxes, bombs must be fewer than boxes")]
    InvalidConfiguration { boxes: BoxCount, bombs: BoxCount },
    #[error("Board of {boxes} boxes exceeds the supported maximum of 65535")]
    TooManyBoxes { boxes: usize },
    #[error("Operation not valid in the current state (phase: {phase:?})")]
    InvalidState { phase: Phase },
}

pub type Result<T> = core::result::Result<T, GameError>;
