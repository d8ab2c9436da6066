use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    /// Produces a board honoring `config` exactly, failing with
    /// [`GameError::InvalidConfiguration`] when `config` does not validate.
    fn generate(self, config: GameConfig) -> Result<Board>;
}
