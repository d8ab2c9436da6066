use serde::{Deserialize, Serialize};

use crate::{BoxContent, Side};

/// Player-visible state of a single box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxView {
    Closed,
    Opened { content: BoxContent, opened_by: Side },
}

impl BoxView {
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl Default for BoxView {
    fn default() -> Self {
        Self::Closed
    }
}
