use bombbox_core::*;

/// Upper bounds, in percent, of the first four risk bands.
const RISK_CUTOFFS: [f64; 4] = [20.0, 40.0, 60.0, 80.0];

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum RiskBand {
    Excellent,
    Good,
    Balanced,
    High,
    VeryDangerous,
}

impl RiskBand {
    pub(crate) fn from_bomb_percent(percent: f64) -> Self {
        use RiskBand::*;

        match RISK_CUTOFFS.iter().position(|&cutoff| percent < cutoff) {
            Some(0) => Excellent,
            Some(1) => Good,
            Some(2) => Balanced,
            Some(3) => High,
            _ => VeryDangerous,
        }
    }

    fn label(self) -> &'static str {
        use RiskBand::*;

        match self {
            Excellent => "Excellent luck!",
            Good => "Good odds",
            Balanced => "Balanced odds",
            High => "High risk",
            VeryDangerous => "Very dangerous!",
        }
    }
}

fn box_cell(view: BoxView) -> &'static str {
    use BoxContent::*;
    use Side::*;

    match view {
        BoxView::Closed => "[  ]",
        BoxView::Opened {
            content: Bomb,
            opened_by: Player,
        } => "[BP]",
        BoxView::Opened {
            content: Bomb,
            opened_by: Machine,
        } => "[BM]",
        BoxView::Opened {
            content: Confetti,
            opened_by: Player,
        } => "[CP]",
        BoxView::Opened {
            content: Confetti,
            opened_by: Machine,
        } => "[CM]",
    }
}

pub(crate) fn box_row(engine: &TurnEngine) -> String {
    engine
        .boxes()
        .map(box_cell)
        .collect::<Vec<_>>()
        .join("")
}

pub(crate) fn describe_outcome(outcome: &BoxOutcome) -> String {
    let number = outcome.index + 1;
    let action = match (outcome.decided_by, outcome.decision) {
        (Side::Player, Decision::OpenSelf) => format!("You opened box {number} yourself"),
        (Side::Player, Decision::ForceOpponent) => {
            format!("You made the machine open box {number}")
        }
        (Side::Machine, Decision::OpenSelf) => format!("The machine opened box {number} itself"),
        (Side::Machine, Decision::ForceOpponent) => format!("The machine made you open box {number}"),
    };
    let found = match outcome.content {
        BoxContent::Bomb => "BOMB!",
        BoxContent::Confetti => "confetti.",
    };

    let mut message = format!("{action}: {found}");
    if !outcome.game_over {
        match outcome.next_turn {
            Side::Player => message.push_str(" Your turn."),
            Side::Machine => message.push_str(" The machine has the turn."),
        }
    }
    message
}

pub(crate) fn probability_hint(state: &GameState) -> Option<String> {
    if !state.phase.is_playing() {
        return None;
    }
    let bomb = state.bomb_probability()? * 100.0;
    Some(format!(
        "Next box: {:.1}% bomb | {:.1}% confetti - {}",
        bomb,
        100.0 - bomb,
        RiskBand::from_bomb_percent(bomb).label()
    ))
}

fn winner_line(winner: Winner) -> &'static str {
    match winner {
        Winner::Player => "You win!",
        Winner::Machine => "The machine wins!",
        Winner::Tie => "It's a tie!",
    }
}

pub(crate) fn render_text(engine: &TurnEngine) -> String {
    let state = engine.state();
    let mut lines = vec![
        box_row(engine),
        format!(
            "Box {}/{} | You: {} bombs | Machine: {} bombs",
            (state.current_index + 1).min(state.total_boxes),
            state.total_boxes,
            state.player_bomb_count,
            state.machine_bomb_count
        ),
        match state.last_outcome {
            Some(outcome) => describe_outcome(&outcome),
            None => "Game started! It's your turn.".to_string(),
        },
    ];
    lines.extend(probability_hint(state));
    if let Some(winner) = state.winner() {
        lines.push(format!(
            "Game over. You: {} bombs, Machine: {} bombs. {} (fewer bombs wins)",
            state.player_bomb_count,
            state.machine_bomb_count,
            winner_line(winner)
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
