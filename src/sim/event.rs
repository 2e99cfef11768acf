/// Events emitted by the scene machine.
/// The frame driver consumes these for logging.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    RoundStarted { round: u32, active: usize },
    CellCleared { col: usize, row: usize, corrupted: bool },
    TimePenalized { remaining: f32 },
    RoundCleared { round: u32 },
    TimeExpired { round: u32 },
    ReturnedToMenu,
}
