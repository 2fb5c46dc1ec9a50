use crate::world::position::Position;

pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced by the simulation core. None of them are fatal to the host.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// No empty cell left for a placement or birth.
    #[error("grid is full")]
    GridFull,

    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("position {0} is already occupied by the same species")]
    CellOccupied(Position),

    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    #[error("malformed animal state: {0}")]
    MalformedState(String),

    #[error("invalid species {id}: {reason}")]
    InvalidSpecies { id: String, reason: String },

    #[error("species already registered: {0}")]
    DuplicateSpecies(String),

    #[error("symbol '{symbol}' already claimed by {existing}, rejecting {rejected}")]
    SymbolCollision {
        symbol: char,
        existing: String,
        rejected: String,
    },

    /// A programming defect, such as health escaping its bounds.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("session lock poisoned: {0}")]
    SessionPoisoned(String),

    #[error("no such session: {0}")]
    UnknownSession(String),
}
