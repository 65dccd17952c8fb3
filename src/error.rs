/// Every way an engine operation can be refused. None of them leave a
/// partially applied move behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The source pile has no card, or no face-up card, to move.
    EmptyPile,
    /// The card cannot legally land on the chosen destination.
    IllegalDestination,
    /// A run longer than the source pile was requested.
    InsufficientCards,
    /// Drawing or peeking from an exhausted deck.
    EmptyDeck,
    /// A state buffer that does not describe a valid game.
    MalformedState(String),
    /// A pile index outside the pile group.
    PileOutOfRange { index: usize, piles: usize },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPile => write!(f, "no card to move from that pile"),
            Self::IllegalDestination => write!(f, "card cannot be placed there"),
            Self::InsufficientCards => write!(f, "not enough cards in that pile"),
            Self::EmptyDeck => write!(f, "deck is empty"),
            Self::MalformedState(s) => write!(f, "malformed state: {}", s),
            Self::PileOutOfRange { index, piles } => {
                write!(f, "pile {} out of range (0..{})", index, piles)
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
