//! Game-level state and the derived game-over status.

/// One entry of the try history shown at the end of a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryHistoryItem {
    /// Epoch milliseconds
    pub time: i64,
    pub player_id: String,
    pub success: bool,
}

/// Snapshot carried by a `game_state` frame
///
/// The optional fields only mean something for some tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub state: String,
    pub duration: Option<i64>,
    pub start_threat: Option<i64>,
    pub game_duration: Option<i64>,
    pub win: Option<bool>,
    pub try_history: Option<Vec<TryHistoryItem>>,
}

/// Recognized `game_state` tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStateKind {
    LobbyWaiting,
    LobbyReady,
    GameStart,
    EndState,
    Other,
}

impl GameState {
    pub fn kind(&self) -> GameStateKind {
        match self.state.as_str() {
            "lobby_waiting" => GameStateKind::LobbyWaiting,
            "lobby_ready" => GameStateKind::LobbyReady,
            "game_start" => GameStateKind::GameStart,
            "end_state" => GameStateKind::EndState,
            _ => GameStateKind::Other,
        }
    }
}

/// Game-over flags derived from successive `game_state` frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStatus {
    pub game_over: bool,
    pub victory: bool,
}

/// Conceptual phase of the local game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Lobby,
    Playing,
    GameOver { victory: bool },
}

impl GameStatus {
    /// Status after observing `state`.
    ///
    /// `end_state` enters game over, lobby tags leave it, every other tag
    /// (including `game_start`) keeps the current status.
    #[must_use]
    pub fn apply(self, state: &GameState) -> Self {
        match state.kind() {
            GameStateKind::EndState => Self {
                game_over: true,
                victory: state.win == Some(true),
            },
            GameStateKind::LobbyWaiting | GameStateKind::LobbyReady => Self::default(),
            GameStateKind::GameStart | GameStateKind::Other => self,
        }
    }

    /// Playing has no flag of its own: not over and a board has arrived.
    pub fn phase(self, board_received: bool) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver {
                victory: self.victory,
            }
        } else if board_received {
            GamePhase::Playing
        } else {
            GamePhase::Lobby
        }
    }
}
