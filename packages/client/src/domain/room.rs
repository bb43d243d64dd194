//! Lobby membership snapshot.

/// One player as reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub ready: bool,
}

/// Snapshot of the room carried by a `room_info` frame
///
/// `players` keeps the server order; the first player is the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub you: PlayerInfo,
    pub players: Vec<PlayerInfo>,
    pub room_state: String,
    pub level: i64,
}

/// A player as displayed in the lobby roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyPlayer {
    pub id: String,
    pub display_name: String,
    pub is_ready: bool,
    pub is_host: bool,
}

impl RoomInfo {
    /// The host, i.e. the first player in server order
    pub fn host(&self) -> Option<&PlayerInfo> {
        self.players.first()
    }

    /// Whether the local player hosts the room
    pub fn you_are_host(&self) -> bool {
        self.host().is_some_and(|host| host.id == self.you.id)
    }

    /// Roster with host markers, in server order
    pub fn lobby_players(&self) -> Vec<LobbyPlayer> {
        let host_id = self.host().map(|host| host.id.as_str());
        self.players
            .iter()
            .map(|player| LobbyPlayer {
                id: player.id.clone(),
                display_name: player.name.clone(),
                is_ready: player.ready,
                is_host: host_id == Some(player.id.as_str()),
            })
            .collect()
    }
}
