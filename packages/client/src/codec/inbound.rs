//! Inbound frame decoding.

use serde_json::Value;

use crate::{
    domain::{
        Command, GameState, Instruction, PlayerBoard, PlayerInfo, RoomInfo, TryHistoryItem,
    },
    error::FrameError,
};

use super::json::{
    Object, maybe_bool, maybe_i64, opt_array, opt_bool, opt_i64, opt_object, opt_str,
    value_as_string,
};

/// A decoded server push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    RoomInfo(RoomInfo),
    GameState(GameState),
    PlayerBoard(PlayerBoard),
}

/// Decode one text frame.
///
/// # Returns
///
/// * `Ok(Some(_))` - a fully populated message
/// * `Ok(None)` - unknown or absent `type`, or a payload missing a required node
/// * `Err(FrameError)` - the text is not a JSON object
pub fn decode_frame(text: &str) -> Result<Option<InboundMessage>, FrameError> {
    let root = match serde_json::from_str::<Value>(text)? {
        Value::Object(root) => root,
        _ => return Err(FrameError::NotAnObject),
    };

    let tag = opt_str(&root, "type");
    let decoded = match tag.as_str() {
        "room_info" => decode_room_info(&root).map(InboundMessage::RoomInfo),
        "game_state" => decode_game_state(&root).map(InboundMessage::GameState),
        "player_board" => decode_player_board(&root).map(InboundMessage::PlayerBoard),
        _ => {
            tracing::debug!("Ignoring frame with type '{}'", tag);
            return Ok(None);
        }
    };

    if decoded.is_none() {
        tracing::debug!("Dropping '{}' frame with missing required fields", tag);
    }
    Ok(decoded)
}

fn decode_room_info(root: &Object) -> Option<RoomInfo> {
    let payload = opt_object(root, "payload")?;
    let you = opt_object(payload, "you")?;
    let players = opt_array(payload, "players")?;

    Some(RoomInfo {
        you: decode_player(you),
        players: players
            .iter()
            .map(|p| p.as_object().map(decode_player).unwrap_or_default())
            .collect(),
        room_state: opt_str(payload, "room_state"),
        level: opt_i64(payload, "level", 1),
    })
}

fn decode_player(obj: &Object) -> PlayerInfo {
    PlayerInfo {
        id: opt_str(obj, "id"),
        name: opt_str(obj, "name"),
        ready: opt_bool(obj, "ready"),
    }
}

fn decode_game_state(root: &Object) -> Option<GameState> {
    let payload = opt_object(root, "payload")?;

    let try_history = opt_array(payload, "tryHistory").map(|items| {
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|item| TryHistoryItem {
                time: opt_i64(item, "time", 0),
                player_id: opt_str(item, "player_id"),
                success: opt_bool(item, "success"),
            })
            .collect()
    });

    Some(GameState {
        state: opt_str(payload, "state"),
        duration: maybe_i64(payload, "duration"),
        start_threat: maybe_i64(payload, "start_threat"),
        game_duration: maybe_i64(payload, "game_duration"),
        win: maybe_bool(payload, "win"),
        try_history,
    })
}

fn decode_player_board(root: &Object) -> Option<PlayerBoard> {
    let payload = opt_object(root, "payload")?;
    let board = opt_object(payload, "board")?;
    let commands = opt_array(board, "commands")?;
    let instruction = opt_object(payload, "instruction")?;

    Some(PlayerBoard {
        commands: commands
            .iter()
            .filter_map(Value::as_object)
            .filter_map(decode_command)
            .collect(),
        instruction: Instruction {
            command_id: opt_str(instruction, "command_id"),
            timeout: opt_i64(instruction, "timeout", 0),
            timestamp_creation: opt_i64(instruction, "timestampCreation", 0),
            command_type: opt_str(instruction, "command_type"),
            instruction_text: opt_str(instruction, "instruction_text"),
            expected_status: opt_str(instruction, "expected_status"),
        },
        threat: opt_i64(payload, "threat", 0),
    })
}

/// Commands without an `action_possible` array are skipped, not defaulted.
fn decode_command(obj: &Object) -> Option<Command> {
    let actions = opt_array(obj, "action_possible")?;
    Some(Command {
        id: opt_str(obj, "id"),
        name: opt_str(obj, "name"),
        kind: opt_str(obj, "type"),
        style_type: opt_str(obj, "styleType"),
        actual_status: opt_str(obj, "actual_status"),
        action_possible: actions.iter().map(value_as_string).collect(),
    })
}
