//! Text formatting of session projections for the terminal.

use rogueai_shared::time::timestamp_to_rfc3339;

use crate::domain::{Command, ControlStyle, GamePhase, GameState, PlayerBoard, RoomInfo};

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the lobby roster
    ///
    /// The host is marked with `*` and the local player with `(me)`.
    pub fn format_room_info(info: &RoomInfo) -> String {
        let mut output = format!(
            "\n\n{RULE}\nRoom ({}) - level {}\nPlayers:\n",
            info.room_state, info.level
        );

        let players = info.lobby_players();
        if players.is_empty() {
            output.push_str("(No players)\n");
        }
        for player in players {
            let host = if player.is_host { "*" } else { " " };
            let me = if player.id == info.you.id { " (me)" } else { "" };
            let ready = if player.is_ready { "ready" } else { "not ready" };
            output.push_str(&format!(
                "{host} {}{me} - {ready}\n",
                player.display_name
            ));
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a game-state transition
    pub fn format_game_state(state: &GameState) -> String {
        let mut output = format!("\n~ game state: {}\n", state.state);
        if let Some(duration) = state.game_duration.or(state.duration) {
            output.push_str(&format!("  duration: {duration}s\n"));
        }
        if let Some(threat) = state.start_threat {
            output.push_str(&format!("  starting threat: {threat}\n"));
        }
        if let Some(history) = &state.try_history {
            output.push_str("  tries:\n");
            for item in history {
                let outcome = if item.success { "success" } else { "failure" };
                output.push_str(&format!(
                    "    {} {} at {}\n",
                    item.player_id,
                    outcome,
                    timestamp_to_rfc3339(item.time)
                ));
            }
        }
        output
    }

    /// Format the board with the current instruction and its countdown
    pub fn format_board(board: &PlayerBoard, time_remaining: i64) -> String {
        let mut output = format!(
            "\n\n{THIN_RULE}\n>> {} ({:.1}s left) | threat {}\n",
            board.instruction.instruction_text,
            seconds(time_remaining),
            board.threat
        );
        let target_id = board.target_command().map(|command| command.id.as_str());
        for command in &board.commands {
            let target = if target_id == Some(command.id.as_str()) {
                ">"
            } else {
                " "
            };
            output.push_str(&format!(
                "{target} [{}] {}: {}\n",
                command.id,
                command.name,
                Self::describe_control(command)
            ));
        }
        output.push_str(THIN_RULE);
        output.push('\n');
        output
    }

    fn describe_control(command: &Command) -> String {
        let style = command.style();
        if style.is_binary() {
            let state = if command.is_active() { "ON" } else { "OFF" };
            return format!("{state} (toggle)");
        }
        match style {
            ControlStyle::Slider => format!(
                "{}/{} ({})",
                command.slider_value(),
                command.slider_max(),
                command.action_possible.join(" ")
            ),
            _ => format!(
                "{} ({})",
                command.actual_status,
                command.action_possible.join(" | ")
            ),
        }
    }

    /// Format the phase; game over gets a banner
    pub fn format_phase(phase: GamePhase) -> String {
        let verdict = match phase {
            GamePhase::Lobby => return "\n~ phase: lobby\n".to_string(),
            GamePhase::Playing => return "\n~ phase: playing\n".to_string(),
            GamePhase::GameOver { victory: true } => "VICTORY - the rogue AI has been contained",
            GamePhase::GameOver { victory: false } => "DEFEAT - the rogue AI took over",
        };
        format!("\n\n{RULE}\n{verdict}\n{RULE}\n")
    }

    /// Format a connection status change
    pub fn format_connection(connected: bool, room_code: &str) -> String {
        if connected {
            format!("\n+ connected to room {room_code}\n")
        } else {
            format!("\n- disconnected from room {room_code}\n")
        }
    }

    /// Format an error published by the session
    pub fn format_error(error: &str) -> String {
        format!("\n! {error}\n")
    }

    /// Format the result of an outbound action
    pub fn format_send_result(what: &str, handed_over: bool) -> String {
        if handed_over {
            format!("sent {what}\n")
        } else {
            format!("could not send {what}: not connected\n")
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn seconds(millis: i64) -> f64 {
    millis as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameStatus, Instruction, PlayerInfo, TryHistoryItem};

    fn player(id: &str, name: &str, ready: bool) -> PlayerInfo {
        PlayerInfo {
            id: id.to_string(),
            name: name.to_string(),
            ready,
        }
    }

    #[test]
    fn test_format_room_info_marks_host_and_me() {
        // テスト項目: ホストには * が、自分には (me) が付く
        // given (前提条件):
        let info = RoomInfo {
            you: player("p2", "Bob", false),
            players: vec![player("p1", "Ann", true), player("p2", "Bob", false)],
            room_state: "waiting".to_string(),
            level: 2,
        };

        // when (操作):
        let result = MessageFormatter::format_room_info(&info);

        // then (期待する結果):
        assert!(result.contains("level 2"));
        assert!(result.contains("* Ann - ready"));
        assert!(result.contains("  Bob (me) - not ready"));
    }

    #[test]
    fn test_format_room_info_empty() {
        // テスト項目: プレイヤーが空の場合、適切なメッセージが表示される
        // given (前提条件):
        let info = RoomInfo {
            you: player("p1", "Ann", false),
            players: vec![],
            room_state: "waiting".to_string(),
            level: 1,
        };

        // when (操作):
        let result = MessageFormatter::format_room_info(&info);

        // then (期待する結果):
        assert!(result.contains("(No players)"));
    }

    #[test]
    fn test_format_game_state_with_history() {
        // テスト項目: 試行履歴が時刻付きで表示される
        // given (前提条件):
        let state = GameState {
            state: "end_state".to_string(),
            win: Some(false),
            try_history: Some(vec![TryHistoryItem {
                time: 1672531200000,
                player_id: "p1".to_string(),
                success: true,
            }]),
            ..Default::default()
        };

        // when (操作):
        let result = MessageFormatter::format_game_state(&state);

        // then (期待する結果):
        assert!(result.contains("end_state"));
        assert!(result.contains("p1 success at 2023-01-01T00:00:00"));
    }

    #[test]
    fn test_format_board_marks_target() {
        // テスト項目: 指示の対象コマンドに > が付き、残り時間が秒で表示される
        // given (前提条件):
        let board = PlayerBoard {
            commands: vec![
                Command {
                    id: "c1".to_string(),
                    name: "Firewall".to_string(),
                    kind: "switch".to_string(),
                    style_type: "toggle".to_string(),
                    actual_status: "active".to_string(),
                    action_possible: vec!["toggle".to_string()],
                },
                Command {
                    id: "c2".to_string(),
                    name: "Power".to_string(),
                    kind: "range".to_string(),
                    style_type: "slider".to_string(),
                    actual_status: "2".to_string(),
                    action_possible: vec!["0".to_string(), "4".to_string()],
                },
            ],
            instruction: Instruction {
                command_id: "c2".to_string(),
                instruction_text: "Set power to 4".to_string(),
                ..Default::default()
            },
            threat: 30,
        };

        // when (操作):
        let result = MessageFormatter::format_board(&board, 2500);

        // then (期待する結果):
        assert!(result.contains(">> Set power to 4 (2.5s left) | threat 30"));
        assert!(result.contains("  [c1] Firewall: ON (toggle)"));
        assert!(result.contains("> [c2] Power: 2/4 (0 4)"));
    }

    #[test]
    fn test_format_phase() {
        // テスト項目: ゲームオーバーでは勝敗に応じたバナーが、それ以外ではフェーズ名が表示される
        // given (前提条件):
        let over = GameStatus {
            game_over: true,
            victory: true,
        };
        let lost = GameStatus {
            game_over: true,
            victory: false,
        };

        // when (操作):
        let win = MessageFormatter::format_phase(over.phase(true));
        let loss = MessageFormatter::format_phase(lost.phase(false));
        let playing = MessageFormatter::format_phase(GameStatus::default().phase(true));
        let lobby = MessageFormatter::format_phase(GameStatus::default().phase(false));

        // then (期待する結果):
        assert!(win.contains("VICTORY"));
        assert!(loss.contains("DEFEAT"));
        assert_eq!(playing, "\n~ phase: playing\n");
        assert_eq!(lobby, "\n~ phase: lobby\n");
    }

    #[test]
    fn test_format_send_result() {
        // テスト項目: 送信結果が接続有無に応じて表示される
        // given (前提条件):

        // when (操作):
        let ok = MessageFormatter::format_send_result("ready", true);
        let failed = MessageFormatter::format_send_result("ready", false);

        // then (期待する結果):
        assert_eq!(ok, "sent ready\n");
        assert!(failed.contains("not connected"));
    }
}
