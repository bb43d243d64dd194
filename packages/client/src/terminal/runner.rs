//! Terminal client: room resolution, projection printer and prompt loop.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    api::{RoomDirectory, RoomsClient},
    config::ClientConfig,
    domain::{GamePhase, PlayerBoard},
    error::ClientError,
    session::RoomSession,
};

use super::{
    formatter::MessageFormatter,
    input::{HELP, PromptCommand, parse_command},
    ui::{PROMPT, show},
};

/// Which room the terminal client joins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomTarget {
    Create,
    Join(String),
}

/// Turn `target` into a room code the session can open.
///
/// # Errors
///
/// * `ClientError::RoomNotFound` - joining a room the server does not know
/// * `ClientError::InvalidResponse` - room creation returned no code
/// * any transport error from `directory`
pub async fn resolve_room(
    directory: &dyn RoomDirectory,
    target: RoomTarget,
) -> Result<String, ClientError> {
    match target {
        RoomTarget::Create => {
            let code = directory.create_room().await?;
            if code.is_empty() {
                return Err(ClientError::InvalidResponse(
                    "create-room returned no room code".to_string(),
                ));
            }
            Ok(code)
        }
        RoomTarget::Join(code) => {
            let code = code.trim().to_string();
            if directory.room_exists(&code).await? {
                Ok(code)
            } else {
                Err(ClientError::RoomNotFound(code))
            }
        }
    }
}

/// Run the interactive client until the user quits or input ends.
///
/// # Errors
///
/// Returns an error if the room cannot be resolved.
pub async fn run_client(config: ClientConfig, target: RoomTarget) -> Result<(), ClientError> {
    let rooms = RoomsClient::new(config.clone())?;
    let room_code = resolve_room(&rooms, target).await?;

    let session = RoomSession::new(config);
    let printer = spawn_printer(&session, room_code.clone());
    session.open(&room_code);

    println!("\nJoined room {room_code}. Type 'help' for commands, Ctrl+D to leave.\n");

    let mut input_rx = spawn_readline();
    while let Some(line) = input_rx.recv().await {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                show(&format!("{message}\n"));
                continue;
            }
        };
        if command == PromptCommand::Quit {
            break;
        }
        handle_command(&session, &room_code, command);
    }

    session.close_normal();
    printer.abort();
    tracing::info!("Left room '{}'", room_code);
    Ok(())
}

fn handle_command(session: &RoomSession, room_code: &str, command: PromptCommand) {
    let output = match command {
        PromptCommand::ToggleReady => {
            MessageFormatter::format_send_result("ready toggle", session.toggle_ready())
        }
        PromptCommand::RefreshName => {
            MessageFormatter::format_send_result("name refresh", session.refresh_name())
        }
        PromptCommand::Execute { command_id, action } => {
            let checked = check_action(session.player_board().borrow().as_ref(), &command_id, &action);
            match checked {
                Ok(()) => MessageFormatter::format_send_result(
                    &format!("{action} on {command_id}"),
                    session.send_execute_action(&command_id, &action),
                ),
                Err(message) => format!("{message}\n"),
            }
        }
        PromptCommand::Status => status_report(session, room_code),
        PromptCommand::Rejoin => {
            session.open(room_code);
            format!("rejoining room {room_code}\n")
        }
        PromptCommand::Help => format!("{HELP}\n"),
        PromptCommand::Quit => return,
    };
    show(&output);
}

/// Reject actions the current board does not offer for `command_id`.
///
/// Commands missing from the board are left to the server to judge.
fn check_action(
    board: Option<&PlayerBoard>,
    command_id: &str,
    action: &str,
) -> Result<(), String> {
    match board.and_then(|board| board.command(command_id)) {
        Some(command) if !command.allows(action) => Err(format!(
            "'{action}' is not available on {command_id}, try: {}",
            command.action_possible.join(" ")
        )),
        _ => Ok(()),
    }
}

fn status_report(session: &RoomSession, room_code: &str) -> String {
    let mut output = MessageFormatter::format_connection(*session.connected().borrow(), room_code);
    if let Some(info) = session.room_info().borrow().as_ref() {
        output.push_str(&MessageFormatter::format_room_info(info));
    }
    if let Some(state) = session.game_state().borrow().as_ref() {
        output.push_str(&MessageFormatter::format_game_state(state));
    }
    let board_received = {
        let board = session.player_board();
        let board = board.borrow();
        if let Some(board) = board.as_ref() {
            let remaining = *session.time_remaining().borrow();
            output.push_str(&MessageFormatter::format_board(board, remaining));
        }
        board.is_some()
    };
    let status = *session.game_status().borrow();
    output.push_str(&MessageFormatter::format_phase(status.phase(board_received)));
    output
}

/// Print every projection change until aborted.
///
/// `time_remaining` is only shown alongside a board; it changes every tick.
fn spawn_printer(session: &RoomSession, room_code: String) -> JoinHandle<()> {
    let mut connected = session.connected();
    let mut room_info = session.room_info();
    let mut game_state = session.game_state();
    let mut player_board = session.player_board();
    let mut last_error = session.last_error();
    let mut game_status = session.game_status();
    let time_remaining = session.time_remaining();

    tokio::spawn(async move {
        loop {
            let output = tokio::select! {
                Ok(()) = connected.changed() => {
                    MessageFormatter::format_connection(*connected.borrow_and_update(), &room_code)
                }
                Ok(()) = room_info.changed() => {
                    match room_info.borrow_and_update().as_ref() {
                        Some(info) => MessageFormatter::format_room_info(info),
                        None => continue,
                    }
                }
                Ok(()) = game_state.changed() => {
                    match game_state.borrow_and_update().as_ref() {
                        Some(state) => MessageFormatter::format_game_state(state),
                        None => continue,
                    }
                }
                Ok(()) = player_board.changed() => {
                    match player_board.borrow_and_update().as_ref() {
                        Some(board) => {
                            MessageFormatter::format_board(board, *time_remaining.borrow())
                        }
                        None => continue,
                    }
                }
                Ok(()) = last_error.changed() => {
                    match last_error.borrow_and_update().as_deref() {
                        Some(error) => MessageFormatter::format_error(error),
                        None => continue,
                    }
                }
                Ok(()) = game_status.changed() => {
                    let status = *game_status.borrow_and_update();
                    let phase = status.phase(player_board.borrow().is_some());
                    if !matches!(phase, GamePhase::GameOver { .. }) {
                        continue;
                    }
                    MessageFormatter::format_phase(phase)
                }
                else => break,
            };
            show(&output);
        }
    })
}

/// Read prompt lines on a blocking thread and forward them.
///
/// The channel closes on Ctrl+C, Ctrl+D or a readline failure.
fn spawn_readline() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();
                    if input_tx.send(line.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
