//! Prompt command parsing.
//!
//! Pure functions, no I/O.

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    ToggleReady,
    RefreshName,
    Execute { command_id: String, action: String },
    Status,
    Rejoin,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  ready                 toggle your ready flag
  name                  ask for a new display name
  do <command> <action> act on a board command
  status                show the current room, game and board
  rejoin                reopen the connection to the same room
  help                  show this help
  quit                  leave the room";

/// Parse one trimmed, non-empty line.
///
/// # Returns
///
/// * `Ok(PromptCommand)` - a recognized command
/// * `Err(String)` - a message to show the user
pub fn parse_command(line: &str) -> Result<PromptCommand, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".to_string());
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "ready" | "r" => PromptCommand::ToggleReady,
        "name" | "n" => PromptCommand::RefreshName,
        "status" | "s" => PromptCommand::Status,
        "rejoin" => PromptCommand::Rejoin,
        "help" | "?" => PromptCommand::Help,
        "quit" | "exit" | "q" => PromptCommand::Quit,
        "do" => {
            let (Some(command_id), Some(action)) = (words.next(), words.next()) else {
                return Err("usage: do <command> <action>".to_string());
            };
            PromptCommand::Execute {
                command_id: command_id.to_string(),
                action: action.to_string(),
            }
        }
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };

    if words.next().is_some() {
        return Err(format!("too many arguments for '{head}'"));
    }
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        // テスト項目: 引数の無いコマンドと別名が解析される
        // given (前提条件):
        let lines = ["ready", "NAME", "s", "rejoin", "?", "exit"];

        // when (操作):
        let parsed: Vec<_> = lines.iter().map(|l| parse_command(l)).collect();

        // then (期待する結果):
        assert_eq!(
            parsed,
            vec![
                Ok(PromptCommand::ToggleReady),
                Ok(PromptCommand::RefreshName),
                Ok(PromptCommand::Status),
                Ok(PromptCommand::Rejoin),
                Ok(PromptCommand::Help),
                Ok(PromptCommand::Quit),
            ]
        );
    }

    #[test]
    fn test_parse_execute() {
        // テスト項目: do コマンドがコマンド ID とアクションに分解される
        // given (前提条件):
        let line = "do cmd-7 toggle";

        // when (操作):
        let parsed = parse_command(line);

        // then (期待する結果):
        assert_eq!(
            parsed,
            Ok(PromptCommand::Execute {
                command_id: "cmd-7".to_string(),
                action: "toggle".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        // テスト項目: 不足・過剰な引数や未知のコマンドはエラーメッセージになる
        // given (前提条件):

        // when (操作):
        let missing = parse_command("do cmd-7");
        let extra = parse_command("ready now");
        let unknown = parse_command("dance");

        // then (期待する結果):
        assert!(missing.unwrap_err().contains("usage"));
        assert!(extra.unwrap_err().contains("too many"));
        assert!(unknown.unwrap_err().contains("unknown command"));
    }
}
