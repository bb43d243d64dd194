//! The local player's gameplay snapshot.

/// Rendering hint carried by `styleType`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlStyle {
    Toggle,
    LeverButton,
    OnOffButton,
    CustomButton,
    Slider,
    Other(String),
}

impl ControlStyle {
    pub fn parse(style_type: &str) -> Self {
        match style_type {
            "toggle" => Self::Toggle,
            "lever_button" => Self::LeverButton,
            "onoff_button" => Self::OnOffButton,
            "custom_button" => Self::CustomButton,
            "slider" => Self::Slider,
            other => Self::Other(other.to_string()),
        }
    }

    /// Styles driven by the single `toggle` action
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Toggle | Self::LeverButton | Self::OnOffButton)
    }
}

/// One controllable element of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: String,
    pub name: String,
    /// Wire field `type`
    pub kind: String,
    pub style_type: String,
    pub actual_status: String,
    /// Legal action tokens; ascending for sliders
    pub action_possible: Vec<String>,
}

const DEFAULT_SLIDER_MAX: i64 = 10;

impl Command {
    pub fn style(&self) -> ControlStyle {
        ControlStyle::parse(&self.style_type)
    }

    pub fn is_active(&self) -> bool {
        self.actual_status == "active"
    }

    /// Current slider position; unparsable statuses read as 0
    pub fn slider_value(&self) -> i64 {
        self.actual_status.trim().parse().unwrap_or(0)
    }

    /// Largest numeric action; 10 when there are no actions
    pub fn slider_max(&self) -> i64 {
        self.action_possible
            .iter()
            .map(|action| action.trim().parse::<i64>().unwrap_or(0))
            .max()
            .unwrap_or(DEFAULT_SLIDER_MAX)
    }

    pub fn allows(&self, action: &str) -> bool {
        self.action_possible.iter().any(|a| a == action)
    }
}

/// The single active task the player must answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instruction {
    pub command_id: String,
    /// Duration budget in milliseconds
    pub timeout: i64,
    /// Epoch milliseconds, server clock
    pub timestamp_creation: i64,
    pub command_type: String,
    pub instruction_text: String,
    pub expected_status: String,
}

/// Snapshot carried by a `player_board` frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerBoard {
    pub commands: Vec<Command>,
    pub instruction: Instruction,
    /// Not clamped by the client
    pub threat: i64,
}

impl PlayerBoard {
    pub fn command(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.id == id)
    }

    /// The command the current instruction refers to, if it is on this board
    pub fn target_command(&self) -> Option<&Command> {
        self.command(&self.instruction.command_id)
    }
}
