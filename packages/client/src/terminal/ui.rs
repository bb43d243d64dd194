//! UI utilities for the terminal client.

use std::io::Write;

pub const PROMPT: &str = "rogueai> ";

/// Redisplay the prompt after printing asynchronous output
pub fn redisplay_prompt() {
    print!("{PROMPT}");
    std::io::stdout().flush().ok();
}

/// Print a block of output followed by a fresh prompt
pub fn show(text: &str) {
    print!("{text}");
    redisplay_prompt();
}
