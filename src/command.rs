use crate::view::{Pane, TopMode};

/// Tagged state transitions. Keystrokes and the startup toggle string both
/// map through [`command_for_char`] so they share one dispatch path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePane(Pane),
    SelectTopMode(TopMode),
    /// Double the refresh interval.
    SlowDown,
    /// Halve the refresh interval, clamped to the floor.
    SpeedUp,
    /// Resample immediately regardless of elapsed time.
    Refresh,
    None,
}

pub fn command_for_char(ch: char) -> Command {
    match ch {
        'q' => Command::Quit,
        'c' => Command::TogglePane(Pane::Cpu),
        'm' => Command::TogglePane(Pane::Memory),
        'd' => Command::TogglePane(Pane::Disk),
        'n' => Command::TogglePane(Pane::Network),
        'p' => Command::SelectTopMode(TopMode::CpuTerse),
        'P' => Command::SelectTopMode(TopMode::CpuVerbose),
        'r' => Command::SelectTopMode(TopMode::MemoryTerse),
        'R' => Command::SelectTopMode(TopMode::MemoryVerbose),
        '-' => Command::SlowDown,
        '+' | '=' => Command::SpeedUp,
        ' ' => Command::Refresh,
        _ => Command::None,
    }
}
