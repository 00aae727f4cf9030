use crate::command::Command;
use crate::engine::rank::RankMetric;

/// A toggleable display pane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pane {
    Cpu,
    Memory,
    Disk,
    Network,
}

/// Mutually exclusive top-process table modes: the ranking metric crossed
/// with terse (name only) or verbose (full command line) rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopMode {
    CpuTerse,
    CpuVerbose,
    MemoryTerse,
    MemoryVerbose,
}

impl TopMode {
    pub fn metric(self) -> RankMetric {
        match self {
            TopMode::CpuTerse | TopMode::CpuVerbose => RankMetric::CpuShare,
            TopMode::MemoryTerse | TopMode::MemoryVerbose => RankMetric::ResidentMemory,
        }
    }

    pub fn verbose(self) -> bool {
        matches!(self, TopMode::CpuVerbose | TopMode::MemoryVerbose)
    }

    pub fn label(self) -> &'static str {
        match self {
            TopMode::CpuTerse => "top: %cpu",
            TopMode::CpuVerbose => "top: %cpu (cmd)",
            TopMode::MemoryTerse => "top: mem",
            TopMode::MemoryVerbose => "top: mem (cmd)",
        }
    }
}

/// Which panes are visible and which top-process mode is active. Mutated
/// only through the pure [`apply`](Self::apply) reducer so the state
/// machine tests without a terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub cpu: bool,
    pub memory: bool,
    pub disk: bool,
    pub network: bool,
    pub top: Option<TopMode>,
}

impl ViewState {
    /// When nothing is visible the display falls back to the welcome pane.
    pub fn any_visible(&self) -> bool {
        self.cpu || self.memory || self.disk || self.network || self.top.is_some()
    }

    pub fn apply(self, command: Command) -> ViewState {
        let mut next = self;
        match command {
            Command::TogglePane(Pane::Cpu) => next.cpu = !next.cpu,
            Command::TogglePane(Pane::Memory) => next.memory = !next.memory,
            Command::TogglePane(Pane::Disk) => next.disk = !next.disk,
            Command::TogglePane(Pane::Network) => next.network = !next.network,
            // Selecting a mode clears the others in the group; re-selecting
            // the active one switches the table off.
            Command::SelectTopMode(mode) => {
                next.top = if next.top == Some(mode) {
                    None
                } else {
                    Some(mode)
                };
            }
            _ => {}
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_an_active_pane_disables_it() {
        let state = ViewState::default().apply(Command::TogglePane(Pane::Cpu));
        assert!(state.cpu);
        let state = state.apply(Command::TogglePane(Pane::Cpu));
        assert!(!state.cpu);
    }

    #[test]
    fn pane_toggles_are_independent() {
        let state = ViewState::default()
            .apply(Command::TogglePane(Pane::Disk))
            .apply(Command::TogglePane(Pane::Network));
        assert!(state.disk);
        assert!(state.network);
        assert!(!state.cpu);
        assert!(!state.memory);
    }

    #[test]
    fn selecting_a_top_mode_clears_the_others() {
        let state = ViewState::default().apply(Command::SelectTopMode(TopMode::CpuTerse));
        assert_eq!(state.top, Some(TopMode::CpuTerse));

        let state = state.apply(Command::SelectTopMode(TopMode::MemoryVerbose));
        assert_eq!(state.top, Some(TopMode::MemoryVerbose));
    }

    #[test]
    fn reselecting_the_active_top_mode_turns_the_table_off() {
        let state = ViewState::default()
            .apply(Command::SelectTopMode(TopMode::MemoryTerse))
            .apply(Command::SelectTopMode(TopMode::MemoryTerse));
        assert_eq!(state.top, None);
    }

    #[test]
    fn empty_state_falls_back_to_welcome() {
        let state = ViewState::default();
        assert!(!state.any_visible());
        let state = state.apply(Command::TogglePane(Pane::Memory));
        assert!(state.any_visible());
    }

    #[test]
    fn non_view_commands_leave_the_state_unchanged() {
        let state = ViewState::default().apply(Command::TogglePane(Pane::Cpu));
        assert_eq!(state.apply(Command::Quit), state);
        assert_eq!(state.apply(Command::SpeedUp), state);
        assert_eq!(state.apply(Command::Refresh), state);
    }

    #[test]
    fn top_modes_map_to_metric_and_verbosity() {
        assert_eq!(TopMode::CpuTerse.metric(), RankMetric::CpuShare);
        assert_eq!(TopMode::MemoryVerbose.metric(), RankMetric::ResidentMemory);
        assert!(!TopMode::CpuTerse.verbose());
        assert!(TopMode::CpuVerbose.verbose());
    }
}
