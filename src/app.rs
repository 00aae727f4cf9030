use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::command::{Command, command_for_char};
use crate::config::Config;
use crate::engine::cache::ProcessCache;
use crate::engine::sampler::Sampler;
use crate::engine::snapshot::Snapshot;
use crate::metrics::SystemSource;
use crate::view::ViewState;

pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(125);
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Loop-owned state: the current snapshot, the view flags, and the
/// sampling cadence. The run loop asks [`maybe_sample`](Self::maybe_sample)
/// each iteration; resampling happens only when the interval has elapsed,
/// a command arrived since the last render, or it is the first tick.
pub struct App {
    pub running: bool,
    pub view: ViewState,
    pub snapshot: Snapshot,
    pub refresh_interval: Duration,
    source: SystemSource,
    cache: ProcessCache,
    sampler: Sampler,
    last_sample: Instant,
    resample_requested: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut source = SystemSource::new();
        let sampler = Sampler::new(&mut source, config.general.count_smt_siblings);
        let snapshot = sampler.previous().clone();
        let refresh_interval = Duration::from_millis(config.general.refresh_rate_ms)
            .clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL);

        let mut app = App {
            running: true,
            view: ViewState::default(),
            snapshot,
            refresh_interval,
            source,
            cache: ProcessCache::new(),
            sampler,
            last_sample: Instant::now(),
            resample_requested: true,
        };
        app.apply_toggles(&config.general.panes);
        app
    }

    /// Apply a string of single-character toggles (config `panes` or the
    /// `PULSETOP` environment variable) exactly as if they were typed.
    pub fn apply_toggles(&mut self, toggles: &str) {
        for ch in toggles.chars() {
            self.dispatch(command_for_char(ch));
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Command {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Command::Quit;
        }
        match key.code {
            KeyCode::Char(ch) => command_for_char(ch),
            _ => Command::None,
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Quit => self.running = false,
            Command::TogglePane(_) | Command::SelectTopMode(_) => {
                self.view = self.view.apply(command);
            }
            Command::SlowDown => {
                self.refresh_interval = (self.refresh_interval * 2).min(MAX_REFRESH_INTERVAL);
            }
            Command::SpeedUp => {
                self.refresh_interval = (self.refresh_interval / 2).max(MIN_REFRESH_INTERVAL);
            }
            Command::Refresh => {}
            Command::None => return,
        }
        // Any recognized command forces a resample-and-redraw on the next
        // iteration regardless of elapsed time.
        self.resample_requested = true;
    }

    /// Resample if due. Returns whether a new snapshot was taken.
    pub fn maybe_sample(&mut self) -> bool {
        let due =
            self.resample_requested || self.last_sample.elapsed() >= self.refresh_interval;
        if !due {
            return false;
        }
        self.snapshot = self.sampler.sample(&mut self.source, &mut self.cache);
        self.last_sample = Instant::now();
        self.resample_requested = false;
        true
    }

    /// How long the input wait may block before the next resample is due.
    pub fn time_until_due(&self) -> Duration {
        if self.resample_requested {
            return Duration::ZERO;
        }
        (self.last_sample + self.refresh_interval).saturating_duration_since(Instant::now())
    }

    /// Re-run the sampler outside the cadence (used by tests and the
    /// explicit refresh command path).
    pub fn sample_now(&mut self) -> &Snapshot {
        self.resample_requested = true;
        self.maybe_sample();
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Pane, TopMode};

    fn test_app() -> App {
        App::new(Config::default())
    }

    #[test]
    fn default_keys_map_to_commands() {
        let app = test_app();

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Command::Quit);

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Command::TogglePane(Pane::Cpu));

        let key = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(
            app.map_key(key),
            Command::SelectTopMode(TopMode::MemoryVerbose)
        );

        // Ctrl+C always quits, even though plain 'c' toggles a pane
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Command::Quit);

        let key = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Command::None);
    }

    #[test]
    fn dispatch_quit_stops_the_loop() {
        let mut app = test_app();
        app.dispatch(Command::Quit);
        assert!(!app.running);
    }

    #[test]
    fn interval_changes_double_and_halve_with_clamping() {
        let mut app = test_app();
        app.refresh_interval = Duration::from_millis(1000);

        app.dispatch(Command::SlowDown);
        assert_eq!(app.refresh_interval, Duration::from_millis(2000));

        app.dispatch(Command::SpeedUp);
        app.dispatch(Command::SpeedUp);
        assert_eq!(app.refresh_interval, Duration::from_millis(500));

        app.refresh_interval = MIN_REFRESH_INTERVAL;
        app.dispatch(Command::SpeedUp);
        assert_eq!(app.refresh_interval, MIN_REFRESH_INTERVAL);

        app.refresh_interval = MAX_REFRESH_INTERVAL;
        app.dispatch(Command::SlowDown);
        assert_eq!(app.refresh_interval, MAX_REFRESH_INTERVAL);
    }

    #[test]
    fn commands_force_a_resample_on_the_next_iteration() {
        let mut app = test_app();
        app.maybe_sample();
        assert!(!app.maybe_sample()); // debounced: nothing due yet

        app.dispatch(Command::TogglePane(Pane::Disk));
        assert_eq!(app.time_until_due(), Duration::ZERO);
        assert!(app.maybe_sample());
    }

    #[test]
    fn unrecognized_toggle_characters_are_ignored() {
        let mut app = test_app();
        let before = app.view;
        app.apply_toggles("zZ19!");
        assert_eq!(app.view, before);
        assert!(app.running);
    }

    #[test]
    fn toggle_string_enables_panes_like_keystrokes() {
        let mut app = test_app();
        app.view = ViewState::default();
        app.apply_toggles("cdn");
        assert!(app.view.cpu);
        assert!(app.view.disk);
        assert!(app.view.network);
        assert!(!app.view.memory);
    }
}
