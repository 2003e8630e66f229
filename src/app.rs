use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::engine::history::HistoryEntry;
use crate::engine::selection::SelectionEngine;
use crate::engine::tracker::ScrollTracker;
use crate::engine::wheel::{SlotView, WheelModel};
use crate::engine::words::{Language, WordSource};
use crate::store::json_store::JsonStore;
#[cfg(feature = "network")]
use crate::store::remote::RemoteSink;
use crate::ui::components::setup_form::{FormKind, SetupForm};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Wheel,
    ForceSetup,
    VrtxSetup,
    History,
}

/// One terminal row per slot.
pub const SLOT_HEIGHT: f64 = 1.0;
/// Sub-slot nudge per scroll input, so the wheel moves analog-style.
pub const SCROLL_STEP: f64 = 0.5;

const TRIGGER_PRESSES: u8 = 3;
const TRIGGER_WINDOW: Duration = Duration::from_millis(600);

/// Covert trigger detection: the same key pressed three times inside a short
/// window. The spectator watching the performer sees nothing on screen.
pub struct TripleTap {
    state: Option<(char, u8, Instant)>,
}

impl TripleTap {
    pub fn new() -> Self {
        Self { state: None }
    }

    pub fn press(&mut self, key: char, now: Instant) -> bool {
        let count = match self.state {
            Some((k, count, last))
                if k == key && now.duration_since(last) <= TRIGGER_WINDOW =>
            {
                count + 1
            }
            _ => 1,
        };
        if count >= TRIGGER_PRESSES {
            self.state = None;
            true
        } else {
            self.state = Some((key, count, now));
            false
        }
    }
}

impl Default for TripleTap {
    fn default() -> Self {
        Self::new()
    }
}

pub struct App {
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub config: Config,
    pub words: WordSource,
    pub wheel: WheelModel,
    pub tracker: ScrollTracker,
    pub engine: SelectionEngine,
    pub form: Option<SetupForm>,
    pub store: Option<JsonStore>,
    #[cfg(feature = "network")]
    sink: Option<RemoteSink>,
    pub should_quit: bool,
    trigger: TripleTap,
}

impl App {
    pub fn new(seed: Option<u64>) -> Self {
        let mut config = Config::load().unwrap_or_default();
        config.validate();

        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let language = Language::from_code(&config.language).unwrap_or(Language::Fr);
        let mut words = WordSource::load();
        words.set_language(language);
        rust_i18n::set_locale(language.code());

        let wheel = WheelModel::build(words.words(), SLOT_HEIGHT);
        let mut tracker = ScrollTracker::new(
            SLOT_HEIGHT,
            9.0 * SLOT_HEIGHT,
            Duration::from_millis(config.idle_ms),
        );
        // Start deep into the wheel so neither end is reachable in a session
        tracker.reset_offset(wheel.offset_of(wheel.slot_count() / 4));

        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut engine = SelectionEngine::new(
            rng,
            Duration::from_millis(config.settle_ms),
            config.history_cap,
        );

        let store = JsonStore::new().ok();
        if let Some(ref store) = store {
            engine.restore_history(store.load_history().entries);
        }

        #[cfg(feature = "network")]
        let sink = config
            .sync_url
            .as_deref()
            .and_then(|url| RemoteSink::new(url).ok());

        Self {
            screen: AppScreen::Wheel,
            theme,
            config,
            words,
            wheel,
            tracker,
            engine,
            form: None,
            store,
            #[cfg(feature = "network")]
            sink,
            should_quit: false,
            trigger: TripleTap::new(),
        }
    }

    pub fn set_viewport_rows(&mut self, rows: u16) {
        self.tracker.set_viewport(rows as f64 * SLOT_HEIGHT);
    }

    pub fn scroll_by(&mut self, delta: f64, now: Instant) {
        let max_offset = (self.wheel.total_height() - self.tracker.viewport()).max(0.0);
        let offset = (self.tracker.offset() + delta).clamp(0.0, max_offset);
        self.tracker.record_motion(offset, now);
    }

    /// One cooperative step: fire a due settle (inject, then snap) and
    /// complete any due read-back, handing logged entries to the sinks.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(settle) = self.tracker.poll(now) {
            self.engine
                .on_settle(settle, &mut self.wheel, &self.words, now);
            self.tracker.reset_offset(settle.snap_offset);
        }
        let logged = self.engine.poll_read(&self.wheel, now);
        for entry in &logged {
            self.persist(entry);
        }
    }

    fn persist(&self, entry: &HistoryEntry) {
        if let Some(ref store) = self.store {
            let _ = store.append_entry(entry, self.config.history_cap);
        }
        #[cfg(feature = "network")]
        if let Some(ref sink) = self.sink {
            let _ = sink.forward(entry);
        }
    }

    /// Returns true when this press completes a covert triple-tap.
    pub fn trigger_press(&mut self, key: char, now: Instant) -> bool {
        self.trigger.press(key, now)
    }

    pub fn open_force_setup(&mut self) {
        self.form = Some(SetupForm::new(FormKind::Force));
        self.screen = AppScreen::ForceSetup;
    }

    pub fn open_vrtx_setup(&mut self) {
        self.form = Some(SetupForm::new(FormKind::Vrtx));
        self.screen = AppScreen::VrtxSetup;
    }

    pub fn open_history(&mut self) {
        self.screen = AppScreen::History;
    }

    pub fn close_overlay(&mut self) {
        self.form = None;
        self.screen = AppScreen::Wheel;
    }

    /// Validate and arm the mode described by the open form. Invalid input
    /// keeps the form open with its error tint; nothing is armed.
    pub fn submit_form(&mut self) {
        let Some(ref mut form) = self.form else {
            return;
        };
        let result = match form.kind {
            FormKind::Force => self.engine.activate_force(&form.word, form.level),
            FormKind::Vrtx => self.engine.activate_vrtx(&form.word, form.level as usize),
        };
        match result {
            Ok(()) => self.close_overlay(),
            Err(_) => form.invalid = true,
        }
    }

    pub fn clear_history(&mut self) {
        self.engine.clear_history();
        if let Some(ref store) = self.store {
            let _ = store.clear_history();
        }
    }

    pub fn set_theme(&mut self, name: &str) {
        if let Some(theme) = Theme::load(name) {
            self.theme = Box::leak(Box::new(theme));
            self.config.theme = name.to_string();
        }
    }

    pub fn toggle_theme(&mut self) {
        let next = if self.config.theme == "midnight" {
            "daylight"
        } else {
            "midnight"
        };
        self.set_theme(next);
        let _ = self.config.save();
    }

    pub fn set_language_code(&mut self, code: &str) {
        if let Some(language) = Language::from_code(code) {
            self.apply_language(language);
        }
    }

    pub fn toggle_language(&mut self) {
        self.apply_language(self.words.language().toggled());
        let _ = self.config.save();
    }

    /// Swap the word list and rebuild the wheel, keeping the spectator's
    /// fractional position so the switch reads as a seamless refresh.
    fn apply_language(&mut self, language: Language) {
        self.words.set_language(language);
        let offset = self.wheel.rebuild(self.words.words(), self.tracker.offset());
        self.tracker.reset_offset(offset);
        rust_i18n::set_locale(language.code());
        self.config.language = language.code().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_tap_fires_on_third_fast_press() {
        let mut tap = TripleTap::new();
        let t0 = Instant::now();
        assert!(!tap.press('f', t0));
        assert!(!tap.press('f', t0 + Duration::from_millis(200)));
        assert!(tap.press('f', t0 + Duration::from_millis(400)));
    }

    #[test]
    fn slow_presses_restart_the_count() {
        let mut tap = TripleTap::new();
        let t0 = Instant::now();
        assert!(!tap.press('f', t0));
        assert!(!tap.press('f', t0 + Duration::from_secs(2)));
        assert!(!tap.press('f', t0 + Duration::from_secs(2) + Duration::from_millis(100)));
        assert!(tap.press('f', t0 + Duration::from_secs(2) + Duration::from_millis(200)));
    }

    #[test]
    fn switching_keys_restarts_the_count() {
        let mut tap = TripleTap::new();
        let t0 = Instant::now();
        assert!(!tap.press('f', t0));
        assert!(!tap.press('v', t0 + Duration::from_millis(100)));
        assert!(!tap.press('v', t0 + Duration::from_millis(200)));
        assert!(tap.press('v', t0 + Duration::from_millis(300)));
    }

    #[test]
    fn completed_gesture_resets_cleanly() {
        let mut tap = TripleTap::new();
        let t0 = Instant::now();
        tap.press('h', t0);
        tap.press('h', t0 + Duration::from_millis(100));
        assert!(tap.press('h', t0 + Duration::from_millis(200)));
        // The next press starts a fresh count
        assert!(!tap.press('h', t0 + Duration::from_millis(300)));
    }
}
