use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::Rng;
use rand::rngs::SmallRng;
use thiserror::Error;

use crate::engine::history::{HistoryEntry, HistoryLog, OutcomeKind};
use crate::engine::tracker::Settle;
use crate::engine::wheel::SlotView;
use crate::engine::words::{self, MAX_RANK, WordSource};

/// Highest scroll count a FORCE can be armed with.
pub const MAX_FORCE_COUNT: u32 = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Force {
        target: String,
        remaining: u32,
        initial: u32,
    },
    Vrtx {
        source: String,
        rank: usize,
        char_index: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("word must not be empty")]
    EmptyWord,
    #[error("scroll count must be between 1 and {MAX_FORCE_COUNT}")]
    CountOutOfRange,
    #[error("letter rank must be between 1 and {MAX_RANK}")]
    RankOutOfRange,
}

struct PendingRead {
    index: usize,
    kind: OutcomeKind,
    due: Instant,
}

/// The three-state injection machine. One settle event drives one cycle:
/// the about-to-be-centered slot is overwritten (or not) before the snap
/// animation locks, and the final centered word is read back after a fixed
/// post-snap delay, de-duplicated, and logged.
pub struct SelectionEngine {
    mode: Mode,
    rng: SmallRng,
    settle_delay: Duration,
    pending: VecDeque<PendingRead>,
    last_logged: Option<String>,
    history: HistoryLog,
}

impl SelectionEngine {
    pub fn new(rng: SmallRng, settle_delay: Duration, history_cap: usize) -> Self {
        Self {
            mode: Mode::Normal,
            rng,
            settle_delay,
            pending: VecDeque::new(),
            last_logged: None,
            history: HistoryLog::new(history_cap),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Refill the log from persisted entries (oldest first). Does not touch
    /// the de-duplication guard; a fresh session starts with a clean slate
    /// even when the display shows prior outcomes.
    pub fn restore_history(&mut self, entries: Vec<HistoryEntry>) {
        for entry in entries {
            self.history.append(entry);
        }
    }

    /// Arm FORCE: `target` lands after exactly `count` settles. Re-arming
    /// while a mode is active overwrites it.
    pub fn activate_force(&mut self, target: &str, count: u32) -> Result<(), ActivationError> {
        let target = words::normalize(target);
        if target.is_empty() {
            return Err(ActivationError::EmptyWord);
        }
        if count == 0 || count > MAX_FORCE_COUNT {
            return Err(ActivationError::CountOutOfRange);
        }
        self.mode = Mode::Force {
            target,
            remaining: count,
            initial: count,
        };
        Ok(())
    }

    /// Arm VRTX: each settle lands a word carrying the next letter of
    /// `source` at position `rank`.
    pub fn activate_vrtx(&mut self, source: &str, rank: usize) -> Result<(), ActivationError> {
        let source = words::normalize(source);
        if source.is_empty() {
            return Err(ActivationError::EmptyWord);
        }
        if rank == 0 || rank > MAX_RANK {
            return Err(ActivationError::RankOutOfRange);
        }
        self.mode = Mode::Vrtx {
            source,
            rank,
            char_index: 0,
        };
        Ok(())
    }

    /// Handle one settle event. Must run in the same pass that triggers the
    /// grid snap, so the overwrite lands before the view visually locks.
    pub fn on_settle(
        &mut self,
        settle: Settle,
        slots: &mut dyn SlotView,
        words: &WordSource,
        now: Instant,
    ) {
        // Possible after a rapid rebuild: the whole cycle is a no-op.
        if settle.index >= slots.slot_count() {
            return;
        }

        let mut kind = OutcomeKind::Normal;
        let mut finished = false;

        match &mut self.mode {
            Mode::Normal => {}
            Mode::Force {
                target,
                remaining,
                initial,
            } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    if slots.slot_text(settle.index) != Some(target.as_str()) {
                        slots.set_slot_text(settle.index, target.clone());
                    }
                    kind = OutcomeKind::Force;
                    *remaining = *initial;
                    finished = true;
                }
            }
            Mode::Vrtx {
                source,
                rank,
                char_index,
            } => {
                if let Some(letter) = source.chars().nth(*char_index) {
                    let candidates = words.lookup(*rank, letter, source);
                    let pick = if candidates.len() == 1 {
                        candidates[0].clone()
                    } else {
                        candidates[self.rng.gen_range(0..candidates.len())].clone()
                    };
                    slots.set_slot_text(settle.index, pick);
                    kind = OutcomeKind::Vrtx;
                    *char_index += 1;
                    if *char_index >= source.chars().count() {
                        finished = true;
                    }
                }
            }
        }

        if finished {
            self.mode = Mode::Normal;
        }

        self.pending.push_back(PendingRead {
            index: settle.index,
            kind,
            due: now + self.settle_delay,
        });
    }

    /// Complete any cycle whose post-snap delay has elapsed: read the
    /// centered slot, de-duplicate against the previously logged word, and
    /// append. Returns the entries logged this poll so the caller can hand
    /// them to its sinks. A pending read is never cancelled by later motion.
    pub fn poll_read(&mut self, slots: &dyn SlotView, now: Instant) -> Vec<HistoryEntry> {
        let mut logged = Vec::new();
        while self.pending.front().is_some_and(|read| read.due <= now) {
            let Some(read) = self.pending.pop_front() else {
                break;
            };
            let Some(word) = slots.slot_text(read.index) else {
                continue;
            };
            if self.last_logged.as_deref() == Some(word) {
                continue;
            }
            let entry = HistoryEntry {
                word: word.to_string(),
                kind: read.kind,
                timestamp: chrono::Utc::now(),
            };
            self.last_logged = Some(entry.word.clone());
            self.history.append(entry.clone());
            logged.push(entry);
        }
        logged
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::engine::wheel::WheelModel;
    use crate::engine::words::Language;

    const DELAY: Duration = Duration::from_millis(350);

    fn engine() -> SelectionEngine {
        SelectionEngine::new(SmallRng::seed_from_u64(7), DELAY, 20)
    }

    fn source() -> WordSource {
        WordSource::from_words(
            Language::En,
            &["AGREE", "SOLID", "FLOOR", "IDEAS", "STONE", "SMILE"],
        )
    }

    fn wheel(words: &WordSource) -> WheelModel {
        WheelModel::build(words.words(), 1.0)
    }

    fn settle(index: usize) -> Settle {
        Settle {
            index,
            snap_offset: index as f64,
        }
    }

    /// Run a full settle-then-read cycle, returning what was logged.
    fn cycle(
        eng: &mut SelectionEngine,
        wm: &mut WheelModel,
        ws: &WordSource,
        index: usize,
        t: Instant,
    ) -> Vec<HistoryEntry> {
        eng.on_settle(settle(index), wm, ws, t);
        eng.poll_read(wm, t + DELAY)
    }

    #[test]
    fn activation_validates_input() {
        let mut eng = engine();
        assert_eq!(eng.activate_force("", 3), Err(ActivationError::EmptyWord));
        assert_eq!(
            eng.activate_force("   ", 3),
            Err(ActivationError::EmptyWord)
        );
        assert_eq!(
            eng.activate_force("PARIS", 0),
            Err(ActivationError::CountOutOfRange)
        );
        assert_eq!(
            eng.activate_force("PARIS", 7),
            Err(ActivationError::CountOutOfRange)
        );
        assert_eq!(eng.activate_vrtx("", 2), Err(ActivationError::EmptyWord));
        assert_eq!(
            eng.activate_vrtx("GOLD", 0),
            Err(ActivationError::RankOutOfRange)
        );
        assert_eq!(
            eng.activate_vrtx("GOLD", 7),
            Err(ActivationError::RankOutOfRange)
        );
        assert_eq!(eng.mode(), &Mode::Normal);
    }

    #[test]
    fn activation_normalizes_the_word() {
        let mut eng = engine();
        eng.activate_force("  paris ", 2).unwrap();
        match eng.mode() {
            Mode::Force { target, .. } => assert_eq!(target, "PARIS"),
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn reactivation_overwrites_current_mode() {
        let mut eng = engine();
        eng.activate_force("PARIS", 3).unwrap();
        eng.activate_vrtx("GOLD", 2).unwrap();
        assert!(matches!(eng.mode(), Mode::Vrtx { .. }));
    }

    #[test]
    fn normal_cycle_leaves_slot_untouched() {
        let ws = source();
        let mut wm = wheel(&ws);
        let mut eng = engine();
        let before = wm.slot_text(10).unwrap().to_string();

        let logged = cycle(&mut eng, &mut wm, &ws, 10, Instant::now());
        assert_eq!(wm.slot_text(10), Some(before.as_str()));
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].kind, OutcomeKind::Normal);
        assert_eq!(logged[0].word, before);
    }

    #[test]
    fn force_counts_down_once_per_settle() {
        let ws = source();
        let mut wm = wheel(&ws);
        let mut eng = engine();
        eng.activate_force("PARIS", 3).unwrap();

        let t0 = Instant::now();
        eng.on_settle(settle(5), &mut wm, &ws, t0);
        match eng.mode() {
            Mode::Force { remaining, .. } => assert_eq!(*remaining, 2),
            other => panic!("unexpected mode {other:?}"),
        }
        eng.on_settle(settle(6), &mut wm, &ws, t0);
        match eng.mode() {
            Mode::Force { remaining, .. } => assert_eq!(*remaining, 1),
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn force_lands_on_the_final_settle() {
        let ws = source();
        let mut wm = wheel(&ws);
        let mut eng = engine();
        eng.activate_force("PARIS", 3).unwrap();

        let t0 = Instant::now();
        let first = cycle(&mut eng, &mut wm, &ws, 5, t0);
        assert_eq!(first[0].kind, OutcomeKind::Normal);
        let second = cycle(&mut eng, &mut wm, &ws, 6, t0 + DELAY);
        assert_eq!(second[0].kind, OutcomeKind::Normal);

        let third = cycle(&mut eng, &mut wm, &ws, 7, t0 + 2 * DELAY);
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].word, "PARIS");
        assert_eq!(third[0].kind, OutcomeKind::Force);
        assert_eq!(wm.slot_text(7), Some("PARIS"));
        assert_eq!(eng.mode(), &Mode::Normal);
    }

    #[test]
    fn force_skips_overwrite_when_slot_already_matches() {
        let ws = source();
        let mut wm = wheel(&ws);
        let mut eng = engine();
        wm.set_slot_text(4, "PARIS".to_string());
        eng.activate_force("PARIS", 1).unwrap();

        let logged = cycle(&mut eng, &mut wm, &ws, 4, Instant::now());
        assert_eq!(logged[0].word, "PARIS");
        assert_eq!(logged[0].kind, OutcomeKind::Force);
    }

    #[test]
    fn vrtx_spells_each_letter_at_rank() {
        let ws = source();
        let mut wm = wheel(&ws);
        let mut eng = engine();
        eng.activate_vrtx("GOLD", 2).unwrap();

        let t0 = Instant::now();
        for (k, expected) in "GOLD".chars().enumerate() {
            let logged = cycle(&mut eng, &mut wm, &ws, 10 + k, t0 + (k as u32) * DELAY);
            assert_eq!(logged.len(), 1, "cycle {k}");
            assert_eq!(logged[0].kind, OutcomeKind::Vrtx);
            let injected = &logged[0].word;
            assert_eq!(
                injected.chars().nth(1),
                Some(expected),
                "cycle {k} injected {injected}"
            );
            assert_ne!(injected.as_str(), "GOLD");
        }
        assert_eq!(eng.mode(), &Mode::Normal);
    }

    #[test]
    fn vrtx_without_candidates_injects_placeholder() {
        let ws = WordSource::from_words(Language::En, &["AAA", "BBB"]);
        let mut wm = wheel(&ws);
        let mut eng = engine();
        eng.activate_vrtx("Z", 2).unwrap();

        let logged = cycle(&mut eng, &mut wm, &ws, 3, Instant::now());
        assert_eq!(logged[0].word, "XZX");
        assert_eq!(logged[0].kind, OutcomeKind::Vrtx);
        assert_eq!(eng.mode(), &Mode::Normal);
    }

    #[test]
    fn out_of_range_settle_is_a_no_op() {
        let ws = source();
        let mut wm = wheel(&ws);
        let mut eng = engine();
        eng.activate_force("PARIS", 2).unwrap();

        let t0 = Instant::now();
        eng.on_settle(settle(usize::MAX), &mut wm, &ws, t0);
        // No countdown, no pending read, no log entry
        match eng.mode() {
            Mode::Force { remaining, .. } => assert_eq!(*remaining, 2),
            other => panic!("unexpected mode {other:?}"),
        }
        assert!(eng.poll_read(&wm, t0 + 2 * DELAY).is_empty());
        assert!(eng.history().is_empty());
    }

    #[test]
    fn consecutive_same_word_logs_once() {
        let ws = source();
        let mut wm = wheel(&ws);
        let mut eng = engine();

        let t0 = Instant::now();
        let first = cycle(&mut eng, &mut wm, &ws, 8, t0);
        assert_eq!(first.len(), 1);
        // Settling on the same slot again resolves to the same word
        let second = cycle(&mut eng, &mut wm, &ws, 8, t0 + DELAY);
        assert!(second.is_empty());
        assert_eq!(eng.history().len(), 1);
    }

    #[test]
    fn pending_read_survives_a_new_settle() {
        let ws = source();
        let mut wm = wheel(&ws);
        let mut eng = engine();

        let t0 = Instant::now();
        eng.on_settle(settle(3), &mut wm, &ws, t0);
        // Spectator nudges the wheel again before the first read fires
        eng.on_settle(settle(4), &mut wm, &ws, t0 + Duration::from_millis(200));

        let logged = eng.poll_read(&wm, t0 + Duration::from_secs(1));
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[0].word, wm.slot_text(3).unwrap());
        assert_eq!(logged[1].word, wm.slot_text(4).unwrap());
    }

    #[test]
    fn read_is_not_due_before_the_delay() {
        let ws = source();
        let mut wm = wheel(&ws);
        let mut eng = engine();

        let t0 = Instant::now();
        eng.on_settle(settle(3), &mut wm, &ws, t0);
        assert!(eng.poll_read(&wm, t0 + DELAY / 2).is_empty());
        assert_eq!(eng.poll_read(&wm, t0 + DELAY).len(), 1);
    }
}
