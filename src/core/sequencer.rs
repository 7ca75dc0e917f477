use crate::core::error::SequencerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

pub type CompletionHandler = Box<dyn FnMut() + Send>;

/// Where [`StepSequencer::retreat`] stops and reports a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetreatFloor {
    /// Indices at or below the start index are a boundary.
    #[default]
    StartIndex,
    /// Only index 0 is a boundary.
    First,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    /// The final advance; the completion handler ran.
    Completed,
    /// Advanced past the end again without a reset; nothing ran.
    AlreadyCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved(usize),
    AtBoundary,
}

impl Retreat {
    pub fn is_boundary(self) -> bool {
        matches!(self, Self::AtBoundary)
    }
}

/// Linear wizard over a fixed list of steps.
///
/// The index always points at a valid step. Forward progress past the last
/// step runs the completion handler once; it will not run again until
/// [`reset`](Self::reset) is called.
pub struct StepSequencer<S> {
    steps: Vec<S>,
    start: usize,
    current: usize,
    editing: bool,
    highest: usize,
    completed: bool,
    return_after_edit: bool,
    floor: RetreatFloor,
    on_complete: CompletionHandler,
}

impl<S> StepSequencer<S> {
    pub fn new(
        steps: Vec<S>,
        start_index: usize,
        on_complete: impl FnMut() + Send + 'static,
    ) -> Result<Self, SequencerError> {
        if steps.is_empty() {
            return Err(SequencerError::Empty);
        }
        if start_index >= steps.len() {
            return Err(SequencerError::StartOutOfRange {
                index: start_index,
                len: steps.len(),
            });
        }

        Ok(Self {
            steps,
            start: start_index,
            current: start_index,
            editing: false,
            highest: start_index,
            completed: false,
            return_after_edit: false,
            floor: RetreatFloor::default(),
            on_complete: Box::new(on_complete),
        })
    }

    /// After a jump, the next advance returns to the last step instead of
    /// moving one forward.
    pub fn with_return_after_edit(mut self, enabled: bool) -> Self {
        self.return_after_edit = enabled;
        self
    }

    pub fn with_retreat_floor(mut self, floor: RetreatFloor) -> Self {
        self.floor = floor;
        self
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &S {
        &self.steps[self.current]
    }

    pub fn step_at(&self, index: usize) -> Option<&S> {
        self.steps.get(index)
    }

    pub fn start_index(&self) -> usize {
        self.start
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn highest_reached(&self) -> usize {
        self.highest
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    pub fn advance(&mut self) -> Advance {
        if self.is_last() {
            if self.completed {
                debug!(index = self.current, "advance past end ignored, already completed");
                return Advance::AlreadyCompleted;
            }
            self.completed = true;
            self.editing = false;
            info!(steps = self.steps.len(), "step sequence completed");
            (self.on_complete)();
            return Advance::Completed;
        }

        let from = self.current;
        let to = if self.editing && self.return_after_edit {
            self.steps.len() - 1
        } else {
            from + 1
        };
        self.current = to;
        self.editing = false;
        self.highest = self.highest.max(to);
        debug!(from, to, "advanced");
        Advance::Moved(to)
    }

    pub fn retreat(&mut self) -> Retreat {
        let floor = match self.floor {
            RetreatFloor::StartIndex => self.start,
            RetreatFloor::First => 0,
        };
        if self.current <= floor {
            debug!(index = self.current, floor, "retreat hit boundary");
            return Retreat::AtBoundary;
        }

        let from = self.current;
        self.current -= 1;
        debug!(from, to = self.current, "retreated");
        Retreat::Moved(self.current)
    }

    pub fn jump_to(&mut self, target: usize) -> Result<(), SequencerError> {
        if target >= self.steps.len() {
            return Err(SequencerError::TargetOutOfRange {
                index: target,
                len: self.steps.len(),
            });
        }

        let from = self.current;
        self.current = target;
        self.editing = true;
        self.highest = self.highest.max(target);
        debug!(from, to = target, "jumped");
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current = self.start;
        self.editing = false;
        self.highest = self.start;
        self.completed = false;
        debug!(index = self.start, "sequencer reset");
    }
}

impl<S: fmt::Debug> fmt::Debug for StepSequencer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSequencer")
            .field("steps", &self.steps)
            .field("start", &self.start)
            .field("current", &self.current)
            .field("editing", &self.editing)
            .field("highest", &self.highest)
            .field("completed", &self.completed)
            .field("return_after_edit", &self.return_after_edit)
            .field("floor", &self.floor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Advance, Retreat, RetreatFloor, StepSequencer};
    use crate::core::error::SequencerError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted(
        steps: Vec<&'static str>,
        start: usize,
    ) -> (StepSequencer<&'static str>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let seq = StepSequencer::new(steps, start, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("valid sequencer");
        (seq, calls)
    }

    fn state(seq: &StepSequencer<&'static str>) -> (usize, bool) {
        (seq.current_index(), seq.is_editing())
    }

    #[test]
    fn rejects_empty_step_list() {
        let err = StepSequencer::<u8>::new(Vec::new(), 0, || {}).unwrap_err();
        assert_eq!(err, SequencerError::Empty);
    }

    #[test]
    fn rejects_start_past_end() {
        let err = StepSequencer::new(vec!['a', 'b'], 2, || {}).unwrap_err();
        assert_eq!(err, SequencerError::StartOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn starts_at_start_index_not_editing() {
        for n in 1..6 {
            for start in 0..n {
                let steps = (0..n).collect::<Vec<_>>();
                let seq = StepSequencer::new(steps, start, || {}).expect("valid");
                assert_eq!(seq.current_index(), start);
                assert!(!seq.is_editing());
                assert_eq!(*seq.current_step(), start);
            }
        }
    }

    #[test]
    fn advancing_through_runs_completion_once() {
        let (mut seq, calls) = counted(vec!["a", "b", "c", "d"], 0);
        for expected in 1..4 {
            assert_eq!(seq.advance(), Advance::Moved(expected));
        }
        assert_eq!(seq.current_index(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(seq.advance(), Advance::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(seq.current_index(), 3);

        assert_eq!(seq.advance(), Advance::AlreadyCompleted);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reset_allows_completion_again() {
        let (mut seq, calls) = counted(vec!["only"], 0);
        assert_eq!(seq.advance(), Advance::Completed);
        seq.reset();
        assert!(!seq.is_completed());
        assert_eq!(seq.advance(), Advance::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn retreat_at_start_signals_boundary() {
        let (mut seq, _) = counted(vec!["a", "b", "c", "d"], 2);
        assert_eq!(seq.retreat(), Retreat::AtBoundary);
        assert_eq!(seq.current_index(), 2);

        seq.advance();
        assert_eq!(seq.retreat(), Retreat::Moved(2));
        assert!(seq.retreat().is_boundary());
    }

    #[test]
    fn retreat_floor_first_walks_to_zero() {
        let (seq, _) = counted(vec!["a", "b", "c"], 2);
        let mut seq = seq.with_retreat_floor(RetreatFloor::First);
        assert_eq!(seq.retreat(), Retreat::Moved(1));
        assert_eq!(seq.retreat(), Retreat::Moved(0));
        assert_eq!(seq.retreat(), Retreat::AtBoundary);
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn retreat_keeps_editing_flag() {
        let (mut seq, _) = counted(vec!["a", "b", "c", "d"], 0);
        seq.jump_to(3).expect("in range");
        assert_eq!(seq.retreat(), Retreat::Moved(2));
        assert!(seq.is_editing());
    }

    #[test]
    fn jump_sets_editing_regardless_of_prior_state() {
        let (mut seq, _) = counted(vec!["a", "b", "c", "d", "e"], 0);
        for target in [4, 0, 2, 2] {
            seq.jump_to(target).expect("in range");
            assert_eq!(state(&seq), (target, true));
        }
    }

    #[test]
    fn jump_out_of_range_leaves_state_untouched() {
        let (mut seq, _) = counted(vec!["a", "b"], 1);
        let err = seq.jump_to(5).unwrap_err();
        assert_eq!(err, SequencerError::TargetOutOfRange { index: 5, len: 2 });
        assert_eq!(state(&seq), (1, false));
    }

    #[test]
    fn advance_after_jump_clears_editing() {
        let (mut seq, _) = counted(vec!["a", "b", "c", "d", "e"], 0);
        seq.jump_to(2).expect("in range");
        assert_eq!(seq.advance(), Advance::Moved(3));
        assert_eq!(state(&seq), (3, false));
    }

    #[test]
    fn five_step_scenario() {
        let (mut seq, calls) = counted(vec!["A", "B", "C", "D", "E"], 0);
        let mut seen = Vec::new();
        seq.advance();
        seen.push(state(&seq));
        seq.advance();
        seen.push(state(&seq));
        seq.jump_to(0).expect("in range");
        seen.push(state(&seq));
        seq.advance();
        seen.push(state(&seq));

        assert_eq!(seen, vec![(1, false), (2, false), (0, true), (1, false)]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn single_step_scenario() {
        let (mut seq, calls) = counted(vec!["only"], 0);
        assert_eq!(seq.retreat(), Retreat::AtBoundary);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(seq.advance(), Advance::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn return_after_edit_goes_back_to_review() {
        let (seq, _) = counted(vec!["a", "b", "c", "review"], 3);
        let mut seq = seq.with_return_after_edit(true);
        seq.jump_to(1).expect("in range");
        assert_eq!(seq.advance(), Advance::Moved(3));
        assert!(!seq.is_editing());
        assert_eq!(*seq.current_step(), "review");
    }

    #[test]
    fn highest_reached_tracks_forward_progress() {
        let (mut seq, _) = counted(vec!["a", "b", "c", "d"], 0);
        seq.advance();
        seq.advance();
        seq.retreat();
        assert_eq!(seq.highest_reached(), 2);
        seq.jump_to(3).expect("in range");
        assert_eq!(seq.highest_reached(), 3);
        seq.reset();
        assert_eq!(seq.highest_reached(), 0);
    }

    #[test]
    fn index_stays_in_range_for_any_operation_sequence() {
        let n = 4;
        let (mut seq, _) = counted(vec!["a", "b", "c", "d"], 1);
        let mut rng: u32 = 0x2545_f491;
        for _ in 0..500 {
            rng ^= rng << 13;
            rng ^= rng >> 17;
            rng ^= rng << 5;
            match rng % 4 {
                0 => {
                    seq.advance();
                }
                1 => {
                    seq.retreat();
                }
                2 => {
                    let _ = seq.jump_to((rng as usize >> 3) % (n + 2));
                }
                _ => seq.reset(),
            }
            assert!(seq.current_index() < n);
        }
    }
}
