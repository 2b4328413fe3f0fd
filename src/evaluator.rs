use std::time::Duration;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Classification of a single position in the target text.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum PositionState {
    /// not typed yet, or backspaced over and waiting to be re-typed
    Pending,
    Correct,
    Incorrect,
    /// first typed wrong, then backspaced and re-typed correctly
    Corrected,
}

/// One typed character, as logged against the target text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keystroke {
    pub char: char,
    pub expected: char,
    pub position: usize,
    pub outcome: Outcome,
    /// offset from the start of the attempt, as reported by the caller's clock
    pub offset: Duration,
    /// typed over a position that had already been typed and backspaced
    pub was_correction: bool,
    /// retracted by a later backspace; kept for error classification
    pub superseded: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    state: Option<PositionState>,
    first_pass: Option<Outcome>,
    last_keystroke: Option<usize>,
}

impl Slot {
    fn state(&self) -> PositionState {
        self.state.unwrap_or(PositionState::Pending)
    }
}

/// Running counters derived from an attempt.
///
/// `corrected_errors + uncorrected_errors + correct_first_pass == first_pass()`
/// holds for every attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// every character keystroke, re-types included
    pub typed: usize,
    /// every correct character keystroke, re-types included
    pub correct: usize,
    /// every incorrect character keystroke, re-types included
    pub mistakes: usize,
    pub correct_first_pass: usize,
    pub incorrect_first_pass: usize,
    pub corrected_errors: usize,
    pub uncorrected_errors: usize,
    pub backspaces: usize,
}

impl Tally {
    /// Number of positions that have been typed at least once.
    pub fn first_pass(&self) -> usize {
        self.correct_first_pass + self.incorrect_first_pass
    }
}

/// A user's attempt at typing a fixed target text.
///
/// The attempt is time-agnostic: offsets are supplied by the caller and only
/// stored on the keystroke log.
#[derive(Clone, Debug)]
pub struct TypingAttempt {
    text: String,
    target: Vec<char>,
    slots: Vec<Slot>,
    cursor: usize,
    log: Vec<Keystroke>,
    backspaces: usize,
}

impl TypingAttempt {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let target: Vec<char> = text.chars().collect();
        Self {
            slots: vec![Slot::default(); target.len()],
            text,
            target,
            cursor: 0,
            log: Vec::new(),
            backspaces: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Target length in characters.
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn expected_at(&self, position: usize) -> Option<char> {
        self.target.get(position).copied()
    }

    pub fn state_at(&self, position: usize) -> PositionState {
        self.slots
            .get(position)
            .map(Slot::state)
            .unwrap_or(PositionState::Pending)
    }

    /// The live (not superseded) character typed at `position`.
    pub fn typed_at(&self, position: usize) -> Option<char> {
        self.slots
            .get(position)
            .and_then(|slot| slot.last_keystroke)
            .map(|idx| self.log[idx].char)
    }

    pub fn keystrokes(&self) -> &[Keystroke] {
        &self.log
    }

    pub fn has_started(&self) -> bool {
        !self.log.is_empty() || self.backspaces > 0
    }

    /// True once the cursor has reached the end of the target.
    pub fn is_complete(&self) -> bool {
        self.cursor == self.target.len()
    }

    /// Evaluate one typed character at the cursor.
    ///
    /// A mismatch is logged and the cursor still advances. Characters typed
    /// past the end of the target are ignored and yield `None`.
    pub fn type_char(&mut self, c: char, offset: Duration) -> Option<Outcome> {
        let position = self.cursor;
        let expected = self.expected_at(position)?;
        let outcome = if c == expected {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };

        let slot = &mut self.slots[position];
        let was_correction = slot.first_pass.is_some();
        let first_pass = *slot.first_pass.get_or_insert(outcome);
        slot.state = Some(match outcome {
            Outcome::Correct if was_correction && first_pass == Outcome::Incorrect => {
                PositionState::Corrected
            }
            Outcome::Correct => PositionState::Correct,
            Outcome::Incorrect => PositionState::Incorrect,
        });
        slot.last_keystroke = Some(self.log.len());

        self.log.push(Keystroke {
            char: c,
            expected,
            position,
            outcome,
            offset,
            was_correction,
            superseded: false,
        });
        self.cursor += 1;

        Some(outcome)
    }

    /// Retreat the cursor by one position.
    ///
    /// The keystroke previously logged at that position is marked superseded
    /// and the position becomes pending again. Returns false at the start of
    /// the text, where backspace has no effect and is not counted.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }

        self.cursor -= 1;
        self.backspaces += 1;

        let slot = &mut self.slots[self.cursor];
        if let Some(idx) = slot.last_keystroke.take() {
            self.log[idx].superseded = true;
        }
        slot.state = Some(PositionState::Pending);

        true
    }

    /// Positions whose live keystroke is wrong.
    pub fn error_positions(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state() == PositionState::Incorrect)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn tally(&self) -> Tally {
        let mut tally = Tally {
            backspaces: self.backspaces,
            ..Tally::default()
        };

        for keystroke in &self.log {
            tally.typed += 1;
            match keystroke.outcome {
                Outcome::Correct => tally.correct += 1,
                Outcome::Incorrect => tally.mistakes += 1,
            }
        }

        for slot in &self.slots {
            match slot.first_pass {
                Some(Outcome::Correct) => tally.correct_first_pass += 1,
                Some(Outcome::Incorrect) => {
                    tally.incorrect_first_pass += 1;
                    if slot.state() == PositionState::Corrected {
                        tally.corrected_errors += 1;
                    } else {
                        tally.uncorrected_errors += 1;
                    }
                }
                None => {}
            }
        }

        tally
    }
}
