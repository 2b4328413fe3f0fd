use crate::error::{Error, Result};
use crate::levels::Verdict;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

pub const PROGRESS_FILE: &str = "challenge_progress.json";

/// Persisted challenge state for one profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    #[serde(default)]
    pub highest_level_completed: u32,
}

/// A value that may have been substituted by a default because the real one
/// could not be read. `diagnostic` holds the reason when that happened.
#[derive(Debug)]
pub struct Recovered<T> {
    pub value: T,
    pub diagnostic: Option<Error>,
}

impl<T> Recovered<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            diagnostic: None,
        }
    }

    pub fn fallback(value: T, diagnostic: Error) -> Self {
        Self {
            value,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn fell_back(&self) -> bool {
        self.diagnostic.is_some()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Recovered<U> {
        Recovered {
            value: f(self.value),
            diagnostic: self.diagnostic,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The progress file inside a profile's config directory.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(PROGRESS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is no progress yet; an unreadable or corrupt one falls
    /// back to no progress with a diagnostic.
    pub fn load(&self) -> Recovered<GameProgress> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Recovered::ok(GameProgress::default())
            }
            Err(e) => return Recovered::fallback(GameProgress::default(), e.into()),
        };

        match serde_json::from_slice::<GameProgress>(&bytes) {
            Ok(progress) => Recovered::ok(progress),
            Err(e) => Recovered::fallback(GameProgress::default(), e.into()),
        }
    }

    pub fn save(&self, progress: &GameProgress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(progress)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Monotonic level progression backed by a [`ProgressStore`].
#[derive(Debug)]
pub struct ChallengeProgression {
    store: ProgressStore,
    progress: GameProgress,
}

impl ChallengeProgression {
    pub fn load(store: ProgressStore) -> Recovered<Self> {
        store
            .load()
            .map(|progress| Self { store, progress })
    }

    pub fn highest_level_completed(&self) -> u32 {
        self.progress.highest_level_completed
    }

    /// The next unplayed level. Saturates at the last representable level.
    pub fn starting_level(&self) -> u32 {
        self.progress.highest_level_completed.saturating_add(1)
    }

    /// Record a verified pass of `level`. Replays of cleared levels change
    /// nothing. Returns whether progress advanced; the in-memory state only
    /// advances once the new state has been persisted.
    pub fn complete(&mut self, level: u32) -> Result<bool> {
        if level <= self.progress.highest_level_completed {
            return Ok(false);
        }

        let next = GameProgress {
            highest_level_completed: level,
        };
        self.store.save(&next)?;
        self.progress = next;

        info!("challenge progress advanced to level {}", level);
        Ok(true)
    }

    /// Apply a verdict for `level`; only a pass can advance progress.
    pub fn record(&mut self, level: u32, verdict: &Verdict) -> Result<bool> {
        match verdict {
            Verdict::Pass => self.complete(level),
            Verdict::Fail(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Shortfall;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn progression_in(dir: &Path) -> ChallengeProgression {
        ChallengeProgression::load(ProgressStore::in_dir(dir)).value
    }

    #[test]
    fn fresh_profile_starts_at_level_one() {
        let dir = tempdir().unwrap();
        let recovered = ChallengeProgression::load(ProgressStore::in_dir(dir.path()));

        assert!(!recovered.fell_back());
        assert_eq!(recovered.value.highest_level_completed(), 0);
        assert_eq!(recovered.value.starting_level(), 1);
    }

    #[test]
    fn starting_level_is_idempotent() {
        let dir = tempdir().unwrap();
        let progression = progression_in(dir.path());

        assert_eq!(progression.starting_level(), progression.starting_level());
        assert!(!dir.path().join(PROGRESS_FILE).exists());
    }

    #[test]
    fn complete_advances_and_persists() {
        let dir = tempdir().unwrap();
        let mut progression = progression_in(dir.path());

        assert!(progression.complete(1).unwrap());
        assert_eq!(progression.starting_level(), 2);

        let reloaded = progression_in(dir.path());
        assert_eq!(reloaded.highest_level_completed(), 1);
    }

    #[test]
    fn progression_is_monotonic() {
        let dir = tempdir().unwrap();
        let mut progression = progression_in(dir.path());

        assert!(progression.complete(3).unwrap());
        assert!(!progression.complete(2).unwrap());
        assert!(!progression.complete(3).unwrap());
        assert_eq!(progression.highest_level_completed(), 3);
        assert_eq!(progression_in(dir.path()).highest_level_completed(), 3);
    }

    #[test]
    fn starting_level_after_complete() {
        for n in [0u32, 1, 2, 7, 42] {
            let dir = tempdir().unwrap();
            let mut progression = progression_in(dir.path());
            progression.complete(n).unwrap();
            assert_eq!(progression.starting_level(), n + 1);
        }
    }

    #[test]
    fn starting_level_saturates_at_the_top() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(PROGRESS_FILE),
            r#"{"highest_level_completed":4294967295}"#,
        )
        .unwrap();

        let recovered = ChallengeProgression::load(ProgressStore::in_dir(dir.path()));
        assert!(!recovered.fell_back());
        assert_eq!(recovered.value.highest_level_completed(), u32::MAX);
        assert_eq!(recovered.value.starting_level(), u32::MAX);
    }

    #[test]
    fn failed_verdict_never_advances() {
        let dir = tempdir().unwrap();
        let mut progression = progression_in(dir.path());
        let fail = Verdict::Fail(vec![Shortfall::UncorrectedErrors(2)]);

        assert!(!progression.record(1, &fail).unwrap());
        assert_eq!(progression.starting_level(), 1);
        assert!(progression.record(1, &Verdict::Pass).unwrap());
        assert_eq!(progression.starting_level(), 2);
    }

    #[test]
    fn corrupt_progress_falls_back_to_zero() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PROGRESS_FILE), "{\"highest_level_completed\": ").unwrap();

        let recovered = ChallengeProgression::load(ProgressStore::in_dir(dir.path()));

        assert_matches!(recovered.diagnostic, Some(Error::Json(_)));
        assert_eq!(recovered.value.starting_level(), 1);
    }

    #[test]
    fn negative_level_is_treated_as_corrupt() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PROGRESS_FILE), r#"{"highest_level_completed": -4}"#).unwrap();

        let recovered = ProgressStore::in_dir(dir.path()).load();
        assert!(recovered.fell_back());
        assert_eq!(recovered.value, GameProgress::default());
    }

    #[test]
    fn progress_file_format() {
        let dir = tempdir().unwrap();
        let store = ProgressStore::in_dir(dir.path());
        store
            .save(&GameProgress {
                highest_level_completed: 4,
            })
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(json["highest_level_completed"], 4);
    }

    #[test]
    fn save_failure_leaves_state_untouched() {
        let dir = tempdir().unwrap();
        // the progress path is a directory, so writing it fails
        fs::create_dir(dir.path().join(PROGRESS_FILE)).unwrap();
        let recovered = ChallengeProgression::load(ProgressStore::in_dir(dir.path()));
        assert_matches!(recovered.diagnostic, Some(Error::Io(_)));

        let mut progression = recovered.value;
        assert!(progression.complete(2).is_err());
        assert_eq!(progression.highest_level_completed(), 0);
    }
}
