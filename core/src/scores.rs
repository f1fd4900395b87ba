use crate::Score;

/// Whether `candidate` beats the previous best.
///
/// Higher scores are better. Without a previous best any completed round counts, even a zero score.
pub fn is_better(candidate: Score, previous: Option<Score>) -> bool {
    previous.is_none_or(|best| candidate > best)
}

/// Where best scores live between rounds.
pub trait ScoreStore {
    fn load_best_score(&self) -> Option<Score>;
    fn save_best_score(&mut self, score: Score);
}

/// Read-modify-write of the best score after a completed round, returns whether it was replaced.
pub fn record_completion<T: ScoreStore + ?Sized>(store: &mut T, score: Score) -> bool {
    let improved = is_better(score, store.load_best_score());
    if improved {
        log::debug!("new best score {}", score);
        store.save_best_score(score);
    }
    improved
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryScoreStore {
    best: Option<Score>,
}

impl MemoryScoreStore {
    pub const fn new(best: Option<Score>) -> Self {
        Self { best }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_best_score(&self) -> Option<Score> {
        self.best
    }

    fn save_best_score(&mut self, score: Score) {
        self.best = Some(score);
    }
}
