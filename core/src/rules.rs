use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::Score;

/// Reward table of the classic screen, indexed by flips made before the matching flip.
pub const CLASSIC_REWARD_TABLE: [Score; 22] = [
    10, 20, 30, 40, 50, 60, 70, 80, 75, 65, 60, 55, 50, 45, 40, 35, 30, 25, 20, 15, 10, 5,
];

/// Reward paid by the classic table once the round runs past it.
pub const CLASSIC_REWARD_FALLBACK: Score = 2;

/// How many points a found pair is worth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardSchedule {
    /// Every pair pays the same.
    Flat(Score),
    /// Pairs pay `table[flips]`, or `fallback` once `flips` runs past the table.
    Tiered { table: Vec<Score>, fallback: Score },
}

impl RewardSchedule {
    pub fn classic() -> Self {
        Self::Tiered {
            table: CLASSIC_REWARD_TABLE.to_vec(),
            fallback: CLASSIC_REWARD_FALLBACK,
        }
    }

    /// Reward for a pair matched after `flips` earlier flips in the round.
    pub fn reward_for(&self, flips: u32) -> Score {
        match self {
            Self::Flat(points) => *points,
            Self::Tiered { table, fallback } => usize::try_from(flips)
                .ok()
                .and_then(|index| table.get(index))
                .copied()
                .unwrap_or(*fallback),
        }
    }
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self::Flat(Rules::DEFAULT_MATCH_REWARD)
    }
}

/// Scoring constants and timer durations of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub match_reward: RewardSchedule,
    pub mismatch_penalty: Score,
    /// Lowest score a penalty can push a round to, `None` for unbounded.
    pub score_floor: Option<Score>,
    pub preview_ms: u32,
    pub mismatch_hide_ms: u32,
}

impl Rules {
    pub const DEFAULT_MATCH_REWARD: Score = 10;
    pub const DEFAULT_MISMATCH_PENALTY: Score = 2;
    pub const DEFAULT_PREVIEW_MS: u32 = 2_000;
    pub const DEFAULT_MISMATCH_HIDE_MS: u32 = 1_000;

    /// Tiered rewards of the classic screen, with the default penalty and timings.
    pub fn classic() -> Self {
        Self {
            match_reward: RewardSchedule::classic(),
            ..Self::default()
        }
    }

    pub fn reward_for(&self, flips: u32) -> Score {
        self.match_reward.reward_for(flips)
    }

    /// Applies the mismatch penalty to `score`.
    ///
    /// A penalty never raises the score, even when `score` already sits below the floor. Negative penalties count as
    /// zero.
    pub fn apply_penalty(&self, score: Score) -> Score {
        let lowered = score.saturating_sub(self.mismatch_penalty.max(0));
        match self.score_floor {
            Some(floor) => lowered.max(floor).min(score),
            None => lowered,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            match_reward: RewardSchedule::default(),
            mismatch_penalty: Self::DEFAULT_MISMATCH_PENALTY,
            score_floor: Some(0),
            preview_ms: Self::DEFAULT_PREVIEW_MS,
            mismatch_hide_ms: Self::DEFAULT_MISMATCH_HIDE_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_is_clamped_at_floor() {
        let rules = Rules::default();

        assert_eq!(rules.apply_penalty(5), 3);
        assert_eq!(rules.apply_penalty(1), 0);
        assert_eq!(rules.apply_penalty(0), 0);
    }

    #[test]
    fn penalty_without_floor_goes_negative() {
        let rules = Rules {
            score_floor: None,
            ..Rules::default()
        };

        assert_eq!(rules.apply_penalty(0), -2);
        assert_eq!(rules.apply_penalty(-2), -4);
    }

    #[test]
    fn penalty_never_raises_score_below_floor() {
        let rules = Rules {
            score_floor: Some(5),
            ..Rules::default()
        };

        assert_eq!(rules.apply_penalty(0), 0);
        assert_eq!(rules.apply_penalty(6), 5);
    }

    #[test]
    fn negative_penalty_never_raises_score() {
        let rules = Rules {
            mismatch_penalty: -5,
            score_floor: None,
            ..Rules::default()
        };

        assert_eq!(rules.apply_penalty(0), 0);
        assert_eq!(rules.apply_penalty(-3), -3);
    }

    #[test]
    fn tiered_reward_falls_back_past_table() {
        let schedule = RewardSchedule::classic();

        assert_eq!(schedule.reward_for(0), 10);
        assert_eq!(schedule.reward_for(1), 20);
        assert_eq!(schedule.reward_for(7), 80);
        assert_eq!(schedule.reward_for(21), 5);
        assert_eq!(schedule.reward_for(22), CLASSIC_REWARD_FALLBACK);
        assert_eq!(schedule.reward_for(u32::MAX), CLASSIC_REWARD_FALLBACK);
    }

    #[test]
    fn default_reward_is_flat() {
        let rules = Rules::default();

        assert_eq!(rules.reward_for(0), 10);
        assert_eq!(rules.reward_for(40), 10);
    }
}
