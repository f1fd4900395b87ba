use crate::settings::RewardMode;
use crate::utils::*;
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use memora_core::{Difficulty, Leaderboard, LeaderboardEntry, Score, ScoreStore};
use yew::prelude::*;

/// Best score per difficulty and reward mode, kept in LocalStorage.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LocalScoreStore {
    key: String,
}

impl LocalScoreStore {
    pub(crate) fn new(difficulty: Difficulty, reward_mode: RewardMode) -> Self {
        Self {
            key: Self::key_for(difficulty, reward_mode),
        }
    }

    pub(crate) fn key_for(difficulty: Difficulty, reward_mode: RewardMode) -> String {
        format!("memora:best:{}:{}", difficulty.name(), reward_mode.name())
    }
}

impl ScoreStore for LocalScoreStore {
    fn load_best_score(&self) -> Option<Score> {
        match LocalStorage::get(&self.key) {
            Ok(score) => Some(score),
            Err(StorageError::KeyNotFound(_)) => None,
            Err(err) => {
                log::debug!("ignoring unreadable best score under {}: {:?}", self.key, err);
                None
            }
        }
    }

    fn save_best_score(&mut self, score: Score) {
        if let Err(err) = LocalStorage::set(&self.key, score) {
            log::error!("Could not save best score to local storage: {:?}", err);
        }
    }
}

impl StorageKey for Leaderboard {
    const KEY: &'static str = "memora:leaderboard";
}

/// How many leaderboard rows are shown.
pub(crate) const LEADERBOARD_ROWS: usize = 10;

#[derive(Properties, PartialEq)]
pub(crate) struct ScoreboardProps {
    pub score: Score,
    pub best_score: Option<Score>,
    pub flips: u32,
    pub mismatches: u32,
    pub pairs_left: usize,
    pub elapsed_secs: u32,
    pub on_restart: Callback<()>,
}

impl ScoreboardProps {
    fn rows(&self) -> [(&'static str, String); 6] {
        let best = self
            .best_score
            .map_or_else(|| "---".to_string(), |best| best.to_string());

        [
            ("Score", self.score.to_string()),
            ("Best", best),
            ("Flips", format_for_counter(self.flips.into())),
            ("Misses", format_for_counter(self.mismatches.into())),
            ("Pairs left", self.pairs_left.to_string()),
            ("Time", format_for_counter(self.elapsed_secs.into())),
        ]
    }
}

#[function_component]
pub(crate) fn ScoreboardView(props: &ScoreboardProps) -> Html {
    let onclick = props.on_restart.reform(|e: MouseEvent| e.stop_propagation());

    html! {
        <section class="scoreboard">
            <h2>{"Scoreboard"}</h2>
            <dl>
                {
                    for props.rows().into_iter().map(|(label, value)| html! {
                        <>
                            <dt>{label}</dt>
                            <dd>{value}</dd>
                        </>
                    })
                }
            </dl>
            <button {onclick}>{"Restart"}</button>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct LeaderboardProps {
    pub difficulty: Difficulty,
    pub entries: Vec<LeaderboardEntry>,
    #[prop_or_default]
    pub player_name: Option<String>,
}

#[function_component]
pub(crate) fn LeaderboardView(props: &LeaderboardProps) -> Html {
    if props.entries.is_empty() {
        return html! {
            <section class="leaderboard">
                <h2>{format!("Leaderboard ({})", props.difficulty)}</h2>
                <p>{"No scores yet"}</p>
            </section>
        };
    }

    html! {
        <section class="leaderboard">
            <h2>{format!("Leaderboard ({})", props.difficulty)}</h2>
            <ol>
                {
                    for props.entries.iter().map(|entry| {
                        let own = props.player_name.as_deref() == Some(entry.name.as_str());
                        html! {
                            <li class={classes!(own.then_some("own"))}>
                                <span>{entry.name.clone()}</span>
                                <span>{entry.score}</span>
                            </li>
                        }
                    })
                }
            </ol>
        </section>
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use memora_core::record_completion;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_store_keeps_higher_score() {
        let mut store = LocalScoreStore::new(Difficulty::Easy, RewardMode::Classic);
        LocalStorage::delete(&store.key);

        assert!(record_completion(&mut store, 12));
        assert!(!record_completion(&mut store, 8));
        assert_eq!(store.load_best_score(), Some(12));

        LocalStorage::delete(&store.key);
    }

    #[wasm_bindgen_test]
    fn unreadable_best_score_loads_as_none() {
        let store = LocalScoreStore::new(Difficulty::Hard, RewardMode::Flat);
        LocalStorage::set(&store.key, "not a score").unwrap();

        assert_eq!(store.load_best_score(), None);

        LocalStorage::delete(&store.key);
    }
}
