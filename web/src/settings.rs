use crate::utils::*;
use memora_core::{Difficulty, Rules};
use serde::{Deserialize, Serialize};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Which reward schedule new rounds use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum RewardMode {
    /// Same reward for every pair.
    #[default]
    Flat,
    /// Early pairs pay more.
    Classic,
}

impl RewardMode {
    pub(crate) const ALL: [RewardMode; 2] = [Self::Flat, Self::Classic];

    pub(crate) fn rules(self) -> Rules {
        match self {
            Self::Flat => Rules::default(),
            Self::Classic => Rules::classic(),
        }
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Classic => "classic",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub difficulty: Difficulty,
    pub reward_mode: RewardMode,
    pub player_name: String,
}

impl Settings {
    pub(crate) fn rules(&self) -> Rules {
        self.reward_mode.rules()
    }

    /// Trimmed player name, `None` when blank.
    pub(crate) fn player_name(&self) -> Option<&str> {
        Some(self.player_name.trim()).filter(|name| !name.is_empty())
    }

    /// Whether switching to `other` needs a fresh round.
    pub(crate) fn changes_round(&self, other: &Settings) -> bool {
        self.difficulty != other.difficulty || self.reward_mode != other.reward_mode
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "memora:settings";
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub settings: Settings,
    pub on_change: Callback<Settings>,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let SettingsProps {
        open,
        settings,
        on_change,
        on_close,
    } = props;

    let difficulty_buttons = Difficulty::ALL.into_iter().map(|difficulty| {
        let onclick = {
            let settings = settings.clone();
            let on_change = on_change.clone();
            Callback::from(move |_: MouseEvent| {
                on_change.emit(Settings {
                    difficulty,
                    ..settings.clone()
                })
            })
        };
        let class = classes!((settings.difficulty == difficulty).then_some("selected"));
        html! {
            <li><button {class} {onclick}>{difficulty.name()}</button></li>
        }
    });

    let reward_buttons = RewardMode::ALL.into_iter().map(|reward_mode| {
        let onclick = {
            let settings = settings.clone();
            let on_change = on_change.clone();
            Callback::from(move |_: MouseEvent| {
                on_change.emit(Settings {
                    reward_mode,
                    ..settings.clone()
                })
            })
        };
        let class = classes!((settings.reward_mode == reward_mode).then_some("selected"));
        html! {
            <li><button {class} {onclick}>{reward_mode.name()}</button></li>
        }
    });

    let oninput = {
        let settings = settings.clone();
        let on_change = on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_change.emit(Settings {
                player_name: input.value(),
                ..settings.clone()
            })
        })
    };

    let onclose = on_close.reform(|_: MouseEvent| ());

    html! {
        <dialog id="settings" open={*open}>
            <article>
                <h2>{"Settings"}</h2>
                <h3>{"Difficulty"}</h3>
                <ul>{for difficulty_buttons}</ul>
                <h3>{"Scoring"}</h3>
                <ul>{for reward_buttons}</ul>
                <label>
                    {"Leaderboard name"}
                    <input type="text" value={settings.player_name.clone()} {oninput}/>
                </label>
                <footer>
                    <button onclick={onclose}>{"Close"}</button>
                </footer>
            </article>
        </dialog>
    }
}
