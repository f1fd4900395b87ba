use crate::scores::*;
use crate::settings::{self, Settings};
use crate::utils::*;
use chrono::prelude::*;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use memora_core as game;
use game::{CardFace, GameStatus, Position, RevealOutcome, Score, ScoreStore, Timer};
use yew::prelude::*;

/// Symbols are the classic emoji.
type Face = &'static str;

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCardState {
    Hidden,
    Shown(Face),
    Matched(Face),
}

/// A dealt round plus the wall-clock bookkeeping the engine does not care about.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RoundSession {
    pub state: game::GameState<Face>,
    pub difficulty: game::Difficulty,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl RoundSession {
    fn deal(
        dealer: &mut game::Dealer,
        difficulty: game::Difficulty,
        best_score: Option<Score>,
    ) -> game::Result<Self> {
        let state = dealer
            .deal(difficulty.symbols())?
            .with_best_score(best_score);
        Ok(Self {
            state,
            difficulty,
            started_at: None,
            ended_at: None,
        })
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// Clock starts on the first flip and stops on completion.
    fn on_reveal(&mut self, outcome: RevealOutcome, now: DateTime<Utc>) {
        if !outcome.has_update() {
            return;
        }

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if matches!(outcome, RevealOutcome::Completed { .. }) && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    fn card_state_at(&self, position: Position) -> ViewCardState {
        let Some(card) = self.state.card(position) else {
            return ViewCardState::Hidden;
        };

        match card.face() {
            CardFace::Down => ViewCardState::Hidden,
            CardFace::Up => ViewCardState::Shown(*card.symbol()),
            CardFace::Matched => ViewCardState::Matched(*card.symbol()),
        }
    }

    fn can_reveal_at(&self, position: Position) -> bool {
        self.state.status().accepts_input()
            && self.state.pending_reveals().len() < 2
            && matches!(self.card_state_at(position), ViewCardState::Hidden)
    }

    /// Leaderboard entry for a completed round.
    fn leaderboard_entry(&self, name: &str) -> Option<game::LeaderboardEntry> {
        if !self.state.is_finished() {
            return None;
        }

        Some(game::LeaderboardEntry {
            name: name.to_string(),
            score: self.state.score(),
            timestamp_millis: self.ended_at.map_or(0, |at| at.timestamp_millis()),
            difficulty: Some(self.difficulty),
        })
    }

    fn status_class(&self) -> &'static str {
        match self.state.status() {
            GameStatus::NotStarted => "not-started",
            GameStatus::Dealing => "dealing",
            GameStatus::AwaitingInput if self.started_at.is_none() => "ready",
            GameStatus::AwaitingInput => "in-progress",
            GameStatus::Evaluating => "evaluating",
            GameStatus::Completed => "completed",
        }
    }
}

/// Columns of the card grid, the smallest divisor of `cards` at least its square root.
fn grid_columns(cards: usize) -> usize {
    (1..=cards)
        .find(|&columns| cards % columns == 0 && columns * columns >= cards)
        .unwrap_or(1)
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Reveal(Position),
    TimerFired(Timer),
    UpdateTime,
    NewGame,
    ToggleSettings,
    UpdateSettings(Settings),
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    position: Position,
    card_state: ViewCardState,
    #[prop_or_default]
    locked: bool,
    callback: Callback<Position>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    use ViewCardState::*;

    let CardProps {
        position,
        card_state,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "card",
        match card_state {
            Hidden => classes!(),
            Shown(_) => classes!("open"),
            Matched(_) => classes!("open", "matched"),
        }
    );
    if locked {
        class.push("locked");
    }

    let face = match card_state {
        Hidden => "❓",
        Shown(face) | Matched(face) => face,
    };

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", position);
        callback.emit(position);
    });

    html! {
        <button {class} {onclick}>{face}</button>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,
}

pub(crate) struct GameView {
    settings: Settings,
    dealer: game::Dealer,
    session: Option<RoundSession>,
    scores: LocalScoreStore,
    leaderboard: game::Leaderboard,
    prev_time: u32,
    settings_open: bool,
    pending_timeout: Option<Timeout>,
    _timer_interval: Interval,
}

impl GameView {
    fn new_round(&mut self, ctx: &Context<Self>) {
        self.scores = LocalScoreStore::new(self.settings.difficulty, self.settings.reward_mode);
        self.dealer.set_rules(self.settings.rules());

        let best_score = self.scores.load_best_score();
        self.session = match RoundSession::deal(&mut self.dealer, self.settings.difficulty, best_score) {
            Ok(session) => Some(session),
            Err(err) => {
                log::error!("Could not deal a new round: {}", err);
                None
            }
        };
        self.schedule_timer(ctx);
    }

    /// Arms a timeout for whatever the round waits on, dropping (and so cancelling) the previous one.
    fn schedule_timer(&mut self, ctx: &Context<Self>) {
        let timer = self
            .session
            .as_ref()
            .and_then(|session| session.state.pending_timer());

        self.pending_timeout = timer.map(|timer| {
            log::trace!("scheduling {:?} in {}ms", timer.kind(), timer.delay_ms());
            let link = ctx.link().clone();
            Timeout::new(timer.delay_ms(), move || {
                link.send_message(Msg::TimerFired(timer))
            })
        });
    }

    fn reveal_card(&mut self, ctx: &Context<Self>, position: Position) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let outcome = session.state.reveal(position);
        session.on_reveal(outcome, utc_now());

        if let RevealOutcome::Completed { score, new_best } = outcome {
            self.on_completed(score, new_best);
        }
        if outcome.is_resolution() {
            self.schedule_timer(ctx);
        }

        outcome.has_update()
    }

    fn fire_timer(&mut self, ctx: &Context<Self>, timer: Timer) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let outcome = session.state.fire(timer);
        if outcome.has_update() {
            self.schedule_timer(ctx);
        } else {
            log::debug!("dropped stale timer for round {}", timer.round());
        }
        outcome.has_update()
    }

    fn on_completed(&mut self, score: Score, new_best: bool) {
        log::info!("round completed with {} points (new best: {})", score, new_best);
        game::record_completion(&mut self.scores, score);

        let Some(name) = self.settings.player_name() else {
            return;
        };
        let Some(entry) = self
            .session
            .as_ref()
            .and_then(|session| session.leaderboard_entry(name))
        else {
            return;
        };

        match self.leaderboard.submit(entry) {
            Ok(outcome) if outcome.has_update() => self.leaderboard.local_save(),
            Ok(_) => {}
            Err(err) => log::warn!("Could not submit score: {}", err),
        }
    }

    fn get_time(&self) -> u32 {
        self.session
            .as_ref()
            .map(|session| session.elapsed_secs(utc_now()))
            .unwrap_or(0)
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let settings: Settings = LocalOrDefault::local_or_default();
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        let mut view = Self {
            scores: LocalScoreStore::new(settings.difficulty, settings.reward_mode),
            dealer: game::Dealer::new(seed, settings.rules()),
            settings,
            session: None,
            leaderboard: LocalOrDefault::local_or_default(),
            prev_time: 0,
            settings_open: false,
            pending_timeout: None,
            _timer_interval: GameView::create_timer(ctx),
        };
        view.new_round(ctx);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Reveal(position) => {
                log::debug!("reveal card: {}", position);
                self.reveal_card(ctx, position)
            }
            TimerFired(timer) => self.fire_timer(ctx, timer),
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            NewGame => {
                self.new_round(ctx);
                true
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            UpdateSettings(settings) => {
                if self.settings == settings {
                    return false;
                }
                let changes_round = self.settings.changes_round(&settings);
                self.settings = settings;
                self.settings.local_save();
                if changes_round {
                    self.new_round(ctx);
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use settings::SettingsView;
        use Msg::*;

        let cb_new_game = ctx.link().callback(|_| NewGame);
        let cb_show_settings = ctx.link().callback(|_: MouseEvent| ToggleSettings);
        let cb_hide_settings = ctx.link().callback(|_| ToggleSettings);
        let cb_settings = ctx.link().callback(UpdateSettings);
        let settings_view = html! {
            <SettingsView
                open={self.settings_open}
                settings={self.settings.clone()}
                on_change={cb_settings}
                on_close={cb_hide_settings}
            />
        };

        let Some(session) = self.session.as_ref() else {
            return html! {
                <div class="memora">
                    <small onclick={cb_show_settings}>{"···"}</small>
                    <p>{"No round in progress"}</p>
                    {settings_view}
                </div>
            };
        };

        let card_count = session.state.deck().len();
        let columns = grid_columns(card_count);
        let style = format!("grid-template-columns: repeat({}, 1fr)", columns);
        let callback = ctx.link().callback(Reveal);
        let leaderboard = self
            .leaderboard
            .top(LEADERBOARD_ROWS, Some(session.difficulty))
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();

        html! {
            <div class={classes!("memora", session.status_class())}>
                <small onclick={cb_show_settings}>{"···"}</small>
                <main class="board" {style}>
                    {
                        for (0..card_count).map(|index| {
                            let position = index as Position;
                            let card_state = session.card_state_at(position);
                            let locked = !session.can_reveal_at(position);
                            html! {
                                <CardView
                                    key={index}
                                    {position}
                                    {card_state}
                                    {locked}
                                    callback={callback.clone()}
                                />
                            }
                        })
                    }
                </main>
                <ScoreboardView
                    score={session.state.score()}
                    best_score={session.state.best_score()}
                    flips={session.state.flips()}
                    mismatches={session.state.mismatches()}
                    pairs_left={session.state.pairs_left()}
                    elapsed_secs={self.get_time()}
                    on_restart={cb_new_game}
                />
                <LeaderboardView
                    difficulty={session.difficulty}
                    entries={leaderboard}
                    player_name={self.settings.player_name().map(str::to_string)}
                />
                {settings_view}
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn started_session(difficulty: game::Difficulty) -> RoundSession {
        let mut dealer = game::Dealer::new(17, game::Rules::default());
        let mut session = RoundSession::deal(&mut dealer, difficulty, None).unwrap();
        let preview = session.state.pending_timer().unwrap();
        session.state.fire(preview);
        session
    }

    fn twin_of(session: &RoundSession, position: Position) -> Position {
        let symbol = session.state.card(position).unwrap().symbol();
        session
            .state
            .deck()
            .iter()
            .find(|card| card.position() != position && card.symbol() == symbol)
            .map(|card| card.position())
            .unwrap()
    }

    fn play_out(session: &mut RoundSession, now: DateTime<Utc>) {
        for position in 0..session.state.deck().len() as Position {
            if session.state.card(position).unwrap().is_matched() {
                continue;
            }
            let twin = twin_of(session, position);
            let outcome = session.state.reveal(position);
            session.on_reveal(outcome, now);
            let outcome = session.state.reveal(twin);
            session.on_reveal(outcome, now);
        }
    }

    #[test]
    fn session_deals_from_difficulty_symbols() {
        let mut dealer = game::Dealer::new(1, game::Rules::default());
        let session = RoundSession::deal(&mut dealer, game::Difficulty::Easy, Some(30)).unwrap();

        assert_eq!(session.state.deck().len(), 8);
        assert_eq!(session.state.best_score(), Some(30));
        assert_eq!(session.status_class(), "dealing");
        assert!(matches!(session.card_state_at(0), ViewCardState::Shown(_)));
        assert!(!session.can_reveal_at(0));
    }

    #[test]
    fn clock_runs_from_first_flip_to_completion() {
        let mut session = started_session(game::Difficulty::Easy);
        assert_eq!(session.elapsed_secs(t0()), 0);
        assert_eq!(session.status_class(), "ready");

        let ignored = session.state.reveal(Position::MAX);
        session.on_reveal(ignored, t0());
        assert_eq!(session.started_at, None);

        let outcome = session.state.reveal(0);
        session.on_reveal(outcome, t0());
        assert_eq!(session.started_at, Some(t0()));
        assert_eq!(session.elapsed_secs(t0() + TimeDelta::seconds(3)), 3);

        play_out(&mut session, t0() + TimeDelta::seconds(9));

        assert_eq!(session.status_class(), "completed");
        assert_eq!(session.elapsed_secs(t0() + TimeDelta::seconds(60)), 9);
    }

    #[test]
    fn leaderboard_entry_only_for_completed_rounds() {
        let mut session = started_session(game::Difficulty::Easy);
        assert_eq!(session.leaderboard_entry("kim"), None);

        play_out(&mut session, t0() + TimeDelta::seconds(5));
        let entry = session.leaderboard_entry("kim").unwrap();

        assert_eq!(entry.name, "kim");
        assert_eq!(entry.score, 40);
        assert_eq!(entry.timestamp_millis, 5_000);
        assert_eq!(entry.difficulty, Some(game::Difficulty::Easy));
    }

    #[test]
    fn matched_cards_render_as_matched_and_locked() {
        let mut session = started_session(game::Difficulty::Medium);
        let twin = twin_of(&session, 0);
        session.state.reveal(0);
        session.state.reveal(twin);

        assert!(matches!(session.card_state_at(0), ViewCardState::Matched(_)));
        assert!(matches!(session.card_state_at(twin), ViewCardState::Matched(_)));
        assert!(!session.can_reveal_at(0));
        let unmatched = session
            .state
            .deck()
            .iter()
            .find(|card| !card.is_matched())
            .map(|card| card.position())
            .unwrap();
        assert!(session.can_reveal_at(unmatched));
    }

    #[test]
    fn grid_columns_prefer_square_layouts() {
        assert_eq!(grid_columns(8), 4);
        assert_eq!(grid_columns(16), 4);
        assert_eq!(grid_columns(20), 5);
        assert_eq!(grid_columns(2), 2);
        assert_eq!(grid_columns(0), 1);
    }
}
