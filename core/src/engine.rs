use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - NotStarted -> Dealing (by dealing a new round)
/// - Dealing -> AwaitingInput (preview timer)
/// - AwaitingInput -> Evaluating (second card of a pair revealed)
/// - Evaluating -> AwaitingInput (match, or mismatch hide timer)
/// - Evaluating -> Completed (last pair matched)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    NotStarted,
    /// Every card is shown until the preview timer fires.
    Dealing,
    AwaitingInput,
    /// A pair is being resolved, or a mismatched pair waits to be turned back down.
    Evaluating,
    Completed,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed)
    }

    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::AwaitingInput)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Ends the face-up preview after dealing.
    Preview,
    /// Turns a mismatched pair back down.
    HideMismatch,
}

/// A transition the round wants to run after `delay_ms`.
///
/// The host owns the actual clock: it waits and hands the timer back through [`GameState::fire`]. A timer only
/// applies to the round and scheduling that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    round: RoundId,
    seq: u32,
    kind: TimerKind,
    delay_ms: u32,
}

impl Timer {
    pub const fn round(&self) -> RoundId {
        self.round
    }

    pub const fn kind(&self) -> TimerKind {
        self.kind
    }

    pub const fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}

/// Face-up positions that have not been resolved yet, at most two.
pub type PendingReveals = SmallVec<[Position; 2]>;

/// One round of the game, from dealing to completion.
///
/// A deserialized state is checked before use, see [`StateIssue`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SavedGameState<S>")]
pub struct GameState<S> {
    deck: Vec<Card<S>>,
    pending_reveals: PendingReveals,
    hiding: Option<[Position; 2]>,
    score: Score,
    best_score: Option<Score>,
    status: GameStatus,
    rules: Rules,
    round: RoundId,
    timer_seq: u32,
    flips: u32,
    mismatches: u32,
}

/// Wire form of [`GameState`], validated on the way in.
#[derive(Deserialize)]
struct SavedGameState<S> {
    deck: Vec<Card<S>>,
    pending_reveals: PendingReveals,
    hiding: Option<[Position; 2]>,
    score: Score,
    best_score: Option<Score>,
    status: GameStatus,
    rules: Rules,
    round: RoundId,
    timer_seq: u32,
    flips: u32,
    mismatches: u32,
}

impl<S> TryFrom<SavedGameState<S>> for GameState<S> {
    type Error = GameError;

    fn try_from(saved: SavedGameState<S>) -> Result<Self> {
        let deck_len = saved.deck.len();
        if deck_len % 2 != 0 {
            return Err(StateIssue::OddDeck.into());
        }

        for (index, card) in saved.deck.iter().enumerate() {
            if usize::from(card.position()) != index {
                return Err(StateIssue::MisplacedCard.into());
            }
            if card.is_matched() && !card.is_revealed() {
                return Err(StateIssue::MatchedFaceDown.into());
            }
        }

        if saved.pending_reveals.len() > 2 {
            return Err(StateIssue::TooManyPendingReveals.into());
        }

        let in_range = |position: &Position| usize::from(*position) < deck_len;
        if !saved.pending_reveals.iter().all(in_range)
            || !saved.hiding.iter().flatten().all(in_range)
        {
            return Err(StateIssue::PositionOutOfRange.into());
        }

        Ok(Self {
            deck: saved.deck,
            pending_reveals: saved.pending_reveals,
            hiding: saved.hiding,
            score: saved.score,
            best_score: saved.best_score,
            status: saved.status,
            rules: saved.rules,
            round: saved.round,
            timer_seq: saved.timer_seq,
            flips: saved.flips,
            mismatches: saved.mismatches,
        })
    }
}

impl<S> Default for GameState<S> {
    fn default() -> Self {
        Self {
            deck: Vec::new(),
            pending_reveals: SmallVec::new(),
            hiding: None,
            score: 0,
            best_score: None,
            status: GameStatus::NotStarted,
            rules: Rules::default(),
            round: RoundId::NONE,
            timer_seq: 0,
            flips: 0,
            mismatches: 0,
        }
    }
}

impl<S> GameState<S> {
    pub(crate) fn dealt(deck: Vec<Card<S>>, rules: Rules, round: RoundId) -> Self {
        Self {
            deck,
            rules,
            round,
            status: GameStatus::Dealing,
            ..Self::default()
        }
    }

    /// Seeds the best score from the persistence side, it is only compared on completion.
    pub fn with_best_score(mut self, best_score: Option<Score>) -> Self {
        self.best_score = best_score;
        self
    }

    pub fn deck(&self) -> &[Card<S>] {
        &self.deck
    }

    pub fn card(&self, position: Position) -> Option<&Card<S>> {
        self.deck.get(usize::from(position))
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn best_score(&self) -> Option<Score> {
        self.best_score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn pending_reveals(&self) -> &[Position] {
        &self.pending_reveals
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn round(&self) -> RoundId {
        self.round
    }

    /// Cards turned up by the player this round.
    pub fn flips(&self) -> u32 {
        self.flips
    }

    pub fn mismatches(&self) -> u32 {
        self.mismatches
    }

    pub fn pairs_left(&self) -> usize {
        self.deck.iter().filter(|card| !card.is_matched()).count() / 2
    }

    /// Timer this round is waiting on, if any.
    pub fn pending_timer(&self) -> Option<Timer> {
        let (kind, delay_ms) = match (self.status, self.hiding) {
            (GameStatus::Dealing, _) => (TimerKind::Preview, self.rules.preview_ms),
            (GameStatus::Evaluating, Some(_)) => {
                (TimerKind::HideMismatch, self.rules.mismatch_hide_ms)
            }
            _ => return None,
        };

        Some(Timer {
            round: self.round,
            seq: self.timer_seq,
            kind,
            delay_ms,
        })
    }

    /// Applies an elapsed timer, ignoring it when it belongs to another round or was superseded.
    pub fn fire(&mut self, timer: Timer) -> TimerOutcome {
        if !self.is_current(&timer) {
            log::trace!(
                "stale {:?} timer for round {} seq {}, current round {} seq {}",
                timer.kind,
                timer.round,
                timer.seq,
                self.round,
                self.timer_seq
            );
            return TimerOutcome::Stale;
        }

        match timer.kind {
            TimerKind::Preview => {
                for card in &mut self.deck {
                    card.hide();
                }
                log::debug!("round {} preview ended", self.round);
            }
            TimerKind::HideMismatch => {
                if let Some(pair) = self.hiding.take() {
                    for position in pair {
                        self.deck[usize::from(position)].hide();
                    }
                }
            }
        }

        self.status = GameStatus::AwaitingInput;
        TimerOutcome::Applied
    }

    fn is_current(&self, timer: &Timer) -> bool {
        timer.round == self.round
            && timer.seq == self.timer_seq
            && self.pending_timer().map(|pending| pending.kind) == Some(timer.kind)
    }

    fn schedule_hide(&mut self, pair: [Position; 2]) {
        self.hiding = Some(pair);
        self.timer_seq = self.timer_seq.wrapping_add(1);
    }

    fn complete(&mut self) -> RevealOutcome {
        self.status = GameStatus::Completed;
        let new_best = is_better(self.score, self.best_score);
        if new_best {
            self.best_score = Some(self.score);
        }
        log::debug!(
            "round {} completed with score {} after {} flips (new best: {})",
            self.round,
            self.score,
            self.flips,
            new_best
        );
        RevealOutcome::Completed {
            score: self.score,
            new_best,
        }
    }
}

impl<S: Symbol> GameState<S> {
    /// Turns the card at `position` face up, resolving the pair when it is the second one.
    ///
    /// Anything that cannot be revealed right now is ignored: wrong status, out of range, already up or matched, or
    /// a pair already pending.
    pub fn reveal(&mut self, position: Position) -> RevealOutcome {
        if !self.status.accepts_input() || self.pending_reveals.len() >= 2 {
            log::trace!("reveal {} ignored in {:?}", position, self.status);
            return RevealOutcome::NoChange;
        }

        let Some(card) = self.deck.get_mut(usize::from(position)) else {
            log::trace!("reveal {} ignored, out of range", position);
            return RevealOutcome::NoChange;
        };

        if card.is_revealed() || card.is_matched() {
            log::trace!("reveal {} ignored, already face up", position);
            return RevealOutcome::NoChange;
        }

        card.show();
        self.pending_reveals.push(position);
        let earlier_flips = self.flips;
        self.flips = self.flips.saturating_add(1);

        if self.pending_reveals.len() < 2 {
            return RevealOutcome::Revealed;
        }

        self.status = GameStatus::Evaluating;
        self.resolve(earlier_flips)
    }

    fn resolve(&mut self, earlier_flips: u32) -> RevealOutcome {
        let pair = [self.pending_reveals[0], self.pending_reveals[1]];
        self.pending_reveals.clear();

        let [first, second] = pair.map(usize::from);
        if self.deck[first].symbol() == self.deck[second].symbol() {
            self.deck[first].mark_matched();
            self.deck[second].mark_matched();
            let reward = self.rules.reward_for(earlier_flips);
            self.score = self.score.saturating_add(reward);
            log::debug!("round {} matched {:?} for {}", self.round, pair, reward);

            if self.deck.iter().all(|card| card.is_matched()) {
                return self.complete();
            }

            self.status = GameStatus::AwaitingInput;
            RevealOutcome::Matched
        } else {
            self.score = self.rules.apply_penalty(self.score);
            self.mismatches = self.mismatches.saturating_add(1);
            self.schedule_hide(pair);
            log::debug!("round {} mismatched {:?}", self.round, pair);
            RevealOutcome::Mismatched
        }
    }
}

/// Value-passing form of [`GameState::reveal`].
pub fn reveal<S: Symbol>(mut state: GameState<S>, position: Position) -> GameState<S> {
    state.reveal(position);
    state
}

/// Value-passing form of [`GameState::fire`].
pub fn advance<S>(mut state: GameState<S>, timer: Timer) -> GameState<S> {
    state.fire(timer);
    state
}
