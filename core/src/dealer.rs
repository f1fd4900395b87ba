use alloc::vec::Vec;
use hashbrown::HashSet;
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::*;

/// Deals fresh rounds from a seeded generator and numbers them.
///
/// Every round dealt by the same dealer gets a distinct [`RoundId`], which is what lets a round reject timers left
/// over from an earlier one.
#[derive(Clone, Debug)]
pub struct Dealer {
    rng: SmallRng,
    rules: Rules,
    next_round: u64,
}

impl Dealer {
    pub fn new(seed: u64, rules: Rules) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            rules,
            next_round: 1,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Rules used for rounds dealt from now on.
    pub fn set_rules(&mut self, rules: Rules) {
        self.rules = rules;
    }

    /// Deals two copies of every symbol in uniformly random order.
    ///
    /// The round starts in [`GameStatus::Dealing`] with every card face up, waiting on its preview timer.
    pub fn deal<S: Symbol>(&mut self, symbols: &[S]) -> Result<GameState<S>> {
        validate_symbols(symbols)?;

        let mut faces: Vec<S> = symbols.iter().chain(symbols).cloned().collect();
        shuffle(&mut faces, &mut self.rng);

        let deck = faces
            .into_iter()
            .enumerate()
            .map(|(position, symbol)| Card::new(symbol, position as Position))
            .collect();

        let round = RoundId(self.next_round);
        self.next_round += 1;
        log::debug!("dealt round {} with {} pairs", round, symbols.len());

        Ok(GameState::dealt(deck, self.rules.clone(), round))
    }
}

/// Checks that `symbols` can be dealt: non-empty, distinct and small enough to index.
pub fn validate_symbols<S: Symbol>(symbols: &[S]) -> Result<()> {
    if symbols.is_empty() {
        return Err(DeckIssue::Empty.into());
    }

    if symbols.len() > MAX_PAIRS {
        return Err(DeckIssue::TooLarge.into());
    }

    let mut seen = HashSet::with_capacity(symbols.len());
    if !symbols.iter().all(|symbol| seen.insert(symbol)) {
        return Err(DeckIssue::DuplicateSymbol.into());
    }

    Ok(())
}

/// Fisher–Yates shuffle.
fn shuffle<T>(items: &mut [T], rng: &mut SmallRng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use hashbrown::HashMap;

    #[test]
    fn deal_contains_every_symbol_twice() {
        let mut dealer = Dealer::new(7, Rules::default());

        for pairs in 1..=12u8 {
            let symbols: Vec<u8> = (0..pairs).collect();
            let state = dealer.deal(&symbols).unwrap();

            assert_eq!(state.deck().len(), 2 * usize::from(pairs));

            let mut counts: HashMap<u8, usize> = HashMap::new();
            for card in state.deck() {
                *counts.entry(*card.symbol()).or_default() += 1;
            }
            assert_eq!(counts.len(), usize::from(pairs));
            assert!(counts.values().all(|&count| count == 2));
        }
    }

    #[test]
    fn deal_assigns_positions_in_order() {
        let mut dealer = Dealer::new(1, Rules::default());
        let state = dealer.deal(&['a', 'b', 'c']).unwrap();

        for (index, card) in state.deck().iter().enumerate() {
            assert_eq!(usize::from(card.position()), index);
        }
    }

    #[test]
    fn deal_rejects_empty_symbol_set() {
        let mut dealer = Dealer::new(1, Rules::default());
        let symbols: [char; 0] = [];

        assert_eq!(
            dealer.deal(&symbols).unwrap_err(),
            GameError::InvalidDeckSpecification(DeckIssue::Empty)
        );
    }

    #[test]
    fn deal_rejects_duplicate_symbols() {
        let mut dealer = Dealer::new(1, Rules::default());

        assert_eq!(
            dealer.deal(&["x", "y", "x"]).unwrap_err(),
            GameError::InvalidDeckSpecification(DeckIssue::DuplicateSymbol)
        );
    }

    #[test]
    fn deal_rejects_oversized_symbol_set() {
        let symbols: Vec<u32> = (0..=MAX_PAIRS as u32).collect();

        assert_eq!(
            validate_symbols(&symbols),
            Err(GameError::InvalidDeckSpecification(DeckIssue::TooLarge))
        );
    }

    #[test]
    fn rounds_get_distinct_ids() {
        let mut dealer = Dealer::new(3, Rules::default());
        let first = dealer.deal(&[1, 2]).unwrap();
        let second = dealer.deal(&[1, 2]).unwrap();

        assert_ne!(first.round(), second.round());
        assert_ne!(first.round(), RoundId::NONE);
    }

    #[test]
    fn same_seed_deals_same_deck() {
        let symbols = ['a', 'b', 'c', 'd', 'e'];
        let first = Dealer::new(99, Rules::default()).deal(&symbols).unwrap();
        let second = Dealer::new(99, Rules::default()).deal(&symbols).unwrap();

        assert_eq!(first.deck(), second.deck());
    }

    #[test]
    fn shuffle_is_not_biased_towards_identity() {
        // every element should land in every slot with roughly equal frequency
        const SLOTS: usize = 4;
        const ROUNDS: usize = 8_000;
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut hits = [[0usize; SLOTS]; SLOTS];

        for _ in 0..ROUNDS {
            let mut items: Vec<usize> = (0..SLOTS).collect();
            shuffle(&mut items, &mut rng);
            for (slot, &item) in items.iter().enumerate() {
                hits[item][slot] += 1;
            }
        }

        let expected = ROUNDS / SLOTS;
        for row in hits {
            for count in row {
                assert!(count.abs_diff(expected) < expected / 10, "{:?}", hits);
            }
        }
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut items = vec![1, 2, 3, 4, 5, 6];
        shuffle(&mut items, &mut rng);
        items.sort_unstable();

        assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
    }
}
