//! Multiplayer blackjack rules.
//!
//! Each round, seats act strictly in order: a seat first places a bet, then
//! repeatedly chooses between hitting and skipping; busting or skipping ends
//! its turn. After the last seat, the pot goes to the best hand at or under 21
//! and the next round is dealt from the remaining shoe. The episode ends after
//! the configured number of rounds, or as soon as a seat can no longer cover
//! the minimum bet.

use tracing::debug;

use crate::cards::{hand_value, Card, Deck};
use crate::core::{Action, ActionRange, EnvConfig, GameRng, PlayerId, TableState};
use crate::rules::{ApplyOutcome, GameResult, RangeSet, TurnEngine};

/// Blackjack rule core.
#[derive(Clone, Debug)]
pub struct Blackjack {
    config: EnvConfig,
}

impl Blackjack {
    /// Build the rules for the given configuration.
    #[must_use]
    pub fn new(config: EnvConfig) -> Self {
        Self { config }
    }

    /// Draw from the shoe, reshuffling the discard pile back in when the
    /// shoe runs dry.
    fn draw_card(state: &mut TableState) -> Option<Card> {
        if state.deck.is_empty() && !state.discard.is_empty() {
            let mut cards: Vec<Card> = state.discard.iter().copied().collect();
            state.discard.clear();
            state.rng.shuffle(&mut cards);
            state.deck = Deck::from_cards(cards);
        }
        state.deck.draw()
    }

    /// Deal every seat its starting hand for the round.
    fn deal_round(&self, state: &mut TableState) {
        for player in PlayerId::all(state.player_count()) {
            for _ in 0..self.config.starting_hand_size {
                if let Some(card) = Self::draw_card(state) {
                    state.seat_mut(player).hand.push_back(card);
                }
            }
        }
    }

    /// Advance past the current seat; the last seat triggers the showdown.
    fn end_turn(&self, state: &mut TableState) {
        let next = state.next_player.index() + 1;
        if next < state.player_count() {
            state.next_player = PlayerId::new(next as u8);
        } else {
            self.showdown(state);
        }
    }

    /// Settle the round: pay the pot, discard hands, deal again or finish.
    fn showdown(&self, state: &mut TableState) {
        let scores: Vec<(PlayerId, u32)> = state
            .player_ids()
            .map(|player| (player, hand_value(state.seat(player).hand.iter())))
            .collect();

        let best = scores
            .iter()
            .filter(|(_, value)| *value <= 21)
            .map(|(_, value)| *value)
            .max();

        let winners: Vec<PlayerId> = match best {
            Some(best) => scores
                .iter()
                .filter(|(_, value)| *value == best)
                .map(|(player, _)| *player)
                .collect(),
            // Everyone busted: the pot is burned
            None => Vec::new(),
        };

        let pot = state.pot();
        if !winners.is_empty() {
            // Ties split evenly; the integer remainder is burned
            let share = pot / winners.len() as i64;
            for winner in &winners {
                state.seat_mut(*winner).bank += share;
            }
        }

        debug!(round = state.round, pot, winners = winners.len(), "showdown");

        for player in PlayerId::all(state.player_count()) {
            let seat = state.seat_mut(player);
            seat.bet = 0;
            let hand = std::mem::take(&mut seat.hand);
            for card in hand {
                state.discard.push_back(card);
            }
        }

        state.round += 1;
        let broke = state
            .seats
            .iter()
            .any(|(_, seat)| seat.bank < self.config.bet_min as i64);

        if state.round > self.config.rounds || broke {
            state.finished = true;
        } else {
            state.next_player = PlayerId::new(0);
            self.deal_round(state);
        }
    }

    /// The opening bet range for a seat, capped by its bank.
    ///
    /// Showdown finishes the episode before any seat drops below `bet_min`,
    /// so the cap never falls under the minimum mid-episode.
    fn bet_range(&self, bank: i64) -> ActionRange {
        let max = (bank.max(0) as u32).min(self.config.bet_max);
        ActionRange::Bet {
            min: self.config.bet_min,
            max: max.max(self.config.bet_min),
        }
    }
}

impl TurnEngine for Blackjack {
    fn config(&self) -> &EnvConfig {
        &self.config
    }

    fn initial_state(&self, rng: &mut GameRng) -> TableState {
        let mut state = TableState::new(
            self.config.player_count,
            self.config.starting_bank as i64,
            rng.fork(),
        );
        state.deck = Deck::shuffled(&mut state.rng);
        self.deal_round(&mut state);
        state
    }

    fn legal_ranges(&self, state: &TableState, player: PlayerId) -> RangeSet {
        let mut ranges = RangeSet::new();
        if state.finished || player != state.next_player {
            return ranges;
        }

        let seat = state.seat(player);
        if seat.has_bet() {
            ranges.push(ActionRange::Hit);
            ranges.push(ActionRange::Skip);
        } else {
            ranges.push(self.bet_range(seat.bank));
        }
        ranges
    }

    fn apply(&self, state: &mut TableState, player: PlayerId, action: &Action) -> ApplyOutcome {
        if state.finished || player != state.next_player {
            return ApplyOutcome::RejectedIllegal;
        }

        match *action {
            Action::Bet(amount) => {
                let seat = state.seat(player);
                if seat.has_bet() || !self.bet_range(seat.bank).accepts(action) {
                    return ApplyOutcome::RejectedIllegal;
                }
                let seat = state.seat_mut(player);
                seat.bank -= amount as i64;
                seat.bet = amount as i64;
                state.record_turn(player, *action);
                ApplyOutcome::Accepted
            }
            Action::Hit => {
                if !state.seat(player).has_bet() {
                    return ApplyOutcome::RejectedIllegal;
                }
                state.record_turn(player, *action);
                match Self::draw_card(state) {
                    Some(card) => {
                        let seat = state.seat_mut(player);
                        seat.hand.push_back(card);
                        if hand_value(seat.hand.iter()) > 21 {
                            self.end_turn(state);
                        }
                    }
                    // The whole shoe is in hands: the seat stands
                    None => self.end_turn(state),
                }
                ApplyOutcome::Accepted
            }
            Action::Skip => {
                if !state.seat(player).has_bet() {
                    return ApplyOutcome::RejectedIllegal;
                }
                state.record_turn(player, *action);
                self.end_turn(state);
                ApplyOutcome::Accepted
            }
            Action::Wait => ApplyOutcome::RejectedIllegal,
        }
    }

    fn is_terminal(&self, state: &TableState) -> Option<GameResult> {
        if !state.finished {
            return None;
        }

        let best_bank = state
            .seats
            .iter()
            .map(|(_, seat)| seat.bank)
            .max()
            .unwrap_or(0);
        let leaders: Vec<PlayerId> = state
            .seats
            .iter()
            .filter(|(_, seat)| seat.bank == best_bank)
            .map(|(player, _)| player)
            .collect();

        Some(match leaders.len() {
            n if n == state.player_count() => GameResult::Draw,
            1 => GameResult::Winner(leaders[0]),
            _ => GameResult::Winners(leaders),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> (Blackjack, TableState) {
        let config = EnvConfig::new(2);
        let game = Blackjack::new(config);
        let mut rng = GameRng::new(42);
        let state = game.initial_state(&mut rng);
        (game, state)
    }

    #[test]
    fn test_initial_deal() {
        let (_, state) = game();

        for player in state.player_ids() {
            assert_eq!(state.seat(player).hand.len(), 2);
            assert_eq!(state.seat(player).bank, 100);
            assert_eq!(state.seat(player).bet, 0);
        }
        assert_eq!(state.deck.len(), 52 - 4);
        assert!(state.discard.is_empty());
        assert_eq!(state.next_player, PlayerId::new(0));
    }

    #[test]
    fn test_opening_ranges() {
        let (game, state) = game();

        let ranges = game.legal_ranges(&state, PlayerId::new(0));
        assert_eq!(ranges.as_slice(), &[ActionRange::Bet { min: 1, max: 20 }]);
        assert!(game.legal_ranges(&state, PlayerId::new(1)).is_empty());
    }

    #[test]
    fn test_bet_capped_by_bank() {
        let config = EnvConfig::new(2).with_starting_bank(5);
        let game = Blackjack::new(config);
        let mut rng = GameRng::new(42);
        let state = game.initial_state(&mut rng);

        let ranges = game.legal_ranges(&state, PlayerId::new(0));
        assert_eq!(ranges.as_slice(), &[ActionRange::Bet { min: 1, max: 5 }]);
    }

    #[test]
    fn test_bet_moves_chips_and_opens_hit_skip() {
        let (game, mut state) = game();

        let outcome = game.apply(&mut state, PlayerId::new(0), &Action::Bet(3));
        assert_eq!(outcome, ApplyOutcome::Accepted);
        assert_eq!(state.seat(PlayerId::new(0)).bank, 97);
        assert_eq!(state.seat(PlayerId::new(0)).bet, 3);

        let ranges = game.legal_ranges(&state, PlayerId::new(0));
        assert_eq!(ranges.as_slice(), &[ActionRange::Hit, ActionRange::Skip]);
    }

    #[test]
    fn test_hit_deals_a_card() {
        let (game, mut state) = game();
        game.apply(&mut state, PlayerId::new(0), &Action::Bet(3));

        let before = state.deck.len();
        let outcome = game.apply(&mut state, PlayerId::new(0), &Action::Hit);
        assert_eq!(outcome, ApplyOutcome::Accepted);
        assert_eq!(state.seat(PlayerId::new(0)).hand.len(), 3);
        assert_eq!(state.deck.len(), before - 1);
    }

    #[test]
    fn test_skip_advances_turn() {
        let (game, mut state) = game();
        game.apply(&mut state, PlayerId::new(0), &Action::Bet(3));
        game.apply(&mut state, PlayerId::new(0), &Action::Skip);

        assert_eq!(state.next_player, PlayerId::new(1));
        assert!(game.legal_ranges(&state, PlayerId::new(0)).is_empty());
        assert_eq!(
            game.legal_ranges(&state, PlayerId::new(1)).as_slice(),
            &[ActionRange::Bet { min: 1, max: 20 }]
        );
    }

    #[test]
    fn test_rejection_is_pure() {
        let (game, mut state) = game();
        let snapshot = state.clone();

        // Hit before betting is illegal
        let outcome = game.apply(&mut state, PlayerId::new(0), &Action::Hit);
        assert_eq!(outcome, ApplyOutcome::RejectedIllegal);
        assert_eq!(
            state.seat(PlayerId::new(0)).hand,
            snapshot.seat(PlayerId::new(0)).hand
        );
        assert_eq!(state.deck, snapshot.deck);
        assert!(state.history.is_empty());

        // Acting out of turn is illegal
        let outcome = game.apply(&mut state, PlayerId::new(1), &Action::Bet(3));
        assert_eq!(outcome, ApplyOutcome::RejectedIllegal);
        assert_eq!(state.seat(PlayerId::new(1)).bet, 0);
    }

    #[test]
    fn test_wait_is_never_a_game_action() {
        let (game, mut state) = game();
        assert_eq!(
            game.apply(&mut state, PlayerId::new(0), &Action::Wait),
            ApplyOutcome::RejectedIllegal
        );
    }

    #[test]
    fn test_round_settles_and_redeals() {
        let config = EnvConfig::new(2).with_rounds(2);
        let game = Blackjack::new(config);
        let mut rng = GameRng::new(42);
        let mut state = game.initial_state(&mut rng);

        for player in PlayerId::all(2) {
            game.apply(&mut state, player, &Action::Bet(5));
            game.apply(&mut state, player, &Action::Skip);
        }

        // Round 2 dealt: bets cleared, old hands in the discard, fresh hands
        assert_eq!(state.round, 2);
        assert!(!state.finished);
        assert_eq!(state.discard.len(), 4);
        for player in PlayerId::all(2) {
            assert_eq!(state.seat(player).bet, 0);
            assert_eq!(state.seat(player).hand.len(), 2);
        }

        // The 10-chip pot split or went to one winner; no chips vanish
        let total: i64 = state.seats.iter().map(|(_, seat)| seat.bank).sum();
        assert_eq!(total, 200);
        assert!(game.is_terminal(&state).is_none());
    }

    #[test]
    fn test_final_round_finishes_episode() {
        let config = EnvConfig::new(2).with_rounds(1);
        let game = Blackjack::new(config);
        let mut rng = GameRng::new(42);
        let mut state = game.initial_state(&mut rng);

        for player in PlayerId::all(2) {
            game.apply(&mut state, player, &Action::Bet(5));
            game.apply(&mut state, player, &Action::Skip);
        }

        assert!(state.finished);
        assert!(game.is_terminal(&state).is_some());
        assert!(game.legal_ranges(&state, PlayerId::new(0)).is_empty());
    }

    #[test]
    fn test_showdown_pays_best_hand() {
        let config = EnvConfig::new(2).with_rounds(1);
        let game = Blackjack::new(config);
        let mut rng = GameRng::new(42);
        let mut state = game.initial_state(&mut rng);

        game.apply(&mut state, PlayerId::new(0), &Action::Bet(10));
        game.apply(&mut state, PlayerId::new(0), &Action::Skip);

        let p0_value = hand_value(state.seat(PlayerId::new(0)).hand.iter());
        let p1_value = hand_value(state.seat(PlayerId::new(1)).hand.iter());

        game.apply(&mut state, PlayerId::new(1), &Action::Bet(10));
        game.apply(&mut state, PlayerId::new(1), &Action::Skip);

        let p0_bank = state.seat(PlayerId::new(0)).bank;
        let p1_bank = state.seat(PlayerId::new(1)).bank;

        if p0_value == p1_value {
            assert_eq!((p0_bank, p1_bank), (100, 100));
        } else if p0_value > p1_value {
            assert_eq!((p0_bank, p1_bank), (110, 90));
        } else {
            assert_eq!((p0_bank, p1_bank), (90, 110));
        }
    }

    #[test]
    fn test_shoe_recycles_discard() {
        let config = EnvConfig::new(2).with_rounds(30);
        let game = Blackjack::new(config);
        let mut rng = GameRng::new(42);
        let mut state = game.initial_state(&mut rng);

        // Burn through many rounds; the shoe must recycle rather than run dry
        for _ in 0..20 {
            if state.finished {
                break;
            }
            for player in PlayerId::all(2) {
                game.apply(&mut state, player, &Action::Bet(1));
                game.apply(&mut state, player, &Action::Hit);
                if state.next_player == player && !state.finished {
                    game.apply(&mut state, player, &Action::Skip);
                }
            }
        }

        // Cards are conserved across deck, discard, and hands
        let in_hands: usize = state
            .seats
            .iter()
            .map(|(_, seat)| seat.hand.len())
            .sum();
        assert_eq!(state.deck.len() + state.discard.len() + in_hands, 52);
    }
}
