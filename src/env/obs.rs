//! Observation builder: projects table state into per-player flat vectors.
//!
//! The layout is identical for every viewer so agents can share model
//! parameters across seats; only the content differs:
//!
//! ```text
//! [legality mask]  cardinality entries, 1.0 where the index is legal now
//! [self]           own hand as 52-dim multi-hot, own bank, own bet
//! [shared]         discard pile as 52-dim multi-hot
//! [others]         bank and bet for each other seat, in rotating seat order
//! ```
//!
//! Another seat's hand never appears anywhere in the vector.

use crate::core::{PlayerId, TableState};

/// Fixed shape of the composite observation space: the action-legality mask
/// sub-space and the state-observation sub-space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObservationSpace {
    /// Width of the legality mask section (= action space cardinality).
    pub mask_dim: usize,
    /// Width of the state section.
    pub state_dim: usize,
}

impl ObservationSpace {
    /// Total flattened width.
    #[must_use]
    pub const fn flat_dim(&self) -> usize {
        self.mask_dim + self.state_dim
    }
}

/// Encodes table state into flat observation vectors.
#[derive(Clone, Debug)]
pub struct TableEncoder {
    player_count: usize,
    mask_dim: usize,
    bank_scale: f32,
    bet_scale: f32,
}

impl TableEncoder {
    const PILE_DIM: usize = 52;

    /// Create an encoder.
    ///
    /// `mask_dim` is the codec's cardinality; `bank_scale` and `bet_scale`
    /// normalize chip counts into roughly `[0, 1]`.
    #[must_use]
    pub fn new(player_count: usize, mask_dim: usize, bank_scale: f32, bet_scale: f32) -> Self {
        assert!(player_count >= 1, "Must have at least 1 player");
        assert!(bank_scale > 0.0 && bet_scale > 0.0, "scales must be positive");
        Self {
            player_count,
            mask_dim,
            bank_scale,
            bet_scale,
        }
    }

    /// The declared observation space.
    ///
    /// State width = 52 (own hand) + 2 (own bank, bet) + 52 (discard)
    /// + 2 x (players - 1) (others' bank and bet).
    #[must_use]
    pub fn space(&self) -> ObservationSpace {
        ObservationSpace {
            mask_dim: self.mask_dim,
            state_dim: Self::PILE_DIM + 2 + Self::PILE_DIM + 2 * (self.player_count - 1),
        }
    }

    /// Encode the table from one seat's perspective.
    ///
    /// `legal_mask` must come from the codec for the same seat.
    #[must_use]
    pub fn encode(&self, state: &TableState, legal_mask: &[bool], viewer: PlayerId) -> Vec<f32> {
        debug_assert_eq!(legal_mask.len(), self.mask_dim);
        debug_assert_eq!(state.player_count(), self.player_count);

        let space = self.space();
        let mut out = Vec::with_capacity(space.flat_dim());

        // Legality mask section
        out.extend(legal_mask.iter().map(|&legal| if legal { 1.0 } else { 0.0 }));

        // Self section: private hand, then own bank and bet
        let seat = state.seat(viewer);
        let mut hand = [0.0f32; Self::PILE_DIM];
        for card in &seat.hand {
            hand[card.index()] = 1.0;
        }
        out.extend_from_slice(&hand);
        out.push(self.scale_bank(seat.bank));
        out.push(self.scale_bet(seat.bet));

        // Shared section: discard pile
        let mut discard = [0.0f32; Self::PILE_DIM];
        for card in &state.discard {
            discard[card.index()] = 1.0;
        }
        out.extend_from_slice(&discard);

        // Others section: public fields only, starting from the next seat
        let mut other = viewer.next_seat(self.player_count);
        while other != viewer {
            let seat = state.seat(other);
            out.push(self.scale_bank(seat.bank));
            out.push(self.scale_bet(seat.bet));
            other = other.next_seat(self.player_count);
        }

        debug_assert_eq!(out.len(), space.flat_dim());
        out
    }

    fn scale_bank(&self, bank: i64) -> f32 {
        (bank as f32 / self.bank_scale).clamp(0.0, 1.0)
    }

    fn scale_bet(&self, bet: i64) -> f32 {
        (bet as f32 / self.bet_scale).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};
    use crate::core::GameRng;

    fn encoder(player_count: usize) -> TableEncoder {
        TableEncoder::new(player_count, 23, 200.0, 20.0)
    }

    fn state_with_cards(player_count: usize) -> TableState {
        let mut state = TableState::new(player_count, 100, GameRng::new(42));
        state
            .seat_mut(PlayerId::new(0))
            .hand
            .push_back(Card::new(Rank::Ace, Suit::Spades));
        state
            .seat_mut(PlayerId::new(1))
            .hand
            .push_back(Card::new(Rank::King, Suit::Hearts));
        state.discard.push_back(Card::new(Rank::Two, Suit::Clubs));
        state
    }

    #[test]
    fn test_space_arithmetic() {
        // 52 + 2 + 52 + 2*(N-1)
        assert_eq!(encoder(2).space().state_dim, 108);
        assert_eq!(encoder(4).space().state_dim, 112);
        assert_eq!(encoder(2).space().flat_dim(), 131);
    }

    #[test]
    fn test_encoded_length_matches_space() {
        let enc = encoder(2);
        let state = state_with_cards(2);
        let mask = vec![false; 23];

        for viewer in PlayerId::all(2) {
            let obs = enc.encode(&state, &mask, viewer);
            assert_eq!(obs.len(), enc.space().flat_dim());
        }
    }

    #[test]
    fn test_own_hand_visible() {
        let enc = encoder(2);
        let state = state_with_cards(2);
        let mask = vec![false; 23];

        let obs = enc.encode(&state, &mask, PlayerId::new(0));
        let hand_start = 23;
        let ace_spades = Card::new(Rank::Ace, Suit::Spades).index();

        assert_eq!(obs[hand_start + ace_spades], 1.0);
        // Exactly one card in hand
        let hand = &obs[hand_start..hand_start + 52];
        assert_eq!(hand.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_other_hand_hidden() {
        let enc = encoder(2);
        let state = state_with_cards(2);
        let mask = vec![false; 23];

        // Player 0's view must not contain player 1's king anywhere: the only
        // card sections are own hand and discard.
        let obs = enc.encode(&state, &mask, PlayerId::new(0));
        let king_hearts = Card::new(Rank::King, Suit::Hearts).index();

        let hand_start = 23;
        let discard_start = 23 + 52 + 2;
        assert_eq!(obs[hand_start + king_hearts], 0.0);
        assert_eq!(obs[discard_start + king_hearts], 0.0);
    }

    #[test]
    fn test_discard_shared() {
        let enc = encoder(2);
        let state = state_with_cards(2);
        let mask = vec![false; 23];
        let two_clubs = Card::new(Rank::Two, Suit::Clubs).index();
        let discard_start = 23 + 52 + 2;

        for viewer in PlayerId::all(2) {
            let obs = enc.encode(&state, &mask, viewer);
            assert_eq!(obs[discard_start + two_clubs], 1.0);
        }
    }

    #[test]
    fn test_others_section_public_fields() {
        let enc = encoder(2);
        let mut state = state_with_cards(2);
        state.seat_mut(PlayerId::new(1)).bet = 10;

        let mask = vec![false; 23];
        let obs = enc.encode(&state, &mask, PlayerId::new(0));
        let others_start = 23 + 52 + 2 + 52;

        // bank 100 / 200, bet 10 / 20
        assert!((obs[others_start] - 0.5).abs() < 1e-6);
        assert!((obs[others_start + 1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mask_section() {
        let enc = encoder(2);
        let state = state_with_cards(2);
        let mut mask = vec![false; 23];
        mask[0] = true;
        mask[21] = true;

        let obs = enc.encode(&state, &mask, PlayerId::new(0));
        assert_eq!(obs[0], 1.0);
        assert_eq!(obs[21], 1.0);
        assert_eq!(obs[1], 0.0);
    }

    #[test]
    fn test_scaling_clamps() {
        let enc = encoder(2);
        let mut state = state_with_cards(2);
        state.seat_mut(PlayerId::new(0)).bank = 100_000;

        let mask = vec![false; 23];
        let obs = enc.encode(&state, &mask, PlayerId::new(0));
        let bank_index = 23 + 52;
        assert_eq!(obs[bank_index], 1.0);
    }

    #[test]
    fn test_four_player_layout() {
        let enc = encoder(4);
        let mut state = TableState::new(4, 100, GameRng::new(42));
        for (i, player) in PlayerId::all(4).enumerate() {
            state.seat_mut(player).bet = (i as i64 + 1) * 2;
        }

        let mask = vec![false; 23];
        let obs = enc.encode(&state, &mask, PlayerId::new(2));
        assert_eq!(obs.len(), enc.space().flat_dim());

        // Others appear in rotating order from the viewer: 3, 0, 1
        let others_start = 23 + 52 + 2 + 52;
        let bets: Vec<f32> = (0..3).map(|i| obs[others_start + 2 * i + 1]).collect();
        assert!((bets[0] - 8.0 / 20.0).abs() < 1e-6);
        assert!((bets[1] - 2.0 / 20.0).abs() < 1e-6);
        assert!((bets[2] - 4.0 / 20.0).abs() < 1e-6);
    }
}
