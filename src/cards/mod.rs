//! Standard 52-card deck and blackjack hand scoring.
//!
//! Cards carry a stable index in `0..52` so observations can encode piles as
//! fixed-size multi-hot vectors regardless of game state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    /// All suits in index order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Suit index in `0..4`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Card rank, Two through Ace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// All ranks in index order.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Rank index in `0..13`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 2
    }

    /// Blackjack value of this rank. Aces count as 11 here; [`hand_value`]
    /// demotes them to 1 as needed.
    #[must_use]
    pub const fn blackjack_value(self) -> u32 {
        match self {
            Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
            r => r as u32,
        }
    }
}

/// A playing card from a standard 52-card deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    /// Create a new card.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Stable index in `0..52`: suits are the major axis, ranks the minor.
    #[must_use]
    pub const fn index(self) -> usize {
        self.suit.index() * 13 + self.rank.index()
    }

    /// Inverse of [`Card::index`]. Returns `None` for indices outside `0..52`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= 52 {
            return None;
        }
        Some(Self::new(Rank::ALL[index % 13], Suit::ALL[index / 13]))
    }
}

impl fmt::Display for Card {
    /// Renders as `Ah`, `Td`, `7c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
            r => char::from_digit(r as u32, 10).unwrap_or('?'),
        };
        let suit = match self.suit {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        };
        write!(f, "{rank}{suit}")
    }
}

/// An ordered pile of cards. The top of the deck is the end of the vector.
///
/// Shuffling goes through [`GameRng`] so that all randomness in an episode
/// flows from one seed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Standard 52-card deck in index order.
    #[must_use]
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// Standard deck shuffled with the given RNG.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut deck = Self::standard_52();
        rng.shuffle(&mut deck.cards);
        deck
    }

    /// Rebuild a deck from loose cards, e.g. when recycling a discard pile.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Number of cards remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw the top card, if any.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }
}

/// Blackjack value of a hand.
///
/// Aces count as 11 unless that busts the hand, in which case they demote to 1
/// one at a time.
#[must_use]
pub fn hand_value<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u32 {
    let mut total = 0u32;
    let mut aces = 0u32;

    for card in cards {
        total += card.rank.blackjack_value();
        if card.rank == Rank::Ace {
            aces += 1;
        }
    }

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    total
}
