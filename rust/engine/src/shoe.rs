use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{all_ranks, all_suits, Card};
use crate::round::{total_of, Coup, Outcome};
use crate::tableau;

/// Infinite card source: every draw is uniform over the 52 cards, with
/// replacement. Nothing is depleted, so the forecast odds are exact for it.
#[derive(Debug)]
pub struct Shoe {
    rng: ChaCha20Rng,
    seed: u64,
}

impl Shoe {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn draw(&mut self) -> Card {
        let suits = all_suits();
        let ranks = all_ranks();
        let suit = suits[self.rng.random_range(0..suits.len())];
        let rank = ranks[self.rng.random_range(0..ranks.len())];
        Card { suit, rank }
    }

    /// Deals one coup in table order (P, B, P, B) and applies the tableau.
    pub fn deal_coup(&mut self) -> Coup {
        let mut player = vec![self.draw()];
        let mut banker = vec![self.draw()];
        player.push(self.draw());
        banker.push(self.draw());

        let player_two = total_of(&player);
        let banker_two = total_of(&banker);
        let opening = tableau::table(player_two, banker_two, None);

        let mut third_points = None;
        if opening.player_draws {
            let card = self.draw();
            third_points = Some(card.rank.points());
            player.push(card);
        }
        let decision = tableau::table(player_two, banker_two, third_points);
        if decision.banker.resolved() == Some(true) {
            banker.push(self.draw());
        }

        let player_total = total_of(&player);
        let banker_total = total_of(&banker);
        Coup {
            player,
            banker,
            player_total,
            banker_total,
            outcome: Outcome::from_totals(player_total, banker_total),
            natural: decision.natural,
        }
    }
}

impl Iterator for Shoe {
    type Item = Coup;

    fn next(&mut self) -> Option<Coup> {
        Some(self.deal_coup())
    }
}
