use coup_engine::round::{total_of, Outcome};
use coup_engine::shoe::Shoe;
use coup_engine::tableau::{decide, player_draws};

#[test]
fn dealt_coups_follow_the_tableau() {
    let mut shoe = Shoe::new_with_seed(42);
    for _ in 0..2_000 {
        let coup = shoe.deal_coup();
        let p2 = total_of(&coup.player[..2]);
        let b2 = total_of(&coup.banker[..2]);
        let natural = p2 >= 8 || b2 >= 8;
        assert_eq!(coup.natural, natural);

        let third = coup.player.get(2).map(|c| c.rank.points());
        assert_eq!(third.is_some(), !natural && player_draws(p2));
        let d = decide(p2, b2, third).unwrap();
        assert_eq!(coup.banker.len() == 3, d.banker.resolved() == Some(true));

        assert_eq!(coup.player_total, total_of(&coup.player));
        assert_eq!(coup.banker_total, total_of(&coup.banker));
        assert_eq!(
            coup.outcome,
            Outcome::from_totals(coup.player_total, coup.banker_total)
        );
    }
}

#[test]
fn different_seeds_diverge() {
    let a: Vec<_> = Shoe::new_with_seed(1).take(30).map(|c| c.outcome).collect();
    let b: Vec<_> = Shoe::new_with_seed(2).take(30).map(|c| c.outcome).collect();
    assert_ne!(a, b);
}
