use super::allocate;

#[test]
fn higher_score_gets_more() {
    let shares = allocate(&[1.0, 2.0], 100, 1.0, 1);
    assert!(shares[1].chars > shares[0].chars);
    assert_eq!(shares[0].chars + shares[1].chars, 100);
}

#[test]
fn low_temperature_concentrates_on_winner() {
    let shares = allocate(&[1.0, 2.0], 100, 0.1, 1);
    assert!(
        shares[1].chars >= 99,
        "winner should take nearly everything, got {}",
        shares[1].chars
    );
}

#[test]
fn high_temperature_spreads_evenly() {
    let shares = allocate(&[1.0, 2.0], 100, 10.0, 1);
    assert!(shares[0].chars > 40 && shares[0].chars < 60);
    assert!(shares[1].chars > 40 && shares[1].chars < 60);
}

#[test]
fn zero_budget_folds_everything() {
    let shares = allocate(&[1.0, 2.0], 0, 0.5, 8);
    assert!(shares.iter().all(|s| s.folded && s.chars == 0));
}

#[test]
fn empty_scores_yield_empty_shares() {
    assert!(allocate(&[], 100, 0.5, 8).is_empty());
}

#[test]
fn shares_never_exceed_budget() {
    for budget in [1usize, 7, 50, 1000] {
        let shares = allocate(&[0.5, 1.5, 1.0, 0.2], budget, 0.5, 8);
        let total: usize = shares.iter().map(|s| s.chars).sum();
        assert!(total <= budget, "total {total} over budget {budget}");
    }
}

#[test]
fn under_floor_children_fold_and_survivors_reclaim() {
    // The two weak children fall under the floor; the strong one should end
    // up with the whole budget after redistribution.
    let shares = allocate(&[3.0, 1.0, 1.0], 20, 0.5, 8);
    assert!(!shares[0].folded);
    assert!(shares[1].folded && shares[2].folded);
    assert_eq!(shares[0].chars, 20);
}

#[test]
fn budget_below_floor_folds_all() {
    let shares = allocate(&[1.0, 1.0], 5, 0.5, 8);
    assert!(shares.iter().all(|s| s.folded));
}

#[test]
fn surviving_shares_meet_floor() {
    let shares = allocate(&[2.0, 1.0, 0.5, 0.1], 64, 0.5, 8);
    for share in shares.iter().filter(|s| !s.folded) {
        assert!(share.chars >= 8, "surviving share {} under floor", share.chars);
    }
}
