use cardgame::{
    deal::{
        DealVariant,
        Symbol,
        deal,
    },
    rng::SeededSequence,
    test_helpers::*,
};

#[test]
fn select__deals_the_known_table_for_seed_12345() {
    // given
    let ctx = TestContext::new();
    let mut session = ctx.session();

    // when
    let cards = session.select(5, 12345).unwrap().to_vec();

    // then
    let symbols: Vec<Symbol> = cards.iter().map(|c| c.symbol).collect();
    assert_eq!(
        symbols,
        vec![
            Symbol::Letter('M'),
            Symbol::Letter('A'),
            Symbol::Letter('I'),
            Symbol::Letter('H'),
            Symbol::Letter('L'),
            Symbol::Hourglass,
        ]
    );
    assert_eq!(cards.last().map(|c| c.delay_ms), Some(1000));
}

#[test]
fn session_deal__matches_a_direct_deal_at_the_same_iteration() {
    // given
    let ctx = TestContext::with_variant(DealVariant::Classic);
    let mut session = ctx.session();
    session.select(9, 404).unwrap();

    // when
    let third = {
        session.redeal().unwrap();
        session.redeal().unwrap().to_vec()
    };

    // then
    let expected = deal(
        9,
        DealVariant::Classic,
        &mut SeededSequence::initialize(404, 3),
    );
    assert_eq!(third, expected);
}

#[test]
fn restore__continues_the_sequence_a_single_session_would_have_dealt() {
    // given
    let uninterrupted = TestContext::new();
    let mut session = uninterrupted.session();
    session.select(6, 77).unwrap();
    session.redeal().unwrap();
    let expected = session.redeal().unwrap().to_vec();

    let reloaded = TestContext::new();
    reloaded.session().select(6, 77).unwrap();
    reloaded.session().restore().unwrap();

    // when
    let mut after_second_reload = reloaded.session();
    after_second_reload.restore().unwrap();

    // then
    assert_eq!(after_second_reload.cards(), expected.as_slice());
}

#[test]
fn deal__first_draw_places_the_hourglass() {
    // given
    let count = 7;
    let mut recorder = RecordingDraw::new(SeededSequence::initialize(2024, 1));

    // when
    let cards = deal(count, DealVariant::Hourglass, &mut recorder);

    // then
    let slot = (recorder.seen[0] * f64::from(count + 1)).floor() as usize;
    assert!(cards[slot].is_hourglass());
    assert_eq!(cards.iter().filter(|c| c.is_hourglass()).count(), 1);
}

#[test]
fn deal__consecutive_iterations_differ() {
    // given
    let first = deal(
        12,
        DealVariant::Hourglass,
        &mut SeededSequence::initialize(5, 1),
    );

    // when
    let second = deal(
        12,
        DealVariant::Hourglass,
        &mut SeededSequence::initialize(5, 2),
    );

    // then
    assert_ne!(first, second);
}

#[test]
fn deal__scripted_draws_give_a_predictable_single_card() {
    // given
    // slot 0.9 -> after the letter; letter 0.0 -> 'A'; color 0.0 -> red;
    // then animation and rotation for both cards
    let mut script = ScriptedDraw::new(vec![0.9, 0.0, 0.0, 0.0, 0.5, 0.0, 0.5]);

    // when
    let cards = deal(1, DealVariant::Hourglass, &mut script);

    // then
    assert_eq!(script.consumed(), 7);
    assert_eq!(cards[0].symbol, Symbol::Letter('A'));
    assert!(cards[1].is_hourglass());
    assert_eq!(cards[0].rotation, 0.0);
}
