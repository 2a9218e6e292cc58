use crate::{
    deal::{
        Card,
        DealVariant,
        deal,
    },
    rng::SeededSequence,
    storage::KeyValueStore,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use tracing::{
    info,
    warn,
};

pub const CARD_COUNT_KEY: &str = "cardgame_card_count";
pub const SEED_KEY: &str = "cardgame_seed";
pub const ITERATION_KEY: &str = "cardgame_iteration";

/// The persisted triple that fully determines the table on screen.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SessionState {
    pub count: u32,
    pub seed: u32,
    pub iteration: u32,
}

impl SessionState {
    pub fn new(count: u32, seed: u32) -> Result<Self> {
        if count == 0 {
            return Err(eyre!("card count must be at least 1"));
        }
        Ok(Self {
            count,
            seed,
            iteration: 0,
        })
    }
}

pub trait SessionRepository {
    /// `None` when nothing usable has been stored yet.
    fn load(&self) -> Result<Option<SessionState>>;

    fn save(&mut self, state: &SessionState) -> Result<()>;

    /// Only the iteration changes between deals.
    fn save_iteration(&mut self, state: &SessionState) -> Result<()> {
        self.save(state)
    }
}

/// Maps [`SessionState`] onto three decimal-string keys of a [`KeyValueStore`].
#[derive(Clone, Debug)]
pub struct KeyValueSessionRepository<S> {
    store: S,
}

impl<S> KeyValueSessionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> KeyValueSessionRepository<S> {
    fn read_number(&self, key: &str) -> Result<Option<u32>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match raw.trim().parse::<u32>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                warn!(key, value = %raw, "ignoring malformed persisted value");
                Ok(None)
            }
        }
    }
}

impl<S: KeyValueStore> SessionRepository for KeyValueSessionRepository<S> {
    fn load(&self) -> Result<Option<SessionState>> {
        let Some(count) = self.read_number(CARD_COUNT_KEY)? else {
            return Ok(None);
        };
        if count == 0 {
            warn!("persisted card count is zero; treating session as unset");
            return Ok(None);
        }
        let Some(seed) = self.read_number(SEED_KEY)? else {
            return Ok(None);
        };
        let iteration = self.read_number(ITERATION_KEY)?.unwrap_or(0);
        Ok(Some(SessionState {
            count,
            seed,
            iteration,
        }))
    }

    fn save(&mut self, state: &SessionState) -> Result<()> {
        self.store.set_many(&[
            (CARD_COUNT_KEY, state.count.to_string()),
            (SEED_KEY, state.seed.to_string()),
            (ITERATION_KEY, state.iteration.to_string()),
        ])
    }

    fn save_iteration(&mut self, state: &SessionState) -> Result<()> {
        self.store
            .set(ITERATION_KEY, &state.iteration.to_string())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Uninitialized,
    AwaitingSelection,
    Active,
}

/// Drives the setup / table lifecycle over a [`SessionRepository`].
pub struct Session<R> {
    repository: R,
    variant: DealVariant,
    phase: Phase,
    state: Option<SessionState>,
    cards: Vec<Card>,
}

impl<R: SessionRepository> Session<R> {
    pub fn new(repository: R, variant: DealVariant) -> Self {
        Self {
            repository,
            variant,
            phase: Phase::Uninitialized,
            state: None,
            cards: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> Option<SessionState> {
        self.state
    }

    pub fn variant(&self) -> DealVariant {
        self.variant
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Picks up where the last run left off, dealing the next table.
    pub fn restore(&mut self) -> Result<Phase> {
        match self
            .repository
            .load()
            .wrap_err("loading persisted session failed")?
        {
            Some(state) => {
                info!(
                    count = state.count,
                    seed = state.seed,
                    iteration = state.iteration,
                    "restoring session"
                );
                self.state = Some(state);
                self.deal_next()?;
            }
            None => {
                info!("no persisted session; showing setup");
                self.phase = Phase::AwaitingSelection;
            }
        }
        Ok(self.phase)
    }

    /// Starts a fresh seed from the setup screen and deals the first table.
    pub fn select(&mut self, count: u32, seed: u32) -> Result<&[Card]> {
        let state = SessionState::new(count, seed)?;
        self.repository
            .save(&state)
            .wrap_err("saving selected session failed")?;
        info!(count, seed, "session selected");
        self.state = Some(state);
        self.deal_next()?;
        Ok(&self.cards)
    }

    /// A tap on the table. Seed and count stay as they are.
    pub fn redeal(&mut self) -> Result<&[Card]> {
        if self.phase != Phase::Active {
            return Err(eyre!("cannot re-deal while {:?}", self.phase));
        }
        self.deal_next()?;
        Ok(&self.cards)
    }

    pub fn open_setup(&mut self) {
        if self.phase == Phase::Active {
            self.phase = Phase::AwaitingSelection;
        }
    }

    /// Back to the table without choosing anything new. Returns whether
    /// there was a table to go back to.
    pub fn close_setup(&mut self) -> bool {
        if self.phase == Phase::AwaitingSelection && self.state.is_some() {
            self.phase = Phase::Active;
            true
        } else {
            false
        }
    }

    fn deal_next(&mut self) -> Result<()> {
        let mut state = self
            .state
            .ok_or_else(|| eyre!("no session selected"))?;
        state.iteration = state
            .iteration
            .checked_add(1)
            .ok_or_else(|| eyre!("iteration counter overflowed"))?;
        self.repository
            .save_iteration(&state)
            .wrap_err("saving iteration failed")?;

        let mut sequence = SeededSequence::initialize(state.seed, state.iteration);
        self.cards = deal(state.count, self.variant, &mut sequence);
        tracing::debug!(
            draws = sequence.draws(),
            cards = self.cards.len(),
            "deal drew from sequence"
        );
        info!(
            seed = state.seed,
            iteration = state.iteration,
            cards = self.cards.len(),
            "dealt table"
        );

        self.state = Some(state);
        self.phase = Phase::Active;
        Ok(())
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    fn repo() -> KeyValueSessionRepository<InMemoryStore> {
        KeyValueSessionRepository::new(InMemoryStore::new())
    }

    #[test]
    fn load__empty_store_is_none() {
        assert_eq!(repo().load().unwrap(), None);
    }

    #[test]
    fn load__malformed_seed_is_none() {
        let mut store = InMemoryStore::new();
        store.set(CARD_COUNT_KEY, "5").unwrap();
        store.set(SEED_KEY, "not-a-number").unwrap();
        let repo = KeyValueSessionRepository::new(store);
        assert_eq!(repo.load().unwrap(), None);
    }

    #[test]
    fn load__missing_iteration_defaults_to_zero() {
        let mut store = InMemoryStore::new();
        store.set(CARD_COUNT_KEY, "5").unwrap();
        store.set(SEED_KEY, "77").unwrap();
        let repo = KeyValueSessionRepository::new(store);
        assert_eq!(
            repo.load().unwrap(),
            Some(SessionState {
                count: 5,
                seed: 77,
                iteration: 0
            })
        );
    }

    #[test]
    fn save__writes_decimal_strings() {
        let mut repo = repo();
        repo.save(&SessionState {
            count: 4,
            seed: 12345,
            iteration: 9,
        })
        .unwrap();
        let entries = repo.store().entries();
        let entries = entries.lock().unwrap();
        assert_eq!(entries.get(CARD_COUNT_KEY).map(String::as_str), Some("4"));
        assert_eq!(entries.get(SEED_KEY).map(String::as_str), Some("12345"));
        assert_eq!(entries.get(ITERATION_KEY).map(String::as_str), Some("9"));
    }

    #[test]
    fn select__first_deal_leaves_iteration_at_one() {
        let mut session = Session::new(repo(), DealVariant::Hourglass);
        session.restore().unwrap();
        assert_eq!(session.phase(), Phase::AwaitingSelection);

        session.select(5, 12345).unwrap();

        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.state().unwrap().iteration, 1);
        assert_eq!(session.cards().len(), 6);
        assert_eq!(
            session.repository().load().unwrap().unwrap().iteration,
            1
        );
    }

    #[test]
    fn select__rejects_zero_count() {
        let mut session = Session::new(repo(), DealVariant::Classic);
        assert!(session.select(0, 1).is_err());
        assert_eq!(session.state(), None);
    }

    #[test]
    fn redeal__advances_iteration_and_keeps_seed() {
        let mut session = Session::new(repo(), DealVariant::Hourglass);
        session.select(5, 99).unwrap();
        let first = session.cards().to_vec();

        session.redeal().unwrap();

        let state = session.state().unwrap();
        assert_eq!(state.iteration, 2);
        assert_eq!(state.seed, 99);
        assert_eq!(state.count, 5);
        assert_ne!(session.cards(), first.as_slice());
    }

    #[test]
    fn redeal__refused_before_selection() {
        let mut session = Session::new(repo(), DealVariant::Hourglass);
        session.restore().unwrap();
        assert!(session.redeal().is_err());
    }

    #[test]
    fn select__resets_iteration_for_a_new_seed() {
        let mut session = Session::new(repo(), DealVariant::Hourglass);
        session.select(3, 1).unwrap();
        session.redeal().unwrap();
        session.redeal().unwrap();
        assert_eq!(session.state().unwrap().iteration, 3);

        session.open_setup();
        session.select(3, 2).unwrap();

        assert_eq!(
            session.state(),
            Some(SessionState {
                count: 3,
                seed: 2,
                iteration: 1
            })
        );
    }

    #[test]
    fn open_and_close_setup_keep_the_table() {
        let mut session = Session::new(repo(), DealVariant::Classic);
        session.select(4, 8).unwrap();
        let cards = session.cards().to_vec();

        session.open_setup();
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert!(session.close_setup());

        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.cards(), cards.as_slice());
        assert_eq!(session.state().unwrap().iteration, 1);
    }

    #[test]
    fn close_setup__nothing_to_return_to() {
        let mut session = Session::new(repo(), DealVariant::Classic);
        session.restore().unwrap();
        assert!(!session.close_setup());
        assert_eq!(session.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn deal_matches_generator_fast_forward() {
        let mut session = Session::new(repo(), DealVariant::Hourglass);
        session.select(5, 12345).unwrap();
        let expected = deal(
            5,
            DealVariant::Hourglass,
            &mut SeededSequence::initialize(12345, 1),
        );
        assert_eq!(session.cards(), expected.as_slice());
    }
}
