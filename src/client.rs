use crate::{
    config::{
        AppConfig,
        RunMode,
        SetupBounds,
    },
    deal::{
        Card,
        DealVariant,
    },
    hourglass::{
        Hourglass,
        SandState,
    },
    render,
    session::{
        KeyValueSessionRepository,
        Phase,
        Session,
        SessionRepository,
        SessionState,
    },
    storage::JsonFileStore,
    ui,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use std::{
    fs,
    path::Path,
    time::{
        Duration,
        Instant,
    },
};
use tokio::time;
use tracing::{
    error,
    info,
};

const TICK: Duration = Duration::from_millis(100);

/// Everything the UI needs for one frame.
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub phase: Phase,
    pub session: Option<SessionState>,
    pub variant: DealVariant,
    pub cards: Vec<Card>,
    /// Time since the current table was dealt; drives the staggered entry.
    pub since_deal: Duration,
    pub sand: SandState,
    pub sand_left: f64,
    pub bounds: SetupBounds,
    pub status: String,
}

impl AppSnapshot {
    /// Whether another frame would look different from this one.
    pub fn is_animating(&self) -> bool {
        let revealing = self
            .cards
            .iter()
            .any(|c| self.since_deal.as_millis() < u128::from(c.delay_ms));
        revealing || matches!(self.sand, SandState::Running { .. })
    }
}

pub struct AppController<R> {
    session: Session<R>,
    hourglass: Hourglass,
    dealt_at: Instant,
    bounds: SetupBounds,
    status: String,
}

impl<R: SessionRepository> AppController<R> {
    pub fn new(session: Session<R>, bounds: SetupBounds) -> Self {
        Self {
            session,
            hourglass: Hourglass::default(),
            dealt_at: Instant::now(),
            bounds,
            status: String::new(),
        }
    }

    /// Restores the persisted session, dealing its next table if there is one.
    pub fn start(&mut self, now: Instant) -> Result<()> {
        match self.session.restore()? {
            Phase::Active => self.on_dealt(now),
            _ => self.status = String::from("Choose a card count and seed"),
        }
        Ok(())
    }

    pub fn select(&mut self, count: u32, seed: u32, now: Instant) -> Result<()> {
        self.session.select(count, seed)?;
        self.on_dealt(now);
        Ok(())
    }

    pub fn redeal(&mut self, now: Instant) -> Result<()> {
        self.session.redeal()?;
        self.on_dealt(now);
        Ok(())
    }

    pub fn open_setup(&mut self) {
        self.session.open_setup();
        self.status = String::from("Enter deals with a fresh seed; Esc goes back");
    }

    pub fn close_setup(&mut self) {
        if self.session.close_setup() {
            self.status = String::from("Ready");
        }
    }

    pub fn flip_hourglass(&mut self, now: Instant) {
        if self.session.cards().iter().any(Card::is_hourglass) {
            self.hourglass.flip(now);
            info!("hourglass flipped");
        }
    }

    pub fn report_error(&mut self, context: &str, err: &color_eyre::Report) {
        error!("{context}: {err:#}");
        self.status = format!("{context}: {err}");
    }

    fn on_dealt(&mut self, now: Instant) {
        self.dealt_at = now;
        self.hourglass.reset();
        let requested = self.session.state().map(|s| s.count).unwrap_or_default();
        let dealt = self
            .session
            .cards()
            .iter()
            .filter(|c| !c.is_hourglass())
            .count();
        self.status = if (dealt as u32) < requested {
            format!("Out of symbols: dealt {dealt} of {requested}")
        } else {
            String::from("Ready")
        };
    }

    pub fn snapshot(&self, now: Instant) -> AppSnapshot {
        AppSnapshot {
            phase: self.session.phase(),
            session: self.session.state(),
            variant: self.session.variant(),
            cards: self.session.cards().to_vec(),
            since_deal: now.saturating_duration_since(self.dealt_at),
            sand: self.hourglass.state(now),
            sand_left: self.hourglass.sand_left(now),
            bounds: self.bounds,
            status: self.status.clone(),
        }
    }
}

pub type FileSessionRepository = KeyValueSessionRepository<JsonFileStore>;

pub fn file_session(config: &AppConfig) -> Session<FileSessionRepository> {
    let store = JsonFileStore::new(&config.state_file);
    Session::new(KeyValueSessionRepository::new(store), config.variant)
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    match &config.mode {
        RunMode::Interactive => run_interactive(&config).await,
        RunMode::Print { select, html, json } => {
            let out = run_print(file_session(&config), *select, html.as_deref(), *json)?;
            println!("{out}");
            Ok(())
        }
    }
}

/// Deals one table without a terminal UI and returns it as text, or as a
/// JSON array of card descriptors when `json` is set.
pub fn run_print<R: SessionRepository>(
    mut session: Session<R>,
    select: Option<(u32, u32)>,
    html: Option<&Path>,
    json: bool,
) -> Result<String> {
    match select {
        Some((count, seed)) => {
            session.select(count, seed)?;
        }
        None => {
            if session.restore()? != Phase::Active {
                return Ok(String::from(
                    "No session yet; pass --count and --seed to start one",
                ));
            }
        }
    }
    if let Some(path) = html {
        fs::write(path, render::render_html(session.cards()))
            .wrap_err_with(|| format!("Failed to write HTML to {}", path.display()))?;
        info!(path = %path.display(), "wrote table as HTML");
    }
    if json {
        return render::render_json(session.cards());
    }
    let header = match session.state() {
        Some(s) => format!("seed {} | deal #{} | {} cards", s.seed, s.iteration, s.count),
        None => String::new(),
    };
    Ok(format!("{header}\n{}", render::render_text(session.cards())))
}

async fn run_interactive(config: &AppConfig) -> Result<()> {
    let mut controller = AppController::new(file_session(config), config.bounds);
    controller.start(Instant::now())?;
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    info!("Starting UI");
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(&mut controller, &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop<R: SessionRepository>(
    controller: &mut AppController<R>,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
) -> Result<()> {
    let mut ticker = time::interval(TICK);
    let mut last_snapshot = controller.snapshot(Instant::now());
    ui::draw(ui_state, &last_snapshot)?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            _ = ticker.tick() => {
                // one more frame after animation stops so the last state lands
                let was_animating = last_snapshot.is_animating();
                let snapshot = controller.snapshot(Instant::now());
                if was_animating || snapshot.is_animating() {
                    ui::draw(ui_state, &snapshot).wrap_err("draw on tick failed")?;
                }
                last_snapshot = snapshot;
            }
            raw_ev = ui::next_raw_event(input_events) => {
                let event = raw_ev?;
                let Some(ev) = ui::interpret_event(ui_state, event) else {
                    continue;
                };
                let now = Instant::now();
                match ev {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Redraw => {}
                    ui::UserEvent::Redeal => {
                        if let Err(e) = controller.redeal(now) {
                            controller.report_error("Deal failed", &e);
                        }
                    }
                    ui::UserEvent::FlipHourglass => controller.flip_hourglass(now),
                    ui::UserEvent::OpenSetup => controller.open_setup(),
                    ui::UserEvent::CloseSetup => controller.close_setup(),
                    ui::UserEvent::Select { count, seed } => {
                        if let Err(e) = controller.select(count, seed, now) {
                            controller.report_error("Starting session failed", &e);
                        }
                    }
                }
                last_snapshot = controller.snapshot(now);
                ui::draw(ui_state, &last_snapshot).wrap_err("draw after input failed")?;
            }
        }
    }
    Ok(())
}
