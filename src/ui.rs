use crate::{
    client::AppSnapshot,
    config::SetupBounds,
    deal::{
        Card,
        CardColor,
        Symbol,
    },
    hourglass::SandState,
    session::Phase,
};
use color_eyre::eyre::{
    Result,
    eyre,
};
use crossterm::{
    event::{
        self,
        Event,
        KeyCode,
        KeyEvent,
        KeyEventKind,
        KeyModifiers,
        MouseButton,
        MouseEvent,
        MouseEventKind,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use rand::Rng;
use ratatui::{
    layout::Position,
    prelude::*,
    widgets::*,
};
use std::io::stdout;
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

pub const CARD_WIDTH: u16 = 13;
pub const CARD_HEIGHT: u16 = 8;
const SETUP_HOTSPOT_LABEL: &str = "[ setup ]";

pub enum UserEvent {
    Quit,
    Redraw,
    Redeal,
    FlipHourglass,
    OpenSetup,
    CloseSetup,
    Select { count: u32, seed: u32 },
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
enum SetupField {
    #[default]
    Count,
    Seed,
}

#[derive(Clone, Debug)]
struct SetupState {
    count: u32,
    seed: u32,
    focus: SetupField,
}

impl SetupState {
    fn prefill(snap: &AppSnapshot) -> Self {
        match snap.session {
            Some(session) => Self {
                count: session.count.clamp(1, snap.bounds.max_count),
                seed: session.seed.min(snap.bounds.max_seed),
                focus: SetupField::Count,
            },
            None => Self {
                count: 5.min(snap.bounds.max_count),
                seed: random_seed(snap.bounds.max_seed),
                focus: SetupField::Count,
            },
        }
    }

    fn value_mut(&mut self) -> &mut u32 {
        match self.focus {
            SetupField::Count => &mut self.count,
            SetupField::Seed => &mut self.seed,
        }
    }

    fn clamp(&mut self, bounds: SetupBounds) {
        self.count = self.count.clamp(1, bounds.max_count);
        self.seed = self.seed.min(bounds.max_seed);
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            SetupField::Count => SetupField::Seed,
            SetupField::Seed => SetupField::Count,
        };
    }
}

impl Default for SetupState {
    fn default() -> Self {
        Self {
            count: 5,
            seed: 0,
            focus: SetupField::Count,
        }
    }
}

fn random_seed(max_seed: u32) -> u32 {
    rand::rng().random_range(0..=max_seed)
}

/// Screen regions from the last draw, used to resolve mouse clicks.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TableLayout {
    pub status: Rect,
    pub setup_hotspot: Rect,
    pub table: Rect,
    pub cards: Vec<Rect>,
    pub hourglass: Option<Rect>,
}

#[derive(Debug, Default)]
pub struct UiState {
    phase: Option<Phase>,
    has_session: bool,
    has_hourglass: bool,
    bounds: SetupBounds,
    setup: SetupState,
    quit_prompt: bool,
    layout: TableLayout,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

pub type InputEventReceiver = mpsc::UnboundedReceiver<std::io::Result<Event>>;

/// Reads terminal events on a dedicated thread; crossterm's reader blocks.
pub fn input_event_stream() -> InputEventReceiver {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            let ev = event::read();
            let failed = ev.is_err();
            if tx.send(ev).is_err() || failed {
                break;
            }
        }
    });
    rx
}

pub async fn next_raw_event(rx: &mut InputEventReceiver) -> Result<Event> {
    match rx.recv().await {
        Some(ev) => Ok(ev?),
        None => Err(eyre!("terminal input closed")),
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    // One persistent Terminal so buffers diff across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

/// Refresh cached snapshot facts that input handling depends on.
pub fn sync(state: &mut UiState, snap: &AppSnapshot) {
    let entering_setup = snap.phase == Phase::AwaitingSelection
        && state.phase != Some(Phase::AwaitingSelection);
    state.bounds = snap.bounds;
    state.has_session = snap.session.is_some();
    state.has_hourglass = snap.cards.iter().any(Card::is_hourglass);
    if entering_setup {
        state.setup = SetupState::prefill(snap);
    }
    state.setup.clamp(snap.bounds);
    state.phase = Some(snap.phase);
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    sync(state, snap);
    if let Some(mut term) = state.terminal.take() {
        let mut layout = TableLayout::default();
        let res = term
            .draw(|f| {
                layout = compute_layout(f.area(), &snap.cards);
                ui(f, state, snap, &layout);
            })
            .map(|_| ());
        state.terminal = Some(term);
        res?;
        state.layout = layout;
    }
    Ok(())
}

/// Turn a raw terminal event into a game action, updating UI-local state.
pub fn interpret_event(state: &mut UiState, event: Event) -> Option<UserEvent> {
    match event {
        Event::Key(k) => interpret_key(state, k),
        Event::Mouse(m) => interpret_mouse(state, m),
        Event::Resize(_, _) => Some(UserEvent::Redraw),
        _ => None,
    }
}

fn interpret_key(state: &mut UiState, k: KeyEvent) -> Option<UserEvent> {
    if k.kind != KeyEventKind::Press {
        return None;
    }
    if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(UserEvent::Quit);
    }
    if state.quit_prompt {
        return match k.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.quit_prompt = false;
                Some(UserEvent::Redraw)
            }
            _ => None,
        };
    }
    match state.phase {
        Some(Phase::AwaitingSelection) => interpret_setup_key(state, k.code),
        Some(Phase::Active) => match k.code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(UserEvent::Redeal),
            KeyCode::Char('s') => Some(UserEvent::OpenSetup),
            KeyCode::Char('h') if state.has_hourglass => Some(UserEvent::FlipHourglass),
            KeyCode::Char('q') | KeyCode::Esc => {
                state.quit_prompt = true;
                Some(UserEvent::Redraw)
            }
            _ => None,
        },
        Some(Phase::Uninitialized) | None => match k.code {
            KeyCode::Char('q') => Some(UserEvent::Quit),
            _ => None,
        },
    }
}

fn interpret_setup_key(state: &mut UiState, code: KeyCode) -> Option<UserEvent> {
    let bounds = state.bounds;
    let setup = &mut state.setup;
    match code {
        KeyCode::Enter => {
            setup.clamp(bounds);
            return Some(UserEvent::Select {
                count: setup.count,
                seed: setup.seed,
            });
        }
        KeyCode::Esc => {
            if state.has_session {
                return Some(UserEvent::CloseSetup);
            }
            state.quit_prompt = true;
            return Some(UserEvent::Redraw);
        }
        KeyCode::Char('q') => {
            state.quit_prompt = true;
            return Some(UserEvent::Redraw);
        }
        KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
            setup.switch_focus();
        }
        KeyCode::Left | KeyCode::Char('-') => {
            let v = setup.value_mut();
            *v = v.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('+') => {
            let v = setup.value_mut();
            *v = v.saturating_add(1);
        }
        KeyCode::PageDown => {
            let v = setup.value_mut();
            *v = v.saturating_sub(10);
        }
        KeyCode::PageUp => {
            let v = setup.value_mut();
            *v = v.saturating_add(10);
        }
        KeyCode::Backspace => {
            let v = setup.value_mut();
            *v /= 10;
        }
        KeyCode::Char('r') => {
            setup.seed = random_seed(bounds.max_seed);
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let d = c.to_digit(10).unwrap_or(0);
            let v = setup.value_mut();
            *v = v.saturating_mul(10).saturating_add(d);
        }
        _ => return None,
    }
    setup.clamp(bounds);
    Some(UserEvent::Redraw)
}

fn interpret_mouse(state: &mut UiState, m: MouseEvent) -> Option<UserEvent> {
    if m.kind != MouseEventKind::Down(MouseButton::Left) || state.quit_prompt {
        return None;
    }
    if state.phase != Some(Phase::Active) {
        return None;
    }
    let at = Position::new(m.column, m.row);
    let layout = &state.layout;
    if layout.setup_hotspot.contains(at) {
        return Some(UserEvent::OpenSetup);
    }
    if layout.hourglass.is_some_and(|r| r.contains(at)) {
        return Some(UserEvent::FlipHourglass);
    }
    if layout.status.contains(at) {
        return None;
    }
    Some(UserEvent::Redeal)
}

/// Grid of card slots, left to right then top to bottom. Cards that do not fit
/// are left out.
pub fn compute_layout(area: Rect, cards: &[Card]) -> TableLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // status
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1), // help
        ])
        .split(area);
    let status = chunks[0];
    let table = chunks[1];

    let label_w = SETUP_HOTSPOT_LABEL.width() as u16;
    let setup_hotspot = Rect::new(
        (status.x + status.width).saturating_sub(label_w + 2),
        status.y + 1,
        label_w.min(status.width),
        1,
    );

    let cols = (table.width / CARD_WIDTH).max(1);
    let rows = (table.height / CARD_HEIGHT).max(1);
    let mut rects = Vec::with_capacity(cards.len());
    let mut hourglass = None;
    for (i, card) in cards.iter().enumerate() {
        let (row, col) = (i as u16 / cols, i as u16 % cols);
        if row >= rows {
            break;
        }
        let rect = Rect::new(
            table.x + col * CARD_WIDTH,
            table.y + row * CARD_HEIGHT,
            CARD_WIDTH.min(table.width),
            CARD_HEIGHT.min(table.height),
        );
        if card.is_hourglass() {
            hourglass = Some(rect);
        }
        rects.push(rect);
    }

    TableLayout {
        status,
        setup_hotspot,
        table,
        cards: rects,
        hourglass,
    }
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot, layout: &TableLayout) {
    f.render_widget(Clear, f.area());
    match snap.phase {
        Phase::Active => draw_table(f, snap, layout),
        Phase::AwaitingSelection | Phase::Uninitialized => draw_setup(f, state, snap),
    }
    if state.quit_prompt {
        draw_quit_modal(f);
    }
}

fn draw_table(f: &mut Frame, snap: &AppSnapshot, layout: &TableLayout) {
    draw_status(f, layout, snap);
    for (card, rect) in snap.cards.iter().zip(&layout.cards) {
        if snap.since_deal.as_millis() < u128::from(card.delay_ms) {
            continue;
        }
        draw_card(f, *rect, card, snap);
    }
    if layout.cards.len() < snap.cards.len() {
        tracing::debug!(
            shown = layout.cards.len(),
            dealt = snap.cards.len(),
            "table too small for every card"
        );
    }
    let help_area = Rect::new(
        layout.table.x,
        layout.table.y + layout.table.height,
        layout.table.width,
        1,
    );
    let help = Paragraph::new(Line::styled(
        "space/click: deal  s: setup  h: hourglass  q: quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(help, help_area.intersection(f.area()));
}

fn draw_status(f: &mut Frame, layout: &TableLayout, snap: &AppSnapshot) {
    let summary = match snap.session {
        Some(s) => format!(
            "Cards: {} | Seed: {} | Deal #{} | {}",
            s.count, s.seed, s.iteration, snap.status
        ),
        None => snap.status.clone(),
    };
    let block = Block::default().borders(Borders::ALL).title("Card Game");
    f.render_widget(Paragraph::new(summary).block(block), layout.status);
    let hotspot = Paragraph::new(Span::styled(
        SETUP_HOTSPOT_LABEL,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(hotspot, layout.setup_hotspot);
}

fn card_style(card: &Card) -> Style {
    match (card.symbol, card.color) {
        (Symbol::Hourglass, _) => Style::default().fg(Color::Yellow),
        (Symbol::Wild, _) => Style::default().fg(Color::Magenta),
        (_, Some(CardColor::Red)) => Style::default().fg(Color::Red),
        (_, Some(CardColor::Green)) => Style::default().fg(Color::Green),
        (_, None) => Style::default(),
    }
}

fn centered(text: &str, width: u16) -> String {
    let pad = (width as usize).saturating_sub(text.width()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn draw_card(f: &mut Frame, area: Rect, card: &Card, snap: &AppSnapshot) {
    let style = card_style(card);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style)
        .title(Span::styled(
            card.animation.name(),
            Style::default().fg(Color::DarkGray),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = if card.is_hourglass() {
        hourglass_lines(inner.width, snap.sand, snap.sand_left)
    } else {
        let glyph = card.symbol.to_string();
        let big = Style::default().add_modifier(Modifier::BOLD).patch(style);
        vec![
            Line::styled(glyph.clone(), style),
            Line::default(),
            Line::styled(centered(&glyph, inner.width), big),
            Line::default(),
            Line::styled(
                centered(&format!("↻ {:+.0}°", card.rotation), inner.width),
                Style::default().fg(Color::DarkGray),
            ),
        ]
    };
    f.render_widget(Paragraph::new(lines), inner);
}

fn hourglass_lines(width: u16, sand: SandState, sand_left: f64) -> Vec<Line<'static>> {
    let bulb = width.saturating_sub(2) as usize;
    let top = (bulb as f64 * sand_left).round() as usize;
    let bottom = bulb.saturating_sub(top);
    let timer = match sand {
        SandState::Idle => String::from("press h"),
        SandState::Running { remaining } => {
            let secs = remaining.as_secs_f64().ceil() as u64;
            format!("{}:{:02}", secs / 60, secs % 60)
        }
        SandState::Finished => String::from("time!"),
    };
    let sand_style = Style::default().fg(Color::Yellow);
    vec![
        Line::styled(centered(&"▓".repeat(top), width), sand_style),
        Line::styled(centered("╲╱", width), sand_style),
        Line::styled(centered("╱╲", width), sand_style),
        Line::styled(centered(&"▓".repeat(bottom), width), sand_style),
        Line::from(centered(&timer, width)),
    ]
}

fn draw_setup(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    let area = centered_rect(60, 50, f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Setup")
        .title_bottom(Line::from(
            "←/→ adjust  ↑/↓ switch  0-9 type  r random seed  enter deal  esc back",
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let setup = &state.setup;
    let sliders = [
        (SetupField::Count, "Cards", setup.count, snap.bounds.max_count),
        (SetupField::Seed, "Seed", setup.seed, snap.bounds.max_seed),
    ];
    for (i, (field, label, value, max)) in sliders.into_iter().enumerate() {
        let focused = setup.focus == field;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        f.render_widget(
            Paragraph::new(Line::styled(format!("{label}: {value}"), label_style)),
            rows[i * 2],
        );
        let ratio = if max == 0 {
            1.0
        } else {
            f64::from(value) / f64::from(max)
        };
        let gauge = LineGauge::default()
            .filled_style(label_style.fg(if focused { Color::Yellow } else { Color::Gray }))
            .ratio(ratio.clamp(0.0, 1.0));
        f.render_widget(gauge, rows[i * 2 + 1]);
    }

    if !snap.status.is_empty() {
        f.render_widget(
            Paragraph::new(Line::styled(
                snap.status.clone(),
                Style::default().fg(Color::DarkGray),
            ))
            .wrap(Wrap { trim: true }),
            rows[4],
        );
    }
}

fn draw_quit_modal(f: &mut Frame) {
    let area = centered_rect(30, 20, f.area());
    f.render_widget(Clear, area);
    let modal = Paragraph::new("Quit? (y/n)")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Quit"));
    f.render_widget(modal, area);
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        deal::{
            Animation,
            DealVariant,
        },
        session::SessionState,
    };
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn card(symbol: Symbol, color: Option<CardColor>, position: usize) -> Card {
        Card {
            symbol,
            color,
            animation: Animation::SpinIn,
            rotation: 10.0,
            delay_ms: crate::deal::delay_for(position),
        }
    }

    fn active_snapshot() -> AppSnapshot {
        AppSnapshot {
            phase: Phase::Active,
            session: Some(SessionState {
                count: 2,
                seed: 42,
                iteration: 3,
            }),
            variant: DealVariant::Hourglass,
            cards: vec![
                card(Symbol::Letter('Q'), Some(CardColor::Red), 0),
                card(Symbol::Hourglass, None, 1),
                card(Symbol::Wild, None, 2),
            ],
            since_deal: Duration::from_secs(5),
            sand: SandState::Idle,
            sand_left: 1.0,
            bounds: SetupBounds::default(),
            status: String::from("Ready"),
        }
    }

    fn setup_snapshot(session: Option<SessionState>) -> AppSnapshot {
        AppSnapshot {
            phase: Phase::AwaitingSelection,
            session,
            cards: Vec::new(),
            ..active_snapshot()
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn render(state: &mut UiState, snap: &AppSnapshot) -> String {
        sync(state, snap);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|f| {
                let layout = compute_layout(f.area(), &snap.cards);
                ui(f, state, snap, &layout);
                state.layout = layout;
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn layout_places_cards_in_a_grid() {
        let cards: Vec<Card> = (0..8)
            .map(|i| card(Symbol::Letter((b'A' + i as u8) as char), Some(CardColor::Red), i))
            .collect();
        let layout = compute_layout(Rect::new(0, 0, 40, 30), &cards);
        // 40 columns fit three cards per row
        assert_eq!(layout.cards.len(), 8);
        assert_eq!(layout.cards[0], Rect::new(0, 3, CARD_WIDTH, CARD_HEIGHT));
        assert_eq!(layout.cards[3], Rect::new(0, 3 + CARD_HEIGHT, CARD_WIDTH, CARD_HEIGHT));
        assert!(layout.hourglass.is_none());
    }

    #[test]
    fn layout_drops_cards_that_do_not_fit() {
        let cards: Vec<Card> = (0..10)
            .map(|i| card(Symbol::Letter((b'A' + i as u8) as char), Some(CardColor::Red), i))
            .collect();
        let layout = compute_layout(Rect::new(0, 0, 26, 12), &cards);
        assert_eq!(layout.cards.len(), 2);
    }

    #[test]
    fn table_keys_map_to_actions() {
        let mut state = UiState::default();
        sync(&mut state, &active_snapshot());
        assert!(matches!(
            interpret_event(&mut state, key(KeyCode::Char(' '))),
            Some(UserEvent::Redeal)
        ));
        assert!(matches!(
            interpret_event(&mut state, key(KeyCode::Char('h'))),
            Some(UserEvent::FlipHourglass)
        ));
        assert!(matches!(
            interpret_event(&mut state, key(KeyCode::Char('s'))),
            Some(UserEvent::OpenSetup)
        ));
    }

    #[test]
    fn quit_needs_confirmation() {
        let mut state = UiState::default();
        sync(&mut state, &active_snapshot());
        assert!(matches!(
            interpret_event(&mut state, key(KeyCode::Char('q'))),
            Some(UserEvent::Redraw)
        ));
        // clicks are ignored while the prompt is up
        assert!(interpret_event(&mut state, click(40, 20)).is_none());
        assert!(matches!(
            interpret_event(&mut state, key(KeyCode::Char('y'))),
            Some(UserEvent::Quit)
        ));
    }

    #[test]
    fn clicks_resolve_against_last_layout() {
        let mut state = UiState::default();
        let snap = active_snapshot();
        render(&mut state, &snap);

        let hourglass = state.layout.hourglass.unwrap();
        assert!(matches!(
            interpret_event(&mut state, click(hourglass.x + 2, hourglass.y + 2)),
            Some(UserEvent::FlipHourglass)
        ));
        let hotspot = state.layout.setup_hotspot;
        assert!(matches!(
            interpret_event(&mut state, click(hotspot.x, hotspot.y)),
            Some(UserEvent::OpenSetup)
        ));
        assert!(interpret_event(&mut state, click(1, 1)).is_none());
        assert!(matches!(
            interpret_event(&mut state, click(70, 25)),
            Some(UserEvent::Redeal)
        ));
    }

    #[test]
    fn setup_prefills_from_session_and_selects() {
        let mut state = UiState::default();
        let session = SessionState {
            count: 7,
            seed: 321,
            iteration: 4,
        };
        sync(&mut state, &setup_snapshot(Some(session)));

        interpret_event(&mut state, key(KeyCode::Right));
        interpret_event(&mut state, key(KeyCode::Down));
        interpret_event(&mut state, key(KeyCode::Backspace));
        interpret_event(&mut state, key(KeyCode::Char('9')));

        match interpret_event(&mut state, key(KeyCode::Enter)) {
            Some(UserEvent::Select { count, seed }) => {
                assert_eq!(count, 8);
                assert_eq!(seed, 329);
            }
            _ => panic!("expected a selection"),
        }
    }

    #[test]
    fn setup_values_are_clamped_to_bounds() {
        let mut state = UiState::default();
        sync(&mut state, &setup_snapshot(None));
        for _ in 0..5 {
            interpret_event(&mut state, key(KeyCode::Char('9')));
        }
        interpret_event(&mut state, key(KeyCode::Tab));
        for _ in 0..6 {
            interpret_event(&mut state, key(KeyCode::Char('9')));
        }
        match interpret_event(&mut state, key(KeyCode::Enter)) {
            Some(UserEvent::Select { count, seed }) => {
                assert_eq!(count, SetupBounds::default().max_count);
                assert_eq!(seed, SetupBounds::default().max_seed);
            }
            _ => panic!("expected a selection"),
        }
    }

    #[test]
    fn setup_escape_returns_only_with_a_session() {
        let mut state = UiState::default();
        sync(&mut state, &setup_snapshot(None));
        assert!(matches!(
            interpret_event(&mut state, key(KeyCode::Esc)),
            Some(UserEvent::Redraw)
        ));
        assert!(state.quit_prompt);

        let mut state = UiState::default();
        sync(
            &mut state,
            &setup_snapshot(Some(SessionState {
                count: 3,
                seed: 1,
                iteration: 1,
            })),
        );
        assert!(matches!(
            interpret_event(&mut state, key(KeyCode::Esc)),
            Some(UserEvent::CloseSetup)
        ));
    }

    #[test]
    fn renders_revealed_cards_only() {
        let mut state = UiState::default();
        let mut snap = active_snapshot();
        snap.since_deal = Duration::from_millis(250);
        let screen = render(&mut state, &snap);
        assert!(screen.contains('Q'));
        assert!(screen.contains("press h"));
        assert!(!screen.contains('*'));
        assert!(screen.contains("Seed: 42"));
    }

    #[test]
    fn renders_running_hourglass_timer() {
        let mut state = UiState::default();
        let mut snap = active_snapshot();
        snap.sand = SandState::Running {
            remaining: Duration::from_millis(61_500),
        };
        snap.sand_left = 0.68;
        let screen = render(&mut state, &snap);
        assert!(screen.contains("1:02"));
    }

    #[test]
    fn renders_setup_sliders() {
        let mut state = UiState::default();
        let snap = setup_snapshot(Some(SessionState {
            count: 12,
            seed: 4321,
            iteration: 2,
        }));
        let screen = render(&mut state, &snap);
        assert!(screen.contains("Cards: 12"));
        assert!(screen.contains("Seed: 4321"));
    }
}
