use crate::rng::Draw;
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

pub const WILD: char = '*';
pub const HOURGLASS: char = '⌛';

/// Letters plus the wild symbol twice, so it starts with double weight.
pub const SYMBOL_POOL: [char; 28] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P',
    'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', WILD, WILD,
];

/// Milliseconds between the entry of consecutive cards.
pub const DELAY_STEP_MS: u64 = 200;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Letter(char),
    Wild,
    Hourglass,
}

impl Symbol {
    pub fn from_pool(c: char) -> Self {
        if c == WILD { Symbol::Wild } else { Symbol::Letter(c) }
    }

    pub fn glyph(self) -> char {
        match self {
            Symbol::Letter(c) => c,
            Symbol::Wild => WILD,
            Symbol::Hourglass => HOURGLASS,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Red,
    Green,
}

impl CardColor {
    pub fn name(self) -> &'static str {
        match self {
            CardColor::Red => "red",
            CardColor::Green => "green",
        }
    }
}

/// Serialized under the same names as the stylesheet's animation classes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Animation {
    SpinIn,
    SlideLeft,
    SlideRight,
    DropBounce,
    RiseUp,
    FlipX,
    ZoomSpin,
    Spiral,
    WobbleIn,
    Elastic,
}

impl Animation {
    pub const ALL: [Animation; 10] = [
        Animation::SpinIn,
        Animation::SlideLeft,
        Animation::SlideRight,
        Animation::DropBounce,
        Animation::RiseUp,
        Animation::FlipX,
        Animation::ZoomSpin,
        Animation::Spiral,
        Animation::WobbleIn,
        Animation::Elastic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Animation::SpinIn => "spin-in",
            Animation::SlideLeft => "slide-left",
            Animation::SlideRight => "slide-right",
            Animation::DropBounce => "drop-bounce",
            Animation::RiseUp => "rise-up",
            Animation::FlipX => "flip-x",
            Animation::ZoomSpin => "zoom-spin",
            Animation::Spiral => "spiral",
            Animation::WobbleIn => "wobble-in",
            Animation::Elastic => "elastic",
        }
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub symbol: Symbol,
    pub color: Option<CardColor>,
    pub animation: Animation,
    /// Degrees, in `[-45, 45)`.
    pub rotation: f64,
    pub delay_ms: u64,
}

impl Card {
    pub fn is_hourglass(&self) -> bool {
        self.symbol == Symbol::Hourglass
    }
}

/// Which flavour of table is dealt.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DealVariant {
    /// Symbol cards only; every field of a card is drawn before the next card.
    Classic,
    /// One extra hourglass card; styling is drawn in a second pass.
    #[default]
    Hourglass,
}

pub fn delay_for(position: usize) -> u64 {
    position as u64 * DELAY_STEP_MS
}

/// Uniform index into a collection of `len` items.
fn pick_index(draw: &mut impl Draw, len: usize) -> usize {
    let idx = (draw.draw() * len as f64).floor() as usize;
    idx.min(len.saturating_sub(1))
}

fn draw_color(draw: &mut impl Draw, symbol: Symbol) -> Option<CardColor> {
    match symbol {
        Symbol::Letter(_) => Some(if draw.draw() < 0.5 {
            CardColor::Red
        } else {
            CardColor::Green
        }),
        Symbol::Wild | Symbol::Hourglass => None,
    }
}

fn draw_animation(draw: &mut impl Draw) -> Animation {
    Animation::ALL[pick_index(draw, Animation::ALL.len())]
}

fn draw_rotation(draw: &mut impl Draw) -> f64 {
    draw.draw() * 90.0 - 45.0
}

#[derive(Default)]
struct SymbolPicker {
    used: Vec<char>,
}

impl SymbolPicker {
    /// `None` once every distinct symbol has been dealt.
    fn pick(&mut self, draw: &mut impl Draw) -> Option<Symbol> {
        let available: Vec<char> = SYMBOL_POOL
            .iter()
            .copied()
            .filter(|c| !self.used.contains(c))
            .collect();
        if available.is_empty() {
            return None;
        }
        let c = available[pick_index(draw, available.len())];
        self.used.push(c);
        Some(Symbol::from_pool(c))
    }
}

/// Deal `count` cards (plus the hourglass for [`DealVariant::Hourglass`]).
///
/// Draw order is part of the contract: replaying the same source yields the
/// same table. The deal comes back short if the symbol pool runs dry.
pub fn deal(count: u32, variant: DealVariant, draw: &mut impl Draw) -> Vec<Card> {
    match variant {
        DealVariant::Classic => deal_classic(count, draw),
        DealVariant::Hourglass => deal_with_hourglass(count, draw),
    }
}

fn deal_classic(count: u32, draw: &mut impl Draw) -> Vec<Card> {
    let mut picker = SymbolPicker::default();
    let mut cards = Vec::with_capacity((count as usize).min(SYMBOL_POOL.len()));
    for position in 0..count as usize {
        let Some(symbol) = picker.pick(draw) else {
            tracing::debug!(position, "symbol pool exhausted");
            break;
        };
        let color = draw_color(draw, symbol);
        let animation = draw_animation(draw);
        let rotation = draw_rotation(draw);
        cards.push(Card {
            symbol,
            color,
            animation,
            rotation,
            delay_ms: delay_for(position),
        });
    }
    cards
}

fn deal_with_hourglass(count: u32, draw: &mut impl Draw) -> Vec<Card> {
    let positions = (count as usize).saturating_add(1);
    let hourglass_slot = pick_index(draw, positions);

    let mut picker = SymbolPicker::default();
    let mut placed: Vec<(Symbol, Option<CardColor>)> =
        Vec::with_capacity(positions.min(SYMBOL_POOL.len() + 1));
    for position in 0..positions {
        if position == hourglass_slot {
            placed.push((Symbol::Hourglass, None));
            continue;
        }
        let Some(symbol) = picker.pick(draw) else {
            tracing::debug!(position, hourglass_slot, "symbol pool exhausted");
            break;
        };
        let color = draw_color(draw, symbol);
        placed.push((symbol, color));
    }

    placed
        .into_iter()
        .enumerate()
        .map(|(position, (symbol, color))| {
            let animation = draw_animation(draw);
            let rotation = draw_rotation(draw);
            Card {
                symbol,
                color,
                animation,
                rotation,
                delay_ms: delay_for(position),
            }
        })
        .collect()
}
