use crate::deal::{
    Card,
    Symbol,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use itertools::Itertools;

/// One line per card, for the headless `--print` mode.
pub fn render_text(cards: &[Card]) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let color = card.color.map(|c| c.name()).unwrap_or("-");
            format!(
                "{:>2}. {} {:<5} {:<11} {:>6.1}° +{}ms",
                i + 1,
                card.symbol,
                color,
                card.animation.name(),
                card.rotation,
                card.delay_ms
            )
        })
        .join("\n")
}

fn card_style(card: &Card) -> String {
    format!(
        "animation-delay: {}ms; --deal-rotation: {}deg;",
        card.delay_ms, card.rotation
    )
}

pub fn render_card_html(card: &Card) -> String {
    let style = card_style(card);
    let animation = card.animation.name();
    match card.symbol {
        Symbol::Hourglass => {
            format!(
                r#"<div class="card animate {animation} hourglass-card" style="{style}">
    <div class="card-border"></div>
    <div class="hourglass">
        <div class="sand-top"></div>
        <div class="sand-bottom"></div>
    </div>
</div>"#
            )
        }
        Symbol::Wild => {
            let symbol = card.symbol;
            format!(
                r#"<div class="card animate {animation}" style="{style}">
    <div class="card-border"></div>
    <div class="card-corner top-left"><span class="card-letter sync-split">{symbol}</span></div>
    <span class="card-center sync-split sync-large">{symbol}</span>
    <div class="card-corner bottom-right"><span class="card-letter sync-split">{symbol}</span></div>
</div>"#
            )
        }
        Symbol::Letter(_) => {
            let symbol = card.symbol;
            let color = card.color.map(|c| c.name()).unwrap_or_default();
            format!(
                r#"<div class="card animate {animation}" style="{style}">
    <div class="card-border"></div>
    <div class="card-corner top-left"><span class="card-letter {color}">{symbol}</span></div>
    <span class="card-center {color}">{symbol}</span>
    <div class="card-corner bottom-right"><span class="card-letter {color}">{symbol}</span></div>
</div>"#
            )
        }
    }
}

/// Card descriptors as a JSON array, for renderers outside this crate.
pub fn render_json(cards: &[Card]) -> Result<String> {
    serde_json::to_string_pretty(cards).wrap_err("Failed to serialize dealt cards")
}

/// Standalone page with the table, linking the game's stylesheet.
pub fn render_html(cards: &[Card]) -> String {
    let body = cards.iter().map(render_card_html).join("\n");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Card Game</title>
<link rel="stylesheet" href="index.css">
</head>
<body>
<div class="cards-container" id="cardsContainer">
{body}
</div>
</body>
</html>
"#
    )
}
