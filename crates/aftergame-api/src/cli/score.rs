//! `aftergame score`: run the sentiment scorer on one piece of text.

use anyhow::Result;
use console::style;

use aftergame_core::sentiment;

pub fn print_score(text: &str, json: bool) -> Result<()> {
    let score = sentiment::score(text);

    if json {
        println!("{}", serde_json::json!({ "text": text, "score": score }));
        return Ok(());
    }

    let styled = match label(score) {
        "positive" => style(format!("{score:+.2}")).green().bold(),
        "negative" => style(format!("{score:+.2}")).red().bold(),
        _ => style(format!("{score:+.2}")).dim(),
    };
    println!("  {} {}", styled, style(label(score)).dim());
    Ok(())
}

fn label(score: f64) -> &'static str {
    if score > 0.0 {
        "positive"
    } else if score < 0.0 {
        "negative"
    } else {
        "neutral"
    }
}
