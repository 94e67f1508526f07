//! Success story CLI commands: import, list.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use aftergame_types::story::NewSuccessStory;

use crate::state::AppState;

/// Load stories from a JSON array file.
pub async fn import_stories(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let stories = parse_stories(&content)
        .with_context(|| format!("{} is not a JSON array of stories", file.display()))?;

    let imported = state.story_service.import(stories).await?;
    tracing::info!(count = imported, path = %file.display(), "stories imported");

    if json {
        println!("{}", serde_json::json!({ "imported": imported }));
    } else {
        println!();
        println!(
            "  {} Imported {} stor{}",
            style("✓").green().bold(),
            style(imported).bold(),
            if imported == 1 { "y" } else { "ies" }
        );
        println!();
    }
    Ok(())
}

fn parse_stories(content: &str) -> serde_json::Result<Vec<NewSuccessStory>> {
    serde_json::from_str(content)
}

/// Print the library as a table.
pub async fn list_stories(state: &AppState, json: bool) -> Result<()> {
    let stories = state.story_service.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stories)?);
        return Ok(());
    }

    if stories.is_empty() {
        println!();
        println!(
            "  {} No stories yet. Load some with: {}",
            style("i").blue().bold(),
            style("aftergame stories import <file.json>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Athlete").fg(Color::White),
        Cell::new("Sport").fg(Color::White),
        Cell::new("Ended").fg(Color::White),
        Cell::new("Now").fg(Color::White),
        Cell::new("Key Lesson").fg(Color::White),
    ]);

    for story in &stories {
        let name = if story.is_featured {
            Cell::new(format!("★ {}", story.athlete_name)).fg(Color::Yellow)
        } else {
            Cell::new(&story.athlete_name).fg(Color::Cyan)
        };
        table.add_row(vec![
            name,
            Cell::new(&story.former_sport),
            Cell::new(story.career_end_year).fg(Color::DarkGrey),
            Cell::new(&story.new_career_path).fg(Color::Green),
            Cell::new(shorten(&story.key_lesson, 60)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} stor{}",
        style(stories.len()).bold(),
        if stories.len() == 1 { "y" } else { "ies" }
    );
    println!();

    Ok(())
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub(crate) fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
