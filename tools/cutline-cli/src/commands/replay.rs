//! Replay a JSON command script against the project.

use std::path::PathBuf;

use cutline_common::config::EditorConfig;

use super::{load_script, status_line, ProjectSource};

pub fn run(config: &EditorConfig, source: &ProjectSource, path: PathBuf) -> anyhow::Result<()> {
    println!("Replaying script: {}", path.display());

    let commands = load_script(&path)?;
    let mut session = source.open(config)?;

    for (i, command) in commands.into_iter().enumerate() {
        let name = command.name();
        let changed = session.apply(command);
        println!(
            "  {:>3}. {:<12} {}  v{}",
            i + 1,
            name,
            if changed { "applied" } else { "no-op  " },
            session.version()
        );
    }

    let state = session.state();
    println!();
    println!("Result: {}", status_line(state));
    println!("  Clips: {}", state.clip_count());
    match state.selected_clip() {
        Some(clip) => println!("  Selected: {} ({})", clip.name, clip.id),
        None if state.selection_is_dangling() => println!("  Selected: none (dangling id)"),
        None => println!("  Selected: none"),
    }

    match state.validate() {
        Ok(()) => println!("\nProject is valid."),
        Err(e) => println!("\nValidation issue: {e}"),
    }

    Ok(())
}
