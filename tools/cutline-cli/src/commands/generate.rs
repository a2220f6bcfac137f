//! Add generated media clips at the playhead.

use std::sync::Arc;

use cutline_common::config::EditorConfig;
use cutline_timeline_engine::generate::{
    caption_clip_command, image_clip_commands, validate_prompt, FallbackGenerator,
    PlaceholderGenerator,
};

use super::{status_line, ProjectSource};

pub async fn run(
    config: &EditorConfig,
    source: &ProjectSource,
    prompt: String,
    with_caption: bool,
) -> anyhow::Result<()> {
    let prompt = validate_prompt(&prompt)?;
    let mut session = source.open(config)?;

    // No service is configured; the placeholder generator stands in.
    let generator = FallbackGenerator::new(PlaceholderGenerator);

    let mut commands = image_clip_commands(generator.images(prompt).await);
    if with_caption {
        commands.push(caption_clip_command(generator.caption(prompt).await));
    }
    let before = Arc::clone(session.state());
    let changed = session.apply_all(commands);

    println!("Prompt: {prompt}");
    println!("  Clips added: {changed}");
    for (track, clip) in session.state().clips() {
        if !before.has_clip(&clip.id) {
            println!("  {} on {}: {}", clip.id, track.name, clip.name);
        }
    }
    println!("  {}", status_line(session.state()));

    Ok(())
}
