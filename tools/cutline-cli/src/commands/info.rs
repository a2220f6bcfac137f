//! Show project information.

use cutline_common::config::EditorConfig;
use cutline_project_model::{clip_span, format_timecode, ruler_ticks};

use super::{status_line, ProjectSource};

pub fn run(config: &EditorConfig, source: &ProjectSource) -> anyhow::Result<()> {
    let session = source.open(config)?;
    let p = session.state();

    println!("Project: {}", p.name);
    println!("  ID: {}", p.id);
    println!("  Playhead: {}", status_line(p));
    println!("  Zoom: {} px/s", p.zoom_level);
    match p.selected_clip() {
        Some(clip) => println!("  Selected: {} ({})", clip.name, clip.id),
        None => println!("  Selected: none"),
    }
    println!();

    println!("Tracks:");
    for track in p.tracks.iter() {
        let mut flags = Vec::new();
        if !track.is_visible {
            flags.push("hidden");
        }
        if track.is_locked {
            flags.push("locked");
        }
        println!(
            "  {} [{}] {} ({} clips, ends {}){}",
            track.id,
            track.kind,
            track.name,
            track.clips.len(),
            format_timecode(track.content_end()),
            if flags.is_empty() {
                String::new()
            } else {
                format!(" {}", flags.join(", "))
            }
        );
        let header = config.timeline.track_header_width_px;
        for clip in &track.clips {
            let span = clip_span(clip, p.zoom_level);
            println!(
                "    {} {:<20} {} -> {}  {:.0}..{:.0}px",
                clip.id,
                clip.name,
                format_timecode(clip.start_time),
                format_timecode(clip.end_time()),
                span.left + header,
                span.right() + header
            );
        }
    }
    println!();

    let labels: Vec<String> = ruler_ticks(
        p.total_duration,
        p.zoom_level,
        config.timeline.ruler_step_secs,
    )
    .into_iter()
    .filter_map(|t| t.label)
    .collect();
    println!("Ruler: {}", labels.join("  "));

    if let Err(e) = p.validate() {
        println!();
        println!("Validation issue: {e}");
    }

    Ok(())
}
