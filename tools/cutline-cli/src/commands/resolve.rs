//! Show the render frame at a given time or after a pointer press.

use cutline_common::config::EditorConfig;
use cutline_timeline_engine::interaction::{hit_test, map_pointer, TimelineGeometry};
use cutline_timeline_engine::resolver::render_frame;
use cutline_timeline_engine::EditorCommand;

use super::{status_line, ProjectSource};

pub fn run(
    config: &EditorConfig,
    source: &ProjectSource,
    at: Option<f64>,
    px: Option<f64>,
    row: Option<usize>,
) -> anyhow::Result<()> {
    let mut session = source.open(config)?;

    if let Some(x) = px {
        let geometry = TimelineGeometry::new(
            config.timeline.track_header_width_px,
            session.state().zoom_level,
        );
        let target = hit_test(session.state(), &geometry, row, x);
        let command = map_pointer(&target, &geometry);
        println!("Pointer at {x}px -> {}", serde_json::to_string(&command)?);
        session.apply(command);
    } else if let Some(time) = at {
        session.apply(EditorCommand::Seek { time });
    }

    let state = session.state();
    let frame = render_frame(state);

    println!("At {}", status_line(state));
    if frame.is_empty() {
        println!("  (nothing active)");
        return Ok(());
    }

    for layer in &frame.layers {
        let clip = &layer.clip;
        let marker = if layer.selected { "*" } else { " " };
        if layer.is_visual() {
            println!(
                " {marker} {} {} ({}) x={} y={} scale={} rot={} opacity={}",
                clip.track_id,
                clip.name,
                clip.kind,
                clip.transform.x,
                clip.transform.y,
                clip.transform.scale,
                clip.transform.display_rotation(),
                clip.transform.opacity
            );
        } else {
            println!(
                " {marker} {} {} ({}) volume={}",
                clip.track_id,
                clip.name,
                clip.kind,
                clip.effective_volume()
            );
        }
    }

    Ok(())
}
