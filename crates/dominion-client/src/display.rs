//! Rendering a snapshot for the terminal.

use dominion_core::GameStateSnapshot;

use crate::config::OutputFormat;

/// Render `snapshot` in the requested format, newline-terminated.
pub fn render(snapshot: &GameStateSnapshot, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(snapshot)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string(snapshot)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Blocks in engine order, each as a `**name**` header followed by
/// `key : value` lines.
pub fn render_text(snapshot: &GameStateSnapshot) -> String {
    let mut out = String::new();
    for (kind, block) in snapshot.iter() {
        out.push_str(&format!("**{}**\n", kind));
        for (key, value) in block.iter() {
            out.push_str(&format!("{} : {}\n", key, value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use dominion_core::{Block, BlockKind};

    use super::*;

    fn sample() -> GameStateSnapshot {
        GameStateSnapshot::from([
            (
                BlockKind::PlayerHand,
                [("copper", "3"), ("estate", "2")].into_iter().collect::<Block>(),
            ),
            (BlockKind::Trash, Block::new()),
        ])
    }

    #[test]
    fn text_lists_blocks_and_entries_in_order() {
        assert_eq!(
            render_text(&sample()),
            "**player-hand**\ncopper : 3\nestate : 2\n**trash**\n"
        );
    }

    #[test]
    fn malformed_entries_render_with_empty_sides() {
        let snapshot = GameStateSnapshot::from([(
            BlockKind::PlayerDiscard,
            [("", "")].into_iter().collect::<Block>(),
        )]);
        assert_eq!(render_text(&snapshot), "**player-discard**\n : \n");
    }

    #[test]
    fn empty_snapshot_renders_nothing() {
        assert_eq!(render_text(&GameStateSnapshot::default()), "");
    }

    #[test]
    fn json_is_one_line_per_turn() {
        let out = render(&sample(), OutputFormat::Json).unwrap();
        assert_eq!(
            out,
            "{\"player-hand\":{\"copper\":\"3\",\"estate\":\"2\"},\"trash\":{}}\n"
        );
    }
}
