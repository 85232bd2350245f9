//! Text rendering of a viewport frame: one line per mounted row, indent
//! guides drawn from the frame's guide segments.

use crate::tree::{Row, RowAffordance};
use crate::viewport::ViewportFrame;
use owo_colors::OwoColorize;

const GUIDE: &str = "│ ";
const BLANK: &str = "  ";

fn affordance_icon(affordance: RowAffordance) -> &'static str {
    match affordance {
        RowAffordance::Leaf => "•",
        RowAffordance::Collapsed => "▸",
        RowAffordance::Expanded => "▾",
        RowAffordance::Loading => "…",
        RowAffordance::Failed => "✗",
    }
}

fn render_icon(affordance: RowAffordance, color: bool) -> String {
    let icon = affordance_icon(affordance);
    if !color {
        return icon.to_string();
    }
    match affordance {
        RowAffordance::Failed => icon.red().to_string(),
        RowAffordance::Loading => icon.yellow().to_string(),
        RowAffordance::Leaf => icon.dimmed().to_string(),
        _ => icon.cyan().to_string(),
    }
}

fn render_row(frame: &ViewportFrame, index: usize, row: &Row, color: bool) -> String {
    let levels = frame.guide_levels_at(index);
    let mut line = String::new();
    for level in 0..row.depth {
        let cell = if levels.contains(&level) { GUIDE } else { BLANK };
        if color {
            line.push_str(&cell.dimmed().to_string());
        } else {
            line.push_str(cell);
        }
    }

    line.push_str(&render_icon(row.affordance(), color));
    line.push(' ');
    line.push_str(row.node.display_title());

    let id = format!(" #{}", row.node.id);
    if color {
        line.push_str(&id.dimmed().to_string());
    } else {
        line.push_str(&id);
    }
    line
}

/// Render the mounted rows of `frame`, followed by a position footer
pub fn format_tree_frame(frame: &ViewportFrame, color: bool) -> String {
    if frame.is_empty() {
        return "(empty tree)".to_string();
    }

    let mut lines: Vec<String> = frame
        .indexed_rows()
        .map(|(index, row)| render_row(frame, index, row, color))
        .collect();

    let footer = if frame.rows.is_empty() {
        format!("rows -/{} (scrolled past end)", frame.total_rows)
    } else {
        format!(
            "rows {}-{}/{}",
            frame.first_row + 1,
            frame.first_row + frame.rows.len(),
            frame.total_rows
        )
    };
    lines.push(if color {
        footer.dimmed().to_string()
    } else {
        footer
    });
    lines.join("\n")
}
