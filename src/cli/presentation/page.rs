//! Keyset page formatting

use crate::error::TreeError;
use crate::types::Page;
use comfy_table::Table;

pub fn format_page_text(page: &Page) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Depth", "Title", "Children"]);
    for node in &page.data {
        let title = format!("{}{}", "  ".repeat(node.depth), node.display_title());
        let children = if node.has_children { "yes" } else { "-" };
        table.add_row(vec![
            node.id.to_string(),
            node.depth.to_string(),
            title,
            children.to_string(),
        ]);
    }

    let mut out = table.to_string();
    out.push_str(&format!("\n{} node(s)", page.data.len()));
    if let Some(before) = &page.before_cursor {
        out.push_str(&format!("\nprevious: --before {}", before));
    }
    if let Some(after) = &page.after_cursor {
        out.push_str(&format!("\nnext:     --after {}", after));
    }
    out
}

pub fn format_page_json(page: &Page) -> Result<String, TreeError> {
    serde_json::to_string_pretty(page)
        .map_err(|e| TreeError::ConfigError(format!("Failed to serialize page: {}", e)))
}
