//! Console table rendering for todo listings.

use todo_core::TodoListResult;

const TABLE_WIDTH: usize = 50;
const ID_WIDTH: usize = 5;
const TEXT_WIDTH: usize = 40;
const ELLIPSIS: &str = "...";

pub const NO_TODOS_MESSAGE: &str = "No todos found. Create some todos first!";

/// Renders todos as a fixed-width table, ending with a total line.
///
/// The total counts every data row, including malformed rows that have no
/// line in the table.
pub fn render_todo_table(listing: &TodoListResult) -> String {
    let rule = "=".repeat(TABLE_WIDTH);
    let mut out = String::new();

    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("{:^width$}\n", "TODO LIST", width = TABLE_WIDTH));
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "{:<id_w$} | {:<text_w$}\n",
        "ID",
        "TODO ITEM",
        id_w = ID_WIDTH,
        text_w = TEXT_WIDTH
    ));
    out.push_str(&"-".repeat(TABLE_WIDTH));
    out.push('\n');

    for todo in &listing.items {
        out.push_str(&format!(
            "{:<id_w$} | {:<text_w$}\n",
            todo.id.as_str(),
            truncate_text(&todo.text, TEXT_WIDTH),
            id_w = ID_WIDTH,
            text_w = TEXT_WIDTH
        ));
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "Total todos: {}\n",
        listing.items.len() + listing.skipped_rows
    ));
    out
}

/// Caps `text` at `max_chars` characters, marking the cut with `...`.
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::{render_todo_table, truncate_text};
    use todo_core::{Todo, TodoId, TodoListResult};

    #[test]
    fn truncate_keeps_short_text_and_caps_long_text() {
        assert_eq!(truncate_text("short", 40), "short");
        let exact = "x".repeat(40);
        assert_eq!(truncate_text(&exact, 40), exact);

        let long = "y".repeat(41);
        let truncated = truncate_text(&long, 40);
        assert_eq!(truncated.chars().count(), 40);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let long = "é".repeat(45);
        let truncated = truncate_text(&long, 40);
        assert_eq!(truncated, format!("{}...", "é".repeat(37)));
    }

    #[test]
    fn table_lists_rows_in_order_with_total() {
        let listing = TodoListResult {
            items: vec![
                Todo::new(TodoId::new("1"), "Buy groceries"),
                Todo::new(TodoId::new("2"), "Walk the dog"),
            ],
            skipped_rows: 0,
        };

        let table = render_todo_table(&listing);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2].trim(), "TODO LIST");
        assert!(lines[4].starts_with("ID    | TODO ITEM"));
        assert!(lines[6].starts_with("1     | Buy groceries"));
        assert!(lines[7].starts_with("2     | Walk the dog"));
        assert_eq!(lines[9], "Total todos: 2");
    }

    #[test]
    fn total_includes_malformed_rows() {
        let listing = TodoListResult {
            items: vec![Todo::new(TodoId::new("1"), "Buy groceries")],
            skipped_rows: 2,
        };

        let table = render_todo_table(&listing);

        assert_eq!(table.matches(" | ").count(), 2);
        assert!(table.ends_with("Total todos: 3\n"));
    }
}
