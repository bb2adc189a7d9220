//! Plain-text rendering of a loaded task list page.

use std::fmt::Write;
use tasklist_core::TaskListPage;

pub fn render_page(page: &TaskListPage) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Tasks ({}): {} active, {} completed",
        page.filter, page.counts.active, page.counts.completed
    );

    if page.rows.is_empty() {
        out.push_str("  (no tasks)\n");
        return out;
    }

    let id_width = page
        .rows
        .iter()
        .map(|task| task.id.as_str().chars().count())
        .max()
        .unwrap_or(0);
    for task in &page.rows {
        let mark = if task.completed { "x" } else { " " };
        let _ = writeln!(
            out,
            "  [{mark}] {:<id_width$}  {}",
            task.id.as_str(),
            task.title
        );
    }
    out
}
