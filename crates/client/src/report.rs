//! Printable completed-task report
//!
//! Renders the two-column (time, task) report the PDF export is built from.
//! Filtering and sorting are the caller's job; rows come out in the order
//! given.

use chrono::NaiveDate;
use prettytable::{row, Table};

use bloom_core::todo::Todo;

/// Build the report body for a day's completed todos.
pub fn completed_report(todos: &[Todo], date: NaiveDate) -> String {
    let mut table = Table::new();
    table.add_row(row!["Time", "Task"]);

    for todo in todos {
        let time = todo
            .completed_at
            .map(|at| at.format("%H:%M").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        table.add_row(row![time, todo.text]);
    }

    format!(
        "Completed Tasks - {}\n\n{}",
        date.format("%B %-d, %Y"),
        table
    )
}
