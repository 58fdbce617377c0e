//! Terminal output: borderless tables and `Key: value` views

use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{Cell, Row, Table};

/// Builds a borderless table with a title row.
pub fn table(titles: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_CLEAN);
    table.set_titles(Row::new(titles.iter().map(|t| Cell::new(t)).collect()));
    for row in rows {
        table.add_row(Row::new(row.iter().map(|c| Cell::new(c)).collect()));
    }
    table
}

pub fn print_table(titles: &[&str], rows: Vec<Vec<String>>) {
    table(titles, rows).printstd();
}

/// One `Key: value` line per field.
pub fn fields(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}: {}\n", key, value))
        .collect()
}

pub fn print_fields(entries: &[(&str, String)]) {
    print!("{}", fields(entries));
}

/// Shortens `s` to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_titles_and_rows() {
        let rendered = table(
            &["Name", "Id"],
            vec![vec!["acme".into(), "1".into()], vec!["beta".into(), "2".into()]],
        )
        .to_string();
        let lines: Vec<_> = rendered.lines().map(str::trim).collect();
        assert!(lines[0].starts_with("Name"));
        assert!(lines.iter().any(|l| l.starts_with("acme") && l.ends_with('1')));
        assert!(!rendered.contains('|'));
    }

    #[test]
    fn fields_are_line_per_key() {
        assert_eq!(
            fields(&[("Id", "1".into()), ("Status", "POWERED_ON".into())]),
            "Id: 1\nStatus: POWERED_ON\n"
        );
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 42), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ääääää", 5), "ää...");
    }
}
