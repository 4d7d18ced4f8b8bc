//! Box-drawn text tables, split into chunks of columns that fit the terminal.
use std::fmt::Write;

use bivariate_engine::DiscreteDistribution;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub first_row_is_header: bool,
    pub first_column_is_header: bool,
    pub data: Vec<Vec<String>>, // Row-major order
}

impl Table {
    /// One header row of values, then one row of percentages per named distribution.
    ///
    /// All distributions are expected to share the first one's support.
    pub fn from_distributions(named: &[(&str, &DiscreteDistribution)]) -> Self {
        let mut data = Vec::new();
        if let Some((_, first)) = named.first() {
            let mut header = vec![String::new()];
            header.extend(first.values().iter().map(|value| value.to_string()));
            data.push(header);
        }
        for (name, distribution) in named {
            let total = distribution.total_mass();
            let mut row = vec![name.to_string()];
            row.extend(
                distribution
                    .weights()
                    .iter()
                    .map(|weight| format!("{:.02}", weight / total * 100.0)),
            );
            data.push(row);
        }
        Self {
            first_row_is_header: true,
            first_column_is_header: true,
            data,
        }
    }

    /// Renders the table so that no line is wider than `terminal_width`, except when a single
    /// column doesn't fit on its own.
    pub fn render(&self, terminal_width: u16) -> String {
        let mut out = String::new();
        if self.data.is_empty() {
            return out;
        }
        let column_count = self.data[0].len();
        if column_count == 0 || self.data.iter().any(|row| row.len() != column_count) {
            return out;
        }

        let column_widths: Vec<usize> = (0..column_count)
            .map(|column| {
                self.data
                    .iter()
                    .map(|row| row[column].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut next_column = if self.first_column_is_header { 1 } else { 0 };
        while next_column < column_count {
            let to_print = columns_to_print(
                self.first_column_is_header,
                terminal_width,
                &column_widths,
                next_column,
            );
            let mut indices = Vec::new();
            if self.first_column_is_header {
                indices.push(0);
            }
            indices.extend(next_column..next_column + to_print);
            let widths = indices.iter().map(|&i| column_widths[i]).collect::<Vec<_>>();

            render_separator(&mut out, &widths, SeparatorKind::Top);
            for (i, row) in self.data.iter().enumerate() {
                let cells = indices.iter().map(|&c| row[c].as_str()).collect::<Vec<_>>();
                render_row(&mut out, &cells, &widths);
                if i == 0 && self.first_row_is_header {
                    render_separator(&mut out, &widths, SeparatorKind::Middle);
                }
            }
            render_separator(&mut out, &widths, SeparatorKind::Bottom);
            next_column += to_print;
        }
        out
    }
}

fn columns_to_print(
    first_column_is_header: bool,
    terminal_width: u16,
    column_widths: &[usize],
    next_column: usize,
) -> usize {
    let number_of_columns = column_widths.len();
    let mut chars_taken_up = 4; // 2 chars on each side of the row
    if first_column_is_header {
        chars_taken_up += column_widths[0] + 3;
    }
    chars_taken_up += column_widths[next_column];
    let mut to_print = 1; // Minimum of 1 column in order to make progress
    while next_column + to_print < number_of_columns
        && chars_taken_up + 3 + column_widths[next_column + to_print] <= usize::from(terminal_width)
    {
        chars_taken_up += 3 + column_widths[next_column + to_print];
        to_print += 1;
    }
    to_print
}

#[derive(Debug, Copy, Clone)]
enum SeparatorKind {
    Top,
    Middle,
    Bottom,
}

fn render_separator(out: &mut String, column_widths: &[usize], kind: SeparatorKind) {
    let (left, center, right) = match kind {
        SeparatorKind::Top => ('╭', '┬', '╮'),
        SeparatorKind::Middle => ('├', '┼', '┤'),
        SeparatorKind::Bottom => ('╰', '┴', '╯'),
    };
    out.push(left);
    for (column, width) in column_widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        out.push(if column == column_widths.len() - 1 {
            right
        } else {
            center
        });
    }
    out.push('\n');
}

fn render_row(out: &mut String, row: &[&str], column_widths: &[usize]) {
    out.push('│');
    for (cell, width) in row.iter().zip(column_widths) {
        let padding = width - cell.chars().count();
        let _ = write!(out, " {}{} │", " ".repeat(padding), cell);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_small_table() {
        let dist = DiscreteDistribution::new(vec![1.0, 2.0], vec![1.0, 3.0]).unwrap();
        let table = Table::from_distributions(&[("A", &dist)]);
        assert_eq!(
            table.render(80),
            "╭───┬───────┬───────╮\n\
             │   │     1 │     2 │\n\
             ├───┼───────┼───────┤\n\
             │ A │ 25.00 │ 75.00 │\n\
             ╰───┴───────┴───────╯\n"
        );
    }

    #[test]
    fn test_render_splits_wide_tables() {
        let dist = DiscreteDistribution::new(vec![1.0, 2.0, 3.0], vec![1.0, 1.0, 2.0]).unwrap();
        let table = Table::from_distributions(&[("A", &dist)]);
        // Room for the header column and two value columns.
        let rendered = table.render(21);
        assert_eq!(rendered.matches('╭').count(), 2);
        assert!(rendered.lines().all(|line| line.chars().count() <= 21));
    }

    #[test]
    fn test_render_empty() {
        let table = Table {
            first_row_is_header: false,
            first_column_is_header: false,
            data: vec![],
        };
        assert_eq!(table.render(80), "");
    }
}
