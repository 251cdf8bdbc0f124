//! Plain aligned text tables.

const MIN_COLUMN_WIDTH: usize = 4;

/// Render `rows` under `headers`, two spaces between columns. Numeric cells
/// are right-aligned. When `max_width` is set, the widest columns are shrunk
/// (and their cells truncated with `…`) until the table fits.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], max_width: Option<usize>) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    if let Some(max_width) = max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = row.get(index).map_or("", String::as_str);
                let text = truncate(cell, *width);
                let numeric = looks_numeric(&text);
                pad(&text, *width, numeric)
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * 2;
    let floor = |idx: usize| headers[idx].chars().count().max(MIN_COLUMN_WIDTH);

    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > floor(*idx))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed.parse::<f64>().is_ok()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E'))
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn columns_align_and_numbers_right_justify() {
        let table = render(
            &["name", "salary"],
            &[cells(&["Alice", "60000"]), cells(&["Bob", "4000"])],
            None,
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "name   salary");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "Alice   60000");
        assert_eq!(lines[3], "Bob      4000");
    }

    #[test]
    fn wide_columns_shrink_with_ellipsis() {
        let long = "x".repeat(50);
        let table = render(&["id", "note"], &[cells(&["1", &long])], Some(20));
        for line in table.lines() {
            assert!(line.chars().count() <= 20, "{line:?}");
        }
        assert!(table.contains('…'));
    }

    #[test]
    fn no_rows_renders_header_only() {
        let table = render(&["name"], &[], None);
        assert_eq!(table.lines().count(), 2);
    }
}
