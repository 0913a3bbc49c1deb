/*!
format.rs

Plain table rendering for the endpoint listing (`siaapi -l`).

  - StyleOptions::detect() -> color on a terminal unless NO_COLOR; width from COLUMNS
  - color(role, text, &StyleOptions) -> String
  - table(headers, rows, &StyleOptions) -> String

Machine output (`-j`) does not go through here.
*/

use std::borrow::Cow;
use std::io::IsTerminal;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let use_color =
            std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
        let term_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);
        StyleOptions {
            use_color,
            term_width,
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            term_width: 100,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Color                                                                      */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Accent,
    Get,
    Post,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Accent => "38;5;213",
        Role::Get => "38;5;82",
        Role::Post => "38;5;214",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/// Role used to highlight an HTTP method.
pub fn method_role(method: &str) -> Role {
    match method {
        "GET" => Role::Get,
        "POST" => Role::Post,
        _ => Role::Dim,
    }
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                            */
/* -------------------------------------------------------------------------- */

/// Left-aligned columns separated by two spaces. The last column is never
/// padded; the widest columns are truncated when the table would exceed the
/// terminal width.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let col_count = headers.len();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let total: usize = widths.iter().sum::<usize>() + (col_count - 1) * 2;
    if total > style.term_width {
        let mut overflow = total - style.term_width;
        let mut order: Vec<usize> = (0..col_count).collect();
        order.sort_by(|a, b| widths[*b].cmp(&widths[*a]));
        for idx in order {
            if overflow == 0 {
                break;
            }
            let shrink = widths[idx].saturating_sub(4).min(overflow);
            widths[idx] -= shrink;
            overflow -= shrink;
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);

    let header_cells: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| color(Role::Accent, fit(h, widths[i], i + 1 == col_count), style))
        .collect();
    lines.push(header_cells.join("  "));

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(color(Role::Dim, sep.join("  "), style));

    for row in rows {
        let cells: Vec<String> = (0..col_count)
            .map(|c| {
                let raw = row.get(c).map(String::as_str).unwrap_or("");
                fit(raw, widths[c], c + 1 == col_count).into_owned()
            })
            .collect();
        lines.push(cells.join("  ").trim_end().to_string());
    }

    lines.join("\n")
}

fn fit(s: &str, width: usize, last: bool) -> Cow<'_, str> {
    let len = display_width(s);
    if len > width {
        let kept: String = s.chars().take(width.saturating_sub(1)).collect();
        return Cow::Owned(format!("{kept}…"));
    }
    if last || len == width {
        return Cow::Borrowed(s);
    }
    Cow::Owned(format!("{s}{}", " ".repeat(width - len)))
}

/* -------------------------------------------------------------------------- */
/* ANSI / Width Utilities                                                     */
/* -------------------------------------------------------------------------- */

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // skip parameters up to and including the final letter
            for t in chars.by_ref() {
                if t.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_table_aligns_columns() {
        let style = StyleOptions::plain();
        let t = table(
            &["METHOD", "PATH"],
            &[
                vec!["GET".into(), "/consensus".into()],
                vec!["POST".into(), "/wallet/unlock".into()],
            ],
            &style,
        );
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines[0], "METHOD  PATH");
        assert_eq!(lines[1], "------  --------------");
        assert_eq!(lines[2], "GET     /consensus");
        assert_eq!(lines[3], "POST    /wallet/unlock");
    }

    #[test]
    fn colored_cells_measure_without_escapes() {
        let style = StyleOptions {
            use_color: true,
            term_width: 100,
        };
        let cell = color(Role::Get, "GET", &style);
        assert_eq!(display_width(&cell), 3);
        assert_eq!(strip_ansi(&cell), "GET");
    }

    #[test]
    fn wide_tables_are_truncated() {
        let style = StyleOptions {
            use_color: false,
            term_width: 40,
        };
        let long = "x".repeat(80);
        let t = table(&["A", "B"], &[vec!["a".into(), long]], &style);
        for line in t.lines() {
            assert!(line.chars().count() <= 40, "line too wide: {line}");
        }
        assert!(t.contains('…'));
    }
}
