//! Just enough markdown for agent replies: headings, lists, fenced code and
//! inline bold/italic/code.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

fn code_style() -> Style {
    Style::default().fg(Color::LightGreen).bg(Color::Black)
}

/// Render a markdown document into styled lines.
pub fn render_markdown(text: &str, base: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_fence = false;

    for raw in text.lines() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            lines.push(Line::from(Span::styled(format!("  {}", raw), code_style())));
            continue;
        }

        if let Some((level, heading)) = parse_heading(trimmed) {
            let mut style = base.add_modifier(Modifier::BOLD);
            if level == 1 {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            lines.push(Line::from(parse_inline(heading, style)));
            continue;
        }

        let indent = raw.len() - trimmed.len();
        if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            let mut spans = vec![Span::styled(format!("{}• ", " ".repeat(indent)), base)];
            spans.extend(parse_inline(item, base));
            lines.push(Line::from(spans));
            continue;
        }
        if let Some((number, item)) = parse_numbered(trimmed) {
            let mut spans = vec![Span::styled(format!("{}{}. ", " ".repeat(indent), number), base)];
            spans.extend(parse_inline(item, base));
            lines.push(Line::from(spans));
            continue;
        }

        lines.push(Line::from(parse_inline(raw, base)));
    }

    lines
}

fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(|rest| (level, rest.trim()))
}

fn parse_numbered(line: &str) -> Option<(&str, &str)> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .map(|rest| (&line[..digits], rest))
}

/// Convert **bold**, *italic*, _italic_ and `code` to styled spans.
/// Unclosed markers are kept as literal text.
pub fn parse_inline(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        let marked = match c {
            '*' if rest.starts_with("**") => {
                take_emphasis(&rest[2..], "**").map(|(inner, after)| {
                    (inner, base.add_modifier(Modifier::BOLD), after)
                })
            }
            // snake_case identifiers are not emphasis
            '_' if prev.map_or(false, |p| p.is_alphanumeric()) => None,
            '*' | '_' => {
                let delim = if c == '*' { "*" } else { "_" };
                take_emphasis(&rest[1..], delim).map(|(inner, after)| {
                    (inner, base.add_modifier(Modifier::ITALIC), after)
                })
            }
            '`' => {
                take_delimited(&rest[1..], "`").map(|(inner, after)| (inner, code_style(), after))
            }
            _ => None,
        };

        match marked {
            Some((inner, style, after)) => {
                if !current.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut current), base));
                }
                spans.push(Span::styled(inner.to_string(), style));
                prev = inner.chars().last();
                rest = after;
            }
            None => {
                current.push(c);
                prev = Some(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    if !current.is_empty() {
        spans.push(Span::styled(current, base));
    }
    spans
}

/// Like [`take_delimited`], but the run may not start or end with whitespace.
fn take_emphasis<'a>(s: &'a str, delim: &str) -> Option<(&'a str, &'a str)> {
    let (inner, after) = take_delimited(s, delim)?;
    let padded = inner.starts_with(char::is_whitespace) || inner.ends_with(char::is_whitespace);
    (!padded).then_some((inner, after))
}

/// Find `delim` closing a non-empty run at the start of `s`.
fn take_delimited<'a>(s: &'a str, delim: &str) -> Option<(&'a str, &'a str)> {
    let end = s.find(delim)?;
    if end == 0 || s[..end].contains('\n') {
        return None;
    }
    Some((&s[..end], &s[end + delim.len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_plain_text_untouched() {
        let spans = parse_inline("Total: $1.234,56 em 2008", Style::default());
        assert_eq!(spans.len(), 1);
        assert_eq!(plain(&spans), "Total: $1.234,56 em 2008");
    }

    #[test]
    fn test_bold_and_italic() {
        let spans = parse_inline("o **Oscar** disse *algo*", Style::default());
        assert_eq!(plain(&spans), "o Oscar disse algo");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[3].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_inline_code() {
        let spans = parse_inline("use `SELECT *` aqui", Style::default());
        assert_eq!(spans[1].content, "SELECT *");
        assert_eq!(spans[1].style, code_style());
    }

    #[test]
    fn test_unclosed_marker_is_literal() {
        let spans = parse_inline("5 * 3 = **15", Style::default());
        assert_eq!(plain(&spans), "5 * 3 = **15");
    }

    #[test]
    fn test_lists_and_headings() {
        let lines = render_markdown("# Relatório\n- item um\n2. item dois", Style::default());
        assert_eq!(lines.len(), 3);
        assert_eq!(plain(&lines[0].spans), "Relatório");
        assert_eq!(plain(&lines[1].spans), "• item um");
        assert_eq!(plain(&lines[2].spans), "2. item dois");
    }

    #[test]
    fn test_snake_case_is_not_italic() {
        let spans = parse_inline("campo technical_data_raw vazio", Style::default());
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_fenced_code_is_verbatim() {
        let lines = render_markdown("```\n**não negrito**\n```", Style::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(plain(&lines[0].spans), "  **não negrito**");
    }
}
