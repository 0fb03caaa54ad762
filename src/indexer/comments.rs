use crate::indexer::extract::Comment;
use crate::util::LineIndex;
use regex::Regex;
use std::sync::LazyLock;

static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//(.*)").unwrap());
static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*(.*?)\*/").unwrap());

/// `//` and `/* */` comments of C-like and script-like sources, ordered by line.
///
/// Line comments are found per line, so a `//` inside a string literal or a
/// block comment is reported as well. Block comments carry the line they
/// start on.
pub fn scan_c_style_comments(source: &str) -> Vec<Comment> {
    let mut comments = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if let Some(caps) = LINE_COMMENT_RE.captures(line) {
            comments.push(Comment {
                line: idx + 1,
                text: caps[1].trim().to_string(),
            });
        }
    }
    comments.extend(scan_block_comments(source));
    // stable: line comments stay ahead of block comments on the same line
    comments.sort_by_key(|comment| comment.line);
    comments
}

pub fn scan_block_comments(source: &str) -> Vec<Comment> {
    let lines = LineIndex::new(source);
    BLOCK_COMMENT_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Comment {
                line: lines.line(whole.start()),
                text: caps[1].trim().to_string(),
            })
        })
        .collect()
}

/// Replace every block comment with spaces, keeping newlines so offsets map to the same lines.
pub fn blank_block_comments(source: &str) -> String {
    BLOCK_COMMENT_RE
        .replace_all(source, |caps: &regex::Captures<'_>| {
            caps[0]
                .chars()
                .map(|ch| if ch == '\n' { '\n' } else { ' ' })
                .collect::<String>()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_comments_report_their_start_line() {
        let source = "int a;\n/* first\n   spans */\nint b; // tail\n/* last */\n";
        let comments = scan_c_style_comments(source);
        let lines: Vec<(usize, &str)> = comments
            .iter()
            .map(|comment| (comment.line, comment.text.as_str()))
            .collect();
        assert_eq!(
            lines,
            vec![(2, "first\n   spans"), (4, "tail"), (5, "last")]
        );
    }

    #[test]
    fn blanking_preserves_line_structure() {
        let source = "a /* x\ny */ b";
        let blanked = blank_block_comments(source);
        assert_eq!(blanked.len(), source.len());
        assert_eq!(blanked.lines().count(), 2);
        assert!(!blanked.contains("x"));
        assert!(blanked.ends_with(" b"));
    }
}
