use crate::indexer::extract::{MarkupRecord, MatchIndex, StyleMatch, StyleRecord, Tag};
use std::collections::HashSet;

/// Which side of a style/markup pair receives the matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    /// Style `matched_html` is filled.
    Forward,
    /// Markup `matched_css` is filled.
    Reverse,
    Both,
}

impl LinkDirection {
    fn forward(self) -> bool {
        matches!(self, LinkDirection::Forward | LinkDirection::Both)
    }

    fn reverse(self) -> bool {
        matches!(self, LinkDirection::Reverse | LinkDirection::Both)
    }
}

struct Hit {
    style: usize,
    markup: usize,
    token: String,
    tag: usize,
}

/// Match every style token against every tag of every markup file.
///
/// Returns the number of entries added. Existing entries are never duplicated,
/// so running this again over the same records adds nothing.
pub fn link_styles(
    styles: &mut [&mut StyleRecord],
    markup: &mut [&mut MarkupRecord],
    direction: LinkDirection,
) -> usize {
    let mut hits = Vec::new();
    for (style_idx, style) in styles.iter().enumerate() {
        for (markup_idx, page) in markup.iter().enumerate() {
            for (tag_idx, tag) in page.tags.iter().enumerate() {
                for token in matching_tokens(style, tag) {
                    hits.push(Hit {
                        style: style_idx,
                        markup: markup_idx,
                        token,
                        tag: tag_idx,
                    });
                }
            }
        }
    }

    let mut added = 0;
    for hit in hits {
        if direction.forward() {
            let tag = &markup[hit.markup].tags[hit.tag];
            let entry = StyleMatch {
                file: markup[hit.markup].path.clone(),
                tag: tag.tag.clone(),
                attributes: tag.attributes.clone(),
            };
            if push_unique(&mut styles[hit.style].matched_html, &hit.token, entry) {
                added += 1;
            }
        }
        if direction.reverse() {
            let tag = &markup[hit.markup].tags[hit.tag];
            let entry = StyleMatch {
                file: styles[hit.style].path.clone(),
                tag: tag.tag.clone(),
                attributes: tag.attributes.clone(),
            };
            if push_unique(&mut markup[hit.markup].matched_css, &hit.token, entry) {
                added += 1;
            }
        }
    }
    added
}

/// Tokens of `style` that select `tag`, class tokens first.
fn matching_tokens(style: &StyleRecord, tag: &Tag) -> Vec<String> {
    let classes = class_set(tag);
    let mut tokens: Vec<String> = style
        .class_tokens
        .iter()
        .filter(|token| {
            token
                .strip_prefix('.')
                .is_some_and(|name| classes.contains(name))
        })
        .cloned()
        .collect();
    if let Some(id) = tag.attributes.get("id") {
        tokens.extend(
            style
                .id_tokens
                .iter()
                .filter(|token| token.strip_prefix('#') == Some(id.as_str()))
                .cloned(),
        );
    }
    tokens
}

/// Whitespace-split union of `class` and `className`.
fn class_set(tag: &Tag) -> HashSet<&str> {
    ["class", "className"]
        .iter()
        .filter_map(|key| tag.attributes.get(*key))
        .flat_map(|value| value.split_whitespace())
        .collect()
}

fn push_unique(index: &mut MatchIndex, token: &str, entry: StyleMatch) -> bool {
    let entries = index.entry(token.to_string()).or_default();
    if entries.contains(&entry) {
        return false;
    }
    entries.push(entry);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn tag(attrs: &[(&str, &str)]) -> Tag {
        let attributes: IndexMap<String, String> = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Tag {
            tag: "span".to_string(),
            attributes,
            line: 1,
        }
    }

    #[test]
    fn class_set_merges_class_and_class_name() {
        let tag = tag(&[("class", "a  b"), ("className", "c a")]);
        let mut classes: Vec<&str> = class_set(&tag).into_iter().collect();
        classes.sort();
        assert_eq!(classes, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_id_matches_nothing() {
        let mut style = StyleRecord::default();
        style.id_tokens.insert("#main".to_string());
        assert!(matching_tokens(&style, &tag(&[("id", "")])).is_empty());
        assert_eq!(
            matching_tokens(&style, &tag(&[("id", "main")])),
            vec!["#main".to_string()]
        );
    }
}
