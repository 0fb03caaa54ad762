use crate::config::Config;
use crate::error::{EngineError, Result, SyntaxFault};
use crate::indexer::extract::{
    AnonymousFunction, CallKind, CallSite, Comment, Definition, Import, ImportForm, Language,
    LanguageExtractor, PythonRecord, RelationRecord, index_calls,
};
use crate::metrics;
use crate::util;
use tree_sitter::{Node, Parser};

pub struct PythonExtractor {
    parser: Parser,
}

impl PythonExtractor {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::LANGUAGE;
        parser.set_language(&language.into())?;
        Ok(Self { parser })
    }

    pub fn extract_record(&mut self, path: &str, source: &str) -> Result<PythonRecord> {
        let Some(tree) = self.parser.parse(source, None) else {
            return Err(EngineError::Syntax(SyntaxFault {
                path: path.to_string(),
                line: 1,
                column: 1,
                message: "parser returned no tree".to_string(),
            }));
        };
        let root = tree.root_node();
        if root.has_error() {
            return Err(EngineError::Syntax(syntax_fault(root, path, source)));
        }
        if let Some(fault) = check_structure(root, path, source) {
            return Err(EngineError::Syntax(fault));
        }

        let mut record = PythonRecord {
            path: path.to_string(),
            ..Default::default()
        };
        walk_tree(root, source, &mut record);
        record.calls_by_name = index_calls(path, &record.calls);
        record.comments = scan_comments(source);
        Ok(record)
    }
}

impl LanguageExtractor for PythonExtractor {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extract(&mut self, path: &str, source: &str) -> Result<RelationRecord> {
        self.extract_record(path, source).map(RelationRecord::Python)
    }
}

/// Brackets nested deeper than this are rejected, as CPython does.
const MAX_NESTING: usize = 200;

fn syntax_fault(root: Node<'_>, path: &str, source: &str) -> SyntaxFault {
    let node = first_error_node(root).unwrap_or(root);
    let message = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        let text = node_text(node, source);
        let first_line = text.lines().next().unwrap_or("");
        if first_line.is_empty() {
            "invalid syntax".to_string()
        } else {
            format!("invalid syntax near `{}`", util::truncate_str_bytes(first_line, 40))
        }
    };
    fault_at(node, path, message)
}

fn fault_at(node: Node<'_>, path: &str, message: impl Into<String>) -> SyntaxFault {
    let start = node.start_position();
    SyntaxFault {
        path: path.to_string(),
        line: start.row + 1,
        column: start.column + 1,
        message: message.into(),
    }
}

fn first_error_node(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Errors tree-sitter recovers from silently: bad indentation, Python 2
/// statements, invalid integer literals and runaway bracket nesting.
fn check_structure(root: Node<'_>, path: &str, source: &str) -> Option<SyntaxFault> {
    let mut stack = vec![(root, 0usize)];
    while let Some((node, parent_depth)) = stack.pop() {
        let mut cursor = node.walk();
        let opens = node
            .children(&mut cursor)
            .filter(|child| matches!(child.kind(), "(" | "[" | "{"))
            .count();
        let depth = parent_depth + opens;
        if depth > MAX_NESTING {
            return Some(fault_at(node, path, "too many nested parentheses"));
        }
        match node.kind() {
            "print_statement" => {
                return Some(fault_at(node, path, "missing parentheses in call to 'print'"));
            }
            "exec_statement" => {
                return Some(fault_at(node, path, "missing parentheses in call to 'exec'"));
            }
            "integer" => {
                if let Some(message) = integer_problem(&node_text(node, source)) {
                    return Some(fault_at(node, path, message));
                }
            }
            "module" | "block" => {
                if let Some(fault) = check_indentation(node, path, source) {
                    return Some(fault);
                }
            }
            _ => {}
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev().map(|child| (child, depth)));
    }
    None
}

/// Statements that open a line must share one indentation, deeper than the
/// header of their block; module statements start at column zero.
fn check_indentation(node: Node<'_>, path: &str, source: &str) -> Option<SyntaxFault> {
    let mut cursor = node.walk();
    let statements: Vec<Node<'_>> = node
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    let is_block = node.kind() == "block";
    if is_block && statements.is_empty() {
        return Some(fault_at(node, path, "expected an indented block"));
    }
    let (mut expected, header) = if is_block {
        (None, node.parent().and_then(|parent| line_indent(parent, source)))
    } else {
        (Some(0), None)
    };
    for statement in statements {
        let Some(indent) = line_indent(statement, source) else {
            continue;
        };
        match expected {
            None => {
                if header.is_some_and(|header| indent <= header) {
                    return Some(fault_at(statement, path, "expected an indented block"));
                }
                expected = Some(indent);
            }
            Some(want) if indent > want => {
                return Some(fault_at(statement, path, "unexpected indent"));
            }
            Some(want) if indent < want => {
                return Some(fault_at(
                    statement,
                    path,
                    "unindent does not match any outer indentation level",
                ));
            }
            Some(_) => {}
        }
    }
    None
}

/// Indentation width of `node` when it is the first token on its line.
fn line_indent(node: Node<'_>, source: &str) -> Option<usize> {
    let start = node.start_byte();
    let before = source.get(..start)?;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    let prefix = before[line_start..].trim_start_matches('\u{feff}');
    prefix
        .chars()
        .all(|ch| matches!(ch, ' ' | '\t' | '\x0c'))
        .then_some(prefix.len())
}

fn integer_problem(text: &str) -> Option<&'static str> {
    let lower = text.to_ascii_lowercase();
    if ["0x", "0o", "0b"].iter().any(|prefix| lower.starts_with(prefix)) {
        return lower
            .ends_with('l')
            .then_some("invalid integer literal suffix");
    }
    if lower.ends_with('j') {
        return None;
    }
    if lower.ends_with('l') {
        return Some("invalid integer literal suffix");
    }
    let digits: String = lower.chars().filter(|ch| *ch != '_').collect();
    (digits.len() > 1 && digits.starts_with('0') && digits.chars().any(|ch| ch != '0'))
        .then_some("leading zeros in decimal integer literals are not permitted")
}

/// Pre-order walk with an explicit stack; each entry carries the scope depth
/// it was reached at.
fn walk_tree(root: Node<'_>, source: &str, record: &mut PythonRecord) {
    let mut scope: Vec<String> = Vec::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        scope.truncate(depth);
        match node.kind() {
            "function_definition" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    let name = node_text(name_node, source);
                    record.definitions.push(definition(node, &name, source));
                    scope.push(name);
                }
            }
            "lambda" => {
                record.anonymous_functions.push(AnonymousFunction {
                    kind_label: "lambda".to_string(),
                    line: start_line(node),
                    binding: None,
                });
            }
            "call" => handle_call(node, &scope, source, record),
            "import_statement" => {
                record.imports.push(direct_import(node, source));
                continue;
            }
            "import_from_statement" | "future_import_statement" => {
                record.imports.push(from_import(node, source));
                continue;
            }
            _ => {}
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        let child_depth = scope.len();
        stack.extend(children.into_iter().rev().map(|child| (child, child_depth)));
    }
}

fn definition(node: Node<'_>, name: &str, source: &str) -> Definition {
    let start = start_line(node);
    let end = node.end_position().row + 1;
    let doc_text = node
        .child_by_field_name("body")
        .and_then(|body| extract_docstring(body, source));
    let body_text = util::slice_lines(source, start, end);
    Definition {
        name: name.to_string(),
        start_line: start,
        end_line: Some(end),
        doc_text,
        size_metric: Some(metrics::word_count(&body_text)),
    }
}

fn handle_call(node: Node<'_>, scope: &[String], source: &str, record: &mut PythonRecord) {
    let (callee, call_kind) = match node.child_by_field_name("function") {
        Some(function) if function.kind() == "identifier" => {
            (Some(node_text(function, source)), CallKind::Name)
        }
        Some(function) if function.kind() == "attribute" => {
            match function.child_by_field_name("attribute") {
                Some(attr) => (Some(node_text(attr, source)), CallKind::Attribute),
                None => (None, CallKind::Other("attribute".to_string())),
            }
        }
        Some(function) => (None, CallKind::Other(function.kind().to_string())),
        None => (None, CallKind::Other(node.kind().to_string())),
    };
    let source_text = util::evidence_snippet(
        source,
        node.start_byte(),
        node.end_byte(),
        Config::get().snippet_max_bytes,
    );
    record.calls.push(CallSite {
        caller: scope.last().cloned(),
        callee,
        line: start_line(node),
        call_kind,
        source_text,
    });
}

fn direct_import(node: Node<'_>, source: &str) -> Import {
    let mut cursor = node.walk();
    let names = node
        .children_by_field_name("name", &mut cursor)
        .map(|child| imported_name(child, source))
        .filter(|name| !name.is_empty())
        .collect();
    Import {
        form: ImportForm::Direct,
        module: None,
        names,
        level: 0,
        line: start_line(node),
    }
}

fn from_import(node: Node<'_>, source: &str) -> Import {
    let (module, level) = match node.child_by_field_name("module_name") {
        Some(module) if module.kind() == "relative_import" => relative_module(module, source),
        Some(module) => (Some(compact(&node_text(module, source))), 0),
        // `from __future__ import x` has no module field.
        None => (Some("__future__".to_string()), 0),
    };

    let mut cursor = node.walk();
    let mut names: Vec<String> = node
        .children_by_field_name("name", &mut cursor)
        .map(|child| imported_name(child, source))
        .filter(|name| !name.is_empty())
        .collect();
    let mut cursor = node.walk();
    if node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import")
    {
        names.push("*".to_string());
    }

    Import {
        form: ImportForm::From,
        module,
        names,
        level,
        line: start_line(node),
    }
}

fn relative_module(node: Node<'_>, source: &str) -> (Option<String>, usize) {
    let mut level = 0;
    let mut module = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_prefix" => level = node_text(child, source).matches('.').count(),
            "dotted_name" => module = Some(compact(&node_text(child, source))),
            _ => {}
        }
    }
    (module, level)
}

fn imported_name(node: Node<'_>, source: &str) -> String {
    if node.kind() == "aliased_import" {
        return node
            .child_by_field_name("name")
            .map(|name| compact(&node_text(name, source)))
            .unwrap_or_default();
    }
    compact(&node_text(node, source))
}

/// Per-line scan for `#`. Markers inside string literals are reported too.
fn scan_comments(source: &str) -> Vec<Comment> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let (_, rest) = line.split_once('#')?;
            Some(Comment {
                line: idx + 1,
                text: rest.trim().to_string(),
            })
        })
        .collect()
}

fn extract_docstring(body: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = body.walk();
    let mut children = body.named_children(&mut cursor);
    let first = children.next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string_node = first.named_child(0)?;
    if string_node.kind() != "string" && string_node.kind() != "concatenated_string" {
        return None;
    }
    let raw = node_text(string_node, source);
    let text = unquote_string_literal(&raw).unwrap_or(raw);
    Some(clean_doc(&text))
}

fn unquote_string_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut idx = 0;
    for (offset, ch) in trimmed.char_indices() {
        if ch.is_ascii_alphabetic() {
            idx = offset + ch.len_utf8();
        } else {
            break;
        }
    }
    let rest = &trimmed[idx..];
    if rest.starts_with("'''") && rest.ends_with("'''") && rest.len() >= 6 {
        return Some(rest[3..rest.len() - 3].to_string());
    }
    if rest.starts_with("\"\"\"") && rest.ends_with("\"\"\"") && rest.len() >= 6 {
        return Some(rest[3..rest.len() - 3].to_string());
    }
    if rest.starts_with('"') && rest.ends_with('"') && rest.len() >= 2 {
        return Some(rest[1..rest.len() - 1].to_string());
    }
    if rest.starts_with('\'') && rest.ends_with('\'') && rest.len() >= 2 {
        return Some(rest[1..rest.len() - 1].to_string());
    }
    None
}

/// Strip the shared indentation of continuation lines and surrounding blank lines.
fn clean_doc(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        if idx == 0 {
            out.push(line.trim().to_string());
        } else {
            let cut = indent.min(line.len() - line.trim_start().len());
            let rest = line.get(cut..).unwrap_or_else(|| line.trim_start());
            out.push(rest.trim_end().to_string());
        }
    }
    out.join("\n").trim().to_string()
}

fn compact(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}

fn start_line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

fn node_text(node: Node<'_>, source: &str) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    source.get(start..end).unwrap_or("").trim().to_string()
}
