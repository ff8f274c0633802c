//! Heuristic symbol extraction from C/C++ source text.
//!
//! Recognition is lexical, not syntactic: the source is first stripped of
//! comments and string/character literal bodies (offset-preserving, so line
//! numbers and signature ranges stay valid), then a small set of regex
//! patterns picks out class/struct declarations, in-class member functions,
//! file-scope function definitions, and qualified out-of-class methods.
//!
//! The extractor is deliberately recall-biased. Macro-heavy or deeply
//! templated code may be captured imperfectly (or produce extra candidates),
//! which is acceptable for a navigation index. Unrecognized syntax yields
//! fewer symbols, never an error.

use regex::Regex;
use srcbridge_core::{SymbolEntry, SymbolKind};

/// Pluggable extraction seam so a stricter parser could replace the
/// heuristics without touching the index data model.
pub trait ExtractStrategy: Send + Sync {
    /// Human-readable strategy name.
    fn name(&self) -> &str;

    /// Extract symbols from file content, in source order.
    fn extract(&self, content: &str) -> Vec<SymbolEntry>;
}

/// C++ keywords that must never be reported as function or method names.
const KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "do", "switch", "case", "return", "goto", "break", "continue",
    "catch", "sizeof", "new", "delete", "using", "namespace", "typedef", "static_assert",
    "alignof", "decltype", "throw",
];

/// Regex-based extraction of functions, classes, structs, and methods.
pub struct HeuristicExtractor {
    class_re: Regex,
    func_re: Regex,
    method_re: Regex,
    member_re: Regex,
}

impl HeuristicExtractor {
    pub fn new() -> Self {
        // class/struct declaration up to its opening brace. The optional
        // leading `enum` capture exists only to swallow `enum class` scoped
        // enums so they are not reported as classes.
        let class_re = Regex::new(
            r"(\benum\s+)?\b(class|struct)\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?:final\s*)?(:[^{;]*)?\{",
        )
        .expect("class pattern compiles");

        // File-scope function definition: return-type-like token sequence,
        // name, parameter list, opening brace. Prototypes end in `;` and
        // never match.
        let func_re = Regex::new(
            r"(?m)^[ \t]*(?:template\s*<[^{;]*?>\s*)?((?:[A-Za-z_][\w:<>,]*[\s*&]+)+)(~?[A-Za-z_]\w*)\s*\(([^()]*)\)([^;{}()]*)\{",
        )
        .expect("function pattern compiles");

        // Qualified out-of-class definition `Type::method(...) {`, including
        // constructors, destructors, and initializer lists in the trailer.
        let method_re = Regex::new(
            r"(?m)^[ \t]*(?:template\s*<[^{;]*?>\s*)?(?:(?:[A-Za-z_][\w:<>,]*[\s*&]+)+)?([A-Za-z_]\w*(?:::[A-Za-z_]\w*)*(?:<[^<>]*>)?)\s*::\s*(~?[A-Za-z_]\w*|operator[^\s(]+)\s*\(([^()]*)\)([^;{}]*)\{",
        )
        .expect("method pattern compiles");

        // In-class member function declaration or inline definition,
        // matched only against the depth-1 surface of a class body.
        let member_re = Regex::new(
            r"((?:[A-Za-z_][\w:<>,]*[\s*&]+)*)(~?[A-Za-z_]\w*)\s*\(([^()]*)\)\s*(?:(?:const|noexcept|override|final)\b\s*)*(?:=\s*(?:0|default|delete)\s*)?(:[^;{}]*)?[;{]",
        )
        .expect("member pattern compiles");

        Self {
            class_re,
            func_re,
            method_re,
            member_re,
        }
    }
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractStrategy for HeuristicExtractor {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn extract(&self, content: &str) -> Vec<SymbolEntry> {
        let stripped = strip_comments_and_literals(content);
        let lines = LineTable::new(&stripped);

        // (byte offset, entry) pairs; sorted at the end to restore source order.
        let mut found: Vec<(usize, SymbolEntry)> = Vec::new();
        let mut class_bodies: Vec<(usize, usize)> = Vec::new();

        for caps in self.class_re.captures_iter(&stripped) {
            if caps.get(1).is_some() {
                // `enum class` / `enum struct`
                continue;
            }
            let whole = caps.get(0).expect("match");
            let keyword = caps.get(2).expect("keyword").as_str();
            let name = caps.get(3).expect("name").as_str();
            let kind = if keyword == "class" {
                SymbolKind::Class
            } else {
                SymbolKind::Struct
            };

            found.push((
                whole.start(),
                SymbolEntry {
                    name: name.to_string(),
                    kind,
                    line: lines.line_of(whole.start()),
                    signature: signature_of(&stripped[whole.start()..whole.end() - 1]),
                },
            ));

            let open = whole.end() - 1;
            let close = matching_brace(&stripped, open);
            class_bodies.push((open, close));

            let body = &stripped[open + 1..close];
            self.extract_members(body, open + 1, &lines, &mut found);
        }

        let in_class_body =
            |offset: usize| class_bodies.iter().any(|&(o, c)| offset > o && offset < c);

        for caps in self.func_re.captures_iter(&stripped) {
            let whole = caps.get(0).expect("match");
            if in_class_body(whole.start()) {
                continue;
            }
            let name = caps.get(2).expect("name").as_str();
            if KEYWORDS.contains(&name) {
                continue;
            }
            found.push((
                whole.start(),
                SymbolEntry {
                    name: name.to_string(),
                    kind: SymbolKind::Function,
                    line: lines.line_of(whole.start()),
                    signature: signature_of(&stripped[whole.start()..whole.end() - 1]),
                },
            ));
        }

        for caps in self.method_re.captures_iter(&stripped) {
            let whole = caps.get(0).expect("match");
            if in_class_body(whole.start()) {
                continue;
            }
            let name = caps.get(2).expect("name").as_str();
            if KEYWORDS.contains(&name) {
                continue;
            }
            found.push((
                whole.start(),
                SymbolEntry {
                    name: name.to_string(),
                    kind: SymbolKind::Method,
                    line: lines.line_of(whole.start()),
                    signature: signature_of(&stripped[whole.start()..whole.end() - 1]),
                },
            ));
        }

        found.sort_by_key(|(offset, _)| *offset);
        found.dedup_by(|a, b| {
            a.1.name == b.1.name && a.1.kind == b.1.kind && a.1.line == b.1.line
        });
        found.into_iter().map(|(_, entry)| entry).collect()
    }
}

impl HeuristicExtractor {
    /// Scan a class body for member functions: declarations (`draw();`)
    /// and inline definitions (`draw() { ... }`), constructors and
    /// destructors included. Only the depth-1 surface of the body is
    /// considered so statements inside inline bodies cannot match.
    fn extract_members(
        &self,
        body: &str,
        body_offset: usize,
        lines: &LineTable,
        found: &mut Vec<(usize, SymbolEntry)>,
    ) {
        let surface = body_surface(body);
        for caps in self.member_re.captures_iter(&surface) {
            let whole = caps.get(0).expect("match");
            if !valid_member_context(&surface, whole.start()) {
                continue;
            }
            let name = caps.get(2).expect("name").as_str();
            if KEYWORDS.contains(&name) {
                continue;
            }
            let abs = body_offset + whole.start();
            let matched = whole.as_str();
            found.push((
                abs,
                SymbolEntry {
                    name: name.to_string(),
                    kind: SymbolKind::Method,
                    line: lines.line_of(abs),
                    signature: signature_of(&matched[..matched.len() - 1]),
                },
            ));
        }
    }
}

// ── Lexical preprocessing ───────────────────────────────────────────────────

/// Replace comment text and string/char literal bodies with spaces,
/// preserving byte length and newlines so offsets map back to the input.
pub(crate) fn strip_comments_and_literals(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        StringLit,
        CharLit,
    }

    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Code => {
                if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
                    state = State::LineComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                } else if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    state = State::BlockComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                } else if b == b'"' {
                    state = State::StringLit;
                    out.push(b'"');
                    i += 1;
                } else if b == b'\'' {
                    state = State::CharLit;
                    out.push(b'\'');
                    i += 1;
                } else {
                    out.push(b);
                    i += 1;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    out.push(b'\n');
                    state = State::Code;
                } else {
                    out.push(b' ');
                }
                i += 1;
            }
            State::BlockComment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    out.extend_from_slice(b"  ");
                    state = State::Code;
                    i += 2;
                } else {
                    out.push(if b == b'\n' { b'\n' } else { b' ' });
                    i += 1;
                }
            }
            State::StringLit | State::CharLit => {
                let quote = if state == State::StringLit {
                    b'"'
                } else {
                    b'\''
                };
                if b == b'\\' && i + 1 < bytes.len() {
                    out.extend_from_slice(b"  ");
                    i += 2;
                } else if b == quote {
                    out.push(quote);
                    state = State::Code;
                    i += 1;
                } else if b == b'\n' {
                    // Unterminated literal; resync at end of line.
                    out.push(b'\n');
                    state = State::Code;
                    i += 1;
                } else {
                    out.push(b' ');
                    i += 1;
                }
            }
        }
    }

    String::from_utf8(out)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Blank everything below brace depth 1 of a class body, keeping the
/// braces that delimit nested blocks and all newlines.
fn body_surface(body: &str) -> String {
    let mut out = Vec::with_capacity(body.len());
    let mut depth = 0usize;
    for &b in body.as_bytes() {
        match b {
            b'{' => {
                out.push(if depth == 0 { b'{' } else { b' ' });
                depth += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                out.push(if depth == 0 { b'}' } else { b' ' });
            }
            b'\n' => out.push(b'\n'),
            _ => out.push(if depth == 0 { b } else { b' ' }),
        }
    }
    String::from_utf8(out)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// A member candidate must start a declaration: at the body start, after a
/// terminator (`;`, `}`, inline-body `{`), or after an access specifier's
/// `:` (but not after a `::` scope operator).
fn valid_member_context(surface: &str, start: usize) -> bool {
    let before = surface[..start].trim_end();
    match before.as_bytes().last() {
        None => true,
        Some(b';') | Some(b'{') | Some(b'}') => true,
        Some(b':') => before.len() < 2 || before.as_bytes()[before.len() - 2] != b':',
        _ => false,
    }
}

/// Find the `}` matching the `{` at `open`; end of input if unbalanced.
fn matching_brace(text: &str, open: usize) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    bytes.len()
}

/// Collapse whitespace runs in a matched declaration to single spaces.
fn signature_of(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Byte-offset to 1-based line number mapping.
struct LineTable {
    starts: Vec<usize>,
}

impl LineTable {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset)
    }
}
