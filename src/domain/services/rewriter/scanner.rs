//! Lexical scanner for import/export statements in declaration text
//!
//! Finds the three statement shapes the rewriter cares about:
//!
//! ```text
//! import { a, type B } from './x'      // Static (also `export ... from`)
//! import './polyfill';                 // SideEffect
//! import('./x')                        // Dynamic
//! ```
//!
//! Comments, string literals and template literals are skipped, so an
//! `import` inside any of them is never reported. Anything that does not
//! parse as one of the shapes above is ignored and left to the caller
//! untouched.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import ... from '...'` / `export ... from '...'`
    Static,
    /// `import '...'`
    SideEffect,
    /// `import('...')`
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Import,
    Export,
}

/// One recognized import/export site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    pub kind: ImportKind,
    pub keyword: Keyword,
    /// Whole statement. For side-effect imports this includes a trailing
    /// `;` and line break.
    pub span: Range<usize>,
    /// Specifier text without its quotes
    pub specifier: Range<usize>,
    /// Binding clause between the keyword (and `type` modifier) and `from`,
    /// trimmed. Empty for side-effect and dynamic imports.
    pub clause: Range<usize>,
    /// `import type ...` / `export type ...`
    pub type_only: bool,
}

impl ImportSite {
    pub fn specifier<'a>(&self, content: &'a str) -> &'a str {
        &content[self.specifier.clone()]
    }

    /// Default and named bindings of a static import. `None` for namespace
    /// imports and clauses that cannot be read.
    pub fn bindings(&self, content: &str) -> Option<ClauseBindings> {
        if self.kind != ImportKind::Static || self.keyword != Keyword::Import {
            return None;
        }
        let clause = content[self.clause.clone()].trim();
        if clause.is_empty() || clause.contains('*') {
            return None;
        }
        let (default, braces) = match clause.find('{') {
            Some(0) => (None, Some(clause)),
            Some(open) => {
                let default = clause[..open].trim().strip_suffix(',')?.trim();
                (Some(default), Some(&clause[open..]))
            }
            None => (Some(clause), None),
        };
        if default.is_some_and(|name| name.is_empty() || name.contains([',', ' '])) {
            return None;
        }
        let named = match braces {
            Some(braces) => {
                let inner = braces.strip_prefix('{')?.strip_suffix('}')?;
                if inner.contains(['{', '}']) {
                    return None;
                }
                Some(
                    inner
                        .split(',')
                        .map(|binding| binding.split_whitespace().collect::<Vec<_>>().join(" "))
                        .filter(|binding| !binding.is_empty())
                        .collect(),
                )
            }
            None => None,
        };
        Some(ClauseBindings {
            default: default.map(str::to_string),
            named,
        })
    }
}

/// `Default, { a, b as c }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseBindings {
    pub default: Option<String>,
    /// `None` when the clause has no braces
    pub named: Option<Vec<String>>,
}

/// An inline type reference: `import("lib").Name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    /// From `import` to the end of `Name`
    pub span: Range<usize>,
    pub specifier: Range<usize>,
    pub member: Range<usize>,
}

/// Every import/export site in `content`, in source order.
pub fn scan_imports(content: &str) -> Vec<ImportSite> {
    let mut scanner = Scanner::new(content);
    let mut sites = Vec::new();

    while let Some((keyword, start)) = scanner.next_keyword() {
        let parsed = match keyword {
            Keyword::Import => scanner.parse_import(start),
            Keyword::Export => scanner.parse_export(start),
        };
        match parsed {
            Some(site) => {
                scanner.pos = site.span.end;
                sites.push(site);
            }
            None => scanner.pos = start + keyword_len(keyword),
        }
    }

    sites
}

/// Every `import("...").Name` type reference in `content`, in source order.
pub fn scan_type_references(content: &str) -> Vec<TypeReference> {
    let bytes = content.as_bytes();
    scan_imports(content)
        .into_iter()
        .filter(|site| site.kind == ImportKind::Dynamic)
        .filter_map(|site| {
            let dot = site.span.end;
            if bytes.get(dot) != Some(&b'.') {
                return None;
            }
            let member_end = dot + 1 + ident_len(&bytes[dot + 1..]);
            if member_end == dot + 1 {
                return None;
            }
            Some(TypeReference {
                span: site.span.start..member_end,
                specifier: site.specifier,
                member: dot + 1..member_end,
            })
        })
        .collect()
}

fn keyword_len(keyword: Keyword) -> usize {
    match keyword {
        Keyword::Import => "import".len(),
        Keyword::Export => "export".len(),
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn ident_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| is_ident_byte(b)).count()
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Advance to the next `import`/`export` keyword outside comments and
    /// literals. Returns the keyword and its start offset.
    fn next_keyword(&mut self) -> Option<(Keyword, usize)> {
        while let Some(b) = self.peek() {
            match b {
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                b'\'' | b'"' => {
                    self.skip_string(b);
                }
                b'`' => self.skip_template(),
                b if is_ident_byte(b) => {
                    let start = self.pos;
                    let len = ident_len(&self.bytes[start..]);
                    self.pos += len;
                    // `a.import` is a property, not a statement
                    let after_dot = start > 0 && self.bytes[start - 1] == b'.';
                    if after_dot {
                        continue;
                    }
                    match &self.src[start..start + len] {
                        "import" => return Some((Keyword::Import, start)),
                        "export" => return Some((Keyword::Export, start)),
                        _ => {}
                    }
                }
                _ => self.pos += 1,
            }
        }
        None
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }

    /// Skip a quoted string starting at `self.pos`. Returns the range of
    /// its contents, or `None` when it is unterminated on its line.
    fn skip_string(&mut self, quote: u8) -> Option<Range<usize>> {
        let start = self.pos + 1;
        self.pos = start;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'\n' => return None,
                b if b == quote => {
                    self.pos += 1;
                    return Some(start..self.pos - 1);
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        None
    }

    fn skip_template(&mut self) {
        self.pos += 1;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b if b.is_ascii_whitespace() => self.pos += 1,
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    fn word_at(&self, pos: usize) -> &'a str {
        let len = ident_len(&self.bytes[pos.min(self.bytes.len())..]);
        &self.src[pos..pos + len]
    }

    fn parse_quoted(&mut self) -> Option<Range<usize>> {
        match self.peek() {
            Some(q @ (b'\'' | b'"')) => self.skip_string(q),
            _ => None,
        }
    }

    fn parse_import(&mut self, start: usize) -> Option<ImportSite> {
        self.pos = start + "import".len();
        self.skip_trivia();

        match self.peek()? {
            b'(' => {
                self.pos += 1;
                self.skip_trivia();
                let specifier = self.parse_quoted()?;
                self.skip_trivia();
                if self.peek()? != b')' {
                    return None;
                }
                self.pos += 1;
                Some(ImportSite {
                    kind: ImportKind::Dynamic,
                    keyword: Keyword::Import,
                    span: start..self.pos,
                    clause: specifier.start..specifier.start,
                    specifier,
                    type_only: false,
                })
            }
            b'\'' | b'"' => {
                let specifier = self.parse_quoted()?;
                let mut end = self.pos;
                if self.bytes.get(end) == Some(&b';') {
                    end += 1;
                }
                if self.bytes.get(end) == Some(&b'\r') && self.bytes.get(end + 1) == Some(&b'\n')
                {
                    end += 2;
                } else if self.bytes.get(end) == Some(&b'\n') {
                    end += 1;
                }
                Some(ImportSite {
                    kind: ImportKind::SideEffect,
                    keyword: Keyword::Import,
                    span: start..end,
                    clause: specifier.start..specifier.start,
                    specifier,
                    type_only: false,
                })
            }
            b if is_ident_byte(b) || b == b'{' || b == b'*' => {
                self.parse_from_clause(start, Keyword::Import)
            }
            _ => None,
        }
    }

    fn parse_export(&mut self, start: usize) -> Option<ImportSite> {
        self.pos = start + "export".len();
        self.skip_trivia();

        // Only re-exports carry a specifier
        let mut ahead = self.pos;
        if self.word_at(ahead) == "type" {
            ahead += 4;
            while self.bytes.get(ahead).is_some_and(|b| b.is_ascii_whitespace()) {
                ahead += 1;
            }
        }
        match self.bytes.get(ahead) {
            Some(b'{') | Some(b'*') => self.parse_from_clause(start, Keyword::Export),
            _ => None,
        }
    }

    /// Parse `[type] <clause> from '<specifier>'` starting after the keyword.
    fn parse_from_clause(&mut self, start: usize, keyword: Keyword) -> Option<ImportSite> {
        let mut type_only = false;
        if self.word_at(self.pos) == "type" {
            let save = self.pos;
            self.pos += 4;
            self.skip_trivia();
            // `import type from 'x'` binds a default named `type`
            if self.word_at(self.pos) == "from" && !self.clause_word_follows() {
                self.pos = save;
            } else {
                type_only = true;
            }
        }

        let clause_start = self.pos;
        let mut clause_end = self.pos;
        let mut depth = 0usize;
        let mut seen_binding = false;

        loop {
            self.skip_trivia();
            let b = self.peek()?;
            match b {
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth = depth.checked_sub(1)?;
                    self.pos += 1;
                    seen_binding = true;
                    clause_end = self.pos;
                }
                b',' | b'*' => {
                    self.pos += 1;
                    seen_binding |= b == b'*';
                    clause_end = self.pos;
                }
                b if is_ident_byte(b) => {
                    let word = self.word_at(self.pos);
                    if word == "from" && depth == 0 && seen_binding {
                        self.pos += 4;
                        break;
                    }
                    self.pos += word.len();
                    seen_binding = true;
                    clause_end = self.pos;
                }
                _ => return None,
            }
        }

        self.skip_trivia();
        let specifier = self.parse_quoted()?;
        Some(ImportSite {
            kind: ImportKind::Static,
            keyword,
            span: start..self.pos,
            specifier,
            clause: clause_start..clause_end,
            type_only,
        })
    }

    /// After `type from`, is there another binding word before a string?
    /// (`import type from from 'x'` is not worth supporting; this only
    /// separates `import type from 'x'` from `import type { from } ...`.)
    fn clause_word_follows(&self) -> bool {
        let mut ahead = self.pos + 4;
        while self.bytes.get(ahead).is_some_and(|b| b.is_ascii_whitespace()) {
            ahead += 1;
        }
        !matches!(self.bytes.get(ahead), Some(b'\'') | Some(b'"'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specifiers(content: &str) -> Vec<(&str, ImportKind)> {
        scan_imports(content)
            .iter()
            .map(|site| (site.specifier(content), site.kind))
            .collect()
    }

    #[test]
    fn finds_static_side_effect_and_dynamic_imports() {
        let content = "import { a } from './a';\nimport './side';\nexport type X = import('./x').X;\n";
        assert_eq!(
            specifiers(content),
            vec![
                ("./a", ImportKind::Static),
                ("./side", ImportKind::SideEffect),
                ("./x", ImportKind::Dynamic),
            ]
        );
    }

    #[test]
    fn handles_multi_line_clauses() {
        let content = "import {\n  a,\n  b as c,\n} from \"@/utils\";\n";
        let sites = scan_imports(content);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].specifier(content), "@/utils");
        assert_eq!(
            sites[0].bindings(content),
            Some(ClauseBindings {
                default: None,
                named: Some(vec!["a".to_string(), "b as c".to_string()]),
            })
        );
    }

    #[test]
    fn recognizes_type_only_and_mixed_imports() {
        let content = "import type { A } from 'a';\nimport B, { type C, D } from 'b';\n";
        let sites = scan_imports(content);
        assert!(sites[0].type_only);
        assert!(!sites[1].type_only);
        assert_eq!(&content[sites[1].clause.clone()], "B, { type C, D }");
        assert_eq!(
            sites[1].bindings(content),
            Some(ClauseBindings {
                default: Some("B".to_string()),
                named: Some(vec!["type C".to_string(), "D".to_string()]),
            })
        );
    }

    #[test]
    fn default_import_named_type() {
        let content = "import type from 'lib';";
        let sites = scan_imports(content);
        assert_eq!(sites.len(), 1);
        assert!(!sites[0].type_only);
        assert_eq!(&content[sites[0].clause.clone()], "type");
    }

    #[test]
    fn re_exports_only() {
        let content = "export * from './all';\nexport * as ns from './ns';\nexport { a } from './a';\nexport { local };\nexport declare const x: number;\n";
        assert_eq!(
            specifiers(content),
            vec![
                ("./all", ImportKind::Static),
                ("./ns", ImportKind::Static),
                ("./a", ImportKind::Static),
            ]
        );
    }

    #[test]
    fn skips_comments_and_strings() {
        let content = "// import { a } from 'a'\n/* import('b') */\nconst s = \"import 'c'\";\nconst t = `import('d')`;\nimport { e } from 'e';\n";
        assert_eq!(specifiers(content), vec![("e", ImportKind::Static)]);
    }

    #[test]
    fn ignores_malformed_statements() {
        let content = "import x = require('x');\nimport('unterminated\nimport.meta.url;\nobj.import('y');\n";
        assert!(scan_imports(content).is_empty());
    }

    #[test]
    fn nested_parentheses_in_dynamic_import_context() {
        let content = "type T = Promise<ReturnType<typeof import('./fn').default>>;";
        let refs = scan_type_references(content);
        assert_eq!(refs.len(), 1);
        assert_eq!(&content[refs[0].specifier.clone()], "./fn");
        assert_eq!(&content[refs[0].member.clone()], "default");
    }

    #[test]
    fn type_reference_requires_member() {
        let content = "type M = typeof import('./mod');";
        assert!(scan_type_references(content).is_empty());
    }

    #[test]
    fn side_effect_span_includes_semicolon_and_newline() {
        let content = "import './a';\nexport {};\n";
        let sites = scan_imports(content);
        assert_eq!(&content[sites[0].span.clone()], "import './a';\n");
    }
}
