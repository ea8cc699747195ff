//! Name matching for the single-person lookup.
//!
//! Callers send a fragment of a name. The fragment is always treated as
//! literal text, never compiled as a regular expression. A leading `^`
//! anchors the match at the start of the name and a trailing `$` anchors it
//! at the end; every other character matches itself. Matching is
//! case-sensitive and an empty fragment matches any name.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    literal: String,
    anchored_start: bool,
    anchored_end: bool,
}

impl NamePattern {
    pub fn parse(raw: &str) -> Self {
        let (anchored_start, rest) = match raw.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (anchored_end, literal) = match rest.strip_suffix('$') {
            Some(literal) => (true, literal),
            None => (false, rest),
        };

        Self {
            literal: literal.to_string(),
            anchored_start,
            anchored_end,
        }
    }

    /// Pattern that matches every name.
    pub fn any() -> Self {
        Self::parse("")
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn is_match(&self, name: &str) -> bool {
        match (self.anchored_start, self.anchored_end) {
            (true, true) => name == self.literal,
            (true, false) => name.starts_with(&self.literal),
            (false, true) => name.ends_with(&self.literal),
            (false, false) => name.contains(&self.literal),
        }
    }

    /// Equivalent MongoDB `$regex` source with every metacharacter escaped.
    pub fn to_regex_source(&self) -> String {
        let mut source = String::with_capacity(self.literal.len() + 2);
        if self.anchored_start {
            source.push('^');
        }
        for c in self.literal.chars() {
            if is_regex_meta(c) {
                source.push('\\');
            }
            source.push(c);
        }
        if self.anchored_end {
            source.push('$');
        }
        source
    }
}

fn is_regex_meta(c: char) -> bool {
    matches!(
        c,
        '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '#'
            | '-' | '&' | '~'
    )
}
