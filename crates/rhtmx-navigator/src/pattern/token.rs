/// Tokenizer for path patterns
///
/// Splits a pattern such as `/users/:id(\d+)?/*` into literal runs and
/// parameter tokens. The grammar is the path-to-regexp 1.x dialect:
///
/// - `:name` named parameter, optionally followed by a custom group `(regex)`
/// - `(regex)` unnamed parameter, numbered from 0 in declaration order
/// - `?` optional, `*` optional + repeating, `+` repeating modifiers
/// - `*` wildcard, also numbered
/// - `\x` escapes `x` into the literal text
///
/// A parameter preceded by `/` or `.` takes that character as its prefix, so
/// an optional `/:id?` swallows its own slash when absent.
use once_cell::sync::Lazy;
use regex::Regex;

static PATH_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(\\.)",
        r"|([/.])?(?:(?::([A-Za-z0-9_]+)(?:\(((?:\\.|[^\\()])+)\))?",
        r"|\(((?:\\.|[^\\()])+)\))([+*?])?",
        r"|(\*))",
    ))
    .unwrap()
});

/// A single piece of a parsed pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text that must appear verbatim
    Literal(String),
    /// A capturing parameter
    Param(ParamToken),
}

/// A capturing parameter and its modifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamToken {
    /// Declared name, or its position for unnamed groups and wildcards
    pub name: String,
    /// `/`, `.` or empty
    pub prefix: String,
    /// Separator between repeated values
    pub delimiter: char,
    pub optional: bool,
    pub repeat: bool,
    /// Prefix is followed by more text in the same segment (`/:a-:b`)
    pub partial: bool,
    pub asterisk: bool,
    /// Regex body matched by a single value
    pub pattern: String,
}

impl Token {
    pub fn as_param(&self) -> Option<&ParamToken> {
        match self {
            Token::Param(param) => Some(param),
            Token::Literal(_) => None,
        }
    }
}

/// Parses a pattern into tokens (pure function)
///
/// Never fails: anything the grammar does not recognise is kept as literal
/// text. Invalid custom groups are only detected when the token regexes are
/// compiled.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::pattern::{tokenize, Token};
///
/// let tokens = tokenize("/users/:id");
/// assert_eq!(tokens[0], Token::Literal("/users".to_string()));
/// assert_eq!(tokens[1].as_param().unwrap().name, "id");
/// ```
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut key = 0usize;
    let mut index = 0usize;
    let mut literal = String::new();

    for caps in PATH_TOKEN.captures_iter(pattern) {
        let Some(whole) = caps.get(0) else { continue };
        literal.push_str(&pattern[index..whole.start()]);
        index = whole.end();

        if let Some(escaped) = caps.get(1) {
            literal.push_str(&escaped.as_str()[1..]);
            continue;
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }

        let next = pattern[index..].chars().next();
        let prefix = caps.get(2).and_then(|m| m.as_str().chars().next());
        let modifier = caps.get(6).map(|m| m.as_str());
        let asterisk = caps.get(7).is_some();
        let delimiter = prefix.unwrap_or('/');

        let name = match caps.get(3) {
            Some(name) => name.as_str().to_string(),
            None => {
                let name = key.to_string();
                key += 1;
                name
            }
        };

        let pattern = match caps.get(4).or_else(|| caps.get(5)) {
            Some(group) => escape_group(group.as_str()),
            None if asterisk => ".*".to_string(),
            None => format!("[^{}]+?", regex::escape(&delimiter.to_string())),
        };

        tokens.push(Token::Param(ParamToken {
            name,
            prefix: prefix.map(String::from).unwrap_or_default(),
            delimiter,
            optional: matches!(modifier, Some("?") | Some("*")),
            repeat: matches!(modifier, Some("+") | Some("*")),
            partial: matches!((prefix, next), (Some(p), Some(n)) if p != n),
            asterisk,
            pattern,
        }));
    }

    literal.push_str(&pattern[index..]);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    tokens
}

/// Neutralises grouping inside a user-supplied custom group
fn escape_group(group: &str) -> String {
    let mut escaped = String::with_capacity(group.len());
    for ch in group.chars() {
        if matches!(ch, '(' | ')' | '$') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
