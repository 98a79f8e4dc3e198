//! Pattern dialect: lexing, parsing, simplification and rendering
//!
//!     Patterns are split into operator tokens by a logos lexer and parsed by recursive
//!     descent into a [`Regex`] tree. The tree is what the NFA builder compiles and what
//!     the extractor produces; [`Regex::render`] turns it back into pattern text.
//!
//!     Supported syntax:
//!
//!         literals             a  1  _  (any character that is not an operator)
//!         escapes              \|  \.  \\  ...   \n \t \r   \d \w \s
//!         bracket sets         [abc]  [a-z0-9_]  [^"]
//!         any character        .                 (the universe minus newline)
//!         grouping             (ab)   and  ()    (the empty string)
//!         alternation          a|b
//!         postfix operators    *  ?  +           (x+ is x x*)
//!
//!     Grammar:
//!
//!         alternation := concat ('|' concat)*
//!         concat      := repeat repeat*
//!         repeat      := atom ('*' | '?' | '+')*
//!         atom        := literal | escape | set | '.' | '(' ')' | '(' alternation ')'
//!
//!     Negated sets and `.` are relative to [`CharSet::universe`]. Rendered output never
//!     uses negation or `.`, so it means the same thing to the `regex` crate.

use super::charset::CharSet;
use logos::Logos;
use std::fmt;
use std::ops::Range;

/// A pattern syntax error at a byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    pub position: usize,
    pub message: String,
}

impl PatternError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        PatternError {
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.position)
    }
}

impl std::error::Error for PatternError {}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum PatternToken {
    #[token("|")]
    Pipe,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("?")]
    Question,
    #[token("(")]
    Open,
    #[token(")")]
    Close,
    #[token(".")]
    Dot,
    #[regex(r"\[\^?([^\\\]]|\\(.|\n))*\]")]
    Set,
    #[regex(r"\\(.|\n)")]
    Escape,
    #[regex(r"[^|*+?().\[\\]")]
    Literal,
}

/// Regular expression tree
///
/// `Empty` is the empty language. It only appears while the extractor simplifies;
/// the parser never produces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Regex {
    Empty,
    Epsilon,
    Set(CharSet),
    Concat(Vec<Regex>),
    Alt(Vec<Regex>),
    Star(Box<Regex>),
    Optional(Box<Regex>),
}

impl Regex {
    pub fn literal(c: char) -> Regex {
        Regex::Set(CharSet::single(c))
    }

    /// `a b`, flattening nested concatenations
    pub fn concat(parts: Vec<Regex>) -> Regex {
        let mut items = Vec::new();
        for part in parts {
            match part {
                Regex::Empty => return Regex::Empty,
                Regex::Epsilon => {}
                Regex::Concat(inner) => items.extend(inner),
                other => items.push(other),
            }
        }
        match items.len() {
            0 => Regex::Epsilon,
            1 => items.remove(0),
            _ => Regex::Concat(items),
        }
    }

    /// `a | b`, flattening, deduplicating and folding character sets together
    pub fn alt(parts: Vec<Regex>) -> Regex {
        let mut items: Vec<Regex> = Vec::new();
        let mut nullable = false;
        let mut set_slot: Option<usize> = None;
        let mut pending = parts;
        pending.reverse();
        while let Some(part) = pending.pop() {
            match part {
                Regex::Empty => {}
                Regex::Epsilon => nullable = true,
                Regex::Alt(inner) => pending.extend(inner.into_iter().rev()),
                Regex::Optional(inner) => {
                    nullable = true;
                    pending.push(*inner);
                }
                Regex::Set(set) => match set_slot {
                    Some(slot) => {
                        if let Regex::Set(existing) = &mut items[slot] {
                            existing.extend(&set);
                        }
                    }
                    None => {
                        set_slot = Some(items.len());
                        items.push(Regex::Set(set));
                    }
                },
                other => {
                    if !items.contains(&other) {
                        items.push(other);
                    }
                }
            }
        }
        let body = match items.len() {
            0 => {
                return if nullable {
                    Regex::Epsilon
                } else {
                    Regex::Empty
                }
            }
            1 => items.remove(0),
            _ => Regex::Alt(items),
        };
        if nullable {
            Regex::optional(body)
        } else {
            body
        }
    }

    pub fn star(inner: Regex) -> Regex {
        match inner {
            Regex::Empty | Regex::Epsilon => Regex::Epsilon,
            Regex::Star(inner) | Regex::Optional(inner) => Regex::Star(inner),
            other => Regex::Star(Box::new(other)),
        }
    }

    pub fn optional(inner: Regex) -> Regex {
        match inner {
            Regex::Empty | Regex::Epsilon => Regex::Epsilon,
            star @ Regex::Star(_) => star,
            opt @ Regex::Optional(_) => opt,
            // (x+)? is x*
            Regex::Concat(mut items) if is_plus_form(&items) => {
                items.pop().unwrap_or(Regex::Epsilon)
            }
            other if other.is_nullable() => other,
            other => Regex::Optional(Box::new(other)),
        }
    }

    /// `x+`, expressed as `x x*`
    pub fn plus(inner: Regex) -> Regex {
        let star = Regex::star(inner.clone());
        Regex::concat(vec![inner, star])
    }

    /// Whether the expression matches the empty string
    pub fn is_nullable(&self) -> bool {
        match self {
            Regex::Empty | Regex::Set(_) => false,
            Regex::Epsilon | Regex::Star(_) | Regex::Optional(_) => true,
            Regex::Concat(items) => items.iter().all(Regex::is_nullable),
            Regex::Alt(items) => items.iter().any(Regex::is_nullable),
        }
    }

    /// Pattern text in the same dialect
    pub fn render(&self) -> String {
        match self {
            Regex::Epsilon => "()".to_string(),
            _ => self.render_at(Precedence::Alt),
        }
    }

    fn precedence(&self) -> Precedence {
        match self {
            Regex::Alt(_) => Precedence::Alt,
            Regex::Concat(items) if is_plus_form(items) => Precedence::Postfix,
            Regex::Concat(_) => Precedence::Concat,
            Regex::Star(_) | Regex::Optional(_) => Precedence::Postfix,
            Regex::Empty | Regex::Epsilon | Regex::Set(_) => Precedence::Atom,
        }
    }

    fn render_at(&self, context: Precedence) -> String {
        let body = match self {
            Regex::Empty => "[]".to_string(),
            Regex::Epsilon => "()".to_string(),
            Regex::Set(set) => set.render(),
            Regex::Concat(items) => render_concat(items),
            Regex::Alt(items) => items
                .iter()
                .map(|item| item.render_at(Precedence::Concat))
                .collect::<Vec<_>>()
                .join("|"),
            Regex::Star(inner) => format!("{}*", inner.render_at(Precedence::Atom)),
            Regex::Optional(inner) => format!("{}?", inner.render_at(Precedence::Atom)),
        };
        if self.precedence() < context {
            format!("({})", body)
        } else {
            body
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Alt,
    Concat,
    Postfix,
    Atom,
}

/// The sequence a starred expression repeats
fn repeated(inner: &Regex) -> &[Regex] {
    match inner {
        Regex::Concat(items) => items,
        other => std::slice::from_ref(other),
    }
}

/// `x1 .. xn (x1 .. xn)*`, written `(x1 .. xn)+`
fn is_plus_form(items: &[Regex]) -> bool {
    match items.split_last() {
        Some((Regex::Star(inner), prefix)) => repeated(inner) == prefix,
        _ => false,
    }
}

/// Concatenation, folding `x x*` back into `x+`
fn render_concat(items: &[Regex]) -> String {
    // (number of items covered, rendered text)
    let mut segments: Vec<(usize, String)> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if let Regex::Star(inner) = item {
            let seq = repeated(inner);
            let k = seq.len();
            let singles = segments.len() >= k
                && segments[segments.len() - k..].iter().all(|(n, _)| *n == 1);
            if i >= k && singles && &items[i - k..i] == seq {
                segments.truncate(segments.len() - k);
                segments.push((k + 1, format!("{}+", inner.render_at(Precedence::Atom))));
                continue;
            }
        }
        segments.push((1, item.render_at(Precedence::Concat)));
    }
    segments.into_iter().map(|(_, text)| text).collect()
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Parse a pattern into a [`Regex`]
pub fn parse(pattern: &str) -> Result<Regex, PatternError> {
    let tokens = lex(pattern)?;
    if tokens.is_empty() {
        return Err(PatternError::new(0, "empty pattern"));
    }
    let mut parser = PatternParser {
        pattern,
        tokens,
        pos: 0,
    };
    let regex = parser.alternation()?;
    match parser.peek() {
        None => Ok(regex),
        Some((PatternToken::Close, span)) => Err(PatternError::new(span.start, "unmatched ')'")),
        Some((_, span)) => Err(PatternError::new(span.start, "unexpected operator")),
    }
}

/// Parse a label or single-atom pattern into a character set
pub fn parse_set(pattern: &str) -> Result<CharSet, PatternError> {
    match parse(pattern)? {
        Regex::Set(set) => Ok(set),
        _ => Err(PatternError::new(
            0,
            "expected a single character or character set",
        )),
    }
}

fn lex(pattern: &str) -> Result<Vec<(PatternToken, Range<usize>)>, PatternError> {
    let mut lexer = PatternToken::lexer(pattern);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let message = if pattern[span.start..].starts_with('[') {
                    "unterminated character set"
                } else if pattern[span.start..].starts_with('\\') {
                    "dangling escape"
                } else {
                    "unrecognized character"
                };
                return Err(PatternError::new(span.start, message));
            }
        }
    }
    Ok(tokens)
}

struct PatternParser<'a> {
    pattern: &'a str,
    tokens: Vec<(PatternToken, Range<usize>)>,
    pos: usize,
}

impl<'a> PatternParser<'a> {
    fn peek(&self) -> Option<(PatternToken, Range<usize>)> {
        self.tokens.get(self.pos).cloned()
    }

    fn end_offset(&self) -> usize {
        self.pattern.len()
    }

    fn alternation(&mut self) -> Result<Regex, PatternError> {
        let mut branches = vec![self.concat()?];
        while let Some((PatternToken::Pipe, _)) = self.peek() {
            self.pos += 1;
            branches.push(self.concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Regex::Alt(branches)
        })
    }

    fn concat(&mut self) -> Result<Regex, PatternError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None | Some((PatternToken::Pipe, _)) | Some((PatternToken::Close, _)) => break,
                Some(_) => items.push(self.repeat()?),
            }
        }
        if items.is_empty() {
            let position = self.peek().map_or(self.end_offset(), |(_, span)| span.start);
            return Err(PatternError::new(position, "empty alternative"));
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            Regex::Concat(items)
        })
    }

    fn repeat(&mut self) -> Result<Regex, PatternError> {
        let mut atom = self.atom()?;
        while let Some((token, _)) = self.peek() {
            atom = match token {
                PatternToken::Star => Regex::Star(Box::new(atom)),
                PatternToken::Question => Regex::Optional(Box::new(atom)),
                PatternToken::Plus => Regex::plus(atom),
                _ => break,
            };
            self.pos += 1;
        }
        Ok(atom)
    }

    fn atom(&mut self) -> Result<Regex, PatternError> {
        let Some((token, span)) = self.peek() else {
            return Err(PatternError::new(self.end_offset(), "unexpected end of pattern"));
        };
        self.pos += 1;
        let text = &self.pattern[span.clone()];
        match token {
            PatternToken::Literal => Ok(text.chars().next().map_or(Regex::Epsilon, Regex::literal)),
            PatternToken::Escape => {
                let c = text.chars().nth(1).unwrap_or('\\');
                Ok(Regex::Set(escape_set(c)))
            }
            PatternToken::Dot => {
                let mut set = CharSet::universe();
                set.remove('\n');
                Ok(Regex::Set(set))
            }
            PatternToken::Set => parse_class(text, span.start).map(Regex::Set),
            PatternToken::Open => {
                if let Some((PatternToken::Close, _)) = self.peek() {
                    self.pos += 1;
                    return Ok(Regex::Epsilon);
                }
                let inner = self.alternation()?;
                match self.peek() {
                    Some((PatternToken::Close, _)) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    _ => Err(PatternError::new(span.start, "unclosed group")),
                }
            }
            PatternToken::Star | PatternToken::Plus | PatternToken::Question => Err(
                PatternError::new(span.start, "operator has nothing to repeat"),
            ),
            PatternToken::Pipe | PatternToken::Close => {
                Err(PatternError::new(span.start, "unexpected operator"))
            }
        }
    }
}

/// Meaning of `\c` outside a bracket set
fn escape_set(c: char) -> CharSet {
    match c {
        'n' => CharSet::single('\n'),
        't' => CharSet::single('\t'),
        'r' => CharSet::single('\r'),
        'd' => CharSet::digits(),
        'w' => CharSet::word(),
        's' => CharSet::whitespace(),
        other => CharSet::single(other),
    }
}

/// Parse the text of a bracket set token, `[...]` or `[^...]`
fn parse_class(text: &str, offset: usize) -> Result<CharSet, PatternError> {
    enum Elem {
        Char(char),
        Class(CharSet),
        Dash,
    }

    let inner = &text[1..text.len() - 1];
    let (negated, body, body_offset) = match inner.strip_prefix('^') {
        Some(rest) => (true, rest, offset + 2),
        None => (false, inner, offset + 1),
    };

    let mut elems: Vec<(usize, Elem)> = Vec::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        let elem = match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => Elem::Char('\n'),
                Some((_, 't')) => Elem::Char('\t'),
                Some((_, 'r')) => Elem::Char('\r'),
                Some((_, 'd')) => Elem::Class(CharSet::digits()),
                Some((_, 'w')) => Elem::Class(CharSet::word()),
                Some((_, 's')) => Elem::Class(CharSet::whitespace()),
                Some((_, other)) => Elem::Char(other),
                None => return Err(PatternError::new(body_offset + i, "dangling escape")),
            },
            '-' => Elem::Dash,
            other => Elem::Char(other),
        };
        elems.push((body_offset + i, elem));
    }

    let mut set = CharSet::new();
    let mut idx = 0;
    while idx < elems.len() {
        match (&elems[idx].1, elems.get(idx + 1), elems.get(idx + 2)) {
            // lo-hi; a dash first or last in the set is literal
            (Elem::Char(lo), Some((_, Elem::Dash)), Some((hi_at, hi))) => {
                let hi = match hi {
                    Elem::Char(hi) => *hi,
                    Elem::Dash => '-',
                    Elem::Class(_) => {
                        return Err(PatternError::new(*hi_at, "invalid range end"));
                    }
                };
                if *lo > hi {
                    return Err(PatternError::new(elems[idx].0, "inverted range"));
                }
                set.extend(&CharSet::range(*lo, hi));
                idx += 3;
            }
            (Elem::Char(c), _, _) => {
                set.insert(*c);
                idx += 1;
            }
            (Elem::Class(class), _, _) => {
                set.extend(class);
                idx += 1;
            }
            (Elem::Dash, _, _) => {
                set.insert('-');
                idx += 1;
            }
        }
    }

    let set = if negated { set.complement() } else { set };
    if set.is_empty() {
        return Err(PatternError::new(offset, "empty character set"));
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(chars: &str) -> Regex {
        Regex::Set(chars.chars().collect())
    }

    #[test]
    fn test_parse_literals_concat() {
        assert_eq!(
            parse("int").unwrap(),
            Regex::Concat(vec![set("i"), set("n"), set("t")])
        );
    }

    #[test]
    fn test_parse_alternation_and_star() {
        assert_eq!(
            parse("a|b*").unwrap(),
            Regex::Alt(vec![set("a"), Regex::Star(Box::new(set("b")))])
        );
    }

    #[test]
    fn test_plus_desugars() {
        assert_eq!(
            parse("a+").unwrap(),
            Regex::Concat(vec![set("a"), Regex::Star(Box::new(set("a")))])
        );
    }

    #[test]
    fn test_empty_group_is_epsilon() {
        assert_eq!(parse("()").unwrap(), Regex::Epsilon);
        assert_eq!(
            parse("a()").unwrap(),
            Regex::Concat(vec![set("a"), Regex::Epsilon])
        );
    }

    #[test]
    fn test_bracket_sets() {
        assert_eq!(parse("[0-9]").unwrap(), Regex::Set(CharSet::digits()));
        assert_eq!(parse("[a-]").unwrap(), set("a-"));
        assert_eq!(parse("[-a]").unwrap(), set("-a"));
        assert_eq!(parse("[\\]x]").unwrap(), set("]x"));
        let Regex::Set(not_quote) = parse("[^\"]").unwrap() else {
            panic!("expected a set");
        };
        assert!(!not_quote.contains('"'));
        assert!(not_quote.contains('x'));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse("\\+").unwrap(), set("+"));
        assert_eq!(parse("\\n").unwrap(), set("\n"));
        assert_eq!(parse("\\d").unwrap(), Regex::Set(CharSet::digits()));
    }

    #[test]
    fn test_dot_excludes_newline() {
        let Regex::Set(dot) = parse(".").unwrap() else {
            panic!("expected a set");
        };
        assert!(!dot.contains('\n'));
        assert!(dot.contains('\t'));
        assert!(dot.contains('~'));
    }

    #[test]
    fn test_errors_carry_positions() {
        let cases = [
            ("", 0, "empty pattern"),
            ("(ab", 0, "unclosed group"),
            ("ab)", 2, "unmatched ')'"),
            ("*a", 0, "operator has nothing to repeat"),
            ("a||b", 2, "empty alternative"),
            ("a|", 2, "empty alternative"),
            ("[abc", 0, "unterminated character set"),
            ("[z-a]", 1, "inverted range"),
            ("a\\", 1, "dangling escape"),
        ];
        for (pattern, position, message) in cases {
            let err = parse(pattern).unwrap_err();
            assert_eq!(
                (err.position, err.message.as_str()),
                (position, message),
                "pattern {:?}",
                pattern
            );
        }
    }

    #[test]
    fn test_render_round_trips() {
        for pattern in ["int", "[0-9]+", "a|b*", "(ab)*c?", "[a-z_][a-z0-9_]*", "\\+|\\-"] {
            let regex = parse(pattern).unwrap();
            let rendered = regex.render();
            assert_eq!(parse(&rendered).unwrap(), regex, "rendered {:?}", rendered);
        }
    }

    #[test]
    fn test_render_uses_plus_shorthand() {
        assert_eq!(parse("[0-9]+").unwrap().render(), "[0-9]+");
        assert_eq!(parse("(ab)+").unwrap().render(), "(ab)+");
    }

    #[test]
    fn test_smart_constructors_simplify() {
        assert_eq!(
            Regex::alt(vec![set("a"), Regex::Epsilon, set("b")]),
            Regex::Optional(Box::new(set("ab")))
        );
        assert_eq!(Regex::concat(vec![set("a"), Regex::Empty]), Regex::Empty);
        assert_eq!(Regex::star(Regex::Epsilon), Regex::Epsilon);
        assert_eq!(
            Regex::alt(vec![Regex::Star(Box::new(set("a"))), Regex::Epsilon]),
            Regex::Star(Box::new(set("a")))
        );
        assert_eq!(
            Regex::optional(Regex::plus(set("a"))),
            Regex::Star(Box::new(set("a")))
        );
    }

    #[test]
    fn test_parse_set_rejects_sequences() {
        assert_eq!(parse_set("[a-c]").unwrap(), CharSet::range('a', 'c'));
        assert!(parse_set("ab").is_err());
    }
}
