//! Parser for navigation data scripts.
//!
//! Generated navigation data is a short script of variable bindings whose
//! right-hand sides are plain literals:
//!
//! ```text
//! var NAVTREE = [ [ "Title", "index.html", [ ... ] ] ];
//! var NAVTREEINDEX = [ "a00041.html" ];
//! ```
//!
//! Only the literal subset is accepted: `null`, booleans, integers, quoted
//! strings, arrays and objects. Comments and whitespace are skipped.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_until, take_while, take_while1, take_while_m_n};
use nom::character::complete::{char, digit1, one_of, satisfy};
use nom::combinator::{cut, map, map_opt, opt, recognize, value};
use nom::error::{ErrorKind, ParseError};
use nom::multi::{fold_many0, many0, many0_count, separated_list0};
use nom::sequence::{delimited, pair, preceded, separated_pair, terminated};
use nom::{IResult, Parser};
use tracing::trace;

use crate::domain::error::{DomainError, DomainResult};

/// Arrays and objects nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 128;

/// A literal value on the right-hand side of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Short name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// One `var NAME = VALUE;` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

/// All bindings of a script, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    bindings: Vec<Binding>,
}

impl Script {
    pub fn parse(source: &str) -> DomainResult<Self> {
        let (rest, bindings) = terminated(many0(binding), trivia)
            .parse(source)
            .map_err(|e| syntax_error(source, e))?;
        if !rest.is_empty() {
            let message = format!("expected 'var', found {}", found(rest));
            return Err(ScriptError::new(rest, message).into_domain(source));
        }

        for binding in &bindings {
            trace!("parsed binding {}", binding.name);
        }
        Ok(Self { bindings })
    }

    /// Value of the named binding. When a name is bound twice, the last one wins.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    /// Value of the named binding, or `MissingBinding`.
    pub fn require(&self, name: &str) -> DomainResult<&Value> {
        self.get(name)
            .ok_or_else(|| DomainError::MissingBinding(name.to_string()))
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

// --- Errors ---

type PResult<'a, O> = IResult<&'a str, O, ScriptError<'a>>;

/// Parse error anchored at the unconsumed input.
#[derive(Debug)]
struct ScriptError<'a> {
    at: &'a str,
    message: String,
}

impl<'a> ScriptError<'a> {
    fn new(at: &'a str, message: impl Into<String>) -> Self {
        Self {
            at,
            message: message.into(),
        }
    }

    /// `at` is always a suffix of `source`; its offset gives the 1-based position.
    fn into_domain(self, source: &str) -> DomainError {
        let consumed = &source[..source.len() - self.at.len()];
        let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
        DomainError::Syntax {
            line: consumed.matches('\n').count() + 1,
            column: consumed[line_start..].chars().count() + 1,
            message: self.message,
        }
    }
}

impl<'a> ParseError<&'a str> for ScriptError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self::new(input, format!("unexpected {} ({kind:?})", found(input)))
    }

    fn append(_: &'a str, _: ErrorKind, other: Self) -> Self {
        other
    }
}

fn syntax_error(source: &str, err: nom::Err<ScriptError<'_>>) -> DomainError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.into_domain(source),
        nom::Err::Incomplete(_) => {
            ScriptError::new(&source[source.len()..], "unexpected end of input").into_domain(source)
        }
    }
}

/// Hard error: stops `alt` and `many0` from backtracking.
fn failure<'a>(at: &'a str, message: impl Into<String>) -> nom::Err<ScriptError<'a>> {
    nom::Err::Failure(ScriptError::new(at, message))
}

fn found(input: &str) -> String {
    input
        .chars()
        .next()
        .map_or_else(|| "end of input".to_string(), |c| format!("'{c}'"))
}

// --- Trivia ---

fn trivia<'a>(input: &'a str) -> PResult<'a, usize> {
    many0_count(alt((whitespace, line_comment, block_comment))).parse(input)
}

fn whitespace<'a>(input: &'a str) -> PResult<'a, &'a str> {
    take_while1(|c: char| c.is_whitespace()).parse(input)
}

fn line_comment<'a>(input: &'a str) -> PResult<'a, &'a str> {
    recognize(pair(tag("//"), take_till(|c: char| c == '\n'))).parse(input)
}

fn block_comment<'a>(input: &'a str) -> PResult<'a, &'a str> {
    preceded(tag("/*"), cut(terminated(take_until("*/"), tag("*/"))))
        .parse(input)
        .map_err(|e: nom::Err<ScriptError<'a>>| match e {
            nom::Err::Failure(_) => failure(input, "unterminated block comment"),
            other => other,
        })
}

fn lexeme<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = ScriptError<'a>>
where
    F: Parser<&'a str, Output = O, Error = ScriptError<'a>>,
{
    preceded(trivia, inner)
}

fn expect<'a>(expected: char) -> impl FnMut(&'a str) -> PResult<'a, char> {
    move |input| {
        let (input, _) = trivia(input)?;
        char(expected)
            .parse(input)
            .map_err(|_: nom::Err<ScriptError<'a>>| {
                failure(input, format!("expected '{expected}', found {}", found(input)))
            })
    }
}

/// Closing bracket of a list whose opening bracket was already consumed.
fn close<'a>(delimiter: char, what: &'static str) -> impl FnMut(&'a str) -> PResult<'a, char> {
    move |input| {
        let (input, _) = trivia(input)?;
        char(delimiter)
            .parse(input)
            .map_err(|_: nom::Err<ScriptError<'a>>| match input.chars().next() {
                Some(c) => failure(input, format!("expected ',' or '{delimiter}', found '{c}'")),
                None => failure(input, format!("unterminated {what}")),
            })
    }
}

// --- Statements ---

fn identifier<'a>(input: &'a str) -> PResult<'a, &'a str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
    ))
    .parse(input)
}

fn binding_name<'a>(input: &'a str) -> PResult<'a, &'a str> {
    let (input, _) = trivia(input)?;
    identifier(input)
        .map_err(|_| failure(input, format!("expected identifier, found {}", found(input))))
}

/// `var NAME = VALUE` with an optional `;`. A leading non-identifier ends the script.
fn binding<'a>(input: &'a str) -> PResult<'a, Binding> {
    let (input, _) = trivia(input)?;
    let (rest, keyword) = identifier(input)?;
    if !matches!(keyword, "var" | "let" | "const") {
        return Err(failure(input, format!("expected 'var', found '{keyword}'")));
    }
    let (rest, name) = binding_name(rest)?;
    let (rest, value) = preceded(expect('='), cut(|i: &'a str| literal(i, 0))).parse(rest)?;
    let (rest, _) = opt(lexeme(char(';'))).parse(rest)?;

    Ok((
        rest,
        Binding {
            name: name.to_string(),
            value,
        },
    ))
}

// --- Values ---

fn literal<'a>(input: &'a str, depth: usize) -> PResult<'a, Value> {
    let (input, _) = trivia(input)?;
    alt((
        |i: &'a str| array(i, depth),
        |i: &'a str| object(i, depth),
        map(string, Value::Str),
        integer,
        word,
        unexpected,
    ))
    .parse(input)
}

fn too_deep<'a>(input: &'a str, depth: usize, open: char) -> Option<nom::Err<ScriptError<'a>>> {
    (depth >= MAX_DEPTH && input.starts_with(open)).then(|| failure(input, "nesting too deep"))
}

fn array<'a>(input: &'a str, depth: usize) -> PResult<'a, Value> {
    if let Some(err) = too_deep(input, depth, '[') {
        return Err(err);
    }
    let element = move |i: &'a str| literal(i, depth + 1);
    map(
        delimited(
            char('['),
            terminated(
                separated_list0(lexeme(char(',')), element),
                opt(lexeme(char(','))),
            ),
            close(']', "array"),
        ),
        Value::Array,
    )
    .parse(input)
}

fn object<'a>(input: &'a str, depth: usize) -> PResult<'a, Value> {
    if let Some(err) = too_deep(input, depth, '{') {
        return Err(err);
    }
    let entry = separated_pair(
        lexeme(key),
        expect(':'),
        cut(move |i: &'a str| literal(i, depth + 1)),
    );
    map(
        delimited(
            char('{'),
            terminated(
                separated_list0(lexeme(char(',')), entry),
                opt(lexeme(char(','))),
            ),
            close('}', "object"),
        ),
        Value::Object,
    )
    .parse(input)
}

fn key<'a>(input: &'a str) -> PResult<'a, String> {
    alt((string, map(identifier, str::to_string))).parse(input)
}

fn digits<'a>(input: &'a str) -> PResult<'a, &'a str> {
    recognize(pair(opt(char('-')), digit1)).parse(input)
}

fn integer<'a>(input: &'a str) -> PResult<'a, Value> {
    let (rest, text) = digits(input)?;
    text.parse::<i64>()
        .map(|n| (rest, Value::Int(n)))
        .map_err(|e| failure(input, format!("invalid integer '{text}': {e}")))
}

/// `null`, `true` or `false`. Any other bare word is a reference we cannot evaluate.
fn word<'a>(input: &'a str) -> PResult<'a, Value> {
    let (rest, text) = identifier(input)?;
    match text {
        "null" => Ok((rest, Value::Null)),
        "true" => Ok((rest, Value::Bool(true))),
        "false" => Ok((rest, Value::Bool(false))),
        other => Err(failure(input, format!("unexpected identifier '{other}'"))),
    }
}

fn unexpected<'a>(input: &'a str) -> PResult<'a, Value> {
    let message = match input.chars().next() {
        Some(c) => format!("unexpected character '{c}'"),
        None => "expected a value, found end of input".to_string(),
    };
    Err(nom::Err::Error(ScriptError::new(input, message)))
}

// --- Strings ---

enum Piece<'a> {
    Text(&'a str),
    Escaped(char),
}

fn opening_quote<'a>(input: &'a str) -> PResult<'a, char> {
    one_of("\"'").parse(input)
}

/// Single or double quoted; a raw newline before the closing quote is an error.
fn string<'a>(input: &'a str) -> PResult<'a, String> {
    let (body, quote) = opening_quote(input)?;
    let piece = alt((
        map(
            take_while1(move |c: char| c != quote && c != '\\' && c != '\n'),
            Piece::Text,
        ),
        map(preceded(char('\\'), cut(escape)), Piece::Escaped),
    ));
    let (rest, text) = fold_many0(piece, String::new, |mut text, piece| {
        match piece {
            Piece::Text(s) => text.push_str(s),
            Piece::Escaped(c) => text.push(c),
        }
        text
    })
    .parse(body)?;

    char(quote)
        .parse(rest)
        .map(|(rest, _)| (rest, text))
        .map_err(|_: nom::Err<ScriptError<'a>>| failure(input, "unterminated string"))
}

fn escape<'a>(input: &'a str) -> PResult<'a, char> {
    alt((
        value('\n', char('n')),
        value('\r', char('r')),
        value('\t', char('t')),
        value('\u{8}', char('b')),
        value('\u{c}', char('f')),
        unicode_escape,
        one_of("\\'\"/"),
        unknown_escape,
    ))
    .parse(input)
}

fn unicode_escape<'a>(input: &'a str) -> PResult<'a, char> {
    preceded(
        char('u'),
        cut(map_opt(
            take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()),
            |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
        )),
    )
    .parse(input)
    .map_err(|e: nom::Err<ScriptError<'a>>| match e {
        nom::Err::Failure(_) => failure(input, "invalid \\u escape"),
        other => other,
    })
}

fn unknown_escape<'a>(input: &'a str) -> PResult<'a, char> {
    Err(match input.chars().next() {
        Some(c) => failure(input, format!("unknown escape '\\{c}'")),
        None => failure(input, "unterminated escape"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_single_binding_when_parsing_then_returns_nested_value() {
        let script = Script::parse(r#"var A = [ "x", null, [1, -2] ];"#).unwrap();
        assert_eq!(
            script.get("A"),
            Some(&Value::Array(vec![
                Value::Str("x".into()),
                Value::Null,
                Value::Array(vec![Value::Int(1), Value::Int(-2)]),
            ]))
        );
    }

    #[test]
    fn given_comments_and_missing_semicolon_when_parsing_then_skips_them() {
        let source = "/* header\n spanning lines */\n// line comment\nvar A = 'a'\nvar B = true;";
        let script = Script::parse(source).unwrap();
        assert_eq!(script.bindings().len(), 2);
        assert_eq!(script.get("A"), Some(&Value::Str("a".into())));
        assert_eq!(script.get("B"), Some(&Value::Bool(true)));
    }

    #[test]
    fn given_object_with_mixed_keys_when_parsing_then_keeps_order() {
        let script = Script::parse(r#"var O = { "b.html":[0,1], a: [2], };"#).unwrap();
        match script.get("O") {
            Some(Value::Object(entries)) => {
                assert_eq!(entries[0].0, "b.html");
                assert_eq!(entries[1].0, "a");
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn given_escapes_when_parsing_string_then_decodes_them() {
        let script = Script::parse(r#"var S = "a\"b\\cé\/";"#).unwrap();
        assert_eq!(script.get("S"), Some(&Value::Str("a\"b\\cé/".into())));
    }

    #[test]
    fn given_duplicate_binding_when_getting_then_last_wins() {
        let script = Script::parse("var A = 1; var A = 2;").unwrap();
        assert_eq!(script.get("A"), Some(&Value::Int(2)));
    }

    #[test]
    fn given_unterminated_array_when_parsing_then_reports_position() {
        let err = Script::parse("var A = [\n  \"x\",\n").unwrap_err();
        match err {
            DomainError::Syntax { line, .. } => assert_eq!(line, 3),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn given_function_call_when_parsing_then_rejects() {
        let err = Script::parse("var A = load('modules');").unwrap_err();
        assert!(err.to_string().contains("unexpected identifier 'load'"));
    }

    #[test]
    fn given_missing_binding_when_requiring_then_fails() {
        let script = Script::parse("var A = null;").unwrap();
        assert_eq!(
            script.require("NAVTREE"),
            Err(DomainError::MissingBinding("NAVTREE".into()))
        );
    }

    #[test]
    fn given_unterminated_comment_when_parsing_then_fails_at_comment_start() {
        let err = Script::parse("var A = 1;\n/* open").unwrap_err();
        assert_eq!(
            err,
            DomainError::Syntax {
                line: 2,
                column: 1,
                message: "unterminated block comment".into()
            }
        );
    }

    #[test]
    fn given_nesting_at_limit_when_parsing_then_accepts() {
        let source = format!("var A = {}{};", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(Script::parse(&source).is_ok());
    }

    #[test]
    fn given_nesting_past_limit_when_parsing_then_reports_bracket() {
        let depth = MAX_DEPTH + 1;
        let source = format!("var A = {}{};", "[".repeat(depth), "]".repeat(depth));
        assert_eq!(
            Script::parse(&source).unwrap_err(),
            DomainError::Syntax {
                line: 1,
                column: "var A = ".len() + MAX_DEPTH + 1,
                message: "nesting too deep".into()
            }
        );
    }

    #[test]
    fn given_hostile_nesting_when_parsing_then_fails_cleanly() {
        for source in [
            format!("var A = {}", "[".repeat(100_000)),
            format!("var A = {}", "{a:".repeat(100_000)),
            format!("var A = {}", "[{'k':".repeat(50_000)),
        ] {
            match Script::parse(&source).unwrap_err() {
                DomainError::Syntax { message, .. } => assert_eq!(message, "nesting too deep"),
                other => panic!("expected syntax error, got {other:?}"),
            }
        }
    }

    #[test]
    fn given_very_long_flat_array_when_parsing_then_keeps_every_entry() {
        let entries: Vec<String> = (0..50_000)
            .map(|i| format!("[\"Entry {i}\", \"a{i:05}.html\", null]"))
            .collect();
        let source = format!("var NAVTREE = [\n{}\n];", entries.join(",\n"));

        let script = Script::parse(&source).unwrap();
        let items = script.require("NAVTREE").unwrap().as_array().unwrap();
        assert_eq!(items.len(), 50_000);
        assert_eq!(
            items[49_999].as_array().unwrap()[1],
            Value::Str("a49999.html".into())
        );
    }

    #[test]
    fn given_very_long_string_when_parsing_then_keeps_it_whole() {
        let label = "x".repeat(1 << 20);
        let script = Script::parse(&format!("var S = '{label}';")).unwrap();
        assert_eq!(script.get("S").and_then(Value::as_str).map(str::len), Some(1 << 20));
    }

    #[test]
    fn given_error_after_long_input_when_parsing_then_counts_lines() {
        let source = format!("{}var A = [1,, 2];", "// filler\n".repeat(10_000));
        match Script::parse(&source).unwrap_err() {
            DomainError::Syntax { line, column, .. } => assert_eq!((line, column), (10_001, 12)),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn given_newline_inside_string_when_parsing_then_reports_string_start() {
        let err = Script::parse("var A = [\n  'open\n'];").unwrap_err();
        assert_eq!(
            err,
            DomainError::Syntax {
                line: 2,
                column: 3,
                message: "unterminated string".into()
            }
        );
    }
}
