//! nom-based line grammar.
//!
//! Parses one wire line (without its CRLF terminator) into a borrowed
//! [`ParsedLine`] holding slices of the original input.

use nom::bytes::complete::take_while1;
use nom::character::complete::char;
use nom::combinator::opt;
use nom::sequence::preceded;
use nom::IResult;
use smallvec::SmallVec;

use crate::error::MessageParseError;

fn is_tag_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '/'
}

fn is_tag_value_char(c: char) -> bool {
    !matches!(c, '\r' | '\n' | ';' | ' ')
}

/// Parse a single `key` or `key=value` tag.
fn tag_pair(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, key) = take_while1(is_tag_key_char)(input)?;
    let (input, value) = opt(preceded(char('='), take_while1(is_tag_value_char)))(input)?;
    Ok((input, (key, value)))
}

/// Parse the tags segment: `@` followed by a `;`-separated tag list and a
/// single terminating space. An empty list (`@ `) is allowed.
fn tags_segment(input: &str) -> IResult<&str, Vec<(&str, Option<&str>)>> {
    let (input, _) = char('@')(input)?;
    let (input, tags) = nom::multi::separated_list0(char(';'), tag_pair)(input)?;
    let (input, _) = char(' ')(input)?;
    Ok((input, tags))
}

/// Parse the prefix segment: `:` followed by a non-space run and one or more
/// separating spaces.
fn prefix_segment(input: &str) -> IResult<&str, &str> {
    let (input, _) = char(':')(input)?;
    let (input, prefix) = take_while1(|c| c != ' ')(input)?;
    let (input, _) = take_while1(|c| c == ' ')(input)?;
    Ok((input, prefix))
}

/// Parse the command: a non-empty run of non-space characters.
fn command_segment(input: &str) -> IResult<&str, &str> {
    take_while1(|c| c != ' ')(input)
}

/// Parse the parameter list from everything after the command.
///
/// Middle parameters are space-delimited tokens that do not start with `:`;
/// one or more consecutive spaces act as a single separator. A remaining `:`
/// introduces the trailing parameter, which takes the rest of the line
/// verbatim — including a leading space, and including the empty string.
pub(crate) fn parse_params(input: &str) -> SmallVec<[&str; 8]> {
    let mut params = SmallVec::new();
    let mut rest = input.trim_start_matches(' ');

    loop {
        if rest.is_empty() {
            break;
        }
        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            break;
        }
        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = rest[end..].trim_start_matches(' ');
    }

    params
}

/// A parsed wire line with borrowed string slices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedLine<'a> {
    /// Tag list in wire order; a tag without `=` has a `None` value.
    pub tags: Vec<(&'a str, Option<&'a str>)>,
    /// Source prefix, without the leading `:`.
    pub prefix: Option<&'a str>,
    /// The command name.
    pub command: &'a str,
    /// Parameters, including any trailing parameter.
    pub params: SmallVec<[&'a str; 8]>,
}

impl<'a> ParsedLine<'a> {
    /// Parse one line, excluding its CRLF terminator.
    pub fn parse(input: &'a str) -> Result<Self, MessageParseError> {
        if input.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }
        if let Some(position) = input.find(['\r', '\n']) {
            return Err(MessageParseError::EmbeddedLineEnding { position });
        }

        // The tags and prefix segments backtrack as a whole when their
        // terminating space is missing, matching the reference grammar.
        let (rest, tags) = run(input, opt(tags_segment), "message tags")?;
        let (rest, prefix) = run_at(input, rest, opt(prefix_segment), "message prefix")?;
        let (rest, command) = run_at(input, rest, command_segment, "command")?;
        let params = parse_params(rest);

        Ok(ParsedLine {
            tags: tags.unwrap_or_default(),
            prefix,
            command,
            params,
        })
    }
}

fn run<'a, O>(
    input: &'a str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    expected: &'static str,
) -> Result<(&'a str, O), MessageParseError> {
    run_at(input, input, &mut parser, expected)
}

/// Apply a nom parser at `rest`, reporting failure positions relative to the
/// start of the full line.
fn run_at<'a, O>(
    input: &'a str,
    rest: &'a str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    expected: &'static str,
) -> Result<(&'a str, O), MessageParseError> {
    match parser(rest) {
        Ok((remaining, value)) => Ok((remaining, value)),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(MessageParseError::Failed {
            position: input.len() - e.input.len(),
            expected,
        }),
        Err(nom::Err::Incomplete(_)) => Err(MessageParseError::Failed {
            position: input.len(),
            expected,
        }),
    }
}
