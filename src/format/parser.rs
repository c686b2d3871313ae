use combine::error::StreamError;
use combine::parser::char::{crlf, digit, newline, string};
use combine::stream::StreamErrorFor;
use combine::{attempt, choice, eof, many1, optional, satisfy, sep_end_by1, skip_many, token};
use combine::{ParseError, Parser, Stream};

use crate::rtp::Pt;

/// Value of an `a=rtpmap` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RtpMap {
    pub pt: Pt,
    pub encoding: String,
    pub clock_rate: u32,
    pub channels: Option<u8>,
}

/// Value of an `a=fmtp` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fmtp {
    pub pt: Pt,
    pub params: Vec<(String, String)>,
}

// a=rtpmap:98 VP9/90000
// 98 VP9/90000
pub(crate) fn rtpmap<Input>() -> impl Parser<Input, Output = RtpMap>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (
        attribute_prefix("rtpmap"),
        pt(),
        token(' '),
        many1::<String, _, _>(satisfy(|c| c != '/' && c != ' ' && c != '\r' && c != '\n')),
        token('/'),
        number::<Input, u32>(),
        optional((token('/'), number::<Input, u8>())),
        line_end(),
    )
        .map(
            |(_, pt, _, encoding, _, clock_rate, channels, _)| RtpMap {
                pt,
                encoding,
                clock_rate,
                channels: channels.map(|(_, c)| c),
            },
        )
        .message("rtpmap")
}

// a=fmtp:98 profile-id=0;max-fr=30
// 98 profile-id=0; max-fr=30
pub(crate) fn fmtp<Input>() -> impl Parser<Input, Output = Fmtp>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (
        attribute_prefix("fmtp"),
        pt(),
        token(' '),
        sep_end_by1::<Vec<(String, String)>, _, _, _>(key_val(), param_separator()),
        line_end(),
    )
        .map(|(_, pt, _, params, _)| Fmtp { pt, params })
        .message("fmtp")
}

/// Optional `a=<name>:` in front of the attribute value.
fn attribute_prefix<Input>(name: &'static str) -> impl Parser<Input, Output = ()>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    optional(attempt((string("a="), string(name), token(':')))).map(|_| ())
}

fn pt<Input>() -> impl Parser<Input, Output = Pt>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    number::<Input, u8>().map(Pt::from)
}

fn number<Input, T>() -> impl Parser<Input, Output = T>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    many1::<String, _, _>(digit())
        .and_then(|s| s.parse::<T>().map_err(StreamErrorFor::<Input>::message_format))
}

// profile-id=0
fn key_val<Input>() -> impl Parser<Input, Output = (String, String)>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (
        many1::<String, _, _>(satisfy(|c| !matches!(c, '=' | ' ' | ';' | '\r' | '\n'))),
        token('='),
        many1::<String, _, _>(satisfy(|c| !matches!(c, ';' | ' ' | '\r' | '\n'))),
    )
        .map(|(key, _, val)| (key, val))
}

// ; with optional spaces after
fn param_separator<Input>() -> impl Parser<Input, Output = ()>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (token(';'), skip_many(token(' '))).map(|_| ())
}

/// Trailing whitespace, \r\n, \n or EOF.
fn line_end<Input>() -> impl Parser<Input, Output = ()>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (skip_many(token(' ')), choice((crlf().map(|_| ()), newline().map(|_| ()), eof())))
        .map(|_| ())
}
