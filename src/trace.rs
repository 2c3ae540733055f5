use std::io::BufRead;

use log::{debug, warn};
use winnow::ascii::{dec_uint, hex_digit1, space0, space1};
use winnow::combinator::{alt, eof, opt, preceded, separated_pair, terminated};
use winnow::error::{ContextError, ParseError, StrContext, StrContextValue};
use winnow::token::any;
use winnow::{ModalResult, Parser};

#[derive(Debug)]
pub enum TraceParseError<'a> {
    ParseError(ParseError<&'a str, ContextError>),
    UnknownKind(char),
}

impl std::fmt::Display for TraceParseError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceParseError::ParseError(parse_error) => f.write_fmt(format_args!("{parse_error}")),
            TraceParseError::UnknownKind(kind) => {
                f.write_fmt(format_args!("unknown access kind '{kind}'"))
            }
        }
    }
}

impl std::error::Error for TraceParseError<'_> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Instruction,
    Load,
    Store,
    /// load followed by a store to the same address
    Modify,
}

impl TraceKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(TraceKind::Instruction),
            'L' => Some(TraceKind::Load),
            'S' => Some(TraceKind::Store),
            'M' => Some(TraceKind::Modify),
            _ => None,
        }
    }

    /// Number of data cache accesses this kind turns into.
    pub fn access_count(&self) -> usize {
        match self {
            TraceKind::Instruction => 0,
            TraceKind::Load | TraceKind::Store => 1,
            TraceKind::Modify => 2,
        }
    }
}

impl std::fmt::Display for TraceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TraceKind::Instruction => "I",
            TraceKind::Load => "L",
            TraceKind::Store => "S",
            TraceKind::Modify => "M",
        })
    }
}

/// One line of a trace: `<kind> <hex-address>,<size>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    pub kind: TraceKind,
    pub address: u64,
    /// bytes touched; recorded but not simulated
    pub size: u32,
}

impl<'a> TryFrom<&'a str> for TraceEvent {
    type Error = TraceParseError<'a>;

    fn try_from(line: &'a str) -> Result<Self, Self::Error> {
        let (kind, (address, size)) = event
            .parse(line)
            .map_err(TraceParseError::ParseError)?;
        let kind = TraceKind::from_char(kind).ok_or(TraceParseError::UnknownKind(kind))?;

        Ok(TraceEvent {
            kind,
            address,
            size,
        })
    }
}

impl std::fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{} {:x},{}", self.kind, self.address, self.size))
    }
}

fn event(input: &mut &str) -> ModalResult<(char, (u64, u32))> {
    terminated(
        (
            preceded(space0, any).context(StrContext::Label("access kind")),
            preceded(
                space1,
                separated_pair(address, ',', dec_uint.context(StrContext::Label("size"))),
            ),
        ),
        (space0, eof),
    )
    .parse_next(input)
}

fn address(input: &mut &str) -> ModalResult<u64> {
    preceded(
        opt(alt(("0x", "0X"))),
        hex_digit1.try_map(|s| u64::from_str_radix(s, 16)),
    )
    .context(StrContext::Label("address"))
    .context(StrContext::Expected(StrContextValue::Description(
        "a hexadecimal address of at most 16 digits",
    )))
    .parse_next(input)
}

/// Streams well-formed events out of a trace, skipping everything else.
pub struct TraceReader<R> {
    reader: R,
    line_number: usize,
    buffer: Vec<u8>,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = TraceEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    warn!("stopped reading trace at line {}: {e}", self.line_number + 1);
                    return None;
                }
            }
            self.line_number += 1;

            let line = match std::str::from_utf8(&self.buffer) {
                Ok(line) => line.trim_end_matches(['\n', '\r']),
                Err(e) => {
                    debug!("skipping trace line {}: {e}", self.line_number);
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match TraceEvent::try_from(line) {
                Ok(event) => return Some(event),
                Err(e) => debug!("skipping trace line {}: {e}", self.line_number),
            }
        }
    }
}
