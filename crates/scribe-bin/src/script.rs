//! Replay script parsing.
//!
//! One step per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! input <text>             surface text becomes <text> (escapes \n \t \\), then `input`
//! key <combo>              keydown, e.g. Tab, shift+Tab, ctrl+k, meta+z, ctrl+shift+z
//! cursor <n>               caret at char offset n
//! nocursor                 surface reports no selection
//! wait <ms>                let real time (and timers) pass
//! compose start|update|end composition events
//! ```

use std::time::Duration;

use core_events::{Event, ParseKeyError, RawKeyEvent, SurfaceEdit, SurfaceEvent};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionPhase {
    Start,
    Update,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Input(String),
    Key(RawKeyEvent),
    Cursor(Option<usize>),
    Wait(Duration),
    Compose(CompositionPhase),
}

impl ScriptStep {
    /// Channel events for this step; `Wait` produces none.
    pub fn into_events(self) -> Vec<Event> {
        match self {
            ScriptStep::Input(text) => {
                let end = text.chars().count();
                vec![
                    Event::SurfaceEdit(SurfaceEdit::SetText(text)),
                    Event::SurfaceEdit(SurfaceEdit::SetCursor(Some(end))),
                    Event::Surface(SurfaceEvent::Input),
                ]
            }
            ScriptStep::Key(raw) => vec![Event::Surface(SurfaceEvent::KeyDown(raw))],
            ScriptStep::Cursor(at) => vec![Event::SurfaceEdit(SurfaceEdit::SetCursor(at))],
            ScriptStep::Wait(_) => Vec::new(),
            ScriptStep::Compose(phase) => vec![Event::Surface(match phase {
                CompositionPhase::Start => SurfaceEvent::CompositionStart,
                CompositionPhase::Update => SurfaceEvent::CompositionUpdate,
                CompositionPhase::End => SurfaceEvent::CompositionEnd,
            })],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("script line {line}: {kind}")]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptErrorKind {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a non-negative integer")]
    InvalidNumber(String),
    #[error(transparent)]
    InvalidKey(#[from] ParseKeyError),
    #[error("unknown composition phase `{0}` (expected start, update or end)")]
    UnknownPhase(String),
    #[error("unsupported escape `\\{0}`")]
    BadEscape(char),
    #[error("dangling `\\` at end of text")]
    DanglingEscape,
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step = parse_line(trimmed).map_err(|kind| ScriptError {
            line: idx + 1,
            kind,
        })?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<ScriptStep, ScriptErrorKind> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        // Text is taken verbatim after the single separating space.
        "input" => Ok(ScriptStep::Input(unescape(rest)?)),
        "key" => {
            let combo = required("key", rest)?;
            Ok(ScriptStep::Key(RawKeyEvent::parse(combo)?))
        }
        "cursor" => {
            let n = required("cursor", rest)?;
            Ok(ScriptStep::Cursor(Some(number::<usize>(n)?)))
        }
        "nocursor" => Ok(ScriptStep::Cursor(None)),
        "wait" => {
            let ms = required("wait", rest)?;
            Ok(ScriptStep::Wait(Duration::from_millis(number::<u64>(ms)?)))
        }
        "compose" => {
            let phase = match required("compose", rest)? {
                "start" => CompositionPhase::Start,
                "update" => CompositionPhase::Update,
                "end" => CompositionPhase::End,
                other => return Err(ScriptErrorKind::UnknownPhase(other.to_string())),
            };
            Ok(ScriptStep::Compose(phase))
        }
        other => Err(ScriptErrorKind::UnknownCommand(other.to_string())),
    }
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, ScriptErrorKind> {
    let arg = rest.trim();
    if arg.is_empty() {
        Err(ScriptErrorKind::MissingArgument(command))
    } else {
        Ok(arg)
    }
}

fn number<N: std::str::FromStr>(arg: &str) -> Result<N, ScriptErrorKind> {
    arg.parse::<N>().map_err(|_| ScriptErrorKind::InvalidNumber(arg.to_string()))
}

fn unescape(text: &str) -> Result<String, ScriptErrorKind> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(ScriptErrorKind::BadEscape(other)),
            None => return Err(ScriptErrorKind::DanglingEscape),
        }
    }
    Ok(out)
}
