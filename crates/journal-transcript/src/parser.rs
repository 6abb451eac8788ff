// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown transcript parsing.
//!
//! A transcript is a run of turn blocks. Each block opens with a heading line
//! naming the speaker (`### User`, `### 🧑‍💻 User`, `## 🤖 Assistant`, ...) and
//! ends at the next speaker heading or at a `---` rule standing alone between
//! blank lines. Headings and rules inside a fenced code block are ordinary
//! text, provided the fence closes before the next `---` + speaker heading
//! boundary. An unclosed fence is plain text and never hides later turns.
//!
//! Scanning is a small state machine over lines: *outside* a block, inside a
//! *known* block (user or assistant), or inside an *unrecognized* block (text
//! that follows a rule without a speaker heading). Unrecognized blocks are
//! never errors; [`UnknownBlockPolicy`] decides whether they are dropped
//! silently or reported as [`ParseDiagnostic`]s.

use journal_core::{Message, Role};
use tracing::trace;

/// Decorative glyph written before `User` by [`format_conversation`].
pub const USER_GLYPH: &str = "🧑\u{200d}💻";

/// Decorative glyph written before `Assistant` by [`format_conversation`].
pub const ASSISTANT_GLYPH: &str = "🤖";

/// Separator written between turns by [`format_conversation`].
pub const TURN_SEPARATOR: &str = "\n\n---\n\n";

/// What to do with a block whose heading names neither speaker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownBlockPolicy {
    /// Skip the block.
    #[default]
    Drop,
    /// Skip the block but record a [`ParseDiagnostic`].
    Diagnose,
}

/// A dropped block, reported under [`UnknownBlockPolicy::Diagnose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// 1-based line where the dropped block starts.
    pub line: usize,
    /// The first line of the dropped block, trimmed.
    pub first_line: String,
}

/// One speaker turn, borrowing its text from the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn<'a> {
    pub role: Role,
    pub text: &'a str,
}

impl Turn<'_> {
    pub fn to_message(&self) -> Message {
        Message::new(self.role, self.text)
    }
}

/// A parsed view over a transcript string.
///
/// Parsing is lazy: nothing is scanned until [`turns`](Conversation::turns)
/// is iterated, and every call starts a fresh scan.
#[derive(Debug, Clone, Copy)]
pub struct Conversation<'a> {
    source: &'a str,
}

impl<'a> Conversation<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Iterate speaker turns in source order.
    pub fn turns(&self) -> Turns<'a> {
        Turns {
            blocks: Blocks::new(self.source),
        }
    }

    /// Iterate every block, including unrecognized ones.
    pub fn blocks(&self) -> Blocks<'a> {
        Blocks::new(self.source)
    }

    /// The first turn spoken by `role`, if any.
    pub fn first(&self, role: Role) -> Option<Turn<'a>> {
        self.turns().find(|turn| turn.role == role)
    }
}

impl<'a> IntoIterator for Conversation<'a> {
    type Item = Turn<'a>;
    type IntoIter = Turns<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns()
    }
}

/// Parse a transcript into owned messages, dropping unrecognized blocks.
pub fn parse_conversation(source: &str) -> Vec<Message> {
    Conversation::new(source)
        .blocks()
        .filter_map(|block| match block {
            Block::Turn(turn) => Some(turn.to_message()),
            Block::Unrecognized { line, .. } => {
                trace!(line, "dropping unrecognized transcript block");
                None
            }
        })
        .collect()
}

/// Parse a transcript and report what was dropped according to `policy`.
pub fn parse_conversation_with_diagnostics(
    source: &str,
    policy: UnknownBlockPolicy,
) -> (Vec<Message>, Vec<ParseDiagnostic>) {
    let mut messages = Vec::new();
    let mut diagnostics = Vec::new();
    for block in Conversation::new(source).blocks() {
        match block {
            Block::Turn(turn) => messages.push(turn.to_message()),
            Block::Unrecognized { line, text } => {
                if policy == UnknownBlockPolicy::Diagnose {
                    diagnostics.push(ParseDiagnostic {
                        line,
                        first_line: text.lines().next().unwrap_or_default().trim().to_string(),
                    });
                }
            }
        }
    }
    (messages, diagnostics)
}

/// Serialize messages back into canonical transcript Markdown.
///
/// Headings are always `### <glyph> User` / `### <glyph> Assistant` and turns
/// are joined by [`TURN_SEPARATOR`]. Parsing the output yields the same turns.
pub fn format_conversation(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| {
            let header = match message.role {
                Role::User => format!("### {USER_GLYPH} User"),
                Role::Assistant => format!("### {ASSISTANT_GLYPH} Assistant"),
            };
            format!("{header}\n\n{}", message.content)
        })
        .collect::<Vec<_>>()
        .join(TURN_SEPARATOR)
}

/// Recognize a speaker heading line.
///
/// Accepts 1-6 `#`, whitespace, an optional glyph token with no letters or
/// digits, then exactly `User` or `Assistant`.
pub fn parse_header(line: &str) -> Option<Role> {
    let trimmed = line.trim();
    let rest = trimmed.trim_start_matches('#');
    let hashes = trimmed.len() - rest.len();
    if !(1..=6).contains(&hashes) || !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut words = rest.split_whitespace();
    let mut word = words.next()?;
    if !word.chars().any(char::is_alphanumeric) {
        word = words.next()?;
    }
    let role = match word {
        "User" => Role::User,
        "Assistant" => Role::Assistant,
        _ => return None,
    };
    words.next().is_none().then_some(role)
}

fn is_rule(line: &str) -> bool {
    line.trim() == "---"
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// True when the line starting at `offset` is blank or absent.
fn blank_or_end_at(source: &str, offset: usize) -> bool {
    source[offset..].split('\n').next().is_none_or(is_blank)
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// True when a closing fence appears after `offset` before the next turn
/// boundary (a blank-delimited rule whose next non-blank line is a heading).
fn fence_closes(source: &str, offset: usize) -> bool {
    let mut lines = source[offset..].lines();
    let mut prev_blank = false;
    while let Some(line) = lines.next() {
        if is_fence(line) {
            return true;
        }
        if prev_blank && is_rule(line) && opens_turn(lines.clone()) {
            return false;
        }
        prev_blank = is_blank(line);
    }
    false
}

/// Lines following a rule: a blank line, then a speaker heading.
fn opens_turn<'a>(mut rest: impl Iterator<Item = &'a str>) -> bool {
    if !rest.next().is_some_and(is_blank) {
        return false;
    }
    rest.find(|line| !is_blank(line))
        .and_then(parse_header)
        .is_some()
}

/// One scanned block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Turn(Turn<'a>),
    Unrecognized { line: usize, text: &'a str },
}

#[derive(Debug, Clone, Copy)]
enum State {
    Outside,
    Known {
        role: Role,
        body_start: usize,
        in_fence: bool,
        last_blank: bool,
    },
    Unrecognized {
        line: usize,
        body_start: usize,
        in_fence: bool,
        last_blank: bool,
    },
}

/// Block scanner. Cheap to clone; each clone resumes independently.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    source: &'a str,
    pos: usize,
    line_no: usize,
    state: State,
}

impl<'a> Blocks<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line_no: 0,
            state: State::Outside,
        }
    }

    /// The line starting at `self.pos`, without its terminator, and the
    /// offset of the line after it.
    fn peek_line(&self) -> Option<(&'a str, usize)> {
        if self.pos >= self.source.len() {
            return None;
        }
        let rest = &self.source[self.pos..];
        Some(match rest.find('\n') {
            Some(i) => (rest[..i].trim_end_matches('\r'), self.pos + i + 1),
            None => (rest, self.source.len()),
        })
    }

    fn advance(&mut self, next: usize) {
        self.pos = next;
        self.line_no += 1;
    }

    /// Close the current block at byte offset `end`.
    fn close(&mut self, end: usize) -> Option<Block<'a>> {
        let block = match self.state {
            State::Outside => None,
            State::Known {
                role, body_start, ..
            } => {
                let text = self.source[body_start.min(end)..end].trim();
                (!text.is_empty()).then_some(Block::Turn(Turn { role, text }))
            }
            State::Unrecognized {
                line, body_start, ..
            } => {
                let text = self.source[body_start..end].trim();
                (!text.is_empty()).then_some(Block::Unrecognized { line, text })
            }
        };
        self.state = State::Outside;
        block
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((line, next)) = self.peek_line() else {
                let end = self.source.len();
                return match self.state {
                    State::Outside => None,
                    _ => self.close(end),
                };
            };

            match &mut self.state {
                State::Outside => {
                    if let Some(role) = parse_header(line) {
                        self.state = State::Known {
                            role,
                            body_start: next,
                            in_fence: false,
                            last_blank: true,
                        };
                    } else if !is_blank(line) && !is_rule(line) {
                        self.state = State::Unrecognized {
                            line: self.line_no + 1,
                            body_start: self.pos,
                            in_fence: is_fence(line) && fence_closes(self.source, next),
                            last_blank: false,
                        };
                    }
                    self.advance(next);
                }
                State::Known {
                    in_fence,
                    last_blank,
                    ..
                }
                | State::Unrecognized {
                    in_fence,
                    last_blank,
                    ..
                } => {
                    if *in_fence {
                        *in_fence = !is_fence(line);
                    } else if is_fence(line) {
                        *in_fence = fence_closes(self.source, next);
                    } else {
                        if parse_header(line).is_some() {
                            // Leave the header for the Outside state to open.
                            let start = self.pos;
                            if let Some(block) = self.close(start) {
                                return Some(block);
                            }
                            continue;
                        }
                        if is_rule(line) && *last_blank && blank_or_end_at(self.source, next) {
                            let start = self.pos;
                            self.advance(next);
                            if let Some(block) = self.close(start) {
                                return Some(block);
                            }
                            continue;
                        }
                    }
                    *last_blank = is_blank(line);
                    self.advance(next);
                }
            }
        }
    }
}

/// Iterator over speaker turns; unrecognized blocks are skipped.
#[derive(Debug, Clone)]
pub struct Turns<'a> {
    blocks: Blocks<'a>,
}

impl<'a> Iterator for Turns<'a> {
    type Item = Turn<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.blocks.by_ref().find_map(|block| match block {
            Block::Turn(turn) => Some(turn),
            Block::Unrecognized { .. } => None,
        })
    }
}
