// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure text processing for prompt-journal transcripts.
//!
//! - **parser**: split a Markdown transcript into user/assistant turns, and
//!   format turns back into canonical Markdown
//! - **codec**: derive an entry's slug and excerpt
//! - **reading_time**: estimate minutes to read a transcript
//!
//! Nothing here performs I/O or returns errors; malformed input degrades to
//! fewer turns or a shorter excerpt.

pub mod codec;
pub mod parser;
pub mod reading_time;

pub use codec::{generate_excerpt, generate_excerpt_with_limit, generate_slug};
pub use parser::{
    format_conversation, parse_conversation, parse_conversation_with_diagnostics, Block,
    Conversation, ParseDiagnostic, Turn, Turns, UnknownBlockPolicy,
};
pub use reading_time::{calculate_reading_time, format_reading_time};
