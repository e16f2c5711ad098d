//! Document parser: feeds lines to the block parser and runs the inline
//! pass when the input is complete.

use std::mem;

use crate::config::Config;
use crate::error::ParseError;
use crate::tree::Tree;

pub(crate) mod block_parser;
pub(crate) mod inline_parser;

use block_parser::BlockParser;
use block_parser::utils::split_lines;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses a complete Markdown document with the default configuration.
///
/// # Examples
///
/// ```rust
/// use cmark_tree::{NodeKind, parse};
///
/// let tree = parse("# Title\n\nSome *text*.");
/// let heading = tree.first_child(tree.root()).unwrap();
/// assert_eq!(tree.kind(heading), Some(NodeKind::Heading));
/// ```
pub fn parse(input: &str) -> Tree {
    parse_with_config(input, &Config::default())
}

/// Parses a complete Markdown document.
///
/// `\n`, `\r\n` and `\r` are all accepted as line endings.
pub fn parse_with_config(input: &str, config: &Config) -> Tree {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    let mut parser = BlockParser::new(config);
    for line in split_lines(input) {
        parser.process_line(line);
    }
    parser.finish()
}

/// Incremental parser for input that arrives in pieces.
///
/// Input can be given as arbitrary chunks with [`Parser::feed`] or as whole
/// lines with [`Parser::process_line`]. Nothing is visible until
/// [`Parser::finish`] hands back the tree; after that the parser refuses
/// further input.
pub struct Parser {
    state: Option<BlockParser>,
    /// Partial last line of the input fed so far.
    pending: String,
    /// The last chunk ended in `\r`, so a leading `\n` in the next chunk
    /// belongs to the same line ending.
    last_was_cr: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        #[cfg(debug_assertions)]
        {
            init_logger();
        }

        Self {
            state: Some(BlockParser::new(config)),
            pending: String::new(),
            last_was_cr: false,
        }
    }

    /// Feeds an arbitrary chunk of input. A trailing partial line is kept
    /// until the rest of it arrives or the parser finishes.
    pub fn feed(&mut self, chunk: &str) -> Result<(), ParseError> {
        let parser = self.state.as_mut().ok_or(ParseError::AlreadyFinished)?;
        if chunk.is_empty() {
            return Ok(());
        }

        let mut rest = chunk;
        if mem::take(&mut self.last_was_cr) {
            rest = rest.strip_prefix('\n').unwrap_or(rest);
        }
        while let Some(end) = rest.find(['\n', '\r']) {
            self.pending.push_str(&rest[..end]);
            parser.process_line(&self.pending);
            self.pending.clear();

            let after = &rest[end..];
            if after.starts_with("\r\n") {
                rest = &rest[end + 2..];
            } else {
                self.last_was_cr = after == "\r";
                rest = &rest[end + 1..];
            }
        }
        self.pending.push_str(rest);
        Ok(())
    }

    /// Processes one or more complete lines. A missing final line ending
    /// is treated as present, and an empty string is one blank line.
    pub fn process_line(&mut self, text: &str) -> Result<(), ParseError> {
        self.feed(text)?;
        if (text.is_empty() || !text.ends_with(['\n', '\r']))
            && let Some(parser) = self.state.as_mut()
        {
            parser.process_line(&self.pending);
            self.pending.clear();
        }
        Ok(())
    }

    /// Finishes parsing and returns the document tree.
    ///
    /// Any buffered partial line is processed first. A second call returns
    /// [`ParseError::AlreadyFinished`].
    pub fn finish(&mut self) -> Result<Tree, ParseError> {
        let mut parser = self.state.take().ok_or(ParseError::AlreadyFinished)?;
        if !self.pending.is_empty() {
            parser.process_line(&mem::take(&mut self.pending));
        }
        self.last_was_cr = false;
        Ok(parser.finish())
    }
}
