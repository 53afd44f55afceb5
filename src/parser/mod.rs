//! Script reader.
//!
//! This module turns raw script text into the ordered sequence of logical
//! commands handed to the dispatcher. It handles:
//!
//! - an optional leading shebang line (dropped, numbering shifted by one)
//! - `#` line comments and trailing `#` comments
//! - `/* ... */` block comments, possibly spanning several lines
//! - multi-line commands: a body-taking verb (`GET`, `POST`, `PUT`, `PATCH`,
//!   `DELETE`) keeps accumulating the following lines, space-joined, until a
//!   blank line or the end of input
//!
//! Every other command is a single line and is emitted as soon as it is read.
//!
//! # Examples
//!
//! ```
//! use rest_script::parser::ScriptReader;
//!
//! let script = "set baseurl https://api.example.com\n\
//!               POST /users\n\
//!               {\"name\": \"John\"}\n\
//!               \n\
//!               echo done";
//!
//! let commands: Vec<String> = ScriptReader::new(script).map(|c| c.text).collect();
//! assert_eq!(
//!     commands,
//!     vec![
//!         "set baseurl https://api.example.com",
//!         "POST /users {\"name\": \"John\"}",
//!         "echo done",
//!     ]
//! );
//! ```

use std::iter::Enumerate;
use std::str::Split;

/// Marker that identifies an interpreter line on the first line of a script.
pub const SHEBANG: &str = "#!/";

/// Line comment marker.
const COMMENT_PREFIX: char = '#';

/// Block comment delimiters.
const BLOCK_COMMENT_START: &str = "/*";
const BLOCK_COMMENT_END: &str = "*/";

/// Characters stripped from both ends of every physical line.
const LINE_WHITESPACE: &[char] = &[' ', '\t', '\r', '\n'];

/// Characters separating the verb from its payload.
const WORD_SEPARATORS: &[char] = &[' ', '\t'];

/// Verbs whose command may continue over several lines.
const BODY_VERBS: [&str; 5] = ["post", "get", "put", "patch", "delete"];

/// A logical command ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    /// The command text; continuation lines are joined with a single space.
    pub text: String,

    /// 1-based line number in the script file where the command starts.
    pub line: usize,
}

/// Streaming tokenizer over a script's text.
///
/// Commands are yielded in document order. The reader never looks at what a
/// command does, so it can be consumed lazily while commands execute.
pub struct ScriptReader<'a> {
    lines: Enumerate<Split<'a, char>>,
    skip_shebang: bool,
    pending: Vec<&'a str>,
    pending_line: usize,
    in_block_comment: bool,
}

impl<'a> ScriptReader<'a> {
    /// Creates a reader over the full text of a script.
    pub fn new(script: &'a str) -> Self {
        Self {
            lines: script.split('\n').enumerate(),
            skip_shebang: script.starts_with(SHEBANG),
            pending: Vec::new(),
            pending_line: 0,
            in_block_comment: false,
        }
    }

    /// Joins and clears the accumulated lines, returning `None` if nothing was pending.
    fn flush(&mut self) -> Option<ScriptCommand> {
        if self.pending.is_empty() {
            return None;
        }
        let text = self.pending.join(" ");
        self.pending.clear();
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(ScriptCommand {
            text: text.to_string(),
            line: self.pending_line,
        })
    }

    /// Applies comment rules to a trimmed line, returning what is left of it.
    ///
    /// `None` means the line is consumed entirely (comment or inside a block comment).
    fn strip_comments(&mut self, line: &'a str) -> Option<&'a str> {
        if self.in_block_comment {
            if line.ends_with(BLOCK_COMMENT_END) {
                self.in_block_comment = false;
            }
            return None;
        }

        if line.starts_with(BLOCK_COMMENT_START) {
            if !line.ends_with(BLOCK_COMMENT_END) {
                self.in_block_comment = true;
            }
            return None;
        }

        if line.starts_with(COMMENT_PREFIX) {
            return None;
        }

        match line.find(COMMENT_PREFIX) {
            Some(pound) if pound > 0 => Some(line[..pound].trim()),
            _ => Some(line),
        }
    }
}

impl<'a> Iterator for ScriptReader<'a> {
    type Item = ScriptCommand;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, raw)) = self.lines.next() {
            if index == 0 && self.skip_shebang {
                continue;
            }
            // numbering follows the file, so a dropped shebang still counts as line 1
            let line_number = index + 1;

            let line = raw.trim_matches(LINE_WHITESPACE);
            let line = match self.strip_comments(line) {
                Some(line) => line,
                None => continue,
            };

            if line.is_empty() {
                if let Some(command) = self.flush() {
                    return Some(command);
                }
                continue;
            }

            if self.pending.is_empty() {
                let (verb, _) = split_word(line);
                if !is_body_verb(verb) {
                    return Some(ScriptCommand {
                        text: line.to_string(),
                        line: line_number,
                    });
                }
                self.pending_line = line_number;
            }
            self.pending.push(line);
        }

        self.flush()
    }
}

/// Whether a verb (optionally carrying a `:option` suffix) takes a multi-line body.
pub fn is_body_verb(verb: &str) -> bool {
    let name = verb.split(':').next().unwrap_or(verb).to_lowercase();
    BODY_VERBS.contains(&name.as_str())
}

/// Splits text at the first space or tab into a leading word and a trimmed remainder.
///
/// Text without a separator is returned whole with an empty remainder.
pub fn split_word(src: &str) -> (&str, &str) {
    match src.find(WORD_SEPARATORS) {
        Some(index) if index > 0 => (&src[..index], src[index..].trim()),
        _ => (src, ""),
    }
}

/// Convenience wrapper collecting every command of a script.
pub fn read_script(script: &str) -> Vec<ScriptCommand> {
    ScriptReader::new(script).collect()
}
