//! Splitting of raw launcher input into a program token and its arguments.
//!
//! Only the program token understands quoting: a leading `"` or `'` lets it
//! contain spaces. Everything after it is split on whitespace and kept verbatim,
//! because the arguments are handed to the program as-is and never to a shell.

use crate::error::ResolveError;

/// The parsed form of a line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name or path, quotes stripped. Never empty.
    pub head: String,
    /// Remaining whitespace-separated tokens in their original order and text.
    pub args: Vec<String>,
}

impl CommandLine {
    /// Tokenize `input`.
    ///
    /// Fails with [`ResolveError::EmptyInput`] when no program token is present,
    /// which includes blank input and an empty quoted head such as `"" arg`.
    pub fn parse(input: &str) -> Result<Self, ResolveError> {
        SplitFSM::new(input).split()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitState {
    BeforeToken,
    InQuotedToken(char), // the opening quote
    InBareToken,
    InArguments,
}

struct SplitFSM {
    input: Vec<char>,
    pos: usize,
    state: SplitState,
    head: Option<String>,
    args: Vec<String>,
    buffer: String,
}

impl SplitFSM {
    fn new(line: &str) -> Self {
        SplitFSM {
            input: line.chars().collect(),
            pos: 0,
            state: SplitState::BeforeToken,
            head: None,
            args: Vec::new(),
            buffer: String::new(),
        }
    }

    fn split(mut self) -> Result<CommandLine, ResolveError> {
        while let Some(ch) = self.read_char() {
            match self.state {
                SplitState::BeforeToken => self.handle_before_token(ch),
                SplitState::InQuotedToken(quote) => self.handle_quoted_token(ch, quote),
                SplitState::InBareToken => self.handle_bare_token(ch),
                SplitState::InArguments => self.handle_arguments(ch),
            }
        }

        match self.state {
            // Unterminated quote: keep everything after it rather than truncate.
            SplitState::InQuotedToken(_) | SplitState::InBareToken => self.finish_head(),
            SplitState::InArguments => self.finish_argument(),
            SplitState::BeforeToken => {}
        }

        match self.head {
            Some(head) if !head.is_empty() => Ok(CommandLine {
                head,
                args: self.args,
            }),
            _ => Err(ResolveError::EmptyInput),
        }
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn handle_before_token(&mut self, ch: char) {
        match ch {
            c if c.is_whitespace() => {}
            '"' | '\'' => self.state = SplitState::InQuotedToken(ch),
            c => {
                self.buffer.push(c);
                self.state = SplitState::InBareToken;
            }
        }
    }

    fn handle_quoted_token(&mut self, ch: char, quote: char) {
        if ch == quote {
            self.finish_head();
        } else {
            self.buffer.push(ch);
        }
    }

    fn handle_bare_token(&mut self, ch: char) {
        if ch.is_whitespace() {
            self.finish_head();
        } else {
            self.buffer.push(ch);
        }
    }

    fn handle_arguments(&mut self, ch: char) {
        if ch.is_whitespace() {
            self.finish_argument();
        } else {
            self.buffer.push(ch);
        }
    }

    fn finish_head(&mut self) {
        self.head = Some(std::mem::take(&mut self.buffer));
        self.state = SplitState::InArguments;
    }

    fn finish_argument(&mut self) {
        if !self.buffer.is_empty() {
            self.args.push(std::mem::take(&mut self.buffer));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> CommandLine {
        CommandLine::parse(s).unwrap()
    }

    #[test]
    fn test_bare_head_without_arguments() {
        let cmd = parse("notepad");
        assert_eq!(cmd.head, "notepad");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_arguments_split_on_whitespace_runs() {
        let cmd = parse("code  --new-window \t .");
        assert_eq!(cmd.head, "code");
        assert_eq!(cmd.args, vec!["--new-window", "."]);
    }

    #[test]
    fn test_quoted_head_with_spaces() {
        let cmd = parse(r#""C:\Program Files\App\app.exe" --flag"#);
        assert_eq!(cmd.head, r"C:\Program Files\App\app.exe");
        assert_eq!(cmd.args, vec!["--flag"]);
    }

    #[test]
    fn test_single_quoted_head() {
        let cmd = parse("'/opt/my tools/run' a b");
        assert_eq!(cmd.head, "/opt/my tools/run");
        assert_eq!(cmd.args, vec!["a", "b"]);
    }

    #[test]
    fn test_unterminated_quote_keeps_remainder_as_head() {
        let cmd = parse(r#""C:\Program Files\App\app.exe --flag"#);
        assert_eq!(cmd.head, r"C:\Program Files\App\app.exe --flag");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_text_glued_to_closing_quote_starts_arguments() {
        let cmd = parse(r#""/bin/echo"hi there"#);
        assert_eq!(cmd.head, "/bin/echo");
        assert_eq!(cmd.args, vec!["hi", "there"]);
    }

    #[test]
    fn test_argument_quotes_are_kept_verbatim() {
        let cmd = parse(r#"echo "a b" 'c'"#);
        assert_eq!(cmd.head, "echo");
        assert_eq!(cmd.args, vec![r#""a"#, r#"b""#, "'c'"]);
    }

    #[test]
    fn test_embedded_quote_in_bare_head_is_literal() {
        let cmd = parse(r#"odd"name x"#);
        assert_eq!(cmd.head, r#"odd"name"#);
        assert_eq!(cmd.args, vec!["x"]);
    }

    #[test]
    fn test_shell_metacharacters_are_plain_arguments() {
        let cmd = parse("grep foo | wc > out.txt *");
        assert_eq!(cmd.args, vec!["foo", "|", "wc", ">", "out.txt", "*"]);
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        for input in ["", "   ", "\"\"", "'' --flag"] {
            assert!(
                matches!(CommandLine::parse(input), Err(ResolveError::EmptyInput)),
                "expected EmptyInput for {:?}",
                input
            );
        }
    }
}
