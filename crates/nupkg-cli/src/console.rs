use std::fmt::Display;
use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

/// Line-oriented operator I/O.
///
/// Every read blocks until a full line arrives. `None` from a read means the
/// input stream has closed.
pub struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console on stdin/stdout. The screen is only cleared when stdout is a
    /// terminal.
    pub fn stdio() -> Self {
        let stdout = io::stdout();
        let clear_screen = stdout.is_terminal();
        let mut console = Self::new(io::stdin().lock(), stdout);
        console.clear_screen = clear_screen;
        console
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            clear_screen: false,
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Read one line with its line ending stripped. Bytes that are not valid
    /// UTF-8 become U+FFFD, so a garbled line is just an unusable answer.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    /// Print `message` without a newline, then read a line.
    pub fn prompt(&mut self, message: impl Display) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        self.read_line()
    }

    pub fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }

    /// Ask a yes/no question. Only `y` or `Y` counts as yes.
    pub fn confirm(&mut self, question: impl Display) -> io::Result<bool> {
        let answer = self.prompt(format_args!("{question} (Y/N) "))?;
        Ok(answer.is_some_and(|a| a.eq_ignore_ascii_case("y")))
    }

    /// Block until the operator presses Enter.
    pub fn wait_for_ack(&mut self) -> io::Result<()> {
        self.prompt("Press Enter to continue...")?;
        Ok(())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use super::*;

    pub(crate) type TestConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

    pub(crate) fn scripted(lines: &[&str]) -> TestConsole {
        let mut input = lines.join("\n");
        input.push('\n');
        Console::new(Cursor::new(input.into_bytes()), Vec::new())
    }

    pub(crate) fn printed(console: &TestConsole) -> String {
        String::from_utf8_lossy(console.output()).into_owned()
    }

    #[test]
    fn test_should_strip_line_endings() {
        let mut console = Console::new(Cursor::new(b"first\r\nsecond\n".to_vec()), Vec::new());
        assert_eq!(console.read_line().unwrap().as_deref(), Some("first"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("second"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn test_should_read_invalid_utf8_as_replacement_text() {
        let mut console = Console::new(Cursor::new(b"\xff\nnext\n".to_vec()), Vec::new());
        assert_eq!(console.read_line().unwrap().as_deref(), Some("\u{FFFD}"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("next"));
    }

    #[test]
    fn test_should_confirm_only_on_y() {
        let mut console = scripted(&["y", "Y", "yes", "", "n", " y"]);
        assert!(console.confirm("Sure?").unwrap());
        assert!(console.confirm("Sure?").unwrap());
        assert!(!console.confirm("Sure?").unwrap());
        assert!(!console.confirm("Sure?").unwrap());
        assert!(!console.confirm("Sure?").unwrap());
        assert!(!console.confirm("Sure?").unwrap());
        // input exhausted
        assert!(!console.confirm("Sure?").unwrap());
        assert!(printed(&console).starts_with("Sure? (Y/N) "));
    }

    #[test]
    fn test_should_not_emit_escape_codes_when_not_a_terminal() {
        let mut console = scripted(&[]);
        console.clear().unwrap();
        assert!(console.output().is_empty());
    }
}
