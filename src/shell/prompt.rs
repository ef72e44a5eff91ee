//! Line-based prompting over any reader and writer

use std::io::{self, BufRead, Write};

use crate::crypto::SecureString;

/// How passwords are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMode {
    /// From the terminal with echo turned off
    Hidden,
    /// As an ordinary line of input (piped or scripted sessions)
    Inline,
}

/// Prompts on `output` and reads answers from `input`
///
/// Every read returns `None` once input is exhausted.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    passwords: PasswordMode,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, passwords: PasswordMode) -> Self {
        Self {
            input,
            output,
            passwords,
        }
    }

    /// Write `text` as-is
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())
    }

    /// Write `text` followed by a newline
    pub fn say(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Show `prompt` and read one line, without its line ending
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Show `prompt` and read a password
    pub fn ask_password(&mut self, prompt: &str) -> io::Result<Option<SecureString>> {
        self.output.flush()?;
        match self.passwords {
            PasswordMode::Hidden => rpassword::prompt_password(prompt).map(|p| Some(p.into())),
            PasswordMode::Inline => {
                write!(self.output, "{}", prompt)?;
                self.output.flush()?;
                Ok(self.read_line()?.map(SecureString::from))
            }
        }
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            PasswordMode::Inline,
        )
    }

    #[test]
    fn test_ask_reads_lines_until_eof() {
        let mut p = prompter("first\r\n second \n");

        assert_eq!(p.ask("> ").unwrap().as_deref(), Some("first"));
        assert_eq!(p.ask("> ").unwrap().as_deref(), Some(" second "));
        assert_eq!(p.ask("> ").unwrap(), None);

        assert_eq!(String::from_utf8(p.into_output()).unwrap(), "> > > ");
    }

    #[test]
    fn test_inline_password() {
        let mut p = prompter("s3cret\n");

        let password = p.ask_password("Enter your password: ").unwrap().unwrap();
        assert_eq!(password.as_str(), "s3cret");
        assert!(p.ask_password("again: ").unwrap().is_none());
    }

    #[test]
    fn test_say_and_print() {
        let mut p = prompter("");
        p.print("a").unwrap();
        p.say("b").unwrap();
        assert_eq!(p.into_output(), b"ab\n");
    }
}
