//! Terminal dialogs.
//!
//! Prompts are written to stderr so that listings on stdout can be piped.
//! Secret fields are read in raw mode without echo when stdin is a terminal.

use std::io::{self, BufRead, IsTerminal, Stderr, StdinLock, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use pwkeeper_core::auth::{Confirmation, Prompter, TextPrompt};
use zeroize::Zeroizing;

pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
    /// Read secrets key by key with echo off.
    interactive: bool,
}

impl TerminalPrompter<StdinLock<'static>, Stderr> {
    /// Prompter on the process stdin/stderr.
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        Self {
            input: stdin.lock(),
            output: io::stderr(),
            interactive,
        }
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Line-based prompter over arbitrary streams. Secrets are echoed.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            interactive: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// One line without its terminator, `None` on EOF.
    fn read_line(&mut self) -> io::Result<Option<Zeroizing<String>>> {
        let mut line = Zeroizing::new(String::new());
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn read_secret(&mut self) -> io::Result<Option<Zeroizing<String>>> {
        if !self.interactive {
            return self.read_line();
        }

        enable_raw_mode()?;
        let result = read_keys_without_echo();
        disable_raw_mode()?;
        writeln!(self.output)?;
        result
    }
}

/// What a key press does to a secret being typed.
#[derive(Debug, PartialEq, Eq)]
enum SecretKey {
    Submit,
    Cancel,
    Edited,
    Ignored,
}

/// Apply one key press to `buffer`. Enter submits; Esc, Ctrl-C and Ctrl-D
/// cancel. Other Ctrl/Alt chords never reach the buffer.
fn apply_secret_key(buffer: &mut String, key: KeyEvent) -> SecretKey {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let chord = ctrl || key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Enter => SecretKey::Submit,
        KeyCode::Esc => SecretKey::Cancel,
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => SecretKey::Cancel,
        KeyCode::Char(_) if chord => SecretKey::Ignored,
        KeyCode::Char(c) => {
            buffer.push(c);
            SecretKey::Edited
        }
        KeyCode::Backspace => {
            buffer.pop();
            SecretKey::Edited
        }
        _ => SecretKey::Ignored,
    }
}

/// Collect key presses until Enter or a cancel key.
fn read_keys_without_echo() -> io::Result<Option<Zeroizing<String>>> {
    let mut buffer = Zeroizing::new(String::new());

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match apply_secret_key(&mut buffer, key) {
            SecretKey::Submit => return Ok(Some(buffer)),
            SecretKey::Cancel => return Ok(None),
            SecretKey::Edited | SecretKey::Ignored => {}
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn prompt_text(
        &mut self,
        prompt: &TextPrompt<'_>,
    ) -> pwkeeper_core::Result<Option<Zeroizing<String>>> {
        match prompt.hint {
            Some(hint) => write!(self.output, "{} ({}): ", prompt.title, hint)?,
            None => write!(self.output, "{}: ", prompt.title)?,
        }
        self.output.flush()?;

        let answer = if prompt.secret {
            self.read_secret()?
        } else {
            self.read_line()?
        };
        Ok(answer)
    }

    fn confirm(&mut self, title: &str, message: &str) -> pwkeeper_core::Result<Confirmation> {
        writeln!(self.output, "{}", title)?;

        loop {
            write!(self.output, "{} [y/n]: ", message)?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                return Ok(Confirmation::Cancel);
            };

            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Confirmation::Yes),
                "n" | "no" => return Ok(Confirmation::No),
                _ => {}
            }
        }
    }

    fn notify(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(prompter: TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.into_output()).unwrap()
    }

    #[test]
    fn prompt_text_reads_one_line() {
        let mut p = prompter("123456\r\nrest\n");
        let answer = p.prompt_text(&TextPrompt::secret("Enter PIN")).unwrap();

        assert_eq!(answer.as_deref().map(String::as_str), Some("123456"));
        assert_eq!(output(p), "Enter PIN: ");
    }

    #[test]
    fn prompt_text_shows_hint() {
        let mut p = prompter("1\n");
        p.prompt_text(&TextPrompt::new("Set up PIN").with_hint("Enter a 6-digit PIN"))
            .unwrap();

        assert_eq!(output(p), "Set up PIN (Enter a 6-digit PIN): ");
    }

    #[test]
    fn prompt_text_keeps_empty_answers() {
        let mut p = prompter("\n");
        let answer = p.prompt_text(&TextPrompt::new("Email")).unwrap();

        assert_eq!(answer.as_deref().map(String::as_str), Some(""));
    }

    #[test]
    fn eof_cancels_text_prompt() {
        let mut p = prompter("");
        assert!(p.prompt_text(&TextPrompt::new("Title")).unwrap().is_none());
    }

    #[test]
    fn confirm_accepts_yes_and_no() {
        let mut p = prompter("Yes\nn\n");
        assert_eq!(p.confirm("T", "Sure?").unwrap(), Confirmation::Yes);
        assert_eq!(p.confirm("T", "Sure?").unwrap(), Confirmation::No);
    }

    #[test]
    fn confirm_repeats_on_unknown_answer() {
        let mut p = prompter("maybe\ny\n");
        assert_eq!(p.confirm("Delete Item", "Sure?").unwrap(), Confirmation::Yes);
        assert_eq!(output(p), "Delete Item\nSure? [y/n]: Sure? [y/n]: ");
    }

    #[test]
    fn confirm_eof_cancels() {
        let mut p = prompter("");
        assert_eq!(p.confirm("T", "Sure?").unwrap(), Confirmation::Cancel);
    }

    fn type_keys(keys: &[KeyEvent]) -> (String, Vec<SecretKey>) {
        let mut buffer = String::new();
        let actions = keys.iter().map(|k| apply_secret_key(&mut buffer, *k)).collect();
        (buffer, actions)
    }

    fn plain(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn secret_keys_edit_and_submit() {
        let (buffer, actions) = type_keys(&[
            plain('1'),
            plain('9'),
            KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE),
            plain('2'),
            KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT),
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
        ]);

        assert_eq!(buffer, "12A");
        assert_eq!(actions.last(), Some(&SecretKey::Submit));
    }

    #[test]
    fn ctrl_and_alt_chords_are_not_typed() {
        let (buffer, actions) = type_keys(&[
            plain('4'),
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT),
            KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
            plain('2'),
        ]);

        assert_eq!(buffer, "42");
        assert_eq!(actions[1..4], [SecretKey::Ignored, SecretKey::Ignored, SecretKey::Ignored]);
    }

    #[test]
    fn cancel_keys_stop_secret_entry() {
        for key in [
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(type_keys(&[key]).1, vec![SecretKey::Cancel]);
        }
    }

    #[test]
    fn notify_writes_a_line() {
        let mut p = prompter("");
        p.notify("Invalid PIN");
        assert_eq!(output(p), "Invalid PIN\n");
    }
}
