use super::{MenuError, NoteError, NotePreview, Result};

use crate::markup;
use crate::ui::io::{IO, RichTextEditor};
use colored::Colorize;
use log::trace;
use std::io::{self, Write};
use tabled::{Table, settings::Style};

pub struct Cli;

impl Cli {
    fn prompt() -> Result<()> {
        print!("> ");
        io::stdout()
            .flush()
            .map_err(|e| NoteError::Menu(MenuError::StdoutWriteError(e)))?;
        trace!("Flushed stdout");
        Ok(())
    }

    /// Reads one raw line. `None` means stdin is closed.
    fn read_line() -> Result<Option<String>> {
        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .map_err(|e| NoteError::Menu(MenuError::StdinReadError(e)))?;
        Ok((read > 0).then_some(line))
    }
}

impl IO for Cli {
    /// Reads a single line of text, trims the trailing newline, and
    /// returns the resulting string.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout or reading from stdin fails, and
    /// `MenuError::EndOfInput` once stdin is closed.
    fn get_input(&self) -> Result<String> {
        Self::prompt()?;
        let input = Self::read_line()?.ok_or(NoteError::Menu(MenuError::EndOfInput))?;
        println!();

        let input = input.trim().to_string();
        trace!("Got input: {input}");
        Ok(input)
    }

    /// Reads lines from stdin until a line exactly matching `stop_at` (trimmed) is entered,
    /// concatenates the preceding lines and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout or reading from stdin fails. Closing stdin
    /// ends the text early, or yields `MenuError::EndOfInput` if nothing was typed.
    fn get_input_until(&self, stop_at: &str) -> Result<String> {
        let mut input = String::new();
        loop {
            Self::prompt()?;
            let Some(line) = Self::read_line()? else {
                if input.is_empty() {
                    return Err(NoteError::Menu(MenuError::EndOfInput));
                }
                break;
            };
            trace!("Got input: {}", line.trim_end());

            if line.trim() == stop_at {
                break;
            }
            input += &line;
        }
        println!();
        Ok(input)
    }

    fn show_menu(&self, options: &[impl std::fmt::Display]) {
        self.show_title("Choose an option");
        for o in options {
            println!("{o}");
        }
        println!();
    }

    /// Renders a table of note previews in `psql` style to stdout.
    fn show_notes_list(&self, previews: Vec<NotePreview>) {
        let mut table = Table::new(previews);
        table.with(Style::psql());
        println!("{table}");
    }

    fn show_title(&self, title: &str) {
        println!("\n{}\n", title.to_string().bold());
    }

    fn show_text(&self, msg: &str) {
        println!("{msg}");
    }
}

impl RichTextEditor for Cli {
    /// Line editor: shows the current text, then takes new text up to a lone `.`.
    /// Each typed line becomes a paragraph. Entering nothing keeps the content as is.
    fn render(&self, current: &str, on_change: &mut dyn FnMut(String)) -> Result<()> {
        let text = markup::to_plain_text(current);
        if !text.is_empty() {
            self.show_text(&format!("{}\n{text}\n", "Current:".dimmed()));
        }
        self.show_text("Content (end with '.' on last line):");

        let typed = self.get_input_until(".")?;
        if typed.trim().is_empty() {
            trace!("Nothing typed, content unchanged");
            return Ok(());
        }
        on_change(markup::from_plain_text(&typed));
        Ok(())
    }
}
