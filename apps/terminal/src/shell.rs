//! # Shell
//!
//! Line-oriented front end over the [`Surface`](crate::surface::Surface).
//!
//! ```text
//!   stdin line ──► Command::parse ──► Storefront::press / fill ──► bus
//!                                                                   │
//!   stdout ◄── render_text ◄── surface version changed ◄────────────┘
//! ```
//!
//! The shell redraws after every command and whenever the surface changes
//! on its own (a spawned order submission finishing, for example).

use std::str::FromStr;

use storefront_core::BuyerField;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::AppError;
use crate::storefront::Storefront;

const HELP: &str = "\
Commands:
  press <key>            press the button shown as [key]
  fill <field> <value>   type into an input (address, email, phone)
  show                   redraw the screen
  help                   this text
  quit                   leave the store
";

const PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Press(String),
    Fill { field: BuyerField, value: String },
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, AppError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "" => return Ok(None),
            "press" | "p" if !rest.is_empty() => Command::Press(rest.to_string()),
            "fill" | "f" if !rest.is_empty() => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::Fill {
                    field: BuyerField::from_str(field)?,
                    value: value.trim().to_string(),
                }
            }
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(AppError::unknown_command(line)),
        };
        Ok(Some(command))
    }
}

pub struct Shell<'a> {
    storefront: &'a Storefront,
}

impl<'a> Shell<'a> {
    pub fn new(storefront: &'a Storefront) -> Self {
        Shell { storefront }
    }

    /// Runs one command. Returns text to print, if any.
    pub fn execute(&self, command: Command) -> Result<Option<String>, AppError> {
        debug!(?command, "Shell command");
        match command {
            Command::Press(key) => self.storefront.press(&key).map(|_| None),
            Command::Fill { field, value } => self.storefront.fill(field, &value).map(|_| None),
            Command::Show => Ok(None),
            Command::Help => Ok(Some(HELP.to_string())),
            Command::Quit => Ok(None),
        }
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut version = self.storefront.surface().subscribe();
        version.borrow_and_update();
        self.draw(&mut output).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let reply = match Command::parse(&line) {
                        Ok(None) => None,
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(command)) => self.execute(command).unwrap_or_else(|e| Some(format!("! {}\n", e.message))),
                        Err(e) => Some(format!("! {}\n", e.message)),
                    };
                    if let Some(reply) = reply {
                        output.write_all(reply.as_bytes()).await?;
                    }
                    version.borrow_and_update();
                    self.draw(&mut output).await?;
                }
                changed = version.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    version.borrow_and_update();
                    self.draw(&mut output).await?;
                }
            }
        }

        output.write_all(b"Bye!\n").await?;
        output.flush().await?;
        Ok(())
    }

    async fn draw<W: AsyncWrite + Unpin>(&self, output: &mut W) -> Result<(), AppError> {
        let screen = self.storefront.surface().render_text();
        output.write_all(screen.as_bytes()).await?;
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }
}
