//! Command-line front end.
//!
//! Each subcommand is one request against [`App`]. Results go to stdout,
//! logs to stderr.

use std::fmt::Display;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::app::App;
use crate::database::SignUp;

#[derive(Debug, Parser)]
#[command(name = "fest")]
#[command(author, version, about = "Event registration backed by SQLite", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account
    Signup { username: String, password: String },

    /// Check credentials
    Login { username: String, password: String },

    /// List all events
    Events,

    /// Register a user for an event
    Register { username: String, event_id: i64 },

    /// List the events a user is registered for
    MyEvents { username: String },

    /// Add an event to the catalog
    AddEvent { name: String, fee: i64 },
}

impl Cli {
    /// Run the selected command and print its result.
    pub fn run(&self, app: &App) -> Result<()> {
        match &self.command {
            Command::Signup { username, password } => {
                match app.sign_up(username, password).context("sign-up failed")? {
                    SignUp::Created => self.print_message("Account created. You can log in now."),
                    SignUp::UsernameTaken => {
                        self.print_message("Username already exists. Try a different one.")
                    }
                }
            }
            Command::Login { username, password } => {
                if app.log_in(username, password).context("login failed")? {
                    self.print_message(&format!("Welcome, {username}!"))
                } else {
                    self.print_message("Invalid username or password")
                }
            }
            Command::Events => {
                let events = app.events().context("could not load events")?;
                self.print_rows(&*events, |e| format!("{:>4}  {:<30} {:>6}", e.id, cell(&e.name), cell(&e.fee)))
            }
            Command::Register { username, event_id } => {
                app.register_event(username, *event_id)
                    .with_context(|| format!("could not register {username} for event {event_id}"))?;
                let events = app.my_events(username).context("could not load registrations")?;
                self.print_rows(&*events, |e| format!("{:<30} {:>6}", cell(&e.name), cell(&e.fee)))
            }
            Command::MyEvents { username } => {
                let events = app.my_events(username).context("could not load registrations")?;
                self.print_rows(&*events, |e| format!("{:<30} {:>6}", cell(&e.name), cell(&e.fee)))
            }
            Command::AddEvent { name, fee } => {
                let id = app.add_event(name, *fee).context("could not add event")?;
                self.print_message(&format!("Added event {id}"))
            }
        }
    }

    fn print_message(&self, message: &str) -> Result<()> {
        if self.json {
            println!("{}", serde_json::json!({ "message": message }));
        } else {
            println!("{message}");
        }
        Ok(())
    }

    fn print_rows<T, F>(&self, rows: &[T], line: F) -> Result<()>
    where
        T: Serialize,
        F: Fn(&T) -> String,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(rows)?);
        } else if rows.is_empty() {
            println!("(none)");
        } else {
            for row in rows {
                println!("{}", line(row));
            }
        }
        Ok(())
    }
}

/// Render a nullable column for the plain-text listing; missing values are blank.
fn cell<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Fee;

    #[test]
    fn test_parse_register() {
        let cli = Cli::try_parse_from(["fest", "register", "alice", "5", "--json"]).unwrap();

        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Register { ref username, event_id: 5 } if username == "alice"
        ));
    }

    #[test]
    fn test_parse_rejects_bad_event_id() {
        assert!(Cli::try_parse_from(["fest", "register", "alice", "five"]).is_err());
    }

    #[test]
    fn test_parse_kebab_case_commands() {
        let cli = Cli::try_parse_from(["fest", "my-events", "bob"]).unwrap();
        assert!(matches!(cli.command, Command::MyEvents { .. }));

        let cli = Cli::try_parse_from(["fest", "add-event", "Hackathon", "100"]).unwrap();
        assert!(matches!(cli.command, Command::AddEvent { fee: 100, .. }));
    }

    #[test]
    fn test_cell_renders_missing_values_blank() {
        assert_eq!(cell(&Some(Fee::Real(99.5))), "99.5");
        assert_eq!(cell(&None::<Fee>), "");
        assert_eq!(format!("{:<6}|", cell(&Some("Quiz".to_string()))), "Quiz  |");
    }
}
