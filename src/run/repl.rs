use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::editor::BudgetEditor;
use crate::models::{AmountField, BudgetCategory, Month, UserRecord};
use crate::storage::Storage;
use crate::store::LocalStore;

use super::cli::print_budget;

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditCommand {
    List { search: String, page: usize },
    Add(String),
    Set { id: i64, field: AmountField, value: String },
    Remove(i64),
    Month { month: Month, year: Option<i32> },
    Save,
    Quit,
    Discard,
    Help,
}

fn parse_command(line: &str) -> Result<EditCommand, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let parse_id = |s: Option<&&str>| -> Result<i64, String> {
        s.ok_or("Missing category id")?
            .parse::<i64>()
            .map_err(|_| "Category id must be a number".to_string())
    };

    match verb {
        "" | "ls" | "list" => Ok(EditCommand::List {
            search: rest.to_string(),
            page: 1,
        }),
        "page" | "p" => {
            let page = args
                .first()
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or("Usage: page <number>")?;
            Ok(EditCommand::List {
                search: args.get(1..).map(|a| a.join(" ")).unwrap_or_default(),
                page,
            })
        }
        "add" | "a" => Ok(EditCommand::Add(rest.to_string())),
        "set" | "s" => {
            let id = parse_id(args.first())?;
            let field = args
                .get(1)
                .and_then(|f| AmountField::parse(f))
                .ok_or("Usage: set <id> <budgeted|spent> <amount>")?;
            Ok(EditCommand::Set {
                id,
                field,
                value: args.get(2..).map(|a| a.join(" ")).unwrap_or_default(),
            })
        }
        "rm" | "remove" | "del" => Ok(EditCommand::Remove(parse_id(args.first())?)),
        "month" | "m" => {
            let month = args
                .first()
                .and_then(|m| Month::parse(m))
                .ok_or("Usage: month <name> [year]")?;
            let year = match args.get(1) {
                Some(y) => Some(y.parse::<i32>().map_err(|_| "Year must be a number")?),
                None => None,
            };
            Ok(EditCommand::Month { month, year })
        }
        "save" | "w" => Ok(EditCommand::Save),
        "quit" | "q" | "exit" => Ok(EditCommand::Quit),
        "discard" | "q!" => Ok(EditCommand::Discard),
        "help" | "h" | "?" => Ok(EditCommand::Help),
        other => Err(format!("Unknown command: {other} (type `help`)")),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list [text]                   Show categories, optionally filtered");
    println!("  page <n> [text]               Show page n");
    println!("  add <name>                    Add a category");
    println!("  set <id> <budgeted|spent> <n> Set an amount");
    println!("  rm <id>                       Remove a category");
    println!("  month <name> [year]           Switch month (saves pending edits)");
    println!("  save                          Save now");
    println!("  quit                          Save and exit");
    println!("  discard                       Exit without saving pending edits");
}

/// What the session got while waiting for the next line.
enum Input {
    Line(String),
    /// The wait ran out with no line.
    Idle,
    Closed,
}

/// Where session lines come from.
trait LineSource {
    /// Block for the next line, giving up after `wait` if one is set.
    fn next_input(&mut self, wait: Option<Duration>) -> Result<Input>;
}

impl LineSource for Receiver<io::Result<String>> {
    fn next_input(&mut self, wait: Option<Duration>) -> Result<Input> {
        let received = match wait {
            Some(wait) => match self.recv_timeout(wait) {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => return Ok(Input::Idle),
                Err(RecvTimeoutError::Disconnected) => return Ok(Input::Closed),
            },
            None => match self.recv() {
                Ok(line) => line,
                Err(_) => return Ok(Input::Closed),
            },
        };
        Ok(Input::Line(received.context("Failed to read input")?))
    }
}

/// Forward stdin lines over a channel so the session can stop waiting
/// when a save comes due.
fn spawn_stdin_reader() -> Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Interactive editing of one month. Auto-saves fire once their quiet
/// period passes, whether or not another line has been typed.
pub(super) fn edit_budget<S: Storage>(
    store: &mut LocalStore<S>,
    user: &UserRecord,
    month: Month,
    year: i32,
    quiet: Duration,
) -> Result<()> {
    let editor = BudgetEditor::open(store, &user.id, month, year, quiet, Instant::now());
    print_budget(&editor, "", 1);
    println!("Edits save {}ms after the last change. Type `help` for commands.", quiet.as_millis());

    let mut input = spawn_stdin_reader();
    run_session(editor, store, &mut input, Instant::now)
}

fn run_session<S: Storage>(
    mut editor: BudgetEditor,
    store: &mut LocalStore<S>,
    input: &mut impl LineSource,
    mut clock: impl FnMut() -> Instant,
) -> Result<()> {
    loop {
        let (month, year) = editor.period();
        let marker = if editor.has_pending_save() { "*" } else { "" };
        print!("{month} {year}{marker}> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let wait = editor
            .save_deadline()
            .map(|deadline| deadline.saturating_duration_since(clock()));
        let next = input.next_input(wait)?;

        let now = clock();
        let saved = editor.tick(store, now);
        if saved {
            trace!(%month, year, "auto-save fired");
        }

        let line = match next {
            Input::Idle => {
                if saved {
                    println!();
                    println!("Budget saved automatically");
                }
                continue;
            }
            Input::Closed => {
                editor.flush(store);
                println!();
                return Ok(());
            }
            Input::Line(line) => line,
        };
        if saved {
            println!("Budget saved automatically");
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match command {
            EditCommand::List { search, page } => print_budget(&editor, &search, page),
            EditCommand::Add(name) => match editor.add_category(&name, now) {
                Some(id) => println!("Added category {id}"),
                None => println!("Category name is empty"),
            },
            EditCommand::Set { id, field, value } => {
                if editor.update_field(id, field, &value, now) {
                    if let Some(cat) = BudgetCategory::find_by_id(editor.categories(), id) {
                        println!("{}: remaining {}", cat.name, cat.remaining);
                    }
                } else {
                    println!("No category with id {id}");
                }
            }
            EditCommand::Remove(id) => {
                if !editor.delete_category(id, now) {
                    println!("No category with id {id}");
                }
            }
            EditCommand::Month { month, year: new_year } => {
                editor.switch_period(store, month, new_year.unwrap_or(year), now);
                print_budget(&editor, "", 1);
            }
            EditCommand::Save => {
                if editor.flush(store) {
                    println!("Saved");
                } else {
                    println!("Nothing to save");
                }
            }
            EditCommand::Quit => {
                editor.flush(store);
                return Ok(());
            }
            EditCommand::Discard => {
                if editor.close() {
                    println!("Discarded unsaved edits");
                }
                return Ok(());
            }
            EditCommand::Help => print_help(),
        }
    }
}
