use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::editor::BudgetEditor;
use crate::error::AuthError;
use crate::export::export_budget;
use crate::models::{validate_login, AmountField, BudgetCategory, Month, NewUser, UserRecord};
use crate::storage::Storage;
use crate::store::LocalStore;
use crate::util::{format_amount, truncate};

#[derive(Debug, Parser)]
#[command(
    name = "saiel",
    version,
    about = "Saiel - local-only accounts and monthly budgets"
)]
pub(crate) struct Cli {
    /// Directory holding saiel.db
    #[arg(long, env = "SAIEL_DATA_DIR", global = true)]
    pub(crate) data_dir: Option<PathBuf>,

    /// Quiet period before edits in `budget edit` are saved
    #[arg(long, env = "SAIEL_AUTOSAVE_MS", default_value_t = 1000, global = true)]
    pub(crate) autosave_ms: u64,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Opt in to promotional emails
        #[arg(long)]
        promotional_emails: bool,
    },
    /// Sign in
    Login { email: String, password: String },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Account and opt-in counts
    Stats,
    /// Create the demo accounts, optionally signing in as one (1-3)
    Demo {
        #[arg(long)]
        login: Option<usize>,
    },
    /// Give demo accounts a randomized budget for this month
    Samples,
    /// Delete all accounts, the session and all budgets
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Work with the signed-in user's budgets
    Budget {
        #[command(subcommand)]
        action: BudgetCommand,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum BudgetCommand {
    /// Print a month's categories
    Show {
        #[command(flatten)]
        period: PeriodArgs,
        /// Only categories whose name contains this
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Add a category
    Add {
        name: String,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Set a category's budgeted or spent amount
    Set {
        id: i64,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Remove a category
    Remove {
        id: i64,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Delete a month's budget
    Delete {
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Totals for every stored month
    Summary,
    /// Write a month's categories to CSV
    Export {
        path: Option<String>,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Edit a month interactively with auto-save
    Edit {
        #[command(flatten)]
        period: PeriodArgs,
    },
}

#[derive(Debug, Clone, Args)]
pub(crate) struct PeriodArgs {
    /// Month name, abbreviation or number (default: current)
    #[arg(long)]
    month: Option<String>,
    /// Four-digit year (default: current)
    #[arg(long)]
    year: Option<i32>,
}

impl PeriodArgs {
    fn resolve(&self) -> Result<(Month, i32)> {
        let (current_month, current_year) = Month::current();
        let month = match &self.month {
            Some(raw) => {
                Month::parse(raw).ok_or_else(|| anyhow::anyhow!("Unknown month: {raw}"))?
            }
            None => current_month,
        };
        Ok((month, self.year.unwrap_or(current_year)))
    }
}

pub(crate) fn as_cli<S: Storage>(
    command: Command,
    store: &mut LocalStore<S>,
    config: &Config,
) -> Result<()> {
    match command {
        Command::Register {
            email,
            password,
            first_name,
            last_name,
            promotional_emails,
        } => cli_register(
            store,
            NewUser {
                email,
                password,
                first_name,
                last_name,
                promotional_emails,
            },
        ),
        Command::Login { email, password } => cli_login(store, &email, &password),
        Command::Logout => {
            store.logout_user();
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => cli_whoami(store),
        Command::Stats => cli_stats(store),
        Command::Demo { login } => cli_demo(store, login),
        Command::Samples => {
            let count = store.create_sample_budgets();
            if count == 0 {
                println!("No demo accounts found. Run `saiel demo` first");
            } else {
                println!("Created sample budgets for {count} demo accounts");
            }
            Ok(())
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("This deletes every account and budget. Re-run with --yes to confirm");
            }
            store.reset_all();
            println!("All user data has been reset");
            Ok(())
        }
        Command::Budget { action } => cli_budget(action, store, config),
    }
}

fn cli_register<S: Storage>(store: &mut LocalStore<S>, data: NewUser) -> Result<()> {
    let problems = data.validate();
    if !problems.is_empty() {
        let lines: Vec<String> = problems.iter().map(|p| format!("  {p}")).collect();
        bail!("Invalid registration:\n{}", lines.join("\n"));
    }

    match store.register_user(data) {
        Ok(user) => {
            println!("Welcome, {}! Signed in as {}", user.first_name, user.email);
            Ok(())
        }
        Err(AuthError::DuplicateEmail { email }) => {
            bail!("An account with {email} already exists. Try `saiel login` instead")
        }
        Err(e) => Err(e.into()),
    }
}

fn cli_login<S: Storage>(store: &mut LocalStore<S>, email: &str, password: &str) -> Result<()> {
    let problems = validate_login(email, password);
    if let Some(first) = problems.first() {
        bail!("{}", first.message);
    }
    let user = store.login_user(email, password)?;
    println!("Signed in as {} ({})", user.full_name(), user.email);
    Ok(())
}

fn cli_whoami<S: Storage>(store: &LocalStore<S>) -> Result<()> {
    match store.current_user() {
        Some(user) => {
            println!("[{}] {}", user.initials(), user.full_name());
            println!("  Email:       {}", user.email);
            println!("  Member since {}", user.created_at);
            println!("  Last login   {}", user.last_login);
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

fn cli_stats<S: Storage>(store: &LocalStore<S>) -> Result<()> {
    let stats = store.user_stats();
    println!("Users:            {}", stats.total_users);
    println!("Promo opt-ins:    {}", stats.promotional_opt_ins);
    println!("Opt-in rate:      {}%", stats.opt_in_rate);
    Ok(())
}

fn cli_demo<S: Storage>(store: &mut LocalStore<S>, login: Option<usize>) -> Result<()> {
    let added = store.create_demo_accounts();
    if added.is_empty() {
        println!("Demo accounts already exist");
    } else {
        println!("Created {} demo accounts:", added.len());
        for user in &added {
            println!("  {:<24} password: {}", user.email, user.password);
        }
    }

    if let Some(number) = login {
        let user = store.login_demo(number)?;
        println!("Signed in as {}", user.email);
    }
    Ok(())
}

fn require_user<S: Storage>(store: &LocalStore<S>) -> Result<UserRecord> {
    store
        .current_user()
        .ok_or_else(|| anyhow::anyhow!("Not signed in. Run `saiel login` first"))
}

fn cli_budget<S: Storage>(
    action: BudgetCommand,
    store: &mut LocalStore<S>,
    config: &Config,
) -> Result<()> {
    let user = require_user(store)?;
    let now = std::time::Instant::now();

    match action {
        BudgetCommand::Show {
            period,
            search,
            page,
        } => {
            let (month, year) = period.resolve()?;
            match store.get_budget(&user.id, month, year) {
                Some(_) => {
                    let editor =
                        BudgetEditor::open(store, &user.id, month, year, config.autosave_delay, now);
                    print_budget(&editor, &search, page);
                    editor.close();
                }
                None => println!("No budget for {month} {year}"),
            }
            Ok(())
        }
        BudgetCommand::Add { name, period } => {
            let (month, year) = period.resolve()?;
            let mut editor =
                BudgetEditor::open(store, &user.id, month, year, config.autosave_delay, now);
            match editor.add_category(&name, now) {
                Some(id) => println!("Added category {id}: {}", name.trim()),
                None => println!("Category name is empty; nothing added"),
            }
            editor.flush(store);
            Ok(())
        }
        BudgetCommand::Set {
            id,
            field,
            value,
            period,
        } => {
            let field = AmountField::parse(&field)
                .ok_or_else(|| anyhow::anyhow!("Field must be `budgeted` or `spent`, got {field}"))?;
            let (month, year) = period.resolve()?;
            let mut editor =
                BudgetEditor::open(store, &user.id, month, year, config.autosave_delay, now);
            if !editor.update_field(id, field, &value, now) {
                editor.close();
                bail!("No category with id {id} in {month} {year}");
            }
            if let Some(cat) = BudgetCategory::find_by_id(editor.categories(), id) {
                println!(
                    "{}: {field} updated. Budgeted {}, spent {}, remaining {}",
                    cat.name,
                    format_amount(cat.budgeted),
                    format_amount(cat.spent),
                    format_amount(cat.remaining)
                );
            }
            editor.flush(store);
            Ok(())
        }
        BudgetCommand::Remove { id, period } => {
            let (month, year) = period.resolve()?;
            let mut editor =
                BudgetEditor::open(store, &user.id, month, year, config.autosave_delay, now);
            if !editor.delete_category(id, now) {
                editor.close();
                bail!("No category with id {id} in {month} {year}");
            }
            editor.flush(store);
            println!("Removed category {id}");
            Ok(())
        }
        BudgetCommand::Delete { period } => {
            let (month, year) = period.resolve()?;
            store.delete_budget(&user.id, month, year);
            println!("Deleted budget for {month} {year}");
            Ok(())
        }
        BudgetCommand::Summary => {
            cli_summary(store, &user);
            Ok(())
        }
        BudgetCommand::Export { path, period } => {
            let (month, year) = period.resolve()?;
            let doc = store
                .get_budget(&user.id, month, year)
                .ok_or_else(|| anyhow::anyhow!("No budget for {month} {year}"))?;
            let output_path = path.map(|p| shellexpand(&p)).unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
                format!("{home}/saiel-budget-{year}-{:02}.csv", month.number())
            });
            let count = export_budget(&doc, std::path::Path::new(&output_path))
                .with_context(|| format!("Export to {output_path} failed"))?;
            println!("Exported {count} categories to {output_path}");
            Ok(())
        }
        BudgetCommand::Edit { period } => {
            let (month, year) = period.resolve()?;
            super::repl::edit_budget(store, &user, month, year, config.autosave_delay)
        }
    }
}

pub(super) fn print_budget(editor: &BudgetEditor, search: &str, page: usize) {
    let (month, year) = editor.period();
    let (rows, pages) = editor.page(search, page);

    println!("Budget — {month} {year}");
    println!("{}", "─".repeat(62));
    println!(
        "{:<6} {:<20} {:>11} {:>11} {:>11}",
        "ID", "Category", "Budgeted", "Spent", "Remaining"
    );
    for cat in &rows {
        println!(
            "{:<6} {:<20} {:>11} {:>11} {:>11}",
            cat.id,
            truncate(&cat.name, 20),
            format_amount(cat.budgeted),
            format_amount(cat.spent),
            format_amount(cat.remaining)
        );
    }
    if rows.is_empty() {
        println!("  (no categories)");
    }
    println!("{}", "─".repeat(62));

    let (budgeted, spent, remaining) = editor.totals();
    println!(
        "{:<27} {:>11} {:>11} {:>11}",
        "Total",
        format_amount(budgeted),
        format_amount(spent),
        format_amount(remaining)
    );
    if pages > 1 {
        println!("Page {} of {pages}", page.max(1));
    }
}

fn cli_summary<S: Storage>(store: &LocalStore<S>, user: &UserRecord) {
    let summaries = store.budget_summary(&user.id);
    if summaries.is_empty() {
        println!("No budgets yet");
        return;
    }

    println!(
        "{:<16} {:>5} {:>12} {:>12} {:>12}  Last modified",
        "Month", "Cats", "Budgeted", "Spent", "Remaining"
    );
    println!("{}", "─".repeat(86));
    for s in &summaries {
        println!(
            "{:<16} {:>5} {:>12} {:>12} {:>12}  {}",
            s.key,
            s.categories_count,
            format_amount(s.total_budgeted),
            format_amount(s.total_spent),
            format_amount(s.remaining),
            s.last_modified
        );
    }
    println!("{} budgets", summaries.len());
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
