//! Interactive workspace.
//!
//! The shell mirrors the admin layout: a sidebar of sections, a strip of
//! open tabs and, for the Users and Services tabs, a table the row
//! commands act on.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::str::FromStr;

use anyhow::Result;
use colored::Colorize;
use laundry_application::CrudController;
use laundry_core::auth::Credentials;
use laundry_core::catalog::{CatalogEntity, StatusFilter};
use laundry_core::export::ExportFormat;
use laundry_core::workspace::Section;
use laundry_infrastructure::export::write_artifact;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use strum::IntoEnumIterator;

use super::catalog::{print_outcome, print_visible};
use crate::context::AppContext;
use crate::prompt::read_password;
use crate::render;

const COMMANDS: &[&str] = &[
    "help", "tabs", "open", "close", "focus", "sidebar", "list", "refresh", "status", "search",
    "sort", "select", "show", "archive", "restore", "delete", "export", "stats", "whoami",
    "logout", "quit",
];

#[derive(Debug, Clone, PartialEq)]
enum Selection {
    Row(i64),
    All,
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Empty,
    Help,
    Quit,
    Tabs,
    Open(Section),
    Close(String),
    Focus(String),
    Sidebar(Option<bool>),
    List,
    Refresh,
    Status(StatusFilter),
    Search(String),
    Sort(String),
    Select(Selection),
    Show(i64),
    Archive(i64),
    Restore(i64),
    Delete(i64),
    Export(ExportFormat),
    Stats,
    Whoami,
    Logout,
    Invalid(String),
}

impl ShellCommand {
    /// Commands that show or change catalog data. Each one passes the auth
    /// gate first.
    fn needs_session(&self) -> bool {
        !matches!(
            self,
            ShellCommand::Empty
                | ShellCommand::Help
                | ShellCommand::Quit
                | ShellCommand::Tabs
                | ShellCommand::Close(_)
                | ShellCommand::Sidebar(_)
                | ShellCommand::Whoami
                | ShellCommand::Logout
                | ShellCommand::Invalid(_)
        )
    }
}

fn parse_id(arg: &str) -> std::result::Result<i64, String> {
    arg.parse()
        .map_err(|_| format!("Expected a numeric id, got '{}'", arg))
}

fn parse(line: &str) -> ShellCommand {
    let line = line.trim();
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };

    let with_id = |make: fn(i64) -> ShellCommand| match parse_id(arg) {
        Ok(id) => make(id),
        Err(e) => ShellCommand::Invalid(e),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        "tabs" => ShellCommand::Tabs,
        "open" => match Section::from_str(arg) {
            Ok(section) => ShellCommand::Open(section),
            Err(_) => ShellCommand::Invalid(format!("Unknown section '{}'", arg)),
        },
        "close" if !arg.is_empty() => ShellCommand::Close(arg.to_lowercase()),
        "focus" if !arg.is_empty() => ShellCommand::Focus(arg.to_lowercase()),
        "sidebar" => match arg {
            "" => ShellCommand::Sidebar(None),
            "on" | "open" => ShellCommand::Sidebar(Some(true)),
            "off" | "close" => ShellCommand::Sidebar(Some(false)),
            other => ShellCommand::Invalid(format!("Expected on/off, got '{}'", other)),
        },
        "list" => ShellCommand::List,
        "refresh" => ShellCommand::Refresh,
        "status" => match StatusFilter::from_str(arg) {
            Ok(status) => ShellCommand::Status(status),
            Err(_) => ShellCommand::Invalid("Expected all, active or archived".to_string()),
        },
        "search" => ShellCommand::Search(arg.to_string()),
        "sort" if !arg.is_empty() => ShellCommand::Sort(arg.to_string()),
        "select" => match arg {
            "all" => ShellCommand::Select(Selection::All),
            "none" => ShellCommand::Select(Selection::Clear),
            _ => match parse_id(arg) {
                Ok(id) => ShellCommand::Select(Selection::Row(id)),
                Err(e) => ShellCommand::Invalid(e),
            },
        },
        "show" | "view" => with_id(ShellCommand::Show),
        "archive" => with_id(ShellCommand::Archive),
        "restore" => with_id(ShellCommand::Restore),
        "delete" => with_id(ShellCommand::Delete),
        "export" => match ExportFormat::from_str(if arg.is_empty() { "csv" } else { arg }) {
            Ok(format) => ShellCommand::Export(format),
            Err(_) => ShellCommand::Invalid("Expected csv, xlsx or pdf".to_string()),
        },
        "stats" => ShellCommand::Stats,
        "whoami" => ShellCommand::Whoami,
        "logout" => ShellCommand::Logout,
        other => ShellCommand::Invalid(format!("Unknown command '{}'. Type 'help'.", other)),
    }
}

fn print_help() {
    let lines = [
        ("tabs", "show open tabs"),
        ("open <section>", "open a sidebar section in a tab"),
        ("close <tab>", "close a tab (the dashboard stays)"),
        ("focus <tab>", "switch to an open tab"),
        ("sidebar [on|off]", "show or hide the section list"),
        ("list / refresh", "print / reload the table of the active tab"),
        ("status <filter>", "all, active or archived"),
        ("search <text>", "filter rows by name"),
        ("sort <column>", "sort ascending, descending, then unsorted"),
        ("select <id|all|none>", "toggle row selection"),
        ("show <id>", "show one record"),
        ("archive|restore|delete <id>", "row actions"),
        ("export [csv|xlsx|pdf]", "export the visible rows"),
        ("stats", "summary of the loaded rows"),
        ("whoami / logout / quit", ""),
    ];
    for (command, description) in lines {
        println!("  {:<28} {}", command.bright_cyan(), description.bright_black());
    }
}

/// rustyline helper: command completion, hints and highlighting.
#[derive(Clone)]
struct ShellHelper {
    commands: Vec<String>,
    sections: Vec<String>,
}

impl ShellHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
            sections: Section::iter().map(|s| s.id().to_string()).collect(),
        }
    }

    fn candidates<'a>(&'a self, line: &str) -> (usize, Vec<&'a String>) {
        match line.split_once(' ') {
            Some((verb, rest)) if matches!(verb, "open" | "close" | "focus") => (
                verb.len() + 1,
                self.sections
                    .iter()
                    .filter(|s| s.starts_with(rest.trim_start()))
                    .collect(),
            ),
            Some(_) => (0, Vec::new()),
            None => (
                0,
                self.commands.iter().filter(|c| c.starts_with(line)).collect(),
            ),
        }
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = self.candidates(&line[..pos]);
        let pairs = candidates
            .into_iter()
            .map(|c| Pair {
                display: c.clone(),
                replacement: c.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let verb = line.split_whitespace().next().unwrap_or_default();
        if self.commands.iter().any(|c| c == verb) {
            Owned(line.replacen(verb, &verb.bright_cyan().to_string(), 1))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() {
            return None;
        }
        let (start, candidates) = self.candidates(line);
        let typed = &line[start..];
        candidates
            .first()
            .filter(|c| c.len() > typed.trim_start().len())
            .map(|c| c[typed.trim_start().len()..].to_string())
    }
}

impl Validator for ShellHelper {}

type ShellEditor = Editor<ShellHelper, rustyline::history::DefaultHistory>;

/// Prompts for credentials until a login succeeds. `false` on Ctrl-C/Ctrl-D.
async fn sign_in(ctx: &AppContext, rl: &mut ShellEditor) -> bool {
    println!("{}", "Please sign in.".bright_yellow());
    loop {
        let Ok(email) = rl.readline("Email: ") else {
            return false;
        };
        let Some(password) = read_password("Password: ") else {
            return false;
        };
        let credentials = Credentials::new(email.trim(), password);
        match ctx.session.login(&credentials).await {
            Ok(profile) => {
                println!("{}", format!("Welcome, {}.", profile.name).bright_green());
                return true;
            }
            Err(e) => eprintln!("{}", e.user_message().red()),
        }
    }
}

async fn print_workspace(ctx: &AppContext) {
    let workspace = ctx.session.workspace().await;
    if workspace.sidebar_open() {
        let entries: Vec<String> = Section::iter().map(|s| s.id().to_string()).collect();
        println!("{} {}", "Sections:".bold(), entries.join(" | ").bright_black());
    }
    render::print_tabs(&workspace);
}

/// Loads the table the first time its tab is shown.
async fn ensure_loaded<E: CatalogEntity>(controller: &CrudController<E>) -> Result<()> {
    if controller.phase().await == laundry_application::LoadPhase::Idle {
        controller.fetch().await?;
    }
    Ok(())
}

/// Runs a row/table command against one screen's controller.
async fn table_command<E: CatalogEntity>(
    ctx: &AppContext,
    controller: &CrudController<E>,
    command: ShellCommand,
) -> Result<()> {
    match command {
        ShellCommand::List => {
            ensure_loaded(controller).await?;
            print_visible(controller).await;
        }
        ShellCommand::Refresh => {
            controller.fetch().await?;
            print_visible(controller).await;
        }
        ShellCommand::Status(status) => {
            controller.set_status_filter(status).await;
            controller.fetch().await?;
            print_visible(controller).await;
        }
        ShellCommand::Search(text) => {
            ensure_loaded(controller).await?;
            controller.with_table(|table| table.set_search(text)).await;
            print_visible(controller).await;
        }
        ShellCommand::Sort(column) => {
            ensure_loaded(controller).await?;
            controller
                .with_table(|table| table.toggle_sort(&column))
                .await?;
            print_visible(controller).await;
        }
        ShellCommand::Select(selection) => {
            ensure_loaded(controller).await?;
            controller
                .with_table(|table| match selection {
                    Selection::Row(id) => table.toggle_selected(id).map(|_| ()),
                    Selection::All => {
                        table.select_all_visible(true);
                        Ok(())
                    }
                    Selection::Clear => {
                        table.clear_selection();
                        Ok(())
                    }
                })
                .await?;
            print_visible(controller).await;
        }
        ShellCommand::Show(id) => {
            ensure_loaded(controller).await?;
            render::print_record(&controller.view(id).await?);
        }
        ShellCommand::Archive(id) => {
            let outcome = controller.archive(id).await?;
            print_outcome(outcome, format!("Archived {} #{}", E::LABEL, id));
        }
        ShellCommand::Restore(id) => {
            controller.restore(id).await?;
            println!("{}", format!("Restored {} #{}", E::LABEL, id).bright_green());
        }
        ShellCommand::Delete(id) => {
            let outcome = controller.delete_permanently(id).await?;
            print_outcome(outcome, format!("Deleted {} #{}", E::LABEL, id));
        }
        ShellCommand::Export(format) => {
            ensure_loaded(controller).await?;
            let artifact = controller
                .export(format, chrono::Local::now().date_naive())
                .await?;
            let path = write_artifact(&ctx.export_dir(None), &artifact)?;
            println!("{}", format!("Exported to {}", path.display()).bright_green());
        }
        ShellCommand::Stats => {
            ensure_loaded(controller).await?;
            println!("{}", controller.stats().await);
        }
        _ => {}
    }
    Ok(())
}

/// Handles one command. Returns `false` when the shell should exit.
async fn dispatch(ctx: &AppContext, rl: &mut ShellEditor, command: ShellCommand) -> Result<bool> {
    if command.needs_session() && !ctx.session.guard().await?.is_granted() {
        println!("{}", "Session ended. The command was not run.".yellow());
        if !sign_in(ctx, rl).await {
            return Ok(false);
        }
        print_workspace(ctx).await;
        return Ok(true);
    }

    match command {
        ShellCommand::Empty => {}
        ShellCommand::Quit => return Ok(false),
        ShellCommand::Help => print_help(),
        ShellCommand::Invalid(message) => eprintln!("{}", message.yellow()),
        ShellCommand::Tabs => print_workspace(ctx).await,
        ShellCommand::Open(section) => {
            ctx.session.open_section(section).await;
            print_workspace(ctx).await;
            match section {
                Section::Users => table_command(ctx, &ctx.users, ShellCommand::List).await?,
                Section::Services => {
                    table_command(ctx, &ctx.services, ShellCommand::List).await?
                }
                _ => {}
            }
        }
        ShellCommand::Close(id) => {
            if !ctx.session.remove_tab(&id).await {
                println!("{}", format!("Tab '{}' stays open.", id).bright_black());
            }
            print_workspace(ctx).await;
        }
        ShellCommand::Focus(id) => {
            ctx.session.set_active_tab(&id).await?;
            print_workspace(ctx).await;
        }
        ShellCommand::Sidebar(state) => {
            match state {
                Some(open) => ctx.session.set_sidebar_open(open).await,
                None => {
                    ctx.session.toggle_sidebar().await;
                }
            }
            print_workspace(ctx).await;
        }
        ShellCommand::Whoami => {
            if let Some(user) = ctx.session.current_user().await {
                println!("{} <{}> ({})", user.name.bold(), user.email, user.role);
            }
        }
        ShellCommand::Logout => {
            ctx.session.logout().await?;
            println!("{}", "Signed out.".bright_green());
            if !sign_in(ctx, rl).await {
                return Ok(false);
            }
            print_workspace(ctx).await;
        }
        table => {
            let section = ctx.session.workspace().await.active_section();
            match section {
                Some(Section::Users) => table_command(ctx, &ctx.users, table).await?,
                Some(Section::Services) => table_command(ctx, &ctx.services, table).await?,
                _ => println!(
                    "{}",
                    "This tab has no table. Open users or services.".bright_black()
                ),
            }
        }
    }
    Ok(true)
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut rl: ShellEditor = Editor::new()?;
    rl.set_helper(Some(ShellHelper::new()));

    println!("{}", "=== Laundry Admin ===".bright_magenta().bold());
    println!("{}", "Type 'help' for commands, 'quit' to exit.".bright_black());

    if !ctx.session.guard().await?.is_granted() && !sign_in(ctx, &mut rl).await {
        return Ok(());
    }
    print_workspace(ctx).await;

    loop {
        let active = ctx.session.workspace().await.active_tab().title.clone();
        match rl.readline(&format!("{}> ", active.to_lowercase())) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                match dispatch(ctx, &mut rl, parse(&line)).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
