//! # Hardware Store Console
//!
//! A line-based interaction role. It reads commands from stdin, triggers workflows,
//! prints tables, and answers the forms and choosers that running workflows send.
//!
//! Usage: `hardware-store [config.json]`. Logs go to stderr (or the configured log file).
//! The snapshot is written when the console ends (`quit` or end of input).

use std::io;
use std::path::PathBuf;

use hardware_store::clients::ActionClient;
use hardware_store::config::Config;
use hardware_store::framework::{ChoiceReply, FieldPrompt, FormReply, InputRequest};
use hardware_store::lifecycle::{setup_tracing, StoreSystem};
use hardware_store::model::{Table, TableKind};
use hardware_store::workflow::{WorkflowError, WorkflowKind, WorkflowOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const CANCEL: &str = "!cancel";

const HELP: &str = "\
Commands:
  items | users | transactions      show a table
  search <text>                     items whose name contains <text>
  new item | new user | sale        create a record
  add quantity | delete item | update user
  cancel                            abort the running action
  help | quit
While a form is open: Enter keeps the shown value, !cancel aborts.
";

#[derive(Debug, PartialEq)]
enum Command {
    Trigger(WorkflowKind),
    Show(TableKind),
    Search(String),
    Cancel,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if let Some(term) = line.strip_prefix("search") {
        return Command::Search(term.trim().to_string());
    }
    match line.to_lowercase().as_str() {
        "new item" => Command::Trigger(WorkflowKind::CreateItem),
        "new user" => Command::Trigger(WorkflowKind::CreateUser),
        "sale" | "new transaction" => Command::Trigger(WorkflowKind::CreateTransaction),
        "add quantity" => Command::Trigger(WorkflowKind::AddQuantity),
        "delete item" => Command::Trigger(WorkflowKind::DeleteItem),
        "update user" => Command::Trigger(WorkflowKind::UpdateUser),
        "items" => Command::Show(TableKind::Items),
        "users" => Command::Show(TableKind::Users),
        "transactions" => Command::Show(TableKind::Transactions),
        "cancel" => Command::Cancel,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn render(table: &Table) -> String {
    let mut widths = table.headers.map(str::len);
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut out = line(table.headers.to_vec());
    out.push('\n');
    out.push_str(&"-".repeat(out.len().saturating_sub(1)));
    out.push('\n');
    for row in &table.rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    if table.rows.is_empty() {
        out.push_str("(empty)\n");
    }
    out
}

struct Console {
    lines: Lines<BufReader<Stdin>>,
    out: Stdout,
}

impl Console {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            out: tokio::io::stdout(),
        }
    }

    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }

    async fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim_end_matches('\r').to_string()))
    }

    async fn answer(&mut self, request: InputRequest) -> io::Result<()> {
        if request.is_abandoned() {
            debug!("Skipping input request of a finished workflow");
            return Ok(());
        }
        match request {
            InputRequest::Form {
                title,
                fields,
                respond_to,
            } => {
                let reply = self.fill_form(&title, fields).await?;
                let _ = respond_to.send(reply);
            }
            InputRequest::Choice {
                title,
                options,
                respond_to,
            } => {
                let reply = self.pick(&title, &options).await?;
                let _ = respond_to.send(reply);
            }
        }
        Ok(())
    }

    async fn fill_form(&mut self, title: &str, fields: Vec<FieldPrompt>) -> io::Result<FormReply> {
        self.say(&format!("== {title} ==\n")).await?;
        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            if let Some(message) = &field.error {
                self.say(&format!("  ! {message}\n")).await?;
            }
            self.say(&format!("{} [{}]: ", field.label, field.value)).await?;
            match self.read_line().await? {
                None => return Ok(FormReply::Cancel),
                Some(line) if line.trim() == CANCEL => return Ok(FormReply::Cancel),
                Some(line) if line.is_empty() => values.push(field.value),
                Some(line) => values.push(line),
            }
        }
        Ok(FormReply::Submit(values))
    }

    async fn pick(&mut self, title: &str, options: &[&'static str]) -> io::Result<ChoiceReply> {
        loop {
            self.say(&format!("== {title} ==\n")).await?;
            for (index, option) in options.iter().enumerate() {
                self.say(&format!("  {}) {option}\n", index + 1)).await?;
            }
            self.say("> ").await?;
            let Some(line) = self.read_line().await? else {
                return Ok(ChoiceReply::Cancel);
            };
            let line = line.trim();
            if line == CANCEL {
                return Ok(ChoiceReply::Cancel);
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(ChoiceReply::Selected(n - 1)),
                _ => self.say("  ! Please enter one of the listed numbers.\n").await?,
            }
        }
    }
}

async fn report(kind: WorkflowKind, handle: JoinHandle<Result<WorkflowOutcome, WorkflowError>>) {
    match handle.await {
        Ok(Ok(outcome)) => info!(workflow = kind.name(), ?outcome, "Action finished"),
        Ok(Err(e)) => error!(workflow = kind.name(), error = %e, "Action failed"),
        Err(e) => error!(workflow = kind.name(), "Action task failed: {:?}", e),
    }
}

async fn run_console(
    console: &mut Console,
    actions: &ActionClient,
    requests: &mut mpsc::Receiver<InputRequest>,
) -> io::Result<()> {
    console.say(HELP).await?;
    loop {
        tokio::select! {
            biased;
            Some(request) = requests.recv() => console.answer(request).await?,
            line = console.read_line() => {
                let Some(line) = line? else {
                    info!("End of input");
                    return Ok(());
                };
                match parse_command(&line) {
                    Command::Quit => return Ok(()),
                    Command::Help => console.say(HELP).await?,
                    Command::Show(kind) => match actions.table(kind).await {
                        Ok(table) => console.say(&render(&table)).await?,
                        Err(e) => console.say(&format!("  ! {e}\n")).await?,
                    },
                    Command::Search(term) => match actions.search_table(&term).await {
                        Ok(table) => console.say(&render(&table)).await?,
                        Err(e) => console.say(&format!("  ! {e}\n")).await?,
                    },
                    Command::Trigger(kind) => match actions.spawn(kind) {
                        Some(handle) => {
                            tokio::spawn(report(kind, handle));
                        }
                        None => console.say("  ! Another action is already running.\n").await?,
                    },
                    Command::Cancel => {
                        if !actions.cancel_active() {
                            console.say("  ! Nothing is running.\n").await?;
                        }
                    }
                    Command::Unknown(text) if text.is_empty() => {}
                    Command::Unknown(text) => {
                        warn!(command = %text, "Unknown command");
                        console.say("  ! Unknown command, type help.\n").await?;
                    }
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).map_err(|e| e.to_string())?;

    setup_tracing(&config);
    info!(snapshot = %config.snapshot_path.display(), "Starting hardware store");

    let (system, mut requests) = StoreSystem::start(&config);
    let actions = system.actions.clone();

    let mut console = Console::new();
    let result = run_console(&mut console, &actions, &mut requests).await;
    if let Err(e) = &result {
        error!(error = %e, "Console failed");
    }

    drop(actions);
    system.shutdown().await.map_err(|e| e.to_string())?;
    result.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("new item"), Command::Trigger(WorkflowKind::CreateItem));
        assert_eq!(parse_command("  Sale "), Command::Trigger(WorkflowKind::CreateTransaction));
        assert_eq!(parse_command("users"), Command::Show(TableKind::Users));
        assert_eq!(parse_command("search Claw Hammer"), Command::Search("Claw Hammer".into()));
        assert_eq!(parse_command("search"), Command::Search(String::new()));
        assert_eq!(parse_command("dance"), Command::Unknown("dance".into()));
    }

    #[test]
    fn test_render_pads_columns() {
        let table = Table {
            kind: TableKind::Transactions,
            headers: TableKind::Transactions.headers(),
            rows: vec![["A1B2C", "Tue Mar 05 14:07:09 UTC 2024", "3", "1", "2"].map(String::from)],
        };
        let text = render(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Item ID | Sale Date"));
        assert!(lines[2].starts_with("A1B2C   | Tue Mar 05"));
    }
}
