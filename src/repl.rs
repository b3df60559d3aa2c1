use crate::config::ExportFormat;
use crate::present::render_view;
use crate::workbench::driver::WorkbenchSession;
use crate::workbench::WorkbenchError;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  ask <question>     generate SQL for a question (plain text works too)
  sql <statement>    replace the editable SQL
  ack                acknowledge an unsafe statement
  run                execute the editable SQL
  show               print the current state
  schema [table]     list tables, or one table's columns
  export csv|json    write the current rows to the export directory
  reset              clear prompt, SQL and results
  help               this text
  quit               leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Sql(String),
    Ack,
    Run,
    Show,
    Schema(Option<String>),
    Export(ExportFormat),
    Reset,
    Help,
    Quit,
    Invalid(String),
}

/// Parses one input line. Blank lines yield `None`; anything that is not a
/// command is treated as a question.
pub fn parse_command(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "ask" if rest.is_empty() => ReplCommand::Invalid("usage: ask <question>".to_string()),
        "ask" => ReplCommand::Ask(rest.to_string()),
        "sql" => ReplCommand::Sql(rest.to_string()),
        "ack" => ReplCommand::Ack,
        "run" => ReplCommand::Run,
        "show" => ReplCommand::Show,
        "schema" if rest.is_empty() => ReplCommand::Schema(None),
        "schema" => ReplCommand::Schema(Some(rest.to_string())),
        "export" => match rest.to_ascii_lowercase().as_str() {
            "csv" => ReplCommand::Export(ExportFormat::Csv),
            "json" => ReplCommand::Export(ExportFormat::Json),
            _ => ReplCommand::Invalid("usage: export csv|json".to_string()),
        },
        "reset" => ReplCommand::Reset,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Ask(line.to_string()),
    };
    Some(command)
}

pub async fn run(session: WorkbenchSession) -> Result<(), Box<dyn std::error::Error>> {
    let target = session.target().await;
    println!("Connected to {}. Type `help` for commands.", target);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("sql> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };
        debug!("REPL command: {:?}", command);

        if command == ReplCommand::Quit {
            break;
        }
        if let Some(output) = dispatch(&session, command).await {
            println!("{}", output);
        }
    }

    info!("Leaving workbench");
    Ok(())
}

async fn dispatch(session: &WorkbenchSession, command: ReplCommand) -> Option<String> {
    let outcome = match command {
        ReplCommand::Ask(prompt) => session.ask(&prompt).await.map(|_| ()),
        ReplCommand::Sql(sql) => {
            session.edit_sql(&sql).await;
            Ok(())
        }
        ReplCommand::Ack => session.acknowledge().await,
        ReplCommand::Run => session.execute().await.map(|_| ()),
        ReplCommand::Show => Ok(()),
        ReplCommand::Schema(table) => return Some(describe_schema(session, table.as_deref()).await),
        ReplCommand::Export(format) => {
            return Some(match session.export(format).await {
                Ok(path) => format!("Wrote {}", path.display()),
                Err(e) => e.to_string(),
            });
        }
        ReplCommand::Reset => {
            session.reset().await;
            Ok(())
        }
        ReplCommand::Help => return Some(HELP.to_string()),
        ReplCommand::Quit => return None,
        ReplCommand::Invalid(usage) => return Some(usage),
    };

    let view = render_view(&session.view().await);
    match outcome {
        // Service failures already show up as the view's current error
        Err(WorkbenchError::GenerationFailed(_)) | Err(WorkbenchError::ExecutionFailed(_)) | Ok(()) => {
            Some(view)
        }
        Err(rejected) => Some(format!("{}\n{}", view, rejected)),
    }
}

async fn describe_schema(session: &WorkbenchSession, table: Option<&str>) -> String {
    let schema = session.load_schema().await;
    if schema.is_empty() {
        return "Schema unknown (no tables loaded)".to_string();
    }
    if let Some(table) = table {
        return match schema.columns(table) {
            Some(columns) => columns.join("\n"),
            None => format!("No table named '{}'", table),
        };
    }
    schema
        .tables
        .iter()
        .map(|(table, columns)| format!("{} ({})", table, columns.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single question from the command line, through the same gate as the REPL.
pub async fn run_once(
    session: WorkbenchSession,
    prompt: &str,
    execute: bool,
    acknowledge: bool,
    export: Option<ExportFormat>,
) -> Result<(), Box<dyn std::error::Error>> {
    let generated = session.ask(prompt).await;
    println!("{}", render_view(&session.view().await));
    generated?;

    if !execute {
        return Ok(());
    }
    if acknowledge {
        match session.acknowledge().await {
            Ok(()) | Err(WorkbenchError::NothingToAcknowledge) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let executed = session.execute().await;
    println!("{}", render_view(&session.view().await));
    executed?;

    if let Some(format) = export {
        let path = session.export(format).await?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
