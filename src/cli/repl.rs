//! Interactive shell
//!
//! Reads commands from stdin, dispatches to the engine, and prints the
//! result. Command handlers return strings rather than printing, so
//! scripted tests can drive [`Repl::handle_line`] directly.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::engine::{Completion, TaskEngine};
use crate::query::{Filter, SortKey};
use crate::task::{TaskDraft, TaskId, TaskPatch, ValidationError};

use super::input::{tokenize, FieldParser, ParseMode};
use super::table;

const PROMPT: &str = "tmill> ";

/// What the loop should do after one line
pub enum ReplAction {
    /// Print the output (possibly empty) and keep reading
    Continue(String),
    /// Print the farewell and stop
    Quit(String),
}

/// The interactive command loop
pub struct Repl {
    engine: TaskEngine,
    mode: ParseMode,
    clock: Option<NaiveDateTime>,
}

impl Repl {
    /// Create a shell over a fresh engine
    pub fn new(mode: ParseMode, horizon_days: i64) -> Self {
        Self {
            engine: TaskEngine::new().with_horizon_days(horizon_days),
            mode,
            clock: None,
        }
    }

    /// Create a shell over an existing engine
    pub fn with_engine(engine: TaskEngine, mode: ParseMode) -> Self {
        Self {
            engine,
            mode,
            clock: None,
        }
    }

    /// Pin the reference clock instead of reading the wall clock
    pub fn with_clock(mut self, now: NaiveDateTime) -> Self {
        self.clock = Some(now);
        self
    }

    /// The engine behind the shell
    pub fn engine(&self) -> &TaskEngine {
        &self.engine
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Run the prompt loop until exit or EOF
    pub fn run(&mut self) -> Result<()> {
        println!(
            "taskmill {} - type 'help' for commands, 'exit' to leave",
            env!("CARGO_PKG_VERSION")
        );
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("{PROMPT}");
            io::stdout().flush()?;
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                println!();
                break;
            }
            match self.handle_line(&line) {
                ReplAction::Continue(output) => {
                    if !output.is_empty() {
                        println!("{output}");
                    }
                }
                ReplAction::Quit(message) => {
                    println!("{message}");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Dispatch a single command line
    pub fn handle_line(&mut self, line: &str) -> ReplAction {
        let tokens = tokenize(line);
        let Some((command, args)) = tokens.split_first() else {
            return ReplAction::Continue(String::new());
        };
        let command = command.to_lowercase();
        debug!(command = %command, "dispatch");

        let output = match command.as_str() {
            "add" => self.cmd_add(args),
            "list" => self.cmd_list(),
            "show" => self.cmd_show(args),
            "update" => self.cmd_update(args),
            "delete" => self.cmd_delete(args),
            "complete" => self.cmd_complete(args),
            "incomplete" => self.cmd_incomplete(args),
            "search" => self.cmd_search(args),
            "filter" => self.cmd_filter(args),
            "sort" => self.cmd_sort(args),
            "dump" => self.cmd_dump(),
            "help" => help_text(),
            "exit" | "quit" => return ReplAction::Quit("Goodbye!".to_string()),
            _ => format!("Unknown command '{command}'. Type 'help' for a list."),
        };
        ReplAction::Continue(output)
    }

    fn cmd_add(&mut self, args: &[String]) -> String {
        let Some(title) = args.first() else {
            return r#"Usage: add "<title>" ["<description>"] [priority] [tags] [due] [recurrence]"#
                .to_string();
        };

        let mut parser = FieldParser::new(self.mode);
        let mut draft = TaskDraft::new(title.clone());
        let parsed = (|| -> Result<(), ValidationError> {
            if let Some(description) = field(args, 1) {
                draft.description = description.to_string();
            }
            if let Some(raw) = field(args, 2) {
                draft.priority = parser.priority(raw)?;
            }
            if let Some(raw) = field(args, 3) {
                draft.tags = parser.tags(raw)?;
            }
            if let Some(raw) = field(args, 4) {
                draft.due_date = parser.due_date(raw)?;
            }
            if let Some(raw) = field(args, 5) {
                draft.recurrence = parser.recurrence(raw)?;
            }
            Ok(())
        })();

        if let Err(err) = parsed {
            return format!("Error: {err}");
        }

        let mut lines = notice_lines(&mut parser);
        match self.engine.create(draft) {
            Ok(task) => lines.push(format!("Added task #{}: {}", task.id, task.title)),
            Err(err) => lines.push(format!("Error: {err}")),
        }
        lines.join("\n")
    }

    fn cmd_list(&self) -> String {
        if self.engine.is_empty() {
            return "No tasks.".to_string();
        }

        let mut sections = Vec::new();
        let reminders = self.engine.reminders_at(self.now());
        let block = table::render_reminders(&reminders);
        if !block.is_empty() {
            sections.push(block);
        }
        sections.push(table::render_table(&self.engine.sorted_for_display()));
        sections.push(format!("Total: {} tasks", self.engine.len()));
        sections.join("\n\n")
    }

    fn cmd_show(&self, args: &[String]) -> String {
        let id = match parse_id(args) {
            Ok(id) => id,
            Err(message) => return format!("Error: {message}. Usage: show <id>"),
        };
        match self.engine.get(id) {
            None => format!("No task with id {id}."),
            Some(task) => {
                let reminder = self.engine.reminder(id, self.now());
                table::render_task_details(task, reminder.as_ref())
            }
        }
    }

    fn cmd_update(&mut self, args: &[String]) -> String {
        let id = match parse_id(args) {
            Ok(id) => id,
            Err(message) => {
                return format!(
                    "Error: {message}. Usage: update <id> [\"<title>\"] [\"<description>\"] \
                     [priority] [tags] [due] [recurrence] (\"\" keeps a value)"
                )
            }
        };
        if args.len() < 2 {
            return "Nothing to update: pass at least one field after the id.".to_string();
        }

        let mut parser = FieldParser::new(self.mode);
        let mut patch = TaskPatch::new();
        let parsed = (|| -> Result<(), ValidationError> {
            if let Some(title) = field(args, 1) {
                patch.title = Some(title.to_string());
            }
            if let Some(description) = field(args, 2) {
                patch.description = Some(description.to_string());
            }
            if let Some(raw) = field(args, 3) {
                patch.priority = Some(parser.priority(raw)?);
            }
            if let Some(raw) = field(args, 4) {
                patch.tags = Some(parser.tags(raw)?);
            }
            if let Some(raw) = field(args, 5) {
                // A lenient parse failure leaves the due date unpatched
                patch.due_date = parser.due_date(raw)?;
            }
            if let Some(raw) = field(args, 6) {
                patch.recurrence = Some(parser.recurrence(raw)?);
            }
            Ok(())
        })();

        if let Err(err) = parsed {
            return format!("Error: {err}");
        }

        let mut lines = notice_lines(&mut parser);
        match self.engine.update(id, patch) {
            Ok(Some(task)) => lines.push(format!("Updated task #{}: {}", task.id, task.title)),
            Ok(None) => lines.push(format!("No task with id {id}.")),
            Err(err) => lines.push(format!("Error: {err}")),
        }
        lines.join("\n")
    }

    fn cmd_delete(&mut self, args: &[String]) -> String {
        let id = match parse_id(args) {
            Ok(id) => id,
            Err(message) => return format!("Error: {message}. Usage: delete <id>"),
        };
        match self.engine.delete(id) {
            Some(task) => format!("Deleted task #{}: {}", task.id, task.title),
            None => format!("No task with id {id}."),
        }
    }

    fn cmd_complete(&mut self, args: &[String]) -> String {
        let id = match parse_id(args) {
            Ok(id) => id,
            Err(message) => return format!("Error: {message}. Usage: complete <id>"),
        };
        match self.engine.complete(id) {
            None => format!("No task with id {id}."),
            Some(Completion::Completed(task)) => {
                format!("Completed task #{}: {}", task.id, task.title)
            }
            Some(Completion::Recurred { completed, next }) => format!(
                "Completed task #{}: {}\nNext instance is #{}, due {}",
                completed.id,
                completed.title,
                next.id,
                table::format_due(next.due_date)
            ),
        }
    }

    fn cmd_incomplete(&mut self, args: &[String]) -> String {
        let id = match parse_id(args) {
            Ok(id) => id,
            Err(message) => return format!("Error: {message}. Usage: incomplete <id>"),
        };
        match self.engine.set_incomplete(id) {
            Some(task) => format!("Reopened task #{}: {}", task.id, task.title),
            None => format!("No task with id {id}."),
        }
    }

    fn cmd_search(&self, args: &[String]) -> String {
        if args.is_empty() {
            return "Usage: search <text>".to_string();
        }
        let query = args.join(" ");
        let hits = self.engine.search(&query);
        if hits.is_empty() {
            return format!("No tasks matching '{query}'.");
        }
        format!("{}\n\nFound: {} tasks", table::render_table(&hits), hits.len())
    }

    fn cmd_filter(&self, args: &[String]) -> String {
        let (Some(kind), Some(value)) = (args.first(), args.get(1)) else {
            return "Usage: filter <status|priority|tag> <value>".to_string();
        };
        let filter = match Filter::parse(kind, value) {
            Ok(filter) => filter,
            Err(err) => return format!("Error: {err}"),
        };
        let hits = self.engine.filter(&filter);
        if hits.is_empty() {
            return "No tasks match that filter.".to_string();
        }
        format!("{}\n\nFound: {} tasks", table::render_table(&hits), hits.len())
    }

    fn cmd_sort(&self, args: &[String]) -> String {
        let Some(raw) = args.first() else {
            return "Usage: sort <priority|title|status|due_date_priority>".to_string();
        };
        let key = match SortKey::parse(raw) {
            Ok(key) => key,
            Err(err) => return format!("Error: {err}"),
        };
        if self.engine.is_empty() {
            return "No tasks.".to_string();
        }
        format!(
            "Sorted by {}:\n\n{}",
            key.label(),
            table::render_table(&self.engine.sort(key))
        )
    }

    fn cmd_dump(&self) -> String {
        match serde_json::to_string_pretty(&self.engine.list_all()) {
            Ok(json) => json,
            Err(err) => format!("Error: {err}"),
        }
    }
}

/// Positional field access where `""` means "not given"
fn field(args: &[String], index: usize) -> Option<&str> {
    args.get(index).map(String::as_str).filter(|s| !s.is_empty())
}

fn parse_id(args: &[String]) -> Result<TaskId, String> {
    let Some(raw) = args.first() else {
        return Err("missing task id".to_string());
    };
    TaskId::parse(raw).ok_or_else(|| format!("invalid task id '{raw}'"))
}

fn notice_lines(parser: &mut FieldParser) -> Vec<String> {
    parser
        .take_notices()
        .into_iter()
        .map(|notice| format!("note: {notice}"))
        .collect()
}

fn help_text() -> String {
    [
        "Commands:",
        r#"  add "<title>" ["<description>"] [priority] [tags] [due] [recurrence]"#,
        r#"      e.g. add "File taxes" "federal and state" high finance,home "2025-04-15 17:00" none"#,
        "  list                          reminders plus all tasks by due date",
        "  show <id>                     full details for one task",
        "  update <id> [fields...]       same field order as add; \"\" keeps a value",
        "  delete <id>                   remove a task",
        "  complete <id>                 finish a task; recurring tasks schedule the next one",
        "  incomplete <id>               reopen a finished task",
        "  search <text>                 match in titles and descriptions",
        "  filter <kind> <value>         kind is status, priority, or tag",
        "  sort <key>                    priority, title, status, or due_date_priority",
        "  dump                          all tasks as JSON",
        "  help                          this text",
        "  exit | quit                   leave",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn output(repl: &mut Repl, line: &str) -> String {
        match repl.handle_line(line) {
            ReplAction::Continue(out) => out,
            ReplAction::Quit(out) => out,
        }
    }

    fn lenient() -> Repl {
        Repl::new(ParseMode::Lenient, 3).with_clock(at(2025, 6, 2, 12))
    }

    #[test]
    fn test_add_and_list() {
        let mut repl = lenient();
        let out = output(&mut repl, r#"add "File taxes" "" high finance"#);
        assert_eq!(out, "Added task #1: File taxes");

        let out = output(&mut repl, "list");
        assert!(out.contains("File taxes"));
        assert!(out.contains("Total: 1 tasks"));
    }

    #[test]
    fn test_empty_line_and_unknown_command() {
        let mut repl = lenient();
        assert_eq!(output(&mut repl, "   "), "");
        let out = output(&mut repl, "frobnicate");
        assert!(out.contains("Unknown command 'frobnicate'"));
    }

    #[test]
    fn test_quit_is_a_quit_action() {
        let mut repl = lenient();
        assert!(matches!(repl.handle_line("exit"), ReplAction::Quit(_)));
        assert!(matches!(repl.handle_line("quit"), ReplAction::Quit(_)));
    }

    #[test]
    fn test_lenient_add_coerces_bad_priority() {
        let mut repl = lenient();
        let out = output(&mut repl, r#"add "Loose" "" critical"#);
        assert!(out.contains("note: unknown priority 'critical', using medium"));
        assert!(out.contains("Added task #1: Loose"));

        let task = &repl.engine().list_all()[0];
        assert_eq!(task.priority, crate::task::Priority::Medium);
    }

    #[test]
    fn test_strict_add_rejects_bad_priority() {
        let mut repl = Repl::new(ParseMode::Strict, 3);
        let out = output(&mut repl, r#"add "Strict" "" critical"#);
        assert!(out.contains("Error: unknown priority 'critical'"));
        assert!(repl.engine().is_empty());
    }

    #[test]
    fn test_add_empty_title_is_an_engine_error() {
        let mut repl = lenient();
        let out = output(&mut repl, r#"add """#);
        assert!(out.contains("Error: task title must not be empty"));
        assert!(repl.engine().is_empty());
    }

    #[test]
    fn test_update_empty_string_keeps_value() {
        let mut repl = lenient();
        output(&mut repl, r#"add "Original" "keep this""#);
        let out = output(&mut repl, r#"update 1 "" "" low"#);
        assert!(out.contains("Updated task #1: Original"));

        let task = &repl.engine().list_all()[0];
        assert_eq!(task.title, "Original");
        assert_eq!(task.description, "keep this");
        assert_eq!(task.priority, crate::task::Priority::Low);
    }

    #[test]
    fn test_complete_recurring_announces_next_instance() {
        let mut repl = lenient();
        output(&mut repl, r#"add "Standup" "" "" "" "2025-06-02 09:00" daily"#);
        let out = output(&mut repl, "complete 1");
        assert!(out.contains("Completed task #1: Standup"));
        assert!(out.contains("Next instance is #2, due 2025-06-03 09:00"));
    }

    #[test]
    fn test_show_includes_reminder() {
        let mut repl = lenient();
        output(&mut repl, r#"add "Late" "" "" "" "2025-06-01 09:00""#);
        let out = output(&mut repl, "show 1");
        assert!(out.contains("Task #1: Late"));
        assert!(out.contains("overdue"));
    }

    #[test]
    fn test_show_unknown_id() {
        let mut repl = lenient();
        assert_eq!(output(&mut repl, "show 42"), "No task with id 42.");
        let out = output(&mut repl, "show nonsense");
        assert!(out.contains("invalid task id 'nonsense'"));
    }

    #[test]
    fn test_search_and_filter() {
        let mut repl = lenient();
        output(&mut repl, r#"add "Buy milk" "from the corner shop" low errands"#);
        output(&mut repl, r#"add "Write report" "" high work"#);

        let out = output(&mut repl, "search corner shop");
        assert!(out.contains("Buy milk"));
        assert!(out.contains("Found: 1 tasks"));

        let out = output(&mut repl, "filter tag work");
        assert!(out.contains("Write report"));

        let out = output(&mut repl, "filter color red");
        assert!(out.contains("Error: unknown filter 'color'"));
    }

    #[test]
    fn test_sort_command() {
        let mut repl = lenient();
        output(&mut repl, r#"add "banana""#);
        output(&mut repl, r#"add "Apple""#);

        let out = output(&mut repl, "sort title");
        assert!(out.starts_with("Sorted by title:"));
        let apple = out.find("Apple").unwrap();
        let banana = out.find("banana").unwrap();
        assert!(apple < banana);

        // The shorthand echoes the canonical key name
        let out = output(&mut repl, "sort due");
        assert!(out.starts_with("Sorted by due_date_priority:"));

        let out = output(&mut repl, "sort created");
        assert!(out.contains("Error: unknown sort key 'created'"));
    }

    #[test]
    fn test_dump_is_json() {
        let mut repl = lenient();
        output(&mut repl, r#"add "Serial" "" high"#);
        let out = output(&mut repl, "dump");
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["title"], "Serial");
        assert_eq!(parsed[0]["priority"], "high");
        assert_eq!(parsed[0]["completed"], false);
    }

    #[test]
    fn test_delete_and_incomplete() {
        let mut repl = lenient();
        output(&mut repl, r#"add "Here today""#);
        output(&mut repl, "complete 1");
        let out = output(&mut repl, "incomplete 1");
        assert!(out.contains("Reopened task #1"));

        let out = output(&mut repl, "delete 1");
        assert!(out.contains("Deleted task #1: Here today"));
        assert_eq!(output(&mut repl, "delete 1"), "No task with id 1.");
    }
}
