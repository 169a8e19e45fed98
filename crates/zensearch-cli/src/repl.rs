//! Interactive search shell.
//!
//! By default we use `rustyline` for line editing, history and tab completion.
//! A minimal stdin-based fallback exists behind `--no-default-features`.

use anyhow::{anyhow, Result};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use zensearch_core::{describe_fields, EntityKind, SearchContext};

use crate::query::{parse_search_input, SearchQuery, SEARCH_FORMAT};
use crate::render;

pub const PROMPT: &str = "search >> ";

const COMMANDS: [&str; 6] = ["help", "?", "fields", "stats", "exit", "quit"];

/// Everything a REPL line can touch. Built once after loading.
pub struct ReplState {
    ctx: SearchContext,
    json: bool,
}

impl ReplState {
    pub fn new(ctx: SearchContext, json: bool) -> Self {
        Self { ctx, json }
    }

    pub fn context(&self) -> &SearchContext {
        &self.ctx
    }

    /// Run one query and write its report to `out`.
    pub fn run_query(&self, query: &SearchQuery, out: &mut dyn Write) -> Result<usize> {
        let kind: EntityKind = query.kind.parse()?;
        let hits = self.ctx.query(kind, &query.field, &query.value)?;
        let results = self.ctx.materialize(&hits);
        let report = if self.json {
            render::render_json(&results)?
        } else {
            render::render_text(&results)
        };
        writeln!(out, "{report}")?;
        Ok(hits.len())
    }
}

pub fn cmd_repl(state: &ReplState) -> Result<()> {
    #[cfg(feature = "repl-rustyline")]
    {
        return cmd_repl_rustyline(state);
    }
    #[cfg(not(feature = "repl-rustyline"))]
    {
        return cmd_repl_simple(state);
    }
}

/// Run REPL lines from a script file (`-` for stdin) followed by `commands`.
pub fn cmd_repl_script(
    state: &ReplState,
    script: Option<&Path>,
    commands: &[String],
    continue_on_error: bool,
    quiet: bool,
) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();

    if let Some(script_path) = script {
        let text = if script_path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            fs::read_to_string(script_path)
                .map_err(|e| anyhow!("failed to read script {}: {e}", script_path.display()))?
        };
        lines.extend(text.lines().map(str::to_string));
    }
    lines.extend(commands.iter().cloned());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (idx, raw_line) in lines.iter().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !quiet {
            writeln!(out, "{PROMPT}{line}")?;
        }

        match dispatch_repl_line_result(state, line, &mut out) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => {
                if continue_on_error {
                    print_error(&e);
                } else {
                    return Err(anyhow!("repl script failed at line {}: {e}", idx + 1));
                }
            }
        }
    }

    Ok(())
}

fn print_banner() {
    println!("{}", "Zensearch".green().bold());
    println!("Search format: {SEARCH_FORMAT}");
    println!("Type `help` for commands. Type `exit` to quit.\n");
}

fn print_error(e: &anyhow::Error) {
    eprintln!("{} {e}", "Error:".red().bold());
}

#[cfg(not(feature = "repl-rustyline"))]
fn cmd_repl_simple(state: &ReplState) -> Result<()> {
    print_banner();

    let stdin = io::stdin();
    loop {
        print!("{}", PROMPT.cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match dispatch_repl_line_result(state, line, &mut io::stdout()) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => print_error(&e),
        }
    }

    Ok(())
}

#[cfg(feature = "repl-rustyline")]
fn cmd_repl_rustyline(state: &ReplState) -> Result<()> {
    use rustyline::error::ReadlineError;
    use rustyline::Editor;

    print_banner();

    let helper = ReplLineHelper::new(CompletionData::build());
    let mut rl: Editor<ReplLineHelper, rustyline::history::DefaultHistory> =
        Editor::new().map_err(|e| anyhow!("failed to init rustyline: {e}"))?;
    rl.set_helper(Some(helper));

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        rl.add_history_entry(line)
            .map_err(|e| anyhow!("failed to record history: {e}"))?;

        match dispatch_repl_line_result(state, line, &mut io::stdout()) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => print_error(&e),
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum ReplControl {
    Continue,
    Exit,
}

fn dispatch_repl_line_result(
    state: &ReplState,
    line: &str,
    out: &mut dyn Write,
) -> Result<ReplControl> {
    let mut tokens = line.split_whitespace();
    let Some(cmd) = tokens.next() else {
        return Ok(ReplControl::Continue);
    };

    match cmd {
        "help" | "?" => {
            write!(out, "{}", help_text())?;
            Ok(ReplControl::Continue)
        }
        "exit" | "quit" => Ok(ReplControl::Exit),
        "stats" => {
            write!(out, "{}", render::render_stats(&state.ctx.stats()))?;
            Ok(ReplControl::Continue)
        }
        "fields" => {
            let kinds = match tokens.next() {
                Some(token) => vec![token.to_lowercase().parse::<EntityKind>()?],
                None => EntityKind::ALL.to_vec(),
            };
            write!(out, "{}", render::render_fields(&kinds))?;
            Ok(ReplControl::Continue)
        }
        _ => {
            let query = parse_search_input(line)?;
            state.run_query(&query, out)?;
            Ok(ReplControl::Continue)
        }
    }
}

fn help_text() -> String {
    format!(
        "\
Search format: {SEARCH_FORMAT}
  searchtype   org | user | ticket
  searchfield  a field name, e.g. Name or ExternalID (see `fields`)
  search value everything after the field; leave empty to find blank values

Commands:
  help, ?            show this message
  fields [kind]      list searchable fields and their types
  stats              collection and index sizes
  exit, quit         leave the shell

Examples:
  org Name Enthaze
  user Active true
  ticket Tags Ohio
"
    )
}

// ============================================================================
// Completion
// ============================================================================

#[derive(Debug, Default)]
struct CompletionData {
    commands: Vec<String>,
    kinds: Vec<String>,
    fields: BTreeMap<String, Vec<String>>,
}

impl CompletionData {
    fn build() -> Self {
        let kinds: Vec<String> = EntityKind::ALL.iter().map(|k| k.token().to_string()).collect();
        let mut commands: Vec<String> = COMMANDS.iter().map(|c| c.to_string()).collect();
        commands.extend(kinds.iter().cloned());
        let fields = EntityKind::ALL
            .iter()
            .map(|&k| {
                let names = describe_fields(k).iter().map(|f| f.name.to_string()).collect();
                (k.token().to_string(), names)
            })
            .collect();
        Self {
            commands,
            kinds,
            fields,
        }
    }

    /// Replacement start and candidates for the word ending at `pos`.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let start = line[..pos]
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];
        let tokens: Vec<&str> = line[..start].split_whitespace().collect();

        let pool: &[String] = match tokens.as_slice() {
            [] => self.commands.as_slice(),
            ["fields"] => self.kinds.as_slice(),
            [kind] => match self.fields.get(&kind.to_lowercase()) {
                Some(names) => names.as_slice(),
                None => &[],
            },
            _ => &[],
        };
        let matches = pool
            .iter()
            .filter(|item| item.starts_with(word))
            .cloned()
            .collect();
        (start, matches)
    }
}

#[cfg(feature = "repl-rustyline")]
struct ReplLineHelper {
    data: CompletionData,
}

#[cfg(feature = "repl-rustyline")]
impl ReplLineHelper {
    fn new(data: CompletionData) -> Self {
        Self { data }
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::Helper for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::highlight::Highlighter for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::hint::Hinter for ReplLineHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::validate::Validator for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::completion::Completer for ReplLineHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, items) = self.data.candidates(line, pos);
        let pairs = items
            .into_iter()
            .map(|item| rustyline::completion::Pair {
                display: item.clone(),
                replacement: item,
            })
            .collect();
        Ok((start, pairs))
    }
}
