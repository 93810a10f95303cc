//! vbill command-line tools.
//!
//! Provides the `vbill` binary with subcommands for parsing utterances,
//! running a line-oriented till against a SQLite database, and browsing the
//! saved-bill history and the item catalog.
//!
//! Uses the same `BillingSession` as the HTTP server, so a line typed at the
//! till behaves exactly like a finalized transcript posted to `/utterances`.

use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use vbill_core::{Catalog, CommandParser};
use vbill_storage::traits::BillStore;
use vbill_storage::{BillingSession, SqliteStore};

const EXIT_OK: i32 = 0;
const EXIT_NOT_UNDERSTOOD: i32 = 1;
const EXIT_IO: i32 = 3;

/// Bilingual voice-billing tools.
#[derive(Parser)]
#[command(name = "vbill", about = "Bilingual (English / Tamil) billing assistant")]
struct Cli {
    /// Catalog JSON replacing the embedded one.
    #[arg(long, global = true, env = "VBILL_CATALOG_PATH")]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse an utterance and print the commands as JSON.
    Parse {
        /// The utterance, e.g. "add rice 2kg 120rs and remove dal".
        utterance: String,

        /// Also print why each dropped clause was dropped.
        #[arg(long)]
        explain: bool,
    },

    /// Read utterances from stdin, one per line, and apply them to a bill.
    Till {
        /// Path to the billing database file.
        #[arg(short, long, default_value = "vbill.db", env = "VBILL_DB_PATH")]
        db: String,
    },

    /// Print saved bills as JSON, most recent first.
    History {
        /// Path to the billing database file.
        #[arg(short, long, default_value = "vbill.db", env = "VBILL_DB_PATH")]
        db: String,
    },

    /// Print the categorized catalog.
    Catalog {
        /// Only show items with a surface form containing this term.
        #[arg(short, long)]
        search: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    let catalog = match load_catalog(cli.catalog.as_deref()) {
        Ok(catalog) => Arc::new(catalog),
        Err(msg) => {
            eprintln!("Error: {}", msg);
            process::exit(EXIT_IO);
        }
    };

    let exit_code = match cli.command {
        Commands::Parse { utterance, explain } => run_parse(catalog, &utterance, explain),
        Commands::Till { db } => run_till(catalog, &db),
        Commands::History { db } => run_history(&db),
        Commands::Catalog { search } => run_catalog(&catalog, search.as_deref()),
    };
    process::exit(exit_code);
}

fn load_catalog(path: Option<&str>) -> Result<Catalog, String> {
    let catalog = match path {
        Some(path) => {
            let document = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read catalog '{}': {}", path, e))?;
            Catalog::from_json(&document)
        }
        None => Catalog::builtin(),
    };
    catalog.map_err(|e| format!("failed to load catalog: {}", e))
}

fn print_json(value: &impl serde::Serialize) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: failed to encode output: {}", e);
            EXIT_IO
        }
    }
}

/// Execute the parse subcommand.
///
/// Returns exit code: 0 = parsed, 1 = nothing understood, 3 = I/O error.
fn run_parse(catalog: Arc<Catalog>, utterance: &str, explain: bool) -> i32 {
    let parser = CommandParser::new(catalog);

    if explain {
        let code = print_json(&parser.explain(utterance));
        if code != EXIT_OK {
            return code;
        }
    }

    match parser.parse(utterance) {
        Some(commands) => print_json(&commands),
        None => {
            eprintln!("Not understood: {}", utterance);
            EXIT_NOT_UNDERSTOOD
        }
    }
}

/// Execute the till subcommand.
///
/// Each stdin line is treated as a finalized transcript. Returns exit code:
/// 0 = stdin closed, 3 = storage or I/O error.
fn run_till(catalog: Arc<Catalog>, db_path: &str) -> i32 {
    let store = match SqliteStore::new(db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", db_path, e);
            return EXIT_IO;
        }
    };
    let mut session = match BillingSession::open(store, catalog) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to load history from '{}': {}", db_path, e);
            return EXIT_IO;
        }
    };
    tracing::info!(saved_bills = session.history().len(), "till opened");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error: failed to read stdin: {}", e);
                return EXIT_IO;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match session.handle_utterance(&line) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("Error: failed to save bill: {}", e);
                return EXIT_IO;
            }
        };

        let mut report = String::new();
        for notice in &outcome.notices {
            report.push_str(&format!("{}\n", notice));
        }
        for item in session.items() {
            report.push_str(&format!(
                "  {:<16} {:>8} {:<5} x {:>8.2} = {:>9.2}\n",
                item.name, item.quantity, item.unit, item.unit_price, item.line_total
            ));
        }
        report.push_str(&format!("  {:<43} {:>9.2}\n", "TOTAL", session.total()));

        if let Err(e) = stdout.write_all(report.as_bytes()).and_then(|_| stdout.flush()) {
            eprintln!("Error: failed to write output: {}", e);
            return EXIT_IO;
        }
    }

    EXIT_OK
}

/// Execute the history subcommand.
fn run_history(db_path: &str) -> i32 {
    let store = match SqliteStore::new(db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", db_path, e);
            return EXIT_IO;
        }
    };
    match store.list_bills() {
        Ok(bills) => print_json(&bills),
        Err(e) => {
            eprintln!("Error: failed to read history: {}", e);
            EXIT_IO
        }
    }
}

/// Execute the catalog subcommand.
fn run_catalog(catalog: &Catalog, search: Option<&str>) -> i32 {
    let categories = catalog.search(search.unwrap_or(""));
    if categories.is_empty() {
        eprintln!("No items match '{}'", search.unwrap_or(""));
        return EXIT_NOT_UNDERSTOOD;
    }

    let mut out = String::new();
    for category in &categories {
        match &category.native_name {
            Some(native) => out.push_str(&format!("{} ({})\n", category.name, native)),
            None => out.push_str(&format!("{}\n", category.name)),
        }
        for id in &category.items {
            let forms = catalog
                .forms_of(id)
                .map(|forms| forms.iter().skip(1).cloned().collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            if forms.is_empty() {
                out.push_str(&format!("  {}\n", id));
            } else {
                out.push_str(&format!("  {}: {}\n", id, forms));
            }
        }
    }
    print!("{}", out);
    EXIT_OK
}
