use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "record-store")]
#[command(about = "Read-only inspection of record-store database files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List user tables in a store file.
    Tables(TablesArgs),
    /// Show per-table column and row counts.
    Status(StatusArgs),
    /// Dump a table's rows as pretty JSON.
    Dump(DumpArgs),
}

#[derive(Debug, Args)]
struct TablesArgs {
    /// Path to the store database file.
    #[arg(long)]
    db: PathBuf,
}

#[derive(Debug, Args)]
struct StatusArgs {
    /// Path to the store database file.
    #[arg(long)]
    db: PathBuf,
    /// Emit JSON instead of a text table.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct DumpArgs {
    /// Path to the store database file.
    #[arg(long)]
    db: PathBuf,
    /// Table to dump.
    #[arg(long)]
    table: String,
    /// Maximum number of rows to print.
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TableStatus {
    table: String,
    columns: usize,
    rows: i64,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Tables(args) => run_tables(args),
        Command::Status(args) => run_status(args),
        Command::Dump(args) => run_dump(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn open(db: &PathBuf) -> Result<Connection, String> {
    if !db.exists() {
        return Err(format!("no such file: {}", db.display()));
    }
    Connection::open(db).map_err(|e| format!("failed to open {}: {e}", db.display()))
}

fn user_tables(conn: &Connection) -> Result<Vec<String>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .map_err(|e| e.to_string())?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    Ok(names)
}

fn run_tables(args: TablesArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    for name in user_tables(&conn)? {
        println!("{name}");
    }
    Ok(())
}

fn run_status(args: StatusArgs) -> Result<(), String> {
    let conn = open(&args.db)?;

    let mut statuses = Vec::new();
    for table in user_tables(&conn)? {
        let columns = record_store_sqlite::stored_column_count(&conn, &table)
            .map_err(|e| e.to_string())?;
        let rows: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .map_err(|e| e.to_string())?;
        statuses.push(TableStatus { table, columns, rows });
    }

    if args.json {
        let text = serde_json::to_string_pretty(&statuses).map_err(|e| e.to_string())?;
        println!("{text}");
    } else {
        println!("{:<32} {:>8} {:>8}", "TABLE", "COLUMNS", "ROWS");
        for s in &statuses {
            println!("{:<32} {:>8} {:>8}", s.table, s.columns, s.rows);
        }
    }
    Ok(())
}

fn run_dump(args: DumpArgs) -> Result<(), String> {
    let conn = open(&args.db)?;

    if !record_store_sqlite::table_exists(&conn, &args.table).map_err(|e| e.to_string())? {
        return Err(format!("no such table: {}", args.table));
    }

    let mut stmt = conn
        .prepare(&format!("SELECT rowid, * FROM {}", args.table))
        .map_err(|e| e.to_string())?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let rows = stmt
        .query_map([], |row| {
            let mut object = serde_json::Map::new();
            for (i, name) in columns.iter().enumerate() {
                let value: rusqlite::types::Value = row.get(i)?;
                object.insert(name.clone(), to_json(value));
            }
            Ok(serde_json::Value::Object(object))
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let limit = args.limit.unwrap_or(rows.len());
    let slice: Vec<_> = rows.into_iter().take(limit).collect();
    let text = serde_json::to_string_pretty(&slice).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn to_json(value: rusqlite::types::Value) -> serde_json::Value {
    use rusqlite::types::Value as Sql;
    match value {
        Sql::Null => serde_json::Value::Null,
        Sql::Integer(i) => serde_json::Value::from(i),
        Sql::Real(f) => serde_json::Value::from(f),
        Sql::Text(s) => serde_json::Value::String(s),
        Sql::Blob(bytes) => {
            serde_json::Value::String(bytes.iter().map(|b| format!("{b:02x}")).collect())
        }
    }
}
