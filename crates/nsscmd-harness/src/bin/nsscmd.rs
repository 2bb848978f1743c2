//! CLI entrypoint for exercising command-backed host resolution.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use nsscmd_core::resolve::{DEFAULT_BY_ADDR_COMMAND, DEFAULT_BY_NAME_COMMAND};
use nsscmd_harness::{HarnessError, LookupReport, RecordView};

/// Developer tooling for the command-backed hosts resolver.
#[derive(Debug, Parser)]
#[command(name = "nsscmd")]
#[command(about = "Exercise command-backed host resolution without installing the NSS module")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a host name through a resolver executable.
    ByName {
        /// Host name to pass to the resolver.
        host: String,
        /// Resolver executable; must satisfy the production trust rules.
        #[arg(long, default_value = DEFAULT_BY_NAME_COMMAND)]
        command: PathBuf,
        /// Encode into the tuple-list layout instead of the classic one.
        #[arg(long)]
        tuples: bool,
        /// Result buffer size in bytes, as an NSS caller would supply.
        #[arg(long, default_value_t = 1024)]
        buffer_size: usize,
        /// Emit the report as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
    /// Resolve an IPv4 address back to a name through a resolver executable.
    ByAddr {
        /// Address to pass to the resolver, dotted-quad.
        address: IpAddr,
        /// Resolver executable; must satisfy the production trust rules.
        #[arg(long, default_value = DEFAULT_BY_ADDR_COMMAND)]
        command: PathBuf,
        /// Result buffer size in bytes, as an NSS caller would supply.
        #[arg(long, default_value_t = 1024)]
        buffer_size: usize,
        /// Emit the report as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
    /// Parse resolver output from stdin and echo the canonical record.
    Parse {
        /// Emit the record as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
    /// Explain the trust gate verdict for an executable, production rules.
    Check {
        /// Executable to inspect.
        path: PathBuf,
        /// Emit the verdict as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::ByName { host, command, tuples, buffer_size, json } => {
            let report = if tuples {
                nsscmd_harness::lookup_by_name_tuples(&command, &host, buffer_size)
            } else {
                nsscmd_harness::lookup_by_name(&command, &host, buffer_size)
            };
            emit_lookup(report, json)?;
        }
        Command::ByAddr { address, command, buffer_size, json } => {
            let report = nsscmd_harness::lookup_by_addr(&command, address, buffer_size);
            emit_lookup(report, json)?;
        }
        Command::Parse { json } => {
            let text = nsscmd_harness::read_stdin()?;
            let view = nsscmd_harness::parse_text(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_record(&view);
            }
        }
        Command::Check { path, json } => {
            let report = nsscmd_harness::check_executable(&path);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.trusted {
                eprintln!("trusted: {}", report.path);
            } else {
                eprintln!(
                    "untrusted: {} (need owner uid {} mode {}, saw {})",
                    report.path,
                    report.required_owner_uid,
                    report.required_mode,
                    describe_observed(&report),
                );
            }
            if !report.trusted {
                return Err(HarnessError::Untrusted { path: report.path }.into());
            }
        }
    }
    Ok(())
}

fn emit_lookup(report: LookupReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(record) = &report.record {
        print_record(record);
    }
    if let Some(required) = report.required_size {
        eprintln!("{}; {required} bytes required", report.outcome);
    }
    report.into_result()?;
    Ok(())
}

/// Echoes a record in the resolver executables' own directive format.
fn print_record(view: &RecordView) {
    println!("name: {}", view.name);
    for alias in &view.aliases {
        println!("alias: {alias}");
    }
    for address in &view.addresses {
        println!("ip4: {address}");
    }
}

fn describe_observed(report: &nsscmd_harness::TrustReport) -> String {
    match (&report.owner_uid, &report.mode, &report.error) {
        (Some(uid), Some(mode), _) => format!("owner uid {uid} mode {mode}"),
        (_, _, Some(error)) => error.clone(),
        _ => "nothing".to_string(),
    }
}
