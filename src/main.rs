//! gremlin-fsck CLI - consistency checks over a resource graph dump
//!
//! Usage: gremlin-fsck <command> [arguments]

mod list_cmd;
mod run_cmd;

use std::path::PathBuf;
use std::process::ExitCode;

use gremlin_fsck::{FsckConfig, OutputFormat, DEFAULT_GREMLIN_SERVER, DEFAULT_ZK_SERVER};

fn print_usage() {
    eprintln!("gremlin-fsck - Consistency checks for a cloud resource graph");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  gremlin-fsck <command> [arguments]");
    eprintln!("  gremlin-fsck --help");
    eprintln!();
    eprintln!("  gremlin-fsck run --graph <FILE> [--checks <NAME,...>] [--output <FORMAT>] [--server <ADDR>] [--zk-server <ADDR>]");
    eprintln!("  gremlin-fsck list");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run     Run consistency checks against a graph dump");
    eprintln!("  list    List registered checks");
    eprintln!();
    eprintln!("Global arguments:");
    eprintln!("  --output <FORMAT>   Output format: human (default) or json (one line per check)");
    eprintln!();
    eprintln!("Run arguments:");
    eprintln!("  --graph <FILE>      Path to resource graph dump (JSON)");
    eprintln!("  --checks <NAMES>    Comma-separated check names (default: all)");
    eprintln!(
        "  --server <ADDR>     Gremlin server address (default: {})",
        DEFAULT_GREMLIN_SERVER
    );
    eprintln!(
        "  --zk-server <ADDR>  Zookeeper server address (default: {})",
        DEFAULT_ZK_SERVER
    );
}

enum Command {
    Run {
        graph_path: PathBuf,
        checks: Option<Vec<String>>,
        config: FsckConfig,
    },
    List,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args[0].as_str() {
        "list" => Ok(Command::List),
        "run" => {
            let mut graph_path: Option<PathBuf> = None;
            let mut checks: Option<Vec<String>> = None;
            let mut output_format = OutputFormat::Human;
            let mut gremlin_server = DEFAULT_GREMLIN_SERVER.to_string();
            let mut zk_server = DEFAULT_ZK_SERVER.to_string();

            let mut i = 1;
            while i < args.len() {
                match args[i].as_str() {
                    "--graph" => {
                        graph_path = Some(PathBuf::from(flag_value(args, &mut i, "--graph")?));
                    }
                    "--checks" => {
                        checks = Some(
                            flag_value(args, &mut i, "--checks")?
                                .split(',')
                                .map(|s| s.trim().to_string())
                                .filter(|s| !s.is_empty())
                                .collect(),
                        );
                    }
                    "--output" => {
                        let value = flag_value(args, &mut i, "--output")?;
                        output_format = OutputFormat::from_str(&value)
                            .ok_or_else(|| format!("invalid output format: {}", value))?;
                    }
                    "--server" => {
                        gremlin_server = flag_value(args, &mut i, "--server")?;
                    }
                    "--zk-server" => {
                        zk_server = flag_value(args, &mut i, "--zk-server")?;
                    }
                    other => return Err(format!("unknown argument: {}", other)),
                }
                i += 1;
            }

            let graph_path = graph_path.ok_or_else(|| "run requires --graph".to_string())?;
            Ok(Command::Run {
                graph_path,
                checks,
                config: FsckConfig {
                    output_format,
                    gremlin_server,
                    zk_server,
                },
            })
        }
        other => Err(format!("unknown command: {}", other)),
    }
}

fn flag_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        return ExitCode::from(2);
    }

    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage();
            return ExitCode::from(2);
        }
    };

    let result = match command {
        Command::Run {
            graph_path,
            checks,
            config,
        } => run_cmd::run(graph_path, checks, config),
        Command::List => list_cmd::run(),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
