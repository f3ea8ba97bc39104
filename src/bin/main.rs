//! Walletdash CLI - one-shot wallet views
//!
//!   walletdash derive <key>          → identity (address, public key)
//!   walletdash show <key>            → identity + balance, utxos, history, pending
//!   walletdash export <key> --out .  → write transaction.json for the pending tx
//!   walletdash send <key> --to A --amount 0.1 [--coin BTC] ...
//!                                    → record transfer lines locally (no broadcast)
//!
//! The key can also come from WALLETDASH_KEY. Explorer endpoints come from
//! WALLETDASH_* variables (see `WalletConfig::from_env`), or `--explorer <url>`.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info};
use walletdash::logging::init_logging;
use walletdash::{identity, SendField, WalletConfig, WalletController};

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("walletdash {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("derive") => cmd_derive(&opts),
        Some("show") => cmd_show(&opts),
        Some("export") => cmd_export(&opts),
        Some("send") => cmd_send(&opts),
        Some(cmd) => Err(format!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = opts.pretty || (!opts.json && std::io::stdout().is_terminal());
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": e}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"render: {}\"}}", e))
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    key: Option<String>,
    explorer: Option<String>,
    out: Option<String>,
    // send line fields in command-line order; the nth value of a field goes to line n
    send_fields: Vec<(SendField, String)>,
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        // Load .env file if present
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.trim().trim_matches('"');
                    if !value.is_empty() && env::var(key.trim()).is_err() {
                        env::set_var(key.trim(), value);
                    }
                }
            }
        }

        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let next = args.get(i + 1).cloned();
            let mut takes_value = true;
            match arg.as_str() {
                "--help" | "-h" => { opts.help = true; takes_value = false; }
                "--version" | "-V" => { opts.version = true; takes_value = false; }
                "--json" => { opts.json = true; takes_value = false; }
                "--pretty" => { opts.pretty = true; takes_value = false; }
                "--key" | "-k" => opts.key = next,
                "--explorer" | "-e" => opts.explorer = next,
                "--out" | "-o" => opts.out = next,
                _ if arg.starts_with("--") && SendField::from_str(&arg[2..]).is_some() => {
                    opts.send_fields.extend(SendField::from_str(&arg[2..]).zip(next));
                }
                _ if !arg.starts_with('-') => { positional.push(arg.clone()); takes_value = false; }
                _ => takes_value = false, // Ignore unknown flags
            }
            i += if takes_value { 2 } else { 1 };
        }

        // First positional is command, second is the key
        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        if opts.key.is_none() && !positional.is_empty() {
            opts.key = Some(positional.remove(0));
        }

        // Environment is lower priority than CLI args
        if opts.key.is_none() {
            opts.key = env::var("WALLETDASH_KEY").ok().filter(|s| !s.is_empty());
        }
        if opts.explorer.is_none() {
            opts.explorer = env::var("WALLETDASH_EXPLORER").ok().filter(|s| !s.is_empty());
        }

        opts
    }

    fn key(&self) -> Result<&str, String> {
        self.key.as_deref().ok_or_else(|| "No key given (argument, --key or WALLETDASH_KEY)".to_string())
    }
}

fn print_usage() {
    println!(
        r#"walletdash - wallet dashboard

USAGE:
    walletdash <command> [key] [options]

COMMANDS:
    derive <key>            Derive address and public key (no network)
    show <key>              Recover wallet and load balance, utxos, history, pending
    export <key>            Write transaction.json for the pending transaction
    send <key>              Record transfer lines locally (nothing is broadcast)

KEY:
    WIF (starts with 5, K or L) or 64 hex characters.
    --key, -k <key>         Alternative to the positional key (env: WALLETDASH_KEY)

OPTIONS:
    --explorer, -e <url>    Base URL for all explorer endpoints (env: WALLETDASH_EXPLORER)
    --out, -o <dir>         Export directory (default: .)
    --to, --recipient <addr> Send line recipient (repeat per line)
    --amount <btc>          Send line amount (repeat per line)
    --coin <sym>            Send line coin: BTC|ETH|USDT|LTC|WBTC (default: BTC)

OUTPUT OPTIONS:
    --json                  Raw JSON output
    --pretty                Pretty-print JSON
    --version, -V           Print version

ENVIRONMENT:
    WALLETDASH_BALANCE_URL  Balance endpoint
    WALLETDASH_UTXO_URL     Unspent outputs endpoint
    WALLETDASH_ACCOUNT_URL  Account / history endpoint
    WALLETDASH_TIMEOUT_SECS HTTP timeout (default: 10)
    WALLETDASH_LOG_JSON=1   JSON logs on stderr

EXAMPLES:
    walletdash derive 0000000000000000000000000000000000000000000000000000000000000001
    walletdash show --key "$KEY" --json | jq .balance
    walletdash send "$KEY" --to 1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH --amount 0.5
"#
    );
}

fn load_config(opts: &ParsedArgs) -> Result<WalletConfig, String> {
    let config = WalletConfig::from_env().map_err(|e| e.to_string())?;
    Ok(match opts.explorer.as_deref() {
        Some(base) => config.with_base_url(base),
        None => config,
    })
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("Failed to create runtime: {}", e))
}

/// Recover the key and run the initial load.
fn open_wallet(opts: &ParsedArgs, rt: &tokio::runtime::Runtime) -> Result<WalletController, String> {
    let config = load_config(opts)?;
    debug!(?config, "explorer config");
    let controller = WalletController::from_config(config).map_err(|e| e.to_string())?;
    rt.block_on(controller.recover(opts.key()?)).map_err(|e| e.to_string())?;
    Ok(controller)
}

fn cmd_derive(opts: &ParsedArgs) -> Result<Value, String> {
    let identity = identity::recover(opts.key()?).map_err(|e| e.to_string())?;
    serde_json::to_value(&identity).map_err(|e| e.to_string())
}

fn cmd_show(opts: &ParsedArgs) -> Result<Value, String> {
    let rt = runtime()?;
    let controller = open_wallet(opts, &rt)?;
    serde_json::to_value(controller.snapshot()).map_err(|e| e.to_string())
}

fn cmd_export(opts: &ParsedArgs) -> Result<Value, String> {
    let rt = runtime()?;
    let controller = open_wallet(opts, &rt)?;
    let payload = controller.export_pending().map_err(|e| e.to_string())?;
    let dir = PathBuf::from(opts.out.as_deref().unwrap_or("."));
    let path = payload.write_to_dir(&dir).map_err(|e| e.to_string())?;
    info!(path = %path.display(), "pending transaction exported");
    Ok(json!({"exported": path.display().to_string()}))
}

fn cmd_send(opts: &ParsedArgs) -> Result<Value, String> {
    let count = |wanted: SendField| opts.send_fields.iter().filter(|(field, _)| *field == wanted).count();
    let (lines, amounts) = (count(SendField::Recipient), count(SendField::Amount));
    if lines == 0 {
        return Err("send needs at least one --to".into());
    }
    if lines != amounts {
        return Err(format!("{} --to but {} --amount", lines, amounts));
    }

    let rt = runtime()?;
    let controller = open_wallet(opts, &rt)?;
    for _ in 1..lines {
        controller.add_send_item();
    }
    let mut next_line: HashMap<SendField, usize> = HashMap::new();
    for (field, value) in &opts.send_fields {
        let index = next_line.entry(*field).or_insert(0);
        controller.update_send_item(*index, *field, value.as_str()).map_err(|e| e.to_string())?;
        *index += 1;
    }
    let recorded = controller.submit_transfer().map_err(|e| e.to_string())?;
    Ok(json!({"broadcast": false, "recorded": recorded}))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ParsedArgs {
        ParsedArgs::parse(&args.iter().map(|a| a.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_send_flags_map_to_fields() {
        let opts = parse(&["send", "KEY", "--to", "a1", "--amount", "0.1", "--recipient", "a2", "--coinType", "LTC", "--amount", "2"]);
        assert_eq!(opts.command.as_deref(), Some("send"));
        assert_eq!(opts.key.as_deref(), Some("KEY"));
        assert_eq!(
            opts.send_fields,
            vec![
                (SendField::Recipient, "a1".to_string()),
                (SendField::Amount, "0.1".to_string()),
                (SendField::Recipient, "a2".to_string()),
                (SendField::Coin, "LTC".to_string()),
                (SendField::Amount, "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_flags_are_not_send_fields() {
        let opts = parse(&["send", "KEY", "--memo", "x", "--to", "a1"]);
        assert_eq!(opts.send_fields, vec![(SendField::Recipient, "a1".to_string())]);
    }
}
