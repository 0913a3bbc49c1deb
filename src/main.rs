use anyhow::Result;
use clap::{ArgAction, Parser};

mod api;
mod cmd;
mod credentials;
mod error;
mod http;
mod utils;

use api::Registry;
use cmd::ListArgs;
use error::CliError;

/// siaapi - call Sia daemon API endpoints from the command line
///
/// Path segments are joined into the request path and matched against the
/// known endpoint table; `--key value` flags become request parameters
/// (query string for GET, form body for POST).
///
///   siaapi <segment>... [--flag [value]]...
///
/// Reserved flags:
///   --method M        HTTP method (needed when a path has several endpoints)
///   --addr HOST:PORT  API address (default localhost:9980)
///   --useragent UA    User-Agent header (default Sia-Agent)
///   --apipassword PW  API password (default: SIA_API_PASSWORD or the apipassword file)
///
/// Switches (only before the first segment):
///   -v / -vv / -vvv   Increase log verbosity (stderr; SIAAPI_LOG overrides)
///   -q                Errors only
///   -l [-j]           List known endpoints (as JSON with -j)
///
/// Examples:
///   siaapi consensus
///   siaapi hostdb hosts ed25519:abcd
///   siaapi wallet siacoins --amount 1000 --destination 1234...
///   siaapi daemon settings --method GET
///
/// Exit codes: 0 success, 1 failure, 127 unknown or ambiguous endpoint.
#[derive(Parser, Debug)]
#[command(
    name = "siaapi",
    version,
    author,
    about = "siaapi - call Sia daemon API endpoints from the command line",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,

    /// Errors only
    #[arg(short)]
    quiet: bool,

    /// List known endpoints instead of sending a request
    #[arg(short = 'l')]
    list: bool,

    /// With -l: print JSON
    #[arg(short = 'j', requires = "list")]
    json: bool,

    /// Print help
    #[arg(short = 'h', action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,

    /// Path segments and --key value flags, passed through untouched
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    utils::init_logging(utils::derive_level(cli.verbose, cli.quiet));

    if let Err(err) = run(cli) {
        let code = err
            .downcast_ref::<CliError>()
            .map(CliError::exit_code)
            .unwrap_or(error::EXIT_FAILURE);
        eprintln!("error: {err}");
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let registry = Registry::sia();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        return cmd::execute_list(&registry, ListArgs { json: cli.json }, &mut out);
    }

    let client = http::default_client()?;
    cmd::execute_call(
        &registry,
        cli.tokens.as_slice(),
        &client,
        credentials::load_default_password,
        &mut out,
    )?;
    Ok(())
}
