/*!
`call.rs`

The default action: tokens -> one HTTP request -> response body on `out`.

Flow:
  1. parse tokens into a `ParsedCommand`
  2. resolve the endpoint (method filter when `--method` was given)
  3. credential: `--apipassword`, else the default loader
  4. build the request, dispatch, relay the body

The password is loaded only after resolution succeeds. An unknown path
exits 127 even when no password file exists, and `--apipassword` means the
file is never read.
*/

use reqwest::blocking::Client;
use std::io::Write;

use crate::api::Registry;
use crate::cmd::parse::parse_inputs;
use crate::error::CliError;
use crate::http::{RequestSpec, build_request, dispatch};

pub fn execute_call<S, F, W>(
    registry: &Registry<'_>,
    tokens: &[S],
    client: &Client,
    load_password: F,
    out: &mut W,
) -> Result<(), CliError>
where
    S: AsRef<str>,
    F: FnOnce() -> Result<String, CliError>,
    W: Write,
{
    let cmd = parse_inputs(tokens);
    let resolution = registry.resolve(&cmd.request_path, cmd.method.as_deref())?;
    if let Some(endpoint) = resolution.endpoint {
        log::debug!("resolved {} {}", endpoint.method, endpoint.path);
    }

    let password = match cmd.api_password {
        Some(password) => password,
        None => load_password()?,
    };

    let spec = RequestSpec {
        method: &resolution.method,
        api_address: &cmd.api_address,
        request_path: &resolution.request_path,
        api_password: &password,
        user_agent: &cmd.user_agent,
        params: &cmd.params,
    };
    let request = build_request(client, &spec, None)?;
    dispatch(client, request, out)?;
    Ok(())
}
