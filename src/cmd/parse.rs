/*!
`parse.rs`

Turns the raw token list into a `ParsedCommand`.

Rules:
  - `--key [value]` is a flag; key is lower-cased, value is the next token
    unless that token is itself a `--` flag (then the value is empty)
  - reserved keys: method, addr, useragent, apipassword
  - every other key appends to the (multi-valued) parameter map
  - anything else appends `/<token>` to the request path
*/

use std::collections::BTreeMap;

pub const DEFAULT_API_ADDRESS: &str = "localhost:9980";
pub const DEFAULT_USER_AGENT: &str = "Sia-Agent";

/// Request parameters. Keys iterate sorted; values keep insertion order.
pub type Params = BTreeMap<String, Vec<String>>;

/// The command line, structured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub request_path: String,
    /// Explicit `--method`, upper-cased. `None` when absent or empty.
    pub method: Option<String>,
    pub api_address: String,
    /// Explicit `--apipassword`; the default credential is loaded lazily.
    pub api_password: Option<String>,
    pub user_agent: String,
    pub params: Params,
}

impl Default for ParsedCommand {
    fn default() -> Self {
        Self {
            request_path: String::new(),
            method: None,
            api_address: DEFAULT_API_ADDRESS.to_string(),
            api_password: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            params: Params::new(),
        }
    }
}

fn is_flag(token: &str) -> bool {
    token.starts_with("--")
}

pub fn parse_inputs<S: AsRef<str>>(tokens: &[S]) -> ParsedCommand {
    let mut cmd = ParsedCommand::default();
    let mut iter = tokens.iter().map(|t| t.as_ref()).peekable();

    while let Some(token) = iter.next() {
        if token.is_empty() {
            continue;
        }

        let Some(key) = token.strip_prefix("--") else {
            cmd.request_path.push('/');
            cmd.request_path.push_str(token);
            continue;
        };

        let key = key.to_lowercase();
        let value = iter.next_if(|next| !is_flag(next)).unwrap_or_default();

        match key.as_str() {
            "method" => {
                let method = value.to_uppercase();
                cmd.method = (!method.is_empty()).then_some(method);
            }
            "addr" => cmd.api_address = value.to_string(),
            "useragent" => cmd.user_agent = value.to_string(),
            "apipassword" => cmd.api_password = Some(value.to_string()),
            other => cmd
                .params
                .entry(other.to_string())
                .or_default()
                .push(value.to_string()),
        }
    }

    log::trace!("parsed command: {cmd:?}");
    cmd
}
