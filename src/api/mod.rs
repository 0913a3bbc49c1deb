/*!
Endpoint registry and resolution.

The registry is an ordered, compiled-in list of Sia daemon API endpoints
(as documented for siad v1.4.1). Resolution scans it linearly, collecting
every template whose pattern (or alias) matches the request path and, when
the caller gave one, whose method equals the explicit method.

Outcomes:
  - no explicit method, 0 candidates  -> ResolveError::NotFound
  - no explicit method, >1 candidates -> ResolveError::Ambiguous
  - otherwise the first candidate wins
  - explicit method with 0 candidates -> sent as-is, no template
*/

pub mod matcher;

use serde::Serialize;

use crate::error::ResolveError;
pub use matcher::match_path;

/// A known API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointTemplate {
    pub path: &'static str,
    pub method: &'static str,
    /// Alternate spellings that resolve to this endpoint.
    pub aliases: &'static [&'static str],
}

impl EndpointTemplate {
    pub const fn new(path: &'static str, method: &'static str) -> Self {
        Self {
            path,
            method,
            aliases: &[],
        }
    }

    pub const fn with_aliases(
        path: &'static str,
        method: &'static str,
        aliases: &'static [&'static str],
    ) -> Self {
        Self {
            path,
            method,
            aliases,
        }
    }

    /// Which spelling of this endpoint `path` matched, if any.
    fn matched_by(&self, path: &str) -> Option<MatchedBy> {
        if match_path(path, self.path) {
            return Some(MatchedBy::Pattern);
        }
        self.aliases
            .iter()
            .any(|alias| match_path(path, alias))
            .then_some(MatchedBy::Alias)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchedBy {
    Pattern,
    Alias,
}

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// The template chosen, absent when an explicit method matched nothing.
    pub endpoint: Option<&'a EndpointTemplate>,
    /// Effective HTTP method (explicit override, else the template's).
    pub method: String,
    /// Path to send; an alias hit on a literal template is rewritten to the
    /// canonical pattern.
    pub request_path: String,
}

/// Ordered endpoint table.
#[derive(Debug, Clone, Copy)]
pub struct Registry<'a> {
    endpoints: &'a [EndpointTemplate],
}

impl Registry<'static> {
    /// The built-in Sia API table.
    pub fn sia() -> Self {
        Registry {
            endpoints: SIA_API_ENDPOINTS,
        }
    }
}

impl<'a> Registry<'a> {
    pub fn new(endpoints: &'a [EndpointTemplate]) -> Self {
        Registry { endpoints }
    }

    pub fn endpoints(&self) -> &'a [EndpointTemplate] {
        self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    fn candidates(
        &self,
        path: &str,
        method: Option<&str>,
    ) -> Vec<(&'a EndpointTemplate, MatchedBy)> {
        self.endpoints
            .iter()
            .filter(|endpoint| method.is_none_or(|m| m == endpoint.method))
            .filter_map(|endpoint| endpoint.matched_by(path).map(|by| (endpoint, by)))
            .collect()
    }

    /// Pick the endpoint for a request path and optional explicit method.
    pub fn resolve(
        &self,
        path: &str,
        method: Option<&str>,
    ) -> Result<Resolution<'a>, ResolveError> {
        let candidates = self.candidates(path, method);
        log::debug!(
            "{} candidate endpoint(s) for {} {path}",
            candidates.len(),
            method.unwrap_or("<any>")
        );

        if method.is_none() {
            if candidates.is_empty() {
                return Err(ResolveError::NotFound {
                    path: path.to_string(),
                });
            }
            if candidates.len() > 1 {
                let listed: Vec<String> = candidates
                    .iter()
                    .map(|(e, _)| format!("{} {}", e.method, e.path))
                    .collect();
                return Err(ResolveError::Ambiguous {
                    path: path.to_string(),
                    candidates: listed.join(", "),
                });
            }
        }

        let Some(&(endpoint, matched_by)) = candidates.first() else {
            // explicit method, nothing in the table: pass the request through
            let method = method.unwrap_or_default().to_string();
            log::warn!("no known endpoint for {method} {path}; sending anyway");
            return Ok(Resolution {
                endpoint: None,
                method,
                request_path: path.to_string(),
            });
        };

        let request_path = if matched_by == MatchedBy::Alias && matcher::is_literal(endpoint.path)
        {
            log::info!("{path} is an alias of {}", endpoint.path);
            endpoint.path.to_string()
        } else {
            path.to_string()
        };

        Ok(Resolution {
            endpoint: Some(endpoint),
            method: method.unwrap_or(endpoint.method).to_string(),
            request_path,
        })
    }
}

/* ---- Endpoint Table ---- */

const fn get(path: &'static str) -> EndpointTemplate {
    EndpointTemplate::new(path, "GET")
}

const fn post(path: &'static str) -> EndpointTemplate {
    EndpointTemplate::new(path, "POST")
}

/// All endpoints listed in the Sia API docs as of v1.4.1.
pub static SIA_API_ENDPOINTS: &[EndpointTemplate] = &[
    get("/consensus"),
    get("/consensus/blocks"),
    post("/consensus/validate/transactionset"),
    get("/daemon/constants"),
    get("/daemon/settings"),
    post("/daemon/settings"),
    get("/daemon/stop"),
    get("/daemon/update"),
    post("/daemon/update"),
    get("/daemon/version"),
    get("/gateway"),
    post("/gateway"),
    post("/gateway/connect/:netaddress"),
    post("/gateway/disconnect/:netaddress"),
    get("/host"),
    post("/host"),
    post("/host/announce"),
    get("/host/contracts"),
    EndpointTemplate::with_aliases("/host/storage", "GET", &["/host/folders"]),
    post("/host/storage/folders/add"),
    post("/host/storage/folders/remove"),
    post("/host/storage/folders/resize"),
    post("/host/storage/sectors/delete/:merkleroot"),
    get("/host/estimatescore"),
    get("/hostdb"),
    get("/hostdb/active"),
    get("/hostdb/all"),
    get("/hostdb/hosts/:pubkey"),
    get("/hostdb/filtermode"),
    post("/hostdb/filtermode"),
    get("/miner"),
    get("/miner/start"),
    get("/miner/stop"),
    get("/miner/header"),
    post("/miner/header"),
    get("/renter"),
    post("/renter"),
    post("/renter/contract/cancel"),
    post("/renter/backup"),
    post("/renter/recoverbackup"),
    post("/renter/uploadedbackups"),
    get("/renter/contracts"),
    get("/renter/dir/*siapath"),
    post("/renter/dir/*siapath"),
    get("/renter/downloads"),
    post("/renter/downloads/clear"),
    get("/renter/prices"),
    get("/renter/files"),
    get("/renter/file/*siapath"),
    post("/renter/file/*siapath"),
    post("/renter/delete/*siapath"),
    get("/renter/download/*siapath"),
    post("/renter/download/cancel"),
    get("/renter/downloadsync/*siapath"),
    post("/renter/recoveryscan"),
    get("/renter/recoveryscan"),
    post("/renter/rename/*siapath"),
    get("/renter/stream/*siapath"),
    post("/renter/upload/*siapath"),
    post("/renter/uploadstream/*siapath"),
    post("/renter/validate/*siapath"),
    get("/tpool/confirmed/:id"),
    get("/tpool/fee"),
    get("/tpool/raw/:id"),
    post("/tpool/raw"),
    get("/wallet"),
    post("/wallet/033x"),
    get("/wallet/address"),
    get("/wallet/addresses"),
    get("/wallet/seedaddrs"),
    get("/wallet/backup"),
    post("/wallet/changepassword"),
    post("/wallet/init"),
    post("/wallet/init/seed"),
    post("/wallet/seed"),
    get("/wallet/seeds"),
    post("/wallet/siacoins"),
    post("/wallet/siafunds"),
    post("/wallet/siagkey"),
    post("/wallet/sign"),
    post("/wallet/sweep/seed"),
    post("/wallet/lock"),
    get("/wallet/transaction/:id"),
    get("/wallet/transactions"),
    get("/wallet/transactions/:addr"),
    post("/wallet/unlock"),
    get("/wallet/unlockconditions/:addr"),
    get("/wallet/unspent"),
    get("/wallet/verify/address/:addr"),
    get("/wallet/watch"),
    post("/wallet/watch"),
];

#[cfg(test)]
mod tests {
    use super::*;

    static WALLET_BOTH: &[EndpointTemplate] = &[
        EndpointTemplate::new("/wallet", "GET"),
        EndpointTemplate::new("/wallet", "POST"),
        EndpointTemplate::new("/wallet/address", "GET"),
    ];

    #[test]
    fn host_storage_resolves_to_get() {
        let res = Registry::sia().resolve("/host/storage", None).unwrap();
        let endpoint = res.endpoint.unwrap();
        assert_eq!(endpoint.path, "/host/storage");
        assert_eq!(res.method, "GET");
        assert_eq!(res.request_path, "/host/storage");
    }

    #[test]
    fn explicit_post_targets_folder_management() {
        let res = Registry::sia()
            .resolve("/host/storage/folders/add", Some("POST"))
            .unwrap();
        assert_eq!(res.endpoint.unwrap().path, "/host/storage/folders/add");
        assert_eq!(res.method, "POST");
    }

    #[test]
    fn named_segment_resolution() {
        let res = Registry::sia()
            .resolve("/hostdb/hosts/ed25519:abcd", None)
            .unwrap();
        assert_eq!(res.endpoint.unwrap().path, "/hostdb/hosts/:pubkey");
        assert_eq!(res.request_path, "/hostdb/hosts/ed25519:abcd");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let err = Registry::sia().resolve("/does/not/exist", None).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[test]
    fn same_path_two_methods_is_ambiguous() {
        let registry = Registry::new(WALLET_BOTH);
        let err = registry.resolve("/wallet", None).unwrap_err();
        match err {
            ResolveError::Ambiguous { candidates, .. } => {
                assert!(candidates.contains("GET /wallet"));
                assert!(candidates.contains("POST /wallet"));
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }

        let res = registry.resolve("/wallet", Some("POST")).unwrap();
        assert_eq!(res.method, "POST");
        assert_eq!(res.endpoint.unwrap().method, "POST");
    }

    #[test]
    fn builtin_ambiguity_needs_method() {
        let registry = Registry::sia();
        assert!(matches!(
            registry.resolve("/daemon/settings", None),
            Err(ResolveError::Ambiguous { .. })
        ));
        let res = registry.resolve("/daemon/settings", Some("GET")).unwrap();
        assert_eq!(res.method, "GET");
    }

    #[test]
    fn explicit_method_without_match_passes_through() {
        let res = Registry::sia()
            .resolve("/not/in/table", Some("GET"))
            .unwrap();
        assert!(res.endpoint.is_none());
        assert_eq!(res.method, "GET");
        assert_eq!(res.request_path, "/not/in/table");
    }

    #[test]
    fn alias_rewrites_to_canonical_path() {
        let res = Registry::sia().resolve("/host/folders", None).unwrap();
        assert_eq!(res.endpoint.unwrap().path, "/host/storage");
        assert_eq!(res.request_path, "/host/storage");
        assert_eq!(res.method, "GET");
    }

    #[test]
    fn wildcard_endpoints_need_method() {
        let registry = Registry::sia();
        assert!(registry.resolve("/renter/file/a/b.txt", None).is_err());
        let res = registry
            .resolve("/renter/file/a/b.txt", Some("GET"))
            .unwrap();
        assert_eq!(res.endpoint.unwrap().path, "/renter/file/*siapath");
        assert_eq!(res.request_path, "/renter/file/a/b.txt");
    }

    #[test]
    fn builtin_table_has_no_duplicates() {
        let endpoints = Registry::sia().endpoints();
        for (i, a) in endpoints.iter().enumerate() {
            for b in &endpoints[i + 1..] {
                assert!(
                    !(a.path == b.path && a.method == b.method),
                    "duplicate {} {}",
                    a.method,
                    a.path
                );
            }
        }
    }

    #[test]
    fn first_candidate_wins_with_explicit_method() {
        static TWICE: &[EndpointTemplate] = &[
            EndpointTemplate::new("/tpool/raw/:id", "GET"),
            EndpointTemplate::new("/tpool/raw/*rest", "GET"),
        ];
        let res = Registry::new(TWICE)
            .resolve("/tpool/raw/abc", Some("GET"))
            .unwrap();
        assert_eq!(res.endpoint.unwrap().path, "/tpool/raw/:id");
    }
}
