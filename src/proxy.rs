//! The proxy's configuration and its field table.
//!
//! Every key below appears under the same name as a command-line flag
//! (`--upstream-url`), a config file key (`upstream-url = "..."`) and, where
//! an env key is given, an environment variable (`PROXY_UPSTREAM_URL`).

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::duration::{deserialize_duration, serialize_duration};
use crate::merge::merge_maps;
use crate::resource::Resource;
use crate::schema::{Accessor, FieldDescriptor, Schema};

/// Prefix for every environment variable the proxy reads.
pub const ENV_PREFIX: &str = "PROXY_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProxyConfig {
    #[serde(rename = "config")]
    pub config_file: String,
    pub listen: String,
    pub discovery_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirection_url: String,
    pub upstream_url: String,
    pub scopes: Vec<String>,
    pub cors_origins: Vec<String>,
    pub enable_refresh_tokens: bool,
    pub enable_default_deny: bool,
    pub enable_logging: bool,
    pub skip_upstream_tls_verify: bool,
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub server_read_timeout: Duration,
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub server_write_timeout: Duration,
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub upstream_timeout: Duration,
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub upstream_keepalive_timeout: Duration,
    pub max_idle_connections: i64,
    pub max_idle_connections_per_host: i64,
    pub tags: BTreeMap<String, String>,
    pub match_claims: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub allowed_query_params: BTreeMap<String, String>,
    pub default_query_params: BTreeMap<String, String>,
    pub resources: Vec<Resource>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            config_file: String::new(),
            listen: "127.0.0.1:3000".to_string(),
            discovery_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            redirection_url: String::new(),
            upstream_url: String::new(),
            scopes: Vec::new(),
            cors_origins: Vec::new(),
            enable_refresh_tokens: false,
            enable_default_deny: true,
            enable_logging: false,
            skip_upstream_tls_verify: true,
            server_read_timeout: Duration::from_secs(10),
            server_write_timeout: Duration::from_secs(10),
            upstream_timeout: Duration::from_secs(10),
            upstream_keepalive_timeout: Duration::from_secs(10),
            max_idle_connections: 100,
            max_idle_connections_per_host: 50,
            tags: BTreeMap::new(),
            match_claims: BTreeMap::new(),
            headers: BTreeMap::new(),
            allowed_query_params: BTreeMap::new(),
            default_query_params: BTreeMap::new(),
            resources: Vec::new(),
        }
    }
}

impl ProxyConfig {
    pub fn merge_tags(&mut self, pairs: BTreeMap<String, String>) {
        merge_maps(&mut self.tags, pairs);
    }

    pub fn merge_match_claims(&mut self, pairs: BTreeMap<String, String>) {
        merge_maps(&mut self.match_claims, pairs);
    }

    pub fn merge_headers(&mut self, pairs: BTreeMap<String, String>) {
        merge_maps(&mut self.headers, pairs);
    }

    pub fn merge_allowed_query_params(&mut self, pairs: BTreeMap<String, String>) {
        merge_maps(&mut self.allowed_query_params, pairs);
    }

    pub fn merge_default_query_params(&mut self, pairs: BTreeMap<String, String>) {
        merge_maps(&mut self.default_query_params, pairs);
    }

    /// Resources already present (e.g. from a config file) stay first.
    pub fn append_resources(&mut self, resources: Vec<Resource>) {
        self.resources.extend(resources);
    }
}

static FIELDS: LazyLock<Vec<FieldDescriptor<ProxyConfig>>> = LazyLock::new(proxy_fields);

impl Schema for ProxyConfig {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        &FIELDS
    }
}

type Field = FieldDescriptor<ProxyConfig>;

fn proxy_fields() -> Vec<Field> {
    vec![
        Field::new(
            "config_file",
            "config",
            Accessor::Str {
                get: |c| c.config_file.as_str(),
                set: |c, v| c.config_file = v,
            },
        )
        .usage("path to a configuration file")
        .env("CONFIG_FILE"),
        Field::new(
            "listen",
            "listen",
            Accessor::Str {
                get: |c| c.listen.as_str(),
                set: |c, v| c.listen = v,
            },
        )
        .usage("the interface definition you wish the proxy to listen, all interfaces is specified as ':<port>', unix sockets as unix://<REL_PATH>|</ABS PATH>")
        .env("LISTEN"),
        Field::new(
            "discovery_url",
            "discovery-url",
            Accessor::Str {
                get: |c| c.discovery_url.as_str(),
                set: |c, v| c.discovery_url = v,
            },
        )
        .usage("discovery url to retrieve the openid configuration")
        .env("DISCOVERY_URL"),
        Field::new(
            "client_id",
            "client-id",
            Accessor::Str {
                get: |c| c.client_id.as_str(),
                set: |c, v| c.client_id = v,
            },
        )
        .usage("client id used to authenticate to the oauth service")
        .env("CLIENT_ID"),
        Field::new(
            "client_secret",
            "client-secret",
            Accessor::Str {
                get: |c| c.client_secret.as_str(),
                set: |c, v| c.client_secret = v,
            },
        )
        .usage("client secret used to authenticate to the oauth service")
        .env("CLIENT_SECRET"),
        Field::new(
            "redirection_url",
            "redirection-url",
            Accessor::Str {
                get: |c| c.redirection_url.as_str(),
                set: |c, v| c.redirection_url = v,
            },
        )
        .usage("redirection url for the oauth callback url, defaults to host header if absent")
        .env("REDIRECTION_URL"),
        Field::new(
            "upstream_url",
            "upstream-url",
            Accessor::Str {
                get: |c| c.upstream_url.as_str(),
                set: |c, v| c.upstream_url = v,
            },
        )
        .usage("url for the upstream endpoint you wish to proxy")
        .env("UPSTREAM_URL"),
        Field::new(
            "scopes",
            "scopes",
            Accessor::StrList {
                set: |c, v| c.scopes = v,
            },
        )
        .usage("list of scopes requested when authenticating the user"),
        Field::new(
            "cors_origins",
            "cors-origins",
            Accessor::StrList {
                set: |c, v| c.cors_origins = v,
            },
        )
        .usage("origins to add to the CORS origins control (Access-Control-Allow-Origin)"),
        Field::new(
            "enable_refresh_tokens",
            "enable-refresh-tokens",
            Accessor::Bool {
                get: |c| c.enable_refresh_tokens,
                set: |c, v| c.enable_refresh_tokens = v,
            },
        )
        .usage("enables the handling of the refresh tokens")
        .env("ENABLE_REFRESH_TOKEN"),
        Field::new(
            "enable_default_deny",
            "enable-default-deny",
            Accessor::Bool {
                get: |c| c.enable_default_deny,
                set: |c, v| c.enable_default_deny = v,
            },
        )
        .usage("enables a default denial on all requests, requests with valid token are permitted, you have to explicitly say what is open")
        .env("ENABLE_DEFAULT_DENY"),
        Field::new(
            "enable_logging",
            "enable-logging",
            Accessor::Bool {
                get: |c| c.enable_logging,
                set: |c, v| c.enable_logging = v,
            },
        )
        .usage("enable http logging of the requests")
        .env("ENABLE_LOGGING"),
        Field::new(
            "skip_upstream_tls_verify",
            "skip-upstream-tls-verify",
            Accessor::Bool {
                get: |c| c.skip_upstream_tls_verify,
                set: |c, v| c.skip_upstream_tls_verify = v,
            },
        )
        .usage("skip the verification of any upstream TLS")
        .env("SKIP_UPSTREAM_TLS_VERIFY"),
        Field::new(
            "server_read_timeout",
            "server-read-timeout",
            Accessor::Duration {
                get: |c| c.server_read_timeout,
                set: |c, v| c.server_read_timeout = v,
            },
        )
        .usage("the server read timeout on the http server")
        .env("SERVER_READ_TIMEOUT"),
        Field::new(
            "server_write_timeout",
            "server-write-timeout",
            Accessor::Duration {
                get: |c| c.server_write_timeout,
                set: |c, v| c.server_write_timeout = v,
            },
        )
        .usage("the server write timeout on the http server")
        .env("SERVER_WRITE_TIMEOUT"),
        Field::new(
            "upstream_timeout",
            "upstream-timeout",
            Accessor::Duration {
                get: |c| c.upstream_timeout,
                set: |c, v| c.upstream_timeout = v,
            },
        )
        .usage("maximum amount of time a dial will wait for a connect to complete")
        .env("UPSTREAM_TIMEOUT"),
        // File-only: no usage, so no flag.
        Field::new(
            "upstream_keepalive_timeout",
            "upstream-keepalive-timeout",
            Accessor::Duration {
                get: |c| c.upstream_keepalive_timeout,
                set: |c, v| c.upstream_keepalive_timeout = v,
            },
        ),
        Field::new(
            "max_idle_connections",
            "max-idle-connections",
            Accessor::Integer {
                set: |c, v| c.max_idle_connections = v,
            },
        )
        .usage("max idle upstream / openid connections to keep alive, ready for reuse")
        .env("MAX_IDLE_CONNS"),
        Field::new(
            "max_idle_connections_per_host",
            "max-idle-connections-per-host",
            Accessor::Integer {
                set: |c, v| c.max_idle_connections_per_host = v,
            },
        )
        .usage("limits the number of idle connections maintained per host")
        .env("MAX_IDLE_CONNS_PER_HOST"),
        Field::new(
            "tags",
            "tags",
            Accessor::StrMap {
                merge: ProxyConfig::merge_tags,
            },
        )
        .usage("keypairs passed to the templates at render,e.g title=page"),
        Field::new(
            "match_claims",
            "match-claims",
            Accessor::StrMap {
                merge: ProxyConfig::merge_match_claims,
            },
        )
        .usage("keypair values for matching access token claims e.g. aud=myapp, iss=http://example.*"),
        Field::new(
            "headers",
            "headers",
            Accessor::StrMap {
                merge: ProxyConfig::merge_headers,
            },
        )
        .usage("custom headers to the upstream request, key=value"),
        Field::new(
            "allowed_query_params",
            "allowed-query-params",
            Accessor::StrMap {
                merge: ProxyConfig::merge_allowed_query_params,
            },
        )
        .usage("allowed query params, which can be passed to the IdP in the auth URL, key=value"),
        Field::new(
            "default_query_params",
            "default-query-params",
            Accessor::StrMap {
                merge: ProxyConfig::merge_default_query_params,
            },
        )
        .usage("default query params which will be passed to the IdP in the auth URL, key=value"),
        Field::new(
            "resources",
            "resources",
            Accessor::ResourceList {
                append: ProxyConfig::append_resources,
            },
        )
        .usage("list of resources 'uri=/admin*|methods=GET,PUT|roles=role1,role2'"),
    ]
}
