//! Authorization resource descriptors.
//!
//! On the command line a resource is a single string of `|`-separated
//! `identifier=value` sections:
//!
//! ```text
//! uri=/admin*|methods=GET,POST|roles=admin,ops|require-any-role=true
//! ```
//!
//! In a config file the same rule is written as a table under `[[resources]]`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every method a resource may be restricted to. Also the default set.
pub const ALL_HTTP_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "TRACE", "CONNECT",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("the resource has no options")]
    Empty,

    #[error(
        "invalid resource keypair '{0}', should be (uri|roles|headers|methods|white-listed)=comma_values"
    )]
    InvalidKeyPair(String),

    #[error("invalid identifier '{0}', should be roles, uri or methods")]
    UnknownIdentifier(String),

    #[error("invalid boolean '{value}' for {identifier}")]
    InvalidBool { identifier: String, value: String },

    #[error("invalid http method '{0}'")]
    InvalidMethod(String),

    #[error("resource does not have url")]
    MissingUri,
}

/// A single protected (or white-listed) path and the rules guarding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Resource {
    pub uri: String,
    pub methods: Vec<String>,
    pub roles: Vec<String>,
    pub require_any_role: bool,
    pub headers: Vec<String>,
    pub groups: Vec<String>,
    pub acr: Vec<String>,
    pub white_listed: bool,
    pub no_redirect: bool,
}

impl Default for Resource {
    fn default() -> Self {
        Self {
            uri: String::new(),
            methods: all_methods(),
            roles: Vec::new(),
            require_any_role: false,
            headers: Vec::new(),
            groups: Vec::new(),
            acr: Vec::new(),
            white_listed: false,
            no_redirect: false,
        }
    }
}

impl FromStr for Resource {
    type Err = ResourceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(ResourceError::Empty);
        }

        let mut resource = Resource::default();
        for section in raw.split('|') {
            let (identifier, value) = match section.split_once('=') {
                Some((id, v)) if !v.contains('=') => (id, v),
                _ => return Err(ResourceError::InvalidKeyPair(section.to_string())),
            };

            match identifier {
                "uri" => resource.uri = value.to_string(),
                "methods" => resource.methods = parse_methods(value)?,
                "roles" => resource.roles = split_list(value),
                "require-any-role" => resource.require_any_role = parse_bool(identifier, value)?,
                "headers" => resource.headers = split_list(value),
                "groups" => resource.groups = split_list(value),
                "acr" => resource.acr = split_list(value),
                "white-listed" => resource.white_listed = parse_bool(identifier, value)?,
                "no-redirect" => resource.no_redirect = parse_bool(identifier, value)?,
                other => return Err(ResourceError::UnknownIdentifier(other.to_string())),
            }
        }

        if resource.uri.is_empty() {
            return Err(ResourceError::MissingUri);
        }
        Ok(resource)
    }
}

fn all_methods() -> Vec<String> {
    ALL_HTTP_METHODS.iter().map(|m| m.to_string()).collect()
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

fn parse_methods(value: &str) -> Result<Vec<String>, ResourceError> {
    if value == "any" || value == "ANY" {
        return Ok(all_methods());
    }
    let methods = split_list(value);
    if let Some(bad) = methods
        .iter()
        .find(|m| !ALL_HTTP_METHODS.contains(&m.as_str()))
    {
        return Err(ResourceError::InvalidMethod(bad.clone()));
    }
    Ok(methods)
}

fn parse_bool(identifier: &str, value: &str) -> Result<bool, ResourceError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ResourceError::InvalidBool {
            identifier: identifier.to_string(),
            value: value.to_string(),
        }),
    }
}
