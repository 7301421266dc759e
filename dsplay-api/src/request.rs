//! Typed request builder
//!
//! Every Web API call is a GET carrying `api`, `method` and `version`
//! plus call-specific parameters. [`DsRequest`] owns that field set and
//! the encoding rules so call sites never assemble query strings by hand.

use url::Url;

use crate::{ApiError, Result};

/// Parameter carrying the session id
pub const SID_PARAM: &str = "_sid";

/// A single Web API request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsRequest {
    api: String,
    method: String,
    version: u32,
    path: Option<String>,
    params: Vec<(String, String)>,
}

impl DsRequest {
    pub fn new(api: impl Into<String>, method: impl Into<String>, version: u32) -> Self {
        Self {
            api: api.into(),
            method: method.into(),
            version,
            path: None,
            params: Vec::new(),
        }
    }

    /// Send to an explicit path instead of the one from the path table
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add or replace a parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set_param(key, value);
        self
    }

    /// Add or replace a parameter in place
    ///
    /// Replacing keeps the original position of the key.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.params.push((key, value)),
        }
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Query pairs in wire order: `api`, `method`, `version`, then the
    /// call parameters in insertion order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.params.len() + 3);
        pairs.push(("api".to_string(), self.api.clone()));
        pairs.push(("method".to_string(), self.method.clone()));
        pairs.push(("version".to_string(), self.version.to_string()));
        pairs.extend(self.params.iter().cloned());
        pairs
    }

    /// Full, percent-encoded URL of this request against an endpoint
    ///
    /// Used where the URL itself is the product, e.g. artwork links
    /// handed to a browser.
    pub fn to_url(&self, endpoint: &str) -> Result<String> {
        let mut url = Url::parse(endpoint)
            .map_err(|e| ApiError::InvalidParameter(format!("endpoint '{}': {}", endpoint, e)))?;
        url.query_pairs_mut().extend_pairs(self.query_pairs());
        Ok(url.into())
    }
}

/// Bracketed id list as several `getinfo` calls expect it (`[1,2]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList(pub Vec<String>);

impl IdList {
    pub fn single(id: impl Into<String>) -> Self {
        Self(vec![id.into()])
    }
}

impl std::fmt::Display for IdList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(","))
    }
}
