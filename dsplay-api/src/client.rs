use http_client::{HttpClient, Timeouts};
use serde_json::Value;
use tracing::debug;

use crate::operation::DsOperation;
use crate::operations::auth::{ApiInfoQueryOperation, API_INFO_PATH};
use crate::{ApiError, ApiPathTable, DsRequest, Result};

/// Sends Web API requests
///
/// This is the seam between the stateful core and the network: the
/// core only ever talks to a `Transport`, and tests substitute a
/// scripted one.
pub trait Transport {
    /// Send a request and return the envelope payload
    fn send(&self, request: &DsRequest) -> Result<Option<Value>>;

    /// Full URL of a request, without sending it
    fn url_for(&self, request: &DsRequest) -> Result<String>;

    /// Send a typed operation and decode its response
    fn execute<Op: DsOperation>(&self, operation: &Op) -> Result<Op::Response>
    where
        Self: Sized,
    {
        Op::parse_response(self.send(&operation.request())?)
    }
}

/// A client for executing Web API requests against a DiskStation
///
/// Resolves each request's logical API name to an HTTP path through the
/// [`ApiPathTable`] unless the request carries an explicit path, and
/// sends it with the blocking [`HttpClient`].
#[derive(Debug, Clone)]
pub struct DsClient {
    http: HttpClient,
    base_url: String,
    paths: ApiPathTable,
}

impl DsClient {
    /// Create a client with default timeouts
    ///
    /// # Arguments
    /// * `base_url` - The `webapi` root, e.g. `http://diskstation:5000/webapi`
    /// * `paths` - Logical API name to path table
    pub fn new(base_url: impl Into<String>, paths: ApiPathTable) -> Self {
        Self::with_http_client(base_url, paths, HttpClient::new())
    }

    /// Create a client with explicit timeouts
    pub fn with_timeouts(base_url: impl Into<String>, paths: ApiPathTable, timeouts: Timeouts) -> Self {
        Self::with_http_client(base_url, paths, HttpClient::with_timeouts(timeouts))
    }

    /// Create a client around a custom HTTP client
    pub fn with_http_client(base_url: impl Into<String>, paths: ApiPathTable, http: HttpClient) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            paths,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn paths(&self) -> &ApiPathTable {
        &self.paths
    }

    pub fn set_paths(&mut self, paths: ApiPathTable) {
        self.paths = paths;
    }

    /// Endpoint URL a request is sent to
    pub fn endpoint(&self, request: &DsRequest) -> Result<String> {
        let path = match request.path() {
            Some(path) => path,
            None => self
                .paths
                .path_for(request.api())
                .ok_or_else(|| ApiError::UnknownApi(request.api().to_string()))?,
        };
        Ok(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
    }

    /// Ask the server for its own API path table
    ///
    /// The info API lives at a fixed path, so this works before any
    /// table is available.
    pub fn fetch_path_table(&self) -> Result<ApiPathTable> {
        let request = ApiInfoQueryOperation {}.request().with_path(API_INFO_PATH);
        let data = self.send(&request)?;
        let table = ApiPathTable::from_value(data.unwrap_or(Value::Null))?;
        debug!(apis = table.len(), "fetched API path table");
        Ok(table)
    }
}

impl Transport for DsClient {
    fn send(&self, request: &DsRequest) -> Result<Option<Value>> {
        let endpoint = self.endpoint(request)?;
        debug!(api = request.api(), method = request.method(), "sending request");
        Ok(self.http.get(&endpoint, &request.query_pairs())?)
    }

    fn url_for(&self, request: &DsRequest) -> Result<String> {
        request.to_url(&self.endpoint(request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::video::ListVideoDevicesOperation;
    use mockito::{Matcher, Server};

    #[test]
    fn test_endpoint_resolution() {
        let client = DsClient::new("http://ds:5000/webapi/", ApiPathTable::builtin());

        let request = DsRequest::new("SYNO.AudioStation.Song", "getinfo", 2);
        assert_eq!(
            client.endpoint(&request).unwrap(),
            "http://ds:5000/webapi/AudioStation/song.cgi"
        );

        let explicit = DsRequest::new("SYNO.AudioStation.Song", "getinfo", 2).with_path("/custom.cgi");
        assert_eq!(client.endpoint(&explicit).unwrap(), "http://ds:5000/webapi/custom.cgi");
    }

    #[test]
    fn test_unknown_api() {
        let client = DsClient::new("http://ds:5000/webapi", ApiPathTable::new());
        let err = client
            .send(&DsRequest::new("SYNO.Missing", "get", 1))
            .unwrap_err();
        assert!(matches!(err, ApiError::UnknownApi(name) if name == "SYNO.Missing"));
    }

    #[test]
    fn test_execute_against_server() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/webapi/entry.cgi")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api".into(), "SYNO.VideoStation2.Controller.Device".into()),
                Matcher::UrlEncoded("method".into(), "list".into()),
                Matcher::UrlEncoded("version".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"device": [{"id": "d1", "title": "Den"}]}}"#)
            .create();

        let client = DsClient::new(format!("{}/webapi", server.url()), ApiPathTable::builtin());
        let list = client.execute(&ListVideoDevicesOperation {}).unwrap();

        assert_eq!(list.device[0].title, "Den");
        mock.assert();
    }

    #[test]
    fn test_vendor_error_propagates() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/webapi/entry.cgi")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success": false, "error": {"code": 107}}"#)
            .create();

        let client = DsClient::new(format!("{}/webapi", server.url()), ApiPathTable::builtin());
        let err = client.execute(&ListVideoDevicesOperation {}).unwrap_err();
        assert!(err.is_session_error());
    }

    #[test]
    fn test_fetch_path_table() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/webapi/query.cgi")
            .match_query(Matcher::UrlEncoded("query".into(), "all".into()))
            .with_status(200)
            .with_body(
                r#"{"success": true, "data": {"SYNO.API.Auth": {"path": "auth.cgi", "minVersion": 1, "maxVersion": 6}}}"#,
            )
            .create();

        let client = DsClient::new(format!("{}/webapi", server.url()), ApiPathTable::new());
        let table = client.fetch_path_table().unwrap();

        assert_eq!(table.path_for("SYNO.API.Auth"), Some("auth.cgi"));
        mock.assert();
    }

    #[test]
    fn test_url_for() {
        let client = DsClient::new("http://ds:5000/webapi", ApiPathTable::builtin());
        let request = DsRequest::new("SYNO.VideoStation2.Poster", "get", 1).param("id", "7");
        assert_eq!(
            client.url_for(&request).unwrap(),
            "http://ds:5000/webapi/entry.cgi?api=SYNO.VideoStation2.Poster&method=get&version=1&id=7"
        );
    }
}
