use lims_xml::{Element, Path};
use log::debug;
use reqwest::{header, RequestBuilder, Response, StatusCode};

use crate::error::{ConflictError, LimsError, NotFoundError, ParseError, TransportError};

pub(crate) const API_VERSION: &str = "v1";

/// Authenticated HTTP transport against one server's API root.
///
/// Every call negotiates `application/xml` and returns the parsed response
/// document; non-success statuses are mapped onto the error taxonomy before
/// any caller sees them.
#[derive(Debug, Clone)]
pub struct ApiConfiguration {
    /// Base URI excluding the `api` and version path segments.
    pub base_path: String,
    #[allow(missing_docs)]
    pub user_agent: Option<String>,
    #[allow(missing_docs)]
    pub client: reqwest::Client,
    /// `(username, password)` for HTTP basic authentication.
    pub basic_auth: Option<(String, Option<String>)>,
}

impl ApiConfiguration {
    /// The full URI for the given path segments below the API root.
    pub fn api_uri(&self, segments: &[&str]) -> String {
        let mut uri = format!("{}/api/{API_VERSION}", self.base_path);
        for segment in segments {
            uri.push('/');
            uri.push_str(segment);
        }
        uri
    }

    /// GET the document at `uri`, with optional query parameters.
    pub async fn get_xml(
        &self,
        uri: &str,
        query: &[(String, String)],
    ) -> Result<Element, LimsError> {
        debug!("GET {uri}");
        let mut request = self.client.get(uri);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.prepare(request).send().await.map_err(TransportError::from)?;
        self.parse_response(uri, response).await
    }

    /// PUT the serialized document to `uri`.
    pub async fn put_xml(&self, uri: &str, body: &Element) -> Result<Element, LimsError> {
        debug!("PUT {uri}");
        let data = lims_xml::to_string(body)?;
        let request = self
            .client
            .put(uri)
            .header(header::CONTENT_TYPE, "application/xml")
            .body(data);
        let response = self.prepare(request).send().await.map_err(TransportError::from)?;
        self.parse_response(uri, response).await
    }

    /// POST the serialized document to `uri`.
    pub async fn post_xml(&self, uri: &str, body: &Element) -> Result<Element, LimsError> {
        debug!("POST {uri}");
        let data = lims_xml::to_string(body)?;
        let request = self
            .client
            .post(uri)
            .header(header::CONTENT_TYPE, "application/xml")
            .body(data);
        let response = self.prepare(request).send().await.map_err(TransportError::from)?;
        self.parse_response(uri, response).await
    }

    fn prepare(&self, mut request: RequestBuilder) -> RequestBuilder {
        request = request.header(header::ACCEPT, "application/xml");
        if let Some(user_agent) = &self.user_agent {
            request = request.header(header::USER_AGENT, user_agent);
        }
        if let Some((username, password)) = &self.basic_auth {
            request = request.basic_auth(username, password.as_deref());
        }
        request
    }

    async fn parse_response(&self, uri: &str, response: Response) -> Result<Element, LimsError> {
        let status = response.status();
        let body = response.text().await.map_err(TransportError::from)?;

        if status.is_success() {
            return Ok(lims_xml::parse(&body).map_err(ParseError::from)?);
        }

        // Server errors come wrapped in an exc:exception document with a
        // human-readable message and sometimes suggested actions.
        let message = exception_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unspecified server error")
                .to_owned()
        });
        match status {
            StatusCode::NOT_FOUND => Err(NotFoundError {
                uri: uri.to_owned(),
                message,
            }
            .into()),
            StatusCode::CONFLICT => Err(ConflictError {
                uri: uri.to_owned(),
                message,
            }
            .into()),
            _ => Err(TransportError::ResponseContent { status, message }.into()),
        }
    }
}

fn exception_message(body: &str) -> Option<String> {
    let root = lims_xml::parse(body).ok()?;
    let message_path = Path::parse("message").expect("static path is valid");
    let actions_path = Path::parse("suggested-actions").expect("static path is valid");
    let message = root.find(&message_path)?.text()?.to_owned();
    match root.find(&actions_path).and_then(|node| node.text()) {
        Some(actions) => Some(format!("{message} {actions}")),
        None => Some(message),
    }
}
