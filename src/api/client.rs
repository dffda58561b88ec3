//! Blocking HTTP client for the timer service
//!
//! `ApiClient::call` is the single place requests are sent. It never returns
//! an error: every response is normalised into an `ApiOutcome`, and every
//! failure path leaves a log entry. Transport failures additionally raise an
//! operator notice when a `Notifier` is installed.

use crate::api::models::{
    ControlAction, DeleteLogoOutcome, Logo, StatusSnapshot, ThemeForm, ThemeSettings, TimerId,
};
use crate::api::notify::Notifier;
use crate::config::ServiceSettings;
use crate::error::{Result, StageTimerError, StringError};
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Status reported when a protected endpoint bounces the client to `/login`
const LOGIN_REQUIRED_STATUS: u16 = 401;

/// Normalised result of one service call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// 2xx response; `data` is `None` for `204` or a non-JSON body
    Success {
        /// HTTP status code
        status: u16,
        /// Parsed JSON body
        data: Option<Value>,
    },
    /// Non-2xx response
    HttpError {
        /// Endpoint that was called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Parsed JSON body, usually `{"error": ...}`
        data: Option<Value>,
    },
    /// The request never produced a response
    TransportFailure {
        /// Endpoint that was called
        endpoint: String,
        /// Transport error description
        message: String,
    },
}

impl ApiOutcome {
    /// Whether the service accepted the request
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Parsed response body, if any
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } | Self::HttpError { data, .. } => data.as_ref(),
            Self::TransportFailure { .. } => None,
        }
    }

    /// String field `key` of the response body
    pub fn field(&self, key: &str) -> Option<&str> {
        self.data()?.get(key)?.as_str()
    }

    /// Convert into a `Result`, keeping the body of a success
    pub fn into_result(self) -> Result<Option<Value>> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::HttpError {
                endpoint,
                status,
                data,
            } => {
                let message = data
                    .as_ref()
                    .and_then(|d| d.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| {
                        StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .map(str::to_string)
                    })
                    .unwrap_or_default();
                Err(StageTimerError::HttpStatus {
                    endpoint,
                    status,
                    message,
                })
            }
            Self::TransportFailure { endpoint, message } => {
                Err(StageTimerError::Transport { endpoint, message })
            }
        }
    }
}

/// Public location of uploaded logo assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadsLocation(Url);

impl UploadsLocation {
    /// Wrap an absolute uploads URL
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    /// URL of the asset stored as `filename`
    pub fn logo_url(&self, filename: &str) -> String {
        push_segment(self.0.clone(), filename).to_string()
    }
}

/// HTTP client for the timer service
pub struct ApiClient {
    base_url: Url,
    login_url: Url,
    uploads: UploadsLocation,
    http: Client,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ApiClient {
    /// Build a client for the service described by `settings`
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        let mut base = settings.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| StageTimerError::ConfigError(Box::new(e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StageTimerError::ConfigError(StringError::new(format!(
                "Service URL cannot be used as a base: {base}"
            ))));
        }

        let login_url = join_endpoint(&base_url, "/login")?;
        let uploads = UploadsLocation::new(join_endpoint(&base_url, &settings.uploads_path)?);

        let http = Client::builder()
            .timeout(settings.request_timeout())
            .cookie_store(true)
            .user_agent(concat!("stagetimer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StageTimerError::ConfigError(Box::new(e)))?;

        Ok(Self {
            base_url,
            login_url,
            uploads,
            http,
            notifier: None,
        })
    }

    /// Install an operator notifier for transport failures
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Service base URL (always ends in `/`)
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Where uploaded logos are served
    pub fn uploads(&self) -> &UploadsLocation {
        &self.uploads
    }

    /// Public URL of an uploaded logo
    pub fn logo_url(&self, filename: &str) -> String {
        self.uploads.logo_url(filename)
    }

    /// Absolute URL for `endpoint`
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        join_endpoint(&self.base_url, endpoint)
    }

    /// Send one request and normalise the response
    ///
    /// A body is attached only for POST, PUT and DELETE.
    pub fn call(&self, endpoint: &str, method: Method, body: Option<&Value>) -> ApiOutcome {
        let url = match self.endpoint_url(endpoint) {
            Ok(url) => url,
            Err(e) => return self.transport_failure(endpoint, &e),
        };

        let sends_body = method == Method::POST || method == Method::PUT || method == Method::DELETE;
        let mut request = self.http.request(method, url);
        if let Some(body) = body
            && sends_body
        {
            request = request.header(CONTENT_TYPE, "application/json").json(body);
        }

        self.execute(endpoint, request)
    }

    /// Fetch current timer and theme status
    pub fn timer_status(&self) -> Result<StatusSnapshot> {
        let endpoint = "/api/timer_status";
        let data = self.call(endpoint, Method::GET, None).into_result()?;
        StatusSnapshot::from_value(data.unwrap_or(Value::Null)).map_err(|source| {
            warn!("Undecodable status response: {source}");
            StageTimerError::InvalidResponse {
                endpoint: endpoint.to_string(),
                source,
            }
        })
    }

    /// Send one control action to a timer
    pub fn control_timer(&self, id: TimerId, action: &ControlAction) -> Result<ApiOutcome> {
        debug!("Timer {id}: {}", action.name());
        self.call_json(&format!("/api/control_timer/{id}"), Method::POST, action)
    }

    /// Fetch the viewer theme
    pub fn get_theme(&self) -> Result<ThemeSettings> {
        let endpoint = "/api/theme";
        match self.call(endpoint, Method::GET, None).into_result()? {
            Some(data) => {
                serde_json::from_value(data).map_err(|source| StageTimerError::InvalidResponse {
                    endpoint: endpoint.to_string(),
                    source,
                })
            }
            None => Ok(ThemeSettings::default()),
        }
    }

    /// Replace the viewer theme
    pub fn set_theme(&self, form: &ThemeForm) -> Result<ApiOutcome> {
        self.call_json("/api/theme", Method::POST, form)
    }

    /// Change the admin PIN
    pub fn change_pin(&self, current_pin: &str, new_pin: &str) -> ApiOutcome {
        let body = json!({ "current_pin": current_pin, "new_pin": new_pin });
        self.call("/api/change_pin", Method::POST, Some(&body))
    }

    /// List uploaded logos in service order
    pub fn get_logos(&self) -> Result<Vec<Logo>> {
        let endpoint = "/api/get_logos";
        match self.call(endpoint, Method::GET, None).into_result()? {
            Some(data) => {
                serde_json::from_value(data).map_err(|source| StageTimerError::InvalidResponse {
                    endpoint: endpoint.to_string(),
                    source,
                })
            }
            None => Ok(Vec::new()),
        }
    }

    /// Delete an uploaded logo
    ///
    /// A `warning` body counts as success even alongside an error status.
    pub fn delete_logo(&self, filename: &str) -> Result<DeleteLogoOutcome> {
        let endpoint = format!("/api/delete_logo/{filename}");
        let url = push_segment(self.endpoint_url("/api/delete_logo")?, filename);
        let outcome = self.execute(&endpoint, self.http.request(Method::DELETE, url));

        if let Some(warning) = outcome.field("warning") {
            warn!("Logo {filename} deleted with warning: {warning}");
            return Ok(DeleteLogoOutcome::Warning(warning.to_string()));
        }

        match outcome {
            ApiOutcome::Success { data: None, .. } => Ok(DeleteLogoOutcome::NoContent),
            ApiOutcome::Success {
                data: Some(data), ..
            } => Ok(DeleteLogoOutcome::Deleted(
                data.get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Logo deleted.")
                    .to_string(),
            )),
            other => other.into_result().map(|_| DeleteLogoOutcome::NoContent),
        }
    }

    /// Upload a logo image as a multipart form
    ///
    /// Fails only when the local file cannot be read.
    pub fn upload_logo(&self, common_name: &str, path: &Path) -> Result<ApiOutcome> {
        let endpoint = "/api/upload_logo";
        let form = multipart::Form::new()
            .text("common_name", common_name.to_string())
            .file("logo_file", path)?;
        let url = self.endpoint_url(endpoint)?;
        Ok(self.execute(endpoint, self.http.post(url).multipart(form)))
    }

    /// Open an admin session with `pin`
    ///
    /// The session cookie is kept by the client for later protected calls.
    pub fn login(&self, pin: &str) -> Result<()> {
        if !is_valid_pin(pin) {
            return Err(StageTimerError::InvalidPin(
                "The admin PIN must be 5 numerical digits.".to_string(),
            ));
        }

        let response = self
            .http
            .post(self.login_url.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(format!("pin={pin}"))
            .send()
            .map_err(|e| {
                error!("Login request failed: {e}");
                StageTimerError::Transport {
                    endpoint: "/login".to_string(),
                    message: e.to_string(),
                }
            })?;

        if !response.status().is_success() || response.url().path() == self.login_url.path() {
            warn!("Login rejected (HTTP {})", response.status().as_u16());
            return Err(StageTimerError::LoginRejected);
        }

        debug!("Admin session established");
        Ok(())
    }

    fn call_json<T: Serialize + ?Sized>(&self, endpoint: &str, method: Method, body: &T) -> Result<ApiOutcome> {
        let value = serde_json::to_value(body)?;
        Ok(self.call(endpoint, method, Some(&value)))
    }

    fn execute(&self, endpoint: &str, request: RequestBuilder) -> ApiOutcome {
        match request.send() {
            Ok(response) => self.read_response(endpoint, response),
            Err(e) => self.transport_failure(endpoint, &e),
        }
    }

    fn read_response(&self, endpoint: &str, response: Response) -> ApiOutcome {
        let status = response.status();

        if response.url().path() == self.login_url.path() {
            warn!("{endpoint} redirected to the login page; admin session missing");
            return ApiOutcome::HttpError {
                endpoint: endpoint.to_string(),
                status: LOGIN_REQUIRED_STATUS,
                data: Some(json!({ "error": "Admin login required" })),
            };
        }

        let data = if status == StatusCode::NO_CONTENT {
            None
        } else {
            match response.text() {
                Ok(body) => serde_json::from_str(&body).ok(),
                Err(e) => {
                    warn!("Failed to read response body from {endpoint}: {e}");
                    None
                }
            }
        };

        if status.is_success() {
            ApiOutcome::Success {
                status: status.as_u16(),
                data,
            }
        } else {
            warn!("{endpoint} returned HTTP {}", status.as_u16());
            ApiOutcome::HttpError {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                data,
            }
        }
    }

    fn transport_failure(&self, endpoint: &str, e: &dyn std::error::Error) -> ApiOutcome {
        error!("Network error or API call failed for {endpoint}: {e}");
        if let Some(notifier) = &self.notifier {
            notifier.alert(&format!(
                "Network error or API call failed for {endpoint}. See the log for details."
            ));
        }
        ApiOutcome::TransportFailure {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        }
    }
}

/// Whether `pin` is exactly five ASCII digits
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == 5 && pin.bytes().all(|b| b.is_ascii_digit())
}

fn join_endpoint(base: &Url, endpoint: &str) -> Result<Url> {
    base.join(endpoint.trim_start_matches('/'))
        .map_err(|e| StageTimerError::ConfigError(Box::new(e)))
}

fn push_segment(mut url: Url, segment: &str) -> Url {
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(&ServiceSettings {
            base_url: base_url.to_string(),
            ..ServiceSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let client = client_for("http://stage.local:5000/timer");
        assert_eq!(client.base_url().as_str(), "http://stage.local:5000/timer/");
        assert_eq!(
            client.endpoint_url("/api/timer_status").unwrap().as_str(),
            "http://stage.local:5000/timer/api/timer_status"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = ApiClient::new(&ServiceSettings {
            base_url: "not a url".to_string(),
            ..ServiceSettings::default()
        });
        assert!(matches!(result, Err(StageTimerError::ConfigError(_))));
    }

    #[test]
    fn test_logo_url_encodes_filename() {
        let client = client_for("http://127.0.0.1:5000");
        assert_eq!(
            client.logo_url("a b.png"),
            "http://127.0.0.1:5000/static/uploads/a%20b.png"
        );
    }

    #[test]
    fn test_pin_validation() {
        assert!(is_valid_pin("12345"));
        assert!(!is_valid_pin("1234"));
        assert!(!is_valid_pin("123456"));
        assert!(!is_valid_pin("12a45"));
        assert!(!is_valid_pin("１２３４５"));
    }

    #[test]
    fn test_login_rejects_malformed_pin_without_request() {
        let client = client_for("http://127.0.0.1:9");
        assert!(matches!(
            client.login("12"),
            Err(StageTimerError::InvalidPin(_))
        ));
    }

    #[test]
    fn test_outcome_field_and_result() {
        let outcome = ApiOutcome::HttpError {
            endpoint: "/api/change_pin".to_string(),
            status: 403,
            data: Some(json!({ "error": "Current PIN is incorrect." })),
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.field("error"), Some("Current PIN is incorrect."));
        match outcome.into_result() {
            Err(StageTimerError::HttpStatus { status, message, .. }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Current PIN is incorrect.");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_outcome_without_error_text_uses_reason() {
        let outcome = ApiOutcome::HttpError {
            endpoint: "/api/theme".to_string(),
            status: 500,
            data: None,
        };
        assert!(matches!(
            outcome.into_result(),
            Err(StageTimerError::HttpStatus { message, .. }) if message == "Internal Server Error"
        ));
    }
}
