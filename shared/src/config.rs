use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use log::warn;
use std::fmt;

use crate::error::{Result, SharedError};
use crate::models::participant::{ParticipantId, RemovalKind};
use crate::models::tab::{ActiveTab, TabSet, DEFAULT_TAB, DEFAULT_TABS};

const ID_PLACEHOLDER: &str = "{id}";

/// Where the page is being served from. Chooses between the two
/// complete-removal routes the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    Local,
    Hosted,
}

impl Default for Deployment {
    fn default() -> Self {
        Deployment::Hosted
    }
}

impl std::str::FromStr for Deployment {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" | "dev" | "development" => Ok(Deployment::Local),
            "hosted" | "prod" | "production" | "vercel" => Ok(Deployment::Hosted),
            other => Err(SharedError::Config(format!("Unknown deployment: {}", other))),
        }
    }
}

/// A URL path with exactly one `{id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointTemplate(String);

impl EndpointTemplate {
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if !raw.starts_with('/') {
            return Err(SharedError::InvalidEndpointTemplate(format!(
                "'{}' must be an absolute path",
                raw
            )));
        }
        if raw.contains(|c| c == '?' || c == '#') {
            return Err(SharedError::InvalidEndpointTemplate(format!(
                "'{}' must be a bare path without query or fragment",
                raw
            )));
        }
        if raw.matches(ID_PLACEHOLDER).count() != 1 {
            return Err(SharedError::InvalidEndpointTemplate(format!(
                "'{}' must contain {} exactly once",
                raw, ID_PLACEHOLDER
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, id: &ParticipantId) -> String {
        self.0.replace(ID_PLACEHOLDER, &id.to_path_segment())
    }
}

impl TryFrom<String> for EndpointTemplate {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<EndpointTemplate> for String {
    fn from(t: EndpointTemplate) -> Self {
        t.0
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn template(raw: &str) -> EndpointTemplate {
    EndpointTemplate(raw.to_string())
}

/// How the response of an endpoint should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{success, error?}` JSON body.
    Json,
    /// Anything; a 2xx status alone means success.
    Redirect,
}

/// A concrete request target produced by the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub shape: ResponseShape,
}

/// Maps removal kind (and deployment, for complete removal) to the server route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPolicy {
    pub partial: EndpointTemplate,
    pub complete_local: EndpointTemplate,
    pub complete_hosted: EndpointTemplate,
    pub fallback_form: EndpointTemplate,
}

impl Default for EndpointPolicy {
    fn default() -> Self {
        Self {
            partial: template("/api/remove-user/{id}"),
            complete_local: template("/admin/api-complete-remove-user/{id}"),
            complete_hosted: template("/api/complete-remove-user/{id}"),
            fallback_form: template("/admin/user/remove/{id}"),
        }
    }
}

impl EndpointPolicy {
    pub fn api_endpoint(
        &self,
        kind: RemovalKind,
        deployment: Deployment,
        id: &ParticipantId,
    ) -> Endpoint {
        let template = match (kind, deployment) {
            (RemovalKind::Partial, _) => &self.partial,
            (RemovalKind::Complete, Deployment::Local) => &self.complete_local,
            (RemovalKind::Complete, Deployment::Hosted) => &self.complete_hosted,
        };
        Endpoint {
            url: template.render(id),
            shape: ResponseShape::Json,
        }
    }

    /// Path a same-page removal form posts to; used to find that form.
    pub fn form_action(&self, id: &ParticipantId) -> String {
        self.fallback_form.render(id)
    }

    /// Traditional form target, carrying the tab so the server redirect lands on it.
    pub fn fallback_form_endpoint(&self, id: &ParticipantId, tab: &ActiveTab) -> Endpoint {
        Endpoint {
            url: format!(
                "{}?tab={}",
                self.form_action(id),
                urlencoding::encode(tab.as_str())
            ),
            shape: ResponseShape::Redirect,
        }
    }
}

/// Selectors used by the game filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GameFilterSelectors {
    #[validate(length(min = 1, message = "Filter input selector is required"))]
    pub input: String,
    #[validate(length(min = 1, message = "Game card selector is required"))]
    pub cards: String,
}

impl Default for GameFilterSelectors {
    fn default() -> Self {
        Self {
            input: "#game-filter".to_string(),
            cards: ".game-card".to_string(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_admin_path() -> String {
    "/admin".to_string()
}

fn default_tabs() -> Vec<String> {
    DEFAULT_TABS.iter().map(|t| t.to_string()).collect()
}

fn default_tab() -> String {
    DEFAULT_TAB.to_string()
}

fn validate_admin_path(path: &str) -> std::result::Result<(), ValidationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("admin_path_must_be_absolute"))
    }
}

fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("unknown_log_level")),
    }
}

fn validate_default_tab(config: &ClientConfig) -> std::result::Result<(), ValidationError> {
    if config.tabs.iter().any(|t| t == &config.default_tab) {
        Ok(())
    } else {
        Err(ValidationError::new("default_tab_not_in_tabs"))
    }
}

/// Configuration rendered by the server into the page for the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_default_tab", skip_on_field_errors = false))]
pub struct ClientConfig {
    #[serde(default)]
    pub deployment: Deployment,

    #[serde(default)]
    pub endpoints: EndpointPolicy,

    #[serde(default = "default_admin_path")]
    #[validate(custom = "validate_admin_path")]
    pub admin_path: String,

    #[serde(default = "default_tabs")]
    #[validate(length(min = 1, message = "At least one admin tab is required"))]
    pub tabs: Vec<String>,

    #[serde(default = "default_tab")]
    pub default_tab: String,

    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    #[serde(default)]
    #[validate]
    pub game_filter: GameFilterSelectors,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            deployment: Deployment::default(),
            endpoints: EndpointPolicy::default(),
            admin_path: default_admin_path(),
            tabs: default_tabs(),
            default_tab: default_tab(),
            log_level: default_log_level(),
            game_filter: GameFilterSelectors::default(),
        }
    }
}

impl ClientConfig {
    /// Parses and validates the JSON block embedded in the page.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(raw)
            .map_err(|e| SharedError::Config(format!("Invalid client config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`ClientConfig::from_json`] but never fails: problems are logged
    /// and the defaults are used instead.
    pub fn from_json_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|r| !r.is_empty()) {
            Some(raw) => Self::from_json(raw).unwrap_or_else(|e| {
                warn!("Falling back to default client config: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn tab_set(&self) -> TabSet {
        TabSet::new(self.tabs.clone(), self.default_tab.clone())
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// `/admin?tab=<tab>`: where a partial removal lands after success.
    pub fn admin_redirect(&self, tab: &ActiveTab) -> String {
        format!(
            "{}?tab={}",
            self.admin_path,
            urlencoding::encode(tab.as_str())
        )
    }
}
