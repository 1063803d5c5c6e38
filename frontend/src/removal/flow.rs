use async_trait::async_trait;
use log::{debug, error, info, warn};
use shared::{
    interpret_reply, ActiveTab, ClientConfig, HttpReply, Participant, RemovalKind, TabSet,
};
use std::cell::Cell;

use crate::error::{FrontendError, TransportError};

/// Blocking dialogs, forms and navigation of the page hosting the flow.
#[cfg_attr(test, mockall::automock)]
pub trait Page {
    fn confirm(&self, message: &str) -> bool;

    fn alert(&self, message: &str);

    /// Submits a removal form already rendered on the page whose action
    /// targets `action`. Returns false when the page has no such form.
    fn submit_existing_form(&self, action: &str) -> bool;

    /// Builds a hidden POST form for `action` and submits it.
    fn submit_new_form(&self, action: &str) -> Result<(), FrontendError>;

    fn reload(&self);

    fn redirect(&self, url: &str);

    fn active_tab(&self, tabs: &TabSet) -> ActiveTab;
}

/// Issues the removal POST requests.
#[async_trait(?Send)]
pub trait Transport {
    async fn post(&self, url: &str) -> Result<HttpReply, TransportError>;
}

/// Where a single removal attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalState {
    Idle,
    Triggered,
    Confirming,
    Requesting,
    Resolved,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovalRequest {
    pub participant: Participant,
    pub kind: RemovalKind,
}

impl RemovalRequest {
    pub fn partial(participant: Participant) -> Self {
        Self {
            participant,
            kind: RemovalKind::Partial,
        }
    }

    pub fn complete(participant: Participant) -> Self {
        Self {
            participant,
            kind: RemovalKind::Complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Reload,
    Redirect(String),
    /// A same-page form was submitted; the browser follows the server redirect.
    FormSubmitted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The admin declined the confirmation; nothing was sent.
    Declined,
    Resolved(Navigation),
    /// The admin was alerted with `message`. `fallback_form` is set when a
    /// traditional form submission was started after a transport failure.
    Failed {
        message: String,
        fallback_form: Option<String>,
    },
}

/// Unified participant removal: confirm, request, then navigate or alert.
pub struct RemovalFlow<P, T> {
    config: ClientConfig,
    page: P,
    transport: T,
    state: Cell<RemovalState>,
}

impl<P: Page, T: Transport> RemovalFlow<P, T> {
    pub fn new(config: ClientConfig, page: P, transport: T) -> Self {
        Self {
            config,
            page,
            transport,
            state: Cell::new(RemovalState::Idle),
        }
    }

    /// State of the most recent attempt.
    pub fn state(&self) -> RemovalState {
        self.state.get()
    }

    fn enter(&self, state: RemovalState) {
        debug!("removal: {:?} -> {:?}", self.state.get(), state);
        self.state.set(state);
    }

    pub async fn run(&self, request: &RemovalRequest) -> RemovalOutcome {
        self.enter(RemovalState::Triggered);
        let participant = &request.participant;

        self.enter(RemovalState::Confirming);
        let prompt = request.kind.confirmation_prompt(participant);
        if !self.page.confirm(&prompt) {
            debug!("{} removal of {} declined", request.kind, participant.id);
            self.enter(RemovalState::Idle);
            return RemovalOutcome::Declined;
        }

        self.enter(RemovalState::Requesting);
        match request.kind {
            RemovalKind::Complete => self.remove_complete(participant).await,
            RemovalKind::Partial => self.remove_partial(participant).await,
        }
    }

    async fn remove_complete(&self, participant: &Participant) -> RemovalOutcome {
        let endpoint = self.config.endpoints.api_endpoint(
            RemovalKind::Complete,
            self.config.deployment,
            &participant.id,
        );
        info!("Completely removing participant {} via {}", participant.id, endpoint.url);

        match self.transport.post(&endpoint.url).await {
            Ok(reply) => match interpret_reply(&reply, endpoint.shape) {
                Ok(ack) => {
                    if let Some(message) = ack.message {
                        info!("{}", message);
                    }
                    self.resolve(Navigation::Reload)
                }
                Err(e) => {
                    warn!("Complete removal of {} rejected: {}", participant.id, e);
                    self.fail(e.user_message())
                }
            },
            Err(e) => {
                error!("Complete removal of {} failed: {}", participant.id, e);
                self.fail(network_message(participant, &e))
            }
        }
    }

    async fn remove_partial(&self, participant: &Participant) -> RemovalOutcome {
        let policy = &self.config.endpoints;
        let action = policy.form_action(&participant.id);
        if self.page.submit_existing_form(&action) {
            info!("Submitted same-page removal form for {}", participant.id);
            return self.resolve(Navigation::FormSubmitted(action));
        }

        let endpoint =
            policy.api_endpoint(RemovalKind::Partial, self.config.deployment, &participant.id);
        info!("Removing participant {} via {}", participant.id, endpoint.url);

        match self.transport.post(&endpoint.url).await {
            Ok(reply) => match interpret_reply(&reply, endpoint.shape) {
                Ok(_) => {
                    let tab = self.page.active_tab(&self.config.tab_set());
                    self.resolve(Navigation::Redirect(self.config.admin_redirect(&tab)))
                }
                Err(e) => {
                    warn!("Removal of {} rejected: {}", participant.id, e);
                    self.fail(e.user_message())
                }
            },
            Err(e) => {
                error!("Removal request for {} failed: {}", participant.id, e);
                let message = network_message(participant, &e);
                self.page.alert(&message);
                self.enter(RemovalState::Failed);

                let tab = self.page.active_tab(&self.config.tab_set());
                let fallback = policy.fallback_form_endpoint(&participant.id, &tab);
                let fallback_form = match self.page.submit_new_form(&fallback.url) {
                    Ok(()) => {
                        info!("Retrying removal of {} with form post to {}", participant.id, fallback.url);
                        Some(fallback.url)
                    }
                    Err(e) => {
                        error!("Fallback form submission failed: {}", e);
                        None
                    }
                };
                RemovalOutcome::Failed {
                    message,
                    fallback_form,
                }
            }
        }
    }

    fn resolve(&self, navigation: Navigation) -> RemovalOutcome {
        self.enter(RemovalState::Resolved);
        match &navigation {
            Navigation::Reload => self.page.reload(),
            Navigation::Redirect(url) => self.page.redirect(url),
            Navigation::FormSubmitted(_) => {}
        }
        RemovalOutcome::Resolved(navigation)
    }

    fn fail(&self, message: String) -> RemovalOutcome {
        self.enter(RemovalState::Failed);
        self.page.alert(&message);
        RemovalOutcome::Failed {
            message,
            fallback_form: None,
        }
    }
}

fn network_message(participant: &Participant, error: &TransportError) -> String {
    format!(
        "Could not reach the server while removing {}: {}",
        participant.display_name(),
        error
    )
}
