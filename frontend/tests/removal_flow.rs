//! End-to-end removal scenarios against recording fakes of the page and transport.
//!
//! Compiled for native targets only; the browser bindings are covered by dom_tests.rs.

#![cfg(not(target_arch = "wasm32"))]

use async_trait::async_trait;
use frontend::error::{FrontendError, TransportError};
use frontend::removal::{
    classify_click, ClickContext, Navigation, Page, ParticipantAttrs, RemovalFlow, RemovalOutcome,
    RemovalState, Transport,
};
use futures::executor::block_on;
use pretty_assertions::assert_eq;
use rstest::rstest;
use shared::{ActiveTab, ClientConfig, HttpReply, TabSet};
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq)]
enum PageEvent {
    Confirm(String),
    Alert(String),
    ExistingForm(String),
    NewForm(String),
    Reload,
    Redirect(String),
}

#[derive(Default)]
struct RecordingPage {
    accept: bool,
    has_form_for: Option<String>,
    highlighted_tab: Option<String>,
    events: RefCell<Vec<PageEvent>>,
}

impl RecordingPage {
    fn accepting() -> Self {
        Self {
            accept: true,
            ..Default::default()
        }
    }

    fn events(&self) -> Vec<PageEvent> {
        self.events.borrow().clone()
    }

    fn navigated(&self) -> bool {
        self.events.borrow().iter().any(|e| {
            matches!(
                e,
                PageEvent::Reload | PageEvent::Redirect(_) | PageEvent::NewForm(_)
            )
        })
    }
}

impl Page for &RecordingPage {
    fn confirm(&self, message: &str) -> bool {
        self.events.borrow_mut().push(PageEvent::Confirm(message.to_string()));
        self.accept
    }

    fn alert(&self, message: &str) {
        self.events.borrow_mut().push(PageEvent::Alert(message.to_string()));
    }

    fn submit_existing_form(&self, action: &str) -> bool {
        let found = self.has_form_for.as_deref() == Some(action);
        if found {
            self.events
                .borrow_mut()
                .push(PageEvent::ExistingForm(action.to_string()));
        }
        found
    }

    fn submit_new_form(&self, action: &str) -> Result<(), FrontendError> {
        self.events.borrow_mut().push(PageEvent::NewForm(action.to_string()));
        Ok(())
    }

    fn reload(&self) {
        self.events.borrow_mut().push(PageEvent::Reload);
    }

    fn redirect(&self, url: &str) {
        self.events.borrow_mut().push(PageEvent::Redirect(url.to_string()));
    }

    fn active_tab(&self, tabs: &TabSet) -> ActiveTab {
        tabs.resolve([self.highlighted_tab.as_deref()])
    }
}

struct FixedTransport {
    reply: Result<HttpReply, TransportError>,
    posted: RefCell<Vec<String>>,
}

impl FixedTransport {
    fn replying(status: u16, body: &str) -> Self {
        Self {
            reply: Ok(HttpReply::new(status, body)),
            posted: RefCell::new(Vec::new()),
        }
    }

    fn unreachable() -> Self {
        Self {
            reply: Err(TransportError::Network("Failed to fetch".into())),
            posted: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl<'a> Transport for &'a FixedTransport {
    async fn post(&self, url: &str) -> Result<HttpReply, TransportError> {
        self.posted.borrow_mut().push(url.to_string());
        self.reply.clone()
    }
}

fn button(id: &str, name: &str, phone: Option<&str>) -> ParticipantAttrs {
    ParticipantAttrs {
        id: Some(id.into()),
        name: Some(name.into()),
        phone: phone.map(str::to_string),
    }
}

fn complete_click() -> ClickContext {
    ClickContext {
        complete_button: Some(button("42", "Asha", Some("9990002222"))),
        inside_interactive: true,
        ..Default::default()
    }
}

fn partial_click() -> ClickContext {
    ClickContext {
        remove_button: Some(button("42", "Asha", Some("9990002222"))),
        inside_interactive: true,
        ..Default::default()
    }
}

#[test]
fn complete_removal_button_click_posts_and_reloads() {
    let page = RecordingPage::accepting();
    let transport = FixedTransport::replying(200, r#"{"success": true}"#);
    let flow = RemovalFlow::new(ClientConfig::default(), &page, &transport);

    let request = classify_click(&complete_click()).expect("click maps to a removal");
    let outcome = block_on(flow.run(&request));

    assert_eq!(outcome, RemovalOutcome::Resolved(Navigation::Reload));
    assert_eq!(*transport.posted.borrow(), vec!["/api/complete-remove-user/42"]);
    let events = page.events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        PageEvent::Confirm(prompt) => {
            assert!(prompt.contains("Asha"));
            assert!(prompt.contains("9990002222"));
        }
        other => panic!("expected a confirmation first, got {:?}", other),
    }
    assert_eq!(events[1], PageEvent::Reload);
}

#[test]
fn declined_confirmation_sends_nothing() {
    let page = RecordingPage::default();
    let transport = FixedTransport::replying(200, r#"{"success": true}"#);
    let flow = RemovalFlow::new(ClientConfig::default(), &page, &transport);

    for click in [complete_click(), partial_click()] {
        let request = classify_click(&click).expect("click maps to a removal");
        assert_eq!(block_on(flow.run(&request)), RemovalOutcome::Declined);
        assert_eq!(flow.state(), RemovalState::Idle);
    }

    assert!(transport.posted.borrow().is_empty());
    assert!(!page.navigated());
}

#[rstest]
#[case::rejected(200, r#"{"success": false, "error": "User is registered for a game"}"#, "User is registered for a game")]
#[case::rejected_without_reason(200, r#"{"success": false}"#, "Failed to remove participant. Please try again.")]
#[case::forbidden(403, r#"{"error": "Admin access required"}"#, "Admin access required")]
#[case::server_error(500, "", "Failed to remove participant (server returned 500).")]
fn failed_removal_alerts_and_never_navigates(
    #[case] status: u16,
    #[case] body: &str,
    #[case] expected_alert: &str,
) {
    for click in [complete_click(), partial_click()] {
        let page = RecordingPage::accepting();
        let transport = FixedTransport::replying(status, body);
        let flow = RemovalFlow::new(ClientConfig::default(), &page, &transport);

        let request = classify_click(&click).expect("click maps to a removal");
        let outcome = block_on(flow.run(&request));

        assert_eq!(
            outcome,
            RemovalOutcome::Failed {
                message: expected_alert.to_string(),
                fallback_form: None,
            }
        );
        assert_eq!(flow.state(), RemovalState::Failed);
        assert!(page.events().contains(&PageEvent::Alert(expected_alert.to_string())));
        assert!(!page.navigated());
    }
}

#[test]
fn partial_removal_redirects_back_to_highlighted_tab() {
    let page = RecordingPage {
        highlighted_tab: Some("whitelist".into()),
        ..RecordingPage::accepting()
    };
    let transport = FixedTransport::replying(200, r#"{"success": true}"#);
    let flow = RemovalFlow::new(ClientConfig::default(), &page, &transport);

    let request = classify_click(&partial_click()).expect("click maps to a removal");
    let outcome = block_on(flow.run(&request));

    assert_eq!(
        outcome,
        RemovalOutcome::Resolved(Navigation::Redirect("/admin?tab=whitelist".into()))
    );
    assert_eq!(*transport.posted.borrow(), vec!["/api/remove-user/42"]);
}

#[test]
fn partial_removal_uses_same_page_form_when_present() {
    let page = RecordingPage {
        has_form_for: Some("/admin/user/remove/42".into()),
        ..RecordingPage::accepting()
    };
    let transport = FixedTransport::replying(200, r#"{"success": true}"#);
    let flow = RemovalFlow::new(ClientConfig::default(), &page, &transport);

    let request = classify_click(&partial_click()).expect("click maps to a removal");
    block_on(flow.run(&request));

    assert!(transport.posted.borrow().is_empty());
    assert!(page
        .events()
        .contains(&PageEvent::ExistingForm("/admin/user/remove/42".into())));
}

#[test]
fn unreachable_server_falls_back_to_form_for_partial_only() {
    let page = RecordingPage {
        highlighted_tab: Some("nonsense".into()),
        ..RecordingPage::accepting()
    };
    let transport = FixedTransport::unreachable();
    let flow = RemovalFlow::new(ClientConfig::default(), &page, &transport);

    let request = classify_click(&partial_click()).expect("click maps to a removal");
    block_on(flow.run(&request));

    let events = page.events();
    let alert_at = events
        .iter()
        .position(|e| matches!(e, PageEvent::Alert(_)))
        .expect("admin is alerted");
    let form_at = events
        .iter()
        .position(|e| e == &PageEvent::NewForm("/admin/user/remove/42?tab=overview".into()))
        .expect("fallback form is submitted");
    assert!(alert_at < form_at);

    let page = RecordingPage::accepting();
    let transport = FixedTransport::unreachable();
    let flow = RemovalFlow::new(ClientConfig::default(), &page, &transport);
    let request = classify_click(&complete_click()).expect("click maps to a removal");
    block_on(flow.run(&request));
    assert!(!page.navigated());
}

#[test]
fn custom_endpoint_templates_are_honored() {
    let config = ClientConfig::from_json(
        r#"{
            "deployment": "local",
            "endpoints": { "complete_local": "/v2/purge/{id}" }
        }"#,
    )
    .expect("valid config");
    let page = RecordingPage::accepting();
    let transport = FixedTransport::replying(200, r#"{"success": true}"#);
    let flow = RemovalFlow::new(config, &page, &transport);

    let request = classify_click(&complete_click()).expect("click maps to a removal");
    block_on(flow.run(&request));

    assert_eq!(
        *transport.posted.borrow(),
        vec!["/v2/purge/42"]
    );
}
