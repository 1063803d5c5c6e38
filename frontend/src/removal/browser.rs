use async_trait::async_trait;
use gloo_net::http::Request;
use gloo_utils::{document, window};
use log::{debug, warn};
use shared::{ActiveTab, HttpReply, TabSet};
use wasm_bindgen::JsCast;
use web_sys::{HtmlFormElement, RequestCredentials};

use crate::active_tab;
use crate::dom;
use crate::error::{FrontendError, TransportError};
use crate::removal::flow::{Page, Transport};

/// [`Page`] backed by the real window and document.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserPage;

impl Page for BrowserPage {
    fn confirm(&self, message: &str) -> bool {
        gloo::dialogs::confirm(message)
    }

    fn alert(&self, message: &str) {
        gloo::dialogs::alert(message);
    }

    fn submit_existing_form(&self, action: &str) -> bool {
        let form = dom::query_document("form[action]")
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlFormElement>().ok())
            .find(|form| {
                form.get_attribute("action")
                    .map(|attr| dom::form_action_matches(&attr, action))
                    .unwrap_or(false)
            });

        match form {
            Some(form) => match form.submit() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Same-page removal form could not be submitted: {:?}", e);
                    false
                }
            },
            None => {
                debug!("No same-page form posts to {}", action);
                false
            }
        }
    }

    fn submit_new_form(&self, action: &str) -> Result<(), FrontendError> {
        let form: HtmlFormElement = document()
            .create_element("form")?
            .dyn_into()
            .map_err(|_| FrontendError::Dom("created element is not a form".to_string()))?;
        form.set_method("post");
        form.set_action(action);
        form.set_attribute("hidden", "")?;
        document()
            .body()
            .ok_or_else(|| FrontendError::MissingElement("body".to_string()))?
            .append_child(&form)?;
        form.submit()?;
        Ok(())
    }

    fn reload(&self) {
        if let Err(e) = window().location().reload() {
            warn!("Reload failed: {:?}", e);
        }
    }

    fn redirect(&self, url: &str) {
        if let Err(e) = window().location().set_href(url) {
            warn!("Redirect to {} failed: {:?}", url, e);
        }
    }

    fn active_tab(&self, tabs: &TabSet) -> ActiveTab {
        active_tab::current(tabs)
    }
}

/// Same-origin `fetch` with the session cookie attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn post(&self, url: &str) -> Result<HttpReply, TransportError> {
        let response = Request::post(url)
            .header("Accept", "application/json")
            .credentials(RequestCredentials::SameOrigin)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!("POST {} -> {}", url, status);
        Ok(HttpReply::new(status, body))
    }
}
