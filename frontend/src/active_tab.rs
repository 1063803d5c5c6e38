use gloo::events::EventListener;
use gloo_storage::{SessionStorage, Storage};
use gloo_utils::{document, window};
use log::{debug, warn};
use shared::{ActiveTab, TabSet};
use web_sys::UrlSearchParams;

use crate::dom;

const STORAGE_KEY: &str = "admin_active_tab";
const TAB_SELECTOR: &str = "[data-tab]";
const ACTIVE_TAB_SELECTOR: &str = "[data-tab].active, [data-tab][aria-selected=\"true\"]";

/// Remembers which admin tab the user last opened so removals can return to it.
pub struct ActiveTabTracker {
    _listener: EventListener,
}

impl ActiveTabTracker {
    pub fn install() -> Self {
        let listener = EventListener::new(&document(), "click", |event| {
            let Some(target) = dom::element_from_target(event.target()) else {
                return;
            };
            if let Some(tab) = dom::closest(&target, TAB_SELECTOR).and_then(|el| dom::attr(&el, "data-tab")) {
                debug!("Admin tab selected: {}", tab);
                if let Err(e) = SessionStorage::set(STORAGE_KEY, tab) {
                    warn!("Could not remember active tab: {}", e);
                }
            }
        });
        Self { _listener: listener }
    }
}

/// Tab currently on screen: the highlighted tab control, then the last tab
/// clicked in this session, then `?tab=` in the address, then the default.
pub fn current(tabs: &TabSet) -> ActiveTab {
    let highlighted = dom::query_document(ACTIVE_TAB_SELECTOR)
        .first()
        .and_then(|el| dom::attr(el, "data-tab"));
    let remembered = SessionStorage::get::<String>(STORAGE_KEY).ok();
    let from_url = window()
        .location()
        .search()
        .ok()
        .and_then(|search| UrlSearchParams::new_with_str(&search).ok())
        .and_then(|params| params.get("tab"));

    tabs.resolve([
        highlighted.as_deref(),
        remembered.as_deref(),
        from_url.as_deref(),
    ])
}
