use anyhow::Context;
use log::{info, warn};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

pub mod active_tab;
pub mod config;
pub mod dom;
pub mod error;
pub mod game_filter;
pub mod components {
    pub mod context_menu;
}
pub mod removal {
    pub mod browser;
    pub mod flow;
    pub mod triggers;

    pub use browser::{BrowserPage, FetchTransport};
    pub use flow::{
        Navigation, Page, RemovalFlow, RemovalOutcome, RemovalRequest, RemovalState, Transport,
    };
    pub use triggers::{classify_click, ClickContext, ParticipantAttrs, RemovalController};
}


use active_tab::ActiveTabTracker;
use game_filter::GameFilter;
use removal::{BrowserPage, FetchTransport, RemovalController, RemovalFlow};

type BrowserController = RemovalController<BrowserPage, FetchTransport>;

/// Everything the page enhancements keep alive for the page's lifetime.
struct Enhancements {
    _filter: Option<GameFilter>,
    _tabs: ActiveTabTracker,
    _removal: std::rc::Rc<BrowserController>,
}

thread_local! {
    static ENHANCEMENTS: RefCell<Option<Enhancements>> = RefCell::new(None);
}

fn install(config: shared::ClientConfig) -> anyhow::Result<Enhancements> {
    // The context menu host and fallback forms are appended to <body>.
    gloo_utils::document()
        .body()
        .context("page has no <body> to attach enhancements to")?;

    let filter = GameFilter::install(config.game_filter.clone());
    let tabs = ActiveTabTracker::install();

    info!("Participant removal uses {:?} endpoints", config.deployment);
    let flow = RemovalFlow::new(config, BrowserPage, FetchTransport);
    let removal = RemovalController::new(flow);
    removal.install();

    Ok(Enhancements {
        _filter: filter,
        _tabs: tabs,
        _removal: removal,
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let (config, config_error) = config::load();

    wasm_logger::init(wasm_logger::Config::new(config.log_level()));
    console_error_panic_hook::set_once();
    if let Some(e) = config_error {
        warn!("Falling back to default client config: {}", e);
    }

    let enhancements = install(config).map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    ENHANCEMENTS.with(|slot| *slot.borrow_mut() = Some(enhancements));
    info!("Page enhancements installed");
    Ok(())
}
