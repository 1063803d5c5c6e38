use gloo::events::EventListener;
use gloo_utils::document;
use log::debug;
use shared::{GameFilterSelectors, GameQuery};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use crate::dom;

const EMPTY_MARKER_SELECTOR: &str = "[data-game-filter-empty]";

/// Live filter over the game cards on the dashboard.
pub struct GameFilter {
    _listener: EventListener,
}

impl GameFilter {
    /// Attaches to the filter input; `None` when the page has no filter.
    pub fn install(selectors: GameFilterSelectors) -> Option<Self> {
        let input = document()
            .query_selector(&selectors.input)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let Some(input) = input else {
            debug!("No game filter input matches '{}'", selectors.input);
            return None;
        };

        let cards = selectors.cards.clone();
        let listener = EventListener::new(&input, "input", move |event| {
            if let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            {
                apply(&cards, &input.value());
            }
        });

        // A value restored by the browser on back-navigation is applied right away.
        apply(&selectors.cards, &input.value());

        Some(Self {
            _listener: listener,
        })
    }
}

fn card_name(card: &Element) -> String {
    dom::attr(card, "data-game-name")
        .or_else(|| card.text_content())
        .unwrap_or_default()
}

/// Shows matching cards and hides the rest. Returns how many stay visible.
pub fn apply(card_selector: &str, raw_query: &str) -> usize {
    let query = GameQuery::new(raw_query);
    let cards = dom::query_document(card_selector);
    let names: Vec<String> = cards.iter().map(card_name).collect();
    let visibility = query.visibility(names.iter().map(String::as_str));

    let mut shown = 0;
    for (card, visible) in cards.iter().zip(visibility) {
        dom::set_visible(card, visible);
        if visible {
            shown += 1;
        }
    }

    for marker in dom::query_document(EMPTY_MARKER_SELECTOR) {
        dom::set_visible(&marker, shown == 0);
    }

    debug!("Game filter '{}': {} of {} cards shown", raw_query, shown, cards.len());
    shown
}
