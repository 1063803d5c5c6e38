//! Turns clicks, button presses and context-menu picks on participant rows
//! into removal requests.

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use log::{debug, warn};
use shared::{Participant, ParticipantId, Point};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, KeyboardEvent, MouseEvent};
use yew::Callback;

use crate::components::context_menu::ContextMenuHandle;
use crate::dom;
use crate::removal::flow::{Page, RemovalFlow, RemovalRequest, Transport};

pub const ROW_SELECTOR: &str = "tr[data-participant-id]";
pub const REMOVE_BUTTON_SELECTOR: &str = ".remove-btn";
pub const COMPLETE_REMOVE_BUTTON_SELECTOR: &str = ".complete-remove-btn";
pub const CLICKABLE_ROW_CLASS: &str = "clickable-row";

const ROW_CONTROLS_SELECTOR: &str = ".remove-btn, .complete-remove-btn";

/// Participant data as found in `data-*` attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantAttrs {
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl ParticipantAttrs {
    pub fn from_button(el: &Element) -> Self {
        Self {
            id: dom::attr(el, "data-user-id"),
            name: dom::attr(el, "data-user-name"),
            phone: dom::attr(el, "data-user-phone"),
        }
    }

    pub fn from_row(el: &Element) -> Self {
        Self {
            id: dom::attr(el, "data-participant-id"),
            name: dom::attr(el, "data-participant-name"),
            phone: dom::attr(el, "data-participant-phone"),
        }
    }

    /// Button attributes win; the row fills whatever the button leaves out.
    pub fn or(self, fallback: Option<&ParticipantAttrs>) -> Self {
        match fallback {
            Some(row) => Self {
                id: self.id.or_else(|| row.id.clone()),
                name: self.name.or_else(|| row.name.clone()),
                phone: self.phone.or_else(|| row.phone.clone()),
            },
            None => self,
        }
    }

    pub fn into_participant(self) -> Option<Participant> {
        let id = ParticipantId::new(self.id?).ok()?;
        Some(Participant::new(id, self.name.unwrap_or_default(), self.phone))
    }
}

/// What a click landed on, reduced to what the removal triggers care about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickContext {
    pub complete_button: Option<ParticipantAttrs>,
    pub remove_button: Option<ParticipantAttrs>,
    pub row: Option<ParticipantAttrs>,
    pub row_has_controls: bool,
    pub inside_interactive: bool,
}

impl ClickContext {
    pub fn from_target(target: &Element) -> Self {
        let row_el = dom::closest(target, ROW_SELECTOR);
        let row_has_controls = row_el
            .as_ref()
            .map(|row| !dom::query_all(row, ROW_CONTROLS_SELECTOR).is_empty())
            .unwrap_or(false);
        Self {
            complete_button: dom::closest(target, COMPLETE_REMOVE_BUTTON_SELECTOR)
                .map(|el| ParticipantAttrs::from_button(&el)),
            remove_button: dom::closest(target, REMOVE_BUTTON_SELECTOR)
                .map(|el| ParticipantAttrs::from_button(&el)),
            row: row_el.as_ref().map(ParticipantAttrs::from_row),
            row_has_controls,
            inside_interactive: dom::closest(target, dom::INTERACTIVE_SELECTOR).is_some(),
        }
    }
}

/// Removal a click asks for, if any.
pub fn classify_click(ctx: &ClickContext) -> Option<RemovalRequest> {
    if let Some(button) = &ctx.complete_button {
        return button
            .clone()
            .or(ctx.row.as_ref())
            .into_participant()
            .map(RemovalRequest::complete);
    }
    if let Some(button) = &ctx.remove_button {
        return button
            .clone()
            .or(ctx.row.as_ref())
            .into_participant()
            .map(RemovalRequest::partial);
    }
    match &ctx.row {
        Some(row) if !ctx.inside_interactive && !ctx.row_has_controls => {
            row.clone().into_participant().map(RemovalRequest::partial)
        }
        _ => None,
    }
}

/// Owns the removal flow, the page listeners and the lazily created context menu.
pub struct RemovalController<P: 'static, T: 'static> {
    flow: Rc<RemovalFlow<P, T>>,
    menu: RefCell<Option<ContextMenuHandle>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl<P: Page + 'static, T: Transport + 'static> RemovalController<P, T> {
    pub fn new(flow: RemovalFlow<P, T>) -> Rc<Self> {
        Rc::new(Self {
            flow: Rc::new(flow),
            menu: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Marks clickable rows and attaches the document listeners.
    pub fn install(self: &Rc<Self>) {
        let document = gloo_utils::document();
        let mut marked = 0;
        for row in dom::query_document(ROW_SELECTOR) {
            if dom::query_all(&row, ROW_CONTROLS_SELECTOR).is_empty() {
                if let Err(e) = row.class_list().add_1(CLICKABLE_ROW_CLASS) {
                    warn!("Could not mark participant row: {:?}", e);
                }
                marked += 1;
            }
        }
        debug!("Marked {} participant rows as clickable", marked);

        let capture = EventListenerOptions {
            phase: EventListenerPhase::Capture,
            passive: false,
        };

        let click = {
            let this = Rc::clone(self);
            EventListener::new_with_options(&document, "click", capture, move |event| {
                let Some(target) = event.target() else {
                    return;
                };
                if this.menu_contains(&target) {
                    return;
                }
                this.hide_menu();

                let Some(element) = target.dyn_ref::<Element>() else {
                    return;
                };
                if let Some(request) = classify_click(&ClickContext::from_target(element)) {
                    event.prevent_default();
                    event.stop_propagation();
                    this.start(request);
                }
            })
        };

        let context_menu = {
            let this = Rc::clone(self);
            EventListener::new_with_options(
                &document,
                "contextmenu",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(row) = dom::element_from_target(event.target())
                        .and_then(|el| dom::closest(&el, ROW_SELECTOR))
                    else {
                        return;
                    };
                    let Some(participant) = ParticipantAttrs::from_row(&row).into_participant() else {
                        return;
                    };
                    let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    event.prevent_default();
                    let cursor = Point {
                        x: f64::from(mouse.client_x()),
                        y: f64::from(mouse.client_y()),
                    };
                    this.open_menu(cursor, participant);
                },
            )
        };

        let keydown = {
            let this = Rc::clone(self);
            EventListener::new(&document, "keydown", move |event| {
                if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                    if key.key() == "Escape" {
                        this.hide_menu();
                    }
                }
            })
        };

        self.listeners
            .borrow_mut()
            .extend([click, context_menu, keydown]);
    }

    /// Detaches the page listeners and unmounts the menu.
    pub fn uninstall(&self) {
        self.listeners.borrow_mut().clear();
        if let Some(menu) = self.menu.borrow_mut().take() {
            menu.unmount();
        }
    }

    /// The context menu element while it is open.
    pub fn menu_element(&self) -> Option<Element> {
        self.menu.borrow().as_ref().and_then(ContextMenuHandle::rendered)
    }

    /// Runs one removal in the background.
    pub fn start(self: &Rc<Self>, request: RemovalRequest) {
        let flow = Rc::clone(&self.flow);
        spawn_local(async move {
            let outcome = flow.run(&request).await;
            debug!("Removal of {} finished: {:?}", request.participant.id, outcome);
        });
    }

    fn open_menu(self: &Rc<Self>, cursor: Point, participant: Participant) {
        let mut menu = self.menu.borrow_mut();
        if menu.is_none() {
            let this = Rc::clone(self);
            let on_remove = Callback::from(move |participant: Participant| {
                this.start(RemovalRequest::partial(participant));
            });
            match ContextMenuHandle::mount(on_remove) {
                Ok(handle) => *menu = Some(handle),
                Err(e) => {
                    warn!("Context menu unavailable: {}", e);
                    return;
                }
            }
        }
        if let Some(handle) = menu.as_ref() {
            handle.open(cursor, dom::viewport_size(), participant);
        }
    }

    fn hide_menu(&self) {
        if let Some(handle) = self.menu.borrow().as_ref() {
            handle.hide();
        }
    }

    fn menu_contains(&self, target: &web_sys::EventTarget) -> bool {
        self.menu
            .borrow()
            .as_ref()
            .map(|handle| handle.contains(target))
            .unwrap_or(false)
    }
}
