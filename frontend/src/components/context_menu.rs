use shared::{clamp_to_viewport, Participant, Point, Size};
use wasm_bindgen::JsCast;
use web_sys::{Element, Node};
use yew::prelude::*;
use yew::AppHandle;

use crate::error::FrontendError;

pub const MENU_CLASS: &str = "participant-context-menu";

/// Size assumed before the menu has been laid out once.
const ESTIMATED_SIZE: Size = Size { width: 180.0, height: 84.0 };

pub enum ContextMenuMsg {
    Open {
        cursor: Point,
        viewport: Size,
        participant: Participant,
    },
    Measured(Size),
    Remove,
    Hide,
}

#[derive(Properties, PartialEq)]
pub struct ContextMenuProps {
    pub on_remove: Callback<Participant>,
}

struct OpenMenu {
    cursor: Point,
    viewport: Size,
    placed: Point,
    participant: Participant,
}

/// Right-click menu for participant rows.
pub struct ContextMenu {
    open: Option<OpenMenu>,
    node: NodeRef,
}

impl Component for ContextMenu {
    type Message = ContextMenuMsg;
    type Properties = ContextMenuProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            open: None,
            node: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ContextMenuMsg::Open { cursor, viewport, participant } => {
                self.open = Some(OpenMenu {
                    cursor,
                    viewport,
                    placed: clamp_to_viewport(cursor, ESTIMATED_SIZE, viewport),
                    participant,
                });
                true
            }
            ContextMenuMsg::Measured(size) => match self.open.as_mut() {
                Some(menu) => {
                    let placed = clamp_to_viewport(menu.cursor, size, menu.viewport);
                    if placed == menu.placed {
                        false
                    } else {
                        menu.placed = placed;
                        true
                    }
                }
                None => false,
            },
            ContextMenuMsg::Remove => {
                if let Some(menu) = self.open.take() {
                    ctx.props().on_remove.emit(menu.participant);
                }
                true
            }
            ContextMenuMsg::Hide => self.open.take().is_some(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(menu) = self.open.as_ref() else {
            return html! {};
        };
        let style = format!(
            "position: fixed; left: {}px; top: {}px; z-index: 1000;",
            menu.placed.x, menu.placed.y
        );
        let on_remove = ctx.link().callback(|e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            ContextMenuMsg::Remove
        });

        html! {
            <div ref={self.node.clone()} class={MENU_CLASS} role="menu" {style}>
                <div class="context-menu-title">{ menu.participant.display_name() }</div>
                <button type="button" class="context-menu-item context-menu-remove" role="menuitem" onclick={on_remove}>
                    { "Remove" }
                </button>
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if self.open.is_none() {
            return;
        }
        if let Some(el) = self.node.cast::<Element>() {
            let rect = el.get_bounding_client_rect();
            ctx.link().send_message(ContextMenuMsg::Measured(Size {
                width: rect.width(),
                height: rect.height(),
            }));
        }
    }
}

/// Owned instance of the context menu mounted into its own host element.
pub struct ContextMenuHandle {
    host: Element,
    app: AppHandle<ContextMenu>,
}

impl ContextMenuHandle {
    pub fn mount(on_remove: Callback<Participant>) -> Result<Self, FrontendError> {
        let document = gloo_utils::document();
        let body = document
            .body()
            .ok_or_else(|| FrontendError::MissingElement("body".to_string()))?;
        let host = document.create_element("div")?;
        host.set_class_name("participant-context-menu-host");
        body.append_child(&host)?;
        let app = yew::Renderer::<ContextMenu>::with_root_and_props(
            host.clone(),
            ContextMenuProps { on_remove },
        )
        .render();
        Ok(Self { host, app })
    }

    pub fn open(&self, cursor: Point, viewport: Size, participant: Participant) {
        self.app.send_message(ContextMenuMsg::Open {
            cursor,
            viewport,
            participant,
        });
    }

    pub fn hide(&self) {
        self.app.send_message(ContextMenuMsg::Hide);
    }

    /// The menu element while it is open.
    pub fn rendered(&self) -> Option<Element> {
        self.host
            .query_selector(&format!(".{}", MENU_CLASS))
            .ok()
            .flatten()
    }

    pub fn unmount(self) {
        self.app.destroy();
        self.host.remove();
    }

    pub fn contains(&self, target: &web_sys::EventTarget) -> bool {
        target
            .dyn_ref::<Node>()
            .map(|node| self.host.contains(Some(node)))
            .unwrap_or(false)
    }
}
