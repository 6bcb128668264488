use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use shared::{CloseTicket, Lightbox, ModalEffects, ModalSession, FADE_OUT_MS};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent};
use yew::prelude::*;

use crate::services::logging::Logger;

/// Scroll lock on `document.body`
struct BodyScroll {
    body: Option<HtmlElement>,
}

impl BodyScroll {
    fn new() -> Self {
        Self {
            body: gloo::utils::document().body(),
        }
    }
}

impl BodyScroll {
    fn set_overflow(&self, value: &str) {
        let Some(body) = &self.body else {
            Logger::warn_with_component("lightbox", "No document body, scroll lock skipped");
            return;
        };
        if let Err(e) = body.style().set_property("overflow", value) {
            Logger::warn_with_component(
                "lightbox",
                &format!("Could not set body overflow to '{}': {:?}", value, e),
            );
        }
    }
}

impl ModalEffects for BodyScroll {
    fn suppress_scroll(&mut self) {
        self.set_overflow("hidden");
    }

    fn restore_scroll(&mut self) {
        self.set_overflow("");
    }
}

#[derive(Properties, PartialEq)]
pub struct ImageLightboxProps {
    pub image_url: AttrValue,
    pub alt: AttrValue,
    pub is_open: bool,
    pub on_close: Callback<()>,
    #[prop_or(FADE_OUT_MS)]
    pub fade_out_ms: u32,
}

#[function_component(ImageLightbox)]
pub fn image_lightbox(props: &ImageLightboxProps) -> Html {
    let lightbox = use_mut_ref(Lightbox::new);
    let fade_timer = use_mut_ref(|| Option::<Timeout>::None);
    let backdrop_ref = use_node_ref();
    let update = use_force_update();

    // Starts the fade; the parent hears about it once the fade is over
    let schedule_close: Callback<CloseTicket> = {
        let lightbox = lightbox.clone();
        let fade_timer = fade_timer.clone();
        let on_close = props.on_close.clone();
        let update = update.clone();
        let fade_out_ms = props.fade_out_ms;
        Callback::from(move |ticket: CloseTicket| {
            let lightbox = lightbox.clone();
            let on_close = on_close.clone();
            let after_fade = update.clone();
            let timeout = Timeout::new(fade_out_ms, move || {
                if lightbox.borrow_mut().finish_close(ticket) {
                    on_close.emit(());
                }
                after_fade.force_update();
            });
            *fade_timer.borrow_mut() = Some(timeout);
            update.force_update();
        })
    };

    // Follow the parent's open flag
    {
        let lightbox = lightbox.clone();
        let fade_timer = fade_timer.clone();
        let update = update.clone();
        use_effect_with(props.is_open, move |&is_open| {
            let mut state = lightbox.borrow_mut();
            let changed = if is_open {
                fade_timer.borrow_mut().take();
                let was_visible = state.is_visible();
                state.open();
                !was_visible
            } else if state.is_mounted() {
                fade_timer.borrow_mut().take();
                if let Some(ticket) = state.request_close() {
                    state.finish_close(ticket);
                }
                true
            } else {
                false
            };
            drop(state);
            if changed {
                update.force_update();
            }
        });
    }

    // Scroll lock and Escape listener live exactly as long as the modal is open
    {
        let lightbox = lightbox.clone();
        let schedule_close = schedule_close.clone();
        use_effect_with(props.is_open, move |&is_open| {
            let session = is_open.then(|| {
                let listener = EventListener::new(&gloo::utils::document(), "keydown", move |event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    let ticket = lightbox.borrow_mut().handle_key(&event.key());
                    if let Some(ticket) = ticket {
                        schedule_close.emit(ticket);
                    }
                });
                (ModalSession::acquire(BodyScroll::new()), listener)
            });
            move || drop(session)
        });
    }

    let on_backdrop_click = {
        let lightbox = lightbox.clone();
        let schedule_close = schedule_close.clone();
        let backdrop_ref = backdrop_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let on_backdrop = match (e.target_dyn_into::<Element>(), backdrop_ref.cast::<Element>()) {
                (Some(target), Some(backdrop)) => target == backdrop,
                _ => false,
            };
            let ticket = lightbox.borrow_mut().backdrop_click(on_backdrop);
            if let Some(ticket) = ticket {
                schedule_close.emit(ticket);
            }
        })
    };

    let on_close_click = {
        let lightbox = lightbox.clone();
        let schedule_close = schedule_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            let ticket = lightbox.borrow_mut().request_close();
            if let Some(ticket) = ticket {
                schedule_close.emit(ticket);
            }
        })
    };

    let on_image_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let (mounted, visible) = {
        let state = lightbox.borrow();
        (state.is_mounted(), state.is_visible())
    };

    if !props.is_open || !mounted {
        return html! {};
    }

    html! {
        <div
            ref={backdrop_ref}
            class={classes!("lightbox-backdrop", visible.then_some("visible"))}
            onclick={on_backdrop_click}
        >
            <button
                type="button"
                class="lightbox-close"
                aria-label="Close lightbox"
                onclick={on_close_click}
            >
                {"✕"}
            </button>
            <img
                src={props.image_url.clone()}
                alt={props.alt.clone()}
                class={classes!("lightbox-image", visible.then_some("visible"))}
                onclick={on_image_click}
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_body_scroll_lock_restores() {
        let body = gloo::utils::document().body().unwrap();
        {
            let _session = ModalSession::acquire(BodyScroll::new());
            assert_eq!(body.style().get_property_value("overflow").unwrap(), "hidden");
        }
        assert_eq!(body.style().get_property_value("overflow").unwrap(), "");
    }

    #[wasm_bindgen_test]
    fn test_missing_body_is_tolerated() {
        let mut scroll = BodyScroll { body: None };
        scroll.suppress_scroll();
        scroll.restore_scroll();
    }
}
