use std::rc::Rc;

use gloo::timers::callback::Timeout;
use shared::{
    AdventBox as BoxMachine, ClickOutcome, RevealPlan, RevealStep, RevealTimings, PLACEHOLDER_IMAGE,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;
use yew::prelude::*;

use super::image_lightbox::ImageLightbox;
use super::reveal_overlay::RevealOverlay;
use crate::hooks::use_auth::use_auth;
use crate::hooks::use_day_image::use_day_image;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

/// Reveal steps running on browser timers. Steps that have not fired are
/// cancelled by `cancel_all` or when this is dropped.
#[derive(Default)]
pub struct RevealTimers {
    pending: Vec<Timeout>,
}

impl RevealTimers {
    pub fn schedule<F>(&mut self, plan: RevealPlan, on_step: F)
    where
        F: Fn(RevealStep) + 'static,
    {
        let on_step = Rc::new(on_step);
        for (delay, step) in plan.steps {
            let on_step = on_step.clone();
            self.pending.push(Timeout::new(delay, move || on_step(step)));
        }
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

#[derive(Properties, PartialEq)]
pub struct AdventBoxProps {
    pub day: u32,
    pub api_client: ApiClient,
    /// Backend already reports the day as open
    pub is_db_open: bool,
    /// Date gate allows opening today
    pub can_open: bool,
    pub on_open: Callback<u32>,
    #[prop_or_default]
    pub style: AttrValue,
    #[prop_or_default]
    pub timings: RevealTimings,
}

#[function_component(AdventBox)]
pub fn advent_box(props: &AdventBoxProps) -> Html {
    let auth = use_auth();
    let machine = {
        let (day, is_db_open, can_open) = (props.day, props.is_db_open, props.can_open);
        use_mut_ref(move || BoxMachine::new(day, is_db_open, can_open))
    };
    let timers = use_mut_ref(RevealTimers::default);
    let alive = use_mut_ref(|| true);
    let update = use_force_update();

    {
        let timers = timers.clone();
        let alive = alive.clone();
        use_effect_with((), move |_| {
            move || {
                *alive.borrow_mut() = false;
                timers.borrow_mut().cancel_all();
            }
        });
    }

    {
        let machine = machine.clone();
        let update = update.clone();
        use_effect_with((props.is_db_open, props.can_open), move |&(is_db_open, can_open)| {
            let before = machine.borrow().state();
            machine.borrow_mut().sync(is_db_open, can_open);
            if machine.borrow().state() != before {
                update.force_update();
            }
        });
    }

    let image = use_day_image(&props.api_client, props.day, machine.borrow().image_enabled());

    let on_click = {
        let machine = machine.clone();
        let timers = timers.clone();
        let alive = alive.clone();
        let update = update.clone();
        let api_client = props.api_client.clone();
        let on_open = props.on_open.clone();
        let timings = props.timings;
        let day = props.day;
        let auth = auth.clone();

        Callback::from(move |_: MouseEvent| {
            let outcome = machine.borrow_mut().handle_click();
            match outcome {
                ClickOutcome::Ignored => return,
                ClickOutcome::ShowImage => {}
                ClickOutcome::SendOpenRequest => {
                    let user = match auth.require_user() {
                        Ok(user) => user.clone(),
                        Err(e) => {
                            Logger::warn_with_component("advent-box", &format!("Day {}: {}", day, e));
                            machine.borrow_mut().open_failed(e);
                            update.force_update();
                            return;
                        }
                    };

                    Logger::info_with_component("advent-box", &format!("Opening day {}", day));
                    let api_client = api_client.clone();
                    let machine = machine.clone();
                    let timers = timers.clone();
                    let alive = alive.clone();
                    let update = update.clone();
                    let on_open = on_open.clone();

                    spawn_local(async move {
                        let result = api_client.open_calendar_day(&user.token, day).await;
                        if !*alive.borrow() {
                            return;
                        }
                        match result {
                            Ok(()) => {
                                let plan = machine.borrow_mut().open_succeeded(timings);
                                if let Some(plan) = plan {
                                    let machine = machine.clone();
                                    let update = update.clone();
                                    timers.borrow_mut().schedule(plan, move |step| {
                                        if machine.borrow_mut().apply(step) {
                                            on_open.emit(day);
                                        }
                                        update.force_update();
                                    });
                                }
                            }
                            Err(e) => {
                                Logger::error_with_component("advent-box", &format!("Day {}: {}", day, e));
                                machine.borrow_mut().open_failed(e);
                            }
                        }
                        update.force_update();
                    });
                }
            }
            update.force_update();
        })
    };

    let on_lightbox_close = {
        let machine = machine.clone();
        let update = update.clone();
        Callback::from(move |_: ()| {
            machine.borrow_mut().close_lightbox();
            update.force_update();
        })
    };

    let state = machine.borrow().clone();
    let image_src: AttrValue = match &image.url {
        Some(url) => {
            let url: &str = url;
            AttrValue::from(url.to_string())
        }
        None => AttrValue::Static(PLACEHOLDER_IMAGE),
    };
    let alt = AttrValue::from(format!("Day {} surprise", props.day));

    html! {
        <>
            if state.is_revealing() {
                <RevealOverlay />
            }

            <ImageLightbox
                image_url={image_src.clone()}
                alt={alt.clone()}
                is_open={state.lightbox_open()}
                on_close={on_lightbox_close}
            />

            <div
                class={classes!(
                    "advent-box",
                    state.door_open().then_some("open"),
                    state.is_locked().then_some("locked"),
                    state.last_error().map(|_| "failed"),
                    image.error.as_ref().map(|_| "image-failed"),
                )}
                style={props.style.clone()}
                onclick={on_click}
            >
                <div class="advent-box-container">
                    <div class="advent-box-content">
                        <img src={image_src} alt={alt} />
                    </div>
                    <div class="advent-box-door">
                        <div class="ribbon ribbon-v"></div>
                        <div class="ribbon ribbon-h"></div>
                        <div class="bow">
                            <span class="day-number">{props.day}</span>
                        </div>
                        if state.is_locked() {
                            <div class="lock-shade">
                                <span>{"🔒"}</span>
                            </div>
                        }
                    </div>
                </div>
                if let Some(error) = state.last_error() {
                    <div class="advent-box-error" title={error.to_string()}>
                        { if error.is_retryable() { "↻" } else { "⚠" } }
                    </div>
                }
            </div>
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloo::timers::future::TimeoutFuture;
    use std::cell::{Cell, RefCell};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const FAST: RevealTimings = RevealTimings {
        door_open_ms: 10,
        settle_ms: 30,
    };

    /// Box that has just received a successful open response, plus a notify counter
    fn opened_box() -> (Rc<RefCell<BoxMachine>>, RevealPlan, Rc<Cell<u32>>) {
        let mut machine = BoxMachine::new(5, false, true);
        assert_eq!(machine.handle_click(), ClickOutcome::SendOpenRequest);
        let plan = machine.open_succeeded(FAST).unwrap();
        (Rc::new(RefCell::new(machine)), plan, Rc::new(Cell::new(0)))
    }

    fn schedule(
        timers: &mut RevealTimers,
        machine: &Rc<RefCell<BoxMachine>>,
        plan: RevealPlan,
        notified: &Rc<Cell<u32>>,
    ) {
        let machine = machine.clone();
        let notified = notified.clone();
        timers.schedule(plan, move |step| {
            if machine.borrow_mut().apply(step) {
                notified.set(notified.get() + 1);
            }
        });
    }

    #[wasm_bindgen_test]
    async fn test_reveal_notifies_once() {
        let (machine, plan, notified) = opened_box();
        let mut timers = RevealTimers::default();
        schedule(&mut timers, &machine, plan, &notified);

        TimeoutFuture::new(60).await;
        assert_eq!(notified.get(), 1);
        assert!(machine.borrow().door_open());
        assert!(!machine.borrow().is_revealing());
    }

    #[wasm_bindgen_test]
    async fn test_dropping_timers_before_the_door_opens() {
        let (machine, plan, notified) = opened_box();
        {
            let mut timers = RevealTimers::default();
            schedule(&mut timers, &machine, plan, &notified);
        }

        TimeoutFuture::new(60).await;
        assert_eq!(notified.get(), 0);
        assert!(!machine.borrow().door_open());
    }

    #[wasm_bindgen_test]
    async fn test_cancel_between_steps() {
        let (machine, plan, notified) = opened_box();
        let mut timers = RevealTimers::default();
        schedule(&mut timers, &machine, plan, &notified);

        TimeoutFuture::new(20).await;
        timers.cancel_all();
        TimeoutFuture::new(40).await;

        assert_eq!(notified.get(), 1);
        assert!(machine.borrow().is_revealing());
    }
}
