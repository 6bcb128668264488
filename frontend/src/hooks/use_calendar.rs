use std::rc::Rc;

use shared::{ApiError, AuthUser, Calendar};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Clone, PartialEq, Default)]
pub struct CalendarState {
    pub calendar: Option<Calendar>,
    pub loading: bool,
    pub error: Option<ApiError>,
}

pub enum CalendarAction {
    Loading,
    Loaded(Calendar),
    Failed(ApiError),
    MarkOpen(u32),
    Clear,
}

impl Reducible for CalendarState {
    type Action = CalendarAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            CalendarAction::Loading => {
                next.loading = true;
                next.error = None;
            }
            CalendarAction::Loaded(calendar) => {
                next.calendar = Some(calendar);
                next.loading = false;
            }
            CalendarAction::Failed(error) => {
                next.error = Some(error);
                next.loading = false;
            }
            CalendarAction::MarkOpen(day) => {
                if let Some(calendar) = next.calendar.as_mut() {
                    calendar.mark_open(day);
                }
            }
            CalendarAction::Clear => return Rc::new(CalendarState::default()),
        }
        Rc::new(next)
    }
}

pub struct UseCalendarResult {
    pub state: CalendarState,
    pub actions: UseCalendarActions,
}

#[derive(Clone, PartialEq)]
pub struct UseCalendarActions {
    pub refresh_calendar: Callback<()>,
    /// Record a confirmed open without refetching
    pub mark_open: Callback<u32>,
}

#[hook]
pub fn use_calendar(api_client: &ApiClient, user: Option<AuthUser>) -> UseCalendarResult {
    let state = use_reducer(CalendarState::default);
    let token = user.map(|u| u.token);

    let refresh_calendar = {
        let api_client = api_client.clone();
        let state = state.clone();

        use_callback(token.clone(), move |_: (), token| {
            let Some(token) = token.clone() else {
                state.dispatch(CalendarAction::Clear);
                return;
            };
            let api_client = api_client.clone();
            let state = state.clone();

            spawn_local(async move {
                state.dispatch(CalendarAction::Loading);
                match api_client.get_my_calendar(&token).await {
                    Ok(calendar) => {
                        Logger::debug_with_component(
                            "calendar",
                            &format!("Loaded '{}' with {} open days", calendar.name, calendar.opened_count()),
                        );
                        state.dispatch(CalendarAction::Loaded(calendar));
                    }
                    Err(e) => {
                        gloo::console::error!("Failed to fetch calendar:", e.to_string());
                        state.dispatch(CalendarAction::Failed(e));
                    }
                }
            });
        })
    };

    let mark_open = {
        let state = state.clone();
        use_callback((), move |day: u32, _| {
            state.dispatch(CalendarAction::MarkOpen(day));
        })
    };

    // Reload whenever the signed-in user changes
    use_effect_with(token, {
        let refresh_calendar = refresh_calendar.clone();
        move |_| {
            refresh_calendar.emit(());
            || ()
        }
    });

    UseCalendarResult {
        state: (*state).clone(),
        actions: UseCalendarActions {
            refresh_calendar,
            mark_open,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CalendarDay;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn calendar() -> Calendar {
        Calendar {
            id: 1,
            name: "Lea".to_string(),
            days: vec![CalendarDay { day: 1, is_open: false }],
        }
    }

    #[wasm_bindgen_test]
    fn test_reducer_marks_open() {
        let state = Rc::new(CalendarState::default())
            .reduce(CalendarAction::Loading)
            .reduce(CalendarAction::Loaded(calendar()));
        assert!(!state.loading);

        let state = state.reduce(CalendarAction::MarkOpen(1));
        assert!(state.calendar.as_ref().unwrap().is_day_open(1));
    }

    #[wasm_bindgen_test]
    fn test_reducer_failure_keeps_stale_calendar() {
        let state = Rc::new(CalendarState::default())
            .reduce(CalendarAction::Loaded(calendar()))
            .reduce(CalendarAction::Failed(ApiError::CalendarFetch));
        assert!(state.calendar.is_some());
        assert_eq!(state.error, Some(ApiError::CalendarFetch));

        let state = state.reduce(CalendarAction::Clear);
        assert!(state.calendar.is_none());
    }
}
