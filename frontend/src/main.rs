use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::advent_calendar::AdventCalendar;
use components::header::Header;
use components::login_form::LoginForm;
use hooks::use_auth::{use_auth, AuthProvider};
use hooks::use_calendar::use_calendar;
use hooks::use_day_image::ImageStoreProvider;
use services::api::ApiClient;
use services::config::AppConfig;
use services::logging::Logger;

#[derive(Properties, PartialEq)]
struct CalendarPageProps {
    api_client: ApiClient,
    config: AppConfig,
}

#[function_component(CalendarPage)]
fn calendar_page(props: &CalendarPageProps) -> Html {
    let auth = use_auth();
    let calendar = use_calendar(&props.api_client, auth.user.clone());

    let on_day_opened = {
        let mark_open = calendar.actions.mark_open.clone();
        Callback::from(move |day: u32| {
            Logger::info_with_component("app", &format!("Day {} opened", day));
            mark_open.emit(day);
        })
    };

    let on_retry = {
        let refresh = calendar.actions.refresh_calendar.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };

    let state = &calendar.state;
    match (&state.calendar, &state.error) {
        (Some(data), _) => html! {
            <>
                if state.loading {
                    <div class="calendar-refreshing">{"Refreshing..."}</div>
                }
                <AdventCalendar
                    calendar={data.clone()}
                    api_client={props.api_client.clone()}
                    on_day_opened={on_day_opened}
                    timings={props.config.reveal}
                />
            </>
        },
        (None, Some(error)) => html! {
            <div class="calendar-error">
                <p>{error.to_string()}</p>
                <button type="button" class="btn btn-secondary" onclick={on_retry}>{"Try again"}</button>
            </div>
        },
        (None, None) => html! {
            <div class="calendar-loading">{"Loading your calendar..."}</div>
        },
    }
}

#[derive(Properties, PartialEq)]
struct HomeProps {
    api_client: ApiClient,
    config: AppConfig,
}

#[function_component(Home)]
fn home(props: &HomeProps) -> Html {
    let auth = use_auth();

    html! {
        <>
            <Header />
            <main class="container">
                if auth.user.is_some() {
                    <CalendarPage api_client={props.api_client.clone()} config={props.config.clone()} />
                } else {
                    <LoginForm api_client={props.api_client.clone()} />
                }
            </main>
        </>
    }
}

#[function_component(App)]
fn app() -> Html {
    let config = use_memo((), |_| AppConfig::default());
    let api_client = use_memo((), |_| {
        let client = ApiClient::new();
        Logger::debug_with_component("app", &format!("Using backend {}", client.base_url()));
        client
    });

    html! {
        <AuthProvider api_client={(*api_client).clone()}>
            <ImageStoreProvider>
                <Home api_client={(*api_client).clone()} config={(*config).clone()} />
            </ImageStoreProvider>
        </AuthProvider>
    }
}

fn main() {
    Logger::info_with_component("app", "Starting advent calendar");
    yew::Renderer::<App>::new().render();
}
