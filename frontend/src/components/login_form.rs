use shared::{AuthUser, LoginRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_auth::use_auth;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub api_client: ApiClient,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let auth = use_auth();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let submitting = use_state(|| false);
    let error_message = use_state(|| Option::<String>::None);

    let on_username_input = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            username.set(input.value());
        })
    };

    let on_password_input = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let login = auth.login.clone();
        let username = username.clone();
        let password = password.clone();
        let submitting = submitting.clone();
        let error_message = error_message.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }

            let request = LoginRequest {
                username: username.trim().to_string(),
                password: (*password).clone(),
            };
            if request.username.is_empty() || request.password.is_empty() {
                error_message.set(Some("Username and password are required".to_string()));
                return;
            }

            let api_client = api_client.clone();
            let login = login.clone();
            let submitting = submitting.clone();
            let error_message = error_message.clone();

            spawn_local(async move {
                submitting.set(true);
                error_message.set(None);

                match api_client.login(&request).await {
                    Ok(response) => login.emit(AuthUser::from(response)),
                    Err(e) => {
                        Logger::warn_with_component("login", &format!("Sign-in failed: {}", e));
                        error_message.set(Some(e.to_string()));
                    }
                }

                submitting.set(false);
            });
        })
    };

    html! {
        <form class="login-form" onsubmit={on_submit}>
            <h2>{"🎄 Sign in to open your calendar"}</h2>
            <label class="form-label" for="login-username">{"Username"}</label>
            <input
                id="login-username"
                type="text"
                class="form-input"
                autocomplete="username"
                value={(*username).clone()}
                oninput={on_username_input}
            />
            <label class="form-label" for="login-password">{"Password"}</label>
            <input
                id="login-password"
                type="password"
                class="form-input"
                autocomplete="current-password"
                value={(*password).clone()}
                oninput={on_password_input}
            />
            if let Some(message) = (*error_message).clone() {
                <div class="form-error">{message}</div>
            }
            <button type="submit" class="btn btn-primary" disabled={*submitting}>
                { if *submitting { "Signing in..." } else { "Sign in" } }
            </button>
        </form>
    }
}
