use gloo::storage::{LocalStorage, Storage};
use shared::{ApiError, AuthUser};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::config::AUTH_STORAGE_KEY;
use crate::services::logging::Logger;

/// Signed-in user plus the actions that change it
#[derive(Clone, PartialEq)]
pub struct AuthContext {
    pub user: Option<AuthUser>,
    pub login: Callback<AuthUser>,
    pub logout: Callback<()>,
}

impl AuthContext {
    /// Token of the signed-in user, or `Unauthenticated`
    pub fn require_user(&self) -> Result<&AuthUser, ApiError> {
        self.user.as_ref().ok_or(ApiError::Unauthenticated)
    }
}

#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub api_client: ApiClient,
    pub children: Children,
}

#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let user = use_state(|| LocalStorage::get::<AuthUser>(AUTH_STORAGE_KEY).ok());

    let login = {
        let user = user.clone();
        use_callback((), move |signed_in: AuthUser, _| {
            if let Err(e) = LocalStorage::set(AUTH_STORAGE_KEY, &signed_in) {
                Logger::warn_with_component("auth", &format!("Could not persist session: {}", e));
            }
            Logger::info_with_component("auth", &format!("Signed in as {}", signed_in.name));
            user.set(Some(signed_in));
        })
    };

    let logout = {
        let user = user.clone();
        use_callback((), move |_: (), _| {
            LocalStorage::delete(AUTH_STORAGE_KEY);
            Logger::info_with_component("auth", "Signed out");
            user.set(None);
        })
    };

    // A stored token may have expired since the last visit
    {
        let api_client = props.api_client.clone();
        let logout = logout.clone();
        let token = user.as_ref().map(|u| u.token.clone());
        use_effect_with(token, move |token| {
            if let Some(token) = token.clone() {
                spawn_local(async move {
                    match api_client.me(&token).await {
                        Ok(info) => {
                            Logger::debug_with_component("auth", &format!("Session valid for {}", info.username));
                        }
                        Err(ApiError::Unauthenticated) => {
                            Logger::warn_with_component("auth", "Stored session was rejected");
                            logout.emit(());
                        }
                        Err(e) => {
                            Logger::warn_with_component("auth", &format!("Could not verify session: {}", e));
                        }
                    }
                });
            }
        });
    }

    let context = AuthContext {
        user: (*user).clone(),
        login,
        logout,
    };

    html! {
        <ContextProvider<AuthContext> {context}>
            { for props.children.iter() }
        </ContextProvider<AuthContext>>
    }
}

/// Auth state from the nearest `AuthProvider`. Outside a provider nobody is signed in.
#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| AuthContext {
        user: None,
        login: Callback::noop(),
        logout: Callback::noop(),
    })
}
