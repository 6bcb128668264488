use yew::prelude::*;

use crate::hooks::use_auth::use_auth;

#[function_component(Header)]
pub fn header() -> Html {
    let auth = use_auth();

    let on_logout = {
        let logout = auth.logout.clone();
        Callback::from(move |_: MouseEvent| logout.emit(()))
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>
                    {match &auth.user {
                        Some(user) => {
                            // First name only
                            let first_name = user.name.split_whitespace().next().unwrap_or(&user.name);
                            format!("{}'s Advent Calendar", first_name)
                        }
                        None => "Advent Calendar".to_string(),
                    }}
                </h1>
                if auth.user.is_some() {
                    <button type="button" class="btn btn-secondary" onclick={on_logout}>
                        {"Sign out"}
                    </button>
                }
            </div>
        </header>
    }
}
