use yew::prelude::*;

/// Full-screen sparkle shown while a box is revealing. Never intercepts clicks.
#[function_component(RevealOverlay)]
pub fn reveal_overlay() -> Html {
    html! {
        <div class="reveal-overlay" aria-hidden="true">
            <div class="reveal-glow"></div>
            <div class="reveal-sparkle">{"✨"}</div>
        </div>
    }
}
