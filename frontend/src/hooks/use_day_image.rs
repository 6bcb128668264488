use std::cell::RefCell;
use std::rc::Rc;

use gloo::file::ObjectUrl;
use shared::{ApiError, ImageCache, ImageLookup};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::use_auth::use_auth;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

/// Day images shared by every box. Object URLs are revoked when an entry is
/// replaced, when the store is cleared, or when the store is dropped.
#[derive(Clone, Default)]
pub struct ImageStore(Rc<RefCell<ImageCache<Rc<ObjectUrl>>>>);

impl PartialEq for ImageStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl ImageStore {
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Properties, PartialEq)]
pub struct ImageStoreProviderProps {
    pub children: Children,
}

#[function_component(ImageStoreProvider)]
pub fn image_store_provider(props: &ImageStoreProviderProps) -> Html {
    let store = use_memo((), |_| ImageStore::default());
    let auth = use_auth();

    // Images belong to the user who fetched them
    {
        let store = store.clone();
        let user = auth.user.as_ref().map(|u| u.name.clone());
        use_effect_with(user, move |_| {
            move || store.clear()
        });
    }

    html! {
        <ContextProvider<ImageStore> context={(*store).clone()}>
            { for props.children.iter() }
        </ContextProvider<ImageStore>>
    }
}

pub struct UseDayImageResult {
    pub url: Option<Rc<ObjectUrl>>,
    pub error: Option<ApiError>,
}

/// Fetch a day's image once `enabled`, at most once per (user, day)
#[hook]
pub fn use_day_image(api_client: &ApiClient, day: u32, enabled: bool) -> UseDayImageResult {
    let auth = use_auth();
    let fallback = use_memo((), |_| ImageStore::default());
    let store = use_context::<ImageStore>().unwrap_or_else(|| (*fallback).clone());
    let url = use_state(|| Option::<Rc<ObjectUrl>>::None);
    let error = use_state(|| Option::<ApiError>::None);

    {
        let api_client = api_client.clone();
        let url = url.clone();
        let error = error.clone();
        let user = auth.user.clone();

        use_effect_with((user, day, enabled), move |(user, day, enabled)| {
            let day = *day;
            let lookup = store
                .0
                .borrow_mut()
                .lookup(user.as_ref().map(|u| u.name.as_str()), day, *enabled);
            let key = match lookup {
                Ok(ImageLookup::Fetch(key)) => key,
                Ok(ImageLookup::Cached(cached)) => {
                    url.set(Some(cached));
                    return;
                }
                Ok(ImageLookup::Disabled | ImageLookup::Pending) => return,
                Err(e) => {
                    Logger::warn_with_component("day-image", &format!("Day {}: {}", day, e));
                    error.set(Some(e));
                    return;
                }
            };
            let Some(token) = user.as_ref().map(|u| u.token.clone()) else {
                store.0.borrow_mut().fail(&key);
                return;
            };

            Logger::debug_with_component("day-image", &format!("Fetching {}", key));
            spawn_local(async move {
                match api_client.get_image_of_day(&token, day).await {
                    Ok(blob) => {
                        let object_url = Rc::new(ObjectUrl::from(blob));
                        store.0.borrow_mut().complete(key, object_url.clone());
                        url.set(Some(object_url));
                        error.set(None);
                    }
                    Err(e) => {
                        Logger::error_with_component("day-image", &format!("Day {}: {}", day, e));
                        store.0.borrow_mut().fail(&key);
                        error.set(Some(e));
                    }
                }
            });
        });
    }

    UseDayImageResult {
        url: (*url).clone(),
        error: (*error).clone(),
    }
}
