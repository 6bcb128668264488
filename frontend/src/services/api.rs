use gloo::file::Blob;
use gloo::net::http::{Request, Response};
use shared::{
    ensure_authorized, ensure_success, ApiError, Calendar, LoginRequest, LoginResponse, UserInfo,
};

use super::config::{normalize_base_url, AppConfig};

/// API client for the advent calendar backend
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client pointing at the configured backend
    pub fn new() -> Self {
        Self::with_base_url(&AppConfig::default().backend_url)
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the signed-in user's calendar
    pub async fn get_my_calendar(&self, token: &str) -> Result<Calendar, ApiError> {
        let response = Request::get(&self.url("/my-calendar"))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        ensure_success(response.status(), ApiError::CalendarFetch)?;
        decode(response).await
    }

    /// Ask the backend to open one day
    pub async fn open_calendar_day(&self, token: &str, day: u32) -> Result<(), ApiError> {
        let response = Request::post(&self.url(&day_path(day, "open")))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        ensure_success(response.status(), ApiError::OpenDay { day })
    }

    /// Download the image behind a day
    pub async fn get_image_of_day(&self, token: &str, day: u32) -> Result<Blob, ApiError> {
        let response = Request::get(&self.url(&day_path(day, "image")))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        ensure_success(response.status(), ApiError::ImageFetch { day })?;

        let content_type = response.headers().get("content-type");
        let bytes = response
            .binary()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(Blob::new_with_options(bytes.as_slice(), content_type.as_deref()))
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = Request::post(&self.url("/login"))
            .json(request)
            .map_err(|e| ApiError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        ensure_success(response.status(), ApiError::Login)?;
        decode(response).await
    }

    /// Current user behind a token. Fails with `Unauthenticated` only when the token is rejected.
    pub async fn me(&self, token: &str) -> Result<UserInfo, ApiError> {
        let response = Request::get(&self.url("/me"))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        ensure_authorized(response.status())?;
        decode(response).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn day_path(day: u32, action: &str) -> String {
    format!("/my-calendar/days/{}/{}", day, action)
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_urls() {
        let client = ApiClient::with_base_url("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/my-calendar"), "http://localhost:5000/my-calendar");
        assert_eq!(
            client.url(&day_path(5, "open")),
            "http://localhost:5000/my-calendar/days/5/open"
        );
    }

    #[wasm_bindgen_test]
    fn test_bearer_header() {
        assert_eq!(bearer("T"), "Bearer T");
    }
}
