// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `fetch` helpers.
//!
//! Only two shapes are needed: a binary `GET` for media blobs and a
//! form-encoded `POST` whose body is read back as text. Neither retries.

use skittle_core::Error;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, Request, RequestInit, Response, UrlSearchParams};

/// Status and body of a completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl TextReply {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Downloads `url` as a blob. Any status other than 200 is an error.
pub async fn fetch_blob(url: &str) -> Result<Blob, Error> {
    let request = Request::new_with_str(url).map_err(|e| request_error(url, &e))?;
    let response = send(&request)
        .await
        .map_err(|e| request_error(url, &e))?;
    if response.status() != 200 {
        return Err(Error::Request {
            url: url.to_owned(),
            reason: format!("status {} {}", response.status(), response.status_text()),
        });
    }
    let promise = response.blob().map_err(|e| request_error(url, &e))?;
    JsFuture::from(promise)
        .await
        .and_then(JsValue::dyn_into::<Blob>)
        .map_err(|e| request_error(url, &e))
}

/// Posts `fields` as `application/x-www-form-urlencoded` and reads the reply
/// body as text, whatever the status.
pub async fn post_form(url: &str, fields: &[(&str, &str)]) -> Result<TextReply, Error> {
    let params = UrlSearchParams::new().map_err(|e| request_error(url, &e))?;
    for (name, value) in fields {
        params.append(name, value);
    }

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&params.into());
    let request =
        Request::new_with_str_and_init(url, &init).map_err(|e| request_error(url, &e))?;

    let response = send(&request)
        .await
        .map_err(|e| request_error(url, &e))?;
    let status = response.status();
    let text = response.text().map_err(|e| request_error(url, &e))?;
    let body = JsFuture::from(text)
        .await
        .map_err(|e| request_error(url, &e))?
        .as_string()
        .unwrap_or_default();

    tracing::debug!(url, status, "form posted");
    Ok(TextReply { status, body })
}

async fn send(request: &Request) -> Result<Response, JsValue> {
    let window = crate::dom::window()?;
    let response = JsFuture::from(window.fetch_with_request(request)).await?;
    response.dyn_into::<Response>()
}

fn request_error(url: &str, err: &JsValue) -> Error {
    Error::Request {
        url: url.to_owned(),
        reason: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_any_2xx() {
        let reply = |status| TextReply {
            status,
            body: String::new(),
        };
        assert!(reply(200).is_success());
        assert!(reply(201).is_success());
        assert!(!reply(302).is_success());
        assert!(!reply(500).is_success());
    }
}
