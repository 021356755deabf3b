//! Browser-based I/O using Web APIs

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, Document, HtmlAnchorElement, Request, RequestInit, Response, Url,
};

use tagline_core::{reply_success, Dataset, Session};

/// Element the host page embeds the dataset rows in
const DATASET_ELEMENT_ID: &str = "tagline-dataset";

/// Offer `json` to the user as a file named `filename`
pub fn download_json(filename: &str, json: &str) -> Result<(), JsValue> {
    let url = json_object_url(json)?;

    let anchor: HtmlAnchorElement = document()?.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)
}

/// Wrap `json` in a Blob and hand out an object URL for it
fn json_object_url(json: &str) -> Result<String, JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(json));
    let options = BlobPropertyBag::new();
    options.set_type("application/json");

    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    Url::create_object_url_with_blob(&blob)
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("No document"))
}

/// POST the export payload and return the reply's `success` flag
pub async fn post_json(url: &str, json: &str) -> Result<Option<bool>, JsValue> {
    let window = web_sys::window().ok_or("No window")?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(json));

    let request = Request::new_with_str_and_init(url, &init)?;
    request.headers().set("Content-Type", "application/json")?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "server answered {}",
            response.status()
        )));
    }

    let body = JsFuture::from(response.text()?).await?;
    Ok(body.as_string().as_deref().and_then(reply_success))
}

/// Read the dataset the host page embedded as
/// `<script id="tagline-dataset" type="application/json" data-name="...">`.
///
/// Returns `Ok(None)` when the page has no such element.
pub fn embedded_dataset() -> Result<Option<Session>, JsValue> {
    let Some(element) = document()?.get_element_by_id(DATASET_ELEMENT_ID) else {
        return Ok(None);
    };

    let name = element
        .get_attribute("data-name")
        .unwrap_or_else(|| "dataset".to_string());
    let json = element.text_content().unwrap_or_default();

    let dataset = Dataset::from_json_str(&name, &json)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(Some(dataset.into_session()))
}
