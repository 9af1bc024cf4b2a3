// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three-video gallery page.
//!
//! Wires the page's thumbnails, players, processing triggers and search box
//! to the `skittle_core` controllers through the `skittle_web` views.
//!
//! Build with: `wasm-pack build --target web demos/skittle_gallery`
//! Then serve `demos/skittle_gallery/` next to the API and open `index.html`.

#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

use std::cell::RefCell;
use std::rc::Rc;

use skittle_core::Error;
use skittle_core::api::{self, ProcessReply};
use skittle_core::config::GalleryConfig;
use skittle_core::gallery::{Gallery, PlayerTarget, slot_video_id};
use skittle_core::processing::ProcessingController;
use skittle_core::search::{SearchController, triggers_search};
use skittle_core::slot::{MediaBinding, SlotIndex, SlotSet};
use skittle_web::dom::{self, listen};
use skittle_web::{
    DomGallery, DomProcessing, DomSearchFeed, RowRef, StatusStream, http, js_error, thumbnail_id,
};
use tracing::{error, info, warn};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{Document, EventTarget, HtmlInputElement, KeyboardEvent, Url};

const SEARCH_INPUT_ID: &str = "searchinput";
const SEARCH_BUTTON_ID: &str = "post-word-list";

struct App {
    config: GalleryConfig,
    document: Document,
    gallery: RefCell<Gallery<DomGallery>>,
    search: RefCell<SearchController<DomSearchFeed>>,
    processing: RefCell<ProcessingController<DomProcessing, StatusStream>>,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

fn app() -> Result<Rc<App>, JsValue> {
    APP.with(|app| app.borrow().clone())
        .ok_or_else(|| JsValue::from_str("gallery is not initialized"))
}

/// Entry point for the gallery page.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    skittle_web::init_logging();

    let window = dom::window()?;
    let document = dom::document()?;
    let config = skittle_web::page_config(&window);

    let slots = SlotSet::new(config.titles());
    let gallery_view = DomGallery::new(document.clone()).map_err(|e| js_error(&e))?;
    let search_view = DomSearchFeed::new(document.clone()).map_err(|e| js_error(&e))?;

    let app = Rc::new(App {
        gallery: RefCell::new(Gallery::new(slots, gallery_view)),
        search: RefCell::new(SearchController::new(search_view)),
        processing: RefCell::new(ProcessingController::new(DomProcessing::new(
            document.clone(),
        ))),
        document,
        config,
    });
    APP.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&app)));

    app.gallery.borrow_mut().show_titles();
    bind_gallery(&app)?;
    bind_search(&app)?;
    bind_processing(&app)?;
    load_initial_media(&app);

    info!("gallery ready");
    Ok(())
}

/// Starts server-side processing of `video` for the slot group `position`.
#[wasm_bindgen(js_name = postProcessVideo)]
pub fn post_process_video(position: u32, video: String) -> Result<(), JsValue> {
    let slot = SlotIndex::try_from(position).map_err(|e| js_error(&e))?;
    start_processing(&app()?, slot, video)
}

/// Runs a search with the current contents of the search box.
#[wasm_bindgen(js_name = postWordList)]
pub fn post_word_list() -> Result<(), JsValue> {
    run_search(&app()?);
    Ok(())
}

fn bind_gallery(app: &Rc<App>) -> Result<(), JsValue> {
    for slot in SlotIndex::ALL {
        match app.document.get_element_by_id(&thumbnail_id(slot)) {
            Some(thumb) => {
                let click_app = Rc::clone(app);
                listen(&thumb, "click", move |_| {
                    // Missing elements are logged by the controller.
                    let _ = click_app.gallery.borrow_mut().select_video(slot);
                })?;
            }
            None => warn!(%slot, "thumbnail missing; slot cannot be selected"),
        }

        if let Some(video) = app.document.get_element_by_id(&slot_video_id(slot)) {
            bind_hover(app, &video, PlayerTarget::Slot(slot))?;
        }
    }

    let main: EventTarget = app
        .gallery
        .borrow()
        .view()
        .main_player()
        .clone()
        .unchecked_into();
    let toggle_app = Rc::clone(app);
    listen(&main, "click", move |_| {
        toggle_app.gallery.borrow_mut().toggle_playback();
    })?;
    bind_hover(app, &main, PlayerTarget::Main)
}

fn bind_hover(app: &Rc<App>, target: &EventTarget, player: PlayerTarget) -> Result<(), JsValue> {
    for event in ["mouseenter", "mouseleave"] {
        let hover_app = Rc::clone(app);
        listen(target, event, move |_| {
            hover_app.gallery.borrow_mut().hover_player(player);
        })?;
    }
    Ok(())
}

fn bind_search(app: &Rc<App>) -> Result<(), JsValue> {
    let feed: EventTarget = app.search.borrow().view().feed().clone().unchecked_into();

    let click_app = Rc::clone(app);
    listen(&feed, "click", move |event| {
        if let Some(row) = RowRef::from_event(&event) {
            let _ = click_app
                .gallery
                .borrow_mut()
                .seek_to(row.slot, row.seconds);
        }
    })?;

    let hover_app = Rc::clone(app);
    listen(&feed, "mouseover", move |event| {
        if let Some(row) = RowRef::from_event(&event) {
            hover_app.gallery.borrow_mut().hover_row(row.slot);
        }
    })?;

    if let Some(button) = app.document.get_element_by_id(SEARCH_BUTTON_ID) {
        let button_app = Rc::clone(app);
        listen(&button, "click", move |_| run_search(&button_app))?;
    }

    let key_app = Rc::clone(app);
    listen(&app.document, "keyup", move |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
            return;
        };
        if triggers_search(&key) {
            run_search(&key_app);
        }
    })
}

fn bind_processing(app: &Rc<App>) -> Result<(), JsValue> {
    let triggers: Vec<_> = SlotIndex::ALL
        .into_iter()
        .map(|slot| (slot, app.processing.borrow().view().triggers(slot)))
        .collect();
    for (slot, buttons) in triggers {
        for button in buttons {
            let trigger_app = Rc::clone(app);
            listen(&button, "click", move |_| {
                let video = trigger_app.config.videos[slot.position()].clone();
                if let Err(err) = start_processing(&trigger_app, slot, video) {
                    error!(%slot, error = ?err, "failed to start processing");
                }
            })?;
        }
    }
    Ok(())
}

fn load_initial_media(app: &Rc<App>) {
    for slot in SlotIndex::ALL {
        let app = Rc::clone(app);
        wasm_bindgen_futures::spawn_local(async move {
            let url = app.config.media_url(slot);
            let result = http::fetch_blob(&url).await.and_then(|blob| {
                Url::create_object_url_with_blob(&blob).map_err(|e| Error::Request {
                    url: url.clone(),
                    reason: format!("{e:?}"),
                })
            });
            let mut gallery = app.gallery.borrow_mut();
            match result {
                Ok(media_url) => gallery.bind_media(
                    slot,
                    MediaBinding {
                        media_url,
                        poster_url: app.config.poster_url(slot),
                    },
                ),
                Err(err) => {
                    error!(%slot, error = %err, "failed to load slot media");
                    gallery.media_failed(slot, &err.to_string());
                }
            }
        });
    }
}

fn run_search(app: &Rc<App>) {
    let query = dom::by_id::<HtmlInputElement>(&app.document, SEARCH_INPUT_ID)
        .map(|input| input.value())
        .unwrap_or_default();
    let request = {
        let gallery = app.gallery.borrow();
        app.search.borrow_mut().begin(&query, gallery.slots())
    };
    let Some((generation, request)) = request else {
        return;
    };

    let app = Rc::clone(app);
    let url = app.config.endpoint(api::SEARCH_PATH);
    wasm_bindgen_futures::spawn_local(async move {
        let reply = http::post_form(&url, &request.form_fields()).await;
        let gallery = app.gallery.borrow();
        let mut search = app.search.borrow_mut();
        match reply {
            Ok(reply) if reply.is_success() => {
                // Decode failures are reported by the controller.
                let _ = search.complete(generation, &reply.body, gallery.slots());
            }
            Ok(reply) => search.fail(
                generation,
                &Error::Request {
                    url,
                    reason: format!("status {}", reply.status),
                },
            ),
            Err(err) => search.fail(generation, &err),
        }
    });
}

fn start_processing(app: &Rc<App>, slot: SlotIndex, video: String) -> Result<(), JsValue> {
    let stream_app = Rc::clone(app);
    let stream = StatusStream::open(&app.config.endpoint(api::STREAM_PATH), move |data| {
        // Decode failures are logged by the controller.
        let _ = stream_app.processing.borrow_mut().on_stream_message(&data);
    })?;
    let (id, request) = app.processing.borrow_mut().start(slot, &video, stream);

    let app = Rc::clone(app);
    let url = app.config.endpoint(api::PROCESS_PATH);
    wasm_bindgen_futures::spawn_local(async move {
        let reply = http::post_form(&url, &request.form_fields()).await;
        let mut processing = app.processing.borrow_mut();
        match reply {
            Ok(reply) if reply.is_success() => match ProcessReply::from_json(&reply.body) {
                Ok(parsed) => processing.on_reply(id, parsed),
                Err(err) => {
                    warn!(%slot, error = %err, "unreadable processing reply");
                    processing.on_failure(id, "");
                }
            },
            Ok(reply) => processing.on_failure(id, &reply.body),
            Err(err) => {
                warn!(%slot, error = %err, "processing request failed");
                processing.on_failure(id, "");
            }
        }
    });
    Ok(())
}
