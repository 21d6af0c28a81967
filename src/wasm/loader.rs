use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, DocumentReadyState, HtmlImageElement, Window};

use crate::error::{RenderError, RenderResult};
use crate::startup::{Readiness, StartupGate};

type Images = Vec<(usize, HtmlImageElement)>;

struct Pending<F> {
    gate: StartupGate,
    images: Vec<HtmlImageElement>,
    sources: Vec<String>,
    on_ready: Option<F>,
    timeout: Option<i32>,
}

/// Requests every image and calls `on_ready` once, when all have settled and
/// the document is interactive. Images still pending after `timeout_ms` are
/// dropped from the stack.
pub fn load<F>(
    window: &Window,
    document: &Document,
    sources: Vec<String>,
    timeout_ms: u32,
    on_ready: F,
) -> RenderResult<()>
where
    F: FnOnce(Images) + 'static,
{
    let images = sources
        .iter()
        .map(|_| HtmlImageElement::new())
        .collect::<Result<Vec<_>, _>>()?;
    let pending = Rc::new(RefCell::new(Pending {
        gate: StartupGate::new(sources.len()),
        images: images.clone(),
        sources: sources.clone(),
        on_ready: Some(on_ready),
        timeout: None,
    }));

    for (index, (image, src)) in images.iter().zip(&sources).enumerate() {
        let loaded = {
            let pending = pending.clone();
            Closure::once_into_js(move || {
                let ready = pending.borrow_mut().gate.image_loaded(index);
                finish(&pending, ready);
            })
        };
        let failed = {
            let pending = pending.clone();
            Closure::once_into_js(move || {
                let src = pending.borrow().sources[index].clone();
                tracing::warn!(err = %RenderError::ResourceLoad { src }, "skipping layer");
                let ready = pending.borrow_mut().gate.image_failed(index);
                finish(&pending, ready);
            })
        };
        image.set_onload(Some(loaded.unchecked_ref()));
        image.set_onerror(Some(failed.unchecked_ref()));
        image.set_cross_origin(Some("anonymous"));
        image.set_src(src);
    }

    let timeout = {
        let pending = pending.clone();
        Closure::once_into_js(move || {
            let ready = {
                let mut state = pending.borrow_mut();
                state.timeout = None;
                let stragglers = state.gate.pending();
                if stragglers > 0 {
                    tracing::warn!(
                        err = %RenderError::ResourceTimeout { pending: stragglers, timeout_ms },
                        "continuing without them"
                    );
                }
                state.gate.timed_out()
            };
            finish(&pending, ready);
        })
    };
    let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        timeout.unchecked_ref(),
        i32::try_from(timeout_ms).unwrap_or(i32::MAX),
    )?;
    pending.borrow_mut().timeout = Some(handle);

    if document.ready_state() == DocumentReadyState::Loading {
        let pending = pending.clone();
        let target = document.clone();
        let on_change = Closure::wrap(Box::new(move || {
            if target.ready_state() != DocumentReadyState::Loading {
                let ready = pending.borrow_mut().gate.document_ready();
                finish(&pending, ready);
            }
        }) as Box<dyn FnMut()>);
        document.add_event_listener_with_callback("readystatechange", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
    } else {
        let ready = pending.borrow_mut().gate.document_ready();
        finish(&pending, ready);
    }
    Ok(())
}

fn finish<F>(pending: &Rc<RefCell<Pending<F>>>, ready: Option<Readiness>)
where
    F: FnOnce(Images),
{
    let Some(ready) = ready else { return };
    let (on_ready, images, timeout) = {
        let mut state = pending.borrow_mut();
        let images = ready
            .loaded
            .iter()
            .map(|&index| (index, state.images[index].clone()))
            .collect::<Images>();
        (state.on_ready.take(), images, state.timeout.take())
    };
    if let (Some(handle), Some(window)) = (timeout, web_sys::window()) {
        window.clear_timeout_with_handle(handle);
    }
    tracing::debug!(
        loaded = ready.loaded.len(),
        failed = ready.failed.len(),
        "startup join complete"
    );
    if let Some(on_ready) = on_ready {
        on_ready(images);
    }
}
