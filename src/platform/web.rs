//! Browser binding for the MediaPipe Hands + Camera utilities
//!
//! The page loads the MediaPipe scripts; this module waits for them through
//! a promise (script `load` events), requests the camera, and forwards every
//! result frame as JSON. Completion and frames are queued as
//! [`TrackingEvent`]s which the game loop drains into the `App`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use super::{CapabilityError, HandTrackingCapability};
use crate::consts::{CAMERA_HEIGHT, CAMERA_WIDTH};
use crate::gesture::HandResults;

#[wasm_bindgen(inline_js = "
    export function vs_runtime_ready() {
        const present = () => Boolean(window.Hands && window.Camera);
        if (present()) {
            return Promise.resolve();
        }
        return new Promise((resolve, reject) => {
            const scripts = Array.from(document.querySelectorAll('script[data-mediapipe]'));
            if (scripts.length === 0) {
                reject(new Error('hand tracking scripts missing'));
                return;
            }
            // The page tags settled scripts with data-loaded / data-failed,
            // since their load events may fire before this runs
            const settle = () => {
                if (scripts.some((s) => s.dataset.failed)) {
                    reject(new Error('hand tracking scripts failed'));
                } else if (scripts.every((s) => s.dataset.loaded)) {
                    if (present()) {
                        resolve();
                    } else {
                        reject(new Error('hand tracking runtime missing after load'));
                    }
                }
            };
            scripts.forEach((s) => {
                s.addEventListener('load', () => {
                    s.dataset.loaded = '1';
                    settle();
                });
                s.addEventListener('error', () => {
                    s.dataset.failed = '1';
                    settle();
                });
            });
            settle();
        });
    }

    export async function vs_start_tracking(video, onResults, width, height) {
        const stream = await navigator.mediaDevices.getUserMedia({ video: true });
        stream.getTracks().forEach((t) => t.stop());

        const hands = new window.Hands({
            locateFile: (file) => `https://cdn.jsdelivr.net/npm/@mediapipe/hands/${file}`,
        });
        hands.setOptions({
            maxNumHands: 1,
            modelComplexity: 1,
            minDetectionConfidence: 0.5,
            minTrackingConfidence: 0.5,
        });

        let live = true;
        hands.onResults((results) => {
            if (!live) return;
            onResults(JSON.stringify({ multiHandLandmarks: results.multiHandLandmarks || [] }));
        });

        const camera = new window.Camera(video, {
            onFrame: async () => {
                if (live) {
                    await hands.send({ image: video });
                }
            },
            width,
            height,
        });
        try {
            await camera.start();
        } catch (err) {
            live = false;
            hands.close();
            throw err;
        }

        return {
            stop() {
                live = false;
                camera.stop();
                hands.close();
            },
        };
    }

    export function vs_stop_tracking(handle) {
        if (handle && handle.stop) {
            handle.stop();
        }
    }
")]
extern "C" {
    fn vs_runtime_ready() -> js_sys::Promise;
    fn vs_start_tracking(
        video: &HtmlVideoElement,
        on_results: &js_sys::Function,
        width: u32,
        height: u32,
    ) -> js_sys::Promise;
    fn vs_stop_tracking(handle: &JsValue);
}

/// Something the capability wants the app to know
#[derive(Debug, Clone)]
pub enum TrackingEvent {
    /// Asynchronous start finished
    Started,
    /// Asynchronous start failed
    Failed(CapabilityError),
    /// One detection frame, stamped on arrival
    Frame { results: HandResults, now_ms: f64 },
}

/// MediaPipe-backed hand tracking on a hidden `<video>` element
pub struct MediaPipeCapability {
    video: HtmlVideoElement,
    /// JS handle with a `stop()` method while running
    handle: Rc<RefCell<Option<JsValue>>>,
    /// Bumped on every stop so in-flight starts know they are stale
    generation: Rc<Cell<u32>>,
    events: Rc<RefCell<Vec<TrackingEvent>>>,
    on_results: Closure<dyn FnMut(String)>,
}

impl MediaPipeCapability {
    pub fn new(video: HtmlVideoElement) -> Self {
        let events: Rc<RefCell<Vec<TrackingEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let on_results = Closure::<dyn FnMut(String)>::new(move |json: String| {
            match serde_json::from_str::<HandResults>(&json) {
                Ok(results) => sink.borrow_mut().push(TrackingEvent::Frame {
                    results,
                    now_ms: js_sys::Date::now(),
                }),
                Err(e) => log::warn!("Unreadable hand results: {}", e),
            }
        });

        Self {
            video,
            handle: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
            events,
            on_results,
        }
    }

    /// Take queued events, oldest first
    pub fn drain_events(&self) -> Vec<TrackingEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

fn js_error_to_capability(err: &JsValue) -> CapabilityError {
    let field = |key: &str| {
        js_sys::Reflect::get(err, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    };
    CapabilityError::from_dom_error(&field("name"), &field("message"))
}

impl HandTrackingCapability for MediaPipeCapability {
    fn start(&mut self) -> Result<(), CapabilityError> {
        let has_media = web_sys::window()
            .map(|w| {
                js_sys::Reflect::has(&w.navigator(), &JsValue::from_str("mediaDevices"))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if !has_media {
            return Err(CapabilityError::DeviceUnavailable(
                "navigator.mediaDevices unavailable".into(),
            ));
        }

        let generation = self.generation.get();
        let current = self.generation.clone();
        let handle_slot = self.handle.clone();
        let events = self.events.clone();
        let video = self.video.clone();
        let ready = vs_runtime_ready();
        let on_results: js_sys::Function = self
            .on_results
            .as_ref()
            .unchecked_ref::<js_sys::Function>()
            .clone();

        wasm_bindgen_futures::spawn_local(async move {
            let loaded = JsFuture::from(ready).await.is_ok();
            if current.get() != generation {
                return;
            }
            if !loaded {
                events
                    .borrow_mut()
                    .push(TrackingEvent::Failed(CapabilityError::NotLoaded));
                return;
            }

            let started = vs_start_tracking(&video, &on_results, CAMERA_WIDTH, CAMERA_HEIGHT);
            match JsFuture::from(started).await {
                Ok(handle) => {
                    if current.get() != generation {
                        // Stopped while we were starting
                        vs_stop_tracking(&handle);
                        return;
                    }
                    *handle_slot.borrow_mut() = Some(handle);
                    events.borrow_mut().push(TrackingEvent::Started);
                }
                Err(err) if current.get() == generation => {
                    events
                        .borrow_mut()
                        .push(TrackingEvent::Failed(js_error_to_capability(&err)));
                }
                Err(_) => {}
            }
        });

        Ok(())
    }

    fn stop(&mut self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        if let Some(handle) = self.handle.borrow_mut().take() {
            vs_stop_tracking(&handle);
            log::info!("Camera stopped");
        }
        // Frames already queued belong to the stopped session
        self.events
            .borrow_mut()
            .retain(|e| !matches!(e, TrackingEvent::Frame { .. }));
    }

    fn is_running(&self) -> bool {
        self.handle.borrow().is_some()
    }
}
