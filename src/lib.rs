#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Möbius transformation engine for panoramic image editing.
//!
//! `geom` holds the value algebra (complex numbers, SL(2,C) matrices, CP¹
//! points) and the transformation primitives; `mobius` holds the editable
//! transformations and the manager that composes them. [`Engine`] is the
//! browser-facing wrapper around a [`mobius::TransformationManager`].

pub mod error;
pub mod geom;
pub mod mobius;

use std::fmt;

use geom::{Complex, pointer_from_pixel};
use mobius::{
    EngineOptions, InteractionState, TransformationId, TransformationManager,
    TransformationParams, flatten_uniforms,
};
use wasm_bindgen::prelude::*;

pub use error::{MobiusError, MobiusResult};

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    log::set_logger(&DEFAULT_LOGGER).expect("error initializing logger");
    log::set_max_level(LevelFilter::Debug);
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Public entry point for the browser shell.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    manager: TransformationManager,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            manager: TransformationManager::new(),
        }
    }

    /// Maak een engine met opties uit een JS-object
    /// (`{ pickRadius, zoomHandleDistance }`, beide optioneel).
    #[wasm_bindgen(js_name = withOptions)]
    pub fn with_options(options: JsValue) -> Result<Engine, JsValue> {
        let options: EngineOptions =
            serde_wasm_bindgen::from_value(options).map_err(to_js_error)?;
        let manager = TransformationManager::with_options(options).map_err(to_js_error)?;
        Ok(Engine {
            initialized: true,
            manager,
        })
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Voeg een transformatie toe vanuit een JS-object met een `type`-veld.
    #[wasm_bindgen]
    pub fn add_transformation(&mut self, value: JsValue) -> Result<usize, JsValue> {
        let params: TransformationParams =
            serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        self.add_params(params)
    }

    #[wasm_bindgen]
    pub fn add_rotate_around_axis(&mut self, lng: f64, lat: f64, theta: f64) -> Result<usize, JsValue> {
        self.add_params(TransformationParams::RotateAroundAxis(
            mobius::RotateAroundAxisParams { lng, lat, theta },
        ))
    }

    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen]
    pub fn add_translate_along_axis(
        &mut self,
        p_lng: f64,
        p_lat: f64,
        q_lng: f64,
        q_lat: f64,
        r1_lng: f64,
        r1_lat: f64,
        r2_lng: f64,
        r2_lat: f64,
    ) -> Result<usize, JsValue> {
        self.add_params(TransformationParams::TranslateAlongAxis(
            mobius::TranslateAlongAxisParams {
                p: Complex::new(p_lng, p_lat),
                q: Complex::new(q_lng, q_lat),
                r1: Complex::new(r1_lng, r1_lat),
                r2: Complex::new(r2_lng, r2_lat),
            },
        ))
    }

    #[wasm_bindgen]
    pub fn add_zoom_in(
        &mut self,
        lng: f64,
        lat: f64,
        zoom_re: f64,
        zoom_im: f64,
    ) -> Result<usize, JsValue> {
        self.add_params(TransformationParams::ZoomIn(mobius::ZoomInParams {
            center: Complex::new(lng, lat),
            zoom_factor: Complex::new(zoom_re, zoom_im),
        }))
    }

    #[wasm_bindgen]
    pub fn remove_transformation(&mut self, id: usize) -> Result<(), JsValue> {
        self.manager
            .remove_transformation(TransformationId::new(id))
            .map(|_| ())
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn transformation_count(&self) -> usize {
        self.manager.len()
    }

    /// Maak één transformatie bewerkbaar; alle andere worden verborgen.
    #[wasm_bindgen]
    pub fn set_active(&mut self, id: usize) -> Result<(), JsValue> {
        self.manager
            .set_active(TransformationId::new(id))
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn clear_active(&mut self) {
        self.manager.clear_active();
    }

    /// Pak een handle op een (lengte, breedte)-coördinaat.
    #[wasm_bindgen]
    pub fn select(&mut self, lng: f64, lat: f64) -> bool {
        self.manager.select(Complex::new(lng, lat))
    }

    /// Pak een handle op een pixelcoördinaat van het canvas.
    #[wasm_bindgen]
    pub fn select_pixel(&mut self, x: f64, y: f64, width: f64, height: f64) -> bool {
        self.manager.select(pointer_from_pixel(x, y, width, height))
    }

    /// Versleep de geselecteerde handle. `false` als er niets geselecteerd is.
    #[wasm_bindgen]
    pub fn move_pointer(&mut self, lng: f64, lat: f64) -> Result<bool, JsValue> {
        self.manager
            .move_pointer(Complex::new(lng, lat))
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn move_pixel(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<bool, JsValue> {
        self.manager
            .move_pointer(pointer_from_pixel(x, y, width, height))
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn release(&mut self) {
        self.manager.release();
    }

    #[wasm_bindgen]
    pub fn is_dragging(&self) -> bool {
        matches!(self.manager.state(), InteractionState::Dragging(_))
    }

    /// De 8 getallen die de shader als `u_mobiusArray` verwacht.
    #[wasm_bindgen]
    pub fn net_matrix(&self) -> Vec<f64> {
        self.manager.net_matrix_for_render().to_vec()
    }

    /// Uniform-blokken per transformatie, in compositievolgorde.
    #[wasm_bindgen]
    pub fn get_uniforms(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.manager.uniforms()).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn uniform_values(&self) -> Vec<f64> {
        flatten_uniforms(&self.manager.uniforms())
    }
}

impl Engine {
    #[must_use]
    pub fn manager(&self) -> &TransformationManager {
        &self.manager
    }

    fn add_params(&mut self, params: TransformationParams) -> Result<usize, JsValue> {
        let id = self.manager.add_params(params).map_err(to_js_error)?;
        debug_log!("engine: added {id}, {} in total", self.manager.len());
        Ok(id.0)
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen::JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
