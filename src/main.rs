//! Attract Field entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::anyhow;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent};

    use attract_field::{QualityPreset, Settings};
    use attract_field::renderer::{RenderState, tessellate};
    use attract_field::sim::{
        FieldState, FrameInput, Readout, ReadoutLayout, on_frame, on_resize, palette,
    };

    /// DOM ids of the readout lines, top to bottom
    const READOUT_IDS: [&str; 3] = ["readout-force", "readout-error-x", "readout-error-y"];

    /// Bottom-left text overlay
    struct Hud {
        lines: Vec<Element>,
    }

    impl Hud {
        /// Find the readout lines, creating any that are missing
        fn attach(document: &Document) -> anyhow::Result<Self> {
            let body = document.body().ok_or_else(|| anyhow!("no body"))?;
            let mut lines = Vec::with_capacity(READOUT_IDS.len());
            for id in READOUT_IDS {
                let el = match document.get_element_by_id(id) {
                    Some(el) => el,
                    None => {
                        let el = document
                            .create_element("pre")
                            .map_err(|e| anyhow!("create {}: {:?}", id, e))?;
                        el.set_id(id);
                        body.append_child(&el)
                            .map_err(|e| anyhow!("append {}: {:?}", id, e))?;
                        el
                    }
                };
                lines.push(el);
            }
            Ok(Self { lines })
        }

        /// Position lines for a canvas of the given CSS size
        fn layout(&self, width: f32, height: f32) {
            let layout = ReadoutLayout::for_canvas(width, height);
            for (el, baseline) in self.lines.iter().zip(layout.baselines) {
                // Anchor the bottom edge of the line box at the baseline
                let style = format!(
                    "position:absolute;margin:0;pointer-events:none;\
                     left:{:.1}px;top:{:.1}px;transform:translateY(-100%);\
                     font:{:.1}px monospace;line-height:1;color:{}",
                    layout.margin,
                    baseline,
                    layout.font_size,
                    palette::TEXT.to_css(),
                );
                if let Err(e) = el.set_attribute("style", &style) {
                    log::warn!("Failed to position readout line: {:?}", e);
                }
            }
        }

        fn update(&self, readout: &Readout) {
            for (el, text) in self.lines.iter().zip(readout.lines()) {
                if el.text_content().as_deref() != Some(text.as_str()) {
                    el.set_text_content(Some(&text));
                }
            }
        }
    }

    /// App instance holding all state
    struct App {
        state: FieldState,
        settings: Settings,
        render_state: Option<RenderState>,
        input: FrameInput,
        hud: Option<Hud>,
    }

    impl App {
        fn new(seed: u64, width: f32, height: f32, settings: Settings) -> Self {
            Self {
                state: FieldState::new(seed, width, height, &settings),
                settings,
                render_state: None,
                input: FrameInput::default(),
                hud: None,
            }
        }

        /// Advance one frame and present it
        fn frame(&mut self) {
            let output = on_frame(&mut self.state, &self.input, &self.settings);

            if let Some(ref mut render_state) = self.render_state {
                let (clear, vertices) =
                    tessellate(&output.commands, self.settings.quality.circle_segments());
                let viewport = Vec2::new(self.state.width, self.state.height);
                match render_state.render(
                    &vertices,
                    clear.unwrap_or(palette::BACKGROUND),
                    viewport,
                ) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            if let Some(ref hud) = self.hud {
                hud.update(&output.readout);
            }
        }

        /// Canvas changed size: new layout, new surface, new text metrics
        fn resize(&mut self, css_w: f32, css_h: f32, physical: (u32, u32)) {
            on_resize(&mut self.state, css_w, css_h, &self.settings);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(physical.0, physical.1);
            }
            if let Some(ref hud) = self.hud {
                hud.layout(css_w, css_h);
            }
        }
    }

    /// Match the canvas backing store to its CSS size; returns (css, physical)
    fn sync_canvas_size(canvas: &HtmlCanvasElement) -> ((f32, f32), (u32, u32)) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = canvas.client_width().max(0);
        let client_h = canvas.client_height().max(0);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        ((client_w as f32, client_h as f32), (width, height))
    }

    pub async fn run() -> anyhow::Result<()> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| anyhow!("failed to init logger: {}", e))?;

        log::info!("Attract Field starting...");

        let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
        let document = window.document().ok_or_else(|| anyhow!("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| anyhow!("missing #canvas"))?
            .dyn_into()
            .map_err(|e| anyhow!("#canvas is not a canvas: {:?}", e))?;

        let ((css_w, css_h), (width, height)) = sync_canvas_size(&canvas);

        // Initialize field
        let mut settings = Settings::load();
        let search = window.location().search().unwrap_or_default();
        if let Some(preset) = QualityPreset::from_query(&search) {
            settings.apply_preset(preset);
            settings.save();
            log::info!("Quality preset from URL: {}", preset.as_str());
        }
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, css_w, css_h, settings)));

        log::info!("Field initialized with seed: {}", app.borrow().state.seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| anyhow!("failed to create surface: {:?}", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("failed to get adapter: {:?}", e))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;

        {
            let mut a = app.borrow_mut();
            a.render_state = Some(render_state);
            if a.settings.show_readout {
                let hud = Hud::attach(&document)?;
                hud.layout(css_w, css_h);
                a.hud = Some(hud);
            }
        }

        // Set up input handlers
        setup_input_handlers(&canvas, app.clone());

        // Regenerate the layout whenever the viewport changes
        setup_resize_handler(&canvas, app.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            if let Err(e) = loading.set_attribute("class", "hidden") {
                log::warn!("Failed to hide loading indicator: {:?}", e);
            }
        }

        // Start frame loop
        request_animation_frame(app);

        log::info!("Attract Field running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse move - offset coordinates are already canvas-relative CSS pixels
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().input.cursor =
                    Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
            });
            add_listener(canvas, "mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start/move - first touch, relative to the canvas rect
        for event_name in ["touchstart", "touchmove"] {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    app.borrow_mut().input.cursor = Vec2::new(x, y);
                }
            });
            add_listener(canvas, event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let ((css_w, css_h), physical) = sync_canvas_size(&canvas_clone);
            log::info!("Resized to {}x{}", css_w, css_h);
            app.borrow_mut().resize(css_w, css_h, physical);
        });
        add_listener(&window, "resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Register `callback`, logging rather than failing when the DOM refuses it
    fn add_listener(target: &EventTarget, event: &str, callback: &js_sys::Function) {
        if let Err(e) = target.add_event_listener_with_callback(event, callback) {
            log::warn!("Failed to register {} listener: {:?}", event, e);
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::error!("no window; frame loop stopped");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed; frame loop stopped: {:?}", e);
            return;
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().frame();
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_app::run().await {
        log::error!("init error: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Attract Field (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Sweep the cursor toward each block of a fixed-seed field and log the readout
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use attract_field::Settings;
    use attract_field::sim::{FieldState, FrameInput, on_frame};
    use glam::Vec2;

    const SEED: u64 = 7;
    const SWEEP_STEP: f32 = 25.0;

    let settings = Settings::load();
    let mut state = FieldState::new(SEED, 800.0, 600.0, &settings);

    match serde_json::to_string(&state.blocks) {
        Ok(json) => log::info!("Layout (seed {}): {}", state.seed, json),
        Err(e) => log::warn!("Could not serialize layout: {}", e),
    }

    let targets: Vec<Vec2> = state.blocks.iter().map(|b| b.pos).collect();
    for (i, target) in targets.into_iter().enumerate() {
        // Approach from the right, starting just outside the attraction radius
        let start = target + Vec2::X * (settings.attraction_radius + SWEEP_STEP);
        let steps = ((settings.attraction_radius + SWEEP_STEP) / SWEEP_STEP) as u32;
        for step in 0..=steps {
            let cursor = start.lerp(target, step as f32 / steps as f32);
            let output = on_frame(&mut state, &FrameInput { cursor }, &settings);
            log::info!(
                "block {} cursor ({:.0}, {:.0}) | {}",
                i,
                cursor.x,
                cursor.y,
                output.readout.lines().join(" | ")
            );
        }
    }
}
