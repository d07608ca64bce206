//! WebGL backend and browser event wiring (wasm32 only)
//!
//! Owns the GL program, the two fixed-capacity dynamic buffers, and the
//! `requestAnimationFrame` loop. All animation decisions live in
//! [`Scene`]; this module only forwards browser events in and uploads/draws
//! whatever mesh the scene hands back.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as GL, WebGlShader,
    WebGlUniformLocation,
};

use super::{BASE_COLOR, CLEAR_COLOR, FRAG_SHADER, VERT_SHADER};
use crate::config::BackgroundConfigBuilder;
use crate::config::RenderProfile;
use crate::mesh::MeshLimits;
use crate::scene::Scene;

/// Compiled program plus every GL object we must release on teardown
struct GlState {
    gl: GL,
    program: WebGlProgram,
    vert_shader: WebGlShader,
    frag_shader: WebGlShader,
    pos_buffer: WebGlBuffer,
    depth_buffer: WebGlBuffer,
    pos_attr: u32,
    depth_attr: u32,
    res_uniform: Option<WebGlUniformLocation>,
    color_uniform: Option<WebGlUniformLocation>,
}

fn compile_shader(gl: &GL, source: &str, kind: u32) -> Option<WebGlShader> {
    let shader = gl.create_shader(kind)?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if !gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        web_sys::console::warn_1(
            &gl.get_shader_info_log(&shader)
                .unwrap_or_default()
                .into(),
        );
        gl.delete_shader(Some(&shader));
        return None;
    }
    Some(shader)
}

/// Acquire a context and build the whole GL state, or `None` to degrade
fn setup_gl(canvas: &HtmlCanvasElement, limits: &MeshLimits) -> Option<GlState> {
    let attrs = js_sys::Object::new();
    js_sys::Reflect::set(&attrs, &"antialias".into(), &true.into()).ok()?;
    js_sys::Reflect::set(&attrs, &"premultipliedAlpha".into(), &false.into()).ok()?;
    let gl: GL = canvas
        .get_context_with_context_options("webgl", &attrs)
        .ok()??
        .dyn_into()
        .ok()?;

    gl.clear_color(CLEAR_COLOR[0], CLEAR_COLOR[1], CLEAR_COLOR[2], CLEAR_COLOR[3]);
    gl.enable(GL::BLEND);
    gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

    let vert_shader = compile_shader(&gl, VERT_SHADER, GL::VERTEX_SHADER)?;
    let frag_shader = compile_shader(&gl, FRAG_SHADER, GL::FRAGMENT_SHADER)?;

    let program = gl.create_program()?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);
    if !gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return None;
    }
    gl.use_program(Some(&program));

    // Both buffers are allocated to full capacity once and only ever
    // partially refilled with bufferSubData.
    let float_size = std::mem::size_of::<f32>() as i32;

    let pos_buffer = gl.create_buffer()?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&pos_buffer));
    gl.buffer_data_with_i32(
        GL::ARRAY_BUFFER,
        limits.position_floats() as i32 * float_size,
        GL::DYNAMIC_DRAW,
    );
    let pos_attr = gl.get_attrib_location(&program, "a_pos");
    if pos_attr < 0 {
        return None;
    }
    let pos_attr = pos_attr as u32;
    gl.enable_vertex_attrib_array(pos_attr);

    let depth_buffer = gl.create_buffer()?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&depth_buffer));
    gl.buffer_data_with_i32(
        GL::ARRAY_BUFFER,
        limits.depth_floats() as i32 * float_size,
        GL::DYNAMIC_DRAW,
    );
    let depth_attr = gl.get_attrib_location(&program, "a_depth_val");
    if depth_attr < 0 {
        return None;
    }
    let depth_attr = depth_attr as u32;
    gl.enable_vertex_attrib_array(depth_attr);

    let res_uniform = gl.get_uniform_location(&program, "u_res");
    let color_uniform = gl.get_uniform_location(&program, "u_clr");

    Some(GlState {
        gl,
        program,
        vert_shader,
        frag_shader,
        pos_buffer,
        depth_buffer,
        pos_attr,
        depth_attr,
        res_uniform,
        color_uniform,
    })
}

/// Upload the valid buffer prefixes (only when the mesh changed) and draw
fn render_frame(state: &GlState, scene: &Scene, uploaded_generation: &Cell<u64>, line_width: f32) {
    let viewport = scene.viewport();
    if viewport.is_degenerate() {
        return;
    }
    let gl = &state.gl;

    gl.line_width(line_width);
    gl.uniform2f(
        state.res_uniform.as_ref(),
        viewport.device_width() as f32,
        viewport.device_height() as f32,
    );
    gl.uniform4f(
        state.color_uniform.as_ref(),
        BASE_COLOR[0],
        BASE_COLOR[1],
        BASE_COLOR[2],
        BASE_COLOR[3],
    );

    gl.clear(GL::COLOR_BUFFER_BIT);

    let mesh = scene.mesh();
    if scene.generation() != uploaded_generation.get() && !mesh.is_empty() {
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&state.pos_buffer));
        // Safety: no allocation happens between creating the view and the
        // bufferSubData call that consumes it.
        unsafe {
            let view = js_sys::Float32Array::view(&mesh.positions);
            gl.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &view);
        }
        gl.vertex_attrib_pointer_with_i32(state.pos_attr, 2, GL::FLOAT, false, 0, 0);

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&state.depth_buffer));
        unsafe {
            let view = js_sys::Float32Array::view(&mesh.depths);
            gl.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &view);
        }
        gl.vertex_attrib_pointer_with_i32(state.depth_attr, 1, GL::FLOAT, false, 0, 0);
    }
    uploaded_generation.set(scene.generation());

    // Zero vertices is a valid, cheap draw
    gl.draw_arrays(GL::LINES, 0, scene.mesh().vertex_count() as i32);
}

/// Re-derive physical dimensions from the container and notify the scene
fn apply_resize(canvas: &HtmlCanvasElement, state: &GlState, scene: &mut Scene) {
    let parent = match canvas.parent_element() {
        Some(p) => p,
        None => return,
    };
    let width = parent.client_width() as f64;
    let height = parent.client_height() as f64;
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    scene.handle_resize(width, height);
    let viewport = scene.viewport();
    let (pw, ph) = (viewport.device_width(), viewport.device_height());
    // Assigning canvas dimensions resets the drawing buffer even when the
    // value is unchanged, so only touch them on a real change.
    if canvas.width() != pw || canvas.height() != ph {
        canvas.set_width(pw);
        canvas.set_height(ph);
        state.gl.viewport(0, 0, pw as i32, ph as i32);
    }
}

struct Inner {
    canvas: HtmlCanvasElement,
    state: Rc<GlState>,
    running: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    resize_cb: Closure<dyn FnMut()>,
    click_cb: Closure<dyn FnMut()>,
    _frame_cb: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

/// Handle for a mounted background; dropping or closing it tears everything
/// down. Closing twice is a no-op.
#[wasm_bindgen]
pub struct Background {
    inner: Option<Inner>,
}

#[wasm_bindgen]
impl Background {
    /// Cancel the frame loop, remove listeners, and release GL resources
    pub fn close(&mut self) {
        let inner = match self.inner.take() {
            Some(inner) => inner,
            None => return,
        };
        inner.running.set(false);
        if let Some(window) = web_sys::window() {
            if let Some(id) = inner.raf_id.get() {
                let _ = window.cancel_animation_frame(id);
            }
            let _ = window.remove_event_listener_with_callback(
                "resize",
                inner.resize_cb.as_ref().unchecked_ref(),
            );
        }
        let _ = inner
            .canvas
            .remove_event_listener_with_callback("click", inner.click_cb.as_ref().unchecked_ref());

        let gl = &inner.state.gl;
        gl.delete_buffer(Some(&inner.state.pos_buffer));
        gl.delete_buffer(Some(&inner.state.depth_buffer));
        gl.delete_program(Some(&inner.state.program));
        gl.delete_shader(Some(&inner.state.vert_shader));
        gl.delete_shader(Some(&inner.state.frag_shader));
    }
}

impl Drop for Background {
    fn drop(&mut self) {
        self.close();
    }
}

/// Mount the animated background onto the canvas with the given element id
///
/// `touch_device` selects the reduced-motion tier; the host page decides it
/// once (e.g. from its pointer-capability media query). If the rendering
/// context or shader setup fails the returned handle is inert and the page
/// keeps its static content — the background is decorative and allowed to
/// simply not appear.
#[wasm_bindgen]
pub fn start_background(canvas_id: &str, touch_device: bool) -> Result<Background, JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or("canvas not found")?
        .dyn_into()?;

    let profile = if touch_device {
        RenderProfile::Touch
    } else {
        RenderProfile::Desktop
    };
    let pixel_ratio = match window.device_pixel_ratio() {
        r if r.is_finite() && r > 0.0 => r,
        _ => 1.0,
    };
    let config = BackgroundConfigBuilder::new()
        .profile(profile)
        .pixel_ratio(pixel_ratio)
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .build()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let limits = MeshLimits::default();
    let state = match setup_gl(&canvas, &limits) {
        Some(state) => Rc::new(state),
        None => {
            web_sys::console::warn_1(&"background renderer setup failed; skipping".into());
            return Ok(Background { inner: None });
        }
    };

    let scene = Rc::new(RefCell::new(Scene::new(config)));
    let running = Rc::new(Cell::new(true));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let uploaded_generation = Rc::new(Cell::new(u64::MAX));
    let line_width = profile.line_width();

    // Initial sizing before the first frame
    apply_resize(&canvas, &state, &mut scene.borrow_mut());

    let resize_cb = {
        let canvas = canvas.clone();
        let state = state.clone();
        let scene = scene.clone();
        Closure::wrap(Box::new(move || {
            apply_resize(&canvas, &state, &mut scene.borrow_mut());
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())?;

    let click_cb = {
        let scene = scene.clone();
        Closure::wrap(Box::new(move || {
            scene.borrow_mut().handle_click();
        }) as Box<dyn FnMut()>)
    };
    canvas.add_event_listener_with_callback("click", click_cb.as_ref().unchecked_ref())?;

    // The frame closure needs a handle to itself to reschedule; same
    // Rc<RefCell<Option<Closure>>> shape as any rAF-driven wasm loop.
    let frame_cb: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    {
        let frame_cb_inner = frame_cb.clone();
        let state = state.clone();
        let scene = scene.clone();
        let running = running.clone();
        let raf_id_inner = raf_id.clone();
        let uploaded = uploaded_generation.clone();
        *frame_cb.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            if !running.get() {
                return;
            }
            if let Some(window) = web_sys::window() {
                if let Some(cb) = frame_cb_inner.borrow().as_ref() {
                    if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        raf_id_inner.set(Some(id));
                    }
                }
                // Hidden pages skip the frame but keep the loop scheduled
                if window
                    .document()
                    .map(|d| d.hidden())
                    .unwrap_or(false)
                {
                    return;
                }
            }
            let mut scene = scene.borrow_mut();
            scene.advance(now);
            render_frame(&state, &scene, &uploaded, line_width);
        }) as Box<dyn FnMut(f64)>));
    }
    if let Some(cb) = frame_cb.borrow().as_ref() {
        let id = window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        raf_id.set(Some(id));
    }

    Ok(Background {
        inner: Some(Inner {
            canvas,
            state,
            running,
            raf_id,
            resize_cb,
            click_cb,
            _frame_cb: frame_cb,
        }),
    })
}
