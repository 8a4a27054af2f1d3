use anyhow::Result;
use glam::Vec2;
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::camera::OrbitCamera;
use crate::clock::Clock;
use crate::loaders::{spawn_load, LoadedModel};
use crate::picking::{pick, viewport_to_ndc};
use crate::renderer::Renderer;
use crate::session::Session;

const WINDOW_TITLE: &str = "Orbit Viewer";
const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 800;
/// A press that travels less than this many pixels still counts as a click.
const CLICK_SLOP: f32 = 5.0;
/// Wheel lines are much coarser than pixel scrolls.
const PIXELS_PER_SCROLL_LINE: f32 = 50.0;

#[derive(Clone, Copy, Debug)]
struct Drag {
    last: Vec2,
    travelled: f32,
}

/// The event-loop glue: owns the window, renderer, camera, and session, and
/// routes input events into them. Frames are driven by `about_to_wait`
/// rescheduling a redraw, so rendering never stops while a load is pending.
pub struct App {
    model_path: PathBuf,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: Option<OrbitCamera>,
    session: Session,
    clock: Clock,
    pending_load: Option<Receiver<Result<LoadedModel>>>,
    cursor: Vec2,
    drag: Option<Drag>,
}

impl App {
    pub fn new(model_path: PathBuf) -> Self {
        Self {
            model_path,
            window: None,
            renderer: None,
            camera: None,
            session: Session::new(),
            clock: Clock::new(),
            pending_load: None,
            cursor: Vec2::ZERO,
            drag: None,
        }
    }

    /// Picks up the loader thread's result, if it has arrived. The load is
    /// one-shot: whatever comes back, we stop polling afterwards.
    fn poll_load(&mut self) {
        let Some(receiver) = &self.pending_load else {
            return;
        };

        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                error!("loader thread terminated without a result");
                self.pending_load = None;
                return;
            }
        };
        self.pending_load = None;

        match outcome {
            Ok(loaded) => {
                if let Err(e) = self.session.attach_model(loaded) {
                    error!("model rejected: {e:#}");
                    return;
                }
                if let (Some(renderer), Some(model)) =
                    (&mut self.renderer, &self.session.scene.model)
                {
                    renderer.upload_model(model);
                }
            }
            Err(e) => error!("model load failed: {e:#}"),
        }
    }

    /// Click/touch terminus: ray-pick the scene under `position` and toggle
    /// playback when the nearest hit is clickable.
    fn fire_interaction(&mut self, position: Vec2) {
        let (Some(camera), Some(window)) = (&self.camera, &self.window) else {
            return;
        };
        let size = window.inner_size();
        let viewport = Vec2::new(size.width.max(1) as f32, size.height.max(1) as f32);

        let ray = camera.viewport_ray(viewport_to_ndc(position, viewport));
        let hit = pick(&self.session.scene, &ray);
        if self.session.handle_pick(hit) {
            info!(
                "playback toggled, next direction: {:?}",
                self.session.next_direction()
            );
        }
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_load();

        let delta = self.clock.tick();
        if let Some(camera) = &mut self.camera {
            camera.update();
        }
        self.session.advance(delta);

        let (Some(renderer), Some(camera)) = (&mut self.renderer, &self.camera) else {
            return;
        };
        match renderer.render(&self.session.scene, camera) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => warn!("frame skipped: {e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(WINDOW_TITLE)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(Renderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("failed to initialize renderer: {e:#}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        self.camera = Some(OrbitCamera::new(aspect));
        self.pending_load = Some(spawn_load(self.model_path.clone()));
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.clock = Clock::new();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if let (Some(drag), Some(camera)) = (&mut self.drag, &mut self.camera) {
                    let delta = position - drag.last;
                    drag.travelled += delta.length();
                    drag.last = position;
                    camera.rotate(delta);
                }
                self.cursor = position;
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.drag = Some(Drag {
                        last: self.cursor,
                        travelled: 0.0,
                    });
                }
                ElementState::Released => {
                    let was_click = self
                        .drag
                        .take()
                        .is_some_and(|drag| drag.travelled < CLICK_SLOP);
                    if was_click {
                        self.fire_interaction(self.cursor);
                    }
                }
            },

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(camera) = &mut self.camera {
                    let lines = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => {
                            pos.y as f32 / PIXELS_PER_SCROLL_LINE
                        }
                    };
                    camera.zoom(lines);
                }
            }

            WindowEvent::Touch(touch) => {
                let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => {
                        // Touch fires the interaction immediately, like the
                        // mouse click path after picking
                        self.fire_interaction(position);
                        self.drag = Some(Drag {
                            last: position,
                            travelled: 0.0,
                        });
                        self.cursor = position;
                    }
                    TouchPhase::Moved => {
                        if let (Some(drag), Some(camera)) = (&mut self.drag, &mut self.camera) {
                            let delta = position - drag.last;
                            drag.travelled += delta.length();
                            drag.last = position;
                            camera.rotate(delta);
                        }
                        self.cursor = position;
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.drag = None;
                    }
                }
            }

            WindowEvent::RedrawRequested => self.render_frame(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
