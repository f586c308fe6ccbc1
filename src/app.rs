//! Window, event loop and frame scheduling.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::AppError;
use crate::gpu::GpuState;
use crate::params::ParticleParams;
use crate::scene::Scene;

#[cfg(feature = "egui")]
use crate::gpu::EguiIntegration;
#[cfg(feature = "egui")]
use crate::panel::ControlPanel;

const WINDOW_TITLE: &str = "emberglow";

/// Open the window and run until it is closed.
pub fn run(params: ParticleParams) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(params);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: Scene,
    #[cfg(feature = "egui")]
    egui: Option<EguiIntegration>,
    #[cfg(feature = "egui")]
    panel: ControlPanel,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<AppError>,
}

impl App {
    pub fn new(params: ParticleParams) -> Self {
        Self {
            window: None,
            gpu_state: None,
            scene: Scene::new(params),
            #[cfg(feature = "egui")]
            egui: None,
            #[cfg(feature = "egui")]
            panel: ControlPanel::new(),
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.scene))?;
        self.scene.set_max_sprite_dimension(gpu_state.max_texture_dimension());

        #[cfg(feature = "egui")]
        {
            self.egui = Some(EguiIntegration::new(gpu_state.device(), gpu_state.format(), &window));
        }

        window.request_redraw();
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    /// True if the panel should get this pointer event instead of the camera.
    #[cfg(feature = "egui")]
    fn ui_captures(&mut self, event: &WindowEvent) -> bool {
        match (&mut self.egui, &self.window) {
            (Some(egui), Some(window)) => {
                let consumed = egui.on_window_event(window, event);
                consumed || egui.wants_pointer()
            }
            _ => false,
        }
    }

    #[cfg(not(feature = "egui"))]
    fn ui_captures(&mut self, _event: &WindowEvent) -> bool {
        false
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };

        self.scene.poll_sprite();

        #[cfg(feature = "egui")]
        let frame = match &mut self.egui {
            Some(egui) => {
                let scene = &self.scene;
                let panel = &mut self.panel;
                let mut edits = Vec::new();
                let frame = egui.run(window, |ctx| {
                    edits.extend(panel.show(ctx, scene.params(), scene.cloud().len()));
                });
                self.scene.apply_all(edits);
                Some(frame)
            }
            None => None,
        };

        self.scene.advance();

        #[cfg(feature = "egui")]
        let result = gpu_state.render(&self.scene, self.egui.as_mut().zip(frame.as_ref()));
        #[cfg(not(feature = "egui"))]
        let result = gpu_state.render(&self.scene);

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let captured = self.ui_captures(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed && !captured;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;

                        if let Some(gpu_state) = &mut self.gpu_state {
                            gpu_state.camera.orbit(dx, dy);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !captured => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
