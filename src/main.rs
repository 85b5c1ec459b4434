use anyhow::Result;
use clap::Parser;
use log::{debug, error, info, warn};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use meadow::cli::Cli;
use meadow::config::SceneConfig;
use meadow::core::{Button, Clock, FpsCounter, WinitController};
use meadow::model::ModelAssets;
use meadow::overlay::OverlayState;
use meadow::renderer::{FrameSettings, SceneRenderer};
use meadow::{LookAtCamera, ModelSlot, Scene};

struct App {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    scene: Scene,
    input: WinitController,
    clock: Clock,
    fps: FpsCounter,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        let scene = Scene::new(LookAtCamera::from_config(&config.camera));
        Self {
            config,
            window: None,
            renderer: None,
            scene,
            input: WinitController::new(),
            clock: Clock::new(),
            fps: FpsCounter::default(),
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(self.config.window.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.config.window.width,
                        self.config.window.height,
                    )),
            )?,
        );

        let mut renderer = pollster::block_on(SceneRenderer::new(window.clone()))?;
        for slot in ModelSlot::ALL {
            let assets = ModelAssets::load(&self.config.model_source(slot))?;
            renderer.load_model(slot, &assets);
        }

        let (width, height) = renderer.size();
        self.scene.resize(width, height);
        self.clock.reset();

        info!(
            "Scene ready: program {:?}, mapping {:?}",
            self.config.program, self.config.mapping_mode
        );
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let frame = self.clock.tick();
        if let Some(fps) = self.fps.tick(frame.delta) {
            debug!("FPS: {:.1}", fps);
        }

        self.scene.apply_input(&self.input);
        self.scene.update(frame);

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };
        let settings = FrameSettings {
            program: self.config.program,
            mapping_mode: self.config.mapping_mode,
            lighting: &self.config.lighting,
            overlay: OverlayState {
                won: self.scene.has_won(),
                fps: self.config.show_fps.then(|| self.fps.fps()),
            },
        };

        match renderer.render(&self.scene, &settings, window) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Surface out of memory");
                event_loop.exit();
            }
            Err(e) => warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                error!("Failed to initialize: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                self.scene.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let button = self.input.process_key(&event);
                if button == Some(Button::Escape) && event.state.is_pressed() {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!("Shutting down after {} frames", self.clock.frames());
        self.renderer = None;
        self.window = None;
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = SceneConfig::from_cli(&cli)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    info!("Meadow - Controls: arrows/WASD to fly, Q/E to strafe, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
