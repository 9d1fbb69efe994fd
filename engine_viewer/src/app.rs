//! Headless frame loop.

use anyhow::Context;
use engine_core::config::EngineConfig;
use engine_core::render::{
    ClearFlags, CommandLog, FrameStats, HeadlessBackend, RecordingShader, Renderer,
};
use tracing::{info, warn};

use crate::demo::DemoScene;
use crate::timer::{FpsCounter, Timer};

/// What a run did, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub draw_calls: u64,
    pub skipped_draws: u64,
    pub objects: usize,
    /// Simulated seconds covered by the run.
    pub simulated_seconds: f32,
    /// Wall-clock seconds the loop took.
    pub wall_seconds: f32,
}

pub struct App {
    config: EngineConfig,
    renderer: Renderer,
    shader: RecordingShader,
    demo: DemoScene,
    log: CommandLog,
}

impl App {
    /// Initialises the renderer and builds the demo scene with the
    /// configured camera projection.
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        let backend = HeadlessBackend::new();
        let log = backend.log();
        let mut renderer = Renderer::new(Box::new(backend));
        renderer.init();
        renderer.on_window_resize(config.window.width, config.window.height);
        renderer.set_clear_color(config.clear_color);

        let mut demo = DemoScene::new(&mut renderer);
        let mut camera = config
            .camera
            .build(config.window.aspect())
            .context("building camera from config")?;
        // The orbit keeps placing the camera; only a fixed look-at target
        // opts out of it.
        if config.camera.look_at.is_some() {
            demo.set_orbit(None);
        } else {
            let current = demo.scene().camera();
            camera.set_position(current.position());
            camera.set_rotation(current.rotation());
        }
        demo.scene_mut().set_camera(camera);

        info!(
            title = %config.window.title,
            width = config.window.width,
            height = config.window.height,
            "Viewer initialized"
        );
        Ok(Self {
            config,
            renderer,
            shader: RecordingShader::new("pbr"),
            demo,
            log,
        })
    }

    pub fn demo(&self) -> &DemoScene {
        &self.demo
    }

    pub fn demo_mut(&mut self) -> &mut DemoScene {
        &mut self.demo
    }

    pub fn shader(&self) -> &RecordingShader {
        &self.shader
    }

    /// Backend command history.
    pub fn commands(&self) -> &CommandLog {
        &self.log
    }

    /// Runs one frame of update, clear and render with a fixed delta.
    pub fn frame(&mut self, dt: f32) -> Option<FrameStats> {
        self.demo.update(dt);
        self.renderer.clear(ClearFlags::default());
        self.demo
            .scene()
            .render(&mut self.renderer, Some(&mut self.shader))
    }

    /// Runs the configured number of frames, then shuts the renderer down.
    pub fn run(mut self) -> RunSummary {
        let frames = self.config.frame_count();
        let dt = self.config.frame_delta();
        let timer = Timer::new();
        let mut fps = FpsCounter::default();
        let mut summary = RunSummary {
            frames: 0,
            draw_calls: 0,
            skipped_draws: 0,
            objects: self.demo.scene().len(),
            simulated_seconds: 0.0,
            wall_seconds: 0.0,
        };

        info!(frames, fps = self.config.target_fps, "Starting frame loop");
        for _ in 0..frames {
            match self.frame(dt) {
                Some(stats) => {
                    summary.draw_calls += u64::from(stats.draw_calls);
                    summary.skipped_draws += u64::from(stats.skipped);
                }
                None => warn!("Frame rendered nothing"),
            }
            summary.frames += 1;
            summary.simulated_seconds += dt;

            if let Some(rate) = fps.record(dt) {
                info!(
                    fps = rate,
                    objects = self.demo.scene().len(),
                    "Frame stats"
                );
            }
        }

        summary.wall_seconds = timer.elapsed();
        self.renderer.shutdown();
        info!(
            frames = summary.frames,
            draw_calls = summary.draw_calls,
            wall_seconds = summary.wall_seconds,
            "Viewer finished"
        );
        summary
    }
}

/// Builds an [`App`] from `config` and runs it to completion.
pub fn run(config: &EngineConfig) -> anyhow::Result<RunSummary> {
    let app = App::new(config.clone())?;
    Ok(app.run())
}
