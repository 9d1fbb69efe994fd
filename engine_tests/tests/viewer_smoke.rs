use engine_core::config::{EngineConfig, ProjectionConfig};
use engine_core::render::BackendCommand;
use engine_tests::{capture_logs, init_tracing};
use engine_viewer::{App, DemoScene};
use tracing::Level;

fn config(frames: u32, fps: u32) -> EngineConfig {
    EngineConfig {
        frames,
        target_fps: fps,
        ..EngineConfig::default()
    }
}

#[test]
fn demo_runs_for_a_few_simulated_seconds() -> anyhow::Result<()> {
    init_tracing();
    let summary = engine_viewer::run(&config(90, 30))?;
    assert_eq!(summary.frames, 90);
    assert_eq!(summary.objects, 4);
    assert_eq!(summary.draw_calls, 90 * 4);
    assert!((summary.simulated_seconds - 3.0).abs() < 1e-3);
    Ok(())
}

#[test]
fn fps_is_reported_once_per_simulated_second() -> anyhow::Result<()> {
    let app = App::new(config(40, 10))?;
    let (summary, logs) = capture_logs(|| app.run());
    assert_eq!(summary.frames, 40);
    // 40 frames at 10 fps cover four seconds; float accumulation may push
    // the last boundary past the final frame.
    let reports = logs.matching(Level::INFO, "Frame stats");
    assert!((3..=4).contains(&reports), "{reports} reports");
    assert!(logs.contains(Level::INFO, "Viewer finished"));
    assert_eq!(logs.count(Level::ERROR), 0);
    assert_eq!(logs.count(Level::WARN), 0);
    Ok(())
}

#[test]
fn orthographic_config_reaches_the_demo_camera() -> anyhow::Result<()> {
    let cfg = EngineConfig::from_json_str(
        r#"{
            "window": { "width": 400, "height": 200 },
            "camera": { "projection": { "kind": "orthographic", "size": 12.0 } },
            "frames": 3
        }"#,
    )?;
    assert_eq!(cfg.camera.projection, ProjectionConfig::Orthographic { size: 12.0 });

    let mut app = App::new(cfg)?;
    let camera = app.demo().scene().camera();
    assert_eq!(camera.size(), 12.0);
    assert_eq!(camera.aspect(), 2.0);

    // The orbit still drives the camera position.
    let before = camera.position();
    app.frame(1.0);
    assert_ne!(app.demo().scene().camera().position(), before);
    Ok(())
}

#[test]
fn every_frame_clears_then_draws_all_demo_objects() -> anyhow::Result<()> {
    let mut app = App::new(config(1, 60))?;
    app.commands().clear();
    for _ in 0..3 {
        app.frame(1.0 / 60.0);
    }
    let commands = app.commands().commands();
    let clears = commands
        .iter()
        .filter(|c| matches!(c, BackendCommand::Clear(_)))
        .count();
    assert_eq!(clears, 3);
    assert_eq!(app.commands().draw_calls().len(), 3 * 4);

    let floor = app
        .demo()
        .scene()
        .find_object(DemoScene::FLOOR)
        .expect("floor present");
    assert!(floor.mesh.is_some());
    assert!(app.shader().bind_count() >= 12);
    Ok(())
}
