//! Command-line overrides for the viewer.

use anyhow::{bail, Context};
use engine_core::config::EngineConfig;

/// Builds the config: `--config <path>` is loaded first, then
/// `--frames`, `--fps`, `--width` and `--height` override it. Unknown
/// arguments are ignored.
pub fn parse_args<I>(args: I) -> anyhow::Result<EngineConfig>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();

    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) => match args.get(i + 1) {
            Some(path) => EngineConfig::load(path)?,
            None => bail!("--config needs a path"),
        },
        None => EngineConfig::default(),
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => i += 2,
            "--frames" if i + 1 < args.len() => {
                cfg.frames = parse_value("--frames", &args[i + 1])?;
                i += 2;
            }
            "--fps" if i + 1 < args.len() => {
                cfg.target_fps = parse_value("--fps", &args[i + 1])?;
                i += 2;
            }
            "--width" if i + 1 < args.len() => {
                cfg.window.width = parse_value("--width", &args[i + 1])?;
                i += 2;
            }
            "--height" if i + 1 < args.len() => {
                cfg.window.height = parse_value("--height", &args[i + 1])?;
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(cfg)
}

fn parse_value(flag: &str, value: &str) -> anyhow::Result<u32> {
    value
        .parse()
        .with_context(|| format!("{flag} expects a non-negative integer, got '{value}'"))
}
