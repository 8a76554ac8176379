use clap::Parser;

use duorast::{LightingMode, SceneKind, Viewport};

/// Dual-path renderer: a CPU triangle rasterizer beside an optional GPU path.
#[derive(Parser, Debug)]
#[command(
    name = "duorast",
    about = "Software rasterizer demo",
    long_about = "Renders a small scene with a CPU triangle rasterizer.\n\n\
                  Press F12 in the window for the list of key bindings."
)]
pub struct Args {
    /// Window width in pixels.
    #[arg(long, default_value = "640")]
    pub width: usize,

    /// Window height in pixels.
    #[arg(long, default_value = "480")]
    pub height: usize,

    /// Scene to render.
    #[arg(long, default_value = "showcase", value_enum)]
    pub scene: SceneKind,

    /// Run projection, rasterization and shading on one thread.
    #[arg(long)]
    pub serial: bool,

    /// Log filter in env_logger syntax; overrides RUST_LOG.
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Exit after rendering N frames.
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Start with normal mapping off.
    #[arg(long)]
    pub no_normal_map: bool,

    /// Initial shading mode.
    #[arg(long, default_value = "combined", value_enum)]
    pub lighting: LightingMode,
}

impl Args {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width.max(1), self.height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["duorast"]);
        assert_eq!(args.viewport(), Viewport::new(640, 480));
        assert_eq!(args.scene, SceneKind::Showcase);
        assert_eq!(args.lighting, LightingMode::Combined);
        assert!(!args.serial && args.max_frames.is_none());
    }

    #[test]
    fn every_flag_parses() {
        let args = Args::parse_from([
            "duorast", "--width", "320", "--height", "200", "--scene", "quad", "--serial",
            "--max-frames", "3", "--no-normal-map", "--lighting", "observed-area",
        ]);
        assert_eq!(args.viewport(), Viewport::new(320, 200));
        assert_eq!(args.scene, SceneKind::Quad);
        assert_eq!(args.lighting, LightingMode::ObservedArea);
        assert_eq!(args.max_frames, Some(3));
        assert!(args.serial && args.no_normal_map);
    }
}
