use glam::{Vec2, Vec3};

/// Discrete toggles forwarded from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ToggleRenderPath,
    ToggleRotation,
    CycleLightingMode,
    ToggleNormalMap,
    ToggleDepthBuffer,
    ToggleBoundingBoxes,
    Screenshot,
    ToggleUniformClear,
    ToggleFps,
    ShowHelp,
}

/// Continuous camera controls for one frame.
///
/// `movement` is (right, up, forward) in `[-1, 1]`, `turn` is (yaw, pitch).
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraInput {
    pub movement: Vec3,
    pub turn: Vec2,
    pub boost: bool,
}

pub const HELP: &str = "\
[F1]: Toggle Hardware/Software Rendering
[F2]: Toggle Rotation
[F5]: Cycle Shading Mode (Software Only)
[F6]: Toggle Normal Map (Software Only)
[F7]: Toggle Depth Buffer Visualization (Software Only)
[F8]: Toggle Bounding Box Visualization (Software Only)
[F9]: Save Screenshot (Software Only)
[F10]: Toggle Uniform Clear Color
[F11]: Toggle FPS
[F12]: Show Help (This)
[WASD/QE]: Move  [Arrows]: Look  [Shift]: Faster";
