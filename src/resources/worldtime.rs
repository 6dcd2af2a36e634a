use bevy_ecs::prelude::Resource;

/// Loop clock as seen by systems.
///
/// `now_ms` is the platform time of the current loop iteration; animation
/// clips are queried against it. `steps` counts logic steps actually run and
/// `frames` counts draws.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldTime {
    pub now_ms: u64,
    pub steps: u64,
    pub frames: u64,
}
