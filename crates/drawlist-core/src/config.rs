//! Configuration for a render context.

/// Largest number of dispatches a frame can register.
///
/// Handle value 255 is reserved as the invalid-dispatch sentinel.
pub const MAX_DISPATCH_LIMIT: usize = 255;

/// Capacities and switches for a render context.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Dispatch registry capacity per frame. Clamped to [`MAX_DISPATCH_LIMIT`].
    pub max_dispatches: usize,
    /// Capacity of the render-object list consumed by the draw executor.
    pub max_render_objects: usize,
    /// Initial number of render-list entries reserved by the arena.
    pub initial_render_list_capacity: usize,
    /// Profiling mode
    pub profiling: ProfilingMode,
}

impl RenderConfig {
    /// Dispatch capacity after clamping to the handle range.
    pub fn dispatch_capacity(&self) -> usize {
        self.max_dispatches.min(MAX_DISPATCH_LIMIT)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_dispatches: MAX_DISPATCH_LIMIT,
            max_render_objects: 4096,
            initial_render_list_capacity: 256,
            profiling: ProfilingMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling is disabled
    Off,
    /// Puffin scopes are recorded in-process
    On,
    /// Puffin scopes are recorded and served to external tools such as 'puffin_viewer'
    WithWebserver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_capacity_is_clamped() {
        let config = RenderConfig {
            max_dispatches: 1000,
            ..Default::default()
        };
        assert_eq!(config.dispatch_capacity(), MAX_DISPATCH_LIMIT);

        let config = RenderConfig {
            max_dispatches: 4,
            ..Default::default()
        };
        assert_eq!(config.dispatch_capacity(), 4);
    }
}
