use drawlist_core::config::{ProfilingMode, RenderConfig};
use drawlist_core::logging;
use drawlist_core::profiling::{self, ProfilingBackend};
use drawlist_render::RenderContext;

/// Install logging and start profiling as `config` asks.
///
/// Safe to call more than once.
pub fn init(config: &RenderConfig) {
    logging::init();

    match config.profiling {
        ProfilingMode::Off => {}
        ProfilingMode::On => profiling::init_profiling(ProfilingBackend::InProcess),
        ProfilingMode::WithWebserver => {
            #[cfg(feature = "profiling")]
            profiling::init_profiling(ProfilingBackend::PuffinHttp);
            #[cfg(not(feature = "profiling"))]
            {
                tracing::warn!("Profiling webserver requested without the `profiling` feature");
                profiling::init_profiling(ProfilingBackend::InProcess);
            }
        }
    }
}

/// Start a new frame on `context`, marking a profiler frame when profiling is on.
pub fn begin_frame(context: &mut RenderContext) {
    if context.config().profiling != ProfilingMode::Off {
        profiling::new_frame();
    }
    context.begin();
}
