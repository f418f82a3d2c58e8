/*!
# Abyss Render

Render-pass validation and shared material values for the Abyss rendering engine.

This crate provides the backend-agnostic bookkeeping that sits above GPU command
submission. Backend implementations (Vulkan, Metal, the mock backend used by the
tests, etc.) plug in through the [`RenderBackend`](crate::renderer::RenderBackend)
and [`ResourceManager`](crate::renderer::ResourceManager) traits.

## Architecture

- **Renderer**: configuration, main-thread identity and backend handles
- **RenderPass**: attachment/subpass/dependency validation at creation, framebuffer
  compatibility validation at begin, then delegation to the backend
- **Framebuffer**: ordered surfaces bound to a render pass's attachment slots
- **SharedMaterialValues**: capacity-bounded name to binding table with pointer/offset
  versioning
- **BindingCacheTracker**: consumer-side polling of the store versions

All fallible operations return [`abyss::Result`] and log an ERROR naming the failed check.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod hash;
pub mod renderer;
pub mod resource;

// Main abyss namespace module
pub mod abyss {
    // Error types
    pub use crate::error::{Error, ErrorKind, Result};

    // Engine facade (global logger)
    pub use crate::engine::Engine;

    // Renderer
    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, format_entry};
    }

    // Hash sub-module
    pub mod hash {
        pub use crate::hash::*;
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }
}

// Re-export math library at crate root
pub use glam;
