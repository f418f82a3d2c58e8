/// Renderer module - render pass validation and the collaborator types it checks

// Module declarations
pub mod format;
pub mod resource_manager;
pub mod texture;
pub mod buffer;
pub mod render_pass_desc;
pub mod default_dependencies;
pub mod renderer;
pub mod command_buffer;
pub mod framebuffer;
pub mod render_pass;
pub mod mock_renderer;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use format::*;
pub use resource_manager::*;
pub use texture::*;
pub use buffer::*;
pub use render_pass_desc::*;
pub use default_dependencies::*;
pub use command_buffer::*;
pub use framebuffer::*;
pub use render_pass::*;
