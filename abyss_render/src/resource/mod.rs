//! Resource module
//!
//! Material-level bindings shared between materials, and the version tracking
//! consumers use to keep derived binding tables up to date.

pub mod shared_material_values;
pub mod binding_cache;

pub use shared_material_values::{
    SharedMaterialValues, SharedValue, SharedValueKind,
    TextureBufferBinding, BufferBinding,
};
pub use binding_cache::{
    BindingCacheTracker, Rebuild, SharedValuesVersion,
};
