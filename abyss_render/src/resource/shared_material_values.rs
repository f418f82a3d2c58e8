/// SharedMaterialValues - name-keyed bindings shared across materials
///
/// A capacity-bounded table from a 32-bit name hash to a texture, texture buffer,
/// shader variable group or uniform buffer binding. Entries live in a SlotMap sized
/// for the capacity and are indexed by an FxHashMap keyed on [`NameId`].
///
/// Two counters summarize every change so consumers can poll instead of diffing:
/// - `pointer_version`: a bound resource, its format or size changed, a key was added,
///   or a texture buffer offset changed (it changes the texture view)
/// - `offset_version`: only the offset of a buffer-like binding changed
///
/// A key may also be bound to no resource with [`SharedMaterialValues::unbind`]. The entry
/// keeps its kind and its getters return `None` until a resource is set again.
///
/// The store holds shared references; it never destroys the resources it indexes.
/// It isn't synchronized internally: wrap it in a lock to share it between threads.

use std::fmt;
use std::sync::Arc;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::engine_bail;
use crate::hash::NameId;
use crate::renderer::{BufferUsage, GfxBuffer, GfxFormat, ShaderVariableGroup, Texture};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key of an entry in the value pool
    struct SharedValueKey;
}

// ===== VALUES =====

/// Kind of a stored binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharedValueKind {
    Texture,
    TextureBuffer,
    VariableGroup,
    Buffer,
}

/// A bound resource
#[derive(Debug, Clone)]
pub enum SharedValue {
    Texture(Arc<Texture>),
    TextureBuffer(Arc<GfxBuffer>),
    VariableGroup(Arc<ShaderVariableGroup>),
    Buffer(Arc<GfxBuffer>),
}

impl SharedValue {
    pub fn kind(&self) -> SharedValueKind {
        match self {
            SharedValue::Texture(_) => SharedValueKind::Texture,
            SharedValue::TextureBuffer(_) => SharedValueKind::TextureBuffer,
            SharedValue::VariableGroup(_) => SharedValueKind::VariableGroup,
            SharedValue::Buffer(_) => SharedValueKind::Buffer,
        }
    }

    /// Whether both values reference the same resource object
    fn same_resource(&self, other: &SharedValue) -> bool {
        match (self, other) {
            (SharedValue::Texture(a), SharedValue::Texture(b)) => Arc::ptr_eq(a, b),
            (SharedValue::TextureBuffer(a), SharedValue::TextureBuffer(b))
            | (SharedValue::Buffer(a), SharedValue::Buffer(b)) => Arc::ptr_eq(a, b),
            (SharedValue::VariableGroup(a), SharedValue::VariableGroup(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Whether two bindings reference the same resource, two unbound slots being equal
fn same_binding(a: Option<&SharedValue>, b: Option<&SharedValue>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.same_resource(b),
        (None, None) => true,
        _ => false,
    }
}

/// Texture buffer binding returned by [`SharedMaterialValues::get_texture_buffer`]
#[derive(Debug, Clone)]
pub struct TextureBufferBinding {
    pub buffer: Arc<GfxBuffer>,
    pub format: GfxFormat,
    /// Byte offset into the buffer
    pub offset: u64,
    /// Number of texels
    pub count: u64,
}

/// Buffer binding returned by [`SharedMaterialValues::get_buffer`]
#[derive(Debug, Clone)]
pub struct BufferBinding {
    pub buffer: Arc<GfxBuffer>,
    /// Byte offset into the buffer
    pub offset: u64,
    /// Byte size of the bound range
    pub size: u64,
}

struct SharedValueEntry {
    kind: SharedValueKind,
    /// None while the key is bound to no resource
    value: Option<SharedValue>,
    format: GfxFormat,
    offset: u64,
    /// Byte size for buffers, texel count for texture buffers
    size: u64,
}

// ===== STORE =====

/// Shared material values
pub struct SharedMaterialValues {
    entries: SlotMap<SharedValueKey, SharedValueEntry>,
    table: FxHashMap<NameId, SharedValueKey>,
    max_values: u32,
    pointer_version: u32,
    offset_version: u32,
}

impl SharedMaterialValues {
    /// Capacity used by [`SharedMaterialValues::default`]
    pub const DEFAULT_MAX_VALUES: u32 = 100;

    /// Create a store holding at most `max_values` entries
    ///
    /// # Errors
    ///
    /// Returns InvalidArgument if `max_values` is 0.
    pub fn new(max_values: u32) -> Result<Self> {
        if max_values == 0 {
            engine_bail!(InvalidArgument, "abyss::SharedMaterialValues",
                "Shared material values need a capacity of at least 1");
        }

        Ok(Self::with_capacity(max_values))
    }

    /// `max_values` must be non-zero
    fn with_capacity(max_values: u32) -> Self {
        Self {
            entries: SlotMap::with_capacity_and_key(max_values as usize),
            table: FxHashMap::with_capacity_and_hasher(max_values as usize, Default::default()),
            max_values,
            pointer_version: 0,
            offset_version: 0,
        }
    }

    // ===== GETTERS =====

    /// Texture bound to `name`
    pub fn get_texture(&self, name: impl Into<NameId>) -> Option<&Arc<Texture>> {
        match self.find(name.into()) {
            Some(SharedValueEntry { value: Some(SharedValue::Texture(texture)), .. }) => Some(texture),
            _ => None,
        }
    }

    /// Texture buffer bound to `name`
    pub fn get_texture_buffer(&self, name: impl Into<NameId>) -> Option<TextureBufferBinding> {
        match self.find(name.into()) {
            Some(entry) => match &entry.value {
                Some(SharedValue::TextureBuffer(buffer)) => Some(TextureBufferBinding {
                    buffer: Arc::clone(buffer),
                    format: entry.format,
                    offset: entry.offset,
                    count: entry.size,
                }),
                _ => None,
            },
            None => None,
        }
    }

    /// Shader variable group bound to `name`
    pub fn get_variable_group(&self, name: impl Into<NameId>) -> Option<&Arc<ShaderVariableGroup>> {
        match self.find(name.into()) {
            Some(SharedValueEntry { value: Some(SharedValue::VariableGroup(group)), .. }) => Some(group),
            _ => None,
        }
    }

    /// Buffer bound to `name`
    ///
    /// A shader variable group backed by a GPU buffer is returned as that whole buffer.
    pub fn get_buffer(&self, name: impl Into<NameId>) -> Option<BufferBinding> {
        let entry = self.find(name.into())?;
        match &entry.value {
            Some(SharedValue::Buffer(buffer)) => Some(BufferBinding {
                buffer: Arc::clone(buffer),
                offset: entry.offset,
                size: entry.size,
            }),
            Some(SharedValue::VariableGroup(group)) => group.buffer.as_ref().map(|buffer| BufferBinding {
                buffer: Arc::clone(buffer),
                offset: 0,
                size: buffer.size,
            }),
            _ => None,
        }
    }

    /// Kind of the value bound to `name`, also reported for unbound entries
    pub fn value_kind(&self, name: impl Into<NameId>) -> Option<SharedValueKind> {
        self.find(name.into()).map(|entry| entry.kind)
    }

    /// Whether `name` has an entry but no resource
    pub fn is_unbound(&self, name: impl Into<NameId>) -> bool {
        self.find(name.into()).is_some_and(|entry| entry.value.is_none())
    }

    pub fn contains(&self, name: impl Into<NameId>) -> bool {
        self.table.contains_key(&name.into())
    }

    // ===== SETTERS =====

    /// Bind a texture to `name`
    ///
    /// # Errors
    ///
    /// - TypeMismatch: `name` holds a different kind of value
    /// - ExhaustedCapacity: `name` is new and the store is full
    pub fn set_texture(&mut self, name: impl Into<NameId>, texture: Arc<Texture>) -> Result<()> {
        self.set_value(name.into(), SharedValueKind::Texture, Some(SharedValue::Texture(texture)),
            GfxFormat::Unknown, 0, 0)
    }

    /// Bind `count` texels of `buffer` starting at byte `offset` as a texture buffer
    ///
    /// # Errors
    ///
    /// - InvalidArgument: format not usable for texture buffers, buffer lacks texture/image usage
    /// - IndexOutOfRange: the range exceeds the buffer
    /// - NotPermitted: sub-range without backend support, misaligned offset, too many texels
    /// - TypeMismatch / ExhaustedCapacity: see [`SharedMaterialValues::set_texture`]
    pub fn set_texture_buffer(
        &mut self,
        name: impl Into<NameId>,
        buffer: Arc<GfxBuffer>,
        format: GfxFormat,
        offset: u64,
        count: u64,
    ) -> Result<()> {
        Self::check_texture_buffer(&buffer, format, offset, count)?;
        self.set_value(name.into(), SharedValueKind::TextureBuffer, Some(SharedValue::TextureBuffer(buffer)),
            format, offset, count)
    }

    /// Bind a shader variable group to `name`
    ///
    /// # Errors
    ///
    /// See [`SharedMaterialValues::set_texture`].
    pub fn set_variable_group(
        &mut self,
        name: impl Into<NameId>,
        group: Arc<ShaderVariableGroup>,
    ) -> Result<()> {
        self.set_value(name.into(), SharedValueKind::VariableGroup, Some(SharedValue::VariableGroup(group)),
            GfxFormat::Unknown, 0, 0)
    }

    /// Bind `size` bytes of `buffer` starting at `offset` as a uniform block/buffer
    ///
    /// # Errors
    ///
    /// - InvalidArgument: buffer lacks uniform block/buffer usage
    /// - IndexOutOfRange: the range exceeds the buffer
    /// - NotPermitted: misaligned offset, uniform block larger than the backend allows
    /// - TypeMismatch / ExhaustedCapacity: see [`SharedMaterialValues::set_texture`]
    pub fn set_buffer(
        &mut self,
        name: impl Into<NameId>,
        buffer: Arc<GfxBuffer>,
        offset: u64,
        size: u64,
    ) -> Result<()> {
        Self::check_buffer(&buffer, offset, size)?;
        self.set_value(name.into(), SharedValueKind::Buffer, Some(SharedValue::Buffer(buffer)),
            GfxFormat::Unknown, offset, size)
    }

    /// Bind `name` to no resource of the given kind
    ///
    /// The entry is created if needed and follows the same version rules as the setters:
    /// dropping a bound resource bumps `pointer_version`. Resource checks don't apply.
    ///
    /// # Errors
    ///
    /// See [`SharedMaterialValues::set_texture`].
    pub fn unbind(&mut self, name: impl Into<NameId>, kind: SharedValueKind) -> Result<()> {
        self.set_value(name.into(), kind, None, GfxFormat::Unknown, 0, 0)
    }

    // ===== REMOVAL =====

    /// Remove the value bound to `name`, returns false if there was none
    pub fn remove(&mut self, name: impl Into<NameId>) -> bool {
        match self.table.remove(&name.into()) {
            Some(key) => {
                self.entries.remove(key);
                true
            }
            None => false,
        }
    }

    /// Remove every value, keeping both versions
    pub fn clear(&mut self) {
        self.table.clear();
        self.entries.clear();
    }

    // ===== ACCESSORS =====

    pub fn pointer_version(&self) -> u32 {
        self.pointer_version
    }

    pub fn offset_version(&self) -> u32 {
        self.offset_version
    }

    pub fn value_count(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn max_value_count(&self) -> u32 {
        self.max_values
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ===== INTERNAL =====

    fn find(&self, name: NameId) -> Option<&SharedValueEntry> {
        self.table.get(&name).and_then(|&key| self.entries.get(key))
    }

    fn set_value(
        &mut self,
        name: NameId,
        kind: SharedValueKind,
        value: Option<SharedValue>,
        format: GfxFormat,
        offset: u64,
        size: u64,
    ) -> Result<()> {
        let existing = self.table.get(&name).and_then(|&key| self.entries.get_mut(key));
        if let Some(entry) = existing {
            if entry.kind != kind {
                engine_bail!(TypeMismatch, "abyss::SharedMaterialValues",
                    "Value {} is a {:?}, can't set it as a {:?}", name, entry.kind, kind);
            }

            if !same_binding(entry.value.as_ref(), value.as_ref())
                || entry.format != format
                || entry.size != size
                || (kind == SharedValueKind::TextureBuffer && entry.offset != offset)
            {
                self.pointer_version = self.pointer_version.wrapping_add(1);
            } else if entry.offset != offset {
                self.offset_version = self.offset_version.wrapping_add(1);
            }

            entry.value = value;
            entry.format = format;
            entry.offset = offset;
            entry.size = size;
            return Ok(());
        }

        if self.entries.len() >= self.max_values as usize {
            engine_bail!(ExhaustedCapacity, "abyss::SharedMaterialValues",
                "Can't add value {}: all {} values are in use", name, self.max_values);
        }

        let key = self.entries.insert(SharedValueEntry { kind, value, format, offset, size });
        self.table.insert(name, key);
        self.pointer_version = self.pointer_version.wrapping_add(1);
        crate::engine_trace!("abyss::SharedMaterialValues", "Added value {}", name);
        Ok(())
    }

    fn check_texture_buffer(buffer: &GfxBuffer, format: GfxFormat, offset: u64, count: u64) -> Result<()> {
        let resource_manager = buffer.resource_manager();
        let caps = resource_manager.caps();

        // ========== VALIDATION 1: Format ==========
        if !resource_manager.texture_buffer_supported(format) {
            engine_bail!(InvalidArgument, "abyss::SharedMaterialValues",
                "Format {:?} not supported for texture buffers", format);
        }

        // ========== VALIDATION 2: Buffer usage ==========
        if !buffer.usage.intersects(BufferUsage::TEXTURE | BufferUsage::IMAGE) {
            engine_bail!(InvalidArgument, "abyss::SharedMaterialValues",
                "Buffer '{}' doesn't support being used as a texture", buffer.name);
        }

        // ========== VALIDATION 3: Range ==========
        let byte_size = count.checked_mul(format.size() as u64);
        let end = byte_size.and_then(|size| size.checked_add(offset));
        if !end.is_some_and(|end| end <= buffer.size) {
            engine_bail!(IndexOutOfRange, "abyss::SharedMaterialValues",
                "Texture buffer range {} + {} texels is outside of buffer '{}' ({} bytes)",
                offset, count, buffer.name, buffer.size);
        }

        // ========== VALIDATION 4: Sub-range support ==========
        if !caps.has_texture_buffer_subrange && (offset != 0 || byte_size != Some(buffer.size)) {
            engine_bail!(NotPermitted, "abyss::SharedMaterialValues",
                "Texture buffers must cover the whole buffer '{}' on the current backend", buffer.name);
        }

        // ========== VALIDATION 5: Alignment ==========
        let alignment = caps.min_texture_buffer_alignment;
        if alignment > 0 && offset % alignment != 0 {
            engine_bail!(NotPermitted, "abyss::SharedMaterialValues",
                "Texture buffer offset {} doesn't match the {} byte alignment", offset, alignment);
        }

        // ========== VALIDATION 6: Element count ==========
        if count > caps.max_texture_buffer_elements {
            engine_bail!(NotPermitted, "abyss::SharedMaterialValues",
                "Texture buffer has {} texels, maximum is {}", count, caps.max_texture_buffer_elements);
        }

        Ok(())
    }

    fn check_buffer(buffer: &GfxBuffer, offset: u64, size: u64) -> Result<()> {
        let caps = buffer.resource_manager().caps();

        // ========== VALIDATION 1: Buffer usage ==========
        if !buffer.usage.intersects(BufferUsage::UNIFORM_BLOCK | BufferUsage::UNIFORM_BUFFER) {
            engine_bail!(InvalidArgument, "abyss::SharedMaterialValues",
                "Buffer '{}' doesn't support uniform blocks or buffers", buffer.name);
        }

        // ========== VALIDATION 2: Range ==========
        if !offset.checked_add(size).is_some_and(|end| end <= buffer.size) {
            engine_bail!(IndexOutOfRange, "abyss::SharedMaterialValues",
                "Buffer range {} + {} bytes is outside of buffer '{}' ({} bytes)",
                offset, size, buffer.name, buffer.size);
        }

        // ========== VALIDATION 3: Alignment ==========
        let mut alignment = 0;
        if buffer.usage.contains(BufferUsage::UNIFORM_BLOCK) {
            alignment = caps.min_uniform_block_alignment;
        }
        if buffer.usage.contains(BufferUsage::UNIFORM_BUFFER) {
            alignment = alignment.max(caps.min_uniform_buffer_alignment);
        }
        if alignment > 0 && offset % alignment != 0 {
            engine_bail!(NotPermitted, "abyss::SharedMaterialValues",
                "Buffer offset {} doesn't match the {} byte alignment", offset, alignment);
        }

        // ========== VALIDATION 4: Uniform block size ==========
        if buffer.usage.contains(BufferUsage::UNIFORM_BLOCK) && size > caps.max_uniform_block_size {
            engine_bail!(NotPermitted, "abyss::SharedMaterialValues",
                "Buffer range of {} bytes exceeds the maximum uniform block size {}",
                size, caps.max_uniform_block_size);
        }

        Ok(())
    }
}

impl Default for SharedMaterialValues {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_VALUES)
    }
}

impl fmt::Debug for SharedMaterialValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMaterialValues")
            .field("value_count", &self.entries.len())
            .field("max_values", &self.max_values)
            .field("pointer_version", &self.pointer_version)
            .field("offset_version", &self.offset_version)
            .finish()
    }
}

#[cfg(test)]
#[path = "shared_material_values_tests.rs"]
mod tests;
