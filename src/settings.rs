/// Which mip levels of a texture are decoded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MipLevels {
    /// Every level stored in the container.
    All,
    /// At most the given number of levels, starting at the largest one. The
    /// largest level is always decoded.
    First(u32),
}

/// Decoding settings.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DecodeSettings {
    pub(crate) mip_levels: MipLevels,
    pub(crate) max_dimension: u32,
}

impl DecodeSettings {
    /// Largest width, height or depth accepted by default.
    pub const DEFAULT_MAX_DIMENSION: u32 = 65536;

    /// Decodes the full mip chain.
    pub const fn all_levels() -> Self {
        Self {
            mip_levels: MipLevels::All,
            max_dimension: Self::DEFAULT_MAX_DIMENSION,
        }
    }

    /// Decodes only the largest mip level.
    pub const fn top_level() -> Self {
        Self {
            mip_levels: MipLevels::First(1),
            max_dimension: Self::DEFAULT_MAX_DIMENSION,
        }
    }

    /// Sets which mip levels are decoded.
    pub const fn with_mip_levels(mut self, mip_levels: MipLevels) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    /// Sets the largest accepted width, height or depth.
    ///
    /// Headers exceeding it are rejected before anything is allocated.
    pub const fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub const fn mip_levels(&self) -> MipLevels {
        self.mip_levels
    }

    pub const fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Number of levels to decode out of `available`.
    pub(crate) fn levels_to_decode(&self, available: u32) -> u32 {
        match self.mip_levels {
            MipLevels::All => available,
            MipLevels::First(count) => count.max(1).min(available),
        }
    }
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self::all_levels()
    }
}
