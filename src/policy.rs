//! Decode-time safety limits.

/// Hard ceilings enforced by [`crate::decode::Decoder`] while reconstructing
/// a [`crate::Value`] tree from bytes.
///
/// A `SizePolicy` is set once at decoder construction and is immutable
/// thereafter; build one with [`SizePolicy::builder`] or fall back to
/// [`SizePolicy::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePolicy {
    max_value_depth: usize,
    max_object_size: usize,
    max_string_size: usize,
    max_binary_size: usize,
    max_key_size: u8,
    max_children: usize,
}

impl SizePolicy {
    /// Start building a policy away from the defaults.
    pub fn builder() -> SizePolicyBuilder {
        SizePolicyBuilder::default()
    }

    /// Hard ceiling on nested container depth during decode.
    pub fn max_value_depth(&self) -> usize {
        self.max_value_depth
    }

    /// Hard ceiling on total bytes consumed from the stream for one
    /// top-level value.
    pub fn max_object_size(&self) -> usize {
        self.max_object_size
    }

    /// Hard ceiling on bytes in one `String` payload.
    pub fn max_string_size(&self) -> usize {
        self.max_string_size
    }

    /// Hard ceiling on bytes in one `Binary` payload.
    pub fn max_binary_size(&self) -> usize {
        self.max_binary_size
    }

    /// Hard ceiling on bytes in one map key (always `<= 255`).
    pub fn max_key_size(&self) -> u8 {
        self.max_key_size
    }

    /// Hard ceiling on direct children of one container.
    pub fn max_children(&self) -> usize {
        self.max_children
    }
}

impl Default for SizePolicy {
    fn default() -> Self {
        SizePolicy {
            max_value_depth: 32,
            max_object_size: 64 * 1024 * 1024,
            max_string_size: 8 * 1024 * 1024,
            max_binary_size: 64 * 1024 * 1024,
            max_key_size: 255,
            max_children: 1024,
        }
    }
}

/// Builder for [`SizePolicy`]; every setter is optional and falls back to
/// [`SizePolicy::default`]'s value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePolicyBuilder {
    inner: SizePolicy,
}

impl Default for SizePolicyBuilder {
    fn default() -> Self {
        SizePolicyBuilder {
            inner: SizePolicy::default(),
        }
    }
}

impl SizePolicyBuilder {
    /// Set the maximum nesting depth.
    pub fn max_value_depth(mut self, depth: usize) -> Self {
        self.inner.max_value_depth = depth;
        self
    }

    /// Set the maximum total bytes for one top-level decode.
    pub fn max_object_size(mut self, bytes: usize) -> Self {
        self.inner.max_object_size = bytes;
        self
    }

    /// Set the maximum bytes in one `String` payload.
    pub fn max_string_size(mut self, bytes: usize) -> Self {
        self.inner.max_string_size = bytes;
        self
    }

    /// Set the maximum bytes in one `Binary` payload.
    pub fn max_binary_size(mut self, bytes: usize) -> Self {
        self.inner.max_binary_size = bytes;
        self
    }

    /// Set the maximum bytes in one map key. Clamped to 255, since the
    /// wire format uses a one-byte key-length prefix.
    pub fn max_key_size(mut self, bytes: u8) -> Self {
        self.inner.max_key_size = bytes;
        self
    }

    /// Set the maximum direct children of one container.
    pub fn max_children(mut self, count: usize) -> Self {
        self.inner.max_children = count;
        self
    }

    /// Finish building.
    pub fn build(self) -> SizePolicy {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_spec() {
        let p = SizePolicy::default();
        assert_eq!(p.max_value_depth(), 32);
        assert_eq!(p.max_object_size(), 64 * 1024 * 1024);
        assert_eq!(p.max_string_size(), 8 * 1024 * 1024);
        assert_eq!(p.max_binary_size(), 64 * 1024 * 1024);
        assert_eq!(p.max_key_size(), 255);
        assert_eq!(p.max_children(), 1024);
    }

    #[test]
    fn builder_overrides_individual_fields() {
        let p = SizePolicy::builder().max_value_depth(4).max_children(8).build();
        assert_eq!(p.max_value_depth(), 4);
        assert_eq!(p.max_children(), 8);
        assert_eq!(p.max_object_size(), SizePolicy::default().max_object_size());
    }
}
