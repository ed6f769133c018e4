//! Zero-byte block padding.
//!
//! Plaintext is extended with NUL bytes up to the next block boundary and the
//! padding is removed again by trimming every trailing NUL. There is no length
//! marker, so a plaintext that itself ends in NUL bytes loses them on the way
//! back. That is the established envelope format and is kept as is; binary
//! payloads with meaningful trailing zeros need their own framing.

pub struct ZeroPadding {
    block_size: usize,
}

impl ZeroPadding {
    /// # Panics
    ///
    /// Panics if `block_size` is zero.
    #[must_use]
    pub const fn new(block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be non-zero");
        Self { block_size }
    }

    /// Pads `data` to a multiple of the block size. Aligned input (including
    /// empty input) gets no extra block.
    #[must_use]
    pub fn pad(&self, data: &[u8]) -> Vec<u8> {
        let padded_len = data.len().div_ceil(self.block_size) * self.block_size;
        let mut result = Vec::with_capacity(padded_len);
        result.extend_from_slice(data);
        result.resize(padded_len, 0);
        result
    }

    #[must_use]
    pub fn is_aligned(&self, len: usize) -> bool {
        len.is_multiple_of(self.block_size)
    }

    /// Strips every trailing NUL byte.
    #[must_use]
    pub fn unpad(data: &[u8]) -> &[u8] {
        let end = data.iter().rposition(|&byte| byte != 0).map_or(0, |last| last + 1);
        &data[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_to_block_boundary() {
        let padding = ZeroPadding::new(16);
        let padded = padding.pad(b"hello");
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[..5], b"hello");
        assert!(padded[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pad_aligned_adds_nothing() {
        let padding = ZeroPadding::new(16);
        assert_eq!(padding.pad(&[7u8; 32]).len(), 32);
        assert!(padding.pad(b"").is_empty());
    }

    #[test]
    fn test_unpad_trims_trailing_nul() {
        assert_eq!(ZeroPadding::unpad(b"hello\0\0\0"), b"hello");
        assert_eq!(ZeroPadding::unpad(b"a\0b\0"), b"a\0b");
        assert_eq!(ZeroPadding::unpad(b"\0\0\0"), b"");
        assert_eq!(ZeroPadding::unpad(b""), b"");
    }

    #[test]
    fn test_alignment() {
        let padding = ZeroPadding::new(16);
        assert!(padding.is_aligned(0));
        assert!(padding.is_aligned(48));
        assert!(!padding.is_aligned(17));
    }

    #[test]
    #[should_panic(expected = "block size must be non-zero")]
    fn test_zero_block_size_rejected() {
        let _ = ZeroPadding::new(0);
    }
}
