//! Fixed-capacity value storage.
//!
//! A [`ValueBuffer`] is the backing store of a parameter value. Its capacity is
//! the declared field length and includes one byte for the terminator, so at
//! most `capacity - 1` bytes of content are ever kept. The capacity is fixed at
//! construction and never grows.
//!
//! The buffer is always exactly `capacity` bytes long. Content is kept
//! NUL-padded so the raw bytes can be handed to storage verbatim.

/// Bounded, NUL-padded string storage with a fixed capacity.
#[derive(Clone, PartialEq, Eq)]
pub struct ValueBuffer {
    bytes: Box<[u8]>,
}

impl ValueBuffer {
    /// Create an empty buffer of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Create a buffer and fill it with `value`, truncated to fit.
    pub fn with_value(capacity: usize, value: &str) -> Self {
        let mut buffer = Self::new(capacity);
        buffer.set(value);
        buffer
    }

    /// Declared capacity, terminator included.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Maximum number of content bytes.
    pub fn max_len(&self) -> usize {
        self.capacity().saturating_sub(1)
    }

    /// Current content.
    pub fn as_str(&self) -> &str {
        let content = &self.bytes[..self.content_len()];
        match std::str::from_utf8(content) {
            Ok(s) => s,
            // Only reachable between a raw fill and `normalize`.
            Err(e) => std::str::from_utf8(&content[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    /// Length of the content in bytes.
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Replace the content with `value`.
    ///
    /// At most [`max_len`](Self::max_len) bytes are copied, cut on a character
    /// boundary. Returns `true` if the value had to be truncated.
    pub fn set(&mut self, value: &str) -> bool {
        let kept = truncate_to_boundary(value, self.max_len());
        self.bytes.fill(0);
        self.bytes[..kept.len()].copy_from_slice(kept.as_bytes());
        kept.len() < value.len()
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Raw bytes, padding included.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raw mutable bytes for a storage reader to fill.
    ///
    /// Callers must run [`normalize`](Self::normalize) afterwards.
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Restore the buffer invariant after a raw fill.
    ///
    /// The last byte becomes the terminator, the content is cut at the first
    /// NUL and at the longest valid UTF-8 prefix, and everything after it is
    /// zeroed.
    pub(crate) fn normalize(&mut self) {
        if let Some(last) = self.bytes.last_mut() {
            *last = 0;
        }
        let end = self.content_len();
        let valid = match std::str::from_utf8(&self.bytes[..end]) {
            Ok(s) => s.len(),
            Err(e) => e.valid_up_to(),
        };
        self.bytes[valid..].fill(0);
    }

    fn content_len(&self) -> usize {
        let limit = self.max_len();
        self.bytes[..limit]
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(limit)
    }
}

impl std::fmt::Debug for ValueBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueBuffer")
            .field("capacity", &self.capacity())
            .field("value", &self.as_str())
            .finish()
    }
}

impl std::fmt::Display for ValueBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longest prefix of `value` that fits in `max` bytes without splitting a
/// character.
fn truncate_to_boundary(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = ValueBuffer::new(16);
        assert_eq!(buffer.capacity(), 16);
        assert_eq!(buffer.as_str(), "");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_set_within_capacity() {
        let mut buffer = ValueBuffer::new(16);
        assert!(!buffer.set("192.168.1.5"));
        assert_eq!(buffer.as_str(), "192.168.1.5");
        assert_eq!(buffer.len(), 11);
    }

    #[test]
    fn test_set_truncates_to_capacity_minus_one() {
        let mut buffer = ValueBuffer::new(5);
        assert!(buffer.set("abcdefgh"));
        assert_eq!(buffer.as_str(), "abcd");
        assert_eq!(buffer.as_bytes()[4], 0);
    }

    #[test]
    fn test_set_shorter_value_clears_tail() {
        let mut buffer = ValueBuffer::with_value(8, "longer");
        buffer.set("ab");
        assert_eq!(buffer.as_bytes(), b"ab\0\0\0\0\0\0");
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // "é" is two bytes; only one byte of room is left after "ab".
        let mut buffer = ValueBuffer::new(4);
        buffer.set("abé");
        assert_eq!(buffer.as_str(), "ab");
    }

    #[test]
    fn test_zero_capacity_stays_empty() {
        let mut buffer = ValueBuffer::new(0);
        assert!(buffer.set("x"));
        assert_eq!(buffer.as_str(), "");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_normalize_forces_terminator() {
        let mut buffer = ValueBuffer::new(4);
        buffer.as_bytes_mut().copy_from_slice(b"abcd");
        buffer.normalize();
        assert_eq!(buffer.as_str(), "abc");
        assert_eq!(buffer.as_bytes(), b"abc\0");
    }

    #[test]
    fn test_normalize_drops_invalid_utf8() {
        let mut buffer = ValueBuffer::new(6);
        buffer.as_bytes_mut().copy_from_slice(&[b'o', b'k', 0xff, b'x', 0, 0]);
        buffer.normalize();
        assert_eq!(buffer.as_str(), "ok");
        assert_eq!(buffer.as_bytes(), b"ok\0\0\0\0");
    }

    #[test]
    fn test_normalize_zeroes_garbage_after_terminator() {
        let mut buffer = ValueBuffer::new(6);
        buffer.as_bytes_mut().copy_from_slice(b"ab\0xyz");
        buffer.normalize();
        assert_eq!(buffer.as_bytes(), b"ab\0\0\0\0");
    }

    proptest! {
        #[test]
        fn set_never_exceeds_capacity(capacity in 0usize..64, value in ".{0,100}") {
            let mut buffer = ValueBuffer::new(capacity);
            buffer.set(&value);
            prop_assert!(buffer.len() <= capacity.saturating_sub(1));
            prop_assert_eq!(buffer.capacity(), capacity);
            prop_assert!(value.starts_with(buffer.as_str()));
        }
    }
}
