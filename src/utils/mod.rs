// private sub-module defined in other files
mod byte_order_reader;
mod byte_order_writer;

// exports identifiers from private sub-modules in the current module namespace
pub use self::byte_order_reader::ByteOrderReader;
pub use self::byte_order_reader::Endianness;
pub use self::byte_order_writer::ByteOrderWriter;

/// Returns `s` NUL-padded or truncated to exactly `len` bytes. Truncation
/// never splits a multi-byte character.
pub fn fixed_length_bytes(s: &str, len: usize) -> Vec<u8> {
    let mut end = s.len().min(len);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut bytes = s.as_bytes()[..end].to_vec();
    bytes.resize(len, 0u8);
    bytes
}

/// Decodes a fixed-width LAS text field, stopping at the first NUL.
pub fn trimmed_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).to_string()
}

#[cfg(test)]
mod test {
    use super::{fixed_length_bytes, trimmed_string};

    #[test]
    fn test_fixed_length_bytes() {
        assert_eq!(fixed_length_bytes("abc", 5), vec![b'a', b'b', b'c', 0, 0]);
        assert_eq!(fixed_length_bytes("abcdef", 4), b"abcd".to_vec());
        // 'é' is two bytes and must not be split
        assert_eq!(fixed_length_bytes("aé", 2), vec![b'a', 0]);
    }

    #[test]
    fn test_trimmed_string() {
        assert_eq!(trimmed_string(b"LASF_Spec\0\0\0\0\0\0\0"), "LASF_Spec");
        assert_eq!(trimmed_string(b"no nul"), "no nul");
        assert_eq!(trimmed_string(b"\0garbage"), "");
    }
}
