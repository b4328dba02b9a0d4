/// Bytes per hexdump line (32 hex digits).
pub const DUMP_LINE_BYTES: usize = 16;

/// Render bytes as uppercase hex, `per_line` bytes to a line.
///
/// A `per_line` of zero puts everything on one line.
pub fn hexdump_lines(data: &[u8], per_line: usize) -> Vec<String> {
    if data.is_empty() {
        return Vec::new();
    }
    let per_line = if per_line == 0 { data.len() } else { per_line };

    data.chunks(per_line).map(hex::encode_upper).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_sixteen_byte_lines() {
        let data: Vec<u8> = (0u8..20).collect();
        let lines = hexdump_lines(&data, DUMP_LINE_BYTES);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "000102030405060708090A0B0C0D0E0F");
        assert_eq!(lines[1], "10111213");
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(hexdump_lines(&[], DUMP_LINE_BYTES).is_empty());
    }

    #[test]
    fn zero_width_is_a_single_line() {
        assert_eq!(hexdump_lines(&[0xC2, 0x00], 0), vec!["C200".to_string()]);
    }
}
