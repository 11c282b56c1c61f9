//! Best-effort decoding of revert reasons.

/// Selector plus the offset and length words of an `Error(string)` payload.
const REASON_OFFSET: usize = 4 + 32 + 32;

/// Decode a human-readable reason from revert data.
///
/// Reads the string that starts at a fixed offset in an ABI-encoded
/// `Error(string)` payload. Returns `None` when the payload is too short or
/// the bytes are not UTF-8.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    let tail = data.get(REASON_OFFSET..)?;

    // Length word sits right before the string bytes.
    let declared = data
        .get(REASON_OFFSET - 32..REASON_OFFSET)
        .and_then(read_len);
    let bytes = match declared {
        Some(len) if len <= tail.len() => &tail[..len],
        _ => trim_padding(tail),
    };

    let reason = std::str::from_utf8(bytes).ok()?;
    if reason.is_empty() {
        None
    } else {
        Some(reason.to_string())
    }
}

/// Read a 32-byte big-endian word as a length, if it fits in a usize.
fn read_len(word: &[u8]) -> Option<usize> {
    let (high, low) = word.split_at(24);
    if high.iter().any(|&b| b != 0) {
        return None;
    }
    let low: [u8; 8] = low.try_into().ok()?;
    usize::try_from(u64::from_be_bytes(low)).ok()
}

fn trim_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}
