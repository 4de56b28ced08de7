//! Minimal ISO-BMFF reader for MP4 / MOV / M4V track dimensions.
//!
//! Walks the box tree looking for the first `tkhd` (track header) with a
//! positive width and height. Only container boxes on the path to a track
//! header are descended into; everything else is skipped by size.
//!
//! Box layout:
//!   Bytes 0-3:  size (big-endian u32; 1 = 64-bit size follows, 0 = to end)
//!   Bytes 4-7:  type (four ASCII bytes)
//!   Bytes 8-15: 64-bit size when size == 1
//!
//! Zero external dependencies.

/// Boxes whose payload is itself a sequence of boxes.
const CONTAINER_TYPES: &[&[u8; 4]] = &[
    b"moov", b"trak", b"mdia", b"minf", b"stbl", b"edts", b"dinf", b"udta", b"meta", b"mvex",
];

/// Container nesting beyond this is not descended into. Real files put
/// `tkhd` at depth 2 (`moov/trak/tkhd`).
const MAX_DEPTH: usize = 16;

/// Bytes in `tkhd` between version/flags and the width field, excluding
/// the version-dependent timestamps and duration.
const TKHD_FIXED_PREFIX: usize = 4 // track id
    + 4 // reserved
    + 8 // reserved
    + 2 + 2 + 2 + 2 // layer, alternate group, volume, reserved
    + 36; // matrix

/// Pixel dimensions of the first video track, if any.
pub fn video_dimensions(data: &[u8]) -> Option<(f64, f64)> {
    read_boxes(data, 0, data.len(), 0)
}

fn read_u32(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_u64(data: &[u8], pos: usize) -> Option<u64> {
    let bytes = data.get(pos..pos + 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Some(u64::from_be_bytes(buf))
}

fn read_boxes(data: &[u8], start: usize, end: usize, depth: usize) -> Option<(f64, f64)> {
    let limit = end.min(data.len());
    let mut pos = start;

    while pos + 8 <= limit {
        let raw_size = read_u32(data, pos)?;
        let (size, header) = match raw_size {
            1 => {
                if pos + 16 > limit {
                    break;
                }
                let Ok(size) = usize::try_from(read_u64(data, pos + 8)?) else {
                    break;
                };
                (size, 16)
            }
            0 => (limit - pos, 8),
            n => (n as usize, 8),
        };
        if size < header {
            break;
        }
        let Some(box_end) = pos.checked_add(size).filter(|&e| e <= limit) else {
            break;
        };
        let kind = &data[pos + 4..pos + 8];
        let body = pos + header;

        if kind == b"tkhd" {
            if let Some(dims) = track_header_dimensions(&data[body..box_end]) {
                return Some(dims);
            }
        } else if depth < MAX_DEPTH && CONTAINER_TYPES.iter().any(|c| kind == c.as_slice()) {
            let mut inner = body;
            // `meta` is a full box: version + flags precede its children
            if kind == b"meta" && inner + 4 <= box_end {
                inner += 4;
            }
            if let Some(dims) = read_boxes(data, inner, box_end, depth + 1) {
                return Some(dims);
            }
        }

        pos = box_end;
    }

    None
}

/// Width and height from a `tkhd` payload (16.16 fixed point).
fn track_header_dimensions(payload: &[u8]) -> Option<(f64, f64)> {
    let version = *payload.first()?;
    let timing = match version {
        0 => 4 + 4 + 4,  // creation, modification, duration
        1 => 8 + 8 + 8, // 64-bit variants
        _ => return None,
    };
    let offset = 4 + timing + TKHD_FIXED_PREFIX;
    let width = f64::from(read_u32(payload, offset)?) / 65536.0;
    let height = f64::from(read_u32(payload, offset + 4)?) / 65536.0;
    (width > 0.0 && height > 0.0).then_some((width, height))
}
