//! Binary wire formats (all integers and floats big-endian).
//!
//! Point set
//! - `u32` count N, then N records of `f32 x, f32 y`.
//!
//! Triangulation
//! - A point-set section for the vertices, then `u32` count T and T records of
//!   three `u32` vertex indices.
//!
//! Coordinates travel as `f32`; decoding widens to `f64` exactly.

use thiserror::Error;

use crate::geometry::{Point, Triangle};
use crate::triangulate::Triangulation;

const COUNT_BYTES: usize = 4;
const POINT_BYTES: usize = 8;
const TRIANGLE_BYTES: usize = 12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Fewer than 4 bytes where a count header was expected.
    #[error("{section} section too short for its count header ({available} bytes)")]
    MissingHeader {
        section: &'static str,
        available: usize,
    },
    /// Declared count needs more bytes than the buffer holds.
    #[error("incomplete {section} section: expected {expected} bytes, got {actual}")]
    Truncated {
        section: &'static str,
        expected: u64,
        actual: u64,
    },
    #[error("{what} {value} does not fit the u32 wire format")]
    CountOverflow { what: &'static str, value: usize },
    #[error("coordinate {value} overflows f32")]
    CoordinateOutOfRange { value: f64 },
    /// A triangle refers past the end of the vertex section.
    #[error("triangle {triangle} references vertex {index}, but only {vertices} vertices are present")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertices: usize,
    },
}

/// Decode a point-set blob. Bytes past the declared records are ignored.
pub fn decode_point_set(bytes: &[u8]) -> Result<Vec<Point>, CodecError> {
    let (points, _) = read_points(bytes)?;
    Ok(points)
}

pub fn encode_point_set(points: &[Point]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(COUNT_BYTES + points.len() * POINT_BYTES);
    write_points(&mut out, points)?;
    Ok(out)
}

/// Encode vertices followed by index triangles.
pub fn encode_triangulation(
    vertices: &[Point],
    triangles: &[Triangle],
) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(
        2 * COUNT_BYTES + vertices.len() * POINT_BYTES + triangles.len() * TRIANGLE_BYTES,
    );
    write_points(&mut out, vertices)?;
    write_count(&mut out, "triangle count", triangles.len())?;
    for t in triangles {
        for i in t.indices() {
            write_count(&mut out, "vertex index", i)?;
        }
    }
    Ok(out)
}

/// Decode a triangulation blob. Every index must point into the vertex section.
pub fn decode_triangulation(bytes: &[u8]) -> Result<Triangulation, CodecError> {
    let (vertices, rest) = read_points(bytes)?;
    let (count, rest) = read_count(rest, "triangle")?;
    check_len(rest, count, TRIANGLE_BYTES, "triangle")?;
    let n = vertices.len();
    let triangles = rest
        .chunks_exact(TRIANGLE_BYTES)
        .take(count)
        .enumerate()
        .map(|(k, rec)| {
            let t = Triangle::new(
                be_u32(&rec[0..4]) as usize,
                be_u32(&rec[4..8]) as usize,
                be_u32(&rec[8..12]) as usize,
            );
            match t.indices().into_iter().find(|&i| i >= n) {
                Some(index) => Err(CodecError::IndexOutOfRange {
                    triangle: k,
                    index,
                    vertices: n,
                }),
                None => Ok(t),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Triangulation {
        vertices,
        triangles,
    })
}

fn read_points(bytes: &[u8]) -> Result<(Vec<Point>, &[u8]), CodecError> {
    let (count, rest) = read_count(bytes, "point")?;
    check_len(rest, count, POINT_BYTES, "point")?;
    let points = rest
        .chunks_exact(POINT_BYTES)
        .take(count)
        .map(|rec| Point::new(be_f32(&rec[0..4]) as f64, be_f32(&rec[4..8]) as f64))
        .collect();
    Ok((points, &rest[count * POINT_BYTES..]))
}

fn read_count<'a>(bytes: &'a [u8], section: &'static str) -> Result<(usize, &'a [u8]), CodecError> {
    if bytes.len() < COUNT_BYTES {
        return Err(CodecError::MissingHeader {
            section,
            available: bytes.len(),
        });
    }
    let (head, rest) = bytes.split_at(COUNT_BYTES);
    Ok((be_u32(head) as usize, rest))
}

fn check_len(
    body: &[u8],
    count: usize,
    record: usize,
    section: &'static str,
) -> Result<(), CodecError> {
    let need = count as u64 * record as u64;
    if (body.len() as u64) < need {
        return Err(CodecError::Truncated {
            section,
            expected: COUNT_BYTES as u64 + need,
            actual: (COUNT_BYTES + body.len()) as u64,
        });
    }
    Ok(())
}

fn write_points(out: &mut Vec<u8>, points: &[Point]) -> Result<(), CodecError> {
    write_count(out, "point count", points.len())?;
    for p in points {
        out.extend_from_slice(&to_f32(p.x)?.to_be_bytes());
        out.extend_from_slice(&to_f32(p.y)?.to_be_bytes());
    }
    Ok(())
}

fn write_count(out: &mut Vec<u8>, what: &'static str, value: usize) -> Result<(), CodecError> {
    let v = u32::try_from(value).map_err(|_| CodecError::CountOverflow { what, value })?;
    out.extend_from_slice(&v.to_be_bytes());
    Ok(())
}

#[inline]
fn to_f32(value: f64) -> Result<f32, CodecError> {
    let narrow = value as f32;
    if value.is_finite() && !narrow.is_finite() {
        return Err(CodecError::CoordinateOutOfRange { value });
    }
    Ok(narrow)
}

#[inline]
fn be_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

#[inline]
fn be_f32(b: &[u8]) -> f32 {
    f32::from_bits(be_u32(b))
}
