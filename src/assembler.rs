use crate::error::RenderError;
use crate::mesh::PrimitiveTopology;

/// Minimum number of indices (exclusive) a triangle strip must carry.
pub const MIN_STRIP_INDICES: usize = 6;

/// Walks an index buffer and yields vertex index triples in render order.
///
/// Strip triangles starting at an odd offset have their last two indices
/// swapped so every triangle keeps the same winding.
#[derive(Clone, Debug)]
pub struct TriangleAssembler<'a> {
    indices: &'a [u32],
    strip: bool,
    offset: usize,
}

impl<'a> TriangleAssembler<'a> {
    pub fn new(indices: &'a [u32], topology: PrimitiveTopology) -> Result<Self, RenderError> {
        let strip = match topology {
            PrimitiveTopology::TriangleList => false,
            PrimitiveTopology::TriangleStrip => {
                if indices.len() <= MIN_STRIP_INDICES {
                    return Err(RenderError::MalformedStrip(indices.len()));
                }
                true
            }
            other => return Err(RenderError::MalformedTopology(other)),
        };
        Ok(Self { indices, strip, offset: 0 })
    }
}

impl Iterator for TriangleAssembler<'_> {
    type Item = [u32; 3];

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.offset;
        if i + 2 >= self.indices.len() {
            return None;
        }
        let tri = [self.indices[i], self.indices[i + 1], self.indices[i + 2]];
        if self.strip {
            self.offset += 1;
            if i & 1 == 1 {
                return Some([tri[0], tri[2], tri[1]]);
            }
        } else {
            self.offset += 3;
        }
        Some(tri)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.indices.len().saturating_sub(self.offset);
        let n = if remaining < 3 {
            0
        } else if self.strip {
            remaining - 2
        } else {
            remaining / 3
        };
        (n, Some(n))
    }
}
