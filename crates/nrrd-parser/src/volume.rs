//! Decompressed volume access and sampling.

use mesh_common::vec3::{add, project, scale, sub};
use mesh_common::{BoundingBox3, Vec3};

use crate::header::{Endianness, ScalarType, VolumeHeader};
use crate::NrrdError;

/// Voxel components below this value mark missing data.
const MISSING_SENTINEL: f32 = -0.9;

/// A decoded volume: typed header plus decompressed payload.
///
/// Owned exclusively by the caller that requested the parse. Voxels are
/// vector-valued; the first component doubles as the missing-data marker
/// (anything below `-0.9` means the voxel holds no sample).
#[derive(Debug)]
pub struct Volume {
    pub header: VolumeHeader,
    data: Vec<u8>,
    scalar_length: usize,
}

impl Volume {
    /// Wrap a decompressed payload, validating it against the header.
    pub fn new(header: VolumeHeader, data: Vec<u8>) -> Result<Self, NrrdError> {
        let sizes = header.sizes;
        if sizes.value < 3 {
            return Err(NrrdError::InvalidHeader(format!(
                "voxels must hold at least 3 components, header declares {}",
                sizes.value
            )));
        }
        let scalar_length = header.scalar_type.byte_length();
        let expected = scalar_length * sizes.value * sizes.x * sizes.y * sizes.z;
        if data.len() < expected {
            return Err(NrrdError::TruncatedBody {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            header,
            data,
            scalar_length,
        })
    }

    /// Raw decompressed payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// World-space bounding box spanned by the origin and the scaled axes.
    pub fn bounds(&self) -> BoundingBox3 {
        let header = &self.header;
        let ax = scale(header.space_axes.x, header.sizes.x as f32);
        let ay = scale(header.space_axes.y, header.sizes.y as f32);
        let az = scale(header.space_axes.z, header.sizes.z as f32);
        let origin = header.space_origin;
        let mut bounds = BoundingBox3::new(origin, origin);
        bounds.expand(add(origin, ax));
        bounds.expand(add(origin, ay));
        bounds.expand(add(origin, az));
        bounds.expand(add(add(origin, ax), add(ay, az)));
        bounds
    }

    /// Sample the volume at a world-space point.
    ///
    /// The point is mapped through the origin and axes into voxel space and
    /// the 8 surrounding voxels are blended with trilinear weights; missing
    /// or out-of-grid neighbors drop out of the blend. Returns the
    /// `[-1, -1, -1]` sentinel when the containing voxel itself has no
    /// sample, and an error when the point lies outside the volume.
    pub fn sample(&self, point: Vec3) -> Result<Vec3, NrrdError> {
        let header = &self.header;
        let vector = sub(point, header.space_origin);
        let axes = header.space_axes;
        let sizes = header.sizes;

        let x = project(vector, axes.x);
        let y = project(vector, axes.y);
        let z = project(vector, axes.z);
        if x < 0.0
            || x >= sizes.x as f32
            || y < 0.0
            || y >= sizes.y as f32
            || z < 0.0
            || z >= sizes.z as f32
        {
            return Err(NrrdError::OutOfVolume(point[0], point[1], point[2]));
        }
        let x_int = x.floor() as i64;
        let y_int = y.floor() as i64;
        let z_int = z.floor() as i64;

        let Some(center) = self.voxel(x_int, y_int, z_int) else {
            return Ok([-1.0, -1.0, -1.0]);
        };

        let xx = x - x_int as f32 - 0.5;
        let x_shift = if xx < 0.0 { -1 } else { 1 };
        let x_weight = 1.0 - xx.abs();
        let yy = y - y_int as f32 - 0.5;
        let y_shift = if yy < 0.0 { -1 } else { 1 };
        let y_weight = 1.0 - yy.abs();
        let zz = z - z_int as f32 - 0.5;
        let z_shift = if zz < 0.0 { -1 } else { 1 };
        let z_weight = 1.0 - zz.abs();

        let neighbor = |dx: i64, dy: i64, dz: i64| {
            self.voxel(x_int + x_shift * dx, y_int + y_shift * dy, z_int + z_shift * dz)
        };

        let blended = average2(
            average2(
                average2(Some(center), neighbor(1, 0, 0), x_weight),
                average2(neighbor(0, 1, 0), neighbor(1, 1, 0), x_weight),
                y_weight,
            ),
            average2(
                average2(neighbor(0, 0, 1), neighbor(1, 0, 1), x_weight),
                average2(neighbor(0, 1, 1), neighbor(1, 1, 1), x_weight),
                y_weight,
            ),
            z_weight,
        );
        Ok(blended.unwrap_or([-1.0, -1.0, -1.0]))
    }

    /// Read the vector at integer voxel coordinates.
    ///
    /// Returns `None` for coordinates outside the grid and for voxels whose
    /// first component carries the missing-data sentinel.
    pub fn voxel(&self, x: i64, y: i64, z: i64) -> Option<Vec3> {
        let sizes = self.header.sizes;
        if x < 0
            || y < 0
            || z < 0
            || x >= sizes.x as i64
            || y >= sizes.y as i64
            || z >= sizes.z as i64
        {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        let index = self.scalar_length * sizes.value * (x + sizes.x * (y + sizes.y * z));
        let first = self.read_scalar(index);
        if first < MISSING_SENTINEL {
            return None;
        }
        Some([
            first,
            self.read_scalar(index + self.scalar_length),
            self.read_scalar(index + 2 * self.scalar_length),
        ])
    }

    // Callers stay in bounds: the payload length was validated against the
    // header extent at construction.
    fn read_scalar(&self, offset: usize) -> f32 {
        let bytes = &self.data[offset..offset + self.scalar_length];
        match (self.header.scalar_type, self.header.endian) {
            (ScalarType::Int8, _) => bytes[0] as i8 as f32,
            (ScalarType::Int16, Endianness::Little) => {
                i16::from_le_bytes([bytes[0], bytes[1]]) as f32
            }
            (ScalarType::Int16, Endianness::Big) => {
                i16::from_be_bytes([bytes[0], bytes[1]]) as f32
            }
            (ScalarType::Int32, Endianness::Little) => {
                i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f32
            }
            (ScalarType::Int32, Endianness::Big) => {
                i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f32
            }
            (ScalarType::Float, Endianness::Little) => {
                f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
            }
            (ScalarType::Float, Endianness::Big) => {
                f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
            }
            (ScalarType::Double, Endianness::Little) => {
                f64::from_le_bytes(bytes.try_into().unwrap_or([0; 8])) as f32
            }
            (ScalarType::Double, Endianness::Big) => {
                f64::from_be_bytes(bytes.try_into().unwrap_or([0; 8])) as f32
            }
        }
    }
}

/// Blend two optional samples; a missing side yields the other unchanged.
fn average2(v0: Option<Vec3>, v1: Option<Vec3>, weight: f32) -> Option<Vec3> {
    match (v0, v1) {
        (None, v1) => v1,
        (v0, None) => v0,
        (Some(v0), Some(v1)) => Some(add(scale(v0, weight), scale(v1, 1.0 - weight))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::VolumeHeader;

    fn test_header(sizes: &str) -> VolumeHeader {
        let text = format!(
            "NRRD0004\n\
             type: float\n\
             dimension: 4\n\
             space dimension: 3\n\
             sizes: {sizes}\n\
             endian: little\n\
             encoding: gzip\n\
             space origin: (0, 0, 0)\n\
             space directions: none (1, 0, 0) (0, 1, 0) (0, 0, 1)\n"
        );
        VolumeHeader::parse(&text).unwrap()
    }

    /// Payload where every voxel holds (x, y, z) as little-endian f32.
    fn coordinate_payload(sx: usize, sy: usize, sz: usize) -> Vec<u8> {
        let mut data = Vec::new();
        for z in 0..sz {
            for y in 0..sy {
                for x in 0..sx {
                    for component in [x as f32, y as f32, z as f32] {
                        data.extend_from_slice(&component.to_le_bytes());
                    }
                }
            }
        }
        data
    }

    #[test]
    fn test_truncated_body_rejected() {
        let header = test_header("3 2 2 2");
        let result = Volume::new(header, vec![0; 10]);
        assert!(matches!(result, Err(NrrdError::TruncatedBody { .. })));
    }

    #[test]
    fn test_voxel_values_and_grid_bounds() {
        let header = test_header("3 2 2 2");
        let volume = Volume::new(header, coordinate_payload(2, 2, 2)).unwrap();
        assert_eq!(volume.voxel(0, 0, 0), Some([0.0, 0.0, 0.0]));
        assert_eq!(volume.voxel(1, 0, 1), Some([1.0, 0.0, 1.0]));
        assert_eq!(volume.voxel(-1, 0, 0), None);
        assert_eq!(volume.voxel(2, 0, 0), None);
    }

    #[test]
    fn test_sample_at_voxel_center() {
        let header = test_header("3 4 4 4");
        let volume = Volume::new(header, coordinate_payload(4, 4, 4)).unwrap();
        // Voxel centers sit at half-integer world coordinates, where all
        // blend weights collapse onto the containing voxel.
        let sample = volume.sample([1.5, 2.5, 0.5]).unwrap();
        assert_eq!(sample, [1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_sample_outside_volume() {
        let header = test_header("3 2 2 2");
        let volume = Volume::new(header, coordinate_payload(2, 2, 2)).unwrap();
        assert!(matches!(
            volume.sample([5.0, 0.0, 0.0]),
            Err(NrrdError::OutOfVolume(..))
        ));
        assert!(matches!(
            volume.sample([-0.1, 0.0, 0.0]),
            Err(NrrdError::OutOfVolume(..))
        ));
    }

    #[test]
    fn test_missing_voxel_yields_sentinel() {
        let header = test_header("3 2 2 2");
        let mut payload = coordinate_payload(2, 2, 2);
        // Overwrite voxel (0,0,0)'s first component with a missing marker.
        payload[..4].copy_from_slice(&(-1.0f32).to_le_bytes());
        let volume = Volume::new(header, payload).unwrap();
        assert_eq!(volume.voxel(0, 0, 0), None);
        assert_eq!(volume.sample([0.25, 0.25, 0.25]).unwrap(), [-1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_bounds_span_origin_and_axes() {
        let header = test_header("3 2 2 2");
        let volume = Volume::new(header, coordinate_payload(2, 2, 2)).unwrap();
        let bounds = volume.bounds();
        assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [2.0, 2.0, 2.0]);
    }
}
