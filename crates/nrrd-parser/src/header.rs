//! Typed decoding of the ASCII NRRD header.

use std::collections::HashMap;

use mesh_common::Vec3;

use crate::NrrdError;

/// Byte order of multi-byte scalars in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Scalar types we know how to read from the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Int8,
    Int16,
    Int32,
    Float,
    Double,
}

impl ScalarType {
    /// Size of one scalar in bytes.
    pub fn byte_length(self) -> usize {
        match self {
            ScalarType::Int8 => 1,
            ScalarType::Int16 => 2,
            ScalarType::Int32 => 4,
            ScalarType::Float => 4,
            ScalarType::Double => 8,
        }
    }

    fn from_field(value: &str) -> Result<Self, NrrdError> {
        match value {
            "int8" | "int8_t" | "signed char" => Ok(ScalarType::Int8),
            "int16" | "int16_t" | "short" | "short int" | "signed short"
            | "signed short int" => Ok(ScalarType::Int16),
            "int32" | "int32_t" | "int" | "signed int" => Ok(ScalarType::Int32),
            "float" => Ok(ScalarType::Float),
            "double" => Ok(ScalarType::Double),
            other => Err(NrrdError::UnsupportedType(other.to_string())),
        }
    }
}

/// Per-dimension sample counts: one vector value plus three spatial axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sizes {
    /// Components per voxel (e.g. 3 for a vector field).
    pub value: usize,
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

/// The three axes spanning one voxel in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceAxes {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

/// Decoded NRRD header.
///
/// Created once per parse from the header text and immutable afterwards.
/// The raw `key: value` map stays available through [`VolumeHeader::field`]
/// for fields without a typed accessor.
#[derive(Debug, Clone)]
pub struct VolumeHeader {
    /// Total dimension count; must be 4 (one value axis plus 3 space axes).
    pub dimension: usize,
    /// Body encoding, e.g. "gzip".
    pub encoding: String,
    /// Byte order for multi-byte scalar types.
    pub endian: Endianness,
    pub sizes: Sizes,
    /// Spatial dimension count; must be 3.
    pub space_dimension: usize,
    /// World-space position of the bounding-box corner.
    pub space_origin: Vec3,
    pub space_axes: SpaceAxes,
    pub scalar_type: ScalarType,
    fields: HashMap<String, String>,
}

impl VolumeHeader {
    /// Parse the ASCII header text.
    pub fn parse(text: &str) -> Result<Self, NrrdError> {
        let mut lines = text
            .trim()
            .split(['\r', '\n'])
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let magic = lines.next().unwrap_or_default();
        if !is_magic(magic) {
            return Err(NrrdError::InvalidHeader(format!(
                "wrong magic number: {magic:?}"
            )));
        }

        let mut fields = HashMap::new();
        for line in lines {
            if let Some(colon) = line.find(':') {
                let name = &line[..colon];
                let value = line[colon + 1..].trim();
                fields.insert(name.to_string(), value.to_string());
            }
        }

        let dimension = parse_usize(read_field(&fields, "dimension")?)?;
        let encoding = read_field(&fields, "encoding")?.to_string();
        let endian = match fields.get("endian").map(String::as_str) {
            Some("little") => Endianness::Little,
            _ => Endianness::Big,
        };
        let sizes = parse_sizes(read_field(&fields, "sizes")?)?;
        let space_dimension = parse_usize(read_field(&fields, "space dimension")?)?;
        let space_origin = parse_vector3(read_field(&fields, "space origin")?)?;
        let space_axes = parse_space_axes(read_field(&fields, "space directions")?)?;
        let scalar_type = ScalarType::from_field(read_field(&fields, "type")?)?;

        if dimension != 4 {
            return Err(NrrdError::InvalidHeader(format!(
                "expected 4 dimensions, the file has {dimension}"
            )));
        }
        if space_dimension != 3 {
            return Err(NrrdError::InvalidHeader(format!(
                "expected a 3D space, the file is defined in {space_dimension}D"
            )));
        }

        Ok(Self {
            dimension,
            encoding,
            endian,
            sizes,
            space_dimension,
            space_origin,
            space_axes,
            scalar_type,
            fields,
        })
    }

    /// Raw text value of a header field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Magic line: "NRRD" followed by exactly four digits.
fn is_magic(line: &str) -> bool {
    line.len() == 8
        && line.starts_with("NRRD")
        && line[4..].bytes().all(|b| b.is_ascii_digit())
}

fn read_field<'a>(
    fields: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, NrrdError> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or(NrrdError::MissingField(name))
}

fn parse_usize(text: &str) -> Result<usize, NrrdError> {
    text.parse()
        .map_err(|_| NrrdError::InvalidHeader(format!("expected an integer, got {text:?}")))
}

fn parse_f32(text: &str) -> Result<f32, NrrdError> {
    text.trim()
        .parse()
        .map_err(|_| NrrdError::InvalidHeader(format!("expected a number, got {text:?}")))
}

fn parse_sizes(text: &str) -> Result<Sizes, NrrdError> {
    let values: Vec<usize> = text
        .split_whitespace()
        .map(parse_usize)
        .collect::<Result<_, _>>()?;
    match values[..] {
        [value, x, y, z] => Ok(Sizes { value, x, y, z }),
        _ => Err(NrrdError::InvalidHeader(format!(
            "field \"sizes\" must have 4 elements, not {}",
            values.len()
        ))),
    }
}

/// Parse a single "(x, y, z)" vector.
fn parse_vector3(text: &str) -> Result<Vec3, NrrdError> {
    let text = text.trim();
    let inner = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| NrrdError::InvalidHeader(format!("wrong vector format: {text:?}")))?;
    let elements: Vec<f32> = inner
        .split(',')
        .map(parse_f32)
        .collect::<Result<_, _>>()?;
    match elements[..] {
        [x, y, z] => Ok([x, y, z]),
        _ => Err(NrrdError::InvalidHeader(format!(
            "vectors must have 3 components: {text:?}"
        ))),
    }
}

/// Parse the "space directions" field: an optional non-vector prefix (the
/// value axis is usually "none") followed by three parenthesized vectors.
fn parse_space_axes(text: &str) -> Result<SpaceAxes, NrrdError> {
    let mut vectors = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        let close = rest[open..].find(')').ok_or_else(|| {
            NrrdError::InvalidHeader(format!("unclosed vector in \"space directions\": {text:?}"))
        })?;
        vectors.push(parse_vector3(&rest[open..open + close + 1])?);
        rest = &rest[open + close + 1..];
    }
    match vectors[..] {
        [x, y, z] => Ok(SpaceAxes { x, y, z }),
        _ => Err(NrrdError::InvalidHeader(format!(
            "field \"space directions\" must hold 3 vectors, got {}",
            vectors.len()
        ))),
    }
}
