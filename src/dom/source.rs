//! Data sources (`<source>`) and the inputs that point at them.

use glam::{Mat4, Vec3};

use super::Reference;

/// Decoded `<source>`: a typed array plus an accessor describing how to
/// read it as a sequence of elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Source {
    pub id: String,
    pub name: Option<String>,
    pub array: Option<ArrayData>,
    /// Accessor from `<technique_common>`.
    pub accessor: Option<Accessor>,
}

impl Source {
    /// Float values, if the source holds a `float_array`.
    pub fn floats(&self) -> Option<&[f32]> {
        match &self.array.as_ref()?.values {
            ArrayValues::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Name values, if the source holds a `Name_array` or `IDREF_array`.
    pub fn names(&self) -> Option<&[String]> {
        match &self.array.as_ref()?.values {
            ArrayValues::Name(v) | ArrayValues::IdRef(v) => Some(v),
            _ => None,
        }
    }

    /// Float values as raw bytes, ready for a GPU buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        self.floats().map(bytemuck::cast_slice::<f32, u8>).unwrap_or(&[])
    }

    /// Number of accessor elements (or raw values without an accessor).
    pub fn element_count(&self) -> usize {
        match (&self.accessor, &self.array) {
            (Some(acc), _) => acc.count,
            (None, Some(array)) => array.values.len(),
            (None, None) => 0,
        }
    }

    /// Read every accessor element of a float source.
    pub fn float_elements(&self) -> Vec<&[f32]> {
        match (self.floats(), &self.accessor) {
            (Some(values), Some(acc)) => acc.elements(values).collect(),
            (Some(values), None) => values.chunks(1).collect(),
            _ => Vec::new(),
        }
    }

    /// Elements as `Vec3`; elements with fewer than 3 values are skipped.
    pub fn vec3s(&self) -> Vec<Vec3> {
        self.float_elements()
            .into_iter()
            .filter(|e| e.len() >= 3)
            .map(|e| Vec3::new(e[0], e[1], e[2]))
            .collect()
    }

    /// Elements as 4x4 matrices (stored row-major in the document).
    pub fn mat4s(&self) -> Vec<Mat4> {
        self.float_elements()
            .into_iter()
            .filter(|e| e.len() >= 16)
            .map(|e| Mat4::from_cols_slice(&e[..16]).transpose())
            .collect()
    }
}

/// A typed data array (`float_array`, `Name_array`, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayData {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Declared value count.
    pub count: usize,
    pub values: ArrayValues,
}

/// Values of a data array.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayValues {
    Float(Vec<f32>),
    Int(Vec<i32>),
    Bool(Vec<bool>),
    Name(Vec<String>),
    IdRef(Vec<String>),
}

impl ArrayValues {
    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Name(v) | Self::IdRef(v) => v.len(),
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element name of the array kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Float(_) => "float_array",
            Self::Int(_) => "int_array",
            Self::Bool(_) => "bool_array",
            Self::Name(_) => "Name_array",
            Self::IdRef(_) => "IDREF_array",
        }
    }
}

/// `<accessor>`: how to step through an array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accessor {
    /// The array being accessed.
    pub source: Reference,
    /// Number of elements.
    pub count: usize,
    /// Index of the first value.
    pub offset: usize,
    /// Values per element.
    pub stride: usize,
    pub params: Vec<Param>,
}

impl Default for Accessor {
    fn default() -> Self {
        Self {
            source: Reference::default(),
            count: 0,
            offset: 0,
            stride: 1,
            params: Vec::new(),
        }
    }
}

impl Accessor {
    /// Slice `values` into `count` elements of `stride` values each.
    /// Elements running past the end of `values`, or past `usize::MAX`,
    /// are dropped.
    pub fn elements<'a, T>(&self, values: &'a [T]) -> impl Iterator<Item = &'a [T]> + 'a {
        let (offset, stride) = (self.offset, self.stride.max(1));
        (0..self.count).map_while(move |i| {
            let start = i.checked_mul(stride)?.checked_add(offset)?;
            values.get(start..start.checked_add(stride)?)
        })
    }
}

/// `<param>` of an accessor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Param {
    pub name: Option<String>,
    pub sid: Option<String>,
    /// Value type (`float`, `float4x4`, `Name`, ...).
    pub kind: String,
    pub semantic: Option<String>,
}

/// `<input>`: a semantic bound to a source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Input {
    /// Meaning of the data (`INPUT`, `OUTPUT`, `INTERPOLATION`, ...).
    pub semantic: String,
    pub source: Reference,
    pub offset: u32,
    pub set: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_source(values: Vec<f32>, count: usize, stride: usize) -> Source {
        Source {
            id: "src".into(),
            array: Some(ArrayData {
                id: Some("src-array".into()),
                name: None,
                count: values.len(),
                values: ArrayValues::Float(values),
            }),
            accessor: Some(Accessor {
                source: Reference::new("#src-array"),
                count,
                stride,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_accessor_elements() {
        let src = float_source(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(src.vec3s(), vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
        assert_eq!(src.element_count(), 2);
    }

    #[test]
    fn test_accessor_truncated_data() {
        // Declares 3 elements but only holds 2
        let src = float_source(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 3);
        assert_eq!(src.float_elements().len(), 2);
    }

    #[test]
    fn test_accessor_offset_past_usize() {
        let mut src = float_source(vec![1.0, 2.0, 3.0], 2, 3);
        if let Some(acc) = src.accessor.as_mut() {
            acc.offset = usize::MAX - 1;
        }
        assert!(src.vec3s().is_empty());

        let huge_stride = Accessor {
            count: 3,
            stride: usize::MAX / 2 + 1,
            ..Default::default()
        };
        assert_eq!(huge_stride.elements(&[0.0f32; 4]).count(), 0);
    }

    #[test]
    fn test_mat4_row_major() {
        let mut values = vec![0.0; 16];
        values[0] = 1.0;
        values[5] = 1.0;
        values[10] = 1.0;
        values[15] = 1.0;
        values[3] = 7.0; // translation x in row-major layout
        let src = float_source(values, 1, 16);
        let m = src.mat4s()[0];
        assert_eq!(m.w_axis.x, 7.0);
    }

    #[test]
    fn test_as_bytes() {
        let src = float_source(vec![1.0, 2.0], 2, 1);
        assert_eq!(src.as_bytes().len(), 8);
        assert_eq!(Source::default().as_bytes().len(), 0);
    }
}
