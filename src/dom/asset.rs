//! Asset metadata (`<asset>`), found on the document and on libraries.

/// Document authoring information.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Asset {
    pub contributors: Vec<Contributor>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub keywords: Option<String>,
    pub revision: Option<String>,
    pub subject: Option<String>,
    pub title: Option<String>,
    pub unit: Unit,
    pub up_axis: UpAxis,
}

/// One `<contributor>` entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contributor {
    pub author: Option<String>,
    pub authoring_tool: Option<String>,
    pub comments: Option<String>,
    pub copyright: Option<String>,
    pub source_data: Option<String>,
}

/// Distance unit (`<unit name="centimeter" meter="0.01"/>`).
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub name: String,
    /// Length of one unit in meters.
    pub meter: f64,
}

impl Default for Unit {
    fn default() -> Self {
        Self {
            name: "meter".to_string(),
            meter: 1.0,
        }
    }
}

/// Up direction of the document's coordinate system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpAxis {
    X,
    #[default]
    Y,
    Z,
}

impl UpAxis {
    /// Parse `X_UP` / `Y_UP` / `Z_UP`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "X_UP" => Some(Self::X),
            "Y_UP" => Some(Self::Y),
            "Z_UP" => Some(Self::Z),
            _ => None,
        }
    }

    /// Element text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "X_UP",
            Self::Y => "Y_UP",
            Self::Z => "Z_UP",
        }
    }
}
