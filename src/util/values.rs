//! Text-to-value conversion for element payloads.
//!
//! COLLADA stores numbers as whitespace-separated lists inside element text.
//! Math types come from `glam`.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

use std::str::FromStr;

use super::{Error, Result};

/// Parse a single value, reporting the owning element on failure.
pub fn parse_value<T: FromStr>(element: &str, text: &str) -> Result<T> {
    let text = text.trim();
    text.parse::<T>().map_err(|_| Error::invalid(element, text))
}

/// Parse a whitespace-separated list of values.
pub fn parse_list<T: FromStr>(element: &str, text: &str) -> Result<Vec<T>> {
    text.split_ascii_whitespace()
        .map(|tok| tok.parse::<T>().map_err(|_| Error::invalid(element, tok)))
        .collect()
}

/// Parse an `xs:boolean` list ("true"/"false"/"1"/"0").
pub fn parse_bools(element: &str, text: &str) -> Result<Vec<bool>> {
    text.split_ascii_whitespace()
        .map(|tok| match tok {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(Error::invalid(element, tok)),
        })
        .collect()
}

/// Decode hex-encoded binary data, ignoring whitespace.
pub fn parse_hex(element: &str, text: &str) -> Result<Vec<u8>> {
    let digits: String = text.split_ascii_whitespace().collect();
    hex::decode(&digits).map_err(|e| Error::invalid(element, e.to_string()))
}

/// Build an RGBA color from 3 or 4 components; alpha defaults to 1.
pub fn color_from_slice(element: &str, values: &[f32]) -> Result<Vec4> {
    match *values {
        [r, g, b] => Ok(Vec4::new(r, g, b, 1.0)),
        [r, g, b, a] => Ok(Vec4::new(r, g, b, a)),
        _ => Err(Error::invalid(
            element,
            format!("expected 3 or 4 color components, got {}", values.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let v: Vec<f32> = parse_list("float_array", " 1 2.5\n-3e2\t").unwrap();
        assert_eq!(v, vec![1.0, 2.5, -300.0]);

        let empty: Vec<i32> = parse_list("int_array", "   ").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_list_invalid() {
        let err = parse_list::<f32>("float_array", "1 two 3").unwrap_err();
        match err {
            Error::InvalidValue { element, value } => {
                assert_eq!(element, "float_array");
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_bools() {
        assert_eq!(parse_bools("bool_array", "true 0 1 false").unwrap(), vec![true, false, true, false]);
        assert!(parse_bools("bool_array", "yes").is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("data", "00ff 1A\n2b").unwrap(), vec![0x00, 0xff, 0x1a, 0x2b]);
        assert!(parse_hex("data", "abc").is_err());
        assert!(parse_hex("data", "zz").is_err());
        assert!(parse_hex("data", "  \n").unwrap().is_empty());
    }

    #[test]
    fn test_color_from_slice() {
        assert_eq!(color_from_slice("color", &[0.5, 0.25, 1.0]).unwrap(), Vec4::new(0.5, 0.25, 1.0, 1.0));
        assert_eq!(color_from_slice("color", &[0.0, 0.0, 0.0, 0.5]).unwrap().w, 0.5);
        assert!(color_from_slice("color", &[1.0]).is_err());
    }
}
