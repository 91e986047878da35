//! Ordnance Survey National Grid references.
//!
//! A reference such as `"SE 119 157"` is two letters naming a 100 km
//! square followed by an even number of digits, split evenly between
//! easting and northing. The first letter picks a 500 km square, the
//! second a 100 km square inside it.

use crate::{EastingNorthing, GeoError, Result};
use std::fmt;
use std::str::FromStr;

/// 500 km square origins keyed by the first letter.
pub const FALSE_ORIGIN_SQUARES: [(char, f64, f64); 5] = [
    ('S', 0.0, 0.0),
    ('T', 500_000.0, 0.0),
    ('N', 0.0, 500_000.0),
    ('O', 500_000.0, 500_000.0),
    ('H', 0.0, 1_000_000.0),
];

/// 100 km squares within a 500 km square, bottom row first (`I` omitted).
///
/// Index `i` sits at column `i % 5`, row `i / 5`.
pub const SECOND_LETTERS: &str = "VWXYZQRSTULMNOPFGHJKABCDE";

/// Side of a 100 km square in meters.
const SQUARE_SIZE_M: f64 = 100_000.0;

/// Longest accepted digit string (1 m resolution).
pub const MAX_DIGITS: usize = 10;

/// A parsed grid reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridReference {
    square: [char; 2],
    digits: String,
}

impl GridReference {
    /// Parse a grid reference, ignoring case.
    ///
    /// The digits may be written as one run (`"SE119157"`) or as an easting
    /// group and a northing group (`"SE 119 157"`). Two groups must have the
    /// same length; three or more groups are rejected.
    pub fn parse(reference: &str) -> Result<Self> {
        let normalized = reference.trim().to_ascii_uppercase();

        let mut chars = normalized.chars();
        let (first, second) = match (chars.next(), chars.next()) {
            (Some(a), Some(b)) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => (a, b),
            _ => {
                return Err(GeoError::MalformedGridReference(format!(
                    "expected two grid square letters in {reference:?}"
                )))
            }
        };

        square_origin(first)?;
        square_offset(second)?;

        let groups: Vec<&str> = chars.as_str().split_whitespace().collect();
        if groups.iter().any(|g| !g.chars().all(|c| c.is_ascii_digit())) {
            return Err(GeoError::MalformedGridReference(format!(
                "non-numeric digits in {reference:?}"
            )));
        }

        let digits = match groups.as_slice() {
            [] => String::new(),
            [run] => run.to_string(),
            [easting, northing] if easting.len() == northing.len() => format!("{easting}{northing}"),
            [easting, northing] => {
                return Err(GeoError::MalformedGridReference(format!(
                    "easting and northing lengths differ ({} vs {}) in {reference:?}",
                    easting.len(),
                    northing.len()
                )))
            }
            _ => {
                return Err(GeoError::MalformedGridReference(format!(
                    "expected at most two digit groups in {reference:?}"
                )))
            }
        };

        if digits.len() % 2 != 0 {
            return Err(GeoError::MalformedGridReference(format!(
                "odd digit count ({}) in {reference:?}",
                digits.len()
            )));
        }
        if digits.len() < 2 || digits.len() > MAX_DIGITS {
            return Err(GeoError::MalformedGridReference(format!(
                "digit count {} outside 2..={MAX_DIGITS} in {reference:?}",
                digits.len()
            )));
        }

        Ok(Self {
            square: [first, second],
            digits,
        })
    }

    /// The two square letters, e.g. `"SE"`.
    pub fn square(&self) -> String {
        self.square.iter().collect()
    }

    /// Resolution of the reference in meters (100 for six digits).
    pub fn precision_m(&self) -> f64 {
        10f64.powi(5 - self.half_len() as i32)
    }

    /// South-west corner of the referenced cell.
    pub fn to_easting_northing(&self) -> Result<EastingNorthing> {
        let (e0, n0) = square_origin(self.square[0])?;
        let (de, dn) = square_offset(self.square[1])?;

        let (e_digits, n_digits) = self.digits.split_at(self.half_len());
        let scale = self.precision_m();

        Ok(EastingNorthing::new(
            e0 + de + parse_digits(e_digits)? * scale,
            n0 + dn + parse_digits(n_digits)? * scale,
        ))
    }

    fn half_len(&self) -> usize {
        self.digits.len() / 2
    }
}

impl FromStr for GridReference {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for GridReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (e, n) = self.digits.split_at(self.half_len());
        write!(f, "{}{} {} {}", self.square[0], self.square[1], e, n)
    }
}

/// Decode a grid reference string into easting/northing in meters.
///
/// # Example
/// ```
/// use routemap_geo::decode;
///
/// let en = decode("SE 119 157").unwrap();
/// assert_eq!((en.easting, en.northing), (411_900.0, 415_700.0));
/// ```
pub fn decode(reference: &str) -> Result<EastingNorthing> {
    GridReference::parse(reference)?.to_easting_northing()
}

fn square_origin(letter: char) -> Result<(f64, f64)> {
    FALSE_ORIGIN_SQUARES
        .iter()
        .find(|(l, _, _)| *l == letter)
        .map(|&(_, e, n)| (e, n))
        .ok_or(GeoError::UnknownGridSquare(letter))
}

fn square_offset(letter: char) -> Result<(f64, f64)> {
    let index = SECOND_LETTERS
        .find(letter)
        .ok_or(GeoError::UnknownGridSquare(letter))?;
    let column = (index % 5) as f64;
    let row = (index / 5) as f64;
    Ok((column * SQUARE_SIZE_M, row * SQUARE_SIZE_M))
}

fn parse_digits(digits: &str) -> Result<f64> {
    digits
        .parse::<u32>()
        .map(f64::from)
        .map_err(|e| GeoError::MalformedGridReference(format!("{digits:?}: {e}")))
}
