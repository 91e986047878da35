//! Simplify command - Douglas-Peucker over a JSON coordinate array

use super::read_json;
use anyhow::Result;
use routemap_geo::simplify;
use std::path::Path;

/// Run simplify command, printing the simplified array as JSON
pub fn run(input: &Path, tolerance: f64) -> Result<()> {
    let coordinates: Vec<[f64; 2]> = read_json(input)?;
    let simplified = simplify(&coordinates, tolerance)?;

    tracing::info!(
        input = coordinates.len(),
        output = simplified.len(),
        tolerance,
        "Simplified coordinates"
    );

    println!("{}", serde_json::to_string(&simplified)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_rejects_zero_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("coords.json");
        std::fs::write(&input, "[[53.72, -1.86], [53.73, -1.85], [53.74, -1.86]]").unwrap();

        assert!(run(&input, 0.0002).is_ok());
        assert!(run(&input, 0.0).is_err());
    }

    #[test]
    fn test_run_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("coords.json");
        std::fs::write(&input, r#"{"not": "an array"}"#).unwrap();

        assert!(run(&input, 0.0002).is_err());
    }
}
