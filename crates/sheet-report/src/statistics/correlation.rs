//! Pearson correlation over numeric columns.

use serde::{Deserialize, Serialize};

/// Square correlation matrix; `values[i][j]` pairs `columns[i]` with `columns[j]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Build the matrix from named columns of equal length.
    pub fn from_columns(columns: &[(String, Vec<Option<f64>>)]) -> Self {
        let names = columns.iter().map(|(name, _)| name.clone()).collect();
        let values = columns
            .iter()
            .map(|(_, x)| columns.iter().map(|(_, y)| pearson(x, y)).collect())
            .collect();
        Self {
            columns: names,
            values,
        }
    }

    /// Whether the matrix covers no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient for a pair of columns, if both exist and it is defined.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Pearson coefficient over pairwise-complete observations.
///
/// Undefined (`None`) when fewer than two pairs remain or either side has
/// zero variance.
pub(crate) fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_perfect_positive_and_negative() {
        let x = col(&[1.0, 2.0, 3.0, 4.0]);
        let y = col(&[2.0, 4.0, 6.0, 8.0]);
        let z = col(&[4.0, 3.0, 2.0, 1.0]);
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_observations() {
        let x = vec![Some(1.0), Some(2.0), None, Some(4.0)];
        let y = vec![Some(1.0), Some(2.0), Some(100.0), Some(4.0)];
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_undefined() {
        let x = col(&[1.0, 2.0, 3.0]);
        let y = col(&[5.0, 5.0, 5.0]);
        assert_eq!(pearson(&x, &y), None);
        assert_eq!(pearson(&y, &y), None);
    }

    #[test]
    fn test_matrix_shape_and_lookup() {
        let matrix = CorrelationMatrix::from_columns(&[
            ("a".to_string(), col(&[1.0, 2.0, 3.0])),
            ("b".to_string(), col(&[3.0, 1.0, 2.0])),
        ]);

        assert_eq!(matrix.columns, vec!["a", "b"]);
        assert_eq!(matrix.values.len(), 2);
        assert!((matrix.get("a", "a").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix.get("a", "b"), matrix.get("b", "a"));
        assert_eq!(matrix.get("a", "missing"), None);
    }
}
