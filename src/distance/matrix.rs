//! Dense integer travel matrices.

use serde::{Deserialize, Serialize};

/// A dense n×n integer matrix stored in row-major order.
///
/// Values are engine units (seconds, meters, ...), indexed by matrix
/// location.
///
/// # Examples
///
/// ```
/// use u_vrptw::distance::TravelMatrix;
///
/// let tm = TravelMatrix::from_rows(vec![vec![0, 5], vec![7, 0]]).unwrap();
/// assert_eq!(tm.get(0, 1), 5);
/// assert_eq!(tm.get(1, 0), 7);
/// assert_eq!(tm.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelMatrix {
    data: Vec<i64>,
    size: usize,
}

impl TravelMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit flat n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from square rows.
    ///
    /// Returns `None` if any row length differs from the number of rows.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Returns the value from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the value from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, value: i64) {
        self.data[from * self.size + to] = value;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Largest entry, zero for an empty matrix.
    pub fn max_value(&self) -> i64 {
        self.data.iter().copied().max().unwrap_or(0).max(0)
    }
}

/// Time and distance matrices of one vehicle profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelMatrices {
    time: TravelMatrix,
    distance: TravelMatrix,
}

impl TravelMatrices {
    /// Pairs a time and a distance matrix.
    pub fn new(time: TravelMatrix, distance: TravelMatrix) -> Self {
        Self { time, distance }
    }

    /// Uses the same matrix for time and distance.
    pub fn uniform(matrix: TravelMatrix) -> Self {
        Self {
            time: matrix.clone(),
            distance: matrix,
        }
    }

    /// Travel time between two locations.
    pub fn time(&self, from: usize, to: usize) -> i64 {
        self.time.get(from, to)
    }

    /// Travel distance between two locations.
    pub fn distance(&self, from: usize, to: usize) -> i64 {
        self.distance.get(from, to)
    }

    /// Number of locations covered.
    pub fn size(&self) -> usize {
        self.time.size()
    }

    /// Largest travel time.
    pub fn max_time(&self) -> i64 {
        self.time.max_value()
    }

    /// Largest travel distance.
    pub fn max_distance(&self) -> i64 {
        self.distance.max_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data() {
        let tm = TravelMatrix::from_data(2, vec![0, 5, 5, 0]).expect("valid");
        assert_eq!(tm.get(0, 1), 5);
        assert_eq!(tm.get(1, 0), 5);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(TravelMatrix::from_data(2, vec![0, 1, 2]).is_none());
    }

    #[test]
    fn test_from_rows_ragged() {
        assert!(TravelMatrix::from_rows(vec![vec![0, 1], vec![1]]).is_none());
    }

    #[test]
    fn test_set_get() {
        let mut tm = TravelMatrix::new(3);
        tm.set(0, 1, 42);
        assert_eq!(tm.get(0, 1), 42);
        assert_eq!(tm.get(1, 0), 0);
        assert_eq!(tm.max_value(), 42);
    }

    #[test]
    fn test_profile_accessors() {
        let time = TravelMatrix::from_rows(vec![vec![0, 3], vec![4, 0]]).expect("valid");
        let distance = TravelMatrix::from_rows(vec![vec![0, 30], vec![40, 0]]).expect("valid");
        let profile = TravelMatrices::new(time, distance);
        assert_eq!(profile.time(0, 1), 3);
        assert_eq!(profile.distance(1, 0), 40);
        assert_eq!(profile.max_time(), 4);
        assert_eq!(profile.max_distance(), 40);
        assert_eq!(profile.size(), 2);
    }
}
