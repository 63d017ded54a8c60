//! Exact brute-force vector index.
//!
//! Rows are kept in insertion order in a dense `rows x dim` matrix. Queries
//! compute squared L2 distance against every row. Callers are expected to
//! store unit-length vectors, which bounds distances to `[0, 4]`.

use docvec_common::{DocvecError, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

const MAGIC: [u8; 8] = *b"DVFLAT01";

/// Flat (exhaustive) squared-L2 index
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dim: usize,
    vectors: Array2<f32>,
}

/// On-disk layout of the index artifact
#[derive(Serialize, Deserialize)]
struct FlatIndexFile {
    magic: [u8; 8],
    dim: u32,
    rows: u64,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Create an empty index for vectors of length `dim`
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Array2::zeros((0, dim)),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored rows
    pub fn size(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Vector stored at `row`
    pub fn row(&self, row: usize) -> Option<ArrayView1<'_, f32>> {
        (row < self.size()).then(|| self.vectors.row(row))
    }

    fn check_dim(&self, len: usize) -> Result<()> {
        if len != self.dim {
            return Err(DocvecError::dimension_mismatch(self.dim, len));
        }
        Ok(())
    }

    /// Append vectors after the last row, preserving their order.
    ///
    /// Every vector is checked before any row is added.
    pub fn append<V: AsRef<[f32]>>(&mut self, vectors: &[V]) -> Result<()> {
        for v in vectors {
            self.check_dim(v.as_ref().len())?;
        }
        for v in vectors {
            self.vectors
                .push_row(ArrayView1::from(v.as_ref()))
                .map_err(|e| DocvecError::internal(format!("Failed to append row: {}", e)))?;
        }
        Ok(())
    }

    /// Overwrite the vector at an existing row
    pub fn replace(&mut self, row: usize, vector: &[f32]) -> Result<()> {
        self.check_dim(vector.len())?;
        if row >= self.size() {
            return Err(DocvecError::internal(format!(
                "Row {} out of range for index of {} rows",
                row,
                self.size()
            )));
        }
        self.vectors.row_mut(row).assign(&ArrayView1::from(vector));
        Ok(())
    }

    /// Replace all contents with `vectors`, in order.
    ///
    /// On error the previous contents are left untouched.
    pub fn rebuild<V: AsRef<[f32]>>(&mut self, vectors: &[V]) -> Result<()> {
        let mut data = Vec::with_capacity(vectors.len() * self.dim);
        for v in vectors {
            let v = v.as_ref();
            self.check_dim(v.len())?;
            data.extend_from_slice(v);
        }
        self.vectors = Array2::from_shape_vec((vectors.len(), self.dim), data)
            .map_err(|e| DocvecError::internal(format!("Failed to rebuild index: {}", e)))?;
        Ok(())
    }

    /// Up to `k` nearest rows as `(row, squared distance)`, closest first.
    ///
    /// Equal distances are ordered by row index.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        self.check_dim(query.len())?;
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let q = ArrayView1::from(query);
        let distances = (&self.vectors - &q).mapv(|x| x * x).sum_axis(Axis(1));

        let mut ranked: Vec<(usize, f32)> = distances.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        Ok(ranked)
    }

    /// Serialize to the index artifact format
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let file = FlatIndexFile {
            magic: MAGIC,
            dim: self.dim as u32,
            rows: self.size() as u64,
            data: self.vectors.iter().copied().collect(),
        };
        bincode::serialize(&file)
            .map_err(|e| DocvecError::persistence(format!("Failed to encode index: {}", e)))
    }

    /// Deserialize from the index artifact format
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let file: FlatIndexFile = bincode::deserialize(bytes)
            .map_err(|e| DocvecError::persistence(format!("Failed to decode index: {}", e)))?;

        if file.magic != MAGIC {
            return Err(DocvecError::persistence("Index artifact has an unknown header"));
        }

        let dim = file.dim as usize;
        let rows = file.rows as usize;
        let vectors = Array2::from_shape_vec((rows, dim), file.data).map_err(|e| {
            DocvecError::persistence(format!(
                "Index artifact shape {}x{} does not match its data: {}",
                rows, dim, e
            ))
        })?;

        Ok(Self { dim, vectors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn unit_axes() -> FlatIndex {
        let mut index = FlatIndex::new(3);
        index
            .append(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]])
            .unwrap();
        index
    }

    #[test]
    fn test_search_empty_index() {
        let index = FlatIndex::new(3);
        assert!(index.search(&[1.0, 0.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = unit_axes();
        let results = index.search(&[0.0, 0.6, 0.8], 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 2);
        assert_eq!(results[1].0, 1);
        assert!(results[0].1 <= results[1].1);
    }

    #[test]
    fn test_search_k_larger_than_rows() {
        let index = unit_axes();
        assert_eq!(index.search(&[1.0, 0.0, 0.0], 10).unwrap().len(), 3);
    }

    #[test]
    fn test_search_ties_broken_by_row() {
        let mut index = FlatIndex::new(2);
        index
            .append(&[vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]])
            .unwrap();

        let results = index.search(&[1.0, 0.0], 4).unwrap();
        let rows: Vec<usize> = results.iter().map(|(row, _)| *row).collect();
        assert_eq!(rows, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_distance_range_for_unit_vectors() {
        let mut index = FlatIndex::new(2);
        index.append(&[vec![1.0, 0.0], vec![-1.0, 0.0]]).unwrap();

        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert!(results[0].1.abs() < EPSILON);
        assert!((results[1].1 - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_append_dimension_mismatch_is_atomic() {
        let mut index = unit_axes();
        let err = index.append(&[vec![1.0, 0.0, 0.0], vec![1.0, 0.0]]).unwrap_err();

        assert!(matches!(err, DocvecError::DimensionMismatch { expected: 3, actual: 2 }));
        assert_eq!(index.size(), 3);
    }

    #[test]
    fn test_search_dimension_mismatch() {
        let index = unit_axes();
        assert!(index.search(&[1.0, 0.0], 1).is_err());
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut index = unit_axes();
        index.rebuild(&[vec![0.0, 0.0, 1.0]]).unwrap();

        assert_eq!(index.size(), 1);
        assert_eq!(index.row(0).unwrap().to_vec(), vec![0.0, 0.0, 1.0]);

        assert!(index.rebuild(&[vec![1.0]]).is_err());
        assert_eq!(index.size(), 1);

        index.rebuild::<Vec<f32>>(&[]).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_replace_row() {
        let mut index = unit_axes();
        index.replace(0, &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(index.row(0).unwrap().to_vec(), vec![0.0, 1.0, 0.0]);
        assert!(index.replace(3, &[0.0, 1.0, 0.0]).is_err());
    }

    #[test]
    fn test_bytes_round_trip() {
        let index = unit_axes();
        let restored = FlatIndex::from_bytes(&index.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, index);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = FlatIndex::from_bytes(b"not an index").unwrap_err();
        assert!(matches!(err, DocvecError::Persistence(_)));
    }
}
