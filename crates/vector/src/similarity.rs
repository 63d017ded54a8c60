use docvec_common::{DocvecError, Result};

/// Euclidean norm of a vector
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale a vector to unit length.
///
/// Zero or non-finite norms are rejected since they have no direction.
pub fn l2_normalize(mut v: Vec<f32>) -> Result<Vec<f32>> {
    let norm = l2_norm(&v);
    if !norm.is_finite() || norm <= f32::EPSILON {
        return Err(DocvecError::embedding(format!(
            "Cannot normalize embedding with norm {}",
            norm
        )));
    }
    v.iter_mut().for_each(|x| *x /= norm);
    Ok(v)
}

/// Map an L2 distance to a (0, 1] similarity, higher is closer
pub fn distance_to_similarity(distance: f32) -> f32 {
    1.0 / (1.0 + distance.max(0.0))
}
