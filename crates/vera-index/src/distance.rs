//! Vector math kernels for the flat index.
//!
//! The index keeps every row at unit L2 norm, so similarity search reduces
//! to a plain inner product.

/// Compute the dot product of two equal-length vectors.
///
/// For unit-normalized inputs this equals cosine similarity.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut sum = 0.0f32;

    // Manual loop unrolling for better performance
    let chunks = a.len() / 4;
    let remainder = a.len() % 4;

    for i in 0..chunks {
        let base = i * 4;
        sum += a[base] * b[base]
            + a[base + 1] * b[base + 1]
            + a[base + 2] * b[base + 2]
            + a[base + 3] * b[base + 3];
    }

    let start = chunks * 4;
    for i in 0..remainder {
        let idx = start + i;
        sum += a[idx] * b[idx];
    }

    sum
}

/// Normalize a vector to unit L2 length in place.
///
/// Zero-norm vectors are left untouched: the zero row is a defined
/// degenerate case, not an error, and scores 0.0 against every query.
#[inline]
pub fn normalize(v: &mut [f32]) {
    let norm = dot_product(v, v).sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
