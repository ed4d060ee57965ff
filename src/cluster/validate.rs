use crate::error::{Error, Result};

/// Check that `data` is a well-formed matrix and return its dimensionality.
///
/// An empty slice is valid and has dimension 0.
pub(crate) fn matrix(data: &[Vec<f32>]) -> Result<usize> {
    let Some(first) = data.first() else {
        return Ok(0);
    };

    let d = first.len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }

    for (index, row) in data.iter().enumerate() {
        if row.len() != d {
            return Err(Error::DimensionMismatch {
                index,
                expected: d,
                found: row.len(),
            });
        }
        if let Some(component) = row.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFiniteValue { index, component });
        }
    }

    Ok(d)
}
