//! Simulated path ensemble.

use crate::domain::shared::DomainError;

/// Grid of simulated prices indexed by `(time step, path index)`.
///
/// Stored path-major: each trajectory is contiguous, which lets paths be
/// filled independently.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEnsemble {
    steps: usize,
    width: usize,
    values: Vec<f64>,
}

impl PathEnsemble {
    /// Wrap path-major values of `width` trajectories, each `steps` long.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if `values.len() != steps * width`.
    pub fn from_path_major(
        steps: usize,
        width: usize,
        values: Vec<f64>,
    ) -> Result<Self, DomainError> {
        let expected = steps.checked_mul(width).ok_or_else(|| {
            DomainError::invalid_value("ensemble", "grid dimensions overflow")
        })?;

        if values.len() != expected {
            return Err(DomainError::invariant(
                "ensemble_shape",
                format!(
                    "expected {expected} values for {steps} steps x {width} paths, got {}",
                    values.len()
                ),
            ));
        }

        Ok(Self {
            steps,
            width,
            values,
        })
    }

    /// Number of time steps (rows).
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Number of paths (columns).
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Value at `(step, path)`, `None` when out of range.
    #[must_use]
    pub fn value(&self, step: usize, path: usize) -> Option<f64> {
        if step >= self.steps || path >= self.width {
            return None;
        }
        self.values.get(path * self.steps + step).copied()
    }

    /// One full trajectory.
    #[must_use]
    pub fn path(&self, path: usize) -> Option<&[f64]> {
        if path >= self.width {
            return None;
        }
        let start = path * self.steps;
        self.values.get(start..start + self.steps)
    }

    /// All trajectories in path order.
    pub fn paths(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics; an empty grid yields nothing either way.
        self.values.chunks(self.steps.max(1))
    }

    /// Values of every path at `step`.
    pub fn row(&self, step: usize) -> impl Iterator<Item = f64> + '_ {
        let width = if step < self.steps { self.width } else { 0 };
        (0..width).map(move |path| self.values[path * self.steps + step])
    }

    /// Copy the row at `step` into `buf`, replacing its contents.
    pub fn copy_row_into(&self, step: usize, buf: &mut Vec<f64>) {
        buf.clear();
        buf.extend(self.row(step));
    }
}
