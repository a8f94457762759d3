//! Contiguous 2D working grids for score and spectral data.
//!
//! A `Grid<T>` is a single `width * height` arena indexed by
//! `idx(x, y) = y * width + x`. Grids are created per operation and dropped
//! before the operation returns.

use crate::util::math::Complex;
use crate::util::{ImgProcError, ImgProcResult};

/// Edge magnitude or correlation score at a grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScorePoint {
    /// Column of the anchor.
    pub grid_x: usize,
    /// Row of the anchor.
    pub grid_y: usize,
    /// Score value.
    pub value: f64,
}

/// One bin of a 2D discrete Fourier transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpectralCoefficient {
    /// Column frequency index.
    pub grid_x: usize,
    /// Row frequency index.
    pub grid_y: usize,
    /// Complex coefficient.
    pub value: Complex,
}

/// Dense row-major grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

/// Grid of edge or correlation scores.
pub type ScoreGrid = Grid<ScorePoint>;
/// Grid of Fourier coefficients.
pub type SpectralGrid = Grid<SpectralCoefficient>;

impl<T> Grid<T> {
    /// Builds a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> ImgProcResult<Self>
    where
        F: FnMut(usize, usize) -> ImgProcResult<T>,
    {
        let len = grid_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ImgProcError::AllocationFailed {
                bytes: len.saturating_mul(std::mem::size_of::<T>()),
            })?;
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y)?);
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Wraps a row-major vector of `width * height` cells.
    pub fn from_vec(data: Vec<T>, width: usize, height: usize) -> ImgProcResult<Self> {
        let needed = grid_len(width, height)?;
        if data.len() != needed {
            return Err(ImgProcError::BufferSizeMismatch {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the grid width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the flat index of `(x, y)`.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Returns the cell at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(self.idx(x, y))
    }

    /// Returns the cell at `(x, y)` mutably if it is within bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.idx(x, y);
        self.data.get_mut(idx)
    }

    /// Returns all cells in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns all cells mutably in row-major order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl ScoreGrid {
    /// Returns the score value at `(x, y)`.
    pub fn value(&self, x: usize, y: usize) -> Option<f64> {
        self.get(x, y).map(|p| p.value)
    }
}

fn grid_len(width: usize, height: usize) -> ImgProcResult<usize> {
    if width == 0 || height == 0 {
        return Err(ImgProcError::InvalidDimensions {
            width,
            height,
            channels: 1,
        });
    }
    width
        .checked_mul(height)
        .ok_or(ImgProcError::InvalidDimensions {
            width,
            height,
            channels: 1,
        })
}

#[cfg(test)]
mod tests {
    use super::{Grid, ScorePoint};

    #[test]
    fn from_fn_is_row_major() {
        let grid = Grid::from_fn(3, 2, |x, y| Ok(x + 10 * y)).unwrap();
        assert_eq!(grid.as_slice(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(grid.idx(2, 1), 5);
        assert_eq!(grid.get(1, 1), Some(&11));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn score_lookup_reads_value() {
        let grid = Grid::from_fn(2, 2, |x, y| {
            Ok(ScorePoint {
                grid_x: x,
                grid_y: y,
                value: (x * y) as f64,
            })
        })
        .unwrap();
        assert_eq!(grid.value(1, 1), Some(1.0));
        assert_eq!(grid.value(0, 2), None);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Grid::from_vec(vec![0u8; 5], 2, 3).is_err());
        assert!(Grid::from_vec(vec![0u8; 6], 2, 3).is_ok());
    }
}
