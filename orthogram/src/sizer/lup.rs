/*a Copyright

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

  http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.

@file    lup.rs
@brief   LU decomposition with partial pivoting, for the spring-energy solve
 */

//a Imports
use crate::error::{OrthogramError, Result};

//a LupDecomposition
//tp LupDecomposition
/// A square matrix decomposed in place as `PA = LU`, with the
/// permutation recorded as a row-index array
pub struct LupDecomposition {
    size: usize,
    data: Vec<f64>,
    pivot: Vec<usize>,
}

//ip LupDecomposition
impl LupDecomposition {
    //fp new
    /// Decompose a row-major `size x size` matrix
    pub fn new(matrix: &[f64], size: usize) -> Result<Self> {
        let mut data = matrix.to_vec();
        let mut pivot: Vec<usize> = (0..size).collect();

        for k in 0..size {
            let mut max_val = data[k * size + k].abs();
            let mut max_row = k;
            for r in (k + 1)..size {
                let v = data[r * size + k].abs();
                if v > max_val {
                    max_val = v;
                    max_row = r;
                }
            }
            if max_val < 1e-12 {
                return Err(OrthogramError::infeasible("singular constraint matrix (no unique coordinate solution)"));
            }
            if max_row != k {
                for c in 0..size {
                    data.swap(k * size + c, max_row * size + c);
                }
                pivot.swap(k, max_row);
            }
            for r in (k + 1)..size {
                let factor = data[r * size + k] / data[k * size + k];
                data[r * size + k] = factor;
                for c in (k + 1)..size {
                    data[r * size + c] -= factor * data[k * size + c];
                }
            }
        }
        Ok(Self { size, data, pivot })
    }

    //mp solve
    /// Solve `Ax = b` for the matrix this was built from
    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.size;
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[self.pivot[i]];
            for j in 0..i {
                sum -= self.data[i * n + j] * y[j];
            }
            y[i] = sum;
        }
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum -= self.data[i * n + j] * x[j];
            }
            x[i] = sum / self.data[i * n + i];
        }
        x
    }

    //zz All done
}

//mt Test for LupDecomposition
#[cfg(test)]
mod test_lup {
    use super::*;

    #[test]
    fn test_identity() {
        let m = vec![1.0, 0.0, 0.0, 1.0];
        let lup = LupDecomposition::new(&m, 2).unwrap();
        let x = lup.solve(&[3.0, 4.0]);
        assert!((x[0] - 3.0).abs() < 1e-9);
        assert!((x[1] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_needs_pivot() {
        // without pivoting, the naive elimination would divide by the
        // zero in position (0,0)
        let m = vec![0.0, 1.0, 1.0, 1.0];
        let lup = LupDecomposition::new(&m, 2).unwrap();
        let x = lup.solve(&[2.0, 3.0]);
        assert!((x[0] - 1.0).abs() < 1e-9);
        assert!((x[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_singular_is_infeasible() {
        let m = vec![1.0, 1.0, 1.0, 1.0];
        assert!(LupDecomposition::new(&m, 2).is_err());
    }
}
