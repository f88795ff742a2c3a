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

@file    equation_set.rs
@brief   A Hooke's-law spring-energy linear system over axis coordinates
 */

//a Documentation
/*!
# EquationSet

Represents the soft layer of the sizer: given a chain of coordinate
variables linked by minimum-gap constraints, builds the linear system
whose solution minimizes total spring energy (`sum (x_end - x_start -
natural_length)^2 / growth`) subject to any variables pinned by
[EquationSet::force_value] (typically the variables the required DAG
pass already fixed at their minimum). Solved in one shot by
[crate::sizer::lup::LupDecomposition].
!*/

//a Imports
use super::lup::LupDecomposition;
use crate::error::Result;

//a EquationSet
//tp EquationSet
/// The spring-energy linear system: an `n x n` symmetric matrix and
/// right-hand-side vector built up one link at a time
pub struct EquationSet {
    size: usize,
    matrix: Vec<f64>,
    rhs: Vec<f64>,
    forced: Vec<Option<f64>>,
}

//ip EquationSet
impl EquationSet {
    //fp new
    /// An empty system over `size` coordinate variables
    pub fn new(size: usize) -> Self {
        Self { size, matrix: vec![0.0; size * size], rhs: vec![0.0; size], forced: vec![None; size] }
    }

    //mp add_growth_link
    /// Add a spring between `start` and `end` whose natural length is
    /// `length` and whose compliance is `growth` (higher growth = a
    /// softer, more stretchable spring; `growth` must be `> 0`)
    pub fn add_growth_link(&mut self, start: usize, end: usize, length: f64, growth: f64) {
        let k = 1.0 / growth.max(1e-9);
        let n = self.size;
        self.matrix[start * n + start] += k;
        self.matrix[end * n + end] += k;
        self.matrix[start * n + end] -= k;
        self.matrix[end * n + start] -= k;
        self.rhs[start] -= k * length;
        self.rhs[end] += k * length;
    }

    //mp force_value
    /// Pin variable `n` to `value`: its row is replaced with an
    /// identity equation
    pub fn force_value(&mut self, n: usize, value: f64) {
        self.forced[n] = Some(value);
    }

    //mp solve
    /// Solve the system, respecting forced variables, and return the
    /// resolved coordinate for every variable
    pub fn solve(&self) -> Result<Vec<f64>> {
        let n = self.size;
        let mut matrix = self.matrix.clone();
        let mut rhs = self.rhs.clone();
        for i in 0..n {
            if let Some(v) = self.forced[i] {
                for c in 0..n {
                    matrix[i * n + c] = if c == i { 1.0 } else { 0.0 };
                }
                rhs[i] = v;
            }
        }
        // any variable with no spring touching it at all would leave a zero
        // row; pin it to zero so the matrix stays non-singular
        for i in 0..n {
            let row_is_empty = (0..n).all(|c| matrix[i * n + c] == 0.0);
            if row_is_empty {
                matrix[i * n + i] = 1.0;
                rhs[i] = 0.0;
            }
        }
        let lup = LupDecomposition::new(&matrix, n)?;
        Ok(lup.solve(&rhs))
    }

    //zz All done
}

//mt Test for EquationSet
#[cfg(test)]
mod test_equation_set {
    use super::*;

    #[test]
    fn test_single_spring_respects_forced_start() {
        let mut eqs = EquationSet::new(2);
        eqs.add_growth_link(0, 1, 10.0, 1.0);
        eqs.force_value(0, 0.0);
        let x = eqs.solve().unwrap();
        assert!((x[0] - 0.0).abs() < 1e-6);
        assert!((x[1] - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_chain_distributes_slack_by_growth() {
        // two springs in series between pinned ends; the softer (higher
        // growth) spring should absorb more of any extra slack
        let mut eqs = EquationSet::new(3);
        eqs.add_growth_link(0, 1, 5.0, 1.0);
        eqs.add_growth_link(1, 2, 5.0, 3.0);
        eqs.force_value(0, 0.0);
        eqs.force_value(2, 20.0);
        let x = eqs.solve().unwrap();
        let stretch_a = x[1] - x[0] - 5.0;
        let stretch_b = x[2] - x[1] - 5.0;
        assert!(stretch_b > stretch_a);
    }
}
