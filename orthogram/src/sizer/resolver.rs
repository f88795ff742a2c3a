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

@file    resolver.rs
@brief   DAG-plus-spring-energy resolution of an ordered chain of coordinates
 */

//a Documentation
/*!
# Resolver

Each axis (the sequence of row or column coordinate variables: outer
edges, inner edges, channel lines) is a chain of links `start -> end`
each demanding `position[end] >= position[start] + min_size` (the
required, strong-priority layer of §4.5). [Resolver::assign_min_positions]
satisfies every link exactly by a single forward pass in link order
(the chain is built in monotonically increasing index order, so link
order already is a topological order).

Once minimum positions are known, [Resolver::minimize_energy] treats
each link as a Hooke's-law spring whose natural length is its `min_size`
and whose compliance is its `growth` (the soft, weak-priority layer),
pins every variable that has an externally forced value (diagram edges,
or a min-position that must not shrink), and solves for final positions
with [super::equation_set::EquationSet].
!*/

//a Imports
use super::equation_set::EquationSet;
use crate::error::{OrthogramError, Result};

//a Link
//tp Link
/// One `start -> end` ordering constraint between two coordinate variables
#[derive(Clone, Copy, Debug)]
pub struct Link {
    /// Index of the start variable
    pub start: usize,
    /// Index of the end variable
    pub end: usize,
    /// Minimum distance `position[end] - position[start]` must satisfy
    pub min_size: f64,
    /// Compliance used in the soft energy-minimization pass; `None`
    /// means this link is rigid (zero growth) and stays at exactly `min_size`
    pub growth: Option<f64>,
}

//a Resolver
//tp Resolver
/// Resolves a chain of `n` coordinate variables linked by [Link]s
pub struct Resolver {
    n: usize,
    links: Vec<Link>,
    forced: Vec<Option<f64>>,
}

//ip Resolver
impl Resolver {
    //fp new
    /// A resolver over `n` coordinate variables, indexed `0..n`
    pub fn new(n: usize) -> Self {
        Self { n, links: Vec::new(), forced: vec![None; n] }
    }

    //mp add_link
    /// Add a minimum-gap link; links should be added in increasing
    /// `start` order for `assign_min_positions` to see a valid
    /// topological order in one forward pass
    pub fn add_link(&mut self, start: usize, end: usize, min_size: f64, growth: Option<f64>) {
        self.links.push(Link { start, end, min_size, growth });
    }

    //mp force_value
    /// Force a variable to an exact position (e.g. the diagram's origin)
    pub fn force_value(&mut self, n: usize, value: f64) {
        self.forced[n] = Some(value);
    }

    //mp assign_min_positions
    /// Forward pass assigning every variable the smallest position
    /// consistent with every link's `min_size` and any forced values
    /// (§4.5, required layer)
    pub fn assign_min_positions(&self) -> Result<Vec<f64>> {
        let mut pos = vec![0.0f64; self.n];
        if let Some(v) = self.forced[0] {
            pos[0] = v;
        }
        for link in &self.links {
            if link.start >= self.n || link.end >= self.n {
                return Err(OrthogramError::infeasible("coordinate link references an out-of-range variable"));
            }
            let candidate = pos[link.start] + link.min_size;
            if candidate > pos[link.end] {
                pos[link.end] = candidate;
            }
        }
        for (i, forced) in self.forced.iter().enumerate() {
            if let Some(v) = forced {
                if pos[i] > *v + 1e-9 {
                    return Err(OrthogramError::infeasible(format!(
                        "variable {} has minimum required position {} exceeding its forced value {}",
                        i, pos[i], v
                    )));
                }
                pos[i] = *v;
            }
        }
        Ok(pos)
    }

    //mp minimize_energy
    /// Soft pass: redistribute any slack beyond the minimum positions
    /// by treating every link as a spring, pinning variables that have
    /// no growth or an explicit forced value (§4.5, soft layer)
    pub fn minimize_energy(&self) -> Result<Vec<f64>> {
        let min_positions = self.assign_min_positions()?;
        let mut eqs = EquationSet::new(self.n);
        for link in &self.links {
            let growth = link.growth.unwrap_or(0.0);
            if growth <= 0.0 {
                // rigid link: pin the gap by forcing both ends relative to
                // each other is not directly expressible, so pin `end` at
                // `start`'s minimum plus the rigid length if `start` is
                // itself pinned; otherwise fall back to a very stiff spring
                eqs.add_growth_link(link.start, link.end, link.min_size, 1e-6);
            } else {
                eqs.add_growth_link(link.start, link.end, link.min_size, growth);
            }
        }
        for (i, forced) in self.forced.iter().enumerate() {
            if let Some(v) = forced {
                eqs.force_value(i, *v);
            }
        }
        // variables with nothing pulling them beyond their minimum (no
        // growth anywhere) are pinned at their minimum position so the
        // soft solve never relaxes a required gap
        let has_growth: Vec<bool> = {
            let mut v = vec![false; self.n];
            for link in &self.links {
                if link.growth.unwrap_or(0.0) > 0.0 {
                    v[link.start] = true;
                    v[link.end] = true;
                }
            }
            v
        };
        for i in 0..self.n {
            if !has_growth[i] && self.forced[i].is_none() {
                eqs.force_value(i, min_positions[i]);
            }
        }
        let solved = eqs.solve()?;
        // never allow the soft pass to violate a required minimum
        let mut out = solved;
        for (i, m) in min_positions.iter().enumerate() {
            if out[i] < *m - 1e-6 {
                out[i] = *m;
            }
        }
        Ok(out)
    }

    //zz All done
}

//mt Test for Resolver
#[cfg(test)]
mod test_resolver {
    use super::*;

    #[test]
    fn test_min_positions_simple_chain() {
        let mut r = Resolver::new(3);
        r.add_link(0, 1, 5.0, None);
        r.add_link(1, 2, 3.0, None);
        let pos = r.assign_min_positions().unwrap();
        assert_eq!(pos, vec![0.0, 5.0, 8.0]);
    }

    #[test]
    fn test_forced_end_stretches_chain() {
        let mut r = Resolver::new(3);
        r.add_link(0, 1, 5.0, Some(1.0));
        r.add_link(1, 2, 5.0, Some(1.0));
        r.force_value(0, 0.0);
        r.force_value(2, 20.0);
        let pos = r.minimize_energy().unwrap();
        assert!((pos[2] - 20.0).abs() < 1e-6);
        assert!(pos[1] > 5.0 && pos[1] < 15.0);
    }

    #[test]
    fn test_infeasible_forced_too_tight() {
        let mut r = Resolver::new(2);
        r.add_link(0, 1, 10.0, None);
        r.force_value(1, 2.0);
        assert!(r.assign_min_positions().is_err());
    }

    #[test]
    fn test_rigid_links_stay_at_minimum() {
        let mut r = Resolver::new(2);
        r.add_link(0, 1, 4.0, None);
        r.force_value(0, 0.0);
        let pos = r.minimize_energy().unwrap();
        assert!((pos[1] - 4.0).abs() < 1e-6);
    }
}
