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

@file    lib.rs
@brief   Geometry library
 */

//a Documentation
/*!

# Geometry library

Simple 2D point, range and rectangle types used by the orthogram
layout engine.

Unlike the upstream `geometry` crate this workspace was grown from,
there is no N-dimensional vector/matrix/quaternion machinery here:
orthogram only ever places axis-aligned rectangles and draws
axis-aligned polylines, so the types below are concrete `f64`
two-dimensional values rather than generic over a `Num`/`Float`
trait. The const-generic vector algebra, SIMD feature and OpenGL-style
`Vec2`/`Mat4` type aliases of the original library have no consumer in
this crate and have been dropped.

!*/

//a Imports and exports
mod point;
mod range;
mod rectangle;

pub use point::Point;
pub use range::Range;
pub use rectangle::Rectangle;
