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

@file    error.rs
@brief   The error taxonomy shared by every pipeline stage
 */

//a Imports
use thiserror::Error;

//a OrthogramError
//tp OrthogramError
/// The single error type threaded through the whole pipeline.
///
/// Every variant names the offending entity (a row index, a block
/// name, a connection endpoint pair, an include path) so that the CLI
/// can print it directly without a second lookup pass.
#[derive(Error, Debug)]
pub enum OrthogramError {
    /// A malformed DDF document: unknown key, type mismatch, missing
    /// required field, or a cyclic/missing `include`
    #[error("definition error: {0}")]
    Definition(String),

    /// A structurally invalid grid or block layout
    #[error("layout error: {0}")]
    Layout(String),

    /// A connection could not be routed between its endpoints
    #[error("could not route connection from '{start}' to '{end}': {reason}")]
    Unroutable {
        /// Display name of the connection's start endpoint
        start: String,
        /// Display name of the connection's end endpoint
        end: String,
        /// Why the search failed
        reason: String,
    },

    /// The constraint system had no feasible solution, even after the
    /// single relaxation retry
    #[error("infeasible layout: {0}")]
    Infeasible(String),

    /// The drawing back-end failed to produce output
    #[error("render error: {0}")]
    Render(String),
}

//ip OrthogramError
impl OrthogramError {
    //fp definition
    /// Build a `Definition` error naming the offending entity
    pub fn definition<S: Into<String>>(s: S) -> Self {
        Self::Definition(s.into())
    }

    //fp layout
    /// Build a `Layout` error naming the offending entity
    pub fn layout<S: Into<String>>(s: S) -> Self {
        Self::Layout(s.into())
    }

    //fp unroutable
    /// Build an `Unroutable` error for a connection
    pub fn unroutable<S: Into<String>, T: Into<String>, R: Into<String>>(start: S, end: T, reason: R) -> Self {
        Self::Unroutable { start: start.into(), end: end.into(), reason: reason.into() }
    }

    //fp infeasible
    /// Build an `Infeasible` error naming the offending constraint chain
    pub fn infeasible<S: Into<String>>(s: S) -> Self {
        Self::Infeasible(s.into())
    }

    //fp render
    /// Build a `Render` error
    pub fn render<S: Into<String>>(s: S) -> Self {
        Self::Render(s.into())
    }

    //zz All done
}

//tp Result
/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, OrthogramError>;
