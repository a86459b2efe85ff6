// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # defscope
//!
//! Control-flow graphs and reaching-definitions analysis for structured
//! procedures. This is the analysis core of a source-to-source optimizer: a
//! parser produces [`ast`] trees, this crate tells a constant propagator which
//! definitions of a variable may reach each statement, and the driver repeats
//! until nothing changes.
//!
//! ## Features
//!
//! - **Statement-level CFGs** - one node per statement, loop back edges, merge
//!   points, early returns and dead code handled explicitly
//! - **Scoped variables** - shadowing declarations are distinct variables and
//!   do not kill each other
//! - **Bit-vector dataflow** - a generic forward worklist solver whose result is
//!   independent of worklist order
//! - **Parallel procedures** - independent procedures are built and solved on
//!   the rayon pool
//!
//! ## Quick Start
//!
//! ```rust
//! use defscope::prelude::*;
//!
//! let proc = Procedure::new("f", ["a"], Stmt::block([
//!     Stmt::decl("x", 1),
//!     Stmt::if_then(Expr::name("a"), Stmt::block([Stmt::assign("x", 2)])),
//!     Stmt::ret_value(Expr::name("x")),
//! ]));
//!
//! let cfg = ControlFlowBuilder::new().build(&proc)?;
//! let rd = ReachingDefinitionsBuilder::new().analyze(&cfg);
//!
//! let ret = cfg.node_for(&proc.body().children()[2]).unwrap();
//! let reaching: Vec<String> = rd.get(ret).iter().map(ToString::to_string).collect();
//! assert_eq!(reaching, ["a@param", "x@n0", "x@n2"]);
//! # Ok::<(), defscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ast`] - the structured statement tree consumed by the analyses
//! - [`analysis`] - CFG construction and the dataflow framework
//! - [`config`] - [`AnalysisConfig`] shared by both builders
//! - [`utils`] - bit sets, arena graphs and traversals
//! - [`Error`] and [`Result`] - precondition reporting
//!
//! ## Logging
//!
//! Graph construction and convergence are reported through [`tracing`] at
//! `debug` level, individual worklist steps at `trace` level. The library never
//! installs a subscriber.

#[macro_use]
pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

pub mod analysis;
pub mod ast;
pub mod config;
pub mod prelude;
pub mod utils;

/// `defscope` Result type.
///
/// A type alias for `std::result::Result<T, Error>` where the error type is
/// always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `defscope` Error type.
///
/// See [`Error`] for the variants.
pub use error::Error;

pub use config::AnalysisConfig;
