// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! adtape: a tape based operator overloading AD library.
//!
//! A numerical program is executed once using the scalar type [AD] < *V* > .
//! Every arithmetic and elementary operation is recorded on this thread's
//! tape. The recording is then moved into an [ADFun] object that can be
//! replayed many times, at arbitrary argument points, computing function
//! values, Taylor coefficients, forward and reverse mode derivatives of any
//! order, Jacobians, Hessians, and sparsity patterns.
//!
//! # Example
//! ```
//! use adtape::{start_recording, stop_recording};
//!
//! // f(x) = x[0] * x[1]
//! let  x : Vec<f64> = vec![ 3.0, 5.0 ];
//! let  ax           = start_recording(x).unwrap();
//! let  ay           = vec![ &ax[0] * &ax[1] ];
//! let  mut f        = stop_recording(ay).unwrap();
//!
//! let y  = f.forward(0, vec![ 3.0, 5.0 ]).unwrap();
//! assert_eq!( y, vec![ 15.0 ] );
//!
//! let dy = f.forward(1, vec![ 1.0, 0.0 ]).unwrap();
//! assert_eq!( dy, vec![ 5.0 ] );
//!
//! let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
//! assert_eq!( dw, vec![ 5.0, 3.0 ] );
//! ```
// ---------------------------------------------------------------------------
// modules
//
pub mod float;
pub mod error;
pub mod tape;
pub mod ad;
pub mod fun;
pub mod vecad;
pub mod atom;
pub mod discrete;
pub mod checkpoint;
pub mod utility;
//
pub(crate) mod op;
// ---------------------------------------------------------------------------
// use
//
pub use crate::float::FloatCore;
pub use crate::error::Error;
pub use crate::tape::{
    IndexT,
    start_recording,
    start_recording_dyn,
    stop_recording,
    abort_recording,
    setup_parallel,
};
pub use crate::ad::{
    AD,
    AdType,
    ad_from_value,
    ad_from_vector,
    ad_to_vector,
};
pub use crate::ad::cond_exp::{
    CompareOp,
    cond_exp,
    cond_exp_lt,
    cond_exp_le,
    cond_exp_eq,
    cond_exp_ge,
    cond_exp_gt,
};
pub use crate::ad::print_for;
pub use crate::fun::ADFun;
pub use crate::fun::sparsity::{
    Pattern,
    ListPattern,
    PackPattern,
};
pub use crate::vecad::VecAD;
pub use crate::atom::{
    Atomic,
    register_atomic,
    call_atomic,
};
pub use crate::discrete::{
    register_discrete,
    discrete,
};
pub use crate::checkpoint::Checkpoint;
// ---------------------------------------------------------------------------
//
// VERSION
/// The date corresponding to this version of the software as year.month.day
///
/// # Example
/// ```
/// assert_eq!( adtape::VERSION, "2026.7.30" );
/// ```
pub const VERSION : &str = "2026.7.30";
