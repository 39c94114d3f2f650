// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Numerical utilities that are clients of the AD core.
//!
//! Link to [parent module](super)
//!
//! These routines are generic over [Scalar] , which both the value types
//! and `AD<V>` satisfy, so they can run on plain values or inside a
//! recording.
// ---------------------------------------------------------------------------
// sub-modules
//
pub mod lu_solve;
pub mod runge45;
//
pub use lu_solve::{lu_factor, lu_invert, lu_solve};
pub use runge45::runge_45;
// ---------------------------------------------------------------------------
// use
//
use crate::ad::AD;
use crate::float::FloatCore;
use crate::tape::sealed::ThisThreadTape;
// ---------------------------------------------------------------------------
//
// Scalar
/// The scalar operations the utilities require.
///
/// Implemented for the value types and for `AD<V>` . Note that, inside a
/// recording, [Scalar::less] bakes the outcome into the tape the same
/// way any recorded comparison does; re-evaluating at a point where a
/// pivot choice would differ shows up in
/// [compare_change_count](crate::ADFun::compare_change_count) .
pub trait Scalar :
    Clone
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + std::ops::Neg<Output = Self>
{
    fn zero() -> Self;
    fn one()  -> Self;
    fn from_f64(v : f64) -> Self;
    fn abs_val(&self) -> Self;
    fn less(&self, other : &Self) -> bool;
}
// ---------------------------------------------------------------------------
// impl_scalar!
/// Implement Scalar for one value type.
macro_rules! impl_scalar{ ($V:ty) => {
    impl Scalar for $V {
        fn zero() -> Self { 0 as $V }
        fn one()  -> Self { 1 as $V }
        fn from_f64(v : f64) -> Self { v as $V }
        fn abs_val(&self) -> Self { <$V>::abs(*self) }
        fn less(&self, other : &Self) -> bool { self < other }
    }
} }
impl_scalar!(f32);
impl_scalar!(f64);
//
/// Scalar for `AD<V>` ; comparisons are recorded.
impl<V> Scalar for AD<V>
where
    V : FloatCore + ThisThreadTape,
{
    fn zero() -> Self {
        AD::from( V::zero() )
    }
    fn one() -> Self {
        AD::from( V::one() )
    }
    fn from_f64(v : f64) -> Self {
        AD::from( V::from_f64(v) )
    }
    fn abs_val(&self) -> Self {
        self.abs()
    }
    fn less(&self, other : &Self) -> bool {
        self.lt(other)
    }
}
