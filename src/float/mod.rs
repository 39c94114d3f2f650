// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module defines the adtape floating point value layer.
//!
//! Link to [parent module](super)
//!
//! This module does not have dependencies on the rest of the crate.
// ---------------------------------------------------------------------------
// use
//
use std::hash::{Hash, Hasher};
//
use ordered_float::OrderedFloat;
// ---------------------------------------------------------------------------
/// Documentation for the adtape generic type parameter V.
///
/// The generic parameter *V* is the base numeric type used for
/// calculating values. It carries no dependency information; the tape
/// records how each [AD](crate::AD) < *V* > value is related to the
/// independent variables and dynamic parameters.
pub fn doc_generic_v() {}
// ---------------------------------------------------------------------------
//
// FloatCore
/// The floating point operations required of the base value type.
///
/// * V : see [doc_generic_v]
///
/// Implemented by this crate for `f32` and `f64` .
/// The identity predicates are used for tape canonicalization and the
/// short circuit simplifications; they must be exact (not tolerance based).
pub trait FloatCore :
    Copy
    + PartialEq
    + PartialOrd
    + std::fmt::Debug
    + std::fmt::Display
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + std::ops::Neg<Output = Self>
    + std::ops::AddAssign
    + std::ops::SubAssign
    + std::ops::MulAssign
    + std::ops::DivAssign
    + Send
    + Sync
    + 'static
{
    //
    // special values
    fn nan()  -> Self;
    fn zero() -> Self;
    fn one()  -> Self;
    //
    // conversion
    /// lossy conversion from f64; used for constants in generic code
    fn from_f64(v : f64) -> Self;
    //
    /// the value of a Taylor order index as a *V* object
    fn from_usize(k : usize) -> Self;
    //
    /// floor of this value as a vector index;
    /// values below zero map outside every vector length
    fn to_index(self) -> usize;
    //
    // predicates
    fn is_nan(self)    -> bool;
    fn is_finite(self) -> bool;
    //
    /// true iff this value is the constant zero (exact comparison)
    fn identical_zero(self) -> bool;
    //
    /// true iff this value is the constant one (exact comparison)
    fn identical_one(self) -> bool;
    //
    /// bit level equality used when interning tape constants;
    /// nan is identical to nan
    fn identical_constant(self, other : Self) -> bool;
    //
    /// hash key consistent with [FloatCore::identical_constant]
    fn key_hash(self) -> u64;
    //
    // azmul
    /// absorbing multiplication: zero times anything, including nan,
    /// is zero
    fn azmul(self, y : Self) -> Self {
        if self.identical_zero() {
            Self::zero()
        } else {
            self * y
        }
    }
    //
    // elementary functions
    fn abs(self)    -> Self;
    fn signum(self) -> Self;
    fn sqrt(self)   -> Self;
    fn exp(self)    -> Self;
    fn exp_m1(self) -> Self;
    fn ln(self)     -> Self;
    fn ln_1p(self)  -> Self;
    fn sin(self)    -> Self;
    fn cos(self)    -> Self;
    fn tan(self)    -> Self;
    fn sinh(self)   -> Self;
    fn cosh(self)   -> Self;
    fn tanh(self)   -> Self;
    fn asin(self)   -> Self;
    fn acos(self)   -> Self;
    fn atan(self)   -> Self;
    fn asinh(self)  -> Self;
    fn acosh(self)  -> Self;
    fn atanh(self)  -> Self;
    fn erf(self)    -> Self;
    fn erfc(self)   -> Self;
    fn pow(self, y : Self) -> Self;
}
// ---------------------------------------------------------------------------
// erf_f64
/// Error function for f64.
///
/// Rust core does not supply erf, and the tape engine must be able to
/// execute every operation it records. This is the Abramowitz and Stegun
/// 7.1.26 rational approximation; absolute error is below 1.5e-7.
pub(crate) fn erf_f64(x : f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x    = x.abs();
    //
    let a1 =  0.254829592;
    let a2 = -0.284496736;
    let a3 =  1.421413741;
    let a4 = -1.453152027;
    let a5 =  1.061405429;
    let p  =  0.3275911;
    //
    let t  = 1.0 / (1.0 + p * x);
    let y  = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1)
        * t * (-x * x).exp();
    sign * y
}
// ---------------------------------------------------------------------------
// impl_float_core!
/// Implements the FloatCore trait for a primitive float type;
/// i.e., f32 or f64.
macro_rules! impl_float_core{ ($P:ident) => {
    impl FloatCore for $P {
        //
        fn nan()  -> Self { $P::NAN }
        fn zero() -> Self { 0 as $P }
        fn one()  -> Self { 1 as $P }
        //
        fn from_f64(v : f64)   -> Self { v as $P }
        fn from_usize(k : usize) -> Self { k as $P }
        fn to_index(self) -> usize {
            if self < 0 as $P {
                usize::MAX
            } else {
                self.floor() as usize
            }
        }
        //
        fn is_nan(self)    -> bool { $P::is_nan(self) }
        fn is_finite(self) -> bool { $P::is_finite(self) }
        //
        fn identical_zero(self) -> bool { self == 0 as $P }
        fn identical_one(self)  -> bool { self == 1 as $P }
        fn identical_constant(self, other : Self) -> bool {
            OrderedFloat(self) == OrderedFloat(other)
        }
        fn key_hash(self) -> u64 {
            let mut hasher = rustc_hash::FxHasher::default();
            OrderedFloat(self).hash(&mut hasher);
            hasher.finish()
        }
        //
        fn abs(self)    -> Self { $P::abs(self) }
        fn signum(self) -> Self {
            // signum(0) is 0 here, the derivative convention for sign(x)
            if self == 0 as $P {
                0 as $P
            } else {
                $P::signum(self)
            }
        }
        fn sqrt(self)   -> Self { $P::sqrt(self) }
        fn exp(self)    -> Self { $P::exp(self) }
        fn exp_m1(self) -> Self { $P::exp_m1(self) }
        fn ln(self)     -> Self { $P::ln(self) }
        fn ln_1p(self)  -> Self { $P::ln_1p(self) }
        fn sin(self)    -> Self { $P::sin(self) }
        fn cos(self)    -> Self { $P::cos(self) }
        fn tan(self)    -> Self { $P::tan(self) }
        fn sinh(self)   -> Self { $P::sinh(self) }
        fn cosh(self)   -> Self { $P::cosh(self) }
        fn tanh(self)   -> Self { $P::tanh(self) }
        fn asin(self)   -> Self { $P::asin(self) }
        fn acos(self)   -> Self { $P::acos(self) }
        fn atan(self)   -> Self { $P::atan(self) }
        fn asinh(self)  -> Self { $P::asinh(self) }
        fn acosh(self)  -> Self { $P::acosh(self) }
        fn atanh(self)  -> Self { $P::atanh(self) }
        fn erf(self)    -> Self { erf_f64(self as f64) as $P }
        fn erfc(self)   -> Self { (1.0 - erf_f64(self as f64)) as $P }
        fn pow(self, y : Self) -> Self { $P::powf(self, y) }
    }
} }
impl_float_core!(f32);
impl_float_core!(f64);
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    //
    #[test]
    fn identity_predicates() {
        assert!( 0f64.identical_zero() );
        assert!( 1f64.identical_one() );
        assert!( ! 1e-300f64.identical_zero() );
        assert!( f64::nan().identical_constant( f64::nan() ) );
        assert_eq!( f64::nan().key_hash(), f64::nan().key_hash() );
    }
    //
    #[test]
    fn azmul_absorbs_nan() {
        assert_eq!( 0f64.azmul( f64::NAN ), 0.0 );
        assert!( f64::NAN.azmul( 0.0 ).is_nan() );
        assert_eq!( 2f64.azmul( 3.0 ), 6.0 );
    }
    //
    #[test]
    fn erf_values() {
        assert!( (1f64.erf() - 0.8427007929).abs() < 1e-6 );
        assert!( ((-1f64).erf() + 0.8427007929).abs() < 1e-6 );
        assert!( (0.5f64.erfc() - 0.4795001222).abs() < 1e-6 );
    }
}
