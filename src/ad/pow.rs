// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Power and absorbing multiplication on `AD<V>` .
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
//
use crate::ad::AD;
use crate::ad::binary::{BinFamily, record_binary};
use crate::float::FloatCore;
use crate::tape::{Tape, sealed::ThisThreadTape, with_tape};
// ---------------------------------------------------------------------------
impl<V> AD<V>
where
    V : FloatCore + ThisThreadTape,
{
    //
    // pow
    /// `AD<V>` version of [FloatCore::pow] .
    ///
    /// A variable base with a variable exponent records three result
    /// variables, `log(x)` , `log(x) * y` , and `exp( log(x) * y )` ,
    /// so higher order coefficients follow the log, multiply, and exp
    /// recurrences.
    ///
    /// # Example
    /// ```
    /// use adtape::{start_recording, stop_recording};
    /// let ax    = start_recording( vec![ 2f64, 3f64 ] ).unwrap();
    /// let ay    = vec![ ax[0].pow( &ax[1] ) ];
    /// let mut f = stop_recording(ay).unwrap();
    /// let y     = f.forward(0, vec![ 2.0, 3.0 ]).unwrap();
    /// assert!( (y[0] - 8.0).abs() < 1e-10 );
    /// ```
    pub fn pow(&self, rhs : &AD<V>) -> AD<V> {
        let new_value = self.value.pow( rhs.value );
        let (tape_id, index, tag) = with_tape( |tape : &mut Tape<V>|
            record_binary(tape, BinFamily::Pow, self, rhs, new_value)
        );
        AD::new(tape_id, index, tag, new_value)
    }
    //
    // azmul
    /// Absorbing multiplication: `self.azmul(y)` is zero whenever self is
    /// zero, even if *y* is nan or infinite; see [FloatCore::azmul] .
    ///
    /// This is a distinct operator family from `*` because its derivative
    /// follows the same absorbing rule and the optimizer must not merge
    /// the two.
    pub fn azmul(&self, rhs : &AD<V>) -> AD<V> {
        let new_value = self.value.azmul( rhs.value );
        let (tape_id, index, tag) = with_tape( |tape : &mut Tape<V>|
            record_binary(tape, BinFamily::Zmul, self, rhs, new_value)
        );
        AD::new(tape_id, index, tag, new_value)
    }
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use crate::ad::ad_from_value;
    //
    #[test]
    fn constant_pow_azmul() {
        let ax = ad_from_value( 2f64 );
        let ay = ad_from_value( 10f64 );
        assert_eq!( ax.pow(&ay).to_value(), 1024.0 );
        //
        let zero = ad_from_value( 0f64 );
        let nan  = ad_from_value( f64::NAN );
        assert_eq!( zero.azmul(&nan).to_value(), 0.0 );
    }
}
