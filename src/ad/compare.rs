// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Recorded comparisons on `AD<V>` .
//!
//! Link to [parent module](super)
//!
//! Each comparison is evaluated on the values and returns a bool. When an
//! operand is a variable, the comparison and its boolean outcome are also
//! recorded, so that a later zero order forward evaluation can report how
//! many recorded outcomes would change at its argument point; see
//! [ADFun::compare_change_count](crate::ADFun::compare_change_count) .
// ---------------------------------------------------------------------------
// use
//
use crate::ad::AD;
use crate::ad::cond_exp::CompareOp;
use crate::float::FloatCore;
use crate::op::{FLAG_CMP_TRUE, FLAG_LEFT_VAR, FLAG_RIGHT_VAR, OpCode};
use crate::tape::{IndexT, Tape, sealed::ThisThreadTape, with_tape};
// ---------------------------------------------------------------------------
// record_compare
/// Record one comparison with the given outcome.
fn record_compare<V : FloatCore>(
    tape    : &mut Tape<V>,
    cop     : CompareOp,
    lhs     : &AD<V>,
    rhs     : &AD<V>,
    outcome : bool,
) {
    if ! tape.recording {
        return;
    }
    let lhs_class = tape.arg_class(lhs);
    let rhs_class = tape.arg_class(rhs);
    if ! ( lhs_class.is_variable() || rhs_class.is_variable() ) {
        return;
    }
    let mut flags : IndexT = 0;
    if outcome {
        flags |= FLAG_CMP_TRUE;
    }
    let lhs_index = if lhs_class.is_variable() {
        flags |= FLAG_LEFT_VAR;
        lhs.index
    } else if lhs_class.is_dynamic() {
        lhs.index
    } else {
        tape.par_constant( lhs.value )
    };
    let rhs_index = if rhs_class.is_variable() {
        flags |= FLAG_RIGHT_VAR;
        rhs.index
    } else if rhs_class.is_dynamic() {
        rhs.index
    } else {
        tape.par_constant( rhs.value )
    };
    tape.record_var_op(
        OpCode::Cmp,
        &[ u8::from(cop) as IndexT, flags, lhs_index, rhs_index ],
    );
}
// ---------------------------------------------------------------------------
// ad_compare!
/// Implement one recorded comparison for the `AD<V>` class.
macro_rules! ad_compare { ($name:ident, $Cop:ident) => {
    #[doc = concat!(
        "recorded `", stringify!($name), "` comparison; see ",
        "[the module](self)"
    )]
    pub fn $name(&self, rhs : &AD<V>) -> bool {
        let outcome = CompareOp::$Cop.eval( self.value, rhs.value );
        with_tape( |tape : &mut Tape<V>|
            record_compare(tape, CompareOp::$Cop, self, rhs, outcome)
        );
        outcome
    }
} }
//
impl<V> AD<V>
where
    V : FloatCore + ThisThreadTape,
{
    ad_compare!(lt, Lt);
    ad_compare!(le, Le);
    ad_compare!(eq, Eq);
    ad_compare!(ge, Ge);
    ad_compare!(gt, Gt);
    ad_compare!(ne, Ne);
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use crate::ad::ad_from_value;
    //
    #[test]
    fn constant_compare() {
        let ax = ad_from_value( 3f64 );
        let ay = ad_from_value( 4f64 );
        assert!(   ax.lt(&ay) );
        assert!(   ax.le(&ay) );
        assert!( ! ax.eq(&ay) );
        assert!(   ax.ne(&ay) );
        assert!( ! ax.ge(&ay) );
        assert!( ! ax.gt(&ay) );
    }
}
