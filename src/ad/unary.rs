// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Unary elementary functions on `AD<V>` .
//!
//! Link to [parent module](super)
//!
//! Each method evaluates the corresponding [FloatCore] function on the
//! value and, when the operand is a variable (dynamic parameter), records
//! one variable (dynamic parameter) operator. Operators whose higher
//! order derivatives need a companion value, for example `sin` needing
//! `cos` , record an auxiliary result variable just before the primary
//! result.
// ---------------------------------------------------------------------------
// use
//
use crate::ad::{AD, AdType};
use crate::float::FloatCore;
use crate::op::{DynOp, OpCode};
use crate::tape::{IndexT, Tape, sealed::ThisThreadTape, with_tape};
// ---------------------------------------------------------------------------
// record_unary
/// Record one unary operation and return the stamp for its result.
pub(crate) fn record_unary<V : FloatCore>(
    tape      : &mut Tape<V>,
    op        : OpCode,
    dyn_op    : DynOp,
    operand   : &AD<V>,
    new_value : V,
) -> (usize, IndexT, AdType) {
    if ! tape.recording {
        return (0, 0, AdType::Constant);
    }
    match tape.arg_class(operand) {
        AdType::Constant => (0, 0, AdType::Constant),
        AdType::Variable => {
            let res = tape.record_var_op( op, &[ operand.index ] );
            (tape.tape_id, res, AdType::Variable)
        }
        AdType::Dynamic => {
            let index =
                tape.new_dyn_par( new_value, dyn_op, &[ operand.index ] );
            (tape.tape_id, index, AdType::Dynamic)
        }
    }
}
// ---------------------------------------------------------------------------
// ad_unary_fn!
/// Implement one unary elementary function for the `AD<V>` class.
///
/// * name : the method (and [FloatCore] function) name.
/// * Op   : the operator variant name, in both OpCode and DynOp.
macro_rules! ad_unary_fn { ($name:ident, $Op:ident) => {
    #[doc = concat!(
        "`AD<V>` version of [FloatCore::", stringify!($name), "]"
    )]
    pub fn $name(&self) -> AD<V> {
        let new_value = self.value.$name();
        let (tape_id, index, tag) = with_tape( |tape : &mut Tape<V>|
            record_unary(tape, OpCode::$Op, DynOp::$Op, self, new_value)
        );
        AD::new(tape_id, index, tag, new_value)
    }
} }
//
impl<V> AD<V>
where
    V : FloatCore + ThisThreadTape,
{
    ad_unary_fn!(abs,    Abs);
    ad_unary_fn!(signum, Sign);
    ad_unary_fn!(sqrt,   Sqrt);
    ad_unary_fn!(exp,    Exp);
    ad_unary_fn!(exp_m1, Expm1);
    ad_unary_fn!(ln,     Log);
    ad_unary_fn!(ln_1p,  Log1p);
    ad_unary_fn!(sin,    Sin);
    ad_unary_fn!(cos,    Cos);
    ad_unary_fn!(tan,    Tan);
    ad_unary_fn!(sinh,   Sinh);
    ad_unary_fn!(cosh,   Cosh);
    ad_unary_fn!(tanh,   Tanh);
    ad_unary_fn!(asin,   Asin);
    ad_unary_fn!(acos,   Acos);
    ad_unary_fn!(atan,   Atan);
    ad_unary_fn!(asinh,  Asinh);
    ad_unary_fn!(acosh,  Acosh);
    ad_unary_fn!(atanh,  Atanh);
    ad_unary_fn!(erf,    Erf);
    ad_unary_fn!(erfc,   Erfc);
}
// ---------------------------------------------------------------------------
// Neg
/// `- &AD<V>` records the negation operator.
impl<V> std::ops::Neg for &AD<V>
where
    V : FloatCore + ThisThreadTape,
{   type Output = AD<V>;
    //
    fn neg(self) -> AD<V> {
        let new_value = -self.value;
        let (tape_id, index, tag) = with_tape( |tape : &mut Tape<V>|
            record_unary(tape, OpCode::Neg, DynOp::Neg, self, new_value)
        );
        AD::new(tape_id, index, tag, new_value)
    }
}
/// `- AD<V>` records the negation operator.
impl<V> std::ops::Neg for AD<V>
where
    V : FloatCore + ThisThreadTape,
{   type Output = AD<V>;
    //
    fn neg(self) -> AD<V> {
        -&self
    }
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use crate::ad::ad_from_value;
    //
    #[test]
    fn constant_unary() {
        let ax = ad_from_value( 0.5f64 );
        assert_eq!( ax.sin().to_value(), 0.5f64.sin() );
        assert_eq!( ax.exp().to_value(), 0.5f64.exp() );
        assert_eq!( (-&ax).to_value(), -0.5 );
        assert_eq!( ax.signum().to_value(), 1.0 );
    }
}
