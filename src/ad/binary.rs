// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Binary `AD<V>` operators.
//!
//! Link to [parent module](super)
//!
//! * Syntax :
//! ```text
//!     az = &ax Op &ay
//!     az = &ax Op &y
//!     az = &x  Op &ay
//! ```
//! where *Op* is one of `+` , `-` , `*` , `/` , together with the
//! by value and compound assignment forms. The absorbing multiplication
//! and power families live in [pow](super::pow).
//!
//! A result that depends on a variable emits one variable operator with
//! the `_pv` / `_vp` / `_vv` variant chosen by the operand classes;
//! a result whose operands are all parameters, at least one dynamic,
//! emits one dynamic parameter operator; a result with constant operands
//! emits nothing. The following simplifications are applied when the
//! tested operand is a constant, without recording:
//! `0 + x` , `x + 0` , `x - 0` , `0 * x` , `x * 0` , `1 * x` , `x * 1` ,
//! `x / 1` .
// ---------------------------------------------------------------------------
// use
//
use crate::ad::{AD, AdType};
use crate::float::FloatCore;
use crate::op::{DynOp, OpCode};
use crate::tape::{IndexT, Tape, sealed::ThisThreadTape, with_tape};
// ---------------------------------------------------------------------------
//
// BinFamily
/// The binary operator families on `AD<V>` .
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinFamily {
    Add,
    Sub,
    Mul,
    Div,
    Zmul,
    Pow,
}
// ---------------------------------------------------------------------------
// stamp_of
/// The (tape_id, index, tag) stamp that re-uses an operand as the result.
fn stamp_of<V>(
    tape  : &Tape<V>,
    ad    : &AD<V>,
    class : AdType,
) -> (usize, IndexT, AdType) {
    if class.is_constant() {
        (0, 0, AdType::Constant)
    } else {
        (tape.tape_id, ad.index, class)
    }
}
//
// par_of
/// Parameter pool index for a parameter class operand.
fn par_of<V : FloatCore>(
    tape  : &mut Tape<V>,
    ad    : &AD<V>,
    class : AdType,
) -> IndexT {
    debug_assert!( ! class.is_variable() );
    if class.is_dynamic() {
        ad.index
    } else {
        tape.par_constant( ad.value )
    }
}
// ---------------------------------------------------------------------------
// record_binary
/// Record one binary operation and return the stamp for its result.
pub(crate) fn record_binary<V : FloatCore>(
    tape      : &mut Tape<V>,
    fam       : BinFamily,
    lhs       : &AD<V>,
    rhs       : &AD<V>,
    new_value : V,
) -> (usize, IndexT, AdType) {
    let constant = (0, 0, AdType::Constant);
    if ! tape.recording {
        return constant;
    }
    //
    // lhs_class, rhs_class
    let lhs_class = tape.arg_class(lhs);
    let rhs_class = tape.arg_class(rhs);
    if lhs_class.is_constant() && rhs_class.is_constant() {
        return constant;
    }
    //
    // simplifications
    match fam {
        BinFamily::Add => {
            if lhs_class.is_constant() && lhs.value.identical_zero() {
                return stamp_of(tape, rhs, rhs_class);
            }
            if rhs_class.is_constant() && rhs.value.identical_zero() {
                return stamp_of(tape, lhs, lhs_class);
            }
        }
        BinFamily::Sub => {
            if rhs_class.is_constant() && rhs.value.identical_zero() {
                return stamp_of(tape, lhs, lhs_class);
            }
        }
        BinFamily::Mul => {
            if lhs_class.is_constant() {
                if lhs.value.identical_zero() {
                    return constant;
                }
                if lhs.value.identical_one() {
                    return stamp_of(tape, rhs, rhs_class);
                }
            }
            if rhs_class.is_constant() {
                if rhs.value.identical_zero() {
                    return constant;
                }
                if rhs.value.identical_one() {
                    return stamp_of(tape, lhs, lhs_class);
                }
            }
        }
        BinFamily::Div => {
            if rhs_class.is_constant() && rhs.value.identical_one() {
                return stamp_of(tape, lhs, lhs_class);
            }
        }
        BinFamily::Zmul => {
            // the left operand of azmul absorbs, even for a nan right
            if lhs_class.is_constant() && lhs.value.identical_zero() {
                return constant;
            }
        }
        BinFamily::Pow => (),
    }
    //
    let lhs_var = lhs_class.is_variable();
    let rhs_var = rhs_class.is_variable();
    if lhs_var || rhs_var {
        //
        // variable result
        let (op, arg_0, arg_1) = match (fam, lhs_var, rhs_var) {
            //
            // add and mul commute: canonicalize to the pv variant
            (BinFamily::Add, true, true) =>
                (OpCode::AddVv, lhs.index, rhs.index),
            (BinFamily::Add, true, false) =>
                (OpCode::AddPv, par_of(tape, rhs, rhs_class), lhs.index),
            (BinFamily::Add, false, true) =>
                (OpCode::AddPv, par_of(tape, lhs, lhs_class), rhs.index),
            //
            (BinFamily::Sub, true, true) =>
                (OpCode::SubVv, lhs.index, rhs.index),
            (BinFamily::Sub, true, false) =>
                (OpCode::SubVp, lhs.index, par_of(tape, rhs, rhs_class)),
            (BinFamily::Sub, false, true) =>
                (OpCode::SubPv, par_of(tape, lhs, lhs_class), rhs.index),
            //
            (BinFamily::Mul, true, true) =>
                (OpCode::MulVv, lhs.index, rhs.index),
            (BinFamily::Mul, true, false) =>
                (OpCode::MulPv, par_of(tape, rhs, rhs_class), lhs.index),
            (BinFamily::Mul, false, true) =>
                (OpCode::MulPv, par_of(tape, lhs, lhs_class), rhs.index),
            //
            (BinFamily::Div, true, true) =>
                (OpCode::DivVv, lhs.index, rhs.index),
            (BinFamily::Div, true, false) =>
                (OpCode::DivVp, lhs.index, par_of(tape, rhs, rhs_class)),
            (BinFamily::Div, false, true) =>
                (OpCode::DivPv, par_of(tape, lhs, lhs_class), rhs.index),
            //
            (BinFamily::Zmul, true, true) =>
                (OpCode::ZmulVv, lhs.index, rhs.index),
            (BinFamily::Zmul, true, false) =>
                (OpCode::ZmulVp, lhs.index, par_of(tape, rhs, rhs_class)),
            (BinFamily::Zmul, false, true) =>
                (OpCode::ZmulPv, par_of(tape, lhs, lhs_class), rhs.index),
            //
            (BinFamily::Pow, true, true) =>
                (OpCode::PowVv, lhs.index, rhs.index),
            (BinFamily::Pow, true, false) =>
                (OpCode::PowVp, lhs.index, par_of(tape, rhs, rhs_class)),
            (BinFamily::Pow, false, true) =>
                (OpCode::PowPv, par_of(tape, lhs, lhs_class), rhs.index),
            //
            _ => unreachable!(),
        };
        let res = tape.record_var_op( op, &[arg_0, arg_1] );
        return (tape.tape_id, res, AdType::Variable);
    }
    //
    // dynamic parameter result
    let arg_0 = par_of(tape, lhs, lhs_class);
    let arg_1 = par_of(tape, rhs, rhs_class);
    let dyn_op = match fam {
        BinFamily::Add  => DynOp::Add,
        BinFamily::Sub  => DynOp::Sub,
        BinFamily::Mul  => DynOp::Mul,
        BinFamily::Div  => DynOp::Div,
        BinFamily::Zmul => DynOp::Zmul,
        BinFamily::Pow  => DynOp::Pow,
    };
    let index = tape.new_dyn_par( new_value, dyn_op, &[arg_0, arg_1] );
    (tape.tape_id, index, AdType::Dynamic)
}
// ---------------------------------------------------------------------------
// ad_binary_op!
/// Implement one binary operator for the `AD<V>` class.
///
/// * Name : the std::ops trait name; i.e., Add, Sub, Mul, or Div.
/// * Op   : the operator token; i.e., +, -, *, or /.
macro_rules! ad_binary_op { ($Name:ident, $Op:tt) => { paste::paste! {
    //
    #[doc = concat!(
        "`&AD<V> ", stringify!($Op), " &AD<V>`; see [the module](self)"
    )]
    impl<V> std::ops::$Name< &AD<V> > for &AD<V>
    where
        V : FloatCore + ThisThreadTape,
    {   type Output = AD<V>;
        //
        fn [< $Name:lower >](self, rhs : &AD<V>) -> AD<V> {
            let new_value = self.value $Op rhs.value;
            let (tape_id, index, tag) = with_tape( |tape : &mut Tape<V>|
                record_binary(tape, BinFamily::$Name, self, rhs, new_value)
            );
            AD::new(tape_id, index, tag, new_value)
        }
    }
    //
    #[doc = concat!(
        "`AD<V> ", stringify!($Op), " AD<V>`; see [the module](self)"
    )]
    impl<V> std::ops::$Name< AD<V> > for AD<V>
    where
        V : FloatCore + ThisThreadTape,
    {   type Output = AD<V>;
        //
        fn [< $Name:lower >](self, rhs : AD<V>) -> AD<V> {
            &self $Op &rhs
        }
    }
    //
    #[doc = concat!(
        "`&AD<V> ", stringify!($Op), " &V`; see [the module](self)"
    )]
    impl<V> std::ops::$Name< &V > for &AD<V>
    where
        V : FloatCore + ThisThreadTape,
    {   type Output = AD<V>;
        //
        fn [< $Name:lower >](self, rhs : &V) -> AD<V> {
            self $Op &AD::constant(*rhs)
        }
    }
    //
    #[doc = concat!(
        "`AD<V> ", stringify!($Op), " V`; see [the module](self)"
    )]
    impl<V> std::ops::$Name< V > for AD<V>
    where
        V : FloatCore + ThisThreadTape,
    {   type Output = AD<V>;
        //
        fn [< $Name:lower >](self, rhs : V) -> AD<V> {
            &self $Op &AD::constant(rhs)
        }
    }
    //
    #[doc = concat!(
        "`AD<V> ", stringify!($Op), "= &AD<V>`; see [the module](self)"
    )]
    impl<V> std::ops::[< $Name Assign >] < &AD<V> > for AD<V>
    where
        V : FloatCore + ThisThreadTape,
    {   //
        fn [< $Name:lower _assign >](&mut self, rhs : &AD<V>) {
            *self = &*self $Op rhs;
        }
    }
    //
    #[doc = concat!(
        "`AD<V> ", stringify!($Op), "= AD<V>`; see [the module](self)"
    )]
    impl<V> std::ops::[< $Name Assign >] < AD<V> > for AD<V>
    where
        V : FloatCore + ThisThreadTape,
    {   //
        fn [< $Name:lower _assign >](&mut self, rhs : AD<V>) {
            *self = &*self $Op &rhs;
        }
    }
    //
    #[doc = concat!(
        "`AD<V> ", stringify!($Op), "= &V`; see [the module](self)"
    )]
    impl<V> std::ops::[< $Name Assign >] < &V > for AD<V>
    where
        V : FloatCore + ThisThreadTape,
    {   //
        fn [< $Name:lower _assign >](&mut self, rhs : &V) {
            *self = &*self $Op &AD::constant(*rhs);
        }
    }
} } }
//
ad_binary_op!(Add, +);
ad_binary_op!(Sub, -);
ad_binary_op!(Mul, *);
ad_binary_op!(Div, /);
// ---------------------------------------------------------------------------
// impl_value_op_ad!
//
// If you try to make this implementation generic w.r.t. V, you get a
// message saying that f32 and f64 must be covered because they are not
// local types.
//
/// Implement the binary operators whose left hand side is a *V* object,
/// for one concrete value type.
macro_rules! impl_value_op_ad{
    ($V:ty) => {
        impl_value_op_ad!($V, Add, +);
        impl_value_op_ad!($V, Sub, -);
        impl_value_op_ad!($V, Mul, *);
        impl_value_op_ad!($V, Div, /);
    };
    ($V:ty, $Name:ident, $Op:tt) => { paste::paste! {
        #[doc = concat!(
            "`&", stringify!($V), " ", stringify!($Op),
            " &AD<", stringify!($V), ">`; see [the module](self)"
        )]
        impl std::ops::$Name< &AD<$V> > for &$V {
            type Output = AD<$V>;
            //
            fn [< $Name:lower >](self, rhs : &AD<$V>) -> AD<$V> {
                &AD::constant(*self) $Op rhs
            }
        }
        #[doc = concat!(
            "`", stringify!($V), " ", stringify!($Op),
            " AD<", stringify!($V), ">`; see [the module](self)"
        )]
        impl std::ops::$Name< AD<$V> > for $V {
            type Output = AD<$V>;
            //
            fn [< $Name:lower >](self, rhs : AD<$V>) -> AD<$V> {
                &AD::constant(self) $Op &rhs
            }
        }
    } }
}
impl_value_op_ad!(f32);
impl_value_op_ad!(f64);
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use crate::ad::ad_from_value;
    //
    #[test]
    fn constant_arithmetic() {
        let ax = ad_from_value( 3f64 );
        let ay = ad_from_value( 4f64 );
        assert_eq!( (&ax + &ay).to_value(), 7.0 );
        assert_eq!( (&ax - &ay).to_value(), -1.0 );
        assert_eq!( (&ax * &ay).to_value(), 12.0 );
        assert_eq!( (&ax / &ay).to_value(), 0.75 );
        //
        let mut az = ax;
        az += &ay;
        assert_eq!( az.to_value(), 7.0 );
        //
        let aw = 2f64 * (&ax * &2f64);
        assert_eq!( aw.to_value(), 12.0 );
    }
}
