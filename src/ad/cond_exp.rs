// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Conditional expressions on `AD<V>` .
//!
//! Link to [parent module](super)
//!
//! A recording captures the operations that were executed; branches taken
//! during the recording are baked in. A conditional expression is the
//! data dependent selection that survives on the tape:
//! ```text
//!     az = cond_exp(cop, &aleft, &aright, &aif_true, &aif_false)
//! ```
//! evaluates, on every replay,
//! `if left cop right { if_true } else { if_false }` .
//! Taylor coefficients propagate from the selected branch only, and
//! reverse mode partials flow to the selected branch only.
// ---------------------------------------------------------------------------
// use
//
use num_enum::{IntoPrimitive, TryFromPrimitive};
//
use crate::ad::{AD, AdType};
use crate::float::FloatCore;
use crate::op::{
    DynOp, FLAG_FALSE_VAR, FLAG_LEFT_VAR, FLAG_RIGHT_VAR, FLAG_TRUE_VAR,
    OpCode,
};
use crate::tape::{IndexT, Tape, sealed::ThisThreadTape, with_tape};
// ---------------------------------------------------------------------------
//
// CompareOp
/// The comparison inside a conditional expression or recorded comparison.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
    Ne,
}
impl CompareOp {
    //
    /// evaluate this comparison on two values
    pub(crate) fn eval<V : FloatCore>(self, lhs : V, rhs : V) -> bool {
        match self {
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ne => lhs != rhs,
        }
    }
}
// ---------------------------------------------------------------------------
// cond_exp
/// The conditional expression operator; see [the module](self) .
///
/// # Example
/// ```
/// use adtape::{start_recording, stop_recording, cond_exp_lt};
/// // y = if x0 < x1 { x0 * x0 } else { x1 * x1 }
/// let ax    = start_recording( vec![ 2f64, 3f64 ] ).unwrap();
/// let at    = &ax[0] * &ax[0];
/// let af    = &ax[1] * &ax[1];
/// let ay    = vec![ cond_exp_lt(&ax[0], &ax[1], &at, &af) ];
/// let mut f = stop_recording(ay).unwrap();
/// //
/// assert_eq!( f.forward(0, vec![ 2.0, 3.0 ]).unwrap(), vec![ 4.0 ] );
/// assert_eq!( f.forward(0, vec![ 4.0, 3.0 ]).unwrap(), vec![ 9.0 ] );
/// ```
pub fn cond_exp<V>(
    cop      : CompareOp,
    left     : &AD<V>,
    right    : &AD<V>,
    if_true  : &AD<V>,
    if_false : &AD<V>,
) -> AD<V>
where
    V : FloatCore + ThisThreadTape,
{
    let new_value = if cop.eval( left.value, right.value ) {
        if_true.value
    } else {
        if_false.value
    };
    let (tape_id, index, tag) = with_tape( |tape : &mut Tape<V>| {
        record_cond_exp(tape, cop, left, right, if_true, if_false, new_value)
    } );
    AD::new(tape_id, index, tag, new_value)
}
//
// record_cond_exp
fn record_cond_exp<V : FloatCore>(
    tape      : &mut Tape<V>,
    cop       : CompareOp,
    left      : &AD<V>,
    right     : &AD<V>,
    if_true   : &AD<V>,
    if_false  : &AD<V>,
    new_value : V,
) -> (usize, IndexT, AdType) {
    if ! tape.recording {
        return (0, 0, AdType::Constant);
    }
    let classes = [
        tape.arg_class(left),
        tape.arg_class(right),
        tape.arg_class(if_true),
        tape.arg_class(if_false),
    ];
    let max_class = *classes.iter().max().unwrap();
    match max_class {
        AdType::Constant => (0, 0, AdType::Constant),
        AdType::Variable => {
            //
            // operand indices and variable flags
            let operands = [left, right, if_true, if_false];
            let var_flag = [
                FLAG_LEFT_VAR, FLAG_RIGHT_VAR, FLAG_TRUE_VAR, FLAG_FALSE_VAR,
            ];
            let mut flags : IndexT = 0;
            if cop.eval( left.value, right.value ) {
                flags |= crate::op::FLAG_CEXP_TRUE;
            }
            let mut index = [0 as IndexT; 4];
            for j in 0 .. 4 {
                index[j] = match classes[j] {
                    AdType::Variable => {
                        flags |= var_flag[j];
                        operands[j].index
                    }
                    AdType::Dynamic  => operands[j].index,
                    AdType::Constant =>
                        tape.par_constant( operands[j].value ),
                };
            }
            let res = tape.record_var_op(
                OpCode::CExp,
                &[
                    u8::from(cop) as IndexT, flags,
                    index[0], index[1], index[2], index[3],
                ],
            );
            (tape.tape_id, res, AdType::Variable)
        }
        AdType::Dynamic => {
            let operands = [left, right, if_true, if_false];
            let mut index = [0 as IndexT; 4];
            for j in 0 .. 4 {
                index[j] = if classes[j].is_dynamic() {
                    operands[j].index
                } else {
                    tape.par_constant( operands[j].value )
                };
            }
            let par = tape.new_dyn_par(
                new_value,
                DynOp::CExp,
                &[
                    u8::from(cop) as IndexT,
                    index[0], index[1], index[2], index[3],
                ],
            );
            (tape.tape_id, par, AdType::Dynamic)
        }
    }
}
// ---------------------------------------------------------------------------
// cond_exp_cop!
/// One comparison specific wrapper for [cond_exp] .
macro_rules! cond_exp_cop { ($name:ident, $Cop:ident) => {
    #[doc = concat!(
        "[cond_exp] with the `", stringify!($Cop), "` comparison"
    )]
    pub fn $name<V>(
        left     : &AD<V>,
        right    : &AD<V>,
        if_true  : &AD<V>,
        if_false : &AD<V>,
    ) -> AD<V>
    where
        V : FloatCore + ThisThreadTape,
    {
        cond_exp(CompareOp::$Cop, left, right, if_true, if_false)
    }
} }
//
cond_exp_cop!(cond_exp_lt, Lt);
cond_exp_cop!(cond_exp_le, Le);
cond_exp_cop!(cond_exp_eq, Eq);
cond_exp_cop!(cond_exp_ge, Ge);
cond_exp_cop!(cond_exp_gt, Gt);
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad::ad_from_value;
    //
    #[test]
    fn constant_cond_exp() {
        let a2 = ad_from_value( 2f64 );
        let a3 = ad_from_value( 3f64 );
        let az = cond_exp_lt(&a2, &a3, &a2, &a3);
        assert_eq!( az.to_value(), 2.0 );
        let az = cond_exp_ge(&a2, &a3, &a2, &a3);
        assert_eq!( az.to_value(), 3.0 );
    }
}
