// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub(crate) module defines the operator taxonomy and the kernels
//! used to evaluate an operation sequence.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// sub-modules
//
pub mod arith;
pub mod unary;
pub mod pow;
pub mod special;
//
use num_enum::{IntoPrimitive, TryFromPrimitive};
//
use crate::tape::IndexT;
// ---------------------------------------------------------------------------
//
// OpCode
/// Identifies one operator in a variable operation sequence.
///
/// The suffix on a binary operator identifies the class of its operands:
/// `Pv` is parameter op variable, `Vp` is variable op parameter, and
/// `Vv` is variable op variable.
/// Addition and multiplication commute and canonicalize to `Pv` .
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum OpCode {
    //
    // structural
    /// start of the operation sequence; reserves variable index zero
    Begin,
    /// end of the operation sequence
    End,
    /// declares one independent variable
    Inv,
    /// copies a parameter into a variable slot; arg = \[par\]
    Par,
    /// print during zero order forward; see [special] for the arguments
    Pri,
    /// conditional skip; see [special] for the arguments
    CSkip,
    /// cumulative summation; see [special] for the arguments
    CSum,
    //
    // add
    AddPv,
    AddVv,
    //
    // sub
    SubPv,
    SubVp,
    SubVv,
    //
    // mul
    MulPv,
    MulVv,
    //
    // div
    DivPv,
    DivVp,
    DivVv,
    //
    // zmul: absorbing multiplication, zero times nan is zero
    ZmulPv,
    ZmulVp,
    ZmulVv,
    //
    // pow
    PowPv,
    PowVp,
    /// variable to a variable power; three results:
    /// log(x), log(x)*y, exp( log(x)*y )
    PowVv,
    //
    // unary, one result; arg = [var]
    Abs,
    Neg,
    Sign,
    Sqrt,
    Exp,
    Expm1,
    Log,
    Log1p,
    //
    // unary, auxiliary result before the primary result; arg = [var]
    Sin,
    Cos,
    Sinh,
    Cosh,
    Tan,
    Tanh,
    Asin,
    Acos,
    Atan,
    Asinh,
    Acosh,
    Atanh,
    Erf,
    Erfc,
    //
    /// recorded comparison; no result;
    /// arg = \[compare_op, flags, left, right\]
    Cmp,
    //
    /// conditional expression;
    /// arg = \[compare_op, flags, left, right, if_true, if_false\]
    CExp,
    //
    /// discrete function call; arg = \[dis_id, var\]
    Dis,
    //
    // VecAD
    /// load with a parameter index; arg = \[vec_id, par, load_slot\]
    Ldp,
    /// load with a variable index; arg = \[vec_id, var, load_slot\]
    Ldv,
    /// store, parameter index and parameter value
    Stpp,
    /// store, parameter index and variable value
    Stpv,
    /// store, variable index and parameter value
    Stvp,
    /// store, variable index and variable value
    Stvv,
    //
    // atomic call block
    /// start of an atomic call block; arg = \[atom_id, call_id, n, m\]
    Call,
    /// one variable argument for the current call; arg = \[var\]
    CallArgV,
    /// one parameter argument for the current call; arg = \[par\]
    CallArgP,
    /// one variable result for the current call; no arguments
    CallResV,
    /// one parameter result for the current call; arg = \[par\]
    CallResP,
    /// end of an atomic call block
    CallEnd,
}
// ---------------------------------------------------------------------------
//
// DynOp
/// Identifies one operator in the dynamic parameter operation sequence.
///
/// All operands are parameter indices. Each operator writes one dependent
/// dynamic parameter.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum DynOp {
    Add,
    Sub,
    Mul,
    Div,
    Zmul,
    Pow,
    //
    Abs,
    Neg,
    Sign,
    Sqrt,
    Exp,
    Expm1,
    Log,
    Log1p,
    Sin,
    Cos,
    Sinh,
    Cosh,
    Tan,
    Tanh,
    Asin,
    Acos,
    Atan,
    Asinh,
    Acosh,
    Atanh,
    Erf,
    Erfc,
    //
    /// arg = \[compare_op, left, right, if_true, if_false\]
    CExp,
    //
    /// arg = \[dis_id, par\]
    Dis,
}
// ---------------------------------------------------------------------------
// flag bits
//
/// flag bit: the left operand (or position for Pri) is a variable
pub(crate) const FLAG_LEFT_VAR  : IndexT = 1;
/// flag bit: the right operand (or printed value for Pri) is a variable
pub(crate) const FLAG_RIGHT_VAR : IndexT = 2;
/// flag bit: the recorded result of a Cmp operator was true
pub(crate) const FLAG_CMP_TRUE  : IndexT = 4;
/// flag bit: the if_true operand of a CExp operator is a variable
pub(crate) const FLAG_TRUE_VAR  : IndexT = 4;
/// flag bit: the if_false operand of a CExp operator is a variable
pub(crate) const FLAG_FALSE_VAR : IndexT = 8;
/// flag bit: the recorded comparison of a CExp operator was true
pub(crate) const FLAG_CEXP_TRUE : IndexT = 16;
//
// CSum layout
/// CSum argument index of the constant base parameter
pub(crate) const CSUM_BASE      : usize = 0;
/// CSum argument index of the end of the addition variables
pub(crate) const CSUM_END_ADD_VAR : usize = 1;
/// CSum argument index of the end of the subtraction variables
pub(crate) const CSUM_END_SUB_VAR : usize = 2;
/// CSum argument index of the end of the addition dynamic parameters
pub(crate) const CSUM_END_ADD_DYN : usize = 3;
/// CSum argument index of the end of the subtraction dynamic parameters
pub(crate) const CSUM_END_SUB_DYN : usize = 4;
/// CSum argument index of the first summand
pub(crate) const CSUM_BEGIN     : usize = 5;
//
// CSkip layout
/// CSkip argument index of the number of operators skipped when true
pub(crate) const CSKIP_N_TRUE   : usize = 4;
/// CSkip argument index of the number of operators skipped when false
pub(crate) const CSKIP_N_FALSE  : usize = 5;
/// CSkip argument index of the first skipped operator index
pub(crate) const CSKIP_BEGIN    : usize = 6;
// ---------------------------------------------------------------------------
//
// n_res
/// Number of result variables created by this operator.
pub(crate) fn n_res(op : OpCode) -> usize {
    use OpCode::*;
    match op {
        Begin | Inv | Par | CSum | CExp | Dis | Ldp | Ldv | CallResV => 1,
        //
        AddPv | AddVv | SubPv | SubVp | SubVv | MulPv | MulVv | DivPv
        | DivVp | DivVv | ZmulPv | ZmulVp | ZmulVv | PowPv | PowVp => 1,
        //
        Abs | Neg | Sign | Sqrt | Exp | Expm1 | Log | Log1p => 1,
        //
        Sin | Cos | Sinh | Cosh | Tan | Tanh | Asin | Acos | Atan | Asinh
        | Acosh | Atanh | Erf | Erfc => 2,
        //
        PowVv => 3,
        //
        End | Pri | CSkip | Cmp | Stpp | Stpv | Stvp | Stvv | Call
        | CallArgV | CallArgP | CallResP | CallEnd => 0,
    }
}
//
// is_binary
/// True for the fixed two argument arithmetic operators.
pub(crate) fn is_binary(op : OpCode) -> bool {
    use OpCode::*;
    matches!(op,
        AddPv | AddVv | SubPv | SubVp | SubVv | MulPv | MulVv | DivPv
        | DivVp | DivVv | ZmulPv | ZmulVp | ZmulVv | PowPv | PowVp | PowVv
    )
}
//
// is_unary
/// True for the one variable argument elementary operators.
pub(crate) fn is_unary(op : OpCode) -> bool {
    use OpCode::*;
    matches!(op,
        Abs | Neg | Sign | Sqrt | Exp | Expm1 | Log | Log1p | Sin | Cos
        | Sinh | Cosh | Tan | Tanh | Asin | Acos | Atan | Asinh | Acosh
        | Atanh | Erf | Erfc
    )
}
//
// has_side_effect
/// True for operators that must be kept even when no result is used.
pub(crate) fn has_side_effect(op : OpCode) -> bool {
    use OpCode::*;
    matches!(op,
        Begin | End | Inv | Pri | Cmp | Stpp | Stpv | Stvp | Stvv
    )
}
//
// binary_var_flags
/// For a binary operator, (left operand is a variable,
/// right operand is a variable).
pub(crate) fn binary_var_flags(op : OpCode) -> (bool, bool) {
    use OpCode::*;
    match op {
        AddPv | SubPv | MulPv | DivPv | ZmulPv | PowPv => (false, true),
        SubVp | DivVp | ZmulVp | PowVp                 => (true, false),
        AddVv | SubVv | MulVv | DivVv | ZmulVv | PowVv => (true, true),
        _ => panic!( "binary_var_flags: {op:?} is not a binary operator" ),
    }
}
//
// append_var_args
/// Append the variable indices among this operator's arguments to out.
///
/// The atomic call block operators are handled per sub-operator; a Call
/// operator itself contributes nothing.
pub(crate) fn append_var_args(
    op  : OpCode,
    arg : &[IndexT],
    out : &mut Vec<IndexT>,
) {
    use OpCode::*;
    if is_binary(op) {
        let (lhs_var, rhs_var) = binary_var_flags(op);
        if lhs_var {
            out.push( arg[0] );
        }
        if rhs_var {
            out.push( arg[1] );
        }
        return;
    }
    if is_unary(op) {
        out.push( arg[0] );
        return;
    }
    match op {
        Cmp => {
            let flags = arg[1];
            if flags & FLAG_LEFT_VAR != 0 {
                out.push( arg[2] );
            }
            if flags & FLAG_RIGHT_VAR != 0 {
                out.push( arg[3] );
            }
        }
        Pri => {
            let flags = arg[0];
            if flags & FLAG_LEFT_VAR != 0 {
                out.push( arg[1] );
            }
            if flags & FLAG_RIGHT_VAR != 0 {
                out.push( arg[2] );
            }
        }
        CExp => {
            let flags = arg[1];
            if flags & FLAG_LEFT_VAR != 0 {
                out.push( arg[2] );
            }
            if flags & FLAG_RIGHT_VAR != 0 {
                out.push( arg[3] );
            }
            if flags & FLAG_TRUE_VAR != 0 {
                out.push( arg[4] );
            }
            if flags & FLAG_FALSE_VAR != 0 {
                out.push( arg[5] );
            }
        }
        CSum => {
            // addition variables then subtraction variables
            let end_sub = arg[CSUM_END_SUB_VAR] as usize;
            for i in CSUM_BEGIN .. end_sub {
                out.push( arg[i] );
            }
        }
        CSkip => {
            let flags = arg[1];
            if flags & FLAG_LEFT_VAR != 0 {
                out.push( arg[2] );
            }
            if flags & FLAG_RIGHT_VAR != 0 {
                out.push( arg[3] );
            }
        }
        Dis => out.push( arg[1] ),
        Ldv => out.push( arg[1] ),
        Stvp => out.push( arg[1] ),
        Stpv => out.push( arg[2] ),
        Stvv => {
            out.push( arg[1] );
            out.push( arg[2] );
        }
        CallArgV => out.push( arg[0] ),
        _ => (),
    }
}
//
// par_arg_positions
/// Append the positions, in this operator's argument slice, that hold
/// parameter pool indices.
pub(crate) fn par_arg_positions(
    op  : OpCode,
    arg : &[IndexT],
    out : &mut Vec<usize>,
) {
    use OpCode::*;
    match op {
        AddPv | SubPv | MulPv | DivPv | ZmulPv | PowPv => out.push(0),
        SubVp | DivVp | ZmulVp | PowVp                 => out.push(1),
        Par | CallArgP | CallResP                      => out.push(0),
        Cmp | CSkip => {
            if arg[1] & FLAG_LEFT_VAR == 0 {
                out.push(2);
            }
            if arg[1] & FLAG_RIGHT_VAR == 0 {
                out.push(3);
            }
        }
        Pri => {
            if arg[0] & FLAG_LEFT_VAR == 0 {
                out.push(1);
            }
            if arg[0] & FLAG_RIGHT_VAR == 0 {
                out.push(2);
            }
        }
        CExp => {
            let flags = arg[1];
            if flags & FLAG_LEFT_VAR == 0 {
                out.push(2);
            }
            if flags & FLAG_RIGHT_VAR == 0 {
                out.push(3);
            }
            if flags & FLAG_TRUE_VAR == 0 {
                out.push(4);
            }
            if flags & FLAG_FALSE_VAR == 0 {
                out.push(5);
            }
        }
        CSum => {
            out.push( CSUM_BASE );
            let end_sub_var = arg[CSUM_END_SUB_VAR] as usize;
            let end_sub_dyn = arg[CSUM_END_SUB_DYN] as usize;
            for i in end_sub_var .. end_sub_dyn {
                out.push(i);
            }
        }
        Ldp  => out.push(1),
        Stpp => {
            out.push(1);
            out.push(2);
        }
        Stpv => out.push(1),
        Stvp => out.push(2),
        _ => (),
    }
}
//
// var_arg_positions
/// Append the positions, in this operator's argument slice, that hold
/// variable indices.
pub(crate) fn var_arg_positions(
    op  : OpCode,
    arg : &[IndexT],
    out : &mut Vec<usize>,
) {
    use OpCode::*;
    if is_binary(op) {
        let (lhs_var, rhs_var) = binary_var_flags(op);
        if lhs_var {
            out.push(0);
        }
        if rhs_var {
            out.push(1);
        }
        return;
    }
    if is_unary(op) {
        out.push(0);
        return;
    }
    match op {
        Cmp | CSkip => {
            if arg[1] & FLAG_LEFT_VAR != 0 {
                out.push(2);
            }
            if arg[1] & FLAG_RIGHT_VAR != 0 {
                out.push(3);
            }
        }
        Pri => {
            if arg[0] & FLAG_LEFT_VAR != 0 {
                out.push(1);
            }
            if arg[0] & FLAG_RIGHT_VAR != 0 {
                out.push(2);
            }
        }
        CExp => {
            let flags = arg[1];
            if flags & FLAG_LEFT_VAR != 0 {
                out.push(2);
            }
            if flags & FLAG_RIGHT_VAR != 0 {
                out.push(3);
            }
            if flags & FLAG_TRUE_VAR != 0 {
                out.push(4);
            }
            if flags & FLAG_FALSE_VAR != 0 {
                out.push(5);
            }
        }
        CSum => {
            let end_sub_var = arg[CSUM_END_SUB_VAR] as usize;
            for i in CSUM_BEGIN .. end_sub_var {
                out.push(i);
            }
        }
        Dis  => out.push(1),
        Ldv  => out.push(1),
        Stpv => out.push(2),
        Stvp => out.push(1),
        Stvv => {
            out.push(1);
            out.push(2);
        }
        CallArgV => out.push(0),
        _ => (),
    }
}
// ---------------------------------------------------------------------------
//
// CallBlock
/// One parsed atomic call block.
pub(crate) struct CallBlock {
    /// atomic function identifier
    pub atom_id  : usize,
    /// extra information for this call
    pub call_id  : IndexT,
    /// number of arguments
    pub n        : usize,
    /// number of results
    pub m        : usize,
    /// for each argument, (is a variable, variable or parameter index)
    pub args     : Vec<(bool, IndexT)>,
    /// for each result, its variable index (None for parameter results)
    pub results  : Vec< Option<usize> >,
    /// operator index of the closing CallEnd
    pub end      : usize,
    /// first variable index past this block
    pub next_var : usize,
}
//
// parse_call_block
/// Parse the atomic call block whose Call operator is at i_op, with i_z
/// the first variable index allocated by the block.
pub(crate) fn parse_call_block(
    var  : &crate::tape::OpSequence<OpCode>,
    i_op : usize,
    i_z  : usize,
) -> CallBlock {
    debug_assert_eq!( var.id_all[i_op], OpCode::Call );
    let head = var.arg(i_op);
    let n    = head[2] as usize;
    let m    = head[3] as usize;
    let mut args    = Vec::with_capacity(n);
    let mut results = Vec::with_capacity(m);
    let mut next_var = i_z;
    for j in 0 .. n {
        let index = var.arg(i_op + 1 + j)[0];
        match var.id_all[i_op + 1 + j] {
            OpCode::CallArgV => args.push( (true, index) ),
            OpCode::CallArgP => args.push( (false, index) ),
            _ => panic!( "malformed atomic call block" ),
        }
    }
    for i in 0 .. m {
        match var.id_all[i_op + 1 + n + i] {
            OpCode::CallResV => {
                results.push( Some(next_var) );
                next_var += 1;
            }
            OpCode::CallResP => results.push( None ),
            _ => panic!( "malformed atomic call block" ),
        }
    }
    debug_assert_eq!( var.id_all[i_op + 1 + n + m], OpCode::CallEnd );
    CallBlock {
        atom_id : head[0] as usize,
        call_id : head[1],
        n,
        m,
        args,
        results,
        end     : i_op + 1 + n + m,
        next_var,
    }
}
// ---------------------------------------------------------------------------
//
// TaylorLayout
/// Index mapping for the Taylor coefficient arena.
///
/// With capacity `cap` orders and `r` directions, each variable owns
/// `(cap - 1) * r + 1` coefficients: the order zero coefficient is shared
/// by all directions and coefficient k of direction ell follows at offset
/// `(k - 1) * r + ell + 1` . With `r == 1` this is the plain
/// `var * cap + k` layout.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TaylorLayout {
    pub cap : usize,
    pub r   : usize,
}
impl TaylorLayout {
    //
    /// coefficients per variable
    pub fn tpv(self) -> usize {
        (self.cap - 1) * self.r + 1
    }
    //
    /// index of coefficient of order k, direction ell, for this variable
    pub fn at(self, var : usize, k : usize, ell : usize) -> usize {
        debug_assert!( k < self.cap );
        debug_assert!( ell < self.r );
        let base = var * self.tpv();
        if k == 0 {
            base
        } else {
            base + (k - 1) * self.r + ell + 1
        }
    }
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    //
    #[test]
    fn opcode_round_trip() {
        let op : OpCode = OpCode::try_from( u8::from( OpCode::MulVv ) )
            .unwrap();
        assert_eq!( op, OpCode::MulVv );
    }
    //
    #[test]
    fn single_direction_layout() {
        let lay = TaylorLayout { cap : 4, r : 1 };
        assert_eq!( lay.tpv(), 4 );
        assert_eq!( lay.at(2, 0, 0), 8 );
        assert_eq!( lay.at(2, 3, 0), 11 );
    }
    //
    #[test]
    fn multi_direction_layout() {
        let lay = TaylorLayout { cap : 3, r : 2 };
        assert_eq!( lay.tpv(), 5 );
        assert_eq!( lay.at(1, 0, 0), 5 );
        assert_eq!( lay.at(1, 0, 1), 5 );
        assert_eq!( lay.at(1, 1, 1), 7 );
        assert_eq!( lay.at(1, 2, 0), 8 );
    }
}
