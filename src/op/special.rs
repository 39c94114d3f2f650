// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Kernels for the parameter copy, conditional expression, cumulative
//! summation, and VecAD load and store operators.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
//
use crate::ad::cond_exp::CompareOp;
use crate::error::Error;
use crate::float::FloatCore;
use crate::op::{
    CSUM_BASE, CSUM_BEGIN, CSUM_END_ADD_DYN, CSUM_END_ADD_VAR,
    CSUM_END_SUB_DYN, CSUM_END_SUB_VAR, FLAG_FALSE_VAR, FLAG_LEFT_VAR,
    FLAG_RIGHT_VAR, FLAG_TRUE_VAR, TaylorLayout,
};
use crate::op::arith::tc;
use crate::tape::IndexT;
// ---------------------------------------------------------------------------
//
// operand_coeff
/// Order k coefficient of an operand that is a variable when is_var,
/// and a parameter otherwise. A parameter contributes at order zero only.
#[inline]
pub(crate) fn operand_coeff<V : FloatCore>(
    is_var : bool,
    index  : IndexT,
    k      : usize,
    ell    : usize,
    lay    : TaylorLayout,
    taylor : &[V],
    par    : &[V],
) -> V {
    if is_var {
        tc(taylor, lay, index as usize, k, ell)
    } else if k == 0 {
        par[index as usize]
    } else {
        V::zero()
    }
}
// ---------------------------------------------------------------------------
// par
// ---------------------------------------------------------------------------
//
// forward_par
pub(crate) fn forward_par<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    for k in p ..= q {
        let zk = if k == 0 {
            par[ arg[0] as usize ]
        } else {
            V::zero()
        };
        taylor[ lay.at(res, k, ell) ] = zk;
    }
}
// ---------------------------------------------------------------------------
// cond_exp
// ---------------------------------------------------------------------------
//
// cexp_take_true
/// Evaluate the comparison of a CExp (or CSkip) operator at the current
/// order zero values.
pub(crate) fn cexp_take_true<V : FloatCore>(
    lay    : TaylorLayout,
    taylor : &[V],
    par    : &[V],
    arg    : &[IndexT],
) -> bool {
    let cop = CompareOp::try_from( arg[0] as u8 ).unwrap();
    let flags = arg[1];
    let left = operand_coeff(
        flags & FLAG_LEFT_VAR != 0, arg[2], 0, 0, lay, taylor, par,
    );
    let right = operand_coeff(
        flags & FLAG_RIGHT_VAR != 0, arg[3], 0, 0, lay, taylor, par,
    );
    cop.eval(left, right)
}
//
// forward_cexp
/// Forward kernel for a conditional expression: every coefficient comes
/// from the branch selected by the order zero comparison.
pub(crate) fn forward_cexp<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let flags = arg[1];
    let take_true = cexp_take_true(lay, taylor, par, arg);
    let (sel_var, sel_index) = if take_true {
        (flags & FLAG_TRUE_VAR != 0, arg[4])
    } else {
        (flags & FLAG_FALSE_VAR != 0, arg[5])
    };
    for k in p ..= q {
        taylor[ lay.at(res, k, ell) ] =
            operand_coeff(sel_var, sel_index, k, ell, lay, taylor, par);
    }
}
//
// reverse_cexp
/// Reverse kernel for a conditional expression: the partial flows to the
/// selected branch only; the unselected branch receives zero.
pub(crate) fn reverse_cexp<V : FloatCore>(
    n_ord   : usize,
    lay     : TaylorLayout,
    taylor  : &[V],
    partial : &mut [V],
    par     : &[V],
    arg     : &[IndexT],
    res     : usize,
) {
    let flags = arg[1];
    let take_true = cexp_take_true(lay, taylor, par, arg);
    let (sel_var, sel_index) = if take_true {
        (flags & FLAG_TRUE_VAR != 0, arg[4])
    } else {
        (flags & FLAG_FALSE_VAR != 0, arg[5])
    };
    if sel_var {
        let sel = sel_index as usize;
        for k in 0 .. n_ord {
            let pz = partial[res * n_ord + k];
            partial[sel * n_ord + k] += pz;
        }
    }
}
// ---------------------------------------------------------------------------
// csum
// ---------------------------------------------------------------------------
//
// forward_csum
/// Forward kernel for cumulative summation. The order zero coefficient is
/// the constant base plus and minus the listed dynamic parameters and
/// variables; higher orders sum the variable coefficients only.
pub(crate) fn forward_csum<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let end_add_var = arg[CSUM_END_ADD_VAR] as usize;
    let end_sub_var = arg[CSUM_END_SUB_VAR] as usize;
    let end_add_dyn = arg[CSUM_END_ADD_DYN] as usize;
    let end_sub_dyn = arg[CSUM_END_SUB_DYN] as usize;
    for k in p ..= q {
        let mut zk = V::zero();
        if k == 0 {
            zk = par[ arg[CSUM_BASE] as usize ];
            for i in end_sub_var .. end_add_dyn {
                zk += par[ arg[i] as usize ];
            }
            for i in end_add_dyn .. end_sub_dyn {
                zk -= par[ arg[i] as usize ];
            }
        }
        for i in CSUM_BEGIN .. end_add_var {
            zk += tc(taylor, lay, arg[i] as usize, k, ell);
        }
        for i in end_add_var .. end_sub_var {
            zk -= tc(taylor, lay, arg[i] as usize, k, ell);
        }
        taylor[ lay.at(res, k, ell) ] = zk;
    }
}
//
// reverse_csum
pub(crate) fn reverse_csum<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let end_add_var = arg[CSUM_END_ADD_VAR] as usize;
    let end_sub_var = arg[CSUM_END_SUB_VAR] as usize;
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        for i in CSUM_BEGIN .. end_add_var {
            partial[ arg[i] as usize * n_ord + k ] += pz;
        }
        for i in end_add_var .. end_sub_var {
            partial[ arg[i] as usize * n_ord + k ] -= pz;
        }
    }
}
// ---------------------------------------------------------------------------
// VecAD load and store
// ---------------------------------------------------------------------------
//
// VecAdState
/// The materialized VecAD contents during a sweep: the current value and,
/// when a variable has been stored, its index (zero for none, variable
/// zero being reserved).
pub(crate) struct VecAdState<V> {
    pub val : Vec<V>,
    pub var : Vec<IndexT>,
}
//
// load_index
/// Runtime index of a load or store operator, with its range check.
pub(crate) fn load_index<V : FloatCore>(
    index_is_var : bool,
    lay          : TaylorLayout,
    taylor       : &[V],
    par          : &[V],
    arg          : &[IndexT],
    length       : usize,
) -> Result<usize, Error> {
    let value = if index_is_var {
        tc(taylor, lay, arg[1] as usize, 0, 0)
    } else {
        par[ arg[1] as usize ]
    };
    let index = value.to_index();
    if index >= length {
        return Err( Error::IndexOutOfRange { index, length } );
    }
    Ok(index)
}
//
// forward_load_zero
/// Zero order forward for a load: read the materialized slot and record
/// the variable address (or zero) at the load site.
pub(crate) fn forward_load_zero<V : FloatCore>(
    index_is_var : bool,
    lay      : TaylorLayout,
    taylor   : &mut [V],
    par      : &[V],
    arg      : &[IndexT],
    res      : usize,
    start    : usize,
    length   : usize,
    state    : &VecAdState<V>,
    load_var : &mut [IndexT],
) -> Result<(), Error> {
    let index =
        load_index(index_is_var, lay, taylor, par, arg, length)?;
    let slot = start + index;
    let load_slot = arg[2] as usize;
    let var = state.var[slot];
    load_var[load_slot] = var;
    let z0 = if var != 0 {
        tc(taylor, lay, var as usize, 0, 0)
    } else {
        state.val[slot]
    };
    taylor[ lay.at(res, 0, 0) ] = z0;
    Ok(())
}
//
// forward_load_higher
/// Order p ..= q forward for a load, p >= 1: the index is frozen at its
/// zero order value, so coefficients copy from the recorded variable.
pub(crate) fn forward_load_higher<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay      : TaylorLayout,
    taylor   : &mut [V],
    arg      : &[IndexT],
    res      : usize,
    load_var : &[IndexT],
) {
    debug_assert!( p >= 1 );
    let var = load_var[ arg[2] as usize ];
    for k in p ..= q {
        let zk = if var != 0 {
            tc(taylor, lay, var as usize, k, ell)
        } else {
            V::zero()
        };
        taylor[ lay.at(res, k, ell) ] = zk;
    }
}
//
// reverse_load
pub(crate) fn reverse_load<V : FloatCore>(
    n_ord    : usize,
    partial  : &mut [V],
    arg      : &[IndexT],
    res      : usize,
    load_var : &[IndexT],
) {
    let var = load_var[ arg[2] as usize ] as usize;
    if var != 0 {
        for k in 0 .. n_ord {
            let pz = partial[res * n_ord + k];
            partial[var * n_ord + k] += pz;
        }
    }
}
//
// forward_store_zero
/// Zero order forward for a store: update the materialized slot.
/// Stores only execute at order zero; the per load recorded addresses
/// carry their effect to higher orders and reverse mode.
pub(crate) fn forward_store_zero<V : FloatCore>(
    index_is_var : bool,
    value_is_var : bool,
    lay    : TaylorLayout,
    taylor : &[V],
    par    : &[V],
    arg    : &[IndexT],
    start  : usize,
    length : usize,
    state  : &mut VecAdState<V>,
) -> Result<(), Error> {
    let index =
        load_index(index_is_var, lay, taylor, par, arg, length)?;
    let slot = start + index;
    if value_is_var {
        state.var[slot] = arg[2];
        state.val[slot] = tc(taylor, lay, arg[2] as usize, 0, 0);
    } else {
        state.var[slot] = 0;
        state.val[slot] = par[ arg[2] as usize ];
    }
    Ok(())
}
