// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Taylor coefficient kernels for the arithmetic operator families.
//!
//! Link to [parent module](super)
//!
//! Forward kernels compute coefficient orders `p ..= q` of the result for
//! one direction `ell` ; with a single direction, `ell` is zero. Reverse
//! kernels accumulate, into `partial` , the adjoint of the forward
//! recurrences for orders `0 .. n_ord` ; `partial` is indexed as
//! `var * n_ord + k` and the result's own partials are used as workspace,
//! so each operator's reverse kernel runs exactly once per sweep.
//!
//! A parameter operand contributes to the order zero coefficient only.
// ---------------------------------------------------------------------------
// use
//
use crate::float::FloatCore;
use crate::op::TaylorLayout;
use crate::tape::IndexT;
// ---------------------------------------------------------------------------
//
// tc
/// Taylor coefficient of this variable, order k, direction ell.
#[inline]
pub(crate) fn tc<V : Copy>(
    taylor : &[V],
    lay    : TaylorLayout,
    var    : usize,
    k      : usize,
    ell    : usize,
) -> V {
    taylor[ lay.at(var, k, ell) ]
}
// ---------------------------------------------------------------------------
// forward
// ---------------------------------------------------------------------------
//
// forward_add_pv
pub(crate) fn forward_add_pv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = par[ arg[0] as usize ];
    let y = arg[1] as usize;
    for k in p ..= q {
        let zk = if k == 0 {
            x + tc(taylor, lay, y, 0, ell)
        } else {
            tc(taylor, lay, y, k, ell)
        };
        taylor[ lay.at(res, k, ell) ] = zk;
    }
}
//
// forward_add_vv
pub(crate) fn forward_add_vv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in p ..= q {
        taylor[ lay.at(res, k, ell) ] =
            tc(taylor, lay, x, k, ell) + tc(taylor, lay, y, k, ell);
    }
}
//
// forward_sub_pv
pub(crate) fn forward_sub_pv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = par[ arg[0] as usize ];
    let y = arg[1] as usize;
    for k in p ..= q {
        let zk = if k == 0 {
            x - tc(taylor, lay, y, 0, ell)
        } else {
            -tc(taylor, lay, y, k, ell)
        };
        taylor[ lay.at(res, k, ell) ] = zk;
    }
}
//
// forward_sub_vp
pub(crate) fn forward_sub_vp<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let y = par[ arg[1] as usize ];
    for k in p ..= q {
        let zk = if k == 0 {
            tc(taylor, lay, x, 0, ell) - y
        } else {
            tc(taylor, lay, x, k, ell)
        };
        taylor[ lay.at(res, k, ell) ] = zk;
    }
}
//
// forward_sub_vv
pub(crate) fn forward_sub_vv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in p ..= q {
        taylor[ lay.at(res, k, ell) ] =
            tc(taylor, lay, x, k, ell) - tc(taylor, lay, y, k, ell);
    }
}
//
// forward_mul_pv
pub(crate) fn forward_mul_pv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = par[ arg[0] as usize ];
    let y = arg[1] as usize;
    for k in p ..= q {
        taylor[ lay.at(res, k, ell) ] = x * tc(taylor, lay, y, k, ell);
    }
}
//
// forward_mul_vv
pub(crate) fn forward_mul_vv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in p ..= q {
        let mut zk = V::zero();
        for j in 0 ..= k {
            zk += tc(taylor, lay, x, j, ell) * tc(taylor, lay, y, k - j, ell);
        }
        taylor[ lay.at(res, k, ell) ] = zk;
    }
}
//
// forward_div_vp
pub(crate) fn forward_div_vp<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let y = par[ arg[1] as usize ];
    for k in p ..= q {
        taylor[ lay.at(res, k, ell) ] = tc(taylor, lay, x, k, ell) / y;
    }
}
//
// forward_div_pv
pub(crate) fn forward_div_pv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = par[ arg[0] as usize ];
    let y = arg[1] as usize;
    let y0 = tc(taylor, lay, y, 0, ell);
    for k in p ..= q {
        let mut num = if k == 0 { x } else { V::zero() };
        for j in 1 ..= k {
            num -= tc(taylor, lay, y, j, ell)
                * tc(taylor, lay, res, k - j, ell);
        }
        taylor[ lay.at(res, k, ell) ] = num / y0;
    }
}
//
// forward_div_vv
pub(crate) fn forward_div_vv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    let y0 = tc(taylor, lay, y, 0, ell);
    for k in p ..= q {
        let mut num = tc(taylor, lay, x, k, ell);
        for j in 1 ..= k {
            num -= tc(taylor, lay, y, j, ell)
                * tc(taylor, lay, res, k - j, ell);
        }
        taylor[ lay.at(res, k, ell) ] = num / y0;
    }
}
//
// forward_zmul_pv
pub(crate) fn forward_zmul_pv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = par[ arg[0] as usize ];
    let y = arg[1] as usize;
    for k in p ..= q {
        taylor[ lay.at(res, k, ell) ] =
            x.azmul( tc(taylor, lay, y, k, ell) );
    }
}
//
// forward_zmul_vp
pub(crate) fn forward_zmul_vp<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let y = par[ arg[1] as usize ];
    for k in p ..= q {
        taylor[ lay.at(res, k, ell) ] =
            tc(taylor, lay, x, k, ell).azmul( y );
    }
}
//
// forward_zmul_vv
pub(crate) fn forward_zmul_vv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in p ..= q {
        let mut zk = V::zero();
        for j in 0 ..= k {
            zk += tc(taylor, lay, x, j, ell)
                .azmul( tc(taylor, lay, y, k - j, ell) );
        }
        taylor[ lay.at(res, k, ell) ] = zk;
    }
}
// ---------------------------------------------------------------------------
// reverse
// ---------------------------------------------------------------------------
//
// reverse_add_pv
pub(crate) fn reverse_add_pv<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let y = arg[1] as usize;
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        partial[y * n_ord + k] += pz;
    }
}
//
// reverse_add_vv
pub(crate) fn reverse_add_vv<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        partial[x * n_ord + k] += pz;
        partial[y * n_ord + k] += pz;
    }
}
//
// reverse_sub_pv
pub(crate) fn reverse_sub_pv<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let y = arg[1] as usize;
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        partial[y * n_ord + k] -= pz;
    }
}
//
// reverse_sub_vp
pub(crate) fn reverse_sub_vp<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x = arg[0] as usize;
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        partial[x * n_ord + k] += pz;
    }
}
//
// reverse_sub_vv
pub(crate) fn reverse_sub_vv<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        partial[x * n_ord + k] += pz;
        partial[y * n_ord + k] -= pz;
    }
}
//
// reverse_mul_pv
pub(crate) fn reverse_mul_pv<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    par     : &[V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x = par[ arg[0] as usize ];
    let y = arg[1] as usize;
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        partial[y * n_ord + k] += x * pz;
    }
}
//
// reverse_mul_vv
pub(crate) fn reverse_mul_vv<V : FloatCore>(
    n_ord   : usize,
    lay     : TaylorLayout,
    taylor  : &[V],
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for j in 0 .. n_ord {
        for k in j .. n_ord {
            let pz = partial[res * n_ord + k];
            partial[x * n_ord + j] += pz * tc(taylor, lay, y, k - j, 0);
            partial[y * n_ord + j] += pz * tc(taylor, lay, x, k - j, 0);
        }
    }
}
//
// reverse_div_vp
pub(crate) fn reverse_div_vp<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    par     : &[V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x = arg[0] as usize;
    let y = par[ arg[1] as usize ];
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        partial[x * n_ord + k] += pz / y;
    }
}
//
// reverse_div_pv
pub(crate) fn reverse_div_pv<V : FloatCore>(
    n_ord   : usize,
    lay     : TaylorLayout,
    taylor  : &[V],
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let y  = arg[1] as usize;
    let y0 = tc(taylor, lay, y, 0, 0);
    for k in (0 .. n_ord).rev() {
        let t = partial[res * n_ord + k] / y0;
        for j in 1 ..= k {
            partial[y * n_ord + j]         -= t * tc(taylor, lay, res, k - j, 0);
            partial[res * n_ord + (k - j)] -= t * tc(taylor, lay, y, j, 0);
        }
        partial[y * n_ord] -= t * tc(taylor, lay, res, k, 0);
    }
}
//
// reverse_div_vv
pub(crate) fn reverse_div_vv<V : FloatCore>(
    n_ord   : usize,
    lay     : TaylorLayout,
    taylor  : &[V],
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x  = arg[0] as usize;
    let y  = arg[1] as usize;
    let y0 = tc(taylor, lay, y, 0, 0);
    for k in (0 .. n_ord).rev() {
        let t = partial[res * n_ord + k] / y0;
        partial[x * n_ord + k] += t;
        for j in 1 ..= k {
            partial[y * n_ord + j]         -= t * tc(taylor, lay, res, k - j, 0);
            partial[res * n_ord + (k - j)] -= t * tc(taylor, lay, y, j, 0);
        }
        partial[y * n_ord] -= t * tc(taylor, lay, res, k, 0);
    }
}
//
// reverse_zmul_pv
pub(crate) fn reverse_zmul_pv<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    par     : &[V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x = par[ arg[0] as usize ];
    let y = arg[1] as usize;
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        partial[y * n_ord + k] += x.azmul( pz );
    }
}
//
// reverse_zmul_vp
pub(crate) fn reverse_zmul_vp<V : FloatCore>(
    n_ord   : usize,
    partial : &mut [V],
    par     : &[V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x = arg[0] as usize;
    let y = par[ arg[1] as usize ];
    for k in 0 .. n_ord {
        let pz = partial[res * n_ord + k];
        partial[x * n_ord + k] += pz.azmul( y );
    }
}
//
// reverse_zmul_vv
pub(crate) fn reverse_zmul_vv<V : FloatCore>(
    n_ord   : usize,
    lay     : TaylorLayout,
    taylor  : &[V],
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x = arg[0] as usize;
    let y = arg[1] as usize;
    for j in 0 .. n_ord {
        for k in j .. n_ord {
            let pz = partial[res * n_ord + k];
            partial[x * n_ord + j] +=
                pz.azmul( tc(taylor, lay, y, k - j, 0) );
            partial[y * n_ord + j] +=
                pz.azmul( tc(taylor, lay, x, k - j, 0) );
        }
    }
}
