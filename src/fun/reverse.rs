// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Implement the [ADFun] reverse mode method.
//!
//! Link to [parent module](super)
//!
//! Given forward orders `0 ..= d` stored by previous forward calls, and a
//! weight for every (dependent, order) pair, a reverse sweep walks the
//! opcode stream in reverse order propagating partials of the weighted
//! sum back to the (independent, order) pairs.
// ---------------------------------------------------------------------------
// use
//
use crate::atom::sealed::AtomRegistry;
use crate::error::Error;
use crate::float::FloatCore;
use crate::fun::ADFun;
use crate::op::arith::tc;
use crate::op::{self, OpCode, arith, pow, special, unary};
use crate::op::TaylorLayout;
use crate::tape::OpSequence;
// ---------------------------------------------------------------------------
impl<V> ADFun<V>
where
    V : FloatCore + AtomRegistry,
{
    //
    // reverse
    /// Reverse mode for orders `0 ..= d` .
    ///
    /// * Syntax :
    /// ```text
    ///     dw = f.reverse(d, w)?
    /// ```
    ///
    /// * Requires :
    /// forward orders `0 ..= d` have been computed (single direction).
    ///
    /// * w :
    /// weights, `w[ i * (d+1) + k ]` multiplying the order k Taylor
    /// coefficient of dependent i; length `range_len() * (d+1)` .
    ///
    /// * dw :
    /// partials of the weighted sum with respect to the order k
    /// coefficient of independent j, at `dw[ j * (d+1) + k ]` ;
    /// length `domain_len() * (d+1)` .
    ///
    /// # Example
    /// first order reverse is the gradient of a scalar function:
    /// ```
    /// use adtape::{start_recording, stop_recording};
    /// // f(x) = x0 * x1
    /// let ax    = start_recording( vec![ 3f64, 5f64 ] ).unwrap();
    /// let ay    = vec![ &ax[0] * &ax[1] ];
    /// let mut f = stop_recording(ay).unwrap();
    /// f.forward(0, vec![ 3.0, 5.0 ]).unwrap();
    /// let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    /// assert_eq!( dw, vec![ 5.0, 3.0 ] );
    /// ```
    pub fn reverse(&mut self, d : usize, w : Vec<V>) -> Result<Vec<V>, Error> {
        let n_ord = d + 1;
        assert_eq!( self.n_dir, 1,
            "reverse: a multiple direction forward sweep is active"
        );
        assert!( self.n_taylor >= n_ord,
            "reverse: {} forward orders are required but only {} \
             have been computed", n_ord, self.n_taylor
        );
        if w.len() != self.dep_var.len() * n_ord {
            return Err( Error::DimensionMismatch {
                what     : "reverse weight vector",
                expected : self.dep_var.len() * n_ord,
                found    : w.len(),
            } );
        }
        //
        // partial arena
        self.partial.clear();
        self.partial.resize( self.n_var * n_ord, V::zero() );
        for (i, index) in self.dep_var.iter().enumerate() {
            let index = *index as usize;
            for k in 0 .. n_ord {
                self.partial[index * n_ord + k] += w[i * n_ord + k];
            }
        }
        //
        self.sweep_reverse(n_ord)?;
        //
        let mut dw = Vec::with_capacity( self.n_ind * n_ord );
        for j in 0 .. self.n_ind {
            for k in 0 .. n_ord {
                dw.push( self.partial[(1 + j) * n_ord + k] );
            }
        }
        Ok( dw )
    }
    //
    // sweep_reverse
    /// One reverse pass over the opcode stream.
    fn sweep_reverse(&mut self, n_ord : usize) -> Result<(), Error> {
        log::trace!(
            "reverse sweep: {n_ord} orders, {} operators", self.var.n_op(),
        );
        let lay = self.layout();
        //
        let var      = &self.var;
        let par      = &self.par_all;
        let taylor   = &self.taylor;
        let partial  = &mut self.partial;
        let op_skip  = &self.op_skip;
        let load_var = &self.load_var;
        //
        let mut i_op = var.n_op();
        let mut i_z  = self.n_var;
        while i_op > 0 {
            i_op -= 1;
            let op    = var.id_all[i_op];
            let n_res = op::n_res(op);
            i_z -= n_res;
            let res = i_z + n_res.wrapping_sub(1);
            let arg = var.arg(i_op);
            if op_skip[i_op] {
                continue;
            }
            match op {
                //
                // operators with no derivative contribution
                OpCode::Begin | OpCode::End | OpCode::Inv | OpCode::Par
                | OpCode::Pri | OpCode::Cmp | OpCode::CSkip | OpCode::Dis
                | OpCode::Stpp | OpCode::Stpv | OpCode::Stvp
                | OpCode::Stvv => (),
                //
                OpCode::AddPv =>
                    arith::reverse_add_pv(n_ord, partial, arg, res),
                OpCode::AddVv =>
                    arith::reverse_add_vv(n_ord, partial, arg, res),
                OpCode::SubPv =>
                    arith::reverse_sub_pv(n_ord, partial, arg, res),
                OpCode::SubVp =>
                    arith::reverse_sub_vp(n_ord, partial, arg, res),
                OpCode::SubVv =>
                    arith::reverse_sub_vv(n_ord, partial, arg, res),
                OpCode::MulPv =>
                    arith::reverse_mul_pv(n_ord, partial, par, arg, res),
                OpCode::MulVv =>
                    arith::reverse_mul_vv(n_ord, lay, taylor, partial, arg, res),
                OpCode::DivPv =>
                    arith::reverse_div_pv(n_ord, lay, taylor, partial, arg, res),
                OpCode::DivVp =>
                    arith::reverse_div_vp(n_ord, partial, par, arg, res),
                OpCode::DivVv =>
                    arith::reverse_div_vv(n_ord, lay, taylor, partial, arg, res),
                OpCode::ZmulPv =>
                    arith::reverse_zmul_pv(n_ord, partial, par, arg, res),
                OpCode::ZmulVp =>
                    arith::reverse_zmul_vp(n_ord, partial, par, arg, res),
                OpCode::ZmulVv =>
                    arith::reverse_zmul_vv(n_ord, lay, taylor, partial, arg, res),
                OpCode::PowPv =>
                    pow::reverse_pow_pv(n_ord, lay, taylor, partial, par, arg, res),
                OpCode::PowVp =>
                    pow::reverse_pow_vp(n_ord, lay, taylor, partial, par, arg, res),
                OpCode::PowVv =>
                    pow::reverse_pow_vv(n_ord, lay, taylor, partial, arg, res),
                //
                _ if op::is_unary(op) =>
                    unary::reverse(op, n_ord, lay, taylor, partial, arg, res),
                //
                OpCode::CSum =>
                    special::reverse_csum(n_ord, partial, arg, res),
                OpCode::CExp =>
                    special::reverse_cexp(
                        n_ord, lay, taylor, partial, par, arg, res,
                    ),
                OpCode::Ldp | OpCode::Ldv =>
                    special::reverse_load(n_ord, partial, arg, res, load_var),
                //
                OpCode::CallEnd => {
                    // scan back to the start of the call block
                    let mut start = i_op;
                    while var.id_all[start] != OpCode::Call {
                        start -= 1;
                    }
                    let m_var = var.id_all[start .. i_op].iter().filter(
                        | op | **op == OpCode::CallResV
                    ).count();
                    i_z -= m_var;
                    reverse_call_block(
                        var, par, start, i_z, n_ord, lay, taylor, partial,
                    )?;
                    i_op = start;
                }
                _ =>
                    unreachable!( "call block operator outside a call block" ),
            }
        }
        debug_assert_eq!( i_z, 0 );
        Ok(())
    }
}
// ---------------------------------------------------------------------------
// reverse_call_block
/// Process one atomic call block during a reverse sweep; partials of the
/// call results flow to the variable arguments through the atomic
/// reverse callback.
#[allow(clippy::too_many_arguments)]
fn reverse_call_block<V>(
    var     : &OpSequence<OpCode>,
    par     : &[V],
    start   : usize,
    i_z     : usize,
    n_ord   : usize,
    lay     : TaylorLayout,
    taylor  : &[V],
    partial : &mut [V],
) -> Result<(), Error>
where
    V : FloatCore + AtomRegistry,
{
    let head    = var.arg(start);
    let atom_id = head[0] as usize;
    let call_id = head[1];
    let n       = head[2] as usize;
    let m       = head[3] as usize;
    //
    // taylor_x
    let mut taylor_x = vec![ V::zero(); n * n_ord ];
    for j in 0 .. n {
        let arg_j = var.arg(start + 1 + j);
        match var.id_all[start + 1 + j] {
            OpCode::CallArgV => for k in 0 .. n_ord {
                taylor_x[j * n_ord + k] =
                    tc(taylor, lay, arg_j[0] as usize, k, 0);
            },
            _ => taylor_x[j * n_ord] = par[ arg_j[0] as usize ],
        }
    }
    //
    // taylor_y and partial_y
    let mut taylor_y  = vec![ V::zero(); m * n_ord ];
    let mut partial_y = vec![ V::zero(); m * n_ord ];
    let mut res_index = i_z;
    for i in 0 .. m {
        match var.id_all[start + 1 + n + i] {
            OpCode::CallResV => {
                for k in 0 .. n_ord {
                    taylor_y[i * n_ord + k]  =
                        tc(taylor, lay, res_index, k, 0);
                    partial_y[i * n_ord + k] =
                        partial[res_index * n_ord + k];
                }
                res_index += 1;
            }
            _ => {
                let arg_i = var.arg(start + 1 + n + i);
                taylor_y[i * n_ord] = par[ arg_i[0] as usize ];
            }
        }
    }
    //
    let atomic = crate::atom::get::<V>(atom_id);
    let mut partial_x = vec![ V::zero(); n * n_ord ];
    let ok = atomic.reverse(
        call_id, n_ord - 1, &taylor_x, &taylor_y, &mut partial_x, &partial_y,
    );
    if ! ok {
        return Err( Error::AtomicFailed {
            name : atomic.name().to_string(),
        } );
    }
    //
    // scatter into the variable arguments
    for j in 0 .. n {
        if var.id_all[start + 1 + j] == OpCode::CallArgV {
            let v = var.arg(start + 1 + j)[0] as usize;
            for k in 0 .. n_ord {
                partial[v * n_ord + k] += partial_x[j * n_ord + k];
            }
        }
    }
    Ok(())
}
