// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Implement the [ADFun] forward mode methods.
//!
//! Link to [parent module](super)
//!
//! Operator kernels run in strict tape order; kernel i + 1 may read
//! results written by kernel i. A forward sweep for orders `p ..= q`
//! walks the opcode stream once, dispatching on the opcode to the
//! per family kernels in [op](crate::op) .
// ---------------------------------------------------------------------------
// use
//
use crate::atom::sealed::AtomRegistry;
use crate::discrete::sealed::DiscreteRegistry;
use crate::ad::AdType;
use crate::ad::cond_exp::CompareOp;
use crate::error::Error;
use crate::float::FloatCore;
use crate::fun::ADFun;
use crate::op::arith::tc;
use crate::op::{
    self, CSKIP_BEGIN, CSKIP_N_FALSE, CSKIP_N_TRUE, FLAG_CMP_TRUE,
    FLAG_LEFT_VAR, OpCode, TaylorLayout, arith, pow, special, unary,
};
use crate::tape::{IndexT, OpSequence};
// ---------------------------------------------------------------------------
impl<V> ADFun<V>
where
    V : FloatCore + AtomRegistry + DiscreteRegistry,
{
    //
    // forward
    /// Forward mode for one order, single direction.
    ///
    /// * Syntax :
    /// ```text
    ///     yq = f.forward(order, xq)?
    /// ```
    ///
    /// * order :
    /// the Taylor coefficient order computed by this call. Order zero
    /// evaluates the function; each higher order must follow the order
    /// below it. The coefficient arena grows as needed and is reused by
    /// later calls.
    ///
    /// * xq :
    /// the order *order* Taylor coefficients for the independent
    /// variables (for order zero, the argument point).
    ///
    /// * yq :
    /// the order *order* Taylor coefficients for the dependents.
    ///
    /// * Errors : [Error::DimensionMismatch] , [Error::NanEncountered]
    /// (only when enabled with [ADFun::check_for_nan]),
    /// [Error::IndexOutOfRange] , [Error::AtomicOrderUnsupported]
    ///
    /// # Example
    /// ```
    /// use adtape::{start_recording, stop_recording};
    /// // f(x) = sin(x0)
    /// let ax    = start_recording( vec![ 0.5f64 ] ).unwrap();
    /// let ay    = vec![ ax[0].sin() ];
    /// let mut f = stop_recording(ay).unwrap();
    /// //
    /// let y0 = f.forward(0, vec![ 0.5 ]).unwrap();
    /// let y1 = f.forward(1, vec![ 1.0 ]).unwrap();
    /// assert!( (y0[0] - 0.5f64.sin()).abs() < 1e-14 );
    /// assert!( (y1[0] - 0.5f64.cos()).abs() < 1e-14 );
    /// ```
    pub fn forward(
        &mut self,
        order : usize,
        xq    : Vec<V>,
    ) -> Result<Vec<V>, Error> {
        if xq.len() != self.n_ind {
            return Err( Error::DimensionMismatch {
                what     : "forward domain vector",
                expected : self.n_ind,
                found    : xq.len(),
            } );
        }
        if order == 0 {
            let cap = usize::max(self.cap_order, 1);
            self.ensure_capacity(cap, 1, 0);
            self.n_taylor       = 0;
            self.compare_change = 0;
            self.op_skip.clear();
            self.op_skip.resize(self.var.n_op(), false);
            self.load_var.clear();
            self.load_var.resize(self.n_load, 0);
            //
            // materialize the VecAD records at their initial values
            self.vecad.val.clear();
            self.vecad.var.clear();
            for index in self.vecad_init.iter() {
                self.vecad.val.push( self.par_all[*index as usize] );
                self.vecad.var.push( 0 );
            }
            //
            let lay = self.layout();
            for j in 0 .. self.n_ind {
                self.taylor[ lay.at(1 + j, 0, 0) ] = xq[j];
            }
            self.sweep_forward(0, 0)?;
            self.n_taylor = 1;
        } else {
            assert_eq!( self.n_dir, 1,
                "forward: a multiple direction sweep is active; \
                 restart at order zero"
            );
            assert!( order <= self.n_taylor,
                "forward: order {order} requested but only {} orders \
                 have been computed", self.n_taylor
            );
            let cap = usize::max(self.cap_order, order + 1);
            let keep = self.n_taylor;
            self.ensure_capacity(cap, 1, keep);
            let lay = self.layout();
            for j in 0 .. self.n_ind {
                self.taylor[ lay.at(1 + j, order, 0) ] = xq[j];
            }
            if let Err(e) = self.sweep_forward(order, order) {
                self.n_taylor = usize::min(self.n_taylor, order);
                return Err(e);
            }
            self.n_taylor = order + 1;
        }
        //
        // range coefficients
        let lay = self.layout();
        let yq  = self.dep_var.iter().map(
            | index | self.taylor[ lay.at(*index as usize, order, 0) ]
        ).collect();
        Ok( yq )
    }
    //
    // forward_dir
    /// Forward mode for one order, advancing n_dir directions at once.
    ///
    /// * Syntax :
    /// ```text
    ///     yq = f.forward_dir(order, n_dir, xq)?
    /// ```
    ///
    /// * order :
    /// must be at least one; order one starts the directions from the
    /// order zero coefficients of the most recent [ADFun::forward] call,
    /// and each higher order must use the same n_dir.
    ///
    /// * xq :
    /// coefficient *order* for independent variable j, direction ell,
    /// at index `j * n_dir + ell` ; length `n * n_dir` .
    ///
    /// * yq :
    /// coefficient *order* for dependent i, direction ell, at index
    /// `i * n_dir + ell` .
    ///
    /// The order zero coefficients are shared across directions; for
    /// `k >= 1` the coefficients are stored per direction.
    pub fn forward_dir(
        &mut self,
        order : usize,
        n_dir : usize,
        xq    : Vec<V>,
    ) -> Result<Vec<V>, Error> {
        assert!( order >= 1,
            "forward_dir: use forward for the zero order sweep"
        );
        assert!( n_dir >= 1 );
        if xq.len() != self.n_ind * n_dir {
            return Err( Error::DimensionMismatch {
                what     : "forward_dir domain vector",
                expected : self.n_ind * n_dir,
                found    : xq.len(),
            } );
        }
        if order == 1 {
            assert!( self.n_taylor >= 1,
                "forward_dir: order zero has not been computed"
            );
            let cap = usize::max(self.cap_order, 2);
            self.ensure_capacity(cap, n_dir, 1);
            self.n_taylor = 1;
        } else {
            assert_eq!( n_dir, self.n_dir,
                "forward_dir: n_dir does not match the active sweep"
            );
            assert!( order <= self.n_taylor,
                "forward_dir: order {order} requested but only {} orders \
                 have been computed", self.n_taylor
            );
            let cap  = usize::max(self.cap_order, order + 1);
            let keep = self.n_taylor;
            self.ensure_capacity(cap, n_dir, keep);
        }
        let lay = self.layout();
        for j in 0 .. self.n_ind {
            for ell in 0 .. n_dir {
                self.taylor[ lay.at(1 + j, order, ell) ] =
                    xq[j * n_dir + ell];
            }
        }
        if let Err(e) = self.sweep_forward(order, order) {
            self.n_taylor = usize::min(self.n_taylor, order);
            return Err(e);
        }
        self.n_taylor = order + 1;
        //
        let lay    = self.layout();
        let mut yq = Vec::with_capacity( self.dep_var.len() * n_dir );
        for index in self.dep_var.iter() {
            for ell in 0 .. n_dir {
                yq.push( self.taylor[ lay.at(*index as usize, order, ell) ] );
            }
        }
        Ok( yq )
    }
    //
    // sweep_forward
    /// One forward pass over the opcode stream for orders p ..= q,
    /// all directions.
    pub(crate) fn sweep_forward(
        &mut self,
        p : usize,
        q : usize,
    ) -> Result<(), Error> {
        log::trace!(
            "forward sweep: orders {p}..={q}, {} directions, {} operators",
            self.n_dir, self.var.n_op(),
        );
        let lay    = self.layout();
        let r      = self.n_dir;
        let n_op   = self.var.n_op();
        //
        // split borrows for the kernel loop
        let var        = &self.var;
        let par        = &self.par_all;
        let par_is_dyn = &self.par_is_dyn;
        let taylor     = &mut self.taylor;
        let op_skip    = &mut self.op_skip;
        let load_var   = &mut self.load_var;
        let vecad      = &mut self.vecad;
        let str_all    = &self.str_all;
        let vecad_len   = &self.vecad_len;
        let vecad_start = &self.vecad_start;
        let check_nan  = self.check_nan && p == 0;
        let mut compare_change = self.compare_change;
        //
        let mut var_args : Vec<IndexT> = Vec::new();
        let mut par_args : Vec<usize>  = Vec::new();
        let mut i_op = 0usize;
        let mut i_z  = 0usize;
        while i_op < n_op {
            let op    = var.id_all[i_op];
            let n_res = op::n_res(op);
            let arg   = var.arg(i_op);
            let res   = i_z + n_res.wrapping_sub(1);
            if op_skip[i_op] {
                i_z  += n_res;
                i_op += 1;
                continue;
            }
            match op {
                OpCode::Begin => {
                    for k in p ..= q {
                        for ell in 0 .. r {
                            taylor[ lay.at(0, k, ell) ] = V::zero();
                        }
                    }
                }
                OpCode::Inv | OpCode::End => (),
                OpCode::Par => for ell in 0 .. r {
                    special::forward_par(p, q, ell, lay, taylor, par, arg, res);
                },
                //
                OpCode::AddPv => for ell in 0 .. r {
                    arith::forward_add_pv(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::AddVv => for ell in 0 .. r {
                    arith::forward_add_vv(p, q, ell, lay, taylor, arg, res);
                },
                OpCode::SubPv => for ell in 0 .. r {
                    arith::forward_sub_pv(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::SubVp => for ell in 0 .. r {
                    arith::forward_sub_vp(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::SubVv => for ell in 0 .. r {
                    arith::forward_sub_vv(p, q, ell, lay, taylor, arg, res);
                },
                OpCode::MulPv => for ell in 0 .. r {
                    arith::forward_mul_pv(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::MulVv => for ell in 0 .. r {
                    arith::forward_mul_vv(p, q, ell, lay, taylor, arg, res);
                },
                OpCode::DivPv => for ell in 0 .. r {
                    arith::forward_div_pv(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::DivVp => for ell in 0 .. r {
                    arith::forward_div_vp(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::DivVv => for ell in 0 .. r {
                    arith::forward_div_vv(p, q, ell, lay, taylor, arg, res);
                },
                OpCode::ZmulPv => for ell in 0 .. r {
                    arith::forward_zmul_pv(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::ZmulVp => for ell in 0 .. r {
                    arith::forward_zmul_vp(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::ZmulVv => for ell in 0 .. r {
                    arith::forward_zmul_vv(p, q, ell, lay, taylor, arg, res);
                },
                OpCode::PowPv => for ell in 0 .. r {
                    pow::forward_pow_pv(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::PowVp => for ell in 0 .. r {
                    pow::forward_pow_vp(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::PowVv => for ell in 0 .. r {
                    pow::forward_pow_vv(p, q, ell, lay, taylor, arg, res);
                },
                //
                _ if op::is_unary(op) => for ell in 0 .. r {
                    unary::forward(op, p, q, ell, lay, taylor, arg, res);
                },
                //
                OpCode::CSum => for ell in 0 .. r {
                    special::forward_csum(p, q, ell, lay, taylor, par, arg, res);
                },
                OpCode::CExp => {
                    if p == 0 {
                        let take_true =
                            special::cexp_take_true(lay, taylor, par, arg);
                        let recorded =
                            arg[1] & op::FLAG_CEXP_TRUE != 0;
                        if take_true != recorded {
                            compare_change += 1;
                        }
                    }
                    for ell in 0 .. r {
                        special::forward_cexp(
                            p, q, ell, lay, taylor, par, arg, res,
                        );
                    }
                }
                OpCode::Cmp => if p == 0 {
                    let cop = CompareOp::try_from( arg[0] as u8 ).unwrap();
                    let left = special::operand_coeff(
                        arg[1] & FLAG_LEFT_VAR != 0,
                        arg[2], 0, 0, lay, taylor, par,
                    );
                    let right = special::operand_coeff(
                        arg[1] & op::FLAG_RIGHT_VAR != 0,
                        arg[3], 0, 0, lay, taylor, par,
                    );
                    let outcome  = cop.eval(left, right);
                    let recorded = arg[1] & FLAG_CMP_TRUE != 0;
                    if outcome != recorded {
                        compare_change += 1;
                    }
                },
                OpCode::Pri => if p == 0 {
                    let pos = special::operand_coeff(
                        arg[0] & FLAG_LEFT_VAR != 0,
                        arg[1], 0, 0, lay, taylor, par,
                    );
                    if ! ( pos > V::zero() ) {
                        let value = special::operand_coeff(
                            arg[0] & op::FLAG_RIGHT_VAR != 0,
                            arg[2], 0, 0, lay, taylor, par,
                        );
                        print!( "{}{}{}",
                            str_all[ arg[3] as usize ],
                            value,
                            str_all[ arg[4] as usize ],
                        );
                    }
                },
                OpCode::CSkip => if p == 0 {
                    let take_true =
                        special::cexp_take_true(lay, taylor, par, arg);
                    let n_true  = arg[CSKIP_N_TRUE] as usize;
                    let n_false = arg[CSKIP_N_FALSE] as usize;
                    let (begin, end) = if take_true {
                        (CSKIP_BEGIN, CSKIP_BEGIN + n_true)
                    } else {
                        (CSKIP_BEGIN + n_true, CSKIP_BEGIN + n_true + n_false)
                    };
                    for i in begin .. end {
                        op_skip[ arg[i] as usize ] = true;
                    }
                },
                OpCode::Dis => {
                    if p == 0 {
                        let x0 = tc(taylor, lay, arg[1] as usize, 0, 0);
                        taylor[ lay.at(res, 0, 0) ] =
                            crate::discrete::eval::<V>( arg[0] as usize, x0 );
                    }
                    for k in usize::max(p, 1) ..= q {
                        for ell in 0 .. r {
                            taylor[ lay.at(res, k, ell) ] = V::zero();
                        }
                    }
                }
                OpCode::Ldp | OpCode::Ldv => {
                    let index_is_var = op == OpCode::Ldv;
                    let vec_id = arg[0] as usize;
                    let start  = vecad_start[vec_id] as usize;
                    let length = vecad_len[vec_id] as usize;
                    if p == 0 {
                        special::forward_load_zero(
                            index_is_var, lay, taylor, par, arg, res,
                            start, length, vecad, load_var,
                        )?;
                    }
                    if q >= 1 {
                        for ell in 0 .. r {
                            special::forward_load_higher(
                                usize::max(p, 1), q, ell, lay, taylor, arg,
                                res, load_var,
                            );
                        }
                    }
                }
                OpCode::Stpp | OpCode::Stpv
                | OpCode::Stvp | OpCode::Stvv => if p == 0 {
                    let index_is_var =
                        matches!(op, OpCode::Stvp | OpCode::Stvv);
                    let value_is_var =
                        matches!(op, OpCode::Stpv | OpCode::Stvv);
                    let vec_id = arg[0] as usize;
                    let start  = vecad_start[vec_id] as usize;
                    let length = vecad_len[vec_id] as usize;
                    special::forward_store_zero(
                        index_is_var, value_is_var, lay, taylor, par, arg,
                        start, length, vecad,
                    )?;
                },
                OpCode::Call => {
                    let (next_op, next_z) = forward_call_block(
                        var, par, par_is_dyn, i_op, i_z, p, q, r, lay, taylor,
                    )?;
                    i_op = next_op;
                    i_z  = next_z;
                    continue;
                }
                _ =>
                    unreachable!( "call block operator outside a call block" ),
            }
            //
            // nan check: a nan result from finite inputs
            if check_nan && n_res > 0 {
                let mut result_nan = false;
                for i in 0 .. n_res {
                    result_nan |= tc(taylor, lay, i_z + i, 0, 0).is_nan();
                }
                if result_nan {
                    var_args.clear();
                    op::append_var_args(op, arg, &mut var_args);
                    let mut inputs_finite = var_args.iter().all(
                        | v | tc(taylor, lay, *v as usize, 0, 0).is_finite()
                    );
                    par_args.clear();
                    op::par_arg_positions(op, arg, &mut par_args);
                    inputs_finite &= par_args.iter().all(
                        | pos | par[ arg[*pos] as usize ].is_finite()
                    );
                    if inputs_finite {
                        self.compare_change = compare_change;
                        return Err( Error::NanEncountered {
                            var_index : res,
                        } );
                    }
                }
            }
            i_z  += n_res;
            i_op += 1;
        }
        debug_assert_eq!( i_z, self.n_var );
        self.compare_change = compare_change;
        Ok(())
    }
}
// ---------------------------------------------------------------------------
// forward_call_block
/// Process one atomic call block during a forward sweep; returns the
/// operator and variable indices just past the block.
#[allow(clippy::too_many_arguments)]
fn forward_call_block<V>(
    var        : &OpSequence<OpCode>,
    par        : &[V],
    par_is_dyn : &[bool],
    i_op       : usize,
    i_z        : usize,
    p          : usize,
    q          : usize,
    r          : usize,
    lay        : TaylorLayout,
    taylor     : &mut [V],
) -> Result<(usize, usize), Error>
where
    V : FloatCore + AtomRegistry,
{
    let head    = var.arg(i_op);
    let atom_id = head[0] as usize;
    let call_id = head[1];
    let n       = head[2] as usize;
    let m       = head[3] as usize;
    let n_ord   = q + 1;
    //
    // argument classification and result variable indices
    let mut type_x : Vec<AdType>        = Vec::with_capacity(n);
    let mut res_var : Vec<Option<usize>> = Vec::with_capacity(m);
    let mut need_y : Vec<bool>          = Vec::with_capacity(m);
    let mut new_z  = i_z;
    for j in 0 .. n {
        let op_j = var.id_all[i_op + 1 + j];
        match op_j {
            OpCode::CallArgV => type_x.push( AdType::Variable ),
            OpCode::CallArgP => {
                let index = var.arg(i_op + 1 + j)[0] as usize;
                if par_is_dyn[index] {
                    type_x.push( AdType::Dynamic );
                } else {
                    type_x.push( AdType::Constant );
                }
            }
            _ => unreachable!( "malformed atomic call block" ),
        }
    }
    for i in 0 .. m {
        let op_i = var.id_all[i_op + 1 + n + i];
        match op_i {
            OpCode::CallResV => {
                res_var.push( Some(new_z) );
                need_y.push( true );
                new_z += 1;
            }
            OpCode::CallResP => {
                res_var.push( None );
                need_y.push( false );
            }
            _ => unreachable!( "malformed atomic call block" ),
        }
    }
    debug_assert_eq!( var.id_all[i_op + 1 + n + m], OpCode::CallEnd );
    //
    let atomic = crate::atom::get::<V>(atom_id);
    for ell in 0 .. r {
        //
        // taylor_x
        let mut taylor_x = vec![ V::zero(); n * n_ord ];
        for j in 0 .. n {
            let arg_j = var.arg(i_op + 1 + j);
            match var.id_all[i_op + 1 + j] {
                OpCode::CallArgV => {
                    for k in 0 ..= q {
                        taylor_x[j * n_ord + k] =
                            tc(taylor, lay, arg_j[0] as usize, k, ell);
                    }
                }
                _ => {
                    taylor_x[j * n_ord] = par[ arg_j[0] as usize ];
                }
            }
        }
        //
        // taylor_y, lower orders already computed
        let mut taylor_y = vec![ V::zero(); m * n_ord ];
        for i in 0 .. m {
            match res_var[i] {
                Some(v) => for k in 0 .. p {
                    taylor_y[i * n_ord + k] = tc(taylor, lay, v, k, ell);
                },
                None => {
                    let arg_i = var.arg(i_op + 1 + n + i);
                    taylor_y[i * n_ord] = par[ arg_i[0] as usize ];
                }
            }
        }
        //
        let ok = atomic.forward(
            call_id, &need_y, p, q, &type_x, &taylor_x, &mut taylor_y,
        );
        if ! ok {
            return Err( Error::AtomicOrderUnsupported {
                name  : atomic.name().to_string(),
                order : q,
            } );
        }
        //
        // scatter the results
        for i in 0 .. m {
            if let Some(v) = res_var[i] {
                for k in p ..= q {
                    taylor[ lay.at(v, k, ell) ] = taylor_y[i * n_ord + k];
                }
            }
        }
    }
    Ok( (i_op + n + m + 2, new_z) )
}
