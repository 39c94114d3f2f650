// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Implement the [ADFun] Jacobian sparsity methods.
//!
//! Link to [parent module](super)
//!
//! The work pattern has one row per variable, followed by one combined
//! row per VecAD record (a load may read any element, so each record is
//! treated as a single cell). Conditional expressions contribute both
//! branches; with the dependency variant the comparison operands, the
//! VecAD indices, and discrete function arguments also contribute.
// ---------------------------------------------------------------------------
// use
//
use crate::atom::sealed::AtomRegistry;
use crate::error::Error;
use crate::float::FloatCore;
use crate::fun::ADFun;
use crate::fun::sparsity::Pattern;
use crate::op::{
    self, FLAG_FALSE_VAR, FLAG_LEFT_VAR, FLAG_RIGHT_VAR, FLAG_TRUE_VAR,
    OpCode,
};
// ---------------------------------------------------------------------------
//
// copy_row
/// dest row = src row, within one pattern
fn copy_row<P : Pattern>(work : &mut P, dest : usize, src : usize) {
    work.binary_union_into(dest, src, src);
}
// ---------------------------------------------------------------------------
impl<V> ADFun<V>
where
    V : FloatCore + AtomRegistry,
{
    //
    // for_jac_sparsity
    /// Forward Jacobian sparsity.
    ///
    /// * Syntax :
    /// ```text
    ///     pattern_out = f.for_jac_sparsity(&pattern_in, transpose, dependency)?
    /// ```
    ///
    /// * pattern_in :
    /// a sparsity pattern for a matrix R with one row per independent
    /// variable (transposed when *transpose* is true).
    ///
    /// * pattern_out :
    /// a sparsity pattern for `f'(x) * R` , one row per dependent
    /// (transposed when *transpose* is true).
    ///
    /// * dependency :
    /// when true, compute dependency (not differentiable) relations;
    /// comparison operands of conditional expressions, VecAD indices, and
    /// discrete function arguments establish edges.
    ///
    /// # Example
    /// identity R gives the Jacobian sparsity itself:
    /// ```
    /// use adtape::{start_recording, stop_recording, ListPattern, Pattern};
    /// let ax    = start_recording( vec![ 1f64, 1f64 ] ).unwrap();
    /// let ay    = vec![ &ax[0] * &ax[1] ];
    /// let f     = stop_recording(ay).unwrap();
    /// let mut eye = ListPattern::new(2, 2);
    /// eye.add_element(0, 0);
    /// eye.add_element(1, 1);
    /// let pat = f.for_jac_sparsity(&eye, false, false).unwrap();
    /// assert_eq!( pat.row(0), vec![0, 1] );
    /// ```
    pub fn for_jac_sparsity<P : Pattern>(
        &self,
        pattern_in : &P,
        transpose  : bool,
        dependency : bool,
    ) -> Result<P, Error> {
        let n_ind  = self.n_ind;
        let (rows_in, c) = if transpose {
            (pattern_in.n_col(), pattern_in.n_row())
        } else {
            (pattern_in.n_row(), pattern_in.n_col())
        };
        if rows_in != n_ind {
            return Err( Error::DimensionMismatch {
                what     : "for_jac_sparsity pattern",
                expected : n_ind,
                found    : rows_in,
            } );
        }
        //
        // work, seeded at the independent variables
        let n_work = self.n_var + self.vecad_len.len();
        let mut work = P::new(n_work, c);
        if transpose {
            for r in 0 .. pattern_in.n_row() {
                for col in pattern_in.row(r) {
                    work.add_element(1 + col, r);
                }
            }
        } else {
            for j in 0 .. n_ind {
                for col in pattern_in.row(j) {
                    work.add_element(1 + j, col);
                }
            }
        }
        self.for_jac_work(&mut work, dependency)?;
        //
        // pattern_out
        let n_dep = self.dep_var.len();
        let mut out = if transpose {
            P::new(c, n_dep)
        } else {
            P::new(n_dep, c)
        };
        for i in 0 .. n_dep {
            for col in work.row( self.dep_var[i] as usize ) {
                if transpose {
                    out.add_element(col, i);
                } else {
                    out.add_element(i, col);
                }
            }
        }
        Ok( out )
    }
    //
    // for_jac_work
    /// Propagate a seeded work pattern forward over the whole tape.
    pub(crate) fn for_jac_work<P : Pattern>(
        &self,
        work       : &mut P,
        dependency : bool,
    ) -> Result<(), Error> {
        let var   = &self.var;
        let n_op  = var.n_op();
        let mut i_op = 0usize;
        let mut i_z  = 0usize;
        while i_op < n_op {
            let op    = var.id_all[i_op];
            let n_res = op::n_res(op);
            let arg   = var.arg(i_op);
            let res   = i_z + n_res.wrapping_sub(1);
            match op {
                OpCode::Begin | OpCode::End | OpCode::Inv | OpCode::Par
                | OpCode::Cmp | OpCode::Pri | OpCode::CSkip => (),
                //
                _ if op::is_binary(op) => {
                    let (lhs_var, rhs_var) = op::binary_var_flags(op);
                    match (lhs_var, rhs_var) {
                        (true, true) => work.binary_union_into(
                            res, arg[0] as usize, arg[1] as usize,
                        ),
                        (true, false) =>
                            copy_row(work, res, arg[0] as usize),
                        (false, true) =>
                            copy_row(work, res, arg[1] as usize),
                        _ => unreachable!(),
                    }
                    for aux in i_z .. res {
                        copy_row(work, aux, res);
                    }
                }
                _ if op::is_unary(op) => {
                    for r in i_z ..= res {
                        copy_row(work, r, arg[0] as usize);
                    }
                }
                OpCode::CSum => {
                    work.set_empty(res);
                    let end = arg[op::CSUM_END_SUB_VAR] as usize;
                    for i in op::CSUM_BEGIN .. end {
                        work.row_union(res, arg[i] as usize);
                    }
                }
                OpCode::CExp => {
                    work.set_empty(res);
                    let flags = arg[1];
                    if flags & FLAG_TRUE_VAR != 0 {
                        work.row_union(res, arg[4] as usize);
                    }
                    if flags & FLAG_FALSE_VAR != 0 {
                        work.row_union(res, arg[5] as usize);
                    }
                    if dependency {
                        if flags & FLAG_LEFT_VAR != 0 {
                            work.row_union(res, arg[2] as usize);
                        }
                        if flags & FLAG_RIGHT_VAR != 0 {
                            work.row_union(res, arg[3] as usize);
                        }
                    }
                }
                OpCode::Dis => {
                    work.set_empty(res);
                    if dependency {
                        work.row_union(res, arg[1] as usize);
                    }
                }
                OpCode::Ldp | OpCode::Ldv => {
                    let vec_row = self.n_var + arg[0] as usize;
                    copy_row(work, res, vec_row);
                    if dependency && op == OpCode::Ldv {
                        work.row_union(res, arg[1] as usize);
                    }
                }
                OpCode::Stpp | OpCode::Stpv
                | OpCode::Stvp | OpCode::Stvv => {
                    let vec_row = self.n_var + arg[0] as usize;
                    if matches!(op, OpCode::Stpv | OpCode::Stvv) {
                        work.row_union(vec_row, arg[2] as usize);
                    }
                    let index_is_var =
                        matches!(op, OpCode::Stvp | OpCode::Stvv);
                    if dependency && index_is_var {
                        work.row_union(vec_row, arg[1] as usize);
                    }
                }
                OpCode::Call => {
                    let block = op::parse_call_block(var, i_op, i_z);
                    let atomic = crate::atom::get::<V>(block.atom_id);
                    let pattern =
                        atomic.jac_sparsity(block.call_id, dependency)
                        .ok_or_else( || Error::AtomicFailed {
                            name : atomic.name().to_string(),
                        } )?;
                    for i in 0 .. block.m {
                        if let Some(v) = block.results[i] {
                            for j in pattern.row(i) {
                                let (is_var, index) = block.args[j];
                                if is_var {
                                    work.row_union(v, index as usize);
                                }
                            }
                        }
                    }
                    i_op = block.end + 1;
                    i_z  = block.next_var;
                    continue;
                }
                OpCode::CallArgV | OpCode::CallArgP | OpCode::CallResV
                | OpCode::CallResP | OpCode::CallEnd =>
                    unreachable!( "call block operator outside a call block" ),
                //
                _ => unreachable!(),
            }
            i_z  += n_res;
            i_op += 1;
        }
        Ok(())
    }
    //
    // rev_jac_sparsity
    /// Reverse Jacobian sparsity.
    ///
    /// * Syntax :
    /// ```text
    ///     pattern_out = f.rev_jac_sparsity(&pattern_in, transpose, dependency)?
    /// ```
    ///
    /// * pattern_in :
    /// a sparsity pattern for a matrix R with one row per dependent
    /// (transposed when *transpose* is true).
    ///
    /// * pattern_out :
    /// a sparsity pattern for `R * f'(x)` , one row per dependent of R,
    /// with one column per independent variable
    /// (transposed when *transpose* is true).
    pub fn rev_jac_sparsity<P : Pattern>(
        &self,
        pattern_in : &P,
        transpose  : bool,
        dependency : bool,
    ) -> Result<P, Error> {
        let n_dep = self.dep_var.len();
        let (rows_in, c) = if transpose {
            (pattern_in.n_col(), pattern_in.n_row())
        } else {
            (pattern_in.n_row(), pattern_in.n_col())
        };
        if rows_in != n_dep {
            return Err( Error::DimensionMismatch {
                what     : "rev_jac_sparsity pattern",
                expected : n_dep,
                found    : rows_in,
            } );
        }
        //
        // work, seeded at the dependent variables
        let n_work = self.n_var + self.vecad_len.len();
        let mut work = P::new(n_work, c);
        if transpose {
            for r in 0 .. pattern_in.n_row() {
                for col in pattern_in.row(r) {
                    work.add_element( self.dep_var[col] as usize, r );
                }
            }
        } else {
            for i in 0 .. n_dep {
                for col in pattern_in.row(i) {
                    work.add_element( self.dep_var[i] as usize, col );
                }
            }
        }
        self.rev_jac_work(&mut work, dependency)?;
        //
        // pattern_out, rows at the independent variables
        let n_ind   = self.n_ind;
        let mut out = if transpose {
            P::new(n_ind, c)
        } else {
            P::new(c, n_ind)
        };
        for j in 0 .. n_ind {
            for col in work.row(1 + j) {
                if transpose {
                    out.add_element(j, col);
                } else {
                    out.add_element(col, j);
                }
            }
        }
        Ok( out )
    }
    //
    // rev_jac_work
    /// Propagate a seeded work pattern backward over the whole tape.
    pub(crate) fn rev_jac_work<P : Pattern>(
        &self,
        work       : &mut P,
        dependency : bool,
    ) -> Result<(), Error> {
        let var = &self.var;
        let mut i_op = var.n_op();
        let mut i_z  = self.n_var;
        while i_op > 0 {
            i_op -= 1;
            let op    = var.id_all[i_op];
            let n_res = op::n_res(op);
            i_z -= n_res;
            let res = i_z + n_res.wrapping_sub(1);
            let arg = var.arg(i_op);
            match op {
                OpCode::Begin | OpCode::End | OpCode::Inv | OpCode::Par
                | OpCode::Cmp | OpCode::Pri | OpCode::CSkip => (),
                //
                _ if op::is_binary(op) => {
                    let (lhs_var, rhs_var) = op::binary_var_flags(op);
                    for r in i_z ..= res {
                        if lhs_var {
                            work.row_union(arg[0] as usize, r);
                        }
                        if rhs_var {
                            work.row_union(arg[1] as usize, r);
                        }
                    }
                }
                _ if op::is_unary(op) => {
                    for r in i_z ..= res {
                        work.row_union(arg[0] as usize, r);
                    }
                }
                OpCode::CSum => {
                    let end = arg[op::CSUM_END_SUB_VAR] as usize;
                    for i in op::CSUM_BEGIN .. end {
                        work.row_union(arg[i] as usize, res);
                    }
                }
                OpCode::CExp => {
                    let flags = arg[1];
                    if flags & FLAG_TRUE_VAR != 0 {
                        work.row_union(arg[4] as usize, res);
                    }
                    if flags & FLAG_FALSE_VAR != 0 {
                        work.row_union(arg[5] as usize, res);
                    }
                    if dependency {
                        if flags & FLAG_LEFT_VAR != 0 {
                            work.row_union(arg[2] as usize, res);
                        }
                        if flags & FLAG_RIGHT_VAR != 0 {
                            work.row_union(arg[3] as usize, res);
                        }
                    }
                }
                OpCode::Dis => if dependency {
                    work.row_union(arg[1] as usize, res);
                },
                OpCode::Ldp | OpCode::Ldv => {
                    let vec_row = self.n_var + arg[0] as usize;
                    work.row_union(vec_row, res);
                    if dependency && op == OpCode::Ldv {
                        work.row_union(arg[1] as usize, res);
                    }
                }
                OpCode::Stpp | OpCode::Stpv
                | OpCode::Stvp | OpCode::Stvv => {
                    let vec_row = self.n_var + arg[0] as usize;
                    if matches!(op, OpCode::Stpv | OpCode::Stvv) {
                        work.row_union(arg[2] as usize, vec_row);
                    }
                    let index_is_var =
                        matches!(op, OpCode::Stvp | OpCode::Stvv);
                    if dependency && index_is_var {
                        work.row_union(arg[1] as usize, vec_row);
                    }
                }
                OpCode::CallEnd => {
                    let mut start = i_op;
                    while var.id_all[start] != OpCode::Call {
                        start -= 1;
                    }
                    let m_var = var.id_all[start .. i_op].iter().filter(
                        | op | **op == OpCode::CallResV
                    ).count();
                    i_z -= m_var;
                    let block = op::parse_call_block(var, start, i_z);
                    let atomic = crate::atom::get::<V>(block.atom_id);
                    let pattern =
                        atomic.jac_sparsity(block.call_id, dependency)
                        .ok_or_else( || Error::AtomicFailed {
                            name : atomic.name().to_string(),
                        } )?;
                    for i in 0 .. block.m {
                        if let Some(v) = block.results[i] {
                            for j in pattern.row(i) {
                                let (is_var, index) = block.args[j];
                                if is_var {
                                    work.row_union(index as usize, v);
                                }
                            }
                        }
                    }
                    i_op = start;
                }
                OpCode::Call | OpCode::CallArgV | OpCode::CallArgP
                | OpCode::CallResV | OpCode::CallResP =>
                    unreachable!( "call block operator outside a call block" ),
                //
                _ => unreachable!(),
            }
        }
        Ok(())
    }
}
