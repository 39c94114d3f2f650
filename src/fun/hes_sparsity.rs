// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Implement the [ADFun] Hessian sparsity methods.
//!
//! Link to [parent module](super)
//!
//! Per operator contributions: linear operators only pass Hessian
//! information through; a bilinear operator (multiplication, division by
//! a variable) adds the outer union of its operands' Jacobian rows; a
//! nonlinear unary operator adds the self outer product of its operand's
//! Jacobian row. Only operators whose result reaches a selected
//! dependent contribute.
// ---------------------------------------------------------------------------
// use
//
use crate::atom::sealed::AtomRegistry;
use crate::error::Error;
use crate::float::FloatCore;
use crate::fun::ADFun;
use crate::fun::sparsity::Pattern;
use crate::op::{self, FLAG_FALSE_VAR, FLAG_TRUE_VAR, OpCode};
// ---------------------------------------------------------------------------
//
// BinHes
/// Second order structure of one binary operator.
enum BinHes {
    /// no second order contribution
    Linear,
    /// left times right cross terms
    Cross,
    /// cross terms plus right self terms (division by a variable)
    CrossRightSelf,
    /// right self terms only
    RightSelf,
    /// left self terms only
    LeftSelf,
    /// every pairing of left and right (variable to a variable power)
    Full,
}
//
// bin_hes
fn bin_hes(op : OpCode) -> BinHes {
    use OpCode::*;
    match op {
        MulVv | ZmulVv => BinHes::Cross,
        DivVv          => BinHes::CrossRightSelf,
        DivPv          => BinHes::RightSelf,
        PowPv          => BinHes::RightSelf,
        PowVp          => BinHes::LeftSelf,
        PowVv          => BinHes::Full,
        _              => BinHes::Linear,
    }
}
//
// unary_is_nonlinear
fn unary_is_nonlinear(op : OpCode) -> bool {
    ! matches!(op, OpCode::Neg | OpCode::Abs | OpCode::Sign)
}
// ---------------------------------------------------------------------------
//
// outer
/// add the outer product of two Jacobian rows to the output pattern
fn outer<P : Pattern>(
    out    : &mut P,
    jac    : &P,
    row_a  : usize,
    row_b  : usize,
) {
    for a in jac.row(row_a) {
        for b in jac.row(row_b) {
            out.add_element(a, b);
            out.add_element(b, a);
        }
    }
}
// ---------------------------------------------------------------------------
impl<V> ADFun<V>
where
    V : FloatCore + AtomRegistry,
{
    //
    // rev_jac_bool
    /// Which variables (and VecAD records) reach a selected dependent;
    /// the scalar form of reverse Jacobian sparsity.
    pub(crate) fn rev_jac_bool(
        &self,
        select_y : &[bool],
    ) -> Result< Vec<bool>, Error > {
        let var = &self.var;
        let mut reach = vec![ false; self.n_var + self.vecad_len.len() ];
        for (i, index) in self.dep_var.iter().enumerate() {
            if select_y[i] {
                reach[*index as usize] = true;
            }
        }
        let mut i_op = var.n_op();
        let mut i_z  = self.n_var;
        while i_op > 0 {
            i_op -= 1;
            let op    = var.id_all[i_op];
            let n_res = op::n_res(op);
            i_z -= n_res;
            let res = i_z + n_res.wrapping_sub(1);
            let arg = var.arg(i_op);
            let any_res = n_res > 0 && (i_z ..= res).any( |r| reach[r] );
            match op {
                _ if op::is_binary(op) => if any_res {
                    let (lhs_var, rhs_var) = op::binary_var_flags(op);
                    if lhs_var {
                        reach[ arg[0] as usize ] = true;
                    }
                    if rhs_var {
                        reach[ arg[1] as usize ] = true;
                    }
                },
                _ if op::is_unary(op) => if any_res && op != OpCode::Sign {
                    reach[ arg[0] as usize ] = true;
                },
                OpCode::CSum => if any_res {
                    let end = arg[op::CSUM_END_SUB_VAR] as usize;
                    for i in op::CSUM_BEGIN .. end {
                        reach[ arg[i] as usize ] = true;
                    }
                },
                OpCode::CExp => if any_res {
                    let flags = arg[1];
                    if flags & FLAG_TRUE_VAR != 0 {
                        reach[ arg[4] as usize ] = true;
                    }
                    if flags & FLAG_FALSE_VAR != 0 {
                        reach[ arg[5] as usize ] = true;
                    }
                },
                OpCode::Ldp | OpCode::Ldv => if any_res {
                    reach[ self.n_var + arg[0] as usize ] = true;
                },
                OpCode::Stpv | OpCode::Stvv => {
                    if reach[ self.n_var + arg[0] as usize ] {
                        reach[ arg[2] as usize ] = true;
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
                    let block  = op::parse_call_block(var, start, i_z);
                    let atomic = crate::atom::get::<V>(block.atom_id);
                    let pattern =
                        atomic.jac_sparsity(block.call_id, false)
                        .ok_or_else( || Error::AtomicFailed {
                            name : atomic.name().to_string(),
                        } )?;
                    for i in 0 .. block.m {
                        if let Some(v) = block.results[i] {
                            if reach[v] {
                                for j in pattern.row(i) {
                                    let (is_var, index) = block.args[j];
                                    if is_var {
                                        reach[index as usize] = true;
                                    }
                                }
                            }
                        }
                    }
                    i_op = start;
                }
                _ => (),
            }
        }
        Ok( reach )
    }
    //
    // for_hes_sparsity
    /// Forward Hessian sparsity.
    ///
    /// * Syntax :
    /// ```text
    ///     pattern_out = f.for_hes_sparsity(select_x, select_y)?
    /// ```
    ///
    /// * select_x , select_y :
    /// which independents (dependents) participate.
    ///
    /// * pattern_out :
    /// an n by n pattern for the Hessian of the sum of the selected
    /// dependents, restricted to the selected independents.
    ///
    /// # Example
    /// ```
    /// use adtape::{start_recording, stop_recording, ListPattern, Pattern};
    /// let ax  = start_recording( vec![ 1f64, 1f64 ] ).unwrap();
    /// let ay  = vec![ &ax[0] * &ax[1] ];
    /// let f   = stop_recording(ay).unwrap();
    /// let pat : ListPattern =
    ///     f.for_hes_sparsity( &[true, true], &[true] ).unwrap();
    /// assert_eq!( pat.row(0), vec![1] );
    /// assert_eq!( pat.row(1), vec![0] );
    /// ```
    pub fn for_hes_sparsity<P : Pattern>(
        &self,
        select_x : &[bool],
        select_y : &[bool],
    ) -> Result<P, Error> {
        let n = self.n_ind;
        assert_eq!( select_x.len(), n );
        assert_eq!( select_y.len(), self.dep_var.len() );
        //
        // reach: which variables matter for the selected dependents
        let reach = self.rev_jac_bool(select_y)?;
        //
        // jac: forward Jacobian rows for every variable
        let mut jac = P::new( self.n_var + self.vecad_len.len(), n );
        for (j, select) in select_x.iter().enumerate() {
            if *select {
                jac.add_element(1 + j, j);
            }
        }
        self.for_jac_work(&mut jac, false)?;
        //
        // accumulate the per operator contributions
        let var     = &self.var;
        let mut out = P::new(n, n);
        let mut i_op = 0usize;
        let mut i_z  = 0usize;
        while i_op < var.n_op() {
            let op    = var.id_all[i_op];
            let n_res = op::n_res(op);
            let arg   = var.arg(i_op);
            let res   = i_z + n_res.wrapping_sub(1);
            let active = n_res > 0 && (i_z ..= res).any( |r| reach[r] );
            match op {
                _ if op::is_binary(op) => if active {
                    let (lhs_var, rhs_var) = op::binary_var_flags(op);
                    let lhs = arg[0] as usize;
                    let rhs = arg[1] as usize;
                    match bin_hes(op) {
                        BinHes::Linear => (),
                        BinHes::Cross =>
                            outer(&mut out, &jac, lhs, rhs),
                        BinHes::CrossRightSelf => {
                            outer(&mut out, &jac, lhs, rhs);
                            outer(&mut out, &jac, rhs, rhs);
                        }
                        BinHes::RightSelf => {
                            debug_assert!( rhs_var );
                            outer(&mut out, &jac, rhs, rhs);
                        }
                        BinHes::LeftSelf => {
                            debug_assert!( lhs_var );
                            outer(&mut out, &jac, lhs, lhs);
                        }
                        BinHes::Full => {
                            outer(&mut out, &jac, lhs, rhs);
                            outer(&mut out, &jac, lhs, lhs);
                            outer(&mut out, &jac, rhs, rhs);
                        }
                    }
                },
                _ if op::is_unary(op) => {
                    if active && unary_is_nonlinear(op) {
                        outer(&mut out, &jac, arg[0] as usize, arg[0] as usize);
                    }
                }
                OpCode::Call => {
                    let block  = op::parse_call_block(var, i_op, i_z);
                    let active = block.results.iter().any(
                        | r | matches!(r, Some(v) if reach[*v])
                    );
                    if active {
                        let atomic = crate::atom::get::<V>(block.atom_id);
                        let pattern = atomic.hes_sparsity(block.call_id)
                            .ok_or_else( || Error::AtomicFailed {
                                name : atomic.name().to_string(),
                            } )?;
                        for a in 0 .. block.n {
                            for b in pattern.row(a) {
                                let (a_var, a_index) = block.args[a];
                                let (b_var, b_index) = block.args[b];
                                if a_var && b_var {
                                    outer(
                                        &mut out, &jac,
                                        a_index as usize, b_index as usize,
                                    );
                                }
                            }
                        }
                    }
                    i_op = block.end + 1;
                    i_z  = block.next_var;
                    continue;
                }
                _ => (),
            }
            i_z  += n_res;
            i_op += 1;
        }
        Ok( out )
    }
    //
    // rev_hes_sparsity
    /// Reverse Hessian sparsity.
    ///
    /// * Syntax :
    /// ```text
    ///     pattern_out = f.rev_hes_sparsity(select_y, transpose)?
    /// ```
    ///
    /// Maintains, walking the tape backwards, a Hessian row for every
    /// variable; a nonlinear operator whose result reaches a selected
    /// dependent adds its operands' forward Jacobian rows.
    pub fn rev_hes_sparsity<P : Pattern>(
        &self,
        select_y  : &[bool],
        transpose : bool,
    ) -> Result<P, Error> {
        let n = self.n_ind;
        assert_eq!( select_y.len(), self.dep_var.len() );
        //
        // jac: forward Jacobian rows for every variable
        let n_work  = self.n_var + self.vecad_len.len();
        let mut jac = P::new(n_work, n);
        for j in 0 .. n {
            jac.add_element(1 + j, j);
        }
        self.for_jac_work(&mut jac, false)?;
        //
        // reach
        let reach = self.rev_jac_bool(select_y)?;
        //
        // hes: per variable Hessian rows, walking backwards
        let var     = &self.var;
        let mut hes = P::new(n_work, n);
        let mut i_op = var.n_op();
        let mut i_z  = self.n_var;
        while i_op > 0 {
            i_op -= 1;
            let op    = var.id_all[i_op];
            let n_res = op::n_res(op);
            i_z -= n_res;
            let res = i_z + n_res.wrapping_sub(1);
            let arg = var.arg(i_op);
            let active = n_res > 0 && (i_z ..= res).any( |r| reach[r] );
            match op {
                _ if op::is_binary(op) => {
                    let (lhs_var, rhs_var) = op::binary_var_flags(op);
                    let lhs = arg[0] as usize;
                    let rhs = arg[1] as usize;
                    for r in i_z ..= res {
                        if lhs_var {
                            hes.row_union(lhs, r);
                        }
                        if rhs_var {
                            hes.row_union(rhs, r);
                        }
                    }
                    if active {
                        match bin_hes(op) {
                            BinHes::Linear => (),
                            BinHes::Cross => {
                                hes.row_union_other(lhs, &jac, rhs);
                                hes.row_union_other(rhs, &jac, lhs);
                            }
                            BinHes::CrossRightSelf => {
                                hes.row_union_other(lhs, &jac, rhs);
                                hes.row_union_other(rhs, &jac, lhs);
                                hes.row_union_other(rhs, &jac, rhs);
                            }
                            BinHes::RightSelf =>
                                hes.row_union_other(rhs, &jac, rhs),
                            BinHes::LeftSelf =>
                                hes.row_union_other(lhs, &jac, lhs),
                            BinHes::Full => {
                                hes.row_union_other(lhs, &jac, lhs);
                                hes.row_union_other(lhs, &jac, rhs);
                                hes.row_union_other(rhs, &jac, lhs);
                                hes.row_union_other(rhs, &jac, rhs);
                            }
                        }
                    }
                }
                _ if op::is_unary(op) => {
                    let x = arg[0] as usize;
                    for r in i_z ..= res {
                        hes.row_union(x, r);
                    }
                    if active && unary_is_nonlinear(op) {
                        hes.row_union_other(x, &jac, x);
                    }
                }
                OpCode::CSum => {
                    let end = arg[op::CSUM_END_SUB_VAR] as usize;
                    for i in op::CSUM_BEGIN .. end {
                        hes.row_union(arg[i] as usize, res);
                    }
                }
                OpCode::CExp => {
                    let flags = arg[1];
                    if flags & FLAG_TRUE_VAR != 0 {
                        hes.row_union(arg[4] as usize, res);
                    }
                    if flags & FLAG_FALSE_VAR != 0 {
                        hes.row_union(arg[5] as usize, res);
                    }
                }
                OpCode::Ldp | OpCode::Ldv => {
                    let vec_row = self.n_var + arg[0] as usize;
                    hes.row_union(vec_row, res);
                }
                OpCode::Stpv | OpCode::Stvv => {
                    let vec_row = self.n_var + arg[0] as usize;
                    hes.row_union(arg[2] as usize, vec_row);
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
                    let block  = op::parse_call_block(var, start, i_z);
                    let atomic = crate::atom::get::<V>(block.atom_id);
                    let jac_pat =
                        atomic.jac_sparsity(block.call_id, false)
                        .ok_or_else( || Error::AtomicFailed {
                            name : atomic.name().to_string(),
                        } )?;
                    let active = block.results.iter().any(
                        | r | matches!(r, Some(v) if reach[*v])
                    );
                    for i in 0 .. block.m {
                        if let Some(v) = block.results[i] {
                            for j in jac_pat.row(i) {
                                let (is_var, index) = block.args[j];
                                if is_var {
                                    hes.row_union(index as usize, v);
                                }
                            }
                        }
                    }
                    if active {
                        let hes_pat = atomic.hes_sparsity(block.call_id)
                            .ok_or_else( || Error::AtomicFailed {
                                name : atomic.name().to_string(),
                            } )?;
                        for a in 0 .. block.n {
                            for b in hes_pat.row(a) {
                                let (a_var, a_index) = block.args[a];
                                let (b_var, b_index) = block.args[b];
                                if a_var && b_var {
                                    hes.row_union_other(
                                        a_index as usize, &jac,
                                        b_index as usize,
                                    );
                                }
                            }
                        }
                    }
                    i_op = start;
                }
                _ => (),
            }
        }
        //
        // pattern_out
        let mut out = P::new(n, n);
        for j in 0 .. n {
            for col in hes.row(1 + j) {
                if transpose {
                    out.add_element(col, j);
                } else {
                    out.add_element(j, col);
                }
            }
        }
        Ok( out )
    }
}
