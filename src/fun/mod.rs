// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! AD function objects.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// sub-modules
//
pub mod forward;
pub mod reverse;
pub mod drivers;
pub mod sparsity;
pub mod jac_sparsity;
pub mod hes_sparsity;
pub mod optimize;
pub mod serialize;
// ---------------------------------------------------------------------------
// use
//
use crate::error::Error;
use crate::float::FloatCore;
use crate::op::special::VecAdState;
use crate::op::{DynOp, OpCode, TaylorLayout};
use crate::tape::{IndexT, OpSequence};
//
#[cfg(doc)]
use crate::float::doc_generic_v;
// ---------------------------------------------------------------------------
//
// ADFun
/// A function object: the closed tape for one recording, plus the work
/// arenas for its sweeps.
///
/// * V : see [doc_generic_v]
///
/// Evaluation methods take `&mut self` because they reuse the Taylor
/// coefficient and partial arenas; concurrent evaluation requires
/// distinct copies. All recorded state is read only after
/// [stop_recording](crate::stop_recording) .
pub struct ADFun<V> {
    //
    // recorded state
    //
    /// the variable operation sequence
    pub(crate) var        : OpSequence<OpCode>,
    //
    /// number of variables; variable zero is reserved
    pub(crate) n_var      : usize,
    //
    /// number of independent variables; their indices are 1 ..= n_ind
    pub(crate) n_ind      : usize,
    //
    /// variable index for each dependent
    pub(crate) dep_var    : Vec<IndexT>,
    //
    /// the dynamic parameter operation sequence
    pub(crate) dyn_seq    : OpSequence<DynOp>,
    //
    /// parameter pool slot written by each dynamic parameter
    pub(crate) dyn2par    : Vec<IndexT>,
    //
    /// number of independent dynamic parameters
    pub(crate) n_dyn_ind  : usize,
    //
    /// constant and dynamic parameter values
    pub(crate) par_all    : Vec<V>,
    //
    /// classifies each entry of par_all
    pub(crate) par_is_dyn : Vec<bool>,
    //
    /// string pool
    pub(crate) str_all    : Vec<String>,
    //
    /// VecAD record lengths
    pub(crate) vecad_len   : Vec<IndexT>,
    //
    /// start of each VecAD record in vecad_init
    pub(crate) vecad_start : Vec<IndexT>,
    //
    /// initial parameter indices for all VecAD records
    pub(crate) vecad_init : Vec<IndexT>,
    //
    /// number of load operators
    pub(crate) n_load     : usize,
    //
    // work areas, reused between sweeps
    //
    /// Taylor coefficients from the most recent forward sweeps;
    /// see [TaylorLayout]
    pub(crate) taylor     : Vec<V>,
    //
    /// allocated Taylor orders per variable
    pub(crate) cap_order  : usize,
    //
    /// number of directions in the current Taylor layout
    pub(crate) n_dir      : usize,
    //
    /// number of valid Taylor orders (0 when the cache is stale)
    pub(crate) n_taylor   : usize,
    //
    /// partials during a reverse sweep, var * n_ord + k
    pub(crate) partial    : Vec<V>,
    //
    /// operators skipped by the conditional skip operators, recomputed
    /// at every zero order forward
    pub(crate) op_skip    : Vec<bool>,
    //
    /// variable address recorded at each load site during the most
    /// recent zero order forward (zero for none)
    pub(crate) load_var   : Vec<IndexT>,
    //
    /// materialized VecAD contents
    pub(crate) vecad      : VecAdState<V>,
    //
    /// recorded comparisons whose outcome changed during the most recent
    /// zero order forward
    pub(crate) compare_change : usize,
    //
    /// when true, sweeps report nan produced from finite inputs
    pub(crate) check_nan  : bool,
}
// ---------------------------------------------------------------------------
impl<V : FloatCore> ADFun<V> {
    //
    // ADFun::new
    /// An ADFun with an empty operation sequence.
    pub fn new() -> Self {
        Self {
            var        : OpSequence::new(),
            n_var      : 0,
            n_ind      : 0,
            dep_var    : Vec::new(),
            dyn_seq    : OpSequence::new(),
            dyn2par    : Vec::new(),
            n_dyn_ind  : 0,
            par_all    : Vec::new(),
            par_is_dyn : Vec::new(),
            str_all    : Vec::new(),
            vecad_len  : Vec::new(),
            vecad_start : Vec::new(),
            vecad_init : Vec::new(),
            n_load     : 0,
            taylor     : Vec::new(),
            cap_order  : 0,
            n_dir      : 1,
            n_taylor   : 0,
            partial    : Vec::new(),
            op_skip    : Vec::new(),
            load_var   : Vec::new(),
            vecad      : VecAdState { val : Vec::new(), var : Vec::new() },
            compare_change : 0,
            check_nan  : false,
        }
    }
    //
    // domain_len
    /// dimension of the domain space (number of independent variables)
    pub fn domain_len(&self) -> usize {
        self.n_ind
    }
    //
    // range_len
    /// dimension of the range space
    pub fn range_len(&self) -> usize {
        self.dep_var.len()
    }
    //
    // dyn_ind_len
    /// number of independent dynamic parameters
    pub fn dyn_ind_len(&self) -> usize {
        self.n_dyn_ind
    }
    //
    // size_var
    /// number of variables in the operation sequence
    pub fn size_var(&self) -> usize {
        self.n_var
    }
    //
    // size_op
    /// number of operators in the operation sequence
    pub fn size_op(&self) -> usize {
        self.var.n_op()
    }
    //
    // size_par
    /// number of parameters in the parameter pool
    pub fn size_par(&self) -> usize {
        self.par_all.len()
    }
    //
    // check_for_nan
    /// If true, a forward sweep reports [Error::NanEncountered] when an
    /// operator produces nan from inputs that are all finite.
    pub fn check_for_nan(&mut self, check : bool) {
        self.check_nan = check;
    }
    //
    // compare_change_count
    /// After a zero order forward, the number of recorded comparisons
    /// whose boolean outcome differs at the evaluated argument point.
    ///
    /// * Example : see [cond_exp](crate::cond_exp)
    pub fn compare_change_count(&self) -> usize {
        self.compare_change
    }
    //
    // swap
    /// exchange the contents of this ADFun with another
    pub fn swap(&mut self, other : &mut ADFun<V>) {
        std::mem::swap(self, other);
    }
    //
    // layout
    pub(crate) fn layout(&self) -> TaylorLayout {
        TaylorLayout { cap : self.cap_order, r : self.n_dir }
    }
    //
    // ensure_capacity
    /// Grow (or re-shape) the Taylor arena in place so it holds cap
    /// orders and r directions, preserving the first keep_orders orders.
    pub(crate) fn ensure_capacity(
        &mut self,
        cap         : usize,
        r           : usize,
        keep_orders : usize,
    ) {
        if self.cap_order == cap && self.n_dir == r {
            return;
        }
        let old_lay = self.layout();
        let new_lay = TaylorLayout { cap, r };
        let mut new_taylor = vec![ V::zero(); self.n_var * new_lay.tpv() ];
        let keep_dir = usize::min(self.n_dir, r);
        for var in 0 .. self.n_var {
            for k in 0 .. keep_orders {
                if k == 0 {
                    if ! self.taylor.is_empty() {
                        new_taylor[ new_lay.at(var, 0, 0) ] =
                            self.taylor[ old_lay.at(var, 0, 0) ];
                    }
                } else {
                    for ell in 0 .. keep_dir {
                        new_taylor[ new_lay.at(var, k, ell) ] =
                            self.taylor[ old_lay.at(var, k, ell) ];
                    }
                }
            }
        }
        self.taylor    = new_taylor;
        self.cap_order = cap;
        self.n_dir     = r;
    }
}
// ---------------------------------------------------------------------------
// new_dynamic
impl<V> ADFun<V>
where
    V : FloatCore + crate::discrete::sealed::DiscreteRegistry,
{
    //
    /// Rewrite the independent dynamic parameters and re-execute the
    /// dynamic parameter operation sequence, so subsequent forward and
    /// reverse evaluations reflect the new values.
    ///
    /// The Taylor coefficient cache becomes stale; the next forward call
    /// must start at order zero.
    ///
    /// # Example
    /// ```
    /// use adtape::{start_recording_dyn, stop_recording};
    /// let (ap, ax) =
    ///     start_recording_dyn( vec![ 2f64 ], vec![ 5f64 ] ).unwrap();
    /// let ay    = vec![ &ap[0] * &ax[0] ];
    /// let mut f = stop_recording(ay).unwrap();
    /// assert_eq!( f.forward(0, vec![ 5.0 ]).unwrap(), vec![ 10.0 ] );
    /// //
    /// f.new_dynamic( vec![ 7.0 ] ).unwrap();
    /// assert_eq!( f.forward(0, vec![ 5.0 ]).unwrap(), vec![ 35.0 ] );
    /// ```
    pub fn new_dynamic(&mut self, dyn_dom : Vec<V>) -> Result<(), Error> {
        if dyn_dom.len() != self.n_dyn_ind {
            return Err( Error::DimensionMismatch {
                what     : "new_dynamic argument",
                expected : self.n_dyn_ind,
                found    : dyn_dom.len(),
            } );
        }
        for (i, value) in dyn_dom.into_iter().enumerate() {
            self.par_all[ self.dyn2par[i] as usize ] = value;
        }
        for i_op in 0 .. self.dyn_seq.n_op() {
            let op    = self.dyn_seq.id_all[i_op];
            let arg   = self.dyn_seq.arg(i_op);
            let value = eval_dyn_op::<V>(op, arg, &self.par_all)?;
            let slot  = self.dyn2par[self.n_dyn_ind + i_op] as usize;
            self.par_all[slot] = value;
        }
        // the cached coefficients no longer match the parameter pool
        self.n_taylor = 0;
        Ok(())
    }
}
// ---------------------------------------------------------------------------
// eval_dyn_op
/// Evaluate one dynamic parameter operator on the parameter pool.
pub(crate) fn eval_dyn_op<V>(
    op  : DynOp,
    arg : &[IndexT],
    par : &[V],
) -> Result<V, Error>
where
    V : FloatCore + crate::discrete::sealed::DiscreteRegistry,
{
    let a = | i : usize | par[ arg[i] as usize ];
    let value = match op {
        DynOp::Add   => a(0) + a(1),
        DynOp::Sub   => a(0) - a(1),
        DynOp::Mul   => a(0) * a(1),
        DynOp::Div   => a(0) / a(1),
        DynOp::Zmul  => a(0).azmul( a(1) ),
        DynOp::Pow   => a(0).pow( a(1) ),
        DynOp::Abs   => a(0).abs(),
        DynOp::Neg   => -a(0),
        DynOp::Sign  => a(0).signum(),
        DynOp::Sqrt  => a(0).sqrt(),
        DynOp::Exp   => a(0).exp(),
        DynOp::Expm1 => a(0).exp_m1(),
        DynOp::Log   => a(0).ln(),
        DynOp::Log1p => a(0).ln_1p(),
        DynOp::Sin   => a(0).sin(),
        DynOp::Cos   => a(0).cos(),
        DynOp::Sinh  => a(0).sinh(),
        DynOp::Cosh  => a(0).cosh(),
        DynOp::Tan   => a(0).tan(),
        DynOp::Tanh  => a(0).tanh(),
        DynOp::Asin  => a(0).asin(),
        DynOp::Acos  => a(0).acos(),
        DynOp::Atan  => a(0).atan(),
        DynOp::Asinh => a(0).asinh(),
        DynOp::Acosh => a(0).acosh(),
        DynOp::Atanh => a(0).atanh(),
        DynOp::Erf   => a(0).erf(),
        DynOp::Erfc  => a(0).erfc(),
        DynOp::CExp  => {
            let cop =
                crate::ad::cond_exp::CompareOp::try_from( arg[0] as u8 )
                .unwrap();
            if cop.eval( a(1), a(2) ) { a(3) } else { a(4) }
        }
        DynOp::Dis   => {
            crate::discrete::eval::<V>( arg[0] as usize, a(1) )
        }
    };
    Ok(value)
}
