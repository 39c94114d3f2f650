// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module implements checkpoint functions.
//!
//! Link to [parent module](super)
//!
//! A checkpoint re-exposes a finished [ADFun] as an atomic function:
//! the inner recording is captured once, and every appearance in an
//! outer recording is a single atomic call block. The forward, reverse,
//! and sparsity callbacks delegate to the inner function's sweeps.
// ---------------------------------------------------------------------------
// use
//
use std::sync::{Arc, Mutex};
//
use crate::ad::AdType;
use crate::atom::{Atomic, register_atomic, sealed::AtomRegistry};
use crate::discrete::sealed::DiscreteRegistry;
use crate::float::FloatCore;
use crate::fun::ADFun;
use crate::fun::sparsity::{ListPattern, Pattern};
use crate::tape::IndexT;
// ---------------------------------------------------------------------------
//
// Checkpoint
/// An [ADFun] wrapped as an atomic function.
///
/// The inner function must not have independent dynamic parameters.
/// Evaluation locks the inner function because its sweeps reuse the
/// coefficient arenas.
///
/// # Example
/// ```
/// use adtape::{
///     start_recording, stop_recording, call_atomic, Checkpoint,
/// };
/// // inner: g(x) = x0 * x1
/// let ax  = start_recording( vec![ 1f64, 1f64 ] ).unwrap();
/// let ay  = vec![ &ax[0] * &ax[1] ];
/// let g   = stop_recording(ay).unwrap();
/// let id  = Checkpoint::register("g_checkpoint", g);
/// //
/// // outer: f(x) = g(x0 + x1, x1)
/// let ax  = start_recording( vec![ 2f64, 3f64 ] ).unwrap();
/// let au  = vec![ &ax[0] + &ax[1], ax[1] ];
/// let ay  = call_atomic(id, 0, &au).unwrap();
/// let mut f = stop_recording(ay).unwrap();
/// //
/// let y = f.forward(0, vec![ 2.0, 3.0 ]).unwrap();
/// assert_eq!( y, vec![ 15.0 ] );
/// let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
/// assert_eq!( dw, vec![ 3.0, 8.0 ] );
/// ```
pub struct Checkpoint<V> {
    name : String,
    fun  : Mutex< ADFun<V> >,
}
// ---------------------------------------------------------------------------
impl<V> Checkpoint<V>
where
    V : FloatCore + AtomRegistry + DiscreteRegistry,
{
    //
    // Checkpoint::new
    pub fn new( name : &str, fun : ADFun<V> ) -> Arc<Self> {
        assert_eq!( fun.dyn_ind_len(), 0,
            "Checkpoint: the inner function has independent dynamic \
             parameters"
        );
        Arc::new( Self {
            name : name.to_string(),
            fun  : Mutex::new(fun),
        } )
    }
    //
    // Checkpoint::register
    /// Wrap and register in one step; returns the atom_id to use with
    /// [call_atomic](crate::call_atomic) .
    pub fn register( name : &str, fun : ADFun<V> ) -> usize {
        register_atomic( Checkpoint::new(name, fun) )
    }
}
// ---------------------------------------------------------------------------
impl<V> Atomic<V> for Checkpoint<V>
where
    V : FloatCore + AtomRegistry + DiscreteRegistry,
{
    //
    fn name(&self) -> &str {
        &self.name
    }
    //
    fn n_res(&self) -> usize {
        self.fun.lock().unwrap().range_len()
    }
    //
    // forward
    /// delegate to the inner function's forward sweeps, order by order
    fn forward(
        &self,
        _call_id  : IndexT,
        _need_y   : &[bool],
        order_low : usize,
        order_up  : usize,
        _type_x   : &[AdType],
        taylor_x  : &[V],
        taylor_y  : &mut [V],
    ) -> bool {
        let mut fun = self.fun.lock().unwrap();
        let n     = fun.domain_len();
        let m     = fun.range_len();
        let n_ord = order_up + 1;
        for k in 0 ..= order_up {
            let xk : Vec<V> =
                (0 .. n).map( |j| taylor_x[j * n_ord + k] ).collect();
            match fun.forward(k, xk) {
                Err(_) => return false,
                Ok(yk) => {
                    if k >= order_low {
                        for i in 0 .. m {
                            taylor_y[i * n_ord + k] = yk[i];
                        }
                    }
                }
            }
        }
        true
    }
    //
    // reverse
    /// forward the inner function to order_up, then one reverse sweep
    fn reverse(
        &self,
        _call_id  : IndexT,
        order_up  : usize,
        taylor_x  : &[V],
        _taylor_y : &[V],
        partial_x : &mut [V],
        partial_y : &[V],
    ) -> bool {
        let mut fun = self.fun.lock().unwrap();
        let n     = fun.domain_len();
        let n_ord = order_up + 1;
        for k in 0 ..= order_up {
            let xk : Vec<V> =
                (0 .. n).map( |j| taylor_x[j * n_ord + k] ).collect();
            if fun.forward(k, xk).is_err() {
                return false;
            }
        }
        match fun.reverse(order_up, partial_y.to_vec()) {
            Err(_) => false,
            Ok(dw) => {
                for j in 0 .. n {
                    for k in 0 .. n_ord {
                        partial_x[j * n_ord + k] += dw[j * n_ord + k];
                    }
                }
                true
            }
        }
    }
    //
    // jac_sparsity
    fn jac_sparsity(
        &self,
        _call_id   : IndexT,
        dependency : bool,
    ) -> Option<ListPattern> {
        let fun = self.fun.lock().unwrap();
        let n   = fun.domain_len();
        let mut eye = ListPattern::new(n, n);
        for j in 0 .. n {
            eye.add_element(j, j);
        }
        fun.for_jac_sparsity(&eye, false, dependency).ok()
    }
    //
    // hes_sparsity
    fn hes_sparsity(&self, _call_id : IndexT) -> Option<ListPattern> {
        let fun = self.fun.lock().unwrap();
        let select_x = vec![ true; fun.domain_len() ];
        let select_y = vec![ true; fun.range_len() ];
        fun.for_hes_sparsity(&select_x, &select_y).ok()
    }
}
