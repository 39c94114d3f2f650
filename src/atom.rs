// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module implements AD atomic functions.
//!
//! They are called atomic functions because each call is recorded as a
//! single operation block in tapes and ADFun objects; the engine knows
//! nothing about their interior.
//!
//! Link to [parent module](super)
//!
//! The registry is process wide and append only: all registrations must
//! happen during single threaded setup; see
//! [setup_parallel](crate::setup_parallel) . A callback may evaluate its
//! own private [ADFun](crate::ADFun) objects but must not touch the
//! recording that is active on the calling thread.
// ---------------------------------------------------------------------------
// use
//
use std::sync::{Arc, LazyLock, RwLock};
//
use crate::ad::{AD, AdType};
use crate::error::Error;
use crate::float::FloatCore;
use crate::fun::sparsity::ListPattern;
use crate::op::OpCode;
use crate::tape::{IndexT, Tape, sealed::ThisThreadTape, with_tape};
//
#[cfg(doc)]
use crate::float::doc_generic_v;
#[cfg(doc)]
use crate::fun::ADFun;
// ---------------------------------------------------------------------------
//
// Atomic
/// The callbacks a user supplies for one atomic function with an
/// n argument, m result signature.
///
/// * V : see [doc_generic_v]
///
/// Taylor coefficient matrices are stored argument (result) major:
/// `taylor_x[ j * n_ord + k ]` is coefficient order k of argument j,
/// with `n_ord = order_up + 1` . The order zero column of `taylor_x` is
/// the argument value vector.
pub trait Atomic<V : FloatCore> : Send + Sync {
    //
    /// the name used in error messages and serialized tapes
    fn name(&self) -> &str;
    //
    // for_type
    /// Classification of each result given the classification of each
    /// argument. The default is the maximum argument classification for
    /// every result.
    fn for_type(
        &self,
        call_id : IndexT,
        type_x  : &[AdType],
    ) -> Vec<AdType> {
        let _ = call_id;
        let max = type_x.iter().copied().max().unwrap_or( AdType::Constant );
        vec![ max; self.n_res() ]
    }
    //
    /// number of results for this atomic function
    fn n_res(&self) -> usize;
    //
    // forward
    /// Compute result coefficient orders `order_low ..= order_up` given
    /// argument orders `0 ..= order_up` ; orders of `taylor_y` below
    /// order_low are valid on input. Only results selected by need_y are
    /// required. Returning false aborts the sweep with
    /// [Error::AtomicOrderUnsupported] .
    fn forward(
        &self,
        call_id   : IndexT,
        need_y    : &[bool],
        order_low : usize,
        order_up  : usize,
        type_x    : &[AdType],
        taylor_x  : &[V],
        taylor_y  : &mut [V],
    ) -> bool;
    //
    // reverse
    /// Given argument and result coefficients for orders
    /// `0 ..= order_up` and partials with respect to the results,
    /// add the partials with respect to the arguments into partial_x.
    /// Returning false aborts the sweep with [Error::AtomicFailed] .
    fn reverse(
        &self,
        call_id   : IndexT,
        order_up  : usize,
        taylor_x  : &[V],
        taylor_y  : &[V],
        partial_x : &mut [V],
        partial_y : &[V],
    ) -> bool {
        let _ = (call_id, order_up, taylor_x, taylor_y, partial_x, partial_y);
        false
    }
    //
    // jac_sparsity
    /// Jacobian sparsity for this function, m rows by n columns;
    /// None aborts a sparsity sweep with [Error::AtomicFailed] .
    fn jac_sparsity(
        &self,
        call_id    : IndexT,
        dependency : bool,
    ) -> Option<ListPattern> {
        let _ = (call_id, dependency);
        None
    }
    //
    // hes_sparsity
    /// Hessian sparsity for this function, n rows by n columns.
    fn hes_sparsity(&self, call_id : IndexT) -> Option<ListPattern> {
        let _ = call_id;
        None
    }
}
// ---------------------------------------------------------------------------
//
// sealed::AtomRegistry
pub(crate) mod sealed {
    //! The sub-module sealed is used to seal traits in this package.
    use std::sync::{Arc, RwLock};
    use super::Atomic;
    use crate::float::FloatCore;
    //
    /// The process wide atomic function registry for one value type.
    pub trait AtomRegistry
    where
        Self : FloatCore + Sized,
    {
        fn registry() -> &'static RwLock< Vec< Arc< dyn Atomic<Self> > > >;
    }
}
//
// impl_atom_registry!
/// Implement the atomic function registry for one value type.
macro_rules! impl_atom_registry{ ($V:ty) => {
    impl sealed::AtomRegistry for $V {
        fn registry() -> &'static RwLock< Vec< Arc< dyn Atomic<$V> > > > {
            static REGISTRY :
                LazyLock< RwLock< Vec< Arc< dyn Atomic<$V> > > > > =
                    LazyLock::new( || RwLock::new( Vec::new() ) );
            &REGISTRY
        }
    }
} }
impl_atom_registry!(f32);
impl_atom_registry!(f64);
// ---------------------------------------------------------------------------
// register_atomic
/// Register an atomic function; returns its atom_id.
///
/// Registration must happen during single threaded setup; the registry
/// is append only afterwards.
pub fn register_atomic<V>( atomic : Arc< dyn Atomic<V> > ) -> usize
where
    V : sealed::AtomRegistry,
{
    let registry = <V as sealed::AtomRegistry>::registry();
    let mut write = registry.write().unwrap();
    write.push( atomic );
    write.len() - 1
}
//
// get
/// The atomic function with this atom_id.
pub(crate) fn get<V>( atom_id : usize ) -> Arc< dyn Atomic<V> >
where
    V : sealed::AtomRegistry,
{
    let registry = <V as sealed::AtomRegistry>::registry();
    let read = registry.read().unwrap();
    read[atom_id].clone()
}
//
// find_by_name
/// The atom_id for a registered name, used when re-binding a serialized
/// function object.
pub(crate) fn find_by_name<V>( name : &str ) -> Option<usize>
where
    V : sealed::AtomRegistry,
{
    let registry = <V as sealed::AtomRegistry>::registry();
    let read = registry.read().unwrap();
    read.iter().position( |atomic| atomic.name() == name )
}
// ---------------------------------------------------------------------------
// call_atomic
/// Evaluate an atomic function on AD arguments and, while recording,
/// capture the call as a single operation block.
///
/// * Syntax :
/// ```text
///     ay = call_atomic(atom_id, call_id, &ax)?
/// ```
///
/// * atom_id :
/// value returned by [register_atomic] for this function.
///
/// * call_id :
/// extra information passed through to every callback for this call.
///
/// Results that the [Atomic::for_type] callback classifies as constants
/// are recorded as parameters; all other results become variables. A
/// call whose arguments include dynamic parameters but no variables is
/// not supported.
pub fn call_atomic<V>(
    atom_id : usize,
    call_id : IndexT,
    ax      : &[ AD<V> ],
) -> Result< Vec< AD<V> >, Error >
where
    V : FloatCore + ThisThreadTape + sealed::AtomRegistry,
{
    let atomic = get::<V>(atom_id);
    let n      = ax.len();
    let m      = atomic.n_res();
    //
    with_tape( |tape : &mut Tape<V>| {
        //
        // type_x
        let type_x : Vec<AdType> = if tape.recording {
            ax.iter().map( |a| tape.arg_class(a) ).collect()
        } else {
            vec![ AdType::Constant; n ]
        };
        //
        // zero order values
        let taylor_x : Vec<V> = ax.iter().map( |a| a.value ).collect();
        let mut taylor_y = vec![ V::zero(); m ];
        let need_y       = vec![ true; m ];
        let ok = atomic.forward(
            call_id, &need_y, 0, 0, &type_x, &taylor_x, &mut taylor_y,
        );
        if ! ok {
            return Err( Error::AtomicFailed {
                name : atomic.name().to_string(),
            } );
        }
        //
        let any_var = type_x.iter().any( |t| t.is_variable() );
        if ! any_var {
            assert!( ! type_x.iter().any( |t| t.is_dynamic() ),
                "call_atomic: arguments with dynamic parameters but no \
                 variables are not supported"
            );
            let ay = taylor_y.into_iter().map( AD::constant ).collect();
            return Ok( ay );
        }
        //
        // record the call block
        let type_y = atomic.for_type(call_id, &type_x);
        assert_eq!( type_y.len(), m,
            "call_atomic: for_type result has the wrong length"
        );
        tape.record_var_op(
            OpCode::Call,
            &[ atom_id as IndexT, call_id, n as IndexT, m as IndexT ],
        );
        for (j, a) in ax.iter().enumerate() {
            match type_x[j] {
                AdType::Variable =>
                    tape.record_var_op( OpCode::CallArgV, &[ a.index ] ),
                AdType::Dynamic  =>
                    tape.record_var_op( OpCode::CallArgP, &[ a.index ] ),
                AdType::Constant => {
                    let par = tape.par_constant( a.value );
                    tape.record_var_op( OpCode::CallArgP, &[ par ] )
                }
            };
        }
        let mut ay = Vec::with_capacity(m);
        for i in 0 .. m {
            if type_y[i].is_constant() {
                let par = tape.par_constant( taylor_y[i] );
                tape.record_var_op( OpCode::CallResP, &[ par ] );
                ay.push( AD::constant( taylor_y[i] ) );
            } else {
                let res = tape.record_var_op( OpCode::CallResV, &[] );
                ay.push( AD::new(
                    tape.tape_id, res, AdType::Variable, taylor_y[i],
                ) );
            }
        }
        tape.record_var_op( OpCode::CallEnd, &[] );
        //
        // remember the name for serialized tapes
        tape.str_index( atomic.name() );
        Ok( ay )
    } )
}
