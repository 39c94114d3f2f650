// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module implements discrete functions.
//!
//! Link to [parent module](super)
//!
//! A discrete function is a registered pure *V* to *V* table lookup.
//! Its value is recorded, but all of its Taylor coefficients of order one
//! and higher are zero and it contributes nothing in reverse mode.
// ---------------------------------------------------------------------------
// use
//
use std::sync::{LazyLock, RwLock};
//
use crate::ad::{AD, AdType};
use crate::float::FloatCore;
use crate::op::{DynOp, OpCode};
use crate::tape::{IndexT, Tape, sealed::ThisThreadTape, with_tape};
// ---------------------------------------------------------------------------
//
// DiscreteEntry
/// One registered discrete function.
pub(crate) struct DiscreteEntry<V> {
    pub(crate) name : String,
    pub(crate) eval : fn(V) -> V,
}
// ---------------------------------------------------------------------------
//
// sealed::DiscreteRegistry
pub(crate) mod sealed {
    //! The sub-module sealed is used to seal traits in this package.
    use std::sync::RwLock;
    use super::DiscreteEntry;
    use crate::float::FloatCore;
    //
    /// The process wide discrete function registry for one value type.
    pub trait DiscreteRegistry
    where
        Self : FloatCore + Sized,
    {
        fn registry() -> &'static RwLock< Vec< DiscreteEntry<Self> > >;
    }
}
//
// impl_discrete_registry!
/// Implement the discrete function registry for one value type.
macro_rules! impl_discrete_registry{ ($V:ty) => {
    impl sealed::DiscreteRegistry for $V {
        fn registry() -> &'static RwLock< Vec< DiscreteEntry<$V> > > {
            static REGISTRY :
                LazyLock< RwLock< Vec< DiscreteEntry<$V> > > > =
                    LazyLock::new( || RwLock::new( Vec::new() ) );
            &REGISTRY
        }
    }
} }
impl_discrete_registry!(f32);
impl_discrete_registry!(f64);
// ---------------------------------------------------------------------------
// register_discrete
/// Register a discrete function; returns its dis_id.
///
/// Registration must happen during single threaded setup; the registry
/// is append only afterwards.
///
/// # Example
/// ```
/// use adtape::{register_discrete, discrete, ad_from_value};
/// fn floor_f64(x : f64) -> f64 { x.floor() }
/// let dis_id = register_discrete::<f64>("floor", floor_f64);
/// let ax     = ad_from_value( 1.7f64 );
/// assert_eq!( discrete(dis_id, &ax).to_value(), 1.0 );
/// ```
pub fn register_discrete<V>( name : &str, eval : fn(V) -> V ) -> usize
where
    V : sealed::DiscreteRegistry,
{
    let registry  = <V as sealed::DiscreteRegistry>::registry();
    let mut write = registry.write().unwrap();
    write.push( DiscreteEntry { name : name.to_string(), eval } );
    write.len() - 1
}
//
// eval
/// Evaluate the discrete function with this dis_id.
pub(crate) fn eval<V>( dis_id : usize, x : V ) -> V
where
    V : sealed::DiscreteRegistry,
{
    let registry = <V as sealed::DiscreteRegistry>::registry();
    let read     = registry.read().unwrap();
    ( read[dis_id].eval )(x)
}
//
// name_of
pub(crate) fn name_of<V>( dis_id : usize ) -> String
where
    V : sealed::DiscreteRegistry,
{
    let registry = <V as sealed::DiscreteRegistry>::registry();
    registry.read().unwrap()[dis_id].name.clone()
}
//
// find_by_name
pub(crate) fn find_by_name<V>( name : &str ) -> Option<usize>
where
    V : sealed::DiscreteRegistry,
{
    let registry = <V as sealed::DiscreteRegistry>::registry();
    let read     = registry.read().unwrap();
    read.iter().position( |entry| entry.name == name )
}
// ---------------------------------------------------------------------------
// discrete
/// Evaluate a discrete function on an AD argument, recording the call.
///
/// All Taylor coefficients of order one and higher for the result are
/// zero, and reverse mode partials do not flow through it.
pub fn discrete<V>( dis_id : usize, ax : &AD<V> ) -> AD<V>
where
    V : FloatCore + ThisThreadTape + sealed::DiscreteRegistry,
{
    let new_value = eval::<V>( dis_id, ax.value );
    let (tape_id, index, tag) = with_tape( |tape : &mut Tape<V>| {
        if ! tape.recording {
            return (0, 0, AdType::Constant);
        }
        match tape.arg_class(ax) {
            AdType::Constant => (0, 0, AdType::Constant),
            AdType::Variable => {
                let res = tape.record_var_op(
                    OpCode::Dis, &[ dis_id as IndexT, ax.index ],
                );
                (tape.tape_id, res, AdType::Variable)
            }
            AdType::Dynamic => {
                let par = tape.new_dyn_par(
                    new_value, DynOp::Dis, &[ dis_id as IndexT, ax.index ],
                );
                (tape.tape_id, par, AdType::Dynamic)
            }
        }
    } );
    AD::new(tape_id, index, tag, new_value)
}
