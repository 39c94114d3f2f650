// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module implements VecAD, the tape indexable array type.
//!
//! Link to [parent module](super)
//!
//! A VecAD is an array whose elements, and whose index, can both be
//! tape resident values. Loads and stores are recorded; when the
//! function object is replayed, the array contents are materialized at
//! zero order forward and the stores re-execute in tape order, so a load
//! sees the element most recently stored at its position in the
//! recording. A load result is always a variable. At orders one and
//! higher the index is frozen at its zero order value, so no derivative
//! flows through the index.
// ---------------------------------------------------------------------------
// use
//
use crate::ad::{AD, AdType};
use crate::float::FloatCore;
use crate::op::OpCode;
use crate::tape::{IndexT, Tape, sealed::ThisThreadTape, with_tape};
// ---------------------------------------------------------------------------
//
// VecAD
/// A tape indexable array of *V* values; see [the module](self) .
///
/// # Example
/// ```
/// use adtape::{start_recording, stop_recording, VecAD};
/// // y = v[ floor(x0) ] with v = [ 0, 1, 4, 9 ]
/// let ax    = start_recording( vec![ 2f64 ] ).unwrap();
/// let mut v = VecAD::new( vec![ 0.0, 1.0, 4.0, 9.0 ] );
/// let ay    = vec![ v.load( &ax[0] ) ];
/// let mut f = stop_recording(ay).unwrap();
/// //
/// assert_eq!( f.forward(0, vec![ 2.0 ]).unwrap(), vec![ 4.0 ] );
/// assert_eq!( f.forward(0, vec![ 3.5 ]).unwrap(), vec![ 9.0 ] );
/// // the index is not differentiated
/// assert_eq!( f.forward(1, vec![ 1.0 ]).unwrap(), vec![ 0.0 ] );
/// ```
pub struct VecAD<V> {
    //
    /// the recording this vector belongs to
    tape_id : usize,
    //
    /// this vector's record in the tape's VecAD pool
    vec_id  : IndexT,
    //
    /// recording time mirror of the current contents
    data    : Vec< AD<V> >,
}
// ---------------------------------------------------------------------------
impl<V> VecAD<V>
where
    V : FloatCore + ThisThreadTape,
{
    //
    // VecAD::new
    /// Allocate a VecAD record, with the given initial values, on this
    /// thread's recording. There must be an active recording.
    pub fn new( init : Vec<V> ) -> Self {
        assert!( ! init.is_empty(), "VecAD::new: the vector is empty" );
        with_tape( |tape : &mut Tape<V>| {
            assert!( tape.recording,
                "VecAD::new: this thread is not recording"
            );
            let vec_id = tape.vecad_len.len() as IndexT;
            tape.vecad_start.push( tape.vecad_init.len() as IndexT );
            tape.vecad_len.push( init.len() as IndexT );
            for value in init.iter() {
                let par = tape.par_constant( *value );
                tape.vecad_init.push( par );
            }
            Self {
                tape_id : tape.tape_id,
                vec_id,
                data    : init.into_iter().map( AD::constant ).collect(),
            }
        } )
    }
    //
    // VecAD::len
    /// number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }
    //
    // VecAD::is_empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    //
    // VecAD::load
    /// Read the element selected by an AD index (its value is floored).
    /// The result is a variable; its higher order coefficients treat the
    /// index as constant at its zero order value.
    pub fn load(&mut self, index : &AD<V>) -> AD<V> {
        let i = index.value.to_index();
        assert!( i < self.data.len(),
            "VecAD::load: index {} is outside a vector of length {}",
            i, self.data.len()
        );
        let value = self.data[i].value;
        with_tape( |tape : &mut Tape<V>| {
            assert!( tape.recording && tape.tape_id == self.tape_id,
                "VecAD::load: this vector's recording is not active"
            );
            let slot = tape.n_load;
            tape.n_load += 1;
            let (op, index_arg) = match tape.arg_class(index) {
                AdType::Variable => (OpCode::Ldv, index.index),
                AdType::Dynamic  => (OpCode::Ldp, index.index),
                AdType::Constant =>
                    (OpCode::Ldp, tape.par_constant( index.value )),
            };
            let res = tape.record_var_op(
                op, &[ self.vec_id, index_arg, slot ],
            );
            AD::new(tape.tape_id, res, AdType::Variable, value)
        } )
    }
    //
    // VecAD::store
    /// Write the element selected by an AD index (its value is floored).
    /// Storing a variable upgrades the element, so later loads of this
    /// position carry its derivatives.
    pub fn store(&mut self, index : &AD<V>, value : &AD<V>) {
        let i = index.value.to_index();
        assert!( i < self.data.len(),
            "VecAD::store: index {} is outside a vector of length {}",
            i, self.data.len()
        );
        with_tape( |tape : &mut Tape<V>| {
            assert!( tape.recording && tape.tape_id == self.tape_id,
                "VecAD::store: this vector's recording is not active"
            );
            let (index_var, index_arg) = match tape.arg_class(index) {
                AdType::Variable => (true, index.index),
                AdType::Dynamic  => (false, index.index),
                AdType::Constant =>
                    (false, tape.par_constant( index.value )),
            };
            let (value_var, value_arg) = match tape.arg_class(value) {
                AdType::Variable => (true, value.index),
                AdType::Dynamic  => (false, value.index),
                AdType::Constant =>
                    (false, tape.par_constant( value.value )),
            };
            let op = match (index_var, value_var) {
                (false, false) => OpCode::Stpp,
                (false, true)  => OpCode::Stpv,
                (true,  false) => OpCode::Stvp,
                (true,  true)  => OpCode::Stvv,
            };
            tape.record_var_op(
                op, &[ self.vec_id, index_arg, value_arg ],
            );
        } );
        self.data[i] = *value;
    }
}
