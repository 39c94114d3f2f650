// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module defines tape objects and the recording protocol.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
//
use std::cell::RefCell;
use std::sync::Mutex;
use std::thread::LocalKey;
//
use rustc_hash::FxHashMap;
//
use crate::ad::{AD, AdType};
use crate::error::Error;
use crate::float::FloatCore;
use crate::fun::ADFun;
use crate::op::{DynOp, OpCode};
//
#[cfg(doc)]
use crate::float::doc_generic_v;
// ---------------------------------------------------------------------------
//
/// This type is used, instead of usize, to save space in the tape's
/// index vectors.
pub type IndexT = u32;
// ---------------------------------------------------------------------------
// OpSequence
/// One operation sequence: operators in execution order together with
/// their argument slices.
///
/// The arguments for operator i are
/// `arg_all[ arg_start[i] .. arg_start[i+1] ]` ;
/// an end sentinel is pushed when the recording stops.
pub(crate) struct OpSequence<Id> {
    //
    /// operator identifiers in execution order
    pub(crate) id_all    : Vec<Id>,
    //
    /// start of each operator's arguments in arg_all
    pub(crate) arg_start : Vec<IndexT>,
    //
    /// flat argument stream
    pub(crate) arg_all   : Vec<IndexT>,
}
impl<Id> OpSequence<Id> {
    //
    pub(crate) fn new() -> Self {
        Self {
            id_all    : Vec::new(),
            arg_start : Vec::new(),
            arg_all   : Vec::new(),
        }
    }
    //
    /// number of operators in this sequence
    pub(crate) fn n_op(&self) -> usize {
        self.id_all.len()
    }
    //
    /// record one operator and its arguments
    pub(crate) fn push(&mut self, id : Id, arg : &[IndexT]) {
        self.id_all.push( id );
        self.arg_start.push( self.arg_all.len() as IndexT );
        self.arg_all.extend_from_slice( arg );
    }
    //
    /// argument slice for the operator with this index;
    /// requires the end sentinel
    pub(crate) fn arg(&self, op_index : usize) -> &[IndexT] {
        let start = self.arg_start[op_index] as usize;
        let end   = self.arg_start[op_index + 1] as usize;
        &self.arg_all[start .. end]
    }
    //
    /// push the end sentinel so [OpSequence::arg] works for the last
    /// operator
    pub(crate) fn seal(&mut self) {
        self.arg_start.push( self.arg_all.len() as IndexT );
    }
}
// ---------------------------------------------------------------------------
// Tape
/// The type where an `AD` < *V* > operation sequence is recorded.
///
/// * V : see [doc_generic_v]
pub struct Tape<V> {
    //
    /// if true, a recording is currently in progress on this tape
    pub(crate) recording : bool,
    //
    /// a different tape_id is chosen for each recording;
    /// tape_id zero is never recorded
    pub(crate) tape_id   : usize,
    //
    /// the variable operation sequence
    pub(crate) var       : OpSequence<OpCode>,
    //
    /// number of variables so far; variable zero is reserved
    pub(crate) n_var     : IndexT,
    //
    /// number of independent variables
    pub(crate) n_ind     : IndexT,
    //
    /// the dynamic parameter operation sequence
    pub(crate) dyn_seq   : OpSequence<DynOp>,
    //
    /// parameter pool slot written by each dynamic parameter;
    /// the first n_dyn_ind entries are the independent dynamic parameters
    pub(crate) dyn2par   : Vec<IndexT>,
    //
    /// number of independent dynamic parameters
    pub(crate) n_dyn_ind : IndexT,
    //
    /// constant and dynamic parameter values
    pub(crate) par_all   : Vec<V>,
    //
    /// classifies each entry of par_all
    pub(crate) par_is_dyn : Vec<bool>,
    //
    /// interning map from [FloatCore::key_hash] to constant pool indices
    pub(crate) par_hash  : FxHashMap<u64, Vec<IndexT>>,
    //
    /// string pool: print operator text
    pub(crate) str_all   : Vec<String>,
    //
    /// length of each VecAD record
    pub(crate) vecad_len  : Vec<IndexT>,
    //
    /// start of each VecAD record in vecad_init
    pub(crate) vecad_start : Vec<IndexT>,
    //
    /// initial parameter pool indices for all VecAD records
    pub(crate) vecad_init : Vec<IndexT>,
    //
    /// number of load operators so far (allocates the per load slots)
    pub(crate) n_load    : IndexT,
}
impl<V : FloatCore> Tape<V> {
    //
    // Tape::new
    /// An empty tape that is not recording.
    pub fn new() -> Self {
        Self {
            recording   : false,
            tape_id     : 0,
            var         : OpSequence::new(),
            n_var       : 0,
            n_ind       : 0,
            dyn_seq     : OpSequence::new(),
            dyn2par     : Vec::new(),
            n_dyn_ind   : 0,
            par_all     : Vec::new(),
            par_is_dyn  : Vec::new(),
            par_hash    : FxHashMap::default(),
            str_all     : Vec::new(),
            vecad_len   : Vec::new(),
            vecad_start : Vec::new(),
            vecad_init  : Vec::new(),
            n_load      : 0,
        }
    }
    //
    // Tape::par_constant
    /// Index in the parameter pool for this constant value, interning a
    /// new entry if no identical constant is present.
    pub(crate) fn par_constant(&mut self, value : V) -> IndexT {
        let key = value.key_hash();
        if let Some(bucket) = self.par_hash.get(&key) {
            for &index in bucket {
                if self.par_all[index as usize].identical_constant(value) {
                    return index;
                }
            }
        }
        let index = self.par_all.len() as IndexT;
        self.par_all.push( value );
        self.par_is_dyn.push( false );
        self.par_hash.entry(key).or_default().push( index );
        index
    }
    //
    // Tape::new_dyn_par
    /// Record one dependent dynamic parameter operation; returns the new
    /// parameter pool index.
    pub(crate) fn new_dyn_par(
        &mut self,
        value : V,
        op    : DynOp,
        arg   : &[IndexT],
    ) -> IndexT {
        let index = self.par_all.len() as IndexT;
        self.par_all.push( value );
        self.par_is_dyn.push( true );
        self.dyn_seq.push( op, arg );
        self.dyn2par.push( index );
        index
    }
    //
    // Tape::record_var_op
    /// Record one variable operation; allocates its result variables and
    /// returns the primary (last) result index.
    pub(crate) fn record_var_op(
        &mut self,
        op  : OpCode,
        arg : &[IndexT],
    ) -> IndexT {
        self.var.push( op, arg );
        let n_res = crate::op::n_res(op) as IndexT;
        self.n_var += n_res;
        self.n_var.wrapping_sub(1)
    }
    //
    // Tape::str_index
    /// Index in the string pool for this text.
    pub(crate) fn str_index(&mut self, text : &str) -> IndexT {
        for (i, s) in self.str_all.iter().enumerate() {
            if s == text {
                return i as IndexT;
            }
        }
        self.str_all.push( text.to_string() );
        (self.str_all.len() - 1) as IndexT
    }
    //
    // Tape::arg_class
    /// Classification of an AD object as an argument on this tape.
    ///
    /// An AD object whose tape_id does not match is a constant, unless its
    /// tape is still open on another thread, which is a protocol violation.
    pub(crate) fn arg_class(&self, ad : &AD<V>) -> AdType {
        if ad.tape_id == self.tape_id && self.recording {
            debug_assert!( ad.tag != AdType::Constant );
            return ad.tag;
        }
        if ad.tag != AdType::Constant && ad.tape_id != 0 {
            let open = OPEN_TAPES.lock().unwrap();
            assert!( ! open.contains( &ad.tape_id ),
                "AD object belongs to a tape that is open on another thread"
            );
        }
        AdType::Constant
    }
}
// ---------------------------------------------------------------------------
// NEXT_TAPE_ID
/// The tape_id values that have been used are 1 .. NEXT_TAPE_ID.
static NEXT_TAPE_ID : Mutex<usize> = Mutex::new(1);
//
// OPEN_TAPES
/// The tape_id values with a recording in progress, on any thread.
static OPEN_TAPES : Mutex<Vec<usize>> = Mutex::new( Vec::new() );
// ---------------------------------------------------------------------------
//
// sealed::ThisThreadTape
pub(crate) mod sealed {
    //! The sub-module sealed is used to seal traits in this package.
    //
    use super::Tape;
    use std::cell::RefCell;
    use std::thread::LocalKey;
    //
    /// ```text
    ///     local_key : &LocalKey< RefCell< Tape<V> > > = ThisThreadTape::get()
    ///     local_key.with_borrow_mut( |tape| { ... } )
    /// ```
    /// Sets `tape` to a reference to the tape for recording `AD<V>`
    /// operations on this thread.
    pub trait ThisThreadTape
    where
        Self : Sized + 'static,
    {
        fn get() -> &'static LocalKey< RefCell< Tape<Self> > >;
    }
}
//
// impl_this_thread_tape!
/// Implement ThisThreadTape for one value type.
macro_rules! impl_this_thread_tape{ ($V:ty) => {
    #[doc = concat!(
        "This thread's tape for recording `AD<", stringify!($V),
        ">` operations"
    ) ]
    impl sealed::ThisThreadTape for $V {
        fn get() -> &'static LocalKey< RefCell< Tape<$V> > > {
            thread_local! {
                static THIS_THREAD_TAPE : RefCell< Tape<$V> > =
                    RefCell::new( Tape::new() );
            }
            &THIS_THREAD_TAPE
        }
    }
} }
impl_this_thread_tape!(f32);
impl_this_thread_tape!(f64);
//
// with_tape
/// Run a closure with mutable access to this thread's tape.
pub(crate) fn with_tape<V, R>( f : impl FnOnce(&mut Tape<V>) -> R ) -> R
where
    V : FloatCore + sealed::ThisThreadTape,
{
    let local_key : &LocalKey< RefCell< Tape<V> > > =
        sealed::ThisThreadTape::get();
    local_key.with_borrow_mut( f )
}
// ---------------------------------------------------------------------------
// start_recording
/// Start recording a new `AD` < *V* > operation sequence with no
/// dynamic parameters.
///
/// * Syntax :
/// ```text
///     avar_dom = start_recording(var_dom)?
/// ```
///
/// * V : see [doc_generic_v]
///
/// * var_dom :
/// the values of the independent variables during the recording.
/// This vector must not be empty.
///
/// * avar_dom :
/// a vector of variables with the same length and values as var_dom.
/// Dependencies with respect to these variables are recorded on this
/// thread's tape until [stop_recording] or [abort_recording] is called.
///
/// * Errors : [Error::RecordingAlreadyActive]
///
/// * Example : see [stop_recording]
pub fn start_recording<V>( var_dom : Vec<V> ) -> Result< Vec< AD<V> >, Error >
where
    V : FloatCore + sealed::ThisThreadTape,
{
    let dyn_dom : Vec<V> = Vec::new();
    let (_adyn_dom, avar_dom) = start_recording_dyn(dyn_dom, var_dom)?;
    Ok( avar_dom )
}
//
// start_recording_dyn
/// Start recording a new `AD` < *V* > operation sequence with
/// independent dynamic parameters.
///
/// * Syntax :
/// ```text
///     (adyn_dom, avar_dom) = start_recording_dyn(dyn_dom, var_dom)?
/// ```
///
/// * V : see [doc_generic_v]
///
/// * dyn_dom :
/// the values of the independent dynamic parameters during the recording.
/// These can be changed, without re-recording, using
/// [ADFun::new_dynamic] .
///
/// * var_dom :
/// the values of the independent variables during the recording.
/// This vector must not be empty.
///
/// * Errors : [Error::RecordingAlreadyActive]
///
/// # Example
/// ```
/// use adtape::{start_recording_dyn, stop_recording};
///
/// // f(x; p) = p[0] * x[0]
/// let p : Vec<f64>       = vec![ 2.0 ];
/// let x : Vec<f64>       = vec![ 5.0 ];
/// let (ap, ax)           = start_recording_dyn(p, x).unwrap();
/// let ay                 = vec![ &ap[0] * &ax[0] ];
/// let mut f              = stop_recording(ay).unwrap();
/// let y = f.forward(0, vec![ 5.0 ]).unwrap();
/// assert_eq!( y, vec![ 10.0 ] );
/// ```
pub fn start_recording_dyn<V>(
    dyn_dom : Vec<V>,
    var_dom : Vec<V>,
) -> Result< ( Vec< AD<V> >, Vec< AD<V> > ), Error >
where
    V : FloatCore + sealed::ThisThreadTape,
{
    assert_ne!( var_dom.len(), 0,
        "start_recording: the independent variable vector is empty"
    );
    //
    // tape_id
    let tape_id : usize;
    {   let mut next_tape_id = NEXT_TAPE_ID.lock().unwrap();
        tape_id        = *next_tape_id;
        *next_tape_id += 1;
    }
    //
    let result = with_tape( |tape : &mut Tape<V>| {
        if tape.recording {
            return Err( Error::RecordingAlreadyActive );
        }
        debug_assert_eq!( tape.var.n_op(), 0 );
        debug_assert_eq!( tape.par_all.len(), 0 );
        //
        tape.recording = true;
        tape.tape_id   = tape_id;
        //
        // variable zero is reserved
        tape.record_var_op( OpCode::Begin, &[] );
        //
        // independent variables
        tape.n_ind = var_dom.len() as IndexT;
        for _j in 0 .. var_dom.len() {
            tape.record_var_op( OpCode::Inv, &[] );
        }
        //
        // independent dynamic parameters
        tape.n_dyn_ind = dyn_dom.len() as IndexT;
        let mut dyn_index : Vec<IndexT> = Vec::with_capacity( dyn_dom.len() );
        for value in dyn_dom.iter() {
            let index = tape.par_all.len() as IndexT;
            tape.par_all.push( *value );
            tape.par_is_dyn.push( true );
            tape.dyn2par.push( index );
            dyn_index.push( index );
        }
        Ok( dyn_index )
    } );
    let dyn_index = result?;
    OPEN_TAPES.lock().unwrap().push( tape_id );
    //
    // adyn_dom
    let adyn_dom = dyn_dom.into_iter().zip( dyn_index ).map(
        | (value, index) | {
            AD::new(tape_id, index, AdType::Dynamic, value)
        }
    ).collect();
    //
    // avar_dom: the independent variables are 1 .. n_ind
    let avar_dom = var_dom.into_iter().enumerate().map(
        | (j, value) | {
            AD::new(tape_id, (j + 1) as IndexT, AdType::Variable, value)
        }
    ).collect();
    //
    Ok( (adyn_dom, avar_dom) )
}
// ---------------------------------------------------------------------------
// stop_recording
/// Stop this thread's recording and move it into an [ADFun] object.
///
/// * Syntax :
/// ```text
///     f = stop_recording(arange)?
/// ```
///
/// * arange :
/// the range space values. A range element that is not a variable on this
/// tape is copied into a variable slot, so every dependent has a variable
/// index.
///
/// * f :
/// the function object containing the operation sequence that computed
/// arange from the vectors passed to [start_recording] or
/// [start_recording_dyn] .
///
/// * Errors : [Error::NoActiveRecording]
///
/// # Example
/// ```
/// use adtape::{start_recording, stop_recording};
/// let x : Vec<f32>  = vec![ 1.0, 2.0 ];
/// let ax            = start_recording(x).unwrap();
/// let ay            = vec![ &ax[0] + &ax[1], &ax[0] - &ax[1] ];
/// let f             = stop_recording(ay).unwrap();
/// assert_eq!( f.domain_len(), 2 );
/// assert_eq!( f.range_len(),  2 );
/// ```
pub fn stop_recording<V>( arange : Vec< AD<V> > ) -> Result< ADFun<V>, Error >
where
    V : FloatCore + sealed::ThisThreadTape,
{
    with_tape( |tape : &mut Tape<V>| {
        if ! tape.recording {
            return Err( Error::NoActiveRecording );
        }
        //
        // dep_var: promote non variable range elements with Par operators
        let mut dep_var : Vec<IndexT> = Vec::with_capacity( arange.len() );
        for ad in arange.iter() {
            let class = tape.arg_class(ad);
            let index = match class {
                AdType::Variable => ad.index,
                AdType::Dynamic  => {
                    tape.record_var_op( OpCode::Par, &[ ad.index ] )
                }
                AdType::Constant => {
                    let par = tape.par_constant( ad.value );
                    tape.record_var_op( OpCode::Par, &[ par ] )
                }
            };
            dep_var.push( index );
        }
        tape.record_var_op( OpCode::End, &[] );
        tape.var.seal();
        tape.dyn_seq.seal();
        //
        // f
        let mut f = ADFun::new();
        std::mem::swap( &mut f.var,        &mut tape.var );
        std::mem::swap( &mut f.dyn_seq,    &mut tape.dyn_seq );
        std::mem::swap( &mut f.dyn2par,    &mut tape.dyn2par );
        std::mem::swap( &mut f.par_all,    &mut tape.par_all );
        std::mem::swap( &mut f.par_is_dyn, &mut tape.par_is_dyn );
        std::mem::swap( &mut f.str_all,    &mut tape.str_all );
        std::mem::swap( &mut f.vecad_len,  &mut tape.vecad_len );
        std::mem::swap( &mut f.vecad_start, &mut tape.vecad_start );
        std::mem::swap( &mut f.vecad_init, &mut tape.vecad_init );
        f.n_var     = tape.n_var as usize;
        f.n_ind     = tape.n_ind as usize;
        f.n_dyn_ind = tape.n_dyn_ind as usize;
        f.n_load    = tape.n_load as usize;
        f.dep_var   = dep_var;
        //
        // release this tape's slot
        let tape_id = tape.tape_id;
        *tape = Tape::new();
        OPEN_TAPES.lock().unwrap().retain( |id| *id != tape_id );
        //
        Ok( f )
    } )
}
// ---------------------------------------------------------------------------
// abort_recording
/// Discard this thread's recording.
///
/// Any `AD` < *V* > object still carrying the aborted tape identifier is
/// usable afterwards, but only as a constant; its value remains valid.
///
/// * Errors : [Error::NoActiveRecording]
pub fn abort_recording<V>() -> Result<(), Error>
where
    V : FloatCore + sealed::ThisThreadTape,
{
    with_tape( |tape : &mut Tape<V>| {
        if ! tape.recording {
            return Err( Error::NoActiveRecording );
        }
        let tape_id = tape.tape_id;
        *tape = Tape::new();
        OPEN_TAPES.lock().unwrap().retain( |id| *id != tape_id );
        Ok(())
    } )
}
// ---------------------------------------------------------------------------
// setup_parallel
/// Prime the process wide registries while still single threaded.
///
/// The atomic and discrete function registries are append only; all
/// registrations, and one call to this function, must happen before
/// recordings run on multiple threads. Afterwards each thread may hold
/// at most one open tape at a time.
pub fn setup_parallel<V>()
where
    V : FloatCore
        + sealed::ThisThreadTape
        + crate::atom::sealed::AtomRegistry
        + crate::discrete::sealed::DiscreteRegistry,
{
    let _ = <V as crate::atom::sealed::AtomRegistry>::registry();
    let _ = <V as crate::discrete::sealed::DiscreteRegistry>::registry();
    let _guard = NEXT_TAPE_ID.lock().unwrap();
}
