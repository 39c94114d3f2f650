// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Implement the [ADFun] persisted state layout.
//!
//! Link to [parent module](super)
//!
//! The stable representation is the tuple of tape arrays plus a header
//! carrying a format version, the domain sizes, and the dependent list.
//! Constant parameters are bit exact IEEE-754; strings are length
//! prefixed UTF-8; everything is little endian. Atomic and discrete
//! functions are stored by name and re-bound against the process
//! registries when the bytes are read back.
// ---------------------------------------------------------------------------
// use
//
use serde::{Deserialize, Serialize, de::DeserializeOwned};
//
use crate::atom::sealed::AtomRegistry;
use crate::discrete::sealed::DiscreteRegistry;
use crate::error::Error;
use crate::float::FloatCore;
use crate::fun::ADFun;
use crate::op::{self, DynOp, OpCode};
use crate::tape::{IndexT, OpSequence};
// ---------------------------------------------------------------------------
//
/// version of the persisted layout
const FORMAT_VERSION : u32 = 1;
// ---------------------------------------------------------------------------
//
// SavedFun
/// The serialized form of an [ADFun] ; operator identifiers are stored
/// as their u8 codes.
#[derive(Serialize, Deserialize)]
struct SavedFun<V> {
    format_version : u32,
    //
    n_ind          : u64,
    n_dyn_ind      : u64,
    n_var          : u64,
    n_load         : u64,
    dep_var        : Vec<IndexT>,
    //
    op             : Vec<u8>,
    arg_start      : Vec<IndexT>,
    arg_all        : Vec<IndexT>,
    //
    dyn_op         : Vec<u8>,
    dyn_arg_start  : Vec<IndexT>,
    dyn_arg_all    : Vec<IndexT>,
    dyn2par        : Vec<IndexT>,
    //
    par_all        : Vec<V>,
    par_is_dyn     : Vec<bool>,
    str_all        : Vec<String>,
    //
    vecad_len      : Vec<IndexT>,
    vecad_start    : Vec<IndexT>,
    vecad_init     : Vec<IndexT>,
    //
    /// (atom_id used in the op stream, registered name)
    atom_names     : Vec<(IndexT, String)>,
    /// (dis_id used in the op stream, registered name)
    dis_names      : Vec<(IndexT, String)>,
}
// ---------------------------------------------------------------------------
impl<V> ADFun<V>
where
    V : FloatCore + AtomRegistry + DiscreteRegistry
        + Serialize + DeserializeOwned,
{
    //
    // to_bytes
    /// Serialize this function object to its stable representation.
    ///
    /// # Example
    /// ```
    /// use adtape::{start_recording, stop_recording, ADFun};
    /// let ax    = start_recording( vec![ 2f64 ] ).unwrap();
    /// let ay    = vec![ ax[0].sin() ];
    /// let f     = stop_recording(ay).unwrap();
    /// let bytes = f.to_bytes().unwrap();
    /// let mut g : ADFun<f64> = ADFun::from_bytes(&bytes).unwrap();
    /// assert_eq!(
    ///     g.forward(0, vec![ 2.0 ]).unwrap(), vec![ 2f64.sin() ]
    /// );
    /// ```
    pub fn to_bytes(&self) -> Result< Vec<u8>, Error > {
        //
        // names for the atomic and discrete functions this tape calls
        let mut atom_names : Vec<(IndexT, String)> = Vec::new();
        let mut dis_names  : Vec<(IndexT, String)> = Vec::new();
        for i_op in 0 .. self.var.n_op() {
            let arg = self.var.arg(i_op);
            match self.var.id_all[i_op] {
                OpCode::Call => {
                    let id = arg[0];
                    if ! atom_names.iter().any( |(old, _)| *old == id ) {
                        let name = crate::atom::get::<V>(id as usize)
                            .name().to_string();
                        atom_names.push( (id, name) );
                    }
                }
                OpCode::Dis => {
                    let id = arg[0];
                    if ! dis_names.iter().any( |(old, _)| *old == id ) {
                        let name = crate::discrete::name_of::<V>(id as usize);
                        dis_names.push( (id, name) );
                    }
                }
                _ => (),
            }
        }
        for i_op in 0 .. self.dyn_seq.n_op() {
            if self.dyn_seq.id_all[i_op] == DynOp::Dis {
                let id = self.dyn_seq.arg(i_op)[0];
                if ! dis_names.iter().any( |(old, _)| *old == id ) {
                    let name = crate::discrete::name_of::<V>(id as usize);
                    dis_names.push( (id, name) );
                }
            }
        }
        //
        let saved = SavedFun {
            format_version : FORMAT_VERSION,
            n_ind          : self.n_ind as u64,
            n_dyn_ind      : self.n_dyn_ind as u64,
            n_var          : self.n_var as u64,
            n_load         : self.n_load as u64,
            dep_var        : self.dep_var.clone(),
            op             : self.var.id_all.iter()
                .map( |op| u8::from(*op) ).collect(),
            arg_start      : self.var.arg_start.clone(),
            arg_all        : self.var.arg_all.clone(),
            dyn_op         : self.dyn_seq.id_all.iter()
                .map( |op| u8::from(*op) ).collect(),
            dyn_arg_start  : self.dyn_seq.arg_start.clone(),
            dyn_arg_all    : self.dyn_seq.arg_all.clone(),
            dyn2par        : self.dyn2par.clone(),
            par_all        : self.par_all.clone(),
            par_is_dyn     : self.par_is_dyn.clone(),
            str_all        : self.str_all.clone(),
            vecad_len      : self.vecad_len.clone(),
            vecad_start    : self.vecad_start.clone(),
            vecad_init     : self.vecad_init.clone(),
            atom_names,
            dis_names,
        };
        bincode::serialize(&saved).map_err(
            | e | Error::InvalidData( e.to_string() )
        )
    }
    //
    // from_bytes
    /// Rebuild a function object from its stable representation.
    ///
    /// Atomic and discrete functions are re-bound by name against the
    /// current registries; a name that is not registered is an error.
    pub fn from_bytes( bytes : &[u8] ) -> Result< Self, Error > {
        let saved : SavedFun<V> = bincode::deserialize(bytes).map_err(
            | e | Error::InvalidData( e.to_string() )
        )?;
        if saved.format_version != FORMAT_VERSION {
            return Err( Error::InvalidData( format!(
                "format version {} is not {FORMAT_VERSION}",
                saved.format_version,
            ) ) );
        }
        //
        // operator streams
        let id_all : Vec<OpCode> = saved.op.iter().map(
            | code | OpCode::try_from(*code).map_err(
                | _ | Error::InvalidData( format!("bad opcode {code}") )
            )
        ).collect::< Result<_, _> >()?;
        let dyn_id_all : Vec<DynOp> = saved.dyn_op.iter().map(
            | code | DynOp::try_from(*code).map_err(
                | _ | Error::InvalidData( format!("bad dynamic opcode {code}") )
            )
        ).collect::< Result<_, _> >()?;
        //
        // re-bind atomic and discrete identifiers by name
        let mut atom_map : Vec<(IndexT, IndexT)> = Vec::new();
        for (old, name) in saved.atom_names.iter() {
            let new = crate::atom::find_by_name::<V>(name).ok_or_else(
                | | Error::InvalidData( format!(
                    "atomic function {name} is not registered"
                ) )
            )?;
            atom_map.push( (*old, new as IndexT) );
        }
        let mut dis_map : Vec<(IndexT, IndexT)> = Vec::new();
        for (old, name) in saved.dis_names.iter() {
            let new = crate::discrete::find_by_name::<V>(name).ok_or_else(
                | | Error::InvalidData( format!(
                    "discrete function {name} is not registered"
                ) )
            )?;
            dis_map.push( (*old, new as IndexT) );
        }
        let lookup = | map : &[(IndexT, IndexT)], old : IndexT | {
            map.iter().find( |(o, _)| *o == old ).map( |(_, n)| *n )
                .ok_or_else( | | Error::InvalidData(
                    "unregistered function id in op stream".to_string()
                ) )
        };
        //
        let mut result = ADFun::new();
        result.var = OpSequence {
            id_all,
            arg_start : saved.arg_start,
            arg_all   : saved.arg_all,
        };
        result.dyn_seq = OpSequence {
            id_all    : dyn_id_all,
            arg_start : saved.dyn_arg_start,
            arg_all   : saved.dyn_arg_all,
        };
        result.n_ind      = saved.n_ind as usize;
        result.n_dyn_ind  = saved.n_dyn_ind as usize;
        result.n_var      = saved.n_var as usize;
        result.n_load     = saved.n_load as usize;
        result.dep_var    = saved.dep_var;
        result.dyn2par    = saved.dyn2par;
        result.par_all    = saved.par_all;
        result.par_is_dyn = saved.par_is_dyn;
        result.str_all    = saved.str_all;
        result.vecad_len   = saved.vecad_len;
        result.vecad_start = saved.vecad_start;
        result.vecad_init  = saved.vecad_init;
        //
        // structural validation
        validate(&result)?;
        //
        // rewrite the function identifiers
        for i_op in 0 .. result.var.n_op() {
            let op    = result.var.id_all[i_op];
            let start = result.var.arg_start[i_op] as usize;
            match op {
                OpCode::Call => {
                    result.var.arg_all[start] =
                        lookup(&atom_map, result.var.arg_all[start])?;
                }
                OpCode::Dis => {
                    result.var.arg_all[start] =
                        lookup(&dis_map, result.var.arg_all[start])?;
                }
                _ => (),
            }
        }
        for i_op in 0 .. result.dyn_seq.n_op() {
            if result.dyn_seq.id_all[i_op] == DynOp::Dis {
                let start = result.dyn_seq.arg_start[i_op] as usize;
                result.dyn_seq.arg_all[start] =
                    lookup(&dis_map, result.dyn_seq.arg_all[start])?;
            }
        }
        result.op_skip = vec![ false; result.var.n_op() ];
        Ok( result )
    }
}
// ---------------------------------------------------------------------------
// validate
/// The invariants of a closed function object: every variable argument
/// index is below n_var, every parameter argument index is inside the
/// pool, and every dependent index is a non reserved variable.
fn validate<V : FloatCore>( f : &ADFun<V> ) -> Result<(), Error> {
    let corrupt = | what : &str | {
        Err( Error::InvalidData( what.to_string() ) )
    };
    let n_op = f.var.n_op();
    if f.var.arg_start.len() != n_op + 1 {
        return corrupt("argument offsets do not match the op stream");
    }
    for i in 0 .. n_op {
        if f.var.arg_start[i] > f.var.arg_start[i + 1] {
            return corrupt("argument offsets are not monotone");
        }
    }
    if *f.var.arg_start.last().unwrap() as usize != f.var.arg_all.len() {
        return corrupt("argument offsets do not cover the arguments");
    }
    if f.par_all.len() != f.par_is_dyn.len() {
        return corrupt("parameter pool classification length");
    }
    //
    // result variable count
    let mut i_z = 0usize;
    let mut positions : Vec<usize> = Vec::new();
    for i_op in 0 .. n_op {
        let op  = f.var.id_all[i_op];
        let arg = f.var.arg(i_op);
        i_z += op::n_res(op);
        //
        positions.clear();
        op::var_arg_positions(op, arg, &mut positions);
        for pos in positions.iter() {
            if arg[*pos] as usize >= f.n_var {
                return corrupt("variable argument out of range");
            }
        }
        positions.clear();
        op::par_arg_positions(op, arg, &mut positions);
        for pos in positions.iter() {
            if arg[*pos] as usize >= f.par_all.len() {
                return corrupt("parameter argument out of range");
            }
        }
    }
    if i_z != f.n_var {
        return corrupt("operator results do not match n_var");
    }
    for index in f.dep_var.iter() {
        let index = *index as usize;
        if index < 1 || index >= f.n_var {
            return corrupt("dependent variable index out of range");
        }
    }
    for index in f.dyn2par.iter() {
        if *index as usize >= f.par_all.len() {
            return corrupt("dynamic parameter slot out of range");
        }
    }
    Ok(())
}
