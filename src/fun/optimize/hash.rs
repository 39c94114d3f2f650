// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Implement [OpHashMap] , the common subexpression hash map.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
//
use rustc_hash::FxHashMap;
//
use crate::op::OpCode;
use crate::tape::IndexT;
// ---------------------------------------------------------------------------
//
// OpKey
/// Hash key identifying operator uses that always yield the same
/// results: the opcode plus its canonicalized argument slice (variable
/// arguments replaced by their representatives, parameter arguments by
/// their interned pool indices).
#[derive(Eq, Hash, PartialEq)]
struct OpKey {
    op  : u8,
    arg : Vec<IndexT>,
}
// ---------------------------------------------------------------------------
//
// OpHashMap
/// A hash map from canonicalized operator uses to the operator index of
/// their first occurrence.
pub(crate) struct OpHashMap {
    map : FxHashMap<OpKey, IndexT>,
}
impl OpHashMap {
    //
    // OpHashMap::new
    pub(crate) fn new() -> Self {
        Self { map : FxHashMap::default() }
    }
    //
    // OpHashMap::match_op
    /// Look up this operator use; if it is new, insert it with value
    /// op_index and return None, otherwise return the operator index of
    /// the first equivalent use.
    ///
    /// * canonical_arg :
    /// the argument slice with every variable argument replaced by its
    /// representative variable.
    pub(crate) fn match_op(
        &mut self,
        op            : OpCode,
        canonical_arg : Vec<IndexT>,
        op_index      : usize,
    ) -> Option<usize> {
        let key = OpKey { op : u8::from(op), arg : canonical_arg };
        match self.map.get(&key) {
            Some(first) => Some( *first as usize ),
            None => {
                self.map.insert( key, op_index as IndexT );
                None
            }
        }
    }
}
