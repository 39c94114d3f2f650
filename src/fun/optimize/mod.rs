// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Implement the [ADFun] optimize method.
//!
//! Link to [parent module](super)
//!
//! The optimized function produces the same zero order outputs and the
//! same higher order coefficients for every argument point. Passes:
//!
//! 1. reverse dependency analysis: use counts and dead operators;
//! 2. conditional usage analysis: operators needed only when one
//!    conditional expression's comparison goes one way;
//! 3. rebuild: dead operators dropped, common subexpressions merged
//!    through a hash map of canonicalized operator uses, runs of single
//!    use additions and subtractions folded into cumulative summation
//!    operators;
//! 4. conditional skip insertion: a CSkip operator is placed ahead of
//!    each skippable group, after its comparison operands are available;
//! 5. parameter pool compaction.
// ---------------------------------------------------------------------------
// sub-modules
//
pub(crate) mod hash;
// ---------------------------------------------------------------------------
// use
//
use rustc_hash::FxHashMap;
//
use crate::float::FloatCore;
use crate::fun::ADFun;
use crate::fun::optimize::hash::OpHashMap;
use crate::op::special::VecAdState;
use crate::op::{self, FLAG_LEFT_VAR, FLAG_RIGHT_VAR, OpCode};
use crate::tape::{IndexT, OpSequence};
// ---------------------------------------------------------------------------
//
/// conditional usage sets larger than this are treated as unconditional
const MAX_COND_SET : usize = 4;
//
// CondSet
/// The conditions under which a value is needed: it is used only when,
/// for every `(cexp_op, branch)` listed, that conditional expression's
/// comparison has the given outcome. Empty means unconditional.
type CondSet = Vec<(IndexT, bool)>;
// ---------------------------------------------------------------------------
//
// is_sum_op
/// operators folded by the cumulative summation pass
fn is_sum_op(op : OpCode) -> bool {
    matches!(op,
        OpCode::AddPv | OpCode::AddVv | OpCode::SubPv | OpCode::SubVp
        | OpCode::SubVv
    )
}
//
// is_skippable
/// pure value operators that a conditional skip may jump over
fn is_skippable(op : OpCode) -> bool {
    op::is_binary(op) || op::is_unary(op) || matches!(op,
        OpCode::CExp | OpCode::Dis | OpCode::Par | OpCode::CSum
    )
}
//
// is_cse_op
/// operators that participate in common subexpression elimination
fn is_cse_op(op : OpCode) -> bool {
    op::is_binary(op) || op::is_unary(op)
        || matches!(op, OpCode::CExp | OpCode::Dis | OpCode::Par)
}
// ---------------------------------------------------------------------------
//
// Analysis
/// Result of the reverse passes over the original operation sequence.
struct Analysis {
    /// per operator: some result is needed, or it has a side effect
    alive        : Vec<bool>,
    /// per variable: number of uses by alive operators and dependents
    use_count    : Vec<u32>,
    /// per variable: number of uses as an operand of a summation operator
    sum_use      : Vec<u32>,
    /// per variable: is a dependent
    is_dep       : Vec<bool>,
    /// per operator: first result variable index
    op_start_var : Vec<IndexT>,
    /// per variable: the operator that produced it
    var2op       : Vec<IndexT>,
    /// per conditional expression operator: operators to skip when its
    /// comparison is true, and when it is false (original indices)
    skip_lists   : FxHashMap<IndexT, (Vec<IndexT>, Vec<IndexT>)>,
}
// ---------------------------------------------------------------------------
// analyze
fn analyze<V : FloatCore>( f : &ADFun<V> ) -> Analysis {
    let n_op  = f.var.n_op();
    let n_var = f.n_var;
    //
    // op_start_var, var2op
    let mut op_start_var = vec![ 0 as IndexT; n_op ];
    let mut var2op       = vec![ 0 as IndexT; n_var ];
    {   let mut i_z = 0usize;
        for i_op in 0 .. n_op {
            op_start_var[i_op] = i_z as IndexT;
            let n_res = op::n_res( f.var.id_all[i_op] );
            for t in 0 .. n_res {
                var2op[i_z + t] = i_op as IndexT;
            }
            i_z += n_res;
        }
    }
    //
    // is_dep, use_count seeds
    let mut is_dep    = vec![ false; n_var ];
    let mut use_count = vec![ 0u32; n_var ];
    for index in f.dep_var.iter() {
        is_dep[*index as usize] = true;
        use_count[*index as usize] += 1;
    }
    //
    // alive, use_count, sum_use
    let mut alive      = vec![ false; n_op ];
    let mut sum_use    = vec![ 0u32; n_var ];
    let mut vecad_live = vec![ false; f.vecad_len.len() ];
    let mut positions : Vec<usize> = Vec::new();
    let mut i_op = n_op;
    while i_op > 0 {
        i_op -= 1;
        let op    = f.var.id_all[i_op];
        let arg   = f.var.arg(i_op);
        let first = op_start_var[i_op] as usize;
        let n_res = op::n_res(op);
        //
        if op == OpCode::CallEnd {
            // the whole block lives or dies with its variable results
            let mut start = i_op;
            while f.var.id_all[start] != OpCode::Call {
                start -= 1;
            }
            let mut block_used = false;
            for j in start .. i_op {
                if f.var.id_all[j] == OpCode::CallResV {
                    let v = op_start_var[j] as usize;
                    block_used |= use_count[v] > 0;
                }
            }
            for j in start ..= i_op {
                alive[j] = block_used;
                if block_used && f.var.id_all[j] == OpCode::CallArgV {
                    use_count[ f.var.arg(j)[0] as usize ] += 1;
                }
            }
            i_op = start;
            continue;
        }
        //
        let keep = match op {
            OpCode::CSkip => false,
            OpCode::Ldp | OpCode::Ldv => {
                let used = use_count[first] > 0;
                if used {
                    vecad_live[ arg[0] as usize ] = true;
                }
                used
            }
            OpCode::Stpp | OpCode::Stpv | OpCode::Stvp | OpCode::Stvv =>
                vecad_live[ arg[0] as usize ],
            _ if op::has_side_effect(op) => true,
            _ => (0 .. n_res).any( |t| use_count[first + t] > 0 ),
        };
        alive[i_op] = keep;
        if keep {
            positions.clear();
            op::var_arg_positions(op, arg, &mut positions);
            for pos in positions.iter() {
                let v = arg[*pos] as usize;
                use_count[v] += 1;
                if is_sum_op(op) {
                    sum_use[v] += 1;
                }
            }
        }
    }
    //
    // conditional usage: cond_var[v] is the intersection, over the alive
    // uses of v, of the conditions that use requires; None means no use
    // seen yet
    let mut cond_var : Vec< Option<CondSet> > = vec![ None; n_var ];
    for index in f.dep_var.iter() {
        cond_var[*index as usize] = Some( Vec::new() );
    }
    let mut skip_lists :
        FxHashMap<IndexT, (Vec<IndexT>, Vec<IndexT>)> = FxHashMap::default();
    let mut i_op = n_op;
    while i_op > 0 {
        i_op -= 1;
        let op = f.var.id_all[i_op];
        if ! alive[i_op] || op == OpCode::CSkip {
            continue;
        }
        let arg   = f.var.arg(i_op);
        let first = op_start_var[i_op] as usize;
        let n_res = op::n_res(op);
        //
        // op_cond
        let op_cond : CondSet;
        if op::has_side_effect(op) || matches!(op,
            OpCode::Ldp | OpCode::Ldv | OpCode::Call | OpCode::CallArgV
            | OpCode::CallArgP | OpCode::CallResV | OpCode::CallResP
            | OpCode::CallEnd
        ) {
            op_cond = Vec::new();
        } else {
            let mut cond : Option<CondSet> = None;
            for t in 0 .. n_res {
                if use_count[first + t] > 0 {
                    let c = cond_var[first + t].clone()
                        .unwrap_or_default();
                    cond = Some( match cond {
                        None    => c,
                        Some(a) => intersect_cond(&a, &c),
                    } );
                }
            }
            op_cond = cond.unwrap_or_default();
        }
        //
        // record the skip condition for this operator
        if is_skippable(op) && ! op_cond.is_empty() {
            for (cexp_op, branch) in op_cond.iter() {
                let entry = skip_lists.entry(*cexp_op).or_default();
                if *branch {
                    // needed when true, skippable when false
                    entry.1.push( i_op as IndexT );
                } else {
                    entry.0.push( i_op as IndexT );
                }
            }
        }
        //
        // propagate to the variable arguments
        positions.clear();
        op::var_arg_positions(op, arg, &mut positions);
        for pos in positions.iter() {
            let v = arg[*pos] as usize;
            let mut contribution = op_cond.clone();
            if op == OpCode::CExp {
                if *pos == 4 {
                    insert_cond(&mut contribution, (i_op as IndexT, true));
                }
                if *pos == 5 {
                    insert_cond(&mut contribution, (i_op as IndexT, false));
                }
            }
            if contribution.len() > MAX_COND_SET {
                contribution = Vec::new();
            }
            cond_var[v] = Some( match cond_var[v].take() {
                None    => contribution,
                Some(a) => intersect_cond(&a, &contribution),
            } );
        }
    }
    //
    // a conditional expression cannot skip itself or its own operands;
    // entries are filtered against liveness during the rebuild
    for lists in skip_lists.values_mut() {
        lists.0.sort();
        lists.1.sort();
    }
    //
    Analysis {
        alive,
        use_count,
        sum_use,
        is_dep,
        op_start_var,
        var2op,
        skip_lists,
    }
}
//
// insert_cond
fn insert_cond( set : &mut CondSet, item : (IndexT, bool) ) {
    if let Err(pos) = set.binary_search(&item) {
        set.insert(pos, item);
    }
}
//
// intersect_cond
fn intersect_cond( a : &CondSet, b : &CondSet ) -> CondSet {
    a.iter().filter( |item| b.contains(*item) ).copied().collect()
}
// ---------------------------------------------------------------------------
//
// CskipRequest
/// One conditional skip operator waiting to be spliced in.
struct CskipRequest {
    /// insertion position in the pre splice operator sequence
    pos        : usize,
    /// comparison operator code
    cop        : IndexT,
    /// left and right variable flags
    flags      : IndexT,
    /// left and right operands (new indices)
    left       : IndexT,
    right      : IndexT,
    /// pre splice operator indices to skip, per branch
    skip_true  : Vec<IndexT>,
    skip_false : Vec<IndexT>,
}
// ---------------------------------------------------------------------------
impl<V : FloatCore> ADFun<V> {
    //
    // optimize
    /// Replace this function object by an equivalent one with a shorter
    /// operation sequence.
    ///
    /// For every argument point, the optimized object produces the same
    /// zero order outputs and the same higher order coefficients.
    ///
    /// # Example
    /// ```
    /// use adtape::{start_recording, stop_recording};
    /// let ax    = start_recording( vec![ 1f64, 2f64 ] ).unwrap();
    /// let au    = &ax[0] * &ax[1];
    /// let av    = &ax[0] * &ax[1];    // same expression twice
    /// let ay    = vec![ &au + &av ];
    /// let mut f = stop_recording(ay).unwrap();
    /// let size  = f.size_op();
    /// f.optimize();
    /// assert!( f.size_op() < size );
    /// assert_eq!( f.forward(0, vec![ 2.0, 5.0 ]).unwrap(), vec![ 20.0 ] );
    /// ```
    pub fn optimize(&mut self) {
        let analysis = analyze(self);
        let mut result = self.rebuild(&analysis);
        result.check_nan = self.check_nan;
        log::debug!(
            "optimize: {} -> {} operators, {} -> {} variables",
            self.var.n_op(), result.var.n_op(),
            self.n_var, result.n_var,
        );
        *self = result;
    }
    //
    // rebuild
    /// Emit the optimized operation sequence.
    fn rebuild(&self, analysis : &Analysis) -> ADFun<V> {
        let n_op  = self.var.n_op();
        let n_var = self.n_var;
        //
        // csum_child: a single use summation operator consumed by the
        // summation operator that uses it
        let mut csum_child = vec![ false; n_op ];
        for i_op in 0 .. n_op {
            let op = self.var.id_all[i_op];
            if analysis.alive[i_op] && is_sum_op(op) {
                let res = analysis.op_start_var[i_op] as usize;
                csum_child[i_op] =
                    analysis.use_count[res] == 1
                    && analysis.sum_use[res] == 1
                    && ! analysis.is_dep[res];
            }
        }
        //
        // growing copies of the parameter pool
        let mut new_par_all    = self.par_all.clone();
        let mut new_par_is_dyn = self.par_is_dyn.clone();
        let mut par_key : FxHashMap<u64, Vec<IndexT>> = FxHashMap::default();
        for (index, value) in new_par_all.iter().enumerate() {
            if ! new_par_is_dyn[index] {
                par_key.entry( value.key_hash() )
                    .or_default().push( index as IndexT );
            }
        }
        //
        // rebuild state
        let mut seq        = OpSequence::new();
        let mut new_n_var  = 0usize;
        let mut new_var_of = vec![ 0 as IndexT; n_var ];
        let mut new_op_of  : Vec< Option<IndexT> > = vec![ None; n_op ];
        let mut new_first  : Vec<IndexT> = vec![ 0; n_op ];
        let mut new_var2op : Vec<IndexT> = Vec::new();
        let mut new_n_load = 0usize;
        let mut cse        = OpHashMap::new();
        let mut requests   : Vec<CskipRequest> = Vec::new();
        let mut positions  : Vec<usize> = Vec::new();
        //
        let mut i_op = 0usize;
        while i_op < n_op {
            let op    = self.var.id_all[i_op];
            let arg   = self.var.arg(i_op);
            let first = analysis.op_start_var[i_op] as usize;
            let n_res = op::n_res(op);
            //
            if ! analysis.alive[i_op] || op == OpCode::CSkip
                || csum_child[i_op]
            {
                i_op += 1;
                continue;
            }
            //
            if op == OpCode::Call {
                // copy the whole block
                let block = op::parse_call_block(&self.var, i_op, first);
                new_op_of[i_op] = Some( seq.n_op() as IndexT );
                seq.push( OpCode::Call, arg );
                for j in 0 .. block.n {
                    let sub_op  = self.var.id_all[i_op + 1 + j];
                    let mut sub = self.var.arg(i_op + 1 + j).to_vec();
                    if sub_op == OpCode::CallArgV {
                        sub[0] = new_var_of[ sub[0] as usize ];
                    }
                    seq.push( sub_op, &sub );
                }
                let mut old_res = first;
                for i in 0 .. block.m {
                    let sub_op = self.var.id_all[i_op + 1 + block.n + i];
                    seq.push( sub_op, self.var.arg(i_op + 1 + block.n + i) );
                    if sub_op == OpCode::CallResV {
                        new_var_of[old_res] = new_n_var as IndexT;
                        new_var2op.push( (seq.n_op() - 1) as IndexT );
                        new_n_var += 1;
                        old_res   += 1;
                    }
                }
                seq.push( OpCode::CallEnd, &[] );
                i_op = block.end + 1;
                continue;
            }
            //
            // cumulative summation roots
            if is_sum_op(op) {
                let mut add_var : Vec<IndexT> = Vec::new();
                let mut sub_var : Vec<IndexT> = Vec::new();
                let mut add_dyn : Vec<IndexT> = Vec::new();
                let mut sub_dyn : Vec<IndexT> = Vec::new();
                let mut base       = V::zero();
                let mut n_children = 0usize;
                collect_csum(
                    self, analysis, &csum_child, &new_var_of, i_op, true,
                    &mut add_var, &mut sub_var, &mut add_dyn, &mut sub_dyn,
                    &mut base, &mut n_children,
                );
                if n_children > 0 {
                    // intern the constant base
                    let base_par = intern_par(
                        &mut new_par_all, &mut new_par_is_dyn,
                        &mut par_key, base,
                    );
                    let mut csum_arg : Vec<IndexT> = vec![ base_par, 0, 0, 0, 0 ];
                    csum_arg.extend_from_slice( &add_var );
                    csum_arg[op::CSUM_END_ADD_VAR] = csum_arg.len() as IndexT;
                    csum_arg.extend_from_slice( &sub_var );
                    csum_arg[op::CSUM_END_SUB_VAR] = csum_arg.len() as IndexT;
                    csum_arg.extend_from_slice( &add_dyn );
                    csum_arg[op::CSUM_END_ADD_DYN] = csum_arg.len() as IndexT;
                    csum_arg.extend_from_slice( &sub_dyn );
                    csum_arg[op::CSUM_END_SUB_DYN] = csum_arg.len() as IndexT;
                    csum_arg.push( (csum_arg.len() + 1) as IndexT );
                    //
                    new_op_of[i_op] = Some( seq.n_op() as IndexT );
                    new_first[i_op] = new_n_var as IndexT;
                    seq.push( OpCode::CSum, &csum_arg );
                    new_var_of[first] = new_n_var as IndexT;
                    new_var2op.push( (seq.n_op() - 1) as IndexT );
                    new_n_var += 1;
                    i_op += 1;
                    continue;
                }
            }
            //
            // common subexpressions
            if is_cse_op(op) {
                let mut canonical = arg.to_vec();
                positions.clear();
                op::var_arg_positions(op, arg, &mut positions);
                for pos in positions.iter() {
                    canonical[*pos] = new_var_of[ canonical[*pos] as usize ];
                }
                if let Some(first_op) = cse.match_op(op, canonical, i_op) {
                    let target = new_first[first_op] as usize;
                    for t in 0 .. n_res {
                        new_var_of[first + t] = (target + t) as IndexT;
                    }
                    i_op += 1;
                    continue;
                }
            }
            //
            // generic copy with renumbered arguments
            let mut new_arg = arg.to_vec();
            positions.clear();
            op::var_arg_positions(op, arg, &mut positions);
            for pos in positions.iter() {
                new_arg[*pos] = new_var_of[ new_arg[*pos] as usize ];
            }
            if matches!(op, OpCode::Ldp | OpCode::Ldv) {
                new_arg[2] = new_n_load as IndexT;
                new_n_load += 1;
            }
            new_op_of[i_op] = Some( seq.n_op() as IndexT );
            new_first[i_op] = new_n_var as IndexT;
            seq.push( op, &new_arg );
            for t in 0 .. n_res {
                new_var_of[first + t] = (new_n_var + t) as IndexT;
                new_var2op.push( (seq.n_op() - 1) as IndexT );
            }
            new_n_var += n_res;
            //
            // queue a conditional skip for this conditional expression
            if op == OpCode::CExp {
                if let Some(lists) =
                    analysis.skip_lists.get( &(i_op as IndexT) )
                {
                    requests.push( CskipRequest {
                        pos        : seq.n_op(),
                        cop        : new_arg[0],
                        flags      : new_arg[1]
                            & (FLAG_LEFT_VAR | FLAG_RIGHT_VAR),
                        left       : new_arg[2],
                        right      : new_arg[3],
                        skip_true  : lists.0.clone(),
                        skip_false : lists.1.clone(),
                    } );
                }
            }
            i_op += 1;
        }
        //
        // dependent variables
        let dep_var : Vec<IndexT> = self.dep_var.iter().map(
            | index | new_var_of[*index as usize]
        ).collect();
        //
        // conditional skip splice; both paths return a sealed sequence
        seq.seal();
        let seq = splice_cskips(
            seq, requests, &new_op_of, &new_var2op,
        );
        //
        // assemble, then compact the parameter pool
        let mut result = ADFun::new();
        result.var        = seq;
        result.n_var      = new_n_var;
        result.n_ind      = self.n_ind;
        result.dep_var    = dep_var;
        result.dyn_seq    = clone_seq(&self.dyn_seq);
        result.dyn2par    = self.dyn2par.clone();
        result.n_dyn_ind  = self.n_dyn_ind;
        result.par_all    = new_par_all;
        result.par_is_dyn = new_par_is_dyn;
        result.str_all    = self.str_all.clone();
        result.vecad_len   = self.vecad_len.clone();
        result.vecad_start = self.vecad_start.clone();
        result.vecad_init  = self.vecad_init.clone();
        result.n_load     = new_n_load;
        compact_par(&mut result);
        result.op_skip = vec![ false; result.var.n_op() ];
        result.vecad   = VecAdState { val : Vec::new(), var : Vec::new() };
        result
    }
}
// ---------------------------------------------------------------------------
// collect_csum
/// Gather, into the summand lists, the tree of single use summation
/// operators rooted at this operator.
#[allow(clippy::too_many_arguments)]
fn collect_csum<V : FloatCore>(
    f          : &ADFun<V>,
    analysis   : &Analysis,
    csum_child : &[bool],
    new_var_of : &[IndexT],
    i_op       : usize,
    plus       : bool,
    add_var    : &mut Vec<IndexT>,
    sub_var    : &mut Vec<IndexT>,
    add_dyn    : &mut Vec<IndexT>,
    sub_dyn    : &mut Vec<IndexT>,
    base       : &mut V,
    n_children : &mut usize,
) {
    let op  = f.var.id_all[i_op];
    let arg = f.var.arg(i_op);
    //
    // (operand, sign) pairs for this summation operator
    let terms : [(IndexT, bool, bool); 2] = match op {
        // (index, is_var, positive)
        OpCode::AddPv => [ (arg[0], false, true),  (arg[1], true, true)  ],
        OpCode::AddVv => [ (arg[0], true,  true),  (arg[1], true, true)  ],
        OpCode::SubPv => [ (arg[0], false, true),  (arg[1], true, false) ],
        OpCode::SubVp => [ (arg[0], true,  true),  (arg[1], false, false)],
        OpCode::SubVv => [ (arg[0], true,  true),  (arg[1], true, false) ],
        _ => unreachable!( "collect_csum: not a summation operator" ),
    };
    for (index, is_var, positive) in terms {
        let sign = plus == positive;
        if is_var {
            let v = index as usize;
            let producer = analysis.var2op[v] as usize;
            if csum_child[producer] {
                *n_children += 1;
                collect_csum(
                    f, analysis, csum_child, new_var_of, producer, sign,
                    add_var, sub_var, add_dyn, sub_dyn, base, n_children,
                );
            } else if sign {
                add_var.push( new_var_of[v] );
            } else {
                sub_var.push( new_var_of[v] );
            }
        } else if f.par_is_dyn[index as usize] {
            if sign {
                add_dyn.push( index );
            } else {
                sub_dyn.push( index );
            }
        } else if sign {
            *base += f.par_all[index as usize];
        } else {
            *base -= f.par_all[index as usize];
        }
    }
}
// ---------------------------------------------------------------------------
// intern_par
/// Index of an identical constant in the growing pool, appending when
/// absent.
fn intern_par<V : FloatCore>(
    par_all    : &mut Vec<V>,
    par_is_dyn : &mut Vec<bool>,
    par_key    : &mut FxHashMap<u64, Vec<IndexT>>,
    value      : V,
) -> IndexT {
    let key = value.key_hash();
    if let Some(bucket) = par_key.get(&key) {
        for index in bucket {
            if par_all[*index as usize].identical_constant(value) {
                return *index;
            }
        }
    }
    let index = par_all.len() as IndexT;
    par_all.push( value );
    par_is_dyn.push( false );
    par_key.entry(key).or_default().push( index );
    index
}
// ---------------------------------------------------------------------------
// splice_cskips
/// Insert the queued conditional skip operators, translating the
/// original operator indices in their skip lists to final indices.
fn splice_cskips(
    seq        : OpSequence<OpCode>,
    requests   : Vec<CskipRequest>,
    new_op_of  : &[ Option<IndexT> ],
    new_var2op : &[IndexT],
) -> OpSequence<OpCode> {
    if requests.is_empty() {
        return seq;
    }
    //
    // translate skip lists to pre splice indices and fix each request's
    // insertion position: after the comparison operands are available
    let mut ready : Vec<CskipRequest> = Vec::new();
    for mut request in requests {
        let mut pos = 0usize;
        if request.flags & FLAG_LEFT_VAR != 0 {
            pos = usize::max(
                pos, new_var2op[request.left as usize] as usize + 1,
            );
        }
        if request.flags & FLAG_RIGHT_VAR != 0 {
            pos = usize::max(
                pos, new_var2op[request.right as usize] as usize + 1,
            );
        }
        pos = usize::min(pos, request.pos);
        let translate = | list : &[IndexT] | -> Vec<IndexT> {
            list.iter().filter_map( |old| {
                let new = new_op_of[*old as usize]?;
                if (new as usize) >= pos {
                    Some(new)
                } else {
                    None
                }
            } ).collect()
        };
        request.skip_true  = translate( &request.skip_true );
        request.skip_false = translate( &request.skip_false );
        request.pos = pos;
        if ! ( request.skip_true.is_empty()
            && request.skip_false.is_empty() )
        {
            ready.push( request );
        }
    }
    if ready.is_empty() {
        return seq;
    }
    ready.sort_by_key( |request| request.pos );
    //
    // pre splice index to final index
    let n_pre = seq.n_op();
    let final_of = | pre : IndexT | -> IndexT {
        let shift = ready.iter().filter(
            | request | request.pos <= pre as usize
        ).count();
        pre + shift as IndexT
    };
    //
    let mut out  = OpSequence::new();
    let mut next = 0usize;
    for pre in 0 .. n_pre {
        while next < ready.len() && ready[next].pos == pre {
            let request = &ready[next];
            let mut arg : Vec<IndexT> = vec![
                request.cop, request.flags, request.left, request.right,
                request.skip_true.len() as IndexT,
                request.skip_false.len() as IndexT,
            ];
            arg.extend( request.skip_true.iter().map( |i| final_of(*i) ) );
            arg.extend( request.skip_false.iter().map( |i| final_of(*i) ) );
            out.push( OpCode::CSkip, &arg );
            next += 1;
        }
        out.push( seq.id_all[pre], seq.arg(pre) );
    }
    out.seal();
    out
}
// ---------------------------------------------------------------------------
// clone_seq
fn clone_seq<Id : Copy>( seq : &OpSequence<Id> ) -> OpSequence<Id> {
    OpSequence {
        id_all    : seq.id_all.clone(),
        arg_start : seq.arg_start.clone(),
        arg_all   : seq.arg_all.clone(),
    }
}
// ---------------------------------------------------------------------------
// compact_par
/// Drop unused constants from the parameter pool and renumber every
/// parameter argument. Dynamic parameters are all kept.
fn compact_par<V : FloatCore>( f : &mut ADFun<V> ) {
    let n_par = f.par_all.len();
    let mut used = vec![ false; n_par ];
    for index in f.dyn2par.iter() {
        used[*index as usize] = true;
    }
    for index in f.vecad_init.iter() {
        used[*index as usize] = true;
    }
    //
    // dynamic operator arguments are parameter indices, except the
    // leading comparison code of CExp and the function id of Dis
    let dyn_par_start = | op : crate::op::DynOp | -> usize {
        match op {
            crate::op::DynOp::CExp | crate::op::DynOp::Dis => 1,
            _ => 0,
        }
    };
    for i_op in 0 .. f.dyn_seq.n_op() {
        let op  = f.dyn_seq.id_all[i_op];
        let arg = f.dyn_seq.arg(i_op);
        for i in dyn_par_start(op) .. arg.len() {
            used[ arg[i] as usize ] = true;
        }
    }
    let mut positions : Vec<usize> = Vec::new();
    for i_op in 0 .. f.var.n_op() {
        let op  = f.var.id_all[i_op];
        let arg = f.var.arg(i_op);
        positions.clear();
        op::par_arg_positions(op, arg, &mut positions);
        for pos in positions.iter() {
            used[ arg[*pos] as usize ] = true;
        }
    }
    //
    // old to new parameter index
    let mut new_of = vec![ 0 as IndexT; n_par ];
    let mut new_par_all    = Vec::new();
    let mut new_par_is_dyn = Vec::new();
    for index in 0 .. n_par {
        if used[index] {
            new_of[index] = new_par_all.len() as IndexT;
            new_par_all.push( f.par_all[index] );
            new_par_is_dyn.push( f.par_is_dyn[index] );
        }
    }
    //
    // rewrite every parameter argument
    for index in f.dyn2par.iter_mut() {
        *index = new_of[*index as usize];
    }
    for index in f.vecad_init.iter_mut() {
        *index = new_of[*index as usize];
    }
    for i_op in 0 .. f.dyn_seq.n_op() {
        let op    = f.dyn_seq.id_all[i_op];
        let start = f.dyn_seq.arg_start[i_op] as usize;
        let end   = f.dyn_seq.arg_start[i_op + 1] as usize;
        for i in (start + dyn_par_start(op)) .. end {
            let old = f.dyn_seq.arg_all[i] as usize;
            f.dyn_seq.arg_all[i] = new_of[old];
        }
    }
    for i_op in 0 .. f.var.n_op() {
        let op  = f.var.id_all[i_op];
        let arg = f.var.arg(i_op);
        positions.clear();
        op::par_arg_positions(op, arg, &mut positions);
        let start = f.var.arg_start[i_op] as usize;
        for pos in positions.iter() {
            let old = f.var.arg_all[start + pos] as usize;
            f.var.arg_all[start + pos] = new_of[old];
        }
    }
    f.par_all    = new_par_all;
    f.par_is_dyn = new_par_is_dyn;
}
