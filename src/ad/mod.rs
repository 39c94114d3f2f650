// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module defines the automatic differentiation scalar `AD<V>`.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// sub-modules
pub mod binary;
pub mod unary;
pub mod pow;
pub mod compare;
pub mod cond_exp;
// ---------------------------------------------------------------------------
// use
//
use crate::float::FloatCore;
use crate::op::OpCode;
use crate::tape::{IndexT, Tape, sealed::ThisThreadTape, with_tape};
//
#[cfg(doc)]
use crate::float::doc_generic_v;
// ---------------------------------------------------------------------------
//
// AdType
/// The AD classifications satisfy the order:
/// constants < dynamic parameters < variables.
///
/// If a result depends on two arguments, the classification of the result
/// is the maximum of the classifications of its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AdType {
    //
    /// does not depend on the independent variables or the independent
    /// dynamic parameters
    Constant,
    //
    /// depends on the independent dynamic parameters but not on the
    /// independent variables
    Dynamic,
    //
    /// depends on the independent variables
    Variable,
}
impl AdType {
    //
    /// is a constant parameter
    pub fn is_constant(&self) -> bool {
        *self == AdType::Constant
    }
    //
    /// is a dynamic parameter
    pub fn is_dynamic(&self) -> bool {
        *self == AdType::Dynamic
    }
    //
    /// is a variable
    pub fn is_variable(&self) -> bool {
        *self == AdType::Variable
    }
}
#[test]
fn test_ad_type_order() {
    assert!( AdType::Constant < AdType::Dynamic );
    assert!( AdType::Dynamic  < AdType::Variable );
}
// ---------------------------------------------------------------------------
//
// AD
/// AD acts like *V* but, while this thread is recording, its operations
/// are also captured on the tape.
///
/// * V : see [doc_generic_v]
#[derive(Clone, Copy, Debug)]
pub struct AD<V> {
    //
    /// the tape_id that index and tag below correspond to.
    /// This object is a constant parameter whenever its tape_id differs
    /// from the tape_id of this thread's recording.
    pub(crate) tape_id : usize,
    //
    /// if this object's tape_id matches this thread's recording,
    /// its index in the variable or parameter pool
    pub(crate) index   : IndexT,
    //
    /// if this object's tape_id matches this thread's recording,
    /// Variable or Dynamic
    pub(crate) tag     : AdType,
    //
    /// the value of this AD object
    pub(crate) value   : V,
}
impl<V> AD<V> {
    //
    // AD::new
    pub(crate) fn new(
        tape_id : usize,
        index   : IndexT,
        tag     : AdType,
        value   : V,
    ) -> Self {
        Self { tape_id, index, tag, value }
    }
    //
    // AD::to_value
    /// Convert an AD object to a value (the dependency information is
    /// lost).
    ///
    /// # Example
    /// ```
    /// use adtape::ad_from_value;
    /// let ax = ad_from_value( 5f64 );
    /// assert_eq!( ax.to_value(), 5.0 );
    /// ```
    pub fn to_value(self) -> V {
        self.value
    }
}
impl<V : FloatCore> AD<V> {
    //
    // AD::constant
    /// A constant parameter AD object with this value.
    pub(crate) fn constant(value : V) -> Self {
        Self::new(0, 0, AdType::Constant, value)
    }
}
// ---------------------------------------------------------------------------
// Display
/// Display only shows the value and ignores the dependency information.
///
/// # Example
/// ```
/// use adtape::ad_from_value;
/// let ax = ad_from_value( 5f64 );
/// assert_eq!( format!("{ax}"), "5" );
/// ```
impl<V : std::fmt::Display> std::fmt::Display for AD<V> {
    fn fmt(&self, f : &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
// ---------------------------------------------------------------------------
// From
/// Conversion from the value type, and from f32, yields a constant
/// parameter.
impl<V : FloatCore> From<V> for AD<V> {
    fn from(value : V) -> Self {
        AD::constant(value)
    }
}
// ---------------------------------------------------------------------------
// ad_from_value
/// Convert a value to an AD constant parameter.
///
/// # Example
/// ```
/// use adtape::ad_from_value;
/// let ax = ad_from_value( 3f32 );
/// assert_eq!( ax.to_value(), 3.0 );
/// ```
pub fn ad_from_value<V : FloatCore>( value : V ) -> AD<V> {
    AD::constant(value)
}
//
// ad_from_vector
/// Convert a vector of values to a vector of AD constant parameters.
pub fn ad_from_vector<V : FloatCore>( vec : Vec<V> ) -> Vec< AD<V> > {
    vec.into_iter().map( AD::constant ).collect()
}
//
// ad_to_vector
/// Convert a vector of AD objects to a vector of values
/// (any dependency information is lost).
pub fn ad_to_vector<V : FloatCore>( avec : Vec< AD<V> > ) -> Vec<V> {
    avec.into_iter().map( |ad| ad.value ).collect()
}
// ---------------------------------------------------------------------------
// print_for
/// Record printing during zero order forward mode.
///
/// Each time [ADFun::forward](crate::ADFun::forward) computes order zero,
/// if the value of *pos* is not positive, the text *before* , then the
/// value of *avalue* , then the text *after* are printed on standard
/// output. Nothing is recorded unless *pos* or *avalue* depends on the
/// independent variables.
pub fn print_for<V>(
    pos    : &AD<V>,
    before : &str,
    avalue : &AD<V>,
    after  : &str,
)
where
    V : FloatCore + ThisThreadTape,
{
    with_tape( |tape : &mut Tape<V>| {
        if ! tape.recording {
            return;
        }
        let pos_class = tape.arg_class(pos);
        let val_class = tape.arg_class(avalue);
        if ! ( pos_class.is_variable() || val_class.is_variable() ) {
            return;
        }
        let mut flags = 0;
        let pos_index = if pos_class.is_variable() {
            flags |= crate::op::FLAG_LEFT_VAR;
            pos.index
        } else if pos_class.is_dynamic() {
            pos.index
        } else {
            tape.par_constant( pos.value )
        };
        let val_index = if val_class.is_variable() {
            flags |= crate::op::FLAG_RIGHT_VAR;
            avalue.index
        } else if val_class.is_dynamic() {
            avalue.index
        } else {
            tape.par_constant( avalue.value )
        };
        let before = tape.str_index( before );
        let after  = tape.str_index( after );
        tape.record_var_op(
            OpCode::Pri,
            &[ flags, pos_index, val_index, before, after ],
        );
    } )
}
