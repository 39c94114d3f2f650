// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! This pub module defines the adtape error type.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
//
// Error
/// The errors reported by the fallible adtape entry points.
///
/// Protocol violations inside operator overloads, which cannot return a
/// `Result`, panic instead; see the documentation for the individual
/// operators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    //
    /// [start_recording](crate::start_recording) was called while this
    /// thread's tape was already recording.
    #[error("a recording is already active on this thread")]
    RecordingAlreadyActive,
    //
    /// [stop_recording](crate::stop_recording) or
    /// [abort_recording](crate::abort_recording) was called while this
    /// thread's tape was not recording.
    #[error("no recording is active on this thread")]
    NoActiveRecording,
    //
    /// An [AD](crate::AD) object carries the tape identifier of a recording
    /// that is open on another thread.
    #[error("AD object belongs to a tape that is open on another thread")]
    TapeIdMismatch,
    //
    /// An argument vector length does not agree with the recording.
    #[error("{what}: length is {found} but {expected} is required")]
    DimensionMismatch {
        what     : &'static str,
        expected : usize,
        found    : usize,
    },
    //
    /// With nan checking enabled, a sweep computed nan for a variable
    /// whose inputs were all finite.
    #[error("variable {var_index} is nan but its inputs are finite")]
    NanEncountered { var_index : usize },
    //
    /// An atomic function callback does not implement the requested
    /// Taylor coefficient order.
    #[error("atomic function {name}: order {order} is not supported")]
    AtomicOrderUnsupported {
        name  : String,
        order : usize,
    },
    //
    /// An atomic function callback reported failure.
    #[error("atomic function {name}: callback failed")]
    AtomicFailed { name : String },
    //
    /// A VecAD index was outside its vector during zero order forward mode.
    #[error("VecAD index {index} is outside a vector of length {length}")]
    IndexOutOfRange {
        index  : usize,
        length : usize,
    },
    //
    /// A serialized function object failed validation.
    #[error("invalid serialized function: {0}")]
    InvalidData(String),
}
