// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Implement the [ADFun] Jacobian and Hessian driver methods.
//!
//! Link to [parent module](super)
//!
//! These are convenience wrappers that invoke the forward and reverse
//! sweeps; the Jacobian driver picks forward or reverse mode depending on
//! which needs fewer sweeps.
// ---------------------------------------------------------------------------
// use
//
use crate::atom::sealed::AtomRegistry;
use crate::discrete::sealed::DiscreteRegistry;
use crate::error::Error;
use crate::float::FloatCore;
use crate::fun::ADFun;
// ---------------------------------------------------------------------------
impl<V> ADFun<V>
where
    V : FloatCore + AtomRegistry + DiscreteRegistry,
{
    //
    // jacobian
    /// Dense Jacobian of the function at one argument point.
    ///
    /// * Syntax :
    /// ```text
    ///     jac = f.jacobian(x)?
    /// ```
    ///
    /// * jac :
    /// `jac[ i * domain_len() + j ]` is the partial of dependent i with
    /// respect to independent j.
    ///
    /// # Example
    /// ```
    /// use adtape::{start_recording, stop_recording};
    /// let ax    = start_recording( vec![ 2f64, 3f64 ] ).unwrap();
    /// let ay    = vec![ &ax[0] * &ax[1], &ax[0] + &ax[1] ];
    /// let mut f = stop_recording(ay).unwrap();
    /// let jac   = f.jacobian( vec![ 2.0, 3.0 ] ).unwrap();
    /// assert_eq!( jac, vec![ 3.0, 2.0, 1.0, 1.0 ] );
    /// ```
    pub fn jacobian(&mut self, x : Vec<V>) -> Result<Vec<V>, Error> {
        let n = self.domain_len();
        let m = self.range_len();
        self.forward(0, x)?;
        let mut jac = vec![ V::zero(); m * n ];
        if n <= m {
            // one first order forward sweep per independent
            for j in 0 .. n {
                let mut dx = vec![ V::zero(); n ];
                dx[j] = V::one();
                let col = self.forward(1, dx)?;
                for i in 0 .. m {
                    jac[i * n + j] = col[i];
                }
            }
        } else {
            // one first order reverse sweep per dependent
            for i in 0 .. m {
                let mut w = vec![ V::zero(); m ];
                w[i] = V::one();
                let row = self.reverse(0, w)?;
                jac[i * n .. (i + 1) * n].copy_from_slice( &row );
            }
        }
        Ok( jac )
    }
    //
    // hessian
    /// Dense Hessian of the weighted sum of the dependents.
    ///
    /// * Syntax :
    /// ```text
    ///     hes = f.hessian(x, w)?
    /// ```
    ///
    /// * w :
    /// weight for each dependent; the result is the Hessian of
    /// `w . f(x)` .
    ///
    /// * hes :
    /// `hes[ i * domain_len() + j ]` is the second partial with respect
    /// to independents i and j.
    ///
    /// # Example
    /// ```
    /// use adtape::{start_recording, stop_recording};
    /// let ax    = start_recording( vec![ 2f64, 3f64 ] ).unwrap();
    /// let ay    = vec![ &ax[0] * &ax[1] ];
    /// let mut f = stop_recording(ay).unwrap();
    /// let hes   = f.hessian( vec![ 2.0, 3.0 ], vec![ 1.0 ] ).unwrap();
    /// assert_eq!( hes, vec![ 0.0, 1.0, 1.0, 0.0 ] );
    /// ```
    pub fn hessian(&mut self, x : Vec<V>, w : Vec<V>) -> Result<Vec<V>, Error> {
        let n = self.domain_len();
        let m = self.range_len();
        if w.len() != m {
            return Err( Error::DimensionMismatch {
                what     : "hessian weight vector",
                expected : m,
                found    : w.len(),
            } );
        }
        self.forward(0, x)?;
        let mut hes = vec![ V::zero(); n * n ];
        for j in 0 .. n {
            let mut dx = vec![ V::zero(); n ];
            dx[j] = V::one();
            self.forward(1, dx)?;
            //
            // weight the first order coefficients of the dependents
            let mut w2 = vec![ V::zero(); 2 * m ];
            for i in 0 .. m {
                w2[i * 2 + 1] = w[i];
            }
            let dw = self.reverse(1, w2)?;
            for i in 0 .. n {
                hes[i * n + j] = dw[i * 2];
            }
        }
        Ok( hes )
    }
}
