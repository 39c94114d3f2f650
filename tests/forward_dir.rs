// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Multiple direction forward mode agrees with repeated single direction
// sweeps.
//
use adtape::{start_recording, stop_recording};
//
#[test]
fn forward_dir_matches_single() {
    // f(x) = [ x0 * x1, sin(x0) + x1 * x1 ]
    let record = | | {
        let ax = start_recording( vec![ 1.0f64, 1.0 ] ).unwrap();
        let ay = vec![
            &ax[0] * &ax[1],
            ax[0].sin() + &ax[1] * &ax[1],
        ];
        stop_recording(ay).unwrap()
    };
    let x = vec![ 0.7f64, 1.3 ];
    //
    // single direction, one sweep per direction
    let mut f = record();
    f.forward(0, x.clone()).unwrap();
    let y1_a = f.forward(1, vec![ 1.0, 0.0 ]).unwrap();
    let y2_a = f.forward(2, vec![ 0.0, 0.0 ]).unwrap();
    f.forward(0, x.clone()).unwrap();
    let y1_b = f.forward(1, vec![ 0.0, 1.0 ]).unwrap();
    let y2_b = f.forward(2, vec![ 0.0, 0.0 ]).unwrap();
    //
    // both directions at once
    let mut g = record();
    g.forward(0, x.clone()).unwrap();
    let y1 = g.forward_dir(
        1, 2, vec![ 1.0, 0.0, 0.0, 1.0 ],
    ).unwrap();
    let y2 = g.forward_dir(
        2, 2, vec![ 0.0, 0.0, 0.0, 0.0 ],
    ).unwrap();
    //
    for i in 0 .. 2 {
        assert!( (y1[i * 2]     - y1_a[i]).abs() < 1e-14 );
        assert!( (y1[i * 2 + 1] - y1_b[i]).abs() < 1e-14 );
        assert!( (y2[i * 2]     - y2_a[i]).abs() < 1e-14 );
        assert!( (y2[i * 2 + 1] - y2_b[i]).abs() < 1e-14 );
    }
    //
    // a single direction sweep restarts cleanly afterwards
    g.forward(0, x.clone()).unwrap();
    let y1 = g.forward(1, vec![ 1.0, 0.0 ]).unwrap();
    assert!( (y1[0] - y1_a[0]).abs() < 1e-14 );
}
