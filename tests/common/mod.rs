#![allow(dead_code)]

use std::fs;
use std::path::Path;

use trimer_analysis_rs::Coordinate;

/// One frame: positions of real particles 0..3 and their virtual sites 3..6
#[derive(Clone, Copy)]
pub struct TrimerFrame {
    pub real: [Coordinate; 3],
    pub virtual_sites: [Coordinate; 3],
}

pub fn triangle() -> [Coordinate; 3] {
    let h = 3f64.sqrt() / 2.0;
    [
        Coordinate::new(0.0, 0.0, 0.0),
        Coordinate::new(1.0, 0.0, 0.0),
        Coordinate::new(0.5, h, 0.0),
    ]
}

/// Trimer frame whose dipoles are `dipoles`, offset from the triangle vertices
pub fn frame_with_dipoles(dipoles: [Coordinate; 3]) -> TrimerFrame {
    let real = triangle();
    let mut virtual_sites = real;
    for i in 0..3 {
        virtual_sites[i] = Coordinate::new(
            real[i].x + dipoles[i].x,
            real[i].y + dipoles[i].y,
            real[i].z + dipoles[i].z,
        );
    }
    TrimerFrame {
        real,
        virtual_sites,
    }
}

/// Dipoles perpendicular to the triangle plane: S = 0
pub fn perpendicular_frame() -> TrimerFrame {
    let z = Coordinate::new(0.0, 0.0, 0.3);
    frame_with_dipoles([z, z, z])
}

/// Only particle 1 has an in-plane dipole, pointing at particle 0: S = 0.25
pub fn quarter_frame() -> TrimerFrame {
    let z = Coordinate::new(0.0, 0.0, 0.3);
    frame_with_dipoles([z, Coordinate::new(-0.3, 0.0, 0.0), z])
}

/// Dipoles along the triangle edges: S = 0.75
pub fn edge_frame() -> TrimerFrame {
    let real = triangle();
    let along = |a: Coordinate, b: Coordinate| {
        Coordinate::new((b.x - a.x) * 0.3, (b.y - a.y) * 0.3, (b.z - a.z) * 0.3)
    };
    frame_with_dipoles([
        along(real[0], real[1]),
        along(real[1], real[2]),
        along(real[2], real[0]),
    ])
}

/// VTF text with a structure block for 3 real + 3 virtual particles and one extra
/// bookkeeping particle, followed by `frames`.
pub fn vtf_text(frames: &[TrimerFrame]) -> String {
    let mut text = String::from("unitcell 20.0 20.0 20.0\n");
    for id in 0..3 {
        text.push_str(&format!("atom {} radius 0.5 name 0 type 0\n", id));
    }
    for id in 3..6 {
        text.push_str(&format!("atom {} radius 0.1 name 1 type 1\n", id));
    }
    text.push_str("atom 6 radius 0.1 name 2 type 2\n");
    text.push_str("bond 0:1,1:2\n");

    for frame in frames {
        text.push_str("timestep indexed\n");
        // Short metadata lines inside a frame are not position records.
        text.push_str("# trimer\n");
        text.push_str("pbc 20.0 20.0\n");
        for (id, c) in frame.real.iter().enumerate() {
            text.push_str(&format!("{} {} {} {}\n", id, c.x, c.y, c.z));
        }
        for (id, c) in frame.virtual_sites.iter().enumerate() {
            text.push_str(&format!("{} {} {} {}\n", id + 3, c.x, c.y, c.z));
        }
        text.push_str("6 10.0 10.0 10.0\n");
        // Identifier beyond the declared particles: ignored by the reader.
        text.push_str("7 99.0 99.0 99.0\n");
    }
    text
}

pub fn write_text(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write temp file");
}
