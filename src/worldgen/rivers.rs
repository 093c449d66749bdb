//! Step 6 of world generation: flow-traced rivers over the wrapped grid.

use serde::{Deserialize, Serialize};

use crate::core::types::{PixelCoord, MAP_H, MAP_W};
use crate::prng::Prng;

/// Fixed neighbor-visit order for tie-breaking when multiple neighbors
/// share the lowest elevation: north, south, east, west.
const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (1, 0), (-1, 0)];

const MAX_STEPS: u32 = 200;
const MIN_LENGTH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct River {
    pub path: Vec<(u32, u32)>,
    pub strength: f32,
}

/// Traces `N ~= int(80..150)` rivers from sources where `0.3 < elevation <
/// 0.9` and `moisture > 0.4`, each stepping downhill until it reaches
/// ocean, merges into another river, hits a local minimum, or exceeds
/// `MAX_STEPS`. Returns the kept rivers (length > 10) and marks every
/// traced pixel (including short, discarded paths merged into a kept one)
/// in `river_mark`.
pub fn trace_rivers(elevation: &[f32], moisture: &[f32], prng: &mut Prng) -> (Vec<River>, Vec<u8>) {
    let mut river_mark = vec![0u8; MAP_W * MAP_H];
    let mut rivers = Vec::new();

    let n = prng.next_int(80, 151) as u32;
    let mut attempts = 0u32;
    let mut found = 0u32;

    while found < n && attempts < n * 20 {
        attempts += 1;
        let x = prng.next_int(0, MAP_W as i64) as u32;
        let y = prng.next_int(0, MAP_H as i64) as u32;
        let idx = y as usize * MAP_W + x as usize;
        let e = elevation[idx];
        let m = moisture[idx];
        if !(0.3 < e && e < 0.9) || m <= 0.4 {
            continue;
        }
        found += 1;

        let mut path = Vec::new();
        let mut pos = PixelCoord::new(x, y);
        let mut steps = 0u32;

        loop {
            path.push((pos.x, pos.y));
            river_mark[pos.index()] = 1;

            if elevation[pos.index()] <= 0.0 {
                break;
            }
            if steps >= MAX_STEPS {
                break;
            }

            let here = elevation[pos.index()];
            let mut next = None;
            let mut lowest = here;
            for (dx, dy) in DIRECTIONS {
                let cand = pos.neighbor(dx, dy);
                let e = elevation[cand.index()];
                if e < lowest {
                    lowest = e;
                    next = Some(cand);
                }
            }

            match next {
                Some(n) => {
                    if river_mark[n.index()] != 0 {
                        // merges into an existing river; keep the shared
                        // pixel marked but stop tracing this one further.
                        path.push((n.x, n.y));
                        break;
                    }
                    pos = n;
                    steps += 1;
                }
                None => break, // local minimum
            }
        }

        if path.len() > MIN_LENGTH {
            let strength = (path.len() as f32 / 100.0).min(1.0);
            rivers.push(River { path, strength });
        }
    }

    (rivers, river_mark)
}
