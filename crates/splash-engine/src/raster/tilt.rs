use resvg::tiny_skia::Pixmap;

use crate::scene::SurfaceTilt;

/// Projects `src` through `tilt` and composites it source-over onto `dst`.
///
/// The surface is rotated about its center by `rotateX` then `rotateY`
/// (CSS order for `rotateY(..) rotateX(..)`) and viewed from `perspective`
/// pixels away. For each destination pixel the plane point that projects onto
/// it is recovered by solving a 2×2 linear system, then sampled bilinearly.
pub(super) fn project(src: &Pixmap, dst: &mut Pixmap, tilt: &SurfaceTilt, scale: f32) {
    let w = src.width() as f32;
    let h = src.height() as f32;
    let (cx, cy) = (w * 0.5, h * 0.5);
    let d = (tilt.perspective * scale).max(1.0);

    let (sa, ca) = tilt.rotate_x_deg.to_radians().sin_cos();
    let (sb, cb) = tilt.rotate_y_deg.to_radians().sin_cos();
    // Images of the plane's x and y unit axes: Ry · Rx · e_x and Ry · Rx · e_y.
    let c1 = [cb, 0.0, -sb];
    let c2 = [sb * sa, ca, cb * sa];

    let dst_w = dst.width() as usize;
    let dst_h = dst.height() as usize;
    let src_data = src.data();
    let out = dst.data_mut();

    for py in 0..dst_h {
        let v = py as f32 + 0.5 - cy;
        for px in 0..dst_w {
            let u = px as f32 + 0.5 - cx;

            // u·(d − z) = d·x' and v·(d − z) = d·y', linear in the plane coords (x, y).
            let a11 = d * c1[0] + u * c1[2];
            let a12 = d * c2[0] + u * c2[2];
            let a21 = d * c1[1] + v * c1[2];
            let a22 = d * c2[1] + v * c2[2];
            let det = a11 * a22 - a12 * a21;
            if det.abs() < 1e-6 {
                continue;
            }
            let x = (u * d * a22 - a12 * v * d) / det;
            let y = (a11 * v * d - u * d * a21) / det;

            let z = x * c1[2] + y * c2[2];
            if z >= d {
                continue;
            }

            let Some(s) = sample_bilinear(src_data, src.width(), src.height(), x + cx - 0.5, y + cy - 0.5)
            else {
                continue;
            };
            let i = (py * dst_w + px) * 4;
            let inv = 1.0 - s[3] / 255.0;
            for k in 0..4 {
                out[i + k] = (s[k] + out[i + k] as f32 * inv).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Bilinear sample of premultiplied RGBA8 at pixel-center coordinates.
/// Returns `None` outside the source.
fn sample_bilinear(data: &[u8], w: u32, h: u32, x: f32, y: f32) -> Option<[f32; 4]> {
    if x < -0.5 || y < -0.5 || x > w as f32 - 0.5 || y > h as f32 - 0.5 {
        return None;
    }
    let x0 = x.floor().clamp(0.0, (w - 1) as f32) as u32;
    let y0 = y.floor().clamp(0.0, (h - 1) as f32) as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = (x - x0 as f32).clamp(0.0, 1.0);
    let fy = (y - y0 as f32).clamp(0.0, 1.0);

    let px = |xx: u32, yy: u32, k: usize| data[((yy * w + xx) * 4) as usize + k] as f32;
    let mut out = [0.0f32; 4];
    for (k, o) in out.iter_mut().enumerate() {
        let top = px(x0, y0, k) * (1.0 - fx) + px(x1, y0, k) * fx;
        let bottom = px(x0, y1, k) * (1.0 - fx) + px(x1, y1, k) * fx;
        *o = top * (1.0 - fy) + bottom * fy;
    }
    Some(out)
}
