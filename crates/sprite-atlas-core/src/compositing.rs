use image::{RgbaImage, imageops};

use crate::model::Rect;

/// Copies all of `src` into `canvas` with its top-left at `(dx, dy)`.
/// Pixels falling outside the canvas are dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    imageops::replace(canvas, src, dx as i64, dy as i64);
}

/// Replicates the outermost rows/columns of `content` outward by `amount` pixels on
/// every side, filling the diagonal corners with the matching corner pixel.
/// Writes are clipped to the canvas.
pub fn extrude_edges(canvas: &mut RgbaImage, content: &Rect, amount: u32) {
    let (cw, ch) = canvas.dimensions();
    if amount == 0 || content.w == 0 || content.h == 0 {
        return;
    }
    if content.right() > cw || content.bottom() > ch {
        return;
    }
    let (x0, y0) = (content.x, content.y);
    let (x1, y1) = (content.right() - 1, content.bottom() - 1);

    for e in 1..=amount {
        for x in x0..=x1 {
            if y0 >= e {
                let p = *canvas.get_pixel(x, y0);
                canvas.put_pixel(x, y0 - e, p);
            }
            if y1 + e < ch {
                let p = *canvas.get_pixel(x, y1);
                canvas.put_pixel(x, y1 + e, p);
            }
        }
        for y in y0..=y1 {
            if x0 >= e {
                let p = *canvas.get_pixel(x0, y);
                canvas.put_pixel(x0 - e, y, p);
            }
            if x1 + e < cw {
                let p = *canvas.get_pixel(x1, y);
                canvas.put_pixel(x1 + e, y, p);
            }
        }
    }

    // corners
    let c00 = *canvas.get_pixel(x0, y0);
    let c10 = *canvas.get_pixel(x1, y0);
    let c01 = *canvas.get_pixel(x0, y1);
    let c11 = *canvas.get_pixel(x1, y1);
    for ey in 1..=amount {
        for ex in 1..=amount {
            if x0 >= ex && y0 >= ey {
                canvas.put_pixel(x0 - ex, y0 - ey, c00);
            }
            if x1 + ex < cw && y0 >= ey {
                canvas.put_pixel(x1 + ex, y0 - ey, c10);
            }
            if x0 >= ex && y1 + ey < ch {
                canvas.put_pixel(x0 - ex, y1 + ey, c01);
            }
            if x1 + ex < cw && y1 + ey < ch {
                canvas.put_pixel(x1 + ex, y1 + ey, c11);
            }
        }
    }
}
