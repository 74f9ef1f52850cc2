//! Row-parallel fill used by every pipeline stage.
//!
//! Each output row depends only on the (read-only) input grid, so rows can be
//! produced in any order. With the `parallel` feature rows are distributed
//! over the rayon pool; otherwise they run in order on the calling thread.
//! Both paths call the same closure, so results are bit-identical.
use super::Image;

/// Fill every row of `dst` with `f(y, row)`.
pub fn fill_rows<T, F>(dst: &mut Image<T>, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if dst.w == 0 || dst.h == 0 {
        return;
    }
    let w = dst.w;
    let stride = dst.stride;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        dst.data
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| f(y, &mut row[..w]));
    }

    #[cfg(not(feature = "parallel"))]
    {
        dst.data
            .chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| f(y, &mut row[..w]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;

    #[test]
    fn fill_rows_visits_every_row_once() {
        let mut img = ImageF32::new(7, 5);
        fill_rows(&mut img, |y, row| {
            for (x, px) in row.iter_mut().enumerate() {
                *px += (y * 10 + x) as f32;
            }
        });
        assert_eq!(img.get(0, 0), 0.0);
        assert_eq!(img.get(6, 4), 46.0);
        assert_eq!(img.get(3, 2), 23.0);
    }

    #[test]
    fn fill_rows_ignores_empty_grids() {
        let mut img = ImageF32::new(0, 3);
        fill_rows(&mut img, |_, _| panic!("no rows expected"));
    }
}
