pub mod grid;
pub mod io;
pub mod rgba;
pub mod rows;
pub mod traits;

pub use self::grid::{clamp_index, Image, ImageF32, ImageRgb, ImageRgba};
pub use self::rows::fill_rows;
pub use self::traits::{ImageView, Rows};
