pub mod caption;
pub mod font;
pub mod style;

pub use caption::{CaptionAnchor, CaptionBitmap};
pub use font::{CaptionFont, FontError};
pub use style::OverlayStyle;
