//! Value ranges, linear range scaling and colour maps.
//!
//! A [`RangeScaler`] maps an input [`Range`] onto an output [`Range`]. The
//! input is either bound explicitly or discovered by scanning data
//! (autoscale); the two modes are distinguished by the searching sentinel
//! `(+∞, −∞)`.

mod colourmap;
mod error;
mod range;
mod scaler;

pub use colourmap::{ColourMap, ColourMapType, UnknownColourMap};
pub use error::ScaleError;
pub use range::Range;
pub use scaler::{LinearScale, RangeScaler};
