//! Specification parsing: free-text RFQ fields into a typed order.

mod fields;
mod model;

pub use fields::{parse_decimal, parse_fraction, parse_integer, strip_units, SpecFields};
pub use model::{keys, OfferNumber, QuoteSpec};
