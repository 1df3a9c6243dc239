//! Arithmetic and pricing for the exchange.
//!
//! [`CheckedArithmetic`] lifts the checked [`Amount`](crate::domain::Amount)
//! operations into `Result`s; the pricing functions implement the
//! constant-product quote with the input-side fee.

mod checked;
mod pricing;

pub use checked::CheckedArithmetic;
pub use pricing::{
    quote_input_amount, quote_input_amount_with_fee, quote_output_amount,
    quote_output_amount_with_fee, quote_price, quote_price_scaled,
};
