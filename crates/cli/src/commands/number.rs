//! Order number formatting.

use std::io::Write;

use tgf_core::ReceiverType;
use tgf_fulfillment::OrderNumber;

/// Print the suffixed order number for each of `groups` shipment groups.
///
/// # Errors
///
/// Returns an error if the sequence or group count is out of range.
pub fn print_numbers(
    sequence: i64,
    receiver: ReceiverType,
    groups: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let number = OrderNumber::new(sequence, receiver)?;
    let numbers = (0..groups.max(1))
        .map(|index| number.with_suffix(index))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = std::io::stdout().lock();
    for number in numbers {
        writeln!(out, "{number}")?;
    }
    Ok(())
}
