//! Unit conversions for wei amounts and gas pricing.

use ethers::types::U256;

/// Decimals of the native currency.
pub const ETHER_DECIMALS: usize = 18;

/// Render a wei amount as a decimal ether string.
///
/// Trailing zeros of the fraction are dropped and a whole amount has no
/// decimal point (`0`, `1`, `0.5`, `1.000000000000000001`).
pub fn format_ether(wei: U256) -> String {
    let scale = U256::exp10(ETHER_DECIMALS);
    let whole = wei / scale;
    // Remainder is below 10^18 and always fits.
    let fraction = (wei % scale).as_u64();
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = ETHER_DECIMALS);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Bump a network gas price by 1.5x, rounding down.
pub fn scale_gas_price(price: U256) -> U256 {
    price.saturating_mul(U256::from(3u64)) / U256::from(2u64)
}
