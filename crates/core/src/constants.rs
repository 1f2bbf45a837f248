/// Maximum number of characters in a ticker symbol.
pub const MAX_SYMBOL_LENGTH: usize = 10;

/// Decimal places used when formatting quantities in user-facing messages.
pub const QUANTITY_DISPLAY_PRECISION: u32 = 4;

/// Storage date format for trade dates.
pub const TRADE_DATE_FORMAT: &str = "%Y-%m-%d";
