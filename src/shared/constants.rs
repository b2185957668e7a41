/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// REGION CONSTANTS
// =============================================================================

/// Country name appended to every composed address
pub const COUNTRY_NAME: &str = "Indonesia";

/// Separator between the parts of a composed address
pub const ADDRESS_SEPARATOR: &str = ", ";

/// Delimiter between the segments of a cache key; never part of a code or column name
pub const CACHE_KEY_DELIMITER: &str = ":";

/// Separator between column names inside a cache key's column segment
pub const COLUMN_SIGNATURE_SEPARATOR: &str = ".";
