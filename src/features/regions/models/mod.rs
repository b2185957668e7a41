mod column;
mod region;
mod region_info;
mod region_type;

pub use column::{
    column_signature, resolve_columns, Column, ColumnSelection, ALL_COLUMNS, DEFAULT_COLUMNS,
};
pub use region::{format_name, Region};
pub use region_info::{RegionInfo, RegionWithAddress};
pub use region_type::{parent_code, RegionType};
