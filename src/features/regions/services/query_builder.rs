//! Lookup predicates derived from region codes.
//!
//! Queries are plain values; the store decides how to execute them.

use crate::features::regions::models::{Column, Region, RegionType, DEFAULT_COLUMNS};
use crate::shared::validation::is_numeric_term;

/// Direct children of a parent code, ordered by name.
///
/// Both predicates are needed: a prefix match alone would also return
/// grandchildren.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildrenQuery {
    /// Literal code prefix every child must carry (`None` for provinces)
    pub prefix: Option<String>,
    /// Exact code length of the child level (0 matches nothing)
    pub code_length: usize,
}

/// In-memory evaluation, mirrors the SQL predicate
#[cfg(test)]
impl ChildrenQuery {
    pub fn matches(&self, code: &str) -> bool {
        code.len() == self.code_length
            && self
                .prefix
                .as_deref()
                .map_or(true, |prefix| code.starts_with(prefix))
    }
}

pub fn children_query(parent_code: Option<&str>) -> ChildrenQuery {
    match parent_code {
        None => ChildrenQuery {
            prefix: None,
            code_length: RegionType::Province.code_length(),
        },
        Some(parent) => ChildrenQuery {
            prefix: Some(parent.to_string()),
            code_length: RegionType::from_code(parent)
                .and_then(RegionType::child)
                .map_or(0, RegionType::code_length),
        },
    }
}

/// Projection for a children listing.
///
/// With default columns, postal codes are only listed when the children are
/// villages.
pub fn children_columns(parent_code: Option<&str>, resolved: Vec<Column>) -> Vec<Column> {
    if resolved != DEFAULT_COLUMNS {
        return resolved;
    }

    let children_are_villages =
        parent_code.map(str::len) == Some(RegionType::District.code_length());
    if children_are_villages {
        vec![Column::Code, Column::Name, Column::PostalCode]
    } else {
        vec![Column::Code, Column::Name]
    }
}

/// Name (and possibly postal code) search across all or one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub region_type: Option<RegionType>,
    /// Also match villages whose postal code contains the term
    pub match_postal_code: bool,
}

#[cfg(test)]
impl SearchQuery {
    pub fn matches(&self, region: &Region) -> bool {
        let term = self.term.to_lowercase();
        let by_name = region
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&term));
        let by_postal_code = self.match_postal_code
            && region.is_village()
            && region
                .postal_code
                .as_deref()
                .is_some_and(|postal_code| postal_code.contains(&self.term));
        let in_level = self
            .region_type
            .map_or(true, |level| region.code.len() == level.code_length());

        (by_name || by_postal_code) && in_level
    }
}

pub fn search_query(term: &str, region_type: Option<RegionType>) -> SearchQuery {
    let match_postal_code = is_numeric_term(term)
        && matches!(region_type, None | Some(RegionType::Village));

    SearchQuery {
        term: term.to_string(),
        region_type,
        match_postal_code,
    }
}

/// Projection for a search: code and name always, postal code for village
/// searches or when requested
pub fn search_columns(region_type: Option<RegionType>, resolved: &[Column]) -> Vec<Column> {
    let mut columns = vec![Column::Code, Column::Name];
    for column in resolved {
        if !columns.contains(column) {
            columns.push(*column);
        }
    }
    if region_type == Some(RegionType::Village) && !columns.contains(&Column::PostalCode) {
        columns.push(Column::PostalCode);
    }
    columns
}

/// Postal codes only belong to villages; clear them from every other row.
pub fn strip_postal_codes(rows: &mut [Region]) {
    for row in rows.iter_mut().filter(|row| !row.is_village()) {
        row.postal_code = None;
    }
}
