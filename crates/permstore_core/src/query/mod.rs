//! Optional-filter query descriptions.
//!
//! # Responsibility
//! - Describe one list/count request as a sparse set of filters.
//! - Validate that every filter the caller set carries a usable value.
//!
//! # Invariants
//! - `None` means "do not filter on this field"; it never stands for a
//!   default value.
//! - A present-but-empty string or list is a validation error, not a wildcard.
//! - Validation runs before compilation; an invalid query never reaches SQL.

use crate::model::Column;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

pub mod compiler;
pub mod entity_permission_query;
pub mod permission_query;

pub use compiler::{compile, Predicate, SelectQuery};
pub use entity_permission_query::{EntityPermissionFilter, EntityPermissionQuery};
pub use permission_query::{PermissionFilter, PermissionQuery};

/// Reasons a query is rejected before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValidationError {
    EmptyString(&'static str),
    EmptyList(&'static str),
    LimitNotPositive(i64),
    NegativeOffset(i64),
    UnknownColumn(String),
    UnknownSortDirection(String),
    CountOnlyList,
}

impl Display for QueryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyString(field) => write!(f, "query field `{field}` cannot be empty"),
            Self::EmptyList(field) => write!(f, "query field `{field}` cannot be an empty list"),
            Self::LimitNotPositive(limit) => {
                write!(f, "query limit must be greater than 0, got {limit}")
            }
            Self::NegativeOffset(offset) => {
                write!(f, "query offset must be greater than or equal to 0, got {offset}")
            }
            Self::UnknownColumn(name) => write!(f, "query references unknown column `{name}`"),
            Self::UnknownSortDirection(value) => {
                write!(f, "unknown sort direction `{value}`; expected asc|desc")
            }
            Self::CountOnlyList => write!(f, "count-only query cannot be listed"),
        }
    }
}

impl Error for QueryValidationError {}

/// Ordering direction for `order_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(QueryValidationError::EmptyString("sort_direction"));
        }
        if value.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(QueryValidationError::UnknownSortDirection(value.to_string()))
        }
    }
}

/// Kind-specific part of a query.
pub trait Filter: Default + Clone + Debug {
    type Column: Column;

    fn validate(&self) -> Result<(), QueryValidationError>;

    /// Equality and membership predicates for the fields that are set.
    fn equality_predicates(&self, out: &mut Vec<Predicate>);

    /// Case-insensitive substring predicates for the fields that are set.
    fn like_predicates(&self, out: &mut Vec<Predicate>);
}

/// A sparse filter/sort/paginate request over one entity kind.
#[derive(Debug, Clone)]
pub struct Query<F: Filter> {
    pub id: Option<String>,
    pub id_in: Option<Vec<String>>,
    /// Inclusive lower bound on `created_at`, in storage datetime format.
    pub created_at_gte: Option<String>,
    /// Inclusive upper bound on `created_at`, in storage datetime format.
    pub created_at_lte: Option<String>,
    /// Projected columns; empty selects every column.
    pub columns: Vec<F::Column>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Option<String>,
    /// Defaults to descending when `order_by` is set.
    pub sort_direction: Option<SortDirection>,
    /// Count matching rows instead of returning them; ignores limit/offset.
    pub count_only: bool,
    /// Include rows whose `soft_deleted_at` is not in the future.
    pub soft_deleted_included: bool,
    pub filter: F,
}

impl<F: Filter> Default for Query<F> {
    fn default() -> Self {
        Self {
            id: None,
            id_in: None,
            created_at_gte: None,
            created_at_lte: None,
            columns: Vec::new(),
            limit: None,
            offset: None,
            order_by: None,
            sort_direction: None,
            count_only: false,
            soft_deleted_included: false,
            filter: F::default(),
        }
    }
}

impl<F: Filter> Query<F> {
    /// A query with no filters set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), QueryValidationError> {
        require_non_empty("id", self.id.as_deref())?;
        require_non_empty_list("id_in", self.id_in.as_deref())?;
        require_non_empty("created_at_gte", self.created_at_gte.as_deref())?;
        require_non_empty("created_at_lte", self.created_at_lte.as_deref())?;
        require_non_empty("order_by", self.order_by.as_deref())?;

        if let Some(order_by) = self.order_by.as_deref() {
            if F::Column::from_name(order_by).is_none() {
                return Err(QueryValidationError::UnknownColumn(order_by.to_string()));
            }
        }
        if let Some(limit) = self.limit {
            if limit <= 0 {
                return Err(QueryValidationError::LimitNotPositive(limit));
            }
        }
        if let Some(offset) = self.offset {
            if offset < 0 {
                return Err(QueryValidationError::NegativeOffset(offset));
            }
        }

        self.filter.validate()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_id_in(mut self, ids: Vec<String>) -> Self {
        self.id_in = Some(ids);
        self
    }

    pub fn with_created_at_gte(mut self, at: impl Into<String>) -> Self {
        self.created_at_gte = Some(at.into());
        self
    }

    pub fn with_created_at_lte(mut self, at: impl Into<String>) -> Self {
        self.created_at_lte = Some(at.into());
        self
    }

    pub fn with_columns(mut self, columns: Vec<F::Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn with_sort_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = Some(direction);
        self
    }

    pub fn with_count_only(mut self, count_only: bool) -> Self {
        self.count_only = count_only;
        self
    }

    pub fn with_soft_deleted_included(mut self, included: bool) -> Self {
        self.soft_deleted_included = included;
        self
    }
}

pub(crate) fn require_non_empty(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), QueryValidationError> {
    match value {
        Some("") => Err(QueryValidationError::EmptyString(field)),
        _ => Ok(()),
    }
}

pub(crate) fn require_non_empty_list<T>(
    field: &'static str,
    value: Option<&[T]>,
) -> Result<(), QueryValidationError> {
    match value {
        Some([]) => Err(QueryValidationError::EmptyList(field)),
        _ => Ok(()),
    }
}
