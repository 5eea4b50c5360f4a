//! Request and response shapes exchanged with data providers.
//!
//! Everything here is plain data with `serde` derives so providers can forward
//! it to a transport as-is. Records travel as [`BaseRecord`] and are decoded into
//! caller types by the hooks.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    errors::HttpError,
    pagination::{Cursor, Pagination, ResolvedPagination},
    types::{BaseRecord, MetaQuery},
};

/// Identifier of a record: either numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseKey {
    Number(i64),
    String(String),
}

impl fmt::Display for BaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseKey::Number(n) => write!(f, "{n}"),
            BaseKey::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for BaseKey {
    fn from(value: i64) -> Self {
        BaseKey::Number(value)
    }
}

impl From<i32> for BaseKey {
    fn from(value: i32) -> Self {
        BaseKey::Number(value.into())
    }
}

impl From<u32> for BaseKey {
    fn from(value: u32) -> Self {
        BaseKey::Number(value.into())
    }
}

impl From<String> for BaseKey {
    fn from(value: String) -> Self {
        BaseKey::String(value)
    }
}

impl From<&str> for BaseKey {
    fn from(value: &str) -> Self {
        BaseKey::String(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrudSort {
    pub field: String,
    pub order: SortOrder,
}

impl CrudSort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Field-level filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    In,
    Nin,
    Ina,
    Nina,
    Contains,
    Ncontains,
    Containss,
    Ncontainss,
    Between,
    Nbetween,
    Null,
    Nnull,
    Startswith,
    Nstartswith,
    Startswiths,
    Nstartswiths,
    Endswith,
    Nendswith,
    Endswiths,
    Nendswiths,
}

/// Operators combining nested filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionalOperator {
    Or,
    And,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalFilter {
    pub field: String,
    pub operator: LogicalOperator,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub operator: ConditionalOperator,
    pub value: Vec<CrudFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrudFilter {
    Logical(LogicalFilter),
    Conditional(ConditionalFilter),
}

impl CrudFilter {
    pub fn field(
        field: impl Into<String>,
        operator: LogicalOperator,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        CrudFilter::Logical(LogicalFilter {
            field: field.into(),
            operator,
            value: value.into(),
        })
    }

    pub fn or(filters: Vec<CrudFilter>) -> Self {
        CrudFilter::Conditional(ConditionalFilter {
            key: None,
            operator: ConditionalOperator::Or,
            value: filters,
        })
    }

    pub fn and(filters: Vec<CrudFilter>) -> Self {
        CrudFilter::Conditional(ConditionalFilter {
            key: None,
            operator: ConditionalOperator::And,
            value: filters,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Delete,
    Head,
    Options,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetListParams {
    pub resource: String,
    pub pagination: ResolvedPagination,
    pub sorters: Vec<CrudSort>,
    pub filters: Vec<CrudFilter>,
    pub meta: MetaQuery,
    /// Opaque cursor token when paging with provider-issued cursors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetManyParams {
    pub resource: String,
    pub ids: Vec<BaseKey>,
    pub meta: MetaQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetOneParams {
    pub resource: String,
    pub id: BaseKey,
    pub meta: MetaQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateParams {
    pub resource: String,
    pub variables: serde_json::Value,
    pub meta: MetaQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateManyParams {
    pub resource: String,
    pub variables: Vec<serde_json::Value>,
    pub meta: MetaQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateParams {
    pub resource: String,
    pub id: BaseKey,
    pub variables: serde_json::Value,
    pub meta: MetaQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateManyParams {
    pub resource: String,
    pub ids: Vec<BaseKey>,
    pub variables: serde_json::Value,
    pub meta: MetaQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteOneParams {
    pub resource: String,
    pub id: BaseKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    pub meta: MetaQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteManyParams {
    pub resource: String,
    pub ids: Vec<BaseKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    pub meta: MetaQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomParams {
    pub url: String,
    pub method: HttpMethod,
    pub sorters: Vec<CrudSort>,
    pub filters: Vec<CrudFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<serde_json::Value>,
    pub headers: BTreeMap<String, String>,
    pub meta: MetaQuery,
}

/// Response carrying a page of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetListResponse<T = BaseRecord> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
    /// Pagination the page was fetched with, attached by infinite lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Any additional fields returned by the provider
    #[serde(flatten)]
    pub extra: MetaQuery,
}

impl<T> GetListResponse<T> {
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self {
            data,
            total,
            cursor: None,
            pagination: None,
            extra: MetaQuery::new(),
        }
    }
}

impl GetListResponse<BaseRecord> {
    /// Decode every record into `T`
    pub fn decode<T: DeserializeOwned>(self) -> Result<GetListResponse<T>, HttpError> {
        let data = self
            .data
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(GetListResponse {
            data,
            total: self.total,
            cursor: self.cursor,
            pagination: self.pagination,
            extra: self.extra,
        })
    }
}

/// Response carrying a single record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse<T = BaseRecord> {
    pub data: T,
}

impl RecordResponse<BaseRecord> {
    pub fn decode<T: DeserializeOwned>(self) -> Result<RecordResponse<T>, HttpError> {
        Ok(RecordResponse {
            data: serde_json::from_value(self.data)?,
        })
    }
}

/// Response carrying several records without paging information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordsResponse<T = BaseRecord> {
    pub data: Vec<T>,
}

impl RecordsResponse<BaseRecord> {
    pub fn decode<T: DeserializeOwned>(self) -> Result<RecordsResponse<T>, HttpError> {
        let data = self
            .data
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(RecordsResponse { data })
    }
}

pub type GetOneResponse<T = BaseRecord> = RecordResponse<T>;
pub type CreateResponse<T = BaseRecord> = RecordResponse<T>;
pub type UpdateResponse<T = BaseRecord> = RecordResponse<T>;
pub type DeleteOneResponse<T = BaseRecord> = RecordResponse<T>;
pub type CustomResponse<T = BaseRecord> = RecordResponse<T>;
pub type GetManyResponse<T = BaseRecord> = RecordsResponse<T>;
pub type CreateManyResponse<T = BaseRecord> = RecordsResponse<T>;
pub type UpdateManyResponse<T = BaseRecord> = RecordsResponse<T>;
pub type DeleteManyResponse<T = BaseRecord> = RecordsResponse<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filters_deserialize_by_operator() {
        let filters: Vec<CrudFilter> = serde_json::from_value(json!([
            { "field": "status", "operator": "eq", "value": "published" },
            {
                "operator": "or",
                "value": [
                    { "field": "views", "operator": "gte", "value": 100 },
                    { "field": "pinned", "operator": "eq", "value": true }
                ]
            }
        ]))
        .unwrap();

        assert_eq!(
            filters[0],
            CrudFilter::field("status", LogicalOperator::Eq, "published")
        );
        match &filters[1] {
            CrudFilter::Conditional(conditional) => {
                assert_eq!(conditional.operator, ConditionalOperator::Or);
                assert_eq!(conditional.value.len(), 2);
            }
            other => panic!("expected conditional filter, got {other:?}"),
        }
    }

    #[test]
    fn test_list_response_keeps_extra_fields() {
        let response: GetListResponse = serde_json::from_value(json!({
            "data": [{ "id": 1, "title": "Hello" }],
            "total": 1,
            "cursor": { "next": "abc" },
            "facets": { "draft": 3 }
        }))
        .unwrap();

        assert_eq!(response.cursor.as_ref().unwrap().next.as_deref(), Some("abc"));
        assert_eq!(response.extra["facets"], json!({ "draft": 3 }));
    }

    #[test]
    fn test_decode_records() {
        #[derive(Debug, Clone, PartialEq, Deserialize)]
        struct Post {
            id: u32,
            title: String,
        }

        let response = GetListResponse::new(vec![json!({ "id": 7, "title": "Rust" })], 1);
        let decoded = response.decode::<Post>().unwrap();
        assert_eq!(
            decoded.data,
            vec![Post {
                id: 7,
                title: "Rust".to_string()
            }]
        );

        let broken = RecordResponse {
            data: json!({ "id": "seven" }),
        };
        let error = broken.decode::<Post>().unwrap_err();
        assert_eq!(error.status_code, 0);
    }

    #[test]
    fn test_base_key_display() {
        assert_eq!(BaseKey::from(42_i64).to_string(), "42");
        assert_eq!(BaseKey::from("abc").to_string(), "abc");
    }
}
