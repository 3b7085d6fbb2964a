//! Request-driven field selection for API serializers
//!
//! `queryfields` lets API callers choose which fields of an object appear in a
//! response. A serializer declares its full [`FieldSet`]; at construction time
//! the fields are narrowed using the request's query string:
//!
//! - `?fields=id,name` keeps only `id` and `name`
//! - `?fields!=email` drops `email`
//! - both together keep the included names minus the excluded ones
//!
//! # Rules
//!
//! - **Forced fields win**: names passed to [`SerializerBuilder::fields`] replace
//!   any request-driven selection
//! - **GET only**: any other method, or a request without a method, leaves the fields alone
//! - **No request, no filtering**: a serializer built without a request keeps every field
//! - **Exclude beats include**: a name in both lists is dropped
//! - **Unknown names are ignored**: asking for an undeclared field is not an error
//!
//! ```
//! use queryfields::{ApiRequest, FieldSet, QueryParams, Serializer};
//! use serde_json::json;
//!
//! let request = ApiRequest::get(QueryParams::parse("fields=id,name&fields!=name"));
//! let serializer = Serializer::builder(FieldSet::from_names(["id", "name", "email"]))
//!     .request(request)
//!     .build()?;
//!
//! let rendered = serializer.to_representation(&json!({
//!     "id": 1,
//!     "name": "Ada",
//!     "email": "ada@example.com",
//! }));
//! assert_eq!(rendered, json!({ "id": 1 }));
//! # Ok::<(), queryfields::QueryFieldsError>(())
//! ```

pub mod config;
pub mod error;
pub mod fields;
pub mod params;
pub mod request;
pub mod selector;
pub mod serializer;

pub use config::SelectorConfig;
pub use error::{QueryFieldsError, Result};
pub use fields::{Field, FieldSet, ForcedFields, SourceField};
pub use params::QueryParams;
pub use request::{ApiRequest, QueryParamSource, RequestContext, SerializerContext};
pub use selector::{compute_drop_set, parse_field_names, FieldSpec, Selection};
pub use serializer::{QueryFieldsSerializer, Serializer, SerializerBuilder};
