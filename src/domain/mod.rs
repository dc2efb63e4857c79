mod collection_request;
mod driver;
mod required_text;

pub use collection_request::{
    CollectionForm, CollectionRequest, NewCollectionRequest, TIMESTAMP_FORMAT,
};
pub use driver::{Driver, NewDriver};
pub use required_text::RequiredText;
