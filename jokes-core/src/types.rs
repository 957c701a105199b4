use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the static joke dataset.
///
/// Only `id` is interpreted; every other field is carried through to the
/// client untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokeRecord {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl JokeRecord {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// A dataset record as served on a page: the original fields plus the stored count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikedJoke {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub like_count: i64,
}

impl LikedJoke {
    pub fn new(record: &JokeRecord, like_count: i64) -> Self {
        let mut fields = record.fields.clone();
        // the stored count wins over anything the dataset shipped
        fields.remove("like_count");
        Self {
            id: record.id,
            fields,
            like_count,
        }
    }
}

/// Response body of a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCount {
    pub like_count: i64,
}
